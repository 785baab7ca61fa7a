// src/downloader/job.rs

use super::savers::{self, AssetSaver};
use crate::{
    DownloadJobContext,
    extractor::{curriculum::CurriculumExtractor, lesson::LessonLinkResolver},
    models::{AssetKind, AssetOutcome, Lesson},
    utils,
};
use indicatif::ProgressBar;
use log::{error, info, warn};
use std::{fs, path::Path};

/// 依次处理一门课程中的所有课时；课时之间没有共享的可变状态
pub struct CourseDownloader {
    context: DownloadJobContext,
    curriculum: CurriculumExtractor,
    links: LessonLinkResolver,
    savers: Vec<Box<dyn AssetSaver>>,
}

impl CourseDownloader {
    pub fn new(context: DownloadJobContext) -> Self {
        let http_client = context.http_client.clone();
        let args = context.args.clone();
        let savers = savers::build_savers(
            http_client.clone(),
            context.config.presentation,
            |kind| args.skips(kind),
        );
        Self {
            curriculum: CurriculumExtractor::new(http_client.clone()),
            links: LessonLinkResolver::new(http_client),
            savers,
            context,
        }
    }

    pub async fn run(&self, course_name: &str, course_url: &str, pbar: &ProgressBar) {
        info!("开始处理课程 '{}': {}", course_name, course_url);
        let curriculum = self.curriculum.get_lessons(course_url).await;
        if curriculum.is_empty() {
            warn!("课程 '{}' 没有可处理的课时", course_name);
            pbar.finish_with_message("没有课时");
            return;
        }
        pbar.set_length(curriculum.lesson_count() as u64);
        self.context
            .manager
            .record_dropped_duplicates(curriculum.dropped_duplicates);

        let course_dir = self
            .context
            .config
            .output_dir
            .join(utils::sanitize_filename(course_name));
        for (unit_title, lessons) in &curriculum.units {
            let unit_dir = course_dir.join(utils::sanitize_filename(unit_title));
            for (lesson_title, lesson_url) in lessons {
                pbar.set_message(utils::truncate_text(lesson_title, 40));
                let lesson_dir = unit_dir.join(utils::sanitize_filename(lesson_title));
                let item = format!("{} / {} / {}", course_name, unit_title, lesson_title);

                let outcomes = self.process_lesson(lesson_title, lesson_url, &lesson_dir).await;
                self.context.manager.record_lesson();
                for (kind, outcome) in &outcomes {
                    self.context.manager.record(&item, *kind, outcome);
                    if let AssetOutcome::Failed(reason) = outcome {
                        let (symbol, color_fn, label) = outcome.get_display_info();
                        pbar.println(format!(
                            "{} {} [{}] {}",
                            symbol,
                            item,
                            kind,
                            color_fn(format!("{}: {}", label, reason).into())
                        ));
                    }
                }
                pbar.inc(1);
            }
        }
        pbar.finish_with_message("完成");
        info!("课程 '{}' 处理完毕", course_name);
    }

    /// 每次迭代都新建一个 `Lesson`，处理器只读取它
    pub async fn process_lesson(
        &self,
        title: &str,
        url: &str,
        lesson_dir: &Path,
    ) -> Vec<(AssetKind, AssetOutcome)> {
        let pending: Vec<AssetKind> = self
            .savers
            .iter()
            .filter(|saver| !saver.already_saved(lesson_dir))
            .map(|saver| saver.kind())
            .collect();
        if pending.is_empty() {
            info!("课时 '{}' 的全部资源已存在", title);
            return self
                .savers
                .iter()
                .map(|saver| (saver.kind(), AssetOutcome::Skipped))
                .collect();
        }

        if let Err(e) = fs::create_dir_all(lesson_dir) {
            error!("无法创建课时目录 {:?}: {}", lesson_dir, e);
            let reason = e.to_string();
            return self
                .savers
                .iter()
                .map(|saver| (saver.kind(), AssetOutcome::Failed(reason.clone())))
                .collect();
        }

        let links = self.links.get_links(url, &pending).await;
        let lesson = Lesson::new(title, url, links, lesson_dir.to_path_buf());

        let mut outcomes = Vec::with_capacity(self.savers.len());
        for saver in &self.savers {
            let outcome = saver.process(&lesson).await;
            outcomes.push((saver.kind(), outcome));
        }
        outcomes
    }
}
