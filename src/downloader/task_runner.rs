// src/downloader/task_runner.rs

use super::job::CourseDownloader;
use crate::{DownloadJobContext, ui};
use futures::{StreamExt, stream};
use indicatif::MultiProgress;
use std::{cmp::min, sync::Arc};

/// 并发处理多门课程，每门课程一个进度条；课程内部的课时按顺序处理。
pub async fn execute_courses(context: &DownloadJobContext, courses: Vec<(String, String)>) {
    let max_workers = min(context.config.max_workers, courses.len());
    if max_workers == 0 {
        return;
    }

    ui::plain("");
    ui::info(&format!(
        "开始处理 {} 门课程 (并发数: {})...",
        courses.len(),
        max_workers
    ));

    let multi = MultiProgress::new();
    let downloader = Arc::new(CourseDownloader::new(context.clone()));

    stream::iter(courses)
        .for_each_concurrent(max_workers, |(name, url)| {
            let downloader = downloader.clone();
            let pbar = ui::new_course_progress_bar(&multi, 0, &name);
            async move {
                downloader.run(&name, &url, &pbar).await;
            }
        })
        .await;

    multi.clear().ok();
}
