// src/downloader/savers.rs

use super::{pdf, persistence};
use crate::{
    client::RobustClient,
    config::PresentationConfig,
    error::*,
    extractor::{
        playlist::PlaylistExtractor, presentation::PresentationExtractor, video::VideoExtractor,
    },
    models::{AssetKind, AssetOutcome, Lesson},
};
use async_trait::async_trait;
use log::{error, info};
use std::{path::Path, sync::Arc};

/// 一种资源从下载到落盘的完整流程
#[async_trait]
pub trait AssetSaver: Send + Sync {
    fn kind(&self) -> AssetKind;

    /// 输出已在磁盘上时返回 true，此时不会发起任何请求
    fn already_saved(&self, lesson_dir: &Path) -> bool;

    async fn save(&self, lesson: &Lesson, url: &str) -> AppResult<AssetOutcome>;

    /// 检查链接和已有输出后再下载；本地错误在这里转换为 `Failed`
    async fn process(&self, lesson: &Lesson) -> AssetOutcome {
        let kind = self.kind();
        if self.already_saved(lesson.path()) {
            info!("'{}' 的 {} 已存在，跳过", lesson.title(), kind);
            return AssetOutcome::Skipped;
        }
        let Some(url) = lesson.link(kind) else {
            info!("'{}' ({}) 没有 {}", lesson.title(), lesson.main_link(), kind);
            return AssetOutcome::Unavailable;
        };
        match self.save(lesson, url).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("保存 '{}' 的 {} 失败: {}", lesson.title(), kind, e);
                AssetOutcome::Failed(e.to_string())
            }
        }
    }
}

pub struct VideoSaver {
    extractor: VideoExtractor,
}

impl VideoSaver {
    pub fn new(http_client: Arc<RobustClient>) -> Self {
        Self {
            extractor: VideoExtractor::new(http_client),
        }
    }
}

#[async_trait]
impl AssetSaver for VideoSaver {
    fn kind(&self) -> AssetKind {
        AssetKind::Video
    }

    fn already_saved(&self, lesson_dir: &Path) -> bool {
        persistence::video_file(lesson_dir).exists()
    }

    async fn save(&self, lesson: &Lesson, url: &str) -> AppResult<AssetOutcome> {
        let video = self.extractor.download_video(url).await;
        if video.is_empty() {
            return Ok(AssetOutcome::Unavailable);
        }
        for (lang, text) in &video.subtitles {
            persistence::write_atomic(
                &persistence::subtitle_file(lesson.path(), lang),
                text.as_bytes(),
            )?;
        }
        // Video.mp4 最后写入，它的存在代表这一项已完成
        persistence::write_atomic(&persistence::video_file(lesson.path()), &video.bytes)?;
        info!("'{}' 的视频和 {} 条字幕已保存", lesson.title(), video.subtitles.len());
        Ok(AssetOutcome::Saved)
    }
}

pub struct PresentationSaver {
    extractor: PresentationExtractor,
    config: PresentationConfig,
}

impl PresentationSaver {
    pub fn new(http_client: Arc<RobustClient>, config: PresentationConfig) -> Self {
        Self {
            extractor: PresentationExtractor::new(http_client, config.scale),
            config,
        }
    }
}

#[async_trait]
impl AssetSaver for PresentationSaver {
    fn kind(&self) -> AssetKind {
        AssetKind::Presentation
    }

    fn already_saved(&self, lesson_dir: &Path) -> bool {
        persistence::presentation_file(lesson_dir).exists()
    }

    async fn save(&self, lesson: &Lesson, url: &str) -> AppResult<AssetOutcome> {
        let pages = self.extractor.download_presentation(url).await?;
        if pages.is_empty() {
            return Ok(AssetOutcome::Unavailable);
        }
        let page_count = pages.len();
        let config = self.config;
        let document = tokio::task::spawn_blocking(move || pdf::build_pdf(&pages, &config))
            .await
            .map_err(anyhow::Error::from)??;
        persistence::write_atomic(&persistence::presentation_file(lesson.path()), &document)?;
        info!("'{}' 的演示文稿已保存 ({} 页)", lesson.title(), page_count);
        Ok(AssetOutcome::Saved)
    }
}

pub struct PlaylistSaver {
    extractor: PlaylistExtractor,
}

impl PlaylistSaver {
    pub fn new(http_client: Arc<RobustClient>) -> Self {
        Self {
            extractor: PlaylistExtractor::new(http_client),
        }
    }
}

#[async_trait]
impl AssetSaver for PlaylistSaver {
    fn kind(&self) -> AssetKind {
        AssetKind::Playlist
    }

    fn already_saved(&self, lesson_dir: &Path) -> bool {
        persistence::has_entries(&persistence::questions_dir(lesson_dir))
    }

    async fn save(&self, lesson: &Lesson, url: &str) -> AppResult<AssetOutcome> {
        let entries = self.extractor.download_playlist(url).await;
        if entries.is_empty() {
            return Ok(AssetOutcome::Unavailable);
        }
        for entry in &entries {
            persistence::write_atomic(
                &persistence::question_file(lesson.path(), &entry.title),
                &entry.bytes,
            )?;
        }
        info!("'{}' 的 {} 个题目视频已保存", lesson.title(), entries.len());
        Ok(AssetOutcome::Saved)
    }
}

/// 按固定顺序 (演示文稿、视频、题目视频) 构建处理器，跳过 `skip` 中的种类
pub fn build_savers(
    http_client: Arc<RobustClient>,
    presentation: PresentationConfig,
    skip: impl Fn(AssetKind) -> bool,
) -> Vec<Box<dyn AssetSaver>> {
    let all: Vec<Box<dyn AssetSaver>> = vec![
        Box::new(PresentationSaver::new(http_client.clone(), presentation)),
        Box::new(VideoSaver::new(http_client.clone())),
        Box::new(PlaylistSaver::new(http_client)),
    ];
    all.into_iter().filter(|saver| !skip(saver.kind())).collect()
}
