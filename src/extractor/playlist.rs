// src/extractor/playlist.rs

use super::{dom::DomNode, video::VideoExtractor, with_document};
use crate::{
    client::RobustClient,
    constants::{layout, site},
    models::PlaylistEntry,
    utils,
};
use log::{debug, info, warn};
use std::{collections::HashSet, sync::Arc};

pub struct PlaylistExtractor {
    http_client: Arc<RobustClient>,
    videos: VideoExtractor,
}

impl PlaylistExtractor {
    pub fn new(http_client: Arc<RobustClient>) -> Self {
        Self {
            videos: VideoExtractor::new(http_client.clone()),
            http_client,
        }
    }

    /// 逐个下载题目视频。下载失败的条目被丢弃，其余照常返回。
    pub async fn download_playlist(&self, playlist_url: &str) -> Vec<PlaylistEntry> {
        let Some(html) = self.http_client.fetch_text(playlist_url).await else {
            warn!("题目视频列表 {} 无法访问", playlist_url);
            return Vec::new();
        };
        let Some(items) = with_document(&html, |root| parse_playlist_items(root, playlist_url))
        else {
            warn!(
                "页面 {} 中未找到题目视频列表 (class=\"{}\")",
                playlist_url,
                site::VIDEOS_LIST_CLASS
            );
            return Vec::new();
        };

        let mut titles = TitleDeduper::default();
        let mut entries = Vec::with_capacity(items.len());
        for (raw_title, detail_url) in items {
            let video = self.videos.download_video(&detail_url).await;
            if video.is_empty() {
                warn!("题目视频 '{}' 没有可下载的内容，已丢弃", raw_title);
                continue;
            }
            let title = titles.unique(&utils::clean(&raw_title));
            info!("题目视频 '{}' 下载完成", title);
            entries.push(PlaylistEntry {
                title,
                bytes: video.bytes,
            });
        }
        entries
    }
}

/// `videos-list` 下每个 `li` 的 `h4 > a`，返回 (标题, 详情页链接)
pub fn parse_playlist_items<N: DomNode>(root: N, page_url: &str) -> Option<Vec<(String, String)>> {
    let list = root.find_class(site::VIDEOS_LIST_CLASS)?;
    let items = list
        .find_all(|n| n.is_tag("li"))
        .into_iter()
        .filter_map(|item| {
            let link = item.find_tag("h4")?.find_tag("a")?;
            let href = utils::resolve_url(page_url, link.attr("href")?)?;
            Some((link.text().trim().to_string(), href))
        })
        .collect::<Vec<_>>();
    debug!("{} 中有 {} 个题目视频", page_url, items.len());
    Some(items)
}

/// 标题重复时追加 " (n)"；n 是整个列表共用的计数器，每次冲突后加一
#[derive(Debug, Default)]
pub struct TitleDeduper {
    seen: HashSet<String>,
    repeated: usize,
}

impl TitleDeduper {
    pub fn unique(&mut self, title: &str) -> String {
        let base = match title.trim() {
            "" => layout::QUESTION_FALLBACK_TITLE,
            trimmed => trimmed,
        };
        let mut candidate = base.to_string();
        while self.seen.contains(&candidate) {
            candidate = format!("{} ({})", base, self.repeated);
            self.repeated += 1;
        }
        self.seen.insert(candidate.clone());
        candidate
    }
}
