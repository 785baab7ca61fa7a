// src/extractor/video.rs

use super::{dom::DomNode, with_document};
use crate::{client::RobustClient, constants::site, models::RetrievedVideo, utils};
use log::{debug, info, warn};
use std::{collections::BTreeMap, sync::Arc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleTrack {
    pub lang: String,
    pub url: String,
}

/// 播放器区域中解析出的下载地址
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerSources {
    pub subtitles: Vec<SubtitleTrack>,
    pub video_url: Option<String>,
}

pub struct VideoExtractor {
    http_client: Arc<RobustClient>,
}

impl VideoExtractor {
    pub fn new(http_client: Arc<RobustClient>) -> Self {
        Self { http_client }
    }

    /// 下载视频页面中的视频和字幕。页面没有播放器或视频无法获取时返回空结果，不视为错误。
    pub async fn download_video(&self, page_url: &str) -> RetrievedVideo {
        let Some(html) = self.http_client.fetch_text(page_url).await else {
            warn!("视频页面 {} 无法访问", page_url);
            return RetrievedVideo::default();
        };
        let Some(sources) = with_document(&html, |root| parse_player(root, page_url)) else {
            warn!("视频页面 {} 中没有播放器 (id=\"{}\")", page_url, site::PLAYER_ID);
            return RetrievedVideo::default();
        };
        let Some(video_url) = sources.video_url else {
            warn!("视频页面 {} 的播放器中没有视频源", page_url);
            return RetrievedVideo::default();
        };

        let bytes = self
            .http_client
            .fetch_bytes(video_url.as_str())
            .await
            .unwrap_or_default();
        if bytes.is_empty() {
            warn!("视频 {} 下载失败或内容为空", video_url);
            return RetrievedVideo::default();
        }

        let mut subtitles = BTreeMap::new();
        for track in sources.subtitles {
            match self.http_client.fetch_text(track.url.as_str()).await {
                Some(text) => {
                    debug!("已获取 {} 字幕: {}", track.lang, track.url);
                    subtitles.insert(track.lang, text);
                }
                None => warn!("{} 字幕下载失败: {}", track.lang, track.url),
            }
        }

        info!(
            "视频下载完成: {} ({} 字节, {} 条字幕)",
            video_url,
            bytes.len(),
            subtitles.len()
        );
        RetrievedVideo { bytes, subtitles }
    }
}

/// 找不到播放器区域时返回 `None`
pub fn parse_player<N: DomNode>(root: N, page_url: &str) -> Option<PlayerSources> {
    let player = root.find(|n| n.attr("id") == Some(site::PLAYER_ID))?;

    // 阿语和英语字幕都找到后就不再继续
    let subtitles = player
        .find_all(|n| {
            n.is_tag("track")
                && n.attr("srclang")
                    .is_some_and(|lang| site::SUBTITLE_LANGS.contains(&lang))
        })
        .into_iter()
        .take(site::MAX_SUBTITLES)
        .filter_map(|track| {
            Some(SubtitleTrack {
                lang: track.attr("srclang")?.to_string(),
                url: utils::resolve_url(page_url, track.attr("src")?)?,
            })
        })
        .collect();

    let video_url = player
        .find_tag("source")
        .and_then(|source| source.attr("src").and_then(first_source))
        .or_else(|| {
            player
                .find_tag("video")
                .and_then(|video| video.attr("src").and_then(first_source))
        })
        .and_then(|src| utils::resolve_url(page_url, &src));

    Some(PlayerSources {
        subtitles,
        video_url,
    })
}

/// 多清晰度时 src 中会以空白分隔列出多个地址，取第一个
fn first_source(src: &str) -> Option<String> {
    src.split_whitespace()
        .next()
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::dom::{HtmlNode, parse_document};

    fn parse(html: &str) -> Option<PlayerSources> {
        let doc = parse_document(html);
        parse_player(HtmlNode::root(&doc), "https://www.nagwa.com/en/eg/videos/1/")
    }

    #[test]
    fn test_player_with_tracks_and_multiple_resolutions() {
        let html = r#"
        <div id="NagwaLitePlayer">
          <video>
            <source src="https://media.nagwa.com/720.mp4 https://media.nagwa.com/480.mp4" type="video/mp4">
            <source src="https://media.nagwa.com/360.mp4" type="video/mp4">
            <track kind="subtitles" srclang="fr" src="/subs/fr.vtt">
            <track kind="subtitles" srclang="en" src="/subs/en.vtt">
            <track kind="subtitles" srclang="ar" src="/subs/ar.vtt">
            <track kind="subtitles" srclang="en" src="/subs/en-2.vtt">
          </video>
        </div>"#;
        let sources = parse(html).unwrap();
        assert_eq!(sources.video_url.as_deref(), Some("https://media.nagwa.com/720.mp4"));
        assert_eq!(
            sources.subtitles,
            vec![
                SubtitleTrack {
                    lang: "en".into(),
                    url: "https://www.nagwa.com/subs/en.vtt".into()
                },
                SubtitleTrack {
                    lang: "ar".into(),
                    url: "https://www.nagwa.com/subs/ar.vtt".into()
                },
            ]
        );
    }

    #[test]
    fn test_page_without_player() {
        assert_eq!(parse("<div id='other'><video src='/v.mp4'></video></div>"), None);
    }

    #[test]
    fn test_player_without_source() {
        let sources = parse(r#"<div id="NagwaLitePlayer"><p>Video unavailable</p></div>"#).unwrap();
        assert_eq!(sources, PlayerSources::default());
    }

    #[test]
    fn test_first_source() {
        assert_eq!(first_source("a.mp4 b.mp4").as_deref(), Some("a.mp4"));
        assert_eq!(
            first_source("https://cdn.nagwa.com/v.mp4?sig=a,b&t=1").as_deref(),
            Some("https://cdn.nagwa.com/v.mp4?sig=a,b&t=1")
        );
        assert_eq!(first_source("  ").as_deref(), None);
    }
}
