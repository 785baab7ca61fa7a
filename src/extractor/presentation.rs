// src/extractor/presentation.rs

use super::{dom::DomNode, with_document};
use crate::{client::RobustClient, constants::site, error::*, utils};
use futures::future::join_all;
use image::RgbImage;
use log::{debug, error, info, warn};
use resvg::{tiny_skia, usvg};
use std::{future::Future, sync::Arc};

pub struct PresentationExtractor {
    http_client: Arc<RobustClient>,
    scale: f32,
}

impl PresentationExtractor {
    pub fn new(http_client: Arc<RobustClient>, scale: f32) -> Self {
        Self { http_client, scale }
    }

    /// 按幻灯片顺序返回光栅化后的页面；获取或渲染失败的幻灯片被记录并跳过
    pub async fn download_presentation(&self, page_url: &str) -> AppResult<Vec<RgbImage>> {
        let Some(html) = self.http_client.fetch_text(page_url).await else {
            warn!("演示文稿页面 {} 无法访问", page_url);
            return Ok(Vec::new());
        };
        let sources = with_document(&html, |root| parse_slide_sources(root, page_url));
        if sources.is_empty() {
            warn!("演示文稿页面 {} 中没有幻灯片 (alt=\"{}\")", page_url, site::SLIDE_ALT);
            return Ok(Vec::new());
        }
        debug!("演示文稿 {} 共有 {} 张幻灯片", page_url, sources.len());

        let client = &self.http_client;
        let fetched = fetch_in_order(sources.clone(), |url| async move {
            client.fetch_bytes(url.as_str()).await
        })
        .await;

        let slides: Vec<(String, Vec<u8>)> = sources
            .into_iter()
            .zip(fetched)
            .filter_map(|(url, data)| match data {
                Some(data) => Some((url, data)),
                None => {
                    error!("幻灯片 {} 下载失败，已跳过", url);
                    None
                }
            })
            .collect();

        let scale = self.scale;
        let pages = tokio::task::spawn_blocking(move || rasterize_all(&slides, scale))
            .await
            .map_err(anyhow::Error::from)?;
        info!("演示文稿 {} 渲染完成: {} 页", page_url, pages.len());
        Ok(pages)
    }
}

/// 所有 `alt="Slide"` 的元素的 src，保持页面顺序
pub fn parse_slide_sources<N: DomNode>(root: N, page_url: &str) -> Vec<String> {
    root.find_all(|n| n.attr("alt") == Some(site::SLIDE_ALT))
        .into_iter()
        .filter_map(|slide| utils::resolve_url(page_url, slide.attr("src")?))
        .collect()
}

/// 同时发起全部请求，结果按 `sources` 的顺序排列，与完成顺序无关
pub async fn fetch_in_order<T, F, Fut>(sources: Vec<String>, fetch: F) -> Vec<Option<T>>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Option<T>>,
{
    join_all(sources.into_iter().map(fetch)).await
}

fn rasterize_all(slides: &[(String, Vec<u8>)], scale: f32) -> Vec<RgbImage> {
    let options = svg_options();
    slides
        .iter()
        .filter_map(|(url, svg)| match rasterize_with(svg, scale, &options) {
            Ok(page) => Some(page),
            Err(e) => {
                error!("幻灯片 {} 渲染失败，已跳过: {}", url, e);
                None
            }
        })
        .collect()
}

fn svg_options() -> usvg::Options<'static> {
    let mut options = usvg::Options::default();
    options.fontdb_mut().load_system_fonts();
    options
}

/// 把 SVG 放大 `scale` 倍后铺在白色不透明背景上
pub fn rasterize_slide(svg: &[u8], scale: f32) -> AppResult<RgbImage> {
    rasterize_with(svg, scale, &usvg::Options::default())
}

fn rasterize_with(svg: &[u8], scale: f32, options: &usvg::Options) -> AppResult<RgbImage> {
    let tree = usvg::Tree::from_data(svg, options).map_err(|e| AppError::Render(e.to_string()))?;
    let size = tree
        .size()
        .to_int_size()
        .scale_by(scale)
        .ok_or_else(|| AppError::Render(format!("无效的缩放尺寸 (scale = {})", scale)))?;

    let mut pixmap = tiny_skia::Pixmap::new(size.width(), size.height()).ok_or_else(|| {
        AppError::Render(format!("无法创建 {}x{} 的画布", size.width(), size.height()))
    })?;
    pixmap.fill(tiny_skia::Color::WHITE);
    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );

    // 背景不透明，预乘后的 RGB 即为最终颜色
    let rgb: Vec<u8> = pixmap
        .data()
        .chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect();
    RgbImage::from_raw(size.width(), size.height(), rgb)
        .ok_or_else(|| AppError::Render("像素缓冲区尺寸不匹配".to_string()))
}
