// src/extractor/catalog.rs

use super::{dom::DomNode, with_document};
use crate::{client::RobustClient, constants::site, models::CourseCatalog, utils};
use log::{debug, error, info};
use std::sync::Arc;

/// 从年级页面中找出需要的课程链接
pub struct CatalogExtractor {
    http_client: Arc<RobustClient>,
}

impl CatalogExtractor {
    pub fn new(http_client: Arc<RobustClient>) -> Self {
        Self { http_client }
    }

    /// 返回 `needed` 中出现在页面上的课程。页面不可达或没有匹配时返回空表。
    pub async fn get_courses(&self, grade_url: &str, needed: &[String]) -> CourseCatalog {
        let Some(html) = self.http_client.fetch_text(grade_url).await else {
            error!("年级页面 {} 无法访问", grade_url);
            return CourseCatalog::new();
        };
        let courses = with_document(&html, |root| {
            parse_courses(root, grade_url)
                .into_iter()
                .filter(|(name, _)| needed.iter().any(|n| n == name))
                .collect::<CourseCatalog>()
        });
        info!("在 {} 中找到 {} 门需要的课程", grade_url, courses.len());
        courses
    }

    /// 列出页面上的全部课程，保持页面顺序
    pub async fn list_courses(&self, grade_url: &str) -> Vec<(String, String)> {
        match self.http_client.fetch_text(grade_url).await {
            Some(html) => with_document(&html, |root| parse_courses(root, grade_url)),
            None => {
                error!("年级页面 {} 无法访问", grade_url);
                Vec::new()
            }
        }
    }
}

/// 课程卡片: `li.book-cover > a`，课程名取自链接内的 `h4`
pub fn parse_courses<N: DomNode>(root: N, page_url: &str) -> Vec<(String, String)> {
    root.find_all(|n| {
        n.is_tag("a")
            && n.parent()
                .is_some_and(|p| p.is_tag("li") && p.has_class(site::BOOK_COVER_CLASS))
    })
    .into_iter()
    .filter_map(|link| {
        let name = link.find_tag("h4")?.text().trim().to_string();
        let href = utils::resolve_url(page_url, link.attr("href")?)?;
        debug!("课程卡片: '{}' -> {}", name, href);
        Some((name, href))
    })
    .collect()
}
