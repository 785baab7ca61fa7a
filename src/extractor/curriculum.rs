// src/extractor/curriculum.rs

use super::{dom::DomNode, with_document};
use crate::{
    client::RobustClient,
    constants::site,
    models::{Curriculum, UnitLessons},
    utils,
};
use log::{debug, error, info, warn};
use std::sync::Arc;

/// 从课程页面中解析 单元 -> 课时 的层级结构
pub struct CurriculumExtractor {
    http_client: Arc<RobustClient>,
}

impl CurriculumExtractor {
    pub fn new(http_client: Arc<RobustClient>) -> Self {
        Self { http_client }
    }

    pub async fn get_lessons(&self, course_url: &str) -> Curriculum {
        let Some(html) = self.http_client.fetch_text(course_url).await else {
            error!("课程页面 {} 无法访问", course_url);
            return Curriculum::default();
        };
        let Some(curriculum) = with_document(&html, |root| parse_curriculum(root, course_url))
        else {
            error!(
                "课程页面 {} 中未找到课程目录区域 (class=\"{}\")",
                course_url,
                site::CURRICULUM_CLASS
            );
            return Curriculum::default();
        };

        if curriculum.dropped_duplicates > 0 {
            warn!(
                "课程页面 {} 中有 {} 个同名课时被后出现的条目覆盖",
                course_url, curriculum.dropped_duplicates
            );
        }
        info!(
            "课程页面 {} 解析完成: {} 个单元, {} 个课时",
            course_url,
            curriculum.units.len(),
            curriculum.lesson_count()
        );
        curriculum
    }
}

/// 只去掉字面前缀 "Lesson: "，不会误删标题本身的字符
pub fn strip_lesson_prefix(text: &str) -> String {
    let text = text.trim();
    text.strip_prefix(site::LESSON_PREFIX)
        .unwrap_or(text)
        .trim()
        .to_string()
}

/// 目录区域的每个单元由一段标题文本和紧随其后的课时列表组成。
/// 找不到目录区域时返回 `None`；同名单元或课时以后出现者为准。
pub fn parse_curriculum<N: DomNode>(root: N, page_url: &str) -> Option<Curriculum> {
    let region = root.find_class(site::CURRICULUM_CLASS)?;
    let mut curriculum = Curriculum::default();

    for unit in region.element_children() {
        let Some((title, container)) = split_unit(unit) else {
            warn!("{} 中有一个单元缺少标题或课时列表，已跳过", page_url);
            continue;
        };

        let mut lessons = UnitLessons::new();
        for item in container.element_children() {
            let Some(link) = item.find_tag("a").or_else(|| item.is_tag("a").then_some(item)) else {
                debug!("单元 '{}' 中的条目没有链接，已跳过", title);
                continue;
            };
            let Some(href) = link.attr("href").and_then(|h| utils::resolve_url(page_url, h)) else {
                debug!("单元 '{}' 中的链接缺少 href，已跳过", title);
                continue;
            };
            let lesson_title = strip_lesson_prefix(&link.text());
            if lessons.insert(lesson_title.clone(), href).is_some() {
                debug!("单元 '{}' 中的课时 '{}' 重复出现", title, lesson_title);
                curriculum.dropped_duplicates += 1;
            }
        }

        if let Some(previous) = curriculum.units.insert(title.clone(), lessons) {
            debug!("单元 '{}' 重复出现，覆盖之前的 {} 个课时", title, previous.len());
            curriculum.dropped_duplicates += previous.len();
        }
    }
    Some(curriculum)
}

/// 第一段非空内容作为单元标题，其后的第一个列表作为课时容器
fn split_unit<N: DomNode>(unit: N) -> Option<(String, N)> {
    let mut children = unit.children().into_iter().filter(|c| !c.is_blank_text());
    let title = children.next()?.text().trim().to_string();
    if title.is_empty() {
        return None;
    }
    let container = children.find(|c| c.is_tag("ul") || c.is_tag("ol"))?;
    Some((title, container))
}
