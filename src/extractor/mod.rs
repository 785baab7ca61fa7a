// src/extractor/mod.rs

pub mod catalog;
pub mod curriculum;
pub mod dom;
pub mod lesson;
pub mod playlist;
pub mod presentation;
pub mod video;

use dom::HtmlNode;

/// 解析 HTML 并在同一个同步作用域内完成提取。
/// `scraper::Html` 不是 `Send`，不能跨越 `.await` 持有。
pub(crate) fn with_document<T>(html: &str, extract: impl FnOnce(HtmlNode<'_>) -> T) -> T {
    let document = dom::parse_document(html);
    extract(HtmlNode::root(&document))
}
