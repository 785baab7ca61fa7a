// src/extractor/lesson.rs

use super::{dom::DomNode, with_document};
use crate::{client::RobustClient, constants::site, models::AssetKind, utils};
use log::{debug, error};
use std::{collections::HashMap, sync::Arc};

/// 课时页面中 "components" 区域的资源菜单
pub struct LessonLinkResolver {
    http_client: Arc<RobustClient>,
}

impl LessonLinkResolver {
    pub fn new(http_client: Arc<RobustClient>) -> Self {
        Self { http_client }
    }

    /// 返回页面上出现且属于 `wanted` 的资源链接；缺少的种类表示该课时没有这种资源
    pub async fn get_links(
        &self,
        lesson_url: &str,
        wanted: &[AssetKind],
    ) -> HashMap<AssetKind, String> {
        let Some(html) = self.http_client.fetch_text(lesson_url).await else {
            error!("课时页面 {} 无法访问", lesson_url);
            return HashMap::new();
        };
        match with_document(&html, |root| parse_links(root, lesson_url, wanted)) {
            Some(links) => {
                debug!("课时页面 {} 的资源链接: {:?}", lesson_url, links);
                links
            }
            None => {
                error!(
                    "课时页面 {} 中未找到资源菜单 (class=\"{}\" 下的 ul)",
                    lesson_url,
                    site::COMPONENTS_CLASS
                );
                HashMap::new()
            }
        }
    }
}

/// 找不到资源菜单时返回 `None`
pub fn parse_links<N: DomNode>(
    root: N,
    page_url: &str,
    wanted: &[AssetKind],
) -> Option<HashMap<AssetKind, String>> {
    let menu = root.find_class(site::COMPONENTS_CLASS)?.find_tag("ul")?;

    let mut links = HashMap::new();
    for item in menu.element_children() {
        let Some(anchor) = item.find_tag("a") else {
            continue;
        };
        let Some(kind) = match_label(anchor, wanted) else {
            continue;
        };
        if let Some(href) = anchor.attr("href").and_then(|h| utils::resolve_url(page_url, h)) {
            links.insert(kind, href);
        }
    }
    Some(links)
}

/// 只看链接自身的文本片段 (不进入子元素)，取第一个与所需标签完全相等的片段
fn match_label<N: DomNode>(anchor: N, wanted: &[AssetKind]) -> Option<AssetKind> {
    anchor
        .children()
        .into_iter()
        .filter_map(|child| child.own_text().map(|t| t.trim().to_string()))
        .find_map(|fragment| {
            AssetKind::from_label(&fragment).filter(|kind| wanted.contains(kind))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::dom::{HtmlNode, parse_document};

    fn parse(html: &str, wanted: &[AssetKind]) -> Option<HashMap<AssetKind, String>> {
        let doc = parse_document(html);
        parse_links(HtmlNode::root(&doc), "https://www.nagwa.com/en/eg/lessons/1/", wanted)
    }

    #[test]
    fn test_only_wanted_labels_are_returned() {
        let html = r#"
        <div class="components">
          <ul>
            <li><a href="https://www.nagwa.com/v/1/">Lesson Video</a></li>
            <li><a href="https://www.nagwa.com/p/1/">Lesson Presentation</a></li>
            <li><a href="https://www.nagwa.com/x/1/">Irrelevant</a></li>
          </ul>
        </div>"#;
        let links = parse(html, &[AssetKind::Video, AssetKind::Presentation]).unwrap();
        assert_eq!(
            links,
            HashMap::from([
                (AssetKind::Video, "https://www.nagwa.com/v/1/".to_string()),
                (AssetKind::Presentation, "https://www.nagwa.com/p/1/".to_string()),
            ])
        );
    }

    #[test]
    fn test_label_is_read_from_direct_text_only() {
        // 图标和徽标等子元素中的文本不参与匹配
        let html = r#"
        <div class="components"><nav>
          <ul>
            <li><a href="/v/"><i class="icon">Lesson Plan</i>
                  Lesson Video
               </a></li>
            <li><a href="/pl/"><span>Lesson Playlist</span></a></li>
            <li><a href="/e/"><span class="new">New</span> Lesson Explainer</a></li>
          </ul>
        </nav></div>"#;
        let links = parse(html, &AssetKind::ALL).unwrap();
        assert_eq!(links.len(), 2);
        assert_eq!(links[&AssetKind::Video], "https://www.nagwa.com/v/");
        assert_eq!(links[&AssetKind::Explainer], "https://www.nagwa.com/e/");
        assert!(!links.contains_key(&AssetKind::Plan));
        assert!(!links.contains_key(&AssetKind::Playlist));
    }

    #[test]
    fn test_missing_components_region_yields_none() {
        assert!(
            parse("<ul><li><a href='/v/'>Lesson Video</a></li></ul>", &AssetKind::ALL).is_none()
        );
        assert!(parse("<div class='components'><p>empty</p></div>", &AssetKind::ALL).is_none());
    }
}
