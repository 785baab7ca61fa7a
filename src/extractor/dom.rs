// src/extractor/dom.rs

//! 解析器只依赖这里的 `DomNode` 抽象，不直接依赖具体的 HTML 库。
//! 生产环境用 `scraper` 实现 (`HtmlNode`)，测试中也可以换成手工构造的节点。

use ego_tree::NodeRef;
use scraper::{Html, Node};

pub trait DomNode: Copy {
    fn children(&self) -> Vec<Self>;
    fn parent(&self) -> Option<Self>;
    /// 元素的标签名；文本及其他节点返回 `None`
    fn tag_name(&self) -> Option<&str>;
    /// 文本节点自身的内容；元素返回 `None`
    fn own_text(&self) -> Option<&str>;
    fn attr(&self, name: &str) -> Option<&str>;

    fn is_element(&self) -> bool {
        self.tag_name().is_some()
    }

    fn is_tag(&self, tag: &str) -> bool {
        self.tag_name().is_some_and(|t| t.eq_ignore_ascii_case(tag))
    }

    fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    /// 是否为只包含空白的文本节点
    fn is_blank_text(&self) -> bool {
        self.own_text().is_some_and(|t| t.trim().is_empty())
    }

    /// 递归拼接所有后代文本
    fn text(&self) -> String {
        let mut out = String::new();
        collect_text(*self, &mut out);
        out
    }

    /// 先序遍历的所有后代 (不含自身)
    fn descendants(&self) -> Vec<Self> {
        let mut out = Vec::new();
        collect_descendants(*self, &mut out);
        out
    }

    fn find(&self, pred: impl Fn(&Self) -> bool) -> Option<Self> {
        self.descendants().into_iter().find(|n| pred(n))
    }

    fn find_all(&self, pred: impl Fn(&Self) -> bool) -> Vec<Self> {
        self.descendants().into_iter().filter(|n| pred(n)).collect()
    }

    fn find_tag(&self, tag: &str) -> Option<Self> {
        self.find(|n| n.is_tag(tag))
    }

    fn find_class(&self, class: &str) -> Option<Self> {
        self.find(|n| n.has_class(class))
    }

    fn element_children(&self) -> Vec<Self> {
        self.children().into_iter().filter(|n| n.is_element()).collect()
    }
}

fn collect_text<N: DomNode>(node: N, out: &mut String) {
    if let Some(text) = node.own_text() {
        out.push_str(text);
        return;
    }
    for child in node.children() {
        collect_text(child, out);
    }
}

fn collect_descendants<N: DomNode>(node: N, out: &mut Vec<N>) {
    for child in node.children() {
        out.push(child);
        collect_descendants(child, out);
    }
}

/// `scraper` 文档树上的节点
#[derive(Clone, Copy)]
pub struct HtmlNode<'a>(NodeRef<'a, Node>);

impl<'a> HtmlNode<'a> {
    pub fn root(document: &'a Html) -> Self {
        HtmlNode(document.tree.root())
    }
}

impl DomNode for HtmlNode<'_> {
    fn children(&self) -> Vec<Self> {
        self.0.children().map(HtmlNode).collect()
    }

    fn parent(&self) -> Option<Self> {
        self.0.parent().map(HtmlNode)
    }

    fn tag_name(&self) -> Option<&str> {
        self.0.value().as_element().map(|e| e.name())
    }

    fn own_text(&self) -> Option<&str> {
        self.0.value().as_text().map(|t| &**t)
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.0.value().as_element().and_then(|e| e.attr(name))
    }
}

pub fn parse_document(html: &str) -> Html {
    Html::parse_document(html)
}
