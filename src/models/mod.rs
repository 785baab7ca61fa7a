// src/models/mod.rs

use crate::ui::symbols;
use colored::{ColoredString, Colorize};
use indexmap::IndexMap;
use std::{
    collections::{BTreeMap, HashMap},
    fmt,
    path::{Path, PathBuf},
};

/// 课程页面中一节课可能提供的资源种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AssetKind {
    Plan,
    Video,
    Presentation,
    Playlist,
    Explainer,
}

impl AssetKind {
    pub const ALL: [AssetKind; 5] = [
        AssetKind::Plan,
        AssetKind::Video,
        AssetKind::Presentation,
        AssetKind::Playlist,
        AssetKind::Explainer,
    ];

    /// 页面上链接的可见文本
    pub fn label(self) -> &'static str {
        match self {
            AssetKind::Plan => "Lesson Plan",
            AssetKind::Video => "Lesson Video",
            AssetKind::Presentation => "Lesson Presentation",
            AssetKind::Playlist => "Lesson Playlist",
            AssetKind::Explainer => "Lesson Explainer",
        }
    }

    /// 按已去除首尾空白的文本精确匹配
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.label() == label)
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 课程名 -> 课程页面链接
pub type CourseCatalog = HashMap<String, String>;

/// 课时名 -> 课时页面链接，保持页面中的顺序
pub type UnitLessons = IndexMap<String, String>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Curriculum {
    pub units: IndexMap<String, UnitLessons>,
    /// 因同名而被后出现条目覆盖掉的课时数
    pub dropped_duplicates: usize,
}

impl Curriculum {
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn lesson_count(&self) -> usize {
        self.units.values().map(IndexMap::len).sum()
    }
}

/// 一节课的全部信息。每次迭代新建，构造完成后不再修改。
#[derive(Debug, Clone)]
pub struct Lesson {
    title: String,
    main_link: String,
    links: HashMap<AssetKind, String>,
    path: PathBuf,
}

impl Lesson {
    pub fn new(
        title: impl Into<String>,
        main_link: impl Into<String>,
        links: HashMap<AssetKind, String>,
        path: PathBuf,
    ) -> Self {
        Self {
            title: title.into(),
            main_link: main_link.into(),
            links,
            path,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn main_link(&self) -> &str {
        &self.main_link
    }

    pub fn link(&self, kind: AssetKind) -> Option<&str> {
        self.links.get(&kind).map(String::as_str)
    }

    pub fn links(&self) -> &HashMap<AssetKind, String> {
        &self.links
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetrievedVideo {
    pub bytes: Vec<u8>,
    /// 语言代码 (ar / en) -> 字幕文本
    pub subtitles: BTreeMap<String, String>,
}

impl RetrievedVideo {
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistEntry {
    pub title: String,
    pub bytes: Vec<u8>,
}

/// 单个资源处理器对一节课的处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetOutcome {
    Saved,
    Skipped,
    Unavailable,
    Failed(String),
}

impl AssetOutcome {
    pub fn get_display_info(
        &self,
    ) -> (
        &'static ColoredString,
        fn(ColoredString) -> ColoredString,
        &'static str,
    ) {
        match self {
            AssetOutcome::Saved => (&symbols::OK, |s| s.green(), "下载成功"),
            AssetOutcome::Skipped => (&symbols::INFO, |s| s.cyan(), "已存在，跳过"),
            AssetOutcome::Unavailable => (&symbols::WARN, |s| s.yellow(), "无可用资源"),
            AssetOutcome::Failed(_) => (&symbols::ERROR, |s| s.red(), "处理失败"),
        }
    }
}
