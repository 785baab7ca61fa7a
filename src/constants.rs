// src/constants.rs

pub const UI_WIDTH: usize = 88;
pub const MAX_FILENAME_BYTES: usize = 200;
pub const CONFIG_DIR_NAME: &str = concat!(".", clap::crate_name!());
pub const CONFIG_FILE_NAME: &str = "config.json";
pub const LOG_FILE_NAME: &str = concat!(clap::crate_name!(), ".log");
pub const LOG_FALLBACK_FILE_NAME: &str = "fallback.log";
pub const DEFAULT_SAVE_DIR: &str = "downloads";
pub const DEFAULT_MAX_WORKERS: usize = 4;
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

pub const GRADE_URL_TEMPLATE: &str = "https://www.nagwa.com/en/eg/grades/{grade}/";

pub const DEFAULT_COURSES: &[&str] = &[
    "Pure Mathematics",
    "Mathematics Applications",
    "Physics",
    "Chemistry",
    "Biology",
    "English",
    "Information and Communication Technology",
];

/// 重试策略的默认值: 固定间隔，最多 50 次尝试
pub mod retry {
    pub const MAX_ATTEMPTS: u32 = 50;
    pub const DELAY_SECS: u64 = 3;
}

pub mod presentation {
    pub const SCALE: f32 = 4.0;
    pub const RESOLUTION_DPI: f32 = 100.0;
    pub const JPEG_QUALITY: u8 = 90;
}

/// 站点页面结构中用到的标记
pub mod site {
    pub const BOOK_COVER_CLASS: &str = "book-cover";
    pub const CURRICULUM_CLASS: &str = "list-nested";
    pub const COMPONENTS_CLASS: &str = "components";
    pub const VIDEOS_LIST_CLASS: &str = "videos-list";
    pub const PLAYER_ID: &str = "NagwaLitePlayer";
    pub const SLIDE_ALT: &str = "Slide";
    pub const LESSON_PREFIX: &str = "Lesson: ";
    pub const SUBTITLE_LANGS: &[&str] = &["ar", "en"];
    pub const MAX_SUBTITLES: usize = 2;
}

/// 输出目录中的固定文件名
pub mod layout {
    pub const VIDEO_DIR: &str = "Lesson Video";
    pub const VIDEO_FILE: &str = "Video.mp4";
    pub const PRESENTATION_FILE: &str = "Presentation";
    pub const QUESTIONS_DIR: &str = "Questions Videos";
    pub const QUESTION_FALLBACK_TITLE: &str = "Question";
}
