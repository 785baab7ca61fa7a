// src/cli.rs

use crate::{constants, models::AssetKind};
use clap::{Parser, ValueEnum, crate_version};
use std::path::PathBuf;

/// 定义日志输出级别
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// 可以跳过的资源类型 (只包括真正会下载的三种)
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum SkippableAsset {
    Video,
    Presentation,
    Playlist,
}

impl From<SkippableAsset> for AssetKind {
    fn from(asset: SkippableAsset) -> Self {
        match asset {
            SkippableAsset::Video => AssetKind::Video,
            SkippableAsset::Presentation => AssetKind::Presentation,
            SkippableAsset::Playlist => AssetKind::Playlist,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    version = crate_version!(),
    about,
    long_about = None,
    arg_required_else_help = true,
    disable_help_flag = true,
    disable_version_flag = true,
)]
pub struct Cli {
    // --- 下载目标 (Target) ---
    /// 指定年级编号 (例如 11)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..), help_heading = "Target")]
    pub grade: u32,
    /// 指定要下载的课程名称，可重复使用；缺省时使用配置文件中的课程列表
    #[arg(short, long = "course", value_name = "NAME", help_heading = "Target")]
    pub courses: Vec<String>,
    /// 仅列出该年级页面上的所有课程，不进行下载
    #[arg(long, action = clap::ArgAction::SetTrue, help_heading = "Target")]
    pub list_courses: bool,

    // --- 下载选项 (Options) ---
    /// 跳过指定类型的资源，可重复使用
    #[arg(long, value_enum, value_name = "KIND", help_heading = "Options")]
    pub skip: Vec<SkippableAsset>,
    /// 设置同时处理的课程数
    #[arg(short, long, value_parser = clap::value_parser!(usize), help_heading = "Options")]
    pub workers: Option<usize>,
    /// 设置文件保存目录
    #[arg(short, long, value_name = "DIR", default_value_os_t = PathBuf::from(constants::DEFAULT_SAVE_DIR), help_heading = "Options")]
    pub output: PathBuf,

    // --- 通用选项 (General) ---
    /// 显示此帮助信息并退出
    #[arg(short = 'h', long, action = clap::ArgAction::Help, global = true, help_heading = "General")]
    _help: Option<bool>,
    /// 显示版本信息并退出
    #[arg(short = 'V', long, action = clap::ArgAction::Version, global = true, help_heading = "General")]
    _version: Option<bool>,
    /// (隐藏参数) 设置日志文件的输出级别，用于调试
    #[arg(long, value_enum, default_value_t = LogLevel::Info, global = true, hide = true)]
    pub log_level: LogLevel,
}

impl Cli {
    pub fn skips(&self, kind: AssetKind) -> bool {
        self.skip.iter().any(|s| AssetKind::from(*s) == kind)
    }
}
