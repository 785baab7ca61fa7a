// src/downloader/persistence.rs

use crate::{constants::layout, error::*};
use log::debug;
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};
use tempfile::Builder;

/// 未完成写入的临时文件前缀
const PARTIAL_PREFIX: &str = ".part-";

pub fn video_dir(lesson_dir: &Path) -> PathBuf {
    lesson_dir.join(layout::VIDEO_DIR)
}

pub fn video_file(lesson_dir: &Path) -> PathBuf {
    video_dir(lesson_dir).join(layout::VIDEO_FILE)
}

pub fn subtitle_file(lesson_dir: &Path, lang: &str) -> PathBuf {
    video_dir(lesson_dir).join(format!("subtitle_{}.vtt", lang))
}

pub fn presentation_file(lesson_dir: &Path) -> PathBuf {
    lesson_dir.join(layout::PRESENTATION_FILE)
}

pub fn questions_dir(lesson_dir: &Path) -> PathBuf {
    lesson_dir.join(layout::QUESTIONS_DIR)
}

pub fn question_file(lesson_dir: &Path, title: &str) -> PathBuf {
    questions_dir(lesson_dir).join(format!("{}.mp4", title))
}

/// 目录存在且至少有一个已完成的条目；中断遗留的临时文件不算
pub fn has_entries(dir: &Path) -> bool {
    fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(Result::ok)
                .any(|entry| !is_partial(&entry.file_name().to_string_lossy()))
        })
        .unwrap_or(false)
}

fn is_partial(file_name: &str) -> bool {
    file_name.starts_with(PARTIAL_PREFIX)
}

/// 先写入同目录下的临时文件再重命名，中断时不会留下半个文件
pub fn write_atomic(path: &Path, contents: &[u8]) -> AppResult<()> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent)?;

    let mut temp = Builder::new().prefix(PARTIAL_PREFIX).tempfile_in(parent)?;
    temp.write_all(contents)?;
    temp.flush()?;
    temp.persist(path)?;
    debug!("已写入 {:?} ({} 字节)", path, contents.len());
    Ok(())
}
