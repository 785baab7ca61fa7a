// src/ui.rs

use crate::constants;
use colored::*;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

pub mod symbols {
    use colored::{ColoredString, Colorize};
    use std::sync::LazyLock;

    pub static OK: LazyLock<ColoredString> = LazyLock::new(|| "[OK]".green());
    pub static ERROR: LazyLock<ColoredString> = LazyLock::new(|| "[X]".red());
    pub static INFO: LazyLock<ColoredString> = LazyLock::new(|| "[i]".cyan());
    pub static WARN: LazyLock<ColoredString> = LazyLock::new(|| "[!]".yellow());
}

pub fn print_header(title: &str) {
    println!("\n{}", "═".repeat(constants::UI_WIDTH));
    println!(" {}", title.cyan().bold());
    println!("{}", "═".repeat(constants::UI_WIDTH));
}

pub fn print_sub_header(title: &str) {
    println!("\n--- {} ---", title.bold());
}

pub fn plain(message: &str) {
    println!("{}", message);
}

pub fn info(message: &str) {
    println!("{} {}", *symbols::INFO, message);
}

pub fn warn(message: &str) {
    println!("{} {}", *symbols::WARN, message.yellow());
}

pub fn error(message: &str) {
    eprintln!("{} {}", *symbols::ERROR, message.red());
}

/// 以课时数量为单位的课程进度条，挂在共享的 `MultiProgress` 上
pub fn new_course_progress_bar(multi: &MultiProgress, total: u64, course: &str) -> ProgressBar {
    let pbar = multi.add(ProgressBar::new(total));
    let style = ProgressStyle::with_template(
        "{prefix:.cyan.bold} [{bar:30.green/white}] {pos}/{len} {wide_msg}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("=> ");
    pbar.set_style(style);
    pbar.set_prefix(crate::utils::truncate_text(course, 28));
    pbar
}
