// src/downloader/mod.rs

pub mod job;
pub mod pdf;
pub mod persistence;
pub mod savers;
pub mod task_runner;

pub use job::CourseDownloader;

// DownloadManager 被所有课程并发共享，只通过锁修改
use crate::{
    models::{AssetKind, AssetOutcome},
    ui::{self, symbols},
};
use colored::*;
use log::info;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadStats {
    pub lessons: usize,
    pub saved: usize,
    pub skipped: usize,
    pub unavailable: usize,
    pub failed: usize,
    /// 目录中因同名而被覆盖的课时
    pub dropped_duplicates: usize,
}

#[derive(Clone)]
pub struct DownloadManager {
    stats: Arc<Mutex<DownloadStats>>,
    failed_downloads: Arc<Mutex<Vec<(String, String)>>>,
    unavailable_assets: Arc<Mutex<Vec<(String, String)>>>,
}

impl Default for DownloadManager {
    fn default() -> Self {
        Self::new()
    }
}

impl DownloadManager {
    pub fn new() -> Self {
        Self {
            stats: Arc::new(Mutex::new(DownloadStats::default())),
            failed_downloads: Arc::new(Mutex::new(Vec::new())),
            unavailable_assets: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn record_lesson(&self) {
        self.stats.lock().unwrap().lessons += 1;
    }

    pub fn record_dropped_duplicates(&self, count: usize) {
        self.stats.lock().unwrap().dropped_duplicates += count;
    }

    /// `item` 是便于阅读的课时路径，例如 "Physics / Unit 1 / Motion"
    pub fn record(&self, item: &str, kind: AssetKind, outcome: &AssetOutcome) {
        let mut stats = self.stats.lock().unwrap();
        match outcome {
            AssetOutcome::Saved => stats.saved += 1,
            AssetOutcome::Skipped => stats.skipped += 1,
            AssetOutcome::Unavailable => {
                stats.unavailable += 1;
                self.unavailable_assets
                    .lock()
                    .unwrap()
                    .push((item.to_string(), kind.label().to_string()));
            }
            AssetOutcome::Failed(reason) => {
                info!("记录失败: {} [{}] {}", item, kind, reason);
                stats.failed += 1;
                self.failed_downloads
                    .lock()
                    .unwrap()
                    .push((format!("{} [{}]", item, kind), reason.clone()));
            }
        }
    }

    pub fn get_stats(&self) -> DownloadStats {
        self.stats.lock().unwrap().clone()
    }

    pub fn did_all_succeed(&self) -> bool {
        self.stats.lock().unwrap().failed == 0
    }

    pub fn print_report(&self) {
        let stats = self.get_stats();
        let unavailable = self.unavailable_assets.lock().unwrap();
        let failed = self.failed_downloads.lock().unwrap();
        info!(
            "下载报告: Lessons={}, Saved={}, Skipped={}, Unavailable={}, Failed={}, DroppedDuplicates={}",
            stats.lessons,
            stats.saved,
            stats.skipped,
            stats.unavailable,
            stats.failed,
            stats.dropped_duplicates
        );

        if !unavailable.is_empty() || !failed.is_empty() {
            ui::print_sub_header("下载详情报告");
            if !unavailable.is_empty() {
                println!("\n{} 没有资源的课时 ({}项):", *symbols::WARN, stats.unavailable);
                print_grouped_report(&unavailable, |s| s.yellow());
            }
            if !failed.is_empty() {
                println!("\n{} 失败的资源 ({}项):", *symbols::ERROR, stats.failed);
                print_grouped_report(&failed, |s| s.red());
            }
        }
        ui::print_sub_header("任务总结");
        if stats.dropped_duplicates > 0 {
            println!(
                "{} 课程目录中有 {} 个同名课时被覆盖，未单独下载。",
                *symbols::WARN,
                stats.dropped_duplicates
            );
        }
        if stats.failed == 0 {
            println!(
                "{} 共处理 {} 个课时: {} 项已下载, {} 项已存在。",
                *symbols::OK,
                stats.lessons,
                stats.saved,
                stats.skipped
            );
        } else {
            let summary = format!(
                "{} | {} | {} | {}",
                format!("成功: {}", stats.saved).green(),
                format!("失败: {}", stats.failed).red(),
                format!("跳过: {}", stats.skipped).cyan(),
                format!("无资源: {}", stats.unavailable).yellow()
            );
            println!("{}", summary);
        }
    }
}

fn print_grouped_report(items: &[(String, String)], color_fn: fn(ColoredString) -> ColoredString) {
    let mut grouped: HashMap<&String, Vec<&String>> = HashMap::new();
    for (item, reason) in items {
        grouped.entry(reason).or_default().push(item);
    }
    let mut sorted_reasons: Vec<_> = grouped.keys().copied().collect();
    sorted_reasons.sort();
    for reason in sorted_reasons {
        println!("  - {}", color_fn(reason.as_str().into()));
        let mut names = grouped[reason].clone();
        names.sort();
        for name in names {
            println!("    - {}", name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcomes_are_counted_per_kind() {
        let manager = DownloadManager::new();
        manager.record_lesson();
        manager.record_dropped_duplicates(2);
        manager.record("Physics / Unit 1 / Motion", AssetKind::Presentation, &AssetOutcome::Saved);
        manager.record("Physics / Unit 1 / Motion", AssetKind::Video, &AssetOutcome::Skipped);
        manager.record(
            "Physics / Unit 1 / Motion",
            AssetKind::Playlist,
            &AssetOutcome::Unavailable,
        );
        assert!(manager.did_all_succeed());

        manager.record(
            "Physics / Unit 1 / Forces",
            AssetKind::Video,
            &AssetOutcome::Failed("disk full".into()),
        );
        assert_eq!(
            manager.get_stats(),
            DownloadStats {
                lessons: 1,
                saved: 1,
                skipped: 1,
                unavailable: 1,
                failed: 1,
                dropped_duplicates: 2,
            }
        );
        assert!(!manager.did_all_succeed());
    }
}
