// src/logging.rs

use crate::constants;
use fern::colors::{Color, ColoredLevelConfig};
use log::{LevelFilter, info};
use std::{env, path::PathBuf};

fn log_file_path() -> PathBuf {
    match dirs::home_dir() {
        Some(home) => home
            .join(constants::CONFIG_DIR_NAME)
            .join(constants::LOG_FILE_NAME),
        None => {
            eprintln!("警告: 无法获取用户主目录，日志将写入临时目录。");
            env::temp_dir()
                .join(clap::crate_name!())
                .join(constants::LOG_FILE_NAME)
        }
    }
}

/// 文件中记录 `level` 及以上的日志，终端只显示警告和错误
pub fn init(level: LevelFilter) {
    let log_file_path = log_file_path();
    if let Some(dir) = log_file_path.parent()
        && let Err(e) = std::fs::create_dir_all(dir)
    {
        eprintln!("警告: 无法创建日志目录 {:?}: {}", dir, e);
    }

    let file_appender = match fern::log_file(&log_file_path) {
        Ok(file) => Some(file),
        Err(e) => {
            eprintln!(
                "警告: 无法打开日志文件 {:?}: {}。将尝试使用备用日志文件。",
                log_file_path, e
            );
            let fallback_path = env::temp_dir().join(format!(
                "{}-{}",
                clap::crate_name!(),
                constants::LOG_FALLBACK_FILE_NAME
            ));
            match fern::log_file(&fallback_path) {
                Ok(file) => Some(file),
                Err(e_fb) => {
                    eprintln!(
                        "错误: 备用日志文件 {:?} 也无法创建: {}。日志不会写入文件。",
                        fallback_path, e_fb
                    );
                    None
                }
            }
        }
    };

    let file_dispatch = fern::Dispatch::new()
        .level(level)
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}] [{:<5}] [{}:{}] - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                record.line().unwrap_or(0),
                message
            ))
        });

    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Cyan)
        .debug(Color::White);
    let console_dispatch = fern::Dispatch::new()
        .level(LevelFilter::Warn.min(level))
        .format(move |out, message, record| {
            out.finish(format_args!("[{}] {}", colors.color(record.level()), message))
        })
        .chain(std::io::stderr());

    let mut root = fern::Dispatch::new().chain(console_dispatch);
    if let Some(file) = file_appender {
        root = root.chain(file_dispatch.chain(file));
    }
    if let Err(e) = root.apply() {
        eprintln!("警告: 日志系统初始化失败: {}", e);
        return;
    }
    info!("----- {} {} 启动 -----", clap::crate_name!(), clap::crate_version!());
}
