// src/lib.rs

pub mod cli;
pub mod client;
pub mod config;
pub mod constants;
pub mod downloader;
pub mod error;
pub mod extractor;
pub mod logging;
pub mod models;
pub mod ui;
pub mod utils;

use crate::{
    cli::Cli,
    client::RobustClient,
    config::AppConfig,
    downloader::{DownloadManager, task_runner},
    error::{AppError, AppResult},
    extractor::catalog::CatalogExtractor,
    ui::symbols,
};
use colored::*;
use log::{debug, info, warn};
use std::{fs, sync::Arc};

/// 一次运行中所有课程共享的状态和工具
#[derive(Clone)]
pub struct DownloadJobContext {
    pub manager: DownloadManager,
    pub config: Arc<AppConfig>,
    pub http_client: Arc<RobustClient>,
    pub args: Arc<Cli>,
}

impl DownloadJobContext {
    pub fn new(args: Arc<Cli>, config: Arc<AppConfig>) -> AppResult<Self> {
        let http_client = Arc::new(RobustClient::new(config.clone())?);
        Ok(Self {
            manager: DownloadManager::new(),
            config,
            http_client,
            args,
        })
    }
}

/// 库的公共入口点，由 `main.rs` 调用
pub async fn run_from_cli(args: Arc<Cli>) -> AppResult<()> {
    debug!("CLI 参数: {:?}", args);
    let config = Arc::new(AppConfig::new(&args)?);
    debug!("加载的应用配置: {:?}", config);

    let context = DownloadJobContext::new(args, config)?;
    run_job(&context).await
}

/// 根据上下文完成一次完整的下载 (或 `--list-courses` 时只列出课程)
pub async fn run_job(context: &DownloadJobContext) -> AppResult<()> {
    let grade_url = context.config.grade_url(context.args.grade);
    let catalog = CatalogExtractor::new(context.http_client.clone());

    if context.args.list_courses {
        return list_courses(&catalog, &grade_url).await;
    }

    let output_dir = &context.config.output_dir;
    fs::create_dir_all(output_dir).map_err(|e| {
        AppError::UserInputError(format!("无法创建输出目录 '{}': {}", output_dir.display(), e))
    })?;
    let absolute_path = dunce::canonicalize(output_dir)?;
    info!("文件将保存到目录: \"{}\"", absolute_path.display());
    println!(
        "\n{} 文件将保存到目录: \"{}\"",
        *symbols::INFO,
        absolute_path.display()
    );

    let found = catalog.get_courses(&grade_url, &context.config.courses).await;
    // 按配置中的顺序处理，找不到的课程单独提示
    let mut courses = Vec::with_capacity(found.len());
    for name in &context.config.courses {
        match found.get(name) {
            Some(url) => courses.push((name.clone(), url.clone())),
            None => {
                warn!("年级页面 {} 中没有课程 '{}'", grade_url, name);
                ui::warn(&format!("未找到课程 '{}'", name));
            }
        }
    }
    if courses.is_empty() {
        ui::warn("没有找到任何需要下载的课程。");
        return Ok(());
    }

    ui::print_header(&format!("年级 {} - {} 门课程", context.args.grade, courses.len()));
    task_runner::execute_courses(context, courses).await;
    context.manager.print_report();
    Ok(())
}

async fn list_courses(catalog: &CatalogExtractor, grade_url: &str) -> AppResult<()> {
    let courses = catalog.list_courses(grade_url).await;
    if courses.is_empty() {
        return Err(AppError::UserInputError(format!(
            "无法从 {} 获取课程列表",
            grade_url
        )));
    }
    ui::print_header(&format!("{} 中的课程", grade_url));
    for (i, (name, url)) in courses.iter().enumerate() {
        println!("{:>3}. {} {}", i + 1, name.bold(), url.dimmed());
    }
    Ok(())
}
