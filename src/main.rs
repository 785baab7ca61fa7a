// src/main.rs

use clap::{CommandFactory, FromArgMatches};
use colored::*;
use nagwa_dl::{cli::Cli, logging, run_from_cli, ui};
use std::{env, sync::Arc, time::Duration};

#[tokio::main]
async fn main() {
    // 为 Windows 终端启用 ANSI 颜色支持
    #[cfg(windows)]
    {
        colored::control::set_virtual_terminal(true).ok();
    }
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!("\n{} 用户强制中断程序。", "[!]".yellow());
            tokio::time::sleep(Duration::from_millis(100)).await;
            std::process::exit(130);
        }
    });

    let bin_name = env::var("CARGO_BIN_NAME").unwrap_or_else(|_| "nagwa-dl".to_string());

    let after_help = format!(
        "示例:\n  # 下载 11 年级配置文件中列出的全部课程\n  {bin} -g 11\n\n  # 只下载物理和化学，保存到 ./nagwa\n  {bin} -g 11 -c Physics -c Chemistry -o nagwa\n\n  # 查看年级页面上有哪些课程\n  {bin} -g 11 --list-courses\n\n  # 只要视频，不要演示文稿和题目视频\n  {bin} -g 11 --skip presentation --skip playlist",
        bin = bin_name
    );

    let cmd = Cli::command().after_help(after_help);
    let args = match Cli::from_arg_matches(&cmd.get_matches()) {
        Ok(args) => Arc::new(args),
        Err(e) => e.exit(),
    };

    logging::init(args.log_level.into());

    if let Err(e) = run_from_cli(args).await {
        eprintln!();
        ui::error(&format!("程序执行出错: {}", e));
        std::process::exit(1);
    }
}
