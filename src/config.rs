// src/config.rs

pub mod file;

use self::file::load_or_create_external_config;
use crate::{cli::Cli, constants, error::AppResult};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NetworkConfig {
    pub user_agent: Option<String>,
    pub connect_timeout_secs: Option<u64>,
    pub timeout_secs: Option<u64>,
    pub max_attempts: Option<u32>,
    pub retry_delay_secs: Option<u64>,
    pub accept_invalid_certs: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub grade_url_template: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            grade_url_template: constants::GRADE_URL_TEMPLATE.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PresentationFileConfig {
    pub scale: Option<f32>,
    pub resolution_dpi: Option<f32>,
    pub jpeg_quality: Option<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalConfig {
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub presentation: PresentationFileConfig,
    #[serde(default)]
    pub courses: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_workers: Option<usize>,
}

impl ExternalConfig {
    pub(crate) fn default_app_config() -> Self {
        // 为 NetworkConfig 提供一组默认值: 固定 3 秒间隔，最多 50 次尝试
        let network_config = NetworkConfig {
            user_agent: Some(constants::USER_AGENT.into()),
            connect_timeout_secs: Some(10),
            timeout_secs: Some(300), // 视频文件较大，给足下载时间
            max_attempts: Some(constants::retry::MAX_ATTEMPTS),
            retry_delay_secs: Some(constants::retry::DELAY_SECS),
            accept_invalid_certs: Some(false),
        };

        Self {
            network: network_config,
            site: SiteConfig::default(),
            presentation: PresentationFileConfig {
                scale: Some(constants::presentation::SCALE),
                resolution_dpi: Some(constants::presentation::RESOLUTION_DPI),
                jpeg_quality: Some(constants::presentation::JPEG_QUALITY),
            },
            courses: constants::DEFAULT_COURSES.iter().map(|s| s.to_string()).collect(),
            max_workers: Some(constants::DEFAULT_MAX_WORKERS),
        }
    }
}

/// 固定间隔重试的参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub delay: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PresentationConfig {
    /// 光栅化时的放大倍数
    pub scale: f32,
    /// 写入 PDF 时每英寸像素数，决定页面尺寸
    pub resolution_dpi: f32,
    pub jpeg_quality: u8,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub max_workers: usize,
    pub user_agent: String,
    pub connect_timeout: Duration,
    pub timeout: Duration,
    pub retry: RetryConfig,
    pub accept_invalid_certs: bool,
    pub grade_url_template: String,
    pub courses: Vec<String>,
    pub output_dir: PathBuf,
    pub presentation: PresentationConfig,
}

impl AppConfig {
    pub fn new(args: &Cli) -> AppResult<Self> {
        let external_config = load_or_create_external_config()?;
        Ok(Self::from_parts(args, external_config))
    }

    /// 合并命令行参数和配置文件，命令行参数优先
    pub fn from_parts(args: &Cli, external_config: ExternalConfig) -> Self {
        let network = external_config.network;
        let presentation = external_config.presentation;

        let courses = if args.courses.is_empty() {
            external_config.courses
        } else {
            args.courses.clone()
        };

        Self {
            max_workers: args
                .workers
                .or(external_config.max_workers)
                .unwrap_or(constants::DEFAULT_MAX_WORKERS)
                .max(1),
            user_agent: network.user_agent.unwrap_or_else(|| constants::USER_AGENT.into()),
            connect_timeout: Duration::from_secs(network.connect_timeout_secs.unwrap_or(10)),
            timeout: Duration::from_secs(network.timeout_secs.unwrap_or(300)),
            retry: RetryConfig {
                max_attempts: network
                    .max_attempts
                    .unwrap_or(constants::retry::MAX_ATTEMPTS)
                    .max(1),
                delay: Duration::from_secs(
                    network.retry_delay_secs.unwrap_or(constants::retry::DELAY_SECS),
                ),
            },
            accept_invalid_certs: network.accept_invalid_certs.unwrap_or(false),
            grade_url_template: external_config.site.grade_url_template,
            courses,
            output_dir: args.output.clone(),
            presentation: PresentationConfig {
                scale: presentation.scale.unwrap_or(constants::presentation::SCALE),
                resolution_dpi: presentation
                    .resolution_dpi
                    .unwrap_or(constants::presentation::RESOLUTION_DPI),
                jpeg_quality: presentation
                    .jpeg_quality
                    .unwrap_or(constants::presentation::JPEG_QUALITY),
            },
        }
    }

    pub fn grade_url(&self, grade: u32) -> String {
        self.grade_url_template.replace("{grade}", &grade.to_string())
    }
}

#[cfg(feature = "testing")]
impl Default for AppConfig {
    fn default() -> Self {
        Self {
            max_workers: 2,
            user_agent: "test-agent/1.0".to_string(),
            connect_timeout: Duration::from_secs(5),
            timeout: Duration::from_secs(15),
            retry: RetryConfig {
                max_attempts: constants::retry::MAX_ATTEMPTS,
                delay: Duration::ZERO,
            },
            accept_invalid_certs: false,
            grade_url_template: constants::GRADE_URL_TEMPLATE.to_string(),
            courses: vec!["Physics".to_string()],
            output_dir: PathBuf::from(constants::DEFAULT_SAVE_DIR),
            presentation: PresentationConfig {
                scale: 1.0,
                resolution_dpi: constants::presentation::RESOLUTION_DPI,
                jpeg_quality: constants::presentation::JPEG_QUALITY,
            },
        }
    }
}
