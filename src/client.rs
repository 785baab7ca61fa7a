// src/client.rs

use crate::{
    config::{AppConfig, RetryConfig},
    error::*,
};
use log::{debug, error, warn};
use reqwest::{IntoUrl, Response, StatusCode};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{
    RetryDecision, RetryPolicy, Retryable, RetryTransientMiddleware, RetryableStrategy,
};
use std::{
    sync::Arc,
    time::{Duration, SystemTime},
};

/// 固定间隔重试: 每次失败后等待相同的时间，总尝试次数 (含首次) 不超过 `max_attempts`。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedInterval {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl FixedInterval {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }
}

impl From<RetryConfig> for FixedInterval {
    fn from(config: RetryConfig) -> Self {
        Self::new(config.max_attempts, config.delay)
    }
}

impl RetryPolicy for FixedInterval {
    fn should_retry(&self, _request_start_time: SystemTime, n_past_retries: u32) -> RetryDecision {
        if n_past_retries + 1 < self.max_attempts {
            RetryDecision::Retry {
                execute_after: SystemTime::now() + self.delay,
            }
        } else {
            RetryDecision::DoNotRetry
        }
    }
}

/// 站点偶尔返回非 200 的响应，稍后重试通常就能恢复，因此除 200 以外的一切都视为可重试。
struct RetryUnlessOk;

impl RetryableStrategy for RetryUnlessOk {
    fn handle(
        &self,
        res: &Result<reqwest::Response, reqwest_middleware::Error>,
    ) -> Option<Retryable> {
        match res {
            Ok(response) if response.status() == StatusCode::OK => None,
            Ok(_) | Err(_) => Some(Retryable::Transient),
        }
    }
}

#[derive(Clone)]
pub struct RobustClient {
    pub client: ClientWithMiddleware,
}

impl RobustClient {
    pub fn new(config: Arc<AppConfig>) -> AppResult<Self> {
        Self::with_policy(config.clone(), FixedInterval::from(config.retry))
    }

    /// 使用指定的重试策略创建客户端；策略只需实现 `reqwest_retry::RetryPolicy`
    pub fn with_policy<P>(config: Arc<AppConfig>, policy: P) -> AppResult<Self>
    where
        P: RetryPolicy + Send + Sync + 'static,
    {
        let inner = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .pool_max_idle_per_host(config.max_workers * 3)
            .build()?;
        let client = ClientBuilder::new(inner)
            .with(RetryTransientMiddleware::new_with_policy_and_strategy(
                policy,
                RetryUnlessOk,
            ))
            .build();

        Ok(Self { client })
    }

    /// 发起 GET 请求。重试耗尽仍未得到 200 时返回 `None`，调用方据此放弃这一单元的工作。
    pub async fn fetch<T: IntoUrl>(&self, url: T) -> Option<Response> {
        let url = match url.into_url() {
            Ok(url) => url,
            Err(e) => {
                error!("无效的链接: {}", e);
                return None;
            }
        };
        debug!("GET {}", url);
        match self.client.get(url.clone()).send().await {
            Ok(res) if res.status() == StatusCode::OK => Some(res),
            Ok(res) => {
                error!("{} 重试耗尽后仍不可用 (状态码: {})", url, res.status());
                None
            }
            Err(e) => {
                error!("{} 重试耗尽后仍不可达: {}", url, e);
                None
            }
        }
    }

    pub async fn fetch_text<T: IntoUrl>(&self, url: T) -> Option<String> {
        let res = self.fetch(url).await?;
        let url = res.url().clone();
        match res.text().await {
            Ok(text) => Some(text),
            Err(e) => {
                warn!("读取 {} 的响应内容失败: {}", url, e);
                None
            }
        }
    }

    pub async fn fetch_bytes<T: IntoUrl>(&self, url: T) -> Option<Vec<u8>> {
        let res = self.fetch(url).await?;
        let url = res.url().clone();
        match res.bytes().await {
            Ok(bytes) => Some(bytes.to_vec()),
            Err(e) => {
                warn!("读取 {} 的响应内容失败: {}", url, e);
                None
            }
        }
    }
}
