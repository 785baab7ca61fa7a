// tests/client_retry_test.rs

use nagwa_dl::client::{FixedInterval, RobustClient};
use nagwa_dl::config::AppConfig;
use std::sync::Arc;
use std::time::Duration;

fn test_client() -> RobustClient {
    // 默认测试配置: 最多 50 次尝试，间隔为 0
    let config = Arc::new(AppConfig::default());
    RobustClient::new(config).expect("Failed to create client")
}

#[tokio::test(flavor = "multi_thread")]
async fn test_fetch_succeeds_after_49_failures() {
    let mut server = mockito::Server::new_async().await;

    // 前 49 次返回 500，第 50 次返回 200
    let mock_500 = server
        .mock("GET", "/flaky")
        .with_status(500)
        .with_body("busy")
        .expect(49)
        .create_async()
        .await;
    let mock_200 = server
        .mock("GET", "/flaky")
        .with_status(200)
        .with_body("finally")
        .expect(1)
        .create_async()
        .await;

    let response = test_client()
        .fetch(format!("{}/flaky", server.url()))
        .await
        .expect("第 50 次请求应该成功");

    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "finally");
    mock_500.assert_async().await;
    mock_200.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_fetch_gives_up_after_exactly_50_attempts() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/down")
        .with_status(503)
        .expect(50)
        .create_async()
        .await;

    let response = test_client().fetch(format!("{}/down", server.url())).await;

    assert!(response.is_none());
    mock.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_non_200_success_codes_are_retried_too() {
    let mut server = mockito::Server::new_async().await;
    let mock_204 = server
        .mock("GET", "/empty")
        .with_status(204)
        .expect(2)
        .create_async()
        .await;
    let mock_200 = server
        .mock("GET", "/empty")
        .with_status(200)
        .with_body("ok")
        .create_async()
        .await;

    let text = test_client()
        .fetch_text(format!("{}/empty", server.url()))
        .await;

    assert_eq!(text.as_deref(), Some("ok"));
    mock_204.assert_async().await;
    mock_200.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_custom_policy_can_be_injected() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/down")
        .with_status(500)
        .expect(3)
        .create_async()
        .await;

    let config = Arc::new(AppConfig::default());
    let client = RobustClient::with_policy(config, FixedInterval::new(3, Duration::ZERO))
        .expect("Failed to create client");

    assert!(client.fetch_bytes(format!("{}/down", server.url())).await.is_none());
    mock.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_invalid_url_returns_none_without_request() {
    assert!(test_client().fetch("not a url").await.is_none());
}
