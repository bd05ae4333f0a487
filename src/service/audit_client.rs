//! Client for the remote audit service.
//!
//! One outbound `POST /generate-report` per scan. The external service is the
//! dominant latency source and failure point, so the client carries an
//! explicit timeout and retries once on transport errors - never on HTTP
//! error statuses.

use anyhow::Context;
use reqwest::Client;
use serde_json::json;
use tracing::{debug, warn};

use crate::config::Config;
use crate::domain::models::AuditPayload;
use crate::error::{AppError, Result};

/// How much of an unstructured error body is surfaced in the error message.
const ERROR_BODY_PREVIEW_CHARS: usize = 200;

pub struct AuditClient {
    http: Client,
    base_url: String,
    retry_on_network_error: bool,
}

impl AuditClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .context("Failed to build audit service HTTP client")?;

        Ok(Self {
            http,
            base_url: config.audit_base_url.trim_end_matches('/').to_string(),
            retry_on_network_error: config.retry_on_network_error,
        })
    }

    /// Request a fresh audit for `url` and deserialize the payload.
    pub async fn generate_report(&self, url: &str) -> Result<AuditPayload> {
        let endpoint = format!("{}/generate-report", self.base_url);
        let body = json!({ "url": url });

        let response = match self.http.post(&endpoint).json(&body).send().await {
            Ok(response) => response,
            Err(e) if self.retry_on_network_error => {
                warn!(error = %e, %url, "audit request failed, retrying once");
                self.http
                    .post(&endpoint)
                    .json(&body)
                    .send()
                    .await
                    .map_err(|e| AppError::Network(e.to_string()))?
            }
            Err(e) => return Err(AppError::Network(e.to_string())),
        };

        let status = response.status();
        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            let detail = extract_detail(&raw);
            return Err(AppError::AuditService {
                status: status.as_u16(),
                detail,
            });
        }

        let payload = response
            .json::<AuditPayload>()
            .await
            .map_err(|e| AppError::Network(format!("Invalid audit payload: {e}")))?;

        debug!(%url, "audit payload received");
        Ok(payload)
    }
}

/// Prefer the server's `{"detail": ...}` field; fall back to a truncated raw body.
fn extract_detail(raw: &str) -> String {
    serde_json::from_str::<serde_json::Value>(raw)
        .ok()
        .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(str::to_string))
        .unwrap_or_else(|| raw.chars().take(ERROR_BODY_PREVIEW_CHARS).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn client_for(server: &mockito::ServerGuard) -> AuditClient {
        AuditClient::new(&Config::new(server.url())).unwrap()
    }

    #[tokio::test]
    async fn generate_report_deserializes_success_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/generate-report")
            .match_body(mockito::Matcher::Json(json!({"url": "https://example.com"})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"title_tag": "Example", "uses_https": true}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let payload = client.generate_report("https://example.com").await.unwrap();

        assert_eq!(payload.title_tag.as_deref(), Some("Example"));
        assert!(payload.uses_https);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_2xx_surfaces_server_detail() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/generate-report")
            .with_status(422)
            .with_body(r#"{"detail": "URL could not be crawled"}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client.generate_report("https://example.com").await.unwrap_err();

        match err {
            AppError::AuditService { status, detail } => {
                assert_eq!(status, 422);
                assert_eq!(detail, "URL could not be crawled");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn non_2xx_without_detail_truncates_raw_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/generate-report")
            .with_status(500)
            .with_body("x".repeat(1000))
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client.generate_report("https://example.com").await.unwrap_err();

        match err {
            AppError::AuditService { status, detail } => {
                assert_eq!(status, 500);
                assert_eq!(detail.chars().count(), ERROR_BODY_PREVIEW_CHARS);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn http_error_status_is_not_retried() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/generate-report")
            .with_status(503)
            .with_body("{}")
            .expect(1)
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client.generate_report("https://example.com").await.unwrap_err();

        assert!(matches!(err, AppError::AuditService { status: 503, .. }));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn unreachable_service_is_a_network_error_after_retry() {
        // Bind a throwaway port and release it so the connection is refused.
        // (Dropping a mockito ServerGuard returns the server to a pool and
        // leaves it listening, so it cannot simulate an unreachable host.)
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let client = AuditClient::new(&Config::new(url)).unwrap();
        let err = client.generate_report("https://example.com").await.unwrap_err();

        assert!(matches!(err, AppError::Network(_)), "got {err}");
    }
}
