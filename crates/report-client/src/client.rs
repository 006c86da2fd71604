use std::future::Future;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client as HttpClient;
use serde::Serialize;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::retry::RetryPolicy;
use crate::types::ScanEnvelope;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for one submission endpoint. The configured URL is taken as the
/// complete submit target; only the scheme and trailing slash are normalized.
#[derive(Debug, Clone)]
pub struct ReportClient {
    endpoint_url: String,
    api_key: Option<String>,
    bearer_token: Option<String>,
    retry: RetryPolicy,
    http: HttpClient,
}

impl ReportClient {
    pub fn new(server_url: &str) -> Result<Self> {
        Self::with_timeout(server_url, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(server_url: &str, timeout: Duration) -> Result<Self> {
        let endpoint_url = normalize_endpoint(server_url)?;
        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("failed building HTTP client")?;

        Ok(Self {
            endpoint_url,
            api_key: None,
            bearer_token: None,
            retry: RetryPolicy::default(),
            http,
        })
    }

    pub fn set_api_key(&mut self, api_key: Option<String>) {
        self.api_key = api_key;
    }

    pub fn set_bearer_token(&mut self, bearer_token: Option<String>) {
        self.bearer_token = bearer_token;
    }

    pub fn set_retry_policy(&mut self, retry: RetryPolicy) {
        self.retry = retry;
    }

    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    pub async fn submit_scan(&self, envelope: &ScanEnvelope) -> Result<()> {
        let body =
            serde_json::to_value(envelope).context("failed serializing scan report payload")?;

        self.with_retry("submit_scan", || {
            let body = body.clone();
            async move { self.post_scan_request(&body).await }
        })
        .await?;

        info!(session = %envelope.session_id, endpoint = %self.endpoint_url, "submitted scan report");
        Ok(())
    }

    async fn post_scan_request<T: Serialize + ?Sized>(&self, payload: &T) -> Result<()> {
        let mut request = self.http.post(&self.endpoint_url).json(payload);
        if let Some(api_key) = &self.api_key {
            request = request.header("apikey", api_key);
        }
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("failed sending scan report to {}", self.endpoint_url))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        anyhow::bail!(
            "scan report rejected by {}: {} {}",
            self.endpoint_url,
            status,
            body.trim()
        )
    }

    async fn with_retry<T, F, Fut>(&self, operation_name: &'static str, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 1u32;
        loop {
            match op().await {
                Ok(result) => return Ok(result),
                Err(err) => {
                    if attempt >= self.retry.max_attempts {
                        return Err(err).with_context(|| {
                            format!(
                                "operation {} failed after {} attempts",
                                operation_name, attempt
                            )
                        });
                    }

                    let delay = self.retry.next_delay(attempt.saturating_sub(1));
                    warn!(
                        operation = operation_name,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "submission failed, retrying"
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

fn normalize_endpoint(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        anyhow::bail!("server URL cannot be empty");
    }

    let with_scheme = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };
    Ok(with_scheme.trim_end_matches('/').to_string())
}
