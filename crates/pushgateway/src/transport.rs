//! Wire transport to the metrics gateway.
//!
//! [`GatewayTransport`] is the seam the push client talks through;
//! [`HttpGateway`] is the production implementation speaking the
//! Pushgateway HTTP API with [`reqwest`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;

use crate::error::{GatewayError, PushError};
use crate::exposition::CONTENT_TYPE;

#[async_trait]
pub trait GatewayTransport: Send + Sync {
    /// Replace the metric group for `job` with `body`.
    async fn send(&self, job: &str, body: String) -> Result<(), PushError>;
}

/// Job identifier under which a run's metrics are grouped.
pub fn job_name(model_name: &str) -> String {
    format!("ml-training-{model_name}")
}

#[derive(Debug)]
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl HttpGateway {
    /// Build a gateway client for `base_url`, e.g. `http://host:9091`.
    ///
    /// `timeout` bounds each request end to end.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, GatewayError> {
        let parsed = Url::parse(base_url).map_err(|e| GatewayError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        if parsed.cannot_be_a_base() || !matches!(parsed.scheme(), "http" | "https") {
            return Err(GatewayError::InvalidUrl {
                url: base_url.to_string(),
                reason: "expected an http or https URL".to_string(),
            });
        }

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: parsed,
            timeout,
        })
    }

    /// `{base}/metrics/job/{job}`, with the job name percent-encoded.
    pub fn job_url(&self, job: &str) -> Result<Url, PushError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| PushError::Unexpected("gateway URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(["metrics", "job", job]);
        Ok(url)
    }

    fn classify(&self, err: reqwest::Error) -> PushError {
        if err.is_timeout() {
            PushError::Timeout(self.timeout)
        } else if err.is_connect() {
            PushError::ConnectionRefused(err.to_string())
        } else {
            PushError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl GatewayTransport for HttpGateway {
    async fn send(&self, job: &str, body: String) -> Result<(), PushError> {
        let url = self.job_url(job)?;

        let response = self
            .client
            .put(url)
            .header(reqwest::header::CONTENT_TYPE, CONTENT_TYPE)
            .body(body)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let text = response.text().await.unwrap_or_default();
        Err(PushError::Transport(format!(
            "gateway returned {status}: {}",
            text.trim()
        )))
    }
}
