//! Webhook transport: the seam between the flow and the network.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::config::AssessmentConfig;
use crate::error::{ConfigError, SubmissionError};

/// How a request must be delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Tied to the caller; dropping the caller's future may abandon it.
    Standard,
    /// Must finish even if the caller goes away (page navigation right after).
    KeepAlive,
}

/// A JSON `POST` to a webhook.
#[derive(Debug, Clone)]
pub struct WebhookRequest {
    pub url: String,
    pub body: serde_json::Value,
    pub delivery: Delivery,
}

impl WebhookRequest {
    pub fn new(url: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            url: url.into(),
            body,
            delivery: Delivery::Standard,
        }
    }

    pub fn keep_alive(mut self) -> Self {
        self.delivery = Delivery::KeepAlive;
        self
    }
}

/// Transport used by `Submission`.
#[async_trait]
pub trait Webhook: Send + Sync {
    /// Send and wait for the response body. Non-2xx statuses are errors.
    async fn send(&self, request: WebhookRequest) -> Result<String, SubmissionError>;

    /// Queue a fire-and-forget delivery and return immediately.
    ///
    /// `Ok` means the beacon was handed off, not that it arrived.
    fn beacon(&self, url: &str, body: serde_json::Value) -> Result<(), SubmissionError>;
}

/// `reqwest`-backed webhook.
pub struct HttpWebhook {
    client: reqwest::Client,
}

impl HttpWebhook {
    pub fn new(config: &AssessmentConfig) -> Result<Self, ConfigError> {
        let mut headers = HeaderMap::new();
        for (name, value) in &config.extra_headers {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                ConfigError::InvalidValue {
                    key: "VISION_EXTRA_HEADERS".into(),
                    message: format!("bad header name {name:?}: {e}"),
                }
            })?;
            let value = HeaderValue::from_str(value).map_err(|e| ConfigError::InvalidValue {
                key: "VISION_EXTRA_HEADERS".into(),
                message: format!("bad header value for {name}: {e}"),
            })?;
            headers.insert(name, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ConfigError::InvalidValue {
                key: "http_client".into(),
                message: e.to_string(),
            })?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Webhook for HttpWebhook {
    async fn send(&self, request: WebhookRequest) -> Result<String, SubmissionError> {
        let WebhookRequest {
            url,
            body,
            delivery,
        } = request;

        match delivery {
            Delivery::Standard => post_json(&self.client, &url, &body).await,
            Delivery::KeepAlive => {
                // Detached so the request outlives a dropped caller.
                let client = self.client.clone();
                let task_url = url.clone();
                tokio::spawn(async move { post_json(&client, &task_url, &body).await })
                    .await
                    .map_err(|e| SubmissionError::RequestFailed {
                        url,
                        reason: format!("keep-alive task failed: {e}"),
                    })?
            }
        }
    }

    fn beacon(&self, url: &str, body: serde_json::Value) -> Result<(), SubmissionError> {
        let handle = tokio::runtime::Handle::try_current().map_err(|e| {
            SubmissionError::BeaconRejected {
                url: url.to_string(),
                reason: e.to_string(),
            }
        })?;

        let client = self.client.clone();
        let url = url.to_string();
        handle.spawn(async move {
            match post_json(&client, &url, &body).await {
                Ok(_) => tracing::debug!(url = %url, "Beacon delivered"),
                Err(e) => tracing::warn!("Beacon delivery failed: {}", e),
            }
        });
        Ok(())
    }
}

async fn post_json(
    client: &reqwest::Client,
    url: &str,
    body: &serde_json::Value,
) -> Result<String, SubmissionError> {
    let resp = client
        .post(url)
        .json(body)
        .send()
        .await
        .map_err(|e| SubmissionError::RequestFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let status = resp.status();
    if !status.is_success() {
        return Err(SubmissionError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    resp.text()
        .await
        .map_err(|e| SubmissionError::InvalidResponse {
            url: url.to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_defaults_to_standard_delivery() {
        let req = WebhookRequest::new("http://x", serde_json::json!({}));
        assert_eq!(req.delivery, Delivery::Standard);
        assert_eq!(req.keep_alive().delivery, Delivery::KeepAlive);
    }

    #[test]
    fn invalid_extra_header_is_config_error() {
        let config = AssessmentConfig {
            extra_headers: vec![("bad header".into(), "x".into())],
            ..AssessmentConfig::default()
        };
        assert!(matches!(
            HttpWebhook::new(&config),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn beacon_outside_runtime_is_rejected() {
        let webhook = HttpWebhook::new(&AssessmentConfig::default()).unwrap();
        let err = webhook
            .beacon("http://127.0.0.1:9/beacon", serde_json::json!({}))
            .unwrap_err();
        assert!(matches!(err, SubmissionError::BeaconRejected { .. }));
    }
}
