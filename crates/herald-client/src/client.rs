// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the messages API.
//!
//! [`ApiClient`] handles authentication, locale, timeouts, and one retry on
//! transient statuses (429, 500, 503).

use std::fmt;
use std::time::Duration;

use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{RequestBuilder, Response, StatusCode};
use tracing::{debug, warn};

use herald_config::ApiConfig;
use herald_core::{HeraldError, Message, MessageId, MetricKind, decode_messages};

use crate::types::{ApiErrorResponse, MessagesEnvelope, MetricRequest};

/// Pause before retrying a transient failure.
const RETRY_DELAY: Duration = Duration::from_secs(1);

/// HTTP client for the messages backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    max_retries: u32,
}

impl ApiClient {
    /// Build a client from `[api]` configuration. `base_url` is required.
    pub fn new(config: &ApiConfig) -> Result<Self, HeraldError> {
        let base_url = config
            .base_url
            .as_deref()
            .ok_or_else(|| HeraldError::Config("api.base_url is not set".into()))?
            .trim_end_matches('/')
            .to_string();

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_str(&config.locale)
                .map_err(|e| HeraldError::Config(format!("invalid api.locale header value: {e}")))?,
        );
        if let Some(token) = &config.api_token {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| HeraldError::Config(format!("invalid api.api_token header value: {e}")))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| HeraldError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            max_retries: config.max_retries,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{endpoint}", self.base_url)
    }

    /// `GET {base}/messages`, decoded. Records that fail to decode are skipped.
    pub async fn fetch_messages(&self) -> Result<Vec<Message>, HeraldError> {
        let kind = Endpoint::Messages;
        let response = self
            .send_with_retry(kind, || self.client.get(self.url("messages")))
            .await?;

        let envelope: MessagesEnvelope = response
            .json()
            .await
            .map_err(|e| kind.error(format!("failed to parse messages response: {e}"), Some(e)))?;
        let total = envelope.body.len();
        let messages = decode_messages(envelope.body);
        debug!(total, decoded = messages.len(), "messages fetched");
        Ok(messages)
    }

    /// `POST {base}/metrics` for one message.
    pub async fn post_metric(&self, metric: MetricKind, message_id: MessageId) -> Result<(), HeraldError> {
        let body = MetricRequest::new(metric, message_id);
        self.send_with_retry(Endpoint::Metrics, || {
            self.client.post(self.url("metrics")).json(&body)
        })
        .await?;
        debug!(%metric, %message_id, "metric posted");
        Ok(())
    }

    async fn send_with_retry(
        &self,
        kind: Endpoint,
        build: impl Fn() -> RequestBuilder,
    ) -> Result<Response, HeraldError> {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, endpoint = %kind, "retrying request after transient error");
                tokio::time::sleep(RETRY_DELAY).await;
            }

            let response = build()
                .send()
                .await
                .map_err(|e| kind.error(format!("HTTP request failed: {e}"), Some(e)))?;

            let status = response.status();
            debug!(status = %status, attempt, endpoint = %kind, "response received");

            if status.is_success() {
                return Ok(response);
            }

            let body = response.text().await.unwrap_or_default();
            if is_transient_error(status) && attempt < self.max_retries {
                warn!(status = %status, body = %body, "transient error, will retry");
                last_error = Some(kind.error(format!("API returned {status}: {body}"), None));
                continue;
            }

            let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
                Ok(api_err) => format!("API error ({status}): {}", api_err.message),
                Err(_) => format!("API returned {status}: {body}"),
            };
            return Err(kind.error(message, None));
        }

        Err(last_error.unwrap_or_else(|| kind.error("request failed after retries".into(), None)))
    }
}

#[derive(Debug, Clone, Copy)]
enum Endpoint {
    Messages,
    Metrics,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Messages => "messages",
            Self::Metrics => "metrics",
        })
    }
}

impl Endpoint {
    fn error(self, message: String, source: Option<reqwest::Error>) -> HeraldError {
        let source = source.map(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>);
        match self {
            Self::Messages => HeraldError::Fetch { message, source },
            Self::Metrics => HeraldError::Metrics { message, source },
        }
    }
}

/// Statuses worth one more attempt.
fn is_transient_error(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::SERVICE_UNAVAILABLE
    )
}
