//! HTTP relay notifier
//!
//! Delivers alerts by POSTing `{"subject", "body", "recipient"}` as JSON to
//! a relay endpoint (an SNS/email bridge, a webhook, or a mail API gateway).
//! Delivery is attempted once; the pipeline does not retry alerts.

use crate::NotifyError;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;
use triage_domain::traits::Notifier;

/// Default timeout for relay requests (15 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Notifier backed by an HTTP relay
pub struct HttpNotifier {
    endpoint: String,
    bearer_token: Option<String>,
    client: reqwest::blocking::Client,
}

#[derive(Serialize)]
struct AlertPayload<'a> {
    subject: &'a str,
    body: &'a str,
    recipient: &'a str,
}

impl HttpNotifier {
    /// Create a notifier posting to `endpoint`
    pub fn new(endpoint: impl Into<String>) -> Result<Self, NotifyError> {
        let endpoint = endpoint.into();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(NotifyError::Config(format!(
                "relay endpoint must be an http(s) URL: '{}'",
                endpoint
            )));
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| NotifyError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            endpoint,
            bearer_token: None,
            client,
        })
    }

    /// Authenticate to the relay with a bearer token
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// The relay endpoint
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Notifier for HttpNotifier {
    type Error = NotifyError;

    fn send(&self, subject: &str, body: &str, recipient: &str) -> Result<(), Self::Error> {
        let payload = AlertPayload {
            subject,
            body,
            recipient,
        };

        let mut request = self.client.post(&self.endpoint).json(&payload);
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }

        debug!("Posting alert for {} to {}", recipient, self.endpoint);
        let response = request
            .send()
            .map_err(|e| NotifyError::Communication(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}
