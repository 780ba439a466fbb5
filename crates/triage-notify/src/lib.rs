//! Claim Triage Notifier Layer
//!
//! Implementations of the `Notifier` trait from `triage-domain`.
//!
//! # Notifiers
//!
//! - `HttpNotifier`: POSTs each alert as JSON to a mail/SNS relay endpoint
//! - `LogNotifier`: records alerts through `tracing` only
//! - `MockNotifier`: captures alerts in memory for tests
//!
//! # Examples
//!
//! ```
//! use triage_notify::MockNotifier;
//! use triage_domain::traits::Notifier;
//!
//! let notifier = MockNotifier::new();
//! notifier.send("subject", "body", "claims@example.com").unwrap();
//! assert_eq!(notifier.sent().len(), 1);
//! ```

#![warn(missing_docs)]

pub mod http;

use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::info;
use triage_domain::traits::Notifier;

pub use http::HttpNotifier;

/// Errors that can occur while delivering an alert
#[derive(Error, Debug)]
pub enum NotifyError {
    /// Network or relay communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// The relay refused the message
    #[error("Relay rejected alert: HTTP {status}: {body}")]
    Rejected {
        /// HTTP status returned by the relay
        status: u16,
        /// Response body, if any
        body: String,
    },

    /// Missing or invalid notifier configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("Notifier error: {0}")]
    Other(String),
}

/// An alert as handed to a notifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentAlert {
    /// Subject line
    pub subject: String,
    /// Message body
    pub body: String,
    /// Recipient address
    pub recipient: String,
}

/// Notifier that only logs alerts
///
/// Useful for dry runs and deployments without a relay.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    type Error = NotifyError;

    fn send(&self, subject: &str, body: &str, recipient: &str) -> Result<(), Self::Error> {
        info!(recipient, subject, body_len = body.len(), "Alert (log only)");
        Ok(())
    }
}

/// Mock notifier for deterministic testing
///
/// Clones share the captured alerts.
#[derive(Debug, Clone, Default)]
pub struct MockNotifier {
    sent: Arc<Mutex<Vec<SentAlert>>>,
    failure: Option<String>,
}

impl MockNotifier {
    /// Create a notifier that accepts every alert
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a notifier that records every alert but reports failure
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            failure: Some(message.into()),
        }
    }

    /// Alerts received so far
    pub fn sent(&self) -> Vec<SentAlert> {
        self.sent.lock().unwrap().clone()
    }
}

impl Notifier for MockNotifier {
    type Error = NotifyError;

    fn send(&self, subject: &str, body: &str, recipient: &str) -> Result<(), Self::Error> {
        self.sent.lock().unwrap().push(SentAlert {
            subject: subject.to_string(),
            body: body.to_string(),
            recipient: recipient.to_string(),
        });

        match &self.failure {
            Some(message) => Err(NotifyError::Other(message.clone())),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_notifier_captures() {
        let notifier = MockNotifier::new();
        notifier.send("s", "b", "r@example.com").unwrap();

        let sent = notifier.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].recipient, "r@example.com");
    }

    #[test]
    fn test_mock_notifier_failing_still_records() {
        let notifier = MockNotifier::failing("smtp down");
        let result = notifier.send("s", "b", "r@example.com");
        assert!(matches!(result, Err(NotifyError::Other(ref m)) if m == "smtp down"));
        assert_eq!(notifier.sent().len(), 1);
    }

    #[test]
    fn test_mock_notifier_clone_shares_state() {
        let notifier = MockNotifier::new();
        let clone = notifier.clone();
        clone.send("s", "b", "r").unwrap();
        assert_eq!(notifier.sent().len(), 1);
    }

    #[test]
    fn test_log_notifier_always_succeeds() {
        assert!(LogNotifier.send("s", "b", "r").is_ok());
    }
}
