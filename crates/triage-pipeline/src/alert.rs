//! Priority-gated alert dispatch

use std::sync::Arc;
use tracing::{debug, info, warn};
use triage_domain::traits::Notifier;
use triage_domain::ClaimRecord;

/// Priorities (lowercased) that trigger an alert
pub const ALERT_PRIORITIES: [&str; 2] = ["critical", "high"];

/// What the alert stage did for one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertOutcome {
    /// Priority did not qualify
    NotRequired,

    /// Priority qualified but alerts are disabled
    Suppressed,

    /// The notifier accepted the alert
    Sent,

    /// The notifier failed; no retry is attempted
    Failed(String),
}

impl AlertOutcome {
    /// Whether the notifier was called
    pub fn attempted(&self) -> bool {
        matches!(self, AlertOutcome::Sent | AlertOutcome::Failed(_))
    }

    /// Whether delivery failed
    pub fn is_failure(&self) -> bool {
        matches!(self, AlertOutcome::Failed(_))
    }
}

/// Whether a priority value triggers an alert
///
/// Exact match after lowercasing: no trimming, no synonyms.
pub fn requires_alert(priority: &str) -> bool {
    let priority = priority.to_lowercase();
    ALERT_PRIORITIES.contains(&priority.as_str())
}

/// Subject line for a record's alert
pub fn alert_subject(record: &ClaimRecord) -> String {
    format!("High Priority Claim Alert - {}", record.claim_id)
}

/// Body text for a record's alert
pub fn alert_body(record: &ClaimRecord) -> String {
    let lines: Vec<String> = record
        .labeled_values()
        .into_iter()
        .map(|(label, value)| format!("{}: {}", label, value))
        .collect();

    format!(
        "Claim {} requires immediate attention.\n\nSummary:\n\n{}",
        record.claim_id,
        lines.join("\n")
    )
}

/// Sends alerts for high-priority records to a fixed recipient
pub struct AlertDispatcher<N> {
    notifier: Arc<N>,
    recipient: String,
    enabled: bool,
}

impl<N> Clone for AlertDispatcher<N> {
    fn clone(&self) -> Self {
        Self {
            notifier: Arc::clone(&self.notifier),
            recipient: self.recipient.clone(),
            enabled: self.enabled,
        }
    }
}

impl<N> AlertDispatcher<N>
where
    N: Notifier,
    N::Error: std::fmt::Display,
{
    /// Create an enabled dispatcher
    pub fn new(notifier: Arc<N>, recipient: impl Into<String>) -> Self {
        Self {
            notifier,
            recipient: recipient.into(),
            enabled: true,
        }
    }

    /// Enable or disable delivery
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Notify if the record's priority qualifies
    pub fn maybe_notify(&self, record: &ClaimRecord) -> AlertOutcome {
        if !requires_alert(&record.priority) {
            debug!(
                "Priority '{}' for claim {} does not require an alert",
                record.priority, record.claim_id
            );
            return AlertOutcome::NotRequired;
        }

        if !self.enabled {
            info!("Alert for claim {} suppressed (alerts disabled)", record.claim_id);
            return AlertOutcome::Suppressed;
        }

        let subject = alert_subject(record);
        let body = alert_body(record);

        match self.notifier.send(&subject, &body, &self.recipient) {
            Ok(()) => {
                info!("Alert sent for claim {} to {}", record.claim_id, self.recipient);
                AlertOutcome::Sent
            }
            Err(e) => {
                warn!("Alert for claim {} failed: {}", record.claim_id, e);
                AlertOutcome::Failed(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use triage_notify::MockNotifier;

    fn record(priority: &str) -> ClaimRecord {
        let mut record = ClaimRecord::empty(
            "CLAIM99",
            Utc.with_ymd_and_hms(2025, 7, 4, 10, 0, 0).unwrap(),
        );
        record.priority = priority.to_string();
        record.summary = "Hospitalization after highway collision.".to_string();
        record
    }

    #[test]
    fn test_priority_gate() {
        assert!(requires_alert("High"));
        assert!(requires_alert("CRITICAL"));
        assert!(!requires_alert("low"));
        assert!(!requires_alert(""));
        assert!(!requires_alert("Urgent"));
        assert!(!requires_alert(" High"));
    }

    #[test]
    fn test_sends_for_high_priority() {
        let notifier = Arc::new(MockNotifier::new());
        let dispatcher = AlertDispatcher::new(Arc::clone(&notifier), "claims@example.com");

        let outcome = dispatcher.maybe_notify(&record("High"));
        assert_eq!(outcome, AlertOutcome::Sent);
        assert!(outcome.attempted());

        let sent = notifier.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "High Priority Claim Alert - CLAIM99");
        assert_eq!(sent[0].recipient, "claims@example.com");
        assert!(sent[0]
            .body
            .starts_with("Claim CLAIM99 requires immediate attention.\n\nSummary:\n\nClaim ID: CLAIM99\n"));
        assert!(sent[0].body.contains("Priority: High"));
    }

    #[test]
    fn test_no_alert_for_low_priority() {
        let notifier = Arc::new(MockNotifier::new());
        let dispatcher = AlertDispatcher::new(Arc::clone(&notifier), "claims@example.com");

        assert_eq!(dispatcher.maybe_notify(&record("low")), AlertOutcome::NotRequired);
        assert_eq!(dispatcher.maybe_notify(&record("")), AlertOutcome::NotRequired);
        assert!(notifier.sent().is_empty());
    }

    #[test]
    fn test_failure_is_reported() {
        let notifier = Arc::new(MockNotifier::failing("relay down"));
        let dispatcher = AlertDispatcher::new(notifier, "claims@example.com");

        let outcome = dispatcher.maybe_notify(&record("Critical"));
        assert!(outcome.is_failure());
        assert!(matches!(outcome, AlertOutcome::Failed(ref m) if m.contains("relay down")));
    }

    #[test]
    fn test_disabled_dispatcher_suppresses() {
        let notifier = Arc::new(MockNotifier::new());
        let dispatcher =
            AlertDispatcher::new(Arc::clone(&notifier), "claims@example.com").with_enabled(false);

        assert_eq!(dispatcher.maybe_notify(&record("High")), AlertOutcome::Suppressed);
        assert!(notifier.sent().is_empty());
    }
}
