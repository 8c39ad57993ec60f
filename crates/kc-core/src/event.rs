//! Audit events for configuration sync.
//!
//! ## NIST 800-53 Rev5: AU-2 (Event Logging)
//!
//! Every committed (or verified) pass produces one structured event.
//!
//! ## NIST 800-53 Rev5: AU-3 (Content of Audit Records)
//!
//! All events include:
//! - Timestamp (ISO 8601)
//! - Event type
//! - Outcome (success/failure)
//! - Affected row count (for commits)
//! - Per-family change counts as details

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Event type categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    /// Staged configuration changes were committed.
    ConfigurationImported,
    /// A verify-only pass computed deltas and discarded them.
    ConfigurationVerified,
    /// Commit was skipped or failed.
    ConfigurationImportError,
}

/// Outcome of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventOutcome {
    /// Operation succeeded.
    Success,
    /// Operation failed.
    Failure,
}

/// An audit event for a configuration sync pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Unique event identifier.
    pub id: Uuid,

    /// Timestamp of the event (ISO 8601).
    pub timestamp: DateTime<Utc>,

    /// Type of event.
    pub event_type: EventType,

    /// Outcome of the event.
    pub outcome: EventOutcome,

    /// Configuration area the pass covered (e.g. "configuration", "identity").
    pub area: Option<String>,

    /// Rows written by the commit.
    pub affected_rows: Option<usize>,

    /// Error message (for failure events).
    pub error: Option<String>,

    /// Additional details as key-value pairs.
    pub details: Vec<(String, String)>,
}

impl Event {
    /// Creates a new event builder.
    #[must_use]
    pub const fn builder(event_type: EventType) -> EventBuilder {
        EventBuilder::new(event_type)
    }

    /// Writes the event to the `audit` tracing target.
    pub fn emit(&self) {
        let details = self
            .details
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(" ");

        match self.outcome {
            EventOutcome::Success => tracing::info!(
                target: "audit",
                event_id = %self.id,
                event_type = ?self.event_type,
                area = self.area.as_deref().unwrap_or("-"),
                affected_rows = self.affected_rows.unwrap_or(0),
                %details,
                "configuration sync event"
            ),
            EventOutcome::Failure => tracing::warn!(
                target: "audit",
                event_id = %self.id,
                event_type = ?self.event_type,
                area = self.area.as_deref().unwrap_or("-"),
                error = self.error.as_deref().unwrap_or("-"),
                %details,
                "configuration sync event"
            ),
        }
    }
}

/// Builder for creating events.
pub struct EventBuilder {
    event_type: EventType,
    outcome: EventOutcome,
    area: Option<String>,
    affected_rows: Option<usize>,
    error: Option<String>,
    details: Vec<(String, String)>,
}

impl EventBuilder {
    /// Creates a new event builder.
    #[must_use]
    pub const fn new(event_type: EventType) -> Self {
        Self {
            event_type,
            outcome: EventOutcome::Success,
            area: None,
            affected_rows: None,
            error: None,
            details: Vec::new(),
        }
    }

    /// Sets the outcome to success.
    #[must_use]
    pub const fn success(mut self) -> Self {
        self.outcome = EventOutcome::Success;
        self
    }

    /// Sets the outcome to failure with an error message.
    #[must_use]
    pub fn failure(mut self, error: impl Into<String>) -> Self {
        self.outcome = EventOutcome::Failure;
        self.error = Some(error.into());
        self
    }

    /// Sets the configuration area.
    #[must_use]
    pub fn area(mut self, area: impl Into<String>) -> Self {
        self.area = Some(area.into());
        self
    }

    /// Sets the affected row count.
    #[must_use]
    pub const fn affected_rows(mut self, rows: usize) -> Self {
        self.affected_rows = Some(rows);
        self
    }

    /// Adds a detail key-value pair.
    #[must_use]
    pub fn detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.push((key.into(), value.into()));
        self
    }

    /// Builds the event.
    #[must_use]
    pub fn build(self) -> Event {
        Event {
            id: Uuid::now_v7(),
            timestamp: Utc::now(),
            event_type: self.event_type,
            outcome: self.outcome,
            area: self.area,
            affected_rows: self.affected_rows,
            error: self.error,
            details: self.details,
        }
    }
}
