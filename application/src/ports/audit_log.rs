//! Port for the structured vote audit log.
//!
//! Defines the [`VoteAuditLog`] trait for recording every applied ledger
//! mutation (votes cast, changed, deleted, favorites downgraded, namings
//! proposed/renamed/removed, consensus changes) to a structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures the full
//! mutation history in a machine-readable format (JSONL).

use serde_json::Value;

/// A structured audit event.
///
/// Each event has a type string and a JSON payload containing
/// event-specific fields. The adapter adds the timestamp.
#[derive(Debug, Clone)]
pub struct AuditEvent {
    /// Event type identifier (e.g., "vote_cast", "consensus_changed").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl AuditEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging audit events.
///
/// The `log` method is synchronous and non-fallible: the mutation it
/// describes has already been committed, and a logging failure must not
/// turn a committed vote into a reported error.
pub trait VoteAuditLog: Send + Sync {
    /// Record an audit event.
    fn log(&self, event: AuditEvent);
}

/// No-op implementation for tests and when auditing is disabled.
pub struct NoAuditLog;

impl VoteAuditLog for NoAuditLog {
    fn log(&self, _event: AuditEvent) {}
}
