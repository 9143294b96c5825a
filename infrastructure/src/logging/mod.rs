//! Logging infrastructure: the structured vote audit trail.
//!
//! Provides [`JsonlVoteAuditLog`], a JSONL file writer implementing the
//! [`VoteAuditLog`](sighting_application::VoteAuditLog) port.

mod jsonl_audit_log;

pub use jsonl_audit_log::JsonlVoteAuditLog;
