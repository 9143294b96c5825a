//! Application layer for sighting
//!
//! This crate contains use cases and port definitions.
//! It depends only on the domain layer.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    audit_log::{AuditEvent, NoAuditLog, VoteAuditLog},
    clock::{Clock, FixedClock, SystemClock},
    progress::{NoProgress, ProgressNotifier},
};
pub use use_cases::cast_vote::CastVoteUseCase;
pub use use_cases::manage_naming::{ManageNamingUseCase, ProposeNamingInput};
pub use use_cases::record_sighting::{
    RecordSightingInput, RecordSightingUseCase, RecordedSighting,
};
pub use use_cases::refresh_vote_caches::{RefreshReport, RefreshVoteCachesUseCase};
pub use use_cases::shared::{ObservationLocks, VotingContext, VotingError};
