//! Domain layer for sighting
//!
//! This crate contains the naming-consensus voting core: the vote value
//! space, the voter weight model, the per-naming vote ledger and aggregate,
//! and the observation consensus resolver. It has no dependencies on
//! infrastructure or presentation concerns and performs no I/O.
//!
//! # Core Concepts
//!
//! - **Naming**: a user's proposed name for an observation
//! - **Vote**: one user's strength-of-agreement rating on one naming
//! - **Aggregate cache**: per-naming weighted-mean vote score
//! - **Consensus**: the observation-level accepted name

pub mod catalog;
pub mod config;
pub mod core;
pub mod voting;

// Re-export commonly used types
pub use catalog::repository::{ObservationStore, StoreError};
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};
pub use core::{
    error::DomainError,
    ids::{NamingId, ObservationId, UserId},
    name::TaxonName,
};
pub use voting::{
    Agreement, CacheRefresh, Confidence, ConsensusChange, ConsensusOutcome, ContributionSource,
    LedgerChange, Naming, Observation, ValidatedVote, Vote, VoteChange, VoteCommand, VoteLevel,
    VoteRequest, VoteTable, VoteTableRow, VoteValue, user_weight, weight_of,
};
