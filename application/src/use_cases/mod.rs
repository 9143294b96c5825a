//! Use cases
//!
//! Application-level operations that orchestrate domain logic. Each one
//! wraps a single domain mutation in a per-observation transaction.

pub mod cast_vote;
pub mod manage_naming;
pub mod record_sighting;
pub mod refresh_vote_caches;
pub mod shared;
