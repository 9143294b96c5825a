//! Naming-consensus voting
//!
//! The voting core decides, for each observation, which proposed name the
//! community currently accepts.
//!
//! # Flow
//!
//! ```text
//! cast / change / delete vote
//!         │
//!         ▼
//! ┌──────────────────┐   max vote?   ┌─────────────────────────────┐
//! │  Vote ledger     │──────────────▶│ downgrade user's other +3s  │
//! │  (naming, user)  │               └─────────────────────────────┘
//! └────────┬─────────┘
//!          ▼
//! ┌──────────────────┐  Σ(v·w) / (Σw + 1)
//! │ Naming aggregate │───────────────────
//! └────────┬─────────┘
//!          ▼
//! ┌──────────────────┐  greatest positive score, ties keep previous
//! │ Consensus        │───────────────────────────────────────────────
//! └──────────────────┘
//! ```
//!
//! Weights come from [`weight::user_weight`]: `log10(contribution)` for
//! contributions of at least one, plus one for the observation's owner.

pub mod consensus;
pub mod label;
pub mod naming;
pub mod observation;
pub mod value;
pub mod vote;
pub mod weight;

// Re-export main types
pub use consensus::{ConsensusChange, ConsensusOutcome, SCORE_TIE_EPSILON, resolve};
pub use label::{Agreement, Confidence};
pub use naming::{Naming, VoteTable, VoteTableRow};
pub use observation::{CacheRefresh, LedgerChange, Observation, VoteChange};
pub use value::{VoteCommand, VoteLevel, VoteValue};
pub use vote::{ValidatedVote, Vote, VoteRequest};
pub use weight::{ContributionSource, user_weight, weight_of};
