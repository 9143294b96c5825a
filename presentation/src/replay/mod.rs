//! Scenario replay
//!
//! Reads a JSON script of naming and voting actions and applies it through
//! the application use cases.

pub mod runner;
pub mod script;

pub use runner::{ReplayError, ReplayReport, ReplayRunner, StepOutcome, StepResult};
pub use script::{
    RawVote, ReplayAction, ReplayScript, ScriptError, ScriptObservation, ScriptUser,
};
