//! Progress notification port
//!
//! Defines the interface for reporting progress during a bulk cache refresh.

use sighting_domain::ObservationId;

/// Callback for progress updates during a refresh run
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (progress bar, log lines, etc.)
pub trait ProgressNotifier: Send + Sync {
    /// Called once with the number of observations to process
    fn on_start(&self, total: usize);

    /// Called when one observation has been processed
    fn on_observation_complete(&self, id: &ObservationId, success: bool);

    /// Called when the run completes
    fn on_complete(&self);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_start(&self, _total: usize) {}
    fn on_observation_complete(&self, _id: &ObservationId, _success: bool) {}
    fn on_complete(&self) {}
}
