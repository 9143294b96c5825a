//! Voter weight model
//!
//! A voter's influence grows with the base-10 logarithm of their contribution
//! score, and the observation's owner gets one extra unit on their own
//! observation.

use crate::core::ids::UserId;
use std::collections::HashMap;

/// Source of user contribution scores
///
/// Implemented by whatever holds user records. Returning `None` means the
/// user is unknown, which gives them no weight at all.
pub trait ContributionSource {
    fn contribution(&self, user: &UserId) -> Option<f64>;
}

impl ContributionSource for HashMap<UserId, f64> {
    fn contribution(&self, user: &UserId) -> Option<f64> {
        self.get(user).copied()
    }
}

/// Weight of one voter from their contribution and ownership
///
/// # Example
///
/// ```
/// use sighting_domain::voting::user_weight;
///
/// assert_eq!(user_weight(Some(100.0), false), 2.0);
/// assert_eq!(user_weight(Some(100.0), true), 3.0);
/// assert_eq!(user_weight(Some(0.5), false), 0.0);
/// assert_eq!(user_weight(None, true), 0.0);
/// ```
pub fn user_weight(contribution: Option<f64>, is_owner: bool) -> f64 {
    let Some(contribution) = contribution else {
        return 0.0;
    };
    let base = if contribution >= 1.0 {
        contribution.log10()
    } else {
        0.0
    };
    if is_owner { base + 1.0 } else { base }
}

/// Weight of `user` when voting on an observation owned by `owner`
pub fn weight_of(directory: &dyn ContributionSource, user: &UserId, owner: &UserId) -> f64 {
    user_weight(directory.contribution(user), user == owner)
}
