//! Vote value space
//!
//! Votes live on a fixed seven-level scale, symmetric around a neutral
//! midpoint. Larger values indicate stronger agreement.

use crate::core::error::DomainError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static VOTE_VALUE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?\d+(\.\d+)?$").expect("vote value pattern is a valid literal")
});

/// One of the seven enumerated levels of the vote scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteLevel {
    /// Strongest disagreement (-3)
    Minimum,
    /// Least-negative strong vote (-2)
    MinNegative,
    /// Weak disagreement (-1)
    Average,
    /// No opinion (0)
    Neutral,
    /// Least-positive vote (+1)
    MinPositive,
    /// Next-to-best vote (+2)
    NextBest,
    /// Strongest agreement (+3)
    Maximum,
}

impl VoteLevel {
    /// All levels, from the negative end upward
    pub const ALL: [VoteLevel; 7] = [
        VoteLevel::Minimum,
        VoteLevel::MinNegative,
        VoteLevel::Average,
        VoteLevel::Neutral,
        VoteLevel::MinPositive,
        VoteLevel::NextBest,
        VoteLevel::Maximum,
    ];

    /// Scale value of this level
    pub fn value(self) -> f64 {
        match self {
            VoteLevel::Minimum => -3.0,
            VoteLevel::MinNegative => -2.0,
            VoteLevel::Average => -1.0,
            VoteLevel::Neutral => 0.0,
            VoteLevel::MinPositive => 1.0,
            VoteLevel::NextBest => 2.0,
            VoteLevel::Maximum => 3.0,
        }
    }

    /// Find the level with exactly this scale value
    pub fn from_value(value: f64) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.value() == value)
    }
}

/// A validated vote strength in `[-3, 3]`
///
/// # Example
///
/// ```
/// use sighting_domain::voting::VoteValue;
///
/// let vote = VoteValue::parse(Some("+2")).unwrap();
/// assert_eq!(vote.value(), 2.0);
/// assert!(VoteValue::parse(Some("4")).is_err());
/// assert!(VoteValue::parse(Some("lots")).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct VoteValue(f64);

impl VoteValue {
    pub const MINIMUM: VoteValue = VoteValue(-3.0);
    pub const MIN_NEGATIVE: VoteValue = VoteValue(-2.0);
    pub const AVERAGE: VoteValue = VoteValue(-1.0);
    pub const NEUTRAL: VoteValue = VoteValue(0.0);
    pub const MIN_POSITIVE: VoteValue = VoteValue(1.0);
    pub const NEXT_BEST: VoteValue = VoteValue(2.0);
    pub const MAXIMUM: VoteValue = VoteValue(3.0);

    /// Validate a numeric value against the scale bounds
    pub fn new(value: f64) -> Result<Self, DomainError> {
        if !value.is_finite() || value < Self::MINIMUM.0 || value > Self::MAXIMUM.0 {
            return Err(DomainError::OutOfRangeVoteValue(value));
        }
        Ok(Self(value))
    }

    /// Parse a raw submitted value (form field, API parameter, script entry)
    ///
    /// Accepts an optionally signed integer or decimal such as `3`, `-1`, `+2.5`.
    pub fn parse(raw: Option<&str>) -> Result<Self, DomainError> {
        let raw = raw.map(str::trim).filter(|s| !s.is_empty());
        let Some(raw) = raw else {
            return Err(DomainError::MissingVoteValue);
        };
        if !VOTE_VALUE_PATTERN.is_match(raw) {
            return Err(DomainError::InvalidVoteValue(raw.to_string()));
        }
        let value: f64 = raw
            .parse()
            .map_err(|_| DomainError::InvalidVoteValue(raw.to_string()))?;
        Self::new(value)
    }

    /// Raw scale value
    pub fn value(self) -> f64 {
        self.0
    }

    pub fn is_maximum(self) -> bool {
        self.0 == Self::MAXIMUM.0
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0.0
    }

    /// Exact enumerated level, if this value sits on one
    pub fn level(self) -> Option<VoteLevel> {
        VoteLevel::from_value(self.0)
    }
}

impl From<VoteLevel> for VoteValue {
    fn from(level: VoteLevel) -> Self {
        VoteValue(level.value())
    }
}

impl TryFrom<f64> for VoteValue {
    type Error = DomainError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<VoteValue> for f64 {
    fn from(value: VoteValue) -> Self {
        value.0
    }
}

impl std::fmt::Display for VoteValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A mutation a user submits against their vote on one naming
///
/// Deleting is an explicit command; casting [`VoteValue::NEUTRAL`] stores a
/// "no opinion" vote rather than removing the existing one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteCommand {
    Cast(VoteValue),
    Delete,
}

impl VoteCommand {
    /// Parse a raw value into a cast command
    pub fn cast(raw: Option<&str>) -> Result<Self, DomainError> {
        VoteValue::parse(raw).map(VoteCommand::Cast)
    }
}

impl From<VoteValue> for VoteCommand {
    fn from(value: VoteValue) -> Self {
        VoteCommand::Cast(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vote_value_pattern_compiles() {
        assert!(VOTE_VALUE_PATTERN.is_match("+2"));
        assert!(VOTE_VALUE_PATTERN.is_match("-1.5"));
        assert!(!VOTE_VALUE_PATTERN.is_match("2e1"));
    }

    #[test]
    fn test_parse_integers_and_decimals() {
        assert_eq!(VoteValue::parse(Some("3")).unwrap(), VoteValue::MAXIMUM);
        assert_eq!(VoteValue::parse(Some("-3")).unwrap(), VoteValue::MINIMUM);
        assert_eq!(VoteValue::parse(Some("+1")).unwrap(), VoteValue::MIN_POSITIVE);
        assert_eq!(VoteValue::parse(Some("1.5")).unwrap().value(), 1.5);
        assert_eq!(VoteValue::parse(Some(" 2 ")).unwrap(), VoteValue::NEXT_BEST);
    }

    #[test]
    fn test_parse_missing() {
        assert_eq!(VoteValue::parse(None), Err(DomainError::MissingVoteValue));
        assert_eq!(VoteValue::parse(Some("")), Err(DomainError::MissingVoteValue));
    }

    #[test]
    fn test_parse_not_a_number() {
        for raw in ["abc", "1.", ".5", "1e2", "NaN", "inf", "--1", "2,5"] {
            assert_eq!(
                VoteValue::parse(Some(raw)),
                Err(DomainError::InvalidVoteValue(raw.to_string())),
                "{raw} should be rejected as non-numeric"
            );
        }
    }

    #[test]
    fn test_parse_out_of_range() {
        assert_eq!(
            VoteValue::parse(Some("4")),
            Err(DomainError::OutOfRangeVoteValue(4.0))
        );
        assert_eq!(
            VoteValue::parse(Some("-3.01")),
            Err(DomainError::OutOfRangeVoteValue(-3.01))
        );
    }

    #[test]
    fn test_new_rejects_non_finite() {
        assert!(VoteValue::new(f64::NAN).is_err());
        assert!(VoteValue::new(f64::INFINITY).is_err());
    }

    #[test]
    fn test_levels_are_ordered_and_symmetric() {
        let values: Vec<f64> = VoteLevel::ALL.iter().map(|l| l.value()).collect();
        assert_eq!(values, vec![-3.0, -2.0, -1.0, 0.0, 1.0, 2.0, 3.0]);
        assert_eq!(VoteValue::from(VoteLevel::Maximum), VoteValue::MAXIMUM);
        assert_eq!(VoteValue::new(2.0).unwrap().level(), Some(VoteLevel::NextBest));
        assert_eq!(VoteValue::new(2.5).unwrap().level(), None);
    }

    #[test]
    fn test_deserialize_validates_range() {
        let ok: VoteValue = serde_json::from_str("2.0").unwrap();
        assert_eq!(ok, VoteValue::NEXT_BEST);
        assert!(serde_json::from_str::<VoteValue>("7.0").is_err());
    }

    #[test]
    fn test_cast_command() {
        assert_eq!(
            VoteCommand::cast(Some("0")).unwrap(),
            VoteCommand::Cast(VoteValue::NEUTRAL)
        );
        assert!(VoteCommand::cast(None).is_err());
    }
}
