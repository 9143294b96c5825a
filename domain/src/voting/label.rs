//! Presentation labelings of the vote scale
//!
//! Two labelings share the numeric scale: [`Confidence`] (six levels, used
//! when proposing a name) and [`Agreement`] (seven levels including "no
//! opinion", used when voting on someone else's naming).

use serde::{Deserialize, Serialize};

/// Confidence labels, strongest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Percent100,
    Percent80,
    Percent60,
    Percent40,
    Percent20,
    Percent0,
}

/// Agreement labels, "no opinion" first and then strongest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Agreement {
    NoOpinion,
    Percent100,
    Percent80,
    Percent60,
    Percent40,
    Percent20,
    Percent0,
}

impl Confidence {
    /// Menu order used by form builders
    pub const MENU: [Confidence; 6] = [
        Confidence::Percent100,
        Confidence::Percent80,
        Confidence::Percent60,
        Confidence::Percent40,
        Confidence::Percent20,
        Confidence::Percent0,
    ];

    pub fn value(self) -> f64 {
        match self {
            Confidence::Percent100 => 3.0,
            Confidence::Percent80 => 2.0,
            Confidence::Percent60 => 1.0,
            Confidence::Percent40 => -1.0,
            Confidence::Percent20 => -2.0,
            Confidence::Percent0 => -3.0,
        }
    }

    /// Stable key for translation tables
    pub fn key(self) -> &'static str {
        match self {
            Confidence::Percent100 => "vote_confidence_100",
            Confidence::Percent80 => "vote_confidence_80",
            Confidence::Percent60 => "vote_confidence_60",
            Confidence::Percent40 => "vote_confidence_40",
            Confidence::Percent20 => "vote_confidence_20",
            Confidence::Percent0 => "vote_confidence_0",
        }
    }

    /// Label of the level closest to `value`
    pub fn closest(value: f64) -> Self {
        closest_level(value, &Self::MENU, |c| c.value())
    }
}

impl Agreement {
    /// Menu order used by form builders
    pub const MENU: [Agreement; 7] = [
        Agreement::NoOpinion,
        Agreement::Percent100,
        Agreement::Percent80,
        Agreement::Percent60,
        Agreement::Percent40,
        Agreement::Percent20,
        Agreement::Percent0,
    ];

    pub fn value(self) -> f64 {
        match self {
            Agreement::NoOpinion => 0.0,
            Agreement::Percent100 => 3.0,
            Agreement::Percent80 => 2.0,
            Agreement::Percent60 => 1.0,
            Agreement::Percent40 => -1.0,
            Agreement::Percent20 => -2.0,
            Agreement::Percent0 => -3.0,
        }
    }

    /// Stable key for translation tables
    pub fn key(self) -> &'static str {
        match self {
            Agreement::NoOpinion => "vote_no_opinion",
            Agreement::Percent100 => "vote_agreement_100",
            Agreement::Percent80 => "vote_agreement_80",
            Agreement::Percent60 => "vote_agreement_60",
            Agreement::Percent40 => "vote_agreement_40",
            Agreement::Percent20 => "vote_agreement_20",
            Agreement::Percent0 => "vote_agreement_0",
        }
    }

    /// Label of the level closest to `value`
    pub fn closest(value: f64) -> Self {
        closest_level(value, &Self::MENU, |a| a.value())
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl std::fmt::Display for Agreement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Pick the level nearest to `value`.
///
/// Levels are walked from the negative end upward; we step to the next level
/// only while `value` lies strictly above the midpoint between the two, so an
/// exact midpoint resolves to the lower level.
fn closest_level<L: Copy>(value: f64, levels: &[L], scale: impl Fn(L) -> f64) -> L {
    let mut ascending = levels.to_vec();
    ascending.sort_by(|a, b| scale(*a).total_cmp(&scale(*b)));

    let mut current = ascending[0];
    for &next in &ascending[1..] {
        if value > (scale(current) + scale(next)) / 2.0 {
            current = next;
        } else {
            break;
        }
    }
    current
}
