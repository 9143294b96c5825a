//! Observation consensus resolution
//!
//! Picks the name the community currently accepts for an observation from the
//! cached scores of its namings.

use super::naming::Naming;
use crate::core::name::TaxonName;
use serde::{Deserialize, Serialize};

/// Scores closer than this are treated as tied
pub const SCORE_TIE_EPSILON: f64 = 1e-9;

/// Outcome of resolving an observation's consensus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ConsensusOutcome {
    /// A single name holds the strictly greatest positive score
    Agreed { name: TaxonName, score: f64 },
    /// Several names share the greatest score; the previous consensus is
    /// kept only if it is one of them
    Tied {
        names: Vec<TaxonName>,
        score: f64,
        retained: Option<TaxonName>,
    },
    /// No naming has a positive score
    NoCandidates,
}

impl ConsensusOutcome {
    /// The resulting consensus name, if any
    pub fn name(&self) -> Option<&TaxonName> {
        match self {
            ConsensusOutcome::Agreed { name, .. } => Some(name),
            ConsensusOutcome::Tied { retained, .. } => retained.as_ref(),
            ConsensusOutcome::NoCandidates => None,
        }
    }

    pub fn is_agreed(&self) -> bool {
        matches!(self, ConsensusOutcome::Agreed { .. })
    }

    pub fn is_tied(&self) -> bool {
        matches!(self, ConsensusOutcome::Tied { .. })
    }
}

impl std::fmt::Display for ConsensusOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConsensusOutcome::Agreed { name, score } => write!(f, "{} ({:.2})", name, score),
            ConsensusOutcome::Tied {
                names, retained, ..
            } => {
                let names: Vec<&str> = names.iter().map(|n| n.text()).collect();
                match retained {
                    Some(name) => write!(f, "tie [{}], keeping {}", names.join(", "), name),
                    None => write!(f, "tie [{}]", names.join(", ")),
                }
            }
            ConsensusOutcome::NoCandidates => write!(f, "no consensus"),
        }
    }
}

/// Resolve the consensus name from naming scores.
///
/// Only namings with a positive cached score are candidates. The candidate
/// with the strictly greatest score wins. Namings proposing the same name
/// never compete with each other. When distinct names tie at the top, the
/// `previous` consensus survives if it is among them; otherwise there is no
/// consensus. Resolution is a pure function of its inputs.
pub fn resolve<'a>(
    namings: impl IntoIterator<Item = &'a Naming>,
    previous: Option<&TaxonName>,
) -> ConsensusOutcome {
    let mut best_score = f64::NEG_INFINITY;
    let mut leaders: Vec<&TaxonName> = Vec::new();

    for naming in namings {
        let score = naming.vote_cache;
        if score.is_nan() || score <= 0.0 {
            continue;
        }
        if score > best_score + SCORE_TIE_EPSILON {
            best_score = score;
            leaders.clear();
            leaders.push(&naming.name);
        } else if (score - best_score).abs() <= SCORE_TIE_EPSILON {
            best_score = best_score.max(score);
            if !leaders.contains(&&naming.name) {
                leaders.push(&naming.name);
            }
        }
    }

    match leaders.as_slice() {
        [] => ConsensusOutcome::NoCandidates,
        [name] => ConsensusOutcome::Agreed {
            name: (*name).clone(),
            score: best_score,
        },
        tied => {
            let mut names: Vec<TaxonName> = tied.iter().map(|n| (*n).clone()).collect();
            names.sort();
            let retained = previous.filter(|p| names.contains(*p)).cloned();
            ConsensusOutcome::Tied {
                names,
                score: best_score,
                retained,
            }
        }
    }
}

/// Before/after view of an observation's consensus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusChange {
    pub previous: Option<TaxonName>,
    pub current: Option<TaxonName>,
}

impl ConsensusChange {
    pub fn unchanged(current: Option<TaxonName>) -> Self {
        Self {
            previous: current.clone(),
            current,
        }
    }

    pub fn changed(&self) -> bool {
        self.previous != self.current
    }
}
