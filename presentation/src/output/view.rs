//! Display models for observations after a replay
//!
//! Views resolve everything a report needs (weights, favorites, gates) up
//! front, so formatters only lay out text.

use serde::Serialize;
use sighting_domain::{
    Agreement, Confidence, ConsensusOutcome, ContributionSource, Naming, NamingId, Observation,
    ObservationId, TaxonName, UserId, Vote, VoteTable, VoteValue,
};

/// One vote with its labels and favorite flag
#[derive(Debug, Clone, Serialize)]
pub struct VoteView {
    pub user: UserId,
    pub value: VoteValue,
    pub confidence: Confidence,
    pub agreement: Agreement,
    /// The vote is its caster's highest positive vote on this observation
    pub favorite: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct NamingView {
    pub id: NamingId,
    pub name: TaxonName,
    pub author: UserId,
    pub score: f64,
    pub percent: f64,
    pub vote_sum: f64,
    pub consensus: bool,
    pub owner_favorite: bool,
    pub editable: bool,
    pub deletable: bool,
    pub votes: Vec<VoteView>,
    pub table: VoteTable,
}

#[derive(Debug, Clone, Serialize)]
pub struct ObservationView {
    pub id: ObservationId,
    pub owner: UserId,
    pub consensus: Option<TaxonName>,
    pub outcome: ConsensusOutcome,
    pub namings: Vec<NamingView>,
}

impl ObservationView {
    pub fn new(observation: &Observation, directory: &dyn ContributionSource) -> Self {
        let namings = observation
            .namings
            .iter()
            .map(|naming| Self::naming_view(observation, naming, directory))
            .collect();
        Self {
            id: observation.id.clone(),
            owner: observation.owner.clone(),
            consensus: observation.consensus.clone(),
            outcome: observation.resolve(),
            namings,
        }
    }

    fn naming_view(
        observation: &Observation,
        naming: &Naming,
        directory: &dyn ContributionSource,
    ) -> NamingView {
        NamingView {
            id: naming.id.clone(),
            name: naming.name.clone(),
            author: naming.author.clone(),
            score: naming.vote_cache,
            percent: naming.vote_percent(),
            vote_sum: naming.vote_sum(),
            consensus: observation.is_consensus(naming),
            owner_favorite: observation.is_owners_favorite(naming),
            editable: naming.editable(),
            deletable: observation.deletable(naming),
            votes: naming
                .votes
                .iter()
                .map(|vote| Self::vote_view(observation, vote))
                .collect(),
            table: naming.vote_table(directory, &observation.owner),
        }
    }

    fn vote_view(observation: &Observation, vote: &Vote) -> VoteView {
        VoteView {
            user: vote.user_id.clone(),
            value: vote.value,
            confidence: vote.confidence(),
            agreement: vote.agreement(),
            favorite: observation.is_favorite_vote(vote),
        }
    }
}

/// Build views for a set of observations, in the order given
pub fn observation_views(
    observations: &[Observation],
    directory: &dyn ContributionSource,
) -> Vec<ObservationView> {
    observations
        .iter()
        .map(|obs| ObservationView::new(obs, directory))
        .collect()
}
