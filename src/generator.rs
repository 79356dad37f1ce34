// The orchestrator: validates the request, pulls a participant snapshot from
// the storage collaborator, and runs rating -> seeding -> bracket
// construction. Also exposes the two read-side helpers the API layer uses to
// drive the feature: eligible-tournament listing and seeding previews.

use rand::Rng;
use serde::Serialize;
use std::str::FromStr;
use tracing::{debug, info};

use crate::bracket::Bracket;
use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::roster::{Tournament, TournamentStatus, TournamentStore};
use crate::skill::{self, RcPlayer};

/// Bracket formats the engine can produce. Only single elimination is
/// implemented; unknown labels are rejected up front.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BracketType {
    #[default]
    SingleElimination,
}

impl FromStr for BracketType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "single_elimination" => Ok(BracketType::SingleElimination),
            other => Err(Error::Validation(format!(
                "unsupported bracket type: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentSummary {
    pub id: u64,
    pub title: String,
    pub game_type: String,
}

impl From<&Tournament> for TournamentSummary {
    fn from(t: &Tournament) -> Self {
        TournamentSummary {
            id: t.id,
            title: t.title.clone(),
            game_type: t.game_type.clone(),
        }
    }
}

/// A tournament open for bracket generation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibleTournament {
    pub id: u64,
    pub title: String,
    pub game_type: String,
    pub status: TournamentStatus,
    pub participant_count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BracketResponse {
    pub tournament: TournamentSummary,
    pub bracket: Bracket,
}

/// Bracket-generation entry point. Stateless apart from its configuration;
/// every call works on a fresh snapshot and an injected RNG, so concurrent
/// generations need no coordination.
#[derive(Debug, Clone, Default)]
pub struct BracketGenerator {
    config: EngineConfig,
}

impl BracketGenerator {
    pub fn new(config: EngineConfig) -> Self {
        BracketGenerator { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Generate a predicted bracket for a tournament.
    ///
    /// Fails with `TournamentNotFound` for an unknown id,
    /// `InsufficientParticipants` below the configured minimum, and `Data`
    /// for malformed participant records. Never returns a partial bracket.
    pub fn generate<S: TournamentStore>(
        &self,
        store: &S,
        tournament_id: u64,
        bracket_type: BracketType,
        rng: &mut impl Rng,
    ) -> Result<BracketResponse> {
        // Only one variant exists today; matching keeps future formats honest.
        let BracketType::SingleElimination = bracket_type;

        let tournament = store
            .fetch_tournament(tournament_id)?
            .ok_or(Error::TournamentNotFound { id: tournament_id })?;

        let participants = store.fetch_participants(tournament_id)?;
        for participant in &participants {
            participant.validate()?;
        }
        if participants.len() < self.config.min_participants {
            return Err(Error::InsufficientParticipants {
                found: participants.len(),
                required: self.config.min_participants,
            });
        }

        info!(
            tournament_id,
            title = %tournament.title,
            entrants = participants.len(),
            "generating bracket"
        );

        let seeded = skill::seed_players(&participants, &self.config);
        let bracket = Bracket::build(seeded, &tournament.game_type, &self.config, rng);
        debug!(rounds = bracket.rounds.len(), "bracket assembled");

        Ok(BracketResponse {
            tournament: TournamentSummary::from(&tournament),
            bracket,
        })
    }

    /// Tournaments currently open for bracket generation: upcoming or active,
    /// with at least the configured minimum of registered participants.
    pub fn eligible_tournaments<S: TournamentStore>(
        &self,
        store: &S,
    ) -> Result<Vec<EligibleTournament>> {
        let mut eligible = Vec::new();
        for tournament in store.tournaments()? {
            if tournament.status == TournamentStatus::Completed {
                continue;
            }
            let participant_count = store.fetch_participants(tournament.id)?.len();
            if participant_count < self.config.min_participants {
                continue;
            }
            eligible.push(EligibleTournament {
                id: tournament.id,
                title: tournament.title,
                game_type: tournament.game_type,
                status: tournament.status,
                participant_count,
            });
        }
        Ok(eligible)
    }

    /// Seeding preview: every participant rated and sorted into bracket
    /// order, without building a bracket.
    pub fn participant_ratings<S: TournamentStore>(
        &self,
        store: &S,
        tournament_id: u64,
    ) -> Result<Vec<RcPlayer>> {
        store
            .fetch_tournament(tournament_id)?
            .ok_or(Error::TournamentNotFound { id: tournament_id })?;
        let participants = store.fetch_participants(tournament_id)?;
        for participant in &participants {
            participant.validate()?;
        }
        Ok(skill::seed_players(&participants, &self.config))
    }
}
