// This module turns raw win/loss aggregates into bounded skill ratings and
// produces the seeding order for bracket construction.
//
// The rating is deliberately simple: win rate (as a percentage) plus the
// player's average scored points, capped into [0, 100]. Players with no match
// history get a neutral 50% win rate so newcomers seed mid-pack instead of
// last.

use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::sync::Arc;

use crate::config::EngineConfig;
use crate::roster::Participant;

/// Atomically reference-counted player so bracket rounds can share entrants
/// without cloning; Arc rather than Rc because odds batches run on rayon.
pub type RcPlayer = Arc<SeededPlayer>;

/// A participant with their derived rating, ready for seeding.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeededPlayer {
    pub id: u64,
    pub display_name: String,
    pub team_name: Option<String>,
    pub wins: u32,
    pub total_matches: u32,
    #[serde(serialize_with = "round1")]
    pub win_rate: f64,
    #[serde(serialize_with = "round1")]
    pub avg_score: f64,
    #[serde(serialize_with = "round1")]
    pub skill_rating: f64,
}

impl PartialEq for SeededPlayer {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

/// Win percentage over recorded matches, or the unranked prior for players
/// with no history.
pub fn win_rate(wins: u32, total_matches: u32, config: &EngineConfig) -> f64 {
    if total_matches == 0 {
        config.unranked_win_rate
    } else {
        f64::from(wins) / f64::from(total_matches) * 100.0
    }
}

/// Skill rating: win rate plus average score, clamped into
/// [0, skill_ceiling]. A missing average contributes nothing.
pub fn skill_rating(win_rate: f64, avg_score: Option<f64>, config: &EngineConfig) -> f64 {
    (win_rate + avg_score.unwrap_or(0.0)).clamp(0.0, config.skill_ceiling)
}

/// Rate a single participant.
pub fn rate(participant: &Participant, config: &EngineConfig) -> SeededPlayer {
    let win_rate = win_rate(participant.wins, participant.total_matches, config);
    let skill_rating = skill_rating(win_rate, participant.avg_score, config);
    SeededPlayer {
        id: participant.id,
        display_name: participant.display_name.clone(),
        team_name: participant.team_name.clone(),
        wins: participant.wins,
        total_matches: participant.total_matches,
        win_rate,
        avg_score: participant.avg_score.unwrap_or(0.0),
        skill_rating,
    }
}

/// Rate every participant and sort descending by skill. The sort is stable,
/// so rating ties keep the order the store returned (wins, then average
/// score, then registration order).
pub fn seed_players(participants: &[Participant], config: &EngineConfig) -> Vec<RcPlayer> {
    let mut players: Vec<RcPlayer> = participants
        .iter()
        .map(|p| Arc::new(rate(p, config)))
        .collect();
    players.sort_by(|a, b| {
        b.skill_rating
            .partial_cmp(&a.skill_rating)
            .unwrap_or(Ordering::Equal)
    });
    players
}

pub(crate) fn round1<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64((value * 10.0).round() / 10.0)
}

pub(crate) fn round1_opt<S: Serializer>(
    value: &Option<f64>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) => serializer.serialize_f64((v * 10.0).round() / 10.0),
        None => serializer.serialize_none(),
    }
}
