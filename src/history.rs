// This module defines the raw match-result records supplied by the storage
// collaborator and the aggregation that turns them into per-player totals.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Result of a single recorded match between two players.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecord {
    pub match_id: String,
    pub played_at: NaiveDate,
    pub player1_id: u64,
    pub player2_id: u64,
    pub score_player1: u32,
    pub score_player2: u32,
    pub winner_id: u64,
}

impl MatchRecord {
    pub fn new(
        match_id: String,
        played_at: NaiveDate,
        player1_id: u64,
        player2_id: u64,
        score_player1: u32,
        score_player2: u32,
        winner_id: u64,
    ) -> Self {
        MatchRecord {
            match_id,
            played_at,
            player1_id,
            player2_id,
            score_player1,
            score_player2,
            winner_id,
        }
    }

    /// Returns true if the given player took part in this match.
    pub fn involves(&self, player_id: u64) -> bool {
        self.player1_id == player_id || self.player2_id == player_id
    }

    /// Returns the given player's own score in this match, if they played.
    pub fn score_for(&self, player_id: u64) -> Option<u32> {
        if player_id == self.player1_id {
            Some(self.score_player1)
        } else if player_id == self.player2_id {
            Some(self.score_player2)
        } else {
            None
        }
    }

    /// Returns the losing player's id.
    pub fn loser_id(&self) -> u64 {
        if self.winner_id == self.player1_id {
            self.player2_id
        } else {
            self.player1_id
        }
    }

    /// The winner must be one of the two listed players.
    pub fn validate(&self) -> Result<()> {
        if self.player1_id == self.player2_id {
            return Err(Error::Data(format!(
                "match {} lists player {} on both sides",
                self.match_id, self.player1_id
            )));
        }
        if !self.involves(self.winner_id) {
            return Err(Error::Data(format!(
                "match {} names winner {} who did not play in it",
                self.match_id, self.winner_id
            )));
        }
        Ok(())
    }
}

/// Aggregate record derived from a player's match history.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerTotals {
    pub wins: u32,
    pub total_matches: u32,
    /// Mean of the player's own scores, or None with no matches on record.
    pub avg_score: Option<f64>,
}

/// Fold a player's match history into win/total/average-score totals.
pub fn totals_for(player_id: u64, records: &[MatchRecord]) -> PlayerTotals {
    let mut wins = 0u32;
    let mut total_matches = 0u32;
    let mut score_sum = 0u64;

    for record in records.iter().filter(|r| r.involves(player_id)) {
        total_matches += 1;
        if record.winner_id == player_id {
            wins += 1;
        }
        // involves() held above, so score_for is always Some here
        score_sum += u64::from(record.score_for(player_id).unwrap_or(0));
    }

    let avg_score = if total_matches > 0 {
        Some(score_sum as f64 / f64::from(total_matches))
    } else {
        None
    };

    PlayerTotals {
        wins,
        total_matches,
        avg_score,
    }
}
