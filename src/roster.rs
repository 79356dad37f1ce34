// Participant and tournament records, the storage-collaborator boundary, and
// the two snapshot sources the engine ships with: an in-memory store that
// derives aggregates from raw match results, and a CSV loader for
// pre-aggregated rosters. Records are validated here so the core never sees
// undefined-shaped data.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io;
use std::path::Path;

use crate::error::{Error, Result};
use crate::history::{self, MatchRecord};

/// Aggregate performance record for one tournament entrant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    pub id: u64,
    pub display_name: String,
    pub team_name: Option<String>,
    pub wins: u32,
    pub total_matches: u32,
    /// Mean of the player's own scored points, absent with no matches played.
    pub avg_score: Option<f64>,
}

impl Participant {
    pub fn new(
        id: u64,
        display_name: String,
        team_name: Option<String>,
        wins: u32,
        total_matches: u32,
        avg_score: Option<f64>,
    ) -> Self {
        Participant {
            id,
            display_name,
            team_name,
            wins,
            total_matches,
            avg_score,
        }
    }

    /// Reject malformed aggregates rather than silently clamping them.
    pub fn validate(&self) -> Result<()> {
        if self.display_name.trim().is_empty() {
            return Err(Error::Data(format!(
                "participant {} has an empty display name",
                self.id
            )));
        }
        if self.wins > self.total_matches {
            return Err(Error::Data(format!(
                "participant {} has {} wins out of {} matches",
                self.id, self.wins, self.total_matches
            )));
        }
        if let Some(avg) = self.avg_score {
            if !avg.is_finite() || avg < 0.0 {
                return Err(Error::Data(format!(
                    "participant {} has invalid average score {}",
                    self.id, avg
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    Upcoming,
    Active,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tournament {
    pub id: u64,
    pub title: String,
    pub game_type: String,
    pub status: TournamentStatus,
}

impl Tournament {
    pub fn new(id: u64, title: String, game_type: String, status: TournamentStatus) -> Self {
        Tournament {
            id,
            title,
            game_type,
            status,
        }
    }
}

/// Storage collaborator supplying tournament and participant snapshots.
///
/// Reads are assumed to happen-before the bracket computation; the engine
/// never writes back through this trait.
pub trait TournamentStore {
    fn fetch_tournament(&self, tournament_id: u64) -> Result<Option<Tournament>>;

    /// Participant aggregates for a tournament, ranked by wins then average
    /// score (descending). Seeding ties fall back to this order.
    fn fetch_participants(&self, tournament_id: u64) -> Result<Vec<Participant>>;

    fn tournaments(&self) -> Result<Vec<Tournament>>;
}

#[derive(Debug, Clone)]
struct Registration {
    player_id: u64,
    team_name: Option<String>,
}

/// In-memory storage collaborator. Holds raw match results and derives each
/// participant's aggregates from them on fetch, mirroring what a relational
/// store would compute with a grouped join.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tournaments: Vec<Tournament>,
    registrations: HashMap<u64, Vec<Registration>>,
    players: HashMap<u64, String>,
    matches: Vec<MatchRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_player(&mut self, id: u64, display_name: &str) {
        self.players.insert(id, display_name.to_string());
    }

    pub fn add_tournament(&mut self, tournament: Tournament) {
        self.tournaments.push(tournament);
    }

    pub fn register(
        &mut self,
        tournament_id: u64,
        player_id: u64,
        team_name: Option<&str>,
    ) -> Result<()> {
        if !self.tournaments.iter().any(|t| t.id == tournament_id) {
            return Err(Error::TournamentNotFound { id: tournament_id });
        }
        if !self.players.contains_key(&player_id) {
            return Err(Error::Data(format!("unknown player {player_id}")));
        }
        let regs = self.registrations.entry(tournament_id).or_default();
        if regs.iter().any(|r| r.player_id == player_id) {
            return Err(Error::Validation(format!(
                "player {player_id} is already registered for tournament {tournament_id}"
            )));
        }
        regs.push(Registration {
            player_id,
            team_name: team_name.map(str::to_string),
        });
        Ok(())
    }

    pub fn record_match(&mut self, record: MatchRecord) -> Result<()> {
        record.validate()?;
        for player_id in [record.player1_id, record.player2_id] {
            if !self.players.contains_key(&player_id) {
                return Err(Error::Data(format!(
                    "match {} references unknown player {player_id}",
                    record.match_id
                )));
            }
        }
        self.matches.push(record);
        Ok(())
    }
}

impl TournamentStore for MemoryStore {
    fn fetch_tournament(&self, tournament_id: u64) -> Result<Option<Tournament>> {
        Ok(self
            .tournaments
            .iter()
            .find(|t| t.id == tournament_id)
            .cloned())
    }

    fn fetch_participants(&self, tournament_id: u64) -> Result<Vec<Participant>> {
        let regs = match self.registrations.get(&tournament_id) {
            Some(regs) => regs,
            None => return Ok(Vec::new()),
        };

        let mut participants = Vec::with_capacity(regs.len());
        for reg in regs {
            let display_name = self
                .players
                .get(&reg.player_id)
                .cloned()
                .ok_or_else(|| Error::Data(format!("unknown player {}", reg.player_id)))?;
            let totals = history::totals_for(reg.player_id, &self.matches);
            participants.push(Participant::new(
                reg.player_id,
                display_name,
                reg.team_name.clone(),
                totals.wins,
                totals.total_matches,
                totals.avg_score,
            ));
        }

        // Rank by wins, then average score. sort_by is stable, so equal
        // records keep registration order.
        participants.sort_by(|a, b| {
            b.wins.cmp(&a.wins).then_with(|| {
                b.avg_score
                    .unwrap_or(0.0)
                    .partial_cmp(&a.avg_score.unwrap_or(0.0))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
        });
        Ok(participants)
    }

    fn tournaments(&self) -> Result<Vec<Tournament>> {
        Ok(self.tournaments.clone())
    }
}

/// Single-tournament snapshot source for pre-aggregated rosters, e.g. one
/// loaded from a CSV file.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    tournament: Tournament,
    participants: Vec<Participant>,
}

impl SnapshotStore {
    pub fn new(tournament: Tournament, participants: Vec<Participant>) -> Self {
        SnapshotStore {
            tournament,
            participants,
        }
    }
}

impl TournamentStore for SnapshotStore {
    fn fetch_tournament(&self, tournament_id: u64) -> Result<Option<Tournament>> {
        if self.tournament.id == tournament_id {
            Ok(Some(self.tournament.clone()))
        } else {
            Ok(None)
        }
    }

    fn fetch_participants(&self, tournament_id: u64) -> Result<Vec<Participant>> {
        if self.tournament.id == tournament_id {
            Ok(self.participants.clone())
        } else {
            Ok(Vec::new())
        }
    }

    fn tournaments(&self) -> Result<Vec<Tournament>> {
        Ok(vec![self.tournament.clone()])
    }
}

#[derive(Debug, Deserialize)]
struct RosterRow {
    id: u64,
    display_name: String,
    team_name: Option<String>,
    wins: u32,
    total_matches: u32,
    avg_score: Option<f64>,
}

/// Load a participant roster from a CSV file with columns
/// `id,display_name,team_name,wins,total_matches,avg_score`.
pub fn load_roster_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Participant>> {
    let rdr = csv::Reader::from_path(path)?;
    read_roster(rdr)
}

fn read_roster<R: io::Read>(mut rdr: csv::Reader<R>) -> Result<Vec<Participant>> {
    let mut participants = Vec::new();
    for row in rdr.deserialize() {
        let row: RosterRow = row?;
        let participant = Participant::new(
            row.id,
            row.display_name,
            row.team_name.filter(|t| !t.is_empty()),
            row.wins,
            row.total_matches,
            row.avg_score,
        );
        participant.validate()?;
        participants.push(participant);
    }
    if participants.is_empty() {
        return Err(Error::Validation("roster file has no participants".into()));
    }
    Ok(participants)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn player(id: u64, wins: u32, total: u32, avg: Option<f64>) -> Participant {
        Participant::new(id, format!("player-{id}"), None, wins, total, avg)
    }

    #[test]
    fn test_validate_rejects_excess_wins() {
        let p = player(1, 5, 3, None);
        assert!(matches!(p.validate(), Err(Error::Data(_))));
    }

    #[test]
    fn test_validate_rejects_negative_score() {
        let p = player(1, 2, 3, Some(-1.0));
        assert!(matches!(p.validate(), Err(Error::Data(_))));
    }

    #[test]
    fn test_validate_rejects_nan_score() {
        let p = player(1, 2, 3, Some(f64::NAN));
        assert!(matches!(p.validate(), Err(Error::Data(_))));
    }

    #[test]
    fn test_validate_rejects_blank_name() {
        let p = Participant::new(1, "  ".into(), None, 0, 0, None);
        assert!(matches!(p.validate(), Err(Error::Data(_))));
    }

    fn demo_store() -> MemoryStore {
        let mut store = MemoryStore::new();
        store.add_tournament(Tournament::new(
            1,
            "Spring Invitational".into(),
            "FPS".into(),
            TournamentStatus::Upcoming,
        ));
        for (id, name) in [(10, "ada"), (11, "grace"), (12, "linus")] {
            store.add_player(id, name);
            store.register(1, id, None).unwrap();
        }
        store
    }

    fn record(id: &str, p1: u64, p2: u64, s1: u32, s2: u32, winner: u64) -> MatchRecord {
        MatchRecord::new(
            id.to_string(),
            NaiveDate::from_ymd_opt(2025, 2, 10).unwrap(),
            p1,
            p2,
            s1,
            s2,
            winner,
        )
    }

    #[test]
    fn test_memory_store_aggregates_match_history() {
        let mut store = demo_store();
        store.record_match(record("m1", 10, 11, 16, 9, 10)).unwrap();
        store.record_match(record("m2", 10, 12, 8, 13, 12)).unwrap();
        store.record_match(record("m3", 11, 12, 7, 14, 12)).unwrap();

        let participants = store.fetch_participants(1).unwrap();
        // linus: 2 wins, ada: 1, grace: 0
        assert_eq!(participants[0].id, 12);
        assert_eq!(participants[0].wins, 2);
        assert_eq!(participants[0].total_matches, 2);
        assert_eq!(participants[0].avg_score, Some(13.5));

        assert_eq!(participants[1].id, 10);
        assert_eq!(participants[1].avg_score, Some(12.0));

        assert_eq!(participants[2].id, 11);
        assert_eq!(participants[2].wins, 0);
        assert_eq!(participants[2].avg_score, Some(8.0));
    }

    #[test]
    fn test_memory_store_unplayed_participants_keep_registration_order() {
        let store = demo_store();
        let participants = store.fetch_participants(1).unwrap();
        let ids: Vec<u64> = participants.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![10, 11, 12]);
        assert!(participants.iter().all(|p| p.avg_score.is_none()));
    }

    #[test]
    fn test_memory_store_rejects_duplicate_registration() {
        let mut store = demo_store();
        assert!(matches!(
            store.register(1, 10, None),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_memory_store_rejects_match_with_unknown_player() {
        let mut store = demo_store();
        let err = store.record_match(record("m1", 10, 99, 5, 5, 10));
        assert!(matches!(err, Err(Error::Data(_))));
    }

    #[test]
    fn test_read_roster_csv() {
        let data = "\
id,display_name,team_name,wins,total_matches,avg_score
1,ada,Alpha,8,10,21.5
2,grace,,0,0,
";
        let rdr = csv::Reader::from_reader(data.as_bytes());
        let roster = read_roster(rdr).unwrap();
        assert_eq!(roster.len(), 2);
        assert_eq!(roster[0].team_name.as_deref(), Some("Alpha"));
        assert_eq!(roster[0].avg_score, Some(21.5));
        assert_eq!(roster[1].team_name, None);
        assert_eq!(roster[1].avg_score, None);
    }

    #[test]
    fn test_read_roster_rejects_empty_file() {
        let rdr = csv::Reader::from_reader("id,display_name,team_name,wins,total_matches,avg_score\n".as_bytes());
        assert!(matches!(read_roster(rdr), Err(Error::Validation(_))));
    }
}
