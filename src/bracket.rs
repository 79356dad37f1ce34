// Single-elimination bracket construction. The MatchUp struct models one
// slot (a pairing or a bye) with its predicted probabilities and sampled
// winner; the Bracket struct pairs off the seeded field round by round until
// a champion remains.

use rand::Rng;
use serde::Serialize;
use std::sync::Arc;

use crate::analysis;
use crate::config::EngineConfig;
use crate::skill::{round1_opt, RcPlayer};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchUp {
    pub player1: RcPlayer,
    pub player2: Option<RcPlayer>,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "round1_opt")]
    pub player1_win_prob: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "round1_opt")]
    pub player2_win_prob: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predicted_winner: Option<RcPlayer>,
    #[serde(skip_serializing_if = "is_false")]
    pub bye_round: bool,
    pub ai_analysis: String,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl MatchUp {
    /// Predict a head-to-head pairing: probability split from the skill-rating
    /// difference, winner sampled from it. The favorite is never modeled past
    /// the configured ceiling, so upsets stay on the table.
    pub fn predict(
        player1: RcPlayer,
        player2: RcPlayer,
        game_type: &str,
        config: &EngineConfig,
        rng: &mut impl Rng,
    ) -> MatchUp {
        let skill_diff = player1.skill_rating - player2.skill_rating;
        let base_prob = 50.0 + skill_diff * config.edge_per_skill_point;
        let player1_win_prob = base_prob.clamp(config.prob_floor, config.prob_ceiling);
        let player2_win_prob = 100.0 - player1_win_prob;

        let roll: f64 = rng.gen();
        let winner = if roll < player1_win_prob / 100.0 {
            Arc::clone(&player1)
        } else {
            Arc::clone(&player2)
        };
        let ai_analysis = analysis::match_analysis(&winner, game_type, rng);

        MatchUp {
            player1,
            player2: Some(player2),
            player1_win_prob: Some(player1_win_prob),
            player2_win_prob: Some(player2_win_prob),
            predicted_winner: Some(winner),
            bye_round: false,
            ai_analysis,
        }
    }

    /// An odd entrant out advances automatically.
    pub fn bye(player: RcPlayer) -> MatchUp {
        let ai_analysis = analysis::bye_analysis(&player);
        MatchUp {
            player1: player,
            player2: None,
            player1_win_prob: None,
            player2_win_prob: None,
            predicted_winner: None,
            bye_round: true,
            ai_analysis,
        }
    }

    /// The player moving on to the next round.
    pub fn advancer(&self) -> &RcPlayer {
        self.predicted_winner.as_ref().unwrap_or(&self.player1)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Round {
    pub round_number: u32,
    pub round_name: String,
    pub matches: Vec<MatchUp>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bracket {
    pub rounds: Vec<Round>,
    pub predicted_champion: Option<RcPlayer>,
}

/// Round label for the number of players still standing before pairing.
pub fn round_name(player_count: usize) -> String {
    if player_count <= 2 {
        "Finals".to_string()
    } else if player_count <= 4 {
        "Semi-Finals".to_string()
    } else if player_count <= 8 {
        "Quarter-Finals".to_string()
    } else if player_count <= 16 {
        "Round of 16".to_string()
    } else {
        format!("Round of {player_count}")
    }
}

impl Bracket {
    /// Build the full bracket from a seeded field. Consecutive entrants are
    /// paired in seeding order; an odd entrant out gets a bye. A field of one
    /// short-circuits to a bracket with no rounds and that player as champion.
    pub fn build(
        seeded: Vec<RcPlayer>,
        game_type: &str,
        config: &EngineConfig,
        rng: &mut impl Rng,
    ) -> Bracket {
        let mut rounds = Vec::new();
        let mut current = seeded;
        let mut round_number = 1u32;

        while current.len() > 1 {
            let name = round_name(current.len());
            let mut matches = Vec::with_capacity((current.len() + 1) / 2);
            let mut advancers = Vec::with_capacity((current.len() + 1) / 2);

            let mut entrants = current.into_iter();
            while let Some(player1) = entrants.next() {
                let node = match entrants.next() {
                    Some(player2) => MatchUp::predict(player1, player2, game_type, config, rng),
                    None => MatchUp::bye(player1),
                };
                advancers.push(Arc::clone(node.advancer()));
                matches.push(node);
            }

            rounds.push(Round {
                round_number,
                round_name: name,
                matches,
            });
            current = advancers;
            round_number += 1;
        }

        Bracket {
            rounds,
            predicted_champion: current.into_iter().next(),
        }
    }

    pub fn pretty_print(&self) {
        for round in &self.rounds {
            println!("{} (round {})", round.round_name, round.round_number);
            for node in &round.matches {
                match (&node.player2, &node.predicted_winner) {
                    (Some(player2), Some(winner)) => {
                        let winner_prob = if winner.id == node.player1.id {
                            node.player1_win_prob
                        } else {
                            node.player2_win_prob
                        };
                        println!(
                            "  {} vs {} -> {} ({:.1}%)",
                            node.player1.display_name,
                            player2.display_name,
                            winner.display_name,
                            winner_prob.unwrap_or(50.0),
                        );
                    }
                    _ => println!("  {} advances on a bye", node.player1.display_name),
                }
            }
            println!();
        }
        match &self.predicted_champion {
            Some(champion) => println!("Predicted champion: {}", champion.display_name),
            None => println!("No champion (empty field)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skill::SeededPlayer;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn entrant(id: u64, skill: f64) -> RcPlayer {
        Arc::new(SeededPlayer {
            id,
            display_name: format!("player-{id}"),
            team_name: None,
            wins: 0,
            total_matches: 0,
            win_rate: 50.0,
            avg_score: 0.0,
            skill_rating: skill,
        })
    }

    fn field(skills: &[f64]) -> Vec<RcPlayer> {
        skills
            .iter()
            .enumerate()
            .map(|(i, &s)| entrant(i as u64 + 1, s))
            .collect()
    }

    #[test]
    fn test_round_name_table() {
        assert_eq!(round_name(2), "Finals");
        assert_eq!(round_name(3), "Semi-Finals");
        assert_eq!(round_name(4), "Semi-Finals");
        assert_eq!(round_name(5), "Quarter-Finals");
        assert_eq!(round_name(8), "Quarter-Finals");
        assert_eq!(round_name(9), "Round of 16");
        assert_eq!(round_name(16), "Round of 16");
        assert_eq!(round_name(17), "Round of 17");
    }

    #[test]
    fn test_prediction_probabilities_sum_and_clamp() {
        let config = EngineConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        // 90 vs 40: raw edge would be 75%, right at the ceiling
        let node = MatchUp::predict(entrant(1, 90.0), entrant(2, 40.0), "FPS", &config, &mut rng);
        assert_eq!(node.player1_win_prob, Some(75.0));
        assert_eq!(node.player2_win_prob, Some(25.0));

        // 100 vs 0: far past the ceiling, still clamped
        let node = MatchUp::predict(entrant(3, 100.0), entrant(4, 0.0), "FPS", &config, &mut rng);
        assert_eq!(node.player1_win_prob, Some(75.0));

        // modest gap stays inside the band and sums to 100 exactly
        let node = MatchUp::predict(entrant(5, 62.0), entrant(6, 55.0), "FPS", &config, &mut rng);
        let p1 = node.player1_win_prob.unwrap();
        let p2 = node.player2_win_prob.unwrap();
        assert_eq!(p1, 53.5);
        assert_eq!(p1 + p2, 100.0);
        assert!((25.0..=75.0).contains(&p1));
    }

    #[test]
    fn test_prediction_winner_is_one_of_the_pair() {
        let config = EngineConfig::default();
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..50 {
            let node =
                MatchUp::predict(entrant(1, 70.0), entrant(2, 30.0), "MOBA", &config, &mut rng);
            let winner = node.predicted_winner.as_ref().unwrap();
            assert!(winner.id == 1 || winner.id == 2);
            assert!(!node.ai_analysis.is_empty());
        }
    }

    #[test]
    fn test_power_of_two_field_has_log2_rounds() {
        let config = EngineConfig::default();
        let mut rng = StdRng::seed_from_u64(3);
        let bracket = Bracket::build(
            field(&[90.0, 80.0, 70.0, 60.0, 50.0, 40.0, 30.0, 20.0]),
            "FPS",
            &config,
            &mut rng,
        );
        assert_eq!(bracket.rounds.len(), 3);
        assert_eq!(bracket.rounds[0].round_name, "Quarter-Finals");
        assert_eq!(bracket.rounds[1].round_name, "Semi-Finals");
        assert_eq!(bracket.rounds[2].round_name, "Finals");
        assert_eq!(bracket.rounds[0].matches.len(), 4);
        assert_eq!(bracket.rounds[1].matches.len(), 2);
        assert_eq!(bracket.rounds[2].matches.len(), 1);
        assert!(bracket.rounds.iter().all(|r| r
            .matches
            .iter()
            .all(|m| !m.bye_round)));
        assert!(bracket.predicted_champion.is_some());
    }

    #[test]
    fn test_odd_field_gets_one_bye_that_advances() {
        let config = EngineConfig::default();
        let mut rng = StdRng::seed_from_u64(4);
        let bracket = Bracket::build(
            field(&[90.0, 80.0, 70.0, 60.0, 50.0]),
            "FPS",
            &config,
            &mut rng,
        );

        let round1 = &bracket.rounds[0];
        assert_eq!(round1.matches.len(), 3);
        let byes: Vec<&MatchUp> = round1.matches.iter().filter(|m| m.bye_round).collect();
        assert_eq!(byes.len(), 1);
        let bye = byes[0];
        assert_eq!(bye.player1.id, 5);
        assert!(bye.player2.is_none());
        assert!(bye.player1_win_prob.is_none());
        assert!(bye.predicted_winner.is_none());
        assert_eq!(bye.ai_analysis, "player-5 advances automatically");

        // the bye recipient appears unchanged among round 2 entrants
        let round2_entrants: Vec<u64> = bracket.rounds[1]
            .matches
            .iter()
            .flat_map(|m| {
                std::iter::once(m.player1.id).chain(m.player2.as_ref().map(|p| p.id))
            })
            .collect();
        assert!(round2_entrants.contains(&5));
    }

    #[test]
    fn test_each_round_halves_the_field() {
        let config = EngineConfig::default();
        let mut rng = StdRng::seed_from_u64(11);
        let bracket = Bracket::build(
            field(&[90.0, 85.0, 80.0, 75.0, 70.0, 65.0, 60.0, 55.0, 50.0, 45.0, 40.0]),
            "Strategy",
            &config,
            &mut rng,
        );
        let mut remaining = 11usize;
        for round in &bracket.rounds {
            assert_eq!(round.matches.len(), (remaining + 1) / 2);
            assert_eq!(round.round_name, round_name(remaining));
            remaining = round.matches.len();
        }
        assert_eq!(remaining, 1);
    }

    #[test]
    fn test_single_entrant_short_circuits() {
        let config = EngineConfig::default();
        let mut rng = StdRng::seed_from_u64(5);
        let bracket = Bracket::build(field(&[66.0]), "FPS", &config, &mut rng);
        assert!(bracket.rounds.is_empty());
        assert_eq!(bracket.predicted_champion.as_ref().unwrap().id, 1);
    }

    #[test]
    fn test_empty_field_yields_no_champion() {
        let config = EngineConfig::default();
        let mut rng = StdRng::seed_from_u64(5);
        let bracket = Bracket::build(Vec::new(), "FPS", &config, &mut rng);
        assert!(bracket.rounds.is_empty());
        assert!(bracket.predicted_champion.is_none());
    }

    #[test]
    fn test_fixed_seed_reproduces_identical_bracket() {
        let config = EngineConfig::default();
        let players = field(&[90.0, 40.0, 60.0, 60.0, 55.0, 35.0]);
        let a = Bracket::build(players.clone(), "MOBA", &config, &mut StdRng::seed_from_u64(21));
        let b = Bracket::build(players, "MOBA", &config, &mut StdRng::seed_from_u64(21));
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_bye_node_serialization_shape() {
        let node = MatchUp::bye(entrant(9, 50.0));
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["byeRound"], true);
        assert!(json["player2"].is_null());
        assert!(json.get("player1WinProb").is_none());
        assert!(json.get("predictedWinner").is_none());

        let config = EngineConfig::default();
        let mut rng = StdRng::seed_from_u64(2);
        let played =
            MatchUp::predict(entrant(1, 60.0), entrant(2, 50.0), "FPS", &config, &mut rng);
        let json = serde_json::to_value(&played).unwrap();
        assert!(json.get("byeRound").is_none());
        assert_eq!(json["player1WinProb"], 55.0);
        assert_eq!(json["player2WinProb"], 45.0);
    }
}
