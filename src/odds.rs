// Champion-odds estimation by repeated bracket generation. A single bracket
// is one sampled scenario; running a batch of independent generations over
// the same seeded field and tallying the champions approximates each
// entrant's title chances. Iterations run in parallel, each with its own RNG
// derived from the master seed, so a batch is reproducible end to end.

use fnv::FnvHashMap;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use crate::bracket::Bracket;
use crate::config::EngineConfig;
use crate::skill::RcPlayer;

/// One entrant's share of simulated titles.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChampionOdds {
    pub player: RcPlayer,
    pub titles: u32,
    /// Percentage of iterations won.
    #[serde(serialize_with = "crate::skill::round1")]
    pub share: f64,
}

/// Run `iterations` independent bracket generations over the seeded field and
/// tally predicted champions, most frequent first.
pub fn champion_odds(
    seeded: &[RcPlayer],
    game_type: &str,
    config: &EngineConfig,
    master_seed: u64,
    iterations: u32,
) -> Vec<ChampionOdds> {
    if seeded.is_empty() || iterations == 0 {
        return Vec::new();
    }

    let cores = num_cpus::get();
    let per_core = (iterations as usize / cores).max(1);
    debug!(iterations, cores, "running champion-odds batch");

    let champions: Vec<u64> = (0..iterations)
        .into_par_iter()
        .with_min_len(per_core)
        .filter_map(|i| {
            let mut rng = StdRng::seed_from_u64(master_seed.wrapping_add(u64::from(i)));
            // cloning the field is cheap: the entrants are Arc-shared
            Bracket::build(seeded.to_vec(), game_type, config, &mut rng)
                .predicted_champion
                .map(|champion| champion.id)
        })
        .collect();

    let mut tally: FnvHashMap<u64, u32> = FnvHashMap::default();
    for id in champions {
        *tally.entry(id).or_insert(0) += 1;
    }

    let mut odds: Vec<ChampionOdds> = seeded
        .iter()
        .filter_map(|player| {
            let titles = tally.get(&player.id).copied()?;
            Some(ChampionOdds {
                player: Arc::clone(player),
                titles,
                share: f64::from(titles) / f64::from(iterations) * 100.0,
            })
        })
        .collect();
    // most titles first; equal counts keep seeding order
    odds.sort_by(|a, b| b.titles.cmp(&a.titles));
    odds
}

/// Print an odds table, best title chances first.
pub fn print_odds(odds: &[ChampionOdds], iterations: u32) {
    println!("\nChampion odds over {iterations} simulated brackets:");
    println!("{:>4} {:>7} {:>7} {:<24}", "Rank", "Titles", "Share", "Player");
    println!("{}", "-".repeat(46));
    for (i, entry) in odds.iter().enumerate() {
        println!(
            "{:>4} {:>7} {:>6.1}% {:<24}",
            i + 1,
            entry.titles,
            entry.share,
            entry.player.display_name,
        );
    }
}
