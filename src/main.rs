// Demo CLI: load a roster snapshot from CSV, generate a predicted bracket for
// it, print the tree, and optionally estimate champion odds over a batch of
// simulated brackets.
//
// Usage:
//   smartbracket <roster.csv> [--title NAME] [--game-type TYPE] [--seed N]
//                [--sims N] [--config FILE] [--json FILE]

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::process;
use tracing::error;
use tracing_subscriber::EnvFilter;

use smartbracket::config::EngineConfig;
use smartbracket::error::{Error, Result};
use smartbracket::generator::{BracketGenerator, BracketType};
use smartbracket::odds;
use smartbracket::roster::{self, SnapshotStore, Tournament, TournamentStatus, TournamentStore};
use smartbracket::skill;

struct CliArgs {
    roster_path: String,
    title: String,
    game_type: String,
    seed: Option<u64>,
    sims: u32,
    config_path: Option<String>,
    json_path: Option<String>,
}

fn parse_args() -> Result<CliArgs> {
    let mut args = std::env::args().skip(1);
    let mut roster_path = None;
    let mut title = "Local Tournament".to_string();
    let mut game_type = "FPS".to_string();
    let mut seed = None;
    let mut sims = 0u32;
    let mut config_path = None;
    let mut json_path = None;

    while let Some(arg) = args.next() {
        let mut value_for = |flag: &str| {
            args.next()
                .ok_or_else(|| Error::Validation(format!("missing value for {flag}")))
        };
        match arg.as_str() {
            "--title" => title = value_for("--title")?,
            "--game-type" => game_type = value_for("--game-type")?,
            "--seed" => {
                seed = Some(value_for("--seed")?.parse().map_err(|_| {
                    Error::Validation("--seed expects an unsigned integer".into())
                })?)
            }
            "--sims" => {
                sims = value_for("--sims")?.parse().map_err(|_| {
                    Error::Validation("--sims expects an unsigned integer".into())
                })?
            }
            "--config" => config_path = Some(value_for("--config")?),
            "--json" => json_path = Some(value_for("--json")?),
            other if other.starts_with("--") => {
                return Err(Error::Validation(format!("unknown flag: {other}")));
            }
            other => roster_path = Some(other.to_string()),
        }
    }

    Ok(CliArgs {
        roster_path: roster_path.ok_or_else(|| {
            Error::Validation(
                "usage: smartbracket <roster.csv> [--title NAME] [--game-type TYPE] \
                 [--seed N] [--sims N] [--config FILE] [--json FILE]"
                    .into(),
            )
        })?,
        title,
        game_type,
        seed,
        sims,
        config_path,
        json_path,
    })
}

fn run(args: CliArgs) -> Result<()> {
    let config = EngineConfig::load_or_default(args.config_path.as_deref());
    let participants = roster::load_roster_csv(&args.roster_path)?;

    let tournament = Tournament::new(1, args.title, args.game_type, TournamentStatus::Upcoming);
    let store = SnapshotStore::new(tournament, participants);

    let master_seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(master_seed);

    let generator = BracketGenerator::new(config);
    let response = generator.generate(&store, 1, BracketType::SingleElimination, &mut rng)?;

    println!(
        "{} ({}), seed {master_seed}\n",
        response.tournament.title, response.tournament.game_type
    );
    response.bracket.pretty_print();

    if let Some(path) = &args.json_path {
        let json = serde_json::to_string_pretty(&response)
            .map_err(|e| Error::Validation(format!("failed to serialize bracket: {e}")))?;
        std::fs::write(path, json)?;
        println!("\nWrote bracket JSON to {path}");
    }

    if args.sims > 0 {
        let participants = store.fetch_participants(1)?;
        let seeded = skill::seed_players(&participants, generator.config());
        let report = odds::champion_odds(
            &seeded,
            &response.tournament.game_type,
            generator.config(),
            master_seed,
            args.sims,
        );
        odds::print_odds(&report, args.sims);
    }

    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(err) => {
            eprintln!("{err}");
            process::exit(2);
        }
    };

    if let Err(err) = run(args) {
        error!("bracket generation failed: {err}");
        process::exit(1);
    }
}
