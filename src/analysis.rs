// Flavor-text generator for match predictions. Each game type carries a small
// table of skill factors; a rationale sentence is picked from a fixed pool of
// templates referencing the predicted winner. Both picks use the injected RNG
// so a seeded run reproduces its text exactly.

use rand::Rng;

use crate::skill::SeededPlayer;

/// Factors cited for game types without a dedicated table.
pub const GENERIC_FACTORS: &[&str] = &["overall skill", "experience", "consistency"];

/// Skill factors the analysis can cite, keyed by game type.
pub fn factors_for(game_type: &str) -> &'static [&'static str] {
    match game_type {
        "FPS" => &[
            "aim accuracy",
            "reaction time",
            "map knowledge",
            "positioning",
        ],
        "MOBA" => &[
            "strategic thinking",
            "team coordination",
            "champion mastery",
            "objective control",
        ],
        "Battle Royale" => &[
            "survival instinct",
            "adaptability",
            "resource management",
            "positioning",
        ],
        "Fighting" => &[
            "frame knowledge",
            "combo execution",
            "mind games",
            "adaptation",
        ],
        "Sports" => &["game sense", "timing", "team chemistry", "execution"],
        "Strategy" => &[
            "planning",
            "economic management",
            "long-term vision",
            "micro-management",
        ],
        _ => GENERIC_FACTORS,
    }
}

/// Number of rationale templates in the pool.
pub const TEMPLATE_COUNT: usize = 5;

/// Build the rationale for a predicted winner. Draws a factor, then a
/// template, from the given RNG.
pub fn match_analysis(winner: &SeededPlayer, game_type: &str, rng: &mut impl Rng) -> String {
    let factors = factors_for(game_type);
    let factor = factors[rng.gen_range(0..factors.len())];
    let name = &winner.display_name;

    match rng.gen_range(0..TEMPLATE_COUNT) {
        0 => format!("{name} shows superior {factor} based on match history analysis"),
        1 => format!(
            "AI prediction favors {name} due to higher win rate ({:.1}%)",
            winner.win_rate
        ),
        2 => format!("{name}'s performance pattern suggests better adaptation to tournament pressure"),
        3 => format!("Statistical modeling indicates {name} has tactical advantage in {game_type}"),
        _ => format!("{name}'s skill progression shows peak competitive form"),
    }
}

/// Rationale attached to a bye node.
pub fn bye_analysis(player: &SeededPlayer) -> String {
    format!("{} advances automatically", player.display_name)
}
