// Engine configuration with YAML support. Every knob has a documented
// default so a missing or partial config file still yields a working engine.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Minimum entrants required before a bracket can be generated.
    #[serde(default = "default_min_participants")]
    pub min_participants: usize,

    /// Win-probability edge (in percentage points) granted per point of
    /// skill-rating difference.
    #[serde(default = "default_edge_per_skill_point")]
    pub edge_per_skill_point: f64,

    /// Lower bound on any player's modeled win probability.
    #[serde(default = "default_prob_floor")]
    pub prob_floor: f64,

    /// Upper bound on any player's modeled win probability.
    #[serde(default = "default_prob_ceiling")]
    pub prob_ceiling: f64,

    /// Win rate assumed for players with no recorded matches.
    #[serde(default = "default_unranked_win_rate")]
    pub unranked_win_rate: f64,

    /// Skill ratings are clamped into [0, skill_ceiling].
    #[serde(default = "default_skill_ceiling")]
    pub skill_ceiling: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            min_participants: default_min_participants(),
            edge_per_skill_point: default_edge_per_skill_point(),
            prob_floor: default_prob_floor(),
            prob_ceiling: default_prob_ceiling(),
            unranked_win_rate: default_unranked_win_rate(),
            skill_ceiling: default_skill_ceiling(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::Config(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string and sanity-check it.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: EngineConfig = serde_yaml::from_str(content)
            .map_err(|e| Error::Config(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file if one was given, otherwise use defaults.
    pub fn load_or_default(path: Option<&str>) -> Self {
        match path {
            Some(p) => Self::from_file(p).unwrap_or_else(|e| {
                warn!("{e}; using default configuration");
                Self::default()
            }),
            None => {
                for default_path in &["smartbracket.yaml", "smartbracket.yml"] {
                    if Path::new(default_path).exists() {
                        if let Ok(config) = Self::from_file(default_path) {
                            info!("loaded configuration from {default_path}");
                            return config;
                        }
                    }
                }
                Self::default()
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.min_participants == 0 {
            return Err(Error::Config("min_participants must be at least 1".into()));
        }
        if self.prob_floor > self.prob_ceiling {
            return Err(Error::Config(format!(
                "prob_floor ({}) exceeds prob_ceiling ({})",
                self.prob_floor, self.prob_ceiling
            )));
        }
        if !(0.0..=100.0).contains(&self.prob_floor) || !(0.0..=100.0).contains(&self.prob_ceiling)
        {
            return Err(Error::Config(
                "probability bounds must lie within [0, 100]".into(),
            ));
        }
        if self.skill_ceiling <= 0.0 {
            return Err(Error::Config("skill_ceiling must be positive".into()));
        }
        Ok(())
    }
}

fn default_min_participants() -> usize {
    4
}

fn default_edge_per_skill_point() -> f64 {
    0.5
}

fn default_prob_floor() -> f64 {
    25.0
}

fn default_prob_ceiling() -> f64 {
    75.0
}

fn default_unranked_win_rate() -> f64 {
    50.0
}

fn default_skill_ceiling() -> f64 {
    100.0
}
