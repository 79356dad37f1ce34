//! Bracket-prediction engine for tournament management: rates entrants from
//! their match history, seeds them, and builds a single-elimination bracket
//! with probability-weighted match predictions.

pub mod analysis;
pub mod bracket;
pub mod config;
pub mod error;
pub mod generator;
pub mod history;
pub mod odds;
pub mod roster;
pub mod skill;

pub use config::EngineConfig;
pub use error::{Error, Result};
pub use generator::{BracketGenerator, BracketResponse, BracketType};
