// Error taxonomy for the bracket engine. Nothing here is retried: every
// failure is deterministic given the same inputs, so errors surface straight
// to the caller and no partial bracket is ever returned.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("tournament {id} not found")]
    TournamentNotFound { id: u64 },

    #[error("need at least {required} participants, found {found}")]
    InsufficientParticipants { found: usize, required: usize },

    #[error("invalid request: {0}")]
    Validation(String),

    #[error("malformed record: {0}")]
    Data(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
