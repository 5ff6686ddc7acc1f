//! Error types.
//!
//! Three families, each fatal to the operation that raised it:
//! - [`BoardError`]: a board definition that cannot become a board
//! - [`ConfigError`]: rule constants or a player list the engine refuses
//! - [`SnapshotError`]: a saved game that cannot be written or restored
//!
//! Running out of money is never an error; the rules model it.

use std::path::PathBuf;

use thiserror::Error;

/// A malformed board definition. No partial board is ever built.
#[derive(Debug, Error)]
pub enum BoardError {
    #[error("board definition has no squares")]
    Empty,
    #[error("position {0} appears more than once")]
    DuplicatePosition(usize),
    #[error("positions must run 0..{len} without gaps, position {missing} is missing")]
    MissingPosition { missing: usize, len: usize },
    #[error("square {name:?} at position {position} has a rent but no price")]
    MissingPrice { name: String, position: usize },
    #[error("square {name:?} at position {position} has a price but no rent")]
    MissingRent { name: String, position: usize },
    #[error("square {name:?} at position {position} must have a positive price and rent")]
    NonPositiveAmount { name: String, position: usize },
    #[error("square {name:?} at position {position} has an empty name")]
    EmptyName { name: String, position: usize },
    #[error("more than one In Jail square (positions {first} and {second})")]
    DuplicateJail { first: usize, second: usize },
    #[error("cannot read board file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed board row: {0}")]
    Csv(#[from] csv::Error),
}

/// Rules or players the engine refuses to start with.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("a game needs 2 to 6 players, got {0}")]
    PlayerCount(usize),
    #[error("player names must not be empty")]
    EmptyName,
    #[error("player name {0:?} is used twice")]
    DuplicateName(String),
    #[error("starting money must be positive, got {0}")]
    NonPositiveStartingMoney(i64),
    #[error("jail fine must be positive, got {0}")]
    NonPositiveJailFine(i64),
    #[error("jail must allow at least one turn")]
    ZeroJailTurns,
    #[error("round limit must be at least 1")]
    ZeroRounds,
    #[error("chance table is empty")]
    EmptyChanceTable,
    #[error("tax divisor must be positive, got {0}")]
    NonPositiveTaxDivisor(i64),
}

/// A saved game that cannot be written or restored.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("cannot access snapshot {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("snapshot is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("snapshot is not valid binary data: {0}")]
    Binary(#[from] bincode::Error),
    #[error("snapshot board is invalid: {0}")]
    Board(#[from] BoardError),
    #[error("snapshot rules are invalid: {0}")]
    Config(#[from] ConfigError),
    #[error("snapshot is inconsistent: {0}")]
    Inconsistent(String),
}

/// Any error the engine surfaces to its caller.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
