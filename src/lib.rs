//! # monopoly-engine
//!
//! A turn-based property-trading board game for 2 to 6 players.
//!
//! Players roll two dice, move around a ring of squares loaded from CSV, buy
//! unowned properties, pay rent to owners, draw Chance money changes, pay
//! income tax and serve time in jail. A player whose money goes negative is
//! out. The last player standing wins, or the richest after the round limit.
//!
//! ## Design Principles
//!
//! 1. **Engine Never Reads Input**: every player choice goes through the
//!    [`Decisions`] trait. The console, the automatic player and test scripts
//!    are interchangeable.
//!
//! 2. **Arena Ownership**: players live in a [`PlayerMap`] indexed by
//!    [`PlayerId`]. A property deed stores its owner's id, never a reference.
//!
//! 3. **Reproducible Dice**: randomness comes from a [`RandomSource`]. The
//!    seeded [`GameRng`] can be checkpointed into a save file, so a resumed
//!    game rolls exactly what the original would have.
//!
//! ## Modules
//!
//! - `core`: players, dice, RNG, rule configuration
//! - `board`: squares, landing effects, the CSV loader
//! - `rules`: decision points, turns, the jail protocol, the round loop
//! - `persistence`: save and restore snapshots
//! - `console`: terminal play and rendering
//! - `error`: error types

pub mod core;
pub mod board;
pub mod rules;
pub mod persistence;
pub mod console;
pub mod error;

// Re-export commonly used types
pub use crate::core::{
    DiceRoll, GameConfig, GameRng, GameRngState, Player, PlayerId, PlayerMap, RandomSource, ScriptedRandom,
};

pub use crate::board::{load_board, read_board, Board, Deed, LandingOutcome, Square, SquareKind, SquareRecord};

pub use crate::rules::{
    AutoPlayer, Decisions, GameEngine, GameResult, GameStatus, JailChoice, JailOutcome, RoundEnd, ScriptedDecisions,
    Standing, TurnEvent, TurnReport,
};

pub use crate::persistence::{load_game, save_game, Snapshot, SnapshotFormat};

pub use crate::console::ConsoleDecisions;

pub use crate::error::{BoardError, ConfigError, Error, Result, SnapshotError};
