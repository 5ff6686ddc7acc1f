//! Core engine types: players, dice, RNG, configuration.
//!
//! These are the leaf building blocks the board and rules are written
//! against. Nothing here knows about squares or turns.

pub mod player;
pub mod rng;
pub mod dice;
pub mod config;

pub use player::{Player, PlayerId, PlayerMap};
pub use rng::{GameRng, GameRngState, RandomSource, ScriptedRandom};
pub use dice::DiceRoll;
pub use config::{GameConfig, MAX_PLAYERS, MIN_PLAYERS};
