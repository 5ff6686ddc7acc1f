//! Game rules: decision points, turns, the jail protocol and the round loop.
//!
//! The engine calls out to a [`Decisions`] implementation for every choice
//! a player makes and never interprets input itself.

pub mod decisions;
pub mod jail;
pub mod turn;
pub mod engine;

pub use decisions::{AutoPlayer, Decisions, JailChoice, ScriptedDecisions};
pub use jail::{JailOutcome, JailState};
pub use turn::{TurnContext, TurnController, TurnEvent, TurnReport};
pub use engine::{GameEngine, GameResult, GameStatus, RoundEnd, Standing};
