//! Saving and restoring games.

pub mod snapshot;

pub use snapshot::{load_game, save_game, PlayerSnapshot, Snapshot, SnapshotFormat, SquareSnapshot};
