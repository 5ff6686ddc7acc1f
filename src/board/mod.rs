//! Board model: squares, the board ring, and board definitions.
//!
//! - [`Square`] / [`SquareKind`]: one position and its landing effect
//! - [`Board`]: movement arithmetic and landing dispatch
//! - [`loader`]: CSV board definitions, validated before a board exists

pub mod square;
#[allow(clippy::module_inception)]
pub mod board;
pub mod loader;

pub use square::{Deed, LandingContext, LandingOutcome, Square, SquareKind};
pub use board::Board;
pub use loader::{load_board, read_board, SquareRecord};
