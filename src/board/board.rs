//! The board: ordered squares, movement and landing dispatch.

use rustc_hash::FxHashMap;
use tracing::{debug, info};

use super::loader::SquareRecord;
use super::square::{LandingContext, LandingOutcome, Square, SquareKind};
use crate::core::{Player, PlayerId, PlayerMap};
use crate::error::BoardError;

/// An ordered ring of squares.
///
/// Square `i` sits at position `i`. The jail position is discovered when the
/// board is built and carried on the value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    squares: Vec<Square>,
    jail_position: Option<usize>,
    by_name: FxHashMap<String, usize>,
}

impl Board {
    /// Build a board from already classified squares.
    ///
    /// Squares are ordered by position; positions must be unique and run
    /// `0..len` without gaps, and at most one square may be the jail.
    pub fn new(mut squares: Vec<Square>) -> Result<Self, BoardError> {
        if squares.is_empty() {
            return Err(BoardError::Empty);
        }
        squares.sort_by_key(|s| s.position);
        if let Some(pair) = squares.windows(2).find(|w| w[0].position == w[1].position) {
            return Err(BoardError::DuplicatePosition(pair[0].position));
        }
        let len = squares.len();
        if let Some(missing) = squares.iter().enumerate().find(|(i, s)| s.position != *i) {
            return Err(BoardError::MissingPosition {
                missing: missing.0,
                len,
            });
        }

        let mut jail_position = None;
        for square in &squares {
            if square.kind == SquareKind::InJail {
                if let Some(first) = jail_position {
                    return Err(BoardError::DuplicateJail {
                        first,
                        second: square.position,
                    });
                }
                jail_position = Some(square.position);
            }
        }

        let mut by_name = FxHashMap::default();
        for square in &squares {
            by_name.entry(square.name.clone()).or_insert(square.position);
        }

        Ok(Self {
            squares,
            jail_position,
            by_name,
        })
    }

    /// Validate and classify board records.
    pub fn from_records(records: Vec<SquareRecord>) -> Result<Self, BoardError> {
        let squares = records
            .into_iter()
            .map(SquareRecord::into_square)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(squares)
    }

    /// Number of squares.
    #[must_use]
    pub fn len(&self) -> usize {
        self.squares.len()
    }

    /// A board is never empty once built; provided for API symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.squares.is_empty()
    }

    /// All squares in position order.
    #[must_use]
    pub fn squares(&self) -> &[Square] {
        &self.squares
    }

    /// The square at `position`.
    #[must_use]
    pub fn square(&self, position: usize) -> Option<&Square> {
        self.squares.get(position)
    }

    /// Position of the In Jail square, if the board has one.
    #[must_use]
    pub fn jail_position(&self) -> Option<usize> {
        self.jail_position
    }

    /// Position of the first square with this name.
    #[must_use]
    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    /// Owner of the property at `position`.
    #[must_use]
    pub fn owner_of(&self, position: usize) -> Option<PlayerId> {
        self.square(position).and_then(Square::owner)
    }

    /// Give the property at `position` to `owner`, keeping the owner's
    /// property list in step with the deed. Returns `false` when `position`
    /// is not a property.
    pub fn assign_owner(&mut self, position: usize, owner: PlayerId, players: &mut PlayerMap<Player>) -> bool {
        let Some(square) = self.squares.get_mut(position) else {
            return false;
        };
        if square.deed().is_none() {
            return false;
        }
        if let Some(previous) = square.owner() {
            players[previous].properties.retain(|p| *p != position);
        }
        square.set_owner(Some(owner));
        players[owner].add_property(position);
        true
    }

    /// Advance `player` by `steps`, wrapping around the board.
    pub fn move_player(&self, player: &mut Player, steps: usize) -> &Square {
        player.position = (player.position + steps) % self.squares.len();
        let square = &self.squares[player.position];
        debug!(player = %player.name, steps, square = %square.name, "moved");
        square
    }

    /// Apply the landing effect of the square under `player`.
    ///
    /// A Go To Jail landing moves the player straight to the jail square.
    /// That relocation is not itself a landing. Without a jail square the
    /// player is held where they stand.
    pub fn resolve_square(&mut self, player: PlayerId, ctx: &mut LandingContext<'_>) -> LandingOutcome {
        let position = ctx.players[player].position;
        let outcome = self.squares[position].land_on(player, ctx);

        if outcome == LandingOutcome::SentToJail {
            if let Some(jail) = self.jail_position {
                ctx.players[player].position = jail;
                info!(player = %ctx.players[player].name, jail, "relocated to jail");
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameConfig, ScriptedRandom};
    use crate::rules::ScriptedDecisions;

    fn ring() -> Board {
        Board::new(vec![
            Square::new("Go", 0, SquareKind::Plain),
            Square::property("Old Kent Road", 1, 60, 2),
            Square::new("Go To Jail", 2, SquareKind::GoToJail),
            Square::new("Free Parking", 3, SquareKind::Plain),
            Square::new("In Jail", 4, SquareKind::InJail),
        ])
        .unwrap()
    }

    #[test]
    fn test_new_orders_by_position() {
        let board = Board::new(vec![
            Square::new("B", 1, SquareKind::Plain),
            Square::new("A", 0, SquareKind::Plain),
        ])
        .unwrap();
        assert_eq!(board.squares()[0].name, "A");
        assert_eq!(board.position_of("B"), Some(1));
    }

    #[test]
    fn test_new_rejects_duplicates_and_gaps() {
        let dup = Board::new(vec![
            Square::new("A", 0, SquareKind::Plain),
            Square::new("B", 0, SquareKind::Plain),
        ]);
        assert!(matches!(dup, Err(BoardError::DuplicatePosition(0))));

        let gap = Board::new(vec![
            Square::new("A", 0, SquareKind::Plain),
            Square::new("B", 2, SquareKind::Plain),
        ]);
        assert!(matches!(gap, Err(BoardError::MissingPosition { missing: 1, len: 2 })));

        assert!(matches!(Board::new(vec![]), Err(BoardError::Empty)));
    }

    #[test]
    fn test_new_rejects_two_jails() {
        let result = Board::new(vec![
            Square::new("In Jail", 0, SquareKind::InJail),
            Square::new("In Jail", 1, SquareKind::InJail),
        ]);
        assert!(matches!(result, Err(BoardError::DuplicateJail { first: 0, second: 1 })));
    }

    #[test]
    fn test_assign_owner_keeps_both_sides_in_step() {
        let mut board = ring();
        let mut players = PlayerMap::from_vec(vec![Player::new("A", 1500), Player::new("B", 1500)]);
        let (a, b) = (PlayerId::new(0), PlayerId::new(1));

        assert!(board.assign_owner(1, a, &mut players));
        assert_eq!(board.owner_of(1), Some(a));
        assert_eq!(players[a].properties, vec![1]);

        assert!(board.assign_owner(1, b, &mut players));
        assert_eq!(board.owner_of(1), Some(b));
        assert!(players[a].properties.is_empty());
        assert_eq!(players[b].properties, vec![1]);

        assert!(!board.assign_owner(0, a, &mut players));
        assert!(!board.assign_owner(99, a, &mut players));
    }

    #[test]
    fn test_move_wraps() {
        let board = ring();
        let mut player = Player::new("Alice", 1500);
        player.position = 3;

        let square = board.move_player(&mut player, 4);
        assert_eq!(square.name, "Go To Jail");
        assert_eq!(player.position, 2);
    }

    #[test]
    fn test_go_to_jail_relocates_without_second_landing() {
        let mut board = ring();
        let mut players = PlayerMap::from_vec(vec![Player::new("Alice", 1500)]);
        let alice = PlayerId::new(0);
        players[alice].position = 2;

        let mut rng = ScriptedRandom::default();
        let mut decisions = ScriptedDecisions::new();
        let config = GameConfig::new();
        let mut ctx = LandingContext {
            players: &mut players,
            rng: &mut rng,
            decisions: &mut decisions,
            config: &config,
        };

        let outcome = board.resolve_square(alice, &mut ctx);
        assert_eq!(outcome, LandingOutcome::SentToJail);
        assert_eq!(players[alice].position, 4);
        assert!(players[alice].in_jail);
        // Landing on In Jail would have counted a turn.
        assert_eq!(players[alice].jail_turns, 0);
    }

    #[test]
    fn test_go_to_jail_without_jail_square_holds_in_place() {
        let mut board = Board::new(vec![
            Square::new("Go", 0, SquareKind::Plain),
            Square::new("Go To Jail", 1, SquareKind::GoToJail),
        ])
        .unwrap();
        assert_eq!(board.jail_position(), None);

        let mut players = PlayerMap::from_vec(vec![Player::new("Alice", 1500)]);
        let alice = PlayerId::new(0);
        players[alice].position = 1;

        let mut rng = ScriptedRandom::default();
        let mut decisions = ScriptedDecisions::new();
        let config = GameConfig::new();
        let mut ctx = LandingContext {
            players: &mut players,
            rng: &mut rng,
            decisions: &mut decisions,
            config: &config,
        };
        board.resolve_square(alice, &mut ctx);

        assert_eq!(players[alice].position, 1);
        assert!(players[alice].in_jail);
    }
}
