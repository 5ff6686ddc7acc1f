//! Player identification, per-player storage and the player record.
//!
//! ## PlayerId
//!
//! Type-safe index into the player arena. Property deeds store a `PlayerId`
//! rather than a reference to the owning player.
//!
//! ## PlayerMap
//!
//! The player arena: per-player storage backed by `Vec` for O(1) access,
//! indexed by `PlayerId`. Bankrupt players stay in the map; only the engine's
//! active list forgets them.
//!
//! ## Player
//!
//! Money, board position, owned squares and jail status of one player.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Player identifier. Indices are 0-based: the first player is `PlayerId(0)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw player index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over all player IDs for a game with `player_count` players.
    ///
    /// ```
    /// use monopoly_engine::core::PlayerId;
    ///
    /// let players: Vec<_> = PlayerId::all(4).collect();
    /// assert_eq!(players.len(), 4);
    /// assert_eq!(players[3], PlayerId::new(3));
    /// ```
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count as u8).map(PlayerId)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// Per-player data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use monopoly_engine::core::{PlayerId, PlayerMap};
///
/// let mut money: PlayerMap<i64> = PlayerMap::new(4, |_| 1500);
/// money[PlayerId::new(1)] -= 200;
/// assert_eq!(money[PlayerId::new(0)], 1500);
/// assert_eq!(money[PlayerId::new(1)], 1300);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: Vec<T>,
}

impl<T> PlayerMap<T> {
    /// Create a new PlayerMap with values from a factory function.
    pub fn new(player_count: usize, factory: impl Fn(PlayerId) -> T) -> Self {
        assert!(player_count > 0, "Must have at least 1 player");
        assert!(player_count <= 255, "At most 255 players supported");

        let data = (0..player_count as u8)
            .map(|i| factory(PlayerId(i)))
            .collect();

        Self { data }
    }

    /// Build a map from values already in player order.
    pub fn from_vec(data: Vec<T>) -> Self {
        assert!(!data.is_empty(), "Must have at least 1 player");
        assert!(data.len() <= 255, "At most 255 players supported");
        Self { data }
    }

    /// Get the number of players.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.data.len()
    }

    /// Get a reference to a player's data.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> &T {
        &self.data[player.index()]
    }

    /// Get a mutable reference to a player's data.
    pub fn get_mut(&mut self, player: PlayerId) -> &mut T {
        &mut self.data[player.index()]
    }

    /// Borrow two different players mutably at once.
    ///
    /// Panics if `a == b`.
    pub fn pair_mut(&mut self, a: PlayerId, b: PlayerId) -> (&mut T, &mut T) {
        assert_ne!(a, b, "pair_mut needs two distinct players");
        let (ai, bi) = (a.index(), b.index());
        if ai < bi {
            let (left, right) = self.data.split_at_mut(bi);
            (&mut left[ai], &mut right[0])
        } else {
            let (left, right) = self.data.split_at_mut(ai);
            (&mut right[0], &mut left[bi])
        }
    }

    /// Iterate over (PlayerId, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }

    /// Iterate over all player IDs.
    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> {
        (0..self.data.len() as u8).map(PlayerId)
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        self.get(player)
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        self.get_mut(player)
    }
}

impl PlayerMap<Player> {
    /// Find a player by name.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<PlayerId> {
        self.iter().find(|(_, p)| p.name == name).map(|(id, _)| id)
    }
}

/// A player taking part in the game.
///
/// Money is signed: a negative balance marks the player as bankrupt at the
/// next check made by the engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Display name, unique within a game.
    pub name: String,
    /// Current balance.
    pub money: i64,
    /// Index of the square the player stands on.
    pub position: usize,
    /// Positions of owned property squares, in purchase order.
    pub properties: Vec<usize>,
    /// Whether the player is confined to jail.
    pub in_jail: bool,
    /// Turns spent in jail, `0..=3`.
    pub jail_turns: u8,
}

impl Player {
    /// Create a player on square 0 with the given balance.
    pub fn new(name: impl Into<String>, money: i64) -> Self {
        Self {
            name: name.into(),
            money,
            position: 0,
            properties: Vec::new(),
            in_jail: false,
            jail_turns: 0,
        }
    }

    /// Negative money means bankruptcy.
    #[must_use]
    pub fn is_bankrupt(&self) -> bool {
        self.money < 0
    }

    /// Whether the player can pay `amount` without going negative.
    #[must_use]
    pub fn can_afford(&self, amount: i64) -> bool {
        self.money >= amount
    }

    /// Whether the player owns the property at `position`.
    #[must_use]
    pub fn owns(&self, position: usize) -> bool {
        self.properties.contains(&position)
    }

    /// Record a newly acquired property.
    pub fn add_property(&mut self, position: usize) {
        if !self.owns(position) {
            self.properties.push(position);
        }
    }

    /// Pay the jail fine if the balance covers it. Returns whether it was paid.
    pub fn pay_jail_fine(&mut self, fine: i64) -> bool {
        if self.can_afford(fine) {
            self.money -= fine;
            true
        } else {
            false
        }
    }

    /// Confine the player. The turn counter restarts.
    pub fn send_to_jail(&mut self) {
        self.in_jail = true;
        self.jail_turns = 0;
    }

    /// Leave jail and reset the turn counter.
    pub fn release_from_jail(&mut self) {
        self.in_jail = false;
        self.jail_turns = 0;
    }
}
