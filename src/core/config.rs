//! Game configuration.
//!
//! `GameConfig` carries the rule constants of a game: starting money, jail
//! fine, the Chance table, the tax divisor and the round limit. Games are
//! configured at startup with builder methods and validated once; the engine
//! never reads rule constants from anywhere else.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Fewest players a game may start with.
pub const MIN_PLAYERS: usize = 2;
/// Most players a game may start with.
pub const MAX_PLAYERS: usize = 6;

/// Rule constants for one game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Money each player starts with.
    pub starting_money: i64,

    /// Fine paid to leave jail.
    pub jail_fine: i64,

    /// Jail turns after which the fine becomes mandatory.
    pub max_jail_turns: u8,

    /// Rounds played before the game ends on standings.
    pub max_rounds: u32,

    /// Money deltas drawn uniformly on a Chance square.
    pub chance_deltas: Vec<i64>,

    /// Income Tax takes `money / tax_divisor`, rounded down.
    pub tax_divisor: i64,

    /// Dice seed. `None` seeds from the operating system.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_money: 1500,
            jail_fine: 150,
            max_jail_turns: 3,
            max_rounds: 100,
            chance_deltas: vec![-300, -200, -100, 100, 200],
            tax_divisor: 10,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a configuration with the standard rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the starting money.
    #[must_use]
    pub fn with_starting_money(mut self, money: i64) -> Self {
        self.starting_money = money;
        self
    }

    /// Set the jail fine.
    #[must_use]
    pub fn with_jail_fine(mut self, fine: i64) -> Self {
        self.jail_fine = fine;
        self
    }

    /// Set the round limit.
    #[must_use]
    pub fn with_max_rounds(mut self, rounds: u32) -> Self {
        self.max_rounds = rounds;
        self
    }

    /// Replace the Chance table.
    #[must_use]
    pub fn with_chance_deltas(mut self, deltas: Vec<i64>) -> Self {
        self.chance_deltas = deltas;
        self
    }

    /// Fix the dice seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Reject configurations the rules cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.starting_money <= 0 {
            return Err(ConfigError::NonPositiveStartingMoney(self.starting_money));
        }
        if self.jail_fine <= 0 {
            return Err(ConfigError::NonPositiveJailFine(self.jail_fine));
        }
        if self.max_jail_turns == 0 {
            return Err(ConfigError::ZeroJailTurns);
        }
        if self.max_rounds == 0 {
            return Err(ConfigError::ZeroRounds);
        }
        if self.chance_deltas.is_empty() {
            return Err(ConfigError::EmptyChanceTable);
        }
        if self.tax_divisor <= 0 {
            return Err(ConfigError::NonPositiveTaxDivisor(self.tax_divisor));
        }
        Ok(())
    }

    /// Check a list of player names against the player-count and
    /// uniqueness rules.
    pub fn validate_names<S: AsRef<str>>(&self, names: &[S]) -> Result<(), ConfigError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&names.len()) {
            return Err(ConfigError::PlayerCount(names.len()));
        }
        for (i, name) in names.iter().enumerate() {
            let name = name.as_ref();
            if name.trim().is_empty() {
                return Err(ConfigError::EmptyName);
            }
            if names[..i].iter().any(|n| n.as_ref() == name) {
                return Err(ConfigError::DuplicateName(name.to_string()));
            }
        }
        Ok(())
    }
}
