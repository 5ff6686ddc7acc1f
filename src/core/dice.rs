//! A roll of two six-sided dice.

use serde::{Deserialize, Serialize};

use super::rng::RandomSource;

/// Faces of two independent six-sided dice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceRoll {
    pub first: u8,
    pub second: u8,
}

impl DiceRoll {
    /// Roll both dice from `rng`.
    pub fn roll(rng: &mut dyn RandomSource) -> Self {
        let first = rng.roll_die();
        let second = rng.roll_die();
        Self { first, second }
    }

    /// Sum of both faces, `2..=12`.
    #[must_use]
    pub fn total(self) -> usize {
        self.first as usize + self.second as usize
    }

    /// Both dice show the same face.
    #[must_use]
    pub fn is_double(self) -> bool {
        self.first == self.second
    }
}

impl std::fmt::Display for DiceRoll {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} and {}", self.first, self.second)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ScriptedRandom;

    #[test]
    fn test_roll_consumes_two_dice() {
        let mut rng = ScriptedRandom::with_dice([2, 5, 4]);
        let roll = DiceRoll::roll(&mut rng);
        assert_eq!(roll, DiceRoll { first: 2, second: 5 });
        assert_eq!(roll.total(), 7);
        assert!(!roll.is_double());
        assert_eq!(rng.remaining_dice(), 1);
    }

    #[test]
    fn test_doubles() {
        let roll = DiceRoll { first: 4, second: 4 };
        assert!(roll.is_double());
        assert_eq!(roll.total(), 8);
        assert_eq!(roll.to_string(), "4 and 4");
    }
}
