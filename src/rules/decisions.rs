//! Decision points the engine needs from whoever is playing.
//!
//! The engine never reads input. It asks a [`Decisions`] implementation at
//! four points: before a roll, when a player may buy, when a jailed player
//! chooses how to spend the turn, and at the start of each turn whether to
//! save and stop.
//!
//! ## Implementations
//!
//! - `ConsoleDecisions` (in `console`): prompts a human on a terminal
//! - [`AutoPlayer`]: a simple automatic player for simulations
//! - [`ScriptedDecisions`]: replays fixed answers, for tests

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::turn::TurnReport;
use crate::board::Square;
use crate::core::{GameConfig, Player};

/// How a jailed player spends a turn with fewer than the maximum jail turns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum JailChoice {
    /// Roll; doubles release and move by that roll.
    AttemptDoubles,
    /// Pay the fine, then roll and move.
    PayFine,
    /// Stay put and count the turn.
    Remain,
}

/// Answers to the engine's questions.
pub trait Decisions {
    /// Called before every dice roll.
    fn acknowledge_roll(&mut self, player: &Player);

    /// `player` stands on an unowned property they can afford. Buy it?
    fn buy_property(&mut self, player: &Player, square: &Square) -> bool;

    /// `player` is jailed with fewer than the maximum turns served.
    fn jail_choice(&mut self, player: &Player) -> JailChoice;

    /// Asked at the start of `player`'s turn. `true` saves and suspends.
    fn save_or_continue(&mut self, player: &Player) -> bool;

    /// Notification after each completed turn.
    fn report(&mut self, _report: &TurnReport) {}
}

/// Automatic player.
///
/// Buys whenever the purchase leaves at least `reserve` in hand, pays the
/// jail fine when it can keep the same reserve, otherwise tries for doubles.
/// Never saves.
#[derive(Clone, Debug)]
pub struct AutoPlayer {
    pub reserve: i64,
    pub jail_fine: i64,
}

impl AutoPlayer {
    /// An automatic player tuned to the fine of `config`.
    pub fn for_config(config: &GameConfig) -> Self {
        Self {
            jail_fine: config.jail_fine,
            ..Self::default()
        }
    }
}

impl Default for AutoPlayer {
    fn default() -> Self {
        Self {
            reserve: 200,
            jail_fine: 150,
        }
    }
}

impl Decisions for AutoPlayer {
    fn acknowledge_roll(&mut self, _player: &Player) {}

    fn buy_property(&mut self, player: &Player, square: &Square) -> bool {
        square
            .deed()
            .is_some_and(|deed| player.money - deed.price >= self.reserve)
    }

    fn jail_choice(&mut self, player: &Player) -> JailChoice {
        if player.money - self.jail_fine >= self.reserve {
            JailChoice::PayFine
        } else {
            JailChoice::AttemptDoubles
        }
    }

    fn save_or_continue(&mut self, _player: &Player) -> bool {
        false
    }
}

/// Replays queued answers; falls back to defaults when a queue is empty.
///
/// Defaults: buy as configured with [`ScriptedDecisions::buying`], remain in
/// jail, never save.
#[derive(Clone, Debug, Default)]
pub struct ScriptedDecisions {
    buys: VecDeque<bool>,
    jail_choices: VecDeque<JailChoice>,
    saves: VecDeque<bool>,
    default_buy: bool,
    /// Number of rolls acknowledged so far.
    pub rolls_acknowledged: usize,
    /// Names of squares offered for purchase, in order.
    pub offers: Vec<String>,
    /// Reports received, in order.
    pub reports: Vec<TurnReport>,
}

impl ScriptedDecisions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer used when no buy decision is queued.
    #[must_use]
    pub fn buying(mut self, buy: bool) -> Self {
        self.default_buy = buy;
        self
    }

    #[must_use]
    pub fn with_buys(mut self, buys: impl IntoIterator<Item = bool>) -> Self {
        self.buys.extend(buys);
        self
    }

    #[must_use]
    pub fn with_jail_choices(mut self, choices: impl IntoIterator<Item = JailChoice>) -> Self {
        self.jail_choices.extend(choices);
        self
    }

    #[must_use]
    pub fn with_saves(mut self, saves: impl IntoIterator<Item = bool>) -> Self {
        self.saves.extend(saves);
        self
    }
}

impl Decisions for ScriptedDecisions {
    fn acknowledge_roll(&mut self, _player: &Player) {
        self.rolls_acknowledged += 1;
    }

    fn buy_property(&mut self, _player: &Player, square: &Square) -> bool {
        self.offers.push(square.name.clone());
        self.buys.pop_front().unwrap_or(self.default_buy)
    }

    fn jail_choice(&mut self, _player: &Player) -> JailChoice {
        self.jail_choices.pop_front().unwrap_or(JailChoice::Remain)
    }

    fn save_or_continue(&mut self, _player: &Player) -> bool {
        self.saves.pop_front().unwrap_or(false)
    }

    fn report(&mut self, report: &TurnReport) {
        self.reports.push(report.clone());
    }
}
