//! One player's turn.
//!
//! A free player rolls two dice, moves and resolves the landed square. A
//! jailed player runs the jail protocol instead (see [`super::jail`]).
//! Everything that happened is collected in a [`TurnReport`].

use smallvec::SmallVec;
use tracing::debug;

use super::decisions::Decisions;
use super::jail::JailOutcome;
use crate::board::{Board, LandingContext, LandingOutcome};
use crate::core::{DiceRoll, GameConfig, Player, PlayerId, PlayerMap, RandomSource};

/// A single step of a turn, in the order it happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnEvent {
    Rolled(DiceRoll),
    Moved { to: usize },
    Landed(LandingOutcome),
    Jail(JailOutcome),
}

/// Record of one turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnReport {
    pub player: PlayerId,
    pub round: u32,
    /// Most turns are roll, move, land.
    pub events: SmallVec<[TurnEvent; 4]>,
}

impl TurnReport {
    pub fn new(player: PlayerId, round: u32) -> Self {
        Self {
            player,
            round,
            events: SmallVec::new(),
        }
    }

    /// All dice rolled this turn.
    pub fn rolls(&self) -> impl Iterator<Item = DiceRoll> + '_ {
        self.events.iter().filter_map(|e| match e {
            TurnEvent::Rolled(roll) => Some(*roll),
            _ => None,
        })
    }

    /// The landing, if the player moved this turn.
    #[must_use]
    pub fn landing(&self) -> Option<LandingOutcome> {
        self.events.iter().find_map(|e| match e {
            TurnEvent::Landed(outcome) => Some(*outcome),
            _ => None,
        })
    }

    /// The jail step, if the player started the turn jailed.
    #[must_use]
    pub fn jail(&self) -> Option<JailOutcome> {
        self.events.iter().find_map(|e| match e {
            TurnEvent::Jail(outcome) => Some(*outcome),
            _ => None,
        })
    }
}

/// Mutable game state a turn works on.
pub struct TurnContext<'a> {
    pub board: &'a mut Board,
    pub players: &'a mut PlayerMap<Player>,
    pub rng: &'a mut dyn RandomSource,
    pub decisions: &'a mut dyn Decisions,
}

/// Runs turns under a fixed set of rules.
#[derive(Clone, Copy, Debug)]
pub struct TurnController<'c> {
    pub(super) config: &'c GameConfig,
}

impl<'c> TurnController<'c> {
    pub fn new(config: &'c GameConfig) -> Self {
        Self { config }
    }

    /// Play `player`'s turn.
    pub fn play_turn(&self, ctx: &mut TurnContext<'_>, player: PlayerId, round: u32) -> TurnReport {
        let mut report = TurnReport::new(player, round);
        if ctx.players[player].in_jail {
            self.play_jail_turn(ctx, player, &mut report);
        } else {
            let roll = self.roll(ctx, player, &mut report);
            self.advance(ctx, player, roll, &mut report);
        }
        report
    }

    /// Ask for the roll to be acknowledged, then roll two dice.
    pub(super) fn roll(
        &self,
        ctx: &mut TurnContext<'_>,
        player: PlayerId,
        report: &mut TurnReport,
    ) -> DiceRoll {
        ctx.decisions.acknowledge_roll(&ctx.players[player]);
        let roll = DiceRoll::roll(&mut *ctx.rng);
        debug!(player = %ctx.players[player].name, %roll, "rolled");
        report.events.push(TurnEvent::Rolled(roll));
        roll
    }

    /// Move by `roll` and resolve the square landed on.
    pub(super) fn advance(
        &self,
        ctx: &mut TurnContext<'_>,
        player: PlayerId,
        roll: DiceRoll,
        report: &mut TurnReport,
    ) {
        let to = ctx.board.move_player(&mut ctx.players[player], roll.total()).position;
        report.events.push(TurnEvent::Moved { to });

        let mut landing = LandingContext {
            players: &mut *ctx.players,
            rng: &mut *ctx.rng,
            decisions: &mut *ctx.decisions,
            config: self.config,
        };
        let outcome = ctx.board.resolve_square(player, &mut landing);
        report.events.push(TurnEvent::Landed(outcome));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Square, SquareKind};
    use crate::core::ScriptedRandom;
    use crate::rules::ScriptedDecisions;

    fn board() -> Board {
        Board::new(
            (0..10)
                .map(|i| Square::new(format!("S{i}"), i, SquareKind::Plain))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_free_player_rolls_moves_lands() {
        let config = GameConfig::new();
        let mut board = board();
        let mut players = PlayerMap::from_vec(vec![Player::new("Alice", 1500)]);
        let mut rng = ScriptedRandom::with_dice([3, 4]);
        let mut decisions = ScriptedDecisions::new();
        let alice = PlayerId::new(0);

        let report = {
            let mut ctx = TurnContext {
                board: &mut board,
                players: &mut players,
                rng: &mut rng,
                decisions: &mut decisions,
            };
            TurnController::new(&config).play_turn(&mut ctx, alice, 1)
        };

        assert_eq!(players[alice].position, 7);
        assert_eq!(decisions.rolls_acknowledged, 1);
        assert_eq!(
            report.events.as_slice(),
            &[
                TurnEvent::Rolled(DiceRoll { first: 3, second: 4 }),
                TurnEvent::Moved { to: 7 },
                TurnEvent::Landed(LandingOutcome::NoEffect),
            ]
        );
        assert_eq!(report.landing(), Some(LandingOutcome::NoEffect));
        assert_eq!(report.jail(), None);
    }

    #[test]
    fn test_move_wraps_board() {
        let config = GameConfig::new();
        let mut board = board();
        let mut players = PlayerMap::from_vec(vec![Player::new("Alice", 1500)]);
        players[PlayerId::new(0)].position = 8;
        let mut rng = ScriptedRandom::with_dice([6, 6]);
        let mut decisions = ScriptedDecisions::new();

        let mut ctx = TurnContext {
            board: &mut board,
            players: &mut players,
            rng: &mut rng,
            decisions: &mut decisions,
        };
        TurnController::new(&config).play_turn(&mut ctx, PlayerId::new(0), 1);

        assert_eq!(players[PlayerId::new(0)].position, 0);
    }
}
