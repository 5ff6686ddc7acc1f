//! The jail protocol.
//!
//! ```text
//! Free --(Go To Jail)--> Jailed{0} --remain / failed doubles--> Jailed{1} --> Jailed{2} --> JailedFinal
//!   ^                       |                                                                  |
//!   +---- doubles / fine ---+------------------------ mandatory fine paid ---------------------+
//! ```
//!
//! A jailed player with fewer than the maximum turns chooses to try for
//! doubles, pay the fine, or stay. Doubles release and move by that roll;
//! a paid fine releases and moves by a fresh roll. On the final turn the
//! fine is mandatory. A player who cannot pay it stays jailed with the
//! counter held at the maximum and tries again next round; only the engine's
//! negative-money check can remove them.

use tracing::{info, warn};

use super::decisions::JailChoice;
use super::turn::{TurnContext, TurnController, TurnEvent, TurnReport};
use crate::core::{DiceRoll, GameConfig, Player, PlayerId};

/// Where a player stands in the jail protocol.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JailState {
    Free,
    /// Jailed with `turns` served, fewer than the maximum.
    Jailed { turns: u8 },
    /// Jailed with the maximum served; the fine is due.
    JailedFinal,
}

impl JailState {
    #[must_use]
    pub fn of(player: &Player, config: &GameConfig) -> Self {
        if !player.in_jail {
            JailState::Free
        } else if player.jail_turns >= config.max_jail_turns {
            JailState::JailedFinal
        } else {
            JailState::Jailed {
                turns: player.jail_turns,
            }
        }
    }
}

/// What the jail step of a turn did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JailOutcome {
    /// Rolled doubles; moved by that roll.
    ReleasedOnDoubles(DiceRoll),
    /// Rolled, no doubles; the turn is counted.
    FailedDoubles { turns: u8 },
    /// Chose to pay and did; moved by a fresh roll.
    PaidFine { fine: i64 },
    /// Chose to pay without the money; the turn is counted.
    FineUnaffordable { turns: u8 },
    /// Chose to stay; the turn is counted.
    Remained { turns: u8 },
    /// Final turn, fine paid; moved by a fresh roll.
    MandatoryFinePaid { fine: i64 },
    /// Final turn, fine not affordable; still jailed.
    MandatoryFineUnpaid { fine: i64 },
}

impl JailOutcome {
    /// Whether the player left jail.
    #[must_use]
    pub fn released(self) -> bool {
        matches!(
            self,
            JailOutcome::ReleasedOnDoubles(_)
                | JailOutcome::PaidFine { .. }
                | JailOutcome::MandatoryFinePaid { .. }
        )
    }
}

impl TurnController<'_> {
    pub(super) fn play_jail_turn(
        &self,
        ctx: &mut TurnContext<'_>,
        player: PlayerId,
        report: &mut TurnReport,
    ) {
        let fine = self.config.jail_fine;

        match JailState::of(&ctx.players[player], self.config) {
            JailState::Free => {}
            JailState::JailedFinal => {
                let jailed = &mut ctx.players[player];
                if jailed.pay_jail_fine(fine) {
                    jailed.release_from_jail();
                    info!(player = %jailed.name, fine, "paid mandatory fine, released");
                    report.events.push(TurnEvent::Jail(JailOutcome::MandatoryFinePaid { fine }));
                    let roll = self.roll(ctx, player, report);
                    self.advance(ctx, player, roll, report);
                } else {
                    warn!(player = %jailed.name, money = jailed.money, fine, "cannot pay mandatory fine");
                    report.events.push(TurnEvent::Jail(JailOutcome::MandatoryFineUnpaid { fine }));
                }
            }
            JailState::Jailed { .. } => {
                match ctx.decisions.jail_choice(&ctx.players[player]) {
                    JailChoice::AttemptDoubles => {
                        let roll = self.roll(ctx, player, report);
                        if roll.is_double() {
                            ctx.players[player].release_from_jail();
                            info!(player = %ctx.players[player].name, %roll, "rolled doubles, released");
                            report.events.push(TurnEvent::Jail(JailOutcome::ReleasedOnDoubles(roll)));
                            self.advance(ctx, player, roll, report);
                        } else {
                            let turns = self.count_turn(&mut ctx.players[player]);
                            report.events.push(TurnEvent::Jail(JailOutcome::FailedDoubles { turns }));
                        }
                    }
                    JailChoice::PayFine => {
                        let jailed = &mut ctx.players[player];
                        if jailed.pay_jail_fine(fine) {
                            jailed.release_from_jail();
                            info!(player = %jailed.name, fine, "paid fine, released");
                            report.events.push(TurnEvent::Jail(JailOutcome::PaidFine { fine }));
                            let roll = self.roll(ctx, player, report);
                            self.advance(ctx, player, roll, report);
                        } else {
                            let turns = self.count_turn(jailed);
                            report.events.push(TurnEvent::Jail(JailOutcome::FineUnaffordable { turns }));
                        }
                    }
                    JailChoice::Remain => {
                        let turns = self.count_turn(&mut ctx.players[player]);
                        report.events.push(TurnEvent::Jail(JailOutcome::Remained { turns }));
                    }
                }
            }
        }
    }

    fn count_turn(&self, player: &mut Player) -> u8 {
        player.jail_turns = (player.jail_turns + 1).min(self.config.max_jail_turns);
        player.jail_turns
    }
}
