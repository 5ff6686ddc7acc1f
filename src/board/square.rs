//! Squares and their landing behaviour.
//!
//! The set of square kinds is closed, so landing is a single `match` over
//! [`SquareKind`]. A property's [`Deed`] stores its owner as a [`PlayerId`]
//! into the player arena; the owner's `properties` list holds square
//! positions. Neither side holds a reference to the other.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::{GameConfig, Player, PlayerId, PlayerMap, RandomSource};
use crate::rules::Decisions;

/// Name of the square that draws a Chance delta.
pub const CHANCE: &str = "Chance";
/// Name of the square that levies income tax.
pub const INCOME_TAX: &str = "Income Tax";
/// Name of the square that sends the lander to jail.
pub const GO_TO_JAIL: &str = "Go To Jail";
/// Name of the square that marks the jail.
pub const IN_JAIL: &str = "In Jail";

/// Price, rent and owner of a property square.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deed {
    pub price: i64,
    pub rent: i64,
    /// Authoritative owner. `None` until bought.
    pub owner: Option<PlayerId>,
}

impl Deed {
    /// An unowned deed.
    #[must_use]
    pub fn new(price: i64, rent: i64) -> Self {
        Self {
            price,
            rent,
            owner: None,
        }
    }
}

/// What a square does to the player landing on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SquareKind {
    /// No effect ("Go", "Free Parking", anything unclassified).
    Plain,
    /// Purchasable; charges rent to visitors once owned.
    Property(Deed),
    /// Random money delta.
    Chance,
    /// Deducts a tenth of the lander's money.
    Tax,
    /// Jails the lander; the board relocates them to the jail square.
    GoToJail,
    /// The jail itself. Counts a turn for jailed players only.
    InJail,
}

impl SquareKind {
    /// Classify a board record by name, falling back to price and rent.
    ///
    /// Special names are compared ignoring ASCII case.
    #[must_use]
    pub fn classify(name: &str, price: Option<i64>, rent: Option<i64>) -> Self {
        let name = name.trim();
        if name.eq_ignore_ascii_case(CHANCE) {
            SquareKind::Chance
        } else if name.eq_ignore_ascii_case(INCOME_TAX) {
            SquareKind::Tax
        } else if name.eq_ignore_ascii_case(GO_TO_JAIL) {
            SquareKind::GoToJail
        } else if name.eq_ignore_ascii_case(IN_JAIL) {
            SquareKind::InJail
        } else {
            match (price, rent) {
                (Some(price), Some(rent)) if price > 0 && rent > 0 => {
                    SquareKind::Property(Deed::new(price, rent))
                }
                _ => SquareKind::Plain,
            }
        }
    }
}

/// The effect a landing had, for reporting and tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LandingOutcome {
    NoEffect,
    Bought { price: i64 },
    DeclinedPurchase { price: i64 },
    CannotAfford { price: i64 },
    PaidRent { owner: PlayerId, rent: i64 },
    OwnProperty,
    Chance { delta: i64 },
    Tax { amount: i64 },
    SentToJail,
    JailTurnCounted { turns: u8 },
}

/// Everything a landing may touch besides the square itself.
pub struct LandingContext<'a> {
    pub players: &'a mut PlayerMap<Player>,
    pub rng: &'a mut dyn RandomSource,
    pub decisions: &'a mut dyn Decisions,
    pub config: &'a GameConfig,
}

/// One square of the board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Square {
    pub name: String,
    pub position: usize,
    pub kind: SquareKind,
}

impl Square {
    pub fn new(name: impl Into<String>, position: usize, kind: SquareKind) -> Self {
        Self {
            name: name.into(),
            position,
            kind,
        }
    }

    /// Shorthand for a property square.
    pub fn property(name: impl Into<String>, position: usize, price: i64, rent: i64) -> Self {
        Self::new(name, position, SquareKind::Property(Deed::new(price, rent)))
    }

    /// The deed, if this is a property.
    #[must_use]
    pub fn deed(&self) -> Option<&Deed> {
        match &self.kind {
            SquareKind::Property(deed) => Some(deed),
            _ => None,
        }
    }

    /// Owner of this square, if it is an owned property.
    #[must_use]
    pub fn owner(&self) -> Option<PlayerId> {
        self.deed().and_then(|d| d.owner)
    }

    /// Set the owner of a property square. No effect on other kinds.
    pub fn set_owner(&mut self, owner: Option<PlayerId>) {
        if let SquareKind::Property(deed) = &mut self.kind {
            deed.owner = owner;
        }
    }

    /// Apply this square's effect to `player`.
    pub fn land_on(&mut self, player: PlayerId, ctx: &mut LandingContext<'_>) -> LandingOutcome {
        match self.kind {
            SquareKind::Plain => {
                debug!(player = %ctx.players[player].name, square = %self.name, "no effect");
                LandingOutcome::NoEffect
            }
            SquareKind::Property(deed) => self.land_on_property(deed, player, ctx),
            SquareKind::Chance => {
                let deltas = &ctx.config.chance_deltas;
                let delta = deltas[ctx.rng.pick(deltas.len())];
                ctx.players[player].money += delta;
                debug!(player = %ctx.players[player].name, delta, "chance");
                LandingOutcome::Chance { delta }
            }
            SquareKind::Tax => {
                let lander = &mut ctx.players[player];
                let amount = lander.money.div_euclid(ctx.config.tax_divisor).max(0);
                lander.money -= amount;
                debug!(player = %lander.name, amount, "income tax");
                LandingOutcome::Tax { amount }
            }
            SquareKind::GoToJail => {
                ctx.players[player].send_to_jail();
                info!(player = %ctx.players[player].name, "sent to jail");
                LandingOutcome::SentToJail
            }
            SquareKind::InJail => {
                let lander = &mut ctx.players[player];
                if lander.in_jail {
                    lander.jail_turns = (lander.jail_turns + 1).min(ctx.config.max_jail_turns);
                    LandingOutcome::JailTurnCounted {
                        turns: lander.jail_turns,
                    }
                } else {
                    LandingOutcome::NoEffect
                }
            }
        }
    }

    fn land_on_property(
        &mut self,
        deed: Deed,
        player: PlayerId,
        ctx: &mut LandingContext<'_>,
    ) -> LandingOutcome {
        match deed.owner {
            None => {
                if !ctx.players[player].can_afford(deed.price) {
                    return LandingOutcome::CannotAfford { price: deed.price };
                }
                if !ctx.decisions.buy_property(&ctx.players[player], self) {
                    return LandingOutcome::DeclinedPurchase { price: deed.price };
                }
                let buyer = &mut ctx.players[player];
                buyer.money -= deed.price;
                buyer.add_property(self.position);
                self.set_owner(Some(player));
                info!(player = %buyer.name, square = %self.name, price = deed.price, "bought");
                LandingOutcome::Bought { price: deed.price }
            }
            Some(owner) if owner == player => LandingOutcome::OwnProperty,
            Some(owner) => {
                let (payer, payee) = ctx.players.pair_mut(player, owner);
                payer.money -= deed.rent;
                payee.money += deed.rent;
                debug!(payer = %payer.name, owner = %payee.name, rent = deed.rent, "rent paid");
                LandingOutcome::PaidRent {
                    owner,
                    rent: deed.rent,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ScriptedRandom;
    use crate::rules::ScriptedDecisions;

    struct Ctx {
        players: PlayerMap<Player>,
        rng: ScriptedRandom,
        decisions: ScriptedDecisions,
        config: GameConfig,
    }

    impl Ctx {
        fn new(money: &[i64], buy: bool) -> Self {
            let players = money
                .iter()
                .enumerate()
                .map(|(i, m)| Player::new(format!("P{i}"), *m))
                .collect();
            Self {
                players: PlayerMap::from_vec(players),
                rng: ScriptedRandom::default(),
                decisions: ScriptedDecisions::new().buying(buy),
                config: GameConfig::new(),
            }
        }

        fn land(&mut self, square: &mut Square, player: PlayerId) -> LandingOutcome {
            let mut ctx = LandingContext {
                players: &mut self.players,
                rng: &mut self.rng,
                decisions: &mut self.decisions,
                config: &self.config,
            };
            square.land_on(player, &mut ctx)
        }
    }

    const P0: PlayerId = PlayerId::new(0);
    const P1: PlayerId = PlayerId::new(1);

    #[test]
    fn test_classify() {
        assert_eq!(SquareKind::classify("Chance", None, None), SquareKind::Chance);
        assert_eq!(SquareKind::classify("Income Tax", None, None), SquareKind::Tax);
        assert_eq!(SquareKind::classify("Go To Jail", None, None), SquareKind::GoToJail);
        assert_eq!(SquareKind::classify("Go to Jail", None, None), SquareKind::GoToJail);
        assert_eq!(SquareKind::classify("In Jail", None, None), SquareKind::InJail);
        assert_eq!(SquareKind::classify("Go", None, None), SquareKind::Plain);
        assert_eq!(SquareKind::classify("Free Parking", None, None), SquareKind::Plain);
        assert_eq!(
            SquareKind::classify("Boardwalk", Some(400), Some(50)),
            SquareKind::Property(Deed::new(400, 50))
        );
        assert_eq!(SquareKind::classify("Lot", Some(0), Some(5)), SquareKind::Plain);
    }

    #[test]
    fn test_plain_no_effect() {
        let mut ctx = Ctx::new(&[1500, 1500], false);
        let mut go = Square::new("Go", 0, SquareKind::Plain);
        assert_eq!(ctx.land(&mut go, P0), LandingOutcome::NoEffect);
        assert_eq!(ctx.players[P0].money, 1500);
    }

    #[test]
    fn test_property_buy() {
        let mut ctx = Ctx::new(&[500, 1500], true);
        let mut boardwalk = Square::property("Boardwalk", 1, 400, 50);

        assert_eq!(ctx.land(&mut boardwalk, P0), LandingOutcome::Bought { price: 400 });
        assert_eq!(ctx.players[P0].money, 100);
        assert_eq!(boardwalk.owner(), Some(P0));
        assert_eq!(ctx.players[P0].properties, vec![1]);
    }

    #[test]
    fn test_property_declined() {
        let mut ctx = Ctx::new(&[500, 1500], false);
        let mut boardwalk = Square::property("Boardwalk", 1, 400, 50);

        assert_eq!(
            ctx.land(&mut boardwalk, P0),
            LandingOutcome::DeclinedPurchase { price: 400 }
        );
        assert_eq!(ctx.players[P0].money, 500);
        assert_eq!(boardwalk.owner(), None);
    }

    #[test]
    fn test_property_unaffordable_never_asks() {
        let mut ctx = Ctx::new(&[100, 1500], true);
        let mut lot = Square::property("Lot", 1, 300, 30);

        assert_eq!(ctx.land(&mut lot, P0), LandingOutcome::CannotAfford { price: 300 });
        assert_eq!(ctx.players[P0].money, 100);
        assert_eq!(lot.owner(), None);
        assert!(ctx.players[P0].properties.is_empty());
    }

    #[test]
    fn test_rent_transfer_conserves_money() {
        let mut ctx = Ctx::new(&[500, 1000], false);
        let mut boardwalk = Square::property("Boardwalk", 1, 400, 50);
        boardwalk.set_owner(Some(P1));

        assert_eq!(
            ctx.land(&mut boardwalk, P0),
            LandingOutcome::PaidRent { owner: P1, rent: 50 }
        );
        assert_eq!(ctx.players[P0].money, 450);
        assert_eq!(ctx.players[P1].money, 1050);
    }

    #[test]
    fn test_rent_can_bankrupt() {
        let mut ctx = Ctx::new(&[49, 1000], false);
        let mut boardwalk = Square::property("Boardwalk", 1, 400, 50);
        boardwalk.set_owner(Some(P1));

        ctx.land(&mut boardwalk, P0);
        assert_eq!(ctx.players[P0].money, -1);
        assert!(ctx.players[P0].is_bankrupt());
        assert_eq!(ctx.players[P0].money + ctx.players[P1].money, 1049);
    }

    #[test]
    fn test_own_property_no_effect() {
        let mut ctx = Ctx::new(&[500, 1000], false);
        let mut boardwalk = Square::property("Boardwalk", 1, 400, 50);
        boardwalk.set_owner(Some(P0));

        assert_eq!(ctx.land(&mut boardwalk, P0), LandingOutcome::OwnProperty);
        assert_eq!(ctx.players[P0].money, 500);
    }

    #[test]
    fn test_chance_applies_drawn_delta() {
        let mut ctx = Ctx::new(&[1000, 1000], false);
        ctx.rng = ScriptedRandom::default().and_picks([4, 0]);
        let mut chance = Square::new("Chance", 2, SquareKind::Chance);

        assert_eq!(ctx.land(&mut chance, P0), LandingOutcome::Chance { delta: 200 });
        assert_eq!(ctx.players[P0].money, 1200);
        assert_eq!(ctx.land(&mut chance, P0), LandingOutcome::Chance { delta: -300 });
        assert_eq!(ctx.players[P0].money, 900);
    }

    #[test]
    fn test_tax_is_a_tenth_rounded_down() {
        let mut ctx = Ctx::new(&[1000, 999], false);
        let mut tax = Square::new("Income Tax", 3, SquareKind::Tax);

        assert_eq!(ctx.land(&mut tax, P0), LandingOutcome::Tax { amount: 100 });
        assert_eq!(ctx.players[P0].money, 900);
        assert_eq!(ctx.land(&mut tax, P1), LandingOutcome::Tax { amount: 99 });
        assert_eq!(ctx.players[P1].money, 900);
    }

    #[test]
    fn test_tax_on_negative_money_takes_nothing() {
        let mut ctx = Ctx::new(&[-50, 0], false);
        let mut tax = Square::new("Income Tax", 3, SquareKind::Tax);

        assert_eq!(ctx.land(&mut tax, P0), LandingOutcome::Tax { amount: 0 });
        assert_eq!(ctx.players[P0].money, -50);
        assert_eq!(ctx.land(&mut tax, P1), LandingOutcome::Tax { amount: 0 });
        assert_eq!(ctx.players[P1].money, 0);
    }

    #[test]
    fn test_go_to_jail_sets_flag() {
        let mut ctx = Ctx::new(&[1500, 1500], false);
        let mut go_to_jail = Square::new("Go To Jail", 10, SquareKind::GoToJail);

        assert_eq!(ctx.land(&mut go_to_jail, P0), LandingOutcome::SentToJail);
        assert!(ctx.players[P0].in_jail);
        assert_eq!(ctx.players[P0].jail_turns, 0);
    }

    #[test]
    fn test_in_jail_counts_only_jailed() {
        let mut ctx = Ctx::new(&[1500, 1500], false);
        let mut jail = Square::new("In Jail", 11, SquareKind::InJail);
        ctx.players[P0].send_to_jail();

        assert_eq!(ctx.land(&mut jail, P0), LandingOutcome::JailTurnCounted { turns: 1 });
        assert_eq!(ctx.players[P0].jail_turns, 1);
        assert_eq!(ctx.land(&mut jail, P1), LandingOutcome::NoEffect);
        assert_eq!(ctx.players[P1].jail_turns, 0);
    }
}
