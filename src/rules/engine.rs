//! The round loop.
//!
//! `GameEngine` owns the board, the player arena, the active list and the
//! dice. A round gives every active player one turn in list order. After
//! each turn bankrupt players leave the active list for good, and the game
//! ends when one player remains or the round limit has been played.
//!
//! Saving is cooperative: at the start of each turn the engine asks
//! [`Decisions::save_or_continue`]. On `true` it stops before that turn and
//! remembers where it stopped, so a snapshot taken now resumes with the same
//! player.

use std::cmp::Reverse;

use tracing::{debug, info};

use super::decisions::Decisions;
use super::turn::{TurnContext, TurnController, TurnReport};
use crate::board::Board;
use crate::core::{GameConfig, GameRng, GameRngState, Player, PlayerId, PlayerMap, RandomSource};
use crate::error::ConfigError;

/// A player's final position in a game decided on standings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Standing {
    pub player: PlayerId,
    pub name: String,
    pub money: i64,
}

/// Result of a completed game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameResult {
    /// Every other player went bankrupt.
    Winner(PlayerId),
    /// The round limit was reached. Richest first; ties keep turn order.
    RoundLimit(Vec<Standing>),
}

impl GameResult {
    /// Check if a player won: the sole survivor, or the richest at the limit.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        match self {
            GameResult::Winner(p) => *p == player,
            GameResult::RoundLimit(standings) => standings.first().is_some_and(|s| s.player == player),
        }
    }
}

/// Where the round loop stopped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Finished(GameResult),
    /// A player asked to save; the loop halted before their turn.
    Suspended,
}

/// Outcome of [`GameEngine::play_round`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundEnd {
    /// Every active player had a turn.
    Completed,
    /// One player is left.
    LastPlayerStanding,
    /// Halted before a turn at the player's request.
    Suspended,
}

/// Game state plus the round loop.
#[derive(Clone, Debug)]
pub struct GameEngine<R = GameRng> {
    config: GameConfig,
    board: Board,
    players: PlayerMap<Player>,
    active: Vec<PlayerId>,
    round: u32,
    turn_index: usize,
    rng: R,
}

impl GameEngine<GameRng> {
    /// Start a game with dice seeded from `config.seed`, or from the OS.
    pub fn new<S: AsRef<str>>(config: GameConfig, board: Board, names: &[S]) -> Result<Self, ConfigError> {
        let rng = match config.seed {
            Some(seed) => GameRng::new(seed),
            None => GameRng::from_entropy(),
        };
        Self::with_rng(config, board, names, rng)
    }
}

impl<R: RandomSource> GameEngine<R> {
    /// Start a game with the given randomness.
    pub fn with_rng<S: AsRef<str>>(
        config: GameConfig,
        board: Board,
        names: &[S],
        rng: R,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        config.validate_names(names)?;

        let players = PlayerMap::from_vec(
            names
                .iter()
                .map(|n| Player::new(n.as_ref().trim(), config.starting_money))
                .collect(),
        );
        let active = players.player_ids().collect();
        info!(players = names.len(), squares = board.len(), "new game");

        Ok(Self {
            config,
            board,
            players,
            active,
            round: 1,
            turn_index: 0,
            rng,
        })
    }

    /// Reassemble an engine from restored parts. Bankrupt players are
    /// dropped from `active` and the turn cursor is clamped.
    pub(crate) fn from_parts(
        config: GameConfig,
        board: Board,
        players: PlayerMap<Player>,
        active: Vec<PlayerId>,
        round: u32,
        turn_index: usize,
        rng: R,
    ) -> Self {
        let before = active.len();
        let survivors_before_cursor = active
            .iter()
            .take(turn_index)
            .filter(|id| !players[**id].is_bankrupt())
            .count();
        let active: Vec<_> = active.into_iter().filter(|id| !players[*id].is_bankrupt()).collect();
        if active.len() != before {
            debug!(removed = before - active.len(), "dropped bankrupt players on restore");
        }

        Self {
            config,
            board,
            players,
            active,
            round: round.max(1),
            turn_index: survivors_before_cursor,
            rng,
        }
    }

    // === Queries ===

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Every player, bankrupt or not.
    pub fn players(&self) -> &PlayerMap<Player> {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id]
    }

    /// Players still taking turns, in turn order.
    pub fn active(&self) -> &[PlayerId] {
        &self.active
    }

    #[must_use]
    pub fn is_active(&self, id: PlayerId) -> bool {
        self.active.contains(&id)
    }

    /// The round being played, starting at 1.
    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Index into [`active`](Self::active) of the next turn this round.
    #[must_use]
    pub fn turn_index(&self) -> usize {
        self.turn_index
    }

    /// The player whose turn is next.
    #[must_use]
    pub fn next_player(&self) -> Option<PlayerId> {
        self.active.get(self.turn_index).copied()
    }

    pub fn rng(&self) -> &R {
        &self.rng
    }

    /// Dice state for a snapshot, when the randomness supports it.
    #[must_use]
    pub fn rng_state(&self) -> Option<GameRngState> {
        self.rng.checkpoint()
    }

    /// Mutable access for setting up positions in tests and tools.
    pub fn players_mut(&mut self) -> &mut PlayerMap<Player> {
        &mut self.players
    }

    /// Hand the property at `position` to `owner`. Returns `false` when
    /// `position` is not a property.
    pub fn assign_property(&mut self, position: usize, owner: PlayerId) -> bool {
        self.board.assign_owner(position, owner, &mut self.players)
    }

    // === Termination ===

    /// Active players ordered by money, richest first; ties keep turn order.
    #[must_use]
    pub fn standings(&self) -> Vec<Standing> {
        let mut standings: Vec<_> = self
            .active
            .iter()
            .map(|&id| Standing {
                player: id,
                name: self.players[id].name.clone(),
                money: self.players[id].money,
            })
            .collect();
        standings.sort_by_key(|s| Reverse(s.money));
        standings
    }

    /// The result, if the game is over.
    #[must_use]
    pub fn result(&self) -> Option<GameResult> {
        if self.active.len() == 1 {
            Some(GameResult::Winner(self.active[0]))
        } else if self.active.is_empty() || self.round > self.config.max_rounds {
            Some(GameResult::RoundLimit(self.standings()))
        } else {
            None
        }
    }

    // === Play ===

    /// Play one turn for `player`, with no save prompt and no bankruptcy
    /// check.
    pub fn play_turn(&mut self, player: PlayerId, decisions: &mut dyn Decisions) -> TurnReport {
        let controller = TurnController::new(&self.config);
        let mut ctx = TurnContext {
            board: &mut self.board,
            players: &mut self.players,
            rng: &mut self.rng,
            decisions,
        };
        controller.play_turn(&mut ctx, player, self.round)
    }

    /// Remove every active player with negative money. Returns who left.
    pub fn remove_bankrupt(&mut self) -> Vec<PlayerId> {
        let players = &self.players;
        let (gone, kept): (Vec<PlayerId>, Vec<PlayerId>) =
            self.active.iter().partition(|id| players[**id].is_bankrupt());
        for id in &gone {
            info!(player = %self.players[*id].name, money = self.players[*id].money, "bankrupt");
        }
        self.active = kept;
        gone
    }

    /// Play the rest of the current round, starting at the turn cursor.
    pub fn play_round(&mut self, decisions: &mut dyn Decisions) -> RoundEnd {
        debug!(round = self.round, "round start");
        while let Some(id) = self.next_player() {
            if decisions.save_or_continue(&self.players[id]) {
                info!(round = self.round, player = %self.players[id].name, "suspended");
                return RoundEnd::Suspended;
            }

            let report = self.play_turn(id, decisions);
            decisions.report(&report);

            let played = self.active[..=self.turn_index].to_vec();
            self.remove_bankrupt();
            self.turn_index = played.iter().filter(|p| self.active.contains(p)).count();

            if self.active.len() <= 1 {
                return RoundEnd::LastPlayerStanding;
            }
        }

        self.round += 1;
        self.turn_index = 0;
        RoundEnd::Completed
    }

    /// Play rounds until the game ends or a player suspends it.
    pub fn run(&mut self, decisions: &mut dyn Decisions) -> GameStatus {
        loop {
            if let Some(result) = self.result() {
                match &result {
                    GameResult::Winner(id) => info!(winner = %self.players[*id].name, "game over"),
                    GameResult::RoundLimit(_) => info!(rounds = self.config.max_rounds, "round limit reached"),
                }
                return GameStatus::Finished(result);
            }
            if self.play_round(decisions) == RoundEnd::Suspended {
                return GameStatus::Suspended;
            }
        }
    }
}
