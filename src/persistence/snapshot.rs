//! Saved games.
//!
//! A [`Snapshot`] is the full game state in a plain serde shape: squares with
//! their deeds and owners, every player, and the round loop's resume cursor.
//! Owners are written as nested player records and player property lists as
//! square names, so a snapshot reads on its own without the arena indices.
//!
//! Two encodings: pretty JSON (default) and bincode, chosen by
//! [`SnapshotFormat`]. Files are written to a sibling temporary file and
//! renamed into place, so a failed save never leaves half a snapshot behind.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::board::{Board, SquareRecord};
use crate::core::{GameConfig, GameRng, GameRngState, Player, PlayerId, PlayerMap, RandomSource};
use crate::error::SnapshotError;
use crate::rules::GameEngine;

/// A player as written in a snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub name: String,
    pub money: i64,
    pub position: usize,
    /// Names of owned property squares, in purchase order.
    #[serde(default)]
    pub properties: Vec<String>,
    #[serde(default)]
    pub in_jail: bool,
    #[serde(default)]
    pub jail_turns: u8,
}

impl PlayerSnapshot {
    fn of(player: &Player, board: &Board) -> Self {
        Self {
            name: player.name.clone(),
            money: player.money,
            position: player.position,
            properties: player
                .properties
                .iter()
                .filter_map(|p| board.square(*p).map(|s| s.name.clone()))
                .collect(),
            in_jail: player.in_jail,
            jail_turns: player.jail_turns,
        }
    }

    fn to_player(&self) -> Player {
        Player {
            name: self.name.clone(),
            money: self.money,
            position: self.position,
            properties: Vec::new(),
            in_jail: self.in_jail,
            jail_turns: self.jail_turns,
        }
    }
}

/// A square as written in a snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SquareSnapshot {
    pub name: String,
    pub position: usize,
    #[serde(default)]
    pub price: Option<i64>,
    #[serde(default)]
    pub rent: Option<i64>,
    #[serde(default)]
    pub owner: Option<PlayerSnapshot>,
}

fn first_round() -> u32 {
    1
}

/// Full game state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub board: Vec<SquareSnapshot>,
    pub players: Vec<PlayerSnapshot>,
    /// Names of players still taking turns. Absent means all of `players`.
    #[serde(default)]
    pub active: Option<Vec<String>>,
    #[serde(default = "first_round")]
    pub round: u32,
    /// Index into the active list of the next turn this round.
    #[serde(default)]
    pub turn_index: usize,
    #[serde(default)]
    pub rng: Option<GameRngState>,
    #[serde(default)]
    pub config: Option<GameConfig>,
}

/// On-disk encoding of a snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SnapshotFormat {
    Json,
    /// bincode
    Binary,
}

impl SnapshotFormat {
    /// `.bin` files are binary, everything else JSON.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("bin") => SnapshotFormat::Binary,
            _ => SnapshotFormat::Json,
        }
    }
}

impl Snapshot {
    /// Capture the complete state of `engine`.
    pub fn capture<R: RandomSource>(engine: &GameEngine<R>) -> Self {
        let board = engine.board();
        let players = engine.players();

        let squares = board
            .squares()
            .iter()
            .map(|square| SquareSnapshot {
                name: square.name.clone(),
                position: square.position,
                price: square.deed().map(|d| d.price),
                rent: square.deed().map(|d| d.rent),
                owner: square.owner().map(|id| PlayerSnapshot::of(&players[id], board)),
            })
            .collect();

        Self {
            board: squares,
            players: players.iter().map(|(_, p)| PlayerSnapshot::of(p, board)).collect(),
            active: Some(
                engine
                    .active()
                    .iter()
                    .map(|id| players[*id].name.clone())
                    .collect(),
            ),
            round: engine.round(),
            turn_index: engine.turn_index(),
            rng: engine.rng_state(),
            config: Some(engine.config().clone()),
        }
    }

    /// Rebuild an engine from this snapshot.
    ///
    /// Property deeds are authoritative: player property lists keep their
    /// order where they agree with the deeds, and are corrected where they
    /// do not.
    pub fn restore(self) -> Result<GameEngine<GameRng>, SnapshotError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let records = self
            .board
            .iter()
            .map(|s| SquareRecord::new(s.position, s.name.clone(), s.price, s.rent))
            .collect();
        let mut board = Board::from_records(records)?;

        let mut players: Vec<Player> = Vec::with_capacity(self.players.len());
        let mut listed: Vec<Vec<String>> = Vec::with_capacity(self.players.len());
        let mut by_name: FxHashMap<String, PlayerId> = FxHashMap::default();
        for record in self.players.iter().chain(self.board.iter().filter_map(|s| s.owner.as_ref())) {
            if by_name.contains_key(&record.name) {
                continue;
            }
            if record.position >= board.len() {
                return Err(SnapshotError::Inconsistent(format!(
                    "player {:?} stands on position {}, the board has {} squares",
                    record.name,
                    record.position,
                    board.len()
                )));
            }
            if players.len() >= 255 {
                return Err(SnapshotError::Inconsistent("more than 255 players".to_string()));
            }
            by_name.insert(record.name.clone(), PlayerId::new(players.len() as u8));
            players.push(record.to_player());
            listed.push(record.properties.clone());
        }
        for (i, record) in self.players.iter().enumerate() {
            if self.players[..i].iter().any(|p| p.name == record.name) {
                return Err(SnapshotError::Inconsistent(format!(
                    "player name {:?} appears twice",
                    record.name
                )));
            }
        }
        let names: Vec<&str> = self.players.iter().map(|p| p.name.as_str()).collect();
        config.validate_names(&names)?;
        let mut players = PlayerMap::from_vec(players);

        for square in &self.board {
            if let Some(owner) = &square.owner {
                let id = by_name[&owner.name];
                if !board.assign_owner(square.position, id, &mut players) {
                    return Err(SnapshotError::Inconsistent(format!(
                        "square {:?} has an owner but is not a property",
                        square.name
                    )));
                }
            }
        }
        for (id, names) in listed.iter().enumerate() {
            let id = PlayerId::new(id as u8);
            reorder_properties(&board, &mut players[id], names);
        }

        let active = match &self.active {
            Some(names) => names
                .iter()
                .map(|name| {
                    by_name.get(name).copied().ok_or_else(|| {
                        SnapshotError::Inconsistent(format!("active player {name:?} is unknown"))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?,
            None => (0..self.players.len()).map(|i| PlayerId::new(i as u8)).collect(),
        };

        if let Some((_, &twice)) = active.iter().enumerate().find(|&(i, id)| active[..i].contains(id)) {
            return Err(SnapshotError::Inconsistent(format!(
                "active player {:?} is listed twice",
                players[twice].name
            )));
        }

        let rng = match (&self.rng, config.seed) {
            (Some(state), _) => GameRng::from_state(state),
            (None, Some(seed)) => GameRng::new(seed),
            (None, None) => GameRng::from_entropy(),
        };

        info!(
            players = players.player_count(),
            active = active.len(),
            round = self.round,
            "game restored"
        );
        Ok(GameEngine::from_parts(
            config,
            board,
            players,
            active,
            self.round,
            self.turn_index,
            rng,
        ))
    }

    /// Encode to `writer`.
    pub fn to_writer<W: Write>(&self, writer: W, format: SnapshotFormat) -> Result<(), SnapshotError> {
        match format {
            SnapshotFormat::Json => serde_json::to_writer_pretty(writer, self)?,
            SnapshotFormat::Binary => bincode::serialize_into(writer, self)?,
        }
        Ok(())
    }

    /// Decode from `reader`.
    pub fn from_reader<R: Read>(reader: R, format: SnapshotFormat) -> Result<Self, SnapshotError> {
        Ok(match format {
            SnapshotFormat::Json => serde_json::from_reader(reader)?,
            SnapshotFormat::Binary => bincode::deserialize_from(reader)?,
        })
    }

    /// Write to `path`, format chosen by extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        let path = path.as_ref();
        let tmp = temp_path(path);
        let io_err = |source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        };

        let file = File::create(&tmp).map_err(io_err)?;
        let mut writer = BufWriter::new(file);
        self.to_writer(&mut writer, SnapshotFormat::from_path(path))?;
        writer.flush().map_err(io_err)?;
        drop(writer);
        fs::rename(&tmp, path).map_err(io_err)?;

        info!(path = %path.display(), "game saved");
        Ok(())
    }

    /// Read from `path`, format chosen by extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(BufReader::new(file), SnapshotFormat::from_path(path))
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Keep the listed order for properties the deeds confirm, then append
/// owned properties the list missed.
fn reorder_properties(board: &Board, player: &mut Player, listed: &[String]) {
    let owned = std::mem::take(&mut player.properties);
    for name in listed {
        match board.position_of(name) {
            Some(p) if owned.contains(&p) && !player.owns(p) => player.properties.push(p),
            _ => warn!(player = %player.name, property = %name, "listed property not owned, dropped"),
        }
    }
    for p in owned {
        if !player.owns(p) {
            warn!(player = %player.name, position = p, "owned property missing from list, added");
            player.properties.push(p);
        }
    }
}

impl<R: RandomSource> GameEngine<R> {
    /// Full state, ready to save.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(self)
    }
}

impl GameEngine<GameRng> {
    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self, SnapshotError> {
        snapshot.restore()
    }
}

/// Capture `engine` and write it to `path`.
pub fn save_game<R: RandomSource>(engine: &GameEngine<R>, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
    Snapshot::capture(engine).save(path)
}

/// Read `path` and rebuild the engine.
pub fn load_game(path: impl AsRef<Path>) -> Result<GameEngine<GameRng>, SnapshotError> {
    Snapshot::load(path)?.restore()
}
