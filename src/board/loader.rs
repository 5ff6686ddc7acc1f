//! Board definitions: CSV rows to a validated [`Board`].
//!
//! A definition file has the header `position,name,price,rent`. Empty price
//! and rent cells mean "not a property". Files written by the board designer
//! carry an extra `type` column, which is accepted and used for validation
//! only: a row typed `Property` must have both a price and a rent.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::board::Board;
use super::square::{Square, SquareKind};
use crate::error::BoardError;

/// One row of a board definition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SquareRecord {
    pub position: usize,
    pub name: String,
    #[serde(default)]
    pub price: Option<i64>,
    #[serde(default)]
    pub rent: Option<i64>,
    /// Square type written by the board designer, if any.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

impl SquareRecord {
    pub fn new(position: usize, name: impl Into<String>, price: Option<i64>, rent: Option<i64>) -> Self {
        Self {
            position,
            name: name.into(),
            price,
            rent,
            kind: None,
        }
    }

    /// Validate the row and classify it into a square.
    pub fn into_square(self) -> Result<Square, BoardError> {
        let Self {
            position,
            name,
            price,
            rent,
            kind,
        } = self;

        if name.trim().is_empty() {
            return Err(BoardError::EmptyName { name, position });
        }

        let square_kind = SquareKind::classify(&name, price, rent);
        let typed_property = kind
            .as_deref()
            .is_some_and(|k| k.trim().eq_ignore_ascii_case("Property"));
        let special = !matches!(square_kind, SquareKind::Plain | SquareKind::Property(_));

        if !special {
            match (price, rent) {
                (None, Some(_)) => return Err(BoardError::MissingPrice { name, position }),
                (Some(_), None) => return Err(BoardError::MissingRent { name, position }),
                (None, None) if typed_property => {
                    return Err(BoardError::MissingPrice { name, position })
                }
                (Some(p), Some(r)) if p <= 0 || r <= 0 => {
                    return Err(BoardError::NonPositiveAmount { name, position })
                }
                _ => {}
            }
        }

        Ok(Square::new(name.trim(), position, square_kind))
    }
}

/// Read a board definition from any CSV source.
pub fn read_board<R: Read>(reader: R) -> Result<Board, BoardError> {
    let mut csv = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for row in csv.deserialize::<SquareRecord>() {
        records.push(row?);
    }
    debug!(rows = records.len(), "board definition read");

    Board::from_records(records)
}

/// Load a board definition file.
pub fn load_board(path: impl AsRef<Path>) -> Result<Board, BoardError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| BoardError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_board(file)
}
