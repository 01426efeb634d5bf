//! Validated grid coordinates.
//!
//! A [`Coord`] can only be built through [`Coord::new`] (or the `TryFrom`
//! conversions that call it), so any value of this type is on the board.
//! Authority payloads carry raw `[col, row]` pairs which are converted at the
//! protocol boundary and dropped there when invalid.

use core::fmt;

use crate::common::BoardError;
use crate::config::BOARD_SIZE;

/// Unvalidated `[col, row]` pair as it appears on the wire.
pub type RawCoord = [i64; 2];

/// A cell position, `col` and `row` both in `0..BOARD_SIZE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(into = "RawCoord", try_from = "RawCoord"))]
pub struct Coord {
    col: u8,
    row: u8,
}

impl Coord {
    /// Validate a raw pair.
    pub fn new(col: i64, row: i64) -> Result<Self, BoardError> {
        let max = BOARD_SIZE as i64;
        if (0..max).contains(&col) && (0..max).contains(&row) {
            Ok(Self {
                col: col as u8,
                row: row as u8,
            })
        } else {
            Err(BoardError::OutOfBounds { col, row })
        }
    }

    /// Cell for a row-major index in `0..BOARD_CELLS`.
    pub fn from_index(idx: usize) -> Option<Self> {
        let n = BOARD_SIZE as usize;
        if idx < n * n {
            Some(Self {
                col: (idx % n) as u8,
                row: (idx / n) as u8,
            })
        } else {
            None
        }
    }

    pub fn col(self) -> usize {
        self.col as usize
    }

    pub fn row(self) -> usize {
        self.row as usize
    }

    /// Row-major index.
    pub fn index(self) -> usize {
        self.row() * BOARD_SIZE as usize + self.col()
    }

    /// Offset by `(dc, dr)`, or `None` when that leaves the board.
    pub fn offset(self, dc: i64, dr: i64) -> Option<Self> {
        Self::new(self.col as i64 + dc, self.row as i64 + dr).ok()
    }

    /// Orthogonal neighbours that are on the board.
    pub fn neighbors(self) -> impl Iterator<Item = Coord> {
        [(-1, 0), (1, 0), (0, -1), (0, 1)]
            .into_iter()
            .filter_map(move |(dc, dr)| self.offset(dc, dr))
    }

    /// Every cell on the board in row-major order.
    pub fn all() -> impl Iterator<Item = Coord> {
        (0..crate::config::BOARD_CELLS).filter_map(Coord::from_index)
    }
}

impl TryFrom<RawCoord> for Coord {
    type Error = BoardError;

    fn try_from([col, row]: RawCoord) -> Result<Self, Self::Error> {
        Coord::new(col, row)
    }
}

impl TryFrom<(usize, usize)> for Coord {
    type Error = BoardError;

    /// `(col, row)`.
    fn try_from((col, row): (usize, usize)) -> Result<Self, Self::Error> {
        Coord::new(col as i64, row as i64)
    }
}

impl From<Coord> for RawCoord {
    fn from(c: Coord) -> Self {
        [c.col as i64, c.row as i64]
    }
}

/// Column letter followed by 1-based row, e.g. `C4` for `(2, 3)`.
impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'A' + self.col) as char, self.row + 1)
    }
}
