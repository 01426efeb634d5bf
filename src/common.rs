//! Common types for the board model: cell marks and board errors.

use crate::bitboard::BitBoardError;
use crate::coord::Coord;

/// State tag of a single board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "snake_case"))]
pub enum Mark {
    Empty,
    Ship,
    Hit,
    Miss,
    Destroyed,
}

impl Mark {
    /// Every mark, in display precedence order.
    pub const ALL: [Mark; 5] = [
        Mark::Empty,
        Mark::Ship,
        Mark::Hit,
        Mark::Miss,
        Mark::Destroyed,
    ];

    /// Hit, miss and destroyed are never reverted once set.
    pub fn is_terminal(self) -> bool {
        matches!(self, Mark::Hit | Mark::Miss | Mark::Destroyed)
    }

    /// Whether a cell currently holding `self` may be overwritten by `next`.
    /// The only transition out of a terminal mark is `Hit -> Destroyed`.
    pub fn accepts(self, next: Mark) -> bool {
        !self.is_terminal() || (self == Mark::Hit && next == Mark::Destroyed)
    }

    /// Single-character glyph used by the terminal view.
    pub fn glyph(self) -> char {
        match self {
            Mark::Empty => '.',
            Mark::Ship => 'S',
            Mark::Hit => 'X',
            Mark::Miss => 'o',
            Mark::Destroyed => '#',
        }
    }
}

/// Errors returned by board operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// Underlying bitboard error.
    BitBoardError(BitBoardError),
    /// Raw coordinate outside the grid.
    OutOfBounds { col: i64, row: i64 },
    /// Cell already holds a terminal mark that `requested` may not replace.
    TerminalMark {
        at: Coord,
        existing: Mark,
        requested: Mark,
    },
}

impl From<BitBoardError> for BoardError {
    fn from(err: BitBoardError) -> Self {
        BoardError::BitBoardError(err)
    }
}

impl core::fmt::Display for BoardError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BoardError::BitBoardError(e) => write!(f, "BitBoard error: {}", e),
            BoardError::OutOfBounds { col, row } => {
                write!(f, "Coordinate ({}, {}) is outside the board", col, row)
            }
            BoardError::TerminalMark {
                at,
                existing,
                requested,
            } => write!(
                f,
                "Cell {} already marked {:?}; refusing {:?}",
                at, existing, requested
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BoardError {}
