//! Local view of a single board: one bitboard per mark.

use alloc::vec::Vec;
use core::fmt;

use crate::bitboard::Grid;
use crate::common::{BoardError, Mark};
use crate::config::BOARD_SIZE;
use crate::coord::Coord;

/// Which of the two boards a mark applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "snake_case"))]
pub enum BoardKind {
    Own,
    Opponent,
}

/// Marks on one player's grid. A cell holds exactly one mark; cells in none
/// of the sets are [`Mark::Empty`].
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct Board {
    ships: Grid,
    hits: Grid,
    misses: Grid,
    destroyed: Grid,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    fn set_for(&self, mark: Mark) -> Option<&Grid> {
        match mark {
            Mark::Empty => None,
            Mark::Ship => Some(&self.ships),
            Mark::Hit => Some(&self.hits),
            Mark::Miss => Some(&self.misses),
            Mark::Destroyed => Some(&self.destroyed),
        }
    }

    fn set_for_mut(&mut self, mark: Mark) -> Option<&mut Grid> {
        match mark {
            Mark::Empty => None,
            Mark::Ship => Some(&mut self.ships),
            Mark::Hit => Some(&mut self.hits),
            Mark::Miss => Some(&mut self.misses),
            Mark::Destroyed => Some(&mut self.destroyed),
        }
    }

    fn occupied(&self) -> Grid {
        self.ships | self.hits | self.misses | self.destroyed
    }

    /// Current mark of a cell.
    pub fn mark_at(&self, at: Coord) -> Mark {
        for mark in [Mark::Destroyed, Mark::Hit, Mark::Miss, Mark::Ship] {
            if self
                .set_for(mark)
                .is_some_and(|g| g.contains(at).unwrap_or(false))
            {
                return mark;
            }
        }
        Mark::Empty
    }

    /// Set the mark of a cell.
    ///
    /// Terminal marks (`Hit`, `Miss`, `Destroyed`) are never reverted; the one
    /// permitted change is upgrading `Hit` to `Destroyed`. A rejected change
    /// leaves the board untouched.
    pub fn mark_cell(&mut self, at: Coord, mark: Mark) -> Result<(), BoardError> {
        let existing = self.mark_at(at);
        if !existing.accepts(mark) {
            return Err(BoardError::TerminalMark {
                at,
                existing,
                requested: mark,
            });
        }
        if let Some(g) = self.set_for_mut(existing) {
            g.remove(at)?;
        }
        if let Some(g) = self.set_for_mut(mark) {
            g.insert(at)?;
        }
        Ok(())
    }

    /// [`mark_cell`](Self::mark_cell) for an unvalidated `(col, row)` pair.
    /// Out-of-range pairs are rejected before the board is touched.
    pub fn mark_raw(&mut self, col: i64, row: i64, mark: Mark) -> Result<(), BoardError> {
        let at = Coord::new(col, row)?;
        self.mark_cell(at, mark)
    }

    /// All cells currently holding `mark`, row-major.
    pub fn cells_with_mark(&self, mark: Mark) -> Vec<Coord> {
        match self.set_for(mark) {
            Some(g) => g.cells().collect(),
            None => (!self.occupied()).cells().collect(),
        }
    }

    /// Number of cells holding `mark`.
    pub fn count(&self, mark: Mark) -> usize {
        match self.set_for(mark) {
            Some(g) => g.count_ones(),
            None => (!self.occupied()).count_ones(),
        }
    }

    /// Whether the cell has been shot at (hit, miss, or destroyed).
    pub fn is_resolved(&self, at: Coord) -> bool {
        self.mark_at(at).is_terminal()
    }

    /// Reset every cell to empty.
    pub fn clear(&mut self) {
        *self = Self::new();
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Board")
            .field("ships", &self.ships)
            .field("hits", &self.hits)
            .field("misses", &self.misses)
            .field("destroyed", &self.destroyed)
            .finish()
    }
}

/// Grid with column letters and 1-based row numbers.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "   ")?;
        for c in 0..BOARD_SIZE {
            write!(f, " {}", (b'A' + c) as char)?;
        }
        writeln!(f)?;
        for r in 0..BOARD_SIZE as i64 {
            write!(f, "{:2} ", r + 1)?;
            for c in 0..BOARD_SIZE as i64 {
                let glyph = Coord::new(c, r)
                    .map(|at| self.mark_at(at).glyph())
                    .unwrap_or(' ');
                write!(f, " {}", glyph)?;
            }
            if r + 1 < BOARD_SIZE as i64 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(col: i64, row: i64) -> Coord {
        Coord::new(col, row).unwrap()
    }

    #[test]
    fn new_board_is_empty() {
        let b = Board::new();
        assert_eq!(b.count(Mark::Empty), 100);
        assert_eq!(b.mark_at(c(4, 4)), Mark::Empty);
    }

    #[test]
    fn ship_then_hit_then_destroyed() {
        let mut b = Board::new();
        b.mark_cell(c(1, 1), Mark::Ship).unwrap();
        b.mark_cell(c(1, 1), Mark::Hit).unwrap();
        assert_eq!(b.mark_at(c(1, 1)), Mark::Hit);
        assert_eq!(b.count(Mark::Ship), 0);
        b.mark_cell(c(1, 1), Mark::Destroyed).unwrap();
        assert_eq!(b.cells_with_mark(Mark::Destroyed), vec![c(1, 1)]);
        assert_eq!(b.count(Mark::Hit), 0);
    }

    #[test]
    fn miss_is_never_reverted() {
        let mut b = Board::new();
        b.mark_cell(c(0, 0), Mark::Miss).unwrap();
        let before = b;
        for mark in [Mark::Empty, Mark::Ship, Mark::Hit, Mark::Destroyed] {
            assert!(matches!(
                b.mark_cell(c(0, 0), mark),
                Err(BoardError::TerminalMark { existing: Mark::Miss, .. })
            ));
        }
        assert_eq!(b, before);
    }

    #[test]
    fn raw_out_of_range_is_rejected() {
        let mut b = Board::new();
        assert_eq!(
            b.mark_raw(10, 3, Mark::Hit),
            Err(BoardError::OutOfBounds { col: 10, row: 3 })
        );
        assert_eq!(b, Board::new());
    }

    #[test]
    fn empty_cells_are_the_complement() {
        let mut b = Board::new();
        b.mark_cell(c(2, 2), Mark::Ship).unwrap();
        b.mark_cell(c(3, 2), Mark::Miss).unwrap();
        let empty = b.cells_with_mark(Mark::Empty);
        assert_eq!(empty.len(), 98);
        assert!(!empty.contains(&c(2, 2)));
    }

    #[test]
    fn clear_resets() {
        let mut b = Board::new();
        b.mark_cell(c(5, 5), Mark::Hit).unwrap();
        b.clear();
        assert_eq!(b.mark_at(c(5, 5)), Mark::Empty);
    }

    #[test]
    fn display_renders_glyphs() {
        let mut b = Board::new();
        b.mark_cell(c(0, 0), Mark::Ship).unwrap();
        b.mark_cell(c(1, 0), Mark::Miss).unwrap();
        let text = b.to_string();
        let first_row = text.lines().nth(1).unwrap();
        assert!(first_row.starts_with(" 1  S o ."));
    }
}
