//! Fixed-size cell sets packed into an unsigned integer.
//!
//! A `BitBoard<T, N>` stores one bit per cell of an `N×N` grid in `T`. The
//! board model keeps one of these per [`Mark`](crate::Mark), which keeps a
//! whole board `Copy` and makes set queries single integer operations.

use core::ops::{BitAnd, BitOr, Not};
use core::{fmt, mem};
use num_traits::{PrimInt, Unsigned, Zero};

use crate::config::BOARD_SIZE;
use crate::coord::Coord;

/// Bitboard sized for the game grid.
pub type Grid = BitBoard<u128, { BOARD_SIZE as usize }>;

/// Errors returned by bitboard operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BitBoardError {
    /// `N*N` does not fit in `T`.
    SizeTooLarge { n: usize, capacity: usize },
    /// Coordinate lies outside `N×N`.
    IndexOutOfBounds { col: usize, row: usize },
}

impl fmt::Display for BitBoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BitBoardError::SizeTooLarge { n, capacity } => {
                write!(f, "SizeTooLarge: N*N={} exceeds T::BITS={}", n * n, capacity)
            }
            BitBoardError::IndexOutOfBounds { col, row } => {
                write!(f, "IndexOutOfBounds: col={}, row={}", col, row)
            }
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub struct BitBoard<T, const N: usize>
where
    T: PrimInt + Unsigned + Zero,
{
    bits: T,
}

impl<T, const N: usize> BitBoard<T, N>
where
    T: PrimInt + Unsigned + Zero,
{
    const CELLS: usize = N * N;

    #[inline]
    fn mask() -> T {
        if Self::CELLS == mem::size_of::<T>() * 8 {
            !T::zero()
        } else {
            (T::one() << Self::CELLS) - T::one()
        }
    }

    /// Empty set.
    #[inline]
    pub fn new() -> Self {
        Self { bits: T::zero() }
    }

    /// Empty set, checking that `N×N` fits in `T`.
    pub fn try_new() -> Result<Self, BitBoardError> {
        let capacity = mem::size_of::<T>() * 8;
        if Self::CELLS > capacity {
            Err(BitBoardError::SizeTooLarge { n: N, capacity })
        } else {
            Ok(Self::new())
        }
    }

    #[inline]
    fn bit(at: Coord) -> Result<T, BitBoardError> {
        if at.col() >= N || at.row() >= N {
            return Err(BitBoardError::IndexOutOfBounds {
                col: at.col(),
                row: at.row(),
            });
        }
        Ok(T::one() << (at.row() * N + at.col()))
    }

    pub fn contains(&self, at: Coord) -> Result<bool, BitBoardError> {
        Ok(self.bits & Self::bit(at)? != T::zero())
    }

    pub fn insert(&mut self, at: Coord) -> Result<(), BitBoardError> {
        self.bits = self.bits | Self::bit(at)?;
        Ok(())
    }

    pub fn remove(&mut self, at: Coord) -> Result<(), BitBoardError> {
        self.bits = self.bits & !Self::bit(at)?;
        Ok(())
    }

    pub fn count_ones(&self) -> usize {
        self.bits.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_zero()
    }

    pub fn clear(&mut self) {
        self.bits = T::zero();
    }

    /// Set built from a sequence of cells.
    pub fn from_cells<I>(cells: I) -> Result<Self, BitBoardError>
    where
        I: IntoIterator<Item = Coord>,
    {
        let mut board = Self::new();
        for c in cells {
            board.insert(c)?;
        }
        Ok(board)
    }

    /// Member cells in row-major order.
    pub fn cells(&self) -> Cells<T, N> {
        Cells {
            bits: self.bits,
            idx: 0,
        }
    }
}

impl<T, const N: usize> Default for BitBoard<T, N>
where
    T: PrimInt + Unsigned + Zero,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> fmt::Debug for BitBoard<T, N>
where
    T: PrimInt + Unsigned + Zero,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.cells()).finish()
    }
}

/// Iterator over the member cells of a bitboard.
#[derive(Clone, Copy)]
pub struct Cells<T, const N: usize> {
    bits: T,
    idx: usize,
}

impl<T, const N: usize> Iterator for Cells<T, N>
where
    T: PrimInt + Unsigned + Zero,
{
    type Item = Coord;

    fn next(&mut self) -> Option<Coord> {
        while self.idx < N * N {
            let idx = self.idx;
            self.idx += 1;
            if (self.bits >> idx) & T::one() != T::zero() {
                // Cells beyond the game grid cannot be expressed as a Coord.
                if let Ok(c) = Coord::new((idx % N) as i64, (idx / N) as i64) {
                    return Some(c);
                }
            }
        }
        None
    }
}

impl<T, const N: usize> BitAnd for BitBoard<T, N>
where
    T: PrimInt + Unsigned + Zero,
{
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        Self {
            bits: self.bits & rhs.bits,
        }
    }
}

impl<T, const N: usize> BitOr for BitBoard<T, N>
where
    T: PrimInt + Unsigned + Zero,
{
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self {
            bits: self.bits | rhs.bits,
        }
    }
}

/// Complement within the `N×N` cells.
impl<T, const N: usize> Not for BitBoard<T, N>
where
    T: PrimInt + Unsigned + Zero,
{
    type Output = Self;
    fn not(self) -> Self {
        Self {
            bits: !self.bits & Self::mask(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(col: i64, row: i64) -> Coord {
        Coord::new(col, row).unwrap()
    }

    #[test]
    fn grid_fits_in_u128() {
        assert!(Grid::try_new().is_ok());
        assert!(matches!(
            BitBoard::<u64, 10>::try_new(),
            Err(BitBoardError::SizeTooLarge { .. })
        ));
    }

    #[test]
    fn insert_remove_contains() {
        let mut g = Grid::new();
        g.insert(c(3, 7)).unwrap();
        assert!(g.contains(c(3, 7)).unwrap());
        assert!(!g.contains(c(7, 3)).unwrap());
        g.remove(c(3, 7)).unwrap();
        assert!(g.is_empty());
    }

    #[test]
    fn small_board_rejects_large_coords() {
        let mut small = BitBoard::<u16, 4>::new();
        assert_eq!(
            small.insert(c(5, 0)),
            Err(BitBoardError::IndexOutOfBounds { col: 5, row: 0 })
        );
    }

    #[test]
    fn complement_stays_within_board() {
        let g = Grid::from_cells([c(0, 0), c(9, 9)]).unwrap();
        let inv = !g;
        assert_eq!(inv.count_ones(), 98);
        assert_eq!((g | inv).count_ones(), 100);
        assert!((g & inv).is_empty());
    }

    #[test]
    fn cells_are_row_major() {
        let g = Grid::from_cells([c(4, 1), c(1, 0), c(0, 1)]).unwrap();
        let cells: Vec<_> = g.cells().collect();
        assert_eq!(cells, vec![c(1, 0), c(0, 1), c(4, 1)]);
    }
}
