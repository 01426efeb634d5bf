//! Ship placement planning and fleet progress.

use alloc::vec::Vec;

use crate::coord::Coord;

/// Axis along which a ship extends from its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "lowercase"))]
pub enum Orientation {
    /// Along the column axis.
    #[default]
    Horizontal,
    /// Along the row axis.
    Vertical,
}

impl Orientation {
    pub fn toggled(self) -> Self {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }

    fn step(self) -> (i64, i64) {
        match self {
            Orientation::Horizontal => (1, 0),
            Orientation::Vertical => (0, 1),
        }
    }
}

/// Cells a ship of `length` would cover from `anchor`.
///
/// Cells are produced in order, stepping +1 along the orientation axis, and
/// the sequence stops at the board edge: it never wraps, so an anchor near
/// the edge yields fewer than `length` cells.
pub fn plan_ship_cells(anchor: Coord, orientation: Orientation, length: usize) -> Vec<Coord> {
    let (dc, dr) = orientation.step();
    (0..length as i64)
        .map_while(|k| anchor.offset(dc * k, dr * k))
        .collect()
}

/// A candidate placement and the cells it covers on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub anchor: Coord,
    pub orientation: Orientation,
    pub length: usize,
    pub cells: Vec<Coord>,
}

impl Placement {
    pub fn plan(anchor: Coord, orientation: Orientation, length: usize) -> Self {
        Self {
            anchor,
            orientation,
            length,
            cells: plan_ship_cells(anchor, orientation, length),
        }
    }

    /// `false` when the board edge cut the ship short.
    pub fn is_complete(&self) -> bool {
        self.cells.len() == self.length
    }
}

/// Length of the ship the authority currently expects, plus the orientation
/// currently selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FleetProgress {
    current: Option<usize>,
    orientation: Orientation,
    placed: usize,
}

impl FleetProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the expected length. A repeated announcement replaces the
    /// previous one.
    pub fn assign(&mut self, size: usize) {
        self.current = Some(size);
    }

    /// Length of the ship to place next.
    pub fn next_size(&self) -> Option<usize> {
        self.current
    }

    /// Record a confirmed placement, returning the length it consumed.
    pub fn confirm(&mut self) -> Option<usize> {
        self.placed += 1;
        self.current.take()
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn toggle_orientation(&mut self) -> Orientation {
        self.orientation = self.orientation.toggled();
        self.orientation
    }

    /// Confirmed placements so far.
    pub fn placed(&self) -> usize {
        self.placed
    }
}
