//! Presentation seam: everything the router reports to whatever draws the
//! boards. Implementations hold no game state; they only reflect what they
//! are handed.

use alloc::vec::Vec;

use crate::board::Board;
use crate::coord::Coord;
use crate::game::{Affordances, OpponentStatus, Phase, Side};
use crate::ship::{plan_ship_cells, Orientation};

/// Borrowed view of the session handed to a [`Presenter`] after each input.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub phase: Phase,
    pub turn: Option<Side>,
    pub own: &'a Board,
    pub opponent: &'a Board,
    pub affordances: Affordances,
    pub next_size: Option<usize>,
    pub orientation: Orientation,
}

/// Sink for visual updates.
pub trait Presenter {
    /// Redraw from the current model.
    fn render(&mut self, snapshot: &Snapshot<'_>);

    /// Highlight the cells of a candidate placement.
    fn preview(&mut self, _cells: &[Coord]) {}

    fn clear_preview(&mut self) {}

    /// Advisory text from the authority.
    fn message(&mut self, _text: &str, _kind: &str) {}

    fn clear_message(&mut self) {}

    /// Prominent announcement (end of game, fatal notices).
    fn announce(&mut self, _text: &str) {}

    fn opponent(&mut self, _status: OpponentStatus) {}

    /// The opponent is present; the waiting indicator can go.
    fn hide_opponent_status(&mut self) {}
}

/// Presenter that draws nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn render(&mut self, _snapshot: &Snapshot<'_>) {}
}

impl<P: Presenter + ?Sized> Presenter for alloc::boxed::Box<P> {
    fn render(&mut self, snapshot: &Snapshot<'_>) {
        (**self).render(snapshot)
    }
    fn preview(&mut self, cells: &[Coord]) {
        (**self).preview(cells)
    }
    fn clear_preview(&mut self) {
        (**self).clear_preview()
    }
    fn message(&mut self, text: &str, kind: &str) {
        (**self).message(text, kind)
    }
    fn clear_message(&mut self) {
        (**self).clear_message()
    }
    fn announce(&mut self, text: &str) {
        (**self).announce(text)
    }
    fn opponent(&mut self, status: OpponentStatus) {
        (**self).opponent(status)
    }
    fn hide_opponent_status(&mut self) {
        (**self).hide_opponent_status()
    }
}

/// Transient placement highlight under the pointer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HoverPreview {
    anchor: Option<Coord>,
    cells: Vec<Coord>,
}

impl HoverPreview {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer entered `anchor`; returns the cells to highlight.
    pub fn hover(&mut self, anchor: Coord, orientation: Orientation, length: usize) -> &[Coord] {
        self.anchor = Some(anchor);
        self.cells = plan_ship_cells(anchor, orientation, length);
        &self.cells
    }

    /// Recompute from the same anchor, e.g. after a rotation. `None` when
    /// nothing is hovered.
    pub fn refresh(&mut self, orientation: Orientation, length: usize) -> Option<&[Coord]> {
        let anchor = self.anchor?;
        Some(self.hover(anchor, orientation, length))
    }

    pub fn leave(&mut self) {
        self.anchor = None;
        self.cells.clear();
    }

    pub fn anchor(&self) -> Option<Coord> {
        self.anchor
    }

    pub fn cells(&self) -> &[Coord] {
        &self.cells
    }

    pub fn is_active(&self) -> bool {
        self.anchor.is_some()
    }
}
