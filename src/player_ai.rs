//! Scripted player that drives a session without a human.
//!
//! The autopilot never bypasses the router: it only proposes [`Intent`]s for
//! whatever the current affordances allow, and the router still decides
//! whether they become pushes.

use alloc::vec;
use alloc::vec::Vec;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::common::Mark;
use crate::coord::Coord;
use crate::game::Phase;
use crate::protocol::Inbound;
use crate::router::{EventRouter, Intent};
use crate::ship::{Orientation, Placement};
use crate::ui::Presenter;

/// Extra weight a target gets for each neighbouring hit.
const HIT_BIAS: u32 = 10;

pub struct AutoPilot {
    rng: SmallRng,
    /// Confirmed placement count at the time of our last placement push.
    pending_place: Option<usize>,
}

impl AutoPilot {
    pub fn new(rng: SmallRng) -> Self {
        Self {
            rng,
            pending_place: None,
        }
    }

    /// Reproducible autopilot.
    pub fn seeded(seed: u64) -> Self {
        Self::new(SmallRng::seed_from_u64(seed))
    }

    #[cfg(feature = "std")]
    pub fn from_entropy() -> Self {
        let mut seed_rng = rand::rng();
        Self::new(SmallRng::from_rng(&mut seed_rng))
    }

    /// Feed an inbound event before it is dispatched. A new game or an
    /// error message from the authority releases a pending placement.
    pub fn observe(&mut self, ev: &Inbound) {
        match ev {
            Inbound::GameFound { .. } => self.pending_place = None,
            Inbound::Message { kind, .. } if kind == "error" => self.pending_place = None,
            _ => {}
        }
    }

    /// Intents to dispatch next, in order. Empty when there is nothing to do.
    pub fn plan<P: Presenter>(&mut self, router: &EventRouter<P>) -> Vec<Intent> {
        match router.phase() {
            Phase::Lobby => vec![Intent::RequestMatch],
            Phase::Placing => self.plan_placement(router),
            Phase::Combat => self.plan_shot(router).into_iter().collect(),
            Phase::MatchSearching | Phase::Resolved => Vec::new(),
        }
    }

    fn plan_placement<P: Presenter>(&mut self, router: &EventRouter<P>) -> Vec<Intent> {
        if !router.session().affordances().placement {
            return Vec::new();
        }
        let Some(fleet) = router.fleet() else {
            return Vec::new();
        };
        let Some(len) = fleet.next_size() else {
            return Vec::new();
        };
        if self.pending_place == Some(fleet.placed()) {
            return Vec::new();
        }
        let own = router.own_board();
        let candidates: Vec<Placement> = Coord::all()
            .flat_map(|at| {
                [Orientation::Horizontal, Orientation::Vertical]
                    .into_iter()
                    .map(move |o| Placement::plan(at, o, len))
            })
            .filter(|p| p.is_complete() && p.cells.iter().all(|&c| own.mark_at(c) == Mark::Empty))
            .collect();
        if candidates.is_empty() {
            return Vec::new();
        }
        let pick = &candidates[self.rng.random_range(0..candidates.len())];
        let mut intents = vec![Intent::Hover(pick.anchor)];
        if pick.orientation != router.orientation() {
            intents.push(Intent::ToggleOrientation);
        }
        intents.push(Intent::PlaceAt(pick.anchor));
        self.pending_place = Some(fleet.placed());
        intents
    }

    fn plan_shot<P: Presenter>(&mut self, router: &EventRouter<P>) -> Option<Intent> {
        if !router.session().affordances().shooting {
            return None;
        }
        let board = router.opponent_board();
        let weighted: Vec<(Coord, u32)> = Coord::all()
            .filter(|&at| board.mark_at(at) == Mark::Empty)
            .map(|at| {
                let hits = at
                    .neighbors()
                    .filter(|&n| board.mark_at(n) == Mark::Hit)
                    .count() as u32;
                (at, 1 + HIT_BIAS * hits)
            })
            .collect();
        let total: u32 = weighted.iter().map(|&(_, w)| w).sum();
        if total == 0 {
            return None;
        }
        let mut threshold = self.rng.random_range(0..total);
        for &(at, w) in &weighted {
            if threshold < w {
                return Some(Intent::ShootAt(at));
            }
            threshold -= w;
        }
        None
    }
}
