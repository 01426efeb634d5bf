//! Event router: the single mutation path for session state.
//!
//! Every authority event and every local intent goes through
//! [`EventRouter::dispatch`], one at a time, and yields at most one outbound
//! push. Intents that the current phase or turn does not permit are dropped
//! without a push.

use log::{debug, info, warn};

use crate::board::{Board, BoardKind};
use crate::common::{BoardError, Mark};
use crate::config::BOARD_SIZE;
use crate::coord::{Coord, RawCoord};
use crate::game::{GameSession, OpponentStatus, Phase, Side};
use crate::protocol::{Inbound, Outbound};
use crate::ship::{FleetProgress, Orientation, Placement};
use crate::ui::{HoverPreview, NullPresenter, Presenter, Snapshot};

/// Local user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Start (or restart) matchmaking.
    RequestMatch,
    /// Pointer moved onto a cell of the own board.
    Hover(Coord),
    /// Pointer left the own board.
    HoverLeave,
    ToggleOrientation,
    /// Click on the own board while placing.
    PlaceAt(Coord),
    /// Click on the opponent board while it is our turn.
    ShootAt(Coord),
}

/// One unit of work for the router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Event(Inbound),
    Intent(Intent),
}

impl From<Inbound> for Input {
    fn from(ev: Inbound) -> Self {
        Input::Event(ev)
    }
}

impl From<Intent> for Input {
    fn from(intent: Intent) -> Self {
        Input::Intent(intent)
    }
}

/// Owns the session state, both boards, and the presenter.
pub struct EventRouter<P: Presenter = NullPresenter> {
    session: GameSession,
    own: Board,
    opponent: Board,
    fleet: Option<FleetProgress>,
    preview: HoverPreview,
    presenter: P,
}

impl EventRouter<NullPresenter> {
    pub fn headless() -> Self {
        Self::new(NullPresenter)
    }
}

impl<P: Presenter> EventRouter<P> {
    pub fn new(presenter: P) -> Self {
        Self {
            session: GameSession::new(),
            own: Board::new(),
            opponent: Board::new(),
            fleet: None,
            preview: HoverPreview::new(),
            presenter,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn phase(&self) -> Phase {
        self.session.phase()
    }

    pub fn board(&self, kind: BoardKind) -> &Board {
        match kind {
            BoardKind::Own => &self.own,
            BoardKind::Opponent => &self.opponent,
        }
    }

    pub fn own_board(&self) -> &Board {
        &self.own
    }

    pub fn opponent_board(&self) -> &Board {
        &self.opponent
    }

    /// Placement progress; `None` outside the placement phase.
    pub fn fleet(&self) -> Option<&FleetProgress> {
        self.fleet.as_ref()
    }

    pub fn preview(&self) -> &HoverPreview {
        &self.preview
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn orientation(&self) -> Orientation {
        self.fleet
            .as_ref()
            .map(FleetProgress::orientation)
            .unwrap_or_default()
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        snapshot_of(&self.session, &self.own, &self.opponent, self.fleet.as_ref())
    }

    /// Process one input to completion and redraw.
    pub fn dispatch(&mut self, input: impl Into<Input>) -> Option<Outbound> {
        let out = match input.into() {
            Input::Event(ev) => self.on_event(ev),
            Input::Intent(intent) => self.on_intent(intent),
        };
        if let Some(push) = &out {
            debug!("push {}", push.name());
        }
        let snapshot = snapshot_of(&self.session, &self.own, &self.opponent, self.fleet.as_ref());
        self.presenter.render(&snapshot);
        out
    }

    fn drop_preview(&mut self) {
        if self.preview.is_active() {
            self.preview.leave();
            self.presenter.clear_preview();
        }
    }

    fn on_event(&mut self, ev: Inbound) -> Option<Outbound> {
        let name = ev.name();
        match ev {
            Inbound::GameFound { game_id, player } => {
                if let Err(e) = self.session.match_found(game_id.clone(), player) {
                    warn!("ignoring {}: {}", name, e);
                    return None;
                }
                self.own.clear();
                self.opponent.clear();
                self.fleet = Some(FleetProgress::new());
                self.drop_preview();
                Some(Outbound::JoinGame { game_id })
            }
            Inbound::ChannelJoined { game_id } => {
                match self.session.channel_joined(&game_id) {
                    Ok(()) => info!("joined game channel game:{}", game_id),
                    Err(e) => warn!("ignoring {}: {}", name, e),
                }
                None
            }
            Inbound::ChannelRejected { game_id, reason } => {
                if self.session.game_id() != Some(game_id.as_str()) {
                    warn!("ignoring {} for stale game {}", name, game_id);
                    return None;
                }
                warn!(
                    "game channel game:{} refused join: {}",
                    game_id,
                    reason.as_deref().unwrap_or("no reason given")
                );
                self.rejoin()
            }
            Inbound::UnableToJoin => {
                warn!("authority reported unable_to_join; searching again");
                self.rejoin()
            }
            Inbound::GameStarted => {
                self.presenter.hide_opponent_status();
                None
            }
            Inbound::PlaceShip { size } => {
                self.assign_size(size);
                None
            }
            Inbound::ShipPlaced { coordinates, last } => {
                if let Err(e) = self.session.ship_confirmed(last) {
                    warn!("ignoring {}: {}", name, e);
                    return None;
                }
                let placed = apply_marks(&mut self.own, &coordinates, Mark::Ship);
                debug!("ship confirmed on {} cells (last: {})", placed, last);
                if last {
                    self.fleet = None;
                    self.drop_preview();
                } else if let Some(fleet) = self.fleet.as_mut() {
                    fleet.confirm();
                }
                None
            }
            Inbound::NextTurn { turn } => {
                let side = self.session.side_of(&turn);
                if let Err(e) = self.session.turn_changed(side) {
                    warn!("ignoring {}: {}", name, e);
                }
                None
            }
            Inbound::ShotResult {
                shooter,
                result,
                coordinates,
            } => {
                if let Err(e) = self.session.check_shot_result() {
                    warn!("ignoring {}: {}", name, e);
                    return None;
                }
                let board = match self.session.side_of(&shooter) {
                    Side::Me => &mut self.opponent,
                    Side::Opponent => &mut self.own,
                };
                apply_marks(board, &coordinates, result.mark());
                if result.ends_game() {
                    if let Err(e) = self.session.resolve() {
                        warn!("could not resolve game: {}", e);
                    }
                    self.drop_preview();
                }
                None
            }
            Inbound::Message { message, kind } => {
                self.presenter.message(&message, &kind);
                None
            }
            Inbound::ModalMsg { message } => {
                self.session.abandon();
                self.fleet = None;
                self.drop_preview();
                self.presenter.announce(&message);
                None
            }
            Inbound::OpponentUpdate {
                recipient,
                status,
                ships,
            } => {
                if self.session.side_of(&recipient) == Side::Me {
                    let status = OpponentStatus {
                        presence: status,
                        ships_remaining: ships,
                    };
                    self.session.update_opponent(status);
                    self.presenter.opponent(status);
                }
                None
            }
        }
    }

    fn rejoin(&mut self) -> Option<Outbound> {
        self.session.rejoin();
        self.fleet = None;
        self.drop_preview();
        Some(Outbound::FindGame)
    }

    fn assign_size(&mut self, size: usize) {
        if size == 0 || size > BOARD_SIZE as usize {
            warn!("ignoring place_ship with unusable size {}", size);
            return;
        }
        let Some(fleet) = self.fleet.as_mut() else {
            warn!("ignoring place_ship outside placement ({:?})", self.session.phase());
            return;
        };
        fleet.assign(size);
        let orientation = fleet.orientation();
        // The highlight under the pointer should reflect the new length.
        if let Some(len) = fleet.next_size() {
            if let Some(cells) = self.preview.refresh(orientation, len) {
                self.presenter.preview(cells);
            }
        }
    }

    fn on_intent(&mut self, intent: Intent) -> Option<Outbound> {
        let allowed = self.session.affordances();
        match intent {
            Intent::RequestMatch => match self.session.request_match() {
                Ok(()) => {
                    self.own.clear();
                    self.opponent.clear();
                    self.fleet = None;
                    self.drop_preview();
                    Some(Outbound::FindGame)
                }
                Err(e) => {
                    debug!("dropping match request: {}", e);
                    None
                }
            },
            Intent::Hover(at) => {
                let Some((len, orientation)) = self.placing_ship(allowed.placement) else {
                    return None;
                };
                let cells = self.preview.hover(at, orientation, len);
                self.presenter.preview(cells);
                None
            }
            Intent::HoverLeave => {
                self.drop_preview();
                None
            }
            Intent::ToggleOrientation => {
                if !allowed.placement || !self.preview.is_active() {
                    debug!("dropping rotate: no active placement selection");
                    return None;
                }
                let Some(fleet) = self.fleet.as_mut() else {
                    return None;
                };
                let orientation = fleet.toggle_orientation();
                if let Some(len) = fleet.next_size() {
                    if let Some(cells) = self.preview.refresh(orientation, len) {
                        self.presenter.clear_preview();
                        self.presenter.preview(cells);
                    }
                }
                None
            }
            Intent::PlaceAt(at) => {
                let (len, orientation) = self.placing_ship(allowed.placement)?;
                let plan = Placement::plan(at, orientation, len);
                if !plan.is_complete() {
                    debug!(
                        "dropping placement at {}: only {} of {} cells fit",
                        at,
                        plan.cells.len(),
                        len
                    );
                    return None;
                }
                self.presenter.clear_message();
                Some(Outbound::place_ship(at, orientation))
            }
            Intent::ShootAt(at) => match self.session.shot_fired() {
                Ok(()) => Some(Outbound::shoot(at)),
                Err(e) => {
                    debug!("dropping shot at {}: {}", at, e);
                    None
                }
            },
        }
    }

    /// Length and orientation of the ship being placed, if placement input
    /// is currently live and a size has been assigned.
    fn placing_ship(&self, placement_allowed: bool) -> Option<(usize, Orientation)> {
        if !placement_allowed {
            debug!("dropping placement input during {:?}", self.session.phase());
            return None;
        }
        let fleet = self.fleet.as_ref()?;
        let len = fleet.next_size()?;
        Some((len, fleet.orientation()))
    }
}

/// Apply `mark` to every valid coordinate, dropping malformed ones.
/// Returns how many cells changed.
fn apply_marks(board: &mut Board, coordinates: &[RawCoord], mark: Mark) -> usize {
    let mut applied = 0;
    for &[col, row] in coordinates {
        match board.mark_raw(col, row, mark) {
            Ok(()) => applied += 1,
            Err(e @ BoardError::OutOfBounds { .. }) => warn!("dropping coordinate: {}", e),
            Err(e) => debug!("mark rejected: {}", e),
        }
    }
    applied
}

fn snapshot_of<'a>(
    session: &GameSession,
    own: &'a Board,
    opponent: &'a Board,
    fleet: Option<&FleetProgress>,
) -> Snapshot<'a> {
    Snapshot {
        phase: session.phase(),
        turn: session.turn(),
        own,
        opponent,
        affordances: session.affordances(),
        next_size: fleet.and_then(FleetProgress::next_size),
        orientation: fleet.map(FleetProgress::orientation).unwrap_or_default(),
    }
}
