//! Session lifecycle and turn ownership.
//!
//! ```text
//! Lobby ──▶ MatchSearching ──▶ Placing ──▶ Combat ──▶ Resolved
//!              ▲    ▲             │                      │
//!              │    └─ rejected ──┘                      │
//!              └──────────── new match request ──────────┘
//! ```
//!
//! Every transition except the initial match request is triggered by the
//! authority. Input affordances are derived from this state on demand and
//! never stored separately.

use alloc::string::String;
use core::fmt;

use log::info;

/// Lifecycle stage of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "snake_case"))]
pub enum Phase {
    #[default]
    Lobby,
    MatchSearching,
    Placing,
    Combat,
    Resolved,
}

/// Relative player identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "snake_case"))]
pub enum Side {
    Me,
    Opponent,
}

/// Identity the authority assigns to a player in a game. Text encodings may
/// carry it as a string or an integer; both map onto the same string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlayerId(pub String);

#[cfg(feature = "std")]
impl serde::Serialize for PlayerId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

#[cfg(feature = "std")]
impl<'de> serde::Deserialize<'de> for PlayerId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct IdVisitor;

        impl<'de> serde::de::Visitor<'de> for IdVisitor {
            type Value = PlayerId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a string or integer player id")
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<PlayerId, E> {
                Ok(PlayerId::from(v))
            }

            fn visit_string<E: serde::de::Error>(self, v: String) -> Result<PlayerId, E> {
                Ok(PlayerId(v))
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<PlayerId, E> {
                Ok(PlayerId(v.to_string()))
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<PlayerId, E> {
                Ok(PlayerId(v.to_string()))
            }
        }

        // Binary formats cannot self-describe, so only text gets the integer form.
        if deserializer.is_human_readable() {
            deserializer.deserialize_any(IdVisitor)
        } else {
            deserializer.deserialize_string(IdVisitor)
        }
    }
}

impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        PlayerId(String::from(s))
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Presence of the opponent as reported by the authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "snake_case"))]
pub enum Presence {
    Online,
    #[default]
    Offline,
}

/// What the local player knows about the opponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OpponentStatus {
    pub presence: Presence,
    pub ships_remaining: u32,
}

/// Inputs the UI may offer right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Affordances {
    /// Hover, rotate and place on the own board.
    pub placement: bool,
    /// Click-to-shoot on the opponent board.
    pub shooting: bool,
}

/// Transition rejected by the phase machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    /// `action` is not valid in `phase`.
    NotAllowed { phase: Phase, action: &'static str },
    /// An event named a different game than the one in progress.
    WrongGame,
}

impl fmt::Display for TransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitionError::NotAllowed { phase, action } => {
                write!(f, "{} is not allowed during {:?}", action, phase)
            }
            TransitionError::WrongGame => write!(f, "event refers to a different game"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for TransitionError {}

/// Phase and turn state of one client session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameSession {
    phase: Phase,
    me: Option<PlayerId>,
    game_id: Option<String>,
    turn: Option<Side>,
    channel_joined: bool,
    shot_armed: bool,
    opponent: OpponentStatus,
}

impl GameSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn me(&self) -> Option<&PlayerId> {
        self.me.as_ref()
    }

    pub fn game_id(&self) -> Option<&str> {
        self.game_id.as_deref()
    }

    pub fn turn(&self) -> Option<Side> {
        self.turn
    }

    pub fn opponent(&self) -> OpponentStatus {
        self.opponent
    }

    pub fn is_channel_joined(&self) -> bool {
        self.channel_joined
    }

    /// Map an authority identity onto our relative view.
    pub fn side_of(&self, player: &PlayerId) -> Side {
        match &self.me {
            Some(me) if me == player => Side::Me,
            _ => Side::Opponent,
        }
    }

    pub fn affordances(&self) -> Affordances {
        Affordances {
            placement: self.phase == Phase::Placing && self.channel_joined,
            shooting: self.phase == Phase::Combat
                && self.turn == Some(Side::Me)
                && self.shot_armed,
        }
    }

    fn enter(&mut self, next: Phase) {
        if self.phase != next {
            info!("phase {:?} -> {:?}", self.phase, next);
        }
        self.phase = next;
    }

    fn require(&self, allowed: &[Phase], action: &'static str) -> Result<(), TransitionError> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            Err(TransitionError::NotAllowed {
                phase: self.phase,
                action,
            })
        }
    }

    fn reset_game(&mut self) {
        self.game_id = None;
        self.turn = None;
        self.channel_joined = false;
        self.shot_armed = false;
        self.opponent = OpponentStatus::default();
    }

    /// User asks to be matched. Valid from the lobby or after a finished game.
    pub fn request_match(&mut self) -> Result<(), TransitionError> {
        self.require(&[Phase::Lobby, Phase::Resolved], "match request")?;
        self.reset_game();
        self.me = None;
        self.enter(Phase::MatchSearching);
        Ok(())
    }

    /// Join failed; go back to searching. Valid in any phase.
    pub fn rejoin(&mut self) {
        self.reset_game();
        self.enter(Phase::MatchSearching);
    }

    /// The authority paired us into `game_id` as `me`.
    pub fn match_found(&mut self, game_id: String, me: PlayerId) -> Result<(), TransitionError> {
        self.require(&[Phase::MatchSearching], "game_found")?;
        self.reset_game();
        info!("matched into game {} as {}", game_id, me);
        self.game_id = Some(game_id);
        self.me = Some(me);
        self.enter(Phase::Placing);
        Ok(())
    }

    /// The dedicated game channel acknowledged our join.
    pub fn channel_joined(&mut self, game_id: &str) -> Result<(), TransitionError> {
        self.require(&[Phase::Placing], "channel join")?;
        if self.game_id.as_deref() != Some(game_id) {
            return Err(TransitionError::WrongGame);
        }
        self.channel_joined = true;
        Ok(())
    }

    /// The authority confirmed one of our placements.
    pub fn ship_confirmed(&mut self, last: bool) -> Result<(), TransitionError> {
        self.require(&[Phase::Placing], "ship_placed")?;
        if last {
            self.enter(Phase::Combat);
        }
        Ok(())
    }

    /// Turn ownership changed. Accepted while placing too, since the first
    /// turn may be announced before our last confirmation arrives.
    pub fn turn_changed(&mut self, side: Side) -> Result<(), TransitionError> {
        self.require(&[Phase::Placing, Phase::Combat], "next_turn")?;
        self.turn = Some(side);
        self.shot_armed = side == Side::Me;
        Ok(())
    }

    /// We pushed a shot; no further shots until the next turn.
    pub fn shot_fired(&mut self) -> Result<(), TransitionError> {
        if !self.affordances().shooting {
            return Err(TransitionError::NotAllowed {
                phase: self.phase,
                action: "shoot",
            });
        }
        self.shot_armed = false;
        Ok(())
    }

    /// Shot results are only meaningful during combat.
    pub fn check_shot_result(&self) -> Result<(), TransitionError> {
        self.require(&[Phase::Combat], "shot_result")
    }

    /// A fleet was destroyed.
    pub fn resolve(&mut self) -> Result<(), TransitionError> {
        self.require(&[Phase::Combat], "game_over")?;
        self.shot_armed = false;
        self.enter(Phase::Resolved);
        Ok(())
    }

    /// The authority ended the game out of band (a modal notice). Input for
    /// the current game stops and a new match request becomes valid.
    pub fn abandon(&mut self) {
        if matches!(self.phase, Phase::Placing | Phase::Combat) {
            info!("game {:?} ended by the authority", self.game_id);
            self.turn = None;
            self.shot_armed = false;
            self.channel_joined = false;
            self.enter(Phase::Resolved);
        }
    }

    pub fn update_opponent(&mut self, status: OpponentStatus) {
        self.opponent = status;
    }
}
