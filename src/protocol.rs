//! Messages exchanged with the matchmaking/game authority.

use alloc::string::String;
use alloc::vec::Vec;

use crate::common::Mark;
use crate::coord::{Coord, RawCoord};
use crate::game::{PlayerId, Presence};
use crate::ship::Orientation;

/// Outcome of a shot as reported by the authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "snake_case"))]
pub enum ShotOutcome {
    Hit,
    Miss,
    /// The shot destroyed the last ship of a fleet.
    GameOver,
}

impl ShotOutcome {
    /// Mark applied to every affected cell.
    pub fn mark(self) -> Mark {
        match self {
            ShotOutcome::Hit => Mark::Hit,
            ShotOutcome::Miss => Mark::Miss,
            ShotOutcome::GameOver => Mark::Destroyed,
        }
    }

    pub fn ends_game(self) -> bool {
        self == ShotOutcome::GameOver
    }
}

/// Events pushed by the authority on the lobby or game channel.
///
/// Coordinates stay raw here; the router validates each pair and drops the
/// ones that fall outside the board.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "snake_case"))]
pub enum Inbound {
    /// Paired with an opponent; `player` is our identity in the game.
    GameFound { game_id: String, player: PlayerId },
    /// The `game:<id>` channel accepted our join.
    ChannelJoined { game_id: String },
    /// The `game:<id>` channel refused our join.
    ChannelRejected {
        game_id: String,
        reason: Option<String>,
    },
    UnableToJoin,
    /// Both players are present.
    GameStarted,
    /// Length of the next ship to place.
    PlaceShip { size: usize },
    /// One of our placements was accepted.
    ShipPlaced {
        coordinates: Vec<RawCoord>,
        last: bool,
    },
    NextTurn { turn: PlayerId },
    #[cfg_attr(feature = "std", serde(alias = "board_update"))]
    ShotResult {
        shooter: PlayerId,
        result: ShotOutcome,
        coordinates: Vec<RawCoord>,
    },
    /// Advisory text; `kind` is a styling hint such as `info` or `error`.
    Message {
        message: String,
        #[cfg_attr(feature = "std", serde(rename = "type"))]
        kind: String,
    },
    /// Prominent announcement, typically the end-of-game verdict.
    ModalMsg { message: String },
    OpponentUpdate {
        recipient: PlayerId,
        status: Presence,
        ships: u32,
    },
}

impl Inbound {
    /// Wire name of the event.
    pub fn name(&self) -> &'static str {
        match self {
            Inbound::GameFound { .. } => "game_found",
            Inbound::ChannelJoined { .. } => "channel_joined",
            Inbound::ChannelRejected { .. } => "channel_rejected",
            Inbound::UnableToJoin => "unable_to_join",
            Inbound::GameStarted => "game_started",
            Inbound::PlaceShip { .. } => "place_ship",
            Inbound::ShipPlaced { .. } => "ship_placed",
            Inbound::NextTurn { .. } => "next_turn",
            Inbound::ShotResult { .. } => "shot_result",
            Inbound::Message { .. } => "message",
            Inbound::ModalMsg { .. } => "modal_msg",
            Inbound::OpponentUpdate { .. } => "opponent_update",
        }
    }
}

/// Requests pushed by the client. `x` is the column and `y` the row.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "snake_case"))]
pub enum Outbound {
    /// Lobby channel: ask to be matched.
    FindGame,
    /// Join the dedicated `game:<id>` channel.
    JoinGame { game_id: String },
    PlaceShip {
        x: u8,
        y: u8,
        orientation: Orientation,
    },
    Shoot { x: u8, y: u8 },
}

impl Outbound {
    pub fn place_ship(anchor: Coord, orientation: Orientation) -> Self {
        Outbound::PlaceShip {
            x: anchor.col() as u8,
            y: anchor.row() as u8,
            orientation,
        }
    }

    pub fn shoot(target: Coord) -> Self {
        Outbound::Shoot {
            x: target.col() as u8,
            y: target.row() as u8,
        }
    }

    /// Wire name of the push.
    pub fn name(&self) -> &'static str {
        match self {
            Outbound::FindGame => "find_game",
            Outbound::JoinGame { .. } => "join_game",
            Outbound::PlaceShip { .. } => "place_ship",
            Outbound::Shoot { .. } => "shoot",
        }
    }
}

/// Anything carried by a [`Transport`](crate::transport::Transport).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Message {
    /// Authority to client.
    Event(Inbound),
    /// Client to authority.
    Push(Outbound),
}

/// Framed unit on stream transports.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Envelope {
    pub version: u16,
    pub message: Message,
}

/// Parse one line of a JSON event script, e.g.
/// `{"place_ship": {"size": 4}}` or `"unable_to_join"`.
#[cfg(feature = "std")]
pub fn decode_event_json(line: &str) -> anyhow::Result<Inbound> {
    serde_json::from_str(line).map_err(|e| anyhow::anyhow!("Malformed event {:?}: {}", line, e))
}

/// JSON form of a push, matching the event script format.
#[cfg(feature = "std")]
pub fn encode_push_json(push: &Outbound) -> anyhow::Result<String> {
    serde_json::to_string(push).map_err(|e| anyhow::anyhow!("Serialization error: {}", e))
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;

    #[test]
    fn board_update_alias_decodes_as_shot_result() {
        let ev = decode_event_json(
            r#"{"board_update": {"shooter": "p2", "result": "game_over", "coordinates": [[1, 2]]}}"#,
        )
        .unwrap();
        assert_eq!(
            ev,
            Inbound::ShotResult {
                shooter: PlayerId::from("p2"),
                result: ShotOutcome::GameOver,
                coordinates: vec![[1, 2]],
            }
        );
    }

    #[test]
    fn message_kind_uses_type_field() {
        let ev = decode_event_json(r#"{"message": {"message": "Place your ships", "type": "info"}}"#)
            .unwrap();
        assert!(matches!(ev, Inbound::Message { ref kind, .. } if kind == "info"));
        assert_eq!(ev.name(), "message");
    }

    #[test]
    fn unit_events_are_bare_strings() {
        assert_eq!(
            decode_event_json(r#""unable_to_join""#).unwrap(),
            Inbound::UnableToJoin
        );
        assert!(decode_event_json("{not json").is_err());
    }

    #[test]
    fn push_json_uses_x_for_column() {
        let at = Coord::new(7, 2).unwrap();
        let json = encode_push_json(&Outbound::place_ship(at, Orientation::Vertical)).unwrap();
        assert_eq!(json, r#"{"place_ship":{"x":7,"y":2,"orientation":"vertical"}}"#);
        assert_eq!(encode_push_json(&Outbound::FindGame).unwrap(), r#""find_game""#);
    }

    #[test]
    fn envelope_survives_bincode() {
        let env = Envelope {
            version: crate::config::PROTOCOL_VERSION,
            message: Message::Event(Inbound::ShipPlaced {
                coordinates: vec![[0, 0], [1, 0]],
                last: true,
            }),
        };
        let bytes = bincode::serialize(&env).unwrap();
        let back: Envelope = bincode::deserialize(&bytes).unwrap();
        assert_eq!(back, env);
    }

    #[test]
    fn numeric_player_ids_decode_as_text() {
        let ev = decode_event_json(r#"{"game_found": {"game_id": "x", "player": 1}}"#).unwrap();
        assert_eq!(
            ev,
            Inbound::GameFound {
                game_id: "x".into(),
                player: PlayerId::from("1"),
            }
        );
        let turn = decode_event_json(r#"{"next_turn": {"turn": "p2"}}"#).unwrap();
        assert_eq!(turn, Inbound::NextTurn { turn: PlayerId::from("p2") });
        assert!(decode_event_json(r#"{"next_turn": {"turn": true}}"#).is_err());
    }

    #[test]
    fn player_ids_survive_bincode() {
        let env = Envelope {
            version: crate::config::PROTOCOL_VERSION,
            message: Message::Event(Inbound::GameFound {
                game_id: "g7".into(),
                player: PlayerId::from("42"),
            }),
        };
        let bytes = bincode::serialize(&env).unwrap();
        let back: Envelope = bincode::deserialize(&bytes).unwrap();
        assert_eq!(back, env);
    }
}
