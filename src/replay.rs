#![cfg(feature = "std")]
//! Offline replay of a JSON-lines event script through a router.
//!
//! One inbound event per line, e.g. `{"place_ship": {"size": 4}}`. Blank
//! lines and lines starting with `#` are skipped. Lines that fail to decode
//! are logged and skipped, like malformed data from a live authority.

use std::vec::Vec;

use log::warn;

use crate::{
    player_ai::AutoPilot,
    protocol::{decode_event_json, Outbound},
    router::{EventRouter, Input},
    ui::Presenter,
};

/// What a replay produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplayReport {
    /// Every push the router emitted, in order.
    pub pushes: Vec<Outbound>,
    /// Events dispatched.
    pub events: usize,
    /// Lines that did not decode.
    pub skipped: usize,
}

fn drive<P: Presenter>(
    router: &mut EventRouter<P>,
    pilot: &mut Option<&mut AutoPilot>,
    report: &mut ReplayReport,
) {
    if let Some(pilot) = pilot.as_deref_mut() {
        for intent in pilot.plan(router) {
            report.pushes.extend(router.dispatch(intent));
        }
    }
}

/// Feed `script` through `router`. With a pilot, its intents are dispatched
/// before the first event and after every event.
pub fn replay_script<P: Presenter>(
    router: &mut EventRouter<P>,
    script: &str,
    mut pilot: Option<&mut AutoPilot>,
) -> ReplayReport {
    let mut report = ReplayReport::default();
    drive(router, &mut pilot, &mut report);
    for (n, line) in script.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let ev = match decode_event_json(line) {
            Ok(ev) => ev,
            Err(e) => {
                warn!("line {}: {}", n + 1, e);
                report.skipped += 1;
                continue;
            }
        };
        if let Some(pilot) = pilot.as_deref_mut() {
            pilot.observe(&ev);
        }
        report.events += 1;
        report.pushes.extend(router.dispatch(Input::Event(ev)));
        drive(router, &mut pilot, &mut report);
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Phase;

    const SCRIPT: &str = r#"
# two-ship placement into combat
{"game_found": {"game_id": "g7", "player": "alice"}}
{"channel_joined": {"game_id": "g7"}}
{"place_ship": {"size": 2}}
{"ship_placed": {"coordinates": [[0, 0], [1, 0]], "last": false}}
this line is not an event
{"place_ship": {"size": 3}}
{"ship_placed": {"coordinates": [[0, 2], [0, 3], [0, 4]], "last": true}}
"#;

    #[test]
    fn script_without_pilot_only_joins() {
        let mut router = EventRouter::headless();
        router.dispatch(crate::router::Intent::RequestMatch);
        let report = replay_script(&mut router, SCRIPT, None);
        assert_eq!(report.events, 6);
        assert_eq!(report.skipped, 1);
        assert_eq!(
            report.pushes,
            vec![Outbound::JoinGame {
                game_id: "g7".into()
            }]
        );
        assert_eq!(router.phase(), Phase::Combat);
    }

    #[test]
    fn pilot_requests_match_and_places() {
        let mut router = EventRouter::headless();
        let mut pilot = AutoPilot::seeded(11);
        let report = replay_script(&mut router, SCRIPT, Some(&mut pilot));
        assert_eq!(report.pushes.first(), Some(&Outbound::FindGame));
        let placements = report
            .pushes
            .iter()
            .filter(|p| matches!(p, Outbound::PlaceShip { .. }))
            .count();
        assert_eq!(placements, 2);
    }
}
