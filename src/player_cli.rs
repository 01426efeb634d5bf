#![cfg(feature = "std")]

use std::io::{self, Write};
use std::string::String;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::{
    board::Board,
    coord::Coord,
    game::{OpponentStatus, Phase, Presence, Side},
    router::Intent,
    ui::{Presenter, Snapshot},
};

pub const HELP: &str = "\
commands:
  find          look for a match
  hover A5      preview the next ship at A5
  leave         clear the preview
  rotate        switch orientation of the previewed ship
  place A5      place the next ship at A5
  shoot B3      fire at B3 on the opponent board
  quit          leave the client";

/// One parsed line of terminal input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Intent(Intent),
    Help,
    Quit,
}

/// Parse `A5`-style input: column letter `A`-`J`, then row `1`-`10`.
pub fn parse_coord(input: &str) -> Option<Coord> {
    if input.len() < 2 {
        return None;
    }
    let mut chars = input.chars();
    let col_ch = chars.next()?.to_ascii_uppercase();
    if !col_ch.is_ascii_uppercase() {
        return None;
    }
    let col = (col_ch as u8 - b'A') as i64;
    let row_str: String = chars.collect();
    let row: i64 = row_str.parse().ok()?;
    if row == 0 {
        return None;
    }
    Coord::new(col, row - 1).ok()
}

/// Parse one line of terminal input. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let mut parts = line.split_whitespace();
    let Some(verb) = parts.next() else {
        return Ok(None);
    };
    let verb = verb.to_ascii_lowercase();
    let arg = parts.next();
    if parts.next().is_some() {
        return Err(std::format!("too many arguments for '{}'", verb));
    }
    let target = |arg: Option<&str>| -> Result<Coord, String> {
        let raw = arg.ok_or_else(|| std::format!("'{}' needs a coordinate like A5", verb))?;
        parse_coord(raw).ok_or_else(|| std::format!("invalid coordinate '{}'", raw))
    };
    let cmd = match verb.as_str() {
        "find" => Command::Intent(Intent::RequestMatch),
        "hover" => Command::Intent(Intent::Hover(target(arg)?)),
        "leave" => Command::Intent(Intent::HoverLeave),
        "rotate" => Command::Intent(Intent::ToggleOrientation),
        "place" => Command::Intent(Intent::PlaceAt(target(arg)?)),
        "shoot" => Command::Intent(Intent::ShootAt(target(arg)?)),
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(std::format!("unknown command '{}' (try 'help')", other)),
    };
    Ok(Some(cmd))
}

/// Forward stdin commands to `tx` until `quit`, end of input, or the
/// receiver goes away. Dropping `tx` on return closes the channel.
pub fn spawn_stdin_reader(tx: mpsc::Sender<Intent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    log::warn!("stdin read failed: {}", e);
                    break;
                }
            };
            match parse_command(&line) {
                Ok(Some(Command::Intent(intent))) => {
                    if tx.send(intent).await.is_err() {
                        break;
                    }
                }
                Ok(Some(Command::Help)) => std::println!("{}", HELP),
                Ok(Some(Command::Quit)) => break,
                Ok(None) => {}
                Err(e) => std::println!("{}", e),
            }
        }
    })
}

#[derive(PartialEq, Eq)]
struct Frame {
    phase: Phase,
    turn: Option<Side>,
    own: Board,
    opponent: Board,
    next_size: Option<usize>,
}

/// Text presenter. Redraws only when the visible state changed.
pub struct TerminalPresenter<W: Write = io::Stdout> {
    out: W,
    last: Option<Frame>,
}

impl TerminalPresenter<io::Stdout> {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl Default for TerminalPresenter<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> TerminalPresenter<W> {
    pub fn with_writer(out: W) -> Self {
        Self { out, last: None }
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    // Write errors are dropped.
    fn emit(&mut self, text: std::fmt::Arguments<'_>) {
        if writeln!(self.out, "{}", text).is_ok() {
            let _ = self.out.flush();
        }
    }

    fn status_line(snapshot: &Snapshot<'_>) -> String {
        match (snapshot.phase, snapshot.turn) {
            (Phase::Lobby, _) => String::from("In the lobby. Type 'find' to look for a match."),
            (Phase::MatchSearching, _) => String::from("Searching for an opponent..."),
            (Phase::Placing, _) => match snapshot.next_size {
                Some(len) if snapshot.affordances.placement => std::format!(
                    "Place a ship of length {} ({:?}).",
                    len,
                    snapshot.orientation
                ),
                _ => String::from("Waiting for the next ship..."),
            },
            (Phase::Combat, Some(Side::Me)) => String::from("Your turn. Shoot!"),
            (Phase::Combat, _) => String::from("Opponent's turn..."),
            (Phase::Resolved, _) => String::from("Game over. Type 'find' to play again."),
        }
    }
}

impl<W: Write> Presenter for TerminalPresenter<W> {
    fn render(&mut self, snapshot: &Snapshot<'_>) {
        let frame = Frame {
            phase: snapshot.phase,
            turn: snapshot.turn,
            own: *snapshot.own,
            opponent: *snapshot.opponent,
            next_size: snapshot.next_size,
        };
        if self.last.as_ref() == Some(&frame) {
            return;
        }
        self.last = Some(frame);
        self.emit(format_args!("\nOpponent board:\n{}", snapshot.opponent));
        self.emit(format_args!("\nYour board:\n{}", snapshot.own));
        self.emit(format_args!("legend: S ship  X hit  o miss  # destroyed  . water"));
        let status = Self::status_line(snapshot);
        self.emit(format_args!("{}", status));
    }

    fn preview(&mut self, cells: &[Coord]) {
        let list: std::vec::Vec<String> = cells.iter().map(|c| c.to_string()).collect();
        let full = cells.len();
        self.emit(format_args!("preview: {} ({} cells)", list.join(" "), full));
    }

    fn clear_preview(&mut self) {
        self.emit(format_args!("preview cleared"));
    }

    fn message(&mut self, text: &str, kind: &str) {
        self.emit(format_args!("[{}] {}", kind, text));
    }

    fn announce(&mut self, text: &str) {
        let width = text.chars().count() + 4;
        let bar = "=".repeat(width);
        self.emit(format_args!("\n{}\n  {}  \n{}\n", bar, text, bar));
    }

    fn opponent(&mut self, status: OpponentStatus) {
        let presence = match status.presence {
            Presence::Online => "online",
            Presence::Offline => "offline",
        };
        self.emit(format_args!(
            "opponent {}, {} ship(s) left",
            presence, status.ships_remaining
        ));
    }

    fn hide_opponent_status(&mut self) {
        self.emit(format_args!("opponent joined; the game is on"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_coord_bounds() {
        assert_eq!(parse_coord("A1"), Coord::new(0, 0).ok());
        assert_eq!(parse_coord("j10"), Coord::new(9, 9).ok());
        assert_eq!(parse_coord("K1"), None);
        assert_eq!(parse_coord("A11"), None);
        assert_eq!(parse_coord("A0"), None);
        assert_eq!(parse_coord("5A"), None);
        assert_eq!(parse_coord("A"), None);
    }

    #[test]
    fn parse_command_verbs() {
        let b3 = Coord::new(1, 2).unwrap();
        assert_eq!(
            parse_command("shoot B3"),
            Ok(Some(Command::Intent(Intent::ShootAt(b3))))
        );
        assert_eq!(
            parse_command("  FIND "),
            Ok(Some(Command::Intent(Intent::RequestMatch)))
        );
        assert_eq!(parse_command(""), Ok(None));
        assert_eq!(parse_command("quit"), Ok(Some(Command::Quit)));
        assert!(parse_command("place").is_err());
        assert!(parse_command("place Z9").is_err());
        assert!(parse_command("dance").is_err());
        assert!(parse_command("hover A1 B2").is_err());
    }
}
