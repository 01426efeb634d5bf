#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod bitboard;
mod board;
mod common;
mod config;
mod coord;
mod game;
mod player_ai;
pub mod protocol;
mod router;
mod ship;
mod ui;
#[cfg(feature = "std")]
pub mod client_node;
#[cfg(feature = "std")]
mod logging;
#[cfg(feature = "std")]
mod player_cli;
#[cfg(feature = "std")]
mod replay;
#[cfg(feature = "std")]
pub mod transport;

pub use bitboard::{BitBoard, BitBoardError, Grid};
pub use board::*;
pub use common::*;
pub use config::*;
pub use coord::*;
pub use game::*;
pub use player_ai::*;
pub use protocol::*;
pub use router::*;
pub use ship::*;
pub use ui::*;
#[cfg(feature = "std")]
pub use client_node::*;
#[cfg(feature = "std")]
pub use logging::{init_logging, level_from, LOG_ENV};
#[cfg(feature = "std")]
pub use player_cli::*;
#[cfg(feature = "std")]
pub use replay::{replay_script, ReplayReport};
#[cfg(feature = "std")]
pub use transport::{in_memory::InMemoryTransport, tcp::TcpTransport, Transport};
