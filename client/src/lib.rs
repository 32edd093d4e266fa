//! # Conundrum Client Library
//!
//! A terminal participant for the conundrum server. It connects to the
//! WebSocket endpoint, sends each line typed on stdin as a guess, and prints
//! every broadcast: new puzzles, hints, score reports, and other players'
//! guesses and chat.
//!
//! ## Module Organization
//!
//! - `network`: the WebSocket [`Connection`] and the interactive [`Client`]
//!   loop.
//! - `rendering`: turns a broadcast into a display line.

pub mod network;
pub mod rendering;

pub use network::{connect, Client, ClientError, Connection};
pub use rendering::render;
