//! # Conundrum Server Library
//!
//! A multiplayer word-puzzle broadcaster. Every round the server picks a
//! scrambled word, announces it to every connected participant over a
//! WebSocket, reveals a hint halfway through the round, and relays every
//! guess and chat line to everyone. A correct guess scores a point and is
//! relayed as an acknowledgment instead of the answer.
//!
//! ## Architecture
//!
//! One task per long-lived duty, all meeting at a single unbounded queue:
//!
//! - **Broadcaster** (`broadcaster`): the only consumer of the queue and the
//!   only owner of the [`ConnectionRegistry`]. It delivers each message to
//!   every connection in enqueue order and prunes connections whose writes
//!   fail.
//! - **Round scheduler** (`scheduler`): a rotation timer that swaps the
//!   active puzzle and announces scores then the new scrambled word, and a
//!   hint timer offset by half a round.
//! - **Connection handlers** (`handler`): one per participant. Reads guesses,
//!   updates the score ledger, and queues what should be relayed.
//!
//! Besides the queue, the only shared state is the active puzzle
//! ([`RoundState`]) and the score ledger ([`ScoreLedger`]), each behind its
//! own short-held lock that is never held across I/O.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use server::ServerConfig;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServerConfig {
//!         round_interval: Duration::from_secs(30),
//!         ..ServerConfig::default()
//!     };
//!     let (addr, server) = server::start(config).await?;
//!     println!("Listening on {}", addr);
//!     server.await??;
//!     Ok(())
//! }
//! ```

pub mod broadcaster;
pub mod config;
pub mod error;
pub mod handler;
pub mod network;
pub mod registry;
pub mod round;
pub mod scheduler;
pub mod scores;

pub use broadcaster::{BroadcastEvent, BroadcastHandle, Broadcaster};
pub use config::ServerConfig;
pub use error::{BoxError, ServerError};
pub use handler::ConnectionHandler;
pub use network::{router, start, start_with_puzzles, AppState};
pub use registry::{ConnectionId, ConnectionRegistry, OutboundSink};
pub use round::RoundState;
pub use scheduler::RoundScheduler;
pub use scores::ScoreLedger;
