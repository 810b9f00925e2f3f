//! Session module running a memory game as an async actor.
//!
//! This module implements:
//! - SessionActor: Async actor owning one game and its timers
//! - Message-based communication with tokio channels
//! - Session configuration and pacing presets
//!
//! ## Architecture
//!
//! Each session runs in its own Tokio task with an mpsc message inbox.
//! Reveal and announce delays are detached timer tasks that post back into
//! that inbox, so the game state is only ever touched by the actor.
//!
//! ## Example
//!
//! ```no_run
//! use memory_match::game::entities::CardSet;
//! use memory_match::session::{SessionActor, SessionConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let (actor, handle) = SessionActor::new(CardSet::builtin(), SessionConfig::default());
//!     tokio::spawn(actor.run());
//!
//!     let response = handle.select_card(0).await;
//!     assert!(response.is_ok());
//! }
//! ```

pub mod actor;
pub mod config;
pub mod messages;

pub use actor::{SessionActor, SessionError, SessionHandle, SessionResult};
pub use config::{ConfigError, GameSpeed, SessionConfig};
pub use messages::{SessionMessage, SessionResponse, SubscriberId};
