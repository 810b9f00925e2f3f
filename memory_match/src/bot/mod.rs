//! Bot module providing automated memory game players.
//!
//! This module implements:
//! - BotMemory: What a bot remembers seeing, with imperfect recall
//! - BotDecisionMaker: Picks the next card from memory and the board
//! - BotPlayer: Plays whole rounds against a session handle
//! - Difficulty presets with human-like pacing
//!
//! ## Difficulty Presets
//!
//! - **Easy**: remembers half of what it sees
//! - **Standard**: remembers 80% of what it sees
//! - **Perfect**: never forgets, and so never loses
//!
//! ## Example
//!
//! ```no_run
//! use memory_match::bot::{BotConfig, BotDifficulty, BotPlayer};
//! use memory_match::game::entities::CardSet;
//! use memory_match::session::{SessionActor, SessionConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let (actor, handle) = SessionActor::new(CardSet::builtin(), SessionConfig::default());
//!     tokio::spawn(actor.run());
//!
//!     let mut bot = BotPlayer::new(BotConfig::from_difficulty(BotDifficulty::Easy));
//!     bot.play_games(&handle, 10).await.unwrap();
//!     println!("Win rate: {:.0}%", bot.stats.win_rate() * 100.0);
//! }
//! ```

pub mod decision;
pub mod models;
pub mod runner;

pub use decision::BotDecisionMaker;
pub use models::{BotConfig, BotDifficulty, BotMemory, BotStats};
pub use runner::BotPlayer;
