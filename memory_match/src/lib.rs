//! # Memory Match
//!
//! A memory-matching card game implemented as a type-safe finite state
//! machine (FSM).
//!
//! Six card types are dealt twice each onto a 12-position board. The player
//! flips two cards per turn; a matching pair stays face-up, a mismatch flips
//! back and costs one of six tries. Finding every pair wins the round,
//! running out of tries loses it.
//!
//! ## Architecture
//!
//! A round moves through these phases:
//!
//! - **Ready**: Fresh deck, nothing flipped
//! - **AwaitingFirstFlip**: Between turns
//! - **AwaitingSecondFlip**: One card face-up
//! - **Resolving**: Two cards face-up, input locked until the reveal delay ends
//! - **Won/Lost**: Round over until restarted
//!
//! The FSM itself is synchronous and has no notion of time. The [`session`]
//! actor owns one game, runs the reveal and announce delays on tokio timers
//! and broadcasts [`GameEvent`]s to whatever [`surface::RenderSurface`] is
//! attached.
//!
//! ## Core Modules
//!
//! - [`game`]: Game state machine, entities, and rules
//! - [`cards`]: Loading and validating card data
//! - [`session`]: Async actor pacing a game in real time
//! - [`surface`]: What a front end must implement
//! - [`bot`]: Automated players
//!
//! ## Example
//!
//! ```
//! use memory_match::{GameStateManagement, MatchState, game::entities::CardSet};
//!
//! let mut rng = rand::rng();
//! let mut game = MatchState::new(CardSet::builtin(), &mut rng);
//! game.select(0).unwrap();
//! assert_eq!(game.flipped_positions(), &[0]);
//! ```

/// Automated players.
pub mod bot;

/// Card data sources.
pub mod cards;
pub use cards::{CardSource, DataLoadError, JsonFileSource, StaticSource};

/// Core game logic, entities, and state machine.
pub mod game;
pub use game::{
    GameEvent, GameStateManagement, MatchState, SelectionError,
    constants::{self, DECK_SIZE, MAX_TRIES, PAIR_COUNT},
    entities::{self, CardSet, CardState, CardType, CardView, GameView, Outcome},
};

/// Real-time game sessions.
pub mod session;
pub use session::{SessionActor, SessionConfig, SessionHandle};

pub mod surface;
pub use surface::{RenderSurface, apply_event};
