//! Memory game engine - core FSM and round logic.
//!
//! This module provides the card-matching game itself:
//! - Card types, decks and the Fisher-Yates deal
//! - Type-safe finite state machine over the phases of a round
//! - Event generation and views for rendering

pub mod constants;
pub mod entities;
pub mod state_machine;
pub mod states;
// Must follow state_machine for enum_dispatch
pub mod match_state;

pub use match_state::MatchState;
pub use state_machine::{Game, GameData, GameEvent, GameStateManagement, SelectionError};
