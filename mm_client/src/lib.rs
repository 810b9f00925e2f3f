//! Internal modules for the memory match client.
//!
//! This library provides key mapping, board navigation and the terminal UI
//! used by the mm_client binary.

pub mod commands;
pub mod tui_app;
