//! Card data loading and validation.

pub mod errors;
pub mod loader;

pub use errors::{DataLoadError, DataLoadResult};
pub use loader::{CardSource, JsonFileSource, StaticSource, parse_cards};
