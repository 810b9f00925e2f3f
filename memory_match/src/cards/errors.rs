//! Card data error types.

use std::{io, path::PathBuf};
use thiserror::Error;

/// Card data could not be loaded. The game cannot start without it.
#[derive(Debug, Error)]
pub enum DataLoadError {
    /// Card file could not be read
    #[error("Failed to read card data from {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Card file is not a JSON array of card records
    #[error("Malformed card data: {0}")]
    Parse(#[from] serde_json::Error),

    /// Wrong number of card types
    #[error("Wrong number of card types: expected {expected}, found {found}")]
    WrongCount { expected: usize, found: usize },

    /// Two card types share a name
    #[error("Duplicate card type: {0}")]
    DuplicateName(String),

    /// A card type has an empty name
    #[error("Card type with blank name")]
    BlankName,
}

/// Result type for card data operations
pub type DataLoadResult<T> = Result<T, DataLoadError>;
