//! Card sources.
//!
//! A [`CardSource`] produces the validated [`CardSet`] a session deals from.
//! The client reads a JSON file shipped next to the binary; tests and the
//! bot runner use [`StaticSource`].

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use super::errors::{DataLoadError, DataLoadResult};
use crate::game::entities::{CardSet, CardType};

/// Anything that can supply the card types for a game.
#[async_trait]
pub trait CardSource: Send + Sync {
    /// Load and validate the card types
    async fn load(&self) -> DataLoadResult<CardSet>;
}

/// Parse a JSON array of `{"name": ..., "image": ...}` records.
pub fn parse_cards(raw: &str) -> DataLoadResult<CardSet> {
    let cards: Vec<CardType> = serde_json::from_str(raw)?;
    CardSet::new(cards)
}

/// Reads card types from a JSON file.
#[derive(Clone, Debug)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CardSource for JsonFileSource {
    async fn load(&self) -> DataLoadResult<CardSet> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| DataLoadError::Io {
                path: self.path.clone(),
                source,
            })?;
        let cards = parse_cards(&raw)?;
        log::debug!(
            "Loaded {} card types from {}",
            cards.len(),
            self.path.display()
        );
        Ok(cards)
    }
}

/// Serves a fixed list of card types.
#[derive(Clone, Debug)]
pub struct StaticSource(pub Vec<CardType>);

impl Default for StaticSource {
    fn default() -> Self {
        Self(CardSet::builtin().iter().cloned().collect())
    }
}

#[async_trait]
impl CardSource for StaticSource {
    async fn load(&self) -> DataLoadResult<CardSet> {
        CardSet::new(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::constants::PAIR_COUNT;

    const SIX_CARDS: &str = r#"[
        {"name": "fox", "image": "fox.png"},
        {"name": "owl", "image": "owl.png"},
        {"name": "elk", "image": "elk.png"},
        {"name": "bee", "image": "bee.png"},
        {"name": "ant", "image": "ant.png"},
        {"name": "yak", "image": "yak.png"}
    ]"#;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("mm_{}_{name}", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    // === parse_cards Tests ===

    #[test]
    fn test_parse_cards_valid() {
        let cards = parse_cards(SIX_CARDS).unwrap();
        assert_eq!(cards.len(), PAIR_COUNT);
        assert_eq!(cards.iter().next().map(|c| c.name.as_str()), Some("fox"));
    }

    #[test]
    fn test_parse_cards_malformed() {
        let result = parse_cards("{not json");
        assert!(matches!(result, Err(DataLoadError::Parse(_))));
    }

    #[test]
    fn test_parse_cards_wrong_shape() {
        let result = parse_cards(r#"{"name": "fox", "image": "fox.png"}"#);
        assert!(matches!(result, Err(DataLoadError::Parse(_))));
    }

    #[test]
    fn test_parse_cards_too_few() {
        let result = parse_cards(r#"[{"name": "fox", "image": "fox.png"}]"#);
        assert!(matches!(
            result,
            Err(DataLoadError::WrongCount {
                expected: PAIR_COUNT,
                found: 1
            })
        ));
    }

    // === Source Tests ===

    #[tokio::test]
    async fn test_json_file_source_loads() {
        let path = temp_file("valid.json", SIX_CARDS);
        let source = JsonFileSource::new(&path);

        let cards = source.load().await.unwrap();
        assert_eq!(cards.len(), PAIR_COUNT);

        std::fs::remove_file(path).ok();
    }

    #[tokio::test]
    async fn test_json_file_source_missing_file() {
        let source = JsonFileSource::new("/nonexistent/cards.json");
        assert_eq!(source.path(), Path::new("/nonexistent/cards.json"));

        let err = source.load().await.unwrap_err();
        assert!(matches!(err, DataLoadError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/cards.json"));
    }

    #[tokio::test]
    async fn test_json_file_source_duplicate() {
        let path = temp_file(
            "dup.json",
            &SIX_CARDS.replace(r#""name": "yak""#, r#""name": "fox""#),
        );
        let source = JsonFileSource::new(&path);

        let result = source.load().await;
        assert!(matches!(result, Err(DataLoadError::DuplicateName(name)) if name == "fox"));

        std::fs::remove_file(path).ok();
    }

    #[tokio::test]
    async fn test_static_source_default_is_builtin() {
        let cards = StaticSource::default().load().await.unwrap();
        assert_eq!(cards.len(), PAIR_COUNT);
    }

    #[tokio::test]
    async fn test_static_source_blank_name() {
        let mut records: Vec<CardType> = CardSet::builtin().iter().cloned().collect();
        records[3].name = "  ".to_string();

        let result = StaticSource(records).load().await;
        assert!(matches!(result, Err(DataLoadError::BlankName)));
    }
}
