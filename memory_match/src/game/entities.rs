use rand::Rng;
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fmt, sync::Arc};

use super::constants::PAIR_COUNT;
use crate::cards::DataLoadError;

/// Index of a card on the board, `0..DECK_SIZE`.
pub type Position = usize;

/// Identifies one round of play. Bumped on every restart so that work
/// scheduled for an earlier round can be recognized and dropped.
pub type RoundId = u64;

/// One of the matchable identities, as supplied by the card data source.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct CardType {
    /// Unique key. Two positions form a pair when their names are equal.
    pub name: String,
    /// Display payload (emoji, image path, markup). Opaque to the engine.
    pub image: String,
}

impl CardType {
    pub fn new(name: &str, image: &str) -> Self {
        Self {
            name: name.to_string(),
            image: image.to_string(),
        }
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// The stock card set used when no data file is given.
const BUILTIN_CARDS: [(&str, &str); PAIR_COUNT] = [
    ("apple", "🍎"),
    ("banana", "🍌"),
    ("cherry", "🍒"),
    ("grape", "🍇"),
    ("lemon", "🍋"),
    ("melon", "🍉"),
];

/// A validated set of exactly [`PAIR_COUNT`] card types with unique names.
///
/// Cloning is cheap; every round of a session deals from the same set.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CardSet(Arc<[CardType]>);

impl CardSet {
    /// Validate a raw card list.
    ///
    /// # Errors
    ///
    /// Fails if the list does not hold exactly [`PAIR_COUNT`] entries, or if
    /// any name is blank or repeated.
    pub fn new(cards: Vec<CardType>) -> Result<Self, DataLoadError> {
        if cards.len() != PAIR_COUNT {
            return Err(DataLoadError::WrongCount {
                expected: PAIR_COUNT,
                found: cards.len(),
            });
        }

        let mut seen = HashSet::with_capacity(PAIR_COUNT);
        for card in &cards {
            if card.name.trim().is_empty() {
                return Err(DataLoadError::BlankName);
            }
            if !seen.insert(card.name.as_str()) {
                return Err(DataLoadError::DuplicateName(card.name.clone()));
            }
        }

        Ok(Self(cards.into()))
    }

    #[must_use]
    pub fn builtin() -> Self {
        let cards: Vec<CardType> = BUILTIN_CARDS
            .iter()
            .map(|(name, image)| CardType::new(name, image))
            .collect();
        Self(cards.into())
    }

    pub fn iter(&self) -> impl Iterator<Item = &CardType> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for CardSet {
    /// An empty set. Only useful as a placeholder; a deck dealt from it has
    /// no positions.
    fn default() -> Self {
        Self(Vec::new().into())
    }
}

/// Per-position card state.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CardState {
    #[default]
    FaceDown,
    Flipped,
    Matched,
}

impl fmt::Display for CardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::FaceDown => "face-down",
            Self::Flipped => "flipped",
            Self::Matched => "matched",
        };
        write!(f, "{repr}")
    }
}

/// Tag for one scheduled pair evaluation.
///
/// A ticket is only honoured while it is the machine's pending resolution
/// in the same round it was issued in.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Ticket {
    pub round: RoundId,
    pub turn: u32,
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "round {} turn {}", self.round, self.turn)
    }
}

/// Result of comparing the two flipped cards.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum PairOutcome {
    Match,
    Mismatch,
}

/// How a round ended.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Outcome {
    Won,
    Lost,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Won => write!(f, "won"),
            Self::Lost => write!(f, "lost"),
        }
    }
}

/// A card type placed at a board position along with its current state.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DeckEntry {
    pub card: CardType,
    pub state: CardState,
}

/// The dealt board: every card type twice, in shuffled order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Deck {
    entries: Vec<DeckEntry>,
}

impl Deck {
    /// Lay out every card of `cards` twice without shuffling. Positions
    /// `i` and `i + cards.len()` hold the same card type.
    pub fn unshuffled(cards: &CardSet) -> Self {
        let entries = cards
            .iter()
            .chain(cards.iter())
            .map(|card| DeckEntry {
                card: card.clone(),
                state: CardState::FaceDown,
            })
            .collect();
        Self { entries }
    }

    /// Duplicate and shuffle `cards` into a fresh face-down deck.
    pub fn deal<R: Rng + ?Sized>(cards: &CardSet, rng: &mut R) -> Self {
        let mut deck = Self::unshuffled(cards);
        deck.shuffle(rng);
        deck
    }

    /// Fisher-Yates: walk from the last position down, swapping each entry
    /// with a uniformly chosen entry at or before it.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for i in (1..self.entries.len()).rev() {
            let j = rng.random_range(0..=i);
            self.entries.swap(i, j);
        }
    }

    pub fn get(&self, position: Position) -> Option<&DeckEntry> {
        self.entries.get(position)
    }

    pub(crate) fn set_state(&mut self, position: Position, state: CardState) {
        if let Some(entry) = self.entries.get_mut(position) {
            entry.state = state;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &DeckEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Both positions holding the card named `name`, in board order.
    pub fn positions_of(&self, name: &str) -> Vec<Position> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.card.name == name)
            .map(|(position, _)| position)
            .collect()
    }
}

/// What the rendering surface may know about one position. The face is
/// only revealed while the card is flipped or matched.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct CardView {
    pub position: Position,
    pub state: CardState,
    pub face: Option<CardType>,
}

impl CardView {
    pub fn new(position: Position, entry: &DeckEntry) -> Self {
        let face = match entry.state {
            CardState::FaceDown => None,
            CardState::Flipped | CardState::Matched => Some(entry.card.clone()),
        };
        Self {
            position,
            state: entry.state,
            face,
        }
    }

    pub fn face_down(position: Position) -> Self {
        Self {
            position,
            state: CardState::FaceDown,
            face: None,
        }
    }
}

/// Snapshot of a round as seen from outside the state machine.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct GameView {
    pub round: RoundId,
    pub phase: String,
    pub cards: Vec<CardView>,
    pub flipped: Vec<Position>,
    pub matched_pairs: usize,
    pub tries_remaining: u8,
    pub is_locked: bool,
    pub outcome: Option<Outcome>,
}

impl fmt::Display for GameView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "round {} [{}] pairs {} tries {}",
            self.round, self.phase, self.matched_pairs, self.tries_remaining
        )
    }
}
