//! Bot player models and configuration.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, time::Duration};

use crate::game::entities::{CardState, CardView, Outcome, Position};

/// Bot difficulty presets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BotDifficulty {
    Easy,
    #[default]
    Standard,
    Perfect,
}

impl std::fmt::Display for BotDifficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BotDifficulty::Easy => write!(f, "easy"),
            BotDifficulty::Standard => write!(f, "standard"),
            BotDifficulty::Perfect => write!(f, "perfect"),
        }
    }
}

impl std::str::FromStr for BotDifficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(BotDifficulty::Easy),
            "standard" => Ok(BotDifficulty::Standard),
            "perfect" => Ok(BotDifficulty::Perfect),
            other => Err(format!("Unknown bot difficulty '{other}'")),
        }
    }
}

/// Bot player configuration
#[derive(Debug, Clone, PartialEq)]
pub struct BotConfig {
    /// Bot display name
    pub name: String,

    /// Chance (0.0 to 1.0) of remembering a card each time it is seen
    pub recall: f64,

    /// Pause before each selection
    pub think_time: Duration,
}

impl BotConfig {
    /// Configuration for a difficulty preset
    pub fn from_difficulty(difficulty: BotDifficulty) -> Self {
        let (recall, think_ms) = match difficulty {
            BotDifficulty::Easy => (0.5, 900),    // Forgets half of what it sees
            BotDifficulty::Standard => (0.8, 600),
            BotDifficulty::Perfect => (1.0, 300), // Never forgets
        };
        Self {
            name: format!("{difficulty} bot"),
            recall,
            think_time: Duration::from_millis(think_ms),
        }
    }

    /// Same preset with no pause between selections
    pub fn unpaced(mut self) -> Self {
        self.think_time = Duration::ZERO;
        self
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self::from_difficulty(BotDifficulty::default())
    }
}

/// Bot statistics tracker
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BotStats {
    /// Total rounds played to an outcome
    pub games_played: u32,

    /// Rounds won
    pub games_won: u32,

    /// Selections the session accepted
    pub selections: u32,
}

impl BotStats {
    pub fn record_game(&mut self, outcome: Outcome) {
        self.games_played += 1;
        if outcome == Outcome::Won {
            self.games_won += 1;
        }
    }

    pub fn games_lost(&self) -> u32 {
        self.games_played - self.games_won
    }

    /// Fraction of rounds won
    pub fn win_rate(&self) -> f32 {
        if self.games_played == 0 {
            0.0
        } else {
            self.games_won as f32 / self.games_played as f32
        }
    }
}

/// What a bot remembers about the board.
///
/// Maps face-down positions to the card name last seen there. Matched
/// positions are dropped since they can never be played again.
#[derive(Debug, Clone, Default)]
pub struct BotMemory {
    seen: HashMap<Position, String>,
}

impl BotMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a card the bot has just seen.
    ///
    /// A face-up card is remembered with probability `recall`; otherwise any
    /// earlier memory of that position is lost too.
    pub fn observe<R: Rng + ?Sized>(&mut self, card: &CardView, recall: f64, rng: &mut R) {
        match (card.state, &card.face) {
            (CardState::Matched, _) => {
                self.seen.remove(&card.position);
            }
            (CardState::Flipped, Some(face)) => {
                if rng.random_bool(recall.clamp(0.0, 1.0)) {
                    self.seen.insert(card.position, face.name.clone());
                } else {
                    self.seen.remove(&card.position);
                }
            }
            _ => {}
        }
    }

    pub fn recall(&self, position: Position) -> Option<&str> {
        self.seen.get(&position).map(String::as_str)
    }

    pub fn knows(&self, position: Position) -> bool {
        self.seen.contains_key(&position)
    }

    /// Another remembered position holding `name`
    pub fn mate_of(&self, position: Position, name: &str) -> Option<Position> {
        self.seen
            .iter()
            .filter(|(other, seen)| **other != position && seen.as_str() == name)
            .map(|(other, _)| *other)
            .min()
    }

    /// Two remembered positions holding the same card, lowest first
    pub fn known_pair(&self) -> Option<(Position, Position)> {
        let mut positions: Vec<Position> = self.seen.keys().copied().collect();
        positions.sort_unstable();
        positions.iter().find_map(|&position| {
            let name = self.seen.get(&position)?;
            self.mate_of(position, name)
                .filter(|&mate| mate > position)
                .map(|mate| (position, mate))
        })
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    pub fn clear(&mut self) {
        self.seen.clear();
    }
}
