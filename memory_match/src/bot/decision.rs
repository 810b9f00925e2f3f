//! Bot decision-making: which card to flip next.

use super::models::{BotConfig, BotMemory};
use crate::game::{
    GameEvent,
    entities::{CardState, GameView, Position},
};
use rand::{SeedableRng, rngs::StdRng, seq::IndexedRandom};

/// Bot decision maker
///
/// Keeps the bot's memory of the board up to date from game events and picks
/// moves from it. Preference order:
/// 1. the second half of a remembered pair,
/// 2. the remembered mate of the card already face-up,
/// 3. a card the bot has not seen,
/// 4. any face-down card.
pub struct BotDecisionMaker {
    memory: BotMemory,
    recall: f64,
    rng: StdRng,
}

impl BotDecisionMaker {
    pub fn new(config: &BotConfig) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Deterministic decision maker for reproducible runs
    pub fn with_seed(config: &BotConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: &BotConfig, rng: StdRng) -> Self {
        Self {
            memory: BotMemory::new(),
            recall: config.recall,
            rng,
        }
    }

    pub fn memory(&self) -> &BotMemory {
        &self.memory
    }

    /// Update memory from a session event
    pub fn observe(&mut self, event: &GameEvent) {
        match event {
            GameEvent::RoundStarted { .. } => self.memory.clear(),
            GameEvent::CardStateChanged(card) => {
                self.memory.observe(card, self.recall, &mut self.rng)
            }
            _ => {}
        }
    }

    /// Choose the next card to flip, or `None` when the board takes no
    /// input right now.
    pub fn next_move(&mut self, view: &GameView) -> Option<Position> {
        if view.is_locked || view.outcome.is_some() {
            return None;
        }

        let face_down: Vec<Position> = view
            .cards
            .iter()
            .filter(|card| card.state == CardState::FaceDown)
            .map(|card| card.position)
            .collect();

        match view.flipped.as_slice() {
            [] => {
                if let Some((first, _)) = self.memory.known_pair() {
                    return Some(first);
                }
            }
            [first] => {
                let first_name = view
                    .cards
                    .get(*first)
                    .and_then(|card| card.face.as_ref())
                    .map(|face| face.name.as_str());
                if let Some(mate) =
                    first_name.and_then(|name| self.memory.mate_of(*first, name))
                    && face_down.contains(&mate)
                {
                    return Some(mate);
                }
            }
            _ => return None,
        }

        let unseen: Vec<Position> = face_down
            .iter()
            .copied()
            .filter(|&position| !self.memory.knows(position))
            .collect();

        unseen
            .choose(&mut self.rng)
            .or_else(|| face_down.choose(&mut self.rng))
            .copied()
    }
}
