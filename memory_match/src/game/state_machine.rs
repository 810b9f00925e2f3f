//! Memory game state machine implementation.
//!
//! Round data lives in [`GameData`]; the phase of the round is a typestate
//! parameter on [`Game`]. Transitions consume one `Game<T>` and return the
//! next, so an illegal transition does not type-check.

use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};
use std::{collections::VecDeque, fmt};
use thiserror::Error;

use super::constants::MAX_TRIES;
use super::entities::{
    CardSet, CardState, CardView, Deck, GameView, Outcome, PairOutcome, Position, RoundId, Ticket,
};
pub use super::states::{
    AwaitingFirstFlip, AwaitingSecondFlip, Lost, Phase, Ready, Resolving, Won,
};

/// Reasons a selection is ignored.
///
/// None of these are failures. Rapid or duplicate clicks produce them all the
/// time; the machine leaves its state and event queue untouched.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum SelectionError {
    #[error("position {0} is off the board")]
    OutOfRange(Position),
    #[error("card at position {0} is already face-up")]
    AlreadyFlipped(Position),
    #[error("card at position {0} is already matched")]
    AlreadyMatched(Position),
    #[error("a pair is being resolved")]
    Locked,
    #[error("round is over")]
    GameOver,
}

/// Signals produced for the rendering surface.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum GameEvent {
    /// A fresh deck was dealt; every position is face-down.
    RoundStarted { round: RoundId },
    CardStateChanged(CardView),
    TriesChanged(u8),
    Won,
    Lost,
}

impl GameEvent {
    /// The round outcome this event announces, if any.
    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            Self::Won => Some(Outcome::Won),
            Self::Lost => Some(Outcome::Lost),
            _ => None,
        }
    }
}

impl From<Outcome> for GameEvent {
    fn from(value: Outcome) -> Self {
        match value {
            Outcome::Won => Self::Won,
            Outcome::Lost => Self::Lost,
        }
    }
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::RoundStarted { round } => format!("round {round} started"),
            Self::CardStateChanged(card) => match &card.face {
                Some(face) => format!("card {} ({face}) is {}", card.position, card.state),
                None => format!("card {} is {}", card.position, card.state),
            },
            Self::TriesChanged(tries) => format!("{tries} tries remaining"),
            Self::Won => "all pairs found, you won".to_string(),
            Self::Lost => "out of tries, you lost".to_string(),
        };
        write!(f, "{repr}")
    }
}

/// Everything that makes up one round.
///
/// Replaced wholesale on restart; nothing carries over between rounds
/// except the card set.
#[derive(Debug, Default)]
pub struct GameData {
    pub(super) cards: CardSet,
    pub(super) deck: Deck,
    /// Positions flipped but not yet resolved, in selection order. Never
    /// more than two.
    pub(super) flipped: Vec<Position>,
    pub(super) matched_pairs: usize,
    pub(super) tries_remaining: u8,
    pub(super) round: RoundId,
    /// Number of pair evaluations issued this round.
    pub(super) turn: u32,
    pub(super) events: VecDeque<GameEvent>,
}

impl GameData {
    pub(super) fn new(cards: CardSet, deck: Deck, round: RoundId) -> Self {
        let mut events = VecDeque::new();
        events.push_back(GameEvent::RoundStarted { round });
        events.push_back(GameEvent::TriesChanged(MAX_TRIES));
        Self {
            cards,
            deck,
            flipped: Vec::with_capacity(2),
            matched_pairs: 0,
            tries_remaining: MAX_TRIES,
            round,
            turn: 0,
            events,
        }
    }

    /// Number of pairs on the board.
    pub fn pair_count(&self) -> usize {
        self.deck.len() / 2
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub(super) fn check_selectable(&self, position: Position) -> Result<(), SelectionError> {
        match self.deck.get(position).map(|entry| entry.state) {
            None => Err(SelectionError::OutOfRange(position)),
            Some(CardState::Flipped) => Err(SelectionError::AlreadyFlipped(position)),
            Some(CardState::Matched) => Err(SelectionError::AlreadyMatched(position)),
            Some(CardState::FaceDown) => Ok(()),
        }
    }

    fn set_card_state(&mut self, position: Position, state: CardState) {
        self.deck.set_state(position, state);
        if let Some(entry) = self.deck.get(position) {
            self.events
                .push_back(GameEvent::CardStateChanged(CardView::new(position, entry)));
        }
    }

    fn flip(&mut self, position: Position) {
        self.set_card_state(position, CardState::Flipped);
        self.flipped.push(position);
    }

    fn card_views(&self) -> Vec<CardView> {
        self.deck
            .iter()
            .enumerate()
            .map(|(position, entry)| CardView::new(position, entry))
            .collect()
    }
}

/// Read access and event draining shared by every phase.
#[enum_dispatch]
pub trait GameStateManagement {
    fn drain_events(&mut self) -> VecDeque<GameEvent>;

    /// Snapshot of the round for rendering.
    ///
    /// # Important
    /// This function's return value should be used - ignoring it wastes computation
    #[must_use]
    fn get_view(&self) -> GameView;

    fn card_state(&self, position: Position) -> Option<CardState>;
    fn flipped_positions(&self) -> &[Position];
    fn matched_pairs(&self) -> usize;
    fn tries_remaining(&self) -> u8;
    fn round(&self) -> RoundId;
}

/// A round of the memory game in phase `T`.
#[derive(Debug)]
pub struct Game<T> {
    pub data: GameData,
    pub state: T,
}

impl<T: Phase> GameStateManagement for Game<T> {
    fn drain_events(&mut self) -> VecDeque<GameEvent> {
        std::mem::take(&mut self.data.events)
    }

    fn get_view(&self) -> GameView {
        GameView {
            round: self.data.round,
            phase: T::NAME.to_string(),
            cards: self.data.card_views(),
            flipped: self.data.flipped.clone(),
            matched_pairs: self.data.matched_pairs,
            tries_remaining: self.data.tries_remaining,
            is_locked: T::LOCKED,
            outcome: T::OUTCOME,
        }
    }

    fn card_state(&self, position: Position) -> Option<CardState> {
        self.data.deck.get(position).map(|entry| entry.state)
    }

    fn flipped_positions(&self) -> &[Position] {
        &self.data.flipped
    }

    fn matched_pairs(&self) -> usize {
        self.data.matched_pairs
    }

    fn tries_remaining(&self) -> u8 {
        self.data.tries_remaining
    }

    fn round(&self) -> RoundId {
        self.data.round
    }
}

impl<T> Game<T> {
    fn into_phase<U>(self, state: U) -> Game<U> {
        Game {
            data: self.data,
            state,
        }
    }

    /// Deal a new deck from the same cards and start the next round.
    pub(super) fn restart<R: rand::Rng + ?Sized>(self, rng: &mut R) -> Game<Ready> {
        let round = self.data.round.wrapping_add(1);
        let deck = Deck::deal(&self.data.cards, rng);
        Game::<Ready>::with_deck(self.data.cards, deck, round)
    }
}

impl Game<Ready> {
    pub(super) fn with_deck(cards: CardSet, deck: Deck, round: RoundId) -> Self {
        Self {
            data: GameData::new(cards, deck, round),
            state: Ready,
        }
    }

    pub(super) fn flip_first(mut self, position: Position) -> Game<AwaitingSecondFlip> {
        self.data.flip(position);
        self.into_phase(AwaitingSecondFlip)
    }
}

impl Game<AwaitingFirstFlip> {
    pub(super) fn flip_first(mut self, position: Position) -> Game<AwaitingSecondFlip> {
        self.data.flip(position);
        self.into_phase(AwaitingSecondFlip)
    }
}

impl Game<AwaitingSecondFlip> {
    /// Flip the second card and lock the round until the pair is resolved.
    pub(super) fn flip_second(mut self, position: Position) -> Game<Resolving> {
        self.data.flip(position);
        self.data.turn += 1;

        let first = self.data.flipped[0];
        let same_card = match (self.data.deck.get(first), self.data.deck.get(position)) {
            (Some(a), Some(b)) => a.card.name == b.card.name,
            _ => false,
        };
        let outcome = if same_card {
            PairOutcome::Match
        } else {
            PairOutcome::Mismatch
        };

        let ticket = Ticket {
            round: self.data.round,
            turn: self.data.turn,
        };
        self.into_phase(Resolving {
            ticket,
            pair: [first, position],
            outcome,
        })
    }
}

/// Where a resolved pair leaves the round.
pub(super) enum Resolved {
    Continue(Game<AwaitingFirstFlip>),
    Won(Game<Won>),
    Lost(Game<Lost>),
}

impl Game<Resolving> {
    pub fn ticket(&self) -> Ticket {
        self.state.ticket
    }

    pub fn pair_outcome(&self) -> PairOutcome {
        self.state.outcome
    }

    /// Apply the pair evaluation. Tries are updated before the end of the
    /// round is checked, so `TriesChanged(0)` always precedes `Lost`.
    pub(super) fn resolve(mut self) -> Resolved {
        let [first, second] = self.state.pair;
        self.data.flipped.clear();

        match self.state.outcome {
            PairOutcome::Match => {
                self.data.set_card_state(first, CardState::Matched);
                self.data.set_card_state(second, CardState::Matched);
                self.data.matched_pairs += 1;

                if self.data.matched_pairs == self.data.pair_count() {
                    self.data.events.push_back(GameEvent::Won);
                    return Resolved::Won(self.into_phase(Won));
                }
            }
            PairOutcome::Mismatch => {
                self.data.set_card_state(first, CardState::FaceDown);
                self.data.set_card_state(second, CardState::FaceDown);
                self.data.tries_remaining = self.data.tries_remaining.saturating_sub(1);
                self.data
                    .events
                    .push_back(GameEvent::TriesChanged(self.data.tries_remaining));

                if self.data.tries_remaining == 0 {
                    self.data.events.push_back(GameEvent::Lost);
                    return Resolved::Lost(self.into_phase(Lost));
                }
            }
        }

        Resolved::Continue(self.into_phase(AwaitingFirstFlip))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::constants::{DECK_SIZE, PAIR_COUNT};

    fn ready_game() -> Game<Ready> {
        let cards = CardSet::builtin();
        let deck = Deck::unshuffled(&cards);
        Game::<Ready>::with_deck(cards, deck, 0)
    }

    #[test]
    fn test_new_round_queues_start_events() {
        let mut game = ready_game();
        let events = game.drain_events();
        assert_eq!(
            events,
            VecDeque::from([
                GameEvent::RoundStarted { round: 0 },
                GameEvent::TriesChanged(MAX_TRIES),
            ])
        );
        assert!(game.drain_events().is_empty());
    }

    #[test]
    fn test_check_selectable() {
        let game = ready_game();
        assert_eq!(game.data.check_selectable(0), Ok(()));
        assert_eq!(
            game.data.check_selectable(DECK_SIZE),
            Err(SelectionError::OutOfRange(DECK_SIZE))
        );

        let game = game.flip_first(4);
        assert_eq!(
            game.data.check_selectable(4),
            Err(SelectionError::AlreadyFlipped(4))
        );
    }

    #[test]
    fn test_flip_second_detects_match() {
        let game = ready_game().flip_first(0).flip_second(PAIR_COUNT);
        assert_eq!(game.pair_outcome(), PairOutcome::Match);
        assert_eq!(game.ticket(), Ticket { round: 0, turn: 1 });
        assert_eq!(game.flipped_positions(), &[0, PAIR_COUNT]);
        assert!(game.get_view().is_locked);
    }

    #[test]
    fn test_flip_second_detects_mismatch() {
        let game = ready_game().flip_first(0).flip_second(1);
        assert_eq!(game.pair_outcome(), PairOutcome::Mismatch);
    }

    #[test]
    fn test_resolve_match_marks_cards() {
        let game = ready_game().flip_first(2).flip_second(2 + PAIR_COUNT);
        let Resolved::Continue(mut game) = game.resolve() else {
            panic!("one pair should not end the round");
        };

        assert_eq!(game.card_state(2), Some(CardState::Matched));
        assert_eq!(game.card_state(2 + PAIR_COUNT), Some(CardState::Matched));
        assert_eq!(game.matched_pairs(), 1);
        assert_eq!(game.tries_remaining(), MAX_TRIES);
        assert!(game.flipped_positions().is_empty());

        let events: Vec<_> = game.drain_events().into_iter().collect();
        assert!(!events.iter().any(|e| matches!(e, GameEvent::TriesChanged(n) if *n < MAX_TRIES)));
    }

    #[test]
    fn test_resolve_mismatch_costs_a_try() {
        let mut game = ready_game();
        game.drain_events();
        let game = game.flip_first(0).flip_second(1);
        let Resolved::Continue(mut game) = game.resolve() else {
            panic!("one mismatch should not end the round");
        };

        assert_eq!(game.card_state(0), Some(CardState::FaceDown));
        assert_eq!(game.card_state(1), Some(CardState::FaceDown));
        assert_eq!(game.tries_remaining(), MAX_TRIES - 1);
        assert_eq!(game.matched_pairs(), 0);

        let events: Vec<_> = game.drain_events().into_iter().collect();
        assert_eq!(events.last(), Some(&GameEvent::TriesChanged(MAX_TRIES - 1)));
    }

    #[test]
    fn test_view_reveals_only_face_up_cards() {
        let game = ready_game().flip_first(3);
        let view = game.get_view();
        assert_eq!(view.phase, "AwaitingSecondFlip");
        assert!(view.cards[3].face.is_some());
        assert!(view.cards.iter().filter(|c| c.face.is_some()).count() == 1);
        assert_eq!(view.outcome, None);
    }

    #[test]
    fn test_game_event_display() {
        assert_eq!(GameEvent::TriesChanged(3).to_string(), "3 tries remaining");
        assert_eq!(
            GameEvent::RoundStarted { round: 2 }.to_string(),
            "round 2 started"
        );
        assert_eq!(GameEvent::from(Outcome::Lost), GameEvent::Lost);
    }
}
