use enum_dispatch::enum_dispatch;
use rand::Rng;
use std::collections::VecDeque;

use super::entities::{
    CardSet, CardState, Deck, GameView, Outcome, PairOutcome, Position, RoundId, Ticket,
};
use super::state_machine::{
    AwaitingFirstFlip, AwaitingSecondFlip, Game, GameData, GameEvent, GameStateManagement, Lost,
    Ready, Resolved, Resolving, SelectionError, Won,
};

/// A memory game round in whichever phase it is currently in.
///
/// Rounds start in `Ready`, alternate between the flip phases and
/// `Resolving`, and end in `Won` or `Lost` until restarted.
#[enum_dispatch(GameStateManagement)]
#[derive(Debug)]
pub enum MatchState {
    Ready(Game<Ready>),
    AwaitingFirstFlip(Game<AwaitingFirstFlip>),
    AwaitingSecondFlip(Game<AwaitingSecondFlip>),
    Resolving(Game<Resolving>),
    Won(Game<Won>),
    Lost(Game<Lost>),
}

impl Default for MatchState {
    /// An empty board with no cards. Every selection is out of range.
    fn default() -> Self {
        Game::<Ready>::with_deck(CardSet::default(), Deck::default(), 0).into()
    }
}

impl From<Resolved> for MatchState {
    fn from(value: Resolved) -> Self {
        match value {
            Resolved::Continue(game) => game.into(),
            Resolved::Won(game) => game.into(),
            Resolved::Lost(game) => game.into(),
        }
    }
}

impl MatchState {
    /// Deal a shuffled deck from `cards` and start round 0.
    pub fn new<R: Rng + ?Sized>(cards: CardSet, rng: &mut R) -> Self {
        let deck = Deck::deal(&cards, rng);
        Self::with_deck(cards, deck)
    }

    /// Start round 0 on a pre-arranged deck.
    pub fn with_deck(cards: CardSet, deck: Deck) -> Self {
        Game::<Ready>::with_deck(cards, deck, 0).into()
    }

    fn data(&self) -> &GameData {
        match self {
            Self::Ready(game) => &game.data,
            Self::AwaitingFirstFlip(game) => &game.data,
            Self::AwaitingSecondFlip(game) => &game.data,
            Self::Resolving(game) => &game.data,
            Self::Won(game) => &game.data,
            Self::Lost(game) => &game.data,
        }
    }

    pub fn deck(&self) -> &Deck {
        self.data().deck()
    }

    /// Flip the card at `position`.
    ///
    /// The second flip of a turn locks the round and issues a ticket, see
    /// [`MatchState::pending_resolution`]. Nothing happens to the round when
    /// an error is returned.
    pub fn select(&mut self, position: Position) -> Result<(), SelectionError> {
        if self.is_locked() {
            return Err(SelectionError::Locked);
        }
        if self.is_terminal() {
            return Err(SelectionError::GameOver);
        }
        self.data().check_selectable(position)?;

        let state = std::mem::take(self);
        *self = match state {
            Self::Ready(game) => game.flip_first(position).into(),
            Self::AwaitingFirstFlip(game) => game.flip_first(position).into(),
            Self::AwaitingSecondFlip(game) => game.flip_second(position).into(),
            other => other,
        };
        Ok(())
    }

    /// The evaluation waiting to be applied, if a pair is face-up.
    pub fn pending_resolution(&self) -> Option<(Ticket, PairOutcome)> {
        match self {
            Self::Resolving(game) => Some((game.ticket(), game.pair_outcome())),
            _ => None,
        }
    }

    /// Apply the pending pair evaluation if `ticket` is the one issued for
    /// it. Stale tickets (earlier turns, discarded rounds) are rejected and
    /// leave the round as it is.
    pub fn resolve(&mut self, ticket: Ticket) -> bool {
        if self.pending_resolution().map(|(pending, _)| pending) != Some(ticket) {
            return false;
        }

        let state = std::mem::take(self);
        *self = match state {
            Self::Resolving(game) => game.resolve().into(),
            other => other,
        };
        true
    }

    /// Throw the round away and deal a new one from the same cards.
    pub fn restart<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let state = std::mem::take(self);
        *self = match state {
            Self::Ready(game) => game.restart(rng),
            Self::AwaitingFirstFlip(game) => game.restart(rng),
            Self::AwaitingSecondFlip(game) => game.restart(rng),
            Self::Resolving(game) => game.restart(rng),
            Self::Won(game) => game.restart(rng),
            Self::Lost(game) => game.restart(rng),
        }
        .into();
    }

    pub fn is_locked(&self) -> bool {
        matches!(self, Self::Resolving(_))
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            Self::Won(_) => Some(Outcome::Won),
            Self::Lost(_) => Some(Outcome::Lost),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.outcome().is_some()
    }

    pub fn phase_name(&self) -> &'static str {
        match self {
            Self::Ready(_) => "Ready",
            Self::AwaitingFirstFlip(_) => "AwaitingFirstFlip",
            Self::AwaitingSecondFlip(_) => "AwaitingSecondFlip",
            Self::Resolving(_) => "Resolving",
            Self::Won(_) => "Won",
            Self::Lost(_) => "Lost",
        }
    }
}
