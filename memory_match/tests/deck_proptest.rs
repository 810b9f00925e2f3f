/// Property-based tests for dealing and round invariants using proptest
///
/// These tests verify that shuffles always produce a legal board and that
/// arbitrary click sequences never break the round's bookkeeping.
use memory_match::{
    CardSet, CardState, GameStateManagement, MatchState,
    constants::{DECK_SIZE, MAX_TRIES, PAIR_COUNT},
    entities::Deck,
};
use proptest::prelude::*;
use rand::{SeedableRng, rngs::StdRng};
use std::collections::HashMap;

// Strategy to generate a click: mostly on the board, sometimes off it
fn click_strategy() -> impl Strategy<Value = usize> {
    prop_oneof![
        9 => 0..DECK_SIZE,
        1 => DECK_SIZE..DECK_SIZE + 4,
    ]
}

// Strategy to generate a run of clicks, with a flag after each saying
// whether the pending pair (if any) resolves before the next click
fn session_strategy() -> impl Strategy<Value = Vec<(usize, bool)>> {
    prop::collection::vec((click_strategy(), any::<bool>()), 0..120)
}

fn name_counts(deck: &Deck) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for entry in deck.iter() {
        *counts.entry(entry.card.name.clone()).or_insert(0) += 1;
    }
    counts
}

proptest! {
    #[test]
    fn test_deal_has_two_of_each(seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let deck = Deck::deal(&CardSet::builtin(), &mut rng);

        prop_assert_eq!(deck.len(), DECK_SIZE);
        let counts = name_counts(&deck);
        prop_assert_eq!(counts.len(), PAIR_COUNT);
        prop_assert!(counts.values().all(|&n| n == 2));
        prop_assert!(deck.iter().all(|e| e.state == CardState::FaceDown));
    }

    #[test]
    fn test_deal_is_deterministic(seed in any::<u64>()) {
        let a = Deck::deal(&CardSet::builtin(), &mut StdRng::seed_from_u64(seed));
        let b = Deck::deal(&CardSet::builtin(), &mut StdRng::seed_from_u64(seed));
        prop_assert_eq!(a, b);
    }

    #[test]
    fn test_round_invariants_hold(seed in any::<u64>(), clicks in session_strategy()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut state = MatchState::new(CardSet::builtin(), &mut rng);

        for (position, resolve_now) in clicks {
            let matched_before = state.matched_pairs();
            let tries_before = state.tries_remaining();
            let flipped_before = state.flipped_positions().to_vec();

            if state.select(position).is_err() {
                // Ignored selections leave everything alone
                prop_assert_eq!(state.matched_pairs(), matched_before);
                prop_assert_eq!(state.tries_remaining(), tries_before);
                prop_assert_eq!(state.flipped_positions(), flipped_before.as_slice());
            }

            if resolve_now && let Some((ticket, _)) = state.pending_resolution() {
                prop_assert!(state.resolve(ticket));
            }

            let view = state.get_view();
            let matched_cards = view
                .cards
                .iter()
                .filter(|c| c.state == CardState::Matched)
                .count();
            let flipped_cards = view
                .cards
                .iter()
                .filter(|c| c.state == CardState::Flipped)
                .count();

            prop_assert!(view.flipped.len() <= 2);
            prop_assert_eq!(flipped_cards, view.flipped.len());
            prop_assert_eq!(matched_cards, 2 * view.matched_pairs);
            prop_assert!(view.tries_remaining <= MAX_TRIES);
            prop_assert_eq!(view.is_locked, view.flipped.len() == 2);
            prop_assert_eq!(state.is_terminal(), view.outcome.is_some());
            if view.matched_pairs == PAIR_COUNT {
                prop_assert!(state.is_terminal());
            }
            if view.tries_remaining == 0 {
                prop_assert!(state.is_terminal());
            }
        }
    }
}
