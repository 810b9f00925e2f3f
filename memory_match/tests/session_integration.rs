/// Integration tests for the session actor
///
/// These tests run the actor on a paused tokio clock, so reveal and announce
/// delays elapse in virtual time and can be measured exactly.
use memory_match::{
    CardSet, CardState, GameEvent, MAX_TRIES, SelectionError,
    entities::Deck,
    session::{SessionActor, SessionConfig, SessionHandle, SessionResponse},
};
use rand::{SeedableRng, rngs::StdRng};
use tokio::{
    sync::mpsc,
    time::{Duration, Instant, sleep},
};

const SEED: u64 = 17;

/// Spawn a seeded session and return the deck it dealt.
fn seeded_session() -> (SessionHandle, Deck) {
    let config = SessionConfig {
        seed: Some(SEED),
        ..SessionConfig::default()
    };
    let cards = CardSet::builtin();
    let deck = Deck::deal(&cards, &mut StdRng::seed_from_u64(SEED));
    let (actor, handle) = SessionActor::new(cards, config);
    tokio::spawn(actor.run());
    (handle, deck)
}

fn pairs(deck: &Deck) -> Vec<(usize, usize)> {
    CardSet::builtin()
        .iter()
        .map(|card| {
            let positions = deck.positions_of(&card.name);
            (positions[0], positions[1])
        })
        .collect()
}

fn mismatch(deck: &Deck) -> (usize, usize) {
    let first = &deck.get(0).unwrap().card.name;
    let other = deck
        .iter()
        .position(|entry| &entry.card.name != first)
        .unwrap();
    (0, other)
}

/// Subscribe and skip the board replay.
async fn subscribe(handle: &SessionHandle) -> mpsc::Receiver<GameEvent> {
    let (_, mut events) = handle.subscribe().await.unwrap();
    assert_eq!(
        events.recv().await,
        Some(GameEvent::RoundStarted { round: 0 })
    );
    assert_eq!(events.recv().await, Some(GameEvent::TriesChanged(MAX_TRIES)));
    events
}

async fn next_event(events: &mut mpsc::Receiver<GameEvent>) -> GameEvent {
    events.recv().await.unwrap()
}

fn card_event(event: &GameEvent) -> (usize, CardState) {
    match event {
        GameEvent::CardStateChanged(card) => (card.position, card.state),
        other => panic!("Expected card event, got {:?}", other),
    }
}

async fn select_pair(handle: &SessionHandle, a: usize, b: usize) {
    assert_eq!(handle.select_card(a).await, Ok(SessionResponse::Accepted));
    assert_eq!(handle.select_card(b).await, Ok(SessionResponse::Accepted));
}

#[tokio::test(start_paused = true)]
async fn test_match_resolves_after_reveal_delay() {
    let (handle, deck) = seeded_session();
    let mut events = subscribe(&handle).await;
    let (a, b) = pairs(&deck)[0];

    let start = Instant::now();
    select_pair(&handle, a, b).await;
    assert_eq!(card_event(&next_event(&mut events).await), (a, CardState::Flipped));
    assert_eq!(card_event(&next_event(&mut events).await), (b, CardState::Flipped));

    assert_eq!(card_event(&next_event(&mut events).await), (a, CardState::Matched));
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(1000), "{elapsed:?}");
    assert!(elapsed < Duration::from_millis(1100), "{elapsed:?}");
    assert_eq!(card_event(&next_event(&mut events).await), (b, CardState::Matched));

    let view = handle.view().await.unwrap();
    assert_eq!(view.matched_pairs, 1);
    assert_eq!(view.tries_remaining, MAX_TRIES);
    assert!(!view.is_locked);
}

#[tokio::test(start_paused = true)]
async fn test_mismatch_resolves_after_longer_delay() {
    let (handle, deck) = seeded_session();
    let mut events = subscribe(&handle).await;
    let (a, b) = mismatch(&deck);

    let start = Instant::now();
    select_pair(&handle, a, b).await;
    next_event(&mut events).await;
    next_event(&mut events).await;

    assert_eq!(card_event(&next_event(&mut events).await), (a, CardState::FaceDown));
    assert!(start.elapsed() >= Duration::from_millis(2000));
    assert_eq!(card_event(&next_event(&mut events).await), (b, CardState::FaceDown));
    assert_eq!(
        next_event(&mut events).await,
        GameEvent::TriesChanged(MAX_TRIES - 1)
    );
}

#[tokio::test(start_paused = true)]
async fn test_selection_ignored_while_locked() {
    let (handle, deck) = seeded_session();
    let (a, b) = mismatch(&deck);
    select_pair(&handle, a, b).await;

    let third = (0..12).find(|p| *p != a && *p != b).unwrap();
    assert_eq!(
        handle.select_card(third).await,
        Ok(SessionResponse::Ignored(SelectionError::Locked))
    );

    sleep(Duration::from_millis(2100)).await;
    assert_eq!(
        handle.select_card(third).await,
        Ok(SessionResponse::Accepted)
    );
}

#[tokio::test(start_paused = true)]
async fn test_stale_timer_after_restart_is_discarded() {
    let (handle, deck) = seeded_session();
    let mut events = subscribe(&handle).await;
    let (a, b) = mismatch(&deck);

    select_pair(&handle, a, b).await;
    next_event(&mut events).await;
    next_event(&mut events).await;

    assert_eq!(
        handle.restart().await,
        Ok(SessionResponse::Restarted { round: 1 })
    );
    assert_eq!(
        next_event(&mut events).await,
        GameEvent::RoundStarted { round: 1 }
    );
    assert_eq!(
        next_event(&mut events).await,
        GameEvent::TriesChanged(MAX_TRIES)
    );

    // Let the old mismatch timer fire
    sleep(Duration::from_millis(3000)).await;

    assert!(events.try_recv().is_err());
    let view = handle.view().await.unwrap();
    assert_eq!(view.round, 1);
    assert_eq!(view.phase, "Ready");
    assert_eq!(view.tries_remaining, MAX_TRIES);
    assert!(view.cards.iter().all(|c| c.state == CardState::FaceDown));
}

#[tokio::test(start_paused = true)]
async fn test_win_announced_after_final_match() {
    let (handle, deck) = seeded_session();
    let mut events = subscribe(&handle).await;

    for (a, b) in pairs(&deck) {
        select_pair(&handle, a, b).await;
        for _ in 0..4 {
            next_event(&mut events).await;
        }
    }
    let resolved_at = Instant::now();

    assert_eq!(next_event(&mut events).await, GameEvent::Won);
    assert!(resolved_at.elapsed() >= Duration::from_millis(500));

    let view = handle.view().await.unwrap();
    assert_eq!(view.matched_pairs, 6);
    assert_eq!(
        handle.select_card(0).await,
        Ok(SessionResponse::Ignored(SelectionError::GameOver))
    );
}

#[tokio::test(start_paused = true)]
async fn test_loss_announced_after_tries_reach_zero() {
    let (handle, deck) = seeded_session();
    let mut events = subscribe(&handle).await;
    let (a, b) = mismatch(&deck);

    for tries in (0..MAX_TRIES).rev() {
        select_pair(&handle, a, b).await;
        for _ in 0..4 {
            next_event(&mut events).await;
        }
        assert_eq!(
            next_event(&mut events).await,
            GameEvent::TriesChanged(tries)
        );
    }
    let resolved_at = Instant::now();

    assert_eq!(next_event(&mut events).await, GameEvent::Lost);
    assert!(resolved_at.elapsed() >= Duration::from_millis(1000));
}

#[tokio::test(start_paused = true)]
async fn test_restart_before_announcement_drops_it() {
    let (handle, deck) = seeded_session();
    let mut events = subscribe(&handle).await;

    for (a, b) in pairs(&deck) {
        select_pair(&handle, a, b).await;
        for _ in 0..4 {
            next_event(&mut events).await;
        }
    }

    handle.restart().await.unwrap();
    sleep(Duration::from_millis(1000)).await;

    assert_eq!(
        next_event(&mut events).await,
        GameEvent::RoundStarted { round: 1 }
    );
    assert_eq!(
        next_event(&mut events).await,
        GameEvent::TriesChanged(MAX_TRIES)
    );
    assert!(events.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn test_late_subscriber_sees_outcome() {
    let (handle, deck) = seeded_session();
    let (a, b) = mismatch(&deck);
    // Wait past each reveal delay so the actor has resolved before the next pair
    for _ in 0..MAX_TRIES {
        select_pair(&handle, a, b).await;
        sleep(Duration::from_millis(2100)).await;
    }
    sleep(Duration::from_millis(1100)).await;

    let (_, mut events) = handle.subscribe().await.unwrap();
    let mut replay = Vec::new();
    while let Ok(event) = events.try_recv() {
        replay.push(event);
    }

    assert_eq!(replay.first(), Some(&GameEvent::RoundStarted { round: 0 }));
    assert!(replay.contains(&GameEvent::TriesChanged(0)));
    assert_eq!(replay.last(), Some(&GameEvent::Lost));
}

#[tokio::test(start_paused = true)]
async fn test_dropped_subscriber_is_pruned() {
    let (handle, deck) = seeded_session();
    let events = subscribe(&handle).await;
    drop(events);

    let (a, b) = pairs(&deck)[1];
    select_pair(&handle, a, b).await;
    sleep(Duration::from_millis(1100)).await;

    assert_eq!(handle.view().await.unwrap().matched_pairs, 1);
}
