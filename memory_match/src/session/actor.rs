//! Session actor implementation with async message handling.

use super::{
    config::SessionConfig,
    messages::{SessionMessage, SessionResponse, SubscriberId},
};
use crate::game::{
    GameEvent, GameStateManagement, MatchState,
    entities::{CardSet, CardState, GameView, Outcome, Position, RoundId, Ticket},
};
use rand::{SeedableRng, rngs::StdRng};
use std::collections::HashMap;
use thiserror::Error;
use tokio::{
    sync::{mpsc, oneshot},
    time::Duration,
};

/// Session errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// The actor has stopped and its inbox is gone
    #[error("Session is closed")]
    Closed,

    /// The actor dropped the request without answering
    #[error("Session dropped the request")]
    NoResponse,
}

/// Result type for session operations
pub type SessionResult<T> = Result<T, SessionError>;

/// Session actor handle for sending messages
#[derive(Clone, Debug)]
pub struct SessionHandle {
    sender: mpsc::Sender<SessionMessage>,
}

impl SessionHandle {
    /// Create a new session handle
    pub fn new(sender: mpsc::Sender<SessionMessage>) -> Self {
        Self { sender }
    }

    /// Send a message to the session
    pub async fn send(&self, message: SessionMessage) -> SessionResult<()> {
        self.sender
            .send(message)
            .await
            .map_err(|_| SessionError::Closed)
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> SessionMessage,
    ) -> SessionResult<T> {
        let (response, rx) = oneshot::channel();
        self.send(build(response)).await?;
        rx.await.map_err(|_| SessionError::NoResponse)
    }

    pub async fn select_card(&self, position: Position) -> SessionResult<SessionResponse> {
        self.request(|response| SessionMessage::SelectCard { position, response })
            .await
    }

    pub async fn restart(&self) -> SessionResult<SessionResponse> {
        self.request(|response| SessionMessage::Restart { response })
            .await
    }

    pub async fn view(&self) -> SessionResult<GameView> {
        self.request(|response| SessionMessage::GetView { response })
            .await
    }

    /// Subscribe to game events. The first events received rebuild the
    /// current board.
    pub async fn subscribe(&self) -> SessionResult<(SubscriberId, mpsc::Receiver<GameEvent>)> {
        self.request(|response| SessionMessage::Subscribe { response })
            .await
    }

    pub async fn unsubscribe(&self, subscriber_id: SubscriberId) -> SessionResult<()> {
        self.send(SessionMessage::Unsubscribe { subscriber_id })
            .await
    }

    /// Stop the session. Pending timers are discarded.
    pub async fn close(&self) -> SessionResult<()> {
        self.request(|response| SessionMessage::Close { response })
            .await
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// Session actor running one memory game
///
/// Owns the round state and is the only thing that mutates it. Reveal and
/// announce delays run as detached timer tasks that post back into the
/// inbox, so every transition happens on the actor's task.
pub struct SessionActor {
    /// Session configuration
    config: SessionConfig,

    /// Round state (FSM)
    state: MatchState,

    /// Shuffle source for every deal of this session
    rng: StdRng,

    /// Message inbox
    inbox: mpsc::Receiver<SessionMessage>,

    /// Timer tasks post through this. Weak, so dropping every handle still
    /// shuts the actor down.
    loopback: mpsc::WeakSender<SessionMessage>,

    /// Outcome already announced for the current round
    announced: Option<Outcome>,

    /// Is session closed
    is_closed: bool,

    /// Event subscribers
    subscribers: HashMap<SubscriberId, mpsc::Sender<GameEvent>>,

    next_subscriber_id: SubscriberId,
}

impl SessionActor {
    /// Create a new session actor dealing from `cards`
    ///
    /// # Returns
    ///
    /// * `(SessionActor, SessionHandle)` - Actor and handle for sending messages
    pub fn new(cards: CardSet, config: SessionConfig) -> (Self, SessionHandle) {
        let (sender, inbox) = mpsc::channel(100);

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let mut state = MatchState::new(cards, &mut rng);
        // Subscribers get a replay on subscribe; the opening events are redundant
        state.drain_events();

        let actor = Self {
            config,
            state,
            rng,
            inbox,
            loopback: sender.downgrade(),
            announced: None,
            is_closed: false,
            subscribers: HashMap::new(),
            next_subscriber_id: 0,
        };

        (actor, SessionHandle::new(sender))
    }

    /// Run the session actor event loop
    pub async fn run(mut self) {
        log::info!(
            "Session '{}' starting at {} speed",
            self.config.name,
            self.config.speed
        );

        while let Some(message) = self.inbox.recv().await {
            self.handle_message(message);

            if self.is_closed {
                break;
            }
        }

        log::info!("Session '{}' closed", self.config.name);
    }

    /// Handle a session message
    fn handle_message(&mut self, message: SessionMessage) {
        match message {
            SessionMessage::SelectCard { position, response } => {
                let result = self.handle_select(position);
                let _ = response.send(result);
            }

            SessionMessage::Restart { response } => {
                let result = self.handle_restart();
                let _ = response.send(result);
            }

            SessionMessage::GetView { response } => {
                let _ = response.send(self.state.get_view());
            }

            SessionMessage::Subscribe { response } => {
                let subscription = self.handle_subscribe();
                if response.send(subscription).is_err() {
                    log::debug!(
                        "Session '{}': subscriber went away before subscribing",
                        self.config.name
                    );
                }
            }

            SessionMessage::Unsubscribe { subscriber_id } => {
                self.subscribers.remove(&subscriber_id);
                log::debug!(
                    "Subscriber {} unsubscribed from session '{}'",
                    subscriber_id,
                    self.config.name
                );
            }

            SessionMessage::Close { response } => {
                self.is_closed = true;
                let _ = response.send(());
            }

            SessionMessage::Resolve { ticket } => {
                self.handle_resolve(ticket);
            }

            SessionMessage::Announce { round, outcome } => {
                self.handle_announce(round, outcome);
            }
        }
    }

    fn handle_select(&mut self, position: Position) -> SessionResponse {
        if let Err(e) = self.state.select(position) {
            log::debug!(
                "Session '{}': ignored selection of {}: {}",
                self.config.name,
                position,
                e
            );
            return SessionResponse::Ignored(e);
        }

        self.flush_events();

        if let Some((ticket, outcome)) = self.state.pending_resolution() {
            let delay = self.config.reveal_delay(outcome);
            log::debug!(
                "Session '{}': resolving {} in {:?}",
                self.config.name,
                ticket,
                delay
            );
            self.schedule(delay, SessionMessage::Resolve { ticket });
        }

        SessionResponse::Accepted
    }

    fn handle_restart(&mut self) -> SessionResponse {
        self.state.restart(&mut self.rng);
        self.announced = None;
        self.flush_events();

        let round = self.state.round();
        log::info!("Session '{}' restarted, round {}", self.config.name, round);
        SessionResponse::Restarted { round }
    }

    fn handle_subscribe(&mut self) -> (SubscriberId, mpsc::Receiver<GameEvent>) {
        let (sender, receiver) = mpsc::channel(self.config.event_buffer);
        let subscriber_id = self.next_subscriber_id;
        self.next_subscriber_id += 1;

        for event in self.replay_events() {
            if sender.try_send(event).is_err() {
                log::warn!(
                    "Subscriber {} buffer too small for board replay",
                    subscriber_id
                );
                break;
            }
        }

        self.subscribers.insert(subscriber_id, sender);
        log::debug!(
            "Subscriber {} subscribed to session '{}'",
            subscriber_id,
            self.config.name
        );
        (subscriber_id, receiver)
    }

    fn handle_resolve(&mut self, ticket: Ticket) {
        if !self.state.resolve(ticket) {
            log::warn!(
                "Session '{}': discarding stale {}",
                self.config.name,
                ticket
            );
            return;
        }

        log::debug!(
            "Session '{}': resolved {}, {} tries left",
            self.config.name,
            ticket,
            self.state.tries_remaining()
        );

        for event in self.state.drain_events() {
            match event.outcome() {
                Some(outcome) => {
                    let delay = self.config.announce_delay(outcome);
                    self.schedule(
                        delay,
                        SessionMessage::Announce {
                            round: ticket.round,
                            outcome,
                        },
                    );
                }
                None => self.notify(event),
            }
        }
    }

    fn handle_announce(&mut self, round: RoundId, outcome: Outcome) {
        if self.state.round() != round || self.state.outcome() != Some(outcome) {
            log::debug!(
                "Session '{}': dropping {} announcement for round {}",
                self.config.name,
                outcome,
                round
            );
            return;
        }

        log::info!(
            "Session '{}' round {}: {}",
            self.config.name,
            round,
            outcome
        );
        self.announced = Some(outcome);
        self.notify(outcome.into());
    }

    /// Events that rebuild the current board on a fresh surface
    fn replay_events(&self) -> Vec<GameEvent> {
        let view = self.state.get_view();
        let mut events = vec![
            GameEvent::RoundStarted { round: view.round },
            GameEvent::TriesChanged(view.tries_remaining),
        ];
        events.extend(
            view.cards
                .into_iter()
                .filter(|card| card.state != CardState::FaceDown)
                .map(GameEvent::CardStateChanged),
        );
        events.extend(self.announced.map(GameEvent::from));
        events
    }

    fn flush_events(&mut self) {
        for event in self.state.drain_events() {
            self.notify(event);
        }
    }

    /// Post `message` back to this actor after `delay`.
    ///
    /// Timers are never cancelled. A late `Resolve` is rejected by its
    /// ticket, a late `Announce` by its round.
    fn schedule(&self, delay: Duration, message: SessionMessage) {
        let loopback = self.loopback.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(sender) = loopback.upgrade() {
                let _ = sender.send(message).await;
            }
        });
    }

    /// Broadcast an event to all subscribers
    fn notify(&mut self, event: GameEvent) {
        self.subscribers.retain(|subscriber_id, sender| {
            match sender.try_send(event.clone()) {
                Ok(_) => true,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    log::warn!(
                        "Subscriber {} channel full, dropping event: {}",
                        subscriber_id,
                        event
                    );
                    true
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    log::debug!("Subscriber {} disconnected, removing", subscriber_id);
                    false
                }
            }
        });
    }
}
