//! Bot player driving a session through its handle.

use super::{
    decision::BotDecisionMaker,
    models::{BotConfig, BotStats},
};
use crate::{
    game::{GameEvent, entities::Outcome},
    session::{SessionError, SessionHandle, SessionResult},
};
use tokio::sync::mpsc;

/// Bot player state
pub struct BotPlayer {
    /// Bot configuration
    pub config: BotConfig,

    /// Statistics tracker
    pub stats: BotStats,

    decisions: BotDecisionMaker,
}

impl BotPlayer {
    /// Create a new bot player
    pub fn new(config: BotConfig) -> Self {
        let decisions = BotDecisionMaker::new(&config);
        Self {
            config,
            stats: BotStats::default(),
            decisions,
        }
    }

    /// Create a bot player whose choices are reproducible
    pub fn with_seed(config: BotConfig, seed: u64) -> Self {
        let decisions = BotDecisionMaker::with_seed(&config, seed);
        Self {
            config,
            stats: BotStats::default(),
            decisions,
        }
    }

    /// Play `games` rounds back to back, restarting between them.
    pub async fn play_games(&mut self, handle: &SessionHandle, games: u32) -> SessionResult<()> {
        let (subscriber_id, mut events) = handle.subscribe().await?;

        for game in 0..games {
            if game > 0 {
                handle.restart().await?;
            }
            let outcome = self.play_round(handle, &mut events).await?;
            log::debug!("{} game {}: {}", self.config.name, game + 1, outcome);
        }

        handle.unsubscribe(subscriber_id).await
    }

    /// Play the current round until its outcome is announced.
    ///
    /// `events` must be a subscription to the same session.
    pub async fn play_round(
        &mut self,
        handle: &SessionHandle,
        events: &mut mpsc::Receiver<GameEvent>,
    ) -> SessionResult<Outcome> {
        loop {
            while let Ok(event) = events.try_recv() {
                if let Some(outcome) = self.handle_event(&event) {
                    return Ok(outcome);
                }
            }

            let view = handle.view().await?;
            match self.decisions.next_move(&view) {
                Some(position) => {
                    if !self.config.think_time.is_zero() {
                        tokio::time::sleep(self.config.think_time).await;
                    }
                    let response = handle.select_card(position).await?;
                    if response.is_accepted() {
                        self.stats.selections += 1;
                    } else {
                        log::debug!(
                            "{} selection of {} not accepted: {:?}",
                            self.config.name,
                            position,
                            response
                        );
                    }
                }
                // Locked or finished: nothing to do until the session moves on
                None => {
                    let event = events.recv().await.ok_or(SessionError::Closed)?;
                    if let Some(outcome) = self.handle_event(&event) {
                        return Ok(outcome);
                    }
                }
            }
        }
    }

    fn handle_event(&mut self, event: &GameEvent) -> Option<Outcome> {
        self.decisions.observe(event);
        let outcome = event.outcome()?;
        self.stats.record_game(outcome);
        Some(outcome)
    }
}
