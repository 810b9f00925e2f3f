//! Rendering surface capability.
//!
//! The game never draws anything itself. A front end implements
//! [`RenderSurface`] and feeds every [`GameEvent`] it receives through
//! [`apply_event`].

use crate::game::{
    constants::DECK_SIZE,
    entities::{CardView, Outcome},
    state_machine::GameEvent,
};

/// What a front end must be able to display.
pub trait RenderSurface {
    /// Draw one board position. `card.face` is `None` while it is face-down.
    fn render(&mut self, card: &CardView);

    fn set_tries_display(&mut self, tries: u8);

    /// Reveal the restart affordance along with the round outcome.
    fn show_restart(&mut self, outcome: Outcome);

    fn hide_restart(&mut self);
}

/// Translate a game event into surface calls.
pub fn apply_event<S: RenderSurface + ?Sized>(surface: &mut S, event: &GameEvent) {
    match event {
        GameEvent::RoundStarted { .. } => {
            surface.hide_restart();
            for position in 0..DECK_SIZE {
                surface.render(&CardView::face_down(position));
            }
        }
        GameEvent::CardStateChanged(card) => surface.render(card),
        GameEvent::TriesChanged(tries) => surface.set_tries_display(*tries),
        GameEvent::Won => surface.show_restart(Outcome::Won),
        GameEvent::Lost => surface.show_restart(Outcome::Lost),
    }
}
