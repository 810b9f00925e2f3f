//! Phase types for the memory game FSM.
//!
//! Each type marks one phase of a round. Only `Resolving` carries data: the
//! ticket and outcome of the pair being evaluated.

use super::entities::{Outcome, PairOutcome, Position, Ticket};

/// Marker data for each phase of a round.
pub trait Phase {
    const NAME: &'static str;
    const LOCKED: bool = false;
    const OUTCOME: Option<Outcome> = None;
}

/// Fresh deck, nothing flipped yet this round.
#[derive(Debug)]
pub struct Ready;

#[derive(Debug)]
pub struct AwaitingFirstFlip;

#[derive(Debug)]
pub struct AwaitingSecondFlip;

/// Two cards are face-up and their evaluation is scheduled. Input is locked.
#[derive(Debug)]
pub struct Resolving {
    pub(crate) ticket: Ticket,
    pub(crate) pair: [Position; 2],
    pub(crate) outcome: PairOutcome,
}

#[derive(Debug)]
pub struct Won;

#[derive(Debug)]
pub struct Lost;

impl Phase for Ready {
    const NAME: &'static str = "Ready";
}

impl Phase for AwaitingFirstFlip {
    const NAME: &'static str = "AwaitingFirstFlip";
}

impl Phase for AwaitingSecondFlip {
    const NAME: &'static str = "AwaitingSecondFlip";
}

impl Phase for Resolving {
    const NAME: &'static str = "Resolving";
    const LOCKED: bool = true;
}

impl Phase for Won {
    const NAME: &'static str = "Won";
    const OUTCOME: Option<Outcome> = Some(Outcome::Won);
}

impl Phase for Lost {
    const NAME: &'static str = "Lost";
    const OUTCOME: Option<Outcome> = Some(Outcome::Lost);
}
