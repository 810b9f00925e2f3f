use std::time::Duration;

/// Number of distinct card types in a deck. Each one is dealt twice.
pub const PAIR_COUNT: usize = 6;

/// Number of board positions.
pub const DECK_SIZE: usize = 2 * PAIR_COUNT;

/// Mismatches a player can afford before the round is lost.
pub const MAX_TRIES: u8 = 6;

/// How long a matched pair stays face-up before it is marked matched.
pub const MATCH_REVEAL_DELAY: Duration = Duration::from_millis(1000);

/// How long a mismatched pair stays face-up before flipping back.
pub const MISMATCH_REVEAL_DELAY: Duration = Duration::from_millis(2000);

/// Pause between the final match and the win announcement.
pub const WIN_ANNOUNCE_DELAY: Duration = Duration::from_millis(500);

/// Pause between the final mismatch and the loss announcement.
pub const LOSS_ANNOUNCE_DELAY: Duration = Duration::from_millis(1000);
