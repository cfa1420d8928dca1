//! Challenge resolution.
//!
//! Playing a challenge card is a two-phase commit:
//!
//! 1. **Open**: the session charges the card's cost and creates a
//!    `ChallengeEngine` in `Presented`.
//! 2. **Settle**: once the engine reaches a terminal phase (or the player
//!    abandons it), the session applies the `Resolution`: reward, progress,
//!    and paradox relief on success; nothing further on failure.
//!
//! There is no path that charges twice or refunds.

mod engine;

pub use engine::{
    ChallengeEngine, ChallengePhase, Grading, Resolution, Settlement, EASY_FINAL_PENALTY,
    EASY_FIRST_PENALTY, HARD_PENALTY, MEDIUM_PENALTY,
};
