//! Result of running one action through the reducer.

use std::time::Duration;

use thiserror::Error;

use super::event::GameEvent;
use crate::cards::CardId;

/// Work the host must schedule after the transition.
///
/// The reducer never sleeps. A decided challenge returns
/// `SettleChallenge { after }`; the host waits `after` (or not at all) and
/// then dispatches `Action::SettleChallenge`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Continuation {
    SettleChallenge { after: Duration },
}

/// Why an action was refused. A refused action leaves the session unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Refusal {
    #[error("no chapter is in play")]
    NotPlayable,

    #[error("a challenge is open")]
    ChallengeOpen,

    #[error("no challenge is open")]
    NoChallenge,

    #[error("the challenge is already decided")]
    ChallengeDecided,

    #[error("the challenge is not decided yet")]
    ChallengeUndecided,

    #[error("card {0} is not in hand")]
    NotInHand(CardId),

    #[error("cannot afford card {0}")]
    CannotAfford(CardId),

    #[error("nothing to proceed from")]
    NothingToProceed,

    #[error("no difficulty choice is pending")]
    NoDifficultyGate,

    #[error("catalog has no chapter {0}")]
    NoSuchChapter(usize),
}

/// Events, continuation, and refusal from one transition.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Dispatch {
    pub events: Vec<GameEvent>,
    pub continuation: Option<Continuation>,
    pub refused: Option<Refusal>,
}

impl Dispatch {
    /// A refusal with no events.
    #[must_use]
    pub fn refused(reason: Refusal) -> Self {
        Self {
            refused: Some(reason),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_accepted(&self) -> bool {
        self.refused.is_none()
    }

    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Whether any event matches.
    pub fn has(&self, pred: impl Fn(&GameEvent) -> bool) -> bool {
        self.events.iter().any(pred)
    }
}
