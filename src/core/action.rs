//! Player actions: the input alphabet of the reducer.
//!
//! Every state change in a session is caused by exactly one `Action`.
//! Actions are plain data so they can be logged, replayed, and recorded in
//! the session history.

use serde::{Deserialize, Serialize};

use super::config::Difficulty;
use crate::cards::{Answer, CardId};

/// A player (or host) action.
///
/// ## Example
///
/// ```
/// use codex_engine::core::{Action, Difficulty};
///
/// let start = Action::NewGame { difficulty: Difficulty::Easy, force_backstory: true };
/// let play = Action::play("algebra");
///
/// assert!(!start.is_gameplay());
/// assert!(play.is_gameplay());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Start over at chapter 0 with the starting wallet.
    NewGame {
        difficulty: Difficulty,
        /// Replay the backstory even if it was already seen.
        force_backstory: bool,
    },
    /// Answer the difficulty gate.
    ChooseDifficulty(Difficulty),
    /// Advance past the current cutscene.
    Proceed,
    /// Play a card from hand (opens a challenge for challenge cards).
    PlayCard(CardId),
    /// Draw one card.
    Draw,
    /// Credit passives, advance the turn, draw one card.
    EndTurn,
    /// Submit an answer to the open challenge.
    SubmitAnswer(Answer),
    /// Apply the decided challenge outcome (the then-resolve continuation).
    SettleChallenge,
    /// Close the open challenge without answering.
    AbandonChallenge,
}

impl Action {
    /// Shorthand for `PlayCard`.
    #[must_use]
    pub fn play(id: impl Into<String>) -> Self {
        Action::PlayCard(CardId::new(id))
    }

    /// Whether this action requires the playable state.
    #[must_use]
    pub fn is_gameplay(&self) -> bool {
        matches!(self, Action::PlayCard(_) | Action::Draw | Action::EndTurn)
    }

    /// Whether this action targets the open challenge.
    #[must_use]
    pub fn is_challenge(&self) -> bool {
        matches!(
            self,
            Action::SubmitAnswer(_) | Action::SettleChallenge | Action::AbandonChallenge
        )
    }
}

/// An accepted action with the turn it happened on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub turn: u32,
    pub action: Action,
}

impl ActionRecord {
    #[must_use]
    pub fn new(turn: u32, action: Action) -> Self {
        Self { turn, action }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(Action::Draw.is_gameplay());
        assert!(Action::EndTurn.is_gameplay());
        assert!(!Action::Proceed.is_gameplay());
        assert!(Action::AbandonChallenge.is_challenge());
        assert!(Action::SubmitAnswer(Answer::Choice(0)).is_challenge());
        assert!(!Action::play("x").is_challenge());
    }

    #[test]
    fn test_action_record_serialization() {
        let record = ActionRecord::new(3, Action::play("algebra"));

        let json = serde_json::to_string(&record).unwrap();
        let back: ActionRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(record, back);
    }
}
