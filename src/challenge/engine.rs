//! Per-challenge grading state machine.
//!
//! ```text
//!                 wrong, attempts remain
//!               +-----------------------+
//!               v                       |
//! Presented --submit--> WrongRetry -----+
//!     |                     |
//!     |                     +--wrong, none left--> WrongFinal
//!     +--wrong, none left------------------------> WrongFinal
//!     +--correct (any attempt)-------------------> Correct
//! ```
//!
//! `WrongFinal` and `Correct` are terminal: they carry a `Settlement` the
//! session applies once the acknowledgement delay has passed. Paradox
//! penalties are charged per wrong submission, not at settlement.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cards::{Answer, Card, ChallengeSpec};
use crate::core::{AckDelays, Difficulty, ResourceDelta};

/// Penalty on Easy for the first wrong answer (one attempt still left).
pub const EASY_FIRST_PENALTY: i64 = 3;
/// Penalty on Easy for the final wrong answer.
pub const EASY_FINAL_PENALTY: i64 = 5;
/// Penalty on Medium per wrong answer.
pub const MEDIUM_PENALTY: i64 = 5;
/// Penalty on Hard per wrong answer.
pub const HARD_PENALTY: i64 = 8;

/// Where a challenge is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChallengePhase {
    /// Question shown, nothing submitted yet.
    Presented,
    /// Last answer was wrong; another attempt is allowed.
    WrongRetry,
    /// Last answer was wrong and no attempts remain.
    WrongFinal,
    /// Answered correctly.
    Correct,
}

impl ChallengePhase {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, ChallengePhase::WrongFinal | ChallengePhase::Correct)
    }
}

/// Final outcome handed to the session: `onResolve(success, reward?)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub success: bool,
    pub reward: Option<ResourceDelta>,
}

impl Resolution {
    #[must_use]
    pub fn success(reward: ResourceDelta) -> Self {
        Self {
            success: true,
            reward: Some(reward),
        }
    }

    #[must_use]
    pub fn failure() -> Self {
        Self {
            success: false,
            reward: None,
        }
    }
}

/// A terminal resolution plus how long to show feedback before applying it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settlement {
    pub resolution: Resolution,
    pub after: Duration,
}

/// Result of grading one submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grading {
    pub correct: bool,
    /// Paradox to add for this submission (0 when correct).
    pub paradox_penalty: i64,
    /// Feedback for the player.
    pub message: String,
    /// Phase after grading.
    pub phase: ChallengePhase,
    /// Present once the challenge is decided.
    pub settlement: Option<Settlement>,
}

/// An open challenge.
#[derive(Clone, Debug, PartialEq)]
pub struct ChallengeEngine {
    card: Arc<Card>,
    spec: ChallengeSpec,
    difficulty: Difficulty,
    tolerance: u32,
    max_attempts: u32,
    attempts_left: u32,
    wrong_answers: u32,
    phase: ChallengePhase,
    settlement: Option<Settlement>,
}

impl ChallengeEngine {
    /// Open a challenge for a card. Returns `None` for non-challenge cards.
    #[must_use]
    pub fn open(card: Arc<Card>, difficulty: Difficulty, tolerance: u32) -> Option<Self> {
        let spec = card.challenge_spec()?.clone();
        let max_attempts = difficulty.challenge_attempts();
        Some(Self {
            card,
            spec,
            difficulty,
            tolerance,
            max_attempts,
            attempts_left: max_attempts,
            wrong_answers: 0,
            phase: ChallengePhase::Presented,
            settlement: None,
        })
    }

    #[must_use]
    pub fn card(&self) -> &Arc<Card> {
        &self.card
    }

    #[must_use]
    pub fn spec(&self) -> &ChallengeSpec {
        &self.spec
    }

    #[must_use]
    pub fn phase(&self) -> ChallengePhase {
        self.phase
    }

    #[must_use]
    pub fn attempts_left(&self) -> u32 {
        self.attempts_left
    }

    #[must_use]
    pub fn wrong_answers(&self) -> u32 {
        self.wrong_answers
    }

    /// Pending settlement of a decided challenge.
    #[must_use]
    pub fn settlement(&self) -> Option<&Settlement> {
        self.settlement.as_ref()
    }

    /// Hint, available on Easy after the first wrong answer.
    #[must_use]
    pub fn hint(&self) -> Option<&str> {
        if self.difficulty == Difficulty::Easy && self.attempts_left < self.max_attempts {
            self.card.hint()
        } else {
            None
        }
    }

    /// Grade a submission. Returns `None` once the challenge is decided.
    pub fn submit(&mut self, answer: &Answer, delays: &AckDelays) -> Option<Grading> {
        if self.phase.is_terminal() {
            return None;
        }

        if self.spec.grade(answer, self.tolerance) {
            let reward = self.spec.reward().clone();
            let message = format!("Correct! Reward: {reward}.");
            return Some(self.decide(
                ChallengePhase::Correct,
                Resolution::success(reward),
                delays.success(),
                0,
                message,
            ));
        }

        let explanation = self.spec.explain();
        self.wrong_answers += 1;

        if self.attempts_left == 0 {
            let penalty = no_attempt_penalty(self.difficulty);
            let message = format!("{explanation} Paradox +{penalty}.");
            return Some(self.decide(
                ChallengePhase::WrongFinal,
                Resolution::failure(),
                delays.no_attempts(),
                penalty,
                message,
            ));
        }

        self.attempts_left -= 1;
        let penalty = wrong_answer_penalty(self.difficulty, self.attempts_left);
        let message = format!("{explanation} Paradox +{penalty}.");

        if self.attempts_left == 0 {
            return Some(self.decide(
                ChallengePhase::WrongFinal,
                Resolution::failure(),
                delays.final_wrong(),
                penalty,
                message,
            ));
        }

        self.phase = ChallengePhase::WrongRetry;
        Some(Grading {
            correct: false,
            paradox_penalty: penalty,
            message,
            phase: self.phase,
            settlement: None,
        })
    }

    fn decide(
        &mut self,
        phase: ChallengePhase,
        resolution: Resolution,
        after: Duration,
        penalty: i64,
        message: String,
    ) -> Grading {
        let settlement = Settlement { resolution, after };
        self.phase = phase;
        self.settlement = Some(settlement.clone());
        Grading {
            correct: phase == ChallengePhase::Correct,
            paradox_penalty: penalty,
            message,
            phase,
            settlement: Some(settlement),
        }
    }

    /// Close the challenge.
    ///
    /// A decided challenge settles as decided; an undecided one fails
    /// without reward and without further penalty.
    #[must_use]
    pub fn close(self) -> Resolution {
        match self.settlement {
            Some(settlement) => settlement.resolution,
            None => Resolution::failure(),
        }
    }
}

/// Penalty for a wrong answer that consumed an attempt.
fn wrong_answer_penalty(difficulty: Difficulty, attempts_left: u32) -> i64 {
    match difficulty {
        Difficulty::Easy if attempts_left >= 1 => EASY_FIRST_PENALTY,
        Difficulty::Easy => EASY_FINAL_PENALTY,
        Difficulty::Medium => MEDIUM_PENALTY,
        Difficulty::Hard => HARD_PENALTY,
    }
}

/// Penalty for a wrong answer when no attempts were available at all.
fn no_attempt_penalty(difficulty: Difficulty) -> i64 {
    match difficulty {
        Difficulty::Hard => HARD_PENALTY,
        _ => MEDIUM_PENALTY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Resource;

    fn quiz() -> Arc<Card> {
        Arc::new(
            Card::challenge(
                "quiz-ch1",
                "Scribe's Quiz",
                ResourceDelta::new(),
                ChallengeSpec::mcq("What is al-jabr?", ["restoration", "gradient", "pipeline"], [0])
                    .with_reward(ResourceDelta::single(Resource::Knowledge, 3)),
            )
            .with_prompt("Hint: al-jabr literally means restoration."),
        )
    }

    fn open(difficulty: Difficulty) -> ChallengeEngine {
        ChallengeEngine::open(quiz(), difficulty, 0).unwrap()
    }

    #[test]
    fn test_open_rejects_non_challenge() {
        let tech = Arc::new(Card::tech("t", "T", ResourceDelta::new(), ResourceDelta::new()));
        assert!(ChallengeEngine::open(tech, Difficulty::Easy, 0).is_none());
    }

    #[test]
    fn test_correct_first_try() {
        let mut engine = open(Difficulty::Medium);
        let grading = engine.submit(&Answer::Choice(0), &AckDelays::default()).unwrap();

        assert!(grading.correct);
        assert_eq!(grading.paradox_penalty, 0);
        assert_eq!(grading.phase, ChallengePhase::Correct);
        let settlement = grading.settlement.unwrap();
        assert_eq!(settlement.after, Duration::from_millis(650));
        assert_eq!(
            settlement.resolution,
            Resolution::success(ResourceDelta::single(Resource::Knowledge, 3))
        );
    }

    #[test]
    fn test_medium_single_wrong_is_final() {
        let mut engine = open(Difficulty::Medium);
        let grading = engine.submit(&Answer::Choice(1), &AckDelays::default()).unwrap();

        assert!(!grading.correct);
        assert_eq!(grading.paradox_penalty, 5);
        assert_eq!(grading.phase, ChallengePhase::WrongFinal);
        assert_eq!(grading.settlement.unwrap().resolution, Resolution::failure());
        assert!(grading.message.contains("restoration"));
    }

    #[test]
    fn test_easy_two_wrongs() {
        let mut engine = open(Difficulty::Easy);
        let delays = AckDelays::default();

        assert!(engine.hint().is_none());

        let first = engine.submit(&Answer::Choice(2), &delays).unwrap();
        assert_eq!(first.paradox_penalty, 3);
        assert_eq!(first.phase, ChallengePhase::WrongRetry);
        assert!(first.settlement.is_none());
        assert_eq!(engine.attempts_left(), 1);
        assert_eq!(engine.hint(), Some("Hint: al-jabr literally means restoration."));

        let second = engine.submit(&Answer::Choice(1), &delays).unwrap();
        assert_eq!(second.paradox_penalty, 5);
        assert_eq!(second.phase, ChallengePhase::WrongFinal);
        assert_eq!(second.settlement.unwrap().after, Duration::from_millis(900));
    }

    #[test]
    fn test_easy_retry_then_correct() {
        let mut engine = open(Difficulty::Easy);
        let delays = AckDelays::default();

        engine.submit(&Answer::Choice(2), &delays).unwrap();
        let grading = engine.submit(&Answer::Choice(0), &delays).unwrap();

        assert!(grading.correct);
        assert_eq!(engine.wrong_answers(), 1);
    }

    #[test]
    fn test_hard_wrong_is_immediately_final() {
        let mut engine = open(Difficulty::Hard);
        let grading = engine.submit(&Answer::Choice(1), &AckDelays::default()).unwrap();

        assert_eq!(grading.paradox_penalty, 8);
        assert_eq!(grading.phase, ChallengePhase::WrongFinal);
        assert_eq!(grading.settlement.unwrap().after, Duration::from_millis(600));
        assert!(engine.hint().is_none());
    }

    #[test]
    fn test_submit_after_decided_is_refused() {
        let mut engine = open(Difficulty::Hard);
        engine.submit(&Answer::Choice(1), &AckDelays::default());

        assert!(engine.submit(&Answer::Choice(0), &AckDelays::default()).is_none());
    }

    #[test]
    fn test_close_undecided_fails() {
        let engine = open(Difficulty::Easy);
        assert_eq!(engine.close(), Resolution::failure());
    }

    #[test]
    fn test_close_decided_keeps_outcome() {
        let mut engine = open(Difficulty::Easy);
        engine.submit(&Answer::Choice(0), &AckDelays::default());

        assert!(engine.close().success);
    }
}
