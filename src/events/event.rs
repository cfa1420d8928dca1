//! Game event types.
//!
//! Events describe what an accepted action did, in order. The host renders
//! them (animations, sounds, toasts); the engine never reads them back.

use serde::{Deserialize, Serialize};

use crate::cards::{CardId, Cutscene};
use crate::challenge::ChallengePhase;
use crate::core::{Difficulty, ResourceBundle, ResourceDelta};
use crate::tracking::ParadoxTier;

/// Something that happened during a transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A chapter was (re)entered.
    ChapterEntered {
        index: usize,
        chapter: String,
        resources: ResourceBundle,
        restart: bool,
    },

    /// A cutscene should be displayed.
    CutsceneShown(Cutscene),

    /// The sequence paused at the difficulty gate.
    DifficultyRequested,

    DifficultyChosen(Difficulty),

    /// Cards moved from the draw pile into the hand.
    CardsDrawn {
        cards: Vec<CardId>,
        reshuffled: bool,
    },

    /// A non-challenge card resolved.
    CardPlayed {
        card: CardId,
        cost: ResourceDelta,
        gain: ResourceDelta,
        progress: i64,
    },

    /// A challenge card was played; its cost is already paid.
    ChallengeOpened {
        card: CardId,
        kind: String,
        question: String,
        attempts: u32,
    },

    /// A submission was graded.
    AnswerGraded {
        card: CardId,
        correct: bool,
        phase: ChallengePhase,
        message: String,
        attempts_left: u32,
    },

    /// A hint became available (Easy, after a wrong answer).
    HintAvailable { card: CardId, hint: String },

    ParadoxChanged { value: i64, tier: ParadoxTier },

    /// The challenge was settled or abandoned.
    ChallengeResolved {
        card: CardId,
        success: bool,
        reward: Option<ResourceDelta>,
    },

    /// Figure passives credited at end of turn.
    PassiveIncome(ResourceDelta),

    /// The turn counter advanced to `turn`.
    TurnStarted { turn: u32 },

    ChapterCompleted { index: usize },

    /// Paradox collapse in a chapter with paradox mechanics.
    ChapterFailed { index: usize },

    GameCompleted,
}

impl GameEvent {
    /// Short name for logging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::ChapterEntered { .. } => "chapter_entered",
            GameEvent::CutsceneShown(_) => "cutscene_shown",
            GameEvent::DifficultyRequested => "difficulty_requested",
            GameEvent::DifficultyChosen(_) => "difficulty_chosen",
            GameEvent::CardsDrawn { .. } => "cards_drawn",
            GameEvent::CardPlayed { .. } => "card_played",
            GameEvent::ChallengeOpened { .. } => "challenge_opened",
            GameEvent::AnswerGraded { .. } => "answer_graded",
            GameEvent::HintAvailable { .. } => "hint_available",
            GameEvent::ParadoxChanged { .. } => "paradox_changed",
            GameEvent::ChallengeResolved { .. } => "challenge_resolved",
            GameEvent::PassiveIncome(_) => "passive_income",
            GameEvent::TurnStarted { .. } => "turn_started",
            GameEvent::ChapterCompleted { .. } => "chapter_completed",
            GameEvent::ChapterFailed { .. } => "chapter_failed",
            GameEvent::GameCompleted => "game_completed",
        }
    }
}
