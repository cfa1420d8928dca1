//! Chapter sequencing: cutscene queue, difficulty gate, deferred draw,
//! and chapter-end transitions.
//!
//! ## States
//!
//! ```text
//! Idle --enter--> Cutscene(queue) --proceed...--> [AwaitingDifficulty] --> Playable
//!                                                                           |
//!                      ChapterComplete / ChapterFailed <--------------------+
//!                                 |
//!                   proceed (tagged intent) --> Idle --> enter next / same
//! ```
//!
//! The controller never touches piles or resources. Each call returns a
//! `SequenceStep` telling the session what to do next (show a cutscene,
//! perform the opening draw, enter another chapter).

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::cards::{Chapter, Cutscene};

/// Sequencer state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SequencePhase {
    /// No chapter entered yet, or between chapters.
    #[default]
    Idle,
    /// Showing queued cutscenes.
    Cutscene,
    /// Paused at the difficulty gate.
    AwaitingDifficulty,
    /// Cards may be played.
    Playable,
    /// Chapter-complete cutscene showing.
    ChapterComplete,
    /// Chapter-failed cutscene showing.
    ChapterFailed,
    /// Last chapter done.
    GameComplete,
}

/// What a terminal cutscene's `proceed` does.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProceedIntent {
    AdvanceToNextChapter,
    RestartCurrentChapter,
    FinishGame,
}

/// Instruction returned to the session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SequenceStep {
    /// Display this cutscene.
    ShowCutscene(Cutscene),
    /// Ask the player for a difficulty.
    AwaitDifficulty,
    /// The chapter is now playable; draw this many cards (0 after the first time).
    InitialDraw(usize),
    /// Enter the next chapter with carried resources.
    AdvanceChapter,
    /// Re-enter the current chapter from scratch.
    RestartChapter,
    /// The game is over.
    GameComplete,
    /// Nothing to do in the current state.
    Ignored,
}

/// Cutscene queue and chapter transition state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SequenceController {
    phase: SequencePhase,
    current: Option<Cutscene>,
    queue: Vector<Cutscene>,
    after_gate: Vector<Cutscene>,
    gate_pending: bool,
    pending_draw: usize,
    intent: Option<ProceedIntent>,
    backstory_seen: bool,
}

impl SequenceController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Controller for a restored session: playable, with the backstory seen.
    #[must_use]
    pub fn resumed() -> Self {
        Self {
            phase: SequencePhase::Playable,
            backstory_seen: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn phase(&self) -> SequencePhase {
        self.phase
    }

    #[must_use]
    pub fn is_playable(&self) -> bool {
        self.phase == SequencePhase::Playable
    }

    /// Cutscene currently on screen.
    #[must_use]
    pub fn current(&self) -> Option<&Cutscene> {
        self.current.as_ref()
    }

    /// Cutscenes still queued behind the current one (before the gate).
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    /// Opening draw still owed.
    #[must_use]
    pub fn pending_draw(&self) -> usize {
        self.pending_draw
    }

    #[must_use]
    pub fn intent(&self) -> Option<ProceedIntent> {
        self.intent
    }

    #[must_use]
    pub fn backstory_seen(&self) -> bool {
        self.backstory_seen
    }

    /// Build the opening queue for a chapter and defer `draw_count` cards.
    ///
    /// The backstory segment plays when `force_backstory` is set or it has
    /// never been seen.
    pub fn enter_chapter(&mut self, chapter: &Chapter, draw_count: usize, force_backstory: bool) -> SequenceStep {
        let script = chapter.opening_script();
        let show_backstory =
            !script.backstory.is_empty() && (force_backstory || !self.backstory_seen);

        self.intent = None;
        self.current = None;
        self.pending_draw = draw_count;
        self.gate_pending = script.difficulty_gate;

        let mut queue = Vector::new();
        if show_backstory {
            queue.extend(script.backstory);
            self.backstory_seen = true;
        }
        if script.difficulty_gate {
            self.after_gate = script.arrival.into_iter().collect();
        } else {
            self.after_gate = Vector::new();
            queue.extend(script.arrival);
        }
        self.queue = queue;

        tracing::debug!(
            chapter = %chapter.id,
            queued = self.queue.len(),
            gate = self.gate_pending,
            draw_count,
            "Entering chapter sequence"
        );

        self.advance()
    }

    /// Advance past the current cutscene.
    pub fn proceed(&mut self) -> SequenceStep {
        match self.phase {
            SequencePhase::Cutscene
            | SequencePhase::ChapterComplete
            | SequencePhase::ChapterFailed => {}
            _ => return SequenceStep::Ignored,
        }

        if let Some(intent) = self.intent.take() {
            self.current = None;
            return match intent {
                ProceedIntent::AdvanceToNextChapter => {
                    self.phase = SequencePhase::Idle;
                    SequenceStep::AdvanceChapter
                }
                ProceedIntent::RestartCurrentChapter => {
                    self.phase = SequencePhase::Idle;
                    SequenceStep::RestartChapter
                }
                ProceedIntent::FinishGame => {
                    self.phase = SequencePhase::GameComplete;
                    SequenceStep::GameComplete
                }
            };
        }

        self.advance()
    }

    /// Supply the difficulty choice; `draw_count` replaces the deferred draw.
    pub fn choose_difficulty(&mut self, draw_count: usize) -> SequenceStep {
        if self.phase != SequencePhase::AwaitingDifficulty {
            return SequenceStep::Ignored;
        }
        self.gate_pending = false;
        self.pending_draw = draw_count;
        self.queue = std::mem::take(&mut self.after_gate);
        self.advance()
    }

    /// Show the chapter-complete cutscene. Only valid while playable.
    pub fn complete_chapter(&mut self, cutscene: Cutscene, is_last: bool) -> SequenceStep {
        let intent = if is_last {
            ProceedIntent::FinishGame
        } else {
            ProceedIntent::AdvanceToNextChapter
        };
        self.terminal(SequencePhase::ChapterComplete, intent, cutscene)
    }

    /// Show the chapter-failed cutscene. Only valid while playable.
    pub fn fail_chapter(&mut self, cutscene: Cutscene) -> SequenceStep {
        self.terminal(
            SequencePhase::ChapterFailed,
            ProceedIntent::RestartCurrentChapter,
            cutscene,
        )
    }

    fn terminal(&mut self, phase: SequencePhase, intent: ProceedIntent, cutscene: Cutscene) -> SequenceStep {
        if self.phase != SequencePhase::Playable {
            return SequenceStep::Ignored;
        }
        self.phase = phase;
        self.intent = Some(intent);
        self.queue = Vector::new();
        self.current = Some(cutscene.clone());
        SequenceStep::ShowCutscene(cutscene)
    }

    /// Pop the next queued cutscene, stop at the gate, or become playable.
    fn advance(&mut self) -> SequenceStep {
        if let Some(next) = self.queue.pop_front() {
            self.phase = SequencePhase::Cutscene;
            self.current = Some(next.clone());
            return SequenceStep::ShowCutscene(next);
        }

        self.current = None;
        if self.gate_pending {
            self.phase = SequencePhase::AwaitingDifficulty;
            return SequenceStep::AwaitDifficulty;
        }

        self.phase = SequencePhase::Playable;
        SequenceStep::InitialDraw(std::mem::take(&mut self.pending_draw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CutsceneScript;

    fn scenes(titles: &[&str]) -> Vec<Cutscene> {
        titles.iter().map(|t| Cutscene::new(*t, "")).collect()
    }

    fn gated_chapter() -> Chapter {
        Chapter::new("ch1", "Baghdad").with_intro(CutsceneScript {
            backstory: scenes(&["Backstory", "Through the Rift"]),
            difficulty_gate: true,
            arrival: scenes(&["Arrival", "House of Wisdom"]),
        })
    }

    fn titles(step: &SequenceStep) -> &str {
        match step {
            SequenceStep::ShowCutscene(c) => &c.title,
            _ => "",
        }
    }

    #[test]
    fn test_plain_chapter_single_scene() {
        let mut seq = SequenceController::new();
        let chapter = Chapter::new("ch2", "Renaissance");

        let step = seq.enter_chapter(&chapter, 4, false);
        assert_eq!(titles(&step), "Renaissance");
        assert_eq!(seq.phase(), SequencePhase::Cutscene);
        assert!(!seq.is_playable());

        assert_eq!(seq.proceed(), SequenceStep::InitialDraw(4));
        assert!(seq.is_playable());
        assert_eq!(seq.pending_draw(), 0);
    }

    #[test]
    fn test_gate_pauses_queue() {
        let mut seq = SequenceController::new();
        let step = seq.enter_chapter(&gated_chapter(), 4, true);

        assert_eq!(titles(&step), "Backstory");
        assert_eq!(titles(&seq.proceed()), "Through the Rift");
        assert_eq!(seq.proceed(), SequenceStep::AwaitDifficulty);
        assert_eq!(seq.phase(), SequencePhase::AwaitingDifficulty);

        // Proceeding does nothing until a difficulty is chosen
        assert_eq!(seq.proceed(), SequenceStep::Ignored);

        assert_eq!(titles(&seq.choose_difficulty(5)), "Arrival");
        assert_eq!(titles(&seq.proceed()), "House of Wisdom");
        assert_eq!(seq.proceed(), SequenceStep::InitialDraw(5));
        assert!(seq.is_playable());
    }

    #[test]
    fn test_seen_backstory_goes_straight_to_gate() {
        let mut seq = SequenceController::new();
        let chapter = gated_chapter();
        seq.enter_chapter(&chapter, 4, false);
        assert!(seq.backstory_seen());

        let step = seq.enter_chapter(&chapter, 4, false);
        assert_eq!(step, SequenceStep::AwaitDifficulty);
        assert_eq!(titles(&seq.choose_difficulty(4)), "Arrival");
    }

    #[test]
    fn test_initial_draw_happens_once() {
        let mut seq = SequenceController::new();
        seq.enter_chapter(&Chapter::new("ch2", "Renaissance"), 4, false);

        assert_eq!(seq.proceed(), SequenceStep::InitialDraw(4));
        assert_eq!(seq.proceed(), SequenceStep::Ignored);
        assert_eq!(seq.choose_difficulty(5), SequenceStep::Ignored);
    }

    #[test]
    fn test_complete_intent() {
        let mut seq = SequenceController::new();
        seq.enter_chapter(&Chapter::new("ch1", "A"), 4, false);
        seq.proceed();

        let step = seq.complete_chapter(Cutscene::new("A: Complete", ""), false);
        assert_eq!(titles(&step), "A: Complete");
        assert_eq!(seq.phase(), SequencePhase::ChapterComplete);
        assert_eq!(seq.intent(), Some(ProceedIntent::AdvanceToNextChapter));

        assert_eq!(seq.proceed(), SequenceStep::AdvanceChapter);
        assert_eq!(seq.phase(), SequencePhase::Idle);
    }

    #[test]
    fn test_fail_intent() {
        let mut seq = SequenceController::new();
        seq.enter_chapter(&Chapter::new("ch1", "A"), 4, false);
        seq.proceed();

        seq.fail_chapter(Cutscene::new("Paradox Collapse", ""));
        assert_eq!(seq.phase(), SequencePhase::ChapterFailed);
        assert_eq!(seq.proceed(), SequenceStep::RestartChapter);
    }

    #[test]
    fn test_last_chapter_finishes_game() {
        let mut seq = SequenceController::new();
        seq.enter_chapter(&Chapter::new("ch8", "Transformers"), 4, false);
        seq.proceed();

        seq.complete_chapter(Cutscene::new("Codex Complete", ""), true);
        assert_eq!(seq.proceed(), SequenceStep::GameComplete);
        assert_eq!(seq.phase(), SequencePhase::GameComplete);
        assert_eq!(seq.proceed(), SequenceStep::Ignored);
    }

    #[test]
    fn test_terminal_requires_playable() {
        let mut seq = SequenceController::new();
        seq.enter_chapter(&Chapter::new("ch1", "A"), 4, false);

        assert_eq!(seq.fail_chapter(Cutscene::new("x", "")), SequenceStep::Ignored);
        assert_eq!(seq.phase(), SequencePhase::Cutscene);
    }
}
