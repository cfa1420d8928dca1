//! Audio port.
//!
//! The engine only says *what* should be heard; the host decides how. The
//! port's lifecycle is bound to the session: `init` on `Game::start`,
//! `dispose` on `Game::dispose` (or drop).

use crate::events::GameEvent;

/// A sound the host may play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AudioCue {
    /// Chapter soundtrack for the given chapter index.
    ChapterTheme(usize),
    CardDrawn,
    CardPlayed,
    Correct,
    Wrong,
    ChapterComplete,
    ParadoxCollapse,
    Finale,
}

impl AudioCue {
    /// Cue for an event, if it has one.
    #[must_use]
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::ChapterEntered { index, .. } => Some(AudioCue::ChapterTheme(*index)),
            GameEvent::CardsDrawn { .. } => Some(AudioCue::CardDrawn),
            GameEvent::CardPlayed { .. } | GameEvent::ChallengeOpened { .. } => Some(AudioCue::CardPlayed),
            GameEvent::AnswerGraded { correct: true, .. } => Some(AudioCue::Correct),
            GameEvent::AnswerGraded { correct: false, .. } => Some(AudioCue::Wrong),
            GameEvent::ChapterCompleted { .. } => Some(AudioCue::ChapterComplete),
            GameEvent::ChapterFailed { .. } => Some(AudioCue::ParadoxCollapse),
            GameEvent::GameCompleted => Some(AudioCue::Finale),
            _ => None,
        }
    }
}

/// Sound output.
pub trait AudioPort {
    fn init(&mut self) {}

    fn dispose(&mut self) {}

    fn cue(&mut self, cue: AudioCue);
}

/// Silent audio.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullAudio;

impl AudioPort for NullAudio {
    fn cue(&mut self, _cue: AudioCue) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_cues() {
        assert_eq!(AudioCue::for_event(&GameEvent::GameCompleted), Some(AudioCue::Finale));
        assert_eq!(
            AudioCue::for_event(&GameEvent::ChapterFailed { index: 0 }),
            Some(AudioCue::ParadoxCollapse)
        );
        assert_eq!(AudioCue::for_event(&GameEvent::DifficultyRequested), None);
    }
}
