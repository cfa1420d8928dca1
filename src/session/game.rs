//! Session orchestrator.
//!
//! `Game` owns the current `GameSession`, the rules, and the injected
//! ports. Hosts call `dispatch` for every player action and schedule the
//! returned continuation; non-interactive hosts call `play`, which settles
//! continuations immediately.

use std::sync::Arc;

use crate::cards::Catalog;
use crate::core::{Action, GameConfig, GameSession, StoreError};
use crate::events::{Continuation, Dispatch};
use crate::rules::{CodexRules, RulesEngine};

use super::audio::{AudioCue, AudioPort, NullAudio};
use super::snapshot::Snapshot;
use super::store::{MemoryStore, SnapshotStore};

/// A running game with its persistence and audio ports.
pub struct Game<S: SnapshotStore = MemoryStore, A: AudioPort = NullAudio> {
    rules: CodexRules,
    session: GameSession,
    store: S,
    audio: A,
    /// Host presentation settings, round-tripped through snapshots.
    presentation: serde_json::Map<String, serde_json::Value>,
    started: bool,
}

impl Game {
    /// Game with an in-memory store and silent audio.
    #[must_use]
    pub fn in_memory(catalog: Arc<Catalog>, config: GameConfig) -> Self {
        Self::new(catalog, config, MemoryStore::new(), NullAudio)
    }
}

impl<S: SnapshotStore, A: AudioPort> Game<S, A> {
    #[must_use]
    pub fn new(catalog: Arc<Catalog>, config: GameConfig, store: S, audio: A) -> Self {
        let session = GameSession::new(&config);
        Self {
            rules: CodexRules::new(catalog, config),
            session,
            store,
            audio,
            presentation: serde_json::Map::new(),
            started: false,
        }
    }

    /// Bind the ports. Idempotent.
    pub fn start(&mut self) {
        if !self.started {
            self.audio.init();
            self.started = true;
        }
    }

    /// Release the ports. Idempotent.
    pub fn dispose(&mut self) {
        if self.started {
            self.audio.dispose();
            self.started = false;
        }
    }

    #[must_use]
    pub fn session(&self) -> &GameSession {
        &self.session
    }

    #[must_use]
    pub fn rules(&self) -> &CodexRules {
        &self.rules
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn audio(&self) -> &A {
        &self.audio
    }

    /// Presentation settings written into `difficultySettings`.
    pub fn presentation_mut(&mut self) -> &mut serde_json::Map<String, serde_json::Value> {
        &mut self.presentation
    }

    /// Apply one action.
    pub fn dispatch(&mut self, action: Action) -> Dispatch {
        let (next, dispatch) = self.rules.reduce(&self.session, &action);
        self.session = next;
        self.cue(&dispatch);
        dispatch
    }

    fn cue(&mut self, dispatch: &Dispatch) {
        if self.started {
            for cue in dispatch.events.iter().filter_map(AudioCue::for_event) {
                self.audio.cue(cue);
            }
        }
    }

    /// Run a dispatch's continuation now, ignoring its delay.
    pub fn settle_pending(&mut self, dispatch: &Dispatch) -> Option<Dispatch> {
        match dispatch.continuation? {
            Continuation::SettleChallenge { .. } => Some(self.dispatch(Action::SettleChallenge)),
        }
    }

    /// Apply an action and settle any continuation synchronously.
    pub fn play(&mut self, action: Action) -> Vec<Dispatch> {
        let first = self.dispatch(action);
        let mut out = vec![first];
        while let Some(next) = out.last().and_then(|d| d.continuation) {
            match next {
                Continuation::SettleChallenge { .. } => {
                    let settled = self.dispatch(Action::SettleChallenge);
                    out.push(settled);
                }
            }
        }
        out
    }

    // === Persistence ===

    /// Write the current session to the store.
    pub fn save(&mut self) -> Result<(), StoreError> {
        let snapshot = Snapshot::capture(&self.session, self.rules.config(), self.presentation.clone());
        self.store.write(&snapshot.to_json()?)?;
        tracing::debug!(
            chapter = self.session.chapter_index,
            turn = self.session.turn,
            "Session saved"
        );
        Ok(())
    }

    /// Replace the session with the stored snapshot.
    ///
    /// Returns `Ok(false)` and keeps the current session when there is no
    /// save or the save is rejected (wrong version, corrupt, unknown
    /// chapter). Only store I/O failures are errors.
    pub fn load(&mut self) -> Result<bool, StoreError> {
        let Some(json) = self.store.read()? else {
            return Ok(false);
        };

        let restored = Snapshot::from_json(&json, self.rules.config()).and_then(|snapshot| {
            let session = snapshot.restore(self.rules.catalog(), self.rules.config())?;
            Ok((session, snapshot.difficulty_settings.presentation))
        });

        match restored {
            Ok((session, presentation)) => {
                let (session, dispatch) = self.rules.resume(&session);
                tracing::info!(
                    chapter = session.chapter_index,
                    turn = session.turn,
                    phase = ?session.sequence.phase(),
                    "Session loaded"
                );
                self.session = session;
                self.presentation = presentation;
                self.cue(&dispatch);
                Ok(true)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Snapshot rejected");
                Ok(false)
            }
        }
    }

    pub fn clear_save(&mut self) -> Result<(), StoreError> {
        self.store.clear()
    }

    #[must_use]
    pub fn has_save(&self) -> bool {
        self.store.exists()
    }
}

impl<S: SnapshotStore, A: AudioPort> Drop for Game<S, A> {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Card, Chapter};
    use crate::core::{Difficulty, ResourceDelta};

    #[derive(Default)]
    struct RecordingAudio {
        log: Vec<String>,
    }

    impl AudioPort for RecordingAudio {
        fn init(&mut self) {
            self.log.push("init".into());
        }

        fn dispose(&mut self) {
            self.log.push("dispose".into());
        }

        fn cue(&mut self, cue: AudioCue) {
            self.log.push(format!("{cue:?}"));
        }
    }

    fn catalog() -> Arc<Catalog> {
        let card = |id: &str| Card::event(id, id, ResourceDelta::new(), ResourceDelta::new());
        let chapter = Chapter::new("ch1", "One")
            .with_card(card("a"))
            .with_card(card("b"))
            .with_card(card("c"))
            .with_card(card("d"))
            .with_card(card("e"))
            .with_card(card("f"));
        Arc::new(Catalog::new(vec![chapter]).unwrap())
    }

    #[test]
    fn test_audio_lifecycle_and_cues() {
        let mut game = Game::new(catalog(), GameConfig::default(), MemoryStore::new(), RecordingAudio::default());

        // Not started: no cues
        game.dispatch(Action::NewGame {
            difficulty: Difficulty::Medium,
            force_backstory: false,
        });
        assert!(game.audio().log.is_empty());

        game.start();
        game.start();
        game.dispatch(Action::Proceed);
        game.dispose();

        assert_eq!(game.audio().log, vec!["init", "CardDrawn", "dispose"]);
    }

    #[test]
    fn test_load_without_save_is_noop() {
        let mut game = Game::in_memory(catalog(), GameConfig::default());
        assert!(!game.has_save());
        assert!(!game.load().unwrap());
    }

    #[test]
    fn test_rejected_snapshot_keeps_session() {
        let store = MemoryStore::with_contents(r#"{"version":"legacy_v0","turn":9}"#);
        let mut game = Game::new(catalog(), GameConfig::default(), store, NullAudio);
        game.play(Action::NewGame {
            difficulty: Difficulty::Easy,
            force_backstory: false,
        });
        game.play(Action::Proceed);
        let hand = game.session().hand_ids();

        assert!(!game.load().unwrap());
        assert_eq!(game.session().hand_ids(), hand);
        assert_eq!(game.session().difficulty, Difficulty::Easy);

        let store = MemoryStore::with_contents("not json");
        let mut game = Game::new(catalog(), GameConfig::default(), store, NullAudio);
        assert!(!game.load().unwrap());
    }

    #[test]
    fn test_presentation_round_trip() {
        let mut game = Game::in_memory(catalog(), GameConfig::default());
        game.presentation_mut()
            .insert("musicUrl".into(), serde_json::Value::from("theme.mp3"));
        game.save().unwrap();

        game.presentation_mut().clear();
        assert!(game.load().unwrap());
        assert_eq!(
            game.presentation_mut().get("musicUrl"),
            Some(&serde_json::Value::from("theme.mp3"))
        );
    }
}
