//! # codex-engine
//!
//! Rules engine for a narrative, chapter-based educational card game.
//!
//! Players spend five resources to play cards, answer knowledge challenges,
//! and push a chapter's progress to completion while a paradox meter
//! threatens to force a restart.
//!
//! ## Design Principles
//!
//! 1. **Content-Agnostic**: chapters, cards, and questions come from a
//!    `Catalog` document. No chapter content lives in code.
//!
//! 2. **Pure Reducer**: every transition is
//!    `(GameSession, Action) -> (GameSession, Dispatch)`. Invalid actions
//!    are refused and leave the session untouched.
//!
//! 3. **Declared Timing**: acknowledgement delays are returned as a
//!    `Continuation` for the host to schedule; the engine never sleeps.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: O(1) session clones via `im-rs`, so
//!   refusals are a matter of dropping the clone.
//!
//! - **Two-Phase Challenges**: opening a challenge pays its cost; settling
//!   applies the reward. Abandoning settles as a failure.
//!
//! - **Injected Ports**: persistence and audio are traits handed to `Game`.
//!
//! ## Modules
//!
//! - `core`: resources, configuration, RNG, actions, session state, errors
//! - `cards`: card definitions, challenge questions, chapter catalog
//! - `zones`: draw pile / hand / discard engine
//! - `challenge`: challenge grading state machine
//! - `tracking`: progress and paradox meters
//! - `sequence`: cutscene queue and chapter transitions
//! - `events`: event stream and continuations
//! - `rules`: the reducer
//! - `session`: `Game` orchestrator, snapshots, ports

pub mod core;
pub mod cards;
pub mod zones;
pub mod challenge;
pub mod tracking;
pub mod sequence;
pub mod events;
pub mod rules;
pub mod session;

// Re-export commonly used types
pub use crate::core::{
    Action, ActionRecord, AckDelays, Difficulty, DifficultyPreset, GameConfig, GameRng,
    GameRngState, GameSession, Resource, ResourceBundle, ResourceDelta,
    CatalogError, ConfigError, SnapshotError, StoreError,
};

pub use crate::cards::{Answer, Card, CardId, CardKind, CardType, Catalog, Chapter, ChallengeSpec, Cutscene, CutsceneScript};

pub use crate::zones::{DeckEngine, DrawReport, Pile};

pub use crate::challenge::{ChallengeEngine, ChallengePhase, Grading, Resolution};

pub use crate::tracking::{is_chapter_complete, ParadoxMeter, ParadoxTier, ProgressTracker};

pub use crate::sequence::{ProceedIntent, SequenceController, SequencePhase, SequenceStep};

pub use crate::events::{Continuation, Dispatch, GameEvent, Refusal};

pub use crate::rules::{CodexRules, RulesEngine};

pub use crate::session::{
    AudioCue, AudioPort, Game, JsonFileStore, MemoryStore, NullAudio, Snapshot, SnapshotStore,
};
