//! Core engine types: resources, configuration, RNG, actions, session state.
//!
//! Everything here is content-agnostic. Chapters and cards come from a
//! `Catalog`; rule numbers come from `GameConfig`.

pub mod resources;
pub mod config;
pub mod rng;
pub mod action;
pub mod state;
pub mod error;

pub use resources::{Resource, ResourceBundle, ResourceDelta};
pub use config::{AckDelays, Difficulty, DifficultyPreset, DifficultyPresets, GameConfig};
pub use rng::{GameRng, GameRngState};
pub use action::{Action, ActionRecord};
pub use state::GameSession;
pub use error::{CatalogError, ConfigError, SnapshotError, StoreError};
