//! Session orchestration: the `Game` driver, snapshot codec, and the
//! persistence and audio ports it is constructed with.

mod audio;
mod game;
mod snapshot;
mod store;

pub use audio::{AudioCue, AudioPort, NullAudio};
pub use game::Game;
pub use snapshot::{DifficultySettings, Snapshot};
pub use store::{JsonFileStore, MemoryStore, SnapshotStore};
