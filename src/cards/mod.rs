//! Card system: definitions, challenge questions, and the chapter catalog.
//!
//! ## Key Types
//!
//! - `Card`: immutable catalog entry (Tech, Figure, Event, Challenge)
//! - `ChallengeSpec`: question carried by a challenge card, with grading
//! - `Chapter` / `Catalog`: ordered chapters, required sets, chronology

pub mod definition;
pub mod challenge;
pub mod catalog;

pub use definition::{Card, CardId, CardKind, CardType, FIGURE_COST};
pub use challenge::{Answer, ChallengeSpec, Indices};
pub use catalog::{Catalog, Chapter, Cutscene, CutsceneScript, UNKNOWN_YEAR};
