//! Chapter meters: completion progress and paradox risk.
//!
//! Both are clamped 0-100 counters owned by the session. Progress filling
//! up (or every required card being played) completes a chapter; paradox
//! filling up fails it.

pub mod progress;
pub mod paradox;

pub use progress::{is_chapter_complete, ProgressTracker};
pub use paradox::{ParadoxMeter, ParadoxTier};
