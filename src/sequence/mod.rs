//! Chapter sequencing: cutscene queues, the difficulty gate, the deferred
//! opening draw, and chapter-end transitions.

mod controller;

pub use controller::{ProceedIntent, SequenceController, SequencePhase, SequenceStep};
