//! Game rules as a pure reducer.
//!
//! `RulesEngine` is the seam: hosts drive a session through `reduce` and
//! offer `legal_actions`. `CodexRules` is the implementation for a
//! chapter catalog.

pub mod engine;
pub mod reducer;

pub use engine::RulesEngine;
pub use reducer::CodexRules;
