//! Card piles of the active chapter.
//!
//! ## Key Types
//!
//! - `DeckEngine`: draw pile, hand, discard pile, and the moves between them
//! - `Pile`: which of the three piles a card is in
//! - `DrawReport`: what a draw actually did

pub mod deck;

pub use deck::{DeckEngine, DrawReport, Pile};
