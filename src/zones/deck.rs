//! Deck engine: draw pile, hand, and discard pile of the active chapter.
//!
//! The three piles always partition the chapter's deck: a card is in exactly
//! one of them. Cards move along a fixed cycle:
//!
//! ```text
//! draw pile --draw--> hand --play--> discard --reshuffle--> draw pile
//! ```
//!
//! Piles are `im::Vector`s so sessions clone in O(1).
//!
//! ```
//! use std::sync::Arc;
//! use codex_engine::cards::Card;
//! use codex_engine::core::{GameRng, ResourceDelta};
//! use codex_engine::zones::DeckEngine;
//!
//! let deck: Vec<Arc<Card>> = ["a", "b", "c"]
//!     .into_iter()
//!     .map(|id| Arc::new(Card::event(id, id, ResourceDelta::new(), ResourceDelta::new())))
//!     .collect();
//!
//! let mut piles = DeckEngine::initialize(deck);
//! let mut rng = GameRng::new(42);
//!
//! piles.draw(2, &mut rng);
//! assert_eq!(piles.hand().len(), 2);
//! assert_eq!(piles.draw_pile().len(), 1);
//! ```

use std::sync::Arc;

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::cards::{Card, CardId};
use crate::core::GameRng;

/// Which pile a card is in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pile {
    Draw,
    Hand,
    Discard,
}

/// Outcome of a draw.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DrawReport {
    /// Cards moved into the hand, in draw order.
    pub drawn: Vec<CardId>,
    /// Whether the discard pile was shuffled back in.
    pub reshuffled: bool,
}

/// Draw pile, hand, and discard pile.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DeckEngine {
    /// Front is the next card drawn.
    draw: Vector<Arc<Card>>,
    /// Display order only.
    hand: Vector<Arc<Card>>,
    /// Front is the most recently discarded card.
    discard: Vector<Arc<Card>>,
}

impl DeckEngine {
    /// Seed the draw pile. Hand and discard start empty.
    ///
    /// Callers pass the deck already in draw order (see
    /// `Catalog::chronological_deck`).
    #[must_use]
    pub fn initialize(deck: impl IntoIterator<Item = Arc<Card>>) -> Self {
        Self {
            draw: deck.into_iter().collect(),
            hand: Vector::new(),
            discard: Vector::new(),
        }
    }

    /// Rebuild from explicit piles (snapshot restore).
    #[must_use]
    pub fn from_piles(
        draw: impl IntoIterator<Item = Arc<Card>>,
        hand: impl IntoIterator<Item = Arc<Card>>,
        discard: impl IntoIterator<Item = Arc<Card>>,
    ) -> Self {
        Self {
            draw: draw.into_iter().collect(),
            hand: hand.into_iter().collect(),
            discard: discard.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn draw_pile(&self) -> &Vector<Arc<Card>> {
        &self.draw
    }

    #[must_use]
    pub fn hand(&self) -> &Vector<Arc<Card>> {
        &self.hand
    }

    #[must_use]
    pub fn discard_pile(&self) -> &Vector<Arc<Card>> {
        &self.discard
    }

    /// Cards across all three piles.
    #[must_use]
    pub fn total(&self) -> usize {
        self.draw.len() + self.hand.len() + self.discard.len()
    }

    /// Card in hand with this id.
    #[must_use]
    pub fn in_hand(&self, id: &CardId) -> Option<&Arc<Card>> {
        self.hand.iter().find(|c| &c.id == id)
    }

    /// Which pile holds a card.
    #[must_use]
    pub fn locate(&self, id: &CardId) -> Option<Pile> {
        if self.hand.iter().any(|c| &c.id == id) {
            Some(Pile::Hand)
        } else if self.draw.iter().any(|c| &c.id == id) {
            Some(Pile::Draw)
        } else if self.discard.iter().any(|c| &c.id == id) {
            Some(Pile::Discard)
        } else {
            None
        }
    }

    /// Draw up to `n` cards into the hand.
    ///
    /// An empty draw pile is refilled by shuffling the discard pile. When
    /// both are empty the remaining draws are skipped.
    pub fn draw(&mut self, n: usize, rng: &mut GameRng) -> DrawReport {
        let mut report = DrawReport::default();

        for _ in 0..n {
            if self.draw.is_empty() {
                if self.discard.is_empty() {
                    break;
                }
                self.reshuffle(rng);
                report.reshuffled = true;
            }
            if let Some(card) = self.draw.pop_front() {
                report.drawn.push(card.id.clone());
                self.hand.push_back(card);
            }
        }

        report
    }

    /// Move the discard pile into the draw pile in random order.
    fn reshuffle(&mut self, rng: &mut GameRng) {
        let mut cards: Vec<Arc<Card>> = std::mem::take(&mut self.discard).into_iter().collect();
        rng.shuffle(&mut cards);
        self.draw.extend(cards);
    }

    /// Move a card from hand to the front of the discard pile.
    ///
    /// Returns the card, or `None` (no change) if it is not in hand.
    pub fn play_from_hand(&mut self, id: &CardId) -> Option<Arc<Card>> {
        let pos = self.hand.iter().position(|c| &c.id == id)?;
        let card = self.hand.remove(pos);
        self.discard.push_front(Arc::clone(&card));
        Some(card)
    }
}
