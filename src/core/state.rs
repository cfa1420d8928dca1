//! Game session: the single mutable aggregate of a running game.
//!
//! ## GameSession
//!
//! - Chapter index and turn number
//! - Resource wallet
//! - Draw pile, hand, and discard pile (`DeckEngine`)
//! - Played card ids, progress, paradox, difficulty
//! - Open challenge (if any) and the chapter sequencer
//! - Shuffle RNG and action history
//!
//! Collections are `im` persistent structures, so cloning a session is
//! O(1). The reducer works on a clone and only hands it back when the
//! action was accepted.

use std::sync::Arc;

use im::{HashSet as ImHashSet, Vector};

use super::action::ActionRecord;
use super::config::{Difficulty, GameConfig};
use super::resources::{ResourceBundle, ResourceDelta};
use super::rng::GameRng;
use crate::cards::{Card, CardId};
use crate::challenge::ChallengeEngine;
use crate::sequence::SequenceController;
use crate::tracking::{ParadoxMeter, ProgressTracker};
use crate::zones::DeckEngine;

/// Complete runtime state of one game.
#[derive(Clone, Debug)]
pub struct GameSession {
    /// Index of the active chapter in the catalog.
    pub chapter_index: usize,

    /// Turn number (starts at 1).
    pub turn: u32,

    pub resources: ResourceBundle,

    /// Draw pile, hand, discard.
    pub piles: DeckEngine,

    /// Ids played this chapter (including successful challenges).
    pub played: ImHashSet<CardId>,

    pub progress: ProgressTracker,

    pub paradox: ParadoxMeter,

    pub difficulty: Difficulty,

    /// Open challenge, if any. Card plays are refused while set.
    pub challenge: Option<ChallengeEngine>,

    pub sequence: SequenceController,

    /// Shuffle stream.
    pub rng: GameRng,

    /// Accepted actions in order.
    pub history: Vector<ActionRecord>,
}

impl GameSession {
    /// Fresh session before any chapter has been entered.
    #[must_use]
    pub fn new(config: &GameConfig) -> Self {
        Self {
            chapter_index: 0,
            turn: 1,
            resources: config.starting_resources,
            piles: DeckEngine::default(),
            played: ImHashSet::new(),
            progress: ProgressTracker::new(),
            paradox: ParadoxMeter::new(),
            difficulty: Difficulty::default(),
            challenge: None,
            sequence: SequenceController::new(),
            rng: GameRng::new(config.seed),
            history: Vector::new(),
        }
    }

    /// Reset per-chapter state and seed the draw pile. The hand stays empty
    /// until the sequencer releases the opening draw.
    pub fn reset_chapter(&mut self, index: usize, deck: Vec<Arc<Card>>, resources: ResourceBundle) {
        self.chapter_index = index;
        self.turn = 1;
        self.resources = resources;
        self.piles = DeckEngine::initialize(deck);
        self.played = ImHashSet::new();
        self.progress = ProgressTracker::new();
        self.paradox = ParadoxMeter::new();
        self.challenge = None;
    }

    /// Whether cards may be played right now.
    #[must_use]
    pub fn is_playable(&self) -> bool {
        self.sequence.is_playable() && self.challenge.is_none()
    }

    #[must_use]
    pub fn has_open_challenge(&self) -> bool {
        self.challenge.is_some()
    }

    /// Ids in hand, in display order.
    #[must_use]
    pub fn hand_ids(&self) -> Vec<CardId> {
        self.piles.hand().iter().map(|c| c.id.clone()).collect()
    }

    /// Played figure cards, wherever they currently sit.
    pub fn played_figures(&self) -> impl Iterator<Item = &Arc<Card>> + '_ {
        self.piles
            .draw_pile()
            .iter()
            .chain(self.piles.hand().iter())
            .chain(self.piles.discard_pile().iter())
            .filter(move |c| c.passive().is_some() && self.played.contains(&c.id))
    }

    /// Sum of all active figure passives.
    #[must_use]
    pub fn passive_income(&self) -> ResourceDelta {
        self.played_figures()
            .filter_map(|c| c.passive())
            .fold(ResourceDelta::new(), |acc, p| acc.merged(p))
    }

    /// Append an accepted action to the history.
    pub fn record_action(&mut self, record: ActionRecord) {
        self.history.push_back(record);
    }
}
