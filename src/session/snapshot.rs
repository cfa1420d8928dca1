//! Persisted session snapshot.
//!
//! The envelope is camelCase JSON:
//!
//! ```text
//! { version, chapterIndex, turn, resources, hand, drawPile, discardPile,
//!   playedCardIds: { id: true }, progress,
//!   difficultySettings: { difficulty, ...presentation fields },
//!   paradox?, rng? }
//! ```
//!
//! Every field is optional on load. Missing fields fall back to a fresh
//! chapter: turn 1, the starting wallet, empty piles, zero meters.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::cards::{Card, CardId, Catalog, Chapter};
use crate::core::{
    Difficulty, GameConfig, GameRng, GameRngState, GameSession, ResourceBundle, SnapshotError,
};
use crate::sequence::SequenceController;
use crate::tracking::{ParadoxMeter, ProgressTracker};
use crate::zones::DeckEngine;

/// Difficulty plus presentation-only settings the engine passes through.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultySettings {
    pub difficulty: Difficulty,
    /// Host fields (music url, audio toggle, ...), kept verbatim.
    #[serde(flatten)]
    pub presentation: serde_json::Map<String, serde_json::Value>,
}

/// Serialized form of a `GameSession`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Snapshot {
    pub version: String,
    pub chapter_index: usize,
    pub turn: u32,
    pub resources: ResourceBundle,
    pub hand: Vec<Arc<Card>>,
    pub draw_pile: Vec<Arc<Card>>,
    pub discard_pile: Vec<Arc<Card>>,
    pub played_card_ids: BTreeMap<CardId, bool>,
    pub progress: i64,
    pub difficulty_settings: DifficultySettings,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paradox: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rng: Option<GameRngState>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            version: String::new(),
            chapter_index: 0,
            turn: 1,
            resources: ResourceBundle::starting(),
            hand: Vec::new(),
            draw_pile: Vec::new(),
            discard_pile: Vec::new(),
            played_card_ids: BTreeMap::new(),
            progress: 0,
            difficulty_settings: DifficultySettings::default(),
            paradox: None,
            rng: None,
        }
    }
}

impl Snapshot {
    /// Capture a session.
    ///
    /// An open challenge is not captured: its cost is already paid and its
    /// card already discarded, so restoring it behaves like an abandon.
    #[must_use]
    pub fn capture(session: &GameSession, config: &GameConfig, presentation: serde_json::Map<String, serde_json::Value>) -> Self {
        let cards = |pile: &im::Vector<Arc<Card>>| pile.iter().cloned().collect::<Vec<_>>();
        Self {
            version: config.snapshot_version.clone(),
            chapter_index: session.chapter_index,
            turn: session.turn,
            resources: session.resources,
            hand: cards(session.piles.hand()),
            draw_pile: cards(session.piles.draw_pile()),
            discard_pile: cards(session.piles.discard_pile()),
            played_card_ids: session.played.iter().map(|id| (id.clone(), true)).collect(),
            progress: session.progress.value(),
            difficulty_settings: DifficultySettings {
                difficulty: session.difficulty,
                presentation,
            },
            paradox: Some(session.paradox.value()),
            rng: Some(session.rng.state()),
        }
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a snapshot and check its version tag against `config`.
    pub fn from_json(json: &str, config: &GameConfig) -> Result<Self, SnapshotError> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        if !snapshot.version.starts_with(&config.snapshot_prefix) {
            return Err(SnapshotError::VersionMismatch {
                found: snapshot.version,
                expected_prefix: config.snapshot_prefix.clone(),
            });
        }
        Ok(snapshot)
    }

    /// Rebuild a session, left in the playable phase.
    ///
    /// `CodexRules::resume` then restores the opening draw or the chapter's
    /// terminal cutscene where the saved state calls for one.
    ///
    /// Cards are re-resolved against the catalog chapter by id so restored
    /// piles share the catalog's definitions; ids the chapter does not know
    /// keep the snapshot's own copy.
    pub fn restore(&self, catalog: &Catalog, config: &GameConfig) -> Result<GameSession, SnapshotError> {
        let chapter = catalog
            .chapter(self.chapter_index)
            .ok_or_else(|| SnapshotError::ChapterOutOfRange {
                index: self.chapter_index,
                chapters: catalog.len(),
            })?;

        let resolve = |pile: &[Arc<Card>]| -> Vec<Arc<Card>> {
            pile.iter().map(|card| resolve_card(chapter, card)).collect()
        };

        let rng = match &self.rng {
            Some(state) => GameRng::from_state(state),
            None => GameRng::new(config.seed),
        };

        let mut session = GameSession::new(config);
        session.chapter_index = self.chapter_index;
        session.turn = self.turn.max(1);
        session.resources = ResourceBundle::new(
            self.resources.knowledge,
            self.resources.influence,
            self.resources.compute,
            self.resources.data,
            self.resources.ethics,
        );
        session.piles = DeckEngine::from_piles(
            resolve(&self.draw_pile),
            resolve(&self.hand),
            resolve(&self.discard_pile),
        );
        session.played = self
            .played_card_ids
            .iter()
            .filter(|(_, played)| **played)
            .map(|(id, _)| id.clone())
            .collect();
        session.progress = ProgressTracker::from_value(self.progress);
        session.paradox = ParadoxMeter::from_value(self.paradox.unwrap_or(0));
        session.difficulty = self.difficulty_settings.difficulty;
        session.sequence = SequenceController::resumed();
        session.rng = rng;
        Ok(session)
    }
}

fn resolve_card(chapter: &Chapter, card: &Arc<Card>) -> Arc<Card> {
    chapter
        .card(&card.id)
        .map_or_else(|| Arc::clone(card), Arc::clone)
}
