//! Chapter catalog: the ordered, immutable content a game is played over.
//!
//! The catalog is a data asset, loaded from a JSON document rather than
//! compiled in. It supplies:
//!
//! - chapters in their fixed play order, each with a deck and required set
//! - a chronology table (card id -> approximate year) used to order decks
//! - optional cutscene scripts; only their length and gating matter here
//!
//! ```
//! use codex_engine::cards::Catalog;
//!
//! let catalog = Catalog::from_json(r#"{
//!     "chapters": [{
//!         "id": "ch1", "title": "Baghdad", "required": ["algebra"],
//!         "deck": [{ "id": "algebra", "type": "tech", "name": "Algebra",
//!                    "gain": { "knowledge": 4 }, "cost": { "knowledge": 2 } }]
//!     }],
//!     "chronology": { "algebra": 820 }
//! }"#).unwrap();
//!
//! assert_eq!(catalog.len(), 1);
//! assert_eq!(catalog.year_of(&"algebra".into()), 820);
//! ```

use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use super::definition::{Card, CardId};
use crate::core::error::CatalogError;

/// Year assumed for cards missing from the chronology table.
pub const UNKNOWN_YEAR: i32 = 9999;

/// A narrative interlude. Content is opaque to the engine.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cutscene {
    pub title: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backdrop: Option<String>,
    /// Full-screen presentation hint.
    #[serde(default)]
    pub big: bool,
}

impl Cutscene {
    #[must_use]
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            backdrop: None,
            big: false,
        }
    }
}

/// Opening script of a chapter.
///
/// With `difficulty_gate` set, the sequence is: backstory, difficulty
/// choice, arrival. Without it, backstory and arrival play back to back.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CutsceneScript {
    /// Shown once per game (skipped when already seen).
    pub backstory: Vec<Cutscene>,
    /// Pause for a difficulty choice between the two segments.
    pub difficulty_gate: bool,
    /// Shown on every entry.
    pub arrival: Vec<Cutscene>,
}

/// A chapter definition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    pub id: String,
    pub title: String,

    /// Era label, e.g. "800-1100".
    #[serde(default, alias = "years")]
    pub era: String,

    /// Scene text shown on entry when no script is given.
    #[serde(default)]
    pub scene: String,

    /// Cards in catalog order.
    pub deck: Vec<Arc<Card>>,

    /// Cards that must all be played to complete the chapter.
    #[serde(default)]
    pub required: Vec<CardId>,

    /// Whether reaching full paradox fails this chapter.
    #[serde(default)]
    pub paradox_mechanics: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intro: Option<CutsceneScript>,

    /// Terminal cutscene on completion (not used for the last chapter).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion: Option<Cutscene>,

    /// Terminal cutscene on paradox collapse.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<Cutscene>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portrait: Option<String>,
}

impl Chapter {
    /// Create an empty chapter (builder entry point, mostly for tests).
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            era: String::new(),
            scene: String::new(),
            deck: Vec::new(),
            required: Vec::new(),
            paradox_mechanics: false,
            intro: None,
            completion: None,
            failure: None,
            background: None,
            portrait: None,
        }
    }

    /// Add a card to the deck (builder pattern).
    #[must_use]
    pub fn with_card(mut self, card: Card) -> Self {
        self.deck.push(Arc::new(card));
        self
    }

    /// Mark a card as required (builder pattern).
    #[must_use]
    pub fn with_required(mut self, id: impl Into<String>) -> Self {
        self.required.push(CardId::new(id));
        self
    }

    /// Enable paradox failure (builder pattern).
    #[must_use]
    pub fn with_paradox(mut self) -> Self {
        self.paradox_mechanics = true;
        self
    }

    /// Set the opening script (builder pattern).
    #[must_use]
    pub fn with_intro(mut self, script: CutsceneScript) -> Self {
        self.intro = Some(script);
        self
    }

    /// Find a deck card by id.
    #[must_use]
    pub fn card(&self, id: &CardId) -> Option<&Arc<Card>> {
        self.deck.iter().find(|c| &c.id == id)
    }

    #[must_use]
    pub fn is_required(&self, id: &CardId) -> bool {
        self.required.contains(id)
    }

    /// Opening script, or a single scene card built from title and scene.
    #[must_use]
    pub fn opening_script(&self) -> CutsceneScript {
        match &self.intro {
            Some(script) => script.clone(),
            None => CutsceneScript {
                backstory: Vec::new(),
                difficulty_gate: false,
                arrival: vec![Cutscene {
                    backdrop: self.portrait.clone(),
                    ..Cutscene::new(self.title.clone(), self.scene.clone())
                }],
            },
        }
    }

    fn validate(&self) -> Result<(), CatalogError> {
        let mut seen = FxHashSet::default();
        for card in &self.deck {
            if !seen.insert(&card.id) {
                return Err(CatalogError::DuplicateCard {
                    chapter: self.id.clone(),
                    card: card.id.to_string(),
                });
            }
            if let Some(spec) = card.challenge_spec() {
                spec.validate().map_err(|reason| CatalogError::InvalidChallenge {
                    chapter: self.id.clone(),
                    card: card.id.to_string(),
                    reason,
                })?;
            }
        }
        if let Some(missing) = self.required.iter().find(|id| !seen.contains(id)) {
            return Err(CatalogError::UnknownRequired {
                chapter: self.id.clone(),
                card: missing.to_string(),
            });
        }
        Ok(())
    }
}

/// Ordered chapters plus the chronology table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub version: String,

    pub chapters: Vec<Chapter>,

    #[serde(default)]
    pub chronology: FxHashMap<CardId, i32>,

    /// Cutscene after the last chapter is completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finale: Option<Cutscene>,

    /// Completion cutscene for chapters that do not declare their own.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion: Option<Cutscene>,

    /// Failure cutscene for chapters that do not declare their own.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<Cutscene>,
}

impl Catalog {
    /// Build and validate a catalog from chapters.
    pub fn new(chapters: Vec<Chapter>) -> Result<Self, CatalogError> {
        let catalog = Self {
            version: String::new(),
            chapters,
            chronology: FxHashMap::default(),
            finale: None,
            completion: None,
            failure: None,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Parse and validate a catalog document.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_json::from_str(json)?;
        if let Err(e) = catalog.validate() {
            tracing::warn!(error = %e, "Catalog rejected");
            return Err(e);
        }
        tracing::debug!(
            chapters = catalog.chapters.len(),
            dated_cards = catalog.chronology.len(),
            "Loaded catalog"
        );
        Ok(catalog)
    }

    /// Add a chronology entry (builder pattern).
    #[must_use]
    pub fn with_year(mut self, id: impl Into<String>, year: i32) -> Self {
        self.chronology.insert(CardId::new(id), year);
        self
    }

    fn validate(&self) -> Result<(), CatalogError> {
        if self.chapters.is_empty() {
            return Err(CatalogError::Empty);
        }
        self.chapters.iter().try_for_each(Chapter::validate)
    }

    /// Number of chapters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    /// Chapter by play-order index.
    #[must_use]
    pub fn chapter(&self, index: usize) -> Option<&Chapter> {
        self.chapters.get(index)
    }

    /// Whether `index` is the last chapter.
    #[must_use]
    pub fn is_last(&self, index: usize) -> bool {
        index + 1 >= self.chapters.len()
    }

    /// Approximate year of a card, `UNKNOWN_YEAR` if undated.
    #[must_use]
    pub fn year_of(&self, id: &CardId) -> i32 {
        self.chronology.get(id).copied().unwrap_or(UNKNOWN_YEAR)
    }

    /// A chapter's deck sorted by chronology. Ties keep catalog order.
    #[must_use]
    pub fn chronological_deck(&self, chapter: &Chapter) -> Vec<Arc<Card>> {
        let mut deck = chapter.deck.clone();
        deck.sort_by_key(|card| self.year_of(&card.id));
        deck
    }

    /// Cutscene after the last chapter. Untitled if the catalog has none.
    #[must_use]
    pub fn finale_cutscene(&self) -> Cutscene {
        self.finale.clone().unwrap_or_default()
    }

    /// Cutscene for completing `chapter`.
    ///
    /// Falls back to the catalog default, then to a bare card titled after
    /// the chapter.
    #[must_use]
    pub fn completion_cutscene(&self, chapter: &Chapter) -> Cutscene {
        chapter
            .completion
            .as_ref()
            .or(self.completion.as_ref())
            .cloned()
            .unwrap_or_else(|| Cutscene::new(chapter.title.clone(), ""))
    }

    /// Cutscene for a paradox collapse in `chapter`. Same fallbacks.
    #[must_use]
    pub fn failure_cutscene(&self, chapter: &Chapter) -> Cutscene {
        chapter
            .failure
            .as_ref()
            .or(self.failure.as_ref())
            .cloned()
            .unwrap_or_else(|| Cutscene::new(chapter.title.clone(), ""))
    }
}
