//! Card definitions - static catalog data.
//!
//! A `Card` is immutable once loaded. It shares `{id, name, text}` across
//! four variants; the variant decides what playing it does:
//!
//! - **Tech** / **Event**: pay `cost`, gain `gain`
//! - **Figure**: pay 3 of a designated resource, gain `gain` once, then
//!   `passive` at every end of turn
//! - **Challenge**: pay `cost`, then open a graded question

use std::fmt;

use serde::{Deserialize, Serialize};

use super::challenge::ChallengeSpec;
use crate::core::{Resource, ResourceDelta};

/// Fixed cost of every Figure card, in its designated resource.
pub const FIGURE_COST: i64 = 3;

/// Unique identifier for a card within a chapter's deck.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub String);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the raw ID string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CardId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Variant of a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardType {
    Tech,
    Figure,
    Event,
    Challenge,
}

/// Variant-specific card data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CardKind {
    Tech {
        #[serde(default)]
        gain: ResourceDelta,
        #[serde(default)]
        cost: ResourceDelta,
    },
    Figure {
        #[serde(default)]
        gain: ResourceDelta,
        #[serde(default)]
        passive: ResourceDelta,
        #[serde(default = "default_figure_resource")]
        cost_resource: Resource,
    },
    Event {
        #[serde(default)]
        gain: ResourceDelta,
        #[serde(default)]
        cost: ResourceDelta,
    },
    Challenge {
        #[serde(default)]
        cost: ResourceDelta,
        #[serde(default)]
        prompt: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        hint: Option<String>,
        meta: ChallengeSpec,
    },
}

fn default_figure_resource() -> Resource {
    Resource::Knowledge
}

/// Static card definition.
///
/// ## Example
///
/// ```
/// use codex_engine::cards::{Card, CardType};
/// use codex_engine::core::{Resource, ResourceDelta};
///
/// let algebra = Card::tech(
///     "algebra",
///     "Algebraic Methods",
///     ResourceDelta::single(Resource::Knowledge, 4),
///     ResourceDelta::single(Resource::Knowledge, 2),
/// );
///
/// assert_eq!(algebra.card_type(), CardType::Tech);
/// assert_eq!(algebra.cost().get(Resource::Knowledge), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Card {
    /// Unique identifier within the chapter.
    pub id: CardId,

    /// Display name.
    pub name: String,

    /// Narrative / learning text.
    #[serde(default)]
    pub text: String,

    /// Variant data.
    #[serde(flatten)]
    pub kind: CardKind,
}

impl Card {
    /// Create a card from its parts.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: CardKind) -> Self {
        Self {
            id: CardId::new(id),
            name: name.into(),
            text: String::new(),
            kind,
        }
    }

    /// Create a Tech card.
    #[must_use]
    pub fn tech(
        id: impl Into<String>,
        name: impl Into<String>,
        gain: ResourceDelta,
        cost: ResourceDelta,
    ) -> Self {
        Self::new(id, name, CardKind::Tech { gain, cost })
    }

    /// Create a Figure card costing 3 knowledge.
    #[must_use]
    pub fn figure(
        id: impl Into<String>,
        name: impl Into<String>,
        gain: ResourceDelta,
        passive: ResourceDelta,
    ) -> Self {
        Self::new(
            id,
            name,
            CardKind::Figure {
                gain,
                passive,
                cost_resource: Resource::Knowledge,
            },
        )
    }

    /// Create an Event card.
    #[must_use]
    pub fn event(
        id: impl Into<String>,
        name: impl Into<String>,
        gain: ResourceDelta,
        cost: ResourceDelta,
    ) -> Self {
        Self::new(id, name, CardKind::Event { gain, cost })
    }

    /// Create a Challenge card.
    #[must_use]
    pub fn challenge(
        id: impl Into<String>,
        name: impl Into<String>,
        cost: ResourceDelta,
        meta: ChallengeSpec,
    ) -> Self {
        Self::new(
            id,
            name,
            CardKind::Challenge {
                cost,
                prompt: String::new(),
                hint: None,
                meta,
            },
        )
    }

    /// Set the narrative text (builder pattern).
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set a challenge's prompt (builder pattern). No-op for other variants.
    #[must_use]
    pub fn with_prompt(mut self, text: impl Into<String>) -> Self {
        if let CardKind::Challenge { prompt, .. } = &mut self.kind {
            *prompt = text.into();
        }
        self
    }

    /// Set a challenge's hint (builder pattern). No-op for other variants.
    #[must_use]
    pub fn with_hint(mut self, text: impl Into<String>) -> Self {
        if let CardKind::Challenge { hint, .. } = &mut self.kind {
            *hint = Some(text.into());
        }
        self
    }

    /// The card's variant.
    #[must_use]
    pub fn card_type(&self) -> CardType {
        match self.kind {
            CardKind::Tech { .. } => CardType::Tech,
            CardKind::Figure { .. } => CardType::Figure,
            CardKind::Event { .. } => CardType::Event,
            CardKind::Challenge { .. } => CardType::Challenge,
        }
    }

    /// Unscaled cost of playing this card.
    #[must_use]
    pub fn cost(&self) -> ResourceDelta {
        match &self.kind {
            CardKind::Tech { cost, .. }
            | CardKind::Event { cost, .. }
            | CardKind::Challenge { cost, .. } => cost.clone(),
            CardKind::Figure { cost_resource, .. } => {
                ResourceDelta::single(*cost_resource, FIGURE_COST)
            }
        }
    }

    /// Immediate gain on play (challenges have none; their reward is graded).
    #[must_use]
    pub fn gain(&self) -> Option<&ResourceDelta> {
        match &self.kind {
            CardKind::Tech { gain, .. }
            | CardKind::Event { gain, .. }
            | CardKind::Figure { gain, .. } => Some(gain),
            CardKind::Challenge { .. } => None,
        }
    }

    /// End-of-turn passive (Figures only).
    #[must_use]
    pub fn passive(&self) -> Option<&ResourceDelta> {
        match &self.kind {
            CardKind::Figure { passive, .. } => Some(passive),
            _ => None,
        }
    }

    /// Challenge question, if this is a challenge card.
    #[must_use]
    pub fn challenge_spec(&self) -> Option<&ChallengeSpec> {
        match &self.kind {
            CardKind::Challenge { meta, .. } => Some(meta),
            _ => None,
        }
    }

    /// Hint shown on Easy after the first wrong answer.
    ///
    /// An explicit hint wins; otherwise the prompt is used when it
    /// announces itself as a hint.
    #[must_use]
    pub fn hint(&self) -> Option<&str> {
        match &self.kind {
            CardKind::Challenge { hint: Some(hint), .. } => Some(hint),
            CardKind::Challenge { prompt, .. } if prompt.to_lowercase().contains("hint") => {
                Some(prompt)
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn is_challenge(&self) -> bool {
        self.card_type() == CardType::Challenge
    }
}
