//! Chapter completion progress.

use im::HashSet as ImHashSet;
use serde::{Deserialize, Serialize};

use crate::cards::{Card, CardId, Chapter};
use crate::core::GameConfig;

/// Progress toward completing the current chapter, 0-100.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgressTracker(i64);

impl ProgressTracker {
    pub const MAX: i64 = 100;

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore a saved value, clamped into range.
    #[must_use]
    pub fn from_value(value: i64) -> Self {
        Self(value.clamp(0, Self::MAX))
    }

    #[must_use]
    pub fn value(self) -> i64 {
        self.0
    }

    #[must_use]
    pub fn is_full(self) -> bool {
        self.0 >= Self::MAX
    }

    fn add(&mut self, amount: i64) -> i64 {
        let before = self.0;
        self.0 = self.0.saturating_add(amount).clamp(0, Self::MAX);
        self.0 - before
    }

    /// Credit a played card: more for required cards. Returns the change.
    pub fn record_card_play(&mut self, card: &Card, chapter: &Chapter, config: &GameConfig) -> i64 {
        let amount = if chapter.is_required(&card.id) {
            config.required_card_progress
        } else {
            config.optional_card_progress
        };
        self.add(amount)
    }

    /// Credit a successful challenge. Returns the change.
    pub fn record_challenge_success(&mut self, config: &GameConfig) -> i64 {
        self.add(config.challenge_progress)
    }
}

/// True iff every required card of the chapter has been played.
///
/// Independent of the numeric progress value; either condition alone
/// completes a chapter.
#[must_use]
pub fn is_chapter_complete(chapter: &Chapter, played: &ImHashSet<CardId>) -> bool {
    chapter.required.iter().all(|id| played.contains(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Resource, ResourceDelta};

    fn chapter() -> Chapter {
        let card = |id: &str| Card::tech(id, id, ResourceDelta::new(), ResourceDelta::single(Resource::Knowledge, 1));
        Chapter::new("ch1", "Baghdad")
            .with_card(card("algebra"))
            .with_card(card("algorithm"))
            .with_card(card("paper-mills"))
            .with_required("algebra")
            .with_required("algorithm")
    }

    #[test]
    fn test_required_vs_optional_weights() {
        let chapter = chapter();
        let config = GameConfig::default();
        let mut progress = ProgressTracker::new();

        assert_eq!(progress.record_card_play(&chapter.deck[0], &chapter, &config), 20);
        assert_eq!(progress.record_card_play(&chapter.deck[2], &chapter, &config), 10);
        assert_eq!(progress.value(), 30);
    }

    #[test]
    fn test_clamps_at_max() {
        let config = GameConfig::default();
        let mut progress = ProgressTracker::from_value(95);

        assert_eq!(progress.record_challenge_success(&config), 5);
        assert_eq!(progress.value(), 100);
        assert!(progress.is_full());

        assert_eq!(ProgressTracker::from_value(250).value(), 100);
        assert_eq!(ProgressTracker::from_value(-3).value(), 0);
    }

    #[test]
    fn test_extreme_weight_saturates() {
        let config = GameConfig {
            challenge_progress: i64::MAX,
            ..GameConfig::default()
        };
        let mut progress = ProgressTracker::from_value(40);

        assert_eq!(progress.record_challenge_success(&config), 60);
        assert!(progress.is_full());
    }

    #[test]
    fn test_chapter_complete_by_required() {
        let chapter = chapter();
        let mut played = ImHashSet::new();

        assert!(!is_chapter_complete(&chapter, &played));
        played.insert(CardId::from("algebra"));
        assert!(!is_chapter_complete(&chapter, &played));
        played.insert(CardId::from("algorithm"));
        assert!(is_chapter_complete(&chapter, &played));
    }

    #[test]
    fn test_no_required_cards_is_complete() {
        let chapter = Chapter::new("empty", "Empty");
        assert!(is_chapter_complete(&chapter, &ImHashSet::new()));
    }
}
