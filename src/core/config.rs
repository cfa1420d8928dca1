//! Game configuration: difficulty presets and tunable rule constants.
//!
//! Content (chapters, cards) lives in the catalog. Everything here is
//! numeric policy the host may override, typically from a JSON document:
//!
//! ```
//! use codex_engine::core::{Difficulty, GameConfig};
//!
//! let config = GameConfig::from_json(r#"{ "paradox_relief": 3 }"#).unwrap();
//! assert_eq!(config.paradox_relief, 3);
//! assert_eq!(config.preset(Difficulty::Hard).cost_multiplier, 1.2);
//! ```

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use super::resources::{Resource, ResourceBundle, ResourceDelta};

/// Difficulty level chosen by the player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// All levels, easiest first.
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Wrong answers allowed before a challenge fails outright.
    #[must_use]
    pub const fn challenge_attempts(self) -> u32 {
        match self {
            Difficulty::Easy => 2,
            Difficulty::Medium => 1,
            Difficulty::Hard => 0,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        };
        f.write_str(name)
    }
}

/// Per-difficulty economy knobs.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DifficultyPreset {
    /// Multiplier applied to every card cost (rounded up).
    pub cost_multiplier: f64,

    /// Bonus added to the base opening hand.
    pub initial_draw_bonus: u32,

    /// Misplaced positions tolerated when grading arrangements.
    #[serde(default)]
    pub challenge_tolerance: u32,
}

impl DifficultyPreset {
    #[must_use]
    pub const fn new(cost_multiplier: f64, initial_draw_bonus: u32) -> Self {
        Self {
            cost_multiplier,
            initial_draw_bonus,
            challenge_tolerance: 0,
        }
    }
}

/// Presets for all three difficulties.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DifficultyPresets {
    #[serde(rename = "Easy")]
    pub easy: DifficultyPreset,
    #[serde(rename = "Medium")]
    pub medium: DifficultyPreset,
    #[serde(rename = "Hard")]
    pub hard: DifficultyPreset,
}

impl Default for DifficultyPresets {
    fn default() -> Self {
        Self {
            easy: DifficultyPreset::new(0.8, 2),
            medium: DifficultyPreset::new(1.0, 1),
            hard: DifficultyPreset::new(1.2, 1),
        }
    }
}

impl DifficultyPresets {
    #[must_use]
    pub fn get(&self, difficulty: Difficulty) -> &DifficultyPreset {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Medium => &self.medium,
            Difficulty::Hard => &self.hard,
        }
    }
}

/// Acknowledgement delays between a graded answer and its resolution.
///
/// Presentation timing only; a headless host may settle immediately.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AckDelays {
    /// After a correct answer.
    pub success_ms: u64,
    /// After the last allowed wrong answer.
    pub final_wrong_ms: u64,
    /// After a wrong answer with no attempts at all (Hard).
    pub no_attempts_ms: u64,
}

impl Default for AckDelays {
    fn default() -> Self {
        Self {
            success_ms: 650,
            final_wrong_ms: 900,
            no_attempts_ms: 600,
        }
    }
}

impl AckDelays {
    #[must_use]
    pub fn success(&self) -> Duration {
        Duration::from_millis(self.success_ms)
    }

    #[must_use]
    pub fn final_wrong(&self) -> Duration {
        Duration::from_millis(self.final_wrong_ms)
    }

    #[must_use]
    pub fn no_attempts(&self) -> Duration {
        Duration::from_millis(self.no_attempts_ms)
    }
}

/// Rule configuration for a game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Difficulty presets.
    pub difficulty_presets: DifficultyPresets,

    /// Wallet on a fresh game and on paradox restarts.
    pub starting_resources: ResourceBundle,

    /// Bonus credited when carrying resources into the next chapter.
    pub chapter_carry_bonus: ResourceDelta,

    /// Base opening hand before the difficulty bonus.
    pub base_hand_size: u32,

    /// Progress for playing a required card.
    pub required_card_progress: i64,

    /// Progress for playing any other card.
    pub optional_card_progress: i64,

    /// Progress for a successful challenge.
    pub challenge_progress: i64,

    /// Paradox removed on every successful challenge.
    pub paradox_relief: i64,

    /// Challenge acknowledgement delays.
    pub ack_delays: AckDelays,

    /// Version tag written into snapshots.
    pub snapshot_version: String,

    /// Prefix a snapshot's version must start with to be accepted.
    pub snapshot_prefix: String,

    /// Seed for the shuffle stream of new sessions.
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            difficulty_presets: DifficultyPresets::default(),
            starting_resources: ResourceBundle::starting(),
            chapter_carry_bonus: ResourceDelta::single(Resource::Knowledge, 1),
            base_hand_size: 4,
            required_card_progress: 20,
            optional_card_progress: 10,
            challenge_progress: 15,
            paradox_relief: 2,
            ack_delays: AckDelays::default(),
            snapshot_version: "codex_v1.4".to_string(),
            snapshot_prefix: "codex_".to_string(),
            seed: 42,
        }
    }
}

impl GameConfig {
    /// Parse a configuration document. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Preset for a difficulty.
    #[must_use]
    pub fn preset(&self, difficulty: Difficulty) -> &DifficultyPreset {
        self.difficulty_presets.get(difficulty)
    }

    /// Opening hand size: base + bonus - 1 (5 on Easy, 4 otherwise by default).
    #[must_use]
    pub fn initial_draw_count(&self, difficulty: Difficulty) -> usize {
        let bonus = self.preset(difficulty).initial_draw_bonus;
        (self.base_hand_size + bonus).saturating_sub(1) as usize
    }

    /// Create a new config with a custom seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Create a new config with a custom starting wallet.
    #[must_use]
    pub fn with_starting_resources(mut self, resources: ResourceBundle) -> Self {
        self.starting_resources = resources;
        self
    }

    /// Create a new config with custom acknowledgement delays.
    #[must_use]
    pub fn with_ack_delays(mut self, delays: AckDelays) -> Self {
        self.ack_delays = delays;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_presets() {
        let config = GameConfig::default();

        assert_eq!(config.preset(Difficulty::Easy).cost_multiplier, 0.8);
        assert_eq!(config.preset(Difficulty::Medium).cost_multiplier, 1.0);
        assert_eq!(config.preset(Difficulty::Hard).cost_multiplier, 1.2);
        for d in Difficulty::ALL {
            assert_eq!(config.preset(d).challenge_tolerance, 0);
        }
    }

    #[test]
    fn test_initial_draw_count() {
        let config = GameConfig::default();

        assert_eq!(config.initial_draw_count(Difficulty::Easy), 5);
        assert_eq!(config.initial_draw_count(Difficulty::Medium), 4);
        assert_eq!(config.initial_draw_count(Difficulty::Hard), 4);
    }

    #[test]
    fn test_challenge_attempts() {
        assert_eq!(Difficulty::Easy.challenge_attempts(), 2);
        assert_eq!(Difficulty::Medium.challenge_attempts(), 1);
        assert_eq!(Difficulty::Hard.challenge_attempts(), 0);
    }

    #[test]
    fn test_from_json_partial() {
        let config = GameConfig::from_json(
            r#"{
                "seed": 7,
                "difficulty_presets": {
                    "Easy": { "cost_multiplier": 0.5, "initial_draw_bonus": 3 },
                    "Medium": { "cost_multiplier": 1.0, "initial_draw_bonus": 1 },
                    "Hard": { "cost_multiplier": 1.5, "initial_draw_bonus": 0 }
                }
            }"#,
        )
        .unwrap();

        assert_eq!(config.seed, 7);
        assert_eq!(config.initial_draw_count(Difficulty::Easy), 6);
        assert_eq!(config.initial_draw_count(Difficulty::Hard), 3);
        assert_eq!(config.starting_resources, ResourceBundle::starting());
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(GameConfig::from_json("not json").is_err());
    }

    #[test]
    fn test_builders() {
        let config = GameConfig::default()
            .with_seed(9)
            .with_starting_resources(ResourceBundle::new(1, 1, 1, 1, 1));

        assert_eq!(config.seed, 9);
        assert_eq!(config.starting_resources.compute, 1);
    }
}
