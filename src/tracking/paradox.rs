//! Paradox risk meter.
//!
//! Rises on wrong challenge answers, falls a little on successes. Reaching
//! `MAX` fails the chapter, but only in chapters that declare paradox
//! mechanics; elsewhere the arithmetic runs without consequence.

use serde::{Deserialize, Serialize};

/// Visual severity. Carries no game-state meaning.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ParadoxTier {
    Calm,
    Minor,
    Major,
    Collapse,
}

/// Paradox level, 0-100.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParadoxMeter(i64);

impl ParadoxMeter {
    pub const MAX: i64 = 100;
    pub const MINOR: i64 = 30;
    pub const MAJOR: i64 = 60;

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_value(value: i64) -> Self {
        Self(value.clamp(0, Self::MAX))
    }

    #[must_use]
    pub fn value(self) -> i64 {
        self.0
    }

    /// Raise by `amount`, clamped. Returns the new value.
    pub fn bump(&mut self, amount: i64) -> i64 {
        self.0 = self.0.saturating_add(amount).clamp(0, Self::MAX);
        self.0
    }

    /// Lower by `amount`, clamped. Returns the new value.
    pub fn relieve(&mut self, amount: i64) -> i64 {
        self.0 = self.0.saturating_sub(amount).clamp(0, Self::MAX);
        self.0
    }

    /// Whether the meter is full.
    #[must_use]
    pub fn is_collapsed(self) -> bool {
        self.0 >= Self::MAX
    }

    #[must_use]
    pub fn tier(self) -> ParadoxTier {
        match self.0 {
            v if v >= Self::MAX => ParadoxTier::Collapse,
            v if v >= Self::MAJOR => ParadoxTier::Major,
            v if v >= Self::MINOR => ParadoxTier::Minor,
            _ => ParadoxTier::Calm,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bump_and_relieve_clamp() {
        let mut meter = ParadoxMeter::new();

        assert_eq!(meter.relieve(2), 0);
        assert_eq!(meter.bump(8), 8);
        assert_eq!(meter.bump(500), 100);
        assert!(meter.is_collapsed());
        assert_eq!(meter.relieve(2), 98);
        assert!(!meter.is_collapsed());
    }

    #[test]
    fn test_extreme_amounts_stay_in_range() {
        let mut meter = ParadoxMeter::from_value(50);

        assert_eq!(meter.bump(i64::MAX), 100);
        assert_eq!(meter.relieve(i64::MAX), 0);
        assert_eq!(meter.relieve(i64::MIN), 100);
        assert_eq!(meter.bump(i64::MIN), 0);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        assert!(!ParadoxMeter::from_value(99).is_collapsed());
        assert!(ParadoxMeter::from_value(100).is_collapsed());
    }

    #[test]
    fn test_tiers() {
        assert_eq!(ParadoxMeter::from_value(0).tier(), ParadoxTier::Calm);
        assert_eq!(ParadoxMeter::from_value(29).tier(), ParadoxTier::Calm);
        assert_eq!(ParadoxMeter::from_value(30).tier(), ParadoxTier::Minor);
        assert_eq!(ParadoxMeter::from_value(60).tier(), ParadoxTier::Major);
        assert_eq!(ParadoxMeter::from_value(100).tier(), ParadoxTier::Collapse);
    }
}
