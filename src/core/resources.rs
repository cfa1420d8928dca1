//! Resource ledger: the five counters every card trades in.
//!
//! ## Types
//!
//! - `Resource`: closed set of resource names
//! - `ResourceBundle`: a full set of non-negative counters (player wallet)
//! - `ResourceDelta`: a sparse, signed change (costs, gains, rewards)
//!
//! All ledger operations are pure: they take a bundle by reference and
//! return a new one. The session layer commits the result.
//!
//! ```
//! use codex_engine::core::{Resource, ResourceBundle, ResourceDelta};
//!
//! let wallet = ResourceBundle::new(8, 4, 0, 3, 0);
//! let cost = ResourceDelta::single(Resource::Knowledge, 2);
//!
//! assert!(wallet.can_afford(&cost));
//! assert_eq!(wallet.debit(&cost).get(Resource::Knowledge), 6);
//! ```

use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Named resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Knowledge,
    Influence,
    Compute,
    Data,
    Ethics,
}

impl Resource {
    /// Every resource, in display order.
    pub const ALL: [Resource; 5] = [
        Resource::Knowledge,
        Resource::Influence,
        Resource::Compute,
        Resource::Data,
        Resource::Ethics,
    ];

    /// Lowercase name as used in catalogs and snapshots.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Resource::Knowledge => "knowledge",
            Resource::Influence => "influence",
            Resource::Compute => "compute",
            Resource::Data => "data",
            Resource::Ethics => "ethics",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Sparse signed change to a bundle.
///
/// An empty delta means "free" when used as a cost and "nothing" when used
/// as a gain. Amounts may be negative (an event that costs ethics is
/// written as a negative ethics gain).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceDelta(FxHashMap<Resource, i64>);

impl ResourceDelta {
    /// Create an empty delta.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Delta touching a single resource.
    #[must_use]
    pub fn single(resource: Resource, amount: i64) -> Self {
        Self::new().with(resource, amount)
    }

    /// Set an entry (builder pattern).
    #[must_use]
    pub fn with(mut self, resource: Resource, amount: i64) -> Self {
        self.0.insert(resource, amount);
        self
    }

    /// Amount for a resource (0 if absent).
    #[must_use]
    pub fn get(&self, resource: Resource) -> i64 {
        self.0.get(&resource).copied().unwrap_or(0)
    }

    /// Whether the delta has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate entries in `Resource::ALL` order.
    pub fn iter(&self) -> impl Iterator<Item = (Resource, i64)> + '_ {
        Resource::ALL
            .into_iter()
            .filter_map(|r| self.0.get(&r).map(|&amount| (r, amount)))
    }

    /// Sum two deltas entry-wise.
    #[must_use]
    pub fn merged(&self, other: &ResourceDelta) -> ResourceDelta {
        let mut out = self.clone();
        for (resource, amount) in other.iter() {
            let slot = out.0.entry(resource).or_insert(0);
            *slot = slot.saturating_add(amount);
        }
        out
    }

    /// Scale every entry by `multiplier`, rounding up.
    ///
    /// Used for difficulty cost multipliers. An empty delta stays empty.
    #[must_use]
    pub fn scaled(&self, multiplier: f64) -> ResourceDelta {
        let entries = self
            .0
            .iter()
            .map(|(&resource, &amount)| (resource, (amount as f64 * multiplier).ceil() as i64))
            .collect();
        ResourceDelta(entries)
    }
}

impl FromIterator<(Resource, i64)> for ResourceDelta {
    fn from_iter<I: IntoIterator<Item = (Resource, i64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for ResourceDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("nothing");
        }
        let parts: Vec<String> = self
            .iter()
            .map(|(resource, amount)| format!("{amount:+} {resource}"))
            .collect();
        f.write_str(&parts.join(", "))
    }
}

/// Full resource wallet. Values never go below zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceBundle {
    pub knowledge: i64,
    pub influence: i64,
    pub compute: i64,
    pub data: i64,
    pub ethics: i64,
}

impl ResourceBundle {
    /// Create a bundle from explicit values (negatives clamp to zero).
    #[must_use]
    pub fn new(knowledge: i64, influence: i64, compute: i64, data: i64, ethics: i64) -> Self {
        Self {
            knowledge: knowledge.max(0),
            influence: influence.max(0),
            compute: compute.max(0),
            data: data.max(0),
            ethics: ethics.max(0),
        }
    }

    /// Starting wallet of a fresh game.
    #[must_use]
    pub fn starting() -> Self {
        Self::new(8, 4, 0, 3, 0)
    }

    /// Value of a single resource.
    #[must_use]
    pub fn get(&self, resource: Resource) -> i64 {
        match resource {
            Resource::Knowledge => self.knowledge,
            Resource::Influence => self.influence,
            Resource::Compute => self.compute,
            Resource::Data => self.data,
            Resource::Ethics => self.ethics,
        }
    }

    fn slot(&mut self, resource: Resource) -> &mut i64 {
        match resource {
            Resource::Knowledge => &mut self.knowledge,
            Resource::Influence => &mut self.influence,
            Resource::Compute => &mut self.compute,
            Resource::Data => &mut self.data,
            Resource::Ethics => &mut self.ethics,
        }
    }

    /// True if every cost entry is covered. Empty costs are always affordable.
    #[must_use]
    pub fn can_afford(&self, cost: &ResourceDelta) -> bool {
        cost.iter().all(|(resource, amount)| self.get(resource) >= amount)
    }

    /// Subtract a cost, clamping each touched resource at zero.
    #[must_use]
    pub fn debit(&self, cost: &ResourceDelta) -> ResourceBundle {
        self.apply(cost, -1)
    }

    /// Add a gain. Negative gain entries reduce the resource, clamped at zero.
    #[must_use]
    pub fn credit(&self, gain: &ResourceDelta) -> ResourceBundle {
        self.apply(gain, 1)
    }

    fn apply(&self, delta: &ResourceDelta, sign: i64) -> ResourceBundle {
        let mut next = *self;
        for (resource, amount) in delta.iter() {
            let slot = next.slot(resource);
            *slot = slot.saturating_add(amount.saturating_mul(sign)).max(0);
        }
        next
    }
}

impl fmt::Display for ResourceBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = Resource::ALL
            .into_iter()
            .map(|r| format!("{r} {}", self.get(r)))
            .collect();
        f.write_str(&parts.join(" · "))
    }
}
