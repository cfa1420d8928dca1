//! Error types for the engine's boundaries.
//!
//! Gameplay itself never fails: an invalid action is refused and leaves the
//! session untouched. Errors only arise where data enters or leaves the
//! engine (catalog documents, configuration, snapshots, stores).

use thiserror::Error;

/// Configuration document could not be read.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed configuration: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Catalog document is malformed or violates a catalog invariant.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("malformed catalog: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("catalog has no chapters")]
    Empty,

    #[error("chapter {chapter}: duplicate card id {card}")]
    DuplicateCard { chapter: String, card: String },

    #[error("chapter {chapter}: required card {card} is not in the deck")]
    UnknownRequired { chapter: String, card: String },

    #[error("chapter {chapter}: challenge {card} is invalid: {reason}")]
    InvalidChallenge {
        chapter: String,
        card: String,
        reason: String,
    },
}

/// Snapshot was rejected on load.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("malformed snapshot: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("snapshot version {found:?} does not match prefix {expected_prefix:?}")]
    VersionMismatch {
        found: String,
        expected_prefix: String,
    },

    #[error("snapshot chapter index {index} out of range ({chapters} chapters)")]
    ChapterOutOfRange { index: usize, chapters: usize },
}

/// Persistence store failure.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}
