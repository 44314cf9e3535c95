//! Error types for SwarmMap operations.
//!
//! [`LayoutError`] is what the pure layout engine can fail with. [`SwarmMapError`]
//! wraps it together with the failures of the surrounding pipeline (snapshot
//! ingestion, I/O and JSON export).

use std::{fmt, io};

use thiserror::Error;

use swarmmap_snapshot::error::SnapshotError;

/// Class of an input record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Host,
    Container,
    Network,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Host => write!(f, "host"),
            Self::Container => write!(f, "container"),
            Self::Network => write!(f, "network"),
        }
    }
}

/// Errors returned by the layout engine.
///
/// A layout either succeeds completely or fails with one of these; no partial
/// result is ever produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    /// A record lacks the identity needed to place it.
    #[error("malformed {kind} record `{record}`: {reason}")]
    MalformedRecord {
        kind: RecordKind,
        /// Identifier of the record, or its position when it has none.
        record: String,
        reason: String,
    },

    #[error("invalid layout configuration: {0}")]
    InvalidConfig(String),
}

impl LayoutError {
    pub(crate) fn malformed(
        kind: RecordKind,
        record: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::MalformedRecord {
            kind,
            record: record.into(),
            reason: reason.into(),
        }
    }
}

/// The main error type for SwarmMap operations.
///
/// The `Snapshot` variant keeps the source text so that diagnostics can be
/// rendered with context.
#[derive(Debug, Error)]
pub enum SwarmMapError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Snapshot { err: SnapshotError, src: String },

    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(#[from] serde_json::Error),
}

impl SwarmMapError {
    /// Create a new `Snapshot` error with the associated source text.
    pub fn new_snapshot_error(err: SnapshotError, src: impl Into<String>) -> Self {
        Self::Snapshot {
            err,
            src: src.into(),
        }
    }
}
