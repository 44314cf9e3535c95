//! Snapshot ingestion for SwarmMap.
//!
//! Reads the JSON snapshot of a cluster, checks every record and normalizes
//! the result for layout:
//!
//! 1. **Decoding**: the document is split into records, each decoded on its
//!    own so that one broken record does not hide the others.
//! 2. **Validation**: identifiers must be present and unique across hosts,
//!    containers and networks; flat containers must name their host.
//! 3. **Normalization**: flat containers are grouped under their hosts and
//!    gateway bridges get an explicit `hostId`. Dangling references are
//!    reported as warnings.
//!
//! All problems are reported together in a [`SnapshotError`](error::SnapshotError).
//!
//! # Example
//!
//! ```
//! let source = r#"{
//!     "hosts": [{ "id": "node-1", "hostname": "manager-1", "role": "manager" }],
//!     "containers": [{ "id": "web.1", "serviceName": "web", "hostId": "node-1" }],
//!     "networks": [{ "id": "gwbridge-node-1", "name": "docker_gwbridge", "driver": "bridge" }]
//! }"#;
//!
//! let snapshot = swarmmap_snapshot::parse(source).expect("valid snapshot");
//! assert_eq!(snapshot.hosts()[0].containers().len(), 1);
//! assert_eq!(snapshot.networks()[0].host_id(), Some("node-1"));
//! ```

pub mod error;

mod decode;
mod normalize;
mod span;

pub use span::Span;

use log::{debug, info};

use swarmmap_core::topology::Snapshot;

use error::{Diagnostic, DiagnosticCollector, SnapshotError};

/// Parses and normalizes a JSON snapshot, discarding warnings.
///
/// # Errors
///
/// Returns a [`SnapshotError`] holding every diagnostic if any record is
/// malformed or the document is not a snapshot.
pub fn parse(source: &str) -> Result<Snapshot, SnapshotError> {
    parse_with_warnings(source).map(|(snapshot, _)| snapshot)
}

/// Parses and normalizes a JSON snapshot, returning the warnings found
/// alongside it.
///
/// # Errors
///
/// Returns a [`SnapshotError`] holding every diagnostic, warnings included,
/// if any error was found.
pub fn parse_with_warnings(source: &str) -> Result<(Snapshot, Vec<Diagnostic>), SnapshotError> {
    info!(len = source.len(); "Ingesting snapshot");
    let mut collector = DiagnosticCollector::new();

    let normalized = decode::decode(source, &mut collector).map(|decoded| {
        normalize::normalize(decoded.snapshot, &decoded.source_map, &mut collector)
    });

    let warnings = collector.finish()?;
    let Some(snapshot) = normalized else {
        // Document-level failures always emit an error.
        return Err(SnapshotError::new(warnings));
    };

    debug!(warnings = warnings.len(); "Snapshot ingested");
    Ok((snapshot, warnings))
}
