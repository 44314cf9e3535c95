//! SwarmMap - layered topology diagrams of Docker Swarm clusters.
//!
//! Turns a snapshot of a cluster (hosts, containers, networks) into placed
//! entities and typed edges: overlay networks on top, then the ingress
//! network, containers, per-host gateway bridges, hosts, and finally the
//! external network. Rendering is left to the consumer of the layout.

pub mod config;
pub mod layout;

mod error;

pub use swarmmap_core::{geometry, gwbridge, identifier, stroke, topology};
pub use swarmmap_snapshot as snapshot;

pub use error::{LayoutError, RecordKind, SwarmMapError};
pub use layout::{
    LayoutResult,
    edges::{Edge, EdgeKind, EdgeRule},
    entity::{EntityKind, EntityRef, PlacedEntity},
    handles::{HandleRef, HandleSide},
    planner::Layer,
};

use log::{debug, info, trace};

use swarmmap_snapshot::error::Diagnostic;

use config::AppConfig;
use topology::Snapshot;

/// Builder for parsing snapshots and laying them out.
///
/// # Examples
///
/// ```rust
/// use swarmmap::{TopologyBuilder, config::AppConfig};
///
/// let source = r#"{
///     "hosts": [{ "id": "node-1", "hostname": "manager", "role": "manager", "containers": [] }],
///     "networks": []
/// }"#;
///
/// let builder = TopologyBuilder::new(AppConfig::default());
/// let snapshot = builder.parse(source).expect("Failed to parse");
/// let layout = builder.layout(&snapshot).expect("Failed to lay out");
/// assert!(layout.entity("node-1").is_some());
/// ```
#[derive(Default)]
pub struct TopologyBuilder {
    config: AppConfig,
}

impl TopologyBuilder {
    /// Create a new builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration this builder lays out with.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse a JSON snapshot.
    ///
    /// Parsing also normalizes the snapshot: flat containers are grouped under
    /// their hosts and gateway bridges receive an explicit host reference.
    ///
    /// # Errors
    ///
    /// Returns [`SwarmMapError::Snapshot`] with every diagnostic found.
    pub fn parse(&self, source: &str) -> Result<Snapshot, SwarmMapError> {
        info!("Parsing snapshot");

        let snapshot = swarmmap_snapshot::parse(source)
            .map_err(|err| SwarmMapError::new_snapshot_error(err, source))?;

        debug!(
            hosts = snapshot.hosts().len(),
            networks = snapshot.networks().len();
            "Snapshot parsed successfully"
        );
        trace!(snapshot:?; "Parsed snapshot");

        Ok(snapshot)
    }

    /// Parse a JSON snapshot, keeping the warnings raised while normalizing it.
    ///
    /// # Errors
    ///
    /// Returns [`SwarmMapError::Snapshot`] with every diagnostic found,
    /// warnings included.
    pub fn parse_with_warnings(
        &self,
        source: &str,
    ) -> Result<(Snapshot, Vec<Diagnostic>), SwarmMapError> {
        let (snapshot, warnings) = swarmmap_snapshot::parse_with_warnings(source)
            .map_err(|err| SwarmMapError::new_snapshot_error(err, source))?;

        debug!(
            hosts = snapshot.hosts().len(),
            warnings = warnings.len();
            "Snapshot parsed with warnings"
        );
        Ok((snapshot, warnings))
    }

    /// Lay out a snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`SwarmMapError::Layout`] for malformed records or an invalid
    /// layout configuration.
    pub fn layout<'a>(&self, snapshot: &'a Snapshot) -> Result<LayoutResult<'a>, SwarmMapError> {
        Ok(layout::layout(snapshot, self.config.layout())?)
    }

    /// Lay out a snapshot and export the result as a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`SwarmMapError::Layout`] if the layout fails and
    /// [`SwarmMapError::Export`] if serialization fails.
    pub fn render_json(&self, snapshot: &Snapshot, pretty: bool) -> Result<String, SwarmMapError> {
        let result = self.layout(snapshot)?;

        info!(pretty; "Exporting layout");
        let json = if pretty {
            serde_json::to_string_pretty(&result)?
        } else {
            serde_json::to_string(&result)?
        };
        Ok(json)
    }
}
