//! The layered cluster layout engine.
//!
//! A layout run is a straight pipeline with no feedback between stages:
//!
//! 1. [`cluster`] validates the snapshot and reconciles it into hosts,
//!    containers and classified networks.
//! 2. [`planner`] computes host spans and the vertical layer stack.
//! 3. [`placer`] assigns absolute geometry to every entity.
//! 4. [`handles`] computes edge anchors from the placed geometry.
//! 5. [`edges`] applies the edge rules.
//!
//! Everything is recomputed from the snapshot on every call.

pub mod cluster;
pub mod edges;
pub mod entity;
pub mod handles;
pub mod placer;
pub mod planner;
mod result;

pub use result::LayoutResult;

use log::{debug, info, trace};

use swarmmap_core::topology::Snapshot;

use crate::{config::LayoutConfig, error::LayoutError};

/// Lays out `snapshot` with the constants in `config`.
///
/// A snapshot without hosts yields an empty result.
///
/// # Errors
///
/// Returns [`LayoutError::InvalidConfig`] for unusable constants and
/// [`LayoutError::MalformedRecord`] for records without a usable identity.
/// No partial result is produced on error.
pub fn layout<'a>(
    snapshot: &'a Snapshot,
    config: &LayoutConfig,
) -> Result<LayoutResult<'a>, LayoutError> {
    config.validate()?;

    info!(
        hosts = snapshot.hosts().len(),
        networks = snapshot.networks().len();
        "Computing cluster layout"
    );
    let cluster = cluster::ClusterView::build(snapshot)?;
    if cluster.hosts().is_empty() {
        debug!("Snapshot has no hosts, producing empty layout");
        return Ok(LayoutResult::default());
    }

    let plan = planner::plan(&cluster, config);
    trace!(plan:?; "Layer plan");

    let placement = placer::place(&cluster, &plan, config);
    let handles = handles::allocate(&cluster, &placement);
    let edges = edges::generate(&cluster, &placement, &handles);

    let result = LayoutResult::new(
        placement.into_entities(),
        edges,
        plan.total_width(),
        plan.total_height(),
    );
    info!(
        entities = result.entities().len(),
        edges = result.edges().len();
        "Cluster layout computed"
    );
    Ok(result)
}
