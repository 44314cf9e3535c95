//! Handle allocation.
//!
//! A handle is the anchor point on an entity's top or bottom side where an
//! edge attaches, expressed as a fraction of the entity's width. Handles are
//! keyed by `(owner, counterpart)` so that the edge rules can look up both
//! ends of a link independently.

use indexmap::IndexMap;
use log::{debug, trace};
use serde::Serialize;

use swarmmap_core::identifier::Id;

use crate::layout::{cluster::ClusterView, entity::PlacedEntity, placer::Placement};

/// Offset used for the aggregate link between a gateway bridge and its host.
pub const CENTER_OFFSET: f32 = 0.5;

/// Minimum distance between two anchors on the same side of one owner.
const MIN_SEPARATION: f32 = 1e-3;

/// Side of the owner an anchor sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleSide {
    Top,
    Bottom,
}

/// An anchor on `owner` for the link towards `counterpart`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HandleRef {
    owner: Id,
    counterpart: Id,
    /// Fraction of the owner's width, in `[0, 1]`.
    offset: f32,
    side: HandleSide,
}

impl HandleRef {
    /// Creates a handle; the offset is clamped to `[0, 1]` and a non-finite
    /// offset falls back to the center.
    pub fn new(owner: Id, counterpart: Id, offset: f32, side: HandleSide) -> Self {
        let offset = if offset.is_finite() {
            offset.clamp(0.0, 1.0)
        } else {
            CENTER_OFFSET
        };
        Self {
            owner,
            counterpart,
            offset,
            side,
        }
    }

    pub fn owner(&self) -> Id {
        self.owner
    }

    pub fn counterpart(&self) -> Id {
        self.counterpart
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn side(&self) -> HandleSide {
        self.side
    }
}

/// All handles of one layout, in allocation order.
#[derive(Debug, Clone, Default)]
pub struct HandleTable {
    handles: IndexMap<(Id, Id), HandleRef>,
}

impl HandleTable {
    /// The handle `owner` holds for `counterpart`, if any.
    pub fn get(&self, owner: Id, counterpart: Id) -> Option<HandleRef> {
        self.handles.get(&(owner, counterpart)).copied()
    }

    /// Handles held by `owner`, in allocation order.
    pub fn owned_by(&self, owner: Id) -> impl Iterator<Item = &HandleRef> {
        self.handles.values().filter(move |handle| handle.owner == owner)
    }

    pub fn iter(&self) -> impl Iterator<Item = &HandleRef> {
        self.handles.values()
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Stores `handle`, moving it to a free slot if another counterpart
    /// already anchors at the same spot on the same side of the owner.
    fn insert(&mut self, mut handle: HandleRef) {
        if let Some(offset) = self.free_offset(&handle) {
            debug!(
                owner:% = handle.owner,
                counterpart:% = handle.counterpart,
                requested = handle.offset,
                offset;
                "Moved handle off an occupied anchor"
            );
            handle.offset = offset;
        }
        trace!(
            owner:% = handle.owner,
            counterpart:% = handle.counterpart,
            offset = handle.offset;
            "Allocated handle"
        );
        self.handles.insert((handle.owner, handle.counterpart), handle);
    }

    /// A replacement offset for `handle` if its requested one is taken by
    /// another counterpart on the same side of the owner.
    ///
    /// The replacement is the midpoint of the free gap closest to the request.
    fn free_offset(&self, handle: &HandleRef) -> Option<f32> {
        let mut taken: Vec<f32> = self
            .owned_by(handle.owner)
            .filter(|other| other.side == handle.side && other.counterpart != handle.counterpart)
            .map(|other| other.offset)
            .collect();
        if taken
            .iter()
            .all(|other| (other - handle.offset).abs() >= MIN_SEPARATION)
        {
            return None;
        }

        taken.extend([0.0, 1.0]);
        taken.sort_by(f32::total_cmp);
        taken
            .windows(2)
            .filter(|gap| gap[1] - gap[0] >= 2.0 * MIN_SEPARATION)
            .map(|gap| (gap[0] + gap[1]) / 2.0)
            .min_by(|a, b| (a - handle.offset).abs().total_cmp(&(b - handle.offset).abs()))
    }

    /// Inserts a handle on `owner` aligned with the horizontal center of `target`.
    fn insert_centered(&mut self, owner: &PlacedEntity<'_>, target: &PlacedEntity<'_>, side: HandleSide) {
        let offset = owner.bounds().horizontal_fraction(target.center_x());
        self.insert(HandleRef::new(owner.id(), target.id(), offset, side));
    }
}

/// Computes every handle of `placement`.
///
/// Only entities that were actually placed receive handles; references to
/// anything else are skipped.
pub fn allocate(cluster: &ClusterView<'_>, placement: &Placement<'_>) -> HandleTable {
    let mut table = HandleTable::default();
    let ingress = cluster
        .ingress()
        .and_then(|network| placement.entity(Id::new(network.id())));

    for host in cluster.hosts() {
        let Some(host_entity) = placement.entity(host.id()) else {
            continue;
        };
        let gwbridge = host
            .gwbridge()
            .and_then(|network| placement.entity(Id::new(network.id())));

        if let Some(gwbridge) = gwbridge {
            table.insert(HandleRef::new(
                gwbridge.id(),
                host_entity.id(),
                CENTER_OFFSET,
                HandleSide::Bottom,
            ));
        }

        for container in host.containers() {
            let Some(container_entity) = placement.entity(Id::new(container.id())) else {
                continue;
            };

            if let Some(gwbridge) = gwbridge {
                table.insert_centered(gwbridge, container_entity, HandleSide::Top);
            }

            let overlays = cluster.container_overlays(container);
            let slots = overlays.len() as f32 + 1.0;
            for (idx, overlay) in overlays.iter().enumerate() {
                let Some(overlay_entity) = placement.entity(Id::new(overlay.id())) else {
                    continue;
                };
                table.insert_centered(overlay_entity, container_entity, HandleSide::Bottom);
                table.insert(HandleRef::new(
                    container_entity.id(),
                    Id::new(overlay.name()),
                    (idx as f32 + 1.0) / slots,
                    HandleSide::Top,
                ));
            }
        }

        if let (Some(gwbridge), Some(ingress)) = (gwbridge, ingress) {
            let declared = host.gwbridge().and_then(|network| network.ingress_handle());
            if let Some(offset) = declared {
                table.insert(HandleRef::new(gwbridge.id(), ingress.id(), offset, HandleSide::Top));
                table.insert_centered(ingress, gwbridge, HandleSide::Bottom);
            }
        }
    }

    // Overlays declaring each host, spread along the host's top side.
    let mut declared_by: IndexMap<Id, Vec<Id>> = IndexMap::new();
    for overlay in cluster.overlays() {
        let Some(overlay_entity) = placement.entity(Id::new(overlay.id())) else {
            continue;
        };
        for host_id in overlay.host_handles() {
            let Some(host_entity) = placement.entity(Id::new(host_id)) else {
                debug!(
                    network = overlay.id(),
                    host_id = host_id.as_str();
                    "Dropping host handle of unknown host"
                );
                continue;
            };
            table.insert_centered(overlay_entity, host_entity, HandleSide::Bottom);
            let overlays = declared_by.entry(host_entity.id()).or_default();
            if !overlays.contains(&overlay_entity.id()) {
                overlays.push(overlay_entity.id());
            }
        }
    }
    for (host_id, overlays) in &declared_by {
        let slots = overlays.len() as f32 + 1.0;
        for (idx, overlay_id) in overlays.iter().enumerate() {
            table.insert(HandleRef::new(
                *host_id,
                *overlay_id,
                (idx as f32 + 1.0) / slots,
                HandleSide::Top,
            ));
        }
    }

    if let Some(external) = cluster
        .external()
        .and_then(|network| placement.entity(Id::new(network.id())))
    {
        for host in cluster.hosts() {
            if let Some(host_entity) = placement.entity(host.id()) {
                table.insert_centered(external, host_entity, HandleSide::Top);
            }
        }
    }

    debug!(handles = table.len(); "Handles allocated");
    table
}
