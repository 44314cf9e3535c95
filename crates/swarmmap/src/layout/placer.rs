//! Entity placement.
//!
//! Turns a [`LayerPlan`] into absolute geometry for every host, container and
//! network. Entities are emitted per host (host, its containers, its gateway
//! bridge), followed by the cluster-wide networks (ingress, overlays,
//! external).

use indexmap::IndexMap;
use log::{debug, trace};

use swarmmap_core::{
    geometry::{Point, Size},
    identifier::Id,
    topology::NetworkRecord,
};

use crate::{
    config::LayoutConfig,
    layout::{
        cluster::{ClusterView, HostView},
        entity::{EntityRef, PlacedEntity},
        planner::{HostSpan, Layer, LayerPlan},
    },
};

/// Placed entities keyed by id, in placement order.
#[derive(Debug, Default)]
pub struct Placement<'a> {
    entities: IndexMap<Id, PlacedEntity<'a>>,
}

impl<'a> Placement<'a> {
    pub fn entity(&self, id: Id) -> Option<&PlacedEntity<'a>> {
        self.entities.get(&id)
    }

    pub fn contains(&self, id: Id) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn entities(&self) -> impl Iterator<Item = &PlacedEntity<'a>> {
        self.entities.values()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn into_entities(self) -> Vec<PlacedEntity<'a>> {
        self.entities.into_values().collect()
    }

    fn insert(&mut self, entity: PlacedEntity<'a>) {
        trace!(id:% = entity.id(), bounds:? = entity.bounds(); "Placed entity");
        self.entities.insert(entity.id(), entity);
    }
}

/// Places every entity of `cluster` according to `plan`.
pub fn place<'a>(
    cluster: &ClusterView<'a>,
    plan: &LayerPlan,
    config: &LayoutConfig,
) -> Placement<'a> {
    let mut placement = Placement::default();
    if cluster.hosts().is_empty() {
        return placement;
    }

    for (host, span) in cluster.hosts().iter().zip(plan.host_spans()) {
        place_host(&mut placement, host, *span, plan, config);
    }

    let full_width = Size::new(plan.total_width(), config.network_height());

    if let (Some(ingress), Some(band)) = (cluster.ingress(), plan.band(Layer::Ingress)) {
        placement.insert(network_entity(
            ingress,
            Layer::Ingress,
            Point::new(0.0, band.y()),
            full_width,
        ));
    }

    if let Some(band) = plan.band(Layer::Overlay) {
        let stride = config.network_height() + config.overlay_stack_gap();
        for (idx, overlay) in cluster.overlays().iter().enumerate() {
            let y = band.y() + idx as f32 * stride;
            placement.insert(network_entity(
                overlay,
                Layer::Overlay,
                Point::new(0.0, y),
                full_width,
            ));
        }
    }

    if let (Some(external), Some(band)) = (cluster.external(), plan.band(Layer::External)) {
        placement.insert(network_entity(
            external,
            Layer::External,
            Point::new(0.0, band.y()),
            full_width,
        ));
    }

    debug!(entities = placement.len(); "Entities placed");
    placement
}

fn place_host<'a>(
    placement: &mut Placement<'a>,
    host: &HostView<'a>,
    span: HostSpan,
    plan: &LayerPlan,
    config: &LayoutConfig,
) {
    if let Some(band) = plan.band(Layer::Hosts) {
        placement.insert(PlacedEntity::new(
            host.id(),
            Point::new(span.x(), band.y()),
            Size::new(span.width(), config.host_height()),
            EntityRef::Host(host.record()),
        ));
    }

    if let Some(band) = plan.band(Layer::Containers) {
        let containers = host.containers();
        let count = containers.len() as f32;
        let stride = config.container_width() + config.container_gap();
        let row_width = count * config.container_width() + (count - 1.0).max(0.0) * config.container_gap();
        let start_x = span.x() + (span.width() - row_width) / 2.0;

        for (idx, container) in containers.iter().enumerate() {
            placement.insert(PlacedEntity::new(
                Id::new(container.id()),
                Point::new(start_x + idx as f32 * stride, band.y()),
                Size::new(config.container_width(), config.container_height()),
                EntityRef::Container {
                    record: container,
                    host: host.id(),
                },
            ));
        }
    }

    if let (Some(gwbridge), Some(band)) = (host.gwbridge(), plan.band(Layer::Gwbridge)) {
        placement.insert(network_entity(
            gwbridge,
            Layer::Gwbridge,
            Point::new(span.x(), band.y()),
            Size::new(span.width(), config.network_height()),
        ));
    }
}

fn network_entity<'a>(
    record: &'a NetworkRecord,
    layer: Layer,
    top_left: Point,
    size: Size,
) -> PlacedEntity<'a> {
    PlacedEntity::new(
        Id::new(record.id()),
        top_left,
        size,
        EntityRef::Network { record, layer },
    )
}
