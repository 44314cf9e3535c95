//! Edge generation.
//!
//! Edges are produced by a fixed list of rules, applied in order. Each rule
//! appends its edges without sorting or deduplicating, so the output order is
//! fully determined by the snapshot order.

use std::fmt;

use log::debug;
use serde::Serialize;

use swarmmap_core::{identifier::Id, stroke::StrokeStyle};

use crate::layout::{
    cluster::ClusterView,
    handles::{HandleRef, HandleTable},
    placer::Placement,
};

/// Label attached to container-to-gateway links.
pub const VXLAN_LABEL: &str = "VXLAN";

/// Semantic class of an edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    #[default]
    Default,
    Vxlan,
    Ingress,
}

/// The rule an edge was generated by, in application order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeRule {
    HostGwbridge,
    ContainerGwbridge,
    OverlayContainer,
    GwbridgeIngress,
    HostOverlay,
    HostExternal,
}

impl EdgeRule {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HostGwbridge => "host-gwbridge",
            Self::ContainerGwbridge => "container-gwbridge",
            Self::OverlayContainer => "overlay-container",
            Self::GwbridgeIngress => "gwbridge-ingress",
            Self::HostOverlay => "host-overlay",
            Self::HostExternal => "host-external",
        }
    }
}

impl fmt::Display for EdgeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A directed link between two placed entities.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    id: String,
    rule: EdgeRule,
    source: Id,
    target: Id,
    #[serde(skip_serializing_if = "Option::is_none")]
    source_handle: Option<HandleRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    target_handle: Option<HandleRef>,
    kind: EdgeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<&'static str>,
    stroke: StrokeStyle,
}

impl Edge {
    fn new(rule: EdgeRule, source: Id, target: Id) -> Self {
        Self {
            id: format!("{rule}:{source}->{target}"),
            rule,
            source,
            target,
            source_handle: None,
            target_handle: None,
            kind: EdgeKind::Default,
            label: None,
            stroke: StrokeStyle::Solid,
        }
    }

    fn with_kind(mut self, kind: EdgeKind) -> Self {
        self.kind = kind;
        self
    }

    fn with_handles(mut self, source: Option<HandleRef>, target: Option<HandleRef>) -> Self {
        self.source_handle = source;
        self.target_handle = target;
        self
    }

    fn with_label(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }

    fn with_stroke(mut self, stroke: StrokeStyle) -> Self {
        self.stroke = stroke;
        self
    }

    /// Deterministic identifier, `"{rule}:{source}->{target}"`.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn rule(&self) -> EdgeRule {
        self.rule
    }

    pub fn source(&self) -> Id {
        self.source
    }

    pub fn target(&self) -> Id {
        self.target
    }

    pub fn source_handle(&self) -> Option<HandleRef> {
        self.source_handle
    }

    pub fn target_handle(&self) -> Option<HandleRef> {
        self.target_handle
    }

    pub fn kind(&self) -> EdgeKind {
        self.kind
    }

    pub fn label(&self) -> Option<&'static str> {
        self.label
    }

    pub fn stroke(&self) -> StrokeStyle {
        self.stroke
    }
}

/// Applies every edge rule to `placement`.
///
/// Endpoints that were not placed produce no edge. Calling this twice with
/// the same inputs yields the same edges; appending both results duplicates
/// them.
pub fn generate(
    cluster: &ClusterView<'_>,
    placement: &Placement<'_>,
    handles: &HandleTable,
) -> Vec<Edge> {
    let mut edges = Vec::new();
    let placed = |id: &str| {
        let id = Id::new(id);
        placement.contains(id).then_some(id)
    };

    // Host to its gateway bridge.
    for host in cluster.hosts() {
        if let Some(gwbridge) = host.gwbridge().and_then(|network| placed(network.id())) {
            edges.push(
                Edge::new(EdgeRule::HostGwbridge, host.id(), gwbridge)
                    .with_handles(None, handles.get(gwbridge, host.id())),
            );
        }
    }

    // Containers to their host's gateway bridge.
    for host in cluster.hosts() {
        let Some(gwbridge) = host.gwbridge().and_then(|network| placed(network.id())) else {
            continue;
        };
        for container in host.containers() {
            let container = Id::new(container.id());
            edges.push(
                Edge::new(EdgeRule::ContainerGwbridge, container, gwbridge)
                    .with_kind(EdgeKind::Vxlan)
                    .with_handles(None, handles.get(gwbridge, container))
                    .with_label(VXLAN_LABEL)
                    .with_stroke(StrokeStyle::Dashed),
            );
        }
    }

    // Overlays to the containers attached to them.
    for host in cluster.hosts() {
        for container in host.containers() {
            let container_id = Id::new(container.id());
            for overlay in cluster.container_overlays(container) {
                let Some(overlay_id) = placed(overlay.id()) else {
                    continue;
                };
                edges.push(
                    Edge::new(EdgeRule::OverlayContainer, overlay_id, container_id)
                        .with_kind(EdgeKind::Ingress)
                        .with_handles(
                            handles.get(overlay_id, container_id),
                            handles.get(container_id, Id::new(overlay.name())),
                        ),
                );
            }
        }
    }

    // Gateway bridges declaring an ingress anchor to the ingress network.
    if let Some(ingress) = cluster.ingress().and_then(|network| placed(network.id())) {
        for host in cluster.hosts() {
            let Some(network) = host.gwbridge() else {
                continue;
            };
            if network.ingress_handle().is_none() {
                continue;
            }
            if let Some(gwbridge) = placed(network.id()) {
                edges.push(
                    Edge::new(EdgeRule::GwbridgeIngress, gwbridge, ingress)
                        .with_kind(EdgeKind::Ingress)
                        .with_handles(handles.get(gwbridge, ingress), handles.get(ingress, gwbridge)),
                );
            }
        }
    }

    // Hosts to the overlays declaring a link to them.
    for overlay in cluster.overlays() {
        let Some(overlay_id) = placed(overlay.id()) else {
            continue;
        };
        for host_id in overlay.host_handles() {
            let Some(host_id) = placed(host_id) else {
                continue;
            };
            edges.push(
                Edge::new(EdgeRule::HostOverlay, host_id, overlay_id)
                    .with_handles(handles.get(host_id, overlay_id), handles.get(overlay_id, host_id)),
            );
        }
    }

    // Every host to the external network.
    if let Some(external) = cluster.external().and_then(|network| placed(network.id())) {
        for host in cluster.hosts() {
            edges.push(
                Edge::new(EdgeRule::HostExternal, host.id(), external)
                    .with_handles(None, handles.get(external, host.id())),
            );
        }
    }

    debug!(edges = edges.len(); "Edges generated");
    edges
}
