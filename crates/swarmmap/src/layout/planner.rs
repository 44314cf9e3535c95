//! Layer planning: horizontal host extents and the vertical layer stack.
//!
//! Hosts are laid out left to right, each wide enough for its row of
//! containers. Vertically the diagram is a fixed stack of bands, top to bottom:
//!
//! | Layer | Content |
//! |-------|---------|
//! | [`Layer::Overlay`] | user overlay networks, stacked |
//! | [`Layer::Ingress`] | the routing-mesh network |
//! | [`Layer::Containers`] | containers of every host |
//! | [`Layer::Gwbridge`] | per-host gateway bridges |
//! | [`Layer::Hosts`] | hosts |
//! | [`Layer::External`] | the external network |
//!
//! A band that would hold nothing collapses and takes no room.

use log::debug;
use serde::Serialize;

use crate::{config::LayoutConfig, layout::cluster::ClusterView};

/// One band of the vertical stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    Overlay,
    Ingress,
    Containers,
    Gwbridge,
    Hosts,
    External,
}

impl Layer {
    /// All layers, top to bottom.
    pub const STACK: [Layer; 6] = [
        Layer::Overlay,
        Layer::Ingress,
        Layer::Containers,
        Layer::Gwbridge,
        Layer::Hosts,
        Layer::External,
    ];
}

/// Vertical extent assigned to a non-empty layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerBand {
    layer: Layer,
    y: f32,
    height: f32,
}

impl LayerBand {
    pub fn layer(&self) -> Layer {
        self.layer
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn height(&self) -> f32 {
        self.height
    }
}

/// Horizontal extent of one host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HostSpan {
    x: f32,
    width: f32,
}

impl HostSpan {
    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn width(&self) -> f32 {
        self.width
    }
}

/// Output of the planner.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerPlan {
    host_spans: Vec<HostSpan>,
    bands: Vec<LayerBand>,
    total_width: f32,
}

impl LayerPlan {
    /// Host extents, indexed like the cluster's hosts.
    pub fn host_spans(&self) -> &[HostSpan] {
        &self.host_spans
    }

    /// Non-empty bands, top to bottom.
    pub fn bands(&self) -> &[LayerBand] {
        &self.bands
    }

    pub fn band(&self, layer: Layer) -> Option<&LayerBand> {
        self.bands.iter().find(|band| band.layer == layer)
    }

    pub fn total_width(&self) -> f32 {
        self.total_width
    }

    /// Distance from the top of the first band to the bottom of the last one.
    pub fn total_height(&self) -> f32 {
        self.bands
            .last()
            .map(|band| band.y + band.height)
            .unwrap_or(0.0)
    }
}

/// Width of a host carrying `container_count` containers.
///
/// `max(min_host_width, n·container_width + (n−1)·container_gap)`; a host with
/// no containers gets the minimum width.
pub fn host_width(container_count: usize, config: &LayoutConfig) -> f32 {
    if container_count == 0 {
        return config.min_host_width();
    }
    let count = container_count as f32;
    let row = count * config.container_width() + (count - 1.0) * config.container_gap();
    row.max(config.min_host_width())
}

/// Plans host spans and layer bands for `cluster`.
///
/// A cluster without hosts yields an empty plan with a total width of zero.
pub fn plan(cluster: &ClusterView<'_>, config: &LayoutConfig) -> LayerPlan {
    let hosts = cluster.hosts();
    if hosts.is_empty() {
        debug!("No hosts to plan");
        return LayerPlan::default();
    }

    let mut host_spans = Vec::with_capacity(hosts.len());
    let mut x = 0.0;
    for host in hosts {
        let width = host_width(host.containers().len(), config);
        host_spans.push(HostSpan { x, width });
        x += width + config.horizontal_gap();
    }
    let total_width = x - config.horizontal_gap();

    let mut bands = Vec::new();
    let mut y = 0.0;
    for layer in Layer::STACK {
        let height = layer_height(layer, cluster, config);
        if height <= 0.0 {
            continue;
        }
        bands.push(LayerBand { layer, y, height });
        y += height + config.layer_gap();
    }

    debug!(
        hosts = hosts.len(),
        bands = bands.len(),
        total_width;
        "Layer plan computed"
    );

    LayerPlan {
        host_spans,
        bands,
        total_width,
    }
}

fn layer_height(layer: Layer, cluster: &ClusterView<'_>, config: &LayoutConfig) -> f32 {
    let network_band = |present: bool| {
        if present {
            config.network_height()
        } else {
            0.0
        }
    };

    match layer {
        Layer::Overlay => {
            let count = cluster.overlays().len() as f32;
            if count == 0.0 {
                0.0
            } else {
                count * config.network_height() + (count - 1.0) * config.overlay_stack_gap()
            }
        }
        Layer::Ingress => network_band(cluster.ingress().is_some()),
        Layer::Containers => {
            let any = cluster.hosts().iter().any(|host| !host.containers().is_empty());
            if any { config.container_height() } else { 0.0 }
        }
        Layer::Gwbridge => {
            network_band(cluster.hosts().iter().any(|host| host.gwbridge().is_some()))
        }
        Layer::Hosts => config.host_height(),
        Layer::External => network_band(cluster.external().is_some()),
    }
}
