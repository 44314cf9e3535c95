//! Configuration types for SwarmMap layouts.
//!
//! This module provides configuration structures that control how cluster
//! diagrams are laid out. All types implement [`serde::Deserialize`] for
//! flexible loading from external sources, and every field has a default so a
//! partial configuration file is valid.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level application configuration.
//! - [`LayoutConfig`] - Layout-tuning constants (widths, gaps, heights) handed
//!   to the engine as an immutable value.
//!
//! # Example
//!
//! ```
//! # use swarmmap::config::AppConfig;
//! let config = AppConfig::default();
//! assert!(config.layout().validate().is_ok());
//! assert!(config.layout().min_host_width() > 0.0);
//! ```

use serde::Deserialize;

use crate::LayoutError;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified layout configuration.
    pub fn new(layout: LayoutConfig) -> Self {
        Self { layout }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }
}

/// Geometry constants of the layered layout.
///
/// Lengths are in pixels. Construct it through [`Default`], deserialization, or
/// the `with_*` methods; the engine never mutates it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Lower bound of a host's width, used for hosts with few containers.
    min_host_width: f32,
    host_height: f32,
    container_width: f32,
    container_height: f32,
    /// Horizontal gap between neighbouring containers on one host.
    container_gap: f32,
    /// Horizontal gap between neighbouring hosts.
    horizontal_gap: f32,
    /// Vertical gap between layers.
    layer_gap: f32,
    /// Height of every network band.
    network_height: f32,
    /// Vertical gap between stacked overlay networks.
    overlay_stack_gap: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            min_host_width: 220.0,
            host_height: 56.0,
            container_width: 140.0,
            container_height: 64.0,
            container_gap: 16.0,
            horizontal_gap: 48.0,
            layer_gap: 56.0,
            network_height: 28.0,
            overlay_stack_gap: 8.0,
        }
    }
}

impl LayoutConfig {
    pub fn with_min_host_width(mut self, width: f32) -> Self {
        self.min_host_width = width;
        self
    }

    pub fn with_host_height(mut self, height: f32) -> Self {
        self.host_height = height;
        self
    }

    pub fn with_container_size(mut self, width: f32, height: f32) -> Self {
        self.container_width = width;
        self.container_height = height;
        self
    }

    pub fn with_container_gap(mut self, gap: f32) -> Self {
        self.container_gap = gap;
        self
    }

    pub fn with_horizontal_gap(mut self, gap: f32) -> Self {
        self.horizontal_gap = gap;
        self
    }

    pub fn with_layer_gap(mut self, gap: f32) -> Self {
        self.layer_gap = gap;
        self
    }

    pub fn with_network_height(mut self, height: f32) -> Self {
        self.network_height = height;
        self
    }

    pub fn with_overlay_stack_gap(mut self, gap: f32) -> Self {
        self.overlay_stack_gap = gap;
        self
    }

    pub fn min_host_width(&self) -> f32 {
        self.min_host_width
    }

    pub fn host_height(&self) -> f32 {
        self.host_height
    }

    pub fn container_width(&self) -> f32 {
        self.container_width
    }

    pub fn container_height(&self) -> f32 {
        self.container_height
    }

    pub fn container_gap(&self) -> f32 {
        self.container_gap
    }

    pub fn horizontal_gap(&self) -> f32 {
        self.horizontal_gap
    }

    pub fn layer_gap(&self) -> f32 {
        self.layer_gap
    }

    pub fn network_height(&self) -> f32 {
        self.network_height
    }

    pub fn overlay_stack_gap(&self) -> f32 {
        self.overlay_stack_gap
    }

    /// Checks that every dimension is finite, sizes are positive and gaps are
    /// not negative.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<(), LayoutError> {
        let sizes = [
            ("min_host_width", self.min_host_width),
            ("host_height", self.host_height),
            ("container_width", self.container_width),
            ("container_height", self.container_height),
            ("network_height", self.network_height),
        ];
        let gaps = [
            ("container_gap", self.container_gap),
            ("horizontal_gap", self.horizontal_gap),
            ("layer_gap", self.layer_gap),
            ("overlay_stack_gap", self.overlay_stack_gap),
        ];

        for (name, value) in sizes {
            if !value.is_finite() || value <= 0.0 {
                return Err(LayoutError::InvalidConfig(format!(
                    "`{name}` must be a positive number, got {value}"
                )));
            }
        }
        for (name, value) in gaps {
            if !value.is_finite() || value < 0.0 {
                return Err(LayoutError::InvalidConfig(format!(
                    "`{name}` must not be negative, got {value}"
                )));
            }
        }
        Ok(())
    }
}
