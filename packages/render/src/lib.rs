#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Map composer for normalized transit layers.
//!
//! Consumes [`NormalizedFeatureCollection`] values plus the declarative
//! style registry in [`style`] and produces a single self-contained
//! Leaflet HTML document: two base tile layers (labels split into their
//! own pane for z-order control), one polyline layer per route dataset,
//! one marker layer per stop dataset, and styled field-interpolated
//! popups. All per-feature decisions (colors, popup text) are resolved
//! here at compose time, so the emitted page contains no branching logic.

pub mod html;
pub mod popup;
pub mod style;

use transit_map_source_models::{LayerKind, NormalizedFeatureCollection, TransitMode};

/// Errors that can occur while composing the map artifact.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// A configured style color is not a `#rrggbb` hex string.
    #[error("invalid color {value:?} for layer {layer}")]
    InvalidColor {
        /// Endpoint id of the offending layer.
        layer: String,
        /// The rejected color value.
        value: String,
    },

    /// Feature data could not be serialized for embedding.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Map-wide options: title, initial viewport.
#[derive(Debug, Clone)]
pub struct MapOptions {
    /// Document title.
    pub title: String,
    /// Initial center latitude.
    pub center_lat: f64,
    /// Initial center longitude.
    pub center_lng: f64,
    /// Initial zoom level.
    pub zoom: u8,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            title: "Transit Map".to_string(),
            center_lat: 42.3601,
            center_lng: -71.0589,
            zoom: 12,
        }
    }
}

/// One normalized layer ready for composition.
#[derive(Debug, Clone)]
pub struct ModeLayer {
    /// Endpoint id this layer came from (e.g., `"ferry_routes"`).
    pub endpoint_id: String,
    /// Human-readable layer name.
    pub name: String,
    /// Transit mode, used to select the style record.
    pub mode: TransitMode,
    /// Stops or routes, used to select the style record.
    pub kind: LayerKind,
    /// The normalized features.
    pub collection: NormalizedFeatureCollection,
}
