#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Transit GIS endpoint fetching and geometry normalization.
//!
//! Each configured endpoint is fetched from its `ArcGIS`-style REST API,
//! parsed into a [`RawFeatureCollection`](transit_map_source_models::RawFeatureCollection),
//! and run through [`normalize::normalize`] to produce uniform geometric
//! feature collections for the map composer.

pub mod arcgis;
pub mod endpoint_def;
pub mod normalize;
pub mod parse;
pub mod registry;
pub mod retry;

use std::time::Duration;

/// Errors that can occur while fetching or normalizing a layer.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The GIS API returned an in-body error object or malformed response.
    #[error("GIS API error: {message}")]
    Api {
        /// Description of what the API reported.
        message: String,
    },

    /// Attribute-record count differs from geometry-record count.
    #[error(
        "shape mismatch: {attributes} attribute records vs {geometries} geometry records"
    )]
    ShapeMismatch {
        /// Number of attribute records in the raw collection.
        attributes: usize,
        /// Number of geometry records in the raw collection.
        geometries: usize,
    },

    /// A geometry record cannot produce a well-formed point or line string.
    #[error("degenerate geometry at feature {index}: {reason}")]
    DegenerateGeometry {
        /// Position of the offending feature in the raw collection.
        index: usize,
        /// Why the geometry is unusable.
        reason: String,
    },
}

/// Configuration for fetching data from an endpoint.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Per-request timeout applied to the HTTP client.
    pub timeout: Duration,
    /// Maximum number of features to fetch (useful for testing).
    pub limit: Option<u64>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            limit: None,
        }
    }
}
