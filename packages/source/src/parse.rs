//! Parses raw `ArcGIS` feature JSON into a [`RawFeatureCollection`].
//!
//! The fetcher returns feature objects shaped as
//! `{ "attributes": {...}, "geometry": {...} }`. This module splits them
//! into the parallel attribute / geometry records the normalizer consumes,
//! preserving response order so positional pairing stays intact.

use transit_map_source_models::{
    Attributes, GeometryKind, RawFeatureCollection, RawGeometrySet, RawPath,
};

/// Splits raw feature objects into a [`RawFeatureCollection`].
///
/// The geometry encoding comes from the endpoint config, never from
/// sniffing the data. Missing or malformed geometry objects become
/// degenerate records (`None` coordinates, empty paths) that the
/// normalizer handles per its documented skip policy.
#[must_use]
pub fn parse_features(features: &[serde_json::Value], kind: GeometryKind) -> RawFeatureCollection {
    let attributes: Vec<Attributes> = features.iter().map(parse_attributes).collect();

    let geometry = match kind {
        GeometryKind::Point => {
            let x = features
                .iter()
                .map(|f| point_coordinate(f, "x"))
                .collect();
            let y = features
                .iter()
                .map(|f| point_coordinate(f, "y"))
                .collect();
            RawGeometrySet::Points { x, y }
        }
        GeometryKind::Path => {
            RawGeometrySet::Paths(features.iter().map(parse_path).collect())
        }
    };

    RawFeatureCollection {
        attributes,
        geometry,
    }
}

/// Extracts the attribute record, or an empty record when absent.
fn parse_attributes(feature: &serde_json::Value) -> Attributes {
    feature
        .get("attributes")
        .and_then(serde_json::Value::as_object)
        .cloned()
        .unwrap_or_default()
}

/// Reads one scalar coordinate from a feature's geometry object.
fn point_coordinate(feature: &serde_json::Value, axis: &str) -> Option<f64> {
    feature
        .get("geometry")?
        .get(axis)?
        .as_f64()
        .filter(|v| v.is_finite())
}

/// Reads a feature's `paths` array as part × vertex × dimension.
///
/// Anything missing or non-numeric collapses to an empty structure at
/// that level, which the normalizer treats as degenerate.
fn parse_path(feature: &serde_json::Value) -> RawPath {
    feature
        .get("geometry")
        .and_then(|g| g.get("paths"))
        .and_then(serde_json::Value::as_array)
        .map(|parts| {
            parts
                .iter()
                .map(|part| {
                    part.as_array()
                        .map(|vertices| {
                            vertices
                                .iter()
                                .map(|vertex| {
                                    vertex
                                        .as_array()
                                        .map(|dims| {
                                            dims.iter()
                                                .filter_map(serde_json::Value::as_f64)
                                                .collect()
                                        })
                                        .unwrap_or_default()
                                })
                                .collect()
                        })
                        .unwrap_or_default()
                })
                .collect()
        })
        .unwrap_or_default()
}
