//! Geometry normalizer: raw point-or-path records → uniform features.
//!
//! Joins each attribute record to its geometry record by index, with an
//! enforced equal-length precondition. The two encodings are mutually
//! exclusive variants of [`RawGeometrySet`], so point data can never be
//! run through the path branch or vice versa.
//!
//! Degenerate records (a point missing a coordinate, a path whose first
//! part has fewer than two usable vertices) are skipped with a warning
//! rather than failing the whole layer; survivors keep their relative
//! order. This is a single-pass pure transform — no I/O, no state.

use geo::{Coord, LineString, Point};
use transit_map_source_models::{
    FeatureGeometry, NormalizedFeature, NormalizedFeatureCollection, RawFeatureCollection,
    RawGeometrySet, RawPath,
};

use crate::SourceError;

/// Converts a [`RawFeatureCollection`] into a [`NormalizedFeatureCollection`].
///
/// Attribute fields are preserved verbatim; geometry is constructed per
/// the set's encoding. Processing is in index order 0..N-1 and the result
/// preserves the original ordering.
///
/// # Errors
///
/// Returns [`SourceError::ShapeMismatch`] if the attribute-record count
/// differs from the geometry-record count (including a point set whose
/// x and y sequences disagree on length). Never silently misaligns.
pub fn normalize(raw: &RawFeatureCollection) -> Result<NormalizedFeatureCollection, SourceError> {
    let geometries = raw.geometry.len();
    if raw.attributes.len() != geometries {
        return Err(SourceError::ShapeMismatch {
            attributes: raw.attributes.len(),
            geometries,
        });
    }

    if let RawGeometrySet::Points { x, y } = &raw.geometry
        && x.len() != y.len()
    {
        // x drives the geometry count, so a diverging y sequence is a
        // mismatch against the (already equal) attribute side.
        return Err(SourceError::ShapeMismatch {
            attributes: raw.attributes.len(),
            geometries: y.len(),
        });
    }

    let mut features = Vec::with_capacity(raw.attributes.len());

    for (index, attributes) in raw.attributes.iter().enumerate() {
        let geometry = match &raw.geometry {
            RawGeometrySet::Points { x, y } => point_geometry(index, x[index], y[index]),
            RawGeometrySet::Paths(paths) => path_geometry(index, &paths[index]),
        };

        match geometry {
            Ok(geometry) => features.push(NormalizedFeature {
                attributes: attributes.clone(),
                geometry,
            }),
            Err(e) => log::warn!("skipping feature: {e}"),
        }
    }

    Ok(NormalizedFeatureCollection { features })
}

/// Point branch: constructs a [`FeatureGeometry::Point`] from the feature's
/// coordinate pair. No coordinate transformation, no range validation.
fn point_geometry(
    index: usize,
    x: Option<f64>,
    y: Option<f64>,
) -> Result<FeatureGeometry, SourceError> {
    match (x, y) {
        (Some(x), Some(y)) => Ok(FeatureGeometry::Point(Point::new(x, y))),
        _ => Err(SourceError::DegenerateGeometry {
            index,
            reason: "point record missing x or y".to_string(),
        }),
    }
}

/// Path branch: selects part index 0 of the feature's path and builds a
/// [`FeatureGeometry::Line`] from its vertices. Extra coordinate
/// dimensions beyond x/y are ignored.
fn path_geometry(index: usize, path: &RawPath) -> Result<FeatureGeometry, SourceError> {
    let part = path.first().ok_or_else(|| SourceError::DegenerateGeometry {
        index,
        reason: "path has no parts".to_string(),
    })?;

    let mut coords = Vec::with_capacity(part.len());
    for (vertex_index, vertex) in part.iter().enumerate() {
        if vertex.len() < 2 {
            return Err(SourceError::DegenerateGeometry {
                index,
                reason: format!("vertex {vertex_index} has fewer than 2 dimensions"),
            });
        }
        coords.push(Coord {
            x: vertex[0],
            y: vertex[1],
        });
    }

    if coords.len() < 2 {
        return Err(SourceError::DegenerateGeometry {
            index,
            reason: format!("part 0 has {} vertices, need at least 2", coords.len()),
        });
    }

    Ok(FeatureGeometry::Line(LineString::new(coords)))
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use transit_map_source_models::Attributes;

    use super::*;

    fn attrs(pairs: &[(&str, serde_json::Value)]) -> Attributes {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn point_branch_builds_points_in_order() {
        let raw = RawFeatureCollection {
            attributes: vec![
                attrs(&[("stop_name", json!("A"))]),
                attrs(&[("stop_name", json!("B"))]),
            ],
            geometry: RawGeometrySet::Points {
                x: vec![Some(1.0), Some(3.0)],
                y: vec![Some(2.0), Some(4.0)],
            },
        };

        let normalized = normalize(&raw).unwrap();

        assert_eq!(normalized.len(), 2);
        assert_eq!(
            normalized.features[0].geometry,
            FeatureGeometry::Point(Point::new(1.0, 2.0))
        );
        assert_eq!(
            normalized.features[1].geometry,
            FeatureGeometry::Point(Point::new(3.0, 4.0))
        );
        assert_eq!(normalized.features[0].attributes["stop_name"], json!("A"));
        assert_eq!(normalized.features[1].attributes["stop_name"], json!("B"));
    }

    #[test]
    fn path_branch_uses_part_zero_only() {
        let raw = RawFeatureCollection {
            attributes: vec![attrs(&[("route_name", json!("Red Line"))])],
            geometry: RawGeometrySet::Paths(vec![vec![
                vec![vec![0.0, 0.0], vec![1.0, 1.0], vec![2.0, 2.0]],
                // second part must be ignored
                vec![vec![9.0, 9.0], vec![8.0, 8.0]],
            ]]),
        };

        let normalized = normalize(&raw).unwrap();

        assert_eq!(normalized.len(), 1);
        let FeatureGeometry::Line(line) = &normalized.features[0].geometry else {
            panic!("expected line string");
        };
        let coords: Vec<(f64, f64)> = line.coords().map(|c| (c.x, c.y)).collect();
        assert_eq!(coords, vec![(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)]);
    }

    #[test]
    fn extra_vertex_dimensions_are_ignored() {
        let raw = RawFeatureCollection {
            attributes: vec![attrs(&[])],
            geometry: RawGeometrySet::Paths(vec![vec![vec![
                vec![0.0, 0.0, 12.5],
                vec![1.0, 1.0, 13.0],
            ]]]),
        };

        let normalized = normalize(&raw).unwrap();

        let FeatureGeometry::Line(line) = &normalized.features[0].geometry else {
            panic!("expected line string");
        };
        assert_eq!(line.coords().count(), 2);
    }

    #[test]
    fn attribute_count_mismatch_is_rejected() {
        let raw = RawFeatureCollection {
            attributes: vec![attrs(&[]), attrs(&[]), attrs(&[])],
            geometry: RawGeometrySet::Points {
                x: vec![Some(1.0), Some(2.0)],
                y: vec![Some(1.0), Some(2.0)],
            },
        };

        let err = normalize(&raw).unwrap_err();
        assert!(matches!(
            err,
            SourceError::ShapeMismatch {
                attributes: 3,
                geometries: 2
            }
        ));
    }

    #[test]
    fn diverging_parallel_sequences_are_rejected() {
        let raw = RawFeatureCollection {
            attributes: vec![attrs(&[]), attrs(&[])],
            geometry: RawGeometrySet::Points {
                x: vec![Some(1.0), Some(2.0)],
                y: vec![Some(1.0)],
            },
        };

        assert!(matches!(
            normalize(&raw).unwrap_err(),
            SourceError::ShapeMismatch { .. }
        ));
    }

    #[test]
    fn degenerate_point_is_skipped_and_order_preserved() {
        let raw = RawFeatureCollection {
            attributes: vec![
                attrs(&[("stop_name", json!("A"))]),
                attrs(&[("stop_name", json!("B"))]),
                attrs(&[("stop_name", json!("C"))]),
            ],
            geometry: RawGeometrySet::Points {
                x: vec![Some(1.0), None, Some(3.0)],
                y: vec![Some(1.0), Some(2.0), Some(3.0)],
            },
        };

        let normalized = normalize(&raw).unwrap();

        assert_eq!(normalized.len(), 2);
        assert_eq!(normalized.features[0].attributes["stop_name"], json!("A"));
        assert_eq!(normalized.features[1].attributes["stop_name"], json!("C"));
    }

    #[test]
    fn single_vertex_path_is_skipped() {
        let raw = RawFeatureCollection {
            attributes: vec![attrs(&[("route_name", json!("Stub"))]), attrs(&[])],
            geometry: RawGeometrySet::Paths(vec![
                vec![vec![vec![0.0, 0.0]]],
                vec![vec![vec![0.0, 0.0], vec![1.0, 1.0]]],
            ]),
        };

        let normalized = normalize(&raw).unwrap();
        assert_eq!(normalized.len(), 1);
        assert!(matches!(
            normalized.features[0].geometry,
            FeatureGeometry::Line(_)
        ));
    }

    #[test]
    fn empty_path_is_skipped() {
        let raw = RawFeatureCollection {
            attributes: vec![attrs(&[])],
            geometry: RawGeometrySet::Paths(vec![vec![]]),
        };

        let normalized = normalize(&raw).unwrap();
        assert!(normalized.is_empty());
    }

    #[test]
    fn normalization_is_idempotent() {
        let raw = RawFeatureCollection {
            attributes: vec![attrs(&[("stop_name", json!("A"))])],
            geometry: RawGeometrySet::Points {
                x: vec![Some(-71.0)],
                y: vec![Some(42.0)],
            },
        };

        let first = normalize(&raw).unwrap();
        let second = normalize(&raw).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn empty_collection_normalizes_to_empty() {
        let raw = RawFeatureCollection {
            attributes: vec![],
            geometry: RawGeometrySet::Points {
                x: vec![],
                y: vec![],
            },
        };

        assert!(normalize(&raw).unwrap().is_empty());
    }

    // The end-to-end scenario from the stops pipeline: one station record
    // with a bare coordinate pair.
    #[test]
    fn alewife_station_round_trips() {
        let raw = RawFeatureCollection {
            attributes: vec![attrs(&[("stop_name", json!("Alewife"))])],
            geometry: RawGeometrySet::Points {
                x: vec![Some(-71.14)],
                y: vec![Some(42.40)],
            },
        };

        let normalized = normalize(&raw).unwrap();

        assert_eq!(normalized.len(), 1);
        let feature = &normalized.features[0];
        assert_eq!(feature.attributes["stop_name"], json!("Alewife"));
        assert_eq!(
            feature.geometry,
            FeatureGeometry::Point(Point::new(-71.14, 42.40))
        );
    }
}
