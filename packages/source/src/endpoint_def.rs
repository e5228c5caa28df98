//! Config-driven GIS endpoint definition.
//!
//! [`EndpointDefinition`] captures everything unique about one transit
//! layer's query endpoint in a serializable config struct. A single generic
//! fetch + normalize pipeline handles all endpoints, eliminating per-layer
//! boilerplate.

use serde::Deserialize;
use transit_map_source_models::{GeometryKind, LayerKind, TransitMode};

/// A complete, config-driven endpoint definition.
///
/// Loaded from TOML files at compile time via the
/// [registry](crate::registry).
#[derive(Debug, Clone, Deserialize)]
pub struct EndpointDefinition {
    /// Unique identifier (e.g., `"rapid_transit_stops"`).
    pub id: String,
    /// Human-readable name (e.g., `"Rapid Transit Stops"`).
    pub name: String,
    /// Transit mode this layer belongs to.
    pub mode: TransitMode,
    /// Whether this layer carries stops or routes.
    pub layer: LayerKind,
    /// Geometry encoding the endpoint delivers. Declared explicitly so the
    /// normalizer branch is part of the config, never inferred from data.
    pub geometry: GeometryKind,
    /// Query URL of the layer (e.g., `.../FeatureServer/0/query`).
    pub query_url: String,
    /// Attribute fields to request via `outFields`.
    pub out_fields: Vec<String>,
    /// Records per page.
    pub page_size: u64,
    /// Optional `where` clause. Defaults to `"1=1"` when unset.
    #[serde(default)]
    pub where_clause: Option<String>,
}

/// Parses one endpoint definition from its TOML text.
///
/// # Errors
///
/// Returns a [`toml::de::Error`] if the text is not a valid definition.
pub fn parse_endpoint_toml(text: &str) -> Result<EndpointDefinition, toml::de::Error> {
    toml::from_str(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_point_endpoint() {
        let def = parse_endpoint_toml(
            r#"
            id = "ferry_stops"
            name = "Ferry Terminals"
            mode = "ferry"
            layer = "stops"
            geometry = "point"
            query_url = "https://example.com/FeatureServer/0/query"
            out_fields = ["terminal_name", "town"]
            page_size = 1000
            "#,
        )
        .unwrap();

        assert_eq!(def.id, "ferry_stops");
        assert_eq!(def.mode, TransitMode::Ferry);
        assert_eq!(def.layer, LayerKind::Stops);
        assert_eq!(def.geometry, GeometryKind::Point);
        assert!(def.where_clause.is_none());
    }

    #[test]
    fn parses_a_path_endpoint_with_where_clause() {
        let def = parse_endpoint_toml(
            r#"
            id = "bus_routes"
            name = "Bus Routes"
            mode = "bus"
            layer = "routes"
            geometry = "path"
            query_url = "https://example.com/FeatureServer/2/query"
            out_fields = ["route_id", "route_name"]
            page_size = 500
            where_clause = "route_type = 3"
            "#,
        )
        .unwrap();

        assert_eq!(def.geometry, GeometryKind::Path);
        assert_eq!(def.where_clause.as_deref(), Some("route_type = 3"));
    }

    #[test]
    fn rejects_unknown_geometry_kind() {
        let result = parse_endpoint_toml(
            r#"
            id = "bad"
            name = "Bad"
            mode = "bus"
            layer = "routes"
            geometry = "polygon"
            query_url = "https://example.com/query"
            out_fields = []
            page_size = 100
            "#,
        );
        assert!(result.is_err());
    }
}
