//! Leaflet HTML document emission.
//!
//! Produces a single self-contained page: base tiles, a labels-only tile
//! layer in the top pane, one `L.geoJSON` block per transit layer, and a
//! small CSS block for hover-label borders. Feature data is embedded as
//! `GeoJSON` with per-feature `_color`, `_popup`, and `_label` properties
//! already resolved, so the page's scripts stay purely declarative.

use std::fmt::Write as _;

use transit_map_source_models::{Attributes, FeatureGeometry, LayerKind};

use crate::popup::render_template;
use crate::style::{LayerStyle, PANES, is_hex_color, layer_style};
use crate::{MapOptions, ModeLayer, RenderError};

/// Base map tiles without labels.
const BASEMAP_URL: &str = "https://{s}.basemaps.cartocdn.com/light_nolabels/{z}/{x}/{y}{r}.png";

/// Labels-only tiles, drawn in the top pane.
const LABELS_URL: &str = "https://{s}.basemaps.cartocdn.com/light_only_labels/{z}/{x}/{y}{r}.png";

/// Tile attribution line.
const TILE_ATTRIBUTION: &str =
    "&copy; <a href=\\\"https://www.openstreetmap.org/copyright\\\">OpenStreetMap</a> contributors &copy; <a href=\\\"https://carto.com/attributions\\\">CARTO</a>";

/// Composes the full map document from zero or more normalized layers.
///
/// Layers are emitted in input order; draw order is governed by panes,
/// not emission order.
///
/// # Errors
///
/// Returns [`RenderError`] if a layer's configured style colors are not
/// valid hex values or the feature data cannot be serialized. No partial
/// artifact is produced on error.
pub fn compose(options: &MapOptions, layers: &[ModeLayer]) -> Result<String, RenderError> {
    let mut label_css = String::new();
    let mut layer_js = String::new();

    for layer in layers {
        let style = layer_style(layer.mode, layer.kind);
        validate_style(&layer.endpoint_id, &style)?;

        let _ = writeln!(
            label_css,
            "      .label-{} {{ border: 2px solid {}; }}",
            layer.endpoint_id, style.label_border_color
        );

        layer_js.push_str(&emit_layer(layer, &style)?);
    }

    let mut pane_js = String::new();
    for pane in PANES {
        let _ = writeln!(
            pane_js,
            "      map.createPane('{name}');\n      map.getPane('{name}').style.zIndex = {z};",
            name = pane.name,
            z = pane.z_index,
        );
    }
    // The labels tile layer sits on top; keep it transparent to clicks.
    let _ = writeln!(
        pane_js,
        "      map.getPane('labels').style.pointerEvents = 'none';"
    );

    let generated_at = chrono::Utc::now().to_rfc3339();

    Ok(format!(
        r#"<!DOCTYPE html>
<!-- generated {generated_at} -->
<html>
  <head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1.0" />
    <title>{title}</title>
    <link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css" />
    <script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
    <style>
      html, body, #map {{ height: 100%; margin: 0; }}
{label_css}    </style>
  </head>
  <body>
    <div id="map"></div>
    <script>
      const map = L.map('map', {{ center: [{lat}, {lng}], zoom: {zoom} }});

{pane_js}
      L.tileLayer('{basemap_url}', {{
        attribution: "{attribution}",
        subdomains: 'abcd',
        maxZoom: 20,
      }}).addTo(map);

      L.tileLayer('{labels_url}', {{
        pane: 'labels',
        subdomains: 'abcd',
        maxZoom: 20,
      }}).addTo(map);

{layer_js}    </script>
  </body>
</html>
"#,
        title = options.title,
        lat = options.center_lat,
        lng = options.center_lng,
        zoom = options.zoom,
        basemap_url = BASEMAP_URL,
        labels_url = LABELS_URL,
        attribution = TILE_ATTRIBUTION,
    ))
}

/// Rejects styles whose configured colors are not `#rrggbb`.
fn validate_style(endpoint_id: &str, style: &LayerStyle) -> Result<(), RenderError> {
    for color in [style.fallback_color, style.label_border_color] {
        if !is_hex_color(color) {
            return Err(RenderError::InvalidColor {
                layer: endpoint_id.to_string(),
                value: color.to_string(),
            });
        }
    }
    Ok(())
}

/// Resolves a feature's stroke/marker color.
///
/// Uses the per-feature color field when configured and valid; anything
/// missing or malformed falls back to the style's fixed color with a
/// warning.
fn resolve_feature_color(style: &LayerStyle, attributes: &Attributes) -> String {
    let Some(field) = style.color_field else {
        return style.fallback_color.to_string();
    };

    match attributes.get(field).and_then(serde_json::Value::as_str) {
        Some(value) if is_hex_color(value) => value.to_string(),
        Some(value) => {
            log::warn!("invalid {field} value {value:?}, using fallback color");
            style.fallback_color.to_string()
        }
        None => style.fallback_color.to_string(),
    }
}

/// Builds the embeddable `GeoJSON` feature collection for one layer.
fn feature_collection(layer: &ModeLayer, style: &LayerStyle) -> geojson::FeatureCollection {
    let features = layer
        .collection
        .features
        .iter()
        .map(|feature| {
            let geometry = match &feature.geometry {
                FeatureGeometry::Point(point) => {
                    geojson::Geometry::new(geojson::Value::from(point))
                }
                FeatureGeometry::Line(line) => geojson::Geometry::new(geojson::Value::from(line)),
            };

            let mut properties = feature.attributes.clone();
            properties.insert(
                "_popup".to_string(),
                render_template(style.popup_template, &feature.attributes).into(),
            );
            properties.insert(
                "_label".to_string(),
                render_template(style.label_template, &feature.attributes).into(),
            );
            properties.insert(
                "_color".to_string(),
                resolve_feature_color(style, &feature.attributes).into(),
            );

            geojson::Feature {
                bbox: None,
                geometry: Some(geometry),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    geojson::FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// Emits the script block for one layer.
fn emit_layer(layer: &ModeLayer, style: &LayerStyle) -> Result<String, RenderError> {
    let collection = feature_collection(layer, style);
    // Escape "</" so embedded data can never terminate the script tag.
    let data = serde_json::to_string(&collection)?.replace("</", "<\\/");

    let id = &layer.endpoint_id;
    let mut js = String::new();

    let _ = writeln!(js, "      // {}", layer.name);
    let _ = writeln!(js, "      const data_{id} = {data};");

    match layer.kind {
        LayerKind::Routes => {
            let dash = style
                .line_style
                .dash_array()
                .map_or("null".to_string(), |d| format!("'{d}'"));
            let _ = writeln!(
                js,
                "      L.geoJSON(data_{id}, {{\n        pane: '{pane}',\n        style: (f) => ({{ color: f.properties._color, weight: {weight}, dashArray: {dash} }}),\n        onEachFeature: (f, l) => {{\n          l.bindPopup(f.properties._popup);\n          l.bindTooltip(f.properties._label, {{ sticky: true, className: 'label-{id}' }});\n        }},\n      }}).addTo(map);",
                pane = style.pane,
                weight = style.weight,
            );
        }
        LayerKind::Stops => {
            let point_to_layer = if let Some(icon) = style.icon {
                let _ = writeln!(
                    js,
                    "      const icon_{id} = L.icon({{ iconUrl: '{url}', iconSize: [{w}, {h}] }});",
                    url = icon.url,
                    w = icon.width,
                    h = icon.height,
                );
                format!("(f, latlng) => L.marker(latlng, {{ icon: icon_{id}, pane: '{pane}' }})",
                    pane = style.pane)
            } else {
                format!(
                    "(f, latlng) => L.circleMarker(latlng, {{ pane: '{pane}', radius: 4, color: f.properties._color, weight: {weight}, fillOpacity: 0.9 }})",
                    pane = style.pane,
                    weight = style.weight,
                )
            };
            let _ = writeln!(
                js,
                "      L.geoJSON(data_{id}, {{\n        pointToLayer: {point_to_layer},\n        onEachFeature: (f, l) => {{\n          l.bindPopup(f.properties._popup);\n          l.bindTooltip(f.properties._label, {{ direction: 'top', className: 'label-{id}' }});\n        }},\n      }}).addTo(map);",
            );
        }
    }

    js.push('\n');
    Ok(js)
}

#[cfg(test)]
mod tests {
    use geo::{LineString, Point};
    use serde_json::json;
    use transit_map_source_models::{
        NormalizedFeature, NormalizedFeatureCollection, TransitMode,
    };

    use super::*;
    use crate::style::LineStyle;

    fn attrs(pairs: &[(&str, serde_json::Value)]) -> Attributes {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    fn stop_layer() -> ModeLayer {
        ModeLayer {
            endpoint_id: "rapid_transit_stops".to_string(),
            name: "Rapid Transit Stops".to_string(),
            mode: TransitMode::RapidTransit,
            kind: LayerKind::Stops,
            collection: NormalizedFeatureCollection {
                features: vec![NormalizedFeature {
                    attributes: attrs(&[
                        ("stop_name", json!("Alewife")),
                        ("line", json!("RED")),
                        ("town", json!("Cambridge")),
                    ]),
                    geometry: FeatureGeometry::Point(Point::new(-71.14, 42.40)),
                }],
            },
        }
    }

    fn ferry_route_layer() -> ModeLayer {
        ModeLayer {
            endpoint_id: "ferry_routes".to_string(),
            name: "Ferry Routes".to_string(),
            mode: TransitMode::Ferry,
            kind: LayerKind::Routes,
            collection: NormalizedFeatureCollection {
                features: vec![NormalizedFeature {
                    attributes: attrs(&[("route_name", json!("Charlestown Ferry"))]),
                    geometry: FeatureGeometry::Line(LineString::from(vec![
                        (-71.05, 42.37),
                        (-71.03, 42.36),
                    ])),
                }],
            },
        }
    }

    #[test]
    fn composes_panes_tiles_and_layers() {
        let html = compose(&MapOptions::default(), &[stop_layer(), ferry_route_layer()]).unwrap();

        for pane in ["routes", "stops", "labels"] {
            assert!(
                html.contains(&format!("map.createPane('{pane}')")),
                "missing pane {pane}"
            );
        }
        assert!(html.contains("light_nolabels"));
        assert!(html.contains("light_only_labels"));
        assert!(html.contains("Alewife"));
        assert!(html.contains("Charlestown Ferry"));
        assert!(html.contains("dashArray: '4 6'"));
        assert!(html.contains("icon_rapid_transit_stops"));
    }

    #[test]
    fn composes_with_no_layers() {
        let html = compose(&MapOptions::default(), &[]).unwrap();
        assert!(html.contains("L.map('map'"));
        assert!(!html.contains("L.geoJSON"));
    }

    #[test]
    fn popup_and_color_properties_are_resolved() {
        let html = compose(&MapOptions::default(), &[stop_layer()]).unwrap();
        // "</" is escaped in embedded data, so the closing tag reads "<\/b>".
        assert!(html.contains("<b>Alewife<\\/b><br>RED<br>Cambridge"));
        assert!(html.contains("\"_color\":\"#1c1e23\""));
    }

    #[test]
    fn embedded_data_cannot_close_the_script_tag() {
        let mut layer = stop_layer();
        layer.collection.features[0]
            .attributes
            .insert("note".to_string(), json!("</script><script>"));

        let html = compose(&MapOptions::default(), &[layer]).unwrap();
        assert!(!html.contains("</script><script>"));
        assert!(html.contains("<\\/script>"));
    }

    #[test]
    fn rejects_invalid_configured_color() {
        let style = LayerStyle {
            pane: "routes",
            color_field: None,
            fallback_color: "blue",
            line_style: LineStyle::Solid,
            weight: 3,
            icon: None,
            popup_template: "{route_name}",
            label_template: "{route_name}",
            label_border_color: "#7c878e",
        };

        let err = validate_style("bad_layer", &style).unwrap_err();
        assert!(matches!(
            err,
            RenderError::InvalidColor { ref layer, ref value }
                if layer == "bad_layer" && value == "blue"
        ));
    }

    #[test]
    fn per_feature_color_wins_when_valid() {
        let style = layer_style(TransitMode::RapidTransit, LayerKind::Routes);
        let attributes = attrs(&[("route_color", json!("#00843d"))]);
        assert_eq!(resolve_feature_color(&style, &attributes), "#00843d");
    }

    #[test]
    fn invalid_per_feature_color_falls_back() {
        let style = layer_style(TransitMode::RapidTransit, LayerKind::Routes);
        let attributes = attrs(&[("route_color", json!("green"))]);
        assert_eq!(resolve_feature_color(&style, &attributes), "#da291c");
    }

    #[test]
    fn missing_color_field_uses_fallback() {
        let style = layer_style(TransitMode::CommuterRail, LayerKind::Routes);
        assert_eq!(resolve_feature_color(&style, &attrs(&[])), "#80276c");
    }
}
