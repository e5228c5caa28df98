//! Declarative layer styling.
//!
//! Every `(mode, layer)` combination maps to one [`LayerStyle`] record via
//! [`layer_style`], so each transit mode receives a consistent contract
//! instead of repeated inline styling calls. Draw order is controlled by
//! three named panes: route overlays below stop markers below the
//! base-map label tiles.

use transit_map_source_models::{LayerKind, TransitMode};

/// A named, z-ordered drawing pane.
#[derive(Debug, Clone, Copy)]
pub struct PaneSpec {
    /// Pane name referenced by layers.
    pub name: &'static str,
    /// CSS z-index of the pane.
    pub z_index: u32,
}

/// Pane for route polylines (bottom of the custom stack).
pub const ROUTES_PANE: PaneSpec = PaneSpec {
    name: "routes",
    z_index: 450,
};

/// Pane for stop markers, above routes.
pub const STOPS_PANE: PaneSpec = PaneSpec {
    name: "stops",
    z_index: 610,
};

/// Pane for the labels-only base tile layer, above everything.
pub const LABELS_PANE: PaneSpec = PaneSpec {
    name: "labels",
    z_index: 650,
};

/// All panes, in ascending draw order.
pub const PANES: &[PaneSpec] = &[ROUTES_PANE, STOPS_PANE, LABELS_PANE];

/// Polyline stroke style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    /// Continuous stroke
    Solid,
    /// Dashed stroke (ferry routes)
    Dashed,
}

impl LineStyle {
    /// SVG dash pattern for the stroke, if any.
    #[must_use]
    pub const fn dash_array(self) -> Option<&'static str> {
        match self {
            Self::Solid => None,
            Self::Dashed => Some("4 6"),
        }
    }
}

/// Custom marker icon reference.
#[derive(Debug, Clone, Copy)]
pub struct MarkerIcon {
    /// Image URL (relative asset path in the emitted document).
    pub url: &'static str,
    /// Icon width in pixels.
    pub width: u32,
    /// Icon height in pixels.
    pub height: u32,
}

/// Complete style record for one layer.
#[derive(Debug, Clone, Copy)]
pub struct LayerStyle {
    /// Pane the layer draws into.
    pub pane: &'static str,
    /// Attribute field carrying a per-feature hex color, if any.
    pub color_field: Option<&'static str>,
    /// Fixed color used when `color_field` is unset, missing, or invalid.
    pub fallback_color: &'static str,
    /// Stroke style for route polylines.
    pub line_style: LineStyle,
    /// Stroke weight in pixels.
    pub weight: u32,
    /// Marker icon for stop layers; stops without one render as circles.
    pub icon: Option<MarkerIcon>,
    /// Field-interpolated HTML for click popups.
    pub popup_template: &'static str,
    /// Field-interpolated text for hover labels.
    pub label_template: &'static str,
    /// Border color of the hover label.
    pub label_border_color: &'static str,
}

/// Returns the style record for a `(mode, layer)` combination.
#[must_use]
pub const fn layer_style(mode: TransitMode, kind: LayerKind) -> LayerStyle {
    match kind {
        LayerKind::Routes => route_style(mode),
        LayerKind::Stops => stop_style(mode),
    }
}

const fn route_style(mode: TransitMode) -> LayerStyle {
    let base = LayerStyle {
        pane: ROUTES_PANE.name,
        color_field: None,
        fallback_color: "#7c878e",
        line_style: LineStyle::Solid,
        weight: 3,
        icon: None,
        popup_template: "<b>{route_name}</b>",
        label_template: "{route_name}",
        label_border_color: "#7c878e",
    };

    match mode {
        // Rapid transit lines carry their own brand color per feature.
        TransitMode::RapidTransit => LayerStyle {
            color_field: Some("route_color"),
            fallback_color: "#da291c",
            weight: 4,
            popup_template: "<b>{route_name}</b><br>{line}",
            label_border_color: "#da291c",
            ..base
        },
        TransitMode::CommuterRail => LayerStyle {
            fallback_color: "#80276c",
            popup_template: "<b>{route_name}</b><br>{line}",
            label_border_color: "#80276c",
            ..base
        },
        TransitMode::Bus => LayerStyle {
            fallback_color: "#ffc72c",
            weight: 2,
            popup_template: "<b>{route_name}</b><br>Route {route_id}",
            label_border_color: "#ffc72c",
            ..base
        },
        TransitMode::Ferry => LayerStyle {
            fallback_color: "#008eaa",
            line_style: LineStyle::Dashed,
            label_border_color: "#008eaa",
            ..base
        },
        TransitMode::Other => LayerStyle {
            color_field: Some("route_color"),
            ..base
        },
    }
}

const fn stop_style(mode: TransitMode) -> LayerStyle {
    let base = LayerStyle {
        pane: STOPS_PANE.name,
        color_field: None,
        fallback_color: "#1c1e23",
        line_style: LineStyle::Solid,
        weight: 1,
        icon: None,
        popup_template: "<b>{stop_name}</b><br>{town}",
        label_template: "{stop_name}",
        label_border_color: "#1c1e23",
    };

    match mode {
        TransitMode::RapidTransit => LayerStyle {
            icon: Some(MarkerIcon {
                url: "assets/icons/rapid_transit.png",
                width: 20,
                height: 20,
            }),
            popup_template: "<b>{stop_name}</b><br>{line}<br>{town}",
            label_border_color: "#da291c",
            ..base
        },
        TransitMode::CommuterRail => LayerStyle {
            icon: Some(MarkerIcon {
                url: "assets/icons/commuter_rail.png",
                width: 18,
                height: 18,
            }),
            popup_template: "<b>{stop_name}</b><br>{line}<br>{town}",
            label_border_color: "#80276c",
            ..base
        },
        TransitMode::Bus => LayerStyle {
            fallback_color: "#ffc72c",
            label_border_color: "#ffc72c",
            ..base
        },
        TransitMode::Ferry => LayerStyle {
            icon: Some(MarkerIcon {
                url: "assets/icons/ferry.png",
                width: 18,
                height: 18,
            }),
            label_border_color: "#008eaa",
            ..base
        },
        TransitMode::Other => base,
    }
}

/// Returns `true` if the value is a `#rrggbb` hex color.
#[must_use]
pub fn is_hex_color(value: &str) -> bool {
    let Some(digits) = value.strip_prefix('#') else {
        return false;
    };
    digits.len() == 6 && digits.bytes().all(|b| b.is_ascii_hexdigit())
}
