//! Endpoint registry — loads all layer definitions from embedded TOML configs.
//!
//! Each `.toml` file in `packages/source/endpoints/` is baked into the binary
//! at compile time via [`include_str!`]. Adding a new layer (bus stop markers
//! were left out of the reference map, for instance) is as simple as creating
//! a new TOML file and adding it to the list below.

use crate::endpoint_def::{EndpointDefinition, parse_endpoint_toml};

/// TOML configs embedded at compile time.
const ENDPOINT_TOMLS: &[(&str, &str)] = &[
    // ── Stops ────────────────────────────────────────────────────────
    (
        "rapid_transit_stops",
        include_str!("../endpoints/rapid_transit_stops.toml"),
    ),
    (
        "commuter_rail_stops",
        include_str!("../endpoints/commuter_rail_stops.toml"),
    ),
    ("ferry_stops", include_str!("../endpoints/ferry_stops.toml")),
    // ── Routes ───────────────────────────────────────────────────────
    (
        "rapid_transit_routes",
        include_str!("../endpoints/rapid_transit_routes.toml"),
    ),
    (
        "commuter_rail_routes",
        include_str!("../endpoints/commuter_rail_routes.toml"),
    ),
    ("bus_routes", include_str!("../endpoints/bus_routes.toml")),
    (
        "ferry_routes",
        include_str!("../endpoints/ferry_routes.toml"),
    ),
    (
        "other_routes",
        include_str!("../endpoints/other_routes.toml"),
    ),
];

/// Total number of configured endpoints (used in tests).
#[cfg(test)]
const EXPECTED_ENDPOINT_COUNT: usize = 8;

/// Returns all configured endpoint definitions, parsed from embedded TOML.
///
/// # Panics
///
/// Panics if any TOML config is malformed (this is a compile-time guarantee
/// since the configs are embedded).
#[must_use]
pub fn all_endpoints() -> Vec<EndpointDefinition> {
    ENDPOINT_TOMLS
        .iter()
        .map(|(name, toml)| {
            parse_endpoint_toml(toml)
                .unwrap_or_else(|e| panic!("Failed to parse {name}.toml: {e}"))
        })
        .collect()
}
