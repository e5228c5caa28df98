#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! CLI tool for generating the transit map HTML artifact.
//!
//! Fetches every configured GIS endpoint concurrently, normalizes the
//! geometry, and composes a single Leaflet document. A failed endpoint
//! is logged and its layer omitted; the map renders with whichever
//! layers succeeded.

mod pipeline;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use transit_map_render::{MapOptions, html};
use transit_map_source::endpoint_def::EndpointDefinition;
use transit_map_source::{FetchOptions, registry};

#[derive(Parser)]
#[command(name = "transit_map_cli", about = "Transit map generation tool")]
struct Cli {
    /// Output HTML file path.
    #[arg(long, default_value = "transit_map.html")]
    output: PathBuf,

    /// Per-request HTTP timeout in seconds.
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Comma-separated endpoint IDs to include (e.g.,
    /// "rapid_transit_stops,ferry_routes"). All endpoints when omitted.
    #[arg(long)]
    endpoints: Option<String>,

    /// Maximum number of features to fetch per endpoint (useful for testing).
    #[arg(long)]
    limit: Option<u64>,

    /// Initial map center latitude.
    #[arg(long, default_value_t = 42.3601)]
    center_lat: f64,

    /// Initial map center longitude.
    #[arg(long, default_value_t = -71.0589)]
    center_lng: f64,

    /// Initial map zoom level.
    #[arg(long, default_value_t = 12)]
    zoom: u8,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let endpoints = select_endpoints(cli.endpoints.as_deref())?;
    log::info!("Running {} endpoint pipelines", endpoints.len());

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(cli.timeout_secs))
        .build()?;
    let options = FetchOptions {
        timeout: Duration::from_secs(cli.timeout_secs),
        limit: cli.limit,
    };

    let results = pipeline::run_all(&client, &endpoints, &options).await;

    let mut layers = Vec::with_capacity(results.len());
    let mut failures = 0usize;
    for (endpoint, result) in endpoints.iter().zip(results) {
        match result {
            Ok(layer) => layers.push(layer),
            Err(e) => {
                failures += 1;
                log::error!("{}: pipeline failed: {e}", endpoint.id);
            }
        }
    }

    if layers.is_empty() {
        return Err("all endpoint pipelines failed, nothing to render".into());
    }
    if failures > 0 {
        log::warn!("Rendering with {} of {} layers", layers.len(), endpoints.len());
    }

    let map_options = MapOptions {
        title: "Transit Map".to_string(),
        center_lat: cli.center_lat,
        center_lng: cli.center_lng,
        zoom: cli.zoom,
    };
    let document = html::compose(&map_options, &layers)?;

    std::fs::write(&cli.output, document)?;
    log::info!(
        "Map written to {} ({} layers)",
        cli.output.display(),
        layers.len()
    );

    Ok(())
}

/// Resolves the `--endpoints` filter against the registry.
fn select_endpoints(
    filter: Option<&str>,
) -> Result<Vec<EndpointDefinition>, Box<dyn std::error::Error>> {
    let all = registry::all_endpoints();

    let Some(filter) = filter else {
        return Ok(all);
    };

    let requested: Vec<&str> = filter
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .collect();

    let mut selected = Vec::with_capacity(requested.len());
    for id in requested {
        let Some(endpoint) = all.iter().find(|e| e.id == id) else {
            let known: Vec<&str> = all.iter().map(|e| e.id.as_str()).collect();
            return Err(format!(
                "Unknown endpoint ID: {id} (known: {})",
                known.join(", ")
            )
            .into());
        };
        selected.push(endpoint.clone());
    }

    if selected.is_empty() {
        return Err("No endpoints matched the provided --endpoints filter".into());
    }

    Ok(selected)
}
