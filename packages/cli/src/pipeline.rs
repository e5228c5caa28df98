//! Per-endpoint fetch → parse → normalize pipelines.
//!
//! The pipelines are mutually independent — normalization is a pure
//! function of its inputs and no state is shared — so all endpoints run
//! concurrently. Map composition is the only join point and happens in
//! `main` once every pipeline has settled.

use transit_map_render::ModeLayer;
use transit_map_source::endpoint_def::EndpointDefinition;
use transit_map_source::{FetchOptions, SourceError, arcgis, normalize, parse};

/// Runs one endpoint's pipeline to a composable layer.
///
/// # Errors
///
/// Returns [`SourceError`] if the fetch fails or the raw collection is
/// shape-mismatched.
#[allow(clippy::future_not_send)]
pub async fn run_endpoint(
    client: &reqwest::Client,
    endpoint: &EndpointDefinition,
    options: &FetchOptions,
) -> Result<ModeLayer, SourceError> {
    let raw_features = arcgis::fetch_features(client, endpoint, options).await?;
    let raw = parse::parse_features(&raw_features, endpoint.geometry);
    let collection = normalize::normalize(&raw)?;

    log::info!(
        "{}: normalized {} of {} features",
        endpoint.id,
        collection.len(),
        raw_features.len()
    );

    Ok(ModeLayer {
        endpoint_id: endpoint.id.clone(),
        name: endpoint.name.clone(),
        mode: endpoint.mode,
        kind: endpoint.layer,
        collection,
    })
}

/// Runs all endpoint pipelines concurrently.
///
/// Returns one result per endpoint, in the same order as the input. A
/// failed pipeline never prevents its siblings from completing.
#[allow(clippy::future_not_send)]
pub async fn run_all(
    client: &reqwest::Client,
    endpoints: &[EndpointDefinition],
    options: &FetchOptions,
) -> Vec<Result<ModeLayer, SourceError>> {
    let futures = endpoints
        .iter()
        .map(|endpoint| run_endpoint(client, endpoint, options));

    futures::future::join_all(futures).await
}
