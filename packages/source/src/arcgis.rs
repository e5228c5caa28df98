//! `ArcGIS` REST API fetcher.
//!
//! Queries a `FeatureServer` / `MapServer` layer with `f=json`, requesting
//! the configured output fields in a fixed WGS84 spatial reference
//! (`outSR=4326`). Handles pagination via `resultOffset` for services with
//! transfer limits.

use crate::endpoint_def::EndpointDefinition;
use crate::{FetchOptions, SourceError, retry};

/// Spatial reference requested for every layer (WGS84 lon/lat).
const OUT_SR: u32 = 4326;

/// Fetches all raw features from one endpoint.
///
/// Paginates automatically while the server sets `exceededTransferLimit` —
/// the canonical pagination signal; `count < page_size` is unreliable
/// because servers silently cap results at their own `maxRecordCount`.
///
/// Returns the raw feature objects (`{ "attributes": ..., "geometry": ... }`)
/// in server order.
///
/// # Errors
///
/// Returns [`SourceError`] if a request fails after retries, the response
/// is not the expected shape, or the API reports an in-body error.
#[allow(clippy::future_not_send)]
pub async fn fetch_features(
    client: &reqwest::Client,
    endpoint: &EndpointDefinition,
    options: &FetchOptions,
) -> Result<Vec<serde_json::Value>, SourceError> {
    let where_clause = endpoint.where_clause.as_deref().unwrap_or("1=1");
    let out_fields = endpoint.out_fields.join(",");
    let fetch_limit = options.limit.unwrap_or(u64::MAX);

    let mut all_features: Vec<serde_json::Value> = Vec::new();
    let mut offset: u64 = 0;

    loop {
        let total_fetched = all_features.len() as u64;
        let remaining = fetch_limit.saturating_sub(total_fetched);
        if remaining == 0 {
            break;
        }
        let page_limit = remaining.min(endpoint.page_size);

        log::info!(
            "{}: offset={offset}, limit={page_limit}",
            endpoint.id
        );

        let url = endpoint.query_url.clone();
        let query: Vec<(&str, String)> = vec![
            ("where", where_clause.to_string()),
            ("outFields", out_fields.clone()),
            ("outSR", OUT_SR.to_string()),
            ("returnGeometry", "true".to_string()),
            ("f", "json".to_string()),
            ("resultRecordCount", page_limit.to_string()),
            ("resultOffset", offset.to_string()),
        ];

        let body =
            retry::send_json(|| client.get(&url).query(&query).timeout(options.timeout)).await?;

        // ArcGIS reports errors in-body with a 200 status.
        if let Some(error) = body.get("error") {
            return Err(SourceError::Api {
                message: format!(
                    "{}: {}",
                    endpoint.id,
                    error
                        .get("message")
                        .and_then(serde_json::Value::as_str)
                        .unwrap_or("unknown error")
                ),
            });
        }

        let features = body
            .get("features")
            .and_then(serde_json::Value::as_array)
            .ok_or_else(|| SourceError::Api {
                message: format!("{}: no features array in response", endpoint.id),
            })?;

        if features.is_empty() {
            break;
        }

        offset += features.len() as u64;
        all_features.extend(features.iter().cloned());

        let exceeded = body
            .get("exceededTransferLimit")
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(false);
        if !exceeded {
            break;
        }
    }

    log::info!(
        "{}: fetch complete — {} features",
        endpoint.id,
        all_features.len()
    );

    Ok(all_features)
}
