use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use fomos_core::{group_products, ComparisonEntry, RawProduct};
use fomos_scraper::{aggregate, aggregate_with_report};

use crate::middleware::RequestId;

use super::{map_join_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct SearchQuery {
    pub query: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SearchData {
    groups: Vec<ComparisonEntry>,
    failed_sources: Vec<String>,
}

fn require_query(request_id: &str, query: &SearchQuery) -> Result<String, ApiError> {
    query
        .query
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| ApiError::new(request_id, "bad_request", "query parameter is required"))
}

/// `GET /scrape?query=`: raw listings from every source, as a bare JSON array.
pub(super) async fn scrape(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Vec<RawProduct>>, ApiError> {
    let query = require_query(&req_id.0, &params)?;

    let products = aggregate(&query, &state.extractors, &state.aggregate_options).await;
    Ok(Json(products))
}

/// `GET /api/v1/search?query=`: aggregate, enrich, and group in one call.
pub(super) async fn search(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<ApiResponse<SearchData>>, ApiError> {
    let query = require_query(&req_id.0, &params)?;

    let report = aggregate_with_report(&query, &state.extractors, &state.aggregate_options).await;
    let enriched = state
        .enrich(report.products)
        .await
        .map_err(|e| map_join_error(req_id.0.clone(), &e))?;

    let groups: Vec<ComparisonEntry> = group_products(enriched)
        .into_iter()
        .map(ComparisonEntry::from)
        .collect();
    tracing::info!(query = %query, groups = groups.len(), "search complete");

    Ok(Json(ApiResponse {
        data: SearchData {
            groups,
            failed_sources: report.failed_sources,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}
