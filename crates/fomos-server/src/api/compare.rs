use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde::Serialize;
use serde_json::Value;

use fomos_core::{group_products, ComparisonEntry, EnrichedProduct, RawProduct};

use crate::middleware::RequestId;

use super::{body::parse_batch, map_join_error, ApiError, AppState};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CompareResponse {
    enriched_products: Vec<EnrichedProduct>,
}

#[derive(Debug, Serialize)]
pub(super) struct GroupResponse {
    groups: Vec<ComparisonEntry>,
}

/// `POST /compare`: enrich a batch of raw listings.
///
/// Responds with a bare `{ "enrichedProducts": [...] }` body, no envelope.
pub(super) async fn compare(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<CompareResponse>, ApiError> {
    let products: Vec<RawProduct> = parse_batch(&req_id.0, body)?;
    tracing::debug!(count = products.len(), "compare request");

    let enriched_products = state
        .enrich(products)
        .await
        .map_err(|e| map_join_error(req_id.0.clone(), &e))?;

    Ok(Json(CompareResponse { enriched_products }))
}

/// `POST /api/v1/group`: group already-enriched listings.
pub(super) async fn group(
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<GroupResponse>, ApiError> {
    let products: Vec<EnrichedProduct> = parse_batch(&req_id.0, body)?;

    let groups = group_products(products)
        .into_iter()
        .map(ComparisonEntry::from)
        .collect();

    Ok(Json(GroupResponse { groups }))
}
