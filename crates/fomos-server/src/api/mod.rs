mod body;
mod compare;
mod search;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use fomos_core::{AppConfig, EnrichedProduct, RawProduct};
use fomos_scraper::{enrich_all, AggregateOptions, EnrichOptions, Fingerprinter, SourceExtractor};

use crate::middleware::{request_id, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub extractors: Arc<Vec<Box<dyn SourceExtractor>>>,
    pub fingerprinter: Arc<dyn Fingerprinter>,
    pub aggregate_options: AggregateOptions,
    pub enrich_options: EnrichOptions,
}

impl AppState {
    /// Wires the pipeline stages together using the tuning knobs from `config`.
    pub fn new(
        config: &AppConfig,
        extractors: Vec<Box<dyn SourceExtractor>>,
        fingerprinter: Arc<dyn Fingerprinter>,
    ) -> Self {
        Self {
            extractors: Arc::new(extractors),
            fingerprinter,
            aggregate_options: AggregateOptions {
                max_concurrent_sources: config.scraper_max_concurrent_sources,
                source_timeout: std::time::Duration::from_secs(config.source_timeout_secs),
            },
            enrich_options: EnrichOptions {
                max_concurrent: config.image_max_concurrent,
                fingerprint_images: config.fingerprint_images,
            },
        }
    }

    /// Runs enrichment on a separate task. A panic inside it comes back as a
    /// [`tokio::task::JoinError`].
    async fn enrich(
        &self,
        products: Vec<RawProduct>,
    ) -> Result<Vec<EnrichedProduct>, tokio::task::JoinError> {
        let fingerprinter = Arc::clone(&self.fingerprinter);
        let options = self.enrich_options.clone();
        tokio::spawn(async move { enrich_all(fingerprinter.as_ref(), products, &options).await })
            .await
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    sources: usize,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn map_join_error(request_id: String, error: &tokio::task::JoinError) -> ApiError {
    tracing::error!(error = %error, "enrichment task failed");
    ApiError::new(request_id, "internal_error", "Internal server error")
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static("x-request-id")])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/scrape", get(search::scrape))
        .route("/api/v1/search", get(search::search))
        .route("/api/v1/compare", post(compare::compare))
        .route("/api/v1/group", post(compare::group))
        // Unversioned paths kept for the original companion UI.
        .route("/scrape", get(search::scrape))
        .route("/compare", post(compare::compare))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    Json(ApiResponse {
        data: HealthData {
            status: "ok",
            sources: state.extractors.len(),
        },
        meta: ResponseMeta::new(req_id.0),
    })
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
