//! HTTP route handlers.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::schema::{AnalysisResult, ReviewInput};
use crate::server::AppState;
use crate::store::DEFAULT_LIST_LIMIT;
use crate::types::InsightsError;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub limit: Option<usize>,
}

/// Error body: `{"detail": "..."}`
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    /// Map a failure of `POST /analyze`. Everything but bad input is a 500.
    fn analysis(err: InsightsError) -> Self {
        match err {
            InsightsError::InvalidInput(_) => err.into(),
            other => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                detail: format!("Analysis failed: {}", other),
            },
        }
    }
}

impl From<InsightsError> for ApiError {
    fn from(err: InsightsError) -> Self {
        let status = match &err {
            InsightsError::NotFound { .. } => StatusCode::NOT_FOUND,
            InsightsError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let detail = match &err {
            InsightsError::NotFound { .. } => "Review analysis not found".to_string(),
            other => other.to_string(),
        };
        Self { status, detail }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            detail: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            detail: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(serde_json::json!({ "detail": self.detail }))).into_response()
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Customer Review Insights API is running".to_string(),
    })
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Analyse a review, persist the result and return it
pub async fn analyze_review(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ReviewInput>, JsonRejection>,
) -> Result<Json<AnalysisResult>, ApiError> {
    let Json(input) = payload?;
    input.validate().map_err(ApiError::analysis)?;

    let result = state.analyzer.analyze(&input).await.map_err(ApiError::analysis)?;
    state.store.upsert(&result).await.map_err(|e| {
        tracing::error!(review_id = %input.review_id, error = %e, "Failed to save analysis");
        ApiError::analysis(e)
    })?;

    Ok(Json(result))
}

pub async fn get_review(
    State(state): State<Arc<AppState>>,
    Path(review_id): Path<String>,
) -> Result<Json<AnalysisResult>, ApiError> {
    match state.store.get(&review_id).await? {
        Some(result) => Ok(Json(result)),
        None => Err(InsightsError::NotFound { review_id }.into()),
    }
}

pub async fn list_reviews(
    State(state): State<Arc<AppState>>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<AnalysisResult>>, ApiError> {
    let Query(params) = params?;
    let limit = params.limit.unwrap_or(DEFAULT_LIST_LIMIT);
    Ok(Json(state.store.list(limit).await?))
}
