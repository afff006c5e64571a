//! REST API endpoints.
//!
//! Axum-based read-only HTTP API over the loaded dataset: player lookup,
//! filtered leaderboards, rank queries and event results.

pub mod routes;
pub mod state;

use std::collections::BTreeSet;

use axum::{
    http::{header::InvalidHeaderValue, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::calculate::{parse_date, FilterConfig, FilterError};
use crate::models::{RankableStat, StatError, StatId};

use self::state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<FilterError> for ApiError {
    fn from(err: FilterError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<StatError> for ApiError {
    fn from(err: StatError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Filter query parameters shared by the ranking endpoints.
///
/// `formats` is comma-separated; `from` and `to` are `YYYY-MM-DD`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterParams {
    pub min_events: Option<u32>,
    pub max_events: Option<u32>,
    pub min_day2s: Option<u32>,
    pub min_top8s: Option<u32>,
    pub has_top8: Option<bool>,
    pub qualified_only: Option<bool>,
    pub formats: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

impl FilterParams {
    pub fn to_filter_config(&self) -> Result<FilterConfig, ApiError> {
        let formats: BTreeSet<String> = self
            .formats
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_string)
            .collect();

        let config = FilterConfig {
            min_events: self.min_events,
            max_events: self.max_events,
            min_day2s: self.min_day2s,
            min_top8s: self.min_top8s,
            has_top8: self.has_top8.unwrap_or(false),
            qualified_only: self.qualified_only.unwrap_or(false),
            formats,
            start_date: self.from.as_deref().map(parse_date).transpose()?,
            end_date: self.to.as_deref().map(parse_date).transpose()?,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Parse a stat identifier from a path segment.
pub fn parse_stat(raw: &str) -> Result<StatId, ApiError> {
    Ok(raw.parse::<StatId>()?)
}

/// Parse a stat identifier and check it against the rankable allow-list.
pub fn parse_rankable(raw: &str) -> Result<RankableStat, ApiError> {
    Ok(RankableStat::try_from(parse_stat(raw)?)?)
}

/// Build the API router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(routes::catalog::health))
        .route("/api/stats", get(routes::catalog::list_stats))
        .route("/api/formats", get(routes::catalog::list_formats))
        .route("/api/events", get(routes::events::list_events))
        .route("/api/events/:code", get(routes::events::get_event))
        .route("/api/players", get(routes::players::search_players))
        .route("/api/players/:id", get(routes::players::get_player))
        .route(
            "/api/players/:id/rank/:stat",
            get(routes::rankings::player_rank),
        )
        .route("/api/leaderboard/:stat", get(routes::rankings::leaderboard))
        .route("/api/qualified", get(routes::rankings::qualified_grid))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS layer for a configured origin. `*` allows any origin.
pub fn cors_layer(origin: &str) -> Result<CorsLayer, InvalidHeaderValue> {
    let allow_origin = if origin.trim() == "*" {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::exact(HeaderValue::from_str(origin.trim())?)
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET])
        .allow_headers(Any))
}
