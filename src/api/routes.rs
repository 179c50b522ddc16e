use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::db::models::{MarketRecord, SeriesPoint};
use crate::db::queries;
use crate::error::AppError;

#[derive(Clone)]
pub struct ApiState {
    pub pool: sqlx::SqlitePool,
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(get_health))
        .route("/securities", get(get_securities))
        .route("/records", get(get_records))
        .route("/records/:security/series", get(get_series))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Query params / responses
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct RecordsQuery {
    pub security: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SeriesResponse {
    pub security: String,
    pub points: Vec<SeriesPoint>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn get_health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

async fn get_securities(State(state): State<ApiState>) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(queries::securities(&state.pool).await?))
}

async fn get_records(
    State(state): State<ApiState>,
    Query(params): Query<RecordsQuery>,
) -> Result<Json<Vec<MarketRecord>>, AppError> {
    // An empty selection shows everything.
    let security = params.security.as_deref().filter(|s| !s.is_empty());
    Ok(Json(queries::records(&state.pool, security).await?))
}

async fn get_series(
    State(state): State<ApiState>,
    Path(security): Path<String>,
) -> Result<Json<SeriesResponse>, AppError> {
    let points = queries::series(&state.pool, &security).await?;
    Ok(Json(SeriesResponse { security, points }))
}
