use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, Redirect},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use super::state::AppState;
use super::views;
use crate::services::format::format_compact;
use crate::services::refresh::{DashboardState, RunPhase};
use crate::services::sort::sort_records;
use crate::types::models::{RuneRecord, SortKey, SortOrder};

fn ensure_ready(state: &DashboardState) -> Result<(), ApiError> {
    match state.phase {
        RunPhase::Ready => Ok(()),
        RunPhase::Failed => Err(ApiError::Upstream(
            state.error.clone().unwrap_or_else(|| "Failed to fetch data".to_string()),
        )),
        RunPhase::Idle | RunPhase::Running => Err(ApiError::Loading),
    }
}

pub async fn dashboard(State(app): State<AppState>) -> Html<String> {
    let state = app.state.read().await;
    let page = match state.phase {
        RunPhase::Idle | RunPhase::Running => views::render_loading(&app.progress.snapshot()),
        RunPhase::Failed => views::render_error(state.error.as_deref().unwrap_or("Failed to fetch data")),
        RunPhase::Ready => views::render_dashboard(&state, app.config.depth_cap),
    };
    Html(page)
}

/// Changes display order only; never triggers a fetch.
pub async fn select_sort(
    State(app): State<AppState>,
    Path(key): Path<String>,
) -> Result<Redirect, ApiError> {
    let key = SortKey::parse(&key).ok_or_else(|| ApiError::UnknownSortKey(key.clone()))?;
    let mut state = app.state.write().await;
    state.sort.select(key);
    tracing::info!("Sorting by {} {:?}", key.as_str(), state.sort.order);
    Ok(Redirect::to("/"))
}

pub async fn refresh(State(app): State<AppState>) -> Result<Redirect, ApiError> {
    app.start_run().await?;
    Ok(Redirect::to("/"))
}

pub async fn api_refresh(
    State(app): State<AppState>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    app.start_run().await?;
    Ok((
        StatusCode::ACCEPTED,
        Json(serde_json::json!({ "phase": RunPhase::Running })),
    ))
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub phase: RunPhase,
    pub progress: Vec<String>,
    pub error: Option<String>,
    pub reference_price: Option<f64>,
    pub runes_count: usize,
    pub updated_at: Option<DateTime<Utc>>,
}

pub async fn status(State(app): State<AppState>) -> Json<StatusResponse> {
    let state = app.state.read().await;
    Json(StatusResponse {
        phase: state.phase,
        progress: app.progress.snapshot(),
        error: state.error.clone(),
        reference_price: state.reference_price,
        runes_count: state.records.len(),
        updated_at: state.updated_at,
    })
}

#[derive(Debug, Deserialize)]
pub struct RunesParams {
    pub sort: Option<SortKey>,
    pub order: Option<SortOrder>,
}

/// Falls back to the dashboard's current sort for omitted parameters.
pub async fn runes(
    State(app): State<AppState>,
    Query(params): Query<RunesParams>,
) -> Result<Json<Vec<RuneRecord>>, ApiError> {
    let state = app.state.read().await;
    ensure_ready(&state)?;
    let key = params.sort.unwrap_or(state.sort.key);
    let order = params.order.unwrap_or(state.sort.order);
    Ok(Json(sort_records(&state.records, key, order)))
}

#[derive(Serialize)]
pub struct FormattedStats {
    pub total_market_cap: String,
    pub total_volume_24h: String,
    pub runes_count: String,
    pub market_cap_change_24h: String,
}

#[derive(Serialize)]
pub struct StatsResponse {
    pub total_market_cap: f64,
    pub total_volume_24h: f64,
    pub runes_count: usize,
    pub formatted: FormattedStats,
}

pub async fn stats(State(app): State<AppState>) -> Result<Json<StatsResponse>, ApiError> {
    let state = app.state.read().await;
    ensure_ready(&state)?;
    let stats = &state.stats;
    Ok(Json(StatsResponse {
        total_market_cap: stats.total_market_cap,
        total_volume_24h: stats.total_volume_24h,
        runes_count: stats.runes_count,
        formatted: FormattedStats {
            total_market_cap: format!("${}", format_compact(stats.total_market_cap)),
            total_volume_24h: format!("${}", format_compact(stats.total_volume_24h)),
            runes_count: stats.runes_count.to_string(),
            market_cap_change_24h: "0%".to_string(),
        },
    }))
}
