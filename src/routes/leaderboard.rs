use axum::{
    Router,
    extract::{
        Json, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::HeaderMap,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;
use serde::Serialize;

use crate::charts::{MetricCharts, metric_charts};
use crate::error::{ApiError, json_rejection, period_error, query_rejection, upstream_error};
use crate::models::{MetricRecord, Period, PeriodQuery, RankGroup, RankedRecord};
use crate::ranking::{Metric, StandingRow, compute_ranks, group_by_rank, standings};
use crate::routes::AppState;
use crate::routes::session::{extract_admin_session, extract_session};

#[derive(Debug, Serialize)]
pub struct RankResponse {
    pub records: Vec<RankedRecord>,
    pub groups: Vec<RankGroup>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamLeaderboard {
    pub period: Period,
    pub records: Vec<RankedRecord>,
    pub standings: Vec<StandingRow>,
    pub groups: Vec<RankGroup>,
    pub charts: Vec<MetricCharts>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInsight {
    pub period: Period,
    pub my_stats: MetricRecord,
    pub my_ranks: Option<RankedRecord>,
    pub records: Vec<RankedRecord>,
    pub groups: Vec<RankGroup>,
}

pub fn leaderboard_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(team_leaderboard))
        .route("/me", get(personal_insight))
        .route("/rank", post(rank_records))
}

fn resolve_period(query: Result<Query<PeriodQuery>, QueryRejection>) -> Result<Period, ApiError> {
    let Query(query) = query.map_err(query_rejection)?;
    Period::from_query(&query, Utc::now().date_naive()).map_err(period_error)
}

// ============================
// POST /leaderboard/rank
// ============================
async fn rank_records(
    payload: Result<Json<Vec<MetricRecord>>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(records) = payload.map_err(json_rejection)?;
    let ranked = compute_ranks(&records);
    let groups = group_by_rank(&ranked);

    Ok(Json(RankResponse {
        records: ranked,
        groups,
    }))
}

// ============================
// GET /leaderboard
// ============================
async fn team_leaderboard(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<PeriodQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let _admin = extract_admin_session(&headers)?;
    let period = resolve_period(query)?;

    let records = state
        .stats
        .fetch_all_stats(period)
        .await
        .map_err(upstream_error)?;

    let ranked = compute_ranks(&records);
    let charts = Metric::ALL
        .iter()
        .map(|&metric| metric_charts(&records, metric))
        .collect();

    tracing::info!(period = period.code(), users = records.len(), "Served team leaderboard");

    Ok(Json(TeamLeaderboard {
        period,
        standings: standings(&ranked),
        groups: group_by_rank(&ranked),
        records: ranked,
        charts,
    }))
}

// ============================
// GET /leaderboard/me
// ============================
async fn personal_insight(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<PeriodQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let session = extract_session(&headers)?;
    let period = resolve_period(query)?;

    let payload = state
        .stats
        .fetch_insight(&session.username, period)
        .await
        .map_err(upstream_error)?;

    let ranked = compute_ranks(&payload.all_stats);
    let my_ranks = ranked
        .iter()
        .find(|r| r.record.subject_id == session.username)
        .cloned();

    Ok(Json(PersonalInsight {
        period,
        my_stats: payload
            .my_stats
            .into_record(&session.username, session.display_name.clone()),
        my_ranks,
        groups: group_by_rank(&ranked),
        records: ranked,
    }))
}
