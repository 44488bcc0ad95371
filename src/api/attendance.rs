//! Check-in routes.

use super::AppState;
use crate::{
    core::attendance::{self, AttendanceFilter, AttendanceRecord, CheckIn, DailyStats},
    entities::attendance as attendance_entity,
    errors::Result,
};
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::get,
};

/// Attendance router
pub fn router() -> Router<AppState> {
    Router::new().nest(
        "/api/attendance",
        Router::new()
            .route("/", get(list).post(check_in))
            .route("/stats", get(stats)),
    )
}

async fn list(
    State(state): State<AppState>,
    Query(filter): Query<AttendanceFilter>,
) -> Result<Json<Vec<AttendanceRecord>>> {
    Ok(Json(attendance::list_attendance(&state.database, &filter).await?))
}

async fn check_in(
    State(state): State<AppState>,
    Json(request): Json<CheckIn>,
) -> Result<(StatusCode, Json<attendance_entity::Model>)> {
    let record = attendance::check_in(&state.database, request).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn stats(
    State(state): State<AppState>,
    Query(filter): Query<AttendanceFilter>,
) -> Result<Json<Vec<DailyStats>>> {
    Ok(Json(attendance::daily_stats(&state.database, &filter).await?))
}
