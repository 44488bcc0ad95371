//! Coach routes.

use super::AppState;
use crate::{
    core::coach::{self, CoachInput},
    entities::coach as coach_entity,
    errors::Result,
};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};

/// Coach router
pub fn router() -> Router<AppState> {
    Router::new().nest(
        "/api/coaches",
        Router::new()
            .route("/", get(list).post(create))
            .route("/{id}", get(get_one)),
    )
}

async fn list(State(state): State<AppState>) -> Result<Json<Vec<coach_entity::Model>>> {
    Ok(Json(coach::get_all_coaches(&state.database).await?))
}

async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<coach_entity::Model>> {
    Ok(Json(coach::get_coach(&state.database, &id).await?))
}

async fn create(
    State(state): State<AppState>,
    Json(input): Json<CoachInput>,
) -> Result<(StatusCode, Json<coach_entity::Model>)> {
    let created = coach::create_coach(&state.database, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}
