//! Administrator account routes.

use super::AppState;
use crate::{
    core::admin::{self, AdminChanges, AdminInput},
    entities::admin as admin_entity,
    errors::Result,
};
use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, put},
};
use serde::Serialize;

/// Admin router
pub fn router() -> Router<AppState> {
    Router::new().nest(
        "/api/admins",
        Router::new()
            .route("/", get(list).post(create))
            .route("/{id}", put(update).delete(remove)),
    )
}

/// Response of an account deletion
#[derive(Debug, Serialize)]
pub struct Deleted {
    message: &'static str,
}

async fn list(State(state): State<AppState>) -> Result<Json<Vec<admin_entity::Model>>> {
    Ok(Json(admin::get_all_admins(&state.database).await?))
}

async fn create(
    State(state): State<AppState>,
    Json(input): Json<AdminInput>,
) -> Result<Json<admin_entity::Model>> {
    Ok(Json(admin::create_admin(&state.database, input).await?))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(changes): Json<AdminChanges>,
) -> Result<Json<admin_entity::Model>> {
    Ok(Json(admin::update_admin(&state.database, id, changes).await?))
}

async fn remove(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Deleted>> {
    admin::delete_admin(&state.database, id).await?;
    Ok(Json(Deleted {
        message: "관리자가 삭제되었습니다.",
    }))
}
