//! Login route.

use super::AppState;
use crate::{
    core::admin::{self, Credentials},
    errors::Result,
};
use axum::{Json, Router, extract::State, routing::post};
use serde::Serialize;

/// Auth router
pub fn router() -> Router<AppState> {
    Router::new().route("/api/auth/login", post(login))
}

/// Profile returned on a successful login
#[derive(Debug, Serialize)]
pub struct Profile {
    id: i64,
    username: String,
    name: String,
    role: String,
}

async fn login(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<Profile>> {
    let account = admin::login(&state.database, &credentials).await?;
    Ok(Json(Profile {
        id: account.id,
        username: account.username,
        name: account.name,
        role: account.role,
    }))
}
