//! Product routes.

use super::AppState;
use crate::{
    core::product::{self, ProductInput},
    entities::product as product_entity,
    errors::Result,
};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
};
use serde::Serialize;

/// Product router
pub fn router() -> Router<AppState> {
    Router::new().nest("/api/products", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", put(update).delete(remove))
}

/// Response of a product removal
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovalResponse {
    message: String,
    deactivated: bool,
    member_count: u64,
}

async fn list(State(state): State<AppState>) -> Result<Json<Vec<product_entity::Model>>> {
    Ok(Json(product::get_all_products(&state.database).await?))
}

async fn create(
    State(state): State<AppState>,
    Json(input): Json<ProductInput>,
) -> Result<(StatusCode, Json<product_entity::Model>)> {
    let created = product::create_product(&state.database, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<ProductInput>,
) -> Result<Json<product_entity::Model>> {
    Ok(Json(product::update_product(&state.database, id, input).await?))
}

async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<RemovalResponse>> {
    let removal = product::delete_product(&state.database, id).await?;
    let message = if removal.deactivated {
        format!(
            "해당 상품을 사용 중인 회원이 {}명 있어 비활성화 처리되었습니다.",
            removal.member_count
        )
    } else {
        "상품이 삭제되었습니다.".to_string()
    };
    Ok(Json(RemovalResponse {
        message,
        deactivated: removal.deactivated,
        member_count: removal.member_count,
    }))
}
