//! Member routes under `/api/users`, including the workbook export and the
//! import template download.

use super::AppState;
use crate::{
    core::{
        member::{self, MemberDetails, MemberFilter, MemberInput},
        spreadsheet,
    },
    entities::member as member_entity,
    errors::{Error, Result},
};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;

/// Member router
pub fn router() -> Router<AppState> {
    Router::new().nest("/api/users", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/export", get(export))
        .route("/template", get(template))
        .route("/{id}", get(get_one).put(update).delete(remove))
}

/// Response of a member deletion
#[derive(Debug, Serialize)]
pub struct RemovedMember {
    message: &'static str,
    user: member_entity::Model,
}

fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

fn workbook_download(filename: &str, body: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, spreadsheet::XLSX_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
        .into_response()
}

async fn list(
    State(state): State<AppState>,
    Query(filter): Query<MemberFilter>,
) -> Result<Json<Vec<MemberDetails>>> {
    Ok(Json(member::list_members(&state.database, &filter).await?))
}

async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MemberDetails>> {
    member::get_member(&state.database, &id)
        .await?
        .map(Json)
        .ok_or(Error::MemberNotFound { id })
}

async fn create(
    State(state): State<AppState>,
    Json(input): Json<MemberInput>,
) -> Result<(StatusCode, Json<member_entity::Model>)> {
    let created = member::create_member(&state.database, input, today()).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<MemberInput>,
) -> Result<Json<member_entity::Model>> {
    Ok(Json(member::update_member(&state.database, &id, input).await?))
}

async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RemovedMember>> {
    let user = member::delete_member(&state.database, &id).await?;
    Ok(Json(RemovedMember {
        message: "회원이 삭제되었습니다.",
        user,
    }))
}

async fn export(
    State(state): State<AppState>,
    Query(filter): Query<MemberFilter>,
) -> Result<Response> {
    let members = member::list_members(&state.database, &filter).await?;
    let body = spreadsheet::write_member_export(&members)?;
    Ok(workbook_download(&format!("members_{}.xlsx", today()), body))
}

async fn template() -> Result<Response> {
    let body = spreadsheet::write_import_template()?;
    Ok(workbook_download("member_upload_template.xlsx", body))
}
