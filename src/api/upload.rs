//! Spreadsheet upload route.

use super::AppState;
use crate::{
    core::{
        import::{self, ImportSummary},
        spreadsheet::{self, SheetFormat},
    },
    errors::{Error, Result},
};
use axum::{
    Json, Router,
    extract::{Multipart, State, multipart::MultipartError},
    routing::post,
};
use tracing::info;

/// Upload router
pub fn router() -> Router<AppState> {
    Router::new().route("/api/upload/upload-users", post(upload_members))
}

fn invalid_upload(err: &MultipartError) -> Error {
    Error::Validation {
        message: format!("Invalid multipart upload: {err}"),
    }
}

/// POST /api/upload/upload-users
///
/// Reads the `file` field as a member sheet (`.xlsx`, `.xls` or `.csv`) and
/// imports every row.
async fn upload_members(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ImportSummary>> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| invalid_upload(&e))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let data = field.bytes().await.map_err(|e| invalid_upload(&e))?;
        upload = Some((file_name, data));
    }

    let (file_name, data) = upload.ok_or_else(|| Error::Validation {
        message: "No 'file' field found in multipart upload".to_string(),
    })?;

    let format = SheetFormat::from_file_name(&file_name).ok_or_else(|| Error::Validation {
        message: "Only .xlsx, .xls or .csv spreadsheets can be uploaded".to_string(),
    })?;

    let rows = spreadsheet::read_member_rows(format, &data)?;
    info!("Importing {} rows from '{file_name}'", rows.len());

    let summary = import::import_members(
        &state.database,
        rows,
        &state.config.import,
        chrono::Local::now().date_naive(),
    )
    .await?;
    Ok(Json(summary))
}
