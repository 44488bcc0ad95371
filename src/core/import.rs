//! Bulk member import.
//!
//! Rows from an uploaded sheet are validated and inserted one at a time inside a
//! single database transaction. A bad row is recorded and skipped; it never
//! aborts the batch. Only an unreadable sheet or a lost database session does.
//!
//! Two details matter for consistency:
//!
//! * Products named by a row but missing from the store are created on the fly
//!   and committed immediately, so later rows reuse them. Committing also
//!   commits the members inserted so far, and an auto-created product survives
//!   even if the batch later fails as a whole.
//! * Member ids are allocated from one max-id query made when the batch starts
//!   and a counter that advances on every successful insert. Concurrent imports
//!   are not serialized against each other.

use crate::{
    config::ImportConfig,
    core::{
        member::{self, NewMember},
        product::{self, ProductInput},
        spreadsheet::{Cell, RawRow, column},
        term::compute_end_date,
    },
    entities::{DurationUnit, member as member_entity, product as product_entity},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{DatabaseConnection, DatabaseTransaction, DbErr, TransactionTrait};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Term given to products created by an import, effectively open-ended.
const AUTO_PRODUCT_DURATION: i32 = 99;
const AUTO_PRODUCT_DESCRIPTION: &str = "Excel 업로드로 자동 생성된 상품";

/// Why a single row was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowFailureReason {
    /// Name, gender or phone is blank
    #[error("필수 정보 누락")]
    MissingRequiredFields,
    /// A date cell is not `YYYY-MM-DD`
    #[error("날짜 형식이 잘못되었습니다 ({0})")]
    InvalidDate(String),
    /// The remaining session count is not an integer
    #[error("잔여 횟수 형식이 잘못되었습니다 ({0})")]
    InvalidRemaining(String),
    /// The membership end date cannot be computed
    #[error("회원권 종료일을 계산할 수 없습니다 ({0})")]
    InvalidTerm(String),
    /// The store rejected a read or write for this row
    #[error("{0}")]
    Store(String),
}

/// A rejected row with its sheet row number
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("행 {row}: {reason}")]
pub struct RowFailure {
    /// 1-based sheet row number
    pub row: usize,
    /// Cause of the rejection
    pub reason: RowFailureReason,
}

/// Result of one import call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    /// Number of members created
    pub success: usize,
    /// Number of rows rejected
    pub failed: usize,
    /// Messages of the first rejected rows, in sheet order
    pub errors: Vec<String>,
}

impl ImportSummary {
    fn record_success(&mut self) {
        self.success += 1;
    }

    fn record_failure(&mut self, failure: &RowFailure, limit: usize) {
        warn!("Import row rejected: {failure}");
        self.failed += 1;
        if self.errors.len() < limit {
            self.errors.push(failure.to_string());
        }
    }
}

type RowResult<T> = std::result::Result<T, RowFailureReason>;

/// Validated contents of one row
#[derive(Debug, Clone, PartialEq, Eq)]
struct RowDraft {
    name: String,
    gender: String,
    phone: String,
    product_name: String,
    reg_date: NaiveDate,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    remaining: i32,
}

impl RowDraft {
    fn parse(row: &RawRow, options: &ImportConfig, today: NaiveDate) -> RowResult<Self> {
        let name = row.cell(column::NAME).to_text();
        let gender = row.cell(column::GENDER).to_text();
        let phone = row.cell(column::PHONE).to_text();
        let product_name = row
            .cell(column::PRODUCT)
            .to_text()
            .unwrap_or_else(|| options.fallback_product_name.clone());

        let (Some(name), Some(gender), Some(phone)) = (name, gender, phone) else {
            return Err(RowFailureReason::MissingRequiredFields);
        };

        let reg_date = parse_date(row.cell(column::REG_DATE))?.unwrap_or(today);
        let start_date = parse_date(row.cell(column::START_DATE))?.unwrap_or(today);
        let end_date = parse_date(row.cell(column::END_DATE))?;
        let remaining = parse_remaining(row.cell(column::REMAINING), options.default_remaining)?;

        Ok(Self {
            name,
            gender,
            phone,
            product_name,
            reg_date,
            start_date,
            end_date,
            remaining,
        })
    }
}

fn parse_date(cell: &Cell) -> RowResult<Option<NaiveDate>> {
    match cell {
        Cell::Date(date) => Ok(Some(*date)),
        Cell::Number(n) => Err(RowFailureReason::InvalidDate(format!("'{n}'"))),
        Cell::Empty | Cell::Text(_) => match cell.to_text() {
            None => Ok(None),
            Some(text) => NaiveDate::parse_from_str(&text, "%Y-%m-%d")
                .map(Some)
                .map_err(|e| RowFailureReason::InvalidDate(format!("'{text}': {e}"))),
        },
    }
}

fn parse_remaining(cell: &Cell, default: i32) -> RowResult<i32> {
    match cell.to_text() {
        None => Ok(default),
        Some(text) => text
            .parse::<i32>()
            .map_err(|e| RowFailureReason::InvalidRemaining(format!("'{text}': {e}"))),
    }
}

fn is_session_loss(err: &DbErr) -> bool {
    matches!(err, DbErr::ConnectionAcquire(_) | DbErr::Conn(_))
}

/// Turns a store error into a row failure, unless the session itself is gone.
fn row_store_failure<T>(err: Error) -> Result<RowResult<T>> {
    match err {
        Error::Database(db_err) if is_session_loss(&db_err) => Err(Error::Database(db_err)),
        Error::Database(db_err) => Ok(Err(RowFailureReason::Store(db_err.to_string()))),
        other => Ok(Err(RowFailureReason::Store(other.to_string()))),
    }
}

enum ProductResolution {
    Existing(product_entity::Model),
    Created(product_entity::Model),
}

async fn resolve_product(
    txn: &DatabaseTransaction,
    name: &str,
) -> Result<RowResult<ProductResolution>> {
    match product::get_active_product_by_name(txn, name).await {
        Ok(Some(existing)) => return Ok(Ok(ProductResolution::Existing(existing))),
        Ok(None) => {}
        Err(err) => return row_store_failure(err),
    }

    info!("Auto-creating product '{name}' for import");
    let input = ProductInput {
        name: name.to_string(),
        duration_count: Some(AUTO_PRODUCT_DURATION),
        duration_unit: Some(DurationUnit::Months),
        price: 0,
        description: Some(AUTO_PRODUCT_DESCRIPTION.to_string()),
        active: Some(true),
    };
    match product::create_product(txn, input).await {
        Ok(created) => Ok(Ok(ProductResolution::Created(created))),
        Err(err) => row_store_failure(err),
    }
}

/// Inserts one member inside a savepoint so a rejected insert leaves the
/// surrounding transaction usable.
async fn insert_row(
    txn: &DatabaseTransaction,
    draft: RowDraft,
    product: &product_entity::Model,
    member_id: String,
) -> Result<RowResult<member_entity::Model>> {
    let end_date = match compute_end_date(
        draft.start_date,
        draft.end_date,
        product.duration_count,
        product.duration_unit,
    ) {
        Ok(end_date) => end_date,
        Err(err) => return Ok(Err(RowFailureReason::InvalidTerm(err.to_string()))),
    };

    let new_member = NewMember {
        id: member_id,
        name: draft.name,
        gender: Some(draft.gender),
        phone: Some(draft.phone),
        product_id: product.id,
        reg_date: Some(draft.reg_date),
        start_date: Some(draft.start_date),
        end_date,
        remaining: draft.remaining,
    };

    let savepoint = txn.begin().await?;
    match member::insert_member(&savepoint, new_member).await {
        Ok(created) => {
            savepoint.commit().await?;
            Ok(Ok(created))
        }
        Err(err) if is_session_loss(&err) => Err(err.into()),
        Err(err) => {
            savepoint.rollback().await?;
            Ok(Err(RowFailureReason::Store(err.to_string())))
        }
    }
}

/// Imports members from sheet rows.
///
/// Failures carry each row's own sheet row number. Blank rows are skipped
/// without being counted. Every other row either creates a member or is reported as a
/// failure; only the first `options.error_report_limit` failure messages are
/// returned, though all failures are counted.
///
/// `today` fills in missing registration and start dates.
///
/// # Errors
/// Returns an error only when the database session fails (begin, commit, or
/// connection loss). Members inserted since the last product auto-creation
/// are then rolled back; auto-created products are kept.
pub async fn import_members<I>(
    db: &DatabaseConnection,
    rows: I,
    options: &ImportConfig,
    today: NaiveDate,
) -> Result<ImportSummary>
where
    I: IntoIterator<Item = RawRow>,
{
    let mut txn = db.begin().await?;
    let mut next_id = member::find_max_numeric_id(&txn).await? + 1;
    let mut summary = ImportSummary::default();

    for row in rows {
        let row_number = row.number();
        if row.is_blank() {
            debug!("Skipping blank import row {row_number}");
            continue;
        }

        let draft = match RowDraft::parse(&row, options, today) {
            Ok(draft) => draft,
            Err(reason) => {
                let failure = RowFailure {
                    row: row_number,
                    reason,
                };
                summary.record_failure(&failure, options.error_report_limit);
                continue;
            }
        };

        let product = match resolve_product(&txn, &draft.product_name).await? {
            Ok(ProductResolution::Existing(existing)) => existing,
            Ok(ProductResolution::Created(created)) => {
                txn.commit().await?;
                txn = db.begin().await?;
                created
            }
            Err(reason) => {
                let failure = RowFailure {
                    row: row_number,
                    reason,
                };
                summary.record_failure(&failure, options.error_report_limit);
                continue;
            }
        };

        match insert_row(&txn, draft, &product, next_id.to_string()).await? {
            Ok(created) => {
                debug!("Row {row_number}: created member {} ({})", created.id, created.name);
                next_id += 1;
                summary.record_success();
            }
            Err(reason) => {
                let failure = RowFailure {
                    row: row_number,
                    reason,
                };
                summary.record_failure(&failure, options.error_report_limit);
            }
        }
    }

    txn.commit().await?;

    info!(
        "Member import finished: {} created, {} rejected",
        summary.success, summary.failed
    );
    Ok(summary)
}
