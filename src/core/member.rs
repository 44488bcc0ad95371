//! Member business logic - Handles enrollment records.
//!
//! Members are created through the API or by the bulk importer, both of which
//! allocate ids through [`find_max_numeric_id`] and persist rows through
//! [`insert_member`]. End dates are computed by [`crate::core::term`] at creation
//! time only; updates store exactly what the caller sends.

use crate::{
    core::term::compute_end_date,
    entities::{Member, Product, member, product},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{
    Condition, ConnectionTrait, QueryOrder, QuerySelect, Set, SqlErr, prelude::*, sea_query::Expr,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Fields accepted when creating or replacing a member
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberInput {
    /// Explicit id; allocated automatically on create when absent
    #[serde(default)]
    pub id: Option<String>,
    /// Member name
    pub name: String,
    /// Gender label
    #[serde(default)]
    pub gender: Option<String>,
    /// Phone number
    #[serde(default)]
    pub phone: Option<String>,
    /// Product the member enrolls under
    pub product_id: i64,
    /// Registration date
    #[serde(default)]
    pub reg_date: Option<NaiveDate>,
    /// Start of the term
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Explicit end of the term
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Remaining session count, zero when absent
    #[serde(default)]
    pub remaining: Option<i32>,
}

/// A fully resolved member row ready to be inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMember {
    /// Allocated id
    pub id: String,
    /// Member name
    pub name: String,
    /// Gender label
    pub gender: Option<String>,
    /// Phone number
    pub phone: Option<String>,
    /// Product reference
    pub product_id: i64,
    /// Registration date
    pub reg_date: Option<NaiveDate>,
    /// Start of the term
    pub start_date: Option<NaiveDate>,
    /// End of the term, `None` for no expiry
    pub end_date: Option<NaiveDate>,
    /// Remaining session count
    pub remaining: i32,
}

/// Member joined with the name and term length of its product
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberDetails {
    /// Member id
    pub id: String,
    /// Member name
    pub name: String,
    /// Gender label
    pub gender: Option<String>,
    /// Phone number
    pub phone: Option<String>,
    /// Product reference
    pub product_id: i64,
    /// Product name, if the product still exists
    pub product_name: Option<String>,
    /// Product term length
    pub reg_months: Option<i32>,
    /// Registration date
    pub reg_date: Option<NaiveDate>,
    /// Start of the term
    pub start_date: Option<NaiveDate>,
    /// End of the term
    pub end_date: Option<NaiveDate>,
    /// Remaining session count
    pub remaining: i32,
}

impl MemberDetails {
    fn from_parts(member: member::Model, product: Option<product::Model>) -> Self {
        Self {
            id: member.id,
            name: member.name,
            gender: member.gender,
            phone: member.phone,
            product_id: member.product_id,
            product_name: product.as_ref().map(|p| p.name.clone()),
            reg_months: product.and_then(|p| p.duration_count),
            reg_date: member.reg_date,
            start_date: member.start_date,
            end_date: member.end_date,
            remaining: member.remaining,
        }
    }
}

/// Optional filters for [`list_members`]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemberFilter {
    /// Only members of this product
    #[serde(rename = "type")]
    pub product_id: Option<String>,
    /// Case-insensitive substring of name or phone
    pub search: Option<String>,
}

fn is_numeric_id(id: &str) -> bool {
    !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit())
}

fn map_write_error(err: DbErr) -> Error {
    if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
        Error::Conflict {
            message: "A member with this name and phone number is already registered".to_string(),
        }
    } else {
        Error::Database(err)
    }
}

async fn find_product(db: &DatabaseConnection, product_id: i64) -> Result<product::Model> {
    Product::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::Validation {
            message: format!("Invalid membership product: {product_id}"),
        })
}

/// Returns the largest purely numeric member id, or 0 if there is none.
///
/// Ids containing anything other than ASCII digits are legacy values and are
/// ignored, as are ids longer than 18 digits, which may not fit an `i64`.
pub async fn find_max_numeric_id<C>(db: &C) -> Result<i64>
where
    C: ConnectionTrait,
{
    let max: Option<Option<i64>> = Member::find()
        .select_only()
        .column_as(Expr::cust("MAX(CAST(id AS INTEGER))"), "max_id")
        .filter(Expr::cust(
            "id <> '' AND length(id) <= 18 AND id NOT GLOB '*[^0-9]*'",
        ))
        .into_tuple()
        .one(db)
        .await?;

    Ok(max.flatten().unwrap_or(0))
}

/// Inserts a fully resolved member row.
///
/// Errors are returned as raw [`DbErr`] so callers can decide whether a
/// rejected insert is a conflict, a row failure, or fatal.
pub async fn insert_member<C>(
    db: &C,
    new_member: NewMember,
) -> std::result::Result<member::Model, DbErr>
where
    C: ConnectionTrait,
{
    let now = chrono::Utc::now().naive_utc();
    member::ActiveModel {
        id: Set(new_member.id),
        name: Set(new_member.name),
        gender: Set(new_member.gender),
        phone: Set(new_member.phone),
        product_id: Set(new_member.product_id),
        reg_date: Set(new_member.reg_date),
        start_date: Set(new_member.start_date),
        end_date: Set(new_member.end_date),
        remaining: Set(new_member.remaining),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
}

/// Lists members with their product, newest first.
///
/// A non-numeric product filter is ignored rather than rejected.
pub async fn list_members(
    db: &DatabaseConnection,
    filter: &MemberFilter,
) -> Result<Vec<MemberDetails>> {
    let mut query = Member::find();

    if let Some(product_id) = filter
        .product_id
        .as_deref()
        .filter(|raw| is_numeric_id(raw))
        .and_then(|raw| raw.parse::<i64>().ok())
    {
        query = query.filter(member::Column::ProductId.eq(product_id));
    }

    if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
        query = query.filter(
            Condition::any()
                .add(member::Column::Name.contains(search))
                .add(member::Column::Phone.contains(search)),
        );
    }

    let rows = query
        .order_by_desc(member::Column::CreatedAt)
        .find_also_related(Product)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(member, product)| MemberDetails::from_parts(member, product))
        .collect())
}

/// Retrieves one member with its product.
pub async fn get_member(db: &DatabaseConnection, member_id: &str) -> Result<Option<MemberDetails>> {
    let row = Member::find_by_id(member_id.to_string())
        .find_also_related(Product)
        .one(db)
        .await?;

    Ok(row.map(|(member, product)| MemberDetails::from_parts(member, product)))
}

/// Registers a new member.
///
/// The id is allocated when the input has none. The end date is the explicit
/// one if given, otherwise computed from the product's term starting at the
/// start date, the registration date, or `today`, in that order of preference.
///
/// # Errors
/// Returns an error if:
/// - The name is blank
/// - The product does not exist
/// - A member with the same name and phone already exists
/// - The database operation fails
pub async fn create_member(
    db: &DatabaseConnection,
    input: MemberInput,
    today: NaiveDate,
) -> Result<member::Model> {
    if input.name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Member name cannot be empty".to_string(),
        });
    }

    let product = find_product(db, input.product_id).await?;

    let id = match input.id.filter(|id| !id.trim().is_empty()) {
        Some(id) => id,
        None => (find_max_numeric_id(db).await? + 1).to_string(),
    };

    let term_start = input.start_date.or(input.reg_date).unwrap_or(today);
    let end_date = compute_end_date(
        term_start,
        input.end_date,
        product.duration_count,
        product.duration_unit,
    )?;

    debug!("Registering member {id} under product {}", product.id);

    insert_member(
        db,
        NewMember {
            id,
            name: input.name,
            gender: input.gender,
            phone: input.phone,
            product_id: product.id,
            reg_date: input.reg_date,
            start_date: input.start_date,
            end_date,
            remaining: input.remaining.unwrap_or(0),
        },
    )
    .await
    .map_err(map_write_error)
}

/// Replaces a member's fields with the given input.
///
/// # Errors
/// Returns an error if the member does not exist, the product does not exist,
/// the new name and phone collide with another member, or the database update
/// fails.
pub async fn update_member(
    db: &DatabaseConnection,
    member_id: &str,
    input: MemberInput,
) -> Result<member::Model> {
    let mut member: member::ActiveModel = Member::find_by_id(member_id.to_string())
        .one(db)
        .await?
        .ok_or_else(|| Error::MemberNotFound {
            id: member_id.to_string(),
        })?
        .into();
    find_product(db, input.product_id).await?;

    member.name = Set(input.name);
    member.gender = Set(input.gender);
    member.phone = Set(input.phone);
    member.product_id = Set(input.product_id);
    member.reg_date = Set(input.reg_date);
    member.start_date = Set(input.start_date);
    member.end_date = Set(input.end_date);
    member.remaining = Set(input.remaining.unwrap_or(0));
    member.updated_at = Set(chrono::Utc::now().naive_utc());

    member.update(db).await.map_err(map_write_error)
}

/// Deletes a member and returns the removed row.
///
/// # Errors
/// Returns an error if the member does not exist or the delete fails.
pub async fn delete_member(db: &DatabaseConnection, member_id: &str) -> Result<member::Model> {
    let member = Member::find_by_id(member_id.to_string())
        .one(db)
        .await?
        .ok_or_else(|| Error::MemberNotFound {
            id: member_id.to_string(),
        })?;

    Member::delete_by_id(member_id.to_string()).exec(db).await?;
    Ok(member)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::DurationUnit;
    use crate::test_utils::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn input(name: &str, phone: &str, product_id: i64) -> MemberInput {
        MemberInput {
            name: name.to_string(),
            gender: Some("여".to_string()),
            phone: Some(phone.to_string()),
            product_id,
            ..Default::default()
        }
    }

    #[test]
    fn test_is_numeric_id() {
        assert!(is_numeric_id("42"));
        assert!(is_numeric_id("007"));
        assert!(!is_numeric_id(""));
        assert!(!is_numeric_id("A-12"));
        assert!(!is_numeric_id("-3"));
        assert!(!is_numeric_id("12 "));
    }

    #[tokio::test]
    async fn test_find_max_numeric_id_ignores_legacy_ids() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_test_product(&db, "FPT", Some(1), DurationUnit::Months).await?;

        assert_eq!(find_max_numeric_id(&db).await?, 0);

        insert_test_member(&db, "9", "가", product.id).await?;
        insert_test_member(&db, "120", "나", product.id).await?;
        insert_test_member(&db, "VIP-999", "다", product.id).await?;
        insert_test_member(&db, "99999999999999999999999", "라", product.id).await?;
        insert_test_member(&db, "", "마", product.id).await?;

        assert_eq!(find_max_numeric_id(&db).await?, 120);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_member_allocates_id_and_end_date() -> Result<()> {
        let db = setup_test_db().await?;
        let product =
            create_test_product(&db, "FPT 12개월", Some(12), DurationUnit::Months).await?;
        insert_test_member(&db, "300", "기존", product.id).await?;

        let mut new_member = input("김영희", "010-2345-6789", product.id);
        new_member.start_date = Some(date(2026, 1, 15));
        let created = create_member(&db, new_member, date(2026, 3, 1)).await?;

        assert_eq!(created.id, "301");
        assert_eq!(created.end_date, Some(date(2027, 1, 15)));
        assert_eq!(created.remaining, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_member_term_falls_back_to_reg_date_then_today() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_test_product(&db, "30일권", Some(30), DurationUnit::Days).await?;

        let mut by_reg = input("A", "1", product.id);
        by_reg.reg_date = Some(date(2026, 1, 1));
        let created = create_member(&db, by_reg, date(2026, 5, 5)).await?;
        assert_eq!(created.end_date, Some(date(2026, 1, 31)));
        assert_eq!(created.start_date, None);

        let by_today = input("B", "2", product.id);
        let created = create_member(&db, by_today, date(2026, 5, 5)).await?;
        assert_eq!(created.end_date, Some(date(2026, 6, 4)));
        Ok(())
    }

    #[tokio::test]
    async fn test_create_member_session_product_has_no_end_date() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_test_product(&db, "PT 10회", Some(0), DurationUnit::Months).await?;

        let created = create_member(&db, input("A", "1", product.id), date(2026, 1, 1)).await?;
        assert_eq!(created.end_date, None);

        let mut explicit = input("B", "2", product.id);
        explicit.end_date = Some(date(2026, 12, 31));
        let created = create_member(&db, explicit, date(2026, 1, 1)).await?;
        assert_eq!(created.end_date, Some(date(2026, 12, 31)));
        Ok(())
    }

    #[tokio::test]
    async fn test_create_member_rejects_unknown_product_and_duplicates() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_test_product(&db, "FPT", Some(1), DurationUnit::Months).await?;

        let result = create_member(&db, input("A", "1", 999), date(2026, 1, 1)).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        create_member(&db, input("A", "1", product.id), date(2026, 1, 1)).await?;
        let result = create_member(&db, input("A", "1", product.id), date(2026, 1, 1)).await;
        assert!(matches!(result.unwrap_err(), Error::Conflict { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_list_members_filters() -> Result<()> {
        let db = setup_test_db().await?;
        let fpt = create_test_product(&db, "FPT", Some(1), DurationUnit::Months).await?;
        let pt = create_test_product(&db, "PT", Some(0), DurationUnit::Months).await?;
        create_test_member(&db, "Alice", "010-1111-2222", fpt.id).await?;
        create_test_member(&db, "Bob", "010-3333-4444", pt.id).await?;

        let all = list_members(&db, &MemberFilter::default()).await?;
        assert_eq!(all.len(), 2);

        let by_product = MemberFilter {
            product_id: Some(pt.id.to_string()),
            search: None,
        };
        let found = list_members(&db, &by_product).await?;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Bob");
        assert_eq!(found[0].product_name.as_deref(), Some("PT"));

        let by_text = MemberFilter {
            product_id: Some("not-a-number".to_string()),
            search: Some("alice".to_string()),
        };
        let found = list_members(&db, &by_text).await?;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Alice");

        let by_phone = MemberFilter {
            product_id: None,
            search: Some("3333".to_string()),
        };
        assert_eq!(list_members(&db, &by_phone).await?[0].name, "Bob");
        Ok(())
    }

    #[tokio::test]
    async fn test_get_update_delete_member() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_test_product(&db, "FPT", Some(6), DurationUnit::Months).await?;
        let member = create_test_member(&db, "Alice", "1", product.id).await?;

        let details = get_member(&db, &member.id).await?.unwrap();
        assert_eq!(details.reg_months, Some(6));

        let mut changes = input("Alice Kim", "1", product.id);
        changes.remaining = Some(7);
        let updated = update_member(&db, &member.id, changes).await?;
        assert_eq!(updated.name, "Alice Kim");
        assert_eq!(updated.remaining, 7);

        let missing = update_member(&db, "nope", input("X", "2", product.id)).await;
        assert!(matches!(missing.unwrap_err(), Error::MemberNotFound { .. }));

        let bad_product = update_member(&db, &member.id, input("Alice", "1", 999)).await;
        assert!(matches!(bad_product.unwrap_err(), Error::Validation { .. }));

        let deleted = delete_member(&db, &member.id).await?;
        assert_eq!(deleted.id, member.id);
        assert!(get_member(&db, &member.id).await?.is_none());

        let missing = delete_member(&db, &member.id).await;
        assert!(matches!(missing.unwrap_err(), Error::MemberNotFound { .. }));
        Ok(())
    }
}
