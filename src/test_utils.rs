//! Shared test utilities.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{member, product},
    entities::{self, DurationUnit},
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a test product with the given term.
///
/// # Defaults
/// * `price`: 0
/// * `active`: true
pub async fn create_test_product(
    db: &DatabaseConnection,
    name: &str,
    duration_count: Option<i32>,
    duration_unit: DurationUnit,
) -> Result<entities::product::Model> {
    product::create_product(
        db,
        product::ProductInput {
            name: name.to_string(),
            duration_count,
            duration_unit: Some(duration_unit),
            price: 0,
            description: None,
            active: Some(true),
        },
    )
    .await
}

/// Registers a test member with an automatically allocated id.
///
/// # Defaults
/// * `gender`: "남"
/// * `start_date`: 2026-01-15
pub async fn create_test_member(
    db: &DatabaseConnection,
    name: &str,
    phone: &str,
    product_id: i64,
) -> Result<entities::member::Model> {
    member::create_member(
        db,
        member::MemberInput {
            name: name.to_string(),
            gender: Some("남".to_string()),
            phone: Some(phone.to_string()),
            product_id,
            start_date: NaiveDate::from_ymd_opt(2026, 1, 15),
            ..Default::default()
        },
        NaiveDate::from_ymd_opt(2026, 1, 15).unwrap_or_default(),
    )
    .await
}

/// Inserts a member row with an explicit id and no phone number.
/// Use this to plant legacy or out-of-sequence ids.
pub async fn insert_test_member(
    db: &DatabaseConnection,
    id: &str,
    name: &str,
    product_id: i64,
) -> Result<entities::member::Model> {
    member::insert_member(
        db,
        member::NewMember {
            id: id.to_string(),
            name: name.to_string(),
            gender: None,
            phone: None,
            product_id,
            reg_date: None,
            start_date: None,
            end_date: None,
            remaining: 0,
        },
    )
    .await
    .map_err(Into::into)
}
