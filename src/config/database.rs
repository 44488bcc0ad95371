//! Database configuration module.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`,
//! so the schema always matches the Rust structs. Composite uniqueness rules that the
//! entity derive cannot express (member name + phone, one check-in per slot) are added
//! as separate unique indexes.

use crate::config::admin::DefaultAdmin;
use crate::entities::{Admin, Attendance, Coach, Member, Product, admin, attendance, member};
use crate::errors::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, Database, DatabaseConnection, EntityTrait,
    QueryFilter, Schema, Set, sea_query::Index,
};
use tracing::info;

const DEFAULT_DATABASE_URL: &str = "sqlite://data/attendance.sqlite?mode=rwc";

/// Gets the database URL from environment variable or returns default `SQLite` path.
///
/// This function looks for `DATABASE_URL` in the environment and falls back to
/// a default local `SQLite` file if not found.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection pool to the database named by `DATABASE_URL`.
///
/// The returned handle is cloned into the HTTP state; every request borrows a
/// connection from it for the duration of its queries.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    if database_url == DEFAULT_DATABASE_URL {
        std::fs::create_dir_all("data")?;
    }
    info!("Connecting to database at {database_url}");
    Database::connect(&database_url).await.map_err(Into::into)
}

/// Creates all tables and unique indexes if they do not exist yet.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut tables = [
        schema.create_table_from_entity(Product),
        schema.create_table_from_entity(Member),
        schema.create_table_from_entity(Coach),
        schema.create_table_from_entity(Attendance),
        schema.create_table_from_entity(Admin),
    ];
    for table in &mut tables {
        table.if_not_exists();
        db.execute(builder.build(&*table)).await?;
    }

    let member_identity = Index::create()
        .name("idx_members_name_phone")
        .table(Member)
        .col(member::Column::Name)
        .col(member::Column::Phone)
        .unique()
        .if_not_exists()
        .to_owned();
    let attendance_slot = Index::create()
        .name("idx_attendance_member_slot")
        .table(Attendance)
        .col(attendance::Column::MemberId)
        .col(attendance::Column::Date)
        .col(attendance::Column::Time)
        .unique()
        .if_not_exists()
        .to_owned();

    db.execute(builder.build(&member_identity)).await?;
    db.execute(builder.build(&attendance_slot)).await?;

    Ok(())
}

/// Inserts the default administrator unless an account with that username exists.
///
/// Returns `true` when a new account was created.
pub async fn seed_default_admin(db: &DatabaseConnection, seed: &DefaultAdmin) -> Result<bool> {
    let existing = Admin::find()
        .filter(admin::Column::Username.eq(seed.username.as_str()))
        .one(db)
        .await?;
    if existing.is_some() {
        return Ok(false);
    }

    admin::ActiveModel {
        username: Set(seed.username.clone()),
        password: Set(seed.password.clone()),
        name: Set(seed.name.clone()),
        role: Set("super_admin".to_string()),
        created_at: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!("Created default administrator account '{}'", seed.username);
    Ok(true)
}
