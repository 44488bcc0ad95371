//! Administrator accounts and login.
//!
//! Passwords are stored and compared as plaintext.

use crate::{
    config::admin::DEFAULT_ADMIN_USERNAME,
    entities::{Admin, admin},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::Deserialize;
use tracing::info;

/// Role given to accounts created without one
pub const DEFAULT_ROLE: &str = "admin";

/// Fields accepted when creating an administrator
#[derive(Debug, Clone, Deserialize)]
pub struct AdminInput {
    /// Login name
    pub username: String,
    /// Login password
    pub password: String,
    /// Display name
    pub name: String,
    /// Role label
    #[serde(default)]
    pub role: Option<String>,
}

/// Partial update of an administrator; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminChanges {
    /// New display name
    pub name: Option<String>,
    /// New password
    pub password: Option<String>,
    /// New role label
    pub role: Option<String>,
}

/// Login request
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    /// Login name
    pub username: String,
    /// Login password
    pub password: String,
}

async fn find_by_username(db: &DatabaseConnection, username: &str) -> Result<Option<admin::Model>> {
    Admin::find()
        .filter(admin::Column::Username.eq(username))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists administrators, newest first.
pub async fn get_all_admins(db: &DatabaseConnection) -> Result<Vec<admin::Model>> {
    Admin::find()
        .order_by_desc(admin::Column::CreatedAt)
        .order_by_desc(admin::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Creates an administrator.
///
/// # Errors
/// Returns [`Error::Validation`] if a field is blank or the username is taken.
pub async fn create_admin(db: &DatabaseConnection, input: AdminInput) -> Result<admin::Model> {
    let username = input.username.trim();
    if username.is_empty() || input.password.is_empty() || input.name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Username, password and name are required".to_string(),
        });
    }
    if find_by_username(db, username).await?.is_some() {
        return Err(Error::Validation {
            message: format!("Username '{username}' already exists"),
        });
    }

    let created = admin::ActiveModel {
        username: Set(username.to_string()),
        password: Set(input.password),
        name: Set(input.name.trim().to_string()),
        role: Set(input.role.unwrap_or_else(|| DEFAULT_ROLE.to_string())),
        created_at: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!("Created administrator '{}'", created.username);
    Ok(created)
}

/// Applies a partial update to an administrator.
///
/// # Errors
/// Returns [`Error::Validation`] if no field is given and
/// [`Error::AdminNotFound`] if the account does not exist.
pub async fn update_admin(
    db: &DatabaseConnection,
    admin_id: i64,
    changes: AdminChanges,
) -> Result<admin::Model> {
    if changes.name.is_none() && changes.password.is_none() && changes.role.is_none() {
        return Err(Error::Validation {
            message: "Nothing to update".to_string(),
        });
    }

    let mut account: admin::ActiveModel = Admin::find_by_id(admin_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::AdminNotFound {
            id: admin_id.to_string(),
        })?
        .into();

    if let Some(name) = changes.name {
        account.name = Set(name);
    }
    if let Some(password) = changes.password {
        account.password = Set(password);
    }
    if let Some(role) = changes.role {
        account.role = Set(role);
    }

    account.update(db).await.map_err(Into::into)
}

/// Deletes an administrator.
///
/// # Errors
/// Returns [`Error::Validation`] for the built-in `admin` account and
/// [`Error::AdminNotFound`] if the account does not exist.
pub async fn delete_admin(db: &DatabaseConnection, admin_id: i64) -> Result<()> {
    let account = Admin::find_by_id(admin_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::AdminNotFound {
            id: admin_id.to_string(),
        })?;

    if account.username == DEFAULT_ADMIN_USERNAME {
        return Err(Error::Validation {
            message: "The default administrator cannot be deleted".to_string(),
        });
    }

    Admin::delete_by_id(admin_id).exec(db).await?;
    info!("Deleted administrator '{}'", account.username);
    Ok(())
}

/// Checks login credentials and returns the matching account.
///
/// # Errors
/// Returns [`Error::InvalidCredentials`] for an unknown username or a wrong
/// password.
pub async fn login(db: &DatabaseConnection, credentials: &Credentials) -> Result<admin::Model> {
    match find_by_username(db, &credentials.username).await? {
        Some(account) if account.password == credentials.password => Ok(account),
        _ => Err(Error::InvalidCredentials),
    }
}
