//! Admin entity - Administrator accounts that can log into the back office.
//!
//! Passwords are stored and compared in plaintext.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Admin database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "admins")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Login name
    #[sea_orm(unique)]
    pub username: String,
    /// Login password
    #[serde(skip_serializing)]
    pub password: String,
    /// Display name
    pub name: String,
    /// Role label (`"admin"`, `"super_admin"`)
    pub role: String,
    /// When the account was created
    pub created_at: DateTime,
}

/// `Admin` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
