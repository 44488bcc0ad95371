//! Coach entity - Staff members who run sessions.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Coach database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "coaches")]
pub struct Model {
    /// Staff identifier
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Coach name
    pub name: String,
    /// Contact phone number
    pub phone: Option<String>,
    /// Employment status (e.g., "active", "leave")
    pub status: Option<String>,
    /// Area of expertise
    pub specialty: Option<String>,
}

/// `Coach` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
