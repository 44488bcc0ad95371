//! Member entity - A person enrolled under a product.
//!
//! Member ids are strings. New ids are allocated as the largest purely numeric
//! id plus one, so legacy non-numeric ids can live in the same column.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Member database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "members")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// String-encoded identifier (normally a sequential integer)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Member name
    pub name: String,
    /// Gender label as entered (e.g., "남", "여")
    pub gender: Option<String>,
    /// Phone number as entered
    pub phone: Option<String>,
    /// Product the member is enrolled under
    pub product_id: i64,
    /// Registration (application) date
    pub reg_date: Option<Date>,
    /// First day of the membership term
    pub start_date: Option<Date>,
    /// Last day of the membership term; `None` means no expiry
    pub end_date: Option<Date>,
    /// Remaining session count
    pub remaining: i32,
    /// When the member row was created
    pub created_at: DateTime,
    /// When the member row was last modified
    pub updated_at: DateTime,
}

/// Defines relationships between Member and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each member belongs to one product
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
    /// One member has many attendance records
    #[sea_orm(has_many = "super::attendance::Entity")]
    Attendance,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl Related<super::attendance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attendance.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
