//! Product entity - Represents a membership plan definition.
//!
//! A product carries the term length (a count plus a unit) used to compute a
//! member's end date, and a price. Products referenced by members are never
//! hard-deleted; they are deactivated instead.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unit in which a product's term length is counted
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
#[serde(rename_all = "lowercase")]
pub enum DurationUnit {
    /// Calendar months, clamped to the end of the target month
    #[default]
    #[sea_orm(string_value = "months")]
    Months,
    /// Plain days
    #[sea_orm(string_value = "days")]
    Days,
}

impl fmt::Display for DurationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Months => f.write_str("months"),
            Self::Days => f.write_str("days"),
        }
    }
}

/// Product database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the product
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name (e.g., "FPT 12개월")
    pub name: String,
    /// Term length; zero or absent means session-based with no expiry
    #[serde(rename = "regMonths")]
    pub duration_count: Option<i32>,
    /// Unit of `duration_count`
    pub duration_unit: DurationUnit,
    /// Price in won
    pub price: i64,
    /// Free-form description
    pub description: Option<String>,
    /// Inactive products are hidden from name lookups
    pub active: bool,
    /// When the product was created
    pub created_at: DateTime,
}

/// Defines relationships between Product and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One product is held by many members
    #[sea_orm(has_many = "super::member::Entity")]
    Members,
}

impl Related<super::member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Members.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
