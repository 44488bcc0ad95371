//! Attendance entity - One check-in of a member at a given date and time slot.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Attendance database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "attendance")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the check-in
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Member who checked in
    #[serde(rename = "userId")]
    pub member_id: String,
    /// Day of the check-in
    pub date: Date,
    /// Time slot as `HH:MM`
    pub time: String,
    /// Check-in status, `"Present"` unless stated otherwise
    pub status: String,
    /// When the record was created
    pub created_at: DateTime,
}

/// Defines relationships between Attendance and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each check-in belongs to one member and is removed with it
    #[sea_orm(
        belongs_to = "super::member::Entity",
        from = "Column::MemberId",
        to = "super::member::Column::Id",
        on_delete = "Cascade"
    )]
    Member,
}

impl Related<super::member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Member.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
