//! Coach business logic.

use crate::{
    entities::{Coach, coach},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, SqlErr, prelude::*};
use serde::Deserialize;

/// Fields accepted when registering a coach
#[derive(Debug, Clone, Deserialize)]
pub struct CoachInput {
    /// Staff identifier
    pub id: String,
    /// Coach name
    pub name: String,
    /// Contact phone number
    #[serde(default)]
    pub phone: Option<String>,
    /// Employment status
    #[serde(default)]
    pub status: Option<String>,
    /// Area of expertise
    #[serde(default)]
    pub specialty: Option<String>,
}

/// Retrieves all coaches ordered by name.
pub async fn get_all_coaches(db: &DatabaseConnection) -> Result<Vec<coach::Model>> {
    Coach::find()
        .order_by_asc(coach::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a coach by id.
///
/// # Errors
/// Returns [`Error::CoachNotFound`] if no coach has this id.
pub async fn get_coach(db: &DatabaseConnection, coach_id: &str) -> Result<coach::Model> {
    Coach::find_by_id(coach_id.to_string())
        .one(db)
        .await?
        .ok_or_else(|| Error::CoachNotFound {
            id: coach_id.to_string(),
        })
}

/// Registers a coach.
///
/// # Errors
/// Returns an error if the id or name is blank, the id is taken, or the
/// insert fails.
pub async fn create_coach(db: &DatabaseConnection, input: CoachInput) -> Result<coach::Model> {
    let id = input.id.trim();
    if id.is_empty() || input.name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Coach id and name are required".to_string(),
        });
    }

    coach::ActiveModel {
        id: Set(id.to_string()),
        name: Set(input.name.trim().to_string()),
        phone: Set(input.phone),
        status: Set(input.status),
        specialty: Set(input.specialty),
    }
    .insert(db)
    .await
    .map_err(|err| match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => Error::Conflict {
            message: format!("Coach id '{id}' is already in use"),
        },
        _ => Error::Database(err),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;

    fn input(id: &str, name: &str) -> CoachInput {
        CoachInput {
            id: id.to_string(),
            name: name.to_string(),
            phone: None,
            status: Some("active".to_string()),
            specialty: Some("PT".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_and_list_coaches() -> Result<()> {
        let db = setup_test_db().await?;

        create_coach(&db, input("C2", "Yuna")).await?;
        create_coach(&db, input("C1", "Minho")).await?;

        let names: Vec<String> = get_all_coaches(&db)
            .await?
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Minho", "Yuna"]);

        let found = get_coach(&db, "C2").await?;
        assert_eq!(found.specialty.as_deref(), Some("PT"));
        Ok(())
    }

    #[tokio::test]
    async fn test_coach_errors() -> Result<()> {
        let db = setup_test_db().await?;

        let missing = get_coach(&db, "nobody").await;
        assert!(matches!(missing, Err(Error::CoachNotFound { .. })));

        let blank = create_coach(&db, input(" ", "Name")).await;
        assert!(matches!(blank, Err(Error::Validation { .. })));

        create_coach(&db, input("C1", "Minho")).await?;
        let duplicate = create_coach(&db, input("C1", "Other")).await;
        assert!(matches!(duplicate, Err(Error::Conflict { .. })));
        Ok(())
    }
}
