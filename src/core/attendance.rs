//! Attendance business logic - Check-ins and daily statistics.
//!
//! A member can check in at most once per date and time slot; the store
//! enforces this with a unique index and a second check-in is a conflict.

use crate::{
    entities::{Attendance, Member, attendance},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, QuerySelect, Select, Set, SqlErr, prelude::*, sea_query::Expr};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Status recorded when a check-in does not name one
pub const DEFAULT_STATUS: &str = "Present";

/// Check-in request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckIn {
    /// Member checking in
    pub user_id: String,
    /// Day of the visit
    pub date: NaiveDate,
    /// Time slot as `HH:MM`
    pub time: String,
    /// Check-in status
    #[serde(default)]
    pub status: Option<String>,
}

/// Optional filters for [`list_attendance`] and [`daily_stats`]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceFilter {
    /// Earliest date, inclusive
    pub start_date: Option<NaiveDate>,
    /// Latest date, inclusive
    pub end_date: Option<NaiveDate>,
    /// Only check-ins of this member
    pub user_id: Option<String>,
}

/// Check-in joined with the member's name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    /// Check-in id
    pub id: i64,
    /// Member id
    pub user_id: String,
    /// Member name
    pub user_name: String,
    /// Day of the visit
    pub date: NaiveDate,
    /// Time slot
    pub time: String,
    /// Check-in status
    pub status: String,
}

/// Check-in totals for one day
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStats {
    /// The day
    pub attendance_date: NaiveDate,
    /// Number of check-ins
    pub total_count: usize,
    /// Number of distinct members
    pub unique_users: usize,
}

fn filtered(filter: &AttendanceFilter) -> Select<Attendance> {
    let mut query = Attendance::find();
    if let Some(start) = filter.start_date {
        query = query.filter(attendance::Column::Date.gte(start));
    }
    if let Some(end) = filter.end_date {
        query = query.filter(attendance::Column::Date.lte(end));
    }
    if let Some(user_id) = filter.user_id.as_deref() {
        query = query.filter(attendance::Column::MemberId.eq(user_id));
    }
    query
}

/// Lists check-ins with member names, newest first.
///
/// Check-ins whose member no longer exists are left out.
pub async fn list_attendance(
    db: &DatabaseConnection,
    filter: &AttendanceFilter,
) -> Result<Vec<AttendanceRecord>> {
    let rows = filtered(filter)
        .order_by_desc(attendance::Column::Date)
        .order_by_desc(attendance::Column::Time)
        .find_also_related(Member)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(record, member)| {
            member.map(|member| AttendanceRecord {
                id: record.id,
                user_id: record.member_id,
                user_name: member.name,
                date: record.date,
                time: record.time,
                status: record.status,
            })
        })
        .collect())
}

/// Records a check-in.
///
/// # Errors
/// Returns an error if:
/// - The member does not exist
/// - The member already checked in at this date and time
/// - The database operation fails
pub async fn check_in(db: &DatabaseConnection, request: CheckIn) -> Result<attendance::Model> {
    let exists = Member::find_by_id(request.user_id.clone())
        .one(db)
        .await?
        .is_some();
    if !exists {
        return Err(Error::MemberNotFound { id: request.user_id });
    }

    debug!(
        "Check-in for member {} at {} {}",
        request.user_id, request.date, request.time
    );

    attendance::ActiveModel {
        member_id: Set(request.user_id),
        date: Set(request.date),
        time: Set(request.time),
        status: Set(request.status.unwrap_or_else(|| DEFAULT_STATUS.to_string())),
        created_at: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(|err| match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => Error::Conflict {
            message: "Attendance is already recorded for this time slot".to_string(),
        },
        _ => Error::Database(err),
    })
}

/// Per-day check-in totals, newest day first. The member filter is ignored.
pub async fn daily_stats(
    db: &DatabaseConnection,
    filter: &AttendanceFilter,
) -> Result<Vec<DailyStats>> {
    let range = AttendanceFilter {
        user_id: None,
        ..filter.clone()
    };
    let days: Vec<(NaiveDate, i64, i64)> = filtered(&range)
        .select_only()
        .column(attendance::Column::Date)
        .column_as(Expr::cust("COUNT(*)"), "total_count")
        .column_as(Expr::cust("COUNT(DISTINCT member_id)"), "unique_users")
        .group_by(attendance::Column::Date)
        .order_by_desc(attendance::Column::Date)
        .into_tuple()
        .all(db)
        .await?;

    Ok(days
        .into_iter()
        .map(|(attendance_date, total, unique)| DailyStats {
            attendance_date,
            total_count: usize::try_from(total).unwrap_or_default(),
            unique_users: usize::try_from(unique).unwrap_or_default(),
        })
        .collect())
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

    fn visit(user_id: &str, day: NaiveDate, time: &str) -> CheckIn {
        CheckIn {
            user_id: user_id.to_string(),
            date: day,
            time: time.to_string(),
            status: None,
        }
    }

    #[tokio::test]
    async fn test_check_in_rules() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_test_product(&db, "FPT", Some(1), DurationUnit::Months).await?;
        let member = create_test_member(&db, "Alice", "1", product.id).await?;

        let record = check_in(&db, visit(&member.id, date(2026, 1, 2), "09:00")).await?;
        assert_eq!(record.status, DEFAULT_STATUS);

        let again = check_in(&db, visit(&member.id, date(2026, 1, 2), "09:00")).await;
        assert!(matches!(again, Err(Error::Conflict { .. })));

        // Another slot on the same day is fine
        check_in(&db, visit(&member.id, date(2026, 1, 2), "18:00")).await?;

        let unknown = check_in(&db, visit("404", date(2026, 1, 2), "09:00")).await;
        assert!(matches!(unknown, Err(Error::MemberNotFound { .. })));

        // Check-ins go away with their member
        crate::core::member::delete_member(&db, &member.id).await?;
        assert!(Attendance::find().all(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_list_and_stats() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_test_product(&db, "FPT", Some(1), DurationUnit::Months).await?;
        let alice = create_test_member(&db, "Alice", "1", product.id).await?;
        let bob = create_test_member(&db, "Bob", "2", product.id).await?;

        check_in(&db, visit(&alice.id, date(2026, 1, 1), "09:00")).await?;
        check_in(&db, visit(&alice.id, date(2026, 1, 1), "19:00")).await?;
        check_in(&db, visit(&bob.id, date(2026, 1, 1), "10:00")).await?;
        check_in(&db, visit(&bob.id, date(2026, 1, 3), "10:00")).await?;

        let all = list_attendance(&db, &AttendanceFilter::default()).await?;
        assert_eq!(all.len(), 4);
        assert_eq!(all[0].date, date(2026, 1, 3));
        assert_eq!(all[0].user_name, "Bob");
        assert_eq!(all[1].time, "19:00");

        let filter = AttendanceFilter {
            start_date: Some(date(2026, 1, 1)),
            end_date: Some(date(2026, 1, 1)),
            user_id: Some(alice.id.clone()),
        };
        assert_eq!(list_attendance(&db, &filter).await?.len(), 2);

        let stats = daily_stats(&db, &AttendanceFilter::default()).await?;
        assert_eq!(
            stats,
            vec![
                DailyStats {
                    attendance_date: date(2026, 1, 3),
                    total_count: 1,
                    unique_users: 1,
                },
                DailyStats {
                    attendance_date: date(2026, 1, 1),
                    total_count: 3,
                    unique_users: 2,
                },
            ]
        );

        let ranged = daily_stats(&db, &filter).await?;
        assert_eq!(ranged.len(), 1);
        assert_eq!(ranged[0].total_count, 3);
        Ok(())
    }
}
