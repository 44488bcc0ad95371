//! Membership term calculation.
//!
//! Computes the last day of a membership from its start date and the product's
//! term length. Month terms use end-of-month clamping: one month after
//! January 31st is the last day of February, never "February 31st".

use crate::{
    entities::DurationUnit,
    errors::{Error, Result},
};
use chrono::{Datelike, Days, NaiveDate};

/// Computes a membership end date.
///
/// Rules, in order:
/// 1. An explicit end date is returned unchanged.
/// 2. A missing or non-positive `duration_count` means the membership never
///    expires (session-based products), so the result is `None`.
/// 3. [`DurationUnit::Days`] adds plain days.
/// 4. [`DurationUnit::Months`] adds calendar months and clamps the day to the
///    length of the target month.
///
/// # Errors
/// Returns [`Error::DateOutOfRange`] if the result is not representable.
pub fn compute_end_date(
    start_date: NaiveDate,
    explicit_end_date: Option<NaiveDate>,
    duration_count: Option<i32>,
    duration_unit: DurationUnit,
) -> Result<Option<NaiveDate>> {
    if explicit_end_date.is_some() {
        return Ok(explicit_end_date);
    }

    let count = match duration_count {
        Some(count) if count > 0 => count,
        _ => return Ok(None),
    };

    let end = match duration_unit {
        DurationUnit::Days => {
            start_date.checked_add_days(Days::new(u64::from(count.unsigned_abs())))
        }
        DurationUnit::Months => add_months_clamped(start_date, count),
    };

    end.map(Some).ok_or(Error::DateOutOfRange {
        start: start_date,
        count,
        unit: duration_unit,
    })
}

fn add_months_clamped(start: NaiveDate, months: i32) -> Option<NaiveDate> {
    // i64 so that huge counts overflow chrono's range instead of i32
    let target_index = i64::from(start.month0()) + i64::from(months);
    let year = i32::try_from(i64::from(start.year()) + target_index.div_euclid(12)).ok()?;
    let month = u32::try_from(target_index.rem_euclid(12)).ok()? + 1;
    let day = start.day().min(days_in_month(year, month)?);
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Number of days in `month` (1-based) of `year`, honouring leap years.
fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year.checked_add(1)?, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    first_of_next.pred_opt().map(|last| last.day())
}
