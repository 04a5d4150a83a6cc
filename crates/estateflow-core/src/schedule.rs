//! Follow-up scheduling: recurrence arithmetic and due-date
//! classification.
//!
//! Recurrence is computed one hop at a time — completing a follow-up
//! asks for the single next occurrence rather than materializing a
//! schedule. Classification runs against the wall clock at call time so
//! a lead that was "due today" yesterday is "overdue" today without any
//! stored state changing.

use chrono::{DateTime, Days, Local, Months, NaiveDate, Utc};

use crate::error::{CrmError, CrmResult};
use crate::models::lead::Recurrence;

/// Compute the next follow-up after `base` under the given rule.
///
/// Returns `None` for `Recurrence::None` and on date-arithmetic
/// overflow. Monthly advancement clamps to the last day of shorter
/// months (Jan 31 -> Feb 28, or Feb 29 in leap years). A `Custom`
/// interval below 1 is treated as 1.
pub fn next_occurrence(
    base: DateTime<Utc>,
    rule: Recurrence,
    interval: u32,
) -> Option<DateTime<Utc>> {
    match rule {
        Recurrence::None => None,
        Recurrence::Daily => base.checked_add_days(Days::new(1)),
        Recurrence::Weekly => base.checked_add_days(Days::new(7)),
        Recurrence::Monthly => base.checked_add_months(Months::new(1)),
        Recurrence::Custom => base.checked_add_days(Days::new(u64::from(interval.max(1)))),
    }
}

/// Parse a timestamp supplied at the boundary: RFC 3339, or a bare
/// `YYYY-MM-DD` date taken as midnight UTC.
pub fn parse_timestamp(value: &str) -> CrmResult<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        && let Some(ts) = date.and_hms_opt(0, 0, 0)
    {
        return Ok(ts.and_utc());
    }
    Err(CrmError::InvalidDate {
        value: value.to_string(),
    })
}

/// Where a follow-up timestamp falls relative to a calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueState {
    Overdue,
    DueToday,
    Upcoming,
}

/// Classify `ts` against `today` at day granularity, in the local
/// time zone. The three states are disjoint by construction.
pub fn classify(ts: DateTime<Utc>, today: NaiveDate) -> DueState {
    let day = ts.with_timezone(&Local).date_naive();
    if day < today {
        DueState::Overdue
    } else if day == today {
        DueState::DueToday
    } else {
        DueState::Upcoming
    }
}

/// Today's calendar date in the local time zone.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// True iff `ts` falls on a calendar day strictly before today.
pub fn is_overdue(ts: DateTime<Utc>) -> bool {
    classify(ts, today()) == DueState::Overdue
}

/// True iff `ts` falls on today's calendar day.
pub fn is_due_today(ts: DateTime<Utc>) -> bool {
    classify(ts, today()) == DueState::DueToday
}
