use chrono::{Duration, NaiveDate, Utc};

/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// A calendar day with no time zone attached.
pub type Day = NaiveDate;

/// Calendar date "today" for a business operating at a fixed UTC offset.
///
/// Scheduling rules compare against the operator's local day, not the UTC
/// day, so a booking made at 22:00 local time still counts as the same day.
pub fn business_today(utc_offset_hours: i32) -> Day {
    (Utc::now() + Duration::hours(i64::from(utc_offset_hours))).date_naive()
}
