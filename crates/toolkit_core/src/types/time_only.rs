//! Nullable time of day.
//!
//! # Responsibility
//! - Hold an optional hour:minute clock time as a UTC instant.
//! - Serialize as `"HH:MM"` or `null`, store as text or NULL.
//!
//! # Invariants
//! - Seconds and sub-second parts are always zero.
//! - `new` and native timestamp loads anchor at 0000-01-01; text parses and
//!   text loads anchor at the current UTC day. `equals` ignores the date,
//!   `is_before`/`is_after` do not, so two values built through different
//!   paths can be `equals` while one `is_before` the other.

use super::error::{ParseError, ScanError};
use super::storage::{from_sql_error, to_sql_output, unsupported, StorageValue};
use super::{parse_clock, unquote_nullable, zero_instant, NullableTextVisitor};
use super::TIME_LAYOUT;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Timelike, Utc};
use once_cell::sync::Lazy;
use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const TARGET: &str = "TimeOnly";
const EXPECTED_LAYOUT: &str = "HH:MM";

static REFERENCE_DATE: Lazy<NaiveDate> =
    Lazy::new(|| NaiveDate::from_ymd_opt(0, 1, 1).expect("valid reference date"));

/// Optional clock time stored as a UTC instant.
///
/// `TimeOnly::default()` is the absent value.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeOnly {
    pub time: Option<DateTime<Utc>>,
}

impl TimeOnly {
    /// Creates a time anchored at the reference date 0000-01-01 UTC.
    ///
    /// Minutes past 59 and hours past 23 roll into the following hours and
    /// days.
    pub fn new(hour: u32, minute: u32) -> Self {
        let offset = TimeDelta::minutes(i64::from(hour) * 60 + i64::from(minute));
        Self {
            time: REFERENCE_DATE
                .and_time(NaiveTime::MIN)
                .and_utc()
                .checked_add_signed(offset),
        }
    }

    /// Parses JSON-like text: quoted or bare `HH:MM`, `null`, or empty.
    ///
    /// The parsed clock time is anchored to today's UTC date, not to the
    /// reference date used by `new`.
    ///
    /// # Errors
    /// - Returns `ParseError` when the text is not a strict `HH:MM` time.
    pub fn parse_text(input: &str) -> Result<Self, ParseError> {
        match unquote_nullable(input) {
            None => Ok(Self::default()),
            Some(text) => Self::parse_today(text),
        }
    }

    fn parse_today(text: &str) -> Result<Self, ParseError> {
        let clock =
            parse_clock(text).ok_or_else(|| ParseError::new(TARGET, EXPECTED_LAYOUT, text))?;
        Ok(Self {
            time: Some(Utc::now().date_naive().and_time(clock).and_utc()),
        })
    }

    /// Storage representation: `Null` or `Text("HH:MM")`.
    pub fn to_storage_value(&self) -> StorageValue {
        match self.time {
            None => StorageValue::Null,
            Some(instant) => StorageValue::Text(instant.format(TIME_LAYOUT).to_string()),
        }
    }

    /// Loads a value produced by a storage driver.
    ///
    /// Native timestamps keep only hour and minute, re-anchored at the
    /// reference date; text is parsed and anchored to today.
    ///
    /// # Errors
    /// - `ScanError::Parse` for malformed text.
    /// - `ScanError::Unsupported` for any other non-null shape.
    pub fn from_storage_value(value: &StorageValue) -> Result<Self, ScanError> {
        match value {
            StorageValue::Null => Ok(Self::default()),
            StorageValue::Text(text) => Ok(Self::parse_today(text)?),
            StorageValue::Timestamp(instant) => Ok(Self::new(instant.hour(), instant.minute())),
            other => Err(unsupported(TARGET, other)),
        }
    }

    /// Returns true when unset or holding the zero instant.
    pub fn is_zero(&self) -> bool {
        self.time.map_or(true, |instant| instant == zero_instant())
    }

    /// Full instant comparison, date part included.
    pub fn is_before(&self, other: &TimeOnly) -> bool {
        matches!((self.time, other.time), (Some(a), Some(b)) if a < b)
    }

    /// Full instant comparison, date part included.
    pub fn is_after(&self, other: &TimeOnly) -> bool {
        matches!((self.time, other.time), (Some(a), Some(b)) if a > b)
    }

    /// Both present with the same hour and minute; the date is ignored.
    pub fn equals(&self, other: &TimeOnly) -> bool {
        matches!(
            (self.time, other.time),
            (Some(a), Some(b)) if a.hour() == b.hour() && a.minute() == b.minute()
        )
    }

    /// Returns the wrapped instant, or the zero instant when absent.
    pub fn to_time(&self) -> DateTime<Utc> {
        self.time.unwrap_or_else(zero_instant)
    }

    /// Returns a new value shifted by `delta`; absent stays absent.
    pub fn add(&self, delta: TimeDelta) -> TimeOnly {
        Self {
            time: self
                .time
                .and_then(|instant| instant.checked_add_signed(delta)),
        }
    }

    pub fn hour(&self) -> Option<u32> {
        self.time.map(|instant| instant.hour())
    }

    pub fn minute(&self) -> Option<u32> {
        self.time.map(|instant| instant.minute())
    }
}

impl Display for TimeOnly {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.time {
            None => f.write_str("null"),
            Some(instant) => write!(f, "{}", instant.format(TIME_LAYOUT)),
        }
    }
}

impl FromStr for TimeOnly {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_text(s)
    }
}

impl Serialize for TimeOnly {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.time {
            None => serializer.serialize_none(),
            Some(instant) => serializer.collect_str(&instant.format(TIME_LAYOUT)),
        }
    }
}

impl<'de> Deserialize<'de> for TimeOnly {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = deserializer.deserialize_option(NullableTextVisitor {
            expecting: "an HH:MM time string or null",
        })?;
        match text {
            None => Ok(Self::default()),
            Some(text) => Self::parse_text(&text).map_err(D::Error::custom),
        }
    }
}

impl ToSql for TimeOnly {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(to_sql_output(self.to_storage_value()))
    }
}

impl FromSql for TimeOnly {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        Self::from_storage_value(&StorageValue::from(value)).map_err(from_sql_error)
    }
}

#[cfg(test)]
mod tests {
    use super::TimeOnly;
    use chrono::{Datelike, Timelike};

    #[test]
    fn new_anchors_at_reference_date() {
        let time = TimeOnly::new(9, 30);
        let instant = time.time.expect("time should be present");
        assert_eq!((instant.year(), instant.month(), instant.day()), (0, 1, 1));
        assert_eq!((instant.hour(), instant.minute(), instant.second()), (9, 30, 0));
        assert_eq!(instant.nanosecond(), 0);
    }

    #[test]
    fn new_rolls_minutes_into_hours() {
        let time = TimeOnly::new(23, 75);
        let instant = time.time.expect("time should be present");
        assert_eq!((instant.day(), instant.hour(), instant.minute()), (2, 0, 15));
    }

    #[test]
    fn accessors_report_clock_fields() {
        assert_eq!(TimeOnly::new(7, 5).hour(), Some(7));
        assert_eq!(TimeOnly::new(7, 5).minute(), Some(5));
        assert_eq!(TimeOnly::default().hour(), None);
    }
}
