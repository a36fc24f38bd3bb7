//! Nullable calendar date.
//!
//! # Responsibility
//! - Hold an optional date normalized to UTC midnight.
//! - Serialize as `"YYYY-MM-DD"` or `null`, store as text or NULL.
//!
//! # Invariants
//! - A present value always has zero hour/minute/second/nanosecond in UTC;
//!   `new` and every parse path truncate, callers never have to.
//! - Comparisons involving an absent value are `false`, never errors.

use super::error::{ParseError, ScanError};
use super::storage::{from_sql_error, to_sql_output, unsupported, StorageValue};
use super::{midnight_utc, parse_date, unquote_nullable, zero_instant, NullableTextVisitor};
use super::DATE_LAYOUT;
use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const TARGET: &str = "DateOnly";
const EXPECTED_LAYOUT: &str = "YYYY-MM-DD";
const END_OF_DAY_NANOS: u32 = 999;

/// Optional calendar date stored as a UTC midnight instant.
///
/// `DateOnly::default()` is the absent value.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateOnly {
    pub time: Option<DateTime<Utc>>,
}

impl DateOnly {
    /// Creates a date at UTC midnight.
    ///
    /// Out-of-range `month`/`day` roll over like a calendar does: month 13
    /// is January of the following year, day 0 is the last day of the
    /// previous month.
    ///
    /// # Range limit
    /// Construction is not infallible: when the normalized date falls
    /// outside chrono's representable range (roughly ±262,000 years), the
    /// result is the **absent** value, not a populated one. Callers taking
    /// years from untrusted input should check `is_zero()` afterwards.
    pub fn new(year: i32, month: u32, day: u32) -> Self {
        let months_from_january = i64::from(month) - 1;
        let year = i64::from(year) + months_from_january.div_euclid(12);
        let month = months_from_january.rem_euclid(12) + 1;

        let date = i32::try_from(year)
            .ok()
            .zip(u32::try_from(month).ok())
            .and_then(|(year, month)| NaiveDate::from_ymd_opt(year, month, 1))
            .and_then(|first| first.checked_add_signed(TimeDelta::days(i64::from(day) - 1)));

        Self {
            time: date.map(midnight_utc),
        }
    }

    /// Wraps a calendar date.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            time: Some(midnight_utc(date)),
        }
    }

    /// Parses JSON-like text: quoted or bare `YYYY-MM-DD`, `null`, or empty.
    ///
    /// # Errors
    /// - Returns `ParseError` when the text is not a strict `YYYY-MM-DD` date.
    pub fn parse_text(input: &str) -> Result<Self, ParseError> {
        match unquote_nullable(input) {
            None => Ok(Self::default()),
            Some(text) => Self::parse_strict(text),
        }
    }

    fn parse_strict(text: &str) -> Result<Self, ParseError> {
        parse_date(text)
            .map(Self::from_date)
            .ok_or_else(|| ParseError::new(TARGET, EXPECTED_LAYOUT, text))
    }

    /// Storage representation: `Null` or `Text("YYYY-MM-DD")`.
    pub fn to_storage_value(&self) -> StorageValue {
        match self.time {
            None => StorageValue::Null,
            Some(instant) => StorageValue::Text(instant.format(DATE_LAYOUT).to_string()),
        }
    }

    /// Loads a value produced by a storage driver.
    ///
    /// Native timestamps are taken as-is; text must be strict `YYYY-MM-DD`.
    ///
    /// # Errors
    /// - `ScanError::Parse` for malformed text.
    /// - `ScanError::Unsupported` for any other non-null shape.
    pub fn from_storage_value(value: &StorageValue) -> Result<Self, ScanError> {
        match value {
            StorageValue::Null => Ok(Self::default()),
            StorageValue::Timestamp(instant) => Ok(Self {
                time: Some(*instant),
            }),
            StorageValue::Text(text) => Ok(Self::parse_strict(text)?),
            other => Err(unsupported(TARGET, other)),
        }
    }

    /// Returns true when unset or holding the zero instant.
    pub fn is_zero(&self) -> bool {
        self.time.map_or(true, |instant| instant == zero_instant())
    }

    pub fn is_before(&self, other: &DateOnly) -> bool {
        matches!((self.time, other.time), (Some(a), Some(b)) if a < b)
    }

    pub fn is_after(&self, other: &DateOnly) -> bool {
        matches!((self.time, other.time), (Some(a), Some(b)) if a > b)
    }

    /// Both present and holding the same instant.
    pub fn equals(&self, other: &DateOnly) -> bool {
        matches!((self.time, other.time), (Some(a), Some(b)) if a == b)
    }

    /// Returns the wrapped instant, or the zero instant when absent.
    pub fn to_time(&self) -> DateTime<Utc> {
        self.time.unwrap_or_else(zero_instant)
    }

    /// Returns a new value shifted by `delta`.
    ///
    /// The result is not re-truncated. Absent input, or an overflowing
    /// shift, yields the absent value.
    pub fn add(&self, delta: TimeDelta) -> DateOnly {
        Self {
            time: self
                .time
                .and_then(|instant| instant.checked_add_signed(delta)),
        }
    }

    /// UTC midnight of the wrapped day, or the zero instant when absent.
    pub fn start_of_day(&self) -> DateTime<Utc> {
        match self.time {
            None => zero_instant(),
            Some(instant) => midnight_utc(instant.date_naive()),
        }
    }

    /// UTC `23:59:59` plus 999 nanoseconds of the wrapped day, or the zero
    /// instant when absent.
    ///
    /// The sub-second part is 999ns, not 999ms; stored range bounds depend
    /// on this exact value.
    pub fn end_of_day(&self) -> DateTime<Utc> {
        self.time
            .and_then(|instant| {
                instant
                    .date_naive()
                    .and_hms_nano_opt(23, 59, 59, END_OF_DAY_NANOS)
            })
            .map(|naive| naive.and_utc())
            .unwrap_or_else(zero_instant)
    }
}

impl Display for DateOnly {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.time {
            None => f.write_str("null"),
            Some(instant) => write!(f, "{}", instant.format(DATE_LAYOUT)),
        }
    }
}

impl FromStr for DateOnly {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_text(s)
    }
}

impl From<NaiveDate> for DateOnly {
    fn from(value: NaiveDate) -> Self {
        Self::from_date(value)
    }
}

impl Serialize for DateOnly {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.time {
            None => serializer.serialize_none(),
            Some(instant) => serializer.collect_str(&instant.format(DATE_LAYOUT)),
        }
    }
}

impl<'de> Deserialize<'de> for DateOnly {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = deserializer.deserialize_option(NullableTextVisitor {
            expecting: "a YYYY-MM-DD date string or null",
        })?;
        match text {
            None => Ok(Self::default()),
            Some(text) => Self::parse_text(&text).map_err(D::Error::custom),
        }
    }
}

impl ToSql for DateOnly {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(to_sql_output(self.to_storage_value()))
    }
}

impl FromSql for DateOnly {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        Self::from_storage_value(&StorageValue::from(value)).map_err(from_sql_error)
    }
}
