//! Nullable temporal value types.
//!
//! # Responsibility
//! - Wrap an optional UTC instant with date-only or time-only semantics.
//! - Convert to/from JSON-like text (serde) and storage values (rusqlite).
//!
//! # Invariants
//! - Absence is a value (`time == None`), never an error.
//! - Text layouts are fixed: `YYYY-MM-DD` for dates, `HH:MM` for times.
//!
//! # See also
//! - `StorageValue` for the driver-neutral storage shape.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::{self, Deserializer, Visitor};
use std::fmt::Formatter;

pub mod date_only;
pub mod error;
pub mod storage;
pub mod time_only;

pub use date_only::DateOnly;
pub use error::{ParseError, ScanError};
pub use storage::StorageValue;
pub use time_only::TimeOnly;

/// chrono layout used to render and parse `DateOnly` text.
pub const DATE_LAYOUT: &str = "%Y-%m-%d";
/// chrono layout used to render and parse `TimeOnly` text.
pub const TIME_LAYOUT: &str = "%H:%M";

/// Token accepted by text parsers as an explicit absent value.
const NULL_TOKEN: &str = "null";

// chrono alone accepts unpadded fields and signed years.
static DATE_TEXT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("valid date regex"));
static TIME_TEXT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{2}:[0-9]{2}$").expect("valid time regex"));

static ZERO_INSTANT: Lazy<DateTime<Utc>> = Lazy::new(|| {
    midnight_utc(NaiveDate::from_ymd_opt(1, 1, 1).expect("valid zero instant date"))
});

/// Returns the zero instant, `0001-01-01T00:00:00Z`.
///
/// Absent wrappers report this from `to_time`, `start_of_day` and
/// `end_of_day`, and a wrapper holding it counts as zero.
pub fn zero_instant() -> DateTime<Utc> {
    *ZERO_INSTANT
}

/// Strictly parses `YYYY-MM-DD` into a calendar date.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    if !DATE_TEXT_RE.is_match(text) {
        return None;
    }
    NaiveDate::parse_from_str(text, DATE_LAYOUT).ok()
}

/// Strictly parses `HH:MM` into a clock time with zero seconds.
pub fn parse_clock(text: &str) -> Option<NaiveTime> {
    if !TIME_TEXT_RE.is_match(text) {
        return None;
    }
    NaiveTime::parse_from_str(text, TIME_LAYOUT).ok()
}

pub(crate) fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Strips surrounding quotes and maps `null`/empty input to `None`.
pub(crate) fn unquote_nullable(input: &str) -> Option<&str> {
    let text = input.trim_matches('"');
    if text.is_empty() || text == NULL_TOKEN {
        return None;
    }
    Some(text)
}

/// Accepts a string or null from any self-describing deserializer.
pub(crate) struct NullableTextVisitor {
    pub(crate) expecting: &'static str,
}

impl<'de> Visitor<'de> for NullableTextVisitor {
    type Value = Option<String>;

    fn expecting(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.expecting)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_str(self)
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        Ok(Some(value.to_string()))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<Self::Value, E> {
        Ok(Some(value))
    }
}
