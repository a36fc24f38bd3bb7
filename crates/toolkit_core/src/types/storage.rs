//! Driver-neutral storage values and the SQLite bridge.
//!
//! # Responsibility
//! - Describe the shapes a relational driver can hand to a wrapper.
//! - Map those shapes onto rusqlite `Value`/`ValueRef`.
//!
//! # Invariants
//! - Wrappers only ever write `Null` or `Text`.
//! - SQLite has no native timestamp, so `Timestamp` never comes out of it.

use super::error::ScanError;
use chrono::{DateTime, SecondsFormat, Utc};
use log::warn;
use rusqlite::types::{FromSqlError, ToSqlOutput, Value, ValueRef};

/// A single column value as a storage driver sees it.
#[derive(Debug, Clone, PartialEq)]
pub enum StorageValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
    /// Native temporal value for drivers that have one.
    Timestamp(DateTime<Utc>),
}

impl StorageValue {
    /// Descriptive type name used in scan errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Integer(_) => "integer",
            Self::Real(_) => "real",
            Self::Text(_) => "text",
            Self::Blob(_) => "blob",
            Self::Timestamp(_) => "timestamp",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<ValueRef<'_>> for StorageValue {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => Self::Null,
            ValueRef::Integer(v) => Self::Integer(v),
            ValueRef::Real(v) => Self::Real(v),
            ValueRef::Text(bytes) => match std::str::from_utf8(bytes) {
                Ok(text) => Self::Text(text.to_string()),
                Err(_) => Self::Blob(bytes.to_vec()),
            },
            ValueRef::Blob(bytes) => Self::Blob(bytes.to_vec()),
        }
    }
}

impl From<StorageValue> for Value {
    fn from(value: StorageValue) -> Self {
        match value {
            StorageValue::Null => Value::Null,
            StorageValue::Integer(v) => Value::Integer(v),
            StorageValue::Real(v) => Value::Real(v),
            StorageValue::Text(text) => Value::Text(text),
            StorageValue::Blob(bytes) => Value::Blob(bytes),
            StorageValue::Timestamp(instant) => {
                Value::Text(instant.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
        }
    }
}

pub(crate) fn to_sql_output(value: StorageValue) -> ToSqlOutput<'static> {
    ToSqlOutput::Owned(value.into())
}

pub(crate) fn unsupported(target: &'static str, value: &StorageValue) -> ScanError {
    warn!(
        "event=storage_scan module=types status=error target={} error_code=unsupported_type type={}",
        target,
        value.type_name()
    );
    ScanError::Unsupported {
        target,
        type_name: value.type_name(),
    }
}

pub(crate) fn from_sql_error(err: ScanError) -> FromSqlError {
    FromSqlError::Other(Box::new(err))
}
