//! Error types for nullable temporal values.
//!
//! # Invariants
//! - Absence (`null`) is never reported through these types.
//! - `ScanError::Unsupported` always names the rejected storage shape.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Malformed text handed to a date/time parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Wrapper type that rejected the input, e.g. `DateOnly`.
    pub target: &'static str,
    /// Human-readable layout the input had to follow.
    pub layout: &'static str,
    /// The rejected text, verbatim.
    pub input: String,
}

impl ParseError {
    pub(crate) fn new(target: &'static str, layout: &'static str, input: &str) -> Self {
        Self {
            target,
            layout,
            input: input.to_string(),
        }
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "cannot parse `{}` as {}: expected {}",
            self.input, self.target, self.layout
        )
    }
}

impl Error for ParseError {}

/// Storage value that could not be loaded into a wrapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    Unsupported {
        target: &'static str,
        type_name: &'static str,
    },
    Parse(ParseError),
}

impl Display for ScanError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unsupported { target, type_name } => {
                write!(f, "unsupported type for {target}: {type_name}")
            }
            Self::Parse(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ScanError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Unsupported { .. } => None,
            Self::Parse(err) => Some(err),
        }
    }
}

impl From<ParseError> for ScanError {
    fn from(value: ParseError) -> Self {
        Self::Parse(value)
    }
}
