//! Nullable date/time value types and a form validation helper.

pub mod logging;
pub mod types;
pub mod validation;

pub use logging::{default_log_level, init_logging, logging_status};
pub use types::{DateOnly, ParseError, ScanError, StorageValue, TimeOnly};
pub use validation::{Field, FormData, FormRequest, Validation};

/// Minimal health-check API for linkage probes.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
