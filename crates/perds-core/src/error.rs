//! Validation error type shared by every `perds-*` crate.
//!
//! Entity constructors fail with a `CoreError` at the boundary rather than
//! silently coercing bad input.  Higher crates wrap it via `#[from]`.

use thiserror::Error;

/// Construction-time validation failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    #[error("{kind} must not be blank")]
    BlankId { kind: &'static str },

    #[error("{kind} {value:?} contains invalid character {ch:?}")]
    InvalidIdChar {
        kind:  &'static str,
        value: String,
        ch:    char,
    },

    #[error("incident {0} must require at least one unit type")]
    NoRequiredUnitTypes(String),

    #[error("{field} must be finite and non-negative, got {value}")]
    NegativeOrNonFinite { field: &'static str, value: f64 },

    #[error("{field} must lie in [0, 1], got {value}")]
    OutOfUnitRange { field: &'static str, value: f64 },

    #[error("{0} must be a positive duration")]
    NonPositiveDuration(&'static str),
}

/// Shorthand result type for `perds-core`.
pub type CoreResult<T> = Result<T, CoreError>;
