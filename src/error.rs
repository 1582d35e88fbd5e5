//! Error types for label generation

use thiserror::Error;

/// Errors raised while resolving or laying out a single label.
///
/// Fatal to that label only; batch callers keep going with the next row.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LabelError {
    /// A size or multiplier is outside its valid range
    #[error("invalid configuration: {field} {reason} (got {value})")]
    InvalidConfig {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// Content that cannot be drawn, e.g. a water level above 4
    #[error("invalid content: {field} {reason}")]
    InvalidContent { field: &'static str, reason: String },
}
