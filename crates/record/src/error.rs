//! Error types produced by the record crate.

use thiserror::Error;

/// Errors raised while reading a post record.
///
/// Cloneable and comparable so batch callers can keep per-record failures
/// next to successful results and assert on them in tests.
///
/// ```rust
/// use record::RecordError;
///
/// let err = RecordError::MalformedRecord {
///     reason: "record has neither text nor extended_text".into(),
/// };
/// assert!(err.to_string().contains("neither text"));
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RecordError {
    /// The record cannot supply a primary body, or is not a post at all.
    #[error("malformed post record: {reason}")]
    MalformedRecord { reason: String },
}

impl RecordError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        RecordError::MalformedRecord {
            reason: reason.into(),
        }
    }
}
