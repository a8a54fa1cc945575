use thiserror::Error;

/// Errors raised while building a tokenization policy.
///
/// All of these are construction-time failures; once a policy exists,
/// tokenizing never fails.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NormalizeError {
    #[error("unsupported language: {0:?} (supported: en)")]
    UnsupportedLanguage(String),
    #[error("invalid pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
