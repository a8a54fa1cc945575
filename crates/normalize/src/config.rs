//! Configuration types for the tokenization policies.
//!
//! [`PolicyConfig`] is the single, immutable value object every policy is
//! built from. Once a policy has been constructed its configuration is never
//! touched again, which is what makes tokenization reproducible: the same text
//! and the same config always yield the same tokens.
//!
//! # Examples
//!
//! ```rust
//! use normalize::PolicyConfig;
//!
//! let config = PolicyConfig::default();
//! assert_eq!(config.language, "en");
//! assert!(config.lowercase);
//! assert!(config.expand_contractions);
//! assert!(!config.remove_hashtags);
//! ```
//!
//! ```rust
//! use normalize::PolicyConfig;
//!
//! let config = PolicyConfig::default()
//!     .with_remove_lone_digits(true)
//!     .with_stopwords(["the", "a"]);
//! assert!(config.stopwords.as_ref().unwrap().contains("the"));
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::NormalizeError;

/// Language codes with a contraction table and tuned patterns.
pub const SUPPORTED_LANGUAGES: &[&str] = &["en"];

/// Default token boundary: runs of word characters.
pub const DEFAULT_TOKEN_PATTERN: &str = r"\b\w+\b";

/// Fails fast when `language` has no support in this crate.
pub fn check_language(language: &str) -> Result<(), NormalizeError> {
    if SUPPORTED_LANGUAGES.contains(&language) {
        Ok(())
    } else {
        Err(NormalizeError::UnsupportedLanguage(language.to_string()))
    }
}

/// Construction-time settings shared by all tokenization policies.
///
/// Not every policy reads every field. The corpus-style and model-input
/// policies have fixed pipelines and only honor `language`; the standard
/// policy honors all of them.
///
/// # Serialization
///
/// ```json
/// {
///   "language": "en",
///   "token_boundary_pattern": "\\b\\w+\\b",
///   "lowercase": true,
///   "remove_hashtags": false,
///   "expand_contractions": true,
///   "remove_lone_digits": false,
///   "include_nested_content": false,
///   "username_replacement": " ",
///   "url_replacement": " ",
///   "stopwords": null
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PolicyConfig {
    /// Language code. Only `"en"` is accepted.
    pub language: String,

    /// Regular expression whose matches become tokens.
    ///
    /// Useful alternatives:
    ///
    /// ```text
    /// \b\w+\b            word characters (default)
    /// \p{L}+             letters only
    /// [\p{L}\p{N}]+      letters and numbers
    /// \p{L}[\p{L}\p{N}]+ starts with a letter, may contain numbers
    /// ```
    ///
    /// A pattern that fails to compile is rejected when the policy is built,
    /// not on first use.
    pub token_boundary_pattern: String,

    /// Case-fold the whole post before contraction expansion.
    pub lowercase: bool,

    /// Drop `#tag` occurrences entirely instead of keeping the tag body.
    pub remove_hashtags: bool,

    /// Rewrite contractions (`can't` -> `can not`). The table only holds
    /// lowercase keys, so this is effectively a no-op without `lowercase`.
    pub expand_contractions: bool,

    /// Drop tokens made only of digits (`4` in `luv 4 u`).
    pub remove_lone_digits: bool,

    /// Append quoted and reposted text to the primary body when extracting
    /// content from a record.
    pub include_nested_content: bool,

    /// Substituted for `@handle` mentions. Non-blank values survive as
    /// single tokens.
    pub username_replacement: String,

    /// Substituted for `http(s)://` links. Non-blank values survive as
    /// single tokens.
    pub url_replacement: String,

    /// Tokens to drop after extraction. `None` keeps everything.
    pub stopwords: Option<BTreeSet<String>>,
}

impl PolicyConfig {
    /// Create a configuration with the default settings.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_token_boundary_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.token_boundary_pattern = pattern.into();
        self
    }

    pub fn with_lowercase(mut self, lowercase: bool) -> Self {
        self.lowercase = lowercase;
        self
    }

    pub fn with_remove_hashtags(mut self, remove: bool) -> Self {
        self.remove_hashtags = remove;
        self
    }

    pub fn with_expand_contractions(mut self, expand: bool) -> Self {
        self.expand_contractions = expand;
        self
    }

    pub fn with_remove_lone_digits(mut self, remove: bool) -> Self {
        self.remove_lone_digits = remove;
        self
    }

    pub fn with_include_nested_content(mut self, include: bool) -> Self {
        self.include_nested_content = include;
        self
    }

    pub fn with_username_replacement(mut self, replacement: impl Into<String>) -> Self {
        self.username_replacement = replacement.into();
        self
    }

    pub fn with_url_replacement(mut self, replacement: impl Into<String>) -> Self {
        self.url_replacement = replacement.into();
        self
    }

    /// Set the stopword list. Duplicates collapse.
    pub fn with_stopwords<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stopwords = Some(words.into_iter().map(Into::into).collect());
        self
    }

    /// Validate the settings that do not need regex compilation.
    pub fn validate(&self) -> Result<(), NormalizeError> {
        check_language(&self.language)?;
        if self.token_boundary_pattern.trim().is_empty() {
            return Err(NormalizeError::InvalidConfig(
                "token_boundary_pattern must not be empty".into(),
            ));
        }
        Ok(())
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            token_boundary_pattern: DEFAULT_TOKEN_PATTERN.to_string(),
            lowercase: true,
            remove_hashtags: false,
            expand_contractions: true,
            remove_lone_digits: false,
            include_nested_content: false,
            username_replacement: " ".to_string(),
            url_replacement: " ".to_string(),
            stopwords: None,
        }
    }
}

/// Selects one of the fixed tokenization pipelines.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    /// Configurable removal/case-folding/contraction pipeline.
    #[default]
    Standard,
    /// GloVe-style tag substitution (`<user>`, `<hashtag>`, `<allcaps>`, ...).
    CorpusStyle,
    /// Pre-processing for transformer models trained on tweets.
    ModelInput,
}

impl PolicyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyKind::Standard => "standard",
            PolicyKind::CorpusStyle => "corpus_style",
            PolicyKind::ModelInput => "model_input",
        }
    }
}
