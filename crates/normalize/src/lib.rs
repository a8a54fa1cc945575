//! Tokenization policies for social-media post text.
//!
//! Three interchangeable pipelines implement [`TokenizationPolicy`]:
//!
//! - [`StandardPolicy`]: configurable removal of handles, links, hashtags and
//!   the `RT` marker, case folding, contraction expansion, stopwords
//! - [`CorpusStylePolicy`]: GloVe-style tag substitution (`<user>`, `<url>`,
//!   `<hashtag>`, `<allcaps>`, `<elong>`, ...)
//! - [`ModelInputPolicy`]: the normalization expected by transformer models
//!   pre-trained on tweets (`@USER`, `HTTPURL`, emoji descriptions)
//!
//! ## Pure function guarantee
//!
//! Policies do no I/O. Patterns and the contraction table are compiled once
//! when a policy is built and only read afterwards, so a single instance can
//! be shared across threads without locking. The same text and the same
//! configuration always yield the same tokens.
//!
//! ## Stage order
//!
//! Each policy is an explicit, ordered list of whole-string rewrites. Moving a
//! stage changes the output (lowercasing before the all-caps stage would
//! erase every `<allcaps>` tag), so the order is fixed and exposed through
//! each policy's `stage_names()`.
//!
//! ```rust
//! use normalize::{build_policy, PolicyConfig, PolicyKind};
//!
//! let config = PolicyConfig::default().with_remove_lone_digits(true);
//! let policy = build_policy(PolicyKind::Standard, &config).unwrap();
//! assert_eq!(policy.tokenize("luv 4 u"), vec!["luv", "u"]);
//! ```

mod config;
mod contractions;
mod corpus;
mod error;
mod model_input;
mod patterns;
mod policy;
mod splitter;
mod standard;

pub use crate::config::{
    check_language, PolicyConfig, PolicyKind, DEFAULT_TOKEN_PATTERN, SUPPORTED_LANGUAGES,
};
pub use crate::contractions::ContractionTable;
pub use crate::corpus::CorpusStylePolicy;
pub use crate::error::NormalizeError;
pub use crate::model_input::{
    describe_emoji, normalize_token, ModelInputPolicy, URL_PLACEHOLDER, USER_PLACEHOLDER,
};
pub use crate::patterns::{collapse_elongations, HandleMatcher};
pub use crate::policy::{build_policy, TokenizationPolicy};
pub use crate::splitter::{CasualSplitter, SocialTextSplitter};
pub use crate::standard::StandardPolicy;
