//! Post records and content extraction.
//!
//! A [`PostRecord`] is one decoded social-media post: its text, the
//! `truncated` flag with the full body in `extended_text`, hashtag and link
//! entities, and optionally a quoted and a reposted post of the same shape.
//!
//! The extractors ([`extract_text`], [`extract_hashtags`], [`extract_urls`])
//! share one selection rule, so a policy always sees the same body the entity
//! lists were computed over. They never modify the record.
//!
//! ```
//! use record::{extract_hashtags, extract_text, PostRecord};
//! use serde_json::json;
//!
//! let post = PostRecord::from_json(json!({
//!     "text": "Loving the #RustLang meetup",
//!     "entities": { "hashtags": [{ "text": "RustLang" }] }
//! }))
//! .unwrap();
//!
//! assert_eq!(extract_text(&post, false).unwrap(), "Loving the #RustLang meetup");
//! assert_eq!(extract_hashtags(&post, false), vec!["RustLang"]);
//! ```

mod error;
mod extract;
mod types;

pub use crate::error::RecordError;
pub use crate::extract::{extract_hashtags, extract_text, extract_urls};
pub use crate::types::{Entities, ExtendedText, HashtagEntity, PostRecord, UrlEntity};
