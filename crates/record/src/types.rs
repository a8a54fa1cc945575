//! Post record data model.
//!
//! Only the fields the extractor reads are typed. Everything else in a decoded
//! record is kept in [`PostRecord::extra`] so a record can be read, inspected
//! and written back without losing data.
//!
//! ```text
//! PostRecord
//! ├── text: Option<String>
//! ├── truncated: bool
//! ├── extended_text: Option<ExtendedText>     (alias "extended_tweet")
//! │   ├── full_text: String
//! │   └── entities: Option<Entities>
//! ├── entities: Entities
//! │   ├── hashtags: [HashtagEntity { text }]
//! │   └── urls: [UrlEntity { url, expanded_url, display_url }]
//! ├── quoted_post: Option<Box<PostRecord>>    (alias "quoted_status")
//! ├── reposted_post: Option<Box<PostRecord>>  (alias "retweeted_status")
//! └── extra: Map<String, Value>
//! ```
//!
//! The aliases accept the field names used by the public Twitter v1.1 payload.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::RecordError;

/// One decoded social-media post.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// `text` is abbreviated; the full body lives in `extended_text`.
    #[serde(default)]
    pub truncated: bool,

    #[serde(
        default,
        alias = "extended_tweet",
        skip_serializing_if = "Option::is_none"
    )]
    pub extended_text: Option<ExtendedText>,

    #[serde(default)]
    pub entities: Entities,

    #[serde(
        default,
        alias = "quoted_status",
        skip_serializing_if = "Option::is_none"
    )]
    pub quoted_post: Option<Box<PostRecord>>,

    #[serde(
        default,
        alias = "retweeted_status",
        skip_serializing_if = "Option::is_none"
    )]
    pub reposted_post: Option<Box<PostRecord>>,

    /// Fields the extractor does not interpret (ids, user, timestamps...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PostRecord {
    /// Plain, non-truncated post with no entities.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Decode a record from an already-parsed JSON value.
    ///
    /// ```rust
    /// use record::PostRecord;
    /// use serde_json::json;
    ///
    /// let post = PostRecord::from_json(json!({
    ///     "text": "short...",
    ///     "truncated": true,
    ///     "extended_tweet": { "full_text": "short but actually long" }
    /// }))
    /// .unwrap();
    /// assert_eq!(post.extended_text.unwrap().full_text, "short but actually long");
    /// ```
    pub fn from_json(value: Value) -> Result<Self, RecordError> {
        if !value.is_object() {
            return Err(RecordError::malformed(format!(
                "expected a JSON object, found {}",
                json_kind(&value)
            )));
        }
        serde_json::from_value(value).map_err(|err| RecordError::malformed(err.to_string()))
    }

    /// Decode one line of a line-delimited record stream.
    pub fn from_json_str(line: &str) -> Result<Self, RecordError> {
        let value: Value =
            serde_json::from_str(line).map_err(|err| RecordError::malformed(err.to_string()))?;
        Self::from_json(value)
    }
}

/// Full body of a truncated post.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtendedText {
    pub full_text: String,

    /// Entities computed over `full_text`; the top-level entities only cover
    /// the abbreviated `text`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entities: Option<Entities>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entities {
    #[serde(default)]
    pub hashtags: Vec<HashtagEntity>,
    #[serde(default)]
    pub urls: Vec<UrlEntity>,
}

/// A hashtag annotation. `text` carries the tag body without `#`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashtagEntity {
    pub text: String,
}

/// A link annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlEntity {
    /// Shortened link as it appears in the text.
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expanded_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_url: Option<String>,
}

impl UrlEntity {
    /// The expanded link, or the short link when no expansion was recorded.
    pub fn resolved(&self) -> &str {
        self.expanded_url.as_deref().unwrap_or(&self.url)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn twitter_field_names_accepted() {
        let post = PostRecord::from_json(json!({
            "id_str": "42",
            "text": "RT @a: hi",
            "retweeted_status": { "text": "hi" },
            "quoted_status": { "text": "quoted" }
        }))
        .unwrap();
        assert_eq!(post.reposted_post.unwrap().text.as_deref(), Some("hi"));
        assert_eq!(post.quoted_post.unwrap().text.as_deref(), Some("quoted"));
        assert_eq!(post.extra.get("id_str"), Some(&json!("42")));
    }

    #[test]
    fn missing_entities_default_to_empty() {
        let post = PostRecord::from_json(json!({ "text": "plain" })).unwrap();
        assert!(post.entities.hashtags.is_empty());
        assert!(post.entities.urls.is_empty());
        assert!(!post.truncated);
    }

    #[test]
    fn non_object_rejected() {
        let err = PostRecord::from_json(json!(["not", "a", "post"])).unwrap_err();
        assert_eq!(
            err,
            RecordError::MalformedRecord {
                reason: "expected a JSON object, found an array".into()
            }
        );
    }

    #[test]
    fn wrongly_typed_field_rejected() {
        assert!(PostRecord::from_json(json!({ "text": 7 })).is_err());
        assert!(PostRecord::from_json_str("{not json").is_err());
    }

    #[test]
    fn url_entity_resolution() {
        let short = UrlEntity {
            url: "https://t.co/x".into(),
            expanded_url: None,
            display_url: None,
        };
        assert_eq!(short.resolved(), "https://t.co/x");
        let full = UrlEntity {
            expanded_url: Some("https://example.com/page".into()),
            ..short
        };
        assert_eq!(full.resolved(), "https://example.com/page");
    }

    #[test]
    fn unknown_fields_survive_round_trip() {
        let value = json!({ "text": "a", "truncated": false, "lang": "en", "entities": {"hashtags": [], "urls": []} });
        let post = PostRecord::from_json(value.clone()).unwrap();
        assert_eq!(serde_json::to_value(&post).unwrap(), value);
    }
}
