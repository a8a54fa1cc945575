//! Text and entity extraction with the truncated/nested merge rule.
//!
//! All three extractors pick a record's primary source the same way:
//! `truncated` selects `extended_text`, otherwise `text`. With
//! `include_nested`, the quoted and then the reposted post are resolved with
//! the same rule and appended after the primary one. Nested posts are only
//! followed one level deep, matching how the platform embeds them.

use tracing::debug;

use crate::error::RecordError;
use crate::types::{Entities, PostRecord};

/// Primary body of `record`, optionally followed by quoted and reposted text.
///
/// ```rust
/// use record::{extract_text, PostRecord};
///
/// let mut post = PostRecord::from_text("my take");
/// post.quoted_post = Some(Box::new(PostRecord::from_text("their take")));
/// assert_eq!(extract_text(&post, false).unwrap(), "my take");
/// assert_eq!(extract_text(&post, true).unwrap(), "my take their take");
/// ```
pub fn extract_text(record: &PostRecord, include_nested: bool) -> Result<String, RecordError> {
    let mut text = primary_text(record)?.to_string();
    if include_nested {
        for nested in nested_posts(record) {
            text.push(' ');
            text.push_str(primary_text(nested)?);
        }
    }
    Ok(text)
}

/// Hashtag bodies (without `#`) in source order.
pub fn extract_hashtags(record: &PostRecord, include_nested: bool) -> Vec<String> {
    collect_entities(record, include_nested, |entities| {
        entities.hashtags.iter().map(|tag| tag.text.clone()).collect()
    })
}

/// Link targets in source order, expanded where the record has an expansion.
pub fn extract_urls(record: &PostRecord, include_nested: bool) -> Vec<String> {
    collect_entities(record, include_nested, |entities| {
        entities
            .urls
            .iter()
            .map(|url| url.resolved().to_string())
            .collect()
    })
}

fn primary_text(record: &PostRecord) -> Result<&str, RecordError> {
    let extended = record.extended_text.as_ref().map(|ext| ext.full_text.as_str());
    let text = record.text.as_deref();
    let (preferred, fallback, fallback_field) = if record.truncated {
        (extended, text, "text")
    } else {
        (text, extended, "extended_text")
    };

    match (preferred, fallback) {
        (Some(body), _) => Ok(body),
        (None, Some(body)) => {
            debug!(
                truncated = record.truncated,
                field = fallback_field,
                "primary_text_fallback"
            );
            Ok(body)
        }
        (None, None) => Err(RecordError::malformed(
            "record has neither text nor extended_text",
        )),
    }
}

/// Entities matching the body [`primary_text`] reads.
fn primary_entities(record: &PostRecord) -> &Entities {
    if record.truncated {
        if let Some(entities) = record
            .extended_text
            .as_ref()
            .and_then(|ext| ext.entities.as_ref())
        {
            return entities;
        }
    }
    &record.entities
}

fn nested_posts(record: &PostRecord) -> impl Iterator<Item = &PostRecord> {
    [record.quoted_post.as_deref(), record.reposted_post.as_deref()]
        .into_iter()
        .flatten()
}

fn collect_entities<F>(record: &PostRecord, include_nested: bool, pick: F) -> Vec<String>
where
    F: Fn(&Entities) -> Vec<String>,
{
    let mut out = pick(primary_entities(record));
    if include_nested {
        for nested in nested_posts(record) {
            out.extend(pick(primary_entities(nested)));
        }
    }
    out
}
