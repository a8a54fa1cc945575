//! Word/punctuation segmentation for informal social text.
//!
//! [`SocialTextSplitter`] is the seam the model-input policy delegates to.
//! [`CasualSplitter`] is the default: one ordered alternation in the style of
//! the casual tweet tokenizers (URLs, phone numbers, emoticons, HTML tags,
//! arrows, handles, hashtags, e-mail addresses, words, numbers, ellipses, then
//! any other single non-space character). Earlier alternatives win, so their
//! order matters as much as the patterns themselves.

use std::sync::Arc;

use regex::{Captures, Regex};

use crate::error::NormalizeError;
use crate::patterns::compile;

/// Splits text into word and punctuation tokens.
pub trait SocialTextSplitter: Send + Sync {
    fn split(&self, text: &str) -> Vec<String>;
}

impl<S: SocialTextSplitter + ?Sized> SocialTextSplitter for Arc<S> {
    fn split(&self, text: &str) -> Vec<String> {
        (**self).split(text)
    }
}

const URLS: &str = concat!(
    r"(?:https?://|www\d{0,3}[.]|[a-z0-9.\-]+[.][a-z]{2,4}/)",
    r"(?:[^\s()<>{}\[\]]+|\([^\s()]*?\([^\s()]+\)[^\s()]*?\)|\([^\s]+?\))+",
    r"(?:\([^\s()]*?\([^\s()]+\)[^\s()]*?\)|\([^\s]+?\)|[^\s`!()\[\]{};:'.,<>?«»“”‘’])",
);

const PHONE: &str = r"(?:(?:\+?[01][ *\-.\)]*)?(?:\(?\d{3}[ *\-.\)]*)?\d{3}[ *\-.\)]*\d{4})";

const EMOTICONS: &str = concat!(
    r"(?:[<>]?[:;=8][\-o*']?[\)\]\(\[dDpP/:\}\{@\|\\]",
    r"|[\)\]\(\[dDpP/:\}\{@\|\\][\-o*']?[:;=8][<>]?",
    r"|</?3)",
);

const HTML_TAG: &str = r"<[^>\s]+>";
const ARROWS: &str = r"[\-]+>|<[\-]+";
const HANDLE: &str = r"(?:@[\w_]+)";
const HASHTAG: &str = r"(?:#+[\w_]+[\w'_\-]*[\w_]+)";
const EMAIL: &str = r"[\w.+\-]+@[\w\-]+\.(?:[\w\-]\.?)+[\w\-]";
const WORD_WITH_JOINERS: &str = r"(?:[^\W\d_](?:[^\W\d_]|['\-_])+[^\W\d_])";
const NUMBER: &str = r"(?:[+\-]?\d+[,/.:\-]\d+[+\-]?)";
const WORD: &str = r"(?:[\w_]+)";
const ELLIPSIS: &str = r"(?:\.(?:\s*\.)+)";
const OTHER: &str = r"(?:\S)";

/// Default casual-text splitter.
///
/// Before matching, HTML entities are unescaped and runs of four or more of
/// the same non-alphanumeric character are shortened to three.
///
/// ```rust
/// use normalize::{CasualSplitter, SocialTextSplitter};
///
/// let splitter = CasualSplitter::new().unwrap();
/// assert_eq!(
///     splitter.split("@bob that's great :-) &amp; more"),
///     vec!["@bob", "that's", "great", ":-)", "&", "more"]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct CasualSplitter {
    word_re: Regex,
    entity_re: Regex,
}

impl CasualSplitter {
    pub fn new() -> Result<Self, NormalizeError> {
        let alternation = [
            URLS,
            PHONE,
            EMOTICONS,
            HTML_TAG,
            ARROWS,
            HANDLE,
            HASHTAG,
            EMAIL,
            WORD_WITH_JOINERS,
            NUMBER,
            WORD,
            ELLIPSIS,
            OTHER,
        ]
        .join("|");
        Ok(Self {
            word_re: compile(&format!("(?i){alternation}"))?,
            entity_re: compile(r"&(#?)(x?)([^&;\s]+);")?,
        })
    }

    /// Decode `&amp;`-style and numeric entities; unknown ones are kept.
    pub fn unescape_entities(&self, text: &str) -> String {
        if !text.contains('&') {
            return text.to_string();
        }
        self.entity_re
            .replace_all(text, |caps: &Captures| {
                decode_entity(&caps[1], &caps[2], &caps[3])
                    .map(String::from)
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }
}

impl SocialTextSplitter for CasualSplitter {
    fn split(&self, text: &str) -> Vec<String> {
        let text = shorten_hanging_runs(&self.unescape_entities(text));
        self.word_re
            .find_iter(&text)
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

fn decode_entity(numeric: &str, hex: &str, body: &str) -> Option<char> {
    if numeric.is_empty() {
        return match body {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            "nbsp" => Some('\u{a0}'),
            _ => None,
        };
    }
    let radix = if hex.is_empty() { 10 } else { 16 };
    let code = u32::from_str_radix(body, radix).ok()?;
    // Windows-1252 bytes show up as numeric entities in scraped text.
    let code = if (0x80..=0x9f).contains(&code) {
        windows_1252(code as u8)?
    } else {
        code
    };
    char::from_u32(code)
}

fn windows_1252(byte: u8) -> Option<u32> {
    let mapped = match byte {
        0x80 => 0x20AC,
        0x82 => 0x201A,
        0x83 => 0x0192,
        0x84 => 0x201E,
        0x85 => 0x2026,
        0x86 => 0x2020,
        0x87 => 0x2021,
        0x88 => 0x02C6,
        0x89 => 0x2030,
        0x8A => 0x0160,
        0x8B => 0x2039,
        0x8C => 0x0152,
        0x8E => 0x017D,
        0x91 => 0x2018,
        0x92 => 0x2019,
        0x93 => 0x201C,
        0x94 => 0x201D,
        0x95 => 0x2022,
        0x96 => 0x2013,
        0x97 => 0x2014,
        0x98 => 0x02DC,
        0x99 => 0x2122,
        0x9A => 0x0161,
        0x9B => 0x203A,
        0x9C => 0x0153,
        0x9E => 0x017E,
        0x9F => 0x0178,
        _ => return None,
    };
    Some(mapped)
}

/// Cap runs of one non-alphanumeric character at three (`!!!!!!` -> `!!!`).
fn shorten_hanging_runs(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev: Option<char> = None;
    let mut run = 0usize;
    for ch in text.chars() {
        if Some(ch) == prev {
            run += 1;
        } else {
            prev = Some(ch);
            run = 1;
        }
        if run > 3 && !ch.is_ascii_alphanumeric() {
            continue;
        }
        out.push(ch);
    }
    out
}
