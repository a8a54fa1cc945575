//! Normalization for transformer models pre-trained on tweets.
//!
//! Segmentation is delegated to a [`SocialTextSplitter`]. Around it:
//!
//! - before splitting: typographic apostrophe -> `'`, ellipsis -> `...`
//! - per token: handles -> `@USER`, links -> `HTTPURL`, single characters
//!   through the emoji description table
//! - after re-joining: fixed string repairs for contraction spacing,
//!   `a.m.`/`p.m.`, and digit groups the splitter pulled apart

use std::borrow::Cow;

use regex::Regex;
use tracing::debug;

use crate::config::check_language;
use crate::error::NormalizeError;
use crate::patterns::compile;
use crate::policy::{run_stages, Stage, TokenizationPolicy};
use crate::splitter::{CasualSplitter, SocialTextSplitter};

pub const USER_PLACEHOLDER: &str = "@USER";
pub const URL_PLACEHOLDER: &str = "HTTPURL";

/// Literal rewrites applied, in order, to the space-joined token string.
const SPACING_REPAIRS: &[(&str, &str)] = &[
    ("cannot ", "can not "),
    ("n't ", " n't "),
    ("n 't ", " n't "),
    ("ca n't", "can't"),
    ("ai n't", "ain't"),
    ("'m ", " 'm "),
    ("'re ", " 're "),
    ("'s ", " 's "),
    ("'ll ", " 'll "),
    ("'d ", " 'd "),
    ("'ve ", " 've "),
    (" p . m .", "  p.m."),
    (" p . m ", " p.m "),
    (" a . m .", " a.m."),
    (" a . m ", " a.m "),
];

#[derive(Debug, Clone)]
struct DigitRepairs {
    thousands: Regex,
    fraction: Regex,
    range: Regex,
}

impl DigitRepairs {
    fn compile() -> Result<Self, NormalizeError> {
        Ok(Self {
            thousands: compile(r",([0-9]{2,4}) , ([0-9]{2,4})")?,
            fraction: compile(r"([0-9]{1,3}) / ([0-9]{2,4})")?,
            range: compile(r"([0-9]{1,3})- ([0-9]{2,4})")?,
        })
    }
}

/// Tweet normalizer for model input, generic over its splitter.
///
/// ```rust
/// use normalize::{ModelInputPolicy, TokenizationPolicy};
///
/// let policy = ModelInputPolicy::new("en").unwrap();
/// assert_eq!(
///     policy.tokenize("@bob I don't know http://t.co/x"),
///     vec!["@USER", "I", "do", "n't", "know", "HTTPURL"]
/// );
/// ```
#[derive(Debug)]
pub struct ModelInputPolicy<S = CasualSplitter> {
    splitter: S,
    digits: DigitRepairs,
}

impl ModelInputPolicy<CasualSplitter> {
    pub fn new(language: &str) -> Result<Self, NormalizeError> {
        Self::with_splitter(language, CasualSplitter::new()?)
    }
}

impl<S: SocialTextSplitter + 'static> ModelInputPolicy<S> {
    const PRE_SPLIT: &'static [Stage<Self>] = &[
        Stage { name: "normalize_apostrophes", apply: Self::normalize_apostrophes },
        Stage { name: "normalize_ellipses", apply: Self::normalize_ellipses },
    ];

    const POST_JOIN: &'static [Stage<Self>] = &[
        Stage { name: "repair_spacing", apply: Self::repair_spacing },
        Stage { name: "repair_thousands", apply: Self::repair_thousands },
        Stage { name: "repair_fractions", apply: Self::repair_fractions },
        Stage { name: "repair_ranges", apply: Self::repair_ranges },
    ];

    /// Build with a caller-supplied splitter.
    pub fn with_splitter(language: &str, splitter: S) -> Result<Self, NormalizeError> {
        check_language(language)?;
        let digits = DigitRepairs::compile()?;
        debug!(language, "model_input_policy_built");
        Ok(Self { splitter, digits })
    }

    /// Stage names in execution order.
    pub fn stage_names() -> Vec<&'static str> {
        Self::PRE_SPLIT
            .iter()
            .map(|stage| stage.name)
            .chain(["split", "normalize_tokens", "join"])
            .chain(Self::POST_JOIN.iter().map(|stage| stage.name))
            .chain(["split_whitespace"])
            .collect()
    }

    fn normalize_apostrophes(&self, text: String) -> String {
        if text.contains('\u{2019}') {
            text.replace('\u{2019}', "'")
        } else {
            text
        }
    }

    fn normalize_ellipses(&self, text: String) -> String {
        if text.contains('\u{2026}') {
            text.replace('\u{2026}', "...")
        } else {
            text
        }
    }

    fn repair_spacing(&self, text: String) -> String {
        SPACING_REPAIRS.iter().fold(text, |acc, (from, to)| {
            if acc.contains(from) {
                acc.replace(from, to)
            } else {
                acc
            }
        })
    }

    fn repair_thousands(&self, text: String) -> String {
        self.digits
            .thousands
            .replace_all(&text, ",${1},${2}")
            .into_owned()
    }

    fn repair_fractions(&self, text: String) -> String {
        self.digits
            .fraction
            .replace_all(&text, "${1}/${2}")
            .into_owned()
    }

    fn repair_ranges(&self, text: String) -> String {
        self.digits
            .range
            .replace_all(&text, "${1}-${2}")
            .into_owned()
    }
}

impl<S: SocialTextSplitter + 'static> TokenizationPolicy for ModelInputPolicy<S> {
    fn name(&self) -> &'static str {
        "model_input"
    }

    fn tokenize(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }
        let prepared = run_stages(self, Self::PRE_SPLIT, text);
        let joined = self
            .splitter
            .split(&prepared)
            .iter()
            .map(|token| normalize_token(token))
            .collect::<Vec<_>>()
            .join(" ");
        run_stages(self, Self::POST_JOIN, &joined)
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }
}

/// Per-token placeholder and emoji mapping.
pub fn normalize_token(token: &str) -> Cow<'_, str> {
    if token.starts_with('@') {
        return Cow::Borrowed(USER_PLACEHOLDER);
    }
    let lower = token.to_lowercase();
    if lower.starts_with("http") || lower.starts_with("www") {
        return Cow::Borrowed(URL_PLACEHOLDER);
    }
    let mut chars = token.chars();
    if chars.next().is_some() && chars.next().is_none() {
        return describe_emoji(token);
    }
    Cow::Borrowed(token)
}

/// `😀` -> `:grinning_face:`; anything that is not an emoji is returned as is.
pub fn describe_emoji(text: &str) -> Cow<'_, str> {
    match emojis::get(text) {
        Some(emoji) => {
            let name: String = emoji
                .name()
                .chars()
                .filter(|&c| !matches!(c, ':' | ',' | '.' | '"' | '\u{201c}' | '\u{201d}'))
                .map(|c| if c.is_whitespace() { '_' } else { c })
                .collect();
            Cow::Owned(format!(":{name}:"))
        }
        None => Cow::Borrowed(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(text: &str) -> Vec<String> {
        ModelInputPolicy::new("en").unwrap().tokenize(text)
    }

    /// Splits on whitespace only, so repairs can be observed directly.
    struct WhitespaceSplitter;

    impl SocialTextSplitter for WhitespaceSplitter {
        fn split(&self, text: &str) -> Vec<String> {
            text.split_whitespace().map(str::to_string).collect()
        }
    }

    fn tokenize_ws(text: &str) -> Vec<String> {
        ModelInputPolicy::with_splitter("en", WhitespaceSplitter)
            .unwrap()
            .tokenize(text)
    }

    #[test]
    fn placeholders_and_emoji() {
        assert_eq!(
            tokenize("Hello @bob check www.example.com 😀"),
            vec!["Hello", "@USER", "check", "HTTPURL", ":grinning_face:"]
        );
    }

    #[test]
    fn contraction_spacing() {
        assert_eq!(tokenize("I don't know"), vec!["I", "do", "n't", "know"]);
        assert_eq!(tokenize("I can't go"), vec!["I", "can't", "go"]);
        assert_eq!(tokenize("I cannot go"), vec!["I", "can", "not", "go"]);
    }

    #[test]
    fn typographic_characters_normalized_before_split() {
        assert_eq!(tokenize("I\u{2019}m fine\u{2026}"), vec!["I", "'m", "fine", "..."]);
    }

    #[test]
    fn case_preserved() {
        assert_eq!(tokenize("BIG News"), vec!["BIG", "News"]);
    }

    #[test]
    fn digit_groups_rejoined() {
        assert_eq!(tokenize_ws("it is 10 / 12 now"), vec!["it", "is", "10/12", "now"]);
        assert_eq!(tokenize_ws("open 9- 17 daily"), vec!["open", "9-17", "daily"]);
        assert_eq!(tokenize_ws("paid 1,000 , 000"), vec!["paid", "1,000,000"]);
    }

    #[test]
    fn time_abbreviations_rejoined() {
        assert_eq!(
            tokenize_ws("at 5 p . m . today"),
            vec!["at", "5", "p.m.", "today"]
        );
    }

    #[test]
    fn normalize_token_rules() {
        assert_eq!(normalize_token("@someone"), USER_PLACEHOLDER);
        assert_eq!(normalize_token("HTTPS://x.y"), URL_PLACEHOLDER);
        assert_eq!(normalize_token("a"), "a");
        assert_eq!(normalize_token("word"), "word");
    }

    #[test]
    fn stage_order_is_fixed() {
        assert_eq!(
            ModelInputPolicy::<CasualSplitter>::stage_names(),
            vec![
                "normalize_apostrophes",
                "normalize_ellipses",
                "split",
                "normalize_tokens",
                "join",
                "repair_spacing",
                "repair_thousands",
                "repair_fractions",
                "repair_ranges",
                "split_whitespace",
            ]
        );
    }

    #[test]
    fn rejects_unsupported_language() {
        assert!(matches!(
            ModelInputPolicy::new("es"),
            Err(NormalizeError::UnsupportedLanguage(_))
        ));
    }
}
