//! GloVe-style tweet preprocessing.
//!
//! Reproduces the normalization used to build the public Twitter GloVe
//! vectors: URLs, mentions, numbers, emoticons and hashtags become literal
//! tags, shouting and elongation are marked, then everything is lowercased
//! and split on whitespace.
//!
//! Tag substitution runs before case folding because the hashtag and
//! all-caps stages look at the original casing. URL, emoticon and mention
//! substitution run before the number and punctuation stages so those never
//! fire inside a link.

use regex::{Captures, NoExpand};
use tracing::debug;

use crate::config::check_language;
use crate::error::NormalizeError;
use crate::patterns::{collapse_elongations, CorpusPatterns};
use crate::policy::{run_stages, Stage, TokenizationPolicy};

const STAGES: &[Stage<CorpusStylePolicy>] = &[
    Stage { name: "replace_urls", apply: CorpusStylePolicy::replace_urls },
    Stage { name: "replace_emoticons", apply: CorpusStylePolicy::replace_emoticons },
    Stage { name: "split_slashes", apply: CorpusStylePolicy::split_slashes },
    Stage { name: "replace_users", apply: CorpusStylePolicy::replace_users },
    Stage { name: "replace_numbers", apply: CorpusStylePolicy::replace_numbers },
    Stage { name: "expand_hashtags", apply: CorpusStylePolicy::expand_hashtags },
    Stage { name: "mark_repeats", apply: CorpusStylePolicy::mark_repeats },
    Stage { name: "mark_elongations", apply: CorpusStylePolicy::mark_elongations },
    Stage { name: "mark_allcaps", apply: CorpusStylePolicy::mark_allcaps },
    Stage { name: "lowercase", apply: CorpusStylePolicy::lowercase },
];

pub const URL_TAG: &str = "<url>";
pub const USER_TAG: &str = "<user>";
pub const NUMBER_TAG: &str = "<number>";
pub const HASHTAG_TAG: &str = "<hashtag>";
pub const ALLCAPS_TAG: &str = "<allcaps>";
pub const REPEAT_TAG: &str = "<repeat>";
pub const ELONG_TAG: &str = "<elong>";

/// Fixed GloVe-style pipeline. Only the language is configurable.
///
/// ```rust
/// use normalize::{CorpusStylePolicy, TokenizationPolicy};
///
/// let policy = CorpusStylePolicy::new("en").unwrap();
/// assert_eq!(policy.tokenize("hellooooooo"), vec!["hello", "<elong>"]);
/// ```
#[derive(Debug)]
pub struct CorpusStylePolicy {
    patterns: CorpusPatterns,
}

impl CorpusStylePolicy {
    pub fn new(language: &str) -> Result<Self, NormalizeError> {
        check_language(language)?;
        let patterns = CorpusPatterns::compile()?;
        debug!(language, "corpus_style_policy_built");
        Ok(Self { patterns })
    }

    /// Stage names in execution order, followed by the whitespace split.
    pub fn stage_names() -> Vec<&'static str> {
        STAGES
            .iter()
            .map(|stage| stage.name)
            .chain(["split_whitespace"])
            .collect()
    }

    /// Run all string stages, stopping short of the final split.
    pub fn rewrite(&self, text: &str) -> String {
        run_stages(self, STAGES, text)
    }

    fn replace_urls(&self, text: String) -> String {
        self.patterns
            .url
            .replace_all(&text, NoExpand(URL_TAG))
            .into_owned()
    }

    fn replace_emoticons(&self, text: String) -> String {
        self.patterns.emoticons.iter().fold(text, |acc, class| {
            class
                .pattern
                .replace_all(&acc, NoExpand(class.tag))
                .into_owned()
        })
    }

    fn split_slashes(&self, text: String) -> String {
        if text.contains('/') {
            text.replace('/', " / ")
        } else {
            text
        }
    }

    fn replace_users(&self, text: String) -> String {
        self.patterns
            .user
            .replace_all(&text, NoExpand(USER_TAG))
            .into_owned()
    }

    fn replace_numbers(&self, text: String) -> String {
        self.patterns
            .number
            .replace_all(&text, NoExpand(NUMBER_TAG))
            .into_owned()
    }

    fn expand_hashtags(&self, text: String) -> String {
        self.patterns
            .hashtag
            .replace_all(&text, |caps: &Captures| expand_hashtag(&caps[0][1..]))
            .into_owned()
    }

    fn mark_repeats(&self, text: String) -> String {
        self.patterns
            .repeat
            .replace_all(&text, format!("${{1}} {REPEAT_TAG}").as_str())
            .into_owned()
    }

    fn mark_elongations(&self, text: String) -> String {
        collapse_elongations(&text, &format!(" {ELONG_TAG}"))
    }

    fn mark_allcaps(&self, text: String) -> String {
        self.patterns
            .allcaps
            .replace_all(&text, |caps: &Captures| {
                format!("{} {ALLCAPS_TAG}", caps[0].to_lowercase())
            })
            .into_owned()
    }

    fn lowercase(&self, text: String) -> String {
        text.to_lowercase()
    }
}

impl TokenizationPolicy for CorpusStylePolicy {
    fn name(&self) -> &'static str {
        "corpus_style"
    }

    fn tokenize(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }
        self.rewrite(text)
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }
}

/// `<hashtag> body <allcaps>` for shouted tags, otherwise the body split at
/// each ASCII capital (`splitMe` -> `split me`).
fn expand_hashtag(body: &str) -> String {
    if is_all_upper(body) {
        return format!("{HASHTAG_TAG} {} {ALLCAPS_TAG}", body.to_lowercase());
    }
    let mut out = String::from(HASHTAG_TAG);
    let mut word = String::new();
    for ch in body.chars() {
        if ch.is_ascii_uppercase() && !word.is_empty() {
            out.push(' ');
            out.push_str(&word.to_lowercase());
            word.clear();
        }
        word.push(ch);
    }
    if !word.is_empty() {
        out.push(' ');
        out.push_str(&word.to_lowercase());
    }
    out
}

/// At least one cased character, and none of them lowercase.
fn is_all_upper(text: &str) -> bool {
    text.chars().any(char::is_uppercase) && !text.chars().any(char::is_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(text: &str) -> Vec<String> {
        CorpusStylePolicy::new("en").unwrap().tokenize(text)
    }

    #[test]
    fn allcaps_runs_tagged() {
        assert_eq!(tokenize("OMG HAPPY"), vec!["omg", "<allcaps>", "happy", "<allcaps>"]);
    }

    #[test]
    fn hashtags_split_on_case() {
        assert_eq!(
            tokenize("#splitMe #donotsplitme #UPPERCASE"),
            vec![
                "<hashtag>", "split", "me", "<hashtag>", "donotsplitme", "<hashtag>",
                "uppercase", "<allcaps>",
            ]
        );
    }

    #[test]
    fn elongation_tagged() {
        assert_eq!(tokenize("hellooooooo"), vec!["hello", "<elong>"]);
    }

    #[test]
    fn urls_users_numbers_tagged() {
        assert_eq!(
            tokenize("@bob paid 3.50 at https://t.co/abc"),
            vec!["<user>", "paid", "<number>", "at", "<url>"]
        );
    }

    #[test]
    fn url_replaced_before_numbers_and_slashes() {
        assert_eq!(tokenize("www.site2.com/page/7"), vec!["<url>"]);
    }

    #[test]
    fn emoticons_tagged() {
        assert_eq!(
            tokenize("love u <3 :) :p :( :|"),
            vec!["love", "u", "<heart>", "<smile>", "<lolface>", "<sadface>", "<neutralface>"]
        );
    }

    #[test]
    fn slashes_split() {
        assert_eq!(tokenize("this/that"), vec!["this", "/", "that"]);
    }

    #[test]
    fn repeated_punctuation_collapsed() {
        assert_eq!(tokenize("what?!?!"), vec!["what!", "<repeat>"]);
        assert_eq!(tokenize("wait..."), vec!["wait.", "<repeat>"]);
    }

    #[test]
    fn shouted_hashtag_not_double_tagged() {
        assert_eq!(tokenize("#NBA"), vec!["<hashtag>", "nba", "<allcaps>"]);
    }

    #[test]
    fn hashtag_helpers() {
        assert_eq!(expand_hashtag("iPhone"), "<hashtag> i phone");
        assert_eq!(expand_hashtag("ABC123"), "<hashtag> abc123 <allcaps>");
        assert_eq!(expand_hashtag("2020"), "<hashtag> 2020");
        assert!(!is_all_upper("123"));
    }

    #[test]
    fn stage_order_is_fixed() {
        assert_eq!(
            CorpusStylePolicy::stage_names(),
            vec![
                "replace_urls",
                "replace_emoticons",
                "split_slashes",
                "replace_users",
                "replace_numbers",
                "expand_hashtags",
                "mark_repeats",
                "mark_elongations",
                "mark_allcaps",
                "lowercase",
                "split_whitespace",
            ]
        );
    }

    #[test]
    fn rejects_unsupported_language() {
        assert!(matches!(
            CorpusStylePolicy::new("es"),
            Err(NormalizeError::UnsupportedLanguage(_))
        ));
    }
}
