//! The configurable social-post tokenizer.
//!
//! Stages, in order:
//!
//! 1. drop hashtags (if `remove_hashtags`)
//! 2. `@handle` -> username placeholder
//! 3. `http(s)://...` -> URL placeholder
//! 4. drop the `RT` marker
//! 5. drop `&amp;`
//! 6. lowercase (if `lowercase`)
//! 7. expand contractions (if `expand_contractions`)
//! 8. drop digit-only words (if `remove_lone_digits`)
//! 9. extract tokens with the boundary pattern
//! 10. drop stopwords (if configured)

use std::collections::HashSet;

use regex::{NoExpand, Regex};
use tracing::debug;

use crate::config::PolicyConfig;
use crate::contractions::ContractionTable;
use crate::error::NormalizeError;
use crate::patterns::{compile, SocialPatterns};
use crate::policy::{run_stages, Stage, TokenizationPolicy};

const STAGES: &[Stage<StandardPolicy>] = &[
    Stage { name: "remove_hashtags", apply: StandardPolicy::remove_hashtags },
    Stage { name: "replace_handles", apply: StandardPolicy::replace_handles },
    Stage { name: "replace_urls", apply: StandardPolicy::replace_urls },
    Stage { name: "remove_retweet_marker", apply: StandardPolicy::remove_retweet_marker },
    Stage { name: "remove_ampersand_entity", apply: StandardPolicy::remove_ampersand_entity },
    Stage { name: "lowercase", apply: StandardPolicy::lowercase },
    Stage { name: "expand_contractions", apply: StandardPolicy::expand_contractions },
    Stage { name: "remove_lone_digits", apply: StandardPolicy::remove_lone_digits },
];

/// Removal, case-folding and contraction pipeline driven by [`PolicyConfig`].
///
/// ```rust
/// use normalize::{PolicyConfig, StandardPolicy, TokenizationPolicy};
///
/// let policy = StandardPolicy::new(PolicyConfig::default()).unwrap();
/// assert_eq!(
///     policy.tokenize("Why can't I #twerk"),
///     vec!["why", "can", "not", "i", "twerk"]
/// );
/// ```
#[derive(Debug)]
pub struct StandardPolicy {
    config: PolicyConfig,
    patterns: SocialPatterns,
    token_re: Regex,
    contractions: &'static ContractionTable,
    stopwords: Option<HashSet<String>>,
}

impl StandardPolicy {
    /// Validate `config` and compile every pattern up front.
    pub fn new(config: PolicyConfig) -> Result<Self, NormalizeError> {
        config.validate()?;
        let patterns = SocialPatterns::compile()?;
        let token_re = compile(&token_pattern(&config))?;
        let stopwords = config
            .stopwords
            .as_ref()
            .map(|words| words.iter().cloned().collect::<HashSet<_>>());

        debug!(
            language = %config.language,
            token_pattern = %token_re.as_str(),
            stopwords = stopwords.as_ref().map_or(0, HashSet::len),
            "standard_policy_built"
        );

        Ok(Self {
            config,
            patterns,
            token_re,
            contractions: ContractionTable::english(),
            stopwords,
        })
    }

    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// Stage names in execution order, including token extraction.
    pub fn stage_names() -> Vec<&'static str> {
        STAGES
            .iter()
            .map(|stage| stage.name)
            .chain(["extract_tokens", "remove_stopwords"])
            .collect()
    }

    /// Run the string-rewriting stages only (1-8), without token extraction.
    pub fn rewrite(&self, text: &str) -> String {
        run_stages(self, STAGES, text)
    }

    fn remove_hashtags(&self, text: String) -> String {
        if !self.config.remove_hashtags {
            return text;
        }
        self.patterns.hashtag.replace_all(&text, " ").into_owned()
    }

    fn replace_handles(&self, text: String) -> String {
        self.patterns
            .handle
            .replace_all(&text, &self.config.username_replacement)
    }

    fn replace_urls(&self, text: String) -> String {
        self.patterns
            .url
            .replace_all(&text, NoExpand(&self.config.url_replacement))
            .into_owned()
    }

    fn remove_retweet_marker(&self, text: String) -> String {
        self.patterns.retweet.replace_all(&text, " ").into_owned()
    }

    fn remove_ampersand_entity(&self, text: String) -> String {
        if text.contains("&amp;") {
            text.replace("&amp;", "")
        } else {
            text
        }
    }

    fn lowercase(&self, text: String) -> String {
        if self.config.lowercase {
            text.to_lowercase()
        } else {
            text
        }
    }

    fn expand_contractions(&self, text: String) -> String {
        if self.config.expand_contractions {
            self.contractions.expand(&text)
        } else {
            text
        }
    }

    fn remove_lone_digits(&self, text: String) -> String {
        if !self.config.remove_lone_digits {
            return text;
        }
        self.patterns.lone_digit.replace_all(&text, "").into_owned()
    }

    fn extract_tokens(&self, text: &str) -> Vec<String> {
        self.token_re
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    fn remove_stopwords(&self, tokens: Vec<String>) -> Vec<String> {
        match &self.stopwords {
            Some(stopwords) if !stopwords.is_empty() => tokens
                .into_iter()
                .filter(|token| !stopwords.contains(token))
                .collect(),
            _ => tokens,
        }
    }
}

impl TokenizationPolicy for StandardPolicy {
    fn name(&self) -> &'static str {
        "standard"
    }

    fn tokenize(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }
        let rewritten = self.rewrite(text);
        let tokens = self.extract_tokens(&rewritten);
        self.remove_stopwords(tokens)
    }
}

/// Boundary pattern with non-blank placeholders registered as whole-token
/// alternatives, in the case they will have after the lowercase stage.
fn token_pattern(config: &PolicyConfig) -> String {
    let mut placeholders: Vec<String> = [&config.username_replacement, &config.url_replacement]
        .into_iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .map(|p| {
            if config.lowercase {
                p.to_lowercase()
            } else {
                p.to_string()
            }
        })
        .collect();
    if placeholders.is_empty() {
        return config.token_boundary_pattern.clone();
    }
    // Longest first, so one placeholder never shadows a longer one.
    placeholders.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    placeholders.dedup();

    let mut pattern = String::new();
    for placeholder in &placeholders {
        pattern.push_str("(?:");
        pattern.push_str(&guarded(placeholder));
        pattern.push_str(")|");
    }
    pattern.push_str("(?:");
    pattern.push_str(&config.token_boundary_pattern);
    pattern.push(')');
    pattern
}

/// Escape `placeholder`, adding `\b` on each side that starts or ends with a
/// word character so it never matches inside a longer word.
fn guarded(placeholder: &str) -> String {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let mut out = String::new();
    if placeholder.starts_with(is_word) {
        out.push_str(r"\b");
    }
    out.push_str(&regex::escape(placeholder));
    if placeholder.ends_with(is_word) {
        out.push_str(r"\b");
    }
    out
}
