//! Precompiled text patterns shared by the tokenization policies.
//!
//! Every pattern is compiled once, when a policy is built, and is read-only
//! afterwards. Two matchers need context the `regex` crate cannot express
//! (look-around for handles, a back-reference for elongation); they wrap a
//! plain candidate regex and check the context by hand.

use regex::Regex;

use crate::error::NormalizeError;

/// Compile `pattern`, mapping failures to [`NormalizeError::InvalidPattern`].
pub fn compile(pattern: &str) -> Result<Regex, NormalizeError> {
    Regex::new(pattern).map_err(|err| NormalizeError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: err.to_string(),
    })
}

/// Python-style `\w`: Unicode alphanumerics plus underscore.
pub(crate) fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// `@handle` mentions, following the widely used NLTK handle rule.
///
/// A handle is `@` plus 1..=20 ASCII word characters. It must not be preceded
/// by a word character or one of `!@#$%&*`, and a handle of fewer than 20
/// characters must not run straight into another `@` (that is an e-mail-ish
/// token, not a mention). Handles longer than 20 characters match their first
/// 20 characters.
#[derive(Debug, Clone)]
pub struct HandleMatcher {
    candidate: Regex,
}

const HANDLE_MAX: usize = 20;

impl HandleMatcher {
    pub fn new() -> Result<Self, NormalizeError> {
        Ok(Self {
            candidate: compile(r"@[A-Za-z0-9_]+")?,
        })
    }

    /// Byte ranges of accepted handles, left to right.
    pub fn find_iter<'t>(&'t self, text: &'t str) -> impl Iterator<Item = (usize, usize)> + 't {
        self.candidate
            .find_iter(text)
            .filter_map(move |m| accept_handle(text, m.start(), m.end()))
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.find_iter(text).next().is_some()
    }

    /// Replace every accepted handle with `replacement`.
    pub fn replace_all(&self, text: &str, replacement: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        for (start, end) in self.find_iter(text) {
            out.push_str(&text[last..start]);
            out.push_str(replacement);
            last = end;
        }
        out.push_str(&text[last..]);
        out
    }
}

fn accept_handle(text: &str, start: usize, end: usize) -> Option<(usize, usize)> {
    let preceded_badly = text[..start]
        .chars()
        .next_back()
        .is_some_and(|c| c.is_ascii_alphanumeric() || "_!@#$%&*".contains(c));
    if preceded_badly {
        return None;
    }

    // Candidate bytes are ASCII, so byte length == char length.
    let run = end - start - 1;
    let followed_by_at = text[end..].starts_with('@');
    if run > HANDLE_MAX {
        // The 21st character is a word character, never '@'.
        Some((start, start + 1 + HANDLE_MAX))
    } else if followed_by_at {
        None
    } else {
        Some((start, end))
    }
}

/// Patterns used by the standard policy.
#[derive(Debug, Clone)]
pub struct SocialPatterns {
    pub handle: HandleMatcher,
    pub url: Regex,
    pub retweet: Regex,
    pub hashtag: Regex,
    pub lone_digit: Regex,
}

impl SocialPatterns {
    pub fn compile() -> Result<Self, NormalizeError> {
        Ok(Self {
            handle: HandleMatcher::new()?,
            url: compile(r"https?://[\w./?=]+")?,
            retweet: compile(r"\bRT\b")?,
            hashtag: compile(r"#[\p{L}\p{N}_]+")?,
            lone_digit: compile(r"\b\d+\b")?,
        })
    }
}

// Emoticon building blocks: eyes, then an optional nose.
const EYES: &str = r"[8:=;]";
const NOSE: &str = r"['`\-]?";

/// One emoticon class and the tag that replaces it.
#[derive(Debug, Clone)]
pub struct EmoticonClass {
    pub tag: &'static str,
    pub pattern: Regex,
}

/// Patterns used by the corpus-style policy, in the order they are applied.
#[derive(Debug, Clone)]
pub struct CorpusPatterns {
    pub url: Regex,
    /// smile, lolface, sadface, neutralface, heart; classes share symbols so
    /// this order is significant.
    pub emoticons: Vec<EmoticonClass>,
    pub user: Regex,
    pub number: Regex,
    pub hashtag: Regex,
    pub repeat: Regex,
    pub allcaps: Regex,
}

impl CorpusPatterns {
    pub fn compile() -> Result<Self, NormalizeError> {
        let emoticons = vec![
            EmoticonClass {
                tag: "<smile>",
                pattern: compile(&format!("{EYES}{NOSE}[)dD]+|[)dD]+{NOSE}{EYES}"))?,
            },
            EmoticonClass {
                tag: "<lolface>",
                pattern: compile(&format!("{EYES}{NOSE}p+"))?,
            },
            EmoticonClass {
                tag: "<sadface>",
                pattern: compile(&format!(r"{EYES}{NOSE}\(+|\)+{NOSE}{EYES}"))?,
            },
            EmoticonClass {
                tag: "<neutralface>",
                pattern: compile(&format!(r"{EYES}{NOSE}[/|l*]"))?,
            },
            EmoticonClass {
                tag: "<heart>",
                pattern: compile("<3")?,
            },
        ];
        Ok(Self {
            url: compile(r"https?://\S+\b|www\.(\w+\.)+\S*")?,
            emoticons,
            user: compile(r"@\w+")?,
            number: compile(r"[-+]?[.\d]*\d+[:,.\d]*")?,
            hashtag: compile(r"#\S+")?,
            repeat: compile(r"([!?.]){2,}")?,
            allcaps: compile(r"[A-Z]{2,}")?,
        })
    }
}

/// Collapse a character repeated three or more times at the end of a word.
///
/// Matches `stem` + `c` + `c{2,}` where the match starts and ends on a word
/// boundary, and replaces it with `stem` + `c` + `suffix`. Only runs of
/// non-whitespace characters are considered. Scanning is leftmost, with the
/// shortest stem and the longest run that still ends on a boundary.
pub fn collapse_elongations(text: &str, suffix: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let n = chars.len();
    let boundary = |i: usize| {
        let before = i > 0 && is_word_char(chars[i - 1]);
        let after = i < n && is_word_char(chars[i]);
        before != after
    };

    let mut out = String::with_capacity(text.len() + suffix.len());
    let mut i = 0;
    while i < n {
        if !chars[i].is_whitespace() && boundary(i) {
            if let Some((run_start, end)) = elongation_at(&chars, i, &boundary) {
                out.extend(&chars[i..=run_start]);
                out.push_str(suffix);
                i = end;
                continue;
            }
        }
        out.push(chars[i]);
        i += 1;
    }
    out
}

/// For a match starting at `start`, returns the index of the repeated
/// character's first occurrence and the end of the match.
fn elongation_at(
    chars: &[char],
    start: usize,
    boundary: &impl Fn(usize) -> bool,
) -> Option<(usize, usize)> {
    let mut pos = start;
    while pos < chars.len() && !chars[pos].is_whitespace() {
        let ch = chars[pos];
        let run = chars[pos..].iter().take_while(|&&c| c == ch).count();
        if run >= 3 {
            for len in (3..=run).rev() {
                if boundary(pos + len) {
                    return Some((pos, pos + len));
                }
            }
        }
        pos += 1;
    }
    None
}
