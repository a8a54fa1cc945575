//! The tokenization capability and the ordered-stage machinery behind it.

use tracing::trace;

use crate::config::{PolicyConfig, PolicyKind};
use crate::corpus::CorpusStylePolicy;
use crate::error::NormalizeError;
use crate::model_input::ModelInputPolicy;
use crate::standard::StandardPolicy;

/// Turns raw post text into an ordered token sequence.
///
/// Implementations hold only immutable, precompiled state, so one instance
/// can serve any number of threads at once.
pub trait TokenizationPolicy: Send + Sync {
    /// Stable identifier, used in logs.
    fn name(&self) -> &'static str;

    /// Tokenize `text`. Empty input yields an empty sequence.
    fn tokenize(&self, text: &str) -> Vec<String>;

    /// Space-joined form of [`tokenize`](Self::tokenize).
    fn tokenize_to_string(&self, text: &str) -> String {
        self.tokenize(text).join(" ")
    }
}

impl<P: TokenizationPolicy + ?Sized> TokenizationPolicy for Box<P> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn tokenize(&self, text: &str) -> Vec<String> {
        (**self).tokenize(text)
    }
}

/// One whole-string rewrite in a policy's pipeline.
pub(crate) struct Stage<P> {
    pub name: &'static str,
    pub apply: fn(&P, String) -> String,
}

/// Feed `text` through `stages` in order; stage N's output is stage N+1's input.
pub(crate) fn run_stages<P>(policy: &P, stages: &[Stage<P>], text: &str) -> String {
    stages.iter().fold(text.to_string(), |acc, stage| {
        let out = (stage.apply)(policy, acc);
        trace!(stage = stage.name, len = out.len(), "stage_applied");
        out
    })
}

/// Build the policy selected by `kind`.
///
/// ```rust
/// use normalize::{build_policy, PolicyConfig, PolicyKind};
///
/// let policy = build_policy(PolicyKind::CorpusStyle, &PolicyConfig::default()).unwrap();
/// assert_eq!(policy.tokenize("OMG"), vec!["omg", "<allcaps>"]);
/// ```
pub fn build_policy(
    kind: PolicyKind,
    config: &PolicyConfig,
) -> Result<Box<dyn TokenizationPolicy>, NormalizeError> {
    Ok(match kind {
        PolicyKind::Standard => Box::new(StandardPolicy::new(config.clone())?),
        PolicyKind::CorpusStyle => Box::new(CorpusStylePolicy::new(&config.language)?),
        PolicyKind::ModelInput => Box::new(ModelInputPolicy::new(&config.language)?),
    })
}
