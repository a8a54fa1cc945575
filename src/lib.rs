//! Workspace umbrella crate for post tokenization.
//!
//! This crate stitches together content extraction ([`record`]) and the
//! tokenization policies ([`normalize`]) so callers can turn decoded post
//! records into token sequences with a single entry point, one record at a
//! time or in batches.
//!
//! ```
//! use postnorm::{Pipeline, PolicyConfig, PolicyKind, PostRecord};
//!
//! let pipeline = Pipeline::new(PolicyKind::Standard, &PolicyConfig::default()).unwrap();
//! let post = PostRecord::from_text("RT @bob: Why can't I #twerk");
//! assert_eq!(
//!     pipeline.tokenize_record(&post).unwrap(),
//!     vec!["why", "can", "not", "i", "twerk"]
//! );
//! ```

pub mod config;

pub use config::{ConfigLoadError, PipelineYamlConfig, PostnormConfig};
pub use normalize::{
    CasualSplitter, ContractionTable, CorpusStylePolicy, ModelInputPolicy, NormalizeError,
    PolicyConfig, PolicyKind, SUPPORTED_LANGUAGES, SocialTextSplitter, StandardPolicy,
    TokenizationPolicy, URL_PLACEHOLDER, USER_PLACEHOLDER, build_policy, describe_emoji,
};
pub use record::{
    Entities, ExtendedText, HashtagEntity, PostRecord, RecordError, UrlEntity, extract_hashtags,
    extract_text, extract_urls,
};

use std::error::Error;
use std::fmt;
use std::sync::{Arc, OnceLock, RwLock};
use std::time::{Duration, Instant};

use rand::Rng;
use rand::seq::SliceRandom;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, info, warn};

/// Errors that can occur while processing a post record through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    Record(RecordError),
    Normalize(NormalizeError),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Record(err) => write!(f, "content extraction failure: {err}"),
            PipelineError::Normalize(err) => write!(f, "policy construction failure: {err}"),
        }
    }
}

impl Error for PipelineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PipelineError::Record(err) => Some(err),
            PipelineError::Normalize(err) => Some(err),
        }
    }
}

impl From<RecordError> for PipelineError {
    fn from(value: RecordError) -> Self {
        PipelineError::Record(value)
    }
}

impl From<NormalizeError> for PipelineError {
    fn from(value: NormalizeError) -> Self {
        PipelineError::Normalize(value)
    }
}

/// Metrics observer for pipeline stages.
pub trait PipelineMetrics: Send + Sync {
    fn record_extract(&self, latency: Duration, result: Result<(), RecordError>);
    fn record_tokenize(&self, latency: Duration, policy: &'static str, tokens: usize);
}

/// Install or clear the global pipeline metrics recorder.
pub fn set_pipeline_metrics(recorder: Option<Arc<dyn PipelineMetrics>>) {
    let mut guard = metrics_lock()
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = recorder;
}

fn metrics_lock() -> &'static RwLock<Option<Arc<dyn PipelineMetrics>>> {
    static METRICS: OnceLock<RwLock<Option<Arc<dyn PipelineMetrics>>>> = OnceLock::new();
    METRICS.get_or_init(|| RwLock::new(None))
}

fn metrics_recorder() -> Option<Arc<dyn PipelineMetrics>> {
    let guard = metrics_lock()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}

struct MetricsSpan {
    recorder: Arc<dyn PipelineMetrics>,
    start: Instant,
}

impl MetricsSpan {
    fn start() -> Option<Self> {
        metrics_recorder().map(|recorder| Self {
            recorder,
            start: Instant::now(),
        })
    }

    fn record_extract(self, result: Result<(), RecordError>) {
        self.recorder.record_extract(self.start.elapsed(), result);
    }

    fn record_tokenize(self, policy: &'static str, tokens: usize) {
        self.recorder
            .record_tokenize(self.start.elapsed(), policy, tokens);
    }
}

/// One policy plus the extraction and batch settings it runs under.
///
/// The policy is immutable after construction, so a pipeline can be shared
/// by reference (or behind an `Arc`) across any number of threads.
pub struct Pipeline {
    policy: Box<dyn TokenizationPolicy>,
    include_nested: bool,
    drop_empty: bool,
    parallel: bool,
    sample_size: Option<usize>,
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("policy", &self.policy.name())
            .field("include_nested", &self.include_nested)
            .field("drop_empty", &self.drop_empty)
            .field("parallel", &self.parallel)
            .field("sample_size", &self.sample_size)
            .finish()
    }
}

impl Pipeline {
    /// Build the policy selected by `kind`. Nested content follows
    /// `config.include_nested_content`.
    pub fn new(kind: PolicyKind, config: &PolicyConfig) -> Result<Self, PipelineError> {
        let policy = build_policy(kind, config)?;
        debug!(
            policy = kind.as_str(),
            include_nested = config.include_nested_content,
            "pipeline_built"
        );
        Ok(Self::with_policy(policy, config.include_nested_content))
    }

    /// Build from a loaded YAML configuration.
    pub fn from_config(config: &PostnormConfig) -> Result<Self, PipelineError> {
        let mut pipeline = Self::new(config.policy, &config.policy_config())?;
        pipeline.drop_empty = config.pipeline.drop_empty;
        pipeline.parallel = config.pipeline.parallel;
        pipeline.sample_size = config.pipeline.sample_size;
        Ok(pipeline)
    }

    /// Wrap an already-built policy, e.g. a [`ModelInputPolicy`] with a custom
    /// splitter.
    pub fn with_policy<P>(policy: P, include_nested: bool) -> Self
    where
        P: TokenizationPolicy + 'static,
    {
        Self {
            policy: Box::new(policy),
            include_nested,
            drop_empty: true,
            parallel: true,
            sample_size: None,
        }
    }

    pub fn with_drop_empty(mut self, drop_empty: bool) -> Self {
        self.drop_empty = drop_empty;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Tokenize at most `sample_size` randomly chosen records per batch.
    pub fn with_sample_size(mut self, sample_size: Option<usize>) -> Self {
        self.sample_size = sample_size;
        self
    }

    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    pub fn include_nested(&self) -> bool {
        self.include_nested
    }

    pub fn policy(&self) -> &dyn TokenizationPolicy {
        self.policy.as_ref()
    }

    /// Tokenize raw text, bypassing record extraction.
    pub fn tokenize_text(&self, text: &str) -> Vec<String> {
        let metrics = MetricsSpan::start();
        let tokens = self.policy.tokenize(text);
        if let Some(span) = metrics {
            span.record_tokenize(self.policy.name(), tokens.len());
        }
        tokens
    }

    /// Extract a record's content and tokenize it.
    pub fn tokenize_record(&self, post: &PostRecord) -> Result<Vec<String>, PipelineError> {
        let start = Instant::now();
        let text = match self.extract(post) {
            Ok(text) => text,
            Err(err) => {
                let elapsed_micros = start.elapsed().as_micros();
                warn!(
                    policy = self.policy.name(),
                    error = %err,
                    elapsed_micros,
                    "tokenize_record_failure"
                );
                return Err(err.into());
            }
        };

        let tokens = self.tokenize_text(&text);
        let elapsed_micros = start.elapsed().as_micros();
        info!(
            policy = self.policy.name(),
            tokens = tokens.len(),
            elapsed_micros,
            "tokenize_record_success"
        );
        Ok(tokens)
    }

    /// Space-joined form of [`tokenize_record`](Self::tokenize_record).
    pub fn tokenize_record_joined(&self, post: &PostRecord) -> Result<String, PipelineError> {
        Ok(self.tokenize_record(post)?.join(" "))
    }

    /// Hashtag bodies under the same truncated/nested rule as the text.
    pub fn extract_hashtags(&self, post: &PostRecord) -> Vec<String> {
        extract_hashtags(post, self.include_nested)
    }

    /// Link targets under the same truncated/nested rule as the text.
    pub fn extract_urls(&self, post: &PostRecord) -> Vec<String> {
        extract_urls(post, self.include_nested)
    }

    /// Tokenize every record, keeping input order.
    ///
    /// Malformed records come back as `Err` in their slot. With `drop_empty`
    /// (the default), records that yield no tokens are left out entirely.
    /// A configured sample size defers to
    /// [`tokenize_batch_sample`](Self::tokenize_batch_sample).
    pub fn tokenize_batch(&self, posts: &[PostRecord]) -> Vec<Result<Vec<String>, PipelineError>> {
        match self.sample_size {
            Some(sample_size) => self.tokenize_batch_sample(posts, sample_size),
            None => self.run_batch(&posts.iter().collect::<Vec<_>>()),
        }
    }

    /// Tokenize a random subset of at most `sample_size` records.
    ///
    /// When `sample_size` covers the whole batch every record is tokenized in
    /// input order. Otherwise the chosen records come back in sampled order.
    pub fn tokenize_batch_sample(
        &self,
        posts: &[PostRecord],
        sample_size: usize,
    ) -> Vec<Result<Vec<String>, PipelineError>> {
        self.tokenize_batch_sample_with(posts, sample_size, &mut rand::thread_rng())
    }

    /// [`tokenize_batch_sample`](Self::tokenize_batch_sample) with a caller
    /// supplied random source, for reproducible samples.
    pub fn tokenize_batch_sample_with<R>(
        &self,
        posts: &[PostRecord],
        sample_size: usize,
        rng: &mut R,
    ) -> Vec<Result<Vec<String>, PipelineError>>
    where
        R: Rng + ?Sized,
    {
        let chosen: Vec<&PostRecord> = if sample_size >= posts.len() {
            posts.iter().collect()
        } else {
            posts.choose_multiple(rng, sample_size).collect()
        };
        debug!(
            records = posts.len(),
            sampled = chosen.len(),
            "tokenize_batch_sampled"
        );
        self.run_batch(&chosen)
    }

    fn run_batch(&self, posts: &[&PostRecord]) -> Vec<Result<Vec<String>, PipelineError>> {
        let start = Instant::now();
        let results: Vec<_> = self
            .map_records(posts)
            .into_iter()
            .filter(|result| !(self.drop_empty && matches!(result, Ok(tokens) if tokens.is_empty())))
            .collect();

        let elapsed_micros = start.elapsed().as_micros();
        let failed = results.iter().filter(|result| result.is_err()).count();
        if results.len() == failed {
            warn!(
                policy = self.policy.name(),
                records = posts.len(),
                failed,
                elapsed_micros,
                "tokenize_batch_empty"
            );
        } else {
            info!(
                policy = self.policy.name(),
                records = posts.len(),
                emitted = results.len() - failed,
                failed,
                elapsed_micros,
                "tokenize_batch_success"
            );
        }
        results
    }

    /// Like [`tokenize_batch`](Self::tokenize_batch) but skips malformed
    /// records after logging them.
    pub fn tokenize_batch_lossy(&self, posts: &[PostRecord]) -> Vec<Vec<String>> {
        self.tokenize_batch(posts)
            .into_iter()
            .filter_map(|result| match result {
                Ok(tokens) => Some(tokens),
                Err(err) => {
                    warn!(error = %err, "tokenize_batch_skipped_record");
                    None
                }
            })
            .collect()
    }

    fn extract(&self, post: &PostRecord) -> Result<String, RecordError> {
        let metrics = MetricsSpan::start();
        let result = extract_text(post, self.include_nested);
        if let Some(span) = metrics {
            span.record_extract(result.as_ref().map(|_| ()).map_err(Clone::clone));
        }
        result
    }

    #[cfg(feature = "parallel")]
    fn map_records(&self, posts: &[&PostRecord]) -> Vec<Result<Vec<String>, PipelineError>> {
        if self.parallel {
            posts
                .par_iter()
                .map(|post| self.tokenize_record(post))
                .collect()
        } else {
            posts.iter().map(|post| self.tokenize_record(post)).collect()
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn map_records(&self, posts: &[&PostRecord]) -> Vec<Result<Vec<String>, PipelineError>> {
        posts.iter().map(|post| self.tokenize_record(post)).collect()
    }
}

/// Bundled sample posts, one JSON record per line.
pub const SAMPLE_POSTS: &str = include_str!("../demos/sample_posts.jsonl");

/// Decode the bundled sample posts.
pub fn sample_posts() -> Result<Vec<PostRecord>, PipelineError> {
    SAMPLE_POSTS
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| PostRecord::from_json_str(line).map_err(PipelineError::from))
        .collect()
}

/// Run the bundled sample posts through one policy.
/// Useful for demos and integration smoke tests.
pub fn sample_posts_demo(
    kind: PolicyKind,
    config: &PolicyConfig,
) -> Result<Vec<String>, PipelineError> {
    let pipeline = Pipeline::new(kind, config)?;
    let posts = sample_posts()?;
    Ok(pipeline
        .tokenize_batch_lossy(&posts)
        .into_iter()
        .map(|tokens| tokens.join(" "))
        .collect())
}
