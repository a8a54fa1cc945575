//! Concurrency and thread safety tests

use std::sync::{Arc, Mutex};
use std::thread;

use postnorm::{Pipeline, PolicyConfig, PolicyKind, PostRecord, TokenizationPolicy, build_policy};

const TEXT: &str = "RT @fan: #GameDay is HEREEEE!!! can't wait :) http://t.co/abc";

#[test]
fn shared_policy_same_output_on_every_thread() {
    for kind in [
        PolicyKind::Standard,
        PolicyKind::CorpusStyle,
        PolicyKind::ModelInput,
    ] {
        let policy: Arc<dyn TokenizationPolicy> =
            Arc::from(build_policy(kind, &PolicyConfig::default()).unwrap());
        let expected = policy.tokenize(TEXT);

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let policy = Arc::clone(&policy);
                thread::spawn(move || policy.tokenize(TEXT))
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected, "{kind:?}");
        }
    }
}

#[test]
fn shared_pipeline_tokenizes_distinct_records() {
    let pipeline = Arc::new(
        Pipeline::new(PolicyKind::Standard, &PolicyConfig::default()).unwrap(),
    );
    let collected = Arc::new(Mutex::new(Vec::new()));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let pipeline = Arc::clone(&pipeline);
            let collected = Arc::clone(&collected);
            thread::spawn(move || {
                let post = PostRecord::from_text(format!("thread number {i}"));
                let tokens = pipeline.tokenize_record(&post).unwrap();
                collected.lock().unwrap().push((i, tokens));
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let mut results = collected.lock().unwrap().clone();
    results.sort_by_key(|(i, _)| *i);
    assert_eq!(results.len(), 8);
    for (i, tokens) in results {
        assert_eq!(tokens, vec!["thread".to_string(), "number".into(), i.to_string()]);
    }
}

#[test]
fn parallel_batch_preserves_input_order() {
    let pipeline = Pipeline::new(PolicyKind::Standard, &PolicyConfig::default()).unwrap();
    let posts: Vec<PostRecord> = (0..500)
        .map(|i| PostRecord::from_text(format!("post{i}")))
        .collect();

    let results = pipeline.tokenize_batch_lossy(&posts);
    assert_eq!(results.len(), 500);
    for (i, tokens) in results.iter().enumerate() {
        assert_eq!(tokens, &vec![format!("post{i}")]);
    }
}
