use postnorm::{Pipeline, PolicyConfig, PolicyKind, PostRecord, build_policy};

const POSTS: &[&str] = &[
    "RT @someone: Can't believe it's already 2025!!! #NewYear http://t.co/xyz",
    "OMG sooooo HAPPY :) <3",
    "I’m fine… really 10 / 12 would recommend",
    "u &amp; me luv 4 u",
    "",
];

fn all_kinds() -> [PolicyKind; 3] {
    [
        PolicyKind::Standard,
        PolicyKind::CorpusStyle,
        PolicyKind::ModelInput,
    ]
}

#[test]
fn same_input_same_tokens_across_instances() {
    for kind in all_kinds() {
        let a = build_policy(kind, &PolicyConfig::default()).unwrap();
        let b = build_policy(kind, &PolicyConfig::default()).unwrap();
        for post in POSTS {
            assert_eq!(a.tokenize(post), b.tokenize(post), "{kind:?} on {post:?}");
        }
    }
}

#[test]
fn repeated_calls_are_stable() {
    for kind in all_kinds() {
        let policy = build_policy(kind, &PolicyConfig::default()).unwrap();
        for post in POSTS {
            let first = policy.tokenize(post);
            for _ in 0..5 {
                assert_eq!(policy.tokenize(post), first);
            }
        }
    }
}

#[test]
fn empty_input_yields_no_tokens_for_every_configuration() {
    let configs = [
        PolicyConfig::default(),
        PolicyConfig::default().with_lowercase(false),
        PolicyConfig::default()
            .with_remove_hashtags(true)
            .with_remove_lone_digits(true)
            .with_stopwords(["a"]),
        PolicyConfig::default()
            .with_username_replacement("<user>")
            .with_url_replacement("<url>"),
    ];
    for config in &configs {
        for kind in all_kinds() {
            let policy = build_policy(kind, config).unwrap();
            assert!(policy.tokenize("").is_empty());
        }
    }
}

#[test]
fn standard_policy_idempotent_on_normalized_text() {
    let policy = build_policy(PolicyKind::Standard, &PolicyConfig::default()).unwrap();
    let once = policy.tokenize("the quick brown fox jumps over the lazy dog");
    let twice = policy.tokenize(&once.join(" "));
    assert_eq!(once, twice);
}

#[test]
fn parallel_and_sequential_batches_agree() {
    let posts: Vec<PostRecord> = POSTS
        .iter()
        .cycle()
        .take(200)
        .map(|text| PostRecord::from_text(*text))
        .collect();

    for kind in all_kinds() {
        let pipeline = Pipeline::new(kind, &PolicyConfig::default()).unwrap();
        let sequential = Pipeline::new(kind, &PolicyConfig::default())
            .unwrap()
            .with_parallel(false);
        assert_eq!(
            pipeline.tokenize_batch(&posts),
            sequential.tokenize_batch(&posts)
        );
    }
}
