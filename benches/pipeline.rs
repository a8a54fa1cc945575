use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use postnorm::{Pipeline, PolicyConfig, PolicyKind, PostRecord, build_policy, sample_posts};

const POST: &str = "RT @someone: Can't believe it's already 2025!!! #HappyNewYear sooooo \
                    HAPPY :) see http://t.co/xyz &amp; more";

fn policy_bench(c: &mut Criterion) {
    for kind in [
        PolicyKind::Standard,
        PolicyKind::CorpusStyle,
        PolicyKind::ModelInput,
    ] {
        let policy = build_policy(kind, &PolicyConfig::default()).expect("bench policy");
        c.bench_function(&format!("tokenize_{}", kind.as_str()), |b| {
            b.iter(|| black_box(policy.tokenize(black_box(POST))));
        });
    }
}

fn batch_bench(c: &mut Criterion) {
    let samples = sample_posts().expect("bundled samples decode");
    let posts: Vec<PostRecord> = samples.iter().cycle().take(2_000).cloned().collect();
    let config = PolicyConfig::default().with_include_nested_content(true);

    let parallel = Pipeline::new(PolicyKind::CorpusStyle, &config).expect("bench pipeline");
    c.bench_function("tokenize_batch_parallel_2000", |b| {
        b.iter(|| black_box(parallel.tokenize_batch(black_box(&posts))));
    });

    let sequential = Pipeline::new(PolicyKind::CorpusStyle, &config)
        .expect("bench pipeline")
        .with_parallel(false);
    c.bench_function("tokenize_batch_sequential_2000", |b| {
        b.iter(|| black_box(sequential.tokenize_batch(black_box(&posts))));
    });
}

criterion_group!(pipeline_benches, policy_bench, batch_bench);
criterion_main!(pipeline_benches);
