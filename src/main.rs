use std::error::Error;

use postnorm::{Pipeline, PolicyConfig, PolicyKind, PostnormConfig, sample_posts};
use tracing_subscriber::EnvFilter;

/// Runs the bundled sample posts through every policy, or through the one
/// configured in the YAML file named by the first argument.
fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let posts = sample_posts()?;

    let pipelines = match std::env::args().nth(1) {
        Some(path) => {
            let config = PostnormConfig::from_file(&path)?;
            vec![Pipeline::from_config(&config)?]
        }
        None => {
            let config = PolicyConfig::default().with_include_nested_content(true);
            [
                PolicyKind::Standard,
                PolicyKind::CorpusStyle,
                PolicyKind::ModelInput,
            ]
            .into_iter()
            .map(|kind| Pipeline::new(kind, &config))
            .collect::<Result<Vec<_>, _>>()?
        }
    };

    for pipeline in &pipelines {
        println!("== {} ==", pipeline.policy_name());
        for tokens in pipeline.tokenize_batch_lossy(&posts) {
            println!("{}", tokens.join(" "));
        }
        println!();
    }

    Ok(())
}
