//! Manifest-driven CLI runner for the ranking engine.
//!
//! Reads a JSON manifest describing one ranking request, runs the pipeline
//! once and prints the ranked results as pretty JSON on stdout; logs go to
//! stderr so stdout stays machine-readable. Exits non-zero on a terminal
//! pipeline failure. Authorization, persistence and HTTP serialization are
//! the calling layer's job, not this binary's.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ranker::config::Config;
use ranker::pipeline::{self, RankRequest};
use ranker::rank::ScoreColumns;
use ranker::score::Ensemble;

#[derive(Parser, Debug)]
#[command(
    name = "ranker",
    version,
    about = "Ranks resumes against a job description by textual relevance"
)]
struct Cli {
    /// JSON manifest with the job description paths and the candidate pool.
    #[arg(long)]
    manifest: PathBuf,

    /// Remove stop words during normalization. Overrides
    /// RANKER_REMOVE_STOP_WORDS in either direction: bare `--stop-words`
    /// turns the stage on, `--stop-words false` turns it off.
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_name = "BOOL")]
    stop_words: Option<bool>,

    /// Print the ranking as a column-oriented table instead of full records.
    #[arg(long)]
    columns: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(remove) = cli.stop_words {
        config.remove_stop_words = remove;
    }

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting ranker v{}", env!("CARGO_PKG_VERSION"));

    let manifest = std::fs::read_to_string(&cli.manifest)
        .with_context(|| format!("cannot read manifest {}", cli.manifest.display()))?;
    let request: RankRequest = serde_json::from_str(&manifest)
        .with_context(|| format!("invalid manifest {}", cli.manifest.display()))?;

    let ensemble = Arc::new(Ensemble::with_hub());
    let results = pipeline::rank(ensemble, &config, request).await?;

    let output = if cli.columns {
        serde_json::to_string_pretty(&ScoreColumns::from(&results[..]))?
    } else {
        serde_json::to_string_pretty(&results)?
    };
    println!("{output}");

    Ok(())
}
