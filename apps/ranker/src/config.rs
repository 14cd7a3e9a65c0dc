use anyhow::{Context, Result};

/// Runtime configuration loaded from environment variables.
/// Every variable is optional and falls back to a default.
#[derive(Debug, Clone)]
pub struct Config {
    /// Default log level when `RUST_LOG` carries no directive for this crate.
    pub rust_log: String,
    /// Enables the stop-word removal stage of the text normalizer.
    pub remove_stop_words: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            remove_stop_words: std::env::var("RANKER_REMOVE_STOP_WORDS")
                .unwrap_or_else(|_| "false".to_string())
                .parse::<bool>()
                .context("RANKER_REMOVE_STOP_WORDS must be 'true' or 'false'")?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            rust_log: "info".to_string(),
            remove_stop_words: false,
        }
    }
}
