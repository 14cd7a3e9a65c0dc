//! Tokenizer variants of the scoring ensemble and their loading machinery.
//!
//! Each language bucket scores against a fixed, ordered set of HuggingFace
//! tokenizer vocabularies. `tokenizer.json` files are resolved through
//! `hf-hub` (disk cache first, download on miss) and the loaded tokenizers
//! are kept in an explicit process-wide cache.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tokenizers::Tokenizer;
use tracing::info;

use crate::errors::{RankError, Result};
use crate::lang::Language;

/// Tokenizer filename inside each model repo.
const TOKENIZER_FILE: &str = "tokenizer.json";

/// English ensemble: BERT and DistilBERT vocabularies.
pub const EN_MODEL_REPOS: [&str; 2] = ["bert-base-uncased", "distilbert-base-uncased"];

/// French ensemble: multilingual BERT and DistilBERT plus CamemBERT.
pub const FR_MODEL_REPOS: [&str; 3] = [
    "bert-base-multilingual-cased",
    "distilbert-base-multilingual-cased",
    "camembert-base",
];

/// The ordered tokenizer variants scored for a language bucket.
pub fn variants_for(language: Language) -> &'static [&'static str] {
    match language {
        Language::En => &EN_MODEL_REPOS,
        Language::Fr => &FR_MODEL_REPOS,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tokenizer loading
// ────────────────────────────────────────────────────────────────────────────

/// Source of tokenizer files, one per model repo.
///
/// The default implementation resolves through the HuggingFace Hub; tests
/// inject a provider serving local fixture files so nothing touches the
/// network.
pub trait TokenizerProvider: Send + Sync {
    fn tokenizer_file(&self, repo_id: &str) -> Result<PathBuf>;
}

/// Resolves `tokenizer.json` via `hf-hub`: local cache hit first, download
/// on miss. Failures are `ModelUnavailable`, fatal for the affected bucket.
#[derive(Debug, Default)]
pub struct HubTokenizerProvider;

impl TokenizerProvider for HubTokenizerProvider {
    fn tokenizer_file(&self, repo_id: &str) -> Result<PathBuf> {
        if let Some(path) = hf_hub::Cache::default()
            .model(repo_id.to_string())
            .get(TOKENIZER_FILE)
        {
            return Ok(path);
        }

        info!("downloading tokenizer: {repo_id}");
        let api = hf_hub::api::sync::Api::new()
            .map_err(|e| RankError::ModelUnavailable(format!("HF Hub API init failed: {e}")))?;
        api.model(repo_id.to_string())
            .get(TOKENIZER_FILE)
            .map_err(|e| {
                RankError::ModelUnavailable(format!(
                    "failed to fetch {repo_id}/{TOKENIZER_FILE}: {e}"
                ))
            })
    }
}

/// Process-wide cache of loaded tokenizers, keyed by model repo.
/// Entries are read-only after first load and shared across invocations.
#[derive(Default)]
pub struct TokenizerCache {
    inner: Mutex<HashMap<String, Arc<Tokenizer>>>,
}

impl TokenizerCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached tokenizer for a repo, loading it on first use.
    /// The lock is held across the load so concurrent first uses of the same
    /// repo resolve it exactly once.
    pub fn get_or_load(
        &self,
        repo_id: &str,
        provider: &dyn TokenizerProvider,
    ) -> Result<Arc<Tokenizer>> {
        // A poisoned lock still guards a usable map.
        let mut cache = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(tokenizer) = cache.get(repo_id) {
            return Ok(Arc::clone(tokenizer));
        }

        let path = provider.tokenizer_file(repo_id)?;
        let tokenizer = Arc::new(load_tokenizer(&path)?);
        cache.insert(repo_id.to_string(), Arc::clone(&tokenizer));
        Ok(tokenizer)
    }
}

fn load_tokenizer(path: &Path) -> Result<Tokenizer> {
    let mut tokenizer = Tokenizer::from_file(path)
        .map_err(|e| RankError::ModelUnavailable(format!("tokenizer load failed: {e}")))?;

    // Whole documents are vectorized; never truncate.
    tokenizer
        .with_truncation(None)
        .map_err(|e| RankError::ModelUnavailable(format!("tokenizer config failed: {e}")))?;
    tokenizer.with_padding(None);

    Ok(tokenizer)
}

/// Tokenizes text into term strings, without special tokens.
pub fn tokenize(tokenizer: &Tokenizer, text: &str) -> Result<Vec<String>> {
    let encoding = tokenizer
        .encode(text, false)
        .map_err(|e| RankError::ModelUnavailable(format!("tokenization failed: {e}")))?;
    Ok(encoding.get_tokens().to_vec())
}
