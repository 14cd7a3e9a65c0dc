//! Scoring ensemble: TF-IDF relevance over a fixed set of tokenizer
//! vocabularies per language.
//!
//! Flow per bucket: load variant tokenizers → fit TF-IDF on the job
//! description → transform job description and resumes → cosine on
//! L2-normalized vectors → average across variants → scale to 0..=100.

pub mod models;
pub mod tfidf;

use std::collections::HashMap;
use std::sync::Arc;

use tokenizers::Tokenizer;
use tracing::{debug, info};

use crate::errors::Result;
use crate::lang::Language;
use crate::normalize::{NormalizedText, StopWordFilter};

use self::models::{tokenize, variants_for, HubTokenizerProvider, TokenizerCache, TokenizerProvider};
use self::tfidf::{cosine_similarity, l2_normalize, TfidfVectorizer};

/// One tokenizer variant fitted against the bucket's job description.
struct FittedVariant {
    tokenizer: Arc<Tokenizer>,
    vectorizer: TfidfVectorizer,
    jd_vector: Vec<f64>,
}

/// The scoring ensemble. Owns the tokenizer cache, so one instance shared
/// across invocations loads every tokenizer at most once.
pub struct Ensemble {
    provider: Arc<dyn TokenizerProvider>,
    cache: TokenizerCache,
}

impl Ensemble {
    pub fn new(provider: Arc<dyn TokenizerProvider>) -> Self {
        Ensemble {
            provider,
            cache: TokenizerCache::new(),
        }
    }

    /// Ensemble backed by the HuggingFace Hub.
    pub fn with_hub() -> Self {
        Self::new(Arc::new(HubTokenizerProvider))
    }

    /// Scores every resume in one language bucket against the job
    /// description. Returns resume identifier to percentage score.
    ///
    /// An empty job description yields `0.0` for every resume: the fitted
    /// vocabulary is empty, both vectors are zero and the cosine guard
    /// reports no similarity. A tokenizer that cannot be loaded aborts the
    /// bucket with `ModelUnavailable`.
    ///
    /// Blocking (tokenizer loads plus vector math); callers run this on the
    /// blocking pool.
    pub fn score_bucket(
        &self,
        language: Language,
        job_description: &str,
        resumes: &[NormalizedText],
    ) -> Result<HashMap<String, f64>> {
        let stop_words = match language {
            Language::En => StopWordFilter::english(),
            Language::Fr => StopWordFilter::french(),
        };

        let repos = variants_for(language);
        let mut variants = Vec::with_capacity(repos.len());
        for &repo_id in repos {
            let tokenizer = self.cache.get_or_load(repo_id, self.provider.as_ref())?;
            let jd_terms = content_terms(&tokenizer, job_description, &stop_words)?;
            let vectorizer = TfidfVectorizer::fit(std::slice::from_ref(&jd_terms));
            let jd_vector = l2_normalize(&vectorizer.transform(&jd_terms));
            debug!(
                model = repo_id,
                vocabulary = vectorizer.vocabulary_len(),
                "variant fitted on job description"
            );
            variants.push(FittedVariant {
                tokenizer,
                vectorizer,
                jd_vector,
            });
        }

        let variant_count = variants.len() as f64;
        let mut scores = HashMap::with_capacity(resumes.len());
        for resume in resumes {
            let mut similarity_sum = 0.0_f64;
            for variant in &variants {
                let terms = content_terms(&variant.tokenizer, &resume.text, &stop_words)?;
                let vector = l2_normalize(&variant.vectorizer.transform(&terms));
                similarity_sum += cosine_similarity(&variant.jd_vector, &vector);
            }
            // Accumulated float error can push an exact match a hair past
            // 1.0; the published scale is a hard 0..=100.
            let score = ((similarity_sum / variant_count) * 100.0).clamp(0.0, 100.0);
            scores.insert(resume.id.clone(), score);
        }

        info!(%language, resumes = resumes.len(), "bucket scored");
        Ok(scores)
    }
}

/// Tokenizes text and drops stop-word terms before vectorization.
fn content_terms(
    tokenizer: &Tokenizer,
    text: &str,
    stop_words: &StopWordFilter,
) -> Result<Vec<String>> {
    let mut terms = tokenize(tokenizer, text)?;
    terms.retain(|term| !stop_words.is_stop(term));
    Ok(terms)
}
