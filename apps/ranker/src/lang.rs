//! Language detection and routing of resumes into scoring buckets.
//!
//! Detection runs on extracted text via `whatlang`. English and French are
//! the only supported destinations; anything else is excluded from ranking
//! with a warning, which is not an error for the batch.

use std::fmt;

use serde::Serialize;
use tracing::warn;
use whatlang::Lang;

use crate::errors::{RankError, Result};
use crate::extract::ExtractedText;

/// A supported scoring language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Fr,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Fr => "fr",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resumes partitioned by detected language. `skipped` holds the identifiers
/// of documents excluded because their language is unsupported.
#[derive(Debug, Default)]
pub struct RoutedPool {
    pub en: Vec<ExtractedText>,
    pub fr: Vec<ExtractedText>,
    pub skipped: Vec<String>,
}

/// Detects the language of one document.
///
/// Returns `LanguageUnsupported` for anything other than English or French,
/// including text too short or too mixed to classify.
pub fn detect(text: &str) -> Result<Language> {
    match whatlang::detect(text) {
        Some(info) => match info.lang() {
            Lang::Eng => Ok(Language::En),
            Lang::Fra => Ok(Language::Fr),
            other => Err(RankError::LanguageUnsupported(other.eng_name().to_string())),
        },
        None => Err(RankError::LanguageUnsupported("undetermined".to_string())),
    }
}

/// Partitions extracted resumes into per-language buckets, preserving input
/// order within each bucket. Unsupported documents are logged and skipped.
pub fn route(resumes: Vec<ExtractedText>) -> RoutedPool {
    let mut pool = RoutedPool::default();

    for resume in resumes {
        match detect(&resume.text) {
            Ok(Language::En) => pool.en.push(resume),
            Ok(Language::Fr) => pool.fr.push(resume),
            Err(err) => {
                warn!(resume = %resume.id, "excluding resume from ranking: {err}");
                pool.skipped.push(resume.id);
            }
        }
    }

    pool
}
