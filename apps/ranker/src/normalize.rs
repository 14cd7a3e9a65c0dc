//! Text normalization between extraction and scoring.
//!
//! Flow: lowercase, drop literal escape artifacts, drop symbols and digits,
//! collapse whitespace. Stop-word removal is a separate opt-in stage so the
//! default output stays faithful to the source documents.
//!
//! `normalize` is idempotent: running it on its own output is a no-op.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::extract::ExtractedText;

/// Escape sequences that survive extraction as literal two-character pairs.
static LITERAL_ESCAPES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\\[nrt]").unwrap());

/// Punctuation, quote, bullet and math symbols with no scoring value.
static SYMBOLS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[,;:!?."'`()\[\]{}<>/\\|@#$%^&*_+=~•·▪◦–—-]"#).unwrap());

/// Unicode decimal digits, removed without leaving a gap.
static DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d").unwrap());

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

// ────────────────────────────────────────────────────────────────────────────
// Data model
// ────────────────────────────────────────────────────────────────────────────

/// Cleaned text ready for language routing and scoring.
#[derive(Debug, Clone)]
pub struct NormalizedText {
    /// Identifier of the source document (its full path).
    pub id: String,
    pub text: String,
}

impl NormalizedText {
    pub fn from_extracted(extracted: &ExtractedText, filter: Option<&StopWordFilter>) -> Self {
        let text = match filter {
            Some(filter) => normalize_with(&extracted.text, filter),
            None => normalize(&extracted.text),
        };
        NormalizedText {
            id: extracted.id.clone(),
            text,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Normalization pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Cleans extracted text into a lowercase, single-line, symbol-free form.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    // Literal escapes must go before the symbol pass, otherwise the symbol
    // pass strips the backslash and leaves a stray letter behind.
    let unescaped = LITERAL_ESCAPES.replace_all(&lowered, " ");
    let no_symbols = SYMBOLS.replace_all(&unescaped, " ");
    let no_digits = DIGITS.replace_all(&no_symbols, "");
    let collapsed = WHITESPACE.replace_all(&no_digits, " ");
    collapsed.trim().to_string()
}

/// `normalize` followed by removal of whole tokens on the filter's list.
pub fn normalize_with(text: &str, filter: &StopWordFilter) -> String {
    let cleaned = normalize(text);
    cleaned
        .split_whitespace()
        .filter(|token| !filter.is_stop(token))
        .collect::<Vec<_>>()
        .join(" ")
}

// ────────────────────────────────────────────────────────────────────────────
// Stop words
// ────────────────────────────────────────────────────────────────────────────

/// Language-specific stop-word set backed by the `stop-words` crate lists.
#[derive(Debug, Clone)]
pub struct StopWordFilter {
    words: HashSet<String>,
}

impl StopWordFilter {
    pub fn english() -> Self {
        Self::from_words(stop_words::get(stop_words::LANGUAGE::English))
    }

    pub fn french() -> Self {
        Self::from_words(stop_words::get(stop_words::LANGUAGE::French))
    }

    fn from_words(words: Vec<String>) -> Self {
        StopWordFilter {
            words: words.into_iter().map(|w| w.to_lowercase()).collect(),
        }
    }

    pub fn is_stop(&self, token: &str) -> bool {
        self.words.contains(token)
    }
}
