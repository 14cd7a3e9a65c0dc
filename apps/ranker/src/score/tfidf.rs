//! Term-frequency / inverse-document-frequency vectorization.
//!
//! Weighting uses the smoothed formula `idf(t) = ln((1 + n) / (1 + df(t))) + 1`,
//! so a vectorizer fit on a single document degenerates to a uniform `1.0`
//! weight per term and the same code path serves wider corpora unchanged.
//! Vectors are compared by cosine similarity after L2 normalization.

use std::collections::{BTreeSet, HashMap};

/// Fitted vocabulary and per-term IDF weights.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Builds the vocabulary and IDF table from tokenized documents.
    ///
    /// Vocabulary columns are assigned in lexicographic term order so that
    /// fitting is deterministic.
    pub fn fit(documents: &[Vec<String>]) -> Self {
        let terms: BTreeSet<&str> = documents
            .iter()
            .flat_map(|doc| doc.iter().map(String::as_str))
            .collect();

        let vocabulary: HashMap<String, usize> = terms
            .into_iter()
            .enumerate()
            .map(|(col, term)| (term.to_string(), col))
            .collect();

        let n = documents.len() as f64;
        let mut df = vec![0.0_f64; vocabulary.len()];
        for doc in documents {
            let unique: BTreeSet<&str> = doc.iter().map(String::as_str).collect();
            for term in unique {
                if let Some(&col) = vocabulary.get(term) {
                    df[col] += 1.0;
                }
            }
        }

        let idf = df
            .into_iter()
            .map(|df| ((1.0 + n) / (1.0 + df)).ln() + 1.0)
            .collect();

        TfidfVectorizer { vocabulary, idf }
    }

    /// Maps a tokenized document into the fitted space: raw term counts
    /// scaled by IDF. Tokens outside the vocabulary are ignored.
    pub fn transform(&self, tokens: &[String]) -> Vec<f64> {
        let mut vector = vec![0.0_f64; self.idf.len()];
        for token in tokens {
            if let Some(&col) = self.vocabulary.get(token.as_str()) {
                vector[col] += 1.0;
            }
        }
        for (value, idf) in vector.iter_mut().zip(&self.idf) {
            *value *= idf;
        }
        vector
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }
}

/// L2-normalize a vector. A zero vector is returned unchanged.
pub fn l2_normalize(vector: &[f64]) -> Vec<f64> {
    let norm: f64 = vector.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm < 1e-12 {
        return vector.to_vec();
    }
    vector.iter().map(|x| x / norm).collect()
}

/// Cosine similarity between two equal-length vectors.
///
/// Returns `0.0` when either vector has (near-)zero norm, which covers both
/// empty-vocabulary vectors and resumes sharing no terms with the fit corpus.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len(), "vectors must have equal length");
    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    let denom = norm_a * norm_b;
    if denom < 1e-12 {
        return 0.0;
    }
    dot / denom
}
