//! Rank aggregation: merges per-bucket score tables into one ordered list.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::lang::Language;

/// One scored resume from one language bucket.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreRecord {
    /// Resume identifier (the source file's full path).
    pub resume_id: String,
    pub language: Language,
    /// Percentage relevance, 0 to 100.
    pub score: f64,
}

/// Merges bucket tables into the final ranking.
///
/// Tables are concatenated in bucket order and sorted descending by score
/// with a stable sort, so equal scores keep their input order. Rows are then
/// deduplicated by resume identifier, first occurrence wins; distinct
/// resumes with exactly equal scores are all preserved.
pub fn aggregate(buckets: Vec<Vec<ScoreRecord>>) -> Vec<ScoreRecord> {
    let mut records: Vec<ScoreRecord> = buckets.into_iter().flatten().collect();
    records.sort_by(|a, b| b.score.total_cmp(&a.score));

    let mut seen = HashSet::new();
    records.retain(|record| seen.insert(record.resume_id.clone()));
    records
}

/// Column-oriented form of an ordered score table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreColumns {
    pub resume: Vec<String>,
    pub score: Vec<f64>,
}

impl ScoreColumns {
    pub fn from_records(records: &[ScoreRecord]) -> Self {
        ScoreColumns {
            resume: records.iter().map(|r| r.resume_id.clone()).collect(),
            score: records.iter().map(|r| r.score).collect(),
        }
    }
}
