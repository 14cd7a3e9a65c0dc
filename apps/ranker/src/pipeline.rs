//! Pipeline orchestration: one ranking request from files to ranked results.
//!
//! Flow, with a join barrier after each stage:
//! 1. extract and normalize both job descriptions, extract and route every
//!    resume into language pools;
//! 2. normalize each pool;
//! 3. score each bucket through the ensemble;
//! 4. aggregate the bucket tables and join candidate identity on.
//!
//! All intermediate state is request-scoped and in-memory. A per-document
//! failure excludes that document. A failed bucket is dropped and logged
//! while the other bucket's records are still returned; the request fails
//! only when every bucket holding resumes failed.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::task;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::config::Config;
use crate::errors::{RankError, Result};
use crate::extract::{self, DocumentRole, ExtractedText, SourceDocument};
use crate::lang::{self, Language, RoutedPool};
use crate::normalize::{self, NormalizedText, StopWordFilter};
use crate::rank::{self, ScoreColumns, ScoreRecord};
use crate::score::Ensemble;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// One applicant in a ranking request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub id: Uuid,
    pub display_name: String,
    pub resume_path: PathBuf,
}

/// A full ranking invocation: one job posting as parallel English and French
/// description documents, plus the candidate pool.
#[derive(Debug, Clone, Deserialize)]
pub struct RankRequest {
    pub job_description_en: PathBuf,
    pub job_description_fr: PathBuf,
    pub candidates: Vec<Candidate>,
}

impl RankRequest {
    pub fn new(
        job_description_en: PathBuf,
        job_description_fr: PathBuf,
        candidates: Vec<Candidate>,
    ) -> Self {
        RankRequest {
            job_description_en,
            job_description_fr,
            candidates,
        }
    }
}

/// One ranked candidate. The order of the returned `Vec` is the ranking.
#[derive(Debug, Clone, Serialize)]
pub struct RankedResult {
    pub resume_path: String,
    pub language: Language,
    /// Percentage relevance, 0 to 100.
    pub score: f64,
    pub candidate_id: Uuid,
    pub display_name: String,
}

impl From<&[RankedResult]> for ScoreColumns {
    fn from(results: &[RankedResult]) -> Self {
        ScoreColumns {
            resume: results.iter().map(|r| r.resume_path.clone()).collect(),
            score: results.iter().map(|r| r.score).collect(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Orchestration
// ────────────────────────────────────────────────────────────────────────────

/// Runs one ranking request end to end.
pub async fn rank(
    ensemble: Arc<Ensemble>,
    config: &Config,
    request: RankRequest,
) -> Result<Vec<RankedResult>> {
    let request_id = Uuid::new_v4();
    let span = info_span!("rank_request", %request_id);
    run(ensemble, config, request).instrument(span).await
}

async fn run(
    ensemble: Arc<Ensemble>,
    config: &Config,
    request: RankRequest,
) -> Result<Vec<RankedResult>> {
    info!(candidates = request.candidates.len(), "ranking started");

    let filter_en = config.remove_stop_words.then(StopWordFilter::english);
    let filter_fr = config.remove_stop_words.then(StopWordFilter::french);

    // Stage 1: extraction. Both job descriptions and the whole resume pool.
    let (jd_en, jd_fr, routed) = tokio::join!(
        load_job_description(
            request.job_description_en.clone(),
            Language::En,
            filter_en.clone(),
        ),
        load_job_description(
            request.job_description_fr.clone(),
            Language::Fr,
            filter_fr.clone(),
        ),
        extract_resumes(&request.candidates),
    );
    let RoutedPool { en, fr, skipped } = routed?;
    if !skipped.is_empty() {
        info!(skipped = skipped.len(), "resumes excluded during routing");
    }

    // Stage 2: normalization per pool.
    let (en_pool, fr_pool) = tokio::join!(
        normalize_pool(en, filter_en),
        normalize_pool(fr, filter_fr),
    );
    let (en_pool, fr_pool) = (en_pool?, fr_pool?);

    // Stage 3: scoring per bucket.
    let (en_table, fr_table) = tokio::join!(
        score_pool(ensemble.clone(), Language::En, jd_en, en_pool),
        score_pool(ensemble.clone(), Language::Fr, jd_fr, fr_pool),
    );

    let mut tables = Vec::new();
    let mut bucket_errors = Vec::new();
    for (language, outcome) in [(Language::En, en_table), (Language::Fr, fr_table)] {
        match outcome {
            Ok(records) => tables.push(records),
            Err(err) => {
                error!(%language, "bucket failed: {err}");
                bucket_errors.push(err);
            }
        }
    }
    // Results survive a single failed bucket; fail only when nothing scored.
    if tables.iter().all(|table| table.is_empty()) {
        if let Some(err) = bucket_errors.into_iter().next() {
            return Err(err);
        }
    }

    // Stage 4: aggregate, then attach candidate identity.
    let records = rank::aggregate(tables);
    let results = join_identity(records, &request.candidates);
    info!(results = results.len(), "ranking complete");
    Ok(results)
}

/// Extracts and normalizes one job description on the blocking pool.
async fn load_job_description(
    path: PathBuf,
    language: Language,
    filter: Option<StopWordFilter>,
) -> Result<String> {
    let doc = SourceDocument::new(path, DocumentRole::JobDescription);
    let text = task::spawn_blocking(move || {
        let extracted = extract::extract(&doc)?;
        Ok::<_, RankError>(match &filter {
            Some(filter) => normalize::normalize_with(&extracted.text, filter),
            None => normalize::normalize(&extracted.text),
        })
    })
    .await??;
    info!(%language, chars = text.len(), "job description ready");
    Ok(text)
}

/// Extracts every resume on the blocking pool and routes the survivors into
/// language pools. Results are collected in spawn order, so bucket order
/// follows the request's candidate order and score ties stay stable.
async fn extract_resumes(candidates: &[Candidate]) -> Result<RoutedPool> {
    let mut handles = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let doc = SourceDocument::new(candidate.resume_path.clone(), DocumentRole::Resume);
        handles.push(task::spawn_blocking(move || extract::extract(&doc)));
    }

    let mut extracted = Vec::with_capacity(handles.len());
    for handle in handles {
        match handle.await? {
            Ok(text) => extracted.push(text),
            Err(err) if err.is_document_scoped() => {
                warn!("excluding resume from ranking: {err}");
            }
            Err(err) => return Err(err),
        }
    }

    Ok(lang::route(extracted))
}

async fn normalize_pool(
    docs: Vec<ExtractedText>,
    filter: Option<StopWordFilter>,
) -> Result<Vec<NormalizedText>> {
    let pool = task::spawn_blocking(move || {
        docs.iter()
            .map(|doc| NormalizedText::from_extracted(doc, filter.as_ref()))
            .collect()
    })
    .await?;
    Ok(pool)
}

/// Scores one language bucket. An empty bucket contributes no records and
/// tolerates a missing job description; a populated bucket requires its job
/// description and a loadable ensemble.
async fn score_pool(
    ensemble: Arc<Ensemble>,
    language: Language,
    job_description: Result<String>,
    pool: Vec<NormalizedText>,
) -> Result<Vec<ScoreRecord>> {
    if pool.is_empty() {
        if let Err(err) = job_description {
            warn!(%language, "job description unavailable for empty bucket: {err}");
        }
        return Ok(Vec::new());
    }

    let jd = job_description?;
    let records = task::spawn_blocking(move || -> Result<Vec<ScoreRecord>> {
        let scores = ensemble.score_bucket(language, &jd, &pool)?;
        // Emit records in pool order so downstream tie-breaking stays stable.
        Ok(pool
            .iter()
            .filter_map(|doc| {
                scores.get(&doc.id).map(|&score| ScoreRecord {
                    resume_id: doc.id.clone(),
                    language,
                    score,
                })
            })
            .collect())
    })
    .await??;
    Ok(records)
}

/// Resolves each scored resume back to its candidate by path identifier.
fn join_identity(records: Vec<ScoreRecord>, candidates: &[Candidate]) -> Vec<RankedResult> {
    let by_path: HashMap<String, &Candidate> = candidates
        .iter()
        .map(|c| (c.resume_path.to_string_lossy().into_owned(), c))
        .collect();

    records
        .into_iter()
        .filter_map(|record| match by_path.get(record.resume_id.as_str()) {
            Some(candidate) => Some(RankedResult {
                resume_path: record.resume_id,
                language: record.language,
                score: record.score,
                candidate_id: candidate.id,
                display_name: candidate.display_name.clone(),
            }),
            None => {
                warn!(resume = %record.resume_id, "no candidate found for scored resume");
                None
            }
        })
        .collect()
}
