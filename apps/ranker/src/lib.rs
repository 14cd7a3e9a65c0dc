//! Resume-to-job-description relevance ranking engine.
//!
//! Given one job posting as parallel English/French description documents and
//! a pool of `.pdf`/`.docx` resumes in mixed languages, produces a ranked,
//! scored list of candidates by textual relevance.
//!
//! # Pipeline
//!
//! ```text
//! files → extract → route by language → normalize → score per bucket → rank
//! ```
//!
//! Stages run fork-join on the tokio runtime with a join barrier between
//! stages; per-document parsing and vector math run on the blocking pool.
//! Each language bucket is scored by its own tokenizer ensemble: two English
//! variants, three French variants. All intermediate state is request-scoped
//! and in-memory; only the loaded tokenizers are shared across invocations.

pub mod config;
pub mod errors;
pub mod extract;
pub mod lang;
pub mod normalize;
pub mod pipeline;
pub mod rank;
pub mod score;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::Config;
pub use errors::{RankError, Result};
pub use lang::Language;
pub use pipeline::{Candidate, RankRequest, RankedResult};
pub use rank::{ScoreColumns, ScoreRecord};
pub use score::Ensemble;
