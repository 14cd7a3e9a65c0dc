use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, RankError>;

/// Engine-level error type.
///
/// Per-document variants (`UnsupportedFormat`, `Extraction`,
/// `LanguageUnsupported`) exclude a single document from the batch.
/// `ModelUnavailable` aborts the affected language bucket. `Io` and `Task`
/// are terminal for the invocation.
#[derive(Debug, Error)]
pub enum RankError {
    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("Extraction failed: {0}")]
    Extraction(String),

    #[error("Unsupported language: {0}")]
    LanguageUnsupported(String),

    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl RankError {
    /// True for errors that drop one document without failing the batch.
    pub fn is_document_scoped(&self) -> bool {
        matches!(
            self,
            RankError::UnsupportedFormat(_)
                | RankError::Extraction(_)
                | RankError::LanguageUnsupported(_)
        )
    }
}
