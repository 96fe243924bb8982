use std::path::PathBuf;

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T, E = AnalyzerError> = std::result::Result<T, E>;

/// Error taxonomy of the analysis pipeline.
///
/// Per-document corpus errors are recoverable: the pipeline logs and skips
/// them. An empty search result set is not an error. Everything else
/// terminates the run; these are one-shot batch passes, so there is no
/// retry policy.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// A corpus file could not be opened or did not match the expected
    /// nested-field document format.
    #[error("cannot access corpus file {path}: {source}")]
    CorpusAccess {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Statistics were requested before any document was counted; the
    /// normalizations divide by the processed-document count.
    #[error("no documents processed, statistics are undefined")]
    InsufficientData,

    /// The index snapshot is missing, unreadable, or was written with a
    /// different schema version.
    #[error("search index unavailable: {0}")]
    IndexUnavailable(String),

    /// The question-answering model failed or produced no answer for a chunk.
    #[error("model inference failed: {0}")]
    ModelInference(String),

    /// Invalid configuration, detected before any processing begins.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl AnalyzerError {
    pub fn corpus_access(
        path: impl Into<PathBuf>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        AnalyzerError::CorpusAccess {
            path: path.into(),
            source: source.into(),
        }
    }
}
