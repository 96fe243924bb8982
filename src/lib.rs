//! Batch analysis of a scientific paper corpus: vocabulary statistics,
//! full-text indexing, and retrieval-backed question answering.

pub mod annotate;
pub mod config;
pub mod corpus;
pub mod error;
pub mod index;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod qa;
pub mod stats;

/// Run configuration
/// Enumerates every tunable option of a corpus pass (paths, document
/// ceiling, retrieval and answer limits, synonym expansion, chunk size)
/// and validates it before any processing begins.
pub use config::AnalysisConfig;

/// Error taxonomy and crate result alias.
/// Corpus errors on single documents are recoverable; empty search results
/// are an empty outcome, not an error; everything else terminates the run.
pub use error::{AnalyzerError, Result};

/// Corpus Reader
/// Enumerates the per-document JSON files of a directory tree and parses
/// them lazily into [`corpus::Paper`] values, in deterministic path order.
/// Malformed individual documents are skippable; only an unreadable root
/// is fatal.
pub use corpus::{CorpusReader, Paper};

/// Linguistic annotation seam
/// The pipeline depends only on the [`annotate::Annotator`] and
/// [`annotate::SynonymProvider`] capability interfaces; `BasicAnnotator`
/// and `NoSynonyms` are built-in stand-ins for the external NLP pipeline
/// and lexical database.
pub use annotate::{Annotator, BasicAnnotator, NoSynonyms, StaticSynonyms, SynonymProvider};

/// Frequency Accumulator
/// Streaming term/entity/document-frequency and bigram accounting with a
/// document ceiling. Consumed by `finalize` into frozen [`stats::CorpusStats`],
/// from which normalized term frequency and inverse document frequency are
/// derived.
pub use stats::{CorpusStats, DocumentOutcome, FrequencyAccumulator};

/// Output Writer
/// Serializes a finalized run to the four JSON artifacts (vocabulary, term
/// frequency, inverse document frequency, bigram counts).
pub use output::OutputWriter;

/// Search store
/// [`index::SearchStore`] is the narrow collaborator interface over the
/// full-text engine; [`index::TermIndex`] is the built-in implementation
/// with an opaque on-disk snapshot.
pub use index::{PaperFields, SearchHit, SearchStore, TermIndex};

/// Question answering
/// Chunked extractive QA over retrieved documents, pooled and sorted by
/// confidence.
pub use qa::{answer_question, Answer, AnswerModel, AnswerReport, LexicalOverlapModel};

/// Console progress bar, overwritten in place during long passes.
pub use progress::ProgressBar;
