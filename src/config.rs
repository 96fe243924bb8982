use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{AnalyzerError, Result};

/// Every tunable of a corpus run in one place, passed explicitly at startup.
///
/// The defaults mirror the constants the exploratory passes were written
/// with: up to 10 000 documents per pass, 5 retrieved documents per query,
/// 20 printed answers, no synonym expansion, and 512-word context windows
/// for the answer model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Root of the per-document JSON tree.
    pub input_dir: PathBuf,
    /// Directory receiving the four statistics artifacts.
    pub output_dir: PathBuf,
    /// Directory holding the search index snapshot.
    pub index_dir: PathBuf,
    /// Hard ceiling on documents accepted per pass. A resource bound, not a
    /// correctness requirement; it keeps full-corpus runs affordable.
    pub doc_ceiling: u64,
    /// Documents retrieved per search query.
    pub retrieve_docs: usize,
    /// Answers printed in the final report.
    pub top_answers: usize,
    /// Synonyms expanded per search term (0 disables expansion).
    pub synonyms_per_term: usize,
    /// Context window size, in words, for the answer model.
    pub chunk_words: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            input_dir: PathBuf::from("document_parses"),
            output_dir: PathBuf::from("Output"),
            index_dir: PathBuf::from("indexed_data"),
            doc_ceiling: 10_000,
            retrieve_docs: 5,
            top_answers: 20,
            synonyms_per_term: 0,
            chunk_words: 512,
        }
    }
}

impl AnalysisConfig {
    /// Reject configurations that would make a pass meaningless, before any
    /// file is touched.
    pub fn validate(&self) -> Result<()> {
        if self.doc_ceiling == 0 {
            return Err(AnalyzerError::Config(
                "document ceiling must be positive".to_string(),
            ));
        }
        if self.chunk_words == 0 {
            return Err(AnalyzerError::Config(
                "chunk size must be at least one word".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(AnalysisConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_ceiling_is_a_config_error() {
        let cfg = AnalysisConfig {
            doc_ceiling: 0,
            ..AnalysisConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(AnalyzerError::Config(_))));
    }

    #[test]
    fn zero_chunk_size_is_a_config_error() {
        let cfg = AnalysisConfig {
            chunk_words: 0,
            ..AnalysisConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(AnalyzerError::Config(_))));
    }
}
