use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{AnalyzerError, Result};
use crate::stats::CorpusStats;

pub const VOCABULARY_FILE: &str = "vocabulary.json";
pub const TERM_FREQUENCY_FILE: &str = "term_frequency.json";
pub const IDF_FILE: &str = "inverse_document_frequency.json";
pub const BIGRAM_FILE: &str = "bigram_frequency.json";

/// Serializes the derived statistics of a run to a fixed set of JSON
/// artifacts.
///
/// Each file is written independently in a fixed order; a failure leaves
/// the files already written intact (the artifacts are independent, so no
/// rollback is attempted).
pub struct OutputWriter {
    dir: PathBuf,
}

impl OutputWriter {
    /// Create the output directory if needed.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|e| AnalyzerError::corpus_access(&dir, e))?;
        Ok(OutputWriter { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write all four artifacts: the vocabulary list (first-seen order),
    /// normalized term frequency, inverse document frequency, and raw
    /// bigram counts.
    pub fn write_all(&self, stats: &CorpusStats) -> Result<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(4);
        written.push(self.write_json(VOCABULARY_FILE, &stats.vocabulary_terms())?);
        written.push(self.write_json(TERM_FREQUENCY_FILE, &stats.term_frequency())?);
        written.push(self.write_json(IDF_FILE, &stats.inverse_document_frequency())?);
        written.push(self.write_json(BIGRAM_FILE, &stats.bigram_frequencies_labeled())?);
        Ok(written)
    }

    fn write_json<T: Serialize>(&self, name: &str, value: &T) -> Result<PathBuf> {
        let path = self.dir.join(name);
        let file =
            File::create(&path).map_err(|e| AnalyzerError::corpus_access(&path, e))?;
        serde_json::to_writer_pretty(BufWriter::new(file), value)
            .map_err(|e| AnalyzerError::corpus_access(&path, e))?;
        Ok(path)
    }
}
