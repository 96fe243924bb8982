use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AnalyzerError, Result};

/// One paragraph of abstract or body text. Extra fields in the source JSON
/// (citation spans, section labels) are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default = "Metadata::default_title")]
    pub title: String,
}

impl Metadata {
    fn default_title() -> String {
        "No Title".to_string()
    }
}

impl Default for Metadata {
    fn default() -> Self {
        Metadata {
            title: Metadata::default_title(),
        }
    }
}

/// One corpus document: a paper identifier plus its text segments in source
/// order. The fixed nested-field format is `paper_id`, `metadata.title`,
/// and `abstract` / `body_text` lists of paragraph objects carrying `text`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paper {
    pub paper_id: String,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(rename = "abstract", default)]
    pub abstract_segments: Vec<Segment>,
    #[serde(default)]
    pub body_text: Vec<Segment>,
}

impl Paper {
    /// Parse one document file.
    pub fn read(path: &Path) -> Result<Self> {
        let file =
            File::open(path).map_err(|e| AnalyzerError::corpus_access(path, e))?;
        serde_json::from_reader(BufReader::new(file))
            .map_err(|e| AnalyzerError::corpus_access(path, e))
    }

    pub fn title(&self) -> &str {
        &self.metadata.title
    }

    /// Non-empty abstract paragraphs joined with newlines.
    pub fn abstract_text(&self) -> String {
        join_segments(&self.abstract_segments)
    }

    /// Non-empty body paragraphs joined with newlines.
    pub fn body(&self) -> String {
        join_segments(&self.body_text)
    }

    /// All non-empty text segments in source order, abstract first.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.abstract_segments
            .iter()
            .chain(self.body_text.iter())
            .map(|s| s.text.as_str())
            .filter(|t| !t.trim().is_empty())
    }
}

fn join_segments(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|s| s.text.as_str())
        .filter(|t| !t.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Enumerates the document files of a corpus directory tree.
///
/// The file list is collected eagerly (and sorted, so a pass is
/// deterministic); parsing happens lazily per file. A root that cannot be
/// read is fatal, a single unreadable or malformed document is not: callers
/// iterate `(path, Result<Paper>)` pairs and skip failures.
#[derive(Debug)]
pub struct CorpusReader {
    root: PathBuf,
    files: Vec<PathBuf>,
}

impl CorpusReader {
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        let mut files = Vec::new();
        collect_json_files(&root, &mut files)
            .map_err(|e| AnalyzerError::corpus_access(&root, e))?;
        files.sort();
        Ok(CorpusReader { root, files })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Lazy pass over the corpus in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&Path, Result<Paper>)> {
        self.files
            .iter()
            .map(|path| (path.as_path(), Paper::read(path)))
    }
}

fn collect_json_files(dir: &Path, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_json_files(&path, out)?;
        } else if path.extension().is_some_and(|ext| ext == "json") {
            out.push(path);
        }
    }
    Ok(())
}
