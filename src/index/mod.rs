use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use indexmap::{IndexMap, IndexSet};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::corpus::Paper;
use crate::error::{AnalyzerError, Result};

/// Bumped whenever the snapshot layout changes; a mismatch on load is an
/// [`AnalyzerError::IndexUnavailable`].
pub const SCHEMA_VERSION: u32 = 1;

const SNAPSHOT_FILE: &str = "index.cbor";

/// The fixed four-field schema handed to the search store: three free-text
/// fields plus an exact-match identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaperFields {
    pub paper_id: String,
    pub title: String,
    pub abstract_text: String,
    pub body: String,
}

impl PaperFields {
    pub fn from_paper(paper: &Paper) -> Self {
        PaperFields {
            paper_id: paper.paper_id.clone(),
            title: paper.title().to_string(),
            abstract_text: paper.abstract_text(),
            body: paper.body(),
        }
    }
}

/// One retrieved document with its relevance score.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub paper_id: String,
    pub title: String,
    pub body: String,
    pub score: f64,
}

/// Narrow collaborator interface over the full-text engine. The QA path
/// depends only on this trait, so the engine can be swapped or mocked.
pub trait SearchStore {
    /// Index one document under the four-field schema.
    fn add_paper(&mut self, fields: PaperFields);

    /// Boolean-OR, multi-field search over `terms`, returning at most
    /// `limit` documents ranked by descending relevance.
    fn search(&self, terms: &[String], limit: usize) -> Vec<SearchHit>;

    fn doc_count(&self) -> usize;
}

/// Built-in term index standing in for the external engine, behind the
/// [`SearchStore`] interface.
///
/// Terms are lowercased at index and query time. Candidates come from the
/// union of per-term postings; ranking is a TF·IDF² dot product over all
/// three text fields. The snapshot persisted by [`TermIndex::save`] is the
/// store's own on-disk format and opaque to everything else.
#[derive(Debug, Serialize, Deserialize)]
pub struct TermIndex {
    schema_version: u32,
    docs: Vec<PaperFields>,
    /// term -> ascending ids of documents containing it
    postings: IndexMap<String, Vec<u32>>,
    /// per-document term counts across title, abstract, and body
    term_counts: Vec<IndexMap<String, u32>>,
    token_sums: Vec<u64>,
}

impl Default for TermIndex {
    fn default() -> Self {
        TermIndex::new()
    }
}

impl TermIndex {
    pub fn new() -> Self {
        TermIndex {
            schema_version: SCHEMA_VERSION,
            docs: Vec::new(),
            postings: IndexMap::new(),
            term_counts: Vec::new(),
            token_sums: Vec::new(),
        }
    }

    /// Index-side analysis: lowercased alphanumeric words, hyphens kept.
    fn index_terms(text: &str) -> impl Iterator<Item = String> + '_ {
        text.split(|c: char| !(c.is_alphanumeric() || c == '-'))
            .map(|w| w.trim_matches('-'))
            .filter(|w| !w.is_empty())
            .map(|w| w.to_lowercase())
    }

    fn idf(&self, term: &str) -> f64 {
        let df = self.postings.get(term).map_or(0, |p| p.len());
        self.docs.len() as f64 / (df as f64 + 1.0)
    }

    fn score(&self, doc_id: usize, query: &IndexMap<String, u32>, query_len: f64) -> f64 {
        let counts = &self.term_counts[doc_id];
        let token_sum = self.token_sums[doc_id] as f64;
        if token_sum == 0.0 {
            return 0.0;
        }
        query
            .iter()
            .map(|(term, &q_count)| {
                let doc_count = counts.get(term).copied().unwrap_or(0) as f64;
                if doc_count == 0.0 {
                    return 0.0;
                }
                let idf = self.idf(term);
                let q_tf = q_count as f64 / query_len;
                let d_tf = doc_count / token_sum;
                q_tf * d_tf * idf * idf
            })
            .sum()
    }

    /// Persist the snapshot under `dir`, creating it if needed.
    pub fn save(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(|e| {
            AnalyzerError::IndexUnavailable(format!(
                "cannot create index directory {}: {}",
                dir.display(),
                e
            ))
        })?;
        let path = dir.join(SNAPSHOT_FILE);
        let file = File::create(&path).map_err(|e| {
            AnalyzerError::IndexUnavailable(format!(
                "cannot write snapshot {}: {}",
                path.display(),
                e
            ))
        })?;
        serde_cbor::to_writer(BufWriter::new(file), self).map_err(|e| {
            AnalyzerError::IndexUnavailable(format!(
                "cannot encode snapshot {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(path)
    }

    /// Load a previously saved snapshot.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let path = dir.as_ref().join(SNAPSHOT_FILE);
        let file = File::open(&path).map_err(|e| {
            AnalyzerError::IndexUnavailable(format!(
                "no snapshot at {}: {}",
                path.display(),
                e
            ))
        })?;
        let index: TermIndex =
            serde_cbor::from_reader(BufReader::new(file)).map_err(|e| {
                AnalyzerError::IndexUnavailable(format!(
                    "cannot decode snapshot {}: {}",
                    path.display(),
                    e
                ))
            })?;
        if index.schema_version != SCHEMA_VERSION {
            return Err(AnalyzerError::IndexUnavailable(format!(
                "schema version {} does not match expected {}",
                index.schema_version, SCHEMA_VERSION
            )));
        }
        Ok(index)
    }
}

impl SearchStore for TermIndex {
    fn add_paper(&mut self, fields: PaperFields) {
        let doc_id = self.docs.len() as u32;
        let mut counts: IndexMap<String, u32> = IndexMap::new();
        let mut token_sum = 0u64;
        for field in [&fields.title, &fields.abstract_text, &fields.body] {
            for term in Self::index_terms(field) {
                *counts.entry(term).or_insert(0) += 1;
                token_sum += 1;
            }
        }
        for term in counts.keys() {
            // each term appears once per document here, so the postings
            // lists stay sorted and deduplicated by construction
            self.postings
                .entry(term.clone())
                .or_default()
                .push(doc_id);
        }
        self.docs.push(fields);
        self.term_counts.push(counts);
        self.token_sums.push(token_sum);
    }

    fn search(&self, terms: &[String], limit: usize) -> Vec<SearchHit> {
        if self.docs.is_empty() || terms.is_empty() || limit == 0 {
            return Vec::new();
        }
        // query-side term frequency over lowercased terms
        let mut query: IndexMap<String, u32> = IndexMap::new();
        for term in terms {
            let term = term.to_lowercase();
            if term.is_empty() {
                continue;
            }
            *query.entry(term).or_insert(0) += 1;
        }
        let query_len: f64 = query.values().map(|&c| c as f64).sum();
        if query_len == 0.0 {
            return Vec::new();
        }

        // boolean-OR candidate set: union of the query terms' postings
        let mut candidates: Vec<u32> = query
            .keys()
            .filter_map(|term| self.postings.get(term))
            .flatten()
            .copied()
            .collect();
        candidates.sort_unstable();
        candidates.dedup();

        let mut hits: Vec<(u32, f64)> = candidates
            .par_iter()
            .map(|&doc_id| (doc_id, self.score(doc_id as usize, &query, query_len)))
            .collect();
        hits.retain(|(_, score)| score.is_finite() && *score > 0.0);
        hits.sort_by(|a, b| b.1.total_cmp(&a.1));
        hits.truncate(limit);

        hits.into_iter()
            .map(|(doc_id, score)| {
                let doc = &self.docs[doc_id as usize];
                SearchHit {
                    paper_id: doc.paper_id.clone(),
                    title: doc.title.clone(),
                    body: doc.body.clone(),
                    score,
                }
            })
            .collect()
    }

    fn doc_count(&self) -> usize {
        self.docs.len()
    }
}

/// De-duplicate query terms while keeping their first-seen order.
pub fn dedup_terms<I, S>(terms: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let set: IndexSet<String> = terms.into_iter().map(Into::into).collect();
    set.into_iter().collect()
}
