use indexmap::{IndexMap, IndexSet};

use crate::error::{AnalyzerError, Result};

/// Function words of other languages that flag a document as unusable for
/// the English-language statistics ("et" and friends show up wholesale in
/// untranslated papers). A document containing any of these as a token is
/// rejected and contributes nothing to any mapping.
const EXTRANEOUS_FUNCTION_WORDS: &[&str] = &[
    "et", "le", "la", "les", "des", "das", "der", "und", "el", "los", "une", "dei",
];

/// What happened to one document offered to the accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentOutcome {
    /// Counted into every mapping.
    Counted,
    /// Contained an extraneous-language function word; nothing recorded.
    Rejected,
    /// The document ceiling was already reached; nothing recorded.
    AtCapacity,
}

/// Streaming frequency accounting over a corpus pass.
///
/// Consumes one document's token sequence and entity list at a time and
/// maintains four mappings: vocabulary term counts, document frequency
/// (distinct documents per term), entity surface-text counts, and
/// adjacent-pair bigram counts. All maps keep first-seen insertion order.
///
/// The accumulator is consumed by [`FrequencyAccumulator::finalize`], so no
/// document can be added after the statistics are derived.
#[derive(Debug, Clone, Default)]
pub struct FrequencyAccumulator {
    vocabulary: IndexMap<String, u64>,
    doc_freq: IndexMap<String, u64>,
    entity_freq: IndexMap<String, u64>,
    bigram_freq: IndexMap<(String, String), u64>,
    docs_processed: u64,
    rejected_docs: u64,
    doc_ceiling: u64,
}

impl FrequencyAccumulator {
    /// `doc_ceiling` bounds the number of documents counted in this pass.
    pub fn new(doc_ceiling: u64) -> Self {
        FrequencyAccumulator {
            doc_ceiling,
            ..FrequencyAccumulator::default()
        }
    }

    /// Whether the ceiling has been reached.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.docs_processed >= self.doc_ceiling
    }

    #[inline]
    pub fn docs_processed(&self) -> u64 {
        self.docs_processed
    }

    #[inline]
    pub fn rejected_docs(&self) -> u64 {
        self.rejected_docs
    }

    /// Consume one document's tokens and entities.
    ///
    /// Document frequency is incremented at most once per document no matter
    /// how often a term repeats; bigrams are built from adjacent token pairs
    /// and never cross into the next document.
    pub fn add_document<T, E>(&mut self, tokens: &[T], entities: &[E]) -> DocumentOutcome
    where
        T: AsRef<str>,
        E: AsRef<str>,
    {
        if self.is_full() {
            return DocumentOutcome::AtCapacity;
        }
        if tokens.iter().any(|t| is_extraneous(t.as_ref())) {
            self.rejected_docs += 1;
            return DocumentOutcome::Rejected;
        }

        let mut distinct: IndexSet<&str> = IndexSet::with_capacity(tokens.len());
        for token in tokens {
            let token = token.as_ref();
            *self.vocabulary.entry(token.to_string()).or_insert(0) += 1;
            distinct.insert(token);
        }
        for token in distinct {
            *self.doc_freq.entry(token.to_string()).or_insert(0) += 1;
        }
        for entity in entities {
            *self
                .entity_freq
                .entry(entity.as_ref().to_string())
                .or_insert(0) += 1;
        }
        for pair in tokens.windows(2) {
            let key = (pair[0].as_ref().to_string(), pair[1].as_ref().to_string());
            *self.bigram_freq.entry(key).or_insert(0) += 1;
        }

        self.docs_processed += 1;
        DocumentOutcome::Counted
    }

    /// Merge a shard-local accumulator into this one. Counts add
    /// commutatively; the ceiling of `self` keeps applying to further
    /// `add_document` calls.
    pub fn merge(&mut self, other: FrequencyAccumulator) {
        for (term, count) in other.vocabulary {
            *self.vocabulary.entry(term).or_insert(0) += count;
        }
        for (term, count) in other.doc_freq {
            *self.doc_freq.entry(term).or_insert(0) += count;
        }
        for (entity, count) in other.entity_freq {
            *self.entity_freq.entry(entity).or_insert(0) += count;
        }
        for (pair, count) in other.bigram_freq {
            *self.bigram_freq.entry(pair).or_insert(0) += count;
        }
        self.docs_processed += other.docs_processed;
        self.rejected_docs += other.rejected_docs;
    }

    /// Freeze the accumulator into derived statistics. Fails on an empty
    /// pass: every normalization divides by the document count.
    pub fn finalize(self) -> Result<CorpusStats> {
        if self.docs_processed == 0 {
            return Err(AnalyzerError::InsufficientData);
        }
        Ok(CorpusStats {
            vocabulary: self.vocabulary,
            doc_freq: self.doc_freq,
            entity_freq: self.entity_freq,
            bigram_freq: self.bigram_freq,
            docs_processed: self.docs_processed,
            rejected_docs: self.rejected_docs,
        })
    }
}

#[inline]
fn is_extraneous(token: &str) -> bool {
    EXTRANEOUS_FUNCTION_WORDS
        .iter()
        .any(|w| token.eq_ignore_ascii_case(w))
}

/// Round to three decimal places, the precision of every derived figure.
#[inline]
fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Frozen result of an accumulation pass.
///
/// The derived mappings are pure functions of this state; recomputing them
/// yields identical results.
#[derive(Debug, Clone)]
pub struct CorpusStats {
    vocabulary: IndexMap<String, u64>,
    doc_freq: IndexMap<String, u64>,
    entity_freq: IndexMap<String, u64>,
    bigram_freq: IndexMap<(String, String), u64>,
    docs_processed: u64,
    rejected_docs: u64,
}

impl CorpusStats {
    #[inline]
    pub fn docs_processed(&self) -> u64 {
        self.docs_processed
    }

    #[inline]
    pub fn rejected_docs(&self) -> u64 {
        self.rejected_docs
    }

    /// Unique terms in first-seen order.
    pub fn vocabulary_terms(&self) -> Vec<&str> {
        self.vocabulary.keys().map(|t| t.as_str()).collect()
    }

    #[inline]
    pub fn term_count(&self, term: &str) -> u64 {
        self.vocabulary.get(term).copied().unwrap_or(0)
    }

    #[inline]
    pub fn document_frequency(&self, term: &str) -> u64 {
        self.doc_freq.get(term).copied().unwrap_or(0)
    }

    #[inline]
    pub fn entity_count(&self, entity: &str) -> u64 {
        self.entity_freq.get(entity).copied().unwrap_or(0)
    }

    #[inline]
    pub fn bigram_count(&self, left: &str, right: &str) -> u64 {
        self.bigram_freq
            .get(&(left.to_string(), right.to_string()))
            .copied()
            .unwrap_or(0)
    }

    pub fn entity_frequencies(&self) -> &IndexMap<String, u64> {
        &self.entity_freq
    }

    /// Term frequency normalized by the processed-document count, rounded
    /// to three decimals.
    pub fn term_frequency(&self) -> IndexMap<String, f64> {
        let docs = self.docs_processed as f64;
        self.vocabulary
            .iter()
            .map(|(term, &count)| (term.clone(), round3(count as f64 / docs)))
            .collect()
    }

    /// `log10(docs / df)` per term, rounded to three decimals. Defined for
    /// every vocabulary term because document frequency is at least one.
    pub fn inverse_document_frequency(&self) -> IndexMap<String, f64> {
        let docs = self.docs_processed as f64;
        self.doc_freq
            .iter()
            .map(|(term, &df)| (term.clone(), round3((docs / df as f64).log10())))
            .collect()
    }

    /// Bigram counts keyed as `"left right"` for serialization.
    pub fn bigram_frequencies_labeled(&self) -> IndexMap<String, u64> {
        self.bigram_freq
            .iter()
            .map(|((left, right), &count)| (format!("{} {}", left, right), count))
            .collect()
    }
}
