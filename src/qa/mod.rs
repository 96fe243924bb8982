use std::collections::HashSet;

use log::info;

use crate::annotate::{Annotator, BasicAnnotator, SynonymProvider};
use crate::config::AnalysisConfig;
use crate::error::{AnalyzerError, Result};
use crate::index::{dedup_terms, SearchStore};
use crate::progress::ProgressBar;

/// One extractive answer: a verbatim span from a context chunk and the
/// model's confidence in it.
#[derive(Debug, Clone)]
pub struct Answer {
    pub span: String,
    pub score: f64,
}

/// Capability interface over the external extractive QA model.
pub trait AnswerModel {
    fn answer(&self, question: &str, context: &str) -> Result<Answer>;
}

/// Deterministic extractive stand-in for the external transformer.
///
/// Picks the context sentence sharing the most content terms with the
/// question; the score is the shared fraction of the question's terms.
/// Real models plug in behind [`AnswerModel`].
#[derive(Default)]
pub struct LexicalOverlapModel {
    annotator: BasicAnnotator,
}

impl LexicalOverlapModel {
    pub fn new() -> Self {
        LexicalOverlapModel::default()
    }

    fn sentences(context: &str) -> Vec<&str> {
        context
            .split_inclusive(['.', '?', '!'])
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

impl AnswerModel for LexicalOverlapModel {
    fn answer(&self, question: &str, context: &str) -> Result<Answer> {
        let question_terms: HashSet<String> = self
            .annotator
            .tokenize(question)
            .into_iter()
            .map(|t| t.to_lowercase())
            .collect();
        let sentences = Self::sentences(context);
        if sentences.is_empty() {
            return Err(AnalyzerError::ModelInference(
                "no answer: context chunk is empty".to_string(),
            ));
        }

        let mut best = sentences[0];
        let mut best_overlap = 0usize;
        for &sentence in &sentences {
            let overlap = self
                .annotator
                .tokenize(sentence)
                .iter()
                .filter(|t| question_terms.contains(&t.to_lowercase()))
                .collect::<HashSet<_>>()
                .len();
            if overlap > best_overlap {
                best = sentence;
                best_overlap = overlap;
            }
        }
        let score = if question_terms.is_empty() {
            0.0
        } else {
            best_overlap as f64 / question_terms.len() as f64
        };
        Ok(Answer {
            span: best.to_string(),
            score,
        })
    }
}

/// Split `text` into bounded context windows: each paragraph (newline
/// separated) is cut into consecutive at-most-`limit`-word chunks. No
/// window crosses a paragraph boundary.
pub fn chunk_words(text: &str, limit: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    for paragraph in text.split('\n') {
        let words: Vec<&str> = paragraph.split_whitespace().collect();
        for window in words.chunks(limit.max(1)) {
            if !window.is_empty() {
                chunks.push(window.join(" "));
            }
        }
    }
    chunks
}

/// Pooled answers of one question over the whole retrieved set, sorted by
/// descending confidence. Answers may be near-duplicate spans from
/// overlapping chunks; no deduplication is applied.
#[derive(Debug)]
pub struct AnswerReport {
    pub question: String,
    pub answers: Vec<Answer>,
}

impl AnswerReport {
    pub fn top(&self, n: usize) -> &[Answer] {
        &self.answers[..n.min(self.answers.len())]
    }

    pub fn best(&self) -> Option<&Answer> {
        self.answers.first()
    }
}

/// Run the retrieval-QA path for one question.
///
/// Entities and key terms extracted from the question (optionally broadened
/// with synonyms) form a boolean-OR query; each retrieved document's body is
/// chunked into word windows and every chunk is submitted independently to
/// the model. An empty retrieval is an empty report, not an error.
pub fn answer_question<S, A, Y, M>(
    question: &str,
    store: &S,
    annotator: &A,
    synonyms: &Y,
    model: &M,
    config: &AnalysisConfig,
) -> Result<AnswerReport>
where
    S: SearchStore,
    A: Annotator,
    Y: SynonymProvider,
    M: AnswerModel,
{
    config.validate()?;

    let mut terms: Vec<String> = annotator.entities(question);
    terms.extend(annotator.key_terms(question));
    let mut terms = dedup_terms(terms);
    if config.synonyms_per_term > 0 {
        let mut expanded = Vec::new();
        for term in &terms {
            expanded.extend(synonyms.synonyms(term, config.synonyms_per_term));
        }
        terms.extend(expanded);
        terms = dedup_terms(terms);
    }
    info!("search terms: {}", terms.join(" OR "));

    let hits = store.search(&terms, config.retrieve_docs);
    if hits.is_empty() {
        return Ok(AnswerReport {
            question: question.to_string(),
            answers: Vec::new(),
        });
    }

    let mut answers = Vec::new();
    let mut progress = ProgressBar::default();
    for (doc_idx, hit) in hits.iter().enumerate() {
        let chunks = chunk_words(&hit.body, config.chunk_words);
        for (chunk_idx, chunk) in chunks.iter().enumerate() {
            answers.push(model.answer(question, chunk)?);
            let pct = (doc_idx as f64 + (chunk_idx + 1) as f64 / chunks.len() as f64)
                / hits.len() as f64
                * 100.0;
            progress.update(pct);
        }
    }
    progress.finish();

    answers.retain(|a| !a.score.is_nan());
    answers.sort_by(|a, b| b.score.total_cmp(&a.score));
    Ok(AnswerReport {
        question: question.to_string(),
        answers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::NoSynonyms;
    use crate::index::{PaperFields, SearchHit, TermIndex};

    #[test]
    fn chunks_respect_the_word_limit_and_paragraphs() {
        let text = "one two three four five\nsix seven";
        let chunks = chunk_words(text, 3);
        assert_eq!(
            chunks,
            vec!["one two three", "four five", "six seven"]
        );
    }

    #[test]
    fn single_paragraph_shorter_than_the_limit_is_one_chunk() {
        assert_eq!(chunk_words("just a few words", 512), vec!["just a few words"]);
    }

    #[test]
    fn empty_text_produces_no_chunks() {
        assert!(chunk_words("", 512).is_empty());
        assert!(chunk_words("\n\n", 512).is_empty());
    }

    #[test]
    fn overlap_model_extracts_the_most_related_sentence() {
        let model = LexicalOverlapModel::new();
        let answer = model
            .answer(
                "What are the symptoms of COVID-19?",
                "The study enrolled 200 patients. Common symptoms of COVID-19 \
                 include fever and cough. Funding was provided by the university.",
            )
            .unwrap();
        assert!(answer.span.contains("fever and cough"));
        assert!(answer.score > 0.0);
    }

    #[test]
    fn overlap_model_errors_on_an_empty_chunk() {
        let model = LexicalOverlapModel::new();
        assert!(matches!(
            model.answer("question?", "   "),
            Err(AnalyzerError::ModelInference(_))
        ));
    }

    struct FixedModel;
    impl AnswerModel for FixedModel {
        fn answer(&self, _q: &str, context: &str) -> Result<Answer> {
            // score encodes the chunk length so ordering is observable
            Ok(Answer {
                span: context.to_string(),
                score: context.len() as f64,
            })
        }
    }

    struct EmptyStore;
    impl SearchStore for EmptyStore {
        fn add_paper(&mut self, _fields: PaperFields) {}
        fn search(&self, _terms: &[String], _limit: usize) -> Vec<SearchHit> {
            Vec::new()
        }
        fn doc_count(&self) -> usize {
            0
        }
    }

    fn test_config() -> AnalysisConfig {
        AnalysisConfig {
            chunk_words: 3,
            ..AnalysisConfig::default()
        }
    }

    #[test]
    fn empty_retrieval_is_an_empty_report_not_an_error() {
        let report = answer_question(
            "What are the symptoms?",
            &EmptyStore,
            &BasicAnnotator::new(),
            &NoSynonyms,
            &FixedModel,
            &test_config(),
        )
        .unwrap();
        assert!(report.answers.is_empty());
        assert!(report.best().is_none());
    }

    #[test]
    fn answers_pool_across_chunks_and_sort_by_descending_score() {
        let mut index = TermIndex::new();
        index.add_paper(PaperFields {
            paper_id: "p1".to_string(),
            title: "symptoms".to_string(),
            abstract_text: String::new(),
            body: "short chunk\na noticeably longer second paragraph here".to_string(),
        });

        let report = answer_question(
            "What are the symptoms?",
            &index,
            &BasicAnnotator::new(),
            &NoSynonyms,
            &FixedModel,
            &test_config(),
        )
        .unwrap();

        assert!(report.answers.len() >= 2, "chunks pooled independently");
        for pair in report.answers.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        assert_eq!(report.top(1).len(), 1);
        assert_eq!(report.best().unwrap().span, report.answers[0].span);
    }

    #[test]
    fn synonym_expansion_broadens_the_query() {
        let mut index = TermIndex::new();
        index.add_paper(PaperFields {
            paper_id: "p1".to_string(),
            title: "influenza outbreak".to_string(),
            abstract_text: String::new(),
            body: "influenza cases rose sharply.".to_string(),
        });

        let mut synonyms = crate::annotate::StaticSynonyms::new();
        synonyms.insert("flu", &["influenza"]);

        let without = answer_question(
            "How did the flu spread?",
            &index,
            &BasicAnnotator::new(),
            &NoSynonyms,
            &FixedModel,
            &test_config(),
        )
        .unwrap();
        assert!(without.answers.is_empty());

        let cfg = AnalysisConfig {
            synonyms_per_term: 1,
            ..test_config()
        };
        let with = answer_question(
            "How did the flu spread?",
            &index,
            &BasicAnnotator::new(),
            &synonyms,
            &FixedModel,
            &cfg,
        )
        .unwrap();
        assert!(!with.answers.is_empty());
    }
}
