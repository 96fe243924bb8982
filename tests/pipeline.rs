use std::fs;
use std::path::Path;

use cord_analyzer::{
    answer_question, pipeline, AnalysisConfig, AnalyzerError, BasicAnnotator,
    LexicalOverlapModel, NoSynonyms, TermIndex,
};

fn write_paper(dir: &Path, name: &str, json: &str) {
    fs::write(dir.join(name), json).unwrap();
}

fn corpus_config(root: &Path) -> AnalysisConfig {
    AnalysisConfig {
        input_dir: root.join("corpus"),
        output_dir: root.join("Output"),
        index_dir: root.join("indexed_data"),
        doc_ceiling: 10,
        ..AnalysisConfig::default()
    }
}

fn seed_corpus(root: &Path) {
    let corpus = root.join("corpus");
    fs::create_dir_all(&corpus).unwrap();
    // sorted file names pin the processing order
    write_paper(
        &corpus,
        "01.json",
        r#"{
            "paper_id": "p1",
            "metadata": {"title": "Clinical presentation"},
            "body_text": [{"text": "covid symptom fever"}]
        }"#,
    );
    write_paper(
        &corpus,
        "02.json",
        r#"{
            "paper_id": "p2",
            "metadata": {"title": "Vaccination"},
            "body_text": [{"text": "covid vaccine"}]
        }"#,
    );
    // contains the extraneous function word "et": rejected wholesale
    write_paper(
        &corpus,
        "03.json",
        r#"{
            "paper_id": "p3",
            "metadata": {"title": "Untranslated"},
            "body_text": [{"text": "maladie et fievre"}]
        }"#,
    );
    // malformed: skipped with a warning, not fatal
    write_paper(&corpus, "04.json", "{ this is not json");
}

#[test]
fn statistics_pass_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    seed_corpus(dir.path());
    let config = corpus_config(dir.path());

    let run = pipeline::run_statistics(&config, &BasicAnnotator::new()).unwrap();
    assert_eq!(run.skipped_files, 1);
    assert_eq!(run.stats.docs_processed(), 2);
    assert_eq!(run.stats.rejected_docs(), 1);

    // the rejected document contributed nothing
    assert_eq!(run.stats.term_count("maladie"), 0);
    assert_eq!(run.stats.term_count("fievre"), 0);

    assert_eq!(run.stats.document_frequency("covid"), 2);
    assert_eq!(run.stats.document_frequency("symptom"), 1);
    let idf = run.stats.inverse_document_frequency();
    assert_eq!(idf["covid"], 0.0);
    assert_eq!(idf["symptom"], 0.301);
    let tf = run.stats.term_frequency();
    assert_eq!(tf["covid"], 1.0);
    assert_eq!(tf["vaccine"], 0.5);

    // bigrams never cross documents
    assert_eq!(run.stats.bigram_count("covid", "symptom"), 1);
    assert_eq!(run.stats.bigram_count("fever", "covid"), 0);

    let written = pipeline::write_statistics(&config, &run.stats).unwrap();
    assert_eq!(written.len(), 4);
    for path in &written {
        assert!(path.exists());
    }
}

#[test]
fn ceiling_bounds_the_pass_deterministically() {
    let dir = tempfile::tempdir().unwrap();
    seed_corpus(dir.path());
    let config = AnalysisConfig {
        doc_ceiling: 1,
        ..corpus_config(dir.path())
    };

    let run = pipeline::run_statistics(&config, &BasicAnnotator::new()).unwrap();
    assert_eq!(run.stats.docs_processed(), 1);
    // files are visited in sorted order, so the first document wins
    assert_eq!(run.stats.term_count("covid"), 1);
    assert_eq!(run.stats.term_count("vaccine"), 0);
}

#[test]
fn zero_ceiling_fails_before_touching_the_corpus() {
    let dir = tempfile::tempdir().unwrap();
    // no corpus directory seeded: validation must fire first
    let config = AnalysisConfig {
        doc_ceiling: 0,
        ..corpus_config(dir.path())
    };
    let err = pipeline::run_statistics(&config, &BasicAnnotator::new()).unwrap_err();
    assert!(matches!(err, AnalyzerError::Config(_)));
}

#[test]
fn index_and_ask_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    seed_corpus(dir.path());
    let config = corpus_config(dir.path());

    let run = pipeline::build_index(&config).unwrap();
    assert_eq!(run.indexed, 3);
    assert_eq!(run.skipped_files, 1);
    assert!(run.snapshot.exists());

    let index = TermIndex::load(&config.index_dir).unwrap();
    let report = answer_question(
        "What is a covid symptom?",
        &index,
        &BasicAnnotator::new(),
        &NoSynonyms,
        &LexicalOverlapModel::new(),
        &config,
    )
    .unwrap();

    let best = report.best().expect("retrieval should produce answers");
    assert!(best.score > 0.0);
    assert!(best.span.contains("covid"));
}

#[test]
fn asking_without_an_index_is_index_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let config = corpus_config(dir.path());
    assert!(matches!(
        TermIndex::load(&config.index_dir),
        Err(AnalyzerError::IndexUnavailable(_))
    ));
}
