use std::path::PathBuf;

use log::{info, warn};
use rayon::prelude::*;

use crate::annotate::Annotator;
use crate::config::AnalysisConfig;
use crate::corpus::CorpusReader;
use crate::error::Result;
use crate::index::{PaperFields, SearchStore, TermIndex};
use crate::output::OutputWriter;
use crate::progress::ProgressBar;
use crate::stats::{CorpusStats, DocumentOutcome, FrequencyAccumulator};

/// Outcome of one statistics pass.
#[derive(Debug)]
pub struct StatisticsRun {
    pub stats: CorpusStats,
    /// Unreadable or malformed files skipped with a warning.
    pub skipped_files: u64,
}

/// Outcome of one index-build pass.
#[derive(Debug)]
pub struct IndexRun {
    pub indexed: u64,
    pub skipped_files: u64,
    pub snapshot: PathBuf,
}

/// Accumulate corpus statistics over the input directory.
///
/// Annotation (tokenizing and entity extraction) fans out over a worker
/// pool per batch; accumulation stays sequential in source order, so the
/// document ceiling cuts off at the same document regardless of worker
/// completion order and the vocabulary keeps its first-seen order.
pub fn run_statistics<A>(config: &AnalysisConfig, annotator: &A) -> Result<StatisticsRun>
where
    A: Annotator + Sync,
{
    config.validate()?;
    let reader = CorpusReader::open(&config.input_dir)?;
    info!(
        "statistics pass over {} files under {}",
        reader.file_count(),
        reader.root().display()
    );

    let mut accumulator = FrequencyAccumulator::new(config.doc_ceiling);
    let mut progress = ProgressBar::default();
    let total = reader
        .file_count()
        .min(config.doc_ceiling as usize)
        .max(1) as f64;
    let mut skipped_files = 0u64;
    let batch_size = rayon::current_num_threads().max(1) * 4;

    let mut files = reader.iter();
    'pass: loop {
        let mut batch = Vec::with_capacity(batch_size);
        for (path, parsed) in files.by_ref() {
            match parsed {
                Ok(paper) => {
                    batch.push(paper);
                    if batch.len() == batch_size {
                        break;
                    }
                }
                Err(e) => {
                    warn!("skipping {}: {}", path.display(), e);
                    skipped_files += 1;
                }
            }
        }
        if batch.is_empty() {
            break;
        }

        let annotated: Vec<(Vec<String>, Vec<String>)> = batch
            .par_iter()
            .map(|paper| {
                let mut tokens = Vec::new();
                let mut entities = Vec::new();
                for segment in paper.segments() {
                    tokens.extend(annotator.tokenize(segment));
                    entities.extend(annotator.entities(segment));
                }
                (tokens, entities)
            })
            .collect();

        for (tokens, entities) in &annotated {
            match accumulator.add_document(tokens, entities) {
                DocumentOutcome::Counted => {
                    progress.update(accumulator.docs_processed() as f64 / total * 100.0);
                }
                DocumentOutcome::Rejected => {}
                DocumentOutcome::AtCapacity => break 'pass,
            }
        }
        if accumulator.is_full() {
            break;
        }
    }
    progress.finish();

    info!(
        "counted {} documents ({} rejected, {} files skipped)",
        accumulator.docs_processed(),
        accumulator.rejected_docs(),
        skipped_files
    );
    let stats = accumulator.finalize()?;
    Ok(StatisticsRun {
        stats,
        skipped_files,
    })
}

/// Write the four statistics artifacts into the configured output
/// directory.
pub fn write_statistics(config: &AnalysisConfig, stats: &CorpusStats) -> Result<Vec<PathBuf>> {
    let writer = OutputWriter::new(&config.output_dir)?;
    let written = writer.write_all(stats)?;
    info!(
        "wrote {} artifacts to {}",
        written.len(),
        writer.dir().display()
    );
    Ok(written)
}

/// Index up to the configured ceiling of documents and persist the
/// snapshot.
pub fn build_index(config: &AnalysisConfig) -> Result<IndexRun> {
    config.validate()?;
    let reader = CorpusReader::open(&config.input_dir)?;
    info!(
        "indexing up to {} of {} files under {}",
        config.doc_ceiling,
        reader.file_count(),
        reader.root().display()
    );

    let mut index = TermIndex::new();
    let mut progress = ProgressBar::default();
    let total = reader
        .file_count()
        .min(config.doc_ceiling as usize)
        .max(1) as f64;
    let mut skipped_files = 0u64;

    for (path, parsed) in reader.iter() {
        if index.doc_count() as u64 >= config.doc_ceiling {
            break;
        }
        match parsed {
            Ok(paper) => {
                index.add_paper(PaperFields::from_paper(&paper));
                progress.update(index.doc_count() as f64 / total * 100.0);
            }
            Err(e) => {
                warn!("skipping {}: {}", path.display(), e);
                skipped_files += 1;
            }
        }
    }
    progress.finish();

    info!("committing snapshot of {} documents", index.doc_count());
    let snapshot = index.save(&config.index_dir)?;
    Ok(IndexRun {
        indexed: index.doc_count() as u64,
        skipped_files,
        snapshot,
    })
}
