use std::env;

use anyhow::{bail, Context};
use cord_analyzer::{
    answer_question, pipeline, AnalysisConfig, BasicAnnotator, LexicalOverlapModel, NoSynonyms,
    TermIndex,
};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // ---- hand-rolled CLI parsing ----
    // cord-analyzer stats [flags]         accumulate and write statistics
    // cord-analyzer index [flags]         build and persist the search index
    // cord-analyzer ask "QUESTION" [flags]  retrieval QA over the index
    let mut args = env::args().skip(1);
    let Some(command) = args.next() else {
        print_usage();
        bail!("missing command");
    };
    if command == "-h" || command == "--help" {
        print_usage();
        return Ok(());
    }

    let mut config = AnalysisConfig::default();
    let mut question: Option<String> = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--input" => config.input_dir = next_value(&mut args, "--input")?.into(),
            "--output" => config.output_dir = next_value(&mut args, "--output")?.into(),
            "--index" => config.index_dir = next_value(&mut args, "--index")?.into(),
            "--limit" => config.doc_ceiling = parse_flag(&mut args, "--limit")?,
            "--top-docs" => config.retrieve_docs = parse_flag(&mut args, "--top-docs")?,
            "--answers" => config.top_answers = parse_flag(&mut args, "--answers")?,
            "--synonyms" => config.synonyms_per_term = parse_flag(&mut args, "--synonyms")?,
            "--chunk-words" => config.chunk_words = parse_flag(&mut args, "--chunk-words")?,
            "-h" | "--help" => {
                print_usage();
                return Ok(());
            }
            other => {
                if command == "ask" && question.is_none() {
                    question = Some(other.to_string());
                } else {
                    bail!("unexpected argument: {}", other);
                }
            }
        }
    }

    match command.as_str() {
        "stats" => run_stats(&config),
        "index" => run_index(&config),
        "ask" => {
            let Some(question) = question else {
                bail!("ask requires a question, e.g. ask \"What are the symptoms of COVID-19?\"");
            };
            run_ask(&config, &question)
        }
        other => {
            print_usage();
            bail!("unknown command: {}", other);
        }
    }
}

fn next_value(args: &mut impl Iterator<Item = String>, flag: &str) -> anyhow::Result<String> {
    args.next()
        .with_context(|| format!("{} requires a value", flag))
}

fn parse_flag<T: std::str::FromStr>(
    args: &mut impl Iterator<Item = String>,
    flag: &str,
) -> anyhow::Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    next_value(args, flag)?
        .parse()
        .with_context(|| format!("{} requires a number", flag))
}

fn run_stats(config: &AnalysisConfig) -> anyhow::Result<()> {
    let annotator = BasicAnnotator::new();
    let run = pipeline::run_statistics(config, &annotator)?;
    let written = pipeline::write_statistics(config, &run.stats)?;
    println!(
        "Processed {} documents ({} rejected, {} files skipped), vocabulary of {} terms.",
        run.stats.docs_processed(),
        run.stats.rejected_docs(),
        run.skipped_files,
        run.stats.vocabulary_terms().len()
    );
    for path in written {
        println!("  wrote {}", path.display());
    }
    Ok(())
}

fn run_index(config: &AnalysisConfig) -> anyhow::Result<()> {
    let run = pipeline::build_index(config)?;
    println!(
        "Finished indexing {} documents ({} files skipped), snapshot at {}.",
        run.indexed,
        run.skipped_files,
        run.snapshot.display()
    );
    Ok(())
}

fn run_ask(config: &AnalysisConfig, question: &str) -> anyhow::Result<()> {
    let index = TermIndex::load(&config.index_dir)?;
    let annotator = BasicAnnotator::new();
    let model = LexicalOverlapModel::new();
    let report = answer_question(question, &index, &annotator, &NoSynonyms, &model, config)?;

    println!("Question: {}", report.question);
    if report.answers.is_empty() {
        println!("No answers found.");
        return Ok(());
    }
    for answer in report.top(config.top_answers) {
        println!("Answer: {} (score: {:.3})", answer.span, answer.score);
    }
    if let Some(best) = report.best() {
        println!(
            "\nThe best answer is '{}' with a score of {:.3}",
            best.span, best.score
        );
    }
    Ok(())
}

fn print_usage() {
    eprintln!("Usage: cord-analyzer <stats|index|ask \"QUESTION\"> [flags]");
    eprintln!("  --input DIR        corpus root (default: document_parses)");
    eprintln!("  --output DIR       statistics artifacts (default: Output)");
    eprintln!("  --index DIR        index snapshot (default: indexed_data)");
    eprintln!("  --limit N          document ceiling per pass (default: 10000)");
    eprintln!("  --top-docs N       documents retrieved per query (default: 5)");
    eprintln!("  --answers N        answers printed (default: 20)");
    eprintln!("  --synonyms N       synonyms expanded per term (default: 0)");
    eprintln!("  --chunk-words N    QA context window in words (default: 512)");
}
