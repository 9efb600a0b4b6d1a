//! Interactive evaluation pipeline driver.
//!
//! Prompts for a conversation file, a context file, and an evaluation
//! method, then runs preprocess → evaluate → report, persisting the
//! intermediate and final artifacts under `output/`.

mod report;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail, ensure};
use tracing::info;

use ragmark_core::{EvalConfig, EvalMethod};
use ragmark_eval::{Evaluator, GeminiJudge, LocalEmbeddingProvider};
use ragmark_ingest::preprocess;

const OUTPUT_DIR: &str = "output";

fn list_json_files(data_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(data_dir)
        .with_context(|| format!("failed to read data directory {}", data_dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    ensure!(!files.is_empty(), "no .json files found in {}", data_dir.display());
    Ok(files)
}

fn read_line(prompt: &str) -> Result<String> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn choose_file(heading: &str, files: &[PathBuf]) -> Result<PathBuf> {
    println!("\n{heading}");
    for (i, file) in files.iter().enumerate() {
        println!("{}. {}", i + 1, file.display());
    }
    let choice: usize =
        read_line("Enter choice number: ")?.parse().context("selection must be a number")?;
    ensure!((1..=files.len()).contains(&choice), "selection out of range");
    Ok(files[choice - 1].clone())
}

fn choose_method() -> Result<EvalMethod> {
    println!("\nChoose Evaluation Mode:");
    println!("1 → Lexical (TF-IDF)");
    println!("2 → Embedding");
    println!("3 → LLM Judge (Gemini)");
    println!("4 → Composite Judge (Gemini)");
    match read_line("Enter choice (1/2/3/4): ")?.as_str() {
        "1" => Ok(EvalMethod::Lexical),
        "2" => Ok(EvalMethod::Embedding),
        "3" => Ok(EvalMethod::Judge),
        "4" => Ok(EvalMethod::Composite),
        other => bail!("invalid choice: {other}"),
    }
}

/// Construct the evaluator, loading only the providers the chosen method needs.
fn build_evaluator(method: EvalMethod, config: EvalConfig) -> Result<Evaluator> {
    let mut builder = Evaluator::builder().config(config);

    if method == EvalMethod::Embedding {
        println!("Loading embedding model (first run downloads it)...");
        builder = builder.embedding_provider(Arc::new(LocalEmbeddingProvider::new()?));
    }
    if matches!(method, EvalMethod::Judge | EvalMethod::Composite) {
        builder = builder.judge(Arc::new(GeminiJudge::from_env()?));
    }

    Ok(builder.build())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    println!("\n=== RAGMark Evaluation Pipeline ===");

    let data_dir = std::env::args().nth(1).unwrap_or_else(|| "data".to_string());
    let files = list_json_files(Path::new(&data_dir))?;

    let conversation_path = choose_file("Select a CONVERSATION file:", &files)?;
    println!("Selected conversation file: {}", conversation_path.display());

    let context_path = choose_file("Select a CONTEXT-VECTORS file:", &files)?;
    println!("Selected context file: {}", context_path.display());

    let method = choose_method()?;

    println!("\nStep 1: Preprocessing JSON files...");
    let conversation_raw = fs::read_to_string(&conversation_path)
        .with_context(|| format!("failed to read {}", conversation_path.display()))?;
    let context_raw = fs::read_to_string(&context_path)
        .with_context(|| format!("failed to read {}", context_path.display()))?;

    let config = EvalConfig::default();
    let input = preprocess(&conversation_raw, &context_raw, &config);

    fs::create_dir_all(OUTPUT_DIR)?;
    let processed_path = Path::new(OUTPUT_DIR).join("processed_input.json");
    fs::write(&processed_path, serde_json::to_string_pretty(&input)?)?;
    info!(path = %processed_path.display(), "preprocessing completed");

    println!("\nStep 2: Running evaluation in '{method}' mode...");
    let evaluator = build_evaluator(method, config)?;
    let result = evaluator.evaluate(method, &input).await?;

    let evaluation_path = Path::new(OUTPUT_DIR).join("raw_evaluation.json");
    fs::write(&evaluation_path, serde_json::to_string_pretty(&result)?)?;
    info!(path = %evaluation_path.display(), "evaluation completed");

    println!("\nStep 3: Generating final report...");
    let report_path = Path::new(OUTPUT_DIR).join("final_report.md");
    fs::write(&report_path, report::render(&result))?;

    println!("\n=== PIPELINE COMPLETE ===");
    println!("Processed Input File : {}", processed_path.display());
    println!("Evaluation Result File: {}", evaluation_path.display());
    println!("Final Report File    : {}", report_path.display());

    Ok(())
}
