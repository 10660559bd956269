//! geocomply: verify compliance reasoning against a regulation corpus and
//! label synthetic features with jurisdiction rules.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use geocomply_core::{VerificationConfig, Vocabulary};
use geocomply_corpus::RegulationCorpus;
use geocomply_rules::{ComplianceRuleEngine, RuleEngineConfig};
use geocomply_verify::{TracingLogger, VerificationAgent};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod cases;
mod display;

use display::OutputFormat;

#[derive(Parser)]
#[command(name = "geocomply", version, about = "Geo-compliance evidence verification")]
struct Cli {
    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify every case in a JSON file against the regulation corpus
    Verify {
        /// Directory of <regulation>.txt files
        #[arg(long, env = "GEOCOMPLY_CORPUS_DIR")]
        corpus: PathBuf,
        /// JSON array of cases
        #[arg(long)]
        cases: PathBuf,
        #[arg(long, value_enum, default_value = "markdown")]
        format: OutputFormat,
        /// JSON file overriding verification thresholds
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Label feature records with the jurisdiction rule engine
    Evaluate {
        /// JSON array of feature records
        #[arg(long)]
        features: PathBuf,
        /// JSON file overriding rule engine settings
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// List the regulations in a corpus directory
    Corpus {
        #[arg(long, env = "GEOCOMPLY_CORPUS_DIR")]
        corpus: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Verify {
            corpus,
            cases,
            format,
            config,
        } => cmd_verify(&corpus, &cases, format, config.as_deref()),
        Commands::Evaluate { features, config } => cmd_evaluate(&features, config.as_deref()),
        Commands::Corpus { corpus } => cmd_corpus(&corpus),
    }
}

fn load_corpus(dir: &Path, vocabulary: &Vocabulary) -> anyhow::Result<RegulationCorpus> {
    RegulationCorpus::load(dir, vocabulary)
        .with_context(|| format!("failed to load regulation corpus from {}", dir.display()))
}

fn cmd_verify(
    corpus_dir: &Path,
    cases_path: &Path,
    format: OutputFormat,
    config_path: Option<&Path>,
) -> anyhow::Result<()> {
    let config = match config_path {
        Some(path) => VerificationConfig::from_json_file(path)
            .with_context(|| format!("invalid verification config {}", path.display()))?,
        None => VerificationConfig::default(),
    };

    let vocabulary = Arc::new(Vocabulary::standard());
    let corpus = Arc::new(load_corpus(corpus_dir, &vocabulary)?);
    let cases = cases::load_cases(cases_path)?;
    info!(cases = cases.len(), regulations = corpus.len(), "verifying");

    let mut agent = VerificationAgent::new(corpus, vocabulary, &config).with_logger(TracingLogger);
    for case in &cases {
        agent.verify_case(
            &case.case_id,
            &case.reasoning_text,
            &case.evidence_spans,
            &case.regulation_references,
        );
    }

    println!("{}", display::render_history(agent.history(), &agent.stats(), format)?);
    Ok(())
}

fn cmd_evaluate(features_path: &Path, config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = match config_path {
        Some(path) => RuleEngineConfig::from_json_file(path)
            .with_context(|| format!("invalid rule engine config {}", path.display()))?,
        None => RuleEngineConfig::default(),
    };
    let engine = ComplianceRuleEngine::new(config);

    let features = cases::load_features(features_path)?;
    info!(features = features.len(), "evaluating");
    for (feature_id, record) in &features {
        let evaluation = engine.evaluate_json(record);
        println!("{}", display::evaluation_line(feature_id, &evaluation)?);
    }
    Ok(())
}

fn cmd_corpus(corpus_dir: &Path) -> anyhow::Result<()> {
    let vocabulary = Vocabulary::standard();
    let corpus = load_corpus(corpus_dir, &vocabulary)?;
    println!("{}", display::render_corpus(&corpus));
    Ok(())
}
