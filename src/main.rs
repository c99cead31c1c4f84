//! claim-eval CLI
//!
//! Scores a claim-verification submission against a gold annotation file.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use claim_eval::{
    config::Config,
    dataset::{load_predictions, load_references, pair_examples},
    evaluate::{phase_scores, Evaluation, COVERAGE_METRIC, JUDGED_METRIC},
    llm::LlmClient,
};
use std::path::PathBuf;

/// Score claim-verification submissions against gold annotations
#[derive(Parser)]
#[command(name = "claim-eval")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a submission file against an annotation file
    Score {
        /// Path to the gold annotation file (JSON array)
        #[arg(short, long)]
        annotations: PathBuf,

        /// Path to the submission file (JSON array)
        #[arg(short, long)]
        submission: PathBuf,

        /// Competition phase (dev, test, ...)
        #[arg(short, long, default_value = "dev")]
        phase: String,

        /// Score with the bipartite matcher instead of the judge model
        #[arg(long)]
        offline: bool,

        /// Limit the number of examples scored
        #[arg(long)]
        max_items: Option<usize>,

        /// Override the reporting thresholds
        #[arg(short, long)]
        threshold: Vec<f64>,

        /// Save the phase score map to a JSON file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Test connectivity to the configured judge endpoint
    Test,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Score {
            annotations,
            submission,
            phase,
            offline,
            max_items,
            threshold,
            output,
            verbose,
        } => {
            cmd_score(
                annotations, submission, phase, offline, max_items, threshold, output, verbose,
            )
            .await
        }
        Commands::Test => cmd_test().await,
    }
}

#[allow(clippy::too_many_arguments)]
async fn cmd_score(
    annotations: PathBuf,
    submission: PathBuf,
    phase: String,
    offline: bool,
    max_items: Option<usize>,
    thresholds: Vec<f64>,
    output: Option<PathBuf>,
    verbose: bool,
) -> Result<()> {
    let mut config = Config::load().context("Failed to load configuration")?;

    if !thresholds.is_empty() {
        if offline {
            config.coverage_thresholds = thresholds;
        } else {
            config.judged_thresholds = thresholds;
        }
    }

    if !offline {
        config.validate().context("Invalid configuration")?;
        println!("Judge model: {}", config.judge.model);
    }

    let predictions =
        load_predictions(&submission).context("Failed to load submission file")?;
    let references =
        load_references(&annotations).context("Failed to load annotation file")?;

    let mut examples = pair_examples(predictions, references)?;
    if let Some(max) = max_items {
        examples.truncate(max);
    }

    println!("Scoring {} examples ({} phase)...", examples.len(), phase);

    let evaluation = Evaluation::new(config).verbose(verbose);

    let scores = if offline {
        let run = evaluation.run_offline(&examples)?;
        run.print_summary();
        phase_scores(&phase, COVERAGE_METRIC, run.primary_score())
    } else {
        let run = evaluation.run_judged(&examples).await;
        run.print_summary();
        phase_scores(&phase, JUDGED_METRIC, run.primary_score())
    };

    let json = serde_json::to_string_pretty(&scores)?;
    println!("{}", json);

    if let Some(output_path) = output {
        std::fs::write(&output_path, &json)
            .with_context(|| format!("Failed to write {:?}", output_path))?;
        println!("Results saved to {:?}", output_path);
    }

    Ok(())
}

async fn cmd_test() -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    println!("Testing judge connection...");
    println!("  API base: {}", config.judge.api_base);
    println!("  Model:    {}", config.judge.model);

    let client = LlmClient::new(config.judge);
    client.test_connection().await?;

    println!("Connection OK");
    Ok(())
}
