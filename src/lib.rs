//! claim-eval - scoring for claim-verification benchmark submissions.
//!
//! A submission supplies, per claim, a predicted veracity label and
//! question/answer evidence; the gold annotation supplies the correct
//! label and reference evidence. This crate scores the submission two
//! ways:
//!
//! 1. **Offline**: predicted evidence is aligned to reference evidence by
//!    maximum-weight bipartite matching over a word-level similarity
//!    matrix, and the matched weight (normalized by the reference count)
//!    is the coverage score.
//! 2. **Judged**: a remote judge model breaks both evidence texts into
//!    atomic facts and counts cross-support, yielding fact-level
//!    precision and recall per example.
//!
//! Either signal is then combined with label correctness: an example
//! scores 1 at a reporting threshold iff its evidence quality is strictly
//! above the threshold and its predicted label matches the gold label;
//! the final score per threshold is the mean over the whole batch.
//!
//! # Quick Start
//!
//! ```no_run
//! use claim_eval::{
//!     config::Config,
//!     dataset::{load_predictions, load_references, pair_examples},
//!     evaluate::{phase_scores, Evaluation, JUDGED_METRIC},
//! };
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     config.validate()?;
//!
//!     let predictions = load_predictions(Path::new("submission.json"))?;
//!     let references = load_references(Path::new("gold.json"))?;
//!     let examples = pair_examples(predictions, references)?;
//!
//!     let run = Evaluation::new(config).run_judged(&examples).await;
//!     run.print_summary();
//!
//!     let output = phase_scores("dev", JUDGED_METRIC, run.primary_score());
//!     println!("{}", serde_json::to_string_pretty(&output)?);
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - **dataset**: submission/annotation records and evidence flattening
//! - **metric**: pairwise word-level similarity between evidence strings
//! - **matcher**: optimal assignment of predicted to reference evidence
//! - **llm** / **judge**: retry-protected judge calls and strict parsing
//! - **aggregate**: keyed merge of judgments onto the ordered batch
//! - **evaluate**: run orchestration and the phase score map

pub mod aggregate;
pub mod config;
pub mod dataset;
pub mod error;
pub mod evaluate;
pub mod judge;
pub mod llm;
pub mod matcher;
pub mod metric;

// Re-export commonly used types
pub use config::{Config, JudgeConfig};
pub use dataset::{Example, Prediction, Reference};
pub use error::{EvalError, Result};
pub use evaluate::{Evaluation, JudgedRun, OfflineRun, PhaseScores};
pub use judge::{Judgment, JudgmentClient};
pub use matcher::EvidenceMatcher;
pub use metric::{MeteorScorer, PairwiseScorer};
