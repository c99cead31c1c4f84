//! Remote judgment pipeline: retry-protected judge calls and strict
//! parsing of the returned fact counts.
//!
//! The judge is asked to break both evidence texts into atomic facts and
//! count how many facts each side supports of the other. Its reply is
//! free-form structured text; parsing normalizes common quoting variants
//! once, decodes strictly, and rejects anything that still fails. An
//! example whose judge call or parse fails is skipped, never fabricated.

use crate::config::JudgeConfig;
use crate::error::{EvalError, Result};
use crate::llm::LlmClient;
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;

/// The parsed outcome of judging one example's evidence.
#[derive(Debug, Clone, PartialEq)]
pub struct Judgment {
    /// Position of the example in the batch.
    pub example_id: usize,
    /// Supported predicted facts / total predicted facts.
    pub precision: f64,
    /// Supported reference facts / total reference facts.
    pub recall: f64,
}

/// Transport seam for the judge endpoint, so the retry loop can be tested
/// without a network.
pub trait JudgeBackend {
    fn ask(&self, prompt: &str) -> impl Future<Output = Result<String>> + Send;
}

impl JudgeBackend for LlmClient {
    async fn ask(&self, prompt: &str) -> Result<String> {
        self.complete(None, prompt).await
    }
}

/// Wait before the next attempt after failed attempt `attempt` (1-based):
/// 10, 100, 1000, ... seconds. Aggressive on purpose; the retry ceiling
/// caps the total.
pub fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_secs(10u64.pow(attempt))
}

/// Judge client with bounded retries and exponential backoff.
///
/// Calls are sequential: one request in flight at a time, and a retry
/// wait suspends the whole batch. Expected batch sizes and judge rate
/// limits make this acceptable.
pub struct JudgmentClient<B> {
    backend: B,
    max_retries: u32,
}

impl JudgmentClient<LlmClient> {
    /// Create a client against a real judge endpoint.
    pub fn new(config: JudgeConfig) -> Self {
        let max_retries = config.max_retries;
        Self {
            backend: LlmClient::new(config),
            max_retries,
        }
    }
}

impl<B: JudgeBackend> JudgmentClient<B> {
    /// Create a client over an arbitrary backend (used in tests).
    pub fn with_backend(backend: B, max_retries: u32) -> Self {
        Self {
            backend,
            max_retries,
        }
    }

    /// Ask the judge, retrying the same prompt on any failure.
    ///
    /// Returns `None` once all attempts are exhausted; a single
    /// unreachable judge must not fail the whole evaluation run.
    pub async fn judge(&self, prompt: &str) -> Option<String> {
        for attempt in 1..=self.max_retries {
            match self.backend.ask(prompt).await {
                Ok(response) => return Some(response),
                Err(err) => {
                    eprintln!("Judge request failed (attempt {}): {}", attempt, err);
                    if attempt < self.max_retries {
                        tokio::time::sleep(backoff_delay(attempt)).await;
                    }
                }
            }
        }
        None
    }
}

/// Raw count fields the judge is contracted to return.
#[derive(Debug, Deserialize)]
struct RawCounts {
    #[serde(rename = "support predicted evidence")]
    support_predicted: i64,
    #[serde(rename = "facts count predicted evidence")]
    total_predicted: i64,
    #[serde(rename = "support reference evidence")]
    support_reference: i64,
    #[serde(rename = "facts count reference evidence")]
    total_reference: i64,
}

/// Parse a raw judge reply into a [`Judgment`].
///
/// Decoding is attempted strictly first; on failure, one normalization
/// pass rewrites the single-quote variants some models emit and decoding
/// is attempted again. A reply that still fails, or whose total counts
/// are not positive, is a [`EvalError::Parse`] and the caller drops the
/// example's judgment.
pub fn parse_judgment(example_id: usize, raw: &str) -> Result<Judgment> {
    let payload = extract_json(raw);
    if payload.trim().is_empty() {
        return Err(EvalError::Parse("empty judge response".to_string()));
    }

    let counts: RawCounts = match serde_json::from_str(&payload) {
        Ok(counts) => counts,
        Err(_) => {
            let normalized = normalize_quotes(&payload);
            serde_json::from_str(&normalized)
                .map_err(|e| EvalError::Parse(format!("{}: {}", e, raw)))?
        }
    };

    if counts.total_predicted <= 0 || counts.total_reference <= 0 {
        return Err(EvalError::Parse(format!(
            "non-positive fact counts: predicted {}, reference {}",
            counts.total_predicted, counts.total_reference
        )));
    }

    // Support counts outside 0..=total would push precision or recall
    // out of [0, 1]; such a reply is miscounted, not usable.
    if counts.support_predicted < 0 || counts.support_predicted > counts.total_predicted {
        return Err(EvalError::Parse(format!(
            "predicted support {} out of range for {} facts",
            counts.support_predicted, counts.total_predicted
        )));
    }
    if counts.support_reference < 0 || counts.support_reference > counts.total_reference {
        return Err(EvalError::Parse(format!(
            "reference support {} out of range for {} facts",
            counts.support_reference, counts.total_reference
        )));
    }

    Ok(Judgment {
        example_id,
        precision: counts.support_predicted as f64 / counts.total_predicted as f64,
        recall: counts.support_reference as f64 / counts.total_reference as f64,
    })
}

/// Rewrite the single-quote JSON variants some judge models emit.
fn normalize_quotes(payload: &str) -> String {
    payload
        .replace(": '", ": \"")
        .replace("',", "\",")
        .replace("':", "\":")
}

/// Extract the JSON object from a reply that may wrap it in markdown
/// fences or surrounding prose.
fn extract_json(response: &str) -> String {
    let response = response.trim();

    if response.starts_with("```") {
        if let Some(end) = response.rfind("```") {
            let start = response.find('\n').map(|n| n + 1).unwrap_or(3);
            if end > start {
                return response[start..end].trim().to_string();
            }
        }
    }

    if let Some(start) = response.find('{') {
        if let Some(end) = response.rfind('}') {
            if end > start {
                return response[start..=end].to_string();
            }
        }
    }

    response.to_string()
}
