//! Submission and annotation records for the benchmark.
//!
//! A submission is a JSON array of predictions; the gold annotation is a
//! parallel JSON array of references. The two are paired positionally into
//! an ordered example batch before scoring.

use crate::error::{EvalError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::Path;

/// Marker used when a reference question has no accepted answer.
pub const NO_ANSWER_MARKER: &str = "No answer could be found.";

/// One question/answer evidence item in a submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictedQa {
    pub question: String,
    pub answer: String,
    /// Source URL for the answer, if the system reported one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// One accepted answer to a reference question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceAnswer {
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boolean_explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

/// One reference question with its accepted answers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceQa {
    pub question: String,
    /// Annotation files sometimes carry a single answer object instead
    /// of a list; both shapes are accepted.
    #[serde(default, deserialize_with = "answers_list")]
    pub answers: Vec<ReferenceAnswer>,
}

fn answers_list<'de, D>(deserializer: D) -> std::result::Result<Vec<ReferenceAnswer>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        Many(Vec<ReferenceAnswer>),
        One(ReferenceAnswer),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::Many(answers)) => answers,
        Some(OneOrMany::One(answer)) => vec![answer],
    })
}

/// One predicted record from a submission file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    /// Stable claim id; falls back to the record's position when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claim_id: Option<u64>,
    pub claim: String,
    pub pred_label: String,
    #[serde(default)]
    pub evidence: Vec<PredictedQa>,
    /// Free-form evidence passages some systems submit instead of (or in
    /// addition to) QA pairs.
    #[serde(default)]
    pub string_evidence: Vec<String>,
}

/// One gold record from an annotation file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claim_id: Option<u64>,
    pub claim: String,
    pub label: String,
    #[serde(default)]
    pub questions: Vec<ReferenceQa>,
    #[serde(default)]
    pub string_evidence: Vec<String>,
}

/// One claim under evaluation: a prediction paired with its gold reference.
#[derive(Debug, Clone)]
pub struct Example {
    /// Position in the input batch; unique and used to key judgments.
    pub id: usize,
    pub claim: String,
    pub predicted_label: String,
    pub gold_label: String,
    pub predicted_evidence: Vec<PredictedQa>,
    pub reference_evidence: Vec<ReferenceQa>,
    pub predicted_string_evidence: Vec<String>,
    pub reference_string_evidence: Vec<String>,
}

impl Example {
    /// Flatten predicted evidence into comparison strings: one per QA
    /// item, followed by any free-form evidence passages.
    pub fn predicted_strings(&self) -> Vec<String> {
        self.predicted_evidence
            .iter()
            .map(|qa| format!("{} {}", qa.question, qa.answer))
            .chain(self.predicted_string_evidence.iter().cloned())
            .collect()
    }

    /// Flatten predicted evidence into question-only comparison strings.
    pub fn predicted_questions(&self) -> Vec<String> {
        self.predicted_evidence
            .iter()
            .map(|qa| qa.question.clone())
            .collect()
    }

    /// Flatten reference evidence into comparison strings.
    ///
    /// A question with several accepted answers yields one string per
    /// answer; a question with none yields a single "no answer" string.
    /// Boolean answers carry their explanation when present.
    pub fn reference_strings(&self) -> Vec<String> {
        let mut strings = Vec::new();

        for qa in &self.reference_evidence {
            if qa.answers.is_empty() {
                strings.push(format!("{} {}", qa.question, NO_ANSWER_MARKER));
                continue;
            }

            for answer in &qa.answers {
                let mut s = format!("{} {}", qa.question, answer.answer);
                if answer.answer_type.as_deref() == Some("Boolean") {
                    if let Some(explanation) = &answer.boolean_explanation {
                        s.push_str(". ");
                        s.push_str(explanation);
                    }
                }
                strings.push(s);
            }
        }

        strings.extend(self.reference_string_evidence.iter().cloned());
        strings
    }

    /// Flatten reference evidence into question-only comparison strings.
    pub fn reference_questions(&self) -> Vec<String> {
        self.reference_evidence
            .iter()
            .map(|qa| qa.question.clone())
            .collect()
    }

    /// Render predicted evidence as a prompt block.
    pub fn predicted_evidence_text(&self) -> String {
        self.predicted_evidence
            .iter()
            .map(|qa| format!("Question: {}\nAnswer: {}\n\n", qa.question, qa.answer))
            .collect()
    }

    /// Render reference evidence as a prompt block (first accepted answer
    /// per question, the no-answer marker otherwise).
    pub fn reference_evidence_text(&self) -> String {
        self.reference_evidence
            .iter()
            .map(|qa| {
                let answer = qa
                    .answers
                    .first()
                    .map(|a| a.answer.as_str())
                    .unwrap_or(NO_ANSWER_MARKER);
                format!("Question: {}\nAnswer: {}\n\n", qa.question, answer)
            })
            .collect()
    }

    /// Whether the predicted label agrees with the gold label.
    ///
    /// Submissions vary in casing, so the comparison is case-insensitive
    /// on trimmed text.
    pub fn labels_match(&self) -> bool {
        self.predicted_label.trim().to_lowercase() == self.gold_label.trim().to_lowercase()
    }
}

/// Load a submission file (JSON array of predictions).
pub fn load_predictions(path: &Path) -> Result<Vec<Prediction>> {
    let content = fs::read_to_string(path).map_err(|e| EvalError::io(path, e))?;
    serde_json::from_str(&content)
        .map_err(|e| EvalError::Serialization(format!("Invalid submission file: {}", e)))
}

/// Load an annotation file (JSON array of references).
pub fn load_references(path: &Path) -> Result<Vec<Reference>> {
    let content = fs::read_to_string(path).map_err(|e| EvalError::io(path, e))?;
    serde_json::from_str(&content)
        .map_err(|e| EvalError::Serialization(format!("Invalid annotation file: {}", e)))
}

/// Pair predictions with references positionally into an example batch.
///
/// The two collections must have the same length; an uneven batch means
/// the submission does not cover the annotation set and scoring cannot
/// proceed.
pub fn pair_examples(
    predictions: Vec<Prediction>,
    references: Vec<Reference>,
) -> Result<Vec<Example>> {
    if predictions.len() != references.len() {
        return Err(EvalError::MalformedInput(format!(
            "Submission has {} records but annotation has {}",
            predictions.len(),
            references.len()
        )));
    }

    Ok(predictions
        .into_iter()
        .zip(references)
        .enumerate()
        .map(|(id, (pred, reference))| Example {
            id,
            claim: reference.claim,
            predicted_label: pred.pred_label,
            gold_label: reference.label,
            predicted_evidence: pred.evidence,
            reference_evidence: reference.questions,
            predicted_string_evidence: pred.string_evidence,
            reference_string_evidence: reference.string_evidence,
        })
        .collect())
}

#[cfg(test)]
pub(crate) fn example_with_labels(id: usize, predicted: &str, gold: &str) -> Example {
    Example {
        id,
        claim: format!("claim {}", id),
        predicted_label: predicted.to_string(),
        gold_label: gold.to_string(),
        predicted_evidence: vec![PredictedQa {
            question: "Q?".to_string(),
            answer: "A.".to_string(),
            url: None,
        }],
        reference_evidence: vec![ReferenceQa {
            question: "Q?".to_string(),
            answers: vec![ReferenceAnswer {
                answer: "A.".to_string(),
                answer_type: None,
                boolean_explanation: None,
                source_url: None,
            }],
        }],
        predicted_string_evidence: vec![],
        reference_string_evidence: vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_qa(question: &str, answers: Vec<ReferenceAnswer>) -> ReferenceQa {
        ReferenceQa {
            question: question.to_string(),
            answers,
        }
    }

    #[test]
    fn test_reference_strings_one_per_answer() {
        let example = Example {
            predicted_evidence: vec![],
            reference_evidence: vec![reference_qa(
                "Who said it?",
                vec![
                    ReferenceAnswer {
                        answer: "Alice".to_string(),
                        answer_type: None,
                        boolean_explanation: None,
                        source_url: None,
                    },
                    ReferenceAnswer {
                        answer: "Bob".to_string(),
                        answer_type: None,
                        boolean_explanation: None,
                        source_url: None,
                    },
                ],
            )],
            ..example_with_labels(0, "Supported", "Supported")
        };

        let strings = example.reference_strings();
        assert_eq!(strings.len(), 2);
        assert_eq!(strings[0], "Who said it? Alice");
        assert_eq!(strings[1], "Who said it? Bob");
    }

    #[test]
    fn test_reference_strings_no_answer_marker() {
        let example = Example {
            predicted_evidence: vec![],
            reference_evidence: vec![reference_qa("Where was it published?", vec![])],
            ..example_with_labels(0, "Refuted", "Refuted")
        };

        let strings = example.reference_strings();
        assert_eq!(strings.len(), 1);
        assert_eq!(
            strings[0],
            "Where was it published? No answer could be found."
        );
    }

    #[test]
    fn test_reference_strings_boolean_explanation() {
        let example = Example {
            predicted_evidence: vec![],
            reference_evidence: vec![reference_qa(
                "Is it true?",
                vec![ReferenceAnswer {
                    answer: "No".to_string(),
                    answer_type: Some("Boolean".to_string()),
                    boolean_explanation: Some("The event never happened".to_string()),
                    source_url: None,
                }],
            )],
            ..example_with_labels(0, "Refuted", "Refuted")
        };

        let strings = example.reference_strings();
        assert_eq!(strings[0], "Is it true? No. The event never happened");
    }

    #[test]
    fn test_labels_match_case_insensitive() {
        let example = example_with_labels(0, "refuted", "Refuted");
        assert!(example.labels_match());

        let example = example_with_labels(0, "Supported", "Refuted");
        assert!(!example.labels_match());
    }

    #[test]
    fn test_pair_examples_assigns_positional_ids() {
        let predictions = vec![
            Prediction {
                claim_id: Some(7),
                claim: "a".to_string(),
                pred_label: "Supported".to_string(),
                evidence: vec![],
                string_evidence: vec![],
            },
            Prediction {
                claim_id: None,
                claim: "b".to_string(),
                pred_label: "Refuted".to_string(),
                evidence: vec![],
                string_evidence: vec![],
            },
        ];
        let references = vec![
            Reference {
                claim_id: Some(7),
                claim: "a".to_string(),
                label: "Supported".to_string(),
                questions: vec![],
                string_evidence: vec![],
            },
            Reference {
                claim_id: None,
                claim: "b".to_string(),
                label: "Refuted".to_string(),
                questions: vec![],
                string_evidence: vec![],
            },
        ];

        let examples = pair_examples(predictions, references).unwrap();
        assert_eq!(examples.len(), 2);
        assert_eq!(examples[0].id, 0);
        assert_eq!(examples[1].id, 1);
    }

    #[test]
    fn test_pair_examples_rejects_uneven_batch() {
        let predictions = vec![Prediction {
            claim_id: None,
            claim: "a".to_string(),
            pred_label: "Supported".to_string(),
            evidence: vec![],
            string_evidence: vec![],
        }];

        let result = pair_examples(predictions, vec![]);
        assert!(matches!(result, Err(EvalError::MalformedInput(_))));
    }

    #[test]
    fn test_load_predictions_from_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"claim": "The sky is green", "pred_label": "Refuted",
                 "evidence": [{{"question": "What colour is the sky?", "answer": "Blue"}}]}}]"#
        )
        .unwrap();

        let predictions = load_predictions(file.path()).unwrap();
        assert_eq!(predictions.len(), 1);
        assert_eq!(predictions[0].pred_label, "Refuted");
        assert_eq!(predictions[0].evidence.len(), 1);
    }

    #[test]
    fn test_string_evidence_joins_comparison_strings() {
        let example = Example {
            predicted_evidence: vec![],
            predicted_string_evidence: vec!["The photo was taken in 2020.".to_string()],
            reference_string_evidence: vec!["A related archived article.".to_string()],
            ..example_with_labels(0, "Refuted", "Refuted")
        };

        // An evidence-less prediction with string evidence still has
        // something to match.
        let predicted = example.predicted_strings();
        assert_eq!(predicted, vec!["The photo was taken in 2020.".to_string()]);

        // Reference string evidence goes after the QA strings.
        let reference = example.reference_strings();
        assert_eq!(reference.len(), 2);
        assert_eq!(reference[0], "Q? A.");
        assert_eq!(reference[1], "A related archived article.");
    }

    #[test]
    fn test_load_predictions_with_string_evidence() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"claim": "c", "pred_label": "Refuted",
                 "string_evidence": ["Passage one.", "Passage two."]}}]"#
        )
        .unwrap();

        let predictions = load_predictions(file.path()).unwrap();
        assert!(predictions[0].evidence.is_empty());
        assert_eq!(predictions[0].string_evidence.len(), 2);
    }

    #[test]
    fn test_reference_answers_accepts_single_object() {
        let json = r#"{"claim": "c", "label": "Refuted",
                       "questions": [{"question": "Q?",
                                      "answers": {"answer": "A."}}]}"#;

        let reference: Reference = serde_json::from_str(json).unwrap();
        assert_eq!(reference.questions[0].answers.len(), 1);
        assert_eq!(reference.questions[0].answers[0].answer, "A.");

        // List form still parses.
        let json = r#"{"claim": "c", "label": "Refuted",
                       "questions": [{"question": "Q?",
                                      "answers": [{"answer": "A."}, {"answer": "B."}]}]}"#;
        let reference: Reference = serde_json::from_str(json).unwrap();
        assert_eq!(reference.questions[0].answers.len(), 2);
    }

    #[test]
    fn test_load_predictions_rejects_missing_keys() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        // No pred_label
        write!(file, r#"[{{"claim": "The sky is green"}}]"#).unwrap();

        assert!(load_predictions(file.path()).is_err());
    }
}
