//! Merging per-example judgments back onto the ordered example batch.
//!
//! Judgments may be missing (parse failures, exhausted retries) and may
//! arrive in any order, so aggregation keys strictly on `example_id`
//! through a map built once. A missing judgment zeroes that example's
//! contribution; the mean runs over the full batch either way.

use crate::dataset::Example;
use crate::judge::Judgment;
use std::collections::HashMap;

/// Label-accuracy conditioned on judged evidence recall, one score per
/// reporting threshold.
///
/// Per example: indicator = 1 iff its judgment's recall is strictly
/// above the threshold AND the predicted label matches the gold label.
/// Examples without a judgment contribute 0.
pub fn aggregate_judged(
    examples: &[Example],
    judgments: &[Judgment],
    thresholds: &[f64],
) -> Vec<f64> {
    let mut by_id: HashMap<usize, &Judgment> = HashMap::new();
    for judgment in judgments {
        // First judgment for an id wins, deterministically.
        by_id.entry(judgment.example_id).or_insert(judgment);
    }

    let mut totals = vec![0.0f64; thresholds.len()];
    for example in examples {
        let Some(judgment) = by_id.get(&example.id) else {
            continue;
        };
        if !example.labels_match() {
            continue;
        }
        for (slot, threshold) in totals.iter_mut().zip(thresholds) {
            if judgment.recall > *threshold {
                *slot += 1.0;
            }
        }
    }

    mean_over(&totals, examples.len())
}

/// Label-accuracy conditioned on matcher coverage, one score per
/// reporting threshold.
///
/// `coverages` is parallel to `examples`; `None` marks an example whose
/// coverage could not be computed (it contributes 0).
pub fn aggregate_coverage(
    examples: &[Example],
    coverages: &[Option<f64>],
    thresholds: &[f64],
) -> Vec<f64> {
    let mut totals = vec![0.0f64; thresholds.len()];
    for (example, coverage) in examples.iter().zip(coverages) {
        let Some(coverage) = coverage else {
            continue;
        };
        if !example.labels_match() {
            continue;
        }
        for (slot, threshold) in totals.iter_mut().zip(thresholds) {
            if *coverage > *threshold {
                *slot += 1.0;
            }
        }
    }

    mean_over(&totals, examples.len())
}

/// Mean coverage over the batch; missing coverages count as 0.
pub fn mean_coverage(coverages: &[Option<f64>]) -> f64 {
    if coverages.is_empty() {
        return 0.0;
    }
    let sum: f64 = coverages.iter().map(|c| c.unwrap_or(0.0)).sum();
    sum / coverages.len() as f64
}

/// Plain label accuracy over the batch, ignoring evidence quality.
pub fn veracity_accuracy(examples: &[Example]) -> f64 {
    if examples.is_empty() {
        return 0.0;
    }
    let correct = examples.iter().filter(|e| e.labels_match()).count();
    correct as f64 / examples.len() as f64
}

fn mean_over(totals: &[f64], count: usize) -> Vec<f64> {
    if count == 0 {
        return vec![0.0; totals.len()];
    }
    totals.iter().map(|t| t / count as f64).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::example_with_labels;

    fn judgment(example_id: usize, recall: f64) -> Judgment {
        Judgment {
            example_id,
            precision: recall,
            recall,
        }
    }

    #[test]
    fn test_empty_judgments_all_zero() {
        let examples = vec![
            example_with_labels(0, "Supported", "Supported"),
            example_with_labels(1, "Refuted", "Refuted"),
        ];
        let scores = aggregate_judged(&examples, &[], &[0.25, 0.46]);
        assert_eq!(scores, vec![0.0, 0.0]);
    }

    #[test]
    fn test_empty_examples_all_zero() {
        let scores = aggregate_judged(&[], &[judgment(0, 0.9)], &[0.46]);
        assert_eq!(scores, vec![0.0]);
    }

    #[test]
    fn test_threshold_is_strict() {
        let examples = vec![example_with_labels(0, "Refuted", "Refuted")];
        let judgments = vec![judgment(0, 0.5)];

        let scores = aggregate_judged(&examples, &judgments, &[0.46, 0.5]);
        assert_eq!(scores[0], 1.0); // 0.5 > 0.46
        assert_eq!(scores[1], 0.0); // 0.5 > 0.5 is false
    }

    #[test]
    fn test_wrong_label_zeroes_indicator() {
        let examples = vec![example_with_labels(0, "Supported", "Refuted")];
        let judgments = vec![judgment(0, 1.0)];

        let scores = aggregate_judged(&examples, &judgments, &[0.46]);
        assert_eq!(scores, vec![0.0]);
    }

    #[test]
    fn test_missing_judgments_count_against_mean() {
        // Judge produced usable output for examples 0 and 2 only.
        let examples = vec![
            example_with_labels(0, "Supported", "Supported"),
            example_with_labels(1, "Supported", "Supported"),
            example_with_labels(2, "Refuted", "Refuted"),
        ];
        let judgments = vec![judgment(0, 0.9), judgment(2, 0.9)];

        let scores = aggregate_judged(&examples, &judgments, &[0.46]);
        assert!((scores[0] - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_judgment_order_does_not_matter() {
        let examples = vec![
            example_with_labels(0, "Supported", "Supported"),
            example_with_labels(1, "Refuted", "Refuted"),
            example_with_labels(2, "Refuted", "Supported"),
        ];
        let in_order = vec![judgment(0, 0.9), judgment(1, 0.3), judgment(2, 0.9)];
        let shuffled = vec![judgment(2, 0.9), judgment(0, 0.9), judgment(1, 0.3)];

        let a = aggregate_judged(&examples, &in_order, &[0.25, 0.46]);
        let b = aggregate_judged(&examples, &shuffled, &[0.25, 0.46]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_duplicate_ids_first_wins() {
        let examples = vec![example_with_labels(0, "Refuted", "Refuted")];
        let judgments = vec![judgment(0, 0.9), judgment(0, 0.1)];

        let scores = aggregate_judged(&examples, &judgments, &[0.46]);
        assert_eq!(scores, vec![1.0]);
    }

    #[test]
    fn test_aggregate_coverage() {
        let examples = vec![
            example_with_labels(0, "Supported", "Supported"),
            example_with_labels(1, "Refuted", "Refuted"),
        ];
        let coverages = vec![Some(0.8), None];

        let scores = aggregate_coverage(&examples, &coverages, &[0.25]);
        assert!((scores[0] - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_mean_coverage_missing_counts_as_zero() {
        assert_eq!(mean_coverage(&[]), 0.0);
        let coverages = vec![Some(1.0), None, Some(0.5)];
        assert!((mean_coverage(&coverages) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_veracity_accuracy() {
        let examples = vec![
            example_with_labels(0, "Supported", "Supported"),
            example_with_labels(1, "Refuted", "Supported"),
        ];
        assert!((veracity_accuracy(&examples) - 0.5).abs() < 1e-9);
        assert_eq!(veracity_accuracy(&[]), 0.0);
    }
}
