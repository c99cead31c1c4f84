//! Optimal alignment of predicted evidence against reference evidence.
//!
//! Builds a pairwise similarity matrix between the two evidence lists and
//! solves the maximum-weight one-to-one assignment over it. The summed
//! weight of the matched pairs, divided by the reference count, is the
//! coverage score: unmatched reference items contribute zero, so sparse
//! predicted evidence is penalized.

use crate::error::{EvalError, Result};
use crate::metric::PairwiseScorer;

/// Predicted evidence lists are truncated to this many items before
/// matching; judge and metric cost grow with the product of the two list
/// lengths and submitted lists are sometimes pathologically long.
pub const MAX_EVIDENCE_ITEMS: usize = 10;

/// Pairs predicted and reference evidence strings and reduces the optimal
/// assignment to a single coverage score.
pub struct EvidenceMatcher<S> {
    scorer: S,
    max_predicted: usize,
}

impl<S: PairwiseScorer> EvidenceMatcher<S> {
    pub fn new(scorer: S) -> Self {
        Self {
            scorer,
            max_predicted: MAX_EVIDENCE_ITEMS,
        }
    }

    /// Override the predicted-evidence cap (mainly for tests).
    pub fn with_max_predicted(mut self, max_predicted: usize) -> Self {
        self.max_predicted = max_predicted;
        self
    }

    /// Coverage of `reference` by `predicted` in `[0, 1]`.
    ///
    /// Returns `DegenerateInput` when `reference` is empty (coverage is
    /// undefined, not zero) and `0.0` when `predicted` is empty.
    pub fn coverage(&self, predicted: &[String], reference: &[String]) -> Result<f64> {
        if reference.is_empty() {
            return Err(EvalError::DegenerateInput);
        }
        if predicted.is_empty() {
            return Ok(0.0);
        }

        let predicted = &predicted[..predicted.len().min(self.max_predicted)];

        let mut scores = vec![vec![0.0f64; reference.len()]; predicted.len()];
        for (i, src) in predicted.iter().enumerate() {
            for (j, tgt) in reference.iter().enumerate() {
                scores[i][j] = self.scorer.score(src, tgt);
            }
        }

        let matched_weight = max_weight_assignment(&scores);
        Ok(matched_weight / reference.len() as f64)
    }
}

/// Total weight of the maximum-weight one-to-one assignment on a
/// rectangular weight matrix.
///
/// Hungarian algorithm with potentials on the square matrix obtained by
/// zero-padding the shorter side; padded cells carry no weight, so the
/// effective matching size is `min(m, n)`. Tie-breaking follows index
/// order and is deterministic for a fixed input.
fn max_weight_assignment(weights: &[Vec<f64>]) -> f64 {
    let m = weights.len();
    if m == 0 {
        return 0.0;
    }
    let n = weights[0].len();
    if n == 0 {
        return 0.0;
    }
    let size = m.max(n);

    // Minimization on negated weights; padding is cost 0.
    let cost = |i: usize, j: usize| -> f64 {
        if i < m && j < n {
            -weights[i][j]
        } else {
            0.0
        }
    };

    let mut u = vec![0.0f64; size + 1];
    let mut v = vec![0.0f64; size + 1];
    // p[j] = row (1-based) assigned to column j; 0 = unassigned.
    let mut p = vec![0usize; size + 1];
    let mut way = vec![0usize; size + 1];

    for i in 1..=size {
        p[0] = i;
        let mut j0 = 0usize;
        let mut minv = vec![f64::INFINITY; size + 1];
        let mut used = vec![false; size + 1];

        loop {
            used[j0] = true;
            let i0 = p[j0];
            let mut delta = f64::INFINITY;
            let mut j1 = 0usize;

            for j in 1..=size {
                if used[j] {
                    continue;
                }
                let cur = cost(i0 - 1, j - 1) - u[i0] - v[j];
                if cur < minv[j] {
                    minv[j] = cur;
                    way[j] = j0;
                }
                if minv[j] < delta {
                    delta = minv[j];
                    j1 = j;
                }
            }

            for j in 0..=size {
                if used[j] {
                    u[p[j]] += delta;
                    v[j] -= delta;
                } else {
                    minv[j] -= delta;
                }
            }

            j0 = j1;
            if p[j0] == 0 {
                break;
            }
        }

        // Augment along the found path.
        loop {
            let j1 = way[j0];
            p[j0] = p[j1];
            j0 = j1;
            if j0 == 0 {
                break;
            }
        }
    }

    let mut total = 0.0;
    for j in 1..=size {
        let i = p[j];
        if i != 0 && i - 1 < m && j - 1 < n {
            total += weights[i - 1][j - 1];
        }
    }
    total
}
