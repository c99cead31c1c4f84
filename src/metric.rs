//! Pairwise text similarity between evidence strings.
//!
//! The default scorer is a word-level METEOR-style metric: unigram
//! alignment between candidate and reference, a recall-weighted harmonic
//! mean of precision and recall, and a fragmentation penalty for
//! scattered matches.

/// Scores how well a candidate string covers a reference string.
///
/// Scores are in `[0, 1]`, deterministic, and not required to be
/// symmetric. Empty input on either side scores 0.
pub trait PairwiseScorer: Send + Sync {
    fn score(&self, candidate: &str, reference: &str) -> f64;
}

/// METEOR-style unigram similarity with exact word matching.
#[derive(Debug, Clone, Default)]
pub struct MeteorScorer;

/// Weight of recall in the harmonic mean (METEOR alpha).
const ALPHA: f64 = 0.9;
/// Fragmentation penalty weight (METEOR gamma).
const GAMMA: f64 = 0.5;
/// Fragmentation penalty exponent (METEOR beta).
const BETA: f64 = 3.0;

/// Split text into lowercase word tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}

impl PairwiseScorer for MeteorScorer {
    fn score(&self, candidate: &str, reference: &str) -> f64 {
        let cand = tokenize(candidate);
        let reference = tokenize(reference);

        if cand.is_empty() || reference.is_empty() {
            return 0.0;
        }

        // Align each candidate token to the first unused identical
        // reference token, left to right. Deterministic by construction.
        let mut used = vec![false; reference.len()];
        let mut alignment: Vec<(usize, usize)> = Vec::new();

        for (i, token) in cand.iter().enumerate() {
            if let Some(j) = reference
                .iter()
                .enumerate()
                .position(|(j, r)| !used[j] && r == token)
            {
                used[j] = true;
                alignment.push((i, j));
            }
        }

        let matches = alignment.len();
        if matches == 0 {
            return 0.0;
        }

        let precision = matches as f64 / cand.len() as f64;
        let recall = matches as f64 / reference.len() as f64;
        let fmean = (precision * recall) / (ALPHA * precision + (1.0 - ALPHA) * recall);

        // A chunk is a run of matches contiguous in both strings.
        let mut chunks = 1usize;
        for window in alignment.windows(2) {
            let (i0, j0) = window[0];
            let (i1, j1) = window[1];
            if i1 != i0 + 1 || j1 != j0 + 1 {
                chunks += 1;
            }
        }

        let penalty = GAMMA * (chunks as f64 / matches as f64).powf(BETA);
        fmean * (1.0 - penalty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_strings_score_high() {
        let scorer = MeteorScorer;
        let score = scorer.score("the cat sat on the mat", "the cat sat on the mat");
        // Single contiguous chunk: fmean 1.0, penalty gamma * (1/m)^3
        assert!(score > 0.95);
        assert!(score <= 1.0);
    }

    #[test]
    fn test_disjoint_strings_score_zero() {
        let scorer = MeteorScorer;
        assert_eq!(scorer.score("alpha beta", "gamma delta"), 0.0);
    }

    #[test]
    fn test_empty_inputs_score_zero() {
        let scorer = MeteorScorer;
        assert_eq!(scorer.score("", "the reference"), 0.0);
        assert_eq!(scorer.score("the candidate", ""), 0.0);
        assert_eq!(scorer.score("", ""), 0.0);
    }

    #[test]
    fn test_score_in_unit_interval() {
        let scorer = MeteorScorer;
        let cases = [
            ("the cat", "the cat sat"),
            ("a b c d e", "e d c b a"),
            ("one two three", "one three"),
            ("Punctuation, should. not! matter?", "punctuation should not matter"),
        ];
        for (cand, reference) in cases {
            let score = scorer.score(cand, reference);
            assert!((0.0..=1.0).contains(&score), "{} out of range", score);
        }
    }

    #[test]
    fn test_scattered_matches_penalized() {
        let scorer = MeteorScorer;
        let contiguous = scorer.score("the quick brown fox", "the quick brown fox jumps");
        let scattered = scorer.score("fox brown quick the", "the quick brown fox jumps");
        assert!(contiguous > scattered);
    }

    #[test]
    fn test_deterministic() {
        let scorer = MeteorScorer;
        let a = scorer.score("repeated words words words", "words repeated twice");
        let b = scorer.score("repeated words words words", "words repeated twice");
        assert_eq!(a, b);
    }

    #[test]
    fn test_tokenize_lowercases_and_splits() {
        assert_eq!(
            tokenize("The Cat-sat, on THE mat!"),
            vec!["the", "cat", "sat", "on", "the", "mat"]
        );
        assert!(tokenize("  ...  ").is_empty());
    }
}
