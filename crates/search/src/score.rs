//! Edit-distance scoring of search hits.

use std::collections::HashMap;

// Empirically fitted weighting curve for the relevance probability the
// indexed-search collaborator attaches to a hit. At probability 1.0 the
// multiplier is ln(1.1052) ≈ 0.10, shrinking the effective distance of a
// confident hit; at 0.0 it is ln(7.5576) ≈ 2.02, pushing a doubtful hit
// down the list. The constants are product-tuned; do not re-derive them.
const PROBABILITY_WEIGHT_BASE: f64 = 7.5576;
const PROBABILITY_WEIGHT_SLOPE: f64 = 6.4524;

/// Iterative Levenshtein edit distance over Unicode scalar values.
///
/// Two-row dynamic programming: O(n·m) time, O(min(n, m)) space, no
/// recursion whatever the input length.
fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    // Keep the shorter string on the column axis so the rows stay small.
    let (short, long) = if a.len() <= b.len() { (&a, &b) } else { (&b, &a) };
    if short.is_empty() {
        return long.len();
    }
    let mut prev: Vec<usize> = (0..=short.len()).collect();
    let mut curr: Vec<usize> = vec![0; short.len() + 1];
    for (i, lc) in long.iter().enumerate() {
        curr[0] = i + 1;
        for (j, sc) in short.iter().enumerate() {
            let substitute = prev[j] + usize::from(lc != sc);
            curr[j + 1] = substitute.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[short.len()]
}

/// Scores candidate titles against a query; lower is better.
///
/// One `Scorer` lives for exactly one search operation. Distances are
/// memoized keyed by the *unordered* string pair (distance is symmetric),
/// so repeated title fragments within a batch are computed once; the cache
/// dies with the operation and never grows across queries.
///
/// Case handling is the caller's job: both operands must already be
/// lower-cased.
#[derive(Debug, Default)]
pub struct Scorer {
    cache: HashMap<(String, String), usize>,
}

impl Scorer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Score `title` against `query`, weighted by the hit's relevance
    /// probability when one is attached.
    pub fn score(&mut self, query: &str, title: &str, probability: Option<f64>) -> f64 {
        let distance = self.distance(query, title) as f64;
        match probability {
            Some(p) => distance * (PROBABILITY_WEIGHT_BASE - PROBABILITY_WEIGHT_SLOPE * p).ln(),
            None => distance,
        }
    }

    /// Memoized edit distance.
    pub fn distance(&mut self, a: &str, b: &str) -> usize {
        let key = if a <= b { (a.to_string(), b.to_string()) } else { (b.to_string(), a.to_string()) };
        if let Some(&distance) = self.cache.get(&key) {
            return distance;
        }
        let distance = levenshtein(a, b);
        self.cache.insert(key, distance);
        distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_known_distance() {
        assert_eq!(levenshtein("kitten", "sitting"), 3);
    }

    #[rstest]
    #[case("", "", 0)]
    #[case("paris", "", 5)]
    #[case("", "paris", 5)]
    #[case("paris", "paris", 0)]
    #[case("paris", "parris", 1)]
    #[case("flaw", "lawn", 2)]
    #[case("café", "cafe", 1)]
    fn test_distance_cases(#[case] a: &str, #[case] b: &str, #[case] expected: usize) {
        assert_eq!(levenshtein(a, b), expected);
    }

    #[rstest]
    #[case("kitten", "sitting")]
    #[case("levenshtein", "frankenstein")]
    #[case("a", "abcdefgh")]
    #[case("乌镇", "乌镇周边")]
    fn test_distance_is_symmetric(#[case] a: &str, #[case] b: &str) {
        assert_eq!(levenshtein(a, b), levenshtein(b, a));
    }

    #[test]
    fn test_memoization_is_pair_order_insensitive() {
        let mut scorer = Scorer::new();
        assert_eq!(scorer.distance("kitten", "sitting"), 3);
        assert_eq!(scorer.distance("sitting", "kitten"), 3);
        // One entry, not two: the key is the unordered pair.
        assert_eq!(scorer.cache.len(), 1);
    }

    #[test]
    fn test_score_without_probability_is_the_distance() {
        let mut scorer = Scorer::new();
        assert_eq!(scorer.score("paris", "parris", None), 1.0);
    }

    #[test]
    fn test_score_is_monotonic_in_distance() {
        let mut scorer = Scorer::new();
        // Fixed probability, growing distance: score must not decrease.
        let titles = ["paris", "parts", "pastry", "porridge"];
        let scores: Vec<f64> = titles.iter().map(|t| scorer.score("paris", t, Some(0.5))).collect();
        for pair in scores.windows(2) {
            assert!(pair[0] <= pair[1], "scores not monotonic: {scores:?}");
        }
    }

    #[test]
    fn test_higher_probability_strictly_lowers_score() {
        let mut scorer = Scorer::new();
        let low = scorer.score("paris", "parts", Some(0.0));
        let mid = scorer.score("paris", "parts", Some(0.5));
        let high = scorer.score("paris", "parts", Some(1.0));
        assert!(low > mid && mid > high);
    }

    #[test]
    fn test_probability_weight_endpoints() {
        let mut scorer = Scorer::new();
        // Distance 1 exposes the multiplier directly.
        let at_zero = scorer.score("paris", "parris", Some(0.0));
        let at_one = scorer.score("paris", "parris", Some(1.0));
        assert!((at_zero - 7.5576_f64.ln()).abs() < 1e-9);
        assert!((at_one - 1.1052_f64.ln()).abs() < 1e-3);
    }
}
