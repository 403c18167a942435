//! Lexical title similarity: Dice coefficient over character bigrams.

use std::collections::HashMap;

/// Similarity of one unordered pair of titles, by position in the group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairScore {
    pub left: usize,
    pub right: usize,
    pub score: f64,
}

fn bigram_counts(chars: &[char]) -> HashMap<(char, char), usize> {
    let mut counts = HashMap::new();
    for window in chars.windows(2) {
        *counts.entry((window[0], window[1])).or_insert(0) += 1;
    }
    counts
}

/// Dice coefficient of the two strings' bigram multisets, after lowercasing.
///
/// Strings shorter than two characters compare by equality.
pub fn pairwise_similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.to_lowercase().chars().collect();
    let b: Vec<char> = b.to_lowercase().chars().collect();

    if a.len() < 2 || b.len() < 2 {
        return if a == b { 1.0 } else { 0.0 };
    }

    let left = bigram_counts(&a);
    let right = bigram_counts(&b);

    let shared: usize = left
        .iter()
        .filter_map(|(bigram, &n)| right.get(bigram).map(|&m| n.min(m)))
        .sum();

    let total = (a.len() - 1) + (b.len() - 1);
    2.0 * shared as f64 / total as f64
}

/// Scores for all `C(n, 2)` unordered pairs, `left < right`.
pub fn pairwise_scores<S: AsRef<str>>(titles: &[S]) -> Vec<PairScore> {
    let mut scores = Vec::with_capacity(titles.len() * titles.len().saturating_sub(1) / 2);
    for left in 0..titles.len() {
        for right in (left + 1)..titles.len() {
            scores.push(PairScore {
                left,
                right,
                score: pairwise_similarity(titles[left].as_ref(), titles[right].as_ref()),
            });
        }
    }
    scores
}

/// Mean of the pair scores; 0 when there are no pairs.
///
/// Scores are summed in sorted order so the result is bit-identical however
/// the products were ordered.
pub fn mean_score(scores: &[PairScore]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    let mut values: Vec<f64> = scores.iter().map(|p| p.score).collect();
    values.sort_by(f64::total_cmp);
    values.iter().sum::<f64>() / values.len() as f64
}

/// Average pairwise similarity of a group's titles; 0 for fewer than 2 titles.
pub fn group_similarity<S: AsRef<str>>(titles: &[S]) -> f64 {
    mean_score(&pairwise_scores(titles))
}
