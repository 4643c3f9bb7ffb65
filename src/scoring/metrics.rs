use std::collections::HashSet;

use strsim::normalized_levenshtein;

use crate::types::{MetricsBundle, NormalizedText};

/// Unit-cost Levenshtein distance over any comparable sequence.
pub fn edit_distance<T: PartialEq>(reference: &[T], candidate: &[T]) -> usize {
    let n = candidate.len();
    let mut prev: Vec<usize> = (0..=n).collect();
    let mut curr = vec![0usize; n + 1];

    for (i, r) in reference.iter().enumerate() {
        curr[0] = i + 1;
        for (j, c) in candidate.iter().enumerate() {
            let substitution = prev[j] + usize::from(r != c);
            curr[j + 1] = substitution.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[n]
}

pub fn word_error_rate(reference: &[&str], candidate: &[&str]) -> f64 {
    if reference.is_empty() {
        return if candidate.is_empty() { 0.0 } else { 1.0 };
    }
    edit_distance(reference, candidate) as f64 / reference.len() as f64
}

pub fn char_error_rate(reference: &str, candidate: &str) -> f64 {
    let reference: Vec<char> = reference.chars().collect();
    let candidate: Vec<char> = candidate.chars().collect();
    edit_distance(&reference, &candidate) as f64 / reference.len().max(1) as f64
}

/// Fraction of the reference vocabulary that also appears in the candidate.
pub fn semantic_similarity(reference: &[&str], candidate: &[&str]) -> f64 {
    let reference_set: HashSet<&str> = reference.iter().copied().collect();
    let candidate_set: HashSet<&str> = candidate.iter().copied().collect();
    if reference_set.is_empty() {
        return if candidate_set.is_empty() { 1.0 } else { 0.0 };
    }
    reference_set.intersection(&candidate_set).count() as f64 / reference_set.len() as f64
}

/// Character similarity of two words: `1 - distance / max(len)`.
pub fn word_similarity(reference: &str, candidate: &str) -> f64 {
    normalized_levenshtein(reference, candidate)
}

pub fn compute_metrics(reference: &NormalizedText, candidate: &NormalizedText) -> MetricsBundle {
    let reference_tokens = reference.tokens();
    let candidate_tokens = candidate.tokens();
    let wer = word_error_rate(&reference_tokens, &candidate_tokens);
    MetricsBundle {
        wer,
        cer: char_error_rate(reference.as_str(), candidate.as_str()),
        bleu_approx: (1.0 - wer).max(0.0),
        semantic_similarity: semantic_similarity(&reference_tokens, &candidate_tokens),
    }
}
