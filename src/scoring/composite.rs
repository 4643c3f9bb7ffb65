use std::collections::HashSet;

use crate::config::ScoringConfig;
use crate::types::{MetricsBundle, NormalizedText, ScoreResult};

const PRONUNCIATION_CHAR_WEIGHT: f64 = 40.0;
const PRONUNCIATION_WORD_WEIGHT: f64 = 50.0;
const PRONUNCIATION_SEMANTIC_WEIGHT: f64 = 10.0;
const COVERAGE_BONUS_WEIGHT: f64 = 20.0;
const LENGTH_COMPLETENESS_WEIGHT: f64 = 30.0;
const OVERALL_WEIGHTS: (f64, f64, f64) = (0.4, 0.3, 0.3);

pub fn clamp100(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 100.0)
}

pub fn pronunciation_score(metrics: &MetricsBundle, config: &ScoringConfig) -> f64 {
    let blended = (1.0 - metrics.cer) * PRONUNCIATION_CHAR_WEIGHT
        + (1.0 - metrics.wer) * PRONUNCIATION_WORD_WEIGHT
        + metrics.semantic_similarity * PRONUNCIATION_SEMANTIC_WEIGHT;
    if config.legacy_pronunciation_scaling {
        clamp100(blended * 100.0)
    } else {
        clamp100(blended)
    }
}

pub fn length_penalty(reference_count: usize, candidate_count: usize, config: &ScoringConfig) -> f64 {
    if reference_count == 0 {
        return 0.0;
    }
    let ratio = candidate_count as f64 / reference_count as f64;
    if ratio < config.min_length_ratio {
        (config.min_length_ratio - ratio) * config.short_penalty_per_ratio
    } else if ratio > config.max_length_ratio {
        (ratio - config.max_length_ratio) * config.long_penalty_per_ratio
    } else {
        0.0
    }
}

pub fn fluency_score(
    reference_count: usize,
    candidate_count: usize,
    metrics: &MetricsBundle,
    config: &ScoringConfig,
) -> f64 {
    clamp100(metrics.bleu_approx * 100.0 - length_penalty(reference_count, candidate_count, config))
}

pub fn completeness_score(reference: &[&str], candidate: &[&str], metrics: &MetricsBundle) -> f64 {
    let reference_set: HashSet<&str> = reference.iter().copied().collect();
    let candidate_set: HashSet<&str> = candidate.iter().copied().collect();

    let coverage_bonus = if reference_set.is_empty() {
        0.0
    } else {
        reference_set.intersection(&candidate_set).count() as f64 / reference_set.len() as f64
            * COVERAGE_BONUS_WEIGHT
    };
    let length_completeness = if reference.is_empty() {
        LENGTH_COMPLETENESS_WEIGHT
    } else {
        (candidate.len() as f64 / reference.len() as f64).min(1.0) * LENGTH_COMPLETENESS_WEIGHT
    };

    clamp100(metrics.semantic_similarity * 100.0 + coverage_bonus + length_completeness)
}

pub fn score(
    reference: &NormalizedText,
    candidate: &NormalizedText,
    metrics: &MetricsBundle,
    config: &ScoringConfig,
) -> ScoreResult {
    let reference_tokens = reference.tokens();
    let candidate_tokens = candidate.tokens();

    let pronunciation = pronunciation_score(metrics, config);
    let fluency = fluency_score(
        reference_tokens.len(),
        candidate_tokens.len(),
        metrics,
        config,
    );
    let completeness = completeness_score(&reference_tokens, &candidate_tokens, metrics);
    let (wp, wf, wc) = OVERALL_WEIGHTS;

    ScoreResult {
        pronunciation,
        fluency,
        completeness,
        overall: clamp100(pronunciation * wp + fluency * wf + completeness * wc),
    }
}
