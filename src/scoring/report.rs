use std::cmp::Ordering;

use serde::Serialize;

use crate::scoring::composite::clamp100;
use crate::types::{
    ErrorDetail, MetricsBundle, ScoreResult, TimingAnalysis, WordComparison,
};

pub const SCHEMA_VERSION: u32 = 1;
const OUTLIER_TOP_N: usize = 10;

/// Serialized result of one reference/candidate comparison.
///
/// Scores carry one decimal and rates three; the unrounded values stay
/// available through `scores` and `metrics`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    pub pronunciation_score: f64,
    pub fluency_score: f64,
    pub completeness_score: f64,
    pub overall_score: f64,
    pub wer: f64,
    pub cer: f64,
    pub bleu_score: f64,
    pub semantic_similarity: f64,
    pub word_analysis: Vec<WordComparison>,
    pub error_details: Vec<ErrorDetail>,
    pub feedback: Vec<String>,
    /// `null` for blank input.
    pub timing_analysis: Option<TimingAnalysis>,
    pub expected_words: usize,
    pub recognized_words: usize,
    pub accuracy_percentage: f64,
    #[serde(skip)]
    pub scores: ScoreResult,
    #[serde(skip)]
    pub metrics: MetricsBundle,
    #[serde(skip)]
    pub empty_input: bool,
}

pub(crate) struct ReportParts {
    pub scores: ScoreResult,
    pub metrics: MetricsBundle,
    pub word_analysis: Vec<WordComparison>,
    pub error_details: Vec<ErrorDetail>,
    pub feedback: Vec<String>,
    pub timing_analysis: Option<TimingAnalysis>,
    pub expected_words: usize,
    pub recognized_words: usize,
}

impl ComparisonReport {
    pub(crate) fn from_parts(parts: ReportParts) -> Self {
        let ReportParts {
            scores,
            metrics,
            word_analysis,
            error_details,
            feedback,
            timing_analysis,
            expected_words,
            recognized_words,
        } = parts;
        Self {
            pronunciation_score: round_to(scores.pronunciation, 1),
            fluency_score: round_to(scores.fluency, 1),
            completeness_score: round_to(scores.completeness, 1),
            overall_score: round_to(scores.overall, 1),
            wer: round_to(metrics.wer, 3),
            cer: round_to(metrics.cer, 3),
            bleu_score: round_to(metrics.bleu_approx, 3),
            semantic_similarity: round_to(metrics.semantic_similarity, 3),
            word_analysis,
            error_details,
            feedback,
            timing_analysis,
            expected_words,
            recognized_words,
            accuracy_percentage: round_to(clamp100((1.0 - metrics.wer) * 100.0), 1),
            scores,
            metrics,
            empty_input: false,
        }
    }

    /// Neutral result for a blank reference or candidate.
    pub(crate) fn empty_input(message: &str, expected_words: usize, recognized_words: usize) -> Self {
        let metrics = MetricsBundle {
            wer: 1.0,
            cer: 1.0,
            bleu_approx: 0.0,
            semantic_similarity: 0.0,
        };
        let mut report = Self::from_parts(ReportParts {
            scores: ScoreResult::ZERO,
            metrics,
            word_analysis: Vec::new(),
            error_details: Vec::new(),
            feedback: vec![message.to_string()],
            timing_analysis: None,
            expected_words,
            recognized_words,
        });
        report.empty_input = true;
        report
    }
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub schema_version: u32,
    pub meta: Meta,
    pub cases: Vec<CaseReport>,
    pub aggregates: AggregateReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct Meta {
    pub generated_at: String,
    pub case_count: usize,
    pub legacy_pronunciation_scaling: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CaseReport {
    pub id: String,
    pub reference: String,
    pub candidate: String,
    #[serde(flatten)]
    pub report: ComparisonReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct AggregateReport {
    pub counts: AggregateCounts,
    pub wer: Option<MetricDistribution>,
    pub cer: Option<MetricDistribution>,
    pub pronunciation: Option<MetricDistribution>,
    pub fluency: Option<MetricDistribution>,
    pub completeness: Option<MetricDistribution>,
    pub overall: Option<MetricDistribution>,
    pub worst_overall: Vec<OutlierEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AggregateCounts {
    pub total: usize,
    pub scored: usize,
    pub empty_input: usize,
    pub error_words: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricDistribution {
    pub mean: f64,
    pub p50: f64,
    pub p90: f64,
    pub p95: f64,
    pub p99: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutlierEntry {
    pub id: String,
    pub value: f64,
}

/// Distributions are computed over scored cases only; blank inputs are counted
/// but would otherwise drag every percentile to the neutral values.
pub fn aggregate_reports(cases: &[CaseReport]) -> AggregateReport {
    let scored: Vec<&CaseReport> = cases.iter().filter(|c| !c.report.empty_input).collect();

    let collect = |f: fn(&ComparisonReport) -> f64| -> Vec<f64> {
        scored.iter().map(|c| f(&c.report)).collect()
    };

    let mut ranked: Vec<(&str, f64)> = scored
        .iter()
        .map(|c| (c.id.as_str(), c.report.scores.overall))
        .collect();
    ranked.sort_by(|(id_a, value_a), (id_b, value_b)| {
        value_a
            .partial_cmp(value_b)
            .unwrap_or(Ordering::Equal)
            .then_with(|| id_a.cmp(id_b))
    });

    AggregateReport {
        counts: AggregateCounts {
            total: cases.len(),
            scored: scored.len(),
            empty_input: cases.len() - scored.len(),
            error_words: scored.iter().map(|c| c.report.error_details.len()).sum(),
        },
        wer: distribution_or_none(&collect(|r| r.metrics.wer)),
        cer: distribution_or_none(&collect(|r| r.metrics.cer)),
        pronunciation: distribution_or_none(&collect(|r| r.scores.pronunciation)),
        fluency: distribution_or_none(&collect(|r| r.scores.fluency)),
        completeness: distribution_or_none(&collect(|r| r.scores.completeness)),
        overall: distribution_or_none(&collect(|r| r.scores.overall)),
        worst_overall: ranked
            .into_iter()
            .take(OUTLIER_TOP_N)
            .map(|(id, value)| OutlierEntry {
                id: id.to_string(),
                value: round_to(value, 1),
            })
            .collect(),
    }
}

fn distribution_or_none(values: &[f64]) -> Option<MetricDistribution> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    Some(MetricDistribution {
        mean: round_to(mean(&sorted), 3),
        p50: round_to(percentile_sorted(&sorted, 0.50), 3),
        p90: round_to(percentile_sorted(&sorted, 0.90), 3),
        p95: round_to(percentile_sorted(&sorted, 0.95), 3),
        p99: round_to(percentile_sorted(&sorted, 0.99), 3),
    })
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn percentile_sorted(sorted_values: &[f64], percentile: f64) -> f64 {
    if sorted_values.is_empty() {
        return 0.0;
    }
    if sorted_values.len() == 1 {
        return sorted_values[0];
    }

    let clamped = percentile.clamp(0.0, 1.0);
    let max_index = (sorted_values.len() - 1) as f64;
    let rank = clamped * max_index;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        sorted_values[lower]
    } else {
        let weight = rank - lower as f64;
        sorted_values[lower] * (1.0 - weight) + sorted_values[upper] * weight
    }
}
