use crate::config::ComparisonConfig;
use crate::correction::report::CorrectionReport;
use crate::correction::spans::resolve;
use crate::pipeline::traits::{CorrectionSource, SequenceAligner, TextNormalizer};
use crate::scoring::classify::{compare_words, error_details};
use crate::scoring::composite;
use crate::scoring::feedback::{generate_feedback, NO_REFERENCE_MESSAGE, NO_SPEECH_MESSAGE};
use crate::scoring::metrics::compute_metrics;
use crate::scoring::report::{ComparisonReport, ReportParts};
use crate::scoring::timing::analyze_timing;
use crate::types::{ExternalMatch, MatchSpan, SourceKind};

/// Compares transcripts and corrects text. Holds no per-call state, so one
/// engine can serve any number of threads.
pub struct ComparisonEngine {
    config: ComparisonConfig,
    normalizer: Box<dyn TextNormalizer>,
    sequence_aligner: Box<dyn SequenceAligner>,
    external_source: Option<Box<dyn CorrectionSource>>,
    fallback_source: Box<dyn CorrectionSource>,
}

pub(crate) struct ComparisonEngineParts {
    pub config: ComparisonConfig,
    pub normalizer: Box<dyn TextNormalizer>,
    pub sequence_aligner: Box<dyn SequenceAligner>,
    pub external_source: Option<Box<dyn CorrectionSource>>,
    pub fallback_source: Box<dyn CorrectionSource>,
}

impl ComparisonEngine {
    pub(crate) fn from_parts(parts: ComparisonEngineParts) -> Self {
        Self {
            config: parts.config,
            normalizer: parts.normalizer,
            sequence_aligner: parts.sequence_aligner,
            external_source: parts.external_source,
            fallback_source: parts.fallback_source,
        }
    }

    pub fn config(&self) -> &ComparisonConfig {
        &self.config
    }

    pub fn has_external_source(&self) -> bool {
        self.external_source.is_some()
    }

    /// Scores `candidate` against `reference`.
    ///
    /// A blank reference or candidate yields a neutral report instead of an
    /// error. Text that only becomes empty after normalization is scored
    /// normally and lands at the bottom of every band.
    pub fn compare(&self, reference: &str, candidate: &str) -> ComparisonReport {
        let reference_norm = self.normalizer.normalize(reference);
        let candidate_norm = self.normalizer.normalize(candidate);
        let reference_tokens = reference_norm.tokens();
        let candidate_tokens = candidate_norm.tokens();

        let blank_reference = reference.trim().is_empty();
        let blank_candidate = candidate.trim().is_empty();
        if blank_reference || blank_candidate {
            let message = if blank_candidate {
                NO_SPEECH_MESSAGE
            } else {
                NO_REFERENCE_MESSAGE
            };
            tracing::debug!(blank_reference, blank_candidate, "comparison on blank input");
            return ComparisonReport::empty_input(
                message,
                reference_tokens.len(),
                candidate_tokens.len(),
            );
        }

        let metrics = compute_metrics(&reference_norm, &candidate_norm);
        let scores = composite::score(
            &reference_norm,
            &candidate_norm,
            &metrics,
            &self.config.scoring,
        );
        let ops = self
            .sequence_aligner
            .align(&reference_tokens, &candidate_tokens);
        let word_analysis = compare_words(&reference_tokens, &candidate_tokens, &ops);
        let error_details = error_details(&word_analysis);
        let feedback = generate_feedback(&scores, &metrics);
        let timing_analysis = analyze_timing(
            reference_tokens.len(),
            candidate_tokens.len(),
            &self.config.timing,
            &self.config.scoring,
        );

        tracing::debug!(
            reference_words = reference_tokens.len(),
            candidate_words = candidate_tokens.len(),
            wer = metrics.wer,
            overall = scores.overall,
            errors = error_details.len(),
            "comparison scored"
        );

        ComparisonReport::from_parts(ReportParts {
            scores,
            metrics,
            word_analysis,
            error_details,
            feedback,
            timing_analysis: Some(timing_analysis),
            expected_words: reference_tokens.len(),
            recognized_words: candidate_tokens.len(),
        })
    }

    /// Corrects `text` with the external source when one is configured and
    /// answers in time, and with the fallback rules otherwise.
    pub fn correct(&self, text: &str) -> CorrectionReport {
        if text.trim().is_empty() {
            return CorrectionReport::blank(text);
        }

        if let Some(external) = &self.external_source {
            match external.find_spans(text) {
                Ok(spans) => return self.finish(text, spans, external.kind()),
                Err(err) => {
                    tracing::warn!(
                        error = %err,
                        "external correction unavailable; using fallback rules"
                    );
                }
            }
        }

        let spans = match self.fallback_source.find_spans(text) {
            Ok(spans) => spans,
            Err(err) => {
                tracing::warn!(error = %err, "fallback rules failed; reporting no corrections");
                Vec::new()
            }
        };
        self.finish(text, spans, self.fallback_source.kind())
    }

    /// Corrects `text` with matches the caller already obtained from a
    /// service. No source is consulted.
    pub fn correct_with_matches(&self, text: &str, matches: Vec<ExternalMatch>) -> CorrectionReport {
        if text.trim().is_empty() {
            return CorrectionReport::blank(text);
        }
        let max_suggestions = self.config.correction.max_suggestions;
        let spans = matches
            .into_iter()
            .map(|m| m.into_span(max_suggestions))
            .collect();
        self.finish(text, spans, SourceKind::External)
    }

    fn finish(
        &self,
        text: &str,
        spans: Vec<MatchSpan>,
        source: SourceKind,
    ) -> CorrectionReport {
        let candidates = spans.len();
        let resolved = resolve(text, spans);
        tracing::debug!(
            source = source.as_str(),
            candidates,
            resolved = resolved.len(),
            "correction spans resolved"
        );
        CorrectionReport::build(text, &resolved, source, &self.config.correction)
    }
}
