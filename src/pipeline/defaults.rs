use std::sync::Arc;
use std::time::Duration;

use crate::alignment::normalize::normalize_text;
use crate::alignment::sequence::align_tokens;
use crate::correction::rules::RuleTable;
use crate::correction::service::ServiceHandle;
use crate::error::ComparisonError;
use crate::pipeline::traits::{CorrectionSource, SequenceAligner, TextNormalizer};
use crate::types::{AlignmentOp, MatchSpan, NormalizedText, SourceKind};

pub struct ContractionNormalizer;

impl TextNormalizer for ContractionNormalizer {
    fn normalize(&self, text: &str) -> NormalizedText {
        normalize_text(text)
    }
}

pub struct LongestBlockAligner;

impl SequenceAligner for LongestBlockAligner {
    fn align(&self, reference: &[&str], candidate: &[&str]) -> Vec<AlignmentOp> {
        align_tokens(reference, candidate)
    }
}

pub struct FallbackRuleSource {
    table: RuleTable,
}

impl FallbackRuleSource {
    pub fn new(table: RuleTable) -> Self {
        Self { table }
    }

    pub fn english() -> Result<Self, ComparisonError> {
        Ok(Self::new(RuleTable::english()?))
    }
}

impl CorrectionSource for FallbackRuleSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Fallback
    }

    fn find_spans(&self, text: &str) -> Result<Vec<MatchSpan>, ComparisonError> {
        Ok(self.table.find_spans(text))
    }
}

/// Spans from an external correction service, bounded by a timeout.
pub struct ExternalSource {
    handle: Arc<ServiceHandle>,
    timeout: Duration,
    max_suggestions: usize,
}

impl ExternalSource {
    pub fn new(handle: Arc<ServiceHandle>, timeout: Duration, max_suggestions: usize) -> Self {
        Self {
            handle,
            timeout,
            max_suggestions,
        }
    }
}

impl CorrectionSource for ExternalSource {
    fn kind(&self) -> SourceKind {
        SourceKind::External
    }

    fn find_spans(&self, text: &str) -> Result<Vec<MatchSpan>, ComparisonError> {
        let matches = self.handle.check_with_timeout(text, self.timeout)?;
        Ok(matches
            .into_iter()
            .map(|m| m.into_span(self.max_suggestions))
            .collect())
    }
}
