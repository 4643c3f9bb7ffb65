use serde::Serialize;

use crate::config::CorrectionConfig;
use crate::correction::highlight::{escape_markup, highlight};
use crate::correction::spans::{apply_corrections, CharOffsets, ResolvedSpanSet};
use crate::types::{Category, MatchSpan, Severity, SourceKind};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrectionReport {
    pub original_text: String,
    pub highlighted_text: String,
    pub corrected_text: String,
    pub errors: Vec<CorrectionEntry>,
    pub error_count: usize,
    pub accuracy_score: f64,
    pub word_count: usize,
    pub sentence_count: usize,
    pub corrections_applied: Vec<AppliedCorrection>,
    /// `None` when the text was blank and no source was consulted.
    pub source: Option<SourceKind>,
}

/// One resolved span as reported to the caller. Offsets are in chars.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrectionEntry {
    pub offset: usize,
    pub length: usize,
    pub message: String,
    pub category: Category,
    pub rule_id: String,
    pub original_text: String,
    pub suggestions: Vec<String>,
    pub severity: Severity,
    pub context: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppliedCorrection {
    pub original: String,
    pub correction: String,
    /// Char offset in the original text.
    pub position: usize,
    pub rule: String,
    pub message: String,
}

impl CorrectionReport {
    pub(crate) fn blank(text: &str) -> Self {
        Self {
            original_text: text.to_string(),
            highlighted_text: escape_markup(text),
            corrected_text: text.to_string(),
            errors: Vec::new(),
            error_count: 0,
            accuracy_score: 100.0,
            word_count: 0,
            sentence_count: 0,
            corrections_applied: Vec::new(),
            source: None,
        }
    }

    pub(crate) fn build(
        text: &str,
        spans: &ResolvedSpanSet,
        source: SourceKind,
        config: &CorrectionConfig,
    ) -> Self {
        let errors: Vec<CorrectionEntry> = spans
            .iter()
            .map(|span| entry(text, span, config.context_chars))
            .collect();
        let (corrected_text, corrections_applied) = apply_corrections(text, spans);
        let error_count = errors.len();

        Self {
            original_text: text.to_string(),
            highlighted_text: highlight(text, spans),
            corrected_text,
            errors,
            error_count,
            accuracy_score: accuracy_score(error_count, config.penalty_per_error),
            word_count: text.split_whitespace().count(),
            sentence_count: sentence_count(text),
            corrections_applied,
            source: Some(source),
        }
    }
}

fn entry(text: &str, span: &MatchSpan, context_chars: usize) -> CorrectionEntry {
    CorrectionEntry {
        offset: span.start,
        length: span.len(),
        message: span.message.clone(),
        category: span.category,
        rule_id: span.rule_id.clone(),
        original_text: span.original_text.clone(),
        suggestions: span.suggestions.clone(),
        severity: span.category.severity(),
        context: error_context(text, span.start, span.end, context_chars),
    }
}

pub fn accuracy_score(error_count: usize, penalty_per_error: f64) -> f64 {
    (100.0 - error_count as f64 * penalty_per_error).max(0.0)
}

/// Runs of text ended by `.`, `!` or `?` that contain something other than
/// whitespace.
pub fn sentence_count(text: &str) -> usize {
    text.split(['.', '!', '?'])
        .filter(|part| !part.trim().is_empty())
        .count()
}

/// Up to `context_chars` chars either side of `start..end`, with the span
/// itself wrapped in `**`.
pub fn error_context(text: &str, start: usize, end: usize, context_chars: usize) -> String {
    let offsets = CharOffsets::new(text);
    let char_len = offsets.char_len();
    let end = end.min(char_len);
    let start = start.min(end);
    let from = start.saturating_sub(context_chars);
    let to = end.saturating_add(context_chars).min(char_len);

    let byte = |c: usize| offsets.byte(c).unwrap_or(text.len());
    let context = format!(
        "{}**{}**{}",
        &text[byte(from)..byte(start)],
        &text[byte(start)..byte(end)],
        &text[byte(end)..byte(to)],
    );
    context.trim().to_string()
}
