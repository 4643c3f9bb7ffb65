use crate::correction::report::AppliedCorrection;
use crate::types::MatchSpan;

/// Spans sorted by `start`, pairwise non-overlapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedSpanSet(Vec<MatchSpan>);

impl ResolvedSpanSet {
    pub fn as_slice(&self) -> &[MatchSpan] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MatchSpan> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a ResolvedSpanSet {
    type Item = &'a MatchSpan;
    type IntoIter = std::slice::Iter<'a, MatchSpan>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Byte position of every char boundary in a text, end included.
#[derive(Debug, Clone)]
pub(crate) struct CharOffsets {
    bytes: Vec<usize>,
}

impl CharOffsets {
    pub fn new(text: &str) -> Self {
        let mut bytes: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
        bytes.push(text.len());
        Self { bytes }
    }

    pub fn char_len(&self) -> usize {
        self.bytes.len() - 1
    }

    pub fn byte(&self, char_offset: usize) -> Option<usize> {
        self.bytes.get(char_offset).copied()
    }

    /// Char offset of a byte position that lies on a char boundary.
    pub fn char_of_byte(&self, byte: usize) -> usize {
        match self.bytes.binary_search(&byte) {
            Ok(idx) | Err(idx) => idx,
        }
    }
}

/// Drops spans that are empty or run past the text, and fills
/// `original_text` from the text itself.
pub fn validate_spans(text: &str, spans: Vec<MatchSpan>) -> Vec<MatchSpan> {
    let offsets = CharOffsets::new(text);
    let char_len = offsets.char_len();
    spans
        .into_iter()
        .filter_map(|mut span| {
            if span.start >= span.end || span.end > char_len {
                tracing::debug!(
                    start = span.start,
                    end = span.end,
                    text_chars = char_len,
                    rule_id = %span.rule_id,
                    "dropping malformed span"
                );
                return None;
            }
            let start = offsets.byte(span.start)?;
            let end = offsets.byte(span.end)?;
            span.original_text = text[start..end].to_string();
            Some(span)
        })
        .collect()
}

/// Keeps the longest of any overlapping spans.
///
/// Candidates are visited in input order. A new span is discarded when an
/// accepted span it overlaps is at least as long; otherwise every accepted
/// span it overlaps is evicted and the new one is kept.
pub fn resolve_overlaps(spans: Vec<MatchSpan>) -> ResolvedSpanSet {
    let mut accepted: Vec<MatchSpan> = Vec::with_capacity(spans.len());
    for span in spans {
        if span.is_empty() {
            continue;
        }
        let blocked = accepted
            .iter()
            .any(|existing| existing.overlaps(&span) && existing.len() >= span.len());
        if blocked {
            continue;
        }
        accepted.retain(|existing| !existing.overlaps(&span));
        accepted.push(span);
    }
    accepted.sort_by_key(|span| span.start);
    ResolvedSpanSet(accepted)
}

pub fn resolve(text: &str, spans: Vec<MatchSpan>) -> ResolvedSpanSet {
    resolve_overlaps(validate_spans(text, spans))
}

/// Writes each span's top suggestion into the text by recorded offset,
/// rightmost first so earlier offsets stay valid.
///
/// Returns the corrected text and the applied edits in text order. Spans
/// without a suggestion, or whose suggestion equals the span, are left alone.
pub fn apply_corrections(text: &str, spans: &ResolvedSpanSet) -> (String, Vec<AppliedCorrection>) {
    let offsets = CharOffsets::new(text);
    let mut corrected = text.to_string();
    let mut applied = Vec::with_capacity(spans.len());

    for span in spans.iter().rev() {
        let Some(suggestion) = span.suggestions.first() else {
            continue;
        };
        let (Some(start), Some(end)) = (offsets.byte(span.start), offsets.byte(span.end)) else {
            continue;
        };
        let original = &text[start..end];
        if original == suggestion {
            continue;
        }
        corrected.replace_range(start..end, suggestion);
        applied.push(AppliedCorrection {
            original: original.to_string(),
            correction: suggestion.clone(),
            position: span.start,
            rule: span.rule_id.clone(),
            message: span.message.clone(),
        });
    }

    applied.reverse();
    (corrected, applied)
}
