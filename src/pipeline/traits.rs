use crate::error::ComparisonError;
use crate::types::{AlignmentOp, MatchSpan, NormalizedText, SourceKind};

pub trait TextNormalizer: Send + Sync {
    fn normalize(&self, text: &str) -> NormalizedText;
}

/// Word-level diff of two token sequences.
///
/// Returned ops must cover both sequences in order, with every range inside
/// the token slices it indexes.
pub trait SequenceAligner: Send + Sync {
    fn align(&self, reference: &[&str], candidate: &[&str]) -> Vec<AlignmentOp>;
}

/// Produces candidate correction spans for a text. Spans may overlap or be
/// malformed; the engine resolves them before use.
pub trait CorrectionSource: Send + Sync {
    fn kind(&self) -> SourceKind;

    fn find_spans(&self, text: &str) -> Result<Vec<MatchSpan>, ComparisonError>;
}
