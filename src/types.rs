use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Canonical comparison form of a text. Only produced by the normalizer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct NormalizedText(String);

impl NormalizedText {
    pub(crate) fn from_normalized(text: String) -> Self {
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whitespace-separated tokens, in order.
    pub fn tokens(&self) -> Vec<&str> {
        self.0.split(' ').filter(|t| !t.is_empty()).collect()
    }

    pub fn token_count(&self) -> usize {
        self.0.split(' ').filter(|t| !t.is_empty()).count()
    }
}

impl fmt::Display for NormalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OpKind {
    Equal,
    Replace,
    Delete,
    Insert,
}

/// One run of a word-level diff. Ranges are half-open token indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentOp {
    pub kind: OpKind,
    pub reference: Range<usize>,
    pub candidate: Range<usize>,
}

impl AlignmentOp {
    pub fn new(kind: OpKind, reference: Range<usize>, candidate: Range<usize>) -> Self {
        Self {
            kind,
            reference,
            candidate,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WordStatus {
    Correct,
    Substituted,
    Omitted,
    Extra,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    Omission,
    Insertion,
    MinorMispronunciation,
    ModerateMispronunciation,
    MajorMispronunciation,
    WordSubstitution,
}

impl ErrorType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Omission => "omission",
            Self::Insertion => "insertion",
            Self::MinorMispronunciation => "minor_mispronunciation",
            Self::ModerateMispronunciation => "moderate_mispronunciation",
            Self::MajorMispronunciation => "major_mispronunciation",
            Self::WordSubstitution => "word_substitution",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordComparison {
    #[serde(rename = "expected")]
    pub reference_word: Option<String>,
    #[serde(rename = "recognized")]
    pub candidate_word: Option<String>,
    pub status: WordStatus,
    /// Character-level similarity in [0, 1]; 1.0 for correct words and 0.0
    /// for omitted or extra ones.
    pub similarity: f64,
    pub error_type: Option<ErrorType>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorDetail {
    #[serde(rename = "type")]
    pub error_type: ErrorType,
    pub expected: String,
    pub recognized: String,
    pub similarity: f64,
    pub suggestion: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricsBundle {
    pub wer: f64,
    pub cer: f64,
    /// `1 - wer`. Not an n-gram BLEU.
    pub bleu_approx: f64,
    pub semantic_similarity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreResult {
    pub pronunciation: f64,
    pub fluency: f64,
    pub completeness: f64,
    pub overall: f64,
}

impl ScoreResult {
    pub const ZERO: Self = Self {
        pronunciation: 0.0,
        fluency: 0.0,
        completeness: 0.0,
        overall: 0.0,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaceRating {
    TooFast,
    Good,
    TooSlow,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimingAnalysis {
    pub estimated_duration: f64,
    pub actual_duration: f64,
    pub words_per_minute: f64,
    pub pace_rating: PaceRating,
    pub pace_feedback: String,
    pub rate_ratio: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Spelling,
    Grammar,
    Punctuation,
    Style,
    Capitalization,
    Other,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Spelling => "spelling",
            Self::Grammar => "grammar",
            Self::Punctuation => "punctuation",
            Self::Style => "style",
            Self::Capitalization => "capitalization",
            Self::Other => "other",
        }
    }

    /// Maps a free-form service category and rule id onto the fixed set.
    pub fn classify(category: &str, rule_id: &str) -> Self {
        let category = category.to_lowercase();
        let rule_id = rule_id.to_lowercase();
        if category.contains("spell") || category.contains("typo") || rule_id.contains("typo") {
            Self::Spelling
        } else if category.contains("grammar") || rule_id.contains("agreement") {
            Self::Grammar
        } else if category.contains("punctuation") {
            Self::Punctuation
        } else if category.contains("style") || rule_id.contains("redundancy") {
            Self::Style
        } else if category.contains("capitalization") || category.contains("casing") {
            Self::Capitalization
        } else {
            Self::Other
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            Self::Spelling | Self::Grammar => Severity::High,
            Self::Style => Severity::Low,
            Self::Punctuation | Self::Capitalization | Self::Other => Severity::Medium,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// A candidate edit over the original text. `start..end` is a half-open range
/// of character (not byte) offsets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchSpan {
    pub start: usize,
    pub end: usize,
    pub original_text: String,
    /// Best suggestion first.
    pub suggestions: Vec<String>,
    pub category: Category,
    pub message: String,
    pub rule_id: String,
}

impl MatchSpan {
    pub fn new(
        start: usize,
        end: usize,
        original_text: impl Into<String>,
        replacement: impl Into<String>,
        category: Category,
    ) -> Self {
        Self {
            start,
            end,
            original_text: original_text.into(),
            suggestions: vec![replacement.into()],
            category,
            message: format!("Possible {category} error"),
            rule_id: String::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn overlaps(&self, other: &MatchSpan) -> bool {
        self.start < other.end && self.end > other.start
    }

    /// Text written in place of the span; the span itself when nothing is suggested.
    pub fn replacement(&self) -> &str {
        self.suggestions
            .first()
            .map(String::as_str)
            .unwrap_or(&self.original_text)
    }
}

/// Where the spans of a correction came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    External,
    Fallback,
}

impl SourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::External => "external",
            Self::Fallback => "fallback",
        }
    }
}

/// A match reported by an external correction service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalMatch {
    pub start: usize,
    pub end: usize,
    #[serde(default)]
    pub replacements: Vec<String>,
    #[serde(default)]
    pub rule_id: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub message: String,
}

impl ExternalMatch {
    pub fn into_span(self, max_suggestions: usize) -> MatchSpan {
        let category = Category::classify(&self.category, &self.rule_id);
        let mut suggestions = self.replacements;
        suggestions.truncate(max_suggestions.max(1));
        MatchSpan {
            start: self.start,
            end: self.end,
            original_text: String::new(),
            suggestions,
            category,
            message: self.message,
            rule_id: self.rule_id,
        }
    }
}
