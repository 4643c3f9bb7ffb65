pub mod alignment;
pub mod config;
pub mod correction;
pub mod error;
pub mod pipeline;
pub mod scoring;
pub mod types;

pub use alignment::normalize::normalize_text;
pub use alignment::sequence::align_tokens;
pub use config::{ComparisonConfig, CorrectionConfig, ScoringConfig, TimingConfig};
pub use correction::report::{AppliedCorrection, CorrectionEntry, CorrectionReport};
pub use correction::rules::RuleTable;
pub use correction::service::{CorrectionService, ServiceHandle};
pub use correction::spans::ResolvedSpanSet;
pub use error::ComparisonError;
pub use pipeline::builder::ComparisonEngineBuilder;
pub use pipeline::runtime::ComparisonEngine;
pub use pipeline::traits::{CorrectionSource, SequenceAligner, TextNormalizer};
pub use scoring::report::{
    aggregate_reports, AggregateReport, BatchReport, CaseReport, ComparisonReport, Meta,
    MetricDistribution, SCHEMA_VERSION,
};
pub use types::{
    AlignmentOp, Category, ErrorDetail, ErrorType, ExternalMatch, MatchSpan, MetricsBundle,
    NormalizedText, OpKind, PaceRating, ScoreResult, Severity, SourceKind, TimingAnalysis,
    WordComparison, WordStatus,
};
