use std::sync::Arc;

use crate::config::ComparisonConfig;
use crate::correction::service::ServiceHandle;
use crate::error::ComparisonError;
use crate::pipeline::defaults::{
    ContractionNormalizer, ExternalSource, FallbackRuleSource, LongestBlockAligner,
};
use crate::pipeline::runtime::{ComparisonEngine, ComparisonEngineParts};
use crate::pipeline::traits::{CorrectionSource, SequenceAligner, TextNormalizer};

pub struct ComparisonEngineBuilder {
    config: ComparisonConfig,
    normalizer: Option<Box<dyn TextNormalizer>>,
    sequence_aligner: Option<Box<dyn SequenceAligner>>,
    service: Option<Arc<ServiceHandle>>,
    external_source: Option<Box<dyn CorrectionSource>>,
    fallback_source: Option<Box<dyn CorrectionSource>>,
}

impl ComparisonEngineBuilder {
    pub fn new(config: ComparisonConfig) -> Self {
        Self {
            config,
            normalizer: None,
            sequence_aligner: None,
            service: None,
            external_source: None,
            fallback_source: None,
        }
    }

    pub fn with_normalizer(mut self, normalizer: Box<dyn TextNormalizer>) -> Self {
        self.normalizer = Some(normalizer);
        self
    }

    pub fn with_sequence_aligner(mut self, sequence_aligner: Box<dyn SequenceAligner>) -> Self {
        self.sequence_aligner = Some(sequence_aligner);
        self
    }

    /// Uses `handle` as the external source, bounded by the configured
    /// service timeout.
    pub fn with_correction_service(mut self, handle: Arc<ServiceHandle>) -> Self {
        self.service = Some(handle);
        self
    }

    /// Replaces the external source outright. Takes precedence over
    /// `with_correction_service`.
    pub fn with_external_source(mut self, source: Box<dyn CorrectionSource>) -> Self {
        self.external_source = Some(source);
        self
    }

    pub fn with_fallback_source(mut self, source: Box<dyn CorrectionSource>) -> Self {
        self.fallback_source = Some(source);
        self
    }

    pub fn build(self) -> Result<ComparisonEngine, ComparisonError> {
        self.config.validate()?;

        let fallback_source = match self.fallback_source {
            Some(source) => source,
            None => Box::new(FallbackRuleSource::english()?),
        };

        let correction = &self.config.correction;
        let external_source = self.external_source.or_else(|| {
            self.service.map(|handle| {
                Box::new(ExternalSource::new(
                    handle,
                    correction.service_timeout(),
                    correction.max_suggestions,
                )) as Box<dyn CorrectionSource>
            })
        });

        Ok(ComparisonEngine::from_parts(ComparisonEngineParts {
            normalizer: self
                .normalizer
                .unwrap_or_else(|| Box::new(ContractionNormalizer)),
            sequence_aligner: self
                .sequence_aligner
                .unwrap_or_else(|| Box::new(LongestBlockAligner)),
            external_source,
            fallback_source,
            config: self.config,
        }))
    }
}

impl Default for ComparisonEngineBuilder {
    fn default() -> Self {
        Self::new(ComparisonConfig::default())
    }
}
