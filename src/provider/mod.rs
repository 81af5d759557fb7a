//! Segmentation strategies: the local deterministic segmenter and the
//! external AI provider, behind one async contract.

mod gemini;
pub mod payload;

use async_trait::async_trait;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::chunking::segment_for_language;
use crate::config::AppConfig;
use crate::error::SegmentationError;
use crate::types::{Language, Segment};

pub use gemini::{build_instruction, GeminiSegmenter};

/// Which strategy produces the segments of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SegmentationMode {
    #[default]
    Local,
    Ai,
}

/// Produces ordered segments for a trimmed, non-empty script.
#[async_trait]
pub trait SegmentationStrategy: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    async fn segment(
        &self,
        script: &str,
        language: Language,
    ) -> Result<Vec<Segment>, SegmentationError>;
}

/// Word-window segmentation keyed to the language's spoken word rate.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalSegmenter;

#[async_trait]
impl SegmentationStrategy for LocalSegmenter {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn segment(
        &self,
        script: &str,
        language: Language,
    ) -> Result<Vec<Segment>, SegmentationError> {
        Ok(segment_for_language(script, language))
    }
}

/// Runs `inner`, and on failure falls back to local segmentation.
#[derive(Debug, Clone)]
pub struct LocalFallback<S> {
    inner: S,
}

impl<S> LocalFallback<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<S: SegmentationStrategy> SegmentationStrategy for LocalFallback<S> {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    async fn segment(
        &self,
        script: &str,
        language: Language,
    ) -> Result<Vec<Segment>, SegmentationError> {
        match self.inner.segment(script, language).await {
            Ok(segments) => Ok(segments),
            Err(err) => {
                warn!(
                    strategy = self.inner.name(),
                    error = %err,
                    "segmentation failed; falling back to local segmentation"
                );
                LocalSegmenter.segment(script, language).await
            }
        }
    }
}

/// Build the strategy selected by configuration
pub fn build_strategy(
    config: &AppConfig,
) -> Result<Box<dyn SegmentationStrategy>, SegmentationError> {
    match config.mode {
        SegmentationMode::Local => Ok(Box::new(LocalSegmenter)),
        SegmentationMode::Ai => {
            let gemini = match config.provider.api_key.clone() {
                Some(api_key) => GeminiSegmenter::new(api_key, &config.provider),
                None => Err(SegmentationError::MissingApiKey),
            };
            match gemini {
                Ok(gemini) if config.fallback_to_local => {
                    Ok(Box::new(LocalFallback::new(gemini)))
                }
                Ok(gemini) => Ok(Box::new(gemini)),
                Err(err) if config.fallback_to_local => {
                    warn!(
                        error = %err,
                        "AI segmentation unavailable; falling back to local segmentation"
                    );
                    Ok(Box::new(LocalSegmenter))
                }
                Err(err) => Err(err),
            }
        }
    }
}
