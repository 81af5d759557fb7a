//! Template-based visual prompt synthesis.
//!
//! Every prompt is `"{style}. Visual description: {voice}. {quality}"`. No
//! external calls are made; the same inputs always give the same prompt.

pub mod styles;

use tracing::debug;

use crate::types::Scene;

pub use styles::{StyleCatalog, StyleEntry, DEFAULT_STYLE_FRAGMENT, DEFAULT_STYLE_ID};

/// Appended to every prompt regardless of style
pub const BASE_QUALITY_KEYWORDS: &str =
    "high quality, smooth animation, masterwork, 24fps, clean composition";

#[derive(Debug, Clone, Default)]
pub struct PromptSynthesizer {
    catalog: StyleCatalog,
}

impl PromptSynthesizer {
    pub fn new(catalog: StyleCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &StyleCatalog {
        &self.catalog
    }

    /// Build the visual prompt for one narration chunk.
    /// Unknown styles use [`DEFAULT_STYLE_FRAGMENT`] instead of failing.
    pub fn synthesize(&self, voice_text: &str, style: &str) -> String {
        if !self.catalog.contains(style) {
            debug!(style, "style not in catalog; using default fragment");
        }
        format!(
            "{}. Visual description: {}. {}",
            self.catalog.fragment_for(style),
            voice_text,
            BASE_QUALITY_KEYWORDS
        )
    }

    /// Re-render every prompt the user has not edited. Returns how many changed.
    pub fn resynthesize(&self, scenes: &mut [Scene], style: &str) -> usize {
        let mut updated = 0;
        for scene in scenes.iter_mut().filter(|scene| !scene.prompt_edited) {
            scene.video_prompt = self.synthesize(&scene.voice_text, style);
            updated += 1;
        }
        updated
    }
}
