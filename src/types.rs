//! Core types for the scriptboard storyboard pipeline

use std::fmt::{Display, Formatter};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::StoryboardError;

/// Words that fit in one 8-second voiceover window for Vietnamese narration
pub const VIETNAMESE_WORDS_PER_SEGMENT: usize = 22;
/// Words that fit in one 8-second voiceover window for every other language
pub const DEFAULT_WORDS_PER_SEGMENT: usize = 28;
/// Length of every scene on the timeline
pub const SEGMENT_DURATION_SECS: u32 = 8;

/// Declared language of the narration script
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    #[default]
    Vietnamese,
}

impl Language {
    /// Spoken-word density policy: how many words are read in one segment
    pub fn words_per_segment(self) -> usize {
        match self {
            Language::Vietnamese => VIETNAMESE_WORDS_PER_SEGMENT,
            _ => DEFAULT_WORDS_PER_SEGMENT,
        }
    }

    /// Word band handed to the external provider as guidance
    pub fn word_band(self) -> (usize, usize) {
        match self {
            Language::Vietnamese => (20, 25),
            _ => (25, 30),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Vietnamese => "Vietnamese",
        }
    }
}

impl Display for Language {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A chunk of narration with its sequence id, before timing is assigned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub id: u32,
    pub voice_text: String,
}

impl Segment {
    pub fn new(id: u32, voice_text: impl Into<String>) -> Self {
        Self {
            id,
            voice_text: voice_text.into(),
        }
    }
}

/// A fully formed storyboard unit: narration, timeline window and visual prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    /// 1-based position in the batch
    pub id: u32,
    /// "MM:SS - MM:SS"
    pub time_range: String,
    pub voice_text: String,
    pub video_prompt: String,
    /// Set once the user edits the prompt; edited prompts are never re-derived
    #[serde(default)]
    pub prompt_edited: bool,
}

impl Scene {
    /// Replace the visual prompt with user text and stop deriving it
    pub fn edit_prompt(&mut self, prompt: impl Into<String>) {
        self.video_prompt = prompt.into();
        self.prompt_edited = true;
    }
}

/// Validated input for one pipeline run
#[derive(Debug, Clone)]
pub struct RunRequest {
    script: String,
    pub language: Language,
    pub style: String,
}

impl RunRequest {
    /// Build a request, rejecting scripts that are empty after trimming
    pub fn new(
        script: impl AsRef<str>,
        language: Language,
        style: impl Into<String>,
    ) -> Result<Self, StoryboardError> {
        let script = script.as_ref().trim();
        if script.is_empty() {
            return Err(StoryboardError::EmptyScript);
        }
        Ok(Self {
            script: script.to_string(),
            language,
            style: style.into(),
        })
    }

    /// Trimmed script text; never empty
    pub fn script(&self) -> &str {
        &self.script
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vietnamese_uses_denser_window() {
        assert_eq!(Language::Vietnamese.words_per_segment(), 22);
        assert_eq!(Language::English.words_per_segment(), 28);
    }

    #[test]
    fn request_rejects_blank_script() {
        let err = RunRequest::new("  \n\t ", Language::English, "cinematic").unwrap_err();
        assert!(matches!(err, StoryboardError::EmptyScript));
    }

    #[test]
    fn request_trims_script() {
        let request = RunRequest::new("  hello world \n", Language::English, "anime").unwrap();
        assert_eq!(request.script(), "hello world");
    }

    #[test]
    fn scene_serializes_with_camel_case_fields() {
        let scene = Scene {
            id: 1,
            time_range: "00:00 - 00:08".to_string(),
            voice_text: "hello".to_string(),
            video_prompt: "prompt".to_string(),
            prompt_edited: false,
        };
        let json = serde_json::to_value(&scene).unwrap();
        assert_eq!(json["timeRange"], "00:00 - 00:08");
        assert_eq!(json["voiceText"], "hello");
        assert_eq!(json["videoPrompt"], "prompt");
    }

    #[test]
    fn edited_flag_defaults_when_missing() {
        let raw = r#"{"id":2,"timeRange":"00:08 - 00:16","voiceText":"a","videoPrompt":"b"}"#;
        let scene: Scene = serde_json::from_str(raw).unwrap();
        assert!(!scene.prompt_edited);
    }
}
