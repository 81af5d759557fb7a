//! Script-to-storyboard helper.
//!
//! Splits narration into 8-second voiceover scenes and attaches a visual
//! prompt to each one, optionally letting an AI provider choose the splits.

pub mod chunking;
pub mod cli;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod export;
pub mod pipeline;
pub mod prompts;
pub mod provider;
pub mod timing;
pub mod types;

pub use error::{SegmentationError, StoryboardError};
pub use pipeline::{run, RunController, RunStatus, StopSignal, Storyboard};
pub use prompts::PromptSynthesizer;
pub use types::{Language, RunRequest, Scene, Segment};
