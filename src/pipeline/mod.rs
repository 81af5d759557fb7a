//! One storyboard run: segmentation -> prompt synthesis -> timing.
//!
//! The session state ([`Storyboard`]) is moved into [`run`] and handed back
//! when the run ends, whatever the outcome. Provider failures and user stops
//! are recorded on the returned state instead of being raised.

mod control;

use tracing::{info, warn};

use crate::error::{Result, StoryboardError};
use crate::prompts::PromptSynthesizer;
use crate::provider::SegmentationStrategy;
use crate::timing::default_time_range;
use crate::types::{RunRequest, Scene, Segment};

pub use control::{RunController, StopSignal};

/// Shown when the segmentation strategy fails
pub const PROVIDER_FAILURE_HINT: &str =
    "AI segmentation failed; switch to local segmentation (--mode local) and run again";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunStatus {
    #[default]
    Idle,
    Running,
    Completed,
    Stopped,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunProgress {
    pub emitted: usize,
    pub total: usize,
}

/// Session state: the current scene batch and how the last run went.
#[derive(Debug, Clone, Default)]
pub struct Storyboard {
    pub scenes: Vec<Scene>,
    pub progress: RunProgress,
    pub status: RunStatus,
    pub error: Option<String>,
}

impl Storyboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing batch, e.g. one loaded from disk
    pub fn from_scenes(scenes: Vec<Scene>) -> Self {
        let total = scenes.len();
        Self {
            scenes,
            progress: RunProgress {
                emitted: total,
                total,
            },
            status: RunStatus::Completed,
            error: None,
        }
    }

    pub fn scene(&self, id: u32) -> Result<&Scene> {
        self.scenes
            .iter()
            .find(|scene| scene.id == id)
            .ok_or(StoryboardError::UnknownScene(id))
    }

    pub fn scene_mut(&mut self, id: u32) -> Result<&mut Scene> {
        self.scenes
            .iter_mut()
            .find(|scene| scene.id == id)
            .ok_or(StoryboardError::UnknownScene(id))
    }

    /// User edit of one prompt; the prompt is no longer derived afterwards
    pub fn edit_prompt(&mut self, id: u32, prompt: impl Into<String>) -> Result<()> {
        self.scene_mut(id)?.edit_prompt(prompt);
        Ok(())
    }

    pub fn with_error_message(mut self, message: String) -> Self {
        self.error = Some(message);
        self
    }

    /// The previous batch is dropped wholesale when a run starts
    fn begin_run(mut self) -> Self {
        self.scenes.clear();
        self.progress = RunProgress::default();
        self.status = RunStatus::Running;
        self.error = None;
        self
    }

    fn halt(mut self) -> Self {
        info!(kept = self.scenes.len(), "run stopped by user");
        self.status = RunStatus::Stopped;
        self.progress = RunProgress::default();
        self
    }

    fn fail(mut self, message: String) -> Self {
        self.status = RunStatus::Failed;
        self.progress = RunProgress::default();
        self.with_error_message(message)
    }
}

/// Combine a segment with its timeline window and synthesized prompt.
/// `index` is the 0-based position and decides both id and time range.
pub fn build_scene(
    index: usize,
    segment: &Segment,
    style: &str,
    synthesizer: &PromptSynthesizer,
) -> Scene {
    Scene {
        id: index as u32 + 1,
        time_range: default_time_range(index),
        voice_text: segment.voice_text.clone(),
        video_prompt: synthesizer.synthesize(&segment.voice_text, style),
        prompt_edited: false,
    }
}

/// Execute one run and return the updated session state.
///
/// `on_scene` sees every scene right after it is committed to the batch.
pub async fn run(
    state: Storyboard,
    request: &RunRequest,
    strategy: &dyn SegmentationStrategy,
    synthesizer: &PromptSynthesizer,
    signal: &StopSignal,
    mut on_scene: impl FnMut(&Scene),
) -> Storyboard {
    let mut state = state.begin_run();
    if signal.is_stopped() {
        return state.halt();
    }

    info!(
        strategy = strategy.name(),
        language = %request.language,
        style = %request.style,
        "segmenting script"
    );
    let outcome = tokio::select! {
        biased;
        _ = signal.stopped() => return state.halt(),
        outcome = strategy.segment(request.script(), request.language) => outcome,
    };
    let segments = match outcome {
        Ok(segments) => segments,
        Err(err) => {
            warn!(strategy = strategy.name(), error = %err, "segmentation failed");
            return state.fail(format!("{} ({})", PROVIDER_FAILURE_HINT, err));
        }
    };

    state.progress.total = segments.len();
    state.scenes.reserve(segments.len());
    for (index, segment) in segments.iter().enumerate() {
        if signal.is_stopped() {
            return state.halt();
        }
        state
            .scenes
            .push(build_scene(index, segment, &request.style, synthesizer));
        state.progress.emitted += 1;
        if let Some(scene) = state.scenes.last() {
            on_scene(scene);
        }
    }

    state.status = RunStatus::Completed;
    info!(scenes = state.scenes.len(), "storyboard run completed");
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::LocalSegmenter;
    use crate::types::Language;

    #[test]
    fn scene_ids_and_ranges_follow_position() {
        let synth = PromptSynthesizer::default();
        let scene = build_scene(2, &Segment::new(9, "text"), "anime", &synth);
        assert_eq!(scene.id, 3);
        assert_eq!(scene.time_range, "00:16 - 00:24");
        assert_eq!(scene.video_prompt, synth.synthesize("text", "anime"));
    }

    #[tokio::test]
    async fn stopped_before_start_emits_nothing() {
        let request = RunRequest::new("a b c", Language::English, "anime").unwrap();
        let signal = StopSignal::new();
        signal.stop();
        let state = run(
            Storyboard::new(),
            &request,
            &LocalSegmenter,
            &PromptSynthesizer::default(),
            &signal,
            |_| {},
        )
        .await;
        assert_eq!(state.status, RunStatus::Stopped);
        assert!(state.scenes.is_empty());
    }

    #[test]
    fn edit_prompt_rejects_unknown_scene() {
        let mut board = Storyboard::new();
        let err = board.edit_prompt(4, "x").unwrap_err();
        assert!(matches!(err, StoryboardError::UnknownScene(4)));
    }
}
