use thiserror::Error;

/// Failures surfaced to whoever drives a storyboard run.
#[derive(Error, Debug)]
pub enum StoryboardError {
    #[error("script is empty; paste some narration text first")]
    EmptyScript,

    #[error("scene {0} does not exist in this batch")]
    UnknownScene(u32),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures of a segmentation strategy. All are recoverable: the run reports
/// them and the caller may retry with local segmentation.
#[derive(Error, Debug)]
pub enum SegmentationError {
    #[error("no API key configured for the segmentation provider")]
    MissingApiKey,

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed provider response: {0}")]
    MalformedResponse(String),
}

pub type Result<T> = std::result::Result<T, StoryboardError>;
