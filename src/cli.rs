use std::fs;
use std::io::Read;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};

use crate::config::AppConfig;
use crate::export::ExportKind;
use crate::provider::SegmentationMode;
use crate::types::Language;

#[derive(Parser, Debug)]
#[command(
    name = "scriptboard",
    version,
    about = "Split narration scripts into 8-second scenes with visual prompts"
)]
pub struct Cli {
    /// Optional TOML configuration file.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Segment a script and synthesize a prompt for every scene.
    Split(SplitArgs),
    /// List the available visual styles.
    Styles,
    /// Replace the prompt of one scene in a saved batch.
    Edit(EditArgs),
    /// Re-synthesize every unedited prompt with another style.
    Restyle(RestyleArgs),
    /// Write the voice and/or prompt exports of a saved batch.
    Export(ExportArgs),
    /// Copy the prompt of one scene to the system clipboard.
    Copy(CopyArgs),
}

#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Script text given inline.
    #[arg(short, long, conflicts_with = "file")]
    pub text: Option<String>,
    /// Script file path; `-` reads standard input.
    #[arg(short, long, value_name = "PATH")]
    pub file: Option<PathBuf>,
}

impl InputArgs {
    pub fn read(&self) -> Result<String> {
        match (&self.text, &self.file) {
            (Some(text), _) => Ok(text.clone()),
            (None, Some(path)) if path.as_os_str() == "-" => {
                let mut buffer = String::new();
                std::io::stdin()
                    .read_to_string(&mut buffer)
                    .context("Failed to read script from stdin")?;
                Ok(buffer)
            }
            (None, Some(path)) => fs::read_to_string(path)
                .with_context(|| format!("Failed to read script file {:?}", path)),
            (None, None) => bail!("Provide a script via --text or --file"),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct SplitArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Declared language of the narration.
    #[arg(short, long, value_enum)]
    pub language: Option<Language>,
    /// Visual style id (see `scriptboard styles`).
    #[arg(short, long)]
    pub style: Option<String>,
    /// Segmentation strategy.
    #[arg(short, long, value_enum)]
    pub mode: Option<SegmentationMode>,
    /// Fall back to local segmentation when the AI provider fails.
    #[arg(long)]
    pub fallback_local: bool,
    /// Directory receiving scenes.json and both text exports.
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
    /// Print the finished batch as JSON instead of a scene listing.
    #[arg(long)]
    pub json: bool,
}

impl SplitArgs {
    /// Command-line values override the configuration file
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(language) = self.language {
            config.language = language;
        }
        if let Some(style) = &self.style {
            config.style = style.clone();
        }
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if self.fallback_local {
            config.fallback_to_local = true;
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct SceneFileArgs {
    /// Scene batch written by `split --output-dir`.
    #[arg(long, value_name = "PATH")]
    pub scenes: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct EditArgs {
    #[command(flatten)]
    pub file: SceneFileArgs,
    /// 1-based scene id.
    #[arg(long)]
    pub scene: u32,
    /// New prompt text.
    #[arg(long)]
    pub prompt: String,
}

#[derive(Args, Debug, Clone)]
pub struct RestyleArgs {
    #[command(flatten)]
    pub file: SceneFileArgs,
    #[arg(short, long)]
    pub style: String,
}

#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub file: SceneFileArgs,
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: PathBuf,
    /// Only write one export; both are written by default.
    #[arg(short, long, value_enum)]
    pub kind: Option<ExportKind>,
}

impl ExportArgs {
    pub fn kinds(&self) -> Vec<ExportKind> {
        match self.kind {
            Some(kind) => vec![kind],
            None => ExportKind::ALL.to_vec(),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct CopyArgs {
    #[command(flatten)]
    pub file: SceneFileArgs,
    #[arg(long)]
    pub scene: u32,
}
