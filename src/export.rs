//! Plain-text exports and the JSON scene file.

use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use tracing::info;

use crate::error::Result;
use crate::types::Scene;

/// Line separator of both text exports
pub const LINE_SEPARATOR: &str = "\r\n";
pub const SCENE_FILE_NAME: &str = "scenes.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportKind {
    /// Narration only, one scene per line
    Voice,
    /// Visual prompts only, one scene per line
    Prompt,
}

impl ExportKind {
    pub const ALL: [ExportKind; 2] = [ExportKind::Voice, ExportKind::Prompt];

    pub fn file_name(self) -> &'static str {
        match self {
            ExportKind::Voice => "Voice_Script_Offline.txt",
            ExportKind::Prompt => "Video_Prompts_Offline.txt",
        }
    }

    fn field(self, scene: &Scene) -> &str {
        match self {
            ExportKind::Voice => &scene.voice_text,
            ExportKind::Prompt => &scene.video_prompt,
        }
    }
}

/// Trimmed field of every scene, in order, CRLF-joined. No header or trailer.
pub fn render_export(kind: ExportKind, scenes: &[Scene]) -> String {
    scenes
        .iter()
        .map(|scene| kind.field(scene).trim())
        .collect::<Vec<_>>()
        .join(LINE_SEPARATOR)
}

/// Write one export into `dir`; returns the written path
pub fn write_export(dir: &Path, kind: ExportKind, scenes: &[Scene]) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(kind.file_name());
    fs::write(&path, render_export(kind, scenes))?;
    info!(path = %path.display(), scenes = scenes.len(), "wrote export");
    Ok(path)
}

pub fn save_scenes(path: &Path, scenes: &[Scene]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(scenes)?;
    fs::write(path, json)?;
    Ok(())
}

pub fn load_scenes(path: &Path) -> Result<Vec<Scene>> {
    let raw = fs::read_to_string(path)?;
    let scenes: Vec<Scene> = serde_json::from_str(&raw)?;
    Ok(scenes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn scene(id: u32, voice: &str, prompt: &str) -> Scene {
        Scene {
            id,
            time_range: crate::timing::default_time_range(id as usize - 1),
            voice_text: voice.to_string(),
            video_prompt: prompt.to_string(),
            prompt_edited: false,
        }
    }

    #[test]
    fn voice_export_is_crlf_joined_and_trimmed() {
        let scenes = vec![scene(1, " one two ", "p1"), scene(2, "three\n", "p2")];
        assert_eq!(render_export(ExportKind::Voice, &scenes), "one two\r\nthree");
        assert_eq!(render_export(ExportKind::Prompt, &scenes), "p1\r\np2");
    }

    #[test]
    fn empty_batch_exports_empty_text() {
        assert_eq!(render_export(ExportKind::Voice, &[]), "");
    }

    #[test]
    fn writes_named_files() {
        let dir = tempdir().unwrap();
        let scenes = vec![scene(1, "hello", "prompt")];
        let voice = write_export(dir.path(), ExportKind::Voice, &scenes).unwrap();
        let prompt = write_export(dir.path(), ExportKind::Prompt, &scenes).unwrap();
        assert!(voice.ends_with("Voice_Script_Offline.txt"));
        assert!(prompt.ends_with("Video_Prompts_Offline.txt"));
        assert_eq!(fs::read_to_string(prompt).unwrap(), "prompt");
    }

    #[test]
    fn scene_file_survives_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(SCENE_FILE_NAME);
        let mut scenes = vec![scene(1, "a", "b")];
        scenes[0].edit_prompt("custom");
        save_scenes(&path, &scenes).unwrap();
        assert_eq!(load_scenes(&path).unwrap(), scenes);
    }
}
