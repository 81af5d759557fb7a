use std::fs;
use std::path::Path;

use anyhow::{ensure, Context, Result};
use serde::Deserialize;

use crate::prompts::{PromptSynthesizer, StyleCatalog, StyleEntry, DEFAULT_STYLE_ID};
use crate::provider::SegmentationMode;
use crate::types::Language;

pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 120;

/// Environment variables consulted for the provider key, in order
const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    pub api_key: Option<String>,
    pub endpoint: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_GEMINI_ENDPOINT.to_string(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            timeout_secs: DEFAULT_PROVIDER_TIMEOUT_SECS,
        }
    }
}

/// Settings for a run, layered file -> environment -> command line.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub language: Language,
    pub style: String,
    pub mode: SegmentationMode,
    pub fallback_to_local: bool,
    pub provider: ProviderSettings,
    /// Extra or overriding entries for the style catalog
    pub styles: Vec<StyleEntry>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            language: Language::default(),
            style: DEFAULT_STYLE_ID.to_string(),
            mode: SegmentationMode::default(),
            fallback_to_local: false,
            provider: ProviderSettings::default(),
            styles: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Load from an optional TOML file, then fill the API key from the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file at {:?}", path))?;
        Self::from_toml(&raw).with_context(|| format!("invalid config file {:?}", path))
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(raw).context("failed to parse TOML")?;
        Ok(config)
    }

    /// A key set in the file wins over the environment.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.provider.api_key.is_some() {
            return;
        }
        self.provider.api_key = API_KEY_VARS
            .iter()
            .filter_map(|name| lookup(*name))
            .find(|value| !value.trim().is_empty());
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.provider.timeout_secs > 0,
            "provider timeout_secs must be positive"
        );
        ensure!(
            !self.provider.model.trim().is_empty(),
            "provider model must not be empty"
        );
        for entry in &self.styles {
            ensure!(!entry.id.trim().is_empty(), "style entries need an id");
            ensure!(
                !entry.fragment.trim().is_empty(),
                "style '{}' needs a prompt fragment",
                entry.id
            );
        }
        Ok(())
    }

    /// Built-in styles plus the ones configured here
    pub fn style_catalog(&self) -> StyleCatalog {
        let mut catalog = StyleCatalog::builtin();
        catalog.extend(self.styles.iter().cloned());
        catalog
    }

    pub fn synthesizer(&self) -> PromptSynthesizer {
        PromptSynthesizer::new(self.style_catalog())
    }
}
