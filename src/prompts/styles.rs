use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Used when a style id has no catalog entry.
pub const DEFAULT_STYLE_FRAGMENT: &str =
    "clean visual storytelling, balanced composition, natural lighting, coherent color palette";

pub const DEFAULT_STYLE_ID: &str = "vector_motion";

/// One selectable visual aesthetic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleEntry {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub description: String,
    pub fragment: String,
}

impl StyleEntry {
    fn builtin(id: &str, label: &str, description: &str, fragment: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            description: description.to_string(),
            fragment: fragment.to_string(),
        }
    }
}

/// Closed mapping from style id to prompt fragment.
#[derive(Debug, Clone)]
pub struct StyleCatalog {
    entries: BTreeMap<String, StyleEntry>,
}

impl Default for StyleCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl StyleCatalog {
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// The styles shipped with the tool.
    pub fn builtin() -> Self {
        let mut catalog = Self::empty();
        for entry in [
            StyleEntry::builtin(
                "vector_motion",
                "2D Vector Motion Graphics",
                "Flat minimalist vector animation with modern colors",
                "2D vector motion graphics, flat design aesthetic, clean solid shapes, Adobe Illustrator style, minimalist vector art, bold colors, crisp outlines, smooth geometric transitions",
            ),
            StyleEntry::builtin(
                "motion_graphics",
                "Motion Graphics",
                "Vibrant flat shapes with kinetic typography",
                "motion graphics style, clean shapes, vibrant colors, flat design, smooth animation, kinetic typography elements",
            ),
            StyleEntry::builtin(
                "cinematic",
                "Hyper-real Cinematic",
                "8k, dramatic lighting, shallow depth of field",
                "cinematic movie style, shallow depth of field, anamorphic lens flares, dramatic atmosphere, 8k resolution, cinematic lighting",
            ),
            StyleEntry::builtin(
                "3d_animation",
                "Pixar/Disney 3D Animation",
                "Expressive stylized characters with soft shadows",
                "unreal engine 5 render, pixar style 3d, stylized characters, soft shadows, raytraced reflections",
            ),
            StyleEntry::builtin(
                "realistic",
                "Documentary Realism",
                "Photorealistic nature-documentary look",
                "photorealistic, shot on 35mm lens, national geographic style, natural textures, hyper-detailed",
            ),
            StyleEntry::builtin(
                "anime",
                "Anime",
                "Hand-drawn lines, vivid skies, nostalgic mood",
                "modern anime style, makoto shinkai aesthetic, vibrant sky, hand-drawn lines, cel shaded",
            ),
            StyleEntry::builtin(
                "cyberpunk",
                "Cyberpunk Neon",
                "High contrast neon, rainy futuristic streets",
                "cyberpunk aesthetic, neon lights, rainy night, futuristic city, glow and bloom, synthwave palette",
            ),
        ] {
            catalog.insert(entry);
        }
        catalog
    }

    /// Add a style or replace the entry with the same id.
    pub fn insert(&mut self, entry: StyleEntry) {
        self.entries.insert(entry.id.clone(), entry);
    }

    pub fn extend(&mut self, entries: impl IntoIterator<Item = StyleEntry>) {
        for entry in entries {
            self.insert(entry);
        }
    }

    pub fn get(&self, id: &str) -> Option<&StyleEntry> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Fragment for `id`, or the generic default when the id is unmapped
    pub fn fragment_for(&self, id: &str) -> &str {
        self.get(id)
            .map(|entry| entry.fragment.as_str())
            .unwrap_or(DEFAULT_STYLE_FRAGMENT)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StyleEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
