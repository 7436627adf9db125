use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::audio::fade::DEFAULT_VOLUME;
use crate::audio::scene::SceneType;

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct AppSettings {
    pub llm: LlmSettings,
    pub audio: AudioSettings,
    pub ui: UiSettings,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct LlmSettings {
    /// Base of an OpenAI-compatible API, without the trailing endpoint.
    pub base_url: String,
    /// Sent as a bearer token when present. Usually supplied through `API_KEY`.
    pub api_key: Option<String>,
    pub text_model: String,
    pub image_model: String,
    pub temperature: f32,
    pub images_enabled: bool,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:1234/v1".into(),
            api_key: None,
            text_model: "local-model".into(),
            image_model: "local-image-model".into(),
            temperature: 0.7,
            images_enabled: true,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct AudioSettings {
    pub enabled: bool,
    pub volume: f32,
    /// Looping track per scene type. Scenes without one get a quiet drone.
    pub tracks: BTreeMap<SceneType, PathBuf>,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            volume: DEFAULT_VOLUME,
            tracks: BTreeMap::new(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct UiSettings {
    pub ui_scale: f32,

    /// Typewriter delay per character, in milliseconds. Zero shows text at once.
    pub typewriter_ms: u64,

    // Speaker → color mapping (extensible)
    pub speaker_colors: HashMap<String, [u8; 4]>,
}

impl Default for UiSettings {
    fn default() -> Self {
        let mut speaker_colors = HashMap::new();

        speaker_colors.insert("Player".into(), [40, 70, 120, 255]);
        speaker_colors.insert("Narration".into(), [60, 52, 40, 255]);
        speaker_colors.insert("System".into(), [80, 80, 80, 255]);

        Self {
            ui_scale: 1.0,
            typewriter_ms: 25,
            speaker_colors,
        }
    }
}

impl UiSettings {
    pub fn color(&self, key: &str) -> Color32 {
        self.speaker_colors
            .get(key)
            .map(|c| Color32::from_rgba_unmultiplied(c[0], c[1], c[2], c[3]))
            .unwrap_or(Color32::DARK_GRAY)
    }

    pub fn set_color(&mut self, key: &str, color: Color32) {
        self.speaker_colors.insert(
            key.to_string(),
            [color.r(), color.g(), color.b(), color.a()],
        );
    }
}
