//! Configuration persistence for hans settings

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::render::picture::PictureSettings;

/// Serializable color representation for config storage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    #[serde(default = "opaque")]
    pub a: f32,
}

fn opaque() -> f32 {
    1.0
}

impl ShapeColor {
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Convert to image crate RGBA format (0-255)
    pub fn to_rgba_u8(self) -> [u8; 4] {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [channel(self.r), channel(self.g), channel(self.b), channel(self.a)]
    }
}

/// Application configuration persisted between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HansConfig {
    /// Margin around the spectrogram in pixels, must be larger than 15
    pub border_size: u32,
    /// TrueType font used for letters and labels, the bundled DejaVu Sans
    /// when unset
    pub font_path: Option<PathBuf>,
    /// Timing line color
    pub line_color: ShapeColor,
    /// Color of the frame around the spectrogram
    pub frame_color: ShapeColor,
    /// Letter and label color
    pub text_color: ShapeColor,
    /// Canvas background, transparent when unset
    pub background: Option<ShapeColor>,
    /// Width of lines and frame
    pub stroke_width: f32,
    /// On/off dash lengths for timing lines, solid when unset
    pub line_dash: Option<[f32; 2]>,
    /// Distance from the bottom of the spectrogram to the letter row
    pub letter_offset: f32,
    /// Gap between the top of the frame and the duration label baseline
    pub label_gap: f32,
    /// Longest accepted frequency/duration/letter text
    pub max_label_chars: usize,
    /// Letter placed by clicks until another one is chosen
    pub default_letter: String,
}

impl Default for HansConfig {
    fn default() -> Self {
        Self {
            border_size: 45,
            font_path: None,
            line_color: ShapeColor::RED,
            frame_color: ShapeColor::BLACK,
            text_color: ShapeColor::BLACK,
            // White so labels stay readable in viewers with dark backgrounds
            background: Some(ShapeColor::WHITE),
            stroke_width: 3.0,
            line_dash: None,
            letter_offset: 20.0,
            label_gap: 10.0,
            max_label_chars: 64,
            default_letter: "a".to_string(),
        }
    }
}

impl HansConfig {
    /// Directory name under the platform config dir
    pub const ID: &'static str = "hans";

    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(Self::ID).join("config.json"))
    }

    /// Load configuration from disk, or return defaults if unavailable
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => {
                log::warn!("No config directory available, using defaults");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::read(path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Error loading config, using defaults: {:?}", err);
                Self::default()
            }
        }
    }

    fn read(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration to disk
    pub fn save(&self) {
        let Some(path) = Self::config_path() else {
            log::error!("No config directory available, settings not saved");
            return;
        };
        if let Err(err) = self.save_to(&path) {
            log::error!("Failed to save config: {:?}", err);
        }
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config dir: {}", dir.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    pub fn picture_settings(&self) -> PictureSettings {
        PictureSettings {
            border_size: self.border_size,
            line_color: self.line_color,
            frame_color: self.frame_color,
            text_color: self.text_color,
            background: self.background,
            stroke_width: self.stroke_width,
            line_dash: self.line_dash,
            letter_offset: self.letter_offset,
            label_gap: self.label_gap,
        }
    }
}
