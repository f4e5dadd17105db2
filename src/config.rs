//! Configuration persistence for photomark settings

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::domain::ShapeKind;

/// Serializable color representation for config storage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Default for ShapeColor {
    fn default() -> Self {
        // Red
        Self {
            r: 0.9,
            g: 0.1,
            b: 0.1,
        }
    }
}

impl ShapeColor {
    pub const WHITE: ShapeColor = ShapeColor {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    pub const BLACK: ShapeColor = ShapeColor {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    /// Convert to RGBA format (0-255), always opaque
    pub fn to_rgba_u8(self) -> [u8; 4] {
        [
            (self.r.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.g.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.b.clamp(0.0, 1.0) * 255.0).round() as u8,
            255,
        ]
    }

    /// Parse a `#rrggbb` (or `rrggbb`) hex string
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self {
            r: channel(0)? as f32 / 255.0,
            g: channel(2)? as f32 / 255.0,
            b: channel(4)? as f32 / 255.0,
        })
    }
}

/// Active drawing tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    #[default]
    Pen,
    Eraser,
    Rectangle,
    Circle,
    Arrow,
    Text,
}

impl Tool {
    /// Get the next tool in the cycle
    pub fn next(self) -> Self {
        match self {
            Tool::Pen => Tool::Eraser,
            Tool::Eraser => Tool::Rectangle,
            Tool::Rectangle => Tool::Circle,
            Tool::Circle => Tool::Arrow,
            Tool::Arrow => Tool::Text,
            Tool::Text => Tool::Pen,
        }
    }

    /// Shape kind drawn by this tool, if it is a shape tool
    pub fn shape_kind(self) -> Option<ShapeKind> {
        match self {
            Tool::Rectangle => Some(ShapeKind::Rectangle),
            Tool::Circle => Some(ShapeKind::Circle),
            Tool::Arrow => Some(ShapeKind::Arrow),
            Tool::Pen | Tool::Eraser | Tool::Text => None,
        }
    }
}

/// Encoding used when flattening the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Jpeg,
    Png,
}

impl ExportFormat {
    /// Get file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Jpeg => "jpg",
            ExportFormat::Png => "png",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Jpeg => "image/jpeg",
            ExportFormat::Png => "image/png",
        }
    }
}

/// Editor configuration persisted between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Tool active when a session opens
    pub tool: Tool,
    /// Drawing color for strokes, shapes and text
    pub color: ShapeColor,
    /// Line width for strokes and shapes, in surface pixels
    pub stroke_width: f32,
    /// Text size in surface pixels
    pub font_size: f32,
    /// Largest surface the source image is scaled down to
    pub max_surface_width: u32,
    pub max_surface_height: u32,
    /// Format produced on save/download
    pub export_format: ExportFormat,
    /// Lossy quality (1-100), only used for JPEG
    pub jpeg_quality: u8,
    /// Fixed filename used by download
    pub download_file_name: String,
    /// Download directory (None = system downloads folder)
    pub download_dir: Option<PathBuf>,
    /// Font for text annotations (None = first available system font)
    pub font_path: Option<PathBuf>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            tool: Tool::Pen,
            color: ShapeColor::default(),
            stroke_width: 5.0,
            font_size: 24.0,
            max_surface_width: 800,
            max_surface_height: 600,
            export_format: ExportFormat::Jpeg,
            jpeg_quality: 90,
            download_file_name: "annotated-photo.jpg".to_string(),
            download_dir: None,
            font_path: None,
        }
    }
}

impl EditorConfig {
    /// Application directory name under the user config folder
    pub const ID: &'static str = "photomark";

    /// Default config file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(Self::ID).join("config.json"))
    }

    /// Load configuration from disk, or return defaults if unavailable
    pub fn load() -> Self {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => {
                log::warn!("Could not determine config directory, using defaults");
                Self::default()
            }
        }
    }

    /// Load configuration from a specific file, or return defaults if unavailable
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => config,
                Err(err) => {
                    log::warn!("Error loading config {:?}, using defaults: {:?}", path, err);
                    Self::default()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No config at {:?}, using defaults", path);
                Self::default()
            }
            Err(err) => {
                log::warn!("Could not read config {:?}: {:?}", path, err);
                Self::default()
            }
        }
    }

    /// Save configuration to disk
    pub fn save(&self) {
        let Some(path) = Self::default_path() else {
            log::error!("Could not determine config directory for saving");
            return;
        };
        if let Err(err) = self.save_to(&path) {
            log::error!("Failed to save config: {:?}", err);
        }
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating config directory {:?}", parent))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).with_context(|| format!("writing config {:?}", path))?;
        Ok(())
    }

    /// Directory used by download
    pub fn resolved_download_dir(&self) -> Option<PathBuf> {
        self.download_dir.clone().or_else(|| {
            dirs::download_dir().or_else(|| dirs::home_dir().map(|h| h.join("Downloads")))
        })
    }
}
