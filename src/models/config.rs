use super::{AspectRatio, Color, Direction, GradientKind, Position};
use serde::{Deserialize, Serialize};

/// Tool settings loaded from `gradientgen.yaml` and `GRADIENTGEN__*` variables.
///
/// Every field has a default, so a partial file (or none at all) is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub preview: PreviewSettings,
    pub generation: GenerationSettings,
    pub export: ExportSettings,
    pub defaults: GradientDefaults,
    pub logging: LoggingSettings,
}

/// Limits for the on-screen preview
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewSettings {
    /// Smallest viewport extent considered per axis, in pixels
    pub min_extent: u32,
    /// Largest viewport extent considered per axis, in pixels
    pub max_extent: u32,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Factor by which the quick preview is oversampled before downscaling
    pub oversample: f64,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            min_extent: 200,
            max_extent: 400,
            min_zoom: 0.5,
            max_zoom: 2.0,
            oversample: 1.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    /// Pixel count above which a preview of the finished image is emitted at 90%
    pub large_image_threshold: u64,
    /// How many delivered previews the controller retains
    pub history_limit: usize,
    /// Cadence at which consumers are expected to poll
    pub poll_interval_ms: u64,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            large_image_threshold: 1_000_000,
            history_limit: 10,
            poll_interval_ms: 100,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub jpeg_quality: u8,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self { jpeg_quality: 95 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum KindName {
    #[default]
    Linear,
    Radial,
}

/// Gradient shown when the tool starts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradientDefaults {
    pub primary: Color,
    pub secondary: Color,
    pub kind: KindName,
    pub direction: Direction,
    pub position: Position,
    pub width: u32,
    pub height: u32,
    pub aspect_ratio: AspectRatio,
}

impl Default for GradientDefaults {
    fn default() -> Self {
        Self {
            primary: Color::new(0xc5, 0x02, 0x2f),
            secondary: Color::new(0x8e, 0xf9, 0xe0),
            kind: KindName::Linear,
            direction: Direction::TopLeftToBottomRight,
            position: Position::Center,
            width: 1024,
            height: 1024,
            aspect_ratio: AspectRatio::Square,
        }
    }
}

impl GradientDefaults {
    pub fn gradient_kind(&self) -> GradientKind {
        match self.kind {
            KindName::Linear => GradientKind::Linear(self.direction),
            KindName::Radial => GradientKind::Radial(self.position),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub directory: String,
    pub debug: bool,
    pub console: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            directory: "logs".to_string(),
            debug: false,
            console: true,
        }
    }
}
