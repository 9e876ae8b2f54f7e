//! Data models for gradient generation.
//!
//! - [`Color`]: an 8-bit sRGB color parsed from strict `#RRGGBB` input
//! - [`GradientSpec`]: immutable description of one image (kind, colors, size)
//! - [`RasterImage`]: a finished, shareable RGB raster
//! - [`AspectRatio`]: dimension lock presets used while editing sizes
//! - [`Settings`]: tool configuration loaded by [`ConfigManager`](crate::config::ConfigManager)
//!
//! Values here carry no behavior beyond validation and formatting; rendering
//! lives in [`crate::services`].

pub mod aspect;
pub mod color;
pub mod config;
pub mod gradient;
pub mod raster;

pub use aspect::{AspectRatio, swap_dimensions};
pub use color::{Color, ColorError};
pub use config::{
    ExportSettings, GenerationSettings, GradientDefaults, KindName, LoggingSettings,
    PreviewSettings, Settings,
};
pub use gradient::{Direction, GradientKind, GradientSpec, Position, SpecError};
pub use raster::RasterImage;
