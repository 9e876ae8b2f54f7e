//! Services module - Pure rendering and export logic.
//!
//! Everything here is framework-agnostic and synchronous apart from the
//! queues a [`GenerationJob`] writes to. The controller in
//! [`crate::controller`] decides where jobs run.
//!
//! # Components
//!
//! - [`gradient`]: per-pixel linear and radial rasterization ([`render`])
//! - [`preview`]: viewport fitting, zoom and Lanczos downscaling ([`PreviewScaler`])
//! - [`generation`]: the two-phase [`GenerationJob`] with cooperative cancellation
//! - [`export`]: PNG/JPEG encoding, CSS text and file naming
//!
//! # Usage Example
//!
//! ```ignore
//! use gradientgen::models::{Color, Direction, GradientSpec};
//! use gradientgen::services::{css, render};
//!
//! let spec = GradientSpec::linear(Direction::LeftToRight, Color::BLACK, Color::WHITE, 640, 480)?;
//! let image = render(&spec)?;
//! println!("{}", css(&spec));
//! ```

pub mod export;
pub mod generation;
pub mod gradient;
pub mod preview;

pub use export::{ExportError, ExportFormat, css, default_filename, encode_jpeg, encode_png, save};
pub use generation::{
    CancellationToken, GenerationJob, JobChannels, JobOutcome, JobReceivers, ProgressEvent,
    job_channels,
};
pub use gradient::{RenderError, blend_ratio, render};
pub use preview::{PREVIEW_FILTER, PreviewScaler};
