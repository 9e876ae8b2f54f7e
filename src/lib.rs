// gradientgen - two-color gradient image generator
//
// This is the library crate containing rendering, the background generation
// pipeline and its controller. The binary crate (main.rs) is a command-line
// consumer that drives the controller by polling.

pub mod config;
pub mod controller;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use config::ConfigManager;
pub use controller::{ControllerError, ControllerEvent, GenerationController, PollEvents};
pub use metrics::Metrics;
pub use models::{Color, Direction, GradientKind, GradientSpec, Position, RasterImage, Settings};
pub use services::{JobOutcome, PreviewScaler, ProgressEvent};
pub use state::{JobState, Status};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
