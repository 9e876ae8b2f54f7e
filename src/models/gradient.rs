use super::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors raised when a [`GradientSpec`] cannot be built
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpecError {
    #[error("Image dimensions must be positive, got {width}x{height}")]
    ZeroDimension { width: u32, height: u32 },
}

/// Direction of a linear gradient, from the primary color to the secondary one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    LeftToRight,
    RightToLeft,
    TopToBottom,
    BottomToTop,
    #[default]
    TopLeftToBottomRight,
    TopRightToBottomLeft,
    BottomLeftToTopRight,
    BottomRightToTopLeft,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::LeftToRight,
        Direction::RightToLeft,
        Direction::TopToBottom,
        Direction::BottomToTop,
        Direction::TopLeftToBottomRight,
        Direction::TopRightToBottomLeft,
        Direction::BottomLeftToTopRight,
        Direction::BottomRightToTopLeft,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Direction::LeftToRight => "left-to-right",
            Direction::RightToLeft => "right-to-left",
            Direction::TopToBottom => "top-to-bottom",
            Direction::BottomToTop => "bottom-to-top",
            Direction::TopLeftToBottomRight => "top-left-to-bottom-right",
            Direction::TopRightToBottomLeft => "top-right-to-bottom-left",
            Direction::BottomLeftToTopRight => "bottom-left-to-top-right",
            Direction::BottomRightToTopLeft => "bottom-right-to-top-left",
        }
    }

    /// Resolve a direction name; unknown names fall back to the diagonal default.
    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|d| d.name() == name)
            .unwrap_or_else(|| {
                tracing::debug!("Unknown gradient direction {:?}, using default", name);
                Self::default()
            })
    }

    /// The same axis traversed the other way round
    pub fn reversed(&self) -> Self {
        match self {
            Direction::LeftToRight => Direction::RightToLeft,
            Direction::RightToLeft => Direction::LeftToRight,
            Direction::TopToBottom => Direction::BottomToTop,
            Direction::BottomToTop => Direction::TopToBottom,
            Direction::TopLeftToBottomRight => Direction::BottomRightToTopLeft,
            Direction::BottomRightToTopLeft => Direction::TopLeftToBottomRight,
            Direction::TopRightToBottomLeft => Direction::BottomLeftToTopRight,
            Direction::BottomLeftToTopRight => Direction::TopRightToBottomLeft,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Anchor point of a radial gradient's center
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    #[default]
    Center,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
    TopLeft,
}

impl Position {
    pub const ALL: [Position; 9] = [
        Position::Center,
        Position::Top,
        Position::TopRight,
        Position::Right,
        Position::BottomRight,
        Position::Bottom,
        Position::BottomLeft,
        Position::Left,
        Position::TopLeft,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Position::Center => "center",
            Position::Top => "top",
            Position::TopRight => "top-right",
            Position::Right => "right",
            Position::BottomRight => "bottom-right",
            Position::Bottom => "bottom",
            Position::BottomLeft => "bottom-left",
            Position::Left => "left",
            Position::TopLeft => "top-left",
        }
    }

    /// Resolve a position name; unknown names fall back to `center`.
    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|p| p.name() == name)
            .unwrap_or_else(|| {
                tracing::debug!("Unknown radial position {:?}, using center", name);
                Self::default()
            })
    }

    /// Pixel coordinates of the anchor within a `width` x `height` image.
    ///
    /// Midpoints use integer halving and the far edges sit at `width`/`height`
    /// (one past the last pixel).
    pub fn anchor(&self, width: u32, height: u32) -> (f64, f64) {
        let (w, h) = (width as f64, height as f64);
        let (mid_x, mid_y) = ((width / 2) as f64, (height / 2) as f64);
        match self {
            Position::Center => (mid_x, mid_y),
            Position::Top => (mid_x, 0.0),
            Position::TopRight => (w, 0.0),
            Position::Right => (w, mid_y),
            Position::BottomRight => (w, h),
            Position::Bottom => (mid_x, h),
            Position::BottomLeft => (0.0, h),
            Position::Left => (0.0, mid_y),
            Position::TopLeft => (0.0, 0.0),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Gradient geometry. Linear gradients carry a direction, radial ones an anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GradientKind {
    Linear(Direction),
    Radial(Position),
}

impl GradientKind {
    /// Two-letter tag used in export file names
    pub fn short_tag(&self) -> &'static str {
        match self {
            GradientKind::Linear(_) => "lg",
            GradientKind::Radial(_) => "rg",
        }
    }

    pub fn is_linear(&self) -> bool {
        matches!(self, GradientKind::Linear(_))
    }
}

impl Default for GradientKind {
    fn default() -> Self {
        GradientKind::Linear(Direction::default())
    }
}

/// Immutable description of one gradient image
///
/// A spec is the only thing the rendering core ever sees: callers build a
/// fresh value for every submission instead of sharing mutable settings.
/// Dimensions are validated at construction, so every spec in circulation has
/// a width and height of at least one pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GradientSpec {
    kind: GradientKind,
    primary: Color,
    secondary: Color,
    width: u32,
    height: u32,
}

impl GradientSpec {
    pub fn new(
        kind: GradientKind,
        primary: Color,
        secondary: Color,
        width: u32,
        height: u32,
    ) -> Result<Self, SpecError> {
        if width == 0 || height == 0 {
            return Err(SpecError::ZeroDimension { width, height });
        }

        Ok(Self {
            kind,
            primary,
            secondary,
            width,
            height,
        })
    }

    pub fn linear(
        direction: Direction,
        primary: Color,
        secondary: Color,
        width: u32,
        height: u32,
    ) -> Result<Self, SpecError> {
        Self::new(GradientKind::Linear(direction), primary, secondary, width, height)
    }

    pub fn radial(
        position: Position,
        primary: Color,
        secondary: Color,
        width: u32,
        height: u32,
    ) -> Result<Self, SpecError> {
        Self::new(GradientKind::Radial(position), primary, secondary, width, height)
    }

    pub fn kind(&self) -> GradientKind {
        self.kind
    }

    pub fn primary(&self) -> Color {
        self.primary
    }

    pub fn secondary(&self) -> Color {
        self.secondary
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Same gradient rendered at another size
    pub fn with_size(&self, width: u32, height: u32) -> Result<Self, SpecError> {
        Self::new(self.kind, self.primary, self.secondary, width, height)
    }

    /// Same gradient with the two colors exchanged
    pub fn with_swapped_colors(&self) -> Self {
        Self {
            primary: self.secondary,
            secondary: self.primary,
            ..*self
        }
    }
}
