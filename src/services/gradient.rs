use crate::models::{Color, Direction, GradientKind, GradientSpec, RasterImage};
use image::RgbImage;
use thiserror::Error;

/// Errors that can occur while rasterizing a gradient
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("Image of {width}x{height} pixels exceeds the addressable size")]
    TooLarge { width: u32, height: u32 },

    #[error("Could not allocate {bytes} bytes for a {width}x{height} image")]
    Allocation { width: u32, height: u32, bytes: usize },
}

/// Interpolation weights for one pixel.
///
/// Linear weights are both computed directly from the geometry instead of
/// deriving one as `1 - other`, so a reversed direction with swapped colors
/// stays bit-identical to the unmirrored gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Weights {
    primary: f64,
    secondary: f64,
}

impl Weights {
    fn blend(self, a: u8, b: u8) -> u8 {
        (a as f64 * self.primary + b as f64 * self.secondary)
            .round()
            .clamp(0.0, 255.0) as u8
    }

    fn apply(self, primary: Color, secondary: Color) -> [u8; 3] {
        [
            self.blend(primary.r, secondary.r),
            self.blend(primary.g, secondary.g),
            self.blend(primary.b, secondary.b),
        ]
    }
}

fn linear_weights(direction: Direction, x: f64, y: f64, w: f64, h: f64) -> Weights {
    let fx = x / w;
    let rx = (w - x) / w;
    let fy = y / h;
    let ry = (h - y) / h;

    // (secondary, primary) weight per direction
    let (t, s) = match direction {
        Direction::LeftToRight => (fx, rx),
        Direction::RightToLeft => (rx, fx),
        Direction::TopToBottom => (fy, ry),
        Direction::BottomToTop => (ry, fy),
        Direction::TopLeftToBottomRight => ((fx + fy) / 2.0, (rx + ry) / 2.0),
        Direction::TopRightToBottomLeft => ((rx + fy) / 2.0, (fx + ry) / 2.0),
        Direction::BottomLeftToTopRight => ((fx + ry) / 2.0, (rx + fy) / 2.0),
        Direction::BottomRightToTopLeft => ((rx + ry) / 2.0, (fx + fy) / 2.0),
    };

    Weights {
        primary: s,
        secondary: t,
    }
}

fn radial_weights(x: f64, y: f64, cx: f64, cy: f64, max_dist: f64) -> Weights {
    let t = ((x - cx).hypot(y - cy) / max_dist).min(1.0);
    Weights {
        primary: 1.0 - t,
        secondary: t,
    }
}

/// Rasterize `spec` into a new image.
///
/// Pure and deterministic: identical specs always produce identical pixels.
/// Every pixel is computed independently from its own coordinates; rows are
/// filled in a single pass on the calling thread.
///
/// Linear gradients weight the primary color by the pixel's distance to the
/// far edge, `(w - x) / w`, rather than by `1 - t`. This keeps a reversed
/// direction with swapped colors bit-identical, at the cost of a channel
/// landing one step away from `round(c1 * (1 - t) + c2 * t)` where the exact
/// value sits on a half. Red to blue over 100 pixels gives red 26 at x = 90,
/// where `1 - t` would give 25.
///
/// Fails only when the pixel buffer cannot be sized or allocated.
pub fn render(spec: &GradientSpec) -> Result<RasterImage, RenderError> {
    let (width, height) = (spec.width(), spec.height());
    let mut buffer = allocate(width, height)?;

    let (w, h) = (width as f64, height as f64);
    let (primary, secondary) = (spec.primary(), spec.secondary());
    let row_len = width as usize * 3;

    match spec.kind() {
        GradientKind::Linear(direction) => {
            for (y, row) in buffer.chunks_exact_mut(row_len).enumerate() {
                for (x, px) in row.chunks_exact_mut(3).enumerate() {
                    let weights = linear_weights(direction, x as f64, y as f64, w, h);
                    px.copy_from_slice(&weights.apply(primary, secondary));
                }
            }
        }
        GradientKind::Radial(position) => {
            let (cx, cy) = position.anchor(width, height);
            let max_dist = w.hypot(h) / 2.0;
            for (y, row) in buffer.chunks_exact_mut(row_len).enumerate() {
                for (x, px) in row.chunks_exact_mut(3).enumerate() {
                    let weights = radial_weights(x as f64, y as f64, cx, cy, max_dist);
                    px.copy_from_slice(&weights.apply(primary, secondary));
                }
            }
        }
    }

    let image =
        RgbImage::from_raw(width, height, buffer).ok_or(RenderError::TooLarge { width, height })?;
    Ok(RasterImage::from(image))
}

/// Blend ratio `t` at one pixel, for inspection and testing.
///
/// `0.0` is pure primary, `1.0` pure secondary.
pub fn blend_ratio(spec: &GradientSpec, x: u32, y: u32) -> f64 {
    let (w, h) = (spec.width() as f64, spec.height() as f64);
    match spec.kind() {
        GradientKind::Linear(direction) => {
            linear_weights(direction, x as f64, y as f64, w, h).secondary
        }
        GradientKind::Radial(position) => {
            let (cx, cy) = position.anchor(spec.width(), spec.height());
            radial_weights(x as f64, y as f64, cx, cy, w.hypot(h) / 2.0).secondary
        }
    }
}

/// Reserve a zeroed RGB buffer, reporting exhaustion instead of aborting
fn allocate(width: u32, height: u32) -> Result<Vec<u8>, RenderError> {
    let bytes = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(3))
        .filter(|&n| n <= isize::MAX as usize)
        .ok_or(RenderError::TooLarge { width, height })?;

    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(bytes)
        .map_err(|_| RenderError::Allocation { width, height, bytes })?;
    buffer.resize(bytes, 0);
    Ok(buffer)
}
