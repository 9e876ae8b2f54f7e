use crate::models::{PreviewSettings, RasterImage};
use image::imageops::{self, FilterType};

/// Resampling filter for every preview. Lanczos widens its kernel when
/// shrinking, so downscaled gradients do not alias.
pub const PREVIEW_FILTER: FilterType = FilterType::Lanczos3;

/// Sizes and resamples on-screen previews
///
/// The scaler never crops: the image is fit inside the clamped viewport with
/// its aspect ratio preserved, then scaled by the user's zoom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewScaler {
    settings: PreviewSettings,
}

impl PreviewScaler {
    pub fn new(settings: PreviewSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &PreviewSettings {
        &self.settings
    }

    /// Pixel size of the preview for an `image_w` x `image_h` image.
    ///
    /// The available viewport (which may be zero or negative while a window
    /// is still being laid out) is clamped per axis to the configured extent
    /// range. Zoom is clamped to the configured zoom range. Each returned
    /// dimension is rounded up and is never below one pixel.
    pub fn target_size(
        &self,
        available_w: i64,
        available_h: i64,
        image_w: u32,
        image_h: u32,
        zoom: f64,
    ) -> (u32, u32) {
        let min = self.settings.min_extent as i64;
        let max = (self.settings.max_extent as i64).max(min);
        let avail_w = available_w.clamp(min, max) as f64;
        let avail_h = available_h.clamp(min, max) as f64;

        let (img_w, img_h) = (image_w.max(1) as f64, image_h.max(1) as f64);
        let scale = (avail_w / img_w).min(avail_h / img_h) * self.clamp_zoom(zoom);

        (ceil_extent(img_w * scale), ceil_extent(img_h * scale))
    }

    /// Zoom limited to the configured range; non-finite input means 100%
    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        if !zoom.is_finite() {
            return 1.0;
        }
        let (lo, hi) = (self.settings.min_zoom, self.settings.max_zoom.max(self.settings.min_zoom));
        zoom.clamp(lo, hi)
    }

    /// Size at which the quick preview is rendered before downscaling
    pub fn oversampled(&self, target: (u32, u32)) -> (u32, u32) {
        let factor = self.settings.oversample.max(1.0);
        (
            ((target.0 as f64 * factor) as u32).max(1),
            ((target.1 as f64 * factor) as u32).max(1),
        )
    }

    /// High-quality resample of `image` to exactly `width` x `height`.
    ///
    /// Returns a cheap clone when the image already has that size.
    pub fn resize(image: &RasterImage, width: u32, height: u32) -> RasterImage {
        let (width, height) = (width.max(1), height.max(1));
        if image.dimensions() == (width, height) {
            return image.clone();
        }
        RasterImage::from(imageops::resize(image.as_rgb(), width, height, PREVIEW_FILTER))
    }
}

impl Default for PreviewScaler {
    fn default() -> Self {
        Self::new(PreviewSettings::default())
    }
}

fn ceil_extent(value: f64) -> u32 {
    if value.is_finite() {
        value.ceil().clamp(1.0, u32::MAX as f64) as u32
    } else {
        1
    }
}
