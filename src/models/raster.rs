use super::Color;
use image::RgbImage;
use std::sync::Arc;

/// A finished RGB raster, row-major, one [`Color`] per pixel.
///
/// The pixel buffer is immutable after construction and shared behind an
/// `Arc`, so clones are cheap and a job, a preview history and the consumer
/// can all hold the same image.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    pixels: Arc<RgbImage>,
}

impl RasterImage {
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    pub fn pixel_count(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }

    /// Color at `(x, y)`, or `None` outside the image
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        self.pixels.get_pixel_checked(x, y).map(|p| Color::from(p.0))
    }

    /// Row-major iterator over all pixels
    pub fn colors(&self) -> impl Iterator<Item = Color> + '_ {
        self.pixels.pixels().map(|p| Color::from(p.0))
    }

    /// Packed `RGBRGB...` bytes
    pub fn as_bytes(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    /// Borrow the underlying buffer for resampling and encoding
    pub fn as_rgb(&self) -> &RgbImage {
        &self.pixels
    }

    pub fn ptr_eq(&self, other: &RasterImage) -> bool {
        Arc::ptr_eq(&self.pixels, &other.pixels)
    }
}

impl From<RgbImage> for RasterImage {
    fn from(image: RgbImage) -> Self {
        Self {
            pixels: Arc::new(image),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_access() {
        let mut buffer = RgbImage::new(3, 2);
        buffer.put_pixel(2, 1, image::Rgb([1, 2, 3]));
        let raster = RasterImage::from(buffer);

        assert_eq!(raster.dimensions(), (3, 2));
        assert_eq!(raster.pixel(2, 1), Some(Color::new(1, 2, 3)));
        assert_eq!(raster.pixel(0, 0), Some(Color::BLACK));
        assert_eq!(raster.pixel(3, 0), None);
        assert_eq!(raster.as_bytes().len(), 18);
        assert_eq!(raster.colors().count(), 6);
    }

    #[test]
    fn test_clones_share_pixels() {
        let raster = RasterImage::from(RgbImage::new(2, 2));
        let copy = raster.clone();
        assert!(raster.ptr_eq(&copy));
    }
}
