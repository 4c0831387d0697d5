use image::{DynamicImage, GrayImage, RgbImage, RgbaImage};

use crate::error::PhotoCheckError;

/// A decoded image: immutable RGB raster with known dimensions.
///
/// Built once per validation call; alpha is flattened over white on
/// construction so transparent uploads read as white background.
#[derive(Debug)]
pub struct RasterImage {
    rgb: RgbImage,
}

impl RasterImage {
    /// Decode raw image bytes (JPEG, PNG, or WebP).
    pub fn from_bytes(input: &[u8]) -> Result<Self, PhotoCheckError> {
        let decoded = image::load_from_memory(input)
            .map_err(|e| PhotoCheckError::Decode(e.to_string()))?;

        if decoded.width() == 0 || decoded.height() == 0 {
            return Err(PhotoCheckError::ZeroDimensions);
        }

        Ok(Self {
            rgb: flatten_alpha(&decoded),
        })
    }

    /// Wrap an already-decoded RGB buffer.
    pub fn from_rgb(rgb: RgbImage) -> Result<Self, PhotoCheckError> {
        if rgb.width() == 0 || rgb.height() == 0 {
            return Err(PhotoCheckError::ZeroDimensions);
        }
        Ok(Self { rgb })
    }

    pub fn width(&self) -> u32 {
        self.rgb.width()
    }

    pub fn height(&self) -> u32 {
        self.rgb.height()
    }

    /// The underlying RGB pixel buffer.
    pub fn rgb(&self) -> &RgbImage {
        &self.rgb
    }

    /// Grayscale copy, for detectors and the sharpness filter.
    pub fn to_luma(&self) -> GrayImage {
        image::imageops::grayscale(&self.rgb)
    }
}

/// Flatten alpha by compositing onto a white background.
fn flatten_alpha(image: &DynamicImage) -> RgbImage {
    if image.color().has_alpha() {
        let rgba: RgbaImage = image.to_rgba8();
        let (width, height) = (rgba.width(), rgba.height());
        let mut rgb = RgbImage::new(width, height);

        for (x, y, pixel) in rgba.enumerate_pixels() {
            let [r, g, b, a] = pixel.0;
            let alpha = a as f32 / 255.0;
            let inv_alpha = 1.0 - alpha;
            // Composite over white (255, 255, 255)
            let out_r = (r as f32 * alpha + 255.0 * inv_alpha).round() as u8;
            let out_g = (g as f32 * alpha + 255.0 * inv_alpha).round() as u8;
            let out_b = (b as f32 * alpha + 255.0 * inv_alpha).round() as u8;
            rgb.put_pixel(x, y, image::Rgb([out_r, out_g, out_b]));
        }

        rgb
    } else {
        image.to_rgb8()
    }
}
