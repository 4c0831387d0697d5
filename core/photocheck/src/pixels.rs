//! Pixel-level analysis: background color/uniformity and overall image
//! quality (resolution, color, Laplacian sharpness).

use image::imageops::FilterType;
use image::GrayImage;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::face_detector::FaceBounds;
use crate::policy::ValidationPolicy;
use crate::raster::RasterImage;

/// Background color statistics over border samples.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundMetrics {
    /// Per-channel mean over the kept samples (R, G, B).
    pub mean_rgb: [f64; 3],
    /// Per-channel variance over the kept samples.
    pub variance: [f64; 3],
    pub is_white: bool,
    pub complex: bool,
    /// Number of border samples actually used (samples inside the face box
    /// are skipped).
    pub samples: u32,
}

/// Resolution, color, and sharpness of the full frame.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageQualityMetrics {
    pub width: u32,
    pub height: u32,
    pub is_color: bool,
    /// Variance of the Laplacian response over grayscale — higher is sharper.
    pub sharpness: f64,
    pub is_high_quality: bool,
}

/// Sample the image border (4 corners + evenly spaced edge points, skipping
/// the face box) and classify the background.
pub(crate) fn analyze_background(
    image: &RasterImage,
    exclude: Option<&FaceBounds>,
    policy: &ValidationPolicy,
) -> BackgroundMetrics {
    let rgb = image.rgb();
    let (w, h) = (image.width(), image.height());

    let mut sums = [0.0f64; 3];
    let mut sq_sums = [0.0f64; 3];
    let mut samples = 0u32;

    let mut sample = |x: u32, y: u32| {
        if let Some(bounds) = exclude {
            if bounds.contains(x as f64, y as f64) {
                return;
            }
        }
        let p = rgb.get_pixel(x, y).0;
        for c in 0..3 {
            let v = p[c] as f64;
            sums[c] += v;
            sq_sums[c] += v * v;
        }
        samples += 1;
    };

    // Corners
    sample(0, 0);
    sample(w - 1, 0);
    sample(0, h - 1);
    sample(w - 1, h - 1);

    // Evenly spaced points along each edge
    let n = policy.edge_samples_per_side;
    for i in 1..=n {
        let fx = (i as f64 / (n + 1) as f64 * w as f64) as u32;
        let fy = (i as f64 / (n + 1) as f64 * h as f64) as u32;
        sample(fx.min(w - 1), 0); // top
        sample(fx.min(w - 1), h - 1); // bottom
        sample(0, fy.min(h - 1)); // left
        sample(w - 1, fy.min(h - 1)); // right
    }

    if samples == 0 {
        // Face box covers the whole border; nothing to classify.
        return BackgroundMetrics::default();
    }

    let count = samples as f64;
    let mut mean_rgb = [0.0; 3];
    let mut variance = [0.0; 3];
    for c in 0..3 {
        mean_rgb[c] = sums[c] / count;
        variance[c] = sq_sums[c] / count - mean_rgb[c] * mean_rgb[c];
    }

    let metrics = BackgroundMetrics {
        mean_rgb,
        variance,
        is_white: mean_rgb.iter().all(|&m| m > policy.white_channel_min as f64),
        complex: variance.iter().any(|&v| v > policy.max_background_variance),
        samples,
    };
    debug!(
        mean = ?metrics.mean_rgb,
        variance = ?metrics.variance,
        samples = metrics.samples,
        "background sampled"
    );
    metrics
}

/// Resolution, color scan, and Laplacian sharpness for the whole frame.
pub(crate) fn analyze_quality(
    image: &RasterImage,
    policy: &ValidationPolicy,
) -> ImageQualityMetrics {
    let (width, height) = (image.width(), image.height());
    let is_color = scan_for_color(image, policy);
    let sharpness = laplacian_sharpness(image, policy);

    let (min_w, min_h) = policy.min_resolution;
    let metrics = ImageQualityMetrics {
        width,
        height,
        is_color,
        sharpness,
        is_high_quality: width >= min_w && height >= min_h && sharpness > policy.min_sharpness,
    };
    debug!(
        sharpness = metrics.sharpness,
        is_color = metrics.is_color,
        "quality analyzed"
    );
    metrics
}

/// Color-sample cap: the scan visits at most roughly this many pixels.
const COLOR_SCAN_BUDGET: u32 = 10_000;

/// A grid scan over at most ~10k pixels; the image is color if any sampled
/// pixel has two channels differing by more than the policy delta.
fn scan_for_color(image: &RasterImage, policy: &ValidationPolicy) -> bool {
    let rgb = image.rgb();
    let (w, h) = (image.width(), image.height());
    let total = w as u64 * h as u64;
    let step = (((total as f64) / COLOR_SCAN_BUDGET as f64).sqrt().ceil() as u32).max(1);
    let delta = policy.color_channel_delta;

    let mut y = 0;
    while y < h {
        let mut x = 0;
        while x < w {
            let [r, g, b] = rgb.get_pixel(x, y).0;
            let max = r.max(g).max(b);
            let min = r.min(g).min(b);
            if max - min > delta {
                return true;
            }
            x += step;
        }
        y += step;
    }
    false
}

/// Variance of the discrete Laplacian over grayscale. Oversized rasters are
/// downscaled to the policy cap first, bounding the filter cost on untrusted
/// upload sizes.
fn laplacian_sharpness(image: &RasterImage, policy: &ValidationPolicy) -> f64 {
    let gray = image.to_luma();
    let gray = bound_dimensions(gray, policy.max_analysis_dimension);

    let response = imageproc::filter::laplacian_filter(&gray);
    let values = response.as_raw();
    if values.is_empty() {
        return 0.0;
    }

    let count = values.len() as f64;
    let mean = values.iter().map(|&v| v as f64).sum::<f64>() / count;
    values
        .iter()
        .map(|&v| {
            let d = v as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / count
}

fn bound_dimensions(gray: GrayImage, max_dimension: u32) -> GrayImage {
    let (w, h) = (gray.width(), gray.height());
    if w.max(h) <= max_dimension {
        return gray;
    }
    let scale = max_dimension as f64 / w.max(h) as f64;
    let new_w = ((w as f64 * scale).round() as u32).max(1);
    let new_h = ((h as f64 * scale).round() as u32).max(1);
    image::imageops::resize(&gray, new_w, new_h, FilterType::Triangle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn flat_image(w: u32, h: u32, color: [u8; 3]) -> RasterImage {
        RasterImage::from_rgb(RgbImage::from_pixel(w, h, Rgb(color))).unwrap()
    }

    fn checker_image(w: u32, h: u32, a: [u8; 3], b: [u8; 3]) -> RasterImage {
        let img = RgbImage::from_fn(w, h, |x, y| {
            if (x + y) % 2 == 0 {
                Rgb(a)
            } else {
                Rgb(b)
            }
        });
        RasterImage::from_rgb(img).unwrap()
    }

    #[test]
    fn white_background_is_white_and_uniform() {
        let image = flat_image(200, 200, [255, 255, 255]);
        let m = analyze_background(&image, None, &ValidationPolicy::default());
        assert!(m.is_white);
        assert!(!m.complex);
        assert_eq!(m.mean_rgb, [255.0, 255.0, 255.0]);
        assert_eq!(m.variance, [0.0, 0.0, 0.0]);
        assert!(m.samples >= 4);
    }

    #[test]
    fn gray_background_is_not_white() {
        let image = flat_image(200, 200, [100, 100, 100]);
        let m = analyze_background(&image, None, &ValidationPolicy::default());
        assert!(!m.is_white);
        assert!(!m.complex);
        assert_eq!(m.mean_rgb, [100.0, 100.0, 100.0]);
    }

    #[test]
    fn white_cutoff_is_exclusive() {
        // Exactly 220 per channel does not count as white
        let image = flat_image(100, 100, [220, 220, 220]);
        let m = analyze_background(&image, None, &ValidationPolicy::default());
        assert!(!m.is_white);

        let image = flat_image(100, 100, [221, 221, 221]);
        let m = analyze_background(&image, None, &ValidationPolicy::default());
        assert!(m.is_white);
    }

    #[test]
    fn striped_border_is_complex() {
        // Alternate black and white rows: border samples vary wildly
        let img = RgbImage::from_fn(200, 200, |_, y| {
            if y % 2 == 0 {
                Rgb([255, 255, 255])
            } else {
                Rgb([0, 0, 0])
            }
        });
        let image = RasterImage::from_rgb(img).unwrap();
        let m = analyze_background(&image, None, &ValidationPolicy::default());
        assert!(m.complex);
    }

    #[test]
    fn face_box_samples_are_excluded() {
        // Dark face box touching the top edge; background white elsewhere
        let img = RgbImage::from_fn(200, 200, |x, y| {
            if (50..150).contains(&x) && y < 100 {
                Rgb([30, 30, 30])
            } else {
                Rgb([255, 255, 255])
            }
        });
        let image = RasterImage::from_rgb(img).unwrap();
        let face = FaceBounds {
            x: 50.0,
            y: 0.0,
            width: 100.0,
            height: 100.0,
            confidence: 1.0,
        };

        let with_exclusion =
            analyze_background(&image, Some(&face), &ValidationPolicy::default());
        assert!(with_exclusion.is_white);

        // Without the exclusion the dark box pollutes the top edge samples
        let without = analyze_background(&image, None, &ValidationPolicy::default());
        assert!(!without.is_white);
        assert!(without.samples > with_exclusion.samples);
    }

    #[test]
    fn grayscale_image_is_not_color() {
        let image = flat_image(100, 100, [128, 128, 128]);
        assert!(!scan_for_color(&image, &ValidationPolicy::default()));

        // Channel spread of exactly 10 still counts as grayscale
        let image = flat_image(100, 100, [120, 125, 130]);
        assert!(!scan_for_color(&image, &ValidationPolicy::default()));
    }

    #[test]
    fn color_image_is_detected() {
        let image = flat_image(100, 100, [200, 120, 80]);
        assert!(scan_for_color(&image, &ValidationPolicy::default()));
    }

    #[test]
    fn flat_image_has_zero_sharpness() {
        let image = flat_image(100, 100, [200, 200, 200]);
        let s = laplacian_sharpness(&image, &ValidationPolicy::default());
        assert_eq!(s, 0.0);
    }

    #[test]
    fn checkerboard_is_sharp() {
        let image = checker_image(100, 100, [0, 0, 0], [255, 255, 255]);
        let s = laplacian_sharpness(&image, &ValidationPolicy::default());
        assert!(s > 100.0, "checkerboard sharpness was {s}");
    }

    #[test]
    fn low_resolution_is_never_high_quality() {
        // Sharp but small: resolution gate wins regardless of sharpness
        let image = checker_image(400, 400, [0, 0, 0], [255, 255, 255]);
        let m = analyze_quality(&image, &ValidationPolicy::default());
        assert!(m.sharpness > 100.0);
        assert!(!m.is_high_quality);
    }

    #[test]
    fn sharp_large_image_is_high_quality() {
        let image = checker_image(600, 600, [0, 0, 0], [255, 255, 255]);
        let m = analyze_quality(&image, &ValidationPolicy::default());
        assert!(m.is_high_quality);
        assert_eq!((m.width, m.height), (600, 600));
    }

    #[test]
    fn oversized_raster_is_downscaled_for_sharpness() {
        let gray = GrayImage::new(3000, 1500);
        let bounded = bound_dimensions(gray, 1024);
        assert_eq!(bounded.width(), 1024);
        assert_eq!(bounded.height(), 512);
    }

    #[test]
    fn quality_reports_original_dimensions_after_downscale() {
        let image = checker_image(1600, 1600, [0, 0, 0], [255, 255, 255]);
        let m = analyze_quality(&image, &ValidationPolicy::default());
        assert_eq!((m.width, m.height), (1600, 1600));
    }
}
