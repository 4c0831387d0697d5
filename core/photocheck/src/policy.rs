use serde::{Deserialize, Serialize};

/// All pass/fail thresholds of the validation policy in one place.
///
/// The defaults are the published policy; changing any of them changes
/// pass/fail outcomes for real submissions and is a versioned policy change,
/// not a tuning knob.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValidationPolicy {
    /// Maximum per-axis deviation of the face center from the image center,
    /// as a fraction of the image dimension.
    pub centering_tolerance: f64,

    /// Face-area / image-area ratio below which the face is too small.
    pub min_face_ratio: f64,

    /// Face-area / image-area ratio above which the face is too large.
    pub max_face_ratio: f64,

    /// Maximum head tilt (degrees) still counted as facing the camera.
    pub max_tilt_degrees: f64,

    /// Minimum eye aspect ratio for both eyes to count as open.
    pub min_eye_aspect_ratio: f64,

    /// Neutral-expression score above which the expression is neutral.
    pub neutral_threshold: f64,

    /// Happy-expression score above which the subject counts as smiling.
    pub smile_threshold: f64,

    /// Jaw's lowest point must extend past this fraction of face-box height
    /// for the chin to count as visible.
    pub chin_extent: f64,

    /// Minimum headroom above the brows, as a fraction of face-box height,
    /// for the forehead to count as visible.
    pub forehead_margin: f64,

    /// Minimum jaw span, as a fraction of face-box width, for the ears to
    /// count as visible.
    pub ear_span: f64,

    /// Every background channel mean must exceed this for a white background.
    pub white_channel_min: u8,

    /// Any background channel variance above this marks a complex background.
    pub max_background_variance: f64,

    /// Two channels of a sampled pixel must differ by more than this for the
    /// image to count as color.
    pub color_channel_delta: u8,

    /// Minimum width and height for a high-quality photo.
    pub min_resolution: (u32, u32),

    /// Minimum Laplacian-variance sharpness for a high-quality photo.
    pub min_sharpness: f64,

    /// Number of evenly spaced background samples taken along each image edge
    /// (in addition to the four corners).
    pub edge_samples_per_side: u32,

    /// Grayscale rasters larger than this are downscaled before the sharpness
    /// filter, bounding the per-pixel cost on oversized uploads.
    pub max_analysis_dimension: u32,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            centering_tolerance: 0.10,
            min_face_ratio: 0.15,
            max_face_ratio: 0.50,
            max_tilt_degrees: 15.0,
            min_eye_aspect_ratio: 0.20,
            neutral_threshold: 0.70,
            smile_threshold: 0.30,
            chin_extent: 0.80,
            forehead_margin: 0.15,
            ear_span: 0.90,
            white_channel_min: 220,
            max_background_variance: 500.0,
            color_channel_delta: 10,
            min_resolution: (600, 600),
            min_sharpness: 100.0,
            edge_samples_per_side: 8,
            max_analysis_dimension: 1024,
        }
    }
}
