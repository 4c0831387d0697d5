//! Passport/ID photo validation: decide whether an uploaded image meets
//! passport-photo standards (single centered face, neutral expression,
//! correct framing, white background, sufficient quality) and produce a
//! graded, explainable report.
//!
//! # Example
//!
//! ```no_run
//! use photocheck::{
//!     DetectedFace, DetectorError, FaceDetector, PhotoValidator, RasterImage,
//! };
//!
//! struct MyDetector;
//! impl FaceDetector for MyDetector {
//!     fn detect(&self, _image: &RasterImage) -> Result<Vec<DetectedFace>, DetectorError> {
//!         // Your detection backend here
//!         Ok(vec![])
//!     }
//! }
//!
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! let report = PhotoValidator::new(bytes)
//!     .unwrap()
//!     .detector(Box::new(MyDetector))
//!     .validate()
//!     .unwrap();
//! println!("score {}, valid: {}", report.score, report.is_valid);
//! for finding in &report.errors {
//!     println!("  error: {finding}");
//! }
//! ```
#![warn(missing_docs)]

mod analyze;
mod error;
/// Face detection traits and data types.
pub mod face_detector;
/// Geometric analysis of a detected face (framing, pose, eyes, expression).
pub mod geometry;
/// Pixel-level analysis (background, color, sharpness).
pub mod pixels;
mod policy;
mod raster;
/// Scoring policy, finding messages, and score constants.
pub mod report;
#[cfg(feature = "rustface")]
/// Built-in SeetaFace-based face detector backend.
pub mod rustface_backend;
#[cfg(test)]
pub(crate) mod test_fixtures;

use serde::{Deserialize, Serialize};

/// Validate a decoded raster directly (useful when the caller already holds
/// pixels, and for tests with synthetic detector fixtures).
pub use analyze::validate_image;
/// Error type returned by photocheck operations.
pub use error::PhotoCheckError;
/// Face detection trait and its data types.
pub use face_detector::{
    DetectedFace, DetectorError, ExpressionScores, FaceBounds, FaceDetector, FaceLandmarks,
    Landmark,
};
/// All validation thresholds in one auditable structure.
pub use policy::ValidationPolicy;
/// Decoded image buffer handed to detectors and analyzers.
pub use raster::RasterImage;
/// Finding message constants and the passing-score cutoff.
pub use report::{messages, PASSING_SCORE};
#[cfg(feature = "rustface")]
/// Built-in detector backed by a SeetaFace model file.
pub use rustface_backend::RustfaceDetector;

use geometry::FaceGeometry;
use pixels::{BackgroundMetrics, ImageQualityMetrics};

/// The terminal, immutable output of one validation call.
///
/// Invariant: `is_valid == (errors.is_empty() && score >= PASSING_SCORE)`.
/// Warnings are advisory and never affect score or validity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// Whether the photo passes: no errors and a score of at least 70.
    pub is_valid: bool,
    /// Deterministic additive score, 0–100.
    pub score: u8,
    /// Blocking findings, in check order.
    pub errors: Vec<String>,
    /// Advisory findings, in check order.
    pub warnings: Vec<String>,
    /// Every metric that was computed for this photo.
    pub breakdown: MetricsBreakdown,
}

/// Full metric breakdown attached to a [`ValidationResult`].
///
/// The per-face and pixel metrics are `None` when validation ended before
/// they were computed (no face, multiple faces, detector failure).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsBreakdown {
    /// Number of faces the detector reported.
    pub face_count: usize,
    /// Geometric metrics for the single detected face.
    pub geometry: Option<FaceGeometry>,
    /// Background color and uniformity metrics.
    pub background: Option<BackgroundMetrics>,
    /// Resolution, color, and sharpness metrics.
    pub quality: Option<ImageQualityMetrics>,
}

/// Builder for validating a passport photo from raw image bytes.
///
/// Decodability is checked on construction; detection and analysis run on
/// [`PhotoValidator::validate`]. Each call is an independent, stateless
/// pipeline — a failed validation requires a new submission, not a retry.
pub struct PhotoValidator {
    input: Vec<u8>,
    policy: ValidationPolicy,
    detector: Option<Box<dyn FaceDetector>>,
}

impl PhotoValidator {
    /// Create a validator from raw image bytes (JPEG, PNG, or WebP).
    pub fn new(input: Vec<u8>) -> Result<Self, PhotoCheckError> {
        // Validate that the input looks like a decodable image
        image::guess_format(&input).map_err(|e| PhotoCheckError::Decode(e.to_string()))?;

        Ok(Self {
            input,
            policy: ValidationPolicy::default(),
            detector: None,
        })
    }

    /// Override the default validation policy.
    pub fn policy(mut self, policy: ValidationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Supply the face detection backend.
    ///
    /// Required: validation fails with [`PhotoCheckError::DetectorUnavailable`]
    /// if no detector was configured. With the `rustface` feature, a
    /// [`RustfaceDetector`] loaded from a model path can be passed here.
    pub fn detector(mut self, detector: Box<dyn FaceDetector>) -> Self {
        self.detector = Some(detector);
        self
    }

    /// Run the validation pipeline.
    ///
    /// Returns `Err` only for undecodable input or a missing detector; every
    /// validation finding — including detector failures — is reported inside
    /// the returned [`ValidationResult`].
    pub fn validate(self) -> Result<ValidationResult, PhotoCheckError> {
        let detector = self
            .detector
            .as_deref()
            .ok_or(PhotoCheckError::DetectorUnavailable)?;
        analyze::validate_pipeline(&self.input, detector, &self.policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::png::PngEncoder;
    use image::{ImageEncoder, Rgb, RgbImage};
    use test_fixtures::compliant_face;

    fn make_test_png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));
        let mut buffer = Vec::new();
        PngEncoder::new(&mut buffer)
            .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
            .unwrap();
        buffer
    }

    struct StaticDetector(Vec<DetectedFace>);

    impl FaceDetector for StaticDetector {
        fn detect(&self, _image: &RasterImage) -> Result<Vec<DetectedFace>, DetectorError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn builder_rejects_garbage_input() {
        let result = PhotoValidator::new(b"not an image".to_vec());
        assert!(matches!(result, Err(PhotoCheckError::Decode(_))));
    }

    #[test]
    fn builder_requires_a_detector() {
        let png = make_test_png(100, 100);
        let err = PhotoValidator::new(png).unwrap().validate().unwrap_err();
        assert!(matches!(err, PhotoCheckError::DetectorUnavailable));
    }

    #[test]
    fn builder_runs_full_pipeline() {
        let png = make_test_png(800, 800);
        let face = compliant_face(FaceBounds {
            x: 181.0,
            y: 181.0,
            width: 438.0,
            height: 438.0,
            confidence: 1.0,
        });
        let report = PhotoValidator::new(png)
            .unwrap()
            .detector(Box::new(StaticDetector(vec![face])))
            .validate()
            .unwrap();
        assert_eq!(report.breakdown.face_count, 1);
        // Flat white image: not color and zero sharpness, so those checks fail
        assert!(report.errors.contains(&messages::NOT_COLOR.to_owned()));
        assert!(report.errors.contains(&messages::LOW_QUALITY.to_owned()));
        // Everything face-related passes
        assert_eq!(report.score, 80);
    }

    #[test]
    fn custom_policy_is_honored() {
        let png = make_test_png(800, 800);
        // Face at 10% of area: too small by default policy
        let face = compliant_face(FaceBounds {
            x: 274.0,
            y: 274.0,
            width: 253.0,
            height: 253.0,
            confidence: 1.0,
        });
        let policy = ValidationPolicy {
            min_face_ratio: 0.05,
            ..Default::default()
        };
        let report = PhotoValidator::new(png)
            .unwrap()
            .policy(policy)
            .detector(Box::new(StaticDetector(vec![face])))
            .validate()
            .unwrap();
        assert!(!report.errors.contains(&messages::FACE_TOO_SMALL.to_owned()));
    }

    #[test]
    fn result_serializes_in_camel_case() {
        let r = report::no_face();
        let json = serde_json::to_string(&r).unwrap();
        assert!(json.contains("\"isValid\":false"));
        assert!(json.contains("\"faceCount\":0"));
        assert!(!json.contains("is_valid"));
    }
}
