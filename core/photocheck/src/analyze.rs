//! The validation pipeline: decode → detect → analyze → score.

use tracing::{debug, warn};

use crate::error::PhotoCheckError;
use crate::face_detector::FaceDetector;
use crate::policy::ValidationPolicy;
use crate::raster::RasterImage;
use crate::{geometry, pixels, report, ValidationResult};

/// Full pipeline from raw bytes. Only an undecodable input is a Rust error;
/// every validation finding lands inside the returned result.
pub(crate) fn validate_pipeline(
    input: &[u8],
    detector: &dyn FaceDetector,
    policy: &ValidationPolicy,
) -> Result<ValidationResult, PhotoCheckError> {
    let image = RasterImage::from_bytes(input)?;
    Ok(validate_image(&image, detector, policy))
}

/// Validate an already-decoded raster.
///
/// Pure function of its inputs: the same image, detector output, and policy
/// always produce the same `ValidationResult`. Detector failures are folded
/// into a synthetic "failed to analyze" result rather than propagated.
pub fn validate_image(
    image: &RasterImage,
    detector: &dyn FaceDetector,
    policy: &ValidationPolicy,
) -> ValidationResult {
    let faces = match detector.detect(image) {
        Ok(faces) => faces,
        Err(e) => {
            warn!(error = %e, "face detector failed");
            return report::analysis_failed();
        }
    };
    debug!(count = faces.len(), "faces detected");

    // Zero or multiple faces end validation before any further analysis.
    let face = match faces.as_slice() {
        [] => return report::no_face(),
        [face] => face,
        many => return report::multiple_faces(many.len()),
    };

    let geometry = geometry::analyze_face(face, image.width(), image.height(), policy);
    let background = pixels::analyze_background(image, Some(&face.bounds), policy);
    let quality = pixels::analyze_quality(image, policy);

    report::build(geometry, background, quality)
}
