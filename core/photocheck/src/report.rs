//! Scoring and decision policy: folds the derived metrics into a
//! `ValidationResult`. Operates only on already-derived booleans — no pixel
//! or landmark access happens here.

use crate::geometry::FaceGeometry;
use crate::pixels::{BackgroundMetrics, ImageQualityMetrics};
use crate::{MetricsBreakdown, ValidationResult};

/// User-facing finding strings. These are a contract with the consuming UI
/// and with the integration tests — rewording one is a breaking change.
pub mod messages {
    // Blocking errors
    pub const NO_FACE: &str = "No face detected. Please upload a clear photo of your face.";
    pub const MULTIPLE_FACES: &str =
        "Multiple faces detected. Please upload a photo of yourself only.";
    pub const NOT_CENTERED: &str = "Face is not centered in the frame.";
    pub const FACE_TOO_SMALL: &str = "Face is too small. Please move closer to the camera.";
    pub const FACE_TOO_LARGE: &str = "Face is too large. Please move further from the camera.";
    pub const NOT_FACING_CAMERA: &str = "Head is tilted. Please face the camera directly.";
    pub const EYES_NOT_DETECTED: &str =
        "Eyes not clearly detected. Please look straight at the camera.";
    pub const EYES_CLOSED: &str = "Eyes appear to be closed. Please keep both eyes open.";
    pub const BACKGROUND_NOT_WHITE: &str =
        "Background is not white. Please use a plain white background.";
    pub const LOW_QUALITY: &str = "Image resolution or sharpness is too low.";
    pub const NOT_COLOR: &str = "Photo must be in color.";
    pub const ANALYSIS_FAILED: &str = "Failed to analyze photo. Please try a different image.";

    // Advisory warnings
    pub const SMILING: &str = "Smiling detected. A neutral expression is recommended.";
    pub const NOT_NEUTRAL: &str = "Expression does not appear neutral.";
    pub const COMPLEX_BACKGROUND: &str = "Background appears cluttered.";
    pub const CHIN_NOT_VISIBLE: &str = "Chin may not be fully visible.";
    pub const EYEBROWS_NOT_VISIBLE: &str = "Eyebrows may not be fully visible.";
    pub const FOREHEAD_NOT_VISIBLE: &str = "Forehead may not be fully visible.";
    pub const EARS_NOT_VISIBLE: &str = "Ears may not be fully visible.";
}

/// Additive score weights. They sum to 100 when every check passes.
mod weights {
    pub const SINGLE_FACE: u8 = 20;
    pub const CENTERED: u8 = 10;
    pub const SIZE_APPROPRIATE: u8 = 10;
    pub const EYES_OPEN: u8 = 10;
    pub const FACING_CAMERA: u8 = 10;
    pub const NEUTRAL_EXPRESSION: u8 = 10;
    pub const HIGH_QUALITY: u8 = 10;
    pub const COLOR: u8 = 10;
    pub const WHITE_BACKGROUND: u8 = 10;
}

/// Minimum score a submission must reach, in addition to having no errors.
pub const PASSING_SCORE: u8 = 70;

/// Build the result for the single-face path: score the boolean vector and
/// collect the finding strings.
pub(crate) fn build(
    geometry: FaceGeometry,
    background: BackgroundMetrics,
    quality: ImageQualityMetrics,
) -> ValidationResult {
    let mut score = 0u8;
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    // Exactly one face reached this path.
    score += weights::SINGLE_FACE;

    if geometry.position.centered {
        score += weights::CENTERED;
    } else {
        errors.push(messages::NOT_CENTERED.to_owned());
    }

    if geometry.size.appropriate() {
        score += weights::SIZE_APPROPRIATE;
    } else if geometry.size.too_small {
        errors.push(messages::FACE_TOO_SMALL.to_owned());
    } else {
        errors.push(messages::FACE_TOO_LARGE.to_owned());
    }

    if geometry.eyes.detected && geometry.eyes.open {
        score += weights::EYES_OPEN;
    } else if !geometry.eyes.detected {
        errors.push(messages::EYES_NOT_DETECTED.to_owned());
    } else {
        errors.push(messages::EYES_CLOSED.to_owned());
    }

    if geometry.head_pose.facing_camera {
        score += weights::FACING_CAMERA;
    } else {
        errors.push(messages::NOT_FACING_CAMERA.to_owned());
    }

    if geometry.expression.neutral {
        score += weights::NEUTRAL_EXPRESSION;
    } else {
        warnings.push(messages::NOT_NEUTRAL.to_owned());
    }
    if geometry.expression.smiling {
        warnings.push(messages::SMILING.to_owned());
    }

    if quality.is_high_quality {
        score += weights::HIGH_QUALITY;
    } else {
        errors.push(messages::LOW_QUALITY.to_owned());
    }

    if quality.is_color {
        score += weights::COLOR;
    } else {
        errors.push(messages::NOT_COLOR.to_owned());
    }

    if background.is_white {
        score += weights::WHITE_BACKGROUND;
    } else {
        errors.push(messages::BACKGROUND_NOT_WHITE.to_owned());
    }
    if background.complex {
        warnings.push(messages::COMPLEX_BACKGROUND.to_owned());
    }

    // Low landmark visibility is advisory only. Suppressed entirely when the
    // landmarks themselves were missing — the eyes error already covers that.
    if geometry.eyes.detected {
        if !geometry.visibility.chin {
            warnings.push(messages::CHIN_NOT_VISIBLE.to_owned());
        }
        if !geometry.visibility.eyebrows {
            warnings.push(messages::EYEBROWS_NOT_VISIBLE.to_owned());
        }
        if !geometry.visibility.forehead {
            warnings.push(messages::FOREHEAD_NOT_VISIBLE.to_owned());
        }
        if !geometry.visibility.ears {
            warnings.push(messages::EARS_NOT_VISIBLE.to_owned());
        }
    }

    ValidationResult {
        is_valid: errors.is_empty() && score >= PASSING_SCORE,
        score,
        errors,
        warnings,
        breakdown: MetricsBreakdown {
            face_count: 1,
            geometry: Some(geometry),
            background: Some(background),
            quality: Some(quality),
        },
    }
}

/// No face found: one error, score 0, nothing else populated.
pub(crate) fn no_face() -> ValidationResult {
    fatal(0, messages::NO_FACE)
}

/// More than one face: one error, score 0, analysis skipped.
pub(crate) fn multiple_faces(count: usize) -> ValidationResult {
    fatal(count, messages::MULTIPLE_FACES)
}

/// Detector failure: surfaced as a single synthetic error, never a panic.
pub(crate) fn analysis_failed() -> ValidationResult {
    fatal(0, messages::ANALYSIS_FAILED)
}

fn fatal(face_count: usize, message: &str) -> ValidationResult {
    ValidationResult {
        is_valid: false,
        score: 0,
        errors: vec![message.to_owned()],
        warnings: Vec::new(),
        breakdown: MetricsBreakdown {
            face_count,
            geometry: None,
            background: None,
            quality: None,
        },
    }
}
