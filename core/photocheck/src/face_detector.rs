use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::raster::RasterImage;

/// Bounding box of a detected face within an image.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceBounds {
    /// X coordinate of the top-left corner (pixels).
    pub x: f64,
    /// Y coordinate of the top-left corner (pixels).
    pub y: f64,
    /// Width of the bounding box (pixels).
    pub width: f64,
    /// Height of the bounding box (pixels).
    pub height: f64,
    /// Detection confidence score.
    pub confidence: f64,
}

impl FaceBounds {
    /// Center of the bounding box.
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Area of the bounding box in square pixels.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Whether the pixel coordinate lies inside the box.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

/// A single facial keypoint in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
}

impl Landmark {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another landmark.
    pub fn distance(&self, other: &Landmark) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// The standard 68-point facial landmark topology.
///
/// Points are ordered by the usual dlib/face-api convention:
/// jaw 0–16, right brow 17–21, left brow 22–26, nose 27–35,
/// right eye 36–41, left eye 42–47, mouth 48–67.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct FaceLandmarks {
    points: Vec<Landmark>,
}

// Hand-written so deserialization enforces the 68-point topology the group
// accessors rely on.
impl<'de> serde::Deserialize<'de> for FaceLandmarks {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let points = Vec::<Landmark>::deserialize(deserializer)?;
        FaceLandmarks::new(points)
            .ok_or_else(|| serde::de::Error::custom("landmark list must contain exactly 68 points"))
    }
}

impl FaceLandmarks {
    /// Number of points in the fixed topology.
    pub const POINT_COUNT: usize = 68;

    /// Build from an ordered 68-point list. Returns `None` for any other length —
    /// partial landmark sets are represented as an absent `FaceLandmarks`, not a
    /// truncated one.
    pub fn new(points: Vec<Landmark>) -> Option<Self> {
        (points.len() == Self::POINT_COUNT).then_some(Self { points })
    }

    pub fn points(&self) -> &[Landmark] {
        &self.points
    }

    /// Jawline outline, ear to ear through the chin.
    pub fn jaw(&self) -> &[Landmark] {
        &self.points[0..17]
    }

    pub fn right_brow(&self) -> &[Landmark] {
        &self.points[17..22]
    }

    pub fn left_brow(&self) -> &[Landmark] {
        &self.points[22..27]
    }

    pub fn nose(&self) -> &[Landmark] {
        &self.points[27..36]
    }

    pub fn right_eye(&self) -> &[Landmark] {
        &self.points[36..42]
    }

    pub fn left_eye(&self) -> &[Landmark] {
        &self.points[42..48]
    }

    pub fn mouth(&self) -> &[Landmark] {
        &self.points[48..68]
    }
}

/// Expression probabilities as reported by the detector.
///
/// Each score is in [0, 1]; scores need not sum to 1. Detectors without an
/// expression head leave the default (all zero).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExpressionScores {
    pub neutral: f64,
    pub happy: f64,
    pub surprised: f64,
    pub angry: f64,
    pub sad: f64,
}

/// One face found by a detector backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedFace {
    /// Axis-aligned bounding box in pixel coordinates.
    pub bounds: FaceBounds,
    /// 68-point landmark set, when the backend provides one.
    #[serde(default)]
    pub landmarks: Option<FaceLandmarks>,
    /// Expression probabilities (all zero when the backend has none).
    #[serde(default)]
    pub expressions: ExpressionScores,
}

/// Failure inside a detector backend. Surfaced to callers as a synthetic
/// "failed to analyze photo" validation error, never as a panic.
#[derive(Debug, Error)]
#[error("face detection failed: {0}")]
pub struct DetectorError(pub String);

/// Pluggable face detection backend.
///
/// Implement this trait to plug in any detection engine (ONNX, dlib,
/// browser-side face-api output, etc.) and pass it to
/// [`crate::PhotoValidator::detector`]. Backends may be invoked concurrently
/// from independent validation calls; each call owns its own image.
pub trait FaceDetector: Send + Sync {
    /// Detect all faces in the image. An empty list means "no face found";
    /// it is not an error.
    fn detect(&self, image: &RasterImage) -> Result<Vec<DetectedFace>, DetectorError>;
}
