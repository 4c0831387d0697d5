//! Geometric analysis of a single detected face: framing, pose, eyes,
//! expression, and landmark visibility. Pure functions of the detection
//! output and the image dimensions — no pixel access.

use serde::{Deserialize, Serialize};

use crate::face_detector::{DetectedFace, FaceLandmarks, Landmark};
use crate::policy::ValidationPolicy;

/// Where the face sits relative to the image center.
///
/// The directional flags are independent signed comparisons against the
/// centering tolerance; `centered` is false whenever any of them is set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacePositionMetrics {
    pub centered: bool,
    pub too_high: bool,
    pub too_low: bool,
    pub too_left: bool,
    pub too_right: bool,
    /// Signed horizontal deviation of the face center, as a fraction of image
    /// width. Negative = left of center.
    pub horizontal_deviation: f64,
    /// Signed vertical deviation of the face center, as a fraction of image
    /// height. Negative = above center.
    pub vertical_deviation: f64,
}

/// Face area relative to the image.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceSizeMetrics {
    /// face area / image area.
    pub area_ratio: f64,
    pub too_small: bool,
    pub too_large: bool,
}

impl FaceSizeMetrics {
    pub fn appropriate(&self) -> bool {
        !self.too_small && !self.too_large
    }
}

/// Head tilt derived from the eye-centroid line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadPoseMetrics {
    /// Angle of the inter-eye line relative to horizontal, in degrees.
    pub tilt_degrees: f64,
    pub facing_camera: bool,
}

/// Eye detection and openness.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EyeMetrics {
    /// Whether eye landmarks were available at all.
    pub detected: bool,
    /// Both eyes open (aspect ratio at or above the policy minimum).
    pub open: bool,
    pub right_aspect_ratio: f64,
    pub left_aspect_ratio: f64,
}

/// Expression classification from the detector's probability vector.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpressionMetrics {
    pub neutral: bool,
    /// Independent of `neutral` — both can hold at once, which demotes the
    /// finding to a warning.
    pub smiling: bool,
    pub neutral_score: f64,
    pub happy_score: f64,
}

/// Heuristic visibility of facial regions relative to the bounding box.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LandmarkVisibility {
    pub chin: bool,
    pub eyebrows: bool,
    pub forehead: bool,
    pub ears: bool,
}

/// Full geometric report for one face.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceGeometry {
    pub position: FacePositionMetrics,
    pub size: FaceSizeMetrics,
    pub head_pose: HeadPoseMetrics,
    pub eyes: EyeMetrics,
    pub expression: ExpressionMetrics,
    pub visibility: LandmarkVisibility,
}

/// Analyze one detected face against the image dimensions.
///
/// Missing landmarks degrade rather than fail: pose, eye, and visibility
/// fields default to false and the scorer reports the eyes as undetected.
pub(crate) fn analyze_face(
    face: &DetectedFace,
    image_width: u32,
    image_height: u32,
    policy: &ValidationPolicy,
) -> FaceGeometry {
    let position = face_position(face, image_width, image_height, policy);
    let size = face_size(face, image_width, image_height, policy);
    let expression = expression(face, policy);

    let (head_pose, eyes, visibility) = match &face.landmarks {
        Some(landmarks) => (
            head_pose(landmarks, policy),
            eye_metrics(landmarks, policy),
            visibility(landmarks, face, policy),
        ),
        None => Default::default(),
    };

    FaceGeometry {
        position,
        size,
        head_pose,
        eyes,
        expression,
        visibility,
    }
}

fn face_position(
    face: &DetectedFace,
    image_width: u32,
    image_height: u32,
    policy: &ValidationPolicy,
) -> FacePositionMetrics {
    let (cx, cy) = face.bounds.center();
    let horizontal_deviation = (cx - image_width as f64 / 2.0) / image_width as f64;
    let vertical_deviation = (cy - image_height as f64 / 2.0) / image_height as f64;

    let tolerance = policy.centering_tolerance;
    FacePositionMetrics {
        centered: horizontal_deviation.abs() < tolerance && vertical_deviation.abs() < tolerance,
        too_high: vertical_deviation < -tolerance,
        too_low: vertical_deviation > tolerance,
        too_left: horizontal_deviation < -tolerance,
        too_right: horizontal_deviation > tolerance,
        horizontal_deviation,
        vertical_deviation,
    }
}

fn face_size(
    face: &DetectedFace,
    image_width: u32,
    image_height: u32,
    policy: &ValidationPolicy,
) -> FaceSizeMetrics {
    let image_area = image_width as f64 * image_height as f64;
    let area_ratio = face.bounds.area() / image_area;
    FaceSizeMetrics {
        area_ratio,
        too_small: area_ratio < policy.min_face_ratio,
        too_large: area_ratio > policy.max_face_ratio,
    }
}

fn expression(face: &DetectedFace, policy: &ValidationPolicy) -> ExpressionMetrics {
    let neutral_score = face.expressions.neutral;
    let happy_score = face.expressions.happy;
    ExpressionMetrics {
        neutral: neutral_score > policy.neutral_threshold,
        smiling: happy_score > policy.smile_threshold,
        neutral_score,
        happy_score,
    }
}

fn centroid(points: &[Landmark]) -> Landmark {
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Landmark::new(sx / n, sy / n)
}

fn head_pose(landmarks: &FaceLandmarks, policy: &ValidationPolicy) -> HeadPoseMetrics {
    let right = centroid(landmarks.right_eye());
    let left = centroid(landmarks.left_eye());
    let tilt_degrees = (left.y - right.y).atan2(left.x - right.x).to_degrees();
    HeadPoseMetrics {
        tilt_degrees,
        facing_camera: tilt_degrees.abs() < policy.max_tilt_degrees,
    }
}

/// Eye aspect ratio over a 6-point eye contour: mean vertical opening divided
/// by the horizontal extent. Drops toward zero as the eyelid closes.
fn eye_aspect_ratio(eye: &[Landmark]) -> f64 {
    let horizontal = eye[0].distance(&eye[3]);
    if horizontal == 0.0 {
        return 0.0;
    }
    let vertical = eye[1].distance(&eye[5]) + eye[2].distance(&eye[4]);
    vertical / (2.0 * horizontal)
}

fn eye_metrics(landmarks: &FaceLandmarks, policy: &ValidationPolicy) -> EyeMetrics {
    let right_aspect_ratio = eye_aspect_ratio(landmarks.right_eye());
    let left_aspect_ratio = eye_aspect_ratio(landmarks.left_eye());
    EyeMetrics {
        detected: true,
        open: right_aspect_ratio >= policy.min_eye_aspect_ratio
            && left_aspect_ratio >= policy.min_eye_aspect_ratio,
        right_aspect_ratio,
        left_aspect_ratio,
    }
}

fn visibility(
    landmarks: &FaceLandmarks,
    face: &DetectedFace,
    policy: &ValidationPolicy,
) -> LandmarkVisibility {
    let bounds = &face.bounds;

    // Chin: the jaw's lowest point must extend past chin_extent of face height.
    let jaw_bottom = landmarks
        .jaw()
        .iter()
        .map(|p| p.y)
        .fold(f64::NEG_INFINITY, f64::max);
    let chin = jaw_bottom >= bounds.y + policy.chin_extent * bounds.height;

    // Eyebrows: brow centroid sits above the eye centroid.
    let brows: Vec<Landmark> = landmarks
        .right_brow()
        .iter()
        .chain(landmarks.left_brow())
        .copied()
        .collect();
    let brow_centroid = centroid(&brows);
    let eyes: Vec<Landmark> = landmarks
        .right_eye()
        .iter()
        .chain(landmarks.left_eye())
        .copied()
        .collect();
    let eye_centroid = centroid(&eyes);
    let eyebrows = brow_centroid.y < eye_centroid.y;

    // Forehead: headroom between the box top and the topmost brow point.
    let brow_top = brows.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    let forehead = brow_top >= bounds.y + policy.forehead_margin * bounds.height;

    // Ears: the jaw outline spans nearly the full box width.
    let jaw_left = landmarks.jaw().iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
    let jaw_right = landmarks
        .jaw()
        .iter()
        .map(|p| p.x)
        .fold(f64::NEG_INFINITY, f64::max);
    let ears = (jaw_right - jaw_left) >= policy.ear_span * bounds.width;

    LandmarkVisibility {
        chin,
        eyebrows,
        forehead,
        ears,
    }
}
