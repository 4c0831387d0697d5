//! Synthetic faces for unit tests: a parametric 68-point landmark layout
//! placed inside a given bounding box.

use crate::face_detector::{
    DetectedFace, ExpressionScores, FaceBounds, FaceLandmarks, Landmark,
};

/// A face with bounds only — no landmarks, zero expression scores.
pub(crate) fn face_with_bounds(bounds: FaceBounds) -> DetectedFace {
    DetectedFace {
        bounds,
        landmarks: None,
        expressions: ExpressionScores::default(),
    }
}

/// A plausible frontal 68-point layout for the given box: level open eyes,
/// brows above them with headroom, jaw spanning the full width with the chin
/// near the bottom.
pub(crate) fn synthetic_landmarks(bounds: &FaceBounds) -> FaceLandmarks {
    let (bx, by, w, h) = (bounds.x, bounds.y, bounds.width, bounds.height);
    let mut points = Vec::with_capacity(FaceLandmarks::POINT_COUNT);

    // Jaw 0-16: full-width arc dipping to 90% of face height at the chin
    for i in 0..17 {
        let t = i as f64 / 16.0;
        let x = bx + t * w;
        let y = by + h * (0.55 + 0.35 * (std::f64::consts::PI * t).sin());
        points.push(Landmark::new(x, y));
    }
    // Right brow 17-21 and left brow 22-26 at 25% height
    for i in 0..5 {
        points.push(Landmark::new(bx + w * (0.20 + 0.05 * i as f64), by + h * 0.25));
    }
    for i in 0..5 {
        points.push(Landmark::new(bx + w * (0.60 + 0.05 * i as f64), by + h * 0.25));
    }
    // Nose 27-35 down the center line
    for i in 0..9 {
        points.push(Landmark::new(bx + w * 0.5, by + h * (0.35 + 0.025 * i as f64)));
    }
    // Eyes 36-41 / 42-47: open hexagons at 35% height
    points.extend(eye_hexagon(bx + w * 0.30, by + h * 0.35, w * 0.12, h * 0.05));
    points.extend(eye_hexagon(bx + w * 0.70, by + h * 0.35, w * 0.12, h * 0.05));
    // Mouth 48-67: ellipse around (50%, 72%)
    for i in 0..20 {
        let angle = i as f64 / 20.0 * std::f64::consts::TAU;
        points.push(Landmark::new(
            bx + w * 0.5 + w * 0.15 * angle.cos(),
            by + h * 0.72 + h * 0.05 * angle.sin(),
        ));
    }

    FaceLandmarks::new(points).expect("fixture produces exactly 68 points")
}

fn eye_hexagon(cx: f64, cy: f64, width: f64, height: f64) -> Vec<Landmark> {
    vec![
        Landmark::new(cx - width / 2.0, cy),
        Landmark::new(cx - width / 4.0, cy - height / 2.0),
        Landmark::new(cx + width / 4.0, cy - height / 2.0),
        Landmark::new(cx + width / 2.0, cy),
        Landmark::new(cx + width / 4.0, cy + height / 2.0),
        Landmark::new(cx - width / 4.0, cy + height / 2.0),
    ]
}

/// A fully compliant synthetic face: centered landmarks, neutral expression.
pub(crate) fn compliant_face(bounds: FaceBounds) -> DetectedFace {
    let landmarks = synthetic_landmarks(&bounds);
    DetectedFace {
        bounds,
        landmarks: Some(landmarks),
        expressions: ExpressionScores {
            neutral: 0.9,
            happy: 0.05,
            ..Default::default()
        },
    }
}
