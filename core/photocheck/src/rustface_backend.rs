use std::path::Path;
use std::sync::OnceLock;

use crate::error::PhotoCheckError;
use crate::face_detector::{
    DetectedFace, DetectorError, ExpressionScores, FaceBounds, FaceDetector,
};
use crate::raster::RasterImage;

/// The parsed model is process-wide: lazy, idempotent initialization so
/// concurrent first constructions never keep duplicate copies.
static SHARED_MODEL: OnceLock<rustface::Model> = OnceLock::new();

/// Face detector backed by the `rustface` crate (SeetaFace engine).
///
/// This backend yields bounding boxes and confidence only — no landmarks and
/// no expression scores — so pose, eye, and expression checks degrade as
/// documented on [`crate::geometry`]. Plug in a richer [`FaceDetector`] for
/// full scoring.
pub struct RustfaceDetector {
    model: rustface::Model,
}

impl RustfaceDetector {
    /// Load the SeetaFace frontal model from `path`.
    ///
    /// The model file is parsed once per process; later constructions reuse
    /// the shared parse regardless of the path they pass.
    pub fn from_model_path(path: impl AsRef<Path>) -> Result<Self, PhotoCheckError> {
        if let Some(model) = SHARED_MODEL.get() {
            return Ok(Self {
                model: model.clone(),
            });
        }

        let bytes = std::fs::read(path.as_ref())
            .map_err(|e| PhotoCheckError::ModelLoad(e.to_string()))?;
        let model = rustface::read_model(std::io::Cursor::new(bytes))
            .map_err(|e| PhotoCheckError::ModelLoad(e.to_string()))?;

        // Concurrent first calls may parse in parallel; one parse wins and
        // every detector clones from it.
        let model = SHARED_MODEL.get_or_init(|| model);
        Ok(Self {
            model: model.clone(),
        })
    }
}

impl FaceDetector for RustfaceDetector {
    fn detect(&self, image: &RasterImage) -> Result<Vec<DetectedFace>, DetectorError> {
        let gray = image.to_luma();

        let mut detector = rustface::create_detector_with_model(self.model.clone());
        detector.set_min_face_size(20);
        detector.set_score_thresh(2.0);
        detector.set_pyramid_scale_factor(0.8);
        detector.set_slide_window_step(4, 4);

        let faces = detector.detect(&rustface::ImageData::new(
            gray.as_raw(),
            gray.width(),
            gray.height(),
        ));

        Ok(faces
            .iter()
            .map(|face| {
                let bbox = face.bbox();
                DetectedFace {
                    bounds: FaceBounds {
                        x: bbox.x() as f64,
                        y: bbox.y() as f64,
                        width: bbox.width() as f64,
                        height: bbox.height() as f64,
                        confidence: face.score(),
                    },
                    landmarks: None,
                    expressions: ExpressionScores::default(),
                }
            })
            .collect())
    }
}
