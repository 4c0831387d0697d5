use thiserror::Error;

#[derive(Debug, Error)]
pub enum PhotoCheckError {
    #[error("failed to decode image: {0}")]
    Decode(String),

    #[error("image dimensions are zero")]
    ZeroDimensions,

    #[error("no face detector configured (supply one with PhotoValidator::detector)")]
    DetectorUnavailable,

    #[error("failed to load face detection model: {0}")]
    ModelLoad(String),
}
