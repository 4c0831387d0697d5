//! Browser binding: the page runs its own landmark/expression model (e.g.
//! face-api) and passes the detection output in alongside the raw image
//! bytes; the engine does the geometric, pixel, and scoring work and returns
//! the full validation report as a plain JS object.

use serde::Deserialize;
use wasm_bindgen::prelude::*;

use photocheck::{
    DetectedFace, DetectorError, FaceDetector, PhotoCheckError, PhotoValidator, RasterImage,
    ValidationPolicy,
};

/// Options object for `validate`. All fields optional.
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ValidateOptions {
    /// Threshold overrides; unspecified thresholds keep the policy defaults.
    pub policy: Option<ValidationPolicy>,
}

/// Detector fed from the caller's own detection results.
struct ProvidedFaces(Vec<DetectedFace>);

impl FaceDetector for ProvidedFaces {
    fn detect(&self, _image: &RasterImage) -> Result<Vec<DetectedFace>, DetectorError> {
        Ok(self.0.clone())
    }
}

/// Create a JS `Error` with a `code` property.
fn make_error(code: &str, message: &str) -> JsValue {
    let err = js_sys::Error::new(message);
    let _ = js_sys::Reflect::set(&err, &"code".into(), &JsValue::from_str(code));
    JsValue::from(err)
}

/// Convert a `PhotoCheckError` into a JS `Error` with a machine-readable `code`.
fn to_js_error(e: PhotoCheckError) -> JsValue {
    let code = match &e {
        PhotoCheckError::Decode(_) => "DECODE_ERROR",
        PhotoCheckError::ZeroDimensions => "ZERO_DIMENSIONS",
        PhotoCheckError::DetectorUnavailable => "DETECTOR_UNAVAILABLE",
        PhotoCheckError::ModelLoad(_) => "MODEL_LOAD_ERROR",
    };
    make_error(code, &e.to_string())
}

fn parse_options(options: JsValue) -> Result<ValidateOptions, JsValue> {
    if options.is_undefined() || options.is_null() {
        Ok(ValidateOptions::default())
    } else {
        serde_wasm_bindgen::from_value(options)
            .map_err(|e| make_error("INVALID_OPTIONS", &format!("invalid options: {e}")))
    }
}

fn parse_faces(faces: JsValue) -> Result<Vec<DetectedFace>, JsValue> {
    if faces.is_undefined() || faces.is_null() {
        return Ok(vec![]);
    }
    serde_wasm_bindgen::from_value(faces)
        .map_err(|e| make_error("INVALID_FACES", &format!("invalid face list: {e}")))
}

/// Validate a passport photo.
///
/// @param input - Raw image bytes (JPEG, PNG, or WebP)
/// @param faces - Detection output for this image: array of
///   `{ bounds, landmarks?, expressions? }` as produced by the page's face
///   model. An empty array means "no face detected".
/// @param options - Optional `{ policy }` with threshold overrides
/// @returns The validation report: `{ isValid, score, errors, warnings,
///   breakdown }`
#[wasm_bindgen]
pub fn validate(input: Vec<u8>, faces: JsValue, options: JsValue) -> Result<JsValue, JsValue> {
    let opts = parse_options(options)?;
    let faces = parse_faces(faces)?;

    let mut validator = PhotoValidator::new(input)
        .map_err(to_js_error)?
        .detector(Box::new(ProvidedFaces(faces)));
    if let Some(policy) = opts.policy {
        validator = validator.policy(policy);
    }

    let result = validator.validate().map_err(to_js_error)?;
    serde_wasm_bindgen::to_value(&result)
        .map_err(|e| make_error("SERIALIZE_ERROR", &e.to_string()))
}
