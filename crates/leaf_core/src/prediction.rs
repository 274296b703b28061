use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_FILE_NAME: &str = "photo.jpg";

/// Local reference to a picked image file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    path: PathBuf,
}

impl ImageRef {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name used for the multipart part.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| DEFAULT_FILE_NAME.to_string())
    }

    /// Lower-cased extension, if any.
    pub fn extension(&self) -> Option<String> {
        self.path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
    }

    /// MIME type inferred from the extension; `image/jpeg` when indeterminate.
    pub fn mime_type(&self) -> String {
        match self.extension().as_deref() {
            Some("jpg") | Some("jpeg") | None => "image/jpeg".to_string(),
            Some("png") => "image/png".to_string(),
            Some(ext) if !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()) => {
                format!("image/{ext}")
            }
            Some(_) => "image/jpeg".to_string(),
        }
    }
}

/// Disease label and confidence returned by the inference service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    #[serde(rename = "class")]
    pub label: String,
    /// Model confidence in [0,1].
    pub confidence: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum ResponseError {
    #[error("response body is not a prediction: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("prediction has an empty class")]
    EmptyClass,
    #[error("prediction confidence {0} is outside [0, 1]")]
    ConfidenceOutOfRange(f64),
}

impl PredictionResult {
    /// Decode and validate a response body against the `{class, confidence}` contract.
    pub fn from_body(body: &[u8]) -> Result<Self, ResponseError> {
        let result: PredictionResult = serde_json::from_slice(body)?;
        if result.label.trim().is_empty() {
            return Err(ResponseError::EmptyClass);
        }
        if !result.confidence.is_finite() || !(0.0..=1.0).contains(&result.confidence) {
            return Err(ResponseError::ConfidenceOutOfRange(result.confidence));
        }
        Ok(result)
    }

    pub fn display_label(&self) -> String {
        self.label.to_uppercase()
    }

    /// Confidence as a percentage with two decimals, e.g. `93.00%`.
    pub fn confidence_percent(&self) -> String {
        format!("{:.2}%", self.confidence * 100.0)
    }

    /// Fill fraction for the confidence bar.
    pub fn bar_fraction(&self) -> f32 {
        self.confidence.clamp(0.0, 1.0) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[test]
    fn decodes_service_response() {
        let body = br#"{"class": "Late_Blight", "confidence": 0.93}"#;
        let result = PredictionResult::from_body(body).unwrap();
        assert_eq!(
            result,
            PredictionResult {
                label: "Late_Blight".into(),
                confidence: 0.93,
            }
        );
        assert_eq!(result.confidence_percent(), "93.00%");
        assert_eq!(result.display_label(), "LATE_BLIGHT");
        assert_relative_eq!(result.bar_fraction(), 0.93, epsilon = 1e-6);
    }

    #[test]
    fn ignores_extra_fields() {
        let body = br#"{"class": "Healthy", "confidence": 1, "model": "v2"}"#;
        let result = PredictionResult::from_body(body).unwrap();
        assert_eq!(result.label, "Healthy");
        assert_eq!(result.confidence_percent(), "100.00%");
    }

    #[rstest]
    #[case::missing_class(br#"{"confidence": 0.5}"#.as_slice())]
    #[case::missing_confidence(br#"{"class": "Healthy"}"#.as_slice())]
    #[case::wrong_type(br#"{"class": 3, "confidence": "high"}"#.as_slice())]
    #[case::empty_class(br#"{"class": "  ", "confidence": 0.5}"#.as_slice())]
    #[case::above_one(br#"{"class": "Healthy", "confidence": 1.5}"#.as_slice())]
    #[case::negative(br#"{"class": "Healthy", "confidence": -0.1}"#.as_slice())]
    #[case::not_json(b"<html>ok</html>".as_slice())]
    fn rejects_malformed_bodies(#[case] body: &[u8]) {
        assert!(PredictionResult::from_body(body).is_err());
    }

    #[rstest]
    #[case("leaf.jpg", "image/jpeg")]
    #[case("leaf.JPEG", "image/jpeg")]
    #[case("leaf.png", "image/png")]
    #[case("leaf.webp", "image/webp")]
    #[case("leaf", "image/jpeg")]
    fn mime_type_follows_extension(#[case] path: &str, #[case] expected: &str) {
        assert_eq!(ImageRef::new(path).mime_type(), expected);
    }

    #[test]
    fn file_name_comes_from_path() {
        assert_eq!(ImageRef::new("/tmp/cache/leaf.png").file_name(), "leaf.png");
        assert_eq!(ImageRef::new("/").file_name(), "photo.jpg");
    }
}
