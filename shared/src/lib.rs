use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Image extensions the upload page accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, EnumIter, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum ImageExtension {
    Png,
    Jpg,
    Jpeg,
    Dcm,
}

/// Normalized output of the tumor detector. `confidence` is a percentage.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct DetectionResult {
    pub has_tumor: bool,
    pub confidence: f64,
}

impl DetectionResult {
    pub fn confidence_label(&self) -> String {
        format!("{:.2}%", self.confidence)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PredictResponse {
    pub has_tumor: bool,
    pub confidence: String,
    pub filename: String,
}

impl PredictResponse {
    pub fn new(result: &DetectionResult, filename: impl Into<String>) -> Self {
        Self {
            has_tumor: result.has_tumor,
            confidence: result.confidence_label(),
            filename: filename.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }
}
