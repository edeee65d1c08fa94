use async_trait::async_trait;
use serde_json::Value;
use shared::DetectionResult;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum DetectionError {
    #[error("Detector request failed: {0}")]
    Request(String),
    #[error("Detector returned an unreadable body: {0}")]
    Decode(String),
    #[error("Failed to read image {path}: {message}")]
    Read { path: String, message: String },
    #[error("Detector output is not an object: {0}")]
    MalformedOutput(String),
    #[error("Could not convert confidence to float: {0}")]
    InvalidConfidence(String),
}

/// An external model that inspects a stored scan.
///
/// Implementations return whatever the model produced. Nothing about its
/// shape is trusted until it passes through [`normalize`].
#[async_trait]
pub trait TumorDetector: Send + Sync {
    async fn detect(&self, image_path: &Path) -> Result<Value, DetectionError>;

    fn name(&self) -> &'static str;
}

pub async fn detect_tumor(
    detector: &dyn TumorDetector,
    image_path: &Path,
) -> Result<DetectionResult, DetectionError> {
    log::info!(
        "Running {} detector on {}",
        detector.name(),
        image_path.display()
    );
    let raw = detector.detect(image_path).await?;
    let result = normalize(&raw)?;
    log::info!(
        "Detection for {}: has_tumor={} confidence={}",
        image_path.display(),
        result.has_tumor,
        result.confidence_label()
    );
    Ok(result)
}

/// Coerces raw detector output into a [`DetectionResult`].
///
/// A missing or null `has_tumor` is false and a missing or null
/// `confidence` is 0.0. Other values follow truthiness and numeric parsing.
/// The confidence must end up finite.
pub fn normalize(raw: &Value) -> Result<DetectionResult, DetectionError> {
    let fields = raw
        .as_object()
        .ok_or_else(|| DetectionError::MalformedOutput(raw.to_string()))?;

    let has_tumor = fields.get("has_tumor").is_some_and(truthy);
    let confidence = match fields.get("confidence") {
        None | Some(Value::Null) => 0.0,
        Some(value) => coerce_float(value)?,
    };

    if !(0.0..=100.0).contains(&confidence) {
        log::warn!("Detector confidence {} is outside 0-100", confidence);
    }

    Ok(DetectionResult {
        has_tumor,
        confidence,
    })
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn coerce_float(value: &Value) -> Result<f64, DetectionError> {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(n) if n.is_finite() => Ok(n),
        _ => Err(DetectionError::InvalidConfidence(value.to_string())),
    }
}
