use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::path::Path;
use std::time::Duration;
use url::Url;

use super::detector::{DetectionError, TumorDetector};

/// Sends the raw image bytes to a model server and returns its JSON reply.
#[derive(Clone)]
pub struct HttpDetector {
    client: Client,
    endpoint: Url,
}

impl HttpDetector {
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, DetectionError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DetectionError::Request(e.to_string()))?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl TumorDetector for HttpDetector {
    async fn detect(&self, image_path: &Path) -> Result<Value, DetectionError> {
        let image = tokio::fs::read(image_path)
            .await
            .map_err(|e| DetectionError::Read {
                path: image_path.display().to_string(),
                message: e.to_string(),
            })?;

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .header(reqwest::header::ACCEPT, "application/json")
            .body(image)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DetectionError::Request(format!("timed out calling {}", self.endpoint))
                } else {
                    DetectionError::Request(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(DetectionError::Request(format!(
                "{} returned {}: {}",
                self.endpoint, status, message
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| DetectionError::Decode(e.to_string()))
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
