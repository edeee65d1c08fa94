use actix_web::web;
use shared::PredictResponse;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{DEFAULT_MAX_UPLOAD_BYTES, StorageConfig};
use crate::detection::{DetectionError, TumorDetector, detect_tumor};
use crate::page::IndexPage;
use crate::storage::{StorageError, StoredUpload, UploadStore, base_name};
use crate::upload::UploadedFile;
use crate::validation::is_allowed;
use crate::visualization::{VisualizationError, Visualizer};

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("No file provided")]
    MissingFile,
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Detection(#[from] DetectionError),
    #[error(transparent)]
    Visualization(#[from] VisualizationError),
    #[error("Blocking task failed: {0}")]
    Blocking(String),
}

impl ScanError {
    /// Short description without paths or backend detail, for pages shown to users.
    pub fn summary(&self) -> &'static str {
        match self {
            ScanError::MissingFile => "No file provided",
            ScanError::Storage(_) => "the upload could not be saved",
            ScanError::Detection(_) => "tumor detection failed",
            ScanError::Visualization(_) => "the scan images could not be generated",
            ScanError::Blocking(_) => "an internal error occurred",
        }
    }
}

/// Why a browser submission was turned away before any processing.
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    MissingFile,
    EmptyFilename,
    DisallowedExtension(String),
    TooLarge,
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    Rendered(IndexPage),
    Rejected(Rejection),
}

/// Runs uploads through storage, detection and (for the page) visualization.
#[derive(Clone)]
pub struct ScanService {
    store: UploadStore,
    results_dir: PathBuf,
    detector: Arc<dyn TumorDetector>,
    visualizer: Arc<dyn Visualizer>,
    max_upload_bytes: usize,
}

impl ScanService {
    pub fn new(
        storage: &StorageConfig,
        detector: Arc<dyn TumorDetector>,
        visualizer: Arc<dyn Visualizer>,
    ) -> Self {
        Self {
            store: UploadStore::new(&storage.upload_dir),
            results_dir: storage.results_dir.clone(),
            detector,
            visualizer,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    pub fn with_upload_limit(mut self, max_upload_bytes: usize) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    /// API flow: any filename is accepted, no visualizations are produced.
    pub async fn predict(&self, upload: Option<UploadedFile>) -> Result<PredictResponse, ScanError> {
        let file = upload
            .filter(UploadedFile::has_name)
            .ok_or(ScanError::MissingFile)?;

        let stored = self.store(file).await?;
        let detection = detect_tumor(self.detector.as_ref(), &stored.path).await?;

        Ok(PredictResponse::new(&detection, stored.filename))
    }

    /// Page flow: only accepted image types, with visualizations.
    pub async fn analyze(&self, upload: Option<UploadedFile>) -> Result<Submission, ScanError> {
        let Some(file) = upload else {
            return Ok(Submission::Rejected(Rejection::MissingFile));
        };
        if !file.has_name() {
            return Ok(Submission::Rejected(Rejection::EmptyFilename));
        }
        if !is_allowed(&file.original_name) {
            return Ok(Submission::Rejected(Rejection::DisallowedExtension(
                file.original_name,
            )));
        }

        let stored = self.store(file).await?;
        let detection = detect_tumor(self.detector.as_ref(), &stored.path).await?;

        let visualizer = self.visualizer.clone();
        let image_path = stored.path.clone();
        let results_dir = self.results_dir.clone();
        let base = base_name(&stored.filename).to_string();
        let result_images =
            web::block(move || visualizer.generate(&image_path, &results_dir, &base))
                .await
                .map_err(|e| ScanError::Blocking(e.to_string()))??;

        Ok(Submission::Rendered(IndexPage::with_result(
            stored.filename,
            result_images,
            &detection,
        )))
    }

    async fn store(&self, file: UploadedFile) -> Result<StoredUpload, ScanError> {
        let store = self.store.clone();
        let stored = web::block(move || store.store(&file))
            .await
            .map_err(|e| ScanError::Blocking(e.to_string()))??;
        Ok(stored)
    }
}
