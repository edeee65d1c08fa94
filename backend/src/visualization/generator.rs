use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum VisualizationError {
    #[error("Failed to decode image {path}: {source}")]
    Decode {
        path: String,
        source: image::ImageError,
    },
    #[error("Failed to decode DICOM scan {path}: {message}")]
    Dicom { path: String, message: String },
    #[error("Failed to write artifact {path}: {source}")]
    Encode {
        path: String,
        source: image::ImageError,
    },
}

/// Produces derived images for a stored scan.
///
/// Artifacts are written into `results_dir` with names derived from
/// `base_name`, so a later call with the same base name replaces them.
/// The returned names are relative to `results_dir`, in generation order.
pub trait Visualizer: Send + Sync {
    fn generate(
        &self,
        image_path: &Path,
        results_dir: &Path,
        base_name: &str,
    ) -> Result<Vec<String>, VisualizationError>;
}
