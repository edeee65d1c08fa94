pub mod detector;
pub mod remote;

pub use detector::{DetectionError, TumorDetector, detect_tumor, normalize};
pub use remote::HttpDetector;
