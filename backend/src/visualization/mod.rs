pub mod generator;
pub mod image_visualizer;

pub use generator::{VisualizationError, Visualizer};
pub use image_visualizer::ImageVisualizer;
