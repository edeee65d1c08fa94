use dicom_pixeldata::PixelDecoder;
use image::{DynamicImage, GrayImage, ImageBuffer, ImageError, ImageReader, Luma, Rgb, RgbImage};
use std::path::Path;

use super::generator::{VisualizationError, Visualizer};

/// Grayscale, Sobel edge map and intensity heatmap of the uploaded scan.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageVisualizer;

impl ImageVisualizer {
    pub fn new() -> Self {
        Self
    }
}

impl Visualizer for ImageVisualizer {
    fn generate(
        &self,
        image_path: &Path,
        results_dir: &Path,
        base_name: &str,
    ) -> Result<Vec<String>, VisualizationError> {
        let gray = load_scan(image_path)?.to_luma8();

        let artifacts = [
            ("grayscale", DynamicImage::ImageLuma8(gray.clone())),
            ("edges", DynamicImage::ImageLuma8(sobel_edges(&gray))),
            ("heatmap", DynamicImage::ImageRgb8(heatmap(&gray))),
        ];

        let mut names = Vec::with_capacity(artifacts.len());
        for (suffix, artifact) in artifacts {
            let name = format!("{}_{}.png", base_name, suffix);
            let path = results_dir.join(&name);
            artifact
                .save(&path)
                .map_err(|source| VisualizationError::Encode {
                    path: path.display().to_string(),
                    source,
                })?;
            names.push(name);
        }

        log::info!(
            "Generated {} visualizations for {} in {}",
            names.len(),
            image_path.display(),
            results_dir.display()
        );
        Ok(names)
    }
}

/// `.dcm` files go through the DICOM pixel pipeline (first frame only).
/// Everything else is decoded by content, not by extension.
fn load_scan(image_path: &Path) -> Result<DynamicImage, VisualizationError> {
    let is_dicom = image_path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("dcm"));
    if is_dicom {
        return load_dicom(image_path);
    }

    let decode_error = |source: ImageError| VisualizationError::Decode {
        path: image_path.display().to_string(),
        source,
    };
    ImageReader::open(image_path)
        .map_err(|e| decode_error(ImageError::IoError(e)))?
        .with_guessed_format()
        .map_err(|e| decode_error(ImageError::IoError(e)))?
        .decode()
        .map_err(decode_error)
}

fn load_dicom(image_path: &Path) -> Result<DynamicImage, VisualizationError> {
    let dicom_error = |message: String| VisualizationError::Dicom {
        path: image_path.display().to_string(),
        message,
    };
    let object = dicom_object::open_file(image_path).map_err(|e| dicom_error(e.to_string()))?;
    let pixels = object
        .decode_pixel_data()
        .map_err(|e| dicom_error(e.to_string()))?;
    pixels
        .to_dynamic_image(0)
        .map_err(|e| dicom_error(e.to_string()))
}

fn sobel_edges(gray: &GrayImage) -> GrayImage {
    let (width, height) = gray.dimensions();
    let mut edges = GrayImage::new(width, height);
    if width < 3 || height < 3 {
        return edges;
    }

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let p = |dx: i32, dy: i32| -> f32 {
                let px = (x as i32 + dx) as u32;
                let py = (y as i32 + dy) as u32;
                gray.get_pixel(px, py)[0] as f32
            };

            let gx = p(1, -1) + 2.0 * p(1, 0) + p(1, 1) - p(-1, -1) - 2.0 * p(-1, 0) - p(-1, 1);
            let gy = p(-1, 1) + 2.0 * p(0, 1) + p(1, 1) - p(-1, -1) - 2.0 * p(0, -1) - p(1, -1);
            let magnitude = (gx * gx + gy * gy).sqrt().min(255.0);
            edges.put_pixel(x, y, Luma([magnitude as u8]));
        }
    }

    edges
}

fn heatmap(gray: &GrayImage) -> RgbImage {
    ImageBuffer::from_fn(gray.width(), gray.height(), |x, y| {
        colormap(gray.get_pixel(x, y)[0])
    })
}

/// Blue (low) through green to red (high).
fn colormap(intensity: u8) -> Rgb<u8> {
    let t = intensity as f32 / 255.0;
    let channel = |center: f32| -> u8 {
        let v = (1.5 - (4.0 * t - center).abs()).clamp(0.0, 1.0);
        (v * 255.0) as u8
    };
    Rgb([channel(3.0), channel(2.0), channel(1.0)])
}
