#![allow(dead_code)]

use actix_web::http::header;
use actix_web::test::TestRequest;
use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use tumorscan::config::StorageConfig;
use tumorscan::detection::{DetectionError, TumorDetector};
use tumorscan::pipeline::ScanService;
use tumorscan::visualization::{VisualizationError, Visualizer};

pub const BOUNDARY: &str = "tumorscan-test-boundary";

/// Detector stand-in that replies with a canned value and remembers what it saw.
pub struct FakeDetector {
    reply: Result<Value, String>,
    pub calls: Mutex<Vec<PathBuf>>,
}

impl FakeDetector {
    pub fn replying(reply: Value) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(reply),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(message.to_string()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl TumorDetector for FakeDetector {
    async fn detect(&self, image_path: &Path) -> Result<Value, DetectionError> {
        self.calls.lock().unwrap().push(image_path.to_path_buf());
        self.reply.clone().map_err(DetectionError::Request)
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

/// Writes one placeholder artifact per call, named after the base name.
pub struct FakeVisualizer {
    fail: bool,
    pub calls: Mutex<Vec<String>>,
}

impl FakeVisualizer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            fail: false,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Visualizer for FakeVisualizer {
    fn generate(
        &self,
        image_path: &Path,
        results_dir: &Path,
        base_name: &str,
    ) -> Result<Vec<String>, VisualizationError> {
        self.calls.lock().unwrap().push(base_name.to_string());
        if self.fail {
            return Err(VisualizationError::Decode {
                path: image_path.display().to_string(),
                source: image::ImageError::IoError(std::io::Error::other("unsupported scan")),
            });
        }

        let name = format!("{}_overlay.png", base_name);
        std::fs::write(results_dir.join(&name), b"overlay").unwrap();
        Ok(vec![name])
    }
}

/// Isolated upload/results directories for one test.
pub struct TestDirs {
    _root: TempDir,
    pub storage: StorageConfig,
}

impl TestDirs {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        let storage = StorageConfig::new(root.path().join("uploads"), root.path().join("results"));
        storage.ensure_dirs().unwrap();
        Self {
            _root: root,
            storage,
        }
    }

    pub fn service(
        &self,
        detector: Arc<dyn TumorDetector>,
        visualizer: Arc<dyn Visualizer>,
    ) -> ScanService {
        ScanService::new(&self.storage, detector, visualizer)
    }

    pub fn uploads(&self) -> Vec<String> {
        list(&self.storage.upload_dir)
    }

    pub fn results(&self) -> Vec<String> {
        list(&self.storage.results_dir)
    }
}

fn list(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

pub struct Part<'a> {
    pub name: &'a str,
    pub filename: Option<&'a str>,
    pub content: &'a [u8],
}

impl<'a> Part<'a> {
    pub fn file(filename: &'a str, content: &'a [u8]) -> Self {
        Self {
            name: "file",
            filename: Some(filename),
            content,
        }
    }

    pub fn text(name: &'a str, value: &'a str) -> Self {
        Self {
            name,
            filename: None,
            content: value.as_bytes(),
        }
    }
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part.filename {
            Some(filename) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                        part.name, filename
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(b"Content-Type: application/octet-stream\r\n");
            }
            None => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n", part.name)
                        .as_bytes(),
                );
            }
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(part.content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn multipart_post(uri: &str, parts: &[Part<'_>]) -> TestRequest {
    TestRequest::post()
        .uri(uri)
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        ))
        .set_payload(multipart_body(parts))
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x * 10) as u8, (y * 10) as u8, 128])
    });
    let mut cursor = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut cursor, image::ImageFormat::Png)
        .unwrap();
    cursor.into_inner()
}

/// Single-frame 8-bit monochrome DICOM file, explicit VR little endian.
pub fn dicom_bytes(width: u16, height: u16) -> Vec<u8> {
    use dicom_core::{DataElement, PrimitiveValue, VR};
    use dicom_dictionary_std::{tags, uids};
    use dicom_object::{FileMetaTableBuilder, InMemDicomObject};

    let pixels: Vec<u8> = (0..usize::from(width) * usize::from(height))
        .map(|i| (i * 5 % 256) as u8)
        .collect();
    let object = InMemDicomObject::from_element_iter([
        DataElement::new(tags::SOP_CLASS_UID, VR::UI, PrimitiveValue::from(uids::CT_IMAGE_STORAGE)),
        DataElement::new(tags::SOP_INSTANCE_UID, VR::UI, PrimitiveValue::from("2.25.42")),
        DataElement::new(tags::SAMPLES_PER_PIXEL, VR::US, PrimitiveValue::from(1_u16)),
        DataElement::new(tags::PHOTOMETRIC_INTERPRETATION, VR::CS, PrimitiveValue::from("MONOCHROME2")),
        DataElement::new(tags::ROWS, VR::US, PrimitiveValue::from(height)),
        DataElement::new(tags::COLUMNS, VR::US, PrimitiveValue::from(width)),
        DataElement::new(tags::BITS_ALLOCATED, VR::US, PrimitiveValue::from(8_u16)),
        DataElement::new(tags::BITS_STORED, VR::US, PrimitiveValue::from(8_u16)),
        DataElement::new(tags::HIGH_BIT, VR::US, PrimitiveValue::from(7_u16)),
        DataElement::new(tags::PIXEL_REPRESENTATION, VR::US, PrimitiveValue::from(0_u16)),
        DataElement::new(tags::PIXEL_DATA, VR::OB, PrimitiveValue::from(pixels)),
    ]);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fixture.dcm");
    object
        .with_meta(
            FileMetaTableBuilder::new()
                .transfer_syntax(uids::EXPLICIT_VR_LITTLE_ENDIAN)
                .media_storage_sop_class_uid(uids::CT_IMAGE_STORAGE)
                .media_storage_sop_instance_uid("2.25.42"),
        )
        .unwrap()
        .write_to_file(&path)
        .unwrap();
    std::fs::read(&path).unwrap()
}
