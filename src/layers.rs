//! Layer capture: file naming, the layer counter, and the JPEG boundary.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::ExtendedColorType;
use image::codecs::jpeg::JpegEncoder;
use thiserror::Error;

use crate::canvas::{CanvasError, RasterCanvas};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image codec error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Canvas of {width}x{height} pixels cannot be encoded")]
    Dimensions { width: usize, height: usize },
    #[error("Canvas error: {0}")]
    Canvas(#[from] CanvasError),
}

/// What a sink did with one captured layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerRecord {
    pub index: u32,
    pub height_label: String,
    pub path: Option<PathBuf>,
}

/// Receives the canvas each time a layer is captured. The sink owns the
/// layer counter; indices start at 0 and increase by one per capture.
pub trait LayerSink {
    fn capture(&mut self, canvas: &RasterCanvas, height_mm: f32) -> Result<LayerRecord, ExportError>;

    /// Number of layers captured so far.
    fn captured(&self) -> u32;
}

/// Format a Z height for a file name: six decimals, then the last five
/// characters dropped. Digits past the first decimal are truncated, not
/// rounded (`0.199999` gives `"0.1"`).
pub fn format_height(height_mm: f32) -> String {
    if !height_mm.is_finite() {
        return height_mm.to_string();
    }
    let mut s = format!("{:.6}", height_mm);
    s.truncate(s.len() - 5);
    s
}

pub fn layer_file_name(index: u32, height_mm: f32) -> String {
    format!("layer_{}_{}.jpg", index, format_height(height_mm))
}

/// Create the output directory if it does not exist (`rwxrwxr-x` on unix).
pub fn ensure_output_dir(path: &Path) -> std::io::Result<()> {
    if path.is_dir() {
        return Ok(());
    }
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o775);
    }
    builder.create(path)
}

/// Write the canvas as a single-channel JPEG.
pub fn encode(canvas: &RasterCanvas, path: &Path, quality: u8) -> Result<(), ExportError> {
    let dims = (u32::try_from(canvas.width()), u32::try_from(canvas.height()));
    let (Ok(width), Ok(height)) = dims else {
        return Err(ExportError::Dimensions {
            width: canvas.width(),
            height: canvas.height(),
        });
    };
    let mut writer = BufWriter::new(File::create(path)?);
    let mut encoder = JpegEncoder::new_with_quality(&mut writer, quality);
    encoder.encode(canvas.as_raw(), width, height, ExtendedColorType::L8)?;
    writer.flush()?;
    Ok(())
}

/// Perceptual luma of an RGB sample, rounded to the nearest level.
pub fn grey(r: u8, g: u8, b: u8) -> u8 {
    let v = f32::from(r) * 0.299 + f32::from(g) * 0.587 + f32::from(b) * 0.114;
    v.round().clamp(0.0, 255.0) as u8
}

/// Load an image and reduce it to a grayscale canvas.
pub fn decode(path: &Path) -> Result<RasterCanvas, ExportError> {
    let rgb = image::open(path)?.into_rgb8();
    let (width, height) = (rgb.width() as usize, rgb.height() as usize);
    let buffer = rgb.pixels().map(|p| grey(p[0], p[1], p[2])).collect();
    Ok(RasterCanvas::from_raw(width, height, buffer)?)
}

/// Writes each layer to `<output_dir>/layer_<index>_<height>.jpg`.
#[derive(Debug)]
pub struct JpegExporter {
    output_dir: PathBuf,
    quality: u8,
    next_index: u32,
}

impl JpegExporter {
    /// Create the exporter, creating `output_dir` if needed.
    pub fn create(output_dir: impl Into<PathBuf>, quality: u8) -> Result<Self, ExportError> {
        let output_dir = output_dir.into();
        ensure_output_dir(&output_dir)?;
        Ok(Self {
            output_dir,
            quality,
            next_index: 0,
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

impl LayerSink for JpegExporter {
    fn capture(&mut self, canvas: &RasterCanvas, height_mm: f32) -> Result<LayerRecord, ExportError> {
        let path = self.output_dir.join(layer_file_name(self.next_index, height_mm));
        encode(canvas, &path, self.quality)?;
        tracing::info!("Layer {} written to {}", self.next_index, path.display());
        let record = LayerRecord {
            index: self.next_index,
            height_label: format_height(height_mm),
            path: Some(path),
        };
        self.next_index += 1;
        Ok(record)
    }

    fn captured(&self) -> u32 {
        self.next_index
    }
}

/// Keeps a copy of every captured canvas in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub layers: Vec<(LayerRecord, RasterCanvas)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LayerSink for MemorySink {
    fn capture(&mut self, canvas: &RasterCanvas, height_mm: f32) -> Result<LayerRecord, ExportError> {
        let record = LayerRecord {
            index: self.layers.len() as u32,
            height_label: format_height(height_mm),
            path: None,
        };
        self.layers.push((record.clone(), canvas.clone()));
        Ok(record)
    }

    fn captured(&self) -> u32 {
        self.layers.len() as u32
    }
}
