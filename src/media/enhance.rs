// SPDX-License-Identifier: MPL-2.0
//! Low-light enhancement using a pretrained ONNX model.
//!
//! This module provides functionality for:
//! - Loading the enhancement model once per process
//! - Converting an RGB image into the model's input tensor
//! - Turning the first output tensor back into an 8-bit image

use image_rs::{DynamicImage, RgbImage};
use ndarray::Array4;
use ort::session::{builder::GraphOptimizationLevel, Session};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Result type for enhancement operations.
pub type EnhanceResult<T> = Result<T, EnhanceError>;

/// Errors that can occur while running the enhancement model.
#[derive(Debug, Clone)]
pub enum EnhanceError {
    /// Model file not found at expected path.
    ModelNotFound(PathBuf),
    /// The ONNX session could not be created.
    SessionLoadFailed(String),
    /// ONNX inference failed.
    InferenceFailed(String),
    /// Image preprocessing failed.
    PreprocessingFailed(String),
    /// The model produced no output or an output of unexpected shape.
    PostprocessingFailed(String),
    /// Model session not initialized.
    SessionNotInitialized,
}

impl std::fmt::Display for EnhanceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnhanceError::ModelNotFound(path) => {
                write!(f, "Model file not found: {}", path.display())
            }
            EnhanceError::SessionLoadFailed(msg) => write!(f, "Failed to load model: {msg}"),
            EnhanceError::InferenceFailed(msg) => write!(f, "Inference failed: {msg}"),
            EnhanceError::PreprocessingFailed(msg) => write!(f, "Preprocessing failed: {msg}"),
            EnhanceError::PostprocessingFailed(msg) => write!(f, "Postprocessing failed: {msg}"),
            EnhanceError::SessionNotInitialized => write!(f, "ONNX session not initialized"),
        }
    }
}

impl std::error::Error for EnhanceError {}

/// Memory layout of the model's image tensors.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TensorLayout {
    /// `[batch, height, width, channels]`, as exported from Keras models.
    #[default]
    Nhwc,
    /// `[batch, channels, height, width]`, as exported from PyTorch models.
    Nchw,
}

/// Status of the enhancement model as shown in the UI.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ModelStatus {
    /// Model has not been provisioned yet.
    #[default]
    NotDownloaded,
    /// The model archive is being downloaded.
    Downloading { progress: f32 },
    /// The archive is being unpacked.
    Extracting,
    /// The ONNX session is being created.
    Loading,
    /// Model is ready for use.
    Ready,
    /// An error occurred.
    Error(String),
}

impl ModelStatus {
    /// Returns `true` once inference can run.
    pub fn is_ready(&self) -> bool {
        matches!(self, ModelStatus::Ready)
    }

    /// Returns `true` while provisioning or loading is still in progress.
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            ModelStatus::Downloading { .. } | ModelStatus::Extracting | ModelStatus::Loading
        )
    }
}

/// Tensor conversion options taken from the `[model]` configuration section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TensorOptions {
    pub layout: TensorLayout,
    /// Width and height are padded up to a multiple of this value (1 = no padding).
    pub pad_multiple: u32,
}

impl Default for TensorOptions {
    fn default() -> Self {
        Self {
            layout: TensorLayout::Nhwc,
            pad_multiple: 1,
        }
    }
}

/// Manager for the enhancement model.
///
/// Owns the ONNX session. The session is created at most once; later calls to
/// [`EnhanceManager::ensure_session`] reuse it.
pub struct EnhanceManager {
    model_path: PathBuf,
    options: TensorOptions,
    session: Option<Session>,
}

impl EnhanceManager {
    /// Creates a manager for the model stored at `model_path`.
    pub fn new(model_path: PathBuf, options: TensorOptions) -> Self {
        Self {
            model_path,
            options,
            session: None,
        }
    }

    /// Returns the path of the model file.
    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    /// Returns the tensor conversion options.
    pub fn options(&self) -> TensorOptions {
        self.options
    }

    /// Points the manager at a different model file, dropping any loaded session.
    pub fn set_model_path(&mut self, model_path: PathBuf) {
        if model_path != self.model_path {
            self.model_path = model_path;
            self.session = None;
        }
    }

    /// Loads the ONNX session unless it is already loaded.
    pub fn ensure_session(&mut self) -> EnhanceResult<()> {
        if self.session.is_some() {
            return Ok(());
        }

        if !self.model_path.exists() {
            return Err(EnhanceError::ModelNotFound(self.model_path.clone()));
        }

        tracing::info!(path = %self.model_path.display(), "loading enhancement model");

        let session = Session::builder()
            .map_err(|e| EnhanceError::SessionLoadFailed(e.to_string()))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| EnhanceError::SessionLoadFailed(e.to_string()))?
            .commit_from_file(&self.model_path)
            .map_err(|e| EnhanceError::SessionLoadFailed(e.to_string()))?;

        self.session = Some(session);
        Ok(())
    }

    /// Checks if the ONNX session is loaded and ready.
    pub fn is_session_ready(&self) -> bool {
        self.session.is_some()
    }

    /// Runs the enhancement model on an image.
    ///
    /// The result has whatever spatial size the model emits. When padding was
    /// applied, it is cropped back to the original extent scaled by the
    /// model's output/input ratio.
    pub fn enhance(&mut self, image: &DynamicImage) -> EnhanceResult<DynamicImage> {
        let options = self.options;
        let session = self
            .session
            .as_mut()
            .ok_or(EnhanceError::SessionNotInitialized)?;

        let original = (image.width(), image.height());
        let prepared = preprocess_image(image, options)?;
        let input_tensor = prepared.tensor.as_standard_layout().into_owned();

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .ok_or_else(|| EnhanceError::InferenceFailed("Model declares no inputs".into()))?;

        let input_ref = ort::value::TensorRef::from_array_view(&input_tensor)
            .map_err(|e| EnhanceError::InferenceFailed(e.to_string()))?;

        let started = std::time::Instant::now();
        let outputs = session
            .run(ort::inputs![input_name.as_str() => input_ref])
            .map_err(|e| EnhanceError::InferenceFailed(e.to_string()))?;

        // The first output is used whatever its name.
        let (output_name, output) = outputs
            .iter()
            .next()
            .ok_or_else(|| EnhanceError::PostprocessingFailed("No output tensor".to_string()))?;

        let (shape, data) = output
            .try_extract_tensor::<f32>()
            .map_err(|e: ort::Error| EnhanceError::PostprocessingFailed(e.to_string()))?;

        let dims: Vec<i64> = shape.iter().copied().collect();
        tracing::debug!(
            output = output_name,
            ?dims,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "inference finished"
        );

        let result = postprocess_output(&dims, data, options.layout)?;
        Ok(crop_to_original(
            result,
            original,
            (prepared.width, prepared.height),
        ))
    }
}

/// Thread-safe wrapper for EnhanceManager.
pub type SharedEnhanceManager = Arc<Mutex<EnhanceManager>>;

/// Creates a new shared EnhanceManager instance.
pub fn create_shared_manager(model_path: PathBuf, options: TensorOptions) -> SharedEnhanceManager {
    Arc::new(Mutex::new(EnhanceManager::new(model_path, options)))
}

/// An input tensor together with the (possibly padded) extent it encodes.
#[derive(Debug)]
pub struct PreparedInput {
    pub tensor: Array4<f32>,
    pub width: u32,
    pub height: u32,
}

/// Converts an image into the model's input tensor.
///
/// Pixels are RGB, normalized to 0-1, with a batch dimension of 1 prepended.
pub fn preprocess_image(img: &DynamicImage, options: TensorOptions) -> EnhanceResult<PreparedInput> {
    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();

    if width == 0 || height == 0 {
        return Err(EnhanceError::PreprocessingFailed(format!(
            "Image has no pixels ({width}x{height})"
        )));
    }

    let multiple = options.pad_multiple.max(1);
    let padded_width = width.div_ceil(multiple) * multiple;
    let padded_height = height.div_ceil(multiple) * multiple;
    let rgb = if padded_width != width || padded_height != height {
        pad_image_reflect(&rgb, padded_width, padded_height)
    } else {
        rgb
    };

    let (h, w) = (padded_height as usize, padded_width as usize);
    let mut tensor = match options.layout {
        TensorLayout::Nhwc => Array4::<f32>::zeros((1, h, w, 3)),
        TensorLayout::Nchw => Array4::<f32>::zeros((1, 3, h, w)),
    };

    for (x, y, pixel) in rgb.enumerate_pixels() {
        let (x, y) = (x as usize, y as usize);
        for (c, value) in pixel.0.iter().enumerate() {
            let normalized = f32::from(*value) / 255.0;
            match options.layout {
                TensorLayout::Nhwc => tensor[[0, y, x, c]] = normalized,
                TensorLayout::Nchw => tensor[[0, c, y, x]] = normalized,
            }
        }
    }

    Ok(PreparedInput {
        tensor,
        width: padded_width,
        height: padded_height,
    })
}

/// Pads an image using edge reflection to reach target dimensions.
fn pad_image_reflect(img: &RgbImage, target_width: u32, target_height: u32) -> RgbImage {
    let (src_width, src_height) = img.dimensions();
    let mut padded = RgbImage::new(target_width, target_height);

    for y in 0..target_height {
        for x in 0..target_width {
            let src_x = reflect(x, src_width);
            let src_y = reflect(y, src_height);
            padded.put_pixel(x, y, *img.get_pixel(src_x, src_y));
        }
    }

    padded
}

/// Mirrors a coordinate that falls past the edge back into `0..len`.
fn reflect(coord: u32, len: u32) -> u32 {
    if coord < len {
        return coord;
    }
    let overflow = coord - len;
    if overflow < len {
        len - 1 - overflow
    } else {
        0
    }
}

/// Converts the first output tensor back to an image.
///
/// Takes batch index 0, maps each value to `clamp(v * 255, 0, 255)` and
/// truncates to `u8`. One, three and four channel outputs are supported.
pub fn postprocess_output(
    shape: &[i64],
    data: &[f32],
    layout: TensorLayout,
) -> EnhanceResult<DynamicImage> {
    if shape.len() != 4 {
        return Err(EnhanceError::PostprocessingFailed(format!(
            "Expected 4D tensor, got {}D",
            shape.len()
        )));
    }
    if shape.iter().any(|&d| d <= 0) {
        return Err(EnhanceError::PostprocessingFailed(format!(
            "Output tensor has empty dimension: {shape:?}"
        )));
    }

    let (height, width, channels) = match layout {
        TensorLayout::Nhwc => (shape[1] as usize, shape[2] as usize, shape[3] as usize),
        TensorLayout::Nchw => (shape[2] as usize, shape[3] as usize, shape[1] as usize),
    };

    if !matches!(channels, 1 | 3 | 4) {
        return Err(EnhanceError::PostprocessingFailed(format!(
            "Unsupported channel count {channels} for {layout:?} output {shape:?}"
        )));
    }

    let plane = height * width;
    let per_batch = plane * channels;
    if data.len() < per_batch {
        return Err(EnhanceError::PostprocessingFailed(format!(
            "Output holds {} values, expected at least {per_batch}",
            data.len()
        )));
    }

    let mut pixels = Vec::with_capacity(per_batch);
    for y in 0..height {
        for x in 0..width {
            for c in 0..channels {
                let idx = match layout {
                    TensorLayout::Nhwc => (y * width + x) * channels + c,
                    TensorLayout::Nchw => c * plane + y * width + x,
                };
                pixels.push(to_u8(data[idx]));
            }
        }
    }

    let (w, h) = (width as u32, height as u32);
    let image = match channels {
        1 => image_rs::GrayImage::from_raw(w, h, pixels).map(DynamicImage::ImageLuma8),
        3 => RgbImage::from_raw(w, h, pixels).map(DynamicImage::ImageRgb8),
        _ => image_rs::RgbaImage::from_raw(w, h, pixels).map(DynamicImage::ImageRgba8),
    };

    image.ok_or_else(|| EnhanceError::PostprocessingFailed("Failed to create image".to_string()))
}

/// Rescales a normalized value to the 8-bit range.
#[inline]
fn to_u8(value: f32) -> u8 {
    (value * 255.0).clamp(0.0, 255.0) as u8
}

/// Crops away the area produced from reflection padding.
fn crop_to_original(result: DynamicImage, original: (u32, u32), padded: (u32, u32)) -> DynamicImage {
    if original == padded {
        return result;
    }
    let width = u64::from(result.width()) * u64::from(original.0) / u64::from(padded.0);
    let height = u64::from(result.height()) * u64::from(original.1) / u64::from(padded.1);
    result.crop_imm(0, 0, width as u32, height as u32)
}
