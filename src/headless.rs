// SPDX-License-Identifier: MPL-2.0
//! One-shot enhancement without opening a window (`--output`).

use crate::app::config::Config;
use crate::application::port::AIProcessor;
use crate::error::{Error, Result};
use crate::infrastructure::onnx::OnnxEnhanceProcessor;
use crate::media::image as media_image;
use crate::media::model_archive::{self, ProvisionStage};
use std::path::{Path, PathBuf};

/// Provisions the model into `data_dir`, enhances `input` and writes the PNG
/// result to `output`.
pub async fn run(config: &Config, data_dir: &Path, input: &Path, output: &Path) -> Result<PathBuf> {
    let original = media_image::load_upload(input)?;

    let source = config.model.source();
    let mut last_percent = None;
    let model_path = model_archive::provision(&source, data_dir, |stage| {
        if let ProvisionStage::Downloading(progress) = stage {
            let percent = (progress * 100.0) as u32 / 10 * 10;
            if last_percent != Some(percent) {
                last_percent = Some(percent);
                tracing::info!(percent, "downloading model");
            }
        } else {
            tracing::info!("extracting model");
        }
    })
    .await?;

    let options = config.model.tensor_options();
    let max_side = config.model.max_input_side;
    let model_root = data_dir.to_path_buf();
    let enhanced = tokio::task::spawn_blocking(move || {
        let processor = OnnxEnhanceProcessor::new(model_path, options, max_side);
        if let Err(e) = processor.load() {
            // The next run downloads a fresh copy.
            if let Err(discard) = model_archive::discard_model(&source, &model_root) {
                tracing::warn!(error = %discard, "could not remove unusable model");
            }
            return Err(Error::from(e));
        }
        processor.process(&original).map_err(Error::from)
    })
    .await
    .map_err(|e| Error::Model(e.to_string()))??;

    let png = media_image::encode_png(&enhanced)?;
    media_image::write_png_bytes(&png, output)?;
    Ok(output.to_path_buf())
}
