// SPDX-License-Identifier: MPL-2.0
//! Top-level messages and runtime flags for the application.

use super::session::EnhancedImage;
use crate::error::Error;
use crate::media::model_archive::ProvisionStage;
use crate::media::ImageData;
use std::path::PathBuf;

/// Messages consumed by `App::update`.
#[derive(Debug, Clone)]
pub enum Message {
    /// Open the upload dialog.
    OpenFileDialog,
    /// Result from the upload dialog.
    OpenFileDialogResult(Option<PathBuf>),
    /// A file was dropped on the window.
    FileDropped(PathBuf),
    /// An uploaded picture finished decoding.
    ImageLoaded(Result<ImageData, Error>),
    /// Run the model on the current upload.
    Enhance,
    /// Inference finished; the result is already encoded as PNG.
    EnhanceCompleted(Result<EnhancedImage, String>),
    /// Open the save dialog for the enhanced picture.
    Download,
    /// Result from the save dialog.
    SaveDialogResult(Option<PathBuf>),
    /// PNG bytes were written (or not) to the chosen path.
    SaveCompleted(Result<PathBuf, String>),
    /// Progress of the background model provisioning.
    ProvisionProgress(ProvisionStage),
    /// Provisioning finished with the path of the model file.
    ProvisionCompleted(Result<PathBuf, String>),
    /// The ONNX session was created (or failed to).
    ModelLoaded(Result<(), String>),
    /// Retry provisioning after a failure.
    RetryProvision,
}

/// Runtime flags passed in from the CLI to tweak startup behavior.
#[derive(Debug, Default)]
pub struct Flags {
    /// Optional locale override in BCP-47 form (e.g. `fr`, `en-US`).
    pub lang: Option<String>,
    /// Optional image path to preload on startup.
    pub file_path: Option<String>,
}
