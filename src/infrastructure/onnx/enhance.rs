// SPDX-License-Identifier: MPL-2.0
//! MIRNet low-light enhancement adapter implementing the [`AIProcessor`] trait.
//!
//! [`AIProcessor`]: crate::application::port::AIProcessor

use std::path::PathBuf;
use std::sync::MutexGuard;

use image_rs::DynamicImage;

use crate::application::port::{AIError, AIProcessor, ProcessorCapabilities};
use crate::media::enhance::{
    create_shared_manager, EnhanceError, EnhanceManager, SharedEnhanceManager, TensorOptions,
};

/// ONNX-based low-light enhancement processor.
///
/// This adapter wraps [`EnhanceManager`] and enforces the configured input
/// size limit before inference.
///
/// # Example
///
/// ```ignore
/// use iced_lumen::infrastructure::onnx::OnnxEnhanceProcessor;
/// use iced_lumen::application::port::AIProcessor;
///
/// let processor = OnnxEnhanceProcessor::new(model_path, TensorOptions::default(), None);
/// processor.load()?;
/// let enhanced = processor.process(&image)?;
/// ```
#[derive(Clone)]
pub struct OnnxEnhanceProcessor {
    manager: SharedEnhanceManager,
    max_input_side: Option<u32>,
}

impl OnnxEnhanceProcessor {
    /// Creates a processor for the model at `model_path`. The session is not
    /// loaded until [`OnnxEnhanceProcessor::load`] is called.
    #[must_use]
    pub fn new(model_path: PathBuf, options: TensorOptions, max_input_side: Option<u32>) -> Self {
        Self {
            manager: create_shared_manager(model_path, options),
            max_input_side: max_input_side.filter(|side| *side > 0),
        }
    }

    /// Returns the underlying manager.
    #[must_use]
    pub fn manager(&self) -> &SharedEnhanceManager {
        &self.manager
    }

    /// Loads the model session. Loading twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`AIError::ModelLoadFailed`] if the file is missing or ONNX
    /// Runtime rejects it.
    pub fn load(&self) -> Result<(), AIError> {
        self.lock()?.ensure_session().map_err(|e| match e {
            EnhanceError::ModelNotFound(_) | EnhanceError::SessionLoadFailed(_) => {
                AIError::ModelLoadFailed(e.to_string())
            }
            other => AIError::ProcessingFailed(other.to_string()),
        })
    }

    /// Points the processor at a freshly provisioned model file.
    pub fn set_model_path(&self, model_path: PathBuf) -> Result<(), AIError> {
        self.lock()?.set_model_path(model_path);
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, EnhanceManager>, AIError> {
        self.manager
            .lock()
            .map_err(|_| AIError::ProcessingFailed("Lock poisoned".to_string()))
    }
}

impl AIProcessor for OnnxEnhanceProcessor {
    fn process(&self, image: &DynamicImage) -> Result<DynamicImage, AIError> {
        self.capabilities()
            .check_size(image.width(), image.height())?;

        let mut manager = self.lock()?;
        if !manager.is_session_ready() {
            return Err(AIError::ModelNotReady);
        }

        manager.enhance(image).map_err(|e| match e {
            EnhanceError::SessionNotInitialized => AIError::ModelNotReady,
            EnhanceError::PreprocessingFailed(_) | EnhanceError::PostprocessingFailed(_) => {
                AIError::ProcessingFailed(e.to_string())
            }
            other => AIError::InferenceFailed(other.to_string()),
        })
    }

    fn is_ready(&self) -> bool {
        self.manager
            .lock()
            .map(|m| m.is_session_ready())
            .unwrap_or(false)
    }

    fn capabilities(&self) -> ProcessorCapabilities {
        let caps = ProcessorCapabilities::new("MIRNet Low-Light Enhancement");
        match self.max_input_side {
            Some(side) => caps.with_input_limit(side, side),
            None => caps,
        }
    }
}
