// SPDX-License-Identifier: MPL-2.0
//! AI processing port definition.
//!
//! This module defines the [`AIProcessor`] trait for model-based image
//! enhancement.
//!
//! # Design Notes
//!
//! - Progress of model provisioning is reported via Iced Messages, not in the trait
//! - Model downloading and unpacking is implementation-specific
//! - The trait is `Send + Sync` so the processor can move into blocking tasks

use image_rs::DynamicImage;
use std::fmt;

// =============================================================================
// AIError
// =============================================================================

/// Errors that can occur during AI processing.
#[derive(Debug, Clone)]
pub enum AIError {
    /// The AI model is not ready (not provisioned or not loaded).
    ModelNotReady,

    /// Processing failed with an error message.
    ProcessingFailed(String),

    /// The input image is too large for the model.
    InputTooLarge {
        /// Maximum supported dimensions.
        max: (u32, u32),
        /// Actual image dimensions.
        actual: (u32, u32),
    },

    /// The model file could not be loaded.
    ModelLoadFailed(String),

    /// Inference failed during processing.
    InferenceFailed(String),
}

impl fmt::Display for AIError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AIError::ModelNotReady => write!(f, "AI model is not ready"),
            AIError::ProcessingFailed(msg) => write!(f, "AI processing failed: {msg}"),
            AIError::InputTooLarge { max, actual } => {
                write!(
                    f,
                    "Input too large: {}x{} (max: {}x{})",
                    actual.0, actual.1, max.0, max.1
                )
            }
            AIError::ModelLoadFailed(msg) => write!(f, "Failed to load model: {msg}"),
            AIError::InferenceFailed(msg) => write!(f, "Inference failed: {msg}"),
        }
    }
}

impl std::error::Error for AIError {}

// =============================================================================
// ProcessorCapabilities
// =============================================================================

/// Describes the capabilities of an AI processor.
#[derive(Debug, Clone)]
pub struct ProcessorCapabilities {
    /// Human-readable name of the processor.
    pub name: &'static str,

    /// Maximum input dimensions supported by the model.
    /// `None` if there's no practical limit.
    pub input_size_limit: Option<(u32, u32)>,
}

impl ProcessorCapabilities {
    /// Creates capabilities without an input size limit.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            input_size_limit: None,
        }
    }

    /// Sets the input size limit.
    #[must_use]
    pub const fn with_input_limit(mut self, max_width: u32, max_height: u32) -> Self {
        self.input_size_limit = Some((max_width, max_height));
        self
    }

    /// Checks if the given dimensions are within the input size limit.
    #[must_use]
    pub fn supports_size(&self, width: u32, height: u32) -> bool {
        match self.input_size_limit {
            Some((max_w, max_h)) => width <= max_w && height <= max_h,
            None => true,
        }
    }

    /// Returns an error when the image exceeds the input size limit.
    pub fn check_size(&self, width: u32, height: u32) -> Result<(), AIError> {
        match self.input_size_limit {
            Some(max) if !self.supports_size(width, height) => Err(AIError::InputTooLarge {
                max,
                actual: (width, height),
            }),
            _ => Ok(()),
        }
    }
}

// =============================================================================
// AIProcessor Trait
// =============================================================================

/// Port for AI-based image processing.
///
/// Infrastructure adapters implement this trait using ONNX Runtime.
///
/// # Example
///
/// ```ignore
/// use iced_lumen::application::port::ai::{AIProcessor, AIError};
///
/// fn brighten(processor: &impl AIProcessor, image: &DynamicImage) -> Result<DynamicImage, AIError> {
///     if !processor.is_ready() {
///         return Err(AIError::ModelNotReady);
///     }
///     processor.capabilities().check_size(image.width(), image.height())?;
///     processor.process(image)
/// }
/// ```
pub trait AIProcessor: Send + Sync {
    /// Processes an image through the AI model.
    ///
    /// The returned image has the spatial size the model emits, which may
    /// differ from the input.
    ///
    /// # Errors
    ///
    /// Returns an [`AIError`] if:
    /// - The model is not ready
    /// - The input is too large
    /// - Processing fails
    fn process(&self, image: &DynamicImage) -> Result<DynamicImage, AIError>;

    /// Checks if the model is ready for processing.
    fn is_ready(&self) -> bool;

    /// Returns the capabilities of this processor.
    fn capabilities(&self) -> ProcessorCapabilities;
}
