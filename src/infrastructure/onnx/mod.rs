// SPDX-License-Identifier: MPL-2.0
//! ONNX Runtime adapter implementing the [`AIProcessor`] port trait.
//!
//! The adapter wraps the shared [`EnhanceManager`], which owns model loading
//! and inference.
//!
//! [`AIProcessor`]: crate::application::port::AIProcessor
//! [`EnhanceManager`]: crate::media::enhance::EnhanceManager

mod enhance;

pub use enhance::OnnxEnhanceProcessor;
