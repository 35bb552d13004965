// SPDX-License-Identifier: MPL-2.0
//! Infrastructure layer adapters.
//!
//! This module contains concrete implementations of the port traits defined in
//! `application::port`.
//!
//! - [`onnx`]: low-light enhancement via ONNX Runtime (implements [`AIProcessor`])
//!
//! [`AIProcessor`]: crate::application::port::AIProcessor

pub mod onnx;

pub use onnx::OnnxEnhanceProcessor;
