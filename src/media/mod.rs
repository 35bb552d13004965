// SPDX-License-Identifier: MPL-2.0
//! Media handling for the enhancement pipeline.
//!
//! - [`model_archive`]: fetching and unpacking the pretrained model
//! - [`image`]: decoding uploads and encoding the downloadable result
//! - [`enhance`]: tensor conversion and ONNX inference

pub mod enhance;
pub mod image;
pub mod model_archive;

pub use enhance::{ModelStatus, TensorLayout, TensorOptions};
pub use image::{load_upload, ImageData};
pub use model_archive::ModelSource;
