// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! # Categories
//!
//! - **Model**: where the pretrained model is fetched from and unpacked to
//! - **Tensor**: how images are laid out for the model
//! - **Output**: naming of the downloadable result

// ==========================================================================
// Model Defaults
// ==========================================================================

/// Share link of the pretrained low-light enhancement model archive.
pub const DEFAULT_MODEL_URL: &str =
    "https://drive.google.com/file/d/11Yq_mNMNVOGR9O0sHtBWZAPTNPX8UcnE/view?usp=sharing";

/// Directory created by unpacking the model archive.
pub const DEFAULT_MODEL_DIRECTORY: &str = "mirnet_saved";

/// File name of the downloaded archive inside the data directory.
pub const DEFAULT_MODEL_ARCHIVE: &str = "mirnet_saved.zip";

// ==========================================================================
// Tensor Defaults
// ==========================================================================

/// Default padding multiple (1 = the image is fed at its exact size).
pub const DEFAULT_PAD_MULTIPLE: u32 = 1;

/// Largest padding multiple accepted from the config file.
pub const MAX_PAD_MULTIPLE: u32 = 256;

// ==========================================================================
// Output Defaults
// ==========================================================================

/// Suggested file name for the downloaded result.
pub const DEFAULT_OUTPUT_FILE_NAME: &str = "enhanced.png";
