// SPDX-License-Identifier: MPL-2.0
//! Uploaded picture decoding and enhanced result encoding (PNG, JPEG).

use crate::error::{Error, ImageError, Result};
use iced::widget::image;
use image_rs::{DynamicImage, ImageFormat};
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

/// File extensions accepted for upload.
pub const UPLOAD_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// A decoded picture ready to be displayed and fed to the model.
#[derive(Debug, Clone)]
pub struct ImageData {
    pub handle: image::Handle,
    pub width: u32,
    pub height: u32,
    /// Decoded pixels, shared with background inference tasks.
    image: Arc<DynamicImage>,
}

impl ImageData {
    /// Wraps a decoded image and builds its display handle.
    #[must_use]
    pub fn from_dynamic(image: DynamicImage) -> Self {
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        let handle = image::Handle::from_rgba(width, height, rgba.into_raw());
        Self {
            handle,
            width,
            height,
            image: Arc::new(image),
        }
    }

    /// Returns the decoded image.
    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    /// Returns a shared reference to the decoded image for background tasks.
    pub fn image_arc(&self) -> Arc<DynamicImage> {
        Arc::clone(&self.image)
    }
}

/// Returns `true` if the path has one of the accepted upload extensions.
pub fn is_supported_upload(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            UPLOAD_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Loads an uploaded picture and converts it to RGB.
///
/// Alpha is dropped and grayscale is expanded so the model always sees
/// three channels.
pub fn load_upload<P: AsRef<Path>>(path: P) -> Result<DynamicImage> {
    let path = path.as_ref();
    if !is_supported_upload(path) {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_string();
        return Err(ImageError::UnsupportedFormat(ext).into());
    }

    let bytes = std::fs::read(path)?;
    let decoded = image_rs::load_from_memory(&bytes)
        .map_err(|e| Error::from(ImageError::DecodeFailed(e.to_string())))?;

    tracing::debug!(
        path = %path.display(),
        width = decoded.width(),
        height = decoded.height(),
        "decoded upload"
    );

    Ok(DynamicImage::ImageRgb8(decoded.to_rgb8()))
}

/// Serializes an image to PNG bytes for download.
pub fn encode_png(image: &DynamicImage) -> Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Png)
        .map_err(|e| Error::from(ImageError::EncodeFailed(e.to_string())))?;
    Ok(buffer.into_inner())
}

/// Writes already encoded PNG bytes to the chosen destination.
pub fn write_png_bytes(bytes: &[u8], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, bytes)?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "saved enhanced image");
    Ok(())
}
