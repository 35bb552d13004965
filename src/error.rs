// SPDX-License-Identifier: MPL-2.0
use std::fmt;

#[derive(Debug, Clone)]
pub enum Error {
    Io(String),
    Config(String),
    Image(ImageError),
    /// Provisioning, loading or running the enhancement model failed.
    Model(String),
}

/// Errors raised while reading an uploaded picture or writing the result.
/// Used to provide user-friendly, localized error messages.
#[derive(Debug, Clone)]
pub enum ImageError {
    /// The file extension is not one of the accepted upload formats.
    UnsupportedFormat(String),

    /// The file could not be decoded as an image.
    DecodeFailed(String),

    /// The enhanced image could not be encoded.
    EncodeFailed(String),
}

impl ImageError {
    /// Returns the i18n message key for this error type.
    pub fn i18n_key(&self) -> &'static str {
        match self {
            ImageError::UnsupportedFormat(_) => "error-image-unsupported-format",
            ImageError::DecodeFailed(_) => "error-image-decode",
            ImageError::EncodeFailed(_) => "error-image-encode",
        }
    }
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageError::UnsupportedFormat(ext) => write!(f, "Unsupported image format: {ext}"),
            ImageError::DecodeFailed(msg) => write!(f, "Failed to decode image: {msg}"),
            ImageError::EncodeFailed(msg) => write!(f, "Failed to encode image: {msg}"),
        }
    }
}

impl Error {
    /// Returns the i18n message key shown to the user for this error.
    pub fn i18n_key(&self) -> &'static str {
        match self {
            Error::Io(_) => "error-io",
            Error::Config(_) => "error-config",
            Error::Image(e) => e.i18n_key(),
            Error::Model(_) => "error-model",
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O Error: {}", e),
            Error::Config(e) => write!(f, "Config Error: {}", e),
            Error::Image(e) => write!(f, "Image Error: {}", e),
            Error::Model(e) => write!(f, "Model Error: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<ImageError> for Error {
    fn from(err: ImageError) -> Self {
        Error::Image(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<crate::media::model_archive::ArchiveError> for Error {
    fn from(err: crate::media::model_archive::ArchiveError) -> Self {
        Error::Model(err.to_string())
    }
}

impl From<crate::application::port::AIError> for Error {
    fn from(err: crate::application::port::AIError) -> Self {
        Error::Model(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
