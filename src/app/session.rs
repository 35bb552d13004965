// SPDX-License-Identifier: MPL-2.0
//! Per-window enhancement session.
//!
//! The session moves through `Idle → ImageUploaded → Enhancing → Enhanced →
//! Downloaded`. Rejected transitions leave the current state untouched.

use crate::media::ImageData;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// The model output, kept both for display and as the PNG bytes offered for download.
#[derive(Debug, Clone)]
pub struct EnhancedImage {
    pub image: ImageData,
    pub png: Arc<Vec<u8>>,
}

#[derive(Debug, Clone, Default)]
pub enum Session {
    #[default]
    Idle,
    ImageUploaded {
        original: ImageData,
    },
    Enhancing {
        original: ImageData,
    },
    Enhanced {
        original: ImageData,
        enhanced: EnhancedImage,
    },
    Downloaded {
        original: ImageData,
        enhanced: EnhancedImage,
        path: PathBuf,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    InvalidTransition {
        from: &'static str,
        action: &'static str,
    },
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::InvalidTransition { from, action } => {
                write!(f, "cannot {action} while {from}")
            }
        }
    }
}

impl std::error::Error for SessionError {}

impl Session {
    pub fn state_name(&self) -> &'static str {
        match self {
            Session::Idle => "idle",
            Session::ImageUploaded { .. } => "image uploaded",
            Session::Enhancing { .. } => "enhancing",
            Session::Enhanced { .. } => "enhanced",
            Session::Downloaded { .. } => "downloaded",
        }
    }

    pub fn original(&self) -> Option<&ImageData> {
        match self {
            Session::Idle => None,
            Session::ImageUploaded { original }
            | Session::Enhancing { original }
            | Session::Enhanced { original, .. }
            | Session::Downloaded { original, .. } => Some(original),
        }
    }

    pub fn enhanced(&self) -> Option<&EnhancedImage> {
        match self {
            Session::Enhanced { enhanced, .. } | Session::Downloaded { enhanced, .. } => {
                Some(enhanced)
            }
            _ => None,
        }
    }

    /// Path of the last successful download, if any.
    pub fn downloaded_to(&self) -> Option<&Path> {
        match self {
            Session::Downloaded { path, .. } => Some(path),
            _ => None,
        }
    }

    pub fn is_enhancing(&self) -> bool {
        matches!(self, Session::Enhancing { .. })
    }

    pub fn can_enhance(&self) -> bool {
        matches!(
            self,
            Session::ImageUploaded { .. } | Session::Enhanced { .. } | Session::Downloaded { .. }
        )
    }

    /// Replaces the current image. Any previous result is discarded.
    pub fn upload(&mut self, image: ImageData) -> Result<(), SessionError> {
        if self.is_enhancing() {
            return Err(self.reject("upload"));
        }
        *self = Session::ImageUploaded { original: image };
        Ok(())
    }

    /// Marks inference as started and returns the image to enhance.
    pub fn begin_enhance(&mut self) -> Result<ImageData, SessionError> {
        if !self.can_enhance() {
            return Err(self.reject("enhance"));
        }
        let original = self
            .original()
            .cloned()
            .ok_or_else(|| self.reject("enhance"))?;
        *self = Session::Enhancing {
            original: original.clone(),
        };
        Ok(original)
    }

    /// Records the inference outcome. On failure the upload is kept so the
    /// user can retry.
    pub fn finish_enhance<E>(&mut self, result: Result<EnhancedImage, E>) -> Result<(), SessionError> {
        let original = match &*self {
            Session::Enhancing { original } => original.clone(),
            _ => return Err(self.reject("finish enhancement")),
        };
        *self = match result {
            Ok(enhanced) => Session::Enhanced { original, enhanced },
            Err(_) => Session::ImageUploaded { original },
        };
        Ok(())
    }

    /// Records a successful download.
    pub fn mark_downloaded(&mut self, path: PathBuf) -> Result<(), SessionError> {
        let (original, enhanced) = match &*self {
            Session::Enhanced { original, enhanced }
            | Session::Downloaded {
                original, enhanced, ..
            } => (original.clone(), enhanced.clone()),
            _ => return Err(self.reject("download")),
        };
        *self = Session::Downloaded {
            original,
            enhanced,
            path,
        };
        Ok(())
    }

    fn reject(&self, action: &'static str) -> SessionError {
        tracing::debug!(state = self.state_name(), action, "rejected session transition");
        SessionError::InvalidTransition {
            from: self.state_name(),
            action,
        }
    }
}
