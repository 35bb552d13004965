// SPDX-License-Identifier: MPL-2.0
//! Port definitions (traits) for dependency inversion.
//!
//! # Available Ports
//!
//! - [`ai`]: AI processing capabilities (low-light enhancement)
//!
//! # Design Notes
//!
//! - Traits are `Send + Sync` so adapters can be shared with background tasks
//! - No `async fn` - use Iced's `Task` return type pattern in callers

pub mod ai;

pub use ai::{AIError, AIProcessor, ProcessorCapabilities};
