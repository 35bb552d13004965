// SPDX-License-Identifier: MPL-2.0
//! User interface components.
//!
//! Views are generic over the caller's message type and receive the messages
//! they emit, following the Elm-style "state down, messages up" pattern.
//!
//! - [`comparison`] - Original and enhanced pictures side by side
//! - [`empty_state`] - Placeholder before the first upload
//! - [`model_status`] - One-line model provisioning status
//! - [`styles`] - Centralized styling (buttons, containers)
//! - [`design_tokens`] - Design system constants (colors, spacing, sizing)

pub mod comparison;
pub mod design_tokens;
pub mod empty_state;
pub mod model_status;
pub mod styles;
