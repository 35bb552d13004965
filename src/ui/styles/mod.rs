// SPDX-License-Identifier: MPL-2.0
//! Centralized styles for the enhancement window.

pub mod button;
pub mod container;

pub use button::accent as button_accent;
