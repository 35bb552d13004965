// SPDX-License-Identifier: MPL-2.0
//! `iced_lumen` brightens low-light photographs with a pretrained enhancement
//! model, built with the Iced GUI framework.
//!
//! The model archive is fetched and unpacked on first start, then loaded once
//! through ONNX Runtime. Uploaded pictures are shown next to their enhanced
//! version, which can be saved as PNG.

#![doc(html_root_url = "https://docs.rs/iced_lumen/0.1.0")]

pub mod app;
pub mod application;
pub mod error;
pub mod headless;
pub mod i18n;
pub mod infrastructure;
pub mod media;
pub mod ui;
