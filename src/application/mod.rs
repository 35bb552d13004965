// SPDX-License-Identifier: MPL-2.0
//! Application layer - Use cases and orchestration.
//!
//! - [`port`]: Trait definitions (interfaces) for dependency inversion
//!
//! # Dependency Rule
//!
//! - Infrastructure layer implements application layer ports
//! - Presentation layer (the Iced app and the headless runner) uses the ports

pub mod port;
