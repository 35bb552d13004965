// SPDX-License-Identifier: MPL-2.0
//! Internationalization (i18n) support for the application.
//!
//! Translations are Fluent `.ftl` files embedded into the binary. The active
//! locale is chosen from the CLI, then the config file, then the OS, falling
//! back to `en-US`.

pub mod fluent;
