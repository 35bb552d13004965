// SPDX-License-Identifier: MPL-2.0
//! Application root state and orchestration.
//!
//! The `App` struct wires together the enhancement session, the model
//! provisioning status, localization and configuration, and translates
//! messages into side effects like dialogs, background inference or writing
//! the downloaded result.

pub mod config;
mod message;
pub mod paths;
pub mod session;
mod subscription;
mod update;
mod view;

pub use message::{Flags, Message};

use crate::i18n::fluent::I18n;
use crate::infrastructure::onnx::OnnxEnhanceProcessor;
use crate::media::model_archive::PREFERRED_MODEL_FILE;
use crate::media::ModelStatus;
use config::Config;
use iced::{window, Element, Subscription, Task, Theme};
use session::Session;
use std::fmt;
use std::path::PathBuf;

/// Transient feedback line below the model status.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Info(String),
    Error(String),
}

/// Root Iced application state.
pub struct App {
    pub i18n: I18n,
    config: Config,
    session: Session,
    model_status: ModelStatus,
    processor: OnnxEnhanceProcessor,
    /// Directory receiving the model archive; `None` if no data dir could be resolved.
    data_dir: Option<PathBuf>,
    notice: Option<Notice>,
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("session", &self.session.state_name())
            .field("model_status", &self.model_status)
            .finish()
    }
}

pub const WINDOW_DEFAULT_WIDTH: f32 = 1200.0;
pub const WINDOW_DEFAULT_HEIGHT: f32 = 800.0;
pub const MIN_WINDOW_WIDTH: f32 = 640.0;
pub const MIN_WINDOW_HEIGHT: f32 = 480.0;

pub fn window_settings() -> window::Settings {
    window::Settings {
        size: iced::Size::new(WINDOW_DEFAULT_WIDTH, WINDOW_DEFAULT_HEIGHT),
        min_size: Some(iced::Size::new(MIN_WINDOW_WIDTH, MIN_WINDOW_HEIGHT)),
        ..window::Settings::default()
    }
}

/// Entry point used by `main.rs` to launch the Iced application loop.
pub fn run(flags: Flags) -> iced::Result {
    use std::cell::RefCell;

    // iced requires an `Fn` boot closure; the flags are consumed on first call.
    let boot_state = RefCell::new(Some(flags));
    let boot = move || {
        let flags = boot_state.borrow_mut().take().unwrap_or_default();
        App::new(flags)
    };

    iced::application(boot, App::update, App::view)
        .title(App::title)
        .theme(App::theme)
        .window(window_settings())
        .subscription(App::subscription)
        .run()
}

impl App {
    /// Builds the initial state and starts model provisioning in the
    /// background, together with the optional preload of `flags.file_path`.
    fn new(flags: Flags) -> (Self, Task<Message>) {
        let (config, config_warning) = config::load();
        let i18n = I18n::new(flags.lang.clone(), &config);
        let data_dir = paths::get_app_data_dir();

        // Placeholder until provisioning reports the actual file.
        let model_path = data_dir
            .as_ref()
            .map(|dir| config.model.source().model_dir(dir).join(PREFERRED_MODEL_FILE))
            .unwrap_or_else(|| PathBuf::from(PREFERRED_MODEL_FILE));
        let processor = OnnxEnhanceProcessor::new(
            model_path,
            config.model.tensor_options(),
            config.model.max_input_side,
        );

        let notice = config_warning.map(|key| Notice::Error(i18n.tr(&key)));

        let mut app = App {
            i18n,
            config,
            session: Session::default(),
            model_status: ModelStatus::default(),
            processor,
            data_dir,
            notice,
        };

        let provision = app.start_provisioning();
        let preload = match flags.file_path {
            Some(path) => update::load_upload(PathBuf::from(path)),
            None => Task::none(),
        };

        (app, Task::batch([provision, preload]))
    }

    fn title(&self) -> String {
        self.i18n.tr("window-title")
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }

    fn subscription(&self) -> Subscription<Message> {
        subscription::file_drops()
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        update::update(self, message)
    }

    fn view(&self) -> Element<'_, Message> {
        view::view(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_minimum_fits_inside_default() {
        let settings = window_settings();
        let min = settings.min_size.expect("min size");
        assert!(min.width <= settings.size.width);
        assert!(min.height <= settings.size.height);
    }
}
