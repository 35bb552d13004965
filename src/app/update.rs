// SPDX-License-Identifier: MPL-2.0
//! Message handling for the application.
//!
//! Long-running work never runs on the UI thread: decoding and inference go
//! through `spawn_blocking`, provisioning runs on a spawned task whose
//! progress is streamed back as messages.

use super::session::EnhancedImage;
use super::{App, Message, Notice};
use crate::application::port::AIProcessor;
use crate::error::Error;
use crate::media::image::{self as media_image, ImageData, UPLOAD_EXTENSIONS};
use crate::media::model_archive::{self, ProvisionStage};
use crate::media::ModelStatus;
use fluent_bundle::FluentValue;
use iced::futures::channel::{mpsc, oneshot};
use iced::futures::{stream, Stream, StreamExt};
use iced::Task;
use std::path::PathBuf;
use std::sync::Arc;

pub(super) fn update(app: &mut App, message: Message) -> Task<Message> {
    match message {
        Message::OpenFileDialog => open_file_dialog(app),
        Message::OpenFileDialogResult(path) => match path {
            Some(path) => load_upload(path),
            None => Task::none(), // cancelled
        },
        Message::FileDropped(path) => {
            if !media_image::is_supported_upload(&path) {
                app.notice = Some(Notice::Error(
                    app.i18n.tr("error-image-unsupported-format"),
                ));
                return Task::none();
            }
            load_upload(path)
        }
        Message::ImageLoaded(result) => {
            match result {
                Ok(image) => match app.session.upload(image) {
                    Ok(()) => app.notice = None,
                    Err(e) => tracing::debug!(error = %e, "upload ignored"),
                },
                Err(e) => {
                    tracing::warn!(error = %e, "could not load upload");
                    app.notice = Some(Notice::Error(app.i18n.tr(e.i18n_key())));
                }
            }
            Task::none()
        }
        Message::Enhance => handle_enhance(app),
        Message::EnhanceCompleted(result) => {
            if let Err(reason) = &result {
                tracing::error!(%reason, "enhancement failed");
                app.notice = Some(Notice::Error(app.i18n.tr_with_args(
                    "error-enhance-failed",
                    &[("reason", FluentValue::from(reason.as_str()))],
                )));
            }
            if let Err(e) = app.session.finish_enhance(result) {
                tracing::debug!(error = %e, "stale enhancement result");
            }
            Task::none()
        }
        Message::Download => handle_download(app),
        Message::SaveDialogResult(path) => {
            let (Some(path), Some(enhanced)) = (path, app.session.enhanced()) else {
                return Task::none();
            };
            save_png(Arc::clone(&enhanced.png), path)
        }
        Message::SaveCompleted(result) => {
            match result {
                Ok(path) => {
                    app.notice = Some(Notice::Info(app.i18n.tr_with_args(
                        "status-saved",
                        &[("path", FluentValue::from(path.display().to_string()))],
                    )));
                    if let Err(e) = app.session.mark_downloaded(path) {
                        tracing::debug!(error = %e, "download finished after session changed");
                    }
                }
                Err(reason) => {
                    app.notice = Some(Notice::Error(app.i18n.tr_with_args(
                        "error-save-failed",
                        &[("reason", FluentValue::from(reason.as_str()))],
                    )));
                }
            }
            Task::none()
        }
        Message::ProvisionProgress(stage) => {
            app.model_status = match stage {
                ProvisionStage::Downloading(progress) => ModelStatus::Downloading { progress },
                ProvisionStage::Extracting => ModelStatus::Extracting,
            };
            Task::none()
        }
        Message::ProvisionCompleted(result) => match result {
            Ok(model_path) => {
                tracing::info!(path = %model_path.display(), "model provisioned");
                if let Err(e) = app.processor.set_model_path(model_path) {
                    app.model_status = ModelStatus::Error(e.to_string());
                    return Task::none();
                }
                app.model_status = ModelStatus::Loading;
                load_model(app)
            }
            Err(reason) => {
                tracing::error!(%reason, "model provisioning failed");
                app.model_status = ModelStatus::Error(reason);
                Task::none()
            }
        },
        Message::ModelLoaded(result) => {
            app.model_status = match result {
                Ok(()) => ModelStatus::Ready,
                Err(reason) => {
                    tracing::error!(%reason, "model failed to load");
                    app.discard_model();
                    ModelStatus::Error(reason)
                }
            };
            Task::none()
        }
        Message::RetryProvision => {
            if app.model_status.is_busy() || app.model_status.is_ready() {
                return Task::none();
            }
            app.start_provisioning()
        }
    }
}

impl App {
    /// Ensures the model is present in the data directory, downloading and
    /// unpacking it if needed, and streams progress back to the UI.
    pub(super) fn start_provisioning(&mut self) -> Task<Message> {
        let Some(data_dir) = self.data_dir.clone() else {
            self.model_status =
                ModelStatus::Error("No data directory available for the model".to_string());
            return Task::none();
        };
        let source = self.config.model.source();

        if let Some(model_path) = model_archive::find_model_file(&source.model_dir(&data_dir)) {
            return Task::done(Message::ProvisionCompleted(Ok(model_path)));
        }

        self.model_status = ModelStatus::Downloading { progress: 0.0 };

        let (progress_tx, progress_rx) = mpsc::channel::<ProvisionStage>(100);
        let (result_tx, result_rx) = oneshot::channel::<Result<PathBuf, String>>();

        tokio::spawn(async move {
            let mut progress_tx = progress_tx;
            let result = model_archive::provision(&source, &data_dir, |stage| {
                let _ = progress_tx.try_send(stage);
            })
            .await;

            let _ = result_tx.send(result.map_err(|e| e.to_string()));
            // progress_tx is dropped here, closing the channel
        });

        Task::stream(provision_messages(progress_rx, result_rx))
    }

    /// Deletes a model that could not be loaded, so a retry fetches it again.
    fn discard_model(&self) {
        let Some(data_dir) = &self.data_dir else {
            return;
        };
        if let Err(e) = model_archive::discard_model(&self.config.model.source(), data_dir) {
            tracing::warn!(error = %e, "could not remove unusable model");
        }
    }
}

enum ProvisionPhase {
    ReceivingProgress {
        progress_rx: mpsc::Receiver<ProvisionStage>,
        result_rx: oneshot::Receiver<Result<PathBuf, String>>,
    },
    Completed,
}

/// Turns provisioning progress into messages, ending with the final result.
fn provision_messages(
    progress_rx: mpsc::Receiver<ProvisionStage>,
    result_rx: oneshot::Receiver<Result<PathBuf, String>>,
) -> impl Stream<Item = Message> {
    stream::unfold(
        ProvisionPhase::ReceivingProgress {
            progress_rx,
            result_rx,
        },
        |phase| async move {
            match phase {
                ProvisionPhase::ReceivingProgress {
                    mut progress_rx,
                    result_rx,
                } => match progress_rx.next().await {
                    Some(stage) => Some((
                        Message::ProvisionProgress(stage),
                        ProvisionPhase::ReceivingProgress {
                            progress_rx,
                            result_rx,
                        },
                    )),
                    // Channel closed: the task is done, successfully or not.
                    None => {
                        let result = result_rx
                            .await
                            .unwrap_or_else(|_| Err("Provisioning task cancelled".to_string()));
                        Some((Message::ProvisionCompleted(result), ProvisionPhase::Completed))
                    }
                },
                ProvisionPhase::Completed => None,
            }
        },
    )
}

/// Creates the ONNX session off the UI thread.
fn load_model(app: &App) -> Task<Message> {
    let processor = app.processor.clone();
    Task::perform(
        async move {
            tokio::task::spawn_blocking(move || processor.load())
                .await
                .map_err(|e| e.to_string())?
                .map_err(|e| e.to_string())
        },
        Message::ModelLoaded,
    )
}

fn open_file_dialog(app: &App) -> Task<Message> {
    let title = app.i18n.tr("dialog-upload-title");
    let filter = app.i18n.tr("dialog-filter-images");
    Task::perform(
        async move {
            rfd::AsyncFileDialog::new()
                .set_title(&title)
                .add_filter(&filter, UPLOAD_EXTENSIONS)
                .pick_file()
                .await
                .map(|h| h.path().to_path_buf())
        },
        Message::OpenFileDialogResult,
    )
}

/// Decodes an uploaded picture in the background.
pub(super) fn load_upload(path: PathBuf) -> Task<Message> {
    Task::perform(
        async move {
            tokio::task::spawn_blocking(move || {
                media_image::load_upload(&path).map(ImageData::from_dynamic)
            })
            .await
            .map_err(|e| Error::Io(e.to_string()))?
        },
        Message::ImageLoaded,
    )
}

fn handle_enhance(app: &mut App) -> Task<Message> {
    if !app.model_status.is_ready() {
        return Task::none();
    }
    let original = match app.session.begin_enhance() {
        Ok(original) => original,
        Err(e) => {
            tracing::debug!(error = %e, "enhance ignored");
            return Task::none();
        }
    };
    app.notice = None;

    let processor = app.processor.clone();
    let image = original.image_arc();
    Task::perform(
        async move {
            tokio::task::spawn_blocking(move || {
                let started = std::time::Instant::now();
                let output = processor.process(&image).map_err(|e| e.to_string())?;
                let png = media_image::encode_png(&output).map_err(|e| e.to_string())?;
                tracing::info!(
                    width = output.width(),
                    height = output.height(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "image enhanced"
                );
                Ok::<_, String>(EnhancedImage {
                    image: ImageData::from_dynamic(output),
                    png: Arc::new(png),
                })
            })
            .await
            .map_err(|e| e.to_string())?
        },
        Message::EnhanceCompleted,
    )
}

fn handle_download(app: &App) -> Task<Message> {
    if app.session.enhanced().is_none() {
        return Task::none();
    }
    let title = app.i18n.tr("dialog-download-title");
    let filter = app.i18n.tr("dialog-filter-png");
    let file_name = app.config.output.file_name.clone();
    Task::perform(
        async move {
            rfd::AsyncFileDialog::new()
                .set_title(&title)
                .set_file_name(&file_name)
                .add_filter(&filter, &["png"])
                .save_file()
                .await
                .map(|h| h.path().to_path_buf())
        },
        Message::SaveDialogResult,
    )
}

fn save_png(png: Arc<Vec<u8>>, path: PathBuf) -> Task<Message> {
    Task::perform(
        async move {
            tokio::task::spawn_blocking(move || {
                media_image::write_png_bytes(&png, &path)
                    .map(|()| path)
                    .map_err(|e| e.to_string())
            })
            .await
            .map_err(|e| e.to_string())?
        },
        Message::SaveCompleted,
    )
}
