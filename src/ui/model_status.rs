// SPDX-License-Identifier: MPL-2.0
//! One-line status of the enhancement model.

use crate::i18n::fluent::I18n;
use crate::media::ModelStatus;
use crate::ui::design_tokens::{palette, typography};
use fluent_bundle::FluentValue;
use iced::widget::Text;
use iced::{Color, Element};

/// Returns the localized status text.
pub fn label(status: &ModelStatus, i18n: &I18n) -> String {
    match status {
        ModelStatus::NotDownloaded => i18n.tr("model-status-not-downloaded"),
        ModelStatus::Downloading { progress } => {
            let percent = (progress.clamp(0.0, 1.0) * 100.0).round() as u32;
            i18n.tr_with_args(
                "model-status-downloading",
                &[("percent", FluentValue::from(percent))],
            )
        }
        ModelStatus::Extracting => i18n.tr("model-status-extracting"),
        ModelStatus::Loading => i18n.tr("model-status-loading"),
        ModelStatus::Ready => i18n.tr("model-status-ready"),
        ModelStatus::Error(reason) => i18n.tr_with_args(
            "model-status-error",
            &[("reason", FluentValue::from(reason.as_str()))],
        ),
    }
}

fn color(status: &ModelStatus) -> Color {
    match status {
        ModelStatus::Ready => palette::SUCCESS_500,
        ModelStatus::Error(_) => palette::ERROR_500,
        ModelStatus::NotDownloaded => palette::WARNING_500,
        _ => palette::WHITE,
    }
}

pub fn view<'a, Message: 'a>(status: &ModelStatus, i18n: &I18n) -> Element<'a, Message> {
    Text::new(label(status, i18n))
        .size(typography::BODY)
        .color(color(status))
        .into()
}
