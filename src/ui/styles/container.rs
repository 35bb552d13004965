// SPDX-License-Identifier: MPL-2.0
//! Container styles.

use crate::ui::design_tokens::{opacity, palette, radius};
use iced::gradient::{self, Gradient};
use iced::widget::container;
use iced::{Background, Border, Color, Degrees, Theme};

/// Diagonal gradient filling the whole window.
pub fn background(_theme: &Theme) -> container::Style {
    let gradient = gradient::Linear::new(Degrees(135.0))
        .add_stop(0.0, palette::BACKGROUND_START)
        .add_stop(1.0, palette::BACKGROUND_END);

    container::Style {
        background: Some(Background::Gradient(Gradient::Linear(gradient))),
        text_color: Some(palette::WHITE),
        ..Default::default()
    }
}

/// Frosted box framing the original and enhanced pictures.
pub fn image_box(_theme: &Theme) -> container::Style {
    container::Style {
        background: Some(Background::Color(glass())),
        border: Border {
            radius: radius::XL.into(),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Outlined drop zone around the upload button.
pub fn upload_area(_theme: &Theme) -> container::Style {
    container::Style {
        background: Some(Background::Color(glass())),
        border: Border {
            color: Color {
                a: opacity::OUTLINE,
                ..palette::WHITE
            },
            width: 2.0,
            radius: radius::LG.into(),
        },
        ..Default::default()
    }
}

fn glass() -> Color {
    Color {
        a: opacity::GLASS,
        ..palette::WHITE
    }
}
