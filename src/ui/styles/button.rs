// SPDX-License-Identifier: MPL-2.0
//! Centralized button styles.

use crate::ui::design_tokens::{
    opacity,
    palette::{self, WHITE},
    radius, shadow,
};
use iced::widget::button;
use iced::{Background, Border, Color, Theme};

/// Pink accent button used for every action (upload, enhance, download).
pub fn accent(_theme: &Theme, status: button::Status) -> button::Style {
    let (background, shadow) = match status {
        button::Status::Hovered | button::Status::Pressed => (palette::ACCENT_HOVER, shadow::MD),
        button::Status::Active => (palette::ACCENT, shadow::NONE),
        button::Status::Disabled => (
            Color {
                a: opacity::DISABLED,
                ..palette::ACCENT
            },
            shadow::NONE,
        ),
    };

    button::Style {
        background: Some(Background::Color(background)),
        text_color: match status {
            button::Status::Disabled => palette::GRAY_200,
            _ => WHITE,
        },
        border: Border {
            color: Color::TRANSPARENT,
            width: 0.0,
            radius: radius::MD.into(),
        },
        shadow,
        snap: true,
    }
}
