// SPDX-License-Identifier: MPL-2.0
//! Placeholder shown until a picture is uploaded.

use crate::i18n::fluent::I18n;
use crate::ui::design_tokens::{opacity, palette, spacing, typography};
use iced::widget::{Column, Container, Text};
use iced::{alignment, Color, Element, Length};

pub fn view<'a, Message: 'a>(i18n: &I18n) -> Element<'a, Message> {
    let message = Text::new(i18n.tr("empty-state"))
        .size(typography::TITLE_SM)
        .color(palette::WHITE);

    let drop_hint = Text::new(i18n.tr("empty-state-drop-hint"))
        .size(typography::CAPTION)
        .color(Color {
            a: opacity::DISABLED,
            ..palette::WHITE
        });

    let content = Column::new()
        .spacing(spacing::XS)
        .align_x(alignment::Horizontal::Center)
        .push(message)
        .push(drop_hint);

    // Lives inside a vertical scrollable, so the height must stay shrink.
    Container::new(content)
        .padding(spacing::XL)
        .width(Length::Fill)
        .align_x(alignment::Horizontal::Center)
        .into()
}
