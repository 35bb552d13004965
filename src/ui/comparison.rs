// SPDX-License-Identifier: MPL-2.0
//! Side-by-side view of the uploaded picture and its enhanced version.
//!
//! The left column shows the original. The right column holds the enhance
//! button and, once available, the result with its download button.

use crate::i18n::fluent::I18n;
use crate::ui::design_tokens::{sizing, spacing, typography};
use crate::ui::styles;
use iced::widget::{button, image, Column, Container, Row, Text};
use iced::{alignment, ContentFit, Element, Length};

/// Data needed to render both columns.
pub struct ViewContext<'a, Message> {
    pub i18n: &'a I18n,
    pub original: &'a image::Handle,
    pub enhanced: Option<&'a image::Handle>,
    /// Message emitted by the enhance button; `None` disables it.
    pub on_enhance: Option<Message>,
    /// Message emitted by the download button; `None` disables it.
    pub on_download: Option<Message>,
    /// Status shown under the enhance button while inference runs.
    pub busy_label: Option<String>,
}

pub fn view<'a, Message: Clone + 'a>(ctx: ViewContext<'a, Message>) -> Element<'a, Message> {
    let original_column = Column::new()
        .spacing(spacing::SM)
        .width(Length::FillPortion(1))
        .align_x(alignment::Horizontal::Center)
        .push(heading(ctx.i18n.tr("heading-original")))
        .push(image_box(ctx.original));

    let mut enhanced_column = Column::new()
        .spacing(spacing::SM)
        .width(Length::FillPortion(1))
        .align_x(alignment::Horizontal::Center)
        .push(heading(ctx.i18n.tr("heading-enhanced")))
        .push(accent_button(ctx.i18n.tr("button-enhance"), ctx.on_enhance));

    if let Some(label) = ctx.busy_label {
        enhanced_column = enhanced_column.push(Text::new(label).size(typography::BODY));
    }

    if let Some(handle) = ctx.enhanced {
        enhanced_column = enhanced_column
            .push(image_box(handle))
            .push(accent_button(
                format!("⬇ {}", ctx.i18n.tr("button-download")),
                ctx.on_download,
            ));
    }

    Row::new()
        .spacing(spacing::LG)
        .width(Length::Fill)
        .push(original_column)
        .push(enhanced_column)
        .into()
}

/// Accent button shared by the upload, enhance and download actions.
pub fn accent_button<'a, Message: Clone + 'a>(
    label: String,
    on_press: Option<Message>,
) -> Element<'a, Message> {
    button(Text::new(label).size(typography::BUTTON))
        .padding([sizing::BUTTON_PADDING_Y, sizing::BUTTON_PADDING_X])
        .style(styles::button::accent)
        .on_press_maybe(on_press)
        .into()
}

fn heading<'a, Message: 'a>(label: String) -> Element<'a, Message> {
    Text::new(label)
        .size(typography::TITLE_SM)
        .width(Length::Fill)
        .align_x(alignment::Horizontal::Center)
        .into()
}

fn image_box<'a, Message: 'a>(handle: &image::Handle) -> Element<'a, Message> {
    Container::new(
        image(handle.clone())
            .content_fit(ContentFit::Contain)
            .width(Length::Fill),
    )
    .padding(spacing::LG)
    .width(Length::Fill)
    .style(styles::container::image_box)
    .into()
}
