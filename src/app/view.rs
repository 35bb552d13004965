// SPDX-License-Identifier: MPL-2.0
//! View rendering for the application.

use super::{App, Message, Notice};
use crate::ui::comparison::{self, accent_button};
use crate::ui::design_tokens::{palette, sizing, spacing, typography};
use crate::ui::{empty_state, model_status, styles};
use crate::media::ModelStatus;
use iced::widget::{scrollable, Column, Container, Row, Text};
use iced::{alignment, Element, Length};

pub(super) fn view(app: &App) -> Element<'_, Message> {
    let title = Text::new(app.i18n.tr("window-title"))
        .size(typography::TITLE_XL)
        .width(Length::Fill)
        .align_x(alignment::Horizontal::Center);

    let upload = Container::new(
        Column::new()
            .spacing(spacing::XS)
            .align_x(alignment::Horizontal::Center)
            .push(accent_button(
                app.i18n.tr("button-upload"),
                (!app.session.is_enhancing()).then_some(Message::OpenFileDialog),
            ))
            .push(Text::new(app.i18n.tr("app-subtitle")).size(typography::CAPTION)),
    )
    .padding(spacing::MD)
    .width(Length::Fill)
    .align_x(alignment::Horizontal::Center)
    .style(styles::container::upload_area);

    let body: Element<'_, Message> = match app.session.original() {
        None => empty_state::view(&app.i18n),
        Some(original) => {
            let ready = app.model_status.is_ready();
            comparison::view(comparison::ViewContext {
                i18n: &app.i18n,
                original: &original.handle,
                enhanced: app.session.enhanced().map(|e| &e.image.handle),
                on_enhance: (ready && app.session.can_enhance()).then_some(Message::Enhance),
                on_download: app.session.enhanced().map(|_| Message::Download),
                busy_label: app
                    .session
                    .is_enhancing()
                    .then(|| app.i18n.tr("status-enhancing")),
            })
        }
    };

    let content = Column::new()
        .spacing(spacing::LG)
        .padding(spacing::XL)
        .max_width(sizing::CONTENT_MAX_WIDTH)
        .push(title)
        .push(upload)
        .push(status_bar(app))
        .push(body);

    Container::new(scrollable(
        Container::new(content)
            .width(Length::Fill)
            .align_x(alignment::Horizontal::Center),
    ))
    .width(Length::Fill)
    .height(Length::Fill)
    .style(styles::container::background)
    .into()
}

fn status_bar(app: &App) -> Element<'_, Message> {
    let mut row = Row::new()
        .spacing(spacing::SM)
        .align_y(alignment::Vertical::Center)
        .push(model_status::view(&app.model_status, &app.i18n));

    if matches!(app.model_status, ModelStatus::Error(_)) {
        row = row.push(accent_button(
            app.i18n.tr("button-retry"),
            Some(Message::RetryProvision),
        ));
    }

    let mut column = Column::new().spacing(spacing::XXS).push(row);
    if let Some(notice) = &app.notice {
        let (text, color) = match notice {
            Notice::Info(text) => (text, palette::SUCCESS_500),
            Notice::Error(text) => (text, palette::ERROR_500),
        };
        column = column.push(Text::new(text.clone()).size(typography::BODY).color(color));
    }
    column.into()
}
