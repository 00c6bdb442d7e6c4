use cosmic::iced::{Alignment, Length};
use cosmic::widget::{column, container, row, text, text_editor};
use cosmic::Element;

use quill::session::DocumentSession;

use crate::fl;
use crate::message::Message;

pub fn editor_view<'a>(
    content: &'a text_editor::Content,
    session: &DocumentSession,
    autosave: bool,
) -> Element<'a, Message> {
    let mut status = row()
        .spacing(12)
        .align_y(Alignment::Center)
        .push(text::caption(session.indicator().label()));

    if let Some(saved) = session.last_saved() {
        status = status.push(
            text::caption(fl!("status-saved-at", time = saved.format("%H:%M:%S").to_string())).size(11.0),
        );
    }
    if autosave {
        status = status.push(text::caption(fl!("status-autosave")).size(11.0));
    }

    column()
        .spacing(8)
        .padding(16)
        .push(
            container(
                text_editor(content)
                    .on_action(Message::EditorAction)
                    .height(Length::Fill),
            )
            .width(Length::Fill)
            .height(Length::Fill),
        )
        .push(status)
        .into()
}
