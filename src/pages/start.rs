use cosmic::iced::{Alignment, Length};
use cosmic::widget::{button, column, container, icon, row, scrollable, text};
use cosmic::Element;

use quill::vault::VaultListing;

use crate::fl;
use crate::message::Message;

/// Landing page: the notes in the vault, or a pointer to settings when there is none.
pub fn start_view(listing: &VaultListing, has_vault: bool) -> Element<'static, Message> {
    let mut content = column().spacing(12).align_x(Alignment::Center);

    content = content.push(text::title2(fl!("start-title")));

    if !has_vault {
        content = content
            .push(text::body(fl!("start-no-vault")))
            .push(button::suggested(fl!("start-choose-vault")).on_press(Message::OpenSettings));
        return container(content.padding(32)).center_x(Length::Fill).into();
    }

    content = content.push(button::suggested(fl!("start-new-note")).on_press(Message::OpenNewNote));
    content = content.push(text::title4(fl!("start-recent")));

    if listing.is_empty() {
        content = content.push(text::body(fl!("start-empty")));
    } else {
        let mut list = column().spacing(4).max_width(600.0);
        for entry in listing.entries() {
            list = list.push(
                button::custom(
                    row()
                        .spacing(8)
                        .align_y(Alignment::Center)
                        .push(icon::from_name("text-x-generic-symbolic").size(16).icon())
                        .push(text::body(entry.display_name.clone())),
                )
                .width(Length::Fill)
                .class(cosmic::theme::Button::Text)
                .on_press(Message::SelectNote(entry.full_path.clone())),
            );
        }
        content = content.push(list);
    }

    container(scrollable(content.padding(32).width(Length::Fill)))
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}
