use cosmic::iced::{Alignment, Length};
use cosmic::widget::{button, column, container, row, scrollable, text, text_input, toggler};
use cosmic::Element;

use quill::config::QuillConfig;

use crate::fl;
use crate::message::Message;

fn toggle_row<'a>(label: String, value: bool, message: Message) -> Element<'a, Message> {
    row()
        .spacing(8)
        .align_y(Alignment::Center)
        .push(text::body(label).width(Length::Fill))
        .push(toggler(value).on_toggle(move |_| message.clone()))
        .into()
}

/// `show_preview` is false when the editor surface has no preview to hide.
pub fn settings_view<'a>(
    config: &'a QuillConfig,
    vault_input: &'a str,
    show_preview: bool,
) -> Element<'a, Message> {
    let mut content = column().spacing(12);

    // --- Vault ---
    content = content.push(text::title4(fl!("settings-vault")));
    content = content.push(
        row()
            .spacing(8)
            .push(
                text_input::text_input(fl!("settings-vault-placeholder"), vault_input)
                    .on_input(Message::VaultInput)
                    .on_submit(|_| Message::ApplyVault)
                    .width(Length::Fill),
            )
            .push(button::standard(fl!("settings-vault-apply")).on_press(Message::ApplyVault)),
    );
    if config.vault_directory.is_some() {
        content = content.push(button::standard(fl!("settings-vault-rescan")).on_press(Message::RefreshVault));
    }

    // --- Editor ---
    content = content.push(text::title4(fl!("settings-editor")));
    content = content.push(toggle_row(fl!("settings-autosave"), config.autosave, Message::ToggleAutosave));
    content = content.push(toggle_row(fl!("settings-dark-mode"), config.dark_mode, Message::ToggleDarkMode));
    if show_preview {
        content = content.push(toggle_row(
            fl!("settings-preview-hidden"),
            config.preview_hidden,
            Message::TogglePreviewHidden,
        ));
    }

    // --- Debug logging ---
    content = content.push(toggle_row(
        fl!("settings-debug-logging"),
        config.debug_logging,
        Message::ToggleDebugLogging,
    ));

    container(scrollable(content.padding(16)))
        .width(Length::Fill)
        .into()
}
