use std::path::{Path, PathBuf};

use cosmic::app::{Core, Task as CosmicTask};
use cosmic::iced::{Length, Subscription, window};
use cosmic::widget::{self, button, icon, nav_bar, row, text_editor, text_input};
use cosmic::{Application, ApplicationExt, Element, executor};

use quill::config::QuillConfig;
use quill::coordinator::{Coordinator, Navigation, Prompt, Step, UnsavedChoice};
use quill::editor::{BufferSurface, EditorSurface, join_lines};
use quill::error::{Error, Result};
use quill::vault::VaultListing;

use crate::fl;
use crate::message::{Message, NoteDialog, Page};
use crate::pages;

pub struct Flags {
    pub config: QuillConfig,
    pub config_path: Option<PathBuf>,
}

pub struct Quill {
    core: Core,
    nav_model: nav_bar::Model,
    config: QuillConfig,
    config_path: Option<PathBuf>,
    page: Page,

    coordinator: Coordinator<BufferSurface>,
    /// Widget state for the native editor. Mirrors the coordinator's surface.
    editor: text_editor::Content,
    listing: VaultListing,

    // UI state
    vault_input: String,
    save_as_input: String,
    dialog: Option<NoteDialog>,
    /// Quit was confirmed but writes are still running.
    quitting: bool,
}

impl Application for Quill {
    type Executor = executor::Default;
    type Flags = Flags;
    type Message = Message;

    const APP_ID: &'static str = "dev.quill.app";

    fn core(&self) -> &Core {
        &self.core
    }

    fn core_mut(&mut self) -> &mut Core {
        &mut self.core
    }

    fn init(core: Core, flags: Self::Flags) -> (Self, CosmicTask<Self::Message>) {
        let config = flags.config;
        let coordinator = Coordinator::new(BufferSurface::new(), config.autosave);
        coordinator.surface().set_dark_mode(config.dark_mode);
        coordinator.surface().set_preview_visible(!config.preview_hidden);

        let mut app = Self {
            core,
            nav_model: nav_bar::Model::default(),
            vault_input: config
                .vault_directory
                .as_ref()
                .map(|d| d.to_string_lossy().into_owned())
                .unwrap_or_default(),
            config,
            config_path: flags.config_path,
            page: Page::Start,
            coordinator,
            editor: text_editor::Content::new(),
            listing: VaultListing::default(),
            save_as_input: String::new(),
            dialog: None,
            quitting: false,
        };
        app.rebuild_vault();

        if let Some(last) = app.config.restorable_last_file().map(Path::to_path_buf) {
            log::info!("Restoring {}", last.display());
            let result = app.coordinator.open_file(last);
            app.handle_step(result);
            app.sync_editor();
        }

        let theme = theme_task(app.config.dark_mode);
        let title = app.update_title();
        (app, CosmicTask::batch(vec![theme, title]))
    }

    fn nav_model(&self) -> Option<&nav_bar::Model> {
        Some(&self.nav_model)
    }

    fn on_nav_select(&mut self, id: nav_bar::Id) -> CosmicTask<Message> {
        match self.nav_model.data::<PathBuf>(id).cloned() {
            Some(path) => self.update(Message::SelectNote(path)),
            None => CosmicTask::none(),
        }
    }

    fn header_end(&self) -> Vec<Element<'_, Message>> {
        let has_note = !self.coordinator.session().is_untitled();
        let mut header_row = row().spacing(4).push(
            button::icon(icon::from_name("document-new-symbolic")).on_press(Message::OpenNewNote),
        );

        if self.page == Page::Editor {
            header_row = header_row
                .push(button::icon(icon::from_name("document-save-symbolic")).on_press(Message::Save))
                .push(button::icon(icon::from_name("document-save-as-symbolic")).on_press(Message::SaveAs));
        }
        if has_note {
            header_row = header_row
                .push(button::icon(icon::from_name("document-edit-symbolic")).on_press(Message::StartRename))
                .push(button::icon(icon::from_name("edit-delete-symbolic")).on_press(Message::StartDelete))
                .push(button::icon(icon::from_name("window-close-symbolic")).on_press(Message::CloseNote));
        }

        let settings = if self.page == Page::Settings {
            Message::CloseSettings
        } else {
            Message::OpenSettings
        };
        header_row = header_row.push(button::icon(icon::from_name("emblem-system-symbolic")).on_press(settings));

        vec![header_row.into()]
    }

    fn update(&mut self, message: Message) -> CosmicTask<Message> {
        let task = match message {
            // --- Vault ---
            Message::SelectNote(path) => {
                if self.coordinator.session().file_path() == Some(path.as_path()) {
                    self.page = Page::Editor;
                    CosmicTask::none()
                } else {
                    let result = self.coordinator.open_file(path);
                    self.handle_step(result);
                    CosmicTask::none()
                }
            }

            Message::RefreshVault => {
                self.rebuild_vault();
                CosmicTask::none()
            }

            Message::VaultInput(value) => {
                self.vault_input = value;
                CosmicTask::none()
            }

            Message::ApplyVault => {
                let dir = PathBuf::from(self.vault_input.trim());
                if dir.is_dir() {
                    log::info!("Vault directory set to {}", dir.display());
                    self.config.vault_directory = Some(dir);
                    self.rebuild_vault();
                } else {
                    self.dialog = Some(NoteDialog::Error(fl!(
                        "vault-not-a-directory",
                        path = dir.display().to_string()
                    )));
                }
                CosmicTask::none()
            }

            // --- Note management ---
            Message::OpenNewNote => {
                if self.config.vault_directory.is_none() {
                    self.show_error(&Error::NoVault);
                } else {
                    self.dialog = Some(NoteDialog::NewNote { input: String::new() });
                }
                CosmicTask::none()
            }

            Message::NewNoteInput(value) => {
                if let Some(NoteDialog::NewNote { ref mut input }) = self.dialog {
                    *input = value;
                }
                CosmicTask::none()
            }

            Message::ConfirmNewNote => {
                let Some(NoteDialog::NewNote { input }) = self.dialog.take() else {
                    return CosmicTask::none();
                };
                let result = self
                    .coordinator
                    .new_note(self.config.vault_directory.as_deref(), input.trim());
                self.rebuild_vault();
                self.handle_step(result);
                CosmicTask::none()
            }

            Message::StartRename => {
                match self.coordinator.session().file_path() {
                    Some(from) => {
                        let input = from
                            .file_stem()
                            .map(|s| s.to_string_lossy().into_owned())
                            .unwrap_or_default();
                        self.dialog = Some(NoteDialog::Rename {
                            from: from.to_path_buf(),
                            input,
                        });
                    }
                    None => self.show_error(&Error::Untitled),
                }
                CosmicTask::none()
            }

            Message::RenameInput(value) => {
                if let Some(NoteDialog::Rename { ref mut input, .. }) = self.dialog {
                    *input = value;
                }
                CosmicTask::none()
            }

            Message::ConfirmRename => {
                let Some(NoteDialog::Rename { from, input }) = self.dialog.take() else {
                    return CosmicTask::none();
                };
                let result = match self.config.vault_directory.clone() {
                    Some(vault) => self.coordinator.rename(&vault, &from, input.trim()),
                    None => Err(Error::NoVault),
                };
                match result {
                    Ok(to) => log::info!("Renamed {} to {}", from.display(), to.display()),
                    Err(e) => self.show_error(&e),
                }
                self.rebuild_vault();
                CosmicTask::none()
            }

            Message::StartDelete => {
                match self.coordinator.session().file_path() {
                    Some(path) => self.dialog = Some(NoteDialog::ConfirmDelete(path.to_path_buf())),
                    None => self.show_error(&Error::Untitled),
                }
                CosmicTask::none()
            }

            Message::ConfirmDelete => {
                if let Some(NoteDialog::ConfirmDelete(path)) = self.dialog.take() {
                    match self.coordinator.delete(&path) {
                        Ok(()) => log::info!("Deleted {}", path.display()),
                        Err(e) => self.show_error(&e),
                    }
                    self.rebuild_vault();
                }
                CosmicTask::none()
            }

            Message::CloseDialog => {
                self.dialog = None;
                CosmicTask::none()
            }

            // --- Editor ---
            Message::EditorAction(action) => {
                let is_edit = action.is_edit();
                self.editor.perform(action);
                if is_edit {
                    let lines = self.editor.lines().map(|line| line.to_string());
                    self.coordinator.surface().update(join_lines(lines));
                    self.coordinator.mark_dirty();
                }
                CosmicTask::none()
            }

            Message::Save => {
                let result = self.coordinator.save();
                self.handle_step(result);
                CosmicTask::none()
            }

            Message::SaveAs => {
                let result = self.coordinator.request_save_as();
                self.handle_step(result);
                CosmicTask::none()
            }

            Message::SaveAsInput(value) => {
                self.save_as_input = value;
                CosmicTask::none()
            }

            Message::ConfirmSaveAs => {
                let result = self
                    .save_as_target()
                    .and_then(|path| self.coordinator.save_as(path));
                self.handle_step(result);
                CosmicTask::none()
            }

            Message::CancelSaveAs => {
                let result = self.coordinator.cancel_save_as();
                self.handle_step(result);
                CosmicTask::none()
            }

            Message::CloseNote => {
                let result = self.coordinator.confirm_safe_to_navigate(Navigation::CloseNote);
                self.handle_step(result);
                CosmicTask::none()
            }

            Message::UnsavedChoice(choice) => {
                let result = self.coordinator.resolve_unsaved(choice);
                self.handle_step(result);
                CosmicTask::none()
            }

            // --- Persistence ---
            Message::AutosaveTick => {
                self.coordinator.on_timer_tick();
                CosmicTask::none()
            }

            Message::Persisted(outcome) => {
                let target = outcome.target.clone();
                match self.coordinator.complete_persist(outcome) {
                    Ok(()) => {
                        if !self.listing.contains(&target) && target.parent() == self.config.vault_directory.as_deref() {
                            self.rebuild_vault();
                        }
                        if self.quitting && !self.coordinator.is_persisting() {
                            self.exit();
                        }
                    }
                    Err(e) => {
                        // Stay open so the user can retry
                        self.quitting = false;
                        self.show_error(&e);
                    }
                }
                CosmicTask::none()
            }

            // --- Settings ---
            Message::OpenSettings => {
                self.page = Page::Settings;
                CosmicTask::none()
            }

            Message::CloseSettings => {
                self.page = self.content_page();
                CosmicTask::none()
            }

            Message::ToggleAutosave => {
                self.config.autosave = !self.config.autosave;
                self.coordinator.toggle_autosave(self.config.autosave);
                CosmicTask::none()
            }

            Message::ToggleDarkMode => {
                self.config.dark_mode = !self.config.dark_mode;
                self.coordinator.surface().set_dark_mode(self.config.dark_mode);
                theme_task(self.config.dark_mode)
            }

            Message::TogglePreviewHidden => {
                self.config.preview_hidden = !self.config.preview_hidden;
                self.coordinator
                    .surface()
                    .set_preview_visible(!self.config.preview_hidden);
                CosmicTask::none()
            }

            Message::ToggleDebugLogging => {
                self.config.debug_logging = !self.config.debug_logging;
                quill::set_debug_logging(self.config.debug_logging);
                log::info!("Debug logging {}", if self.config.debug_logging { "enabled" } else { "disabled" });
                CosmicTask::none()
            }

            // --- Window ---
            Message::CloseRequested(_id) => {
                let result = self.coordinator.confirm_safe_to_navigate(Navigation::Quit);
                self.handle_step(result);
                CosmicTask::none()
            }
        };

        self.sync_editor();
        let persists = self.dispatch_persists();
        let title = self.update_title();
        CosmicTask::batch(vec![task, persists, title])
    }

    fn dialog(&self) -> Option<Element<'_, Message>> {
        match self.coordinator.prompt() {
            Some(Prompt::UnsavedChanges) => {
                let name = self
                    .coordinator
                    .session()
                    .file_name()
                    .unwrap_or_else(|| fl!("untitled"));
                return Some(
                    widget::dialog()
                        .title(fl!("unsaved-title"))
                        .body(fl!("unsaved-body", name = name))
                        .primary_action(
                            button::suggested(fl!("save")).on_press(Message::UnsavedChoice(UnsavedChoice::Save)),
                        )
                        .secondary_action(
                            button::standard(fl!("cancel")).on_press(Message::UnsavedChoice(UnsavedChoice::Cancel)),
                        )
                        .tertiary_action(
                            button::destructive(fl!("discard"))
                                .on_press(Message::UnsavedChoice(UnsavedChoice::Discard)),
                        )
                        .into(),
                );
            }
            Some(Prompt::SaveAs) => {
                return Some(
                    widget::dialog()
                        .title(fl!("save-as-title"))
                        .control(
                            text_input::text_input(fl!("note-name-placeholder"), &self.save_as_input)
                                .on_input(Message::SaveAsInput)
                                .on_submit(|_| Message::ConfirmSaveAs)
                                .width(Length::Fill),
                        )
                        .primary_action(button::suggested(fl!("save")).on_press(Message::ConfirmSaveAs))
                        .secondary_action(button::standard(fl!("cancel")).on_press(Message::CancelSaveAs))
                        .into(),
                );
            }
            None => {}
        }

        let dialog = match self.dialog.as_ref()? {
            NoteDialog::NewNote { input } => widget::dialog()
                .title(fl!("new-note-title"))
                .control(
                    text_input::text_input(fl!("note-name-placeholder"), input.as_str())
                        .on_input(Message::NewNoteInput)
                        .on_submit(|_| Message::ConfirmNewNote)
                        .width(Length::Fill),
                )
                .primary_action(button::suggested(fl!("create")).on_press(Message::ConfirmNewNote))
                .secondary_action(button::standard(fl!("cancel")).on_press(Message::CloseDialog)),
            NoteDialog::Rename { input, .. } => widget::dialog()
                .title(fl!("rename-title"))
                .control(
                    text_input::text_input(fl!("note-name-placeholder"), input.as_str())
                        .on_input(Message::RenameInput)
                        .on_submit(|_| Message::ConfirmRename)
                        .width(Length::Fill),
                )
                .primary_action(button::suggested(fl!("rename")).on_press(Message::ConfirmRename))
                .secondary_action(button::standard(fl!("cancel")).on_press(Message::CloseDialog)),
            NoteDialog::ConfirmDelete(path) => widget::dialog()
                .title(fl!("delete-title"))
                .body(fl!(
                    "delete-body",
                    name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default()
                ))
                .primary_action(button::destructive(fl!("delete")).on_press(Message::ConfirmDelete))
                .secondary_action(button::standard(fl!("cancel")).on_press(Message::CloseDialog)),
            NoteDialog::Error(message) => widget::dialog()
                .title(fl!("error-title"))
                .body(message.as_str())
                .primary_action(button::standard(fl!("ok")).on_press(Message::CloseDialog)),
        };

        Some(dialog.into())
    }

    fn on_escape(&mut self) -> CosmicTask<Message> {
        match self.coordinator.prompt() {
            Some(Prompt::UnsavedChanges) => self.update(Message::UnsavedChoice(UnsavedChoice::Cancel)),
            Some(Prompt::SaveAs) => self.update(Message::CancelSaveAs),
            None => {
                self.dialog = None;
                CosmicTask::none()
            }
        }
    }

    fn on_close_requested(&self, id: window::Id) -> Option<Message> {
        Some(Message::CloseRequested(id))
    }

    fn subscription(&self) -> Subscription<Message> {
        let keys = cosmic::iced::event::listen_with(|event, _status, _id| match event {
            cosmic::iced::Event::Keyboard(cosmic::iced::keyboard::Event::KeyPressed {
                key: cosmic::iced::keyboard::Key::Character(ref c),
                modifiers,
                ..
            }) if modifiers.control() => match (c.to_lowercase().as_str(), modifiers.shift()) {
                ("s", true) => Some(Message::SaveAs),
                ("s", false) => Some(Message::Save),
                ("n", _) => Some(Message::OpenNewNote),
                _ => None,
            },
            _ => None,
        });

        let timer = self.coordinator.timer();
        if timer.is_armed() {
            Subscription::batch(vec![
                keys,
                cosmic::iced::time::every(timer.period()).map(|_| Message::AutosaveTick),
            ])
        } else {
            keys
        }
    }

    fn view(&self) -> Element<'_, Message> {
        match self.page {
            Page::Start => pages::start::start_view(&self.listing, self.config.vault_directory.is_some()),
            Page::Editor => pages::editor::editor_view(
                &self.editor,
                self.coordinator.session(),
                self.coordinator.autosave_enabled(),
            ),
            Page::Settings => pages::settings::settings_view(
                &self.config,
                &self.vault_input,
                self.coordinator.surface().has_preview(),
            ),
        }
    }
}

impl Quill {
    /// Apply the coordinator's answer to a user action.
    fn handle_step(&mut self, result: Result<Step>) {
        match result {
            Ok(Step::Proceeded(Navigation::Open(path))) => {
                self.config.last_file = Some(path);
                self.page = Page::Editor;
                self.restore_selection();
            }
            Ok(Step::Proceeded(Navigation::CloseNote)) => {
                self.config.last_file = None;
                self.page = Page::Start;
                self.rebuild_vault();
            }
            Ok(Step::Proceeded(Navigation::Quit)) => {
                if self.coordinator.is_persisting() {
                    log::info!("Waiting for pending writes before quitting");
                    self.quitting = true;
                } else {
                    self.exit();
                }
            }
            Ok(Step::AwaitingSaveAs) => {
                self.save_as_input = self.coordinator.session().file_name().unwrap_or_default();
            }
            Ok(Step::AwaitingChoice) | Ok(Step::Done) => {}
            Err(Error::GuardBlocked) => {
                log::debug!("Navigation cancelled");
                self.restore_selection();
            }
            Err(e) => {
                self.show_error(&e);
                self.restore_selection();
            }
        }
    }

    fn show_error(&mut self, error: &Error) {
        log::error!("{}", error);
        if error.is_user_visible() {
            self.dialog = Some(NoteDialog::Error(error.to_string()));
        }
    }

    /// Hand every queued persist to the executor; each outcome comes back as a message.
    fn dispatch_persists(&mut self) -> CosmicTask<Message> {
        let tasks: Vec<CosmicTask<Message>> = self
            .coordinator
            .take_requests()
            .into_iter()
            .map(|request| {
                CosmicTask::perform(request.run(), |outcome| cosmic::Action::App(Message::Persisted(outcome)))
            })
            .collect();
        CosmicTask::batch(tasks)
    }

    /// Pick up a document the coordinator pushed into the surface.
    fn sync_editor(&mut self) {
        if let Some(text) = self.coordinator.surface().take_load() {
            self.editor = text_editor::Content::with_text(&text);
        }
    }

    fn update_title(&mut self) -> CosmicTask<Message> {
        let title = self.coordinator.session().window_title();
        self.set_header_title(title.clone());
        match self.core.main_window_id() {
            Some(id) => self.set_window_title(title, id),
            None => CosmicTask::none(),
        }
    }

    fn rebuild_vault(&mut self) {
        let scanned = match self.config.vault_directory.as_deref() {
            Some(dir) => VaultListing::scan(dir),
            None => Ok(VaultListing::default()),
        };
        self.listing = match scanned {
            Ok(listing) => listing,
            Err(e) => {
                self.show_error(&e);
                VaultListing::default()
            }
        };

        self.nav_model.clear();
        for entry in self.listing.entries() {
            self.nav_model
                .insert()
                .text(entry.display_name.clone())
                .icon(icon::from_name("text-x-generic-symbolic").icon())
                .data(entry.full_path.clone());
        }
        self.restore_selection();
    }

    /// Keep the sidebar highlight on the open note.
    fn restore_selection(&mut self) {
        let Some(current) = self.coordinator.session().file_path() else {
            return;
        };
        let id = self
            .nav_model
            .iter()
            .find(|id| self.nav_model.data::<PathBuf>(*id).map(PathBuf::as_path) == Some(current));
        if let Some(id) = id {
            self.nav_model.activate(id);
        }
    }

    /// Resolve the save-as input against the last directory used, or the vault.
    fn save_as_target(&self) -> Result<PathBuf> {
        let name = self.save_as_input.trim();
        let name = if name.is_empty() { quill::vault::DEFAULT_NOTE_NAME } else { name };
        let path = Path::new(name);
        if path.is_absolute() {
            return Ok(path.to_path_buf());
        }
        self.coordinator
            .session()
            .last_known_good_directory()
            .or(self.config.vault_directory.as_deref())
            .map(|dir| dir.join(path))
            .ok_or(Error::NoVault)
    }

    fn content_page(&self) -> Page {
        if self.coordinator.session().is_untitled() && !self.coordinator.session().is_dirty() {
            Page::Start
        } else {
            Page::Editor
        }
    }

    fn save_config(&self) {
        let Some(ref path) = self.config_path else {
            return;
        };
        if let Err(e) = self.config.save(path) {
            log::error!("Failed to save config: {}", e);
        }
    }

    fn exit(&mut self) {
        self.config.last_file = self.coordinator.session().file_path().map(Path::to_path_buf);
        self.save_config();
        log::info!("Exiting");
        std::process::exit(0);
    }
}

fn theme_task(dark: bool) -> CosmicTask<Message> {
    let theme = if dark { cosmic::Theme::dark() } else { cosmic::Theme::light() };
    cosmic::command::set_theme(theme)
}

