use std::path::PathBuf;

use cosmic::iced::window;
use cosmic::widget::text_editor;

use quill::bridge::PersistOutcome;
use quill::coordinator::UnsavedChoice;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Start,
    Editor,
    Settings,
}

/// Modal dialogs that belong to the shell rather than to the coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteDialog {
    NewNote { input: String },
    Rename { from: PathBuf, input: String },
    ConfirmDelete(PathBuf),
    Error(String),
}

#[derive(Debug, Clone)]
pub enum Message {
    // Vault
    SelectNote(PathBuf),
    RefreshVault,
    VaultInput(String),
    ApplyVault,

    // Note management
    OpenNewNote,
    NewNoteInput(String),
    ConfirmNewNote,
    StartRename,
    RenameInput(String),
    ConfirmRename,
    StartDelete,
    ConfirmDelete,
    CloseDialog,

    // Editor
    EditorAction(text_editor::Action),
    Save,
    SaveAs,
    SaveAsInput(String),
    ConfirmSaveAs,
    CancelSaveAs,
    CloseNote,
    UnsavedChoice(UnsavedChoice),

    // Persistence
    AutosaveTick,
    Persisted(PersistOutcome),

    // Settings
    OpenSettings,
    CloseSettings,
    ToggleAutosave,
    ToggleDarkMode,
    TogglePreviewHidden,
    ToggleDebugLogging,

    // Window
    CloseRequested(window::Id),
}
