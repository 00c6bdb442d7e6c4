use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

pub const APP_TITLE: &str = "Quill";

/// Saved-state indicator shown next to the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveIndicator {
    Saved,
    Unsaved,
}

impl SaveIndicator {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Saved => "Saved",
            Self::Unsaved => "Unsaved*",
        }
    }
}

/// What file is open and whether the editor holds unpersisted changes.
///
/// `is_dirty` only turns on through [`mark_dirty`](Self::mark_dirty) and only
/// turns off through [`mark_saved`](Self::mark_saved) or a fresh open.
#[derive(Debug, Clone, Default)]
pub struct DocumentSession {
    file_path: Option<PathBuf>,
    is_dirty: bool,
    last_known_good_directory: Option<PathBuf>,
    /// Bumped on every content change and every open.
    revision: u64,
    last_saved: Option<DateTime<Local>>,
}

impl DocumentSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn is_dirty(&self) -> bool {
        self.is_dirty
    }

    pub fn is_untitled(&self) -> bool {
        self.file_path.is_none()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn last_known_good_directory(&self) -> Option<&Path> {
        self.last_known_good_directory.as_deref()
    }

    pub fn set_last_known_good_directory(&mut self, dir: impl Into<PathBuf>) {
        self.last_known_good_directory = Some(dir.into());
    }

    pub fn last_saved(&self) -> Option<DateTime<Local>> {
        self.last_saved
    }

    /// Bind a freshly loaded file. Its content is on disk, so the session is clean.
    pub(crate) fn opened(&mut self, path: PathBuf) {
        self.file_path = Some(path);
        self.is_dirty = false;
        self.revision += 1;
        self.last_saved = None;
    }

    pub fn mark_dirty(&mut self) {
        self.is_dirty = true;
        self.revision += 1;
    }

    pub fn mark_saved(&mut self) {
        self.is_dirty = false;
        self.last_saved = Some(Local::now());
    }

    /// Save-as rebinding. Dirty state is untouched; the caller persists next.
    pub fn rebind_path(&mut self, new_path: PathBuf) {
        if let Some(dir) = new_path.parent() {
            self.last_known_good_directory = Some(dir.to_path_buf());
        }
        self.file_path = Some(new_path);
    }

    /// Back to an untitled, clean session.
    pub fn close(&mut self) {
        self.file_path = None;
        self.is_dirty = false;
        self.revision += 1;
        self.last_saved = None;
    }

    pub fn indicator(&self) -> SaveIndicator {
        if self.is_dirty {
            SaveIndicator::Unsaved
        } else {
            SaveIndicator::Saved
        }
    }

    pub fn file_name(&self) -> Option<String> {
        self.file_path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
    }

    pub fn window_title(&self) -> String {
        let marker = if self.is_dirty { " *" } else { "" };
        match self.file_name() {
            Some(name) => format!("{APP_TITLE} - {name}{marker}"),
            None => format!("{APP_TITLE}{marker}"),
        }
    }
}
