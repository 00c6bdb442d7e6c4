use std::path::{Path, PathBuf};

use glib::{KeyFile, KeyFileError, KeyFileFlags};

use crate::error::{Error, Result};

pub const APP_DIR: &str = "quill";
pub const CONFIG_FILE: &str = "user.conf";
pub const SETTINGS_GROUP: &str = "Settings";

/// `~/.config/quill/user.conf`, or `None` when no config directory can be found.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct QuillConfig {
    pub vault_directory: Option<PathBuf>,
    pub dark_mode: bool,
    pub preview_hidden: bool,
    pub last_file: Option<PathBuf>,
    pub autosave: bool,
    pub debug_logging: bool,
}

impl Default for QuillConfig {
    fn default() -> Self {
        Self {
            vault_directory: None,
            dark_mode: false,
            preview_hidden: false,
            last_file: None,
            autosave: true,
            debug_logging: false,
        }
    }
}

impl QuillConfig {
    /// Config for `path`, or defaults when the user has no config directory.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        match path {
            Some(path) => Self::load_or_create(path),
            None => {
                log::warn!("No config directory for this user, settings will not be saved");
                Self::default()
            }
        }
    }

    /// Read the config at `path`, writing a default one if it does not exist.
    ///
    /// A malformed or unreadable file is logged and replaced by defaults in
    /// memory; the file itself is left alone until the next save.
    pub fn load_or_create(path: &Path) -> Self {
        if !path.exists() {
            let config = Self::default();
            if let Err(e) = config.save(path) {
                log::warn!("{}", e);
            }
            return config;
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("{}, using defaults", e);
                Self::default()
            }
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = KeyFile::new();
        file.load_from_file(path, KeyFileFlags::NONE)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_key_file(&file)
    }

    pub fn parse(text: &str) -> Result<Self> {
        let file = KeyFile::new();
        file.load_from_data(text, KeyFileFlags::NONE)
            .map_err(|e| Error::Config(e.to_string()))?;
        Self::from_key_file(&file)
    }

    fn from_key_file(file: &KeyFile) -> Result<Self> {
        let defaults = Self::default();
        let bool_or = |key: &str, default: bool| -> Result<bool> {
            match file.boolean(SETTINGS_GROUP, key) {
                Ok(value) => Ok(value),
                Err(e) if is_absent(&e) => Ok(default),
                Err(e) => Err(Error::Config(format!("{key}: {e}"))),
            }
        };
        let path = |key: &str| -> Result<Option<PathBuf>> {
            match file.string(SETTINGS_GROUP, key) {
                Ok(value) if value.is_empty() => Ok(None),
                Ok(value) => Ok(Some(PathBuf::from(value.as_str()))),
                Err(e) if is_absent(&e) => Ok(None),
                Err(e) => Err(Error::Config(format!("{key}: {e}"))),
            }
        };

        Ok(Self {
            vault_directory: path("vault_directory")?,
            dark_mode: bool_or("dark_mode", defaults.dark_mode)?,
            preview_hidden: bool_or("preview_hidden", defaults.preview_hidden)?,
            last_file: path("last_file")?,
            autosave: bool_or("autosave", defaults.autosave)?,
            debug_logging: bool_or("debug_logging", defaults.debug_logging)?,
        })
    }

    pub fn to_key_file(&self) -> KeyFile {
        let file = KeyFile::new();
        if let Some(ref dir) = self.vault_directory {
            file.set_string(SETTINGS_GROUP, "vault_directory", &dir.to_string_lossy());
        }
        file.set_boolean(SETTINGS_GROUP, "dark_mode", self.dark_mode);
        file.set_boolean(SETTINGS_GROUP, "preview_hidden", self.preview_hidden);
        if let Some(ref last) = self.last_file {
            file.set_string(SETTINGS_GROUP, "last_file", &last.to_string_lossy());
        }
        file.set_boolean(SETTINGS_GROUP, "autosave", self.autosave);
        file.set_boolean(SETTINGS_GROUP, "debug_logging", self.debug_logging);
        file
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .map_err(|e| Error::Config(format!("cannot create {}: {}", dir.display(), e)))?;
        }
        std::fs::write(path, self.to_key_file().to_data().as_str())
            .map_err(|e| Error::Config(format!("cannot write {}: {}", path.display(), e)))
    }

    /// The last note, if it still exists on disk.
    pub fn restorable_last_file(&self) -> Option<&Path> {
        self.last_file.as_deref().filter(|p| p.is_file())
    }
}

/// Missing groups and keys fall back to defaults, so older files keep loading.
fn is_absent(e: &glib::Error) -> bool {
    e.matches(KeyFileError::GroupNotFound) || e.matches(KeyFileError::KeyNotFound)
}
