use std::path::{Component, Path, PathBuf};

use crate::error::{Error, IoOp, Result};

pub const NOTE_EXTENSION: &str = ".md";
pub const DEFAULT_NOTE_NAME: &str = "new_note.md";

/// One `.md` file in the vault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultEntry {
    pub display_name: String,
    pub full_path: PathBuf,
}

/// Flat listing of a vault directory. Always rebuilt from disk, never patched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VaultListing {
    entries: Vec<VaultEntry>,
}

impl VaultListing {
    /// Scan `dir` for entries ending in `.md`. Case-sensitive, non-recursive,
    /// hidden files included. Subdirectories are skipped even when their name matches.
    pub fn scan(dir: &Path) -> Result<Self> {
        let read_dir = std::fs::read_dir(dir).map_err(|e| Error::io(IoOp::List, dir, e))?;

        let mut entries = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|e| Error::io(IoOp::List, dir, e))?;
            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                log::warn!("Skipping non UTF-8 file name in {}", dir.display());
                continue;
            };
            if !name.ends_with(NOTE_EXTENSION) {
                continue;
            }
            if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
                continue;
            }
            entries.push(VaultEntry {
                full_path: dir.join(&name),
                display_name: name,
            });
        }

        entries.sort_by(|a, b| a.display_name.cmp(&b.display_name));
        log::debug!("Scanned {}: {} notes", dir.display(), entries.len());
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[VaultEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Position of `path` in the listing, matched by path string.
    pub fn position(&self, path: &Path) -> Option<usize> {
        self.entries.iter().position(|e| e.full_path == path)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.position(path).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.display_name.as_str())
    }
}

/// Append `.md` unless the name already ends with it.
pub fn ensure_md_extension(path: PathBuf) -> PathBuf {
    if path.to_string_lossy().ends_with(NOTE_EXTENSION) {
        return path;
    }
    let mut raw = path.into_os_string();
    raw.push(NOTE_EXTENSION);
    PathBuf::from(raw)
}

/// Read a note's bytes as text. Invalid UTF-8 is replaced rather than rejected.
pub fn read_note(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|e| Error::io(IoOp::Read, path, e))?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            log::warn!("{} is not valid UTF-8, replacing invalid bytes", path.display());
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    })
}

/// Overwrite `path` with `text` exactly as given.
pub async fn write_note(path: &Path, text: &str) -> Result<()> {
    tokio::fs::write(path, text.as_bytes())
        .await
        .map_err(|e| Error::io(IoOp::Write, path, e))
}

/// Notes live directly in the vault, so a name is a single plain file name.
fn note_name(name: &str) -> Result<&str> {
    let mut components = Path::new(name).components();
    let plain = matches!(components.next(), Some(Component::Normal(_))) && components.next().is_none();
    if plain && !name.contains(['/', '\\']) {
        Ok(name)
    } else {
        Err(Error::InvalidName(name.to_string()))
    }
}

/// Create an empty note called `name` inside `vault`. Refuses to truncate an existing file.
pub fn create_note(vault: &Path, name: &str) -> Result<PathBuf> {
    let name = name.trim();
    let name = if name.is_empty() { DEFAULT_NOTE_NAME } else { note_name(name)? };
    let path = ensure_md_extension(vault.join(name));

    std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::AlreadyExists => Error::AlreadyExists(path.clone()),
            _ => Error::io(IoOp::Create, &path, e),
        })?;

    log::info!("Created note {}", path.display());
    Ok(path)
}

/// Rename `from` to `new_name` inside `vault`. Fails when the destination exists.
pub fn rename_note(vault: &Path, from: &Path, new_name: &str) -> Result<PathBuf> {
    let to = ensure_md_extension(vault.join(note_name(new_name.trim())?));
    if to == from {
        return Ok(to);
    }
    if to.exists() {
        return Err(Error::AlreadyExists(to));
    }
    std::fs::rename(from, &to).map_err(|e| Error::io(IoOp::Rename, from, e))?;
    log::info!("Renamed {} to {}", from.display(), to.display());
    Ok(to)
}

/// Unlink a note. There is no trash.
pub fn delete_note(path: &Path) -> Result<()> {
    std::fs::remove_file(path).map_err(|e| Error::io(IoOp::Delete, path, e))?;
    log::info!("Deleted note {}", path.display());
    Ok(())
}
