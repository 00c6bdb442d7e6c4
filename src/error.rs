use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

/// Filesystem operation that failed, used to phrase error dialogs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoOp {
    List,
    Read,
    Write,
    Create,
    Rename,
    Delete,
}

impl fmt::Display for IoOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            Self::List => "list",
            Self::Read => "read",
            Self::Write => "save",
            Self::Create => "create",
            Self::Rename => "rename",
            Self::Delete => "delete",
        };
        f.write_str(verb)
    }
}

#[derive(Debug, Clone, Error)]
pub enum Error {
    #[error("Failed to {op} {}: {source}", .path.display())]
    Io {
        op: IoOp,
        path: PathBuf,
        #[source]
        source: Arc<std::io::Error>,
    },

    #[error("Failed to read editor content: {0}")]
    Fetch(String),

    /// The user chose Cancel at the unsaved-changes prompt.
    #[error("Navigation cancelled")]
    GuardBlocked,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{} already exists", .0.display())]
    AlreadyExists(PathBuf),

    #[error("{0:?} is not a valid note name")]
    InvalidName(String),

    #[error("Please select a vault directory first")]
    NoVault,

    #[error("The note has no file yet")]
    Untitled,
}

impl Error {
    pub fn io(op: IoOp, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            op,
            path: path.into(),
            source: Arc::new(source),
        }
    }

    /// Errors the shell reports with a modal dialog. Cancellation is silent and
    /// configuration problems only reach the log.
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, Self::GuardBlocked | Self::Config(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
