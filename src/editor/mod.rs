//! The editor surface: whatever widget owns the text the user is typing.
//!
//! The coordinator only ever pushes a full document into it and asks for the
//! full document back. Change notifications flow the other way, from the host
//! into [`Coordinator::mark_dirty`](crate::coordinator::Coordinator::mark_dirty).

pub mod buffer;
pub mod script;

use futures::future::BoxFuture;

use crate::error::Result;

pub use buffer::{BufferSurface, join_lines};
pub use script::{ScriptEngine, ScriptSurface};

/// Pending read of the editor's current text.
pub type FetchFuture = BoxFuture<'static, Result<String>>;

pub trait EditorSurface {
    /// Replace the editor's whole document. Must preserve every character of `text`.
    fn load_content(&self, text: &str);

    /// Ask for the editor's current document.
    ///
    /// The request is dispatched when this is called, not when the future is
    /// first polled, so a later `load_content` cannot leak into it.
    fn fetch_content(&self) -> FetchFuture;

    fn set_dark_mode(&self, _enabled: bool) {}

    fn set_preview_visible(&self, _visible: bool) {}

    /// Whether the surface renders a preview that `set_preview_visible` controls.
    fn has_preview(&self) -> bool {
        false
    }
}
