use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::FutureExt;

use super::{EditorSurface, FetchFuture};

#[derive(Debug, Default)]
struct Buffer {
    text: String,
    /// Document pushed by the coordinator that the widget has not picked up yet.
    pending_load: Option<String>,
}

/// In-process editor surface shared between the coordinator and a native text widget.
///
/// The widget reports every edit through [`update`](Self::update) and polls
/// [`take_load`](Self::take_load) to pick up documents pushed by the coordinator.
#[derive(Debug, Clone, Default)]
pub struct BufferSurface {
    inner: Arc<Mutex<Buffer>>,
}

impl BufferSurface {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Buffer> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record the widget's current text after an edit.
    pub fn update(&self, text: String) {
        self.lock().text = text;
    }

    pub fn text(&self) -> String {
        self.lock().text.clone()
    }

    /// Document to show in the widget, if one was loaded since the last call.
    pub fn take_load(&self) -> Option<String> {
        self.lock().pending_load.take()
    }
}

/// Rebuild a document from a text widget's lines.
///
/// Lines are joined with `'\n'` exactly. A document ending in a newline has
/// an empty last line, so `"x\n"` and `"x"` stay distinct.
pub fn join_lines<I, S>(lines: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut text = String::new();
    for (index, line) in lines.into_iter().enumerate() {
        if index > 0 {
            text.push('\n');
        }
        text.push_str(line.as_ref());
    }
    text
}

impl EditorSurface for BufferSurface {
    fn load_content(&self, text: &str) {
        let mut buffer = self.lock();
        buffer.text = text.to_owned();
        buffer.pending_load = Some(text.to_owned());
    }

    fn fetch_content(&self) -> FetchFuture {
        let snapshot = self.text();
        futures::future::ready(Ok(snapshot)).boxed()
    }
}
