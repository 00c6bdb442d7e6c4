//! Editor surface backed by a JavaScript editor running in an embedded web view.
//!
//! Every payload is embedded as a JSON string literal, never spliced into a
//! template literal or markup-escaped, so the text the page receives is
//! exactly the text we sent.

use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json::Value;

use super::{EditorSurface, FetchFuture};
use crate::error::Error;

pub const GET_MARKDOWN: &str = "editor.getMarkdown();";
pub const SHOW_EDITOR: &str = "showEditor();";

/// Evaluates scripts in the page hosting the editor.
///
/// Scripts must run in the order `evaluate` is called, whether or not the
/// returned future is ever awaited.
pub trait ScriptEngine: Send + Sync {
    fn evaluate(&self, script: String) -> BoxFuture<'static, Result<Value, String>>;
}

/// Encode `text` as a JavaScript string literal.
///
/// JSON escaping covers quotes, backslashes and control characters; U+2028 and
/// U+2029 are escaped as well since older engines reject them inside literals.
pub fn js_string(text: &str) -> String {
    Value::String(text.to_owned())
        .to_string()
        .replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029")
}

pub fn set_markdown(text: &str) -> String {
    format!("editor.setMarkdown({});", js_string(text))
}

pub fn dark_mode(enabled: bool) -> &'static str {
    if enabled {
        "document.body.classList.add('dark-theme');"
    } else {
        "document.body.classList.remove('dark-theme');"
    }
}

pub fn toggle_preview(visible: bool) -> String {
    format!("togglePreview({visible});")
}

pub struct ScriptSurface<E> {
    engine: Arc<E>,
}

impl<E: ScriptEngine + 'static> ScriptSurface<E> {
    pub fn new(engine: Arc<E>) -> Self {
        Self { engine }
    }

    /// Fire a script whose result nobody waits for. Failures only reach the log.
    fn run_detached(&self, script: String) -> BoxFuture<'static, ()> {
        self.engine
            .evaluate(script)
            .map(|result| {
                if let Err(e) = result {
                    log::warn!("Editor script failed: {}", e);
                }
            })
            .boxed()
    }
}

impl<E: ScriptEngine + 'static> EditorSurface for ScriptSurface<E> {
    fn load_content(&self, text: &str) {
        // Dispatch order is what matters here; the engine runs scripts as they arrive.
        drop(self.run_detached(format!("{}{}", set_markdown(text), SHOW_EDITOR)));
    }

    fn fetch_content(&self) -> FetchFuture {
        self.engine
            .evaluate(GET_MARKDOWN.to_string())
            .map(|result| match result {
                Ok(Value::String(text)) => Ok(text),
                Ok(other) => Err(Error::Fetch(format!("editor returned {other} instead of text"))),
                Err(e) => Err(Error::Fetch(e)),
            })
            .boxed()
    }

    fn set_dark_mode(&self, enabled: bool) {
        drop(self.run_detached(dark_mode(enabled).to_string()));
    }

    fn set_preview_visible(&self, visible: bool) {
        drop(self.run_detached(toggle_preview(visible)));
    }

    fn has_preview(&self) -> bool {
        true
    }
}
