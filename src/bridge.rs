//! Asynchronous "fetch the editor text, then write it to disk" requests.

use std::fmt;
use std::path::{Path, PathBuf};

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::time::Instant;

use crate::core::vault;
use crate::editor::{EditorSurface, FetchFuture};
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A persist request that has been dispatched to the editor surface.
///
/// The target path and the session revision are captured when the request is
/// issued; the completion writes to that path whatever the session holds by then.
pub struct PersistRequest {
    id: RequestId,
    target: PathBuf,
    revision: u64,
    requested_at: Instant,
    fetch: FetchFuture,
}

impl PersistRequest {
    pub fn id(&self) -> RequestId {
        self.id
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn requested_at(&self) -> Instant {
        self.requested_at
    }

    /// Await the fetch, then write the text verbatim to the captured target.
    pub fn run(self) -> BoxFuture<'static, PersistOutcome> {
        let Self {
            id,
            target,
            revision,
            requested_at,
            fetch,
        } = self;

        async move {
            let result = match fetch.await {
                Ok(text) => vault::write_note(&target, &text).await.map(|()| text.len()),
                Err(e) => Err(e),
            };
            log::debug!(
                "Persist {} for {} finished in {:?}",
                id,
                target.display(),
                requested_at.elapsed()
            );
            PersistOutcome {
                id,
                target,
                revision,
                result,
            }
        }
        .boxed()
    }
}

impl fmt::Debug for PersistRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistRequest")
            .field("id", &self.id)
            .field("target", &self.target)
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}

/// Completion of a [`PersistRequest`], delivered back to the coordinator.
#[derive(Debug, Clone)]
pub struct PersistOutcome {
    pub id: RequestId,
    pub target: PathBuf,
    pub revision: u64,
    /// Bytes written on success.
    pub result: Result<usize>,
}

/// Issues persist requests against one editor surface.
#[derive(Debug)]
pub struct ContentBridge<S> {
    surface: S,
    next_id: u64,
}

impl<S: EditorSurface> ContentBridge<S> {
    pub fn new(surface: S) -> Self {
        Self { surface, next_id: 1 }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Dispatch a fetch now and return the request that will write it to `target`.
    pub fn request_content_for_persist(&mut self, target: PathBuf, revision: u64) -> PersistRequest {
        let id = RequestId(self.next_id);
        self.next_id += 1;
        log::debug!("Persist {} requested for {}", id, target.display());
        PersistRequest {
            id,
            target,
            revision,
            requested_at: Instant::now(),
            fetch: self.surface.fetch_content(),
        }
    }

    pub fn load_content_into_editor(&self, text: &str) {
        self.surface.load_content(text);
    }
}
