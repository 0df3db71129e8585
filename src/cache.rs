//! Load-once frame cache, keyed on (canonical path, modification time).
//!
//! Replaces implicit process-global caching with an explicit structure the
//! caller owns. A changed mtime reloads; `invalidate` evicts by hand. Cached
//! frames hand out `Arc` clones, so sessions share the loaded table read-only
//! while any filtered/derived view stays session-local.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use tracing::debug;

use crate::error::LensResult;
use crate::types::Frame;

#[derive(Debug, Default)]
pub struct FrameCache {
    entries: HashMap<PathBuf, (SystemTime, Arc<Frame>)>,
}

impl FrameCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached frame for `path` if its mtime is unchanged,
    /// otherwise run `load` and cache the result.
    pub fn get_or_load<F>(&mut self, path: &Path, load: F) -> LensResult<Arc<Frame>>
    where
        F: FnOnce(&Path) -> LensResult<Frame>,
    {
        let key = path.canonicalize()?;
        let modified = std::fs::metadata(&key)?.modified()?;

        if let Some((cached_mtime, frame)) = self.entries.get(&key) {
            if *cached_mtime == modified {
                debug!(path = %key.display(), "frame cache hit");
                return Ok(Arc::clone(frame));
            }
            debug!(path = %key.display(), "frame cache stale, reloading");
        }

        let frame = Arc::new(load(&key)?);
        self.entries.insert(key, (modified, Arc::clone(&frame)));
        Ok(frame)
    }

    /// Evict a single path. No-op when the path was never cached.
    pub fn invalidate(&mut self, path: &Path) {
        let key = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        self.entries.remove(&key);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
