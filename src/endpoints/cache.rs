//! In-memory cache of extracted endpoints, keyed by file path.
//!
//! Entries live for the session only. A stale entry reads as absent, and an
//! absent entry means "not computed yet", never "no endpoints".

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::analysis::normalize_path;
use crate::endpoints::EndpointDescriptor;

/// A change to a file in the workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileEvent {
    Created(PathBuf),
    Changed(PathBuf),
    Deleted(PathBuf),
}

impl FileEvent {
    pub fn path(&self) -> &Path {
        match self {
            FileEvent::Created(path) | FileEvent::Changed(path) | FileEvent::Deleted(path) => path,
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    endpoints: Vec<EndpointDescriptor>,
    stale: bool,
}

/// Per-file endpoint cache.
#[derive(Debug, Default)]
pub struct EndpointCache {
    entries: HashMap<PathBuf, CacheEntry>,
}

impl EndpointCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached endpoints for a file, unless missing or stale.
    pub fn get<P: AsRef<Path>>(&self, path: P) -> Option<&[EndpointDescriptor]> {
        let key = normalize_path(path.as_ref());
        self.entries
            .get(&key)
            .filter(|entry| !entry.stale)
            .map(|entry| entry.endpoints.as_slice())
    }

    /// Store endpoints for a file, replacing any previous entry.
    pub fn put<P: AsRef<Path>>(&mut self, path: P, endpoints: Vec<EndpointDescriptor>) {
        let key = normalize_path(path.as_ref());
        self.entries.insert(
            key,
            CacheEntry {
                endpoints,
                stale: false,
            },
        );
    }

    /// Mark a file's entry stale. Returns whether an entry existed.
    pub fn invalidate<P: AsRef<Path>>(&mut self, path: P) -> bool {
        let key = normalize_path(path.as_ref());
        match self.entries.get_mut(&key) {
            Some(entry) => {
                entry.stale = true;
                true
            }
            None => false,
        }
    }

    /// Drop a file's entry entirely.
    pub fn remove<P: AsRef<Path>>(&mut self, path: P) -> bool {
        let key = normalize_path(path.as_ref());
        self.entries.remove(&key).is_some()
    }

    pub fn invalidate_all(&mut self) {
        for entry in self.entries.values_mut() {
            entry.stale = true;
        }
    }

    /// Apply a file-change notification.
    pub fn apply(&mut self, event: &FileEvent) {
        match event {
            FileEvent::Created(path) | FileEvent::Changed(path) => {
                self.invalidate(path);
            }
            FileEvent::Deleted(path) => {
                self.remove(path);
            }
        }
    }

    /// Number of fresh entries.
    pub fn len(&self) -> usize {
        self.entries.values().filter(|e| !e.stale).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
