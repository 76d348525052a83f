//! Analysis session: loads and caches source units for one workspace.
//!
//! The session provides:
//! - Loading of files from disk or from editor buffers
//! - Caching of extracted facts per normalized path
//! - Eviction so bulk scans keep memory bounded
//!
//! Units are shared as `Rc<SourceUnit>`; a session belongs to one task.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::rc::Rc;

use tracing::debug;

use crate::analysis::{get_analyzer_for_path, FileFacts};
use crate::config::Config;
use crate::error::AnalysisError;

/// Where a unit's text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitOrigin {
    Disk,
    /// Unsaved editor contents that shadow the file on disk.
    Buffer,
}

/// One loaded source file.
#[derive(Debug)]
pub struct SourceUnit {
    /// Normalized absolute path.
    pub path: PathBuf,
    pub origin: UnitOrigin,
    pub facts: FileFacts,
}

/// Owns every source unit loaded for a workspace.
pub struct AnalysisSession {
    /// Roots searched for non-relative module specifiers.
    module_roots: Vec<PathBuf>,
    /// Path segment naming the third-party dependency store.
    dependency_store: String,
    units: RefCell<HashMap<PathBuf, Rc<SourceUnit>>>,
    buffers: RefCell<HashMap<PathBuf, String>>,
}

impl AnalysisSession {
    /// Create a session with no module roots and the default dependency store.
    pub fn new() -> Self {
        Self::with_settings(Vec::new(), "node_modules")
    }

    /// Create a session configured for a workspace.
    pub fn open(config: &Config) -> Self {
        Self::with_settings(
            config.module_roots.clone(),
            &config.conventions.dependency_store,
        )
    }

    pub fn with_settings(module_roots: Vec<PathBuf>, dependency_store: &str) -> Self {
        Self {
            module_roots: module_roots.iter().map(|r| normalize_path(r)).collect(),
            dependency_store: dependency_store.to_string(),
            units: RefCell::new(HashMap::new()),
            buffers: RefCell::new(HashMap::new()),
        }
    }

    pub fn module_roots(&self) -> &[PathBuf] {
        &self.module_roots
    }

    pub fn dependency_store(&self) -> &str {
        &self.dependency_store
    }

    /// Register editor contents for `path`, replacing any loaded unit.
    pub fn set_buffer<P: AsRef<Path>>(&self, path: P, text: impl Into<String>) {
        let key = normalize_path(path.as_ref());
        self.units.borrow_mut().remove(&key);
        self.buffers.borrow_mut().insert(key, text.into());
    }

    /// Drop editor contents for `path`; the disk file is used again.
    pub fn clear_buffer<P: AsRef<Path>>(&self, path: P) {
        let key = normalize_path(path.as_ref());
        if self.buffers.borrow_mut().remove(&key).is_some() {
            self.units.borrow_mut().remove(&key);
        }
    }

    /// Load a unit, reusing the cached one when present.
    ///
    /// An editor buffer for the path shadows the file on disk.
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<Rc<SourceUnit>, AnalysisError> {
        let key = normalize_path(path.as_ref());

        if let Some(unit) = self.units.borrow().get(&key) {
            return Ok(Rc::clone(unit));
        }

        let analyzer =
            get_analyzer_for_path(&key).ok_or_else(|| AnalysisError::Unsupported(key.clone()))?;

        let buffered = self.buffers.borrow().get(&key).cloned();
        let (source, origin) = match buffered {
            Some(text) => (text.into_bytes(), UnitOrigin::Buffer),
            None => {
                let bytes = fs::read(&key).map_err(|source| AnalysisError::Load {
                    path: key.clone(),
                    source,
                })?;
                (bytes, UnitOrigin::Disk)
            }
        };

        let parsed = analyzer.parse(&key, &source)?;
        let facts = analyzer.extract_facts(&parsed)?;
        if facts.has_parse_errors {
            debug!(path = %key.display(), "syntax errors, using partial tree");
        }
        debug!(
            path = %key.display(),
            ?origin,
            classes = facts.classes.len(),
            imports = facts.imports.len(),
            "loaded source unit"
        );

        let unit = Rc::new(SourceUnit {
            path: key.clone(),
            origin,
            facts,
        });
        self.units.borrow_mut().insert(key, Rc::clone(&unit));
        Ok(unit)
    }

    /// Forget a loaded unit. Returns whether it was loaded.
    pub fn evict<P: AsRef<Path>>(&self, path: P) -> bool {
        let key = normalize_path(path.as_ref());
        self.units.borrow_mut().remove(&key).is_some()
    }

    pub fn is_loaded<P: AsRef<Path>>(&self, path: P) -> bool {
        self.units
            .borrow()
            .contains_key(&normalize_path(path.as_ref()))
    }

    pub fn loaded_count(&self) -> usize {
        self.units.borrow().len()
    }

    /// Whether a source file exists, either as a buffer or on disk.
    pub fn source_exists(&self, path: &Path) -> bool {
        let key = normalize_path(path);
        self.buffers.borrow().contains_key(&key) || key.is_file()
    }

    /// Whether a path lies inside the dependency store.
    pub fn is_dependency_path(&self, path: &Path) -> bool {
        path.components()
            .any(|c| c.as_os_str() == self.dependency_store.as_str())
    }

    /// Release every unit and buffer.
    pub fn dispose(self) {
        let units = self.units.into_inner().len();
        let buffers = self.buffers.into_inner().len();
        debug!(units, buffers, "session disposed");
    }
}

impl Default for AnalysisSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Absolute, lexically normalized form of a path.
///
/// `.` components are dropped and `..` pops the previous component without
/// touching the filesystem, so buffers for unsaved files normalize the same
/// way as files on disk.
pub fn normalize_path(path: &Path) -> PathBuf {
    let absolute = if path.is_relative() {
        std::env::current_dir()
            .map(|dir| dir.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    } else {
        path.to_path_buf()
    };

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}
