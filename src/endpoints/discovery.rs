//! Workspace-wide controller discovery.
//!
//! Finds controller files, extracts their endpoints through the cache and
//! groups the results per file for display.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::Serialize;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::analysis::AnalysisSession;
use crate::config::Config;
use crate::endpoints::{EndpointCache, EndpointDescriptor, EndpointExtractor};

/// Shared flag for stopping a running discovery between batches.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Endpoints of one controller file.
#[derive(Debug, Clone, Serialize)]
pub struct ControllerGroup {
    /// Display label, e.g. `Users Controller`.
    pub label: String,
    pub path: PathBuf,
    pub endpoints: Vec<EndpointDescriptor>,
}

/// Outcome of a discovery run.
#[derive(Debug, Default, Serialize)]
pub struct DiscoveryReport {
    /// Groups with at least one endpoint, sorted by label.
    pub groups: Vec<ControllerGroup>,
    /// Files processed before completion or cancellation.
    pub scanned: usize,
    /// Files and directory entries that could not be read.
    pub failed: Vec<PathBuf>,
    pub cancelled: bool,
}

impl DiscoveryReport {
    pub fn endpoint_count(&self) -> usize {
        self.groups.iter().map(|g| g.endpoints.len()).sum()
    }
}

/// `users.controller.ts` becomes `Users Controller`.
pub fn controller_label(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let base = file_name
        .strip_suffix(".controller.ts")
        .or_else(|| file_name.split('.').next())
        .unwrap_or(&file_name);

    let mut chars = base.chars();
    let capitalized: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
    format!("{} Controller", capitalized)
}

fn build_globset(patterns: &[String]) -> anyhow::Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

/// Result of walking a workspace for controller files.
#[derive(Debug, Default)]
pub struct ControllerFiles {
    /// Matching files, sorted by path.
    pub files: Vec<PathBuf>,
    /// Entries the walk could not read (dangling links, loops, permissions).
    pub unreadable: Vec<PathBuf>,
}

/// Controller files under `root`.
///
/// Hidden and excluded directories are not descended into. Unreadable
/// entries are skipped and listed; only an unreadable `root` is an error.
pub fn find_controller_files(root: &Path, config: &Config) -> anyhow::Result<ControllerFiles> {
    let globs = build_globset(&config.controller_globs)?;
    let mut found = ControllerFiles::default();

    for entry in WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| {
            if e.depth() == 0 || !e.file_type().is_dir() {
                return true;
            }
            let name = e.file_name().to_string_lossy();
            !name.starts_with('.') && !config.is_dir_excluded(&name)
        })
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => return Err(e.into()),
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry");
                if let Some(path) = e.path() {
                    found.unreadable.push(path.to_path_buf());
                }
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap_or(path);
        if globs.is_match(relative) {
            found.files.push(path.to_path_buf());
        }
    }

    found.files.sort();
    found.unreadable.sort();
    Ok(found)
}

/// Extract endpoints from every controller file under `root`.
///
/// Yields to the runtime after each batch of files and stops early when
/// `cancel` is set; entries already cached stay valid. Each controller unit
/// is evicted from the session once extracted.
pub async fn discover<F>(
    root: &Path,
    config: &Config,
    session: &AnalysisSession,
    cache: &mut EndpointCache,
    cancel: &CancellationFlag,
    mut progress: F,
) -> anyhow::Result<DiscoveryReport>
where
    F: FnMut(&Path, usize, usize),
{
    let ControllerFiles { files, unreadable } = find_controller_files(root, config)?;
    let total = files.len();
    let batch_size = config.discovery_batch_size.max(1);
    let extractor = EndpointExtractor::new(session, &config.conventions);
    let mut report = DiscoveryReport {
        failed: unreadable,
        ..DiscoveryReport::default()
    };

    debug!(root = %root.display(), files = total, "discovering controllers");

    for (index, path) in files.iter().enumerate() {
        if index > 0 && index % batch_size == 0 {
            tokio::task::yield_now().await;
        }
        if cancel.is_cancelled() {
            debug!(scanned = report.scanned, "discovery cancelled");
            report.cancelled = true;
            break;
        }

        let endpoints = match cache.get(path) {
            Some(cached) => cached.to_vec(),
            None => match extractor.try_extract(path) {
                Ok(endpoints) => {
                    cache.put(path, endpoints.clone());
                    endpoints
                }
                Err(e) => {
                    warn!(error = %e, "skipping controller file");
                    report.failed.push(path.clone());
                    Vec::new()
                }
            },
        };
        session.evict(path);

        report.scanned += 1;
        progress(path, index + 1, total);

        if !endpoints.is_empty() {
            report.groups.push(ControllerGroup {
                label: controller_label(path),
                path: path.clone(),
                endpoints,
            });
        }
    }

    report
        .groups
        .sort_by(|a, b| a.label.cmp(&b.label).then_with(|| a.path.cmp(&b.path)));
    Ok(report)
}
