//! File watching for `cssx watch`.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::Duration;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use notify_debouncer_mini::{DebouncedEvent, DebouncedEventKind, Debouncer, new_debouncer};

use crate::{Error, Result};

/// How long changes to one file are coalesced.
pub const DEBOUNCE_INTERVAL: Duration = Duration::from_millis(100);

/// A watched source file changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceChange {
    /// Canonical path of the changed file.
    pub path: PathBuf,
    pub kind: ChangeKind,
}

/// Type of file change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// File exists after the change.
    Modified,
    /// File is gone.
    Removed,
}

/// Watches source files and reports debounced changes.
///
/// # Example
///
/// ```ignore
/// let mut watcher = SourceWatcher::new()?;
/// watcher.watch("styles/main.cssx")?;
///
/// loop {
///     for change in watcher.wait(Duration::from_millis(250)) {
///         recompile(&change.path);
///     }
/// }
/// ```
pub struct SourceWatcher {
    debouncer: Debouncer<RecommendedWatcher>,
    rx: Receiver<std::result::Result<Vec<DebouncedEvent>, notify::Error>>,
    watched_paths: HashSet<PathBuf>,
}

impl SourceWatcher {
    /// Create a watcher with no files.
    pub fn new() -> Result<Self> {
        let (tx, rx) = mpsc::channel();
        let debouncer =
            new_debouncer(DEBOUNCE_INTERVAL, tx).map_err(|e| Error::Watch(e.to_string()))?;

        Ok(Self {
            debouncer,
            rx,
            watched_paths: HashSet::new(),
        })
    }

    /// Start watching a file. Watching a file twice is a no-op.
    pub fn watch(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path
            .as_ref()
            .canonicalize()
            .map_err(|e| Error::io(path.as_ref(), e))?;

        if !self.watched_paths.contains(&path) {
            self.debouncer
                .watcher()
                .watch(&path, RecursiveMode::NonRecursive)
                .map_err(|e| Error::Watch(e.to_string()))?;
            tracing::info!(path = %path.display(), "watching source");
            self.watched_paths.insert(path);
        }
        Ok(())
    }

    /// Stop watching a file.
    pub fn unwatch(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let Ok(path) = path.as_ref().canonicalize() else {
            return Ok(());
        };

        if self.watched_paths.remove(&path) {
            let _ = self.debouncer.watcher().unwatch(&path);
            tracing::info!(path = %path.display(), "stopped watching source");
        }
        Ok(())
    }

    /// Changes received so far, one per file. Never blocks.
    pub fn poll(&mut self) -> Vec<SourceChange> {
        let mut changes = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(batch) => self.collect(batch, &mut changes),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    tracing::error!("file watcher disconnected");
                    break;
                }
            }
        }
        dedup(changes)
    }

    /// Block until at least one batch arrives or `timeout` passes, then
    /// drain whatever else is queued.
    pub fn wait(&mut self, timeout: Duration) -> Vec<SourceChange> {
        let mut changes = Vec::new();
        if let Ok(batch) = self.rx.recv_timeout(timeout) {
            self.collect(batch, &mut changes);
        }
        changes.extend(self.poll());
        dedup(changes)
    }

    fn collect(
        &self,
        batch: std::result::Result<Vec<DebouncedEvent>, notify::Error>,
        changes: &mut Vec<SourceChange>,
    ) {
        let events = match batch {
            Ok(events) => events,
            Err(e) => {
                tracing::warn!("file watcher error: {e}");
                return;
            }
        };
        for event in events {
            if event.kind != DebouncedEventKind::Any || !self.watched_paths.contains(&event.path) {
                continue;
            }
            let kind = if event.path.exists() {
                ChangeKind::Modified
            } else {
                ChangeKind::Removed
            };
            changes.push(SourceChange {
                path: event.path,
                kind,
            });
        }
    }

    /// Number of watched files.
    pub fn watched_count(&self) -> usize {
        self.watched_paths.len()
    }

    /// The watched paths.
    pub fn watched_paths(&self) -> impl Iterator<Item = &Path> {
        self.watched_paths.iter().map(PathBuf::as_path)
    }
}

/// A file may be reported several times in one batch.
fn dedup(mut changes: Vec<SourceChange>) -> Vec<SourceChange> {
    changes.sort_by(|a, b| a.path.cmp(&b.path));
    changes.dedup_by(|a, b| a.path == b.path);
    changes
}
