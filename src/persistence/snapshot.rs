//! Backup-on-write durability policy.
//!
//! After every committed write the service calls
//! [`DurabilityHook::after_commit`]. The default [`FileSnapshotter`] copies
//! the whole database file to `app_backup_<YYYYMMDD_HHMMSS>_<micros>.db`
//! and keeps only the newest files. Snapshot failures are logged and never
//! reach the write path.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use chrono::{NaiveDateTime, SubsecRound, TimeDelta, Utc};

/// File name prefix shared by every snapshot.
pub const BACKUP_PREFIX: &str = "app_backup_";

/// Hook invoked synchronously after each committed write.
///
/// Implementations may batch or debounce; they must never fail the write,
/// so the method has no error channel.
pub trait DurabilityHook: Send + Sync + fmt::Debug {
    /// Called once per committed `record_interest` or `add_subscriber`.
    fn after_commit(&self);
}

/// Hook that does nothing. Used when backups are disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHook;

impl DurabilityHook for NoopHook {
    fn after_commit(&self) {}
}

/// Errors raised while taking or pruning snapshots.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// The backup directory could not be created.
    #[error("failed to create backup directory {path}: {source}")]
    CreateDir {
        /// Directory path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The database file could not be copied.
    #[error("failed to copy {from} to {to}: {source}")]
    Copy {
        /// Database file.
        from: PathBuf,
        /// Snapshot target.
        to: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The backup directory could not be listed.
    #[error("failed to list backup directory {path}: {source}")]
    List {
        /// Directory path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// Copies the database file into a rotating set of timestamped backups.
///
/// Names embed a UTC timestamp with microsecond precision. Within one
/// process each stamp is strictly greater than the previous one, so
/// lexical order of the file names is creation order.
#[derive(Debug)]
pub struct FileSnapshotter {
    source: PathBuf,
    dir: PathBuf,
    retention: usize,
    extension: String,
    /// Last stamp handed out. Also serializes concurrent snapshots.
    last_stamp: Mutex<Option<NaiveDateTime>>,
}

impl FileSnapshotter {
    /// Creates a snapshotter copying `source` into `dir`, keeping the
    /// newest `retention` files (at least one).
    #[must_use]
    pub fn new(source: impl Into<PathBuf>, dir: impl Into<PathBuf>, retention: usize) -> Self {
        let source = source.into();
        let extension = source
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("db")
            .to_string();
        Self {
            source,
            dir: dir.into(),
            retention: retention.max(1),
            extension,
            last_stamp: Mutex::new(None),
        }
    }

    /// Returns the backup directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Creates the backup directory if absent and takes the startup
    /// snapshot.
    ///
    /// # Errors
    ///
    /// Returns a [`SnapshotError`] if the directory cannot be created or
    /// the first copy fails.
    pub fn initialize(&self) -> Result<PathBuf, SnapshotError> {
        fs::create_dir_all(&self.dir).map_err(|source| SnapshotError::CreateDir {
            path: self.dir.clone(),
            source,
        })?;
        self.snapshot()
    }

    /// Copies the database file to a new snapshot and prunes old ones.
    ///
    /// Pruning failures are logged and do not fail the snapshot.
    ///
    /// # Errors
    ///
    /// Returns a [`SnapshotError`] if the directory is missing and cannot
    /// be created, or the copy fails.
    pub fn snapshot(&self) -> Result<PathBuf, SnapshotError> {
        let mut last = self
            .last_stamp
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        fs::create_dir_all(&self.dir).map_err(|source| SnapshotError::CreateDir {
            path: self.dir.clone(),
            source,
        })?;

        let stamp = next_stamp(*last);
        let target = self.dir.join(self.file_name(stamp));
        fs::copy(&self.source, &target).map_err(|source| SnapshotError::Copy {
            from: self.source.clone(),
            to: target.clone(),
            source,
        })?;
        *last = Some(stamp);
        tracing::info!(path = %target.display(), "database backup created");

        match self.prune() {
            Ok(0) => {}
            Ok(removed) => tracing::debug!(removed, "old backups pruned"),
            Err(e) => tracing::warn!(error = %e, "could not prune old backups"),
        }

        Ok(target)
    }

    /// Lists existing snapshots sorted by name (oldest first).
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::List`] if the directory cannot be read.
    pub fn backups(&self) -> Result<Vec<PathBuf>, SnapshotError> {
        let entries = fs::read_dir(&self.dir).map_err(|source| SnapshotError::List {
            path: self.dir.clone(),
            source,
        })?;

        let mut names: Vec<String> = entries
            .filter_map(Result::ok)
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| name.starts_with(BACKUP_PREFIX))
            .collect();
        names.sort();

        Ok(names.into_iter().map(|name| self.dir.join(name)).collect())
    }

    /// Deletes every snapshot except the newest `retention`. Individual
    /// deletion failures are logged and skipped.
    fn prune(&self) -> Result<usize, SnapshotError> {
        let backups = self.backups()?;
        let excess = backups.len().saturating_sub(self.retention);

        let mut removed = 0;
        for old in backups.iter().take(excess) {
            match fs::remove_file(old) {
                Ok(()) => {
                    removed += 1;
                    tracing::info!(path = %old.display(), "removed old backup");
                }
                Err(e) => tracing::warn!(path = %old.display(), error = %e, "failed to remove old backup"),
            }
        }
        Ok(removed)
    }

    fn file_name(&self, stamp: NaiveDateTime) -> String {
        format!(
            "{BACKUP_PREFIX}{}.{}",
            stamp.format("%Y%m%d_%H%M%S_%6f"),
            self.extension
        )
    }
}

impl DurabilityHook for FileSnapshotter {
    fn after_commit(&self) {
        if let Err(e) = self.snapshot() {
            tracing::error!(error = %e, "database backup failed");
        }
    }
}

/// Current UTC time at microsecond precision, bumped past `previous`.
fn next_stamp(previous: Option<NaiveDateTime>) -> NaiveDateTime {
    let now = Utc::now().naive_utc().trunc_subsecs(6);
    match previous {
        Some(prev) if now <= prev => prev + TimeDelta::microseconds(1),
        _ => now,
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    struct Fixture {
        _root: tempfile::TempDir,
        source: PathBuf,
        dir: PathBuf,
    }

    fn fixture() -> Fixture {
        let Ok(root) = tempfile::tempdir() else {
            panic!("tempdir");
        };
        let source = root.path().join("app.db");
        if fs::write(&source, b"sqlite bytes").is_err() {
            panic!("write source");
        }
        let dir = root.path().join("backups");
        Fixture {
            _root: root,
            source,
            dir,
        }
    }

    fn file_name(path: &Path) -> String {
        path.file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string()
    }

    #[test]
    fn initialize_creates_directory_and_first_snapshot() {
        let fx = fixture();
        let snapshotter = FileSnapshotter::new(&fx.source, &fx.dir, 5);

        let Ok(path) = snapshotter.initialize() else {
            panic!("initialize failed");
        };
        assert!(fx.dir.is_dir());
        assert!(file_name(&path).starts_with(BACKUP_PREFIX));
        assert!(file_name(&path).ends_with(".db"));
        assert_eq!(fs::read(&path).ok().as_deref(), Some(&b"sqlite bytes"[..]));
    }

    #[test]
    fn six_snapshots_leave_the_newest_five_in_order() {
        let fx = fixture();
        let snapshotter = FileSnapshotter::new(&fx.source, &fx.dir, 5);

        let mut created = Vec::new();
        for _ in 0..6 {
            let Ok(path) = snapshotter.snapshot() else {
                panic!("snapshot failed");
            };
            created.push(path);
        }

        let Ok(remaining) = snapshotter.backups() else {
            panic!("list failed");
        };
        assert_eq!(remaining.len(), 5);
        assert_eq!(remaining.as_slice(), created.get(1..).unwrap_or_default());
        assert!(created.first().is_some_and(|first| !first.exists()));
    }

    #[test]
    fn names_sort_chronologically() {
        let fx = fixture();
        let snapshotter = FileSnapshotter::new(&fx.source, &fx.dir, 10);

        let names: Vec<String> = (0..4)
            .filter_map(|_| snapshotter.snapshot().ok())
            .map(|p| file_name(&p))
            .collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names.len(), 4);
        assert_eq!(names, sorted);
    }

    #[test]
    fn missing_source_fails_without_panicking() {
        let fx = fixture();
        let snapshotter = FileSnapshotter::new(fx.dir.join("absent.db"), &fx.dir, 5);

        assert!(matches!(
            snapshotter.snapshot(),
            Err(SnapshotError::Copy { .. })
        ));
        snapshotter.after_commit();
    }

    #[test]
    fn pruning_leaves_unrelated_files_alone() {
        let fx = fixture();
        let snapshotter = FileSnapshotter::new(&fx.source, &fx.dir, 1);
        let _ = snapshotter.initialize();
        let keep = fx.dir.join("notes.txt");
        if fs::write(&keep, b"x").is_err() {
            panic!("write");
        }

        let _ = snapshotter.snapshot();
        let _ = snapshotter.snapshot();

        assert!(keep.exists());
        assert_eq!(snapshotter.backups().map(|b| b.len()).ok(), Some(1));
    }

    #[test]
    fn stamps_strictly_increase() {
        let first = next_stamp(None);
        let far_future = first + TimeDelta::days(1);
        let bumped = next_stamp(Some(far_future));
        assert_eq!(bumped, far_future + TimeDelta::microseconds(1));
        assert!(next_stamp(Some(first)) > first);
    }
}
