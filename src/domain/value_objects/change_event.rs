//! Filesystem change events as seen by the resync core.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// What happened to a path under the watched root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    FileCreated,
    FileModified,
    FileDeleted,
    FileMoved,
    DirCreated,
    DirModified,
    DirDeleted,
    DirMoved,
    /// Access notifications and anything the platform could not classify
    Other,
    /// The backend dropped events (e.g. inotify queue overflow); anything may have changed
    Rescan,
}

impl ChangeKind {
    /// Every kind, in declaration order.
    pub const ALL: &'static [ChangeKind] = &[
        ChangeKind::FileCreated,
        ChangeKind::FileModified,
        ChangeKind::FileDeleted,
        ChangeKind::FileMoved,
        ChangeKind::DirCreated,
        ChangeKind::DirModified,
        ChangeKind::DirDeleted,
        ChangeKind::DirMoved,
        ChangeKind::Other,
        ChangeKind::Rescan,
    ];

    /// Kinds that trigger a resync unless configured otherwise.
    ///
    /// Plain creation is left out: a freshly created file is still empty and
    /// is followed by a modify event once the writer gets going.
    pub const DEFAULT_ACTIONABLE: &'static [ChangeKind] = &[
        ChangeKind::DirDeleted,
        ChangeKind::DirMoved,
        ChangeKind::FileDeleted,
        ChangeKind::FileModified,
        ChangeKind::FileMoved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::FileCreated => "file_created",
            ChangeKind::FileModified => "file_modified",
            ChangeKind::FileDeleted => "file_deleted",
            ChangeKind::FileMoved => "file_moved",
            ChangeKind::DirCreated => "dir_created",
            ChangeKind::DirModified => "dir_modified",
            ChangeKind::DirDeleted => "dir_deleted",
            ChangeKind::DirMoved => "dir_moved",
            ChangeKind::Other => "other",
            ChangeKind::Rescan => "rescan",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single observed mutation and the path(s) it touched.
///
/// Moves carry the source path first and the destination second when the
/// platform reports both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub paths: Vec<PathBuf>,
}

impl ChangeEvent {
    pub fn new(kind: ChangeKind, paths: Vec<PathBuf>) -> Self {
        Self { kind, paths }
    }

    pub fn single(kind: ChangeKind, path: impl Into<PathBuf>) -> Self {
        Self::new(kind, vec![path.into()])
    }

    /// The primary affected path, if any.
    pub fn path(&self) -> Option<&Path> {
        self.paths.first().map(PathBuf::as_path)
    }
}

impl fmt::Display for ChangeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        match self.paths.as_slice() {
            [] => Ok(()),
            [only] => write!(f, " {}", only.display()),
            [from, to, ..] => write!(f, " {} -> {}", from.display(), to.display()),
        }
    }
}
