//! Directory-listing capability the checker runs against.
//!
//! All paths handed to a [`DocTree`] are relative to the repository root.
//! The empty path is the root itself.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Kind of a directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
}

/// A direct child of a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub name: String,
    pub kind: EntryKind,
}

impl TreeEntry {
    /// Hidden entries start with a dot and are ignored by every rule.
    pub fn is_hidden(&self) -> bool {
        self.name.starts_with('.')
    }
}

/// Read-only view of a repository tree.
pub trait DocTree {
    /// Direct children of `dir`, sorted by name.
    fn list(&self, dir: &Path) -> io::Result<Vec<TreeEntry>>;

    /// Full contents of `file`.
    fn read(&self, file: &Path) -> io::Result<Vec<u8>>;

    /// Whether anything exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Whether `path` is a directory.
    fn is_dir(&self, path: &Path) -> bool;
}

/// Real filesystem rooted at a repository directory.
#[derive(Debug, Clone)]
pub struct FsTree {
    root: PathBuf,
}

impl FsTree {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn abs(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}

impl DocTree for FsTree {
    fn list(&self, dir: &Path) -> io::Result<Vec<TreeEntry>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(self.abs(dir))? {
            let entry = entry?;
            // Symlinks are not followed: a link counts as a child but is
            // never descended into, so link cycles cannot loop the walk.
            let kind = if entry.file_type()?.is_dir() {
                EntryKind::Dir
            } else {
                EntryKind::File
            };
            entries.push(TreeEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                kind,
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn read(&self, file: &Path) -> io::Result<Vec<u8>> {
        fs::read(self.abs(file))
    }

    fn exists(&self, path: &Path) -> bool {
        self.abs(path).exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.abs(path).is_dir()
    }
}

/// In-memory tree for fixtures.
///
/// Adding a file registers all of its ancestor directories.
#[derive(Debug, Clone)]
pub struct MemTree {
    dirs: BTreeSet<PathBuf>,
    files: BTreeMap<PathBuf, Vec<u8>>,
    unreadable: BTreeSet<PathBuf>,
}

impl Default for MemTree {
    fn default() -> Self {
        let mut dirs = BTreeSet::new();
        dirs.insert(PathBuf::new());
        Self {
            dirs,
            files: BTreeMap::new(),
            unreadable: BTreeSet::new(),
        }
    }
}

impl MemTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an (empty) directory.
    pub fn dir(mut self, path: impl AsRef<Path>) -> Self {
        let path = normalize(path.as_ref()).unwrap_or_default();
        self.insert_ancestors(&path);
        self.dirs.insert(path);
        self
    }

    /// Add a file with the given contents.
    pub fn file(mut self, path: impl AsRef<Path>, contents: impl Into<Vec<u8>>) -> Self {
        let path = normalize(path.as_ref()).unwrap_or_default();
        self.insert_ancestors(&path);
        self.files.insert(path, contents.into());
        self
    }

    /// Add a file whose reads fail.
    pub fn unreadable_file(mut self, path: impl AsRef<Path>) -> Self {
        let path = normalize(path.as_ref()).unwrap_or_default();
        self.insert_ancestors(&path);
        self.files.insert(path.clone(), Vec::new());
        self.unreadable.insert(path);
        self
    }

    fn insert_ancestors(&mut self, path: &Path) {
        for ancestor in path.ancestors().skip(1) {
            self.dirs.insert(ancestor.to_path_buf());
        }
    }
}

fn child_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

impl DocTree for MemTree {
    fn list(&self, dir: &Path) -> io::Result<Vec<TreeEntry>> {
        if !self.dirs.contains(dir) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such directory: {}", dir.display()),
            ));
        }
        let subdirs = self
            .dirs
            .iter()
            .filter(|d| d.parent() == Some(dir))
            .map(|d| TreeEntry {
                name: child_name(d),
                kind: EntryKind::Dir,
            });
        let files = self
            .files
            .keys()
            .filter(|f| f.parent() == Some(dir))
            .map(|f| TreeEntry {
                name: child_name(f),
                kind: EntryKind::File,
            });
        let mut entries: Vec<TreeEntry> = subdirs.chain(files).collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn read(&self, file: &Path) -> io::Result<Vec<u8>> {
        if self.unreadable.contains(file) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "permission denied",
            ));
        }
        self.files.get(file).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file: {}", file.display()),
            )
        })
    }

    fn exists(&self, path: &Path) -> bool {
        self.dirs.contains(path) || self.files.contains_key(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.dirs.contains(path)
    }
}

/// Lexically resolve `.` and `..` in a repo-relative path.
///
/// Returns `None` when the path climbs above the root. Leading `/` is
/// treated as the repository root.
pub fn normalize(path: &Path) -> Option<PathBuf> {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
            Component::ParentDir => {
                if !out.pop() {
                    return None;
                }
            }
            Component::Normal(part) => out.push(part),
        }
    }
    Some(out)
}

/// `/`-separated form used in reports and exemption lists.
pub fn display_path(path: &Path) -> String {
    let joined = path
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}
