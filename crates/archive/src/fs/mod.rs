//! Filesystem capability the vault reads through.
//!
//! Everything the query code needs from storage goes through [`VaultFs`], so
//! the same logic runs against the real disk ([`DiskFs`]) or an in-memory
//! tree ([`MemoryFs`]) in tests.

mod memory;

use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

pub use memory::MemoryFs;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Dir,
    File,
}

/// One child of a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub path: PathBuf,
    pub kind: EntryKind,
}

impl DirEntry {
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    pub fn is_hidden(&self) -> bool {
        self.name.starts_with('.')
    }
}

pub trait VaultFs: Send + Sync {
    fn is_dir(&self, path: &Path) -> bool;

    /// Children of `path`, sorted by name.
    fn list_children(&self, path: &Path) -> io::Result<Vec<DirEntry>>;

    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// `path` with symlinks resolved. Stores without links return it as is.
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        Ok(path.to_path_buf())
    }

    /// Every file below `root` in depth-first name order, skipping hidden
    /// files and directories. Unreadable directories are skipped.
    fn walk_files(&self, root: &Path) -> Vec<PathBuf> {
        let mut files = Vec::new();
        walk_into(self, root, &mut files);
        files
    }
}

fn walk_into<F: VaultFs + ?Sized>(fs: &F, dir: &Path, files: &mut Vec<PathBuf>) {
    let Ok(children) = fs.list_children(dir) else {
        return;
    };
    for child in children.into_iter().filter(|c| !c.is_hidden()) {
        match child.kind {
            EntryKind::File => files.push(child.path),
            EntryKind::Dir => walk_into(fs, &child.path, files),
        }
    }
}

/// [`VaultFs`] over the local disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskFs;

impl VaultFs for DiskFs {
    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn list_children(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(path)? {
            let Ok(entry) = entry else {
                continue;
            };
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            let path = entry.path();
            // Follow symlinks so a linked category folder still counts.
            let Ok(meta) = std::fs::metadata(&path) else {
                continue;
            };
            let kind = if meta.is_dir() {
                EntryKind::Dir
            } else {
                EntryKind::File
            };
            entries.push(DirEntry { name, path, kind });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        std::fs::canonicalize(path)
    }

    fn walk_files(&self, root: &Path) -> Vec<PathBuf> {
        WalkDir::new(root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'))
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .collect()
    }
}
