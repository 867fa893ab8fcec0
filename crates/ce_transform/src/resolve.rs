//! Completion of relative `require` specifiers against the filesystem.
//!
//! ESM loaders do not probe extensions or directory indexes, so
//! `require("./lib")` has to become `"./lib.js"` or `"./lib/index.js"`
//! depending on what is actually on disk.
//!
//! - `node:path` -> `node:path`
//! - `dayjs` -> `dayjs`
//! - `.` -> `./index.js`
//! - `./` -> `./index.js`
//! - `./file` -> `./file.js` or `./file/index.js`

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use ce_ast::ResolvedSpecifier;

/// Existence check used by the resolver.
pub trait FileSystem {
    fn exists(&self, path: &Path) -> bool;
}

/// The real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// A fixed set of paths, for tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryFileSystem {
    files: HashSet<PathBuf>,
}

impl MemoryFileSystem {
    pub fn new<I, P>(files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut fs = Self::default();
        for file in files {
            fs.insert(file);
        }
        fs
    }

    pub fn insert(&mut self, path: impl AsRef<Path>) {
        self.files.insert(normalize(path.as_ref()));
    }
}

impl FileSystem for MemoryFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.files.contains(&normalize(path))
    }
}

/// Lexically fold `.` and `..` components.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = matches!(out.components().next_back(), Some(Component::Normal(_)))
                    && out.pop();
                if !popped {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Whether a specifier is resolved against the importing file.
pub fn is_local(specifier: &str) -> bool {
    specifier == "." || specifier.starts_with("./") || specifier.starts_with("../")
}

/// Complete `specifier` relative to `base_dir`, the importing file's directory.
pub fn resolve(
    base_dir: &Path,
    specifier: &str,
    extension: &str,
    fs: &dyn FileSystem,
) -> ResolvedSpecifier {
    let index = format!("index.{extension}");

    if specifier == "." {
        let path = if probe(fs, &base_dir.join(&index)) {
            format!("./{index}")
        } else {
            specifier.to_string()
        };
        return local(path);
    }

    if !is_local(specifier) {
        return ResolvedSpecifier {
            path: specifier.to_string(),
            is_local: false,
        };
    }

    if Path::new(specifier).extension().is_some() {
        return local(specifier.to_string());
    }

    let file = format!("{specifier}.{extension}");
    if probe(fs, &base_dir.join(&file)) {
        return local(file);
    }

    let dir_index = if specifier.ends_with('/') {
        format!("{specifier}{index}")
    } else {
        format!("{specifier}/{index}")
    };
    if probe(fs, &base_dir.join(&dir_index)) {
        return local(dir_index);
    }

    tracing::debug!(specifier, base = %base_dir.display(), "no file or index found, keeping specifier");
    local(specifier.to_string())
}

fn probe(fs: &dyn FileSystem, path: &Path) -> bool {
    let path = normalize(path);
    let found = fs.exists(&path);
    tracing::trace!(path = %path.display(), found, "probe");
    found
}

fn local(path: String) -> ResolvedSpecifier {
    ResolvedSpecifier {
        path,
        is_local: true,
    }
}
