//! Physical storage under the data root.
//!
//! All filesystem access goes through the [`Storage`] trait. Paths are
//! `/`-separated and relative to the data root; `""` is the root itself.
//!
//! ```text
//! {data_root}/
//! ├── downloads/
//! │   ├── shared.cfg
//! │   └── users/
//! │       └── {folder}/
//! ├── uploads/
//! │   └── {folder}/
//! └── logs/
//! ```

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use walkdir::WalkDir;

/// Size and modification time of a stored file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FileStat {
    /// Size in bytes.
    pub size: u64,
    /// Modification time as fractional Unix seconds.
    pub mtime: f64,
}

/// A file the recursive walk could not visit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkIssue {
    /// Relative path of the entry, when known.
    pub path: String,
    /// Error detail.
    pub detail: String,
}

/// Storage operations used by the file store, change set computer and audit log.
pub trait Storage: Send + Sync {
    /// Read a whole file.
    fn read(&self, path: &str) -> io::Result<Vec<u8>>;

    /// Write a whole file, creating parent directories. Replaces existing content.
    fn write(&self, path: &str, content: &[u8]) -> io::Result<()>;

    /// Append to a file, creating it and its parent directories.
    fn append(&self, path: &str, content: &[u8]) -> io::Result<()>;

    /// Remove a single file.
    fn remove_file(&self, path: &str) -> io::Result<()>;

    /// Whether `path` is an existing regular file.
    fn is_file(&self, path: &str) -> bool;

    /// Whether `path` is an existing directory.
    fn is_dir(&self, path: &str) -> bool;

    /// Names of regular files directly inside `dir`. Missing dir is empty.
    fn list_files(&self, dir: &str) -> io::Result<Vec<String>>;

    /// Names of directories directly inside `dir`. Missing dir is empty.
    fn list_dirs(&self, dir: &str) -> io::Result<Vec<String>>;

    /// Create `dir` and all of its parents.
    fn create_dir_all(&self, dir: &str) -> io::Result<()>;

    /// Size and modification time of a file.
    fn stat(&self, path: &str) -> io::Result<FileStat>;

    /// Relative paths of every regular file below `dir`, recursively.
    ///
    /// Entries that cannot be visited are returned as `Err` items; the walk
    /// carries on past them.
    fn walk_files(&self, dir: &str) -> Vec<Result<String, WalkIssue>>;
}

/// [`Storage`] backed by a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    /// Create storage rooted at `root`, creating the directory if needed.
    pub fn new(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// The data root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a relative path onto the root.
    ///
    /// Only plain name components are accepted, so nothing that reaches the
    /// filesystem can point outside the root.
    fn resolve(&self, path: &str) -> io::Result<PathBuf> {
        let mut full = self.root.clone();
        for component in Path::new(path).components() {
            match component {
                Component::Normal(part) => full.push(part),
                Component::CurDir => {}
                _ => {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidInput,
                        format!("path escapes storage root: {path}"),
                    ))
                }
            }
        }
        Ok(full)
    }

    /// Convert an absolute path under the root back to a relative `/` path.
    fn relative(&self, full: &Path) -> Option<String> {
        let rel = full.strip_prefix(&self.root).ok()?;
        let parts: Vec<String> = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        Some(parts.join("/"))
    }

    fn list_entries(&self, dir: &str, want_dirs: bool) -> io::Result<Vec<String>> {
        let entries = match fs::read_dir(self.resolve(dir)?) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            let file_type = entry.file_type()?;
            let matches = if want_dirs {
                file_type.is_dir()
            } else {
                file_type.is_file()
            };
            if matches {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }
}

fn to_unix_secs(time: SystemTime) -> f64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(d) => d.as_secs_f64(),
        Err(e) => -e.duration().as_secs_f64(),
    }
}

impl Storage for LocalStorage {
    fn read(&self, path: &str) -> io::Result<Vec<u8>> {
        fs::read(self.resolve(path)?)
    }

    fn write(&self, path: &str, content: &[u8]) -> io::Result<()> {
        let full = self.resolve(path)?;
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(full, content)
    }

    fn append(&self, path: &str, content: &[u8]) -> io::Result<()> {
        let full = self.resolve(path)?;
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new().create(true).append(true).open(full)?;
        file.write_all(content)
    }

    fn remove_file(&self, path: &str) -> io::Result<()> {
        fs::remove_file(self.resolve(path)?)
    }

    fn is_file(&self, path: &str) -> bool {
        self.resolve(path).map(|p| p.is_file()).unwrap_or(false)
    }

    fn is_dir(&self, path: &str) -> bool {
        self.resolve(path).map(|p| p.is_dir()).unwrap_or(false)
    }

    fn list_files(&self, dir: &str) -> io::Result<Vec<String>> {
        self.list_entries(dir, false)
    }

    fn list_dirs(&self, dir: &str) -> io::Result<Vec<String>> {
        self.list_entries(dir, true)
    }

    fn create_dir_all(&self, dir: &str) -> io::Result<()> {
        fs::create_dir_all(self.resolve(dir)?)
    }

    fn stat(&self, path: &str) -> io::Result<FileStat> {
        let meta = fs::metadata(self.resolve(path)?)?;
        Ok(FileStat {
            size: meta.len(),
            mtime: meta.modified().map(to_unix_secs).unwrap_or(0.0),
        })
    }

    fn walk_files(&self, dir: &str) -> Vec<Result<String, WalkIssue>> {
        let start = match self.resolve(dir) {
            Ok(start) if start.is_dir() => start,
            Ok(_) => return Vec::new(),
            Err(e) => {
                return vec![Err(WalkIssue {
                    path: dir.to_string(),
                    detail: e.to_string(),
                })]
            }
        };

        WalkDir::new(start)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) if entry.file_type().is_file() => {
                    self.relative(entry.path()).map(Ok)
                }
                Ok(_) => None,
                Err(e) => Some(Err(WalkIssue {
                    path: e
                        .path()
                        .and_then(|p| self.relative(p))
                        .unwrap_or_else(|| dir.to_string()),
                    detail: e.to_string(),
                })),
            })
            .collect()
    }
}
