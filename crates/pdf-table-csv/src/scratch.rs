use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const DEFAULT_SCRATCH_DIR: &str = "/tmp";

/// Local staging area for the downloaded PDF and the generated CSV.
///
/// Files are overwritten in place and never removed; the host is expected to
/// discard the area between invocations.
pub trait Scratch {
    fn dir(&self) -> &Path;

    fn write(&mut self, path: &Path, bytes: &[u8]) -> io::Result<()>;

    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Path for `file_name` inside the scratch directory.
    fn path_for(&self, file_name: &str) -> PathBuf {
        self.dir().join(file_name)
    }

    /// Releases whatever an earlier event staged. Files on disk are left to
    /// the host.
    fn release(&mut self) {}
}

/// Scratch space backed by a real directory.
#[derive(Debug, Clone)]
pub struct DirScratch {
    dir: PathBuf,
}

impl DirScratch {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl Default for DirScratch {
    fn default() -> Self {
        Self::new(DEFAULT_SCRATCH_DIR)
    }
}

impl Scratch for DirScratch {
    fn dir(&self) -> &Path {
        &self.dir
    }

    fn write(&mut self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        fs::write(path, bytes)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }
}

/// In-memory scratch space for hosts without a writable filesystem.
#[derive(Debug, Clone, Default)]
pub struct MemScratch {
    dir: PathBuf,
    files: BTreeMap<PathBuf, Vec<u8>>,
}

impl MemScratch {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            files: BTreeMap::new(),
        }
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.files.keys().map(PathBuf::as_path)
    }

    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }
}

impl Scratch for MemScratch {
    fn dir(&self) -> &Path {
        &self.dir
    }

    fn write(&mut self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        self.files.insert(path.to_path_buf(), bytes.to_vec());
        Ok(())
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no scratch file at {}", path.display()),
            )
        })
    }

    fn release(&mut self) {
        self.files.clear();
    }
}
