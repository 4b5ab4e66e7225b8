use crate::domain::model::{DuplicateReport, FileMetadata, HashResult, IndexResult, ReportFormat};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    Symlink,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub path: PathBuf,
    pub name: String,
    pub kind: EntryKind,
}

/// Filesystem access used by the scanner. Calls are blocking; async code runs
/// them on the blocking pool.
pub trait FileSystem: Send + Sync + 'static {
    /// Lists a directory. Entry kinds do not follow symlinks.
    fn read_dir(&self, path: &Path) -> std::io::Result<Vec<DirEntry>>;
    /// Kind of `path`, following symlinks.
    fn entry_kind(&self, path: &Path) -> std::io::Result<EntryKind>;
    fn metadata(&self, path: &Path) -> std::io::Result<FileMetadata>;
    fn open(&self, path: &Path) -> std::io::Result<Box<dyn Read + Send>>;
    fn remove_file(&self, path: &Path) -> std::io::Result<()>;
    fn write_file(&self, path: &Path, data: &[u8]) -> std::io::Result<()>;
}

pub trait ConfigProvider: Send + Sync {
    fn root(&self) -> &Path;
    fn name_pattern(&self) -> Option<&str>;
    fn min_size(&self) -> u64;
    fn jobs(&self) -> usize;
    fn delete(&self) -> bool;
    fn dry_run(&self) -> bool;
    fn report_format(&self) -> ReportFormat;
    fn output_path(&self) -> Option<&Path>;
    fn show_progress(&self) -> bool;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<IndexResult>;
    async fn transform(&self, index: IndexResult) -> Result<HashResult>;
    async fn load(&self, hashed: HashResult) -> Result<DuplicateReport>;
}

/// Absolute working directory, used when no root is configured.
pub fn default_root() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

pub fn default_jobs() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}
