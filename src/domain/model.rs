use crate::utils::error::DupError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
    Csv,
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReportFormat::Text => "text",
            ReportFormat::Json => "json",
            ReportFormat::Csv => "csv",
        };
        f.write_str(name)
    }
}

/// Size and timestamps of a scanned file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    pub size: u64,
    pub modified: DateTime<Utc>,
    /// Birth time; not every filesystem records one.
    pub created: Option<DateTime<Utc>>,
}

impl FileMetadata {
    pub fn new(size: u64, modified: SystemTime, created: Option<SystemTime>) -> Self {
        Self {
            size,
            modified: modified.into(),
            created: created.map(Into::into),
        }
    }

    pub fn from_std(metadata: &std::fs::Metadata) -> std::io::Result<Self> {
        Ok(Self::new(
            metadata.len(),
            metadata.modified()?,
            metadata.created().ok(),
        ))
    }

    pub fn size_kb(&self) -> f64 {
        self.size as f64 / 1024.0
    }
}

impl fmt::Display for FileMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let created = self
            .created
            .map(|c| c.format(TIME_FORMAT).to_string())
            .unwrap_or_else(|| "n/a".to_string());
        write!(
            f,
            "FileMetadata: size={:.2}kb created={} modified={}",
            self.size_kb(),
            created,
            self.modified.format(TIME_FORMAT)
        )
    }
}

/// 檔案路徑 + md5 + 基本資訊
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub path: PathBuf,
    pub md5: String,
    pub metadata: FileMetadata,
}

impl fmt::Display for FileRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.md5, self.path.display())
    }
}

#[derive(Debug, Clone, Default)]
pub struct IndexResult {
    pub root: PathBuf,
    pub files: Vec<PathBuf>,
    pub denied_dirs: Vec<PathBuf>,
    pub unreadable_dirs: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct HashResult {
    pub root: PathBuf,
    pub records: Vec<FileRecord>,
    pub skipped: Vec<SkippedFile>,
    /// Files dropped by the minimum size filter.
    pub filtered: usize,
    /// Files never hashed because no other file shares their size.
    pub unique_sizes: usize,
    pub files_indexed: usize,
    pub denied_dirs: Vec<PathBuf>,
    pub unreadable_dirs: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Duplicate {
    pub index: usize,
    pub md5: String,
    pub original: PathBuf,
    pub duplicate: PathBuf,
    pub metadata: FileMetadata,
}

/// 同一 md5 的檔案，第一個保留
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    pub md5: String,
    pub size: u64,
    pub files: Vec<PathBuf>,
}

impl DuplicateGroup {
    pub fn kept(&self) -> Option<&PathBuf> {
        self.files.first()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteFailure {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DuplicateReport {
    pub root: PathBuf,
    pub duplicates: Vec<Duplicate>,
    pub groups: Vec<DuplicateGroup>,
    pub wasted_space: u64,
    pub files_indexed: usize,
    pub files_hashed: usize,
    pub files_skipped: Vec<SkippedFile>,
    pub denied_dirs: Vec<PathBuf>,
    pub unreadable_dirs: Vec<PathBuf>,
    pub deleted: Vec<PathBuf>,
    pub delete_failures: Vec<DeleteFailure>,
    pub dry_run: bool,
    /// Set when the report could not be written to its output file.
    #[serde(skip)]
    pub save_error: Option<Arc<DupError>>,
}

impl DuplicateReport {
    pub fn duplicate_count(&self) -> usize {
        self.duplicates.len()
    }

    pub fn wasted_space_kb(&self) -> f64 {
        self.wasted_space as f64 / 1024.0
    }

    pub fn is_deleted(&self, path: &std::path::Path) -> bool {
        self.deleted.iter().any(|p| p == path)
    }
}
