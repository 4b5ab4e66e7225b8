use crate::domain::model::IndexResult;
use crate::domain::ports::{EntryKind, FileSystem};
use crate::utils::error::{DupError, Result};
use indicatif::ProgressBar;
use regex::Regex;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Callback for each regular file the browser finds.
pub trait FileHandler {
    fn handle(&mut self, path: &Path, file_name: &str);
}

/// Collects found paths and ticks the indexing spinner.
pub struct FoundFiles {
    files: Vec<PathBuf>,
    progress: ProgressBar,
}

impl FoundFiles {
    pub fn new(progress: ProgressBar) -> Self {
        Self {
            files: Vec::new(),
            progress,
        }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn into_files(self) -> Vec<PathBuf> {
        self.progress.finish_and_clear();
        self.files
    }
}

impl FileHandler for FoundFiles {
    fn handle(&mut self, path: &Path, _file_name: &str) {
        self.files.push(path.to_path_buf());
        self.progress.set_position(self.files.len() as u64);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkStats {
    pub files: usize,
    pub dirs: usize,
    pub skipped_links: usize,
    pub denied_dirs: Vec<PathBuf>,
    pub unreadable_dirs: Vec<PathBuf>,
}

/// 遞迴走訪 root 底下所有檔案
pub struct FileBrowser<'a, F: FileSystem> {
    fs: &'a F,
    root: PathBuf,
}

impl<'a, F: FileSystem> FileBrowser<'a, F> {
    pub fn new(fs: &'a F, root: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            root: root.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Fails only when the root itself cannot be scanned.
    pub fn check_root(&self) -> Result<()> {
        match self.fs.entry_kind(&self.root) {
            Ok(EntryKind::Directory) => Ok(()),
            Ok(_) => Err(DupError::ScanRootError {
                path: self.root.clone(),
                reason: "not a directory".to_string(),
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(DupError::ScanRootError {
                path: self.root.clone(),
                reason: "does not exist".to_string(),
            }),
            Err(e) => Err(DupError::ScanRootError {
                path: self.root.clone(),
                reason: e.to_string(),
            }),
        }
    }

    /// Walks the tree depth-first in name order. `name_regex` must match at the
    /// start of the file name.
    pub fn process_files<H: FileHandler>(
        &self,
        name_regex: Option<&Regex>,
        handler: &mut H,
    ) -> Result<WalkStats> {
        self.check_root()?;

        let mut stats = WalkStats::default();
        let mut pending = vec![self.root.clone()];

        while let Some(dir) = pending.pop() {
            let mut entries = match self.fs.read_dir(&dir) {
                Ok(entries) => entries,
                Err(e) if e.kind() == ErrorKind::PermissionDenied => {
                    tracing::error!("[Error] Permission denied to: {}", dir.display());
                    stats.denied_dirs.push(dir);
                    continue;
                }
                Err(e) => {
                    tracing::warn!("Cannot read directory {}: {}", dir.display(), e);
                    stats.unreadable_dirs.push(dir);
                    continue;
                }
            };
            stats.dirs += 1;
            entries.sort_by(|a, b| a.name.cmp(&b.name));

            let mut subdirs = Vec::new();
            for entry in entries {
                match entry.kind {
                    EntryKind::File => {
                        if matches_start(name_regex, &entry.name) {
                            handler.handle(&entry.path, &entry.name);
                            stats.files += 1;
                        }
                    }
                    EntryKind::Directory => subdirs.push(entry.path),
                    EntryKind::Symlink => {
                        tracing::debug!("Skipping symlink {}", entry.path.display());
                        stats.skipped_links += 1;
                    }
                    EntryKind::Other => {
                        tracing::debug!("Skipping special file {}", entry.path.display());
                    }
                }
            }

            // stack 後進先出，反向推入以維持名稱順序
            pending.extend(subdirs.into_iter().rev());
        }

        tracing::debug!(
            "Walked {} directories under {}, {} files matched",
            stats.dirs,
            self.root.display(),
            stats.files
        );

        Ok(stats)
    }

    /// Convenience wrapper that collects every matching path.
    pub fn index(&self, name_regex: Option<&Regex>, progress: ProgressBar) -> Result<IndexResult> {
        let mut found = FoundFiles::new(progress);
        let stats = self.process_files(name_regex, &mut found)?;

        Ok(IndexResult {
            root: self.root.clone(),
            files: found.into_files(),
            denied_dirs: stats.denied_dirs,
            unreadable_dirs: stats.unreadable_dirs,
        })
    }
}

fn matches_start(name_regex: Option<&Regex>, file_name: &str) -> bool {
    match name_regex {
        None => true,
        Some(re) => re.find(file_name).is_some_and(|m| m.start() == 0),
    }
}
