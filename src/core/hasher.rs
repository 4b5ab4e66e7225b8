use crate::domain::model::{FileMetadata, FileRecord, SkippedFile};
use crate::domain::ports::FileSystem;
use crate::utils::error::{DupError, Result};
use indicatif::ProgressBar;
use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

const BLOCK_SIZE: usize = 4096;

/// Streams `reader` through MD5 and returns the lowercase hex digest.
pub fn md5_hex<R: Read>(mut reader: R) -> std::io::Result<String> {
    let mut context = md5::Context::new();
    let mut block = [0u8; BLOCK_SIZE];
    loop {
        let n = match reader.read(&mut block) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        context.consume(&block[..n]);
    }
    Ok(format!("{:x}", context.compute()))
}

pub fn hash_file<F: FileSystem + ?Sized>(
    fs: &F,
    path: &Path,
    metadata: Option<FileMetadata>,
) -> Result<FileRecord> {
    let hash_error = |source: std::io::Error| DupError::HashError {
        path: path.to_path_buf(),
        source,
    };

    let reader = fs.open(path).map_err(hash_error)?;
    let md5 = md5_hex(reader).map_err(hash_error)?;
    let metadata = match metadata {
        Some(metadata) => metadata,
        None => fs.metadata(path).map_err(hash_error)?,
    };

    Ok(FileRecord {
        path: path.to_path_buf(),
        md5,
        metadata,
    })
}

/// Output of [`prefilter_by_size`].
#[derive(Debug, Default)]
pub struct SizeCandidates {
    pub candidates: Vec<(PathBuf, FileMetadata)>,
    pub skipped: Vec<SkippedFile>,
    pub filtered: usize,
    pub unique_sizes: usize,
}

/// Stats every file and keeps only those whose size is shared with another
/// file and is at least `min_size`. Input order is preserved.
pub fn prefilter_by_size<F: FileSystem + ?Sized>(
    fs: &F,
    files: Vec<PathBuf>,
    min_size: u64,
) -> SizeCandidates {
    let mut result = SizeCandidates::default();
    let mut sized = Vec::with_capacity(files.len());

    for path in files {
        match fs.metadata(&path) {
            Ok(metadata) if metadata.size < min_size => result.filtered += 1,
            Ok(metadata) => sized.push((path, metadata)),
            Err(e) => {
                tracing::warn!("Cannot stat {}: {}", path.display(), e);
                result.skipped.push(SkippedFile {
                    path,
                    reason: e.to_string(),
                });
            }
        }
    }

    let mut size_counts: HashMap<u64, usize> = HashMap::new();
    for (_, metadata) in &sized {
        *size_counts.entry(metadata.size).or_default() += 1;
    }

    for (path, metadata) in sized {
        if size_counts.get(&metadata.size).copied().unwrap_or(0) > 1 {
            result.candidates.push((path, metadata));
        } else {
            result.unique_sizes += 1;
        }
    }

    result
}

/// Hashed records in input order, plus files that could not be read.
#[derive(Debug, Default)]
pub struct HashOutcome {
    pub records: Vec<FileRecord>,
    pub skipped: Vec<SkippedFile>,
}

/// Hashes files on the blocking pool, at most `jobs` at a time.
pub async fn hash_files<F: FileSystem>(
    fs: Arc<F>,
    files: Vec<(PathBuf, FileMetadata)>,
    jobs: usize,
    progress: ProgressBar,
) -> Result<HashOutcome> {
    let total = files.len();
    let semaphore = Arc::new(Semaphore::new(jobs.max(1)));
    let mut tasks = JoinSet::new();

    for (index, (path, metadata)) in files.into_iter().enumerate() {
        let fs = Arc::clone(&fs);
        let semaphore = Arc::clone(&semaphore);
        tasks.spawn(async move {
            let permit = semaphore.acquire_owned().await?;
            let task_path = path.clone();
            let result = tokio::task::spawn_blocking(move || {
                let _permit = permit;
                hash_file(&*fs, &task_path, Some(metadata))
            })
            .await?;
            Ok::<_, DupError>((index, path, result))
        });
    }

    let mut slots: Vec<Option<FileRecord>> = vec![None; total];
    let mut skipped = Vec::new();
    let mut done = 0u64;

    while let Some(joined) = tasks.join_next().await {
        let (index, path, result) = joined??;
        match result {
            Ok(record) => slots[index] = Some(record),
            Err(e) => {
                tracing::warn!("Skipping {}: {}", path.display(), e);
                skipped.push(SkippedFile {
                    path,
                    reason: e.to_string(),
                });
            }
        }
        done += 1;
        progress.set_position(done);
    }
    progress.finish_and_clear();

    skipped.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(HashOutcome {
        records: slots.into_iter().flatten().collect(),
        skipped,
    })
}
