use crate::core::browser::FileBrowser;
use crate::core::detector::find_duplicates;
use crate::core::hasher::{hash_files, prefilter_by_size};
use crate::core::report;
use crate::core::{ConfigProvider, FileSystem, Pipeline};
use crate::domain::model::{DeleteFailure, Duplicate, DuplicateReport, HashResult, IndexResult};
use crate::utils::error::{DupError, Result};
use crate::utils::progress;
use crate::utils::validation::validate_regex;
use regex::Regex;
use std::path::PathBuf;
use std::sync::Arc;

/// Index → hash → detect, over any [`FileSystem`].
pub struct DuplicatePipeline<F: FileSystem, C: ConfigProvider> {
    fs: Arc<F>,
    config: C,
    name_regex: Option<Regex>,
}

impl<F: FileSystem, C: ConfigProvider> DuplicatePipeline<F, C> {
    pub fn new(fs: F, config: C) -> Result<Self> {
        let name_regex = config
            .name_pattern()
            .map(|pattern| validate_regex("name_pattern", pattern))
            .transpose()?;

        Ok(Self {
            fs: Arc::new(fs),
            config,
            name_regex,
        })
    }

    pub fn config(&self) -> &C {
        &self.config
    }
}

#[derive(Debug, Default)]
struct DeleteOutcome {
    deleted: Vec<PathBuf>,
    failures: Vec<DeleteFailure>,
}

fn delete_duplicates<F: FileSystem>(fs: &F, duplicates: &[Duplicate], dry_run: bool) -> DeleteOutcome {
    let mut outcome = DeleteOutcome::default();

    for dup in duplicates {
        if dry_run {
            tracing::info!("Would delete {}", dup.duplicate.display());
            outcome.deleted.push(dup.duplicate.clone());
            continue;
        }

        tracing::info!("Deleting {}", dup.duplicate.display());
        match fs.remove_file(&dup.duplicate) {
            Ok(()) => outcome.deleted.push(dup.duplicate.clone()),
            Err(source) => {
                let err = DupError::DeleteError {
                    path: dup.duplicate.clone(),
                    source,
                };
                tracing::error!("❌ {}", err);
                outcome.failures.push(DeleteFailure {
                    path: dup.duplicate.clone(),
                    reason: err.to_string(),
                });
            }
        }
    }

    outcome
}

#[async_trait::async_trait]
impl<F: FileSystem, C: ConfigProvider> Pipeline for DuplicatePipeline<F, C> {
    async fn extract(&self) -> Result<IndexResult> {
        let fs = Arc::clone(&self.fs);
        let root = self.config.root().to_path_buf();
        let name_regex = self.name_regex.clone();
        let show_progress = self.config.show_progress();

        tracing::debug!("Indexing files under {}", root.display());

        let index = tokio::task::spawn_blocking(move || {
            FileBrowser::new(&*fs, root)
                .index(name_regex.as_ref(), progress::index_spinner(show_progress))
        })
        .await??;

        tracing::info!(
            "Indexed {} files under {} ({} directories denied)",
            index.files.len(),
            index.root.display(),
            index.denied_dirs.len()
        );

        Ok(index)
    }

    async fn transform(&self, index: IndexResult) -> Result<HashResult> {
        let files_indexed = index.files.len();
        let min_size = self.config.min_size();
        let fs = Arc::clone(&self.fs);
        let files = index.files;

        let sized =
            tokio::task::spawn_blocking(move || prefilter_by_size(&*fs, files, min_size))
                .await?;

        tracing::debug!(
            "Size prefilter: {} candidates, {} unique sizes, {} below min size",
            sized.candidates.len(),
            sized.unique_sizes,
            sized.filtered
        );

        let bar = progress::hash_bar(self.config.show_progress(), sized.candidates.len() as u64);
        let outcome = hash_files(
            Arc::clone(&self.fs),
            sized.candidates,
            self.config.jobs(),
            bar,
        )
        .await?;

        let mut skipped = sized.skipped;
        skipped.extend(outcome.skipped);

        tracing::info!(
            "Hashed {} files, skipped {}",
            outcome.records.len(),
            skipped.len()
        );

        Ok(HashResult {
            root: index.root,
            records: outcome.records,
            skipped,
            filtered: sized.filtered,
            unique_sizes: sized.unique_sizes,
            files_indexed,
            denied_dirs: index.denied_dirs,
            unreadable_dirs: index.unreadable_dirs,
        })
    }

    async fn load(&self, hashed: HashResult) -> Result<DuplicateReport> {
        let files_hashed = hashed.records.len();
        let detection = find_duplicates(hashed.records);

        tracing::info!(
            "Found {} duplicates in {} groups ({} bytes wasted)",
            detection.duplicates.len(),
            detection.groups.len(),
            detection.wasted_space
        );

        let mut report = DuplicateReport {
            root: hashed.root,
            duplicates: detection.duplicates,
            groups: detection.groups,
            wasted_space: detection.wasted_space,
            files_indexed: hashed.files_indexed,
            files_hashed,
            files_skipped: hashed.skipped,
            denied_dirs: hashed.denied_dirs,
            unreadable_dirs: hashed.unreadable_dirs,
            deleted: Vec::new(),
            delete_failures: Vec::new(),
            dry_run: self.config.dry_run(),
            save_error: None,
        };

        if self.config.delete() && !report.duplicates.is_empty() {
            let fs = Arc::clone(&self.fs);
            let duplicates = report.duplicates.clone();
            let dry_run = report.dry_run;
            let outcome =
                tokio::task::spawn_blocking(move || delete_duplicates(&*fs, &duplicates, dry_run))
                    .await?;
            report.deleted = outcome.deleted;
            report.delete_failures = outcome.failures;
        }

        // 檔案可能已被刪除，存檔失敗時仍要回傳報告
        if let Some(output_path) = self.config.output_path() {
            let rendered = report::render(&report, self.config.report_format())?;
            match self.fs.write_file(output_path, rendered.as_bytes()) {
                Ok(()) => tracing::info!("📁 Report saved to: {}", output_path.display()),
                Err(source) => {
                    let err = DupError::ReportError {
                        path: output_path.to_path_buf(),
                        source,
                    };
                    tracing::error!("❌ {}", err);
                    report.save_error = Some(Arc::new(err));
                }
            }
        }

        Ok(report)
    }
}
