pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli_config::CliConfig;

#[cfg(feature = "cli")]
mod cli_config {
    use crate::core::ConfigProvider;
    use crate::domain::model::ReportFormat;
    use crate::domain::ports::{default_jobs, default_root};
    use crate::utils::error::Result;
    use crate::utils::validation::{
        validate_dry_run, validate_path, validate_range, validate_regex, Validate,
    };
    use clap::Parser;
    use serde::{Deserialize, Serialize};
    use std::path::{Path, PathBuf};

    #[derive(Debug, Clone, Default, Serialize, Deserialize, Parser)]
    #[command(name = "dupfind")]
    #[command(about = "Check duplicates in given folder and subfolders")]
    pub struct CliConfig {
        /// Starting directory for the scan [default: current directory]
        #[arg(short, long)]
        pub root: Option<PathBuf>,

        /// Delete duplicates, keeping the first file of each group
        #[arg(short, long)]
        pub delete: bool,

        /// With --delete, only print what would be removed
        #[arg(long)]
        pub dry_run: bool,

        /// Only scan files whose name matches this regex (anchored at the start)
        #[arg(short, long)]
        pub name_pattern: Option<String>,

        /// Ignore files smaller than this many bytes
        #[arg(long)]
        pub min_size: Option<u64>,

        /// Number of files hashed concurrently [default: CPU count]
        #[arg(short, long)]
        pub jobs: Option<usize>,

        /// Report format
        #[arg(short, long, value_enum)]
        pub format: Option<ReportFormat>,

        /// Write the report to this file
        #[arg(short, long)]
        pub output: Option<PathBuf>,

        /// Load settings from a TOML file; flags override it
        #[arg(short, long)]
        pub config: Option<PathBuf>,

        /// Hide progress bars
        #[arg(long)]
        pub no_progress: bool,

        /// Log CPU and memory usage per phase
        #[arg(long)]
        pub monitor: bool,

        /// Emit logs as JSON lines
        #[arg(long)]
        pub log_json: bool,

        /// Enable verbose output
        #[arg(short, long)]
        pub verbose: bool,
    }

    impl CliConfig {
        /// Fills in the working directory when `--root` is not given.
        pub fn with_default_root(mut self) -> Self {
            self.root.get_or_insert_with(default_root);
            self
        }
    }

    impl ConfigProvider for CliConfig {
        fn root(&self) -> &Path {
            self.root.as_deref().unwrap_or(Path::new("."))
        }

        fn name_pattern(&self) -> Option<&str> {
            self.name_pattern.as_deref()
        }

        fn min_size(&self) -> u64 {
            self.min_size.unwrap_or(0)
        }

        fn jobs(&self) -> usize {
            self.jobs.unwrap_or_else(default_jobs)
        }

        fn delete(&self) -> bool {
            self.delete
        }

        fn dry_run(&self) -> bool {
            self.dry_run
        }

        fn report_format(&self) -> ReportFormat {
            self.format.unwrap_or_default()
        }

        fn output_path(&self) -> Option<&Path> {
            self.output.as_deref()
        }

        fn show_progress(&self) -> bool {
            !self.no_progress
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validate_path("root", self.root())?;

            if let Some(jobs) = self.jobs {
                validate_range("jobs", jobs, 1, 1024)?;
            }

            if let Some(pattern) = &self.name_pattern {
                validate_regex("name_pattern", pattern)?;
            }

            if let Some(output) = &self.output {
                validate_path("output", output)?;
            }

            validate_dry_run(self.delete, self.dry_run)
        }
    }

}
