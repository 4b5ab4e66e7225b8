pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::LocalFileSystem;
pub use config::toml_config::TomlConfig;
pub use core::{engine::ScanEngine, pipeline::DuplicatePipeline};
pub use domain::model::{DuplicateReport, ReportFormat};
pub use utils::error::{DupError, Result};
