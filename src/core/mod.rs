pub mod browser;
pub mod detector;
pub mod engine;
pub mod hasher;
pub mod pipeline;
pub mod report;

#[cfg(test)]
pub(crate) mod mock_fs;

pub use crate::domain::model::{DuplicateReport, FileRecord, HashResult, IndexResult};
pub use crate::domain::ports::{ConfigProvider, FileSystem, Pipeline};
pub use crate::utils::error::Result;
