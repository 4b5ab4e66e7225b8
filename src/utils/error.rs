use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DupError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Cannot scan {}: {reason}", path.display())]
    ScanRootError { path: PathBuf, reason: String },

    #[error("Failed to hash {}: {source}", path.display())]
    HashError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to delete {}: {source}", path.display())]
    DeleteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write report to {}: {source}", path.display())]
    ReportError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Background task failed: {message}")]
    TaskError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    FileSystem,
    Processing,
    Output,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl DupError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            DupError::ConfigError { .. }
            | DupError::ConfigValidationError { .. }
            | DupError::InvalidConfigValueError { .. }
            | DupError::MissingConfigError { .. } => ErrorCategory::Configuration,
            DupError::IoError(_)
            | DupError::ScanRootError { .. }
            | DupError::HashError { .. }
            | DupError::DeleteError { .. } => ErrorCategory::FileSystem,
            DupError::SerializationError(_) | DupError::CsvError(_) => ErrorCategory::Processing,
            DupError::ReportError { .. } => ErrorCategory::Output,
            DupError::TaskError { .. } => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 單一檔案失敗不影響整體結果
            DupError::HashError { .. } | DupError::DeleteError { .. } => ErrorSeverity::Low,
            DupError::ReportError { .. } => ErrorSeverity::Medium,
            DupError::TaskError { .. } => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            DupError::ConfigError { .. }
            | DupError::ConfigValidationError { .. }
            | DupError::InvalidConfigValueError { .. }
            | DupError::MissingConfigError { .. } => {
                "Check the command line flags and the TOML config file"
            }
            DupError::ScanRootError { .. } => {
                "Make sure the root exists and is a directory (in a container, mount it with -v <host dir>:/data)"
            }
            DupError::IoError(_) | DupError::HashError { .. } => {
                "Check file permissions and that the files are not being modified during the scan"
            }
            DupError::DeleteError { .. } => "Check write permissions on the parent directory",
            DupError::ReportError { .. } => "Check that the report output directory is writable",
            DupError::SerializationError(_) | DupError::CsvError(_) => {
                "Try a different report format"
            }
            DupError::TaskError { .. } => "Retry the scan; if it keeps failing lower --jobs",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::FileSystem => format!("Filesystem problem: {}", self),
            ErrorCategory::Processing => format!("Could not build the report: {}", self),
            ErrorCategory::Output => format!("Could not save the report: {}", self),
            ErrorCategory::System => format!("Internal error: {}", self),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl From<tokio::task::JoinError> for DupError {
    fn from(err: tokio::task::JoinError) -> Self {
        DupError::TaskError {
            message: err.to_string(),
        }
    }
}

impl From<tokio::sync::AcquireError> for DupError {
    fn from(err: tokio::sync::AcquireError) -> Self {
        DupError::TaskError {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DupError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_root_error_is_high_severity() {
        let err = DupError::ScanRootError {
            path: PathBuf::from("/data"),
            reason: "does not exist".to_string(),
        };

        assert_eq!(err.category(), ErrorCategory::FileSystem);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert_eq!(err.exit_code(), 1);
        assert_eq!(err.to_string(), "Cannot scan /data: does not exist");
        assert!(err.recovery_suggestion().contains("/data"));
    }

    #[test]
    fn test_config_errors_map_to_configuration() {
        let err = DupError::InvalidConfigValueError {
            field: "jobs".to_string(),
            value: "0".to_string(),
            reason: "Value must be between 1 and 1024".to_string(),
        };

        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert!(err.user_friendly_message().starts_with("Invalid configuration"));
    }

    #[test]
    fn test_exit_codes_follow_severity() {
        let task = DupError::TaskError {
            message: "panicked".to_string(),
        };
        let report = DupError::ReportError {
            path: PathBuf::from("out.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };

        assert_eq!(task.exit_code(), 3);
        assert_eq!(report.exit_code(), 2);
    }
}
