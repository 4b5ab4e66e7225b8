use crate::core::ConfigProvider;
use crate::domain::model::ReportFormat;
use crate::domain::ports::{default_jobs, default_root};
use crate::utils::error::{DupError, Result};
use crate::utils::validation::{
    validate_dry_run, validate_path, validate_range, validate_regex, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub hash: HashConfig,
    #[serde(default)]
    pub actions: ActionsConfig,
    #[serde(default)]
    pub report: ReportConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanConfig {
    pub root: Option<PathBuf>,
    pub name_pattern: Option<String>,
    pub min_size: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HashConfig {
    pub jobs: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionsConfig {
    pub delete: Option<bool>,
    pub dry_run: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    pub format: Option<ReportFormat>,
    pub output_path: Option<PathBuf>,
    pub progress: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(DupError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| DupError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SCAN_ROOT})，未定義的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| DupError::ConfigError {
            message: format!("env substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 命令列參數覆蓋檔案設定
    #[cfg(feature = "cli")]
    pub fn with_overrides(mut self, cli: &crate::config::CliConfig) -> Self {
        if let Some(root) = &cli.root {
            self.scan.root = Some(root.clone());
        }
        if let Some(pattern) = &cli.name_pattern {
            self.scan.name_pattern = Some(pattern.clone());
        }
        if let Some(min_size) = cli.min_size {
            self.scan.min_size = Some(min_size);
        }
        if let Some(jobs) = cli.jobs {
            self.hash.jobs = Some(jobs);
        }
        if cli.delete {
            self.actions.delete = Some(true);
        }
        if cli.dry_run {
            self.actions.dry_run = Some(true);
        }
        if let Some(format) = cli.format {
            self.report.format = Some(format);
        }
        if let Some(output) = &cli.output {
            self.report.output_path = Some(output.clone());
        }
        if cli.no_progress {
            self.report.progress = Some(false);
        }
        if cli.monitor {
            self.monitoring = Some(MonitoringConfig { enabled: true });
        }
        self
    }

    /// 未設定 scan.root 時使用目前工作目錄
    pub fn with_default_root(mut self) -> Self {
        self.scan.root.get_or_insert_with(default_root);
        self
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_path("scan.root", self.root())?;

        if let Some(jobs) = self.hash.jobs {
            validate_range("hash.jobs", jobs, 1, 1024)?;
        }

        if let Some(pattern) = &self.scan.name_pattern {
            validate_regex("scan.name_pattern", pattern)?;
        }

        if let Some(output) = &self.report.output_path {
            validate_path("report.output_path", output)?;
        }

        validate_dry_run(self.delete(), self.dry_run())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn root(&self) -> &Path {
        self.scan.root.as_deref().unwrap_or(Path::new("."))
    }

    fn name_pattern(&self) -> Option<&str> {
        self.scan.name_pattern.as_deref()
    }

    fn min_size(&self) -> u64 {
        self.scan.min_size.unwrap_or(0)
    }

    fn jobs(&self) -> usize {
        self.hash.jobs.unwrap_or_else(default_jobs)
    }

    fn delete(&self) -> bool {
        self.actions.delete.unwrap_or(false)
    }

    fn dry_run(&self) -> bool {
        self.actions.dry_run.unwrap_or(false)
    }

    fn report_format(&self) -> ReportFormat {
        self.report.format.unwrap_or_default()
    }

    fn output_path(&self) -> Option<&Path> {
        self.report.output_path.as_deref()
    }

    fn show_progress(&self) -> bool {
        self.report.progress.unwrap_or(true)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
