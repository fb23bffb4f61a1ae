use crate::core::scanner::ScanSettings;
use crate::core::scheduler::{SchedulerSettings, DEFAULT_SECTORS};
use crate::domain::ports::OutputFormat;
use crate::utils::error::{Result, ScoutError};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const API_KEY_ENV: &str = "OXYLABS_API_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoutConfig {
    pub extraction: ExtractionConfig,
    pub scheduler: SchedulerConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub provider: String,
    pub api_key: Option<String>,
    pub base_url: String,
    pub return_sources_limit: u32,
    pub output_format: OutputFormat,
    pub timeout_seconds: u64,
    pub poll_interval_seconds: u64,
    pub max_polls: u32,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            provider: "oxylabs".to_string(),
            api_key: None,
            base_url: "https://api-aistudio.oxylabs.io".to_string(),
            return_sources_limit: 10,
            output_format: OutputFormat::Json,
            timeout_seconds: 120,
            poll_interval_seconds: 5,
            max_polls: 60,
        }
    }
}

impl ExtractionConfig {
    /// 設定檔中的 key 優先；未替換的 `${VAR}` 視為沒有設定，改讀環境變數
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty() && !k.starts_with("${"))
            .map(str::to_string)
            .or_else(|| {
                std::env::var(API_KEY_ENV)
                    .ok()
                    .filter(|k| !k.trim().is_empty())
            })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub daily_at: String,
    pub sector_delay_seconds: u64,
    pub sectors: Vec<String>,
    pub run_on_startup: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            daily_at: "08:00".to_string(),
            sector_delay_seconds: 60,
            sectors: DEFAULT_SECTORS.iter().map(|s| s.to_string()).collect(),
            run_on_startup: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: "./data/opportunities.jsonl".to_string(),
        }
    }
}

impl ScoutConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ScoutError::Io)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ScoutError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${OXYLABS_API_KEY})；找不到的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ScoutError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("extraction.base_url", &self.extraction.base_url)?;
        validation::validate_range(
            "extraction.return_sources_limit",
            self.extraction.return_sources_limit,
            1,
            100,
        )?;
        validation::validate_positive_number(
            "extraction.max_polls",
            self.extraction.max_polls as usize,
            1,
        )?;
        validation::validate_daily_time("scheduler.daily_at", &self.scheduler.daily_at)?;
        validation::validate_non_empty_list("scheduler.sectors", &self.scheduler.sectors)?;
        validation::validate_path("storage.path", &self.storage.path)?;
        Ok(())
    }

    pub fn scan_settings(&self) -> ScanSettings {
        ScanSettings {
            return_sources_limit: self.extraction.return_sources_limit,
            output_format: self.extraction.output_format,
        }
    }

    pub fn scheduler_settings(&self) -> Result<SchedulerSettings> {
        Ok(SchedulerSettings {
            daily_at: validation::validate_daily_time(
                "scheduler.daily_at",
                &self.scheduler.daily_at,
            )?,
            sector_delay: Duration::from_secs(self.scheduler.sector_delay_seconds),
            sectors: self.scheduler.sectors.clone(),
            run_on_startup: self.scheduler.run_on_startup,
        })
    }
}

impl Validate for ScoutConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
