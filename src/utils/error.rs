use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScoutError {
    #[error("Missing credential for extraction provider '{provider}'")]
    MissingCredential { provider: String },

    #[error("Failed to crawl {url}: {message}")]
    SourceCrawlFailure { url: String, message: String },

    #[error("Opportunity store at {path} is unreadable: {message}")]
    StoreReadCorruption { path: String, message: String },

    #[error("Scan orchestration failed: {message}")]
    OrchestrationFailure { message: String },

    #[error("Extraction gateway returned {status}: {message}")]
    Gateway { status: u16, message: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration '{field}'")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Extraction,
    Storage,
    Configuration,
    Pipeline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ScoutError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ScoutError::Http(_) | ScoutError::Gateway { .. } => ErrorCategory::Network,
            ScoutError::MissingCredential { .. } | ScoutError::SourceCrawlFailure { .. } => {
                ErrorCategory::Extraction
            }
            ScoutError::StoreReadCorruption { .. }
            | ScoutError::Io(_)
            | ScoutError::Serialization(_) => ErrorCategory::Storage,
            ScoutError::ConfigError { .. }
            | ScoutError::ConfigValidationError { .. }
            | ScoutError::InvalidConfigValueError { .. }
            | ScoutError::MissingConfigError { .. } => ErrorCategory::Configuration,
            ScoutError::OrchestrationFailure { .. } => ErrorCategory::Pipeline,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 這兩種都會被吞掉，只是降級
            ScoutError::StoreReadCorruption { .. } | ScoutError::SourceCrawlFailure { .. } => {
                ErrorSeverity::Low
            }
            ScoutError::MissingCredential { .. }
            | ScoutError::Http(_)
            | ScoutError::Gateway { .. } => ErrorSeverity::Medium,
            ScoutError::OrchestrationFailure { .. } | ScoutError::Serialization(_) => {
                ErrorSeverity::High
            }
            ScoutError::Io(_)
            | ScoutError::ConfigError { .. }
            | ScoutError::ConfigValidationError { .. }
            | ScoutError::InvalidConfigValueError { .. }
            | ScoutError::MissingConfigError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            ScoutError::MissingCredential { provider } => format!(
                "Set the API key for '{}' in [extraction].api_key or the OXYLABS_API_KEY environment variable",
                provider
            ),
            ScoutError::SourceCrawlFailure { url, .. } => {
                format!("Check that {} is reachable; the next scan will try again", url)
            }
            ScoutError::StoreReadCorruption { path, .. } => format!(
                "Inspect {} for truncated lines; valid records are still served",
                path
            ),
            ScoutError::OrchestrationFailure { .. } => {
                "Check the source registry and selector configuration".to_string()
            }
            ScoutError::Gateway { status, .. } if *status == 401 || *status == 403 => {
                "Verify the extraction API key is valid".to_string()
            }
            ScoutError::Gateway { .. } | ScoutError::Http(_) => {
                "Check network connectivity and the extraction base_url".to_string()
            }
            ScoutError::Io(_) => "Check file permissions for the storage path".to_string(),
            ScoutError::Serialization(_) => {
                "The extraction service returned an unexpected payload shape".to_string()
            }
            ScoutError::ConfigError { .. } | ScoutError::ConfigValidationError { .. } => {
                "Fix the TOML configuration file and retry".to_string()
            }
            ScoutError::InvalidConfigValueError { field, .. } => {
                format!("Correct the value of '{}' in the configuration", field)
            }
            ScoutError::MissingConfigError { field } => {
                format!("Add '{}' to the configuration", field)
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not reach the extraction service: {}", self),
            ErrorCategory::Extraction => format!("Tender extraction problem: {}", self),
            ErrorCategory::Storage => format!("Could not access stored opportunities: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Pipeline => format!("Scan failed: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScoutError>;
