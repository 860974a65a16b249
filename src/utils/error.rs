use thiserror::Error;

#[derive(Error, Debug)]
pub enum WidgetError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("CSV export error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid slug '{slug}': {reason}")]
    InvalidSlugError { slug: String, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Data,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl WidgetError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            WidgetError::HttpError(_) => ErrorCategory::Network,
            WidgetError::ConfigError { .. }
            | WidgetError::ConfigValidationError { .. }
            | WidgetError::MissingConfigError { .. }
            | WidgetError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            WidgetError::CsvError(_)
            | WidgetError::SerializationError(_)
            | WidgetError::InvalidSlugError { .. } => ErrorCategory::Data,
            WidgetError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            WidgetError::HttpError(_) => "Check the tracking endpoint and network connectivity",
            WidgetError::ConfigError { .. } | WidgetError::ConfigValidationError { .. } => {
                "Check the TOML configuration file syntax and values"
            }
            WidgetError::MissingConfigError { .. } => {
                "Add the missing field to the configuration file"
            }
            WidgetError::InvalidConfigValueError { .. } => {
                "Correct the configuration value as described in the error"
            }
            WidgetError::InvalidSlugError { .. } => {
                "Slugs must be non-empty and contain only letters, digits, '-' or '_'"
            }
            WidgetError::SerializationError(_) => "Check that the store fixture is valid JSON",
            WidgetError::CsvError(_) => "Check the table contents for invalid characters",
            WidgetError::IoError(_) => "Check file paths and permissions",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Network problem: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Data => format!("Data problem: {}", self),
            ErrorCategory::System => format!("System problem: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, WidgetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_are_high_severity() {
        let err = WidgetError::MissingConfigError {
            field: "tracking.tracking_id".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.user_friendly_message().contains("tracking.tracking_id"));
    }

    #[test]
    fn test_io_errors_are_critical() {
        let err = WidgetError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "store.json",
        ));
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }
}
