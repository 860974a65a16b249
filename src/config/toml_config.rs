use crate::domain::ports::SiteStore;
use crate::tracking::{TrackingConfig, DEFAULT_TRACKING_TIMEOUT};
use crate::utils::error::{Result, WidgetError};
use crate::utils::validation::{
    validate_non_empty_string, validate_range, validate_required_field, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub site: SiteConfig,
    pub tracking: Option<TrackingSection>,
    pub features: Option<FeaturesConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    pub reference_url: String,
    pub admin_url: String,
    pub current_entity_url: Option<String>,
    pub current_entity_title: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingSection {
    pub enabled: bool,
    pub tracking_id: Option<String>,
    pub is_first_admin: Option<bool>,
    pub user_id_hash: Option<String>,
    pub timeout_ms: Option<u64>,
    /// Beacon 送出的 HTTP 端點
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeaturesConfig {
    pub admin_bar_widgets: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub json: Option<bool>,
}

impl DashboardConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(WidgetError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| WidgetError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${USER_ID_HASH})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| WidgetError::ConfigError {
            message: format!("Invalid env substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_url("site.reference_url", &self.site.reference_url)?;
        validate_url("site.admin_url", &self.site.admin_url)?;

        if let Some(url) = &self.site.current_entity_url {
            validate_url("site.current_entity_url", url)?;
        }

        if let Some(tracking) = &self.tracking {
            if tracking.enabled {
                let tracking_id =
                    validate_required_field("tracking.tracking_id", &tracking.tracking_id)?;
                validate_non_empty_string("tracking.tracking_id", tracking_id)?;
            }

            if let Some(timeout_ms) = tracking.timeout_ms {
                validate_range("tracking.timeout_ms", timeout_ms, 1, 60_000)?;
            }

            if let Some(endpoint) = &tracking.endpoint {
                validate_url("tracking.endpoint", endpoint)?;
            }
        }

        if let Some(level) = self.logging.as_ref().and_then(|l| l.level.as_deref()) {
            let valid_levels = ["trace", "debug", "info", "warn", "error"];
            if !valid_levels.contains(&level) {
                return Err(WidgetError::InvalidConfigValueError {
                    field: "logging.level".to_string(),
                    value: level.to_string(),
                    reason: format!("Valid levels: {}", valid_levels.join(", ")),
                });
            }
        }

        Ok(())
    }

    /// 取得追蹤設定；未設定 [tracking] 時視為停用
    pub fn tracking_config(&self) -> TrackingConfig {
        match &self.tracking {
            Some(tracking) => TrackingConfig {
                tracking_enabled: tracking.enabled,
                tracking_id: tracking.tracking_id.clone().unwrap_or_default(),
                reference_site_url: self.site.reference_url.clone(),
                is_first_admin: tracking.is_first_admin.unwrap_or(false),
                user_id_hash: tracking.user_id_hash.clone().unwrap_or_default(),
            },
            None => TrackingConfig {
                reference_site_url: self.site.reference_url.clone(),
                ..TrackingConfig::default()
            },
        }
    }

    pub fn tracking_timeout(&self) -> Duration {
        self.tracking
            .as_ref()
            .and_then(|t| t.timeout_ms)
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_TRACKING_TIMEOUT)
    }

    pub fn tracking_endpoint(&self) -> Option<&str> {
        self.tracking.as_ref().and_then(|t| t.endpoint.as_deref())
    }

    pub fn admin_bar_widgets_enabled(&self) -> bool {
        self.features
            .as_ref()
            .and_then(|f| f.admin_bar_widgets)
            .unwrap_or(true)
    }

    pub fn log_level(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|l| l.level.as_deref())
            .unwrap_or("info")
    }

    pub fn json_logging(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }
}

impl Validate for DashboardConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

impl SiteStore for SiteConfig {
    fn current_entity_url(&self) -> Option<String> {
        self.current_entity_url.clone()
    }

    fn current_entity_title(&self) -> Option<String> {
        self.current_entity_title.clone()
    }

    fn reference_site_url(&self) -> Option<String> {
        Some(self.reference_url.clone()).filter(|url| !url.is_empty())
    }

    fn admin_base_url(&self) -> Option<String> {
        Some(self.admin_url.clone()).filter(|url| !url.is_empty())
    }
}
