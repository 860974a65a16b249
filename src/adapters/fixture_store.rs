use crate::domain::model::{ModuleSlug, ModuleState, Report, ReportQuery, StoreError};
use crate::domain::ports::{ModuleStore, ReportStore};
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureReport {
    pub module: ModuleSlug,
    #[serde(default)]
    pub dimensions: Vec<String>,
    /// 空白時不比對指標
    #[serde(default)]
    pub metrics: Vec<String>,
    #[serde(default)]
    pub report: Option<Report>,
    #[serde(default)]
    pub error: Option<StoreError>,
    /// 尚未解析完成（載入中）
    #[serde(default)]
    pub loading: bool,
}

/// Snapshot of the host datastore loaded from JSON.
///
/// Reports are matched on module, dimensions and (when given) metrics; date
/// ranges and limits are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixtureStore {
    #[serde(default)]
    pub modules: HashMap<ModuleSlug, ModuleState>,
    #[serde(default)]
    pub reports: Vec<FixtureReport>,
    #[serde(default)]
    pub service_urls: HashMap<ModuleSlug, String>,
    #[serde(default)]
    pub adsense_linked: bool,
}

impl FixtureStore {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let store: FixtureStore = serde_json::from_str(content)?;
        tracing::debug!(
            "Loaded fixture store with {} modules and {} reports",
            store.modules.len(),
            store.reports.len()
        );
        Ok(store)
    }

    fn find(&self, query: &ReportQuery) -> Option<&FixtureReport> {
        self.reports
            .iter()
            .find(|entry| {
                entry.module == query.module
                    && entry.dimensions == query.dimensions
                    && (entry.metrics.is_empty() || entry.metrics == query.metrics)
            })
    }
}

impl ReportStore for FixtureStore {
    fn get_report(&self, query: &ReportQuery) -> Option<Report> {
        self.find(query)
            .filter(|entry| !entry.loading)
            .and_then(|entry| entry.report.clone())
    }

    fn has_finished_resolution(&self, query: &ReportQuery) -> bool {
        self.find(query).map(|entry| !entry.loading).unwrap_or(true)
    }

    fn get_error_for_selector(&self, query: &ReportQuery) -> Option<StoreError> {
        self.find(query).and_then(|entry| entry.error.clone())
    }

    fn get_service_url(&self, module: &ModuleSlug, path: Option<&str>) -> Option<String> {
        let base = self.service_urls.get(module)?;
        match path {
            Some(path) => Some(format!(
                "{}/{}",
                base.trim_end_matches('/'),
                path.trim_start_matches('/')
            )),
            None => Some(base.clone()),
        }
    }

    fn is_adsense_linked(&self) -> bool {
        self.adsense_linked
    }
}

impl ModuleStore for FixtureStore {
    fn is_module_active(&self, slug: &ModuleSlug) -> bool {
        self.modules.get(slug).map(|state| state.active).unwrap_or(false)
    }

    fn is_module_connected(&self, slug: &ModuleSlug) -> bool {
        self.modules
            .get(slug)
            .map(|state| state.connected)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "modules": {
            "analytics": { "active": true, "connected": false }
        },
        "service_urls": {
            "search-console": "https://search.google.com/search-console/"
        },
        "reports": [
            {
                "module": "analytics",
                "dimensions": ["ga:pageTitle", "ga:pagePath"],
                "report": { "rows": [ { "dimensions": ["Home", "/"], "metrics": [12] } ] }
            },
            {
                "module": "search-console",
                "dimensions": ["query"],
                "loading": true
            }
        ]
    }"#;

    fn module(s: &str) -> ModuleSlug {
        ModuleSlug::new(s).unwrap()
    }

    #[test]
    fn test_module_state_lookup() {
        let store = FixtureStore::from_json_str(FIXTURE).unwrap();
        assert!(store.is_module_active(&module("analytics")));
        assert!(!store.is_module_connected(&module("analytics")));
        assert!(!store.is_module_active(&module("adsense")));
    }

    #[test]
    fn test_report_matching_on_dimensions() {
        let store = FixtureStore::from_json_str(FIXTURE).unwrap();
        let query = ReportQuery::new(module("analytics")).dimensions(["ga:pageTitle", "ga:pagePath"]);

        let report = store.get_report(&query).unwrap();
        assert_eq!(report.rows[0].dimension(0), Some("Home"));
        assert!(store.has_finished_resolution(&query));

        let other = ReportQuery::new(module("analytics")).dimensions(["ga:date"]);
        assert!(store.get_report(&other).is_none());
    }

    #[test]
    fn test_report_matching_on_metrics() {
        let store = FixtureStore::from_json_str(
            r#"{ "reports": [
                { "module": "analytics", "dimensions": ["ga:pagePath"], "metrics": ["ga:pageviews"],
                  "report": { "rows": [ { "dimensions": ["/"], "metrics": [7] } ] } },
                { "module": "analytics", "dimensions": ["ga:pagePath"], "metrics": ["ga:adsenseRevenue"],
                  "report": { "rows": [ { "dimensions": ["/"], "metrics": [1.25] } ] } }
            ] }"#,
        )
        .unwrap();

        let query = ReportQuery::new(module("analytics"))
            .dimensions(["ga:pagePath"])
            .metrics(["ga:adsenseRevenue"]);
        assert_eq!(store.get_report(&query).unwrap().rows[0].metric(0), Some(1.25));
    }

    #[test]
    fn test_loading_report_is_unresolved() {
        let store = FixtureStore::from_json_str(FIXTURE).unwrap();
        let query = ReportQuery::new(module("search-console")).dimensions(["query"]);

        assert!(!store.has_finished_resolution(&query));
        assert!(store.get_report(&query).is_none());
    }

    #[test]
    fn test_service_url_with_path() {
        let store = FixtureStore::from_json_str(FIXTURE).unwrap();
        assert_eq!(
            store.get_service_url(&module("search-console"), Some("/performance/search-analytics")),
            Some("https://search.google.com/search-console/performance/search-analytics".to_string())
        );
        assert_eq!(store.get_service_url(&module("analytics"), None), None);
    }

    #[test]
    fn test_invalid_json_is_serialization_error() {
        let err = FixtureStore::from_json_str("{ not json").unwrap_err();
        assert!(matches!(
            err,
            crate::utils::error::WidgetError::SerializationError(_)
        ));
    }
}
