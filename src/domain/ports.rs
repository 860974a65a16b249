use crate::domain::model::{EventPayload, ModuleSlug, ModuleState, Report, ReportQuery, StoreError};
use crate::tracking::EventCallback;

/// Read side of the report datastore. This layer never writes to it.
pub trait ReportStore: Send + Sync {
    fn get_report(&self, query: &ReportQuery) -> Option<Report>;
    fn has_finished_resolution(&self, query: &ReportQuery) -> bool;
    fn get_error_for_selector(&self, query: &ReportQuery) -> Option<StoreError>;
    fn get_service_url(&self, module: &ModuleSlug, path: Option<&str>) -> Option<String>;
    fn is_adsense_linked(&self) -> bool;
}

pub trait ModuleStore: Send + Sync {
    fn is_module_active(&self, slug: &ModuleSlug) -> bool;
    fn is_module_connected(&self, slug: &ModuleSlug) -> bool;

    fn module_state(&self, slug: &ModuleSlug) -> ModuleState {
        ModuleState {
            active: self.is_module_active(slug),
            connected: self.is_module_connected(slug),
        }
    }
}

pub trait SiteStore: Send + Sync {
    fn current_entity_url(&self) -> Option<String>;
    fn current_entity_title(&self) -> Option<String>;
    fn reference_site_url(&self) -> Option<String>;
    /// WordPress 後台根網址，例如 `https://example.com/wp-admin/`
    fn admin_base_url(&self) -> Option<String>;
}

/// Destination of tracking events (the host's data layer).
///
/// Implementations fire `on_sent` once delivery is acknowledged. Dropping it
/// without firing signals a failed delivery.
pub trait DataLayer: Send + Sync {
    fn push(&self, event_name: &str, payload: EventPayload, on_sent: EventCallback);
}
