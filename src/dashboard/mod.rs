//! Concrete dashboard and admin-bar widgets built on the widget pipeline.

pub mod admin_bar;
pub mod data_block;
pub mod popular_keywords;
pub mod popular_pages;
pub mod top_earning_pages;
pub mod wp_dashboard;

use crate::domain::model::{
    DateRange, ModuleSlug, Report, ReportQuery, StoreError, WidgetSlug, DATE_RANGE_OFFSET,
    DEFAULT_DATE_RANGE_DAYS,
};
use crate::domain::ports::{ModuleStore, ReportStore, SiteStore};
use crate::utils::error::Result;
use crate::widgets::{WhenActive, WidgetOptions, WidgetRegistry};
use chrono::NaiveDate;
use std::sync::Arc;

pub use admin_bar::AdminBarApp;
pub use data_block::DataBlockWidget;
pub use popular_keywords::PopularKeywordsWidget;
pub use popular_pages::PopularPagesTable;
pub use top_earning_pages::TopEarningPagesWidget;
pub use wp_dashboard::WpDashboardModules;

pub const MODULE_ADSENSE: &str = "adsense";
pub const MODULE_ANALYTICS: &str = "analytics";
pub const MODULE_SEARCH_CONSOLE: &str = "search-console";

pub const WIDGET_TOP_EARNING_PAGES: &str = "adsenseTopEarningPages";
pub const WIDGET_POPULAR_KEYWORDS: &str = "searchConsolePopularKeywords";
pub const WIDGET_POPULAR_PAGES: &str = "analyticsPopularPages";
pub const WIDGET_ADMIN_BAR_IMPRESSIONS: &str = "adminBarImpressions";
pub const WIDGET_ADMIN_BAR_CLICKS: &str = "adminBarClicks";
pub const WIDGET_ADMIN_BAR_UNIQUE_VISITORS: &str = "adminBarUniqueVisitors";
pub const WIDGET_ADMIN_BAR_SESSIONS: &str = "adminBarSessions";

/// Host stores every dashboard widget reads from.
#[derive(Clone)]
pub struct DashboardStores {
    pub reports: Arc<dyn ReportStore>,
    pub modules: Arc<dyn ModuleStore>,
    pub site: Arc<dyn SiteStore>,
}

/// Resolution state of one report selection.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportState {
    Loading,
    Error(StoreError),
    Ready(Report),
}

pub fn select_report(store: &dyn ReportStore, query: &ReportQuery) -> ReportState {
    if !store.has_finished_resolution(query) {
        return ReportState::Loading;
    }

    if let Some(error) = store.get_error_for_selector(query) {
        return ReportState::Error(error);
    }

    ReportState::Ready(store.get_report(query).unwrap_or_default())
}

/// 預設的報表日期區間：最近 28 天，結束於昨天
pub fn default_date_range(reference_date: NaiveDate) -> DateRange {
    DateRange::last_days(reference_date, DEFAULT_DATE_RANGE_DAYS, DATE_RANGE_OFFSET)
}

/// Registers every built-in widget. Runs once at startup.
pub fn default_registry(stores: &DashboardStores, reference_date: NaiveDate) -> Result<WidgetRegistry> {
    let adsense = ModuleSlug::new(MODULE_ADSENSE)?;
    let analytics = ModuleSlug::new(MODULE_ANALYTICS)?;
    let search_console = ModuleSlug::new(MODULE_SEARCH_CONSOLE)?;
    let date_range = default_date_range(reference_date);
    let entity_url = stores.site.current_entity_url();

    let search_console_query = {
        let query = ReportQuery::new(search_console.clone())
            .date_range(date_range)
            .dimensions(["date"])
            .metrics(["clicks", "impressions"]);
        match &entity_url {
            Some(url) => query.url(url.clone()),
            None => query,
        }
    };

    let analytics_query = {
        let query = ReportQuery::new(analytics.clone())
            .date_range(date_range)
            .dimensions(["ga:date"])
            .metrics(["ga:users", "ga:sessions"]);
        match &entity_url {
            Some(url) => query.url(url.clone()),
            None => query,
        }
    };

    let bare = WidgetOptions { wrap_widget: false };

    let registry = WidgetRegistry::builder()
        .register_widget(
            WidgetSlug::new(WIDGET_TOP_EARNING_PAGES)?,
            WhenActive::new(
                stores.modules.clone(),
                TopEarningPagesWidget::new(stores.reports.clone(), reference_date),
            )
            .module(adsense)
            .module(analytics.clone()),
            bare,
        )
        .register_widget(
            WidgetSlug::new(WIDGET_POPULAR_KEYWORDS)?,
            WhenActive::new(
                stores.modules.clone(),
                PopularKeywordsWidget::new(
                    stores.reports.clone(),
                    stores.site.clone(),
                    reference_date,
                ),
            )
            .module(search_console.clone()),
            bare,
        )
        .register_widget(
            WidgetSlug::new(WIDGET_POPULAR_PAGES)?,
            PopularPagesTable::new(stores.reports.clone(), stores.site.clone(), reference_date),
            bare,
        )
        .register_widget(
            WidgetSlug::new(WIDGET_ADMIN_BAR_IMPRESSIONS)?,
            DataBlockWidget::new(stores.reports.clone(), search_console_query.clone(), "Total Impressions", 1),
            WidgetOptions::default(),
        )
        .register_widget(
            WidgetSlug::new(WIDGET_ADMIN_BAR_CLICKS)?,
            DataBlockWidget::new(stores.reports.clone(), search_console_query, "Total Clicks", 0),
            WidgetOptions::default(),
        )
        .register_widget(
            WidgetSlug::new(WIDGET_ADMIN_BAR_UNIQUE_VISITORS)?,
            DataBlockWidget::new(stores.reports.clone(), analytics_query.clone(), "Total Users", 0),
            WidgetOptions::default(),
        )
        .register_widget(
            WidgetSlug::new(WIDGET_ADMIN_BAR_SESSIONS)?,
            DataBlockWidget::new(stores.reports.clone(), analytics_query, "Total Sessions", 1),
            WidgetOptions::default(),
        )
        .build();

    tracing::debug!("Registered {} dashboard widgets", registry.len());
    Ok(registry)
}
