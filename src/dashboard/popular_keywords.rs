use crate::dashboard::{default_date_range, select_report, ReportState, MODULE_SEARCH_CONSOLE};
use crate::domain::model::{ModuleSlug, ReportQuery};
use crate::domain::ports::{ReportStore, SiteStore};
use crate::markup::components::{
    preview_table, source_link, table_overflow_container, WidgetContainer,
};
use crate::markup::Markup;
use crate::table::{to_table, Cell, TableHeader, TableOptions};
use crate::utils::urls::{add_query_args, untrailingslashit};
use crate::widgets::{Widget, WidgetProps};
use chrono::NaiveDate;
use std::sync::Arc;

const WIDGET_SLUG: &str = "searchConsolePopularKeywords";
const SEARCH_ANALYTICS_PATH: &str = "/performance/search-analytics";

/// Top search queries for the current entity (or the whole site).
pub struct PopularKeywordsWidget {
    reports: Arc<dyn ReportStore>,
    site: Arc<dyn SiteStore>,
    reference_date: NaiveDate,
}

impl PopularKeywordsWidget {
    pub fn new(
        reports: Arc<dyn ReportStore>,
        site: Arc<dyn SiteStore>,
        reference_date: NaiveDate,
    ) -> Self {
        Self {
            reports,
            site,
            reference_date,
        }
    }

    pub fn query(&self, search_console: ModuleSlug) -> ReportQuery {
        let date_range = default_date_range(self.reference_date);
        let query = ReportQuery::new(search_console)
            .date_range(date_range)
            .dimensions(["query"])
            .metrics(["clicks", "impressions"])
            .limit(10);

        match self.site.current_entity_url() {
            Some(url) => query.url(url),
            None => query,
        }
    }

    /// Search Console 報表頁網址，限定在目前頁面或整個網站
    fn base_service_url(&self, search_console: &ModuleSlug) -> Option<String> {
        let base = self
            .reports
            .get_service_url(search_console, Some(SEARCH_ANALYTICS_PATH))?;
        let date_range = default_date_range(self.reference_date);
        let start_date = date_range.start_date.format("%Y%m%d").to_string();
        let end_date = date_range.end_date.format("%Y%m%d").to_string();

        let page = match self.site.current_entity_url() {
            Some(url) => Some(format!("!{}", url)),
            None => self
                .site
                .reference_site_url()
                .map(|reference| format!("*{}", untrailingslashit(&reference))),
        };

        let mut args = vec![("start_date", start_date.as_str()), ("end_date", end_date.as_str())];
        if let Some(page) = &page {
            args.push(("page", page.as_str()));
        }

        add_query_args(&base, &args).or(Some(base))
    }
}

impl Widget for PopularKeywordsWidget {
    fn render(&self, props: &WidgetProps) -> Option<Markup> {
        let search_console = ModuleSlug::new(MODULE_SEARCH_CONSOLE).ok()?;
        let query = self.query(search_console.clone());

        let report = match select_report(self.reports.as_ref(), &query) {
            ReportState::Loading => return Some(preview_table(5, true)),
            ReportState::Error(error) => {
                return Some(props.report_error(&search_console, &error))
            }
            ReportState::Ready(report) if report.is_zero() => {
                return Some(props.report_zero(&search_console))
            }
            ReportState::Ready(report) => report,
        };

        let base_service_url = self.base_service_url(&search_console);

        let headers = [
            TableHeader::new("Keyword")
                .tooltip("Most searched for keywords related to your content")
                .primary(),
            TableHeader::new("Clicks")
                .tooltip("Number of times users clicked on your content in search results"),
            TableHeader::new("Impressions")
                .tooltip("Counted each time your content appears in search results"),
        ];

        let mut links = Vec::with_capacity(report.rows.len());
        let mut rows = Vec::with_capacity(report.rows.len());
        for row in &report.rows {
            let keyword = row.dimension(0).unwrap_or_default();
            links.push(base_service_url.as_deref().and_then(|base| {
                add_query_args(base, &[("query", format!("!{}", keyword).as_str())])
            }));
            rows.push(vec![
                Cell::from(keyword),
                Cell::from(row.metric(0).unwrap_or(0.0)),
                Cell::from(row.metric(1).unwrap_or(0.0)),
            ]);
        }

        let options = TableOptions {
            links,
            ..Default::default()
        };
        let table = to_table(rows, &headers, &options);

        let mut container = WidgetContainer::new(WIDGET_SLUG).no_padding();
        if let Some(href) = &base_service_url {
            container = container.footer(source_link("Search Console", href, true));
        }

        Some(container.wrap(table_overflow_container(table.to_markup())))
    }
}
