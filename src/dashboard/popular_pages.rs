use crate::dashboard::{default_date_range, select_report, ReportState, MODULE_ANALYTICS};
use crate::domain::model::{ModuleSlug, ReportQuery, SortOrder};
use crate::domain::ports::{ReportStore, SiteStore};
use crate::markup::components::{grid_cell, preview_table, source_link, table_overflow_container};
use crate::markup::{Element, Markup};
use crate::table::{to_table, Cell, TableHeader, TableOptions};
use crate::widgets::{Widget, WidgetProps};
use chrono::NaiveDate;
use std::sync::Arc;

const GRID_CELL_CLASS: &str =
    "mdc-layout-grid__cell mdc-layout-grid__cell--span-6-desktop mdc-layout-grid__cell--span-4-tablet";
const CONTENT_PAGES_REPORT: &str = "/report/content-pages";

/// Legacy "Most popular content" table with admin links per page.
pub struct PopularPagesTable {
    reports: Arc<dyn ReportStore>,
    site: Arc<dyn SiteStore>,
    reference_date: NaiveDate,
}

impl PopularPagesTable {
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

    pub fn query(&self, analytics: ModuleSlug) -> ReportQuery {
        ReportQuery::new(analytics)
            .date_range(default_date_range(self.reference_date))
            .dimensions(["ga:pageTitle", "ga:pagePath"])
            .metrics(["ga:pageviews", "ga:uniquePageviews", "ga:bounceRate"])
            .order_by("ga:pageviews", SortOrder::Descending)
            .limit(10)
    }

    fn layout(&self, analytics: &ModuleSlug, content: Markup) -> Markup {
        let mut layout = Element::new("div")
            .class("googlesitekit-layout googlesitekit-layout--fill googlesitekit-popular-content")
            .child(content);

        if let Some(service_url) = self
            .reports
            .get_service_url(analytics, Some(CONTENT_PAGES_REPORT))
        {
            layout = layout.child(
                Element::new("div")
                    .class("googlesitekit-layout__footer")
                    .child(source_link("Analytics", &service_url, true)),
            );
        }

        grid_cell(GRID_CELL_CLASS, layout.into())
    }
}

/// 路徑一律以斜線開頭
fn page_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

impl Widget for PopularPagesTable {
    fn render(&self, props: &WidgetProps) -> Option<Markup> {
        let analytics = ModuleSlug::new(MODULE_ANALYTICS).ok()?;
        let query = self.query(analytics.clone());

        let report = match select_report(self.reports.as_ref(), &query) {
            ReportState::Loading => return Some(self.layout(&analytics, preview_table(5, true))),
            ReportState::Error(error) => {
                return Some(self.layout(&analytics, props.report_error(&analytics, &error)))
            }
            ReportState::Ready(report) if report.is_zero() => return None,
            ReportState::Ready(report) => report,
        };

        let headers = [
            TableHeader::new("Most popular content").primary(),
            TableHeader::new("Views"),
        ];

        let links = report
            .rows
            .iter()
            .map(|row| row.dimension(1).map(page_path))
            .collect();
        let rows = report
            .rows
            .iter()
            .map(|row| {
                vec![
                    Cell::from(row.dimension(0).unwrap_or_default()),
                    Cell::from(row.metric(0).unwrap_or(0.0)),
                ]
            })
            .collect();

        let options = TableOptions {
            links,
            show_urls: true,
            use_admin_urls: true,
            admin_base_url: self.site.admin_base_url(),
            ..Default::default()
        };
        let table = to_table(rows, &headers, &options);

        Some(self.layout(&analytics, table_overflow_container(table.to_markup())))
    }
}
