use crate::dashboard::{default_date_range, select_report, ReportState, MODULE_ANALYTICS};
use crate::domain::model::{ModuleSlug, ReportQuery, SortOrder};
use crate::domain::ports::ReportStore;
use crate::markup::components::{
    preview_table, source_link, table_overflow_container, WidgetContainer,
};
use crate::markup::{Element, Markup};
use crate::table::number_format::to_fixed;
use crate::table::{to_table, Cell, TableHeader, TableOptions};
use crate::widgets::{Widget, WidgetProps};
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::sync::Arc;

const WIDGET_SLUG: &str = "adsenseTopEarningPages";
const ROW_CAP: usize = 5;

/// AdSense earnings per page, read from the Analytics report.
pub struct TopEarningPagesWidget {
    reports: Arc<dyn ReportStore>,
    reference_date: NaiveDate,
}

impl TopEarningPagesWidget {
    pub fn new(reports: Arc<dyn ReportStore>, reference_date: NaiveDate) -> Self {
        Self {
            reports,
            reference_date,
        }
    }

    pub fn query(&self, analytics: ModuleSlug) -> ReportQuery {
        ReportQuery::new(analytics)
            .date_range(default_date_range(self.reference_date))
            .dimensions(["ga:pageTitle", "ga:pagePath"])
            .metrics([
                "ga:adsenseRevenue",
                "ga:adsenseECPM",
                "ga:adsensePageImpressions",
            ])
            .order_by("ga:adsenseRevenue", SortOrder::Descending)
            .limit(10)
    }
}

fn adsense_link_cta() -> Markup {
    Element::new("div")
        .class("googlesitekit-cta googlesitekit-cta--adsense-link")
        .child(
            Element::new("h3")
                .class("googlesitekit-cta__title")
                .text("Link Analytics and AdSense"),
        )
        .child(
            Element::new("p")
                .class("googlesitekit-cta__description")
                .text("Get reports for your top earning pages by linking your Analytics and AdSense accounts"),
        )
        .into()
}

impl Widget for TopEarningPagesWidget {
    fn render(&self, props: &WidgetProps) -> Option<Markup> {
        let analytics = ModuleSlug::new(MODULE_ANALYTICS).ok()?;
        let query = self.query(analytics.clone());

        let report = match select_report(self.reports.as_ref(), &query) {
            ReportState::Loading => return Some(preview_table(5, true)),
            // 未連結 AdSense 時報表會回傳權限錯誤，所以要在錯誤判斷之前處理
            _ if !self.reports.is_adsense_linked() => return Some(adsense_link_cta()),
            ReportState::Error(error) => return Some(props.report_error(&analytics, &error)),
            ReportState::Ready(report) if report.is_zero() => {
                return Some(props.report_zero(&analytics))
            }
            ReportState::Ready(report) => report,
        };

        let headers = [
            TableHeader::new("Top Earning Pages")
                .tooltip("Top Earning Pages")
                .primary(),
            TableHeader::new("Revenue").tooltip("Revenue"),
        ];

        let mut rows: Vec<_> = report.rows.iter().collect();
        rows.sort_by(|a, b| {
            let a = a.metric(0).unwrap_or(0.0);
            let b = b.metric(0).unwrap_or(0.0);
            b.partial_cmp(&a).unwrap_or(Ordering::Equal)
        });

        let links = rows
            .iter()
            .map(|row| row.dimension(1).map(str::to_string))
            .collect();
        let data: Vec<Vec<Cell>> = rows
            .iter()
            .map(|row| {
                vec![
                    Cell::from(row.dimension(0).unwrap_or_default()),
                    Cell::from(to_fixed(row.metric(0).unwrap_or(0.0), 2)),
                ]
            })
            .collect();

        let options = TableOptions {
            cap: Some(ROW_CAP),
            links,
            ..Default::default()
        };
        let table = to_table(data, &headers, &options);

        let mut container = WidgetContainer::new(WIDGET_SLUG).no_padding();
        if let Some(service_url) = self.reports.get_service_url(&analytics, None) {
            container = container.footer(source_link("Analytics", &service_url, true));
        }

        Some(container.wrap(table_overflow_container(table.to_markup())))
    }
}
