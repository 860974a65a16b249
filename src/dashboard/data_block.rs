use crate::dashboard::{select_report, ReportState};
use crate::domain::model::{Report, ReportQuery};
use crate::domain::ports::ReportStore;
use crate::markup::{Element, Markup};
use crate::table::number_format::{num_fmt, NumberStyle};
use crate::widgets::{Widget, WidgetProps};
use std::sync::Arc;

/// Single headline metric (admin bar impressions, clicks, users, sessions).
pub struct DataBlockWidget {
    reports: Arc<dyn ReportStore>,
    query: ReportQuery,
    title: String,
    metric_index: usize,
}

impl DataBlockWidget {
    pub fn new(
        reports: Arc<dyn ReportStore>,
        query: ReportQuery,
        title: impl Into<String>,
        metric_index: usize,
    ) -> Self {
        Self {
            reports,
            query,
            title: title.into(),
            metric_index,
        }
    }

    // 優先使用報表總計，沒有總計時才逐列加總
    fn total(&self, report: &Report) -> f64 {
        match report.totals.get(self.metric_index) {
            Some(total) => *total,
            None => report
                .rows
                .iter()
                .filter_map(|row| row.metric(self.metric_index))
                .sum(),
        }
    }
}

impl Widget for DataBlockWidget {
    fn render(&self, props: &WidgetProps) -> Option<Markup> {
        let module = &self.query.module;

        let markup = match select_report(self.reports.as_ref(), &self.query) {
            ReportState::Loading => Element::new("div")
                .class("googlesitekit-data-block googlesitekit-data-block--loading")
                .child(Element::new("div").class("googlesitekit-preview-block"))
                .into(),
            ReportState::Error(error) => props.report_error(module, &error),
            ReportState::Ready(report) if report.is_zero() => props.report_zero(module),
            ReportState::Ready(report) => Element::new("div")
                .class("googlesitekit-data-block")
                .child(
                    Element::new("h3")
                        .class("googlesitekit-data-block__title")
                        .text(self.title.clone()),
                )
                .child(
                    Element::new("div")
                        .class("googlesitekit-data-block__datapoint")
                        .text(num_fmt(self.total(&report), &NumberStyle::Decimal)),
                )
                .into(),
        };

        Some(markup)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::FixtureStore;
    use crate::domain::model::{ModuleSlug, WidgetSlug};
    use crate::widgets::widget_component_props;

    fn query() -> ReportQuery {
        ReportQuery::new(ModuleSlug::new("search-console").unwrap())
            .dimensions(["date"])
            .metrics(["clicks", "impressions"])
    }

    fn render(store_json: &str, metric_index: usize) -> Markup {
        let store = Arc::new(FixtureStore::from_json_str(store_json).unwrap());
        let widget = DataBlockWidget::new(store, query(), "Total Impressions", metric_index);
        widget
            .render(&widget_component_props(&WidgetSlug::new("adminBarImpressions").unwrap()))
            .unwrap()
    }

    #[test]
    fn test_sums_rows_without_totals() {
        let markup = render(
            r#"{ "reports": [ { "module": "search-console", "dimensions": ["date"],
                 "report": { "rows": [
                    { "dimensions": ["2021-03-01"], "metrics": [10, 1200] },
                    { "dimensions": ["2021-03-02"], "metrics": [5, 800] }
                 ] } } ] }"#,
            1,
        );

        let datapoint = markup.find_by_class("googlesitekit-data-block__datapoint");
        assert_eq!(Markup::from(datapoint[0].clone()).text_content(), "2,000");
    }

    #[test]
    fn test_prefers_totals() {
        let markup = render(
            r#"{ "reports": [ { "module": "search-console", "dimensions": ["date"],
                 "report": { "rows": [ { "dimensions": ["2021-03-01"], "metrics": [10, 1200] } ],
                             "totals": [42, 4200] } } ] }"#,
            0,
        );
        assert!(markup.text_content().contains("42"));
    }

    #[test]
    fn test_loading_error_and_zero_states() {
        let loading = render(
            r#"{ "reports": [ { "module": "search-console", "dimensions": ["date"], "loading": true } ] }"#,
            0,
        );
        assert!(loading.contains_class("googlesitekit-data-block--loading"));

        let error = render(
            r#"{ "reports": [ { "module": "search-console", "dimensions": ["date"],
                 "error": { "code": "500", "message": "Backend error" } } ] }"#,
            0,
        );
        assert!(error.contains_class("googlesitekit-cta--error"));

        let zero = render(r#"{}"#, 0);
        assert!(zero.contains_class("googlesitekit-report-zero"));
    }
}
