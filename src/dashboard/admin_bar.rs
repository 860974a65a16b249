use crate::dashboard::{
    MODULE_ANALYTICS, WIDGET_ADMIN_BAR_CLICKS, WIDGET_ADMIN_BAR_IMPRESSIONS,
    WIDGET_ADMIN_BAR_SESSIONS, WIDGET_ADMIN_BAR_UNIQUE_VISITORS,
};
use crate::domain::model::{ModuleSlug, WidgetSlug};
use crate::domain::ports::{ModuleStore, SiteStore};
use crate::markup::components::{activate_module_cta, complete_module_activation_cta, grid_cell};
use crate::markup::{decode_html_entity, Element, Markup};
use crate::table::DASHBOARD_ADMIN_PAGE;
use crate::tracking::{EventTracker, TrackOutcome};
use crate::utils::urls::admin_page_url;
use crate::widgets::{RenderPass, WidgetRegistry};
use std::sync::Arc;

const DATA_BLOCK_CELL_CLASS: &str =
    "mdc-layout-grid__cell mdc-layout-grid__cell--span-3-desktop mdc-layout-grid__cell--span-4-tablet";
const CTA_CELL_CLASS: &str =
    "mdc-layout-grid__cell mdc-layout-grid__cell--span-6-desktop mdc-layout-grid__cell--span-4-tablet";

/// Admin bar stats for the entity currently being viewed.
pub struct AdminBarApp {
    registry: Arc<WidgetRegistry>,
    modules: Arc<dyn ModuleStore>,
    site: Arc<dyn SiteStore>,
    widgets_admin_bar_enabled: bool,
}

impl AdminBarApp {
    pub fn new(
        registry: Arc<WidgetRegistry>,
        modules: Arc<dyn ModuleStore>,
        site: Arc<dyn SiteStore>,
    ) -> Self {
        Self {
            registry,
            modules,
            site,
            widgets_admin_bar_enabled: true,
        }
    }

    pub fn widgets_admin_bar_enabled(mut self, enabled: bool) -> Self {
        self.widgets_admin_bar_enabled = enabled;
        self
    }

    /// 後台儀表板中目前頁面的詳細頁網址
    pub fn details_url(&self) -> Option<String> {
        let entity_url = self.site.current_entity_url()?;
        let admin_base = self.site.admin_base_url()?;
        admin_page_url(&admin_base, DASHBOARD_ADMIN_PAGE, &[("permaLink", &entity_url)])
    }

    /// Renders nothing without an entity URL or details URL.
    pub fn render(&self) -> Option<Markup> {
        let entity_url = self.site.current_entity_url()?;
        let details_url = self.details_url()?;

        let title = match self.site.current_entity_title() {
            Some(title) => decode_html_entity(&title),
            None => entity_url,
        };

        let heading = Element::new("div")
            .class("mdc-layout-grid__cell mdc-layout-grid__cell--span-3 mdc-layout-grid__cell--align-middle")
            .child(
                Element::new("div")
                    .class("googlesitekit-adminbar__subtitle")
                    .text("Stats for"),
            )
            .child(
                Element::new("div")
                    .class("googlesitekit-adminbar__title")
                    .text(title),
            );

        let stats = Element::new("div")
            .class("mdc-layout-grid__cell mdc-layout-grid__cell--span-8-tablet mdc-layout-grid__cell--span-7-desktop mdc-layout-grid__cell--align-middle")
            .child(
                Element::new("div")
                    .class("mdc-layout-grid__inner")
                    .child(self.render_widgets()),
            );

        let more_details = Element::new("div")
            .class("mdc-layout-grid__cell mdc-layout-grid__cell--span-2 mdc-layout-grid__cell--align-middle")
            .child(self.details_link(&details_url, false));

        let grid = Element::new("div").class("mdc-layout-grid").child(
            Element::new("div")
                .class("mdc-layout-grid__inner")
                .child(heading)
                .child(stats)
                .child(more_details),
        );

        Some(Markup::fragment(vec![
            grid.into(),
            self.details_link(&details_url, true),
        ]))
    }

    fn details_link(&self, details_url: &str, mobile: bool) -> Markup {
        Element::new("a")
            .class("googlesitekit-adminbar__link")
            .class_if(mobile, "googlesitekit-adminbar__link--mobile")
            .attr("href", details_url)
            .attr("data-action", "more-details")
            .text("More details")
            .into()
    }

    fn render_widgets(&self) -> Markup {
        if !self.widgets_admin_bar_enabled {
            return Markup::fragment(Vec::new());
        }

        let Ok(analytics) = ModuleSlug::new(MODULE_ANALYTICS) else {
            return Markup::fragment(Vec::new());
        };
        let state = self.modules.module_state(&analytics);

        let mut pass = RenderPass::new(&self.registry);
        let mut children = Vec::new();

        let mut slugs = vec![WIDGET_ADMIN_BAR_IMPRESSIONS, WIDGET_ADMIN_BAR_CLICKS];
        if state.active && state.connected {
            slugs.push(WIDGET_ADMIN_BAR_UNIQUE_VISITORS);
            slugs.push(WIDGET_ADMIN_BAR_SESSIONS);
        }

        for slug in slugs {
            match WidgetSlug::new(slug) {
                Ok(slug) => children.extend(pass.render(&slug, Some(DATA_BLOCK_CELL_CLASS), None)),
                Err(e) => tracing::warn!("Skipping admin bar widget: {}", e),
            }
        }

        if !state.active {
            children.push(grid_cell(CTA_CELL_CLASS, activate_module_cta(&analytics)));
        } else if !state.connected {
            children.push(grid_cell(
                CTA_CELL_CLASS,
                complete_module_activation_cta(&analytics),
            ));
        }

        tracing::debug!("Admin bar rendered {} widgets", pass.rendered_count());
        Markup::fragment(children)
    }

    /// Tracks the "More details" click and returns where to navigate.
    ///
    /// Navigation happens whatever the tracking outcome is; the tracker bounds
    /// the wait.
    pub async fn on_more_details_click(&self, tracker: &dyn EventTracker) -> Option<String> {
        let details_url = self.details_url()?;
        let outcome = tracker
            .track("admin_bar", "post_details_click", None, None)
            .await;
        if outcome != TrackOutcome::Sent {
            tracing::debug!("More details click tracking settled as {:?}", outcome);
        }
        Some(details_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{FixtureStore, RecordingDataLayer};
    use crate::config::toml_config::SiteConfig;
    use crate::dashboard::{default_registry, DashboardStores};
    use crate::tracking::{Tracker, TrackingConfig};
    use chrono::NaiveDate;

    const DATA_BLOCKS: &str = r#"
        { "dimensions": ["date"], "module": "search-console",
          "report": { "rows": [ { "dimensions": ["2021-03-01"], "metrics": [10, 1200] } ] } },
        { "dimensions": ["ga:date"], "module": "analytics",
          "report": { "rows": [ { "dimensions": ["20210301"], "metrics": [30, 45] } ] } }
    "#;

    fn site(entity_url: Option<&str>) -> SiteConfig {
        SiteConfig {
            reference_url: "https://example.com".to_string(),
            admin_url: "https://example.com/wp-admin/".to_string(),
            current_entity_url: entity_url.map(str::to_string),
            current_entity_title: Some("Hello &amp; welcome".to_string()),
        }
    }

    fn app(analytics: &str, entity_url: Option<&str>) -> AdminBarApp {
        let store = Arc::new(
            FixtureStore::from_json_str(&format!(
                r#"{{ "modules": {{ "analytics": {analytics}, "search-console": {{ "active": true, "connected": true }} }},
                     "reports": [ {DATA_BLOCKS} ] }}"#
            ))
            .unwrap(),
        );
        let stores = DashboardStores {
            reports: store.clone(),
            modules: store.clone(),
            site: Arc::new(site(entity_url)),
        };
        let registry =
            default_registry(&stores, NaiveDate::from_ymd_opt(2021, 3, 29).unwrap()).unwrap();

        AdminBarApp::new(Arc::new(registry), stores.modules, stores.site)
    }

    const CONNECTED: &str = r#"{ "active": true, "connected": true }"#;

    #[test]
    fn test_renders_all_data_blocks_when_analytics_connected() {
        let markup = app(CONNECTED, Some("https://example.com/hello-world/"))
            .render()
            .unwrap();

        assert_eq!(markup.find_by_class("googlesitekit-data-block").len(), 4);
        assert!(!markup.contains_class("googlesitekit-cta--activate-module"));
        assert_eq!(markup.find_by_class("googlesitekit-adminbar__link").len(), 2);

        let title = markup.find_by_class("googlesitekit-adminbar__title");
        assert_eq!(Markup::from(title[0].clone()).text_content(), "Hello & welcome");
    }

    #[test]
    fn test_inactive_analytics_shows_activation_cta() {
        let markup = app(
            r#"{ "active": false, "connected": false }"#,
            Some("https://example.com/hello-world/"),
        )
        .render()
        .unwrap();

        assert_eq!(markup.find_by_class("googlesitekit-data-block").len(), 2);
        assert!(markup.contains_class("googlesitekit-cta--activate-module"));
    }

    #[test]
    fn test_unconnected_analytics_shows_completion_cta() {
        let markup = app(
            r#"{ "active": true, "connected": false }"#,
            Some("https://example.com/hello-world/"),
        )
        .render()
        .unwrap();

        assert!(markup.contains_class("googlesitekit-cta--complete-activation"));
        assert!(!markup.contains_class("googlesitekit-cta--activate-module"));
    }

    #[test]
    fn test_feature_flag_hides_widgets_but_keeps_links() {
        let markup = app(CONNECTED, Some("https://example.com/hello-world/"))
            .widgets_admin_bar_enabled(false)
            .render()
            .unwrap();

        assert!(!markup.contains_class("googlesitekit-data-block"));
        assert!(markup.contains_class("googlesitekit-adminbar__link--mobile"));
    }

    #[test]
    fn test_without_entity_url_renders_nothing() {
        assert!(app(CONNECTED, None).render().is_none());
    }

    #[tokio::test]
    async fn test_more_details_click_tracks_then_navigates() {
        let app = app(CONNECTED, Some("https://example.com/hello-world/"));
        let data_layer = RecordingDataLayer::auto_acknowledge();
        let tracker = Tracker::new(
            TrackingConfig {
                tracking_enabled: true,
                tracking_id: "UA-1".to_string(),
                ..Default::default()
            },
            data_layer.clone(),
        );

        let destination = app.on_more_details_click(&tracker).await.unwrap();

        assert!(destination.contains("permaLink=https%3A%2F%2Fexample.com%2Fhello-world%2F"));
        let events = data_layer.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].0, "post_details_click");
        assert_eq!(events[0].1.event_category, "admin_bar");
    }
}
