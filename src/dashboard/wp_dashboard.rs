use crate::dashboard::{
    MODULE_ANALYTICS, WIDGET_ADMIN_BAR_CLICKS, WIDGET_ADMIN_BAR_IMPRESSIONS,
    WIDGET_ADMIN_BAR_SESSIONS, WIDGET_ADMIN_BAR_UNIQUE_VISITORS,
};
use crate::domain::model::{ModuleSlug, WidgetSlug};
use crate::domain::ports::ModuleStore;
use crate::markup::components::activate_module_cta;
use crate::markup::{Element, Markup};
use crate::utils::error::Result;
use crate::widgets::{RenderPass, WidgetRegistry};
use std::sync::Arc;

/// Site Kit stats block on the WordPress dashboard.
pub struct WpDashboardModules {
    registry: Arc<WidgetRegistry>,
    modules: Arc<dyn ModuleStore>,
}

impl WpDashboardModules {
    pub fn new(registry: Arc<WidgetRegistry>, modules: Arc<dyn ModuleStore>) -> Self {
        Self { registry, modules }
    }

    pub fn render(&self) -> Result<Markup> {
        let analytics = ModuleSlug::new(MODULE_ANALYTICS)?;
        let analytics_active = self.modules.is_module_active(&analytics);

        let mut slugs = vec![
            WidgetSlug::new(WIDGET_ADMIN_BAR_IMPRESSIONS)?,
            WidgetSlug::new(WIDGET_ADMIN_BAR_CLICKS)?,
        ];
        if analytics_active {
            slugs.push(WidgetSlug::new(WIDGET_ADMIN_BAR_UNIQUE_VISITORS)?);
            slugs.push(WidgetSlug::new(WIDGET_ADMIN_BAR_SESSIONS)?);
        }

        let mut stats = Element::new("div")
            .class("googlesitekit-wp-dashboard-stats")
            .class_if(analytics_active, "googlesitekit-wp-dashboard-stats--fourup")
            .child(
                Element::new("div")
                    .class("googlesitekit-wp-dashboard-stats__header")
                    .text("Site Kit"),
            );

        // Analytics 未啟用時顯示啟用提示
        if !analytics_active {
            stats = stats.child(
                Element::new("div")
                    .class("googlesitekit-wp-dashboard-stats__cta")
                    .child(activate_module_cta(&analytics)),
            );
        }

        let mut pass = RenderPass::new(&self.registry);
        let widgets = pass.render_all(&slugs, Some("googlesitekit-wp-dashboard-stats__cell"));

        Ok(Markup::fragment(vec![
            stats.into(),
            Element::new("div")
                .class("googlesitekit-wp-dashboard__module")
                .child(widgets)
                .into(),
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::FixtureStore;
    use crate::widgets::{WidgetOptions, WidgetProps};

    fn registry() -> Arc<WidgetRegistry> {
        let block = |props: &WidgetProps| -> Option<Markup> {
            Some(
                Element::new("div")
                    .class("googlesitekit-data-block")
                    .text(props.widget_slug().as_str())
                    .into(),
            )
        };

        let mut builder = WidgetRegistry::builder();
        for slug in [
            WIDGET_ADMIN_BAR_IMPRESSIONS,
            WIDGET_ADMIN_BAR_CLICKS,
            WIDGET_ADMIN_BAR_UNIQUE_VISITORS,
            WIDGET_ADMIN_BAR_SESSIONS,
        ] {
            builder = builder.register_widget(WidgetSlug::new(slug).unwrap(), block, WidgetOptions::default());
        }
        Arc::new(builder.build())
    }

    fn render(active: bool) -> Markup {
        let store = FixtureStore::from_json_str(&format!(
            r#"{{ "modules": {{ "analytics": {{ "active": {active}, "connected": {active} }} }} }}"#
        ))
        .unwrap();
        WpDashboardModules::new(registry(), Arc::new(store))
            .render()
            .unwrap()
    }

    #[test]
    fn test_active_analytics_renders_four_up() {
        let markup = render(true);
        assert!(markup.contains_class("googlesitekit-wp-dashboard-stats--fourup"));
        assert!(!markup.contains_class("googlesitekit-wp-dashboard-stats__cta"));
        assert_eq!(markup.find_by_class("googlesitekit-data-block").len(), 4);
        assert_eq!(markup.find_by_class("googlesitekit-wp-dashboard-stats__cell").len(), 4);
    }

    #[test]
    fn test_inactive_analytics_shows_cta() {
        let markup = render(false);
        assert!(!markup.contains_class("googlesitekit-wp-dashboard-stats--fourup"));
        assert!(markup.contains_class("googlesitekit-cta--activate-module"));
        assert_eq!(markup.find_by_class("googlesitekit-data-block").len(), 2);
    }

    #[test]
    fn test_widgets_use_standard_container() {
        let markup = render(true);
        let class = format!("googlesitekit-widget--{}", WIDGET_ADMIN_BAR_CLICKS);
        assert_eq!(markup.find_by_class(&class).len(), 1);
        assert_eq!(markup.find_by_class("googlesitekit-widget").len(), 4);
    }
}
