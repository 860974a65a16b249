use crate::domain::model::WidgetSlug;
use crate::widgets::Widget;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetOptions {
    /// 是否以標準 widget 容器包裝
    pub wrap_widget: bool,
}

impl Default for WidgetOptions {
    fn default() -> Self {
        Self { wrap_widget: true }
    }
}

#[derive(Clone)]
pub struct WidgetDescriptor {
    pub slug: WidgetSlug,
    pub component: Arc<dyn Widget>,
    pub wrap_widget: bool,
}

impl fmt::Debug for WidgetDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetDescriptor")
            .field("slug", &self.slug)
            .field("wrap_widget", &self.wrap_widget)
            .finish_non_exhaustive()
    }
}

/// Registration phase. Consumed by [`WidgetRegistryBuilder::build`].
#[derive(Default)]
pub struct WidgetRegistryBuilder {
    widgets: HashMap<WidgetSlug, WidgetDescriptor>,
}

impl WidgetRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `component` under `slug`. The first registration of a slug wins.
    pub fn register_widget<W>(mut self, slug: WidgetSlug, component: W, options: WidgetOptions) -> Self
    where
        W: Widget + 'static,
    {
        self.insert(slug, Arc::new(component), options);
        self
    }

    fn insert(&mut self, slug: WidgetSlug, component: Arc<dyn Widget>, options: WidgetOptions) {
        if self.widgets.contains_key(&slug) {
            tracing::warn!("⚠️ Widget \"{}\" is already registered, ignoring", slug);
            return;
        }

        tracing::debug!("Registering widget \"{}\" (wrap: {})", slug, options.wrap_widget);
        self.widgets.insert(
            slug.clone(),
            WidgetDescriptor {
                slug,
                component,
                wrap_widget: options.wrap_widget,
            },
        );
    }

    pub fn build(self) -> WidgetRegistry {
        WidgetRegistry {
            widgets: self.widgets,
        }
    }
}

/// Immutable slug → descriptor mapping, shared read-only by renderers.
#[derive(Debug, Default)]
pub struct WidgetRegistry {
    widgets: HashMap<WidgetSlug, WidgetDescriptor>,
}

impl WidgetRegistry {
    pub fn builder() -> WidgetRegistryBuilder {
        WidgetRegistryBuilder::new()
    }

    pub fn get_widget(&self, slug: &WidgetSlug) -> Option<&WidgetDescriptor> {
        self.widgets.get(slug)
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    pub fn slugs(&self) -> Vec<&WidgetSlug> {
        let mut slugs: Vec<&WidgetSlug> = self.widgets.keys().collect();
        slugs.sort();
        slugs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::Markup;
    use crate::widgets::{widget_component_props, WidgetProps};

    fn slug(s: &str) -> WidgetSlug {
        WidgetSlug::new(s).unwrap()
    }

    #[test]
    fn test_get_widget_returns_registered_descriptor() {
        let registry = WidgetRegistry::builder()
            .register_widget(
                slug("adminBarClicks"),
                |_: &WidgetProps| Some(Markup::text("clicks")),
                WidgetOptions { wrap_widget: false },
            )
            .build();

        let descriptor = registry.get_widget(&slug("adminBarClicks")).unwrap();
        assert!(!descriptor.wrap_widget);
        assert_eq!(registry.len(), 1);
        assert!(registry.get_widget(&slug("missing")).is_none());
    }

    #[test]
    fn test_first_registration_wins() {
        let registry = WidgetRegistry::builder()
            .register_widget(
                slug("dup"),
                |_: &WidgetProps| Some(Markup::text("first")),
                WidgetOptions::default(),
            )
            .register_widget(
                slug("dup"),
                |_: &WidgetProps| Some(Markup::text("second")),
                WidgetOptions::default(),
            )
            .build();

        let descriptor = registry.get_widget(&slug("dup")).unwrap();
        let rendered = descriptor
            .component
            .render(&widget_component_props(&descriptor.slug));
        assert_eq!(rendered, Some(Markup::text("first")));
    }

    #[test]
    fn test_default_options_wrap() {
        assert!(WidgetOptions::default().wrap_widget);
    }
}
