use crate::domain::model::WidgetSlug;
use crate::markup::components::{grid_cell, hidden, WidgetContainer};
use crate::markup::Markup;
use crate::widgets::{widget_component_props, Widget, WidgetRegistry};
use std::collections::HashSet;

/// Slug used for the container around an override component.
pub const OVERRIDDEN_SLUG: &str = "overridden";

/// Resolves slugs against a registry and produces widget markup.
#[derive(Debug, Clone, Copy)]
pub struct WidgetRenderer<'a> {
    registry: &'a WidgetRegistry,
}

impl<'a> WidgetRenderer<'a> {
    pub fn new(registry: &'a WidgetRegistry) -> Self {
        Self { registry }
    }

    /// Renders the widget registered under `slug`.
    ///
    /// Returns `None` when the slug is not registered. With an override the
    /// override is shown in a standard container while the real widget stays
    /// rendered inside a hidden container.
    pub fn render(
        &self,
        slug: &WidgetSlug,
        grid_class_name: Option<&str>,
        override_component: Option<&dyn Widget>,
    ) -> Option<Markup> {
        let Some(widget) = self.registry.get_widget(slug) else {
            tracing::debug!("Widget \"{}\" is not registered, rendering nothing", slug);
            return None;
        };

        let props = widget_component_props(slug);
        let mut element = widget
            .component
            .render(&props)
            .unwrap_or_else(|| Markup::fragment(Vec::new()));

        if let Some(override_component) = override_component {
            // override 一律包在標準容器內，真正的 widget 仍然渲染但以 CSS 隱藏
            let override_props = widget_component_props(slug);
            let override_markup = override_component
                .render(&override_props)
                .unwrap_or_else(|| Markup::fragment(Vec::new()));

            element = Markup::fragment(vec![
                WidgetContainer::new(OVERRIDDEN_SLUG).wrap(override_markup),
                hidden(element),
            ]);
        } else if widget.wrap_widget {
            element = WidgetContainer::new(slug.as_str()).wrap(element);
        }

        match grid_class_name {
            Some(class_name) if !class_name.trim().is_empty() => Some(grid_cell(class_name, element)),
            _ => Some(element),
        }
    }
}

/// One render pass over a set of widgets. Each slug renders at most once.
#[derive(Debug)]
pub struct RenderPass<'a> {
    renderer: WidgetRenderer<'a>,
    rendered: HashSet<WidgetSlug>,
}

impl<'a> RenderPass<'a> {
    pub fn new(registry: &'a WidgetRegistry) -> Self {
        Self {
            renderer: WidgetRenderer::new(registry),
            rendered: HashSet::new(),
        }
    }

    pub fn render(
        &mut self,
        slug: &WidgetSlug,
        grid_class_name: Option<&str>,
        override_component: Option<&dyn Widget>,
    ) -> Option<Markup> {
        if self.rendered.contains(slug) {
            tracing::debug!("Widget \"{}\" already rendered in this pass, skipping", slug);
            return None;
        }

        let markup = self
            .renderer
            .render(slug, grid_class_name, override_component)?;
        self.rendered.insert(slug.clone());
        Some(markup)
    }

    /// 依宣告順序渲染多個 widget
    pub fn render_all<'s, I>(&mut self, slugs: I, grid_class_name: Option<&str>) -> Markup
    where
        I: IntoIterator<Item = &'s WidgetSlug>,
    {
        let children = slugs
            .into_iter()
            .filter_map(|slug| self.render(slug, grid_class_name, None))
            .collect();
        Markup::fragment(children)
    }

    pub fn rendered_count(&self) -> usize {
        self.rendered.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::{Element, HIDDEN_CLASS};
    use crate::widgets::{WidgetOptions, WidgetProps};

    fn slug(s: &str) -> WidgetSlug {
        WidgetSlug::new(s).unwrap()
    }

    fn test_registry() -> WidgetRegistry {
        WidgetRegistry::builder()
            .register_widget(
                slug("wrapped"),
                |_: &WidgetProps| Some(Element::new("p").class("real-widget").text("real").into()),
                WidgetOptions { wrap_widget: true },
            )
            .register_widget(
                slug("bare"),
                |_: &WidgetProps| Some(Element::new("p").class("bare-widget").text("bare").into()),
                WidgetOptions { wrap_widget: false },
            )
            .build()
    }

    #[test]
    fn test_unknown_slug_renders_nothing() {
        let registry = test_registry();
        let renderer = WidgetRenderer::new(&registry);
        assert!(renderer.render(&slug("nope"), Some("grid"), None).is_none());
    }

    #[test]
    fn test_wrapped_widget_gets_standard_container() {
        let registry = test_registry();
        let markup = WidgetRenderer::new(&registry)
            .render(&slug("wrapped"), None, None)
            .unwrap();

        assert!(markup.contains_class("googlesitekit-widget--wrapped"));
        assert!(markup.contains_class("real-widget"));
    }

    #[test]
    fn test_unwrapped_widget_is_rendered_directly() {
        let registry = test_registry();
        let markup = WidgetRenderer::new(&registry)
            .render(&slug("bare"), None, None)
            .unwrap();

        assert!(!markup.contains_class("googlesitekit-widget"));
        assert_eq!(markup.to_html(), "<p class=\"bare-widget\">bare</p>");
    }

    #[test]
    fn test_grid_class_wraps_result() {
        let registry = test_registry();
        let markup = WidgetRenderer::new(&registry)
            .render(&slug("bare"), Some("mdc-layout-grid__cell"), None)
            .unwrap();

        assert_eq!(
            markup.to_html(),
            "<div class=\"mdc-layout-grid__cell\"><p class=\"bare-widget\">bare</p></div>"
        );
    }

    #[test]
    fn test_override_keeps_real_widget_hidden() {
        let registry = test_registry();
        let override_widget =
            |_: &WidgetProps| Some(Element::new("p").class("override").text("override").into());

        let markup = WidgetRenderer::new(&registry)
            .render(&slug("bare"), None, Some(&override_widget))
            .unwrap();

        assert!(markup.contains_class("googlesitekit-widget--overridden"));
        let hidden = markup.find_by_class(HIDDEN_CLASS);
        assert_eq!(hidden.len(), 1);
        let hidden_markup: Markup = hidden[0].clone().into();
        assert!(hidden_markup.contains_class("bare-widget"));
        assert!(!hidden_markup.contains_class("override"));
    }

    #[test]
    fn test_override_ignores_wrap_flag_for_real_widget() {
        let registry = test_registry();
        let override_widget = |_: &WidgetProps| Some(Markup::text("override"));

        let markup = WidgetRenderer::new(&registry)
            .render(&slug("wrapped"), None, Some(&override_widget))
            .unwrap();

        assert!(!markup.contains_class("googlesitekit-widget--wrapped"));
        assert!(markup.contains_class("real-widget"));
    }

    #[test]
    fn test_render_pass_renders_each_slug_once() {
        let registry = test_registry();
        let mut pass = RenderPass::new(&registry);
        let slugs = vec![slug("bare"), slug("wrapped"), slug("bare"), slug("missing")];

        let markup = pass.render_all(&slugs, None);

        assert_eq!(markup.find_by_class("bare-widget").len(), 1);
        assert_eq!(markup.find_by_class("real-widget").len(), 1);
        assert_eq!(pass.rendered_count(), 2);
    }
}
