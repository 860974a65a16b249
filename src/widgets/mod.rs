//! Widget capability, registry, renderer and module gates.

pub mod gating;
pub mod registry;
pub mod renderer;

use crate::domain::model::{ModuleSlug, StoreError, WidgetSlug};
use crate::markup::{components, Markup};

pub use gating::{GateState, ModuleGate, WhenActive};
pub use registry::{WidgetDescriptor, WidgetOptions, WidgetRegistry, WidgetRegistryBuilder};
pub use renderer::{RenderPass, WidgetRenderer};

/// A self-contained UI unit. Returning `None` renders nothing.
pub trait Widget: Send + Sync {
    fn render(&self, props: &WidgetProps) -> Option<Markup>;
}

impl<F> Widget for F
where
    F: Fn(&WidgetProps) -> Option<Markup> + Send + Sync,
{
    fn render(&self, props: &WidgetProps) -> Option<Markup> {
        self(props)
    }
}

/// Per-widget props. Always derived from the slug alone, see
/// [`widget_component_props`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetProps {
    widget_slug: WidgetSlug,
}

impl WidgetProps {
    pub fn widget_slug(&self) -> &WidgetSlug {
        &self.widget_slug
    }

    pub fn report_zero(&self, module: &ModuleSlug) -> Markup {
        self.tag(components::report_zero(module))
    }

    pub fn report_error(&self, module: &ModuleSlug, error: &StoreError) -> Markup {
        self.tag(components::report_error(module, error))
    }

    pub fn activate_module_cta(&self, module: &ModuleSlug) -> Markup {
        self.tag(components::activate_module_cta(module))
    }

    pub fn complete_module_activation_cta(&self, module: &ModuleSlug) -> Markup {
        self.tag(components::complete_module_activation_cta(module))
    }

    // 標記狀態元件屬於哪個 widget
    fn tag(&self, markup: Markup) -> Markup {
        match markup {
            Markup::Element(element) => element
                .attr("data-widget", self.widget_slug.as_str())
                .into(),
            other => other,
        }
    }
}

pub fn widget_component_props(slug: &WidgetSlug) -> WidgetProps {
    WidgetProps {
        widget_slug: slug.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_props_are_pure_function_of_slug() {
        let slug = WidgetSlug::new("adminBarClicks").unwrap();
        assert_eq!(widget_component_props(&slug), widget_component_props(&slug));
    }

    #[test]
    fn test_state_components_carry_widget_slug() {
        let props = widget_component_props(&WidgetSlug::new("adminBarClicks").unwrap());
        let markup = props.report_zero(&ModuleSlug::new("search-console").unwrap());

        let Markup::Element(element) = markup else {
            panic!("expected an element");
        };
        assert_eq!(element.attribute("data-widget"), Some("adminBarClicks"));
    }

    #[test]
    fn test_closures_are_widgets() {
        let widget = |props: &WidgetProps| Some(Markup::text(props.widget_slug().to_string()));
        let props = widget_component_props(&WidgetSlug::new("closure").unwrap());
        assert_eq!(widget.render(&props), Some(Markup::text("closure")));
    }
}
