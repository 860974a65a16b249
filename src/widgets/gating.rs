use crate::domain::model::{ModuleSlug, ModuleState};
use crate::domain::ports::ModuleStore;
use crate::markup::Markup;
use crate::widgets::{Widget, WidgetProps};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    NotActive,
    ActiveNotConnected,
    ActiveConnected,
}

impl From<ModuleState> for GateState {
    fn from(state: ModuleState) -> Self {
        match (state.active, state.connected) {
            (false, _) => GateState::NotActive,
            (true, false) => GateState::ActiveNotConnected,
            (true, true) => GateState::ActiveConnected,
        }
    }
}

/// Requirement that a module be active and connected.
#[derive(Clone)]
pub struct ModuleGate {
    module: ModuleSlug,
    fallback: Option<Arc<dyn Widget>>,
    incomplete: Option<Arc<dyn Widget>>,
}

impl ModuleGate {
    pub fn new(module: ModuleSlug) -> Self {
        Self {
            module,
            fallback: None,
            incomplete: None,
        }
    }

    /// Replaces the activate CTA shown while the module is inactive.
    pub fn fallback<W: Widget + 'static>(mut self, widget: W) -> Self {
        self.fallback = Some(Arc::new(widget));
        self
    }

    /// Replaces the completion CTA shown while the module is not connected.
    pub fn incomplete<W: Widget + 'static>(mut self, widget: W) -> Self {
        self.incomplete = Some(Arc::new(widget));
        self
    }

    pub fn module(&self) -> &ModuleSlug {
        &self.module
    }

    fn blocked_markup(&self, state: GateState, props: &WidgetProps) -> Option<Markup> {
        match state {
            GateState::NotActive => match &self.fallback {
                Some(fallback) => fallback.render(props),
                None => Some(props.activate_module_cta(&self.module)),
            },
            GateState::ActiveNotConnected => match &self.incomplete {
                Some(incomplete) => incomplete.render(props),
                None => Some(props.complete_module_activation_cta(&self.module)),
            },
            GateState::ActiveConnected => None,
        }
    }
}

/// Outcome of evaluating the gates of a [`WhenActive`] widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Render,
    Blocked { module: ModuleSlug, state: GateState },
}

/// Renders the wrapped widget only when every gate is satisfied.
///
/// Gates are checked in declaration order and evaluation stops at the first
/// unsatisfied one, whose CTA is rendered instead of the widget.
pub struct WhenActive {
    modules: Arc<dyn ModuleStore>,
    gates: Vec<ModuleGate>,
    inner: Arc<dyn Widget>,
}

impl WhenActive {
    pub fn new<W: Widget + 'static>(modules: Arc<dyn ModuleStore>, inner: W) -> Self {
        Self {
            modules,
            gates: Vec::new(),
            inner: Arc::new(inner),
        }
    }

    pub fn gate(mut self, gate: ModuleGate) -> Self {
        self.gates.push(gate);
        self
    }

    pub fn module(self, module: ModuleSlug) -> Self {
        self.gate(ModuleGate::new(module))
    }

    pub fn evaluate(&self) -> GateDecision {
        match self.first_blocked() {
            Some((gate, state)) => GateDecision::Blocked {
                module: gate.module.clone(),
                state,
            },
            None => GateDecision::Render,
        }
    }

    fn first_blocked(&self) -> Option<(&ModuleGate, GateState)> {
        for gate in &self.gates {
            let state = GateState::from(self.modules.module_state(&gate.module));
            if state != GateState::ActiveConnected {
                return Some((gate, state));
            }
        }
        None
    }
}

impl Widget for WhenActive {
    fn render(&self, props: &WidgetProps) -> Option<Markup> {
        match self.first_blocked() {
            Some((gate, state)) => {
                tracing::debug!(
                    "Widget \"{}\" gated on module \"{}\" ({:?})",
                    props.widget_slug(),
                    gate.module,
                    state
                );
                gate.blocked_markup(state, props)
            }
            None => self.inner.render(props),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::WidgetSlug;
    use crate::widgets::widget_component_props;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockModules {
        states: HashMap<String, ModuleState>,
        queried: Mutex<Vec<String>>,
    }

    impl MockModules {
        fn with(mut self, slug: &str, active: bool, connected: bool) -> Self {
            self.states
                .insert(slug.to_string(), ModuleState { active, connected });
            self
        }

        fn queried(&self) -> Vec<String> {
            self.queried.lock().unwrap().clone()
        }
    }

    impl ModuleStore for MockModules {
        fn is_module_active(&self, slug: &ModuleSlug) -> bool {
            self.queried.lock().unwrap().push(slug.to_string());
            self.states.get(slug.as_str()).map(|s| s.active).unwrap_or(false)
        }

        fn is_module_connected(&self, slug: &ModuleSlug) -> bool {
            self.states
                .get(slug.as_str())
                .map(|s| s.connected)
                .unwrap_or(false)
        }
    }

    fn module(s: &str) -> ModuleSlug {
        ModuleSlug::new(s).unwrap()
    }

    fn props() -> WidgetProps {
        widget_component_props(&WidgetSlug::new("gated").unwrap())
    }

    fn content(_: &WidgetProps) -> Option<Markup> {
        Some(Markup::text("content"))
    }

    #[test]
    fn test_gate_state_from_module_state() {
        assert_eq!(
            GateState::from(ModuleState { active: false, connected: true }),
            GateState::NotActive
        );
        assert_eq!(
            GateState::from(ModuleState { active: true, connected: false }),
            GateState::ActiveNotConnected
        );
        assert_eq!(
            GateState::from(ModuleState { active: true, connected: true }),
            GateState::ActiveConnected
        );
    }

    #[test]
    fn test_inactive_module_renders_activate_cta_only() {
        let modules = Arc::new(MockModules::default().with("analytics", false, false));
        let widget = WhenActive::new(modules, content).module(module("analytics"));

        let markup = widget.render(&props()).unwrap();
        assert!(markup.contains_class("googlesitekit-cta--activate-module"));
        assert!(!markup.text_content().contains("content"));
    }

    #[test]
    fn test_unconnected_module_renders_completion_cta() {
        let modules = Arc::new(MockModules::default().with("analytics", true, false));
        let widget = WhenActive::new(modules, content).module(module("analytics"));

        let markup = widget.render(&props()).unwrap();
        assert!(markup.contains_class("googlesitekit-cta--complete-activation"));
        assert!(!markup.contains_class("googlesitekit-cta--activate-module"));
    }

    #[test]
    fn test_connected_module_renders_content_without_cta() {
        let modules = Arc::new(MockModules::default().with("analytics", true, true));
        let widget = WhenActive::new(modules, content).module(module("analytics"));

        let markup = widget.render(&props()).unwrap();
        assert_eq!(markup, Markup::text("content"));
        assert!(!markup.contains_class("googlesitekit-cta"));
        assert_eq!(widget.evaluate(), GateDecision::Render);
    }

    #[test]
    fn test_first_failing_gate_wins_and_short_circuits() {
        let modules = Arc::new(
            MockModules::default()
                .with("adsense", false, false)
                .with("analytics", true, false),
        );
        let widget = WhenActive::new(modules.clone(), content)
            .module(module("adsense"))
            .module(module("analytics"));

        let markup = widget.render(&props()).unwrap();
        assert_eq!(
            markup.find_by_class("googlesitekit-cta--activate-module")[0].attribute("data-module"),
            Some("adsense")
        );
        assert!(!markup.contains_class("googlesitekit-cta--complete-activation"));
        assert_eq!(modules.queried(), vec!["adsense".to_string()]);
    }

    #[test]
    fn test_all_gates_must_pass() {
        let modules = Arc::new(
            MockModules::default()
                .with("adsense", true, true)
                .with("analytics", true, false),
        );
        let widget = WhenActive::new(modules, content)
            .module(module("adsense"))
            .module(module("analytics"));

        assert_eq!(
            widget.evaluate(),
            GateDecision::Blocked {
                module: module("analytics"),
                state: GateState::ActiveNotConnected,
            }
        );
    }

    #[test]
    fn test_fallback_overrides_default_cta() {
        let modules = Arc::new(MockModules::default());
        let widget = WhenActive::new(modules, content).gate(
            ModuleGate::new(module("analytics"))
                .fallback(|_: &WidgetProps| Some(Markup::text("custom fallback"))),
        );

        assert_eq!(widget.render(&props()), Some(Markup::text("custom fallback")));
    }
}
