pub mod adapters;
pub mod config;
pub mod dashboard;
pub mod domain;
pub mod markup;
pub mod table;
pub mod tracking;
pub mod utils;
pub mod widgets;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use adapters::{FixtureStore, HttpDataLayer, RecordingDataLayer};
pub use config::toml_config::DashboardConfig;
pub use dashboard::{default_registry, AdminBarApp, DashboardStores, WpDashboardModules};
pub use domain::model::{ModuleSlug, WidgetSlug};
pub use markup::Markup;
pub use table::{to_table, TableHeader, TableOptions, TableSpec};
pub use tracking::{EventTracker, TrackOutcome, Tracker, TrackingConfig};
pub use utils::error::{Result, WidgetError};
pub use widgets::{RenderPass, Widget, WidgetProps, WidgetRegistry, WidgetRenderer};
