pub mod toml_config;

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "sitekit-widgets")]
#[command(about = "Render analytics dashboard widgets and send tracking events")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "sitekit.toml", global = true)]
    pub config: String,

    #[arg(short, long, help = "Enable verbose output", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Render widgets (or the admin bar when no widget is given) as HTML
    Render {
        /// JSON snapshot of the datastore
        #[arg(short, long)]
        store: String,

        /// Widget slugs to render, in order
        #[arg(short, long = "widget", value_delimiter = ',')]
        widgets: Vec<String>,

        /// Wrap every widget in a grid cell with this class
        #[arg(long)]
        grid_class: Option<String>,

        /// Override the admin bar widgets feature flag from the config
        #[arg(long)]
        admin_bar_widgets: Option<bool>,

        /// Show this notice in place of each widget; widgets stay rendered but hidden
        #[arg(long)]
        notice: Option<String>,
    },
    /// Send a single tracking event
    Track {
        #[arg(long)]
        category: String,

        #[arg(long)]
        name: String,

        #[arg(long)]
        label: Option<String>,

        #[arg(long)]
        value: Option<String>,

        /// Override the beacon endpoint from the config
        #[arg(long)]
        endpoint: Option<String>,
    },
}
