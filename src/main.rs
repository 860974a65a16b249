use clap::Parser;
use sitekit_widgets::markup::components::{settings_notice, NoticeType};
use sitekit_widgets::utils::error::ErrorSeverity;
use sitekit_widgets::utils::logger;
use sitekit_widgets::utils::validation::{validate_path, Validate};
use sitekit_widgets::{
    default_registry, AdminBarApp, CliConfig, Command, DashboardConfig, DashboardStores,
    EventTracker, FixtureStore, HttpDataLayer, Markup, RenderPass, Result, Tracker, Widget,
    WidgetError, WidgetProps, WidgetSlug,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    let config = match DashboardConfig::from_file(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            logger::init_cli_logger(cli.verbose);
            exit_with(&e);
        }
    };

    // 初始化日誌
    if config.json_logging() {
        logger::init_json_logger(if cli.verbose { "debug" } else { config.log_level() });
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting sitekit-widgets CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let result = match cli.command {
        Command::Render {
            store,
            widgets,
            grid_class,
            admin_bar_widgets,
            notice,
        } => render(
            &config,
            &store,
            &widgets,
            grid_class.as_deref(),
            admin_bar_widgets,
            notice.as_deref(),
        ),
        Command::Track {
            category,
            name,
            label,
            value,
            endpoint,
        } => {
            track(
                &config,
                &category,
                &name,
                label.as_deref(),
                value.as_deref(),
                endpoint,
            )
            .await
        }
    };

    if let Err(e) = result {
        exit_with(&e);
    }

    Ok(())
}

fn render(
    config: &DashboardConfig,
    store_path: &str,
    widgets: &[String],
    grid_class: Option<&str>,
    admin_bar_widgets: Option<bool>,
    notice: Option<&str>,
) -> Result<()> {
    validate_path("--store", store_path)?;
    let store = Arc::new(FixtureStore::from_file(store_path)?);
    let stores = DashboardStores {
        reports: store.clone(),
        modules: store,
        site: Arc::new(config.site.clone()),
    };
    let registry = Arc::new(default_registry(
        &stores,
        chrono::Local::now().date_naive(),
    )?);
    tracing::debug!("Registered widgets: {:?}", registry.slugs());

    let markup = if widgets.is_empty() {
        let enabled = admin_bar_widgets.unwrap_or_else(|| config.admin_bar_widgets_enabled());
        let app = AdminBarApp::new(registry.clone(), stores.modules.clone(), stores.site.clone())
            .widgets_admin_bar_enabled(enabled);

        match app.render() {
            Some(markup) => markup,
            None => {
                tracing::warn!("⚠️ No current entity configured, admin bar renders nothing");
                return Ok(());
            }
        }
    } else {
        let slugs = widgets
            .iter()
            .map(|slug| WidgetSlug::new(slug.as_str()))
            .collect::<Result<Vec<_>>>()?;

        let mut pass = RenderPass::new(&registry);
        let markup = match notice {
            Some(text) => {
                let text = text.to_string();
                let override_notice = move |_: &WidgetProps| -> Option<Markup> {
                    Some(settings_notice(NoticeType::Info, Markup::text(text.clone())))
                };
                let override_widget: &dyn Widget = &override_notice;
                Markup::fragment(
                    slugs
                        .iter()
                        .filter_map(|slug| pass.render(slug, grid_class, Some(override_widget)))
                        .collect(),
                )
            }
            None => pass.render_all(&slugs, grid_class),
        };
        tracing::info!(
            "✅ Rendered {} of {} requested widgets",
            pass.rendered_count(),
            slugs.len()
        );
        markup
    };

    println!("{}", markup.to_html());
    Ok(())
}

async fn track(
    config: &DashboardConfig,
    category: &str,
    name: &str,
    label: Option<&str>,
    value: Option<&str>,
    endpoint: Option<String>,
) -> Result<()> {
    let endpoint = endpoint
        .or_else(|| config.tracking_endpoint().map(str::to_string))
        .ok_or_else(|| WidgetError::MissingConfigError {
            field: "tracking.endpoint".to_string(),
        })?;

    let tracker = Tracker::new(config.tracking_config(), HttpDataLayer::new(endpoint))
        .with_timeout(config.tracking_timeout());
    if !tracker.is_enabled() {
        tracing::info!("Tracking is disabled in the configuration, nothing will be sent");
    }

    let outcome = tracker.track(category, name, label, value).await;
    tracing::info!("📡 Tracking event \"{}\" settled: {:?}", name, outcome);
    println!("{:?}", outcome);
    Ok(())
}

fn exit_with(e: &WidgetError) -> ! {
    // 記錄詳細錯誤信息
    tracing::error!(
        "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
