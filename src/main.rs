//! HyperDEX settings
//!
//! Headless driver for the settings panel. Reads one command per line from
//! stdin and applies it to the same state, form and debounced writer the
//! settings view uses.
//!
//! Commands: `select A,B,C`, `enable SYM`, `disable SYM`, `url <value>`,
//! `blur`, `show`, `options`, `flush`, `quit`.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hyperdex_settings::app::SettingsApp;
use hyperdex_settings::config::settings::Settings;
use hyperdex_settings::config::store::{ConfigStore, JsonConfigStore};

fn main() -> Result<()> {
    // Initialize file logging
    let file_appender = tracing_appender::rolling::never(".", "settings.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking))
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    tracing::info!("Starting HyperDEX settings");

    // Install panic hook to log panics
    let next = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        tracing::error!("Application panic: {}", info);
        next(info);
    }));

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(JsonConfigStore::default_path);
    let store: Arc<dyn ConfigStore> = Arc::new(
        JsonConfigStore::open(&config_path)
            .with_context(|| format!("Failed to open config file {:?}", config_path))?,
    );

    let settings = Settings::load(&Settings::default_path()).context("Failed to load settings")?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let mut app = SettingsApp::new(runtime.handle().clone(), store, &settings);
    let result = runtime.block_on(app.run(BufReader::new(tokio::io::stdin())));
    drop(app);

    // The stdin reader may still be parked on a blocking read
    runtime.shutdown_timeout(Duration::from_millis(100));
    tracing::info!("Settings closed");
    result
}
