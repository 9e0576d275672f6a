mod app;
mod core;
mod events;
mod models;
mod ui;
mod utils;

use eframe::NativeOptions;
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

fn main() -> eyre::Result<()> {
    // Setup file-based logging
    let file_appender = tracing_appender::rolling::never(".", "botwatch.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("botwatch=info")),
        )
        .with_writer(non_blocking)
        .init();

    let runtime = Runtime::new()?;
    let handle = runtime.handle().clone();
    tracing::info!("Starting botwatch {}", env!("CARGO_PKG_VERSION"));

    let native_options = NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_title("botwatch")
            .with_inner_size([1280.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native(
        "botwatch",
        native_options,
        Box::new(move |cc| {
            let app = ui::app_layout::App::new(cc, handle);
            Ok(Box::new(app))
        }),
    )
    .map_err(|e| eyre::eyre!("UI failed: {}", e))?;

    runtime.shutdown_timeout(std::time::Duration::from_secs(1));
    Ok(())
}
