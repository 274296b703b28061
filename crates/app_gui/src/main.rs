mod app;

use anyhow::Context;
use app::UiApp;
use eframe::{NativeOptions, egui};
use leaf_core::ClientConfig;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!("loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!("could not read .env file: {e}"),
    }

    let config = ClientConfig::from_env();
    let app = UiApp::new(config).context("failed to start application")?;

    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([420.0, 760.0]),
        ..Default::default()
    };
    if let Err(e) = eframe::run_native(
        "Potato Leaf Detector",
        options,
        Box::new(move |_cc| Ok(Box::new(app))),
    ) {
        eprintln!("Application stopped with error: {e}");
    }
    Ok(())
}
