//! Closet - a desktop catalog for your clothing
//!
//! This is the main entry point: it loads settings, connects to the catalog
//! API (or the in-memory demo catalog) and opens the egui window.

mod app;
mod settings;
mod state;
mod ui;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use closet_integration::CatalogClient;

use crate::app::ClosetApp;
use crate::settings::AppSettings;

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")?;

    info!("Starting Closet...");

    let settings = AppSettings::from_environment();
    let client = if settings.api.demo {
        info!("Running in demo mode with in-memory data");
        CatalogClient::demo().context("Failed to start demo catalog")?
    } else {
        info!("Using catalog API at {}", settings.api.base_url);
        CatalogClient::http(&settings.api.base_url, settings.api.timeout())
            .context("Failed to create catalog client")?
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Closet")
            .with_inner_size([settings.window.width, settings.window.height])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "Closet",
        options,
        Box::new(move |cc| {
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(ClosetApp::new(client, settings)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("Window closed with error: {}", e))?;

    info!("Closet shut down");
    Ok(())
}
