// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! DrawZone demo host
//!
//! A desktop application that embeds the drawing engine over a loaded image
//! and keeps the element list the engine reports back.

mod app;
mod ui;

use anyhow::Result;
use app::DrawZoneApp;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    // Optional engine configuration file as the first argument
    let config = match std::env::args_os().nth(1) {
        Some(path) => drawzone::config::load(std::path::Path::new(&path))?,
        None => drawzone::ZoneConfig::default(),
    };

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("DrawZone"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "DrawZone",
        options,
        Box::new(move |_cc| Ok(Box::new(DrawZoneApp::new(config)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
