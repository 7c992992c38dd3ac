#![warn(clippy::all, rust_2018_idioms)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use screen_pen::{Launch, OverlayConfig, ScreenPenApp};

fn main() -> eframe::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = OverlayConfig::default();
    let launch = Launch::detect();
    if !launch.permission_granted {
        log::warn!("Screen capture permission is missing");
    }

    let native_options = eframe::NativeOptions {
        viewport: launch.viewport(),
        ..Default::default()
    };
    eframe::run_native(
        "Screen Pen",
        native_options,
        Box::new(move |cc| Ok(Box::new(ScreenPenApp::new(cc, config, launch)))),
    )
}
