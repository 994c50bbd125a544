//! PSVR2 Settings Editor
//!
//! Main entry point for the application.

use psvr2_settings_editor::SettingsEditorApp;

fn main() -> eframe::Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    log::info!("Starting PSVR2 Settings Editor v{}", env!("CARGO_PKG_VERSION"));

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 720.0])
            .with_min_inner_size([720.0, 520.0])
            .with_title("PSVR2Toolkit Gaze Calibration Editor"),
        vsync: true,
        multisampling: 0,
        ..Default::default()
    };

    eframe::run_native(
        "PSVR2 Settings Editor",
        native_options,
        Box::new(|cc| Box::new(SettingsEditorApp::new(cc))),
    )
}
