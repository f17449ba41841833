use anyhow::Result;
use eframe::egui;

mod app;
mod audio;
mod game;
mod messaging;
mod settings;
mod theory;
mod ui;

fn main() -> Result<()> {
    env_logger::init();
    log::info!("starting SightRead trainer");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([900.0, 520.0]),
        ..Default::default()
    };

    eframe::run_native(
        "SightRead",
        options,
        Box::new(|_cc| Ok(Box::new(app::TrainerApp::new()))),
    )
    .map_err(|e| anyhow::anyhow!("application error: {}", e))
}
