mod domain;
mod infrastructure;
mod presentation;

use eframe::egui;

fn main() -> Result<(), eframe::Error> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([520.0, 820.0])
            .with_title("BLE Remote"),
        ..Default::default()
    };

    eframe::run_native(
        "BLE Remote",
        options,
        Box::new(|cc| Ok(Box::new(presentation::app::RemoteApp::new(cc)))),
    )
}
