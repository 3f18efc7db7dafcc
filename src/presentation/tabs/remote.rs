use crate::domain::models::ConnectionStatus;
use crate::presentation::app::RemoteApp;
use crate::presentation::components::Components;
use crate::presentation::theme::BrutalistPalette;
use eframe::egui;

/// Rows of on-screen controls, by binding name
const CONTROL_ROWS: &[&[&str]] = &[
    &["power"],
    &["up"],
    &["left", "ok", "right"],
    &["down"],
    &["back", "home", "menu"],
    &["voldown", "mute", "volup"],
];

fn control_label(control: &str) -> &str {
    match control {
        "power" => "⏻",
        "up" => "▲",
        "down" => "▼",
        "left" => "◀",
        "right" => "▶",
        "ok" => "OK",
        "home" => "Home",
        "back" => "Back",
        "menu" => "Menu",
        "volup" => "Vol +",
        "voldown" => "Vol −",
        "mute" => "Mute",
        other => other,
    }
}

pub fn render(app: &mut RemoteApp, ui: &mut egui::Ui) {
    Components::heading(ui, "Bluetooth Remote");
    ui.add_space(20.0);

    ui_connection_panel(app, ui);
    ui.add_space(15.0);

    ui_status_panel(app, ui);
    ui.add_space(15.0);

    // Hidden until a session exists or after the radio goes away
    if app.remote.panel_visible() {
        ui_control_panel(app, ui);
    }
}

fn ui_connection_panel(app: &mut RemoteApp, ui: &mut egui::Ui) {
    Components::brutalist_card(ui, "Connection", |ui| {
        let palette = BrutalistPalette::new(app.is_dark_mode);
        let (status_text, bg_color, text_color) = palette.banner(app.remote.connection_status);

        Components::status_banner(ui, status_text, bg_color, text_color);
        ui.add_space(10.0);

        ui.horizontal(|ui| {
            let connecting = app.remote.connection_status == ConnectionStatus::Connecting;
            if ui
                .add_enabled(!connecting, egui::Button::new("Connect Bluetooth"))
                .clicked()
            {
                app.connect();
            }
            if connecting {
                ui.spinner();
            }
            if !app.remote.available && ui.button("Check again").clicked() {
                app.check_availability();
            }
        });
    });
}

fn ui_status_panel(app: &mut RemoteApp, ui: &mut egui::Ui) {
    let msg = &app.remote.status;
    let color = BrutalistPalette::new(app.is_dark_mode).severity(msg.severity);
    Components::brutalist_card(ui, "Status", |ui| {
        ui.label(egui::RichText::new(&msg.message).color(color).strong());
    });
}

fn ui_control_panel(app: &mut RemoteApp, ui: &mut egui::Ui) {
    let mut pressed = None;

    Components::brutalist_card(ui, "Remote", |ui| {
        for row in CONTROL_ROWS {
            ui.horizontal(|ui| {
                // Centre the row under the card title
                let row_width = row.len() as f32 * 84.0;
                ui.add_space(((ui.available_width() - row_width) / 2.0).max(0.0));
                for control in row.iter() {
                    if Components::remote_key(ui, control_label(control)) {
                        pressed = Some(*control);
                    }
                }
            });
        }

        ui.add_space(8.0);
        ui.label(
            egui::RichText::new("Keys: arrows, Enter, Esc, Home, m menu, v/c volume, u mute, p power")
                .italics()
                .size(12.0),
        );
    });

    if let Some(control) = pressed {
        app.press_control(control);
    }
}
