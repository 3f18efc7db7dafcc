use crate::domain::settings::{DEFAULT_CHARACTERISTIC_UUID, DEFAULT_SERVICE_UUID};
use crate::presentation::app::RemoteApp;
use crate::domain::models::MessageSeverity;
use crate::presentation::components::Components;
use crate::presentation::theme::BrutalistPalette;
use eframe::egui;
use uuid::Uuid;

pub fn render(app: &mut RemoteApp, ui: &mut egui::Ui) {
    Components::heading(ui, "Settings");
    ui.add_space(20.0);

    let palette = BrutalistPalette::new(app.is_dark_mode);
    let Ok(mut settings) = app.settings.lock() else {
        ui.label("Settings are unavailable.");
        return;
    };
    let mut save_requested = false;

    {
        let settings_mut = settings.get_mut();

        Components::brutalist_card(ui, "Bluetooth Protocol", |ui| {
            ui.horizontal(|ui| {
                ui.label("Scan window (ms):");
                ui.add(egui::Slider::new(&mut settings_mut.scan_timeout_ms, 1000..=30000));
            });

            ui.collapsing("Override GATT UUIDs", |ui| {
                ui.label(
                    egui::RichText::new("⚠️ These must match the receiver exactly.")
                        .color(palette.severity(MessageSeverity::Warning)),
                );

                egui::Grid::new("ble_uuids")
                    .spacing([10.0, 10.0])
                    .show(ui, |ui| {
                        ui.label("Service:");
                        ui.text_edit_singleline(&mut settings_mut.service_uuid);
                        uuid_hint(ui, &palette, &settings_mut.service_uuid);
                        ui.end_row();
                        ui.label("Characteristic:");
                        ui.text_edit_singleline(&mut settings_mut.characteristic_uuid);
                        uuid_hint(ui, &palette, &settings_mut.characteristic_uuid);
                        ui.end_row();
                    });

                if ui.button("Restore defaults").clicked() {
                    settings_mut.service_uuid = DEFAULT_SERVICE_UUID.to_string();
                    settings_mut.characteristic_uuid = DEFAULT_CHARACTERISTIC_UUID.to_string();
                }
            });
        });

        ui.add_space(10.0);

        Components::brutalist_card(ui, "Logging", |ui| {
            ui.horizontal(|ui| {
                ui.label("Verbosity Level:");
                egui::ComboBox::from_id_salt("log_level")
                    .selected_text(&settings_mut.log_settings.level)
                    .show_ui(ui, |ui| {
                        for level in &["trace", "debug", "info", "warn", "error"] {
                            ui.selectable_value(
                                &mut settings_mut.log_settings.level,
                                level.to_string(),
                                *level,
                            );
                        }
                    });
            });

            ui.checkbox(
                &mut settings_mut.log_settings.console_logging_enabled,
                "Console Logs",
            );
            ui.checkbox(
                &mut settings_mut.log_settings.file_logging_enabled,
                "File Logs",
            );

            if settings_mut.log_settings.file_logging_enabled {
                ui.indent("file_logs", |ui| {
                    ui.horizontal(|ui| {
                        ui.label("Save Path:");
                        ui.text_edit_singleline(&mut settings_mut.log_settings.log_dir);
                    });
                    ui.horizontal(|ui| {
                        ui.label("Rotation:");
                        egui::ComboBox::from_id_salt("log_rot")
                            .selected_text(&settings_mut.log_settings.rotation)
                            .show_ui(ui, |ui| {
                                for rot in &["daily", "hourly", "never"] {
                                    ui.selectable_value(
                                        &mut settings_mut.log_settings.rotation,
                                        rot.to_string(),
                                        *rot,
                                    );
                                }
                            });
                    });
                });
            }

            ui.label(
                egui::RichText::new("Restart required for log changes.")
                    .italics()
                    .size(12.0),
            );
        });

        ui.add_space(10.0);
        Components::sub_heading(ui, "Changes apply to the next connection.");
        if ui.button("Save").clicked() {
            save_requested = true;
        }
    }

    if save_requested {
        if let Err(e) = settings.save() {
            tracing::error!("Failed to save settings: {}", e);
        }
    }
}

fn uuid_hint(ui: &mut egui::Ui, palette: &BrutalistPalette, value: &str) {
    if Uuid::parse_str(value.trim()).is_err() {
        ui.label(egui::RichText::new("invalid").color(palette.error));
    } else {
        ui.label("");
    }
}
