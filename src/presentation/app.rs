use crate::domain::commands::RemoteCommand;
use crate::domain::errors::TransportError;
use crate::domain::models::{AppEvent, BluetoothCommand, Tab};
use crate::domain::remote::RemoteState;
use crate::domain::settings::SettingsService;
use crate::infrastructure::bluetooth::{BluetoothService, ConnectionConfig, PlatformTransport};
use crate::infrastructure::logging::LoggingGuard;
use crate::presentation::keys;
use eframe::egui;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

pub struct RemoteApp {
    pub(crate) settings: Arc<Mutex<SettingsService>>,

    // Bluetooth
    pub(crate) bluetooth_tx: mpsc::UnboundedSender<BluetoothCommand>,
    pub(crate) event_rx: mpsc::UnboundedReceiver<AppEvent>,

    // State
    pub(crate) remote: RemoteState,

    // UI State
    pub(crate) selected_tab: Tab,
    pub(crate) is_dark_mode: bool,

    _logging_guard: Option<LoggingGuard>,
}

impl RemoteApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let settings_service = SettingsService::new().unwrap_or_else(|e| {
            eprintln!("Failed to locate config directory ({}), using ./settings.json", e);
            SettingsService::with_path(PathBuf::from("settings.json"))
        });

        let logging_guard =
            crate::infrastructure::logging::init_logger(&settings_service.get().log_settings)
                .map_err(|e| eprintln!("Failed to initialize logging: {}", e))
                .ok();

        info!("Starting BLE Remote");

        let is_dark_mode = settings_service.get().dark_mode;
        crate::presentation::theme::configure_neubrutalism(&cc.egui_ctx, is_dark_mode);

        let settings = Arc::new(Mutex::new(settings_service));
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (bt_cmd_tx, bt_cmd_rx) = mpsc::unbounded_channel();
        spawn_bluetooth_worker(settings.clone(), event_tx, bt_cmd_rx);

        Self::from_parts(settings, bt_cmd_tx, event_rx, is_dark_mode, logging_guard)
    }

    fn from_parts(
        settings: Arc<Mutex<SettingsService>>,
        bluetooth_tx: mpsc::UnboundedSender<BluetoothCommand>,
        event_rx: mpsc::UnboundedReceiver<AppEvent>,
        is_dark_mode: bool,
        logging_guard: Option<LoggingGuard>,
    ) -> Self {
        Self {
            settings,
            bluetooth_tx,
            event_rx,
            remote: RemoteState::new(),
            selected_tab: Tab::Remote,
            is_dark_mode,
            _logging_guard: logging_guard,
        }
    }

    pub(crate) fn connect(&mut self) {
        if self.remote.begin_connect() {
            self.send_to_worker(BluetoothCommand::RequestDevice);
        } else {
            info!("Connection attempt already in progress");
        }
    }

    pub(crate) fn check_availability(&mut self) {
        self.send_to_worker(BluetoothCommand::CheckAvailability);
    }

    pub(crate) fn choose_device(&mut self, id: String) {
        self.remote.close_chooser();
        self.send_to_worker(BluetoothCommand::Connect(id));
    }

    pub(crate) fn cancel_chooser(&mut self) {
        self.remote.close_chooser();
        self.send_to_worker(BluetoothCommand::CancelChooser);
    }

    pub(crate) fn press_control(&mut self, control: &str) {
        if let Some(command) = self.remote.control_command(control) {
            self.dispatch(command);
        }
    }

    fn dispatch(&mut self, command: RemoteCommand) {
        self.send_to_worker(BluetoothCommand::Send(command));
    }

    fn send_to_worker(&self, command: BluetoothCommand) {
        if self.bluetooth_tx.send(command).is_err() {
            error!("Bluetooth worker is gone");
        }
    }

    /// Dispatch bound keys and remove them from this frame's input, so a
    /// focused button never also takes Enter as a click.
    fn handle_keys(&mut self, ctx: &egui::Context) {
        let remote = &self.remote;
        let commands: Vec<RemoteCommand> = ctx.input_mut(|i| {
            let mut commands = Vec::new();
            i.events.retain(|event| {
                let egui::Event::Key {
                    key,
                    pressed,
                    modifiers,
                    ..
                } = event
                else {
                    return true;
                };
                let bound = keys::key_value(*key, *modifiers)
                    .and_then(|value| remote.key_command(value));
                match bound {
                    Some(command) => {
                        if *pressed {
                            commands.push(command);
                        }
                        false
                    }
                    None => true,
                }
            });
            commands
        });

        if commands.is_empty() {
            return;
        }

        // Arrow keys already moved focus when the frame began
        ctx.memory_mut(|memory| {
            if let Some(id) = memory.focused() {
                memory.surrender_focus(id);
            }
        });

        for command in commands {
            self.dispatch(command);
        }
    }

    fn show_chooser(&mut self, ctx: &egui::Context) {
        if !self.remote.chooser_open() {
            return;
        }

        let mut picked = None;
        let mut cancelled = false;

        egui::Window::new("Choose a device")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                for device in &self.remote.candidates {
                    ui.horizontal(|ui| {
                        let strength = device
                            .signal_strength
                            .map(|rssi| format!(" ({} dBm)", rssi))
                            .unwrap_or_default();
                        ui.label(format!("{}{}", device.name, strength));
                        if ui.button("Pair").clicked() {
                            picked = Some(device.id.clone());
                        }
                    });
                }
                ui.separator();
                if ui.button("Cancel").clicked() {
                    cancelled = true;
                }
            });

        if let Some(id) = picked {
            self.choose_device(id);
        } else if cancelled {
            self.cancel_chooser();
        }
    }
}

fn spawn_bluetooth_worker(
    settings: Arc<Mutex<SettingsService>>,
    event_tx: mpsc::UnboundedSender<AppEvent>,
    bt_cmd_rx: mpsc::UnboundedReceiver<BluetoothCommand>,
) {
    let spawned = std::thread::Builder::new()
        .name("bluetooth".into())
        .spawn(move || {
            let rt = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt,
                Err(e) => {
                    error!("Failed to create tokio runtime for Bluetooth: {}", e);
                    return;
                }
            };

            rt.block_on(async move {
                let transport = PlatformTransport::new().await;
                let service = BluetoothService::new(transport, event_tx);
                service
                    .run(bt_cmd_rx, move || {
                        let settings = settings.lock().map_err(|_| {
                            TransportError::Platform("settings lock poisoned".to_string())
                        })?;
                        ConnectionConfig::from_settings(settings.get())
                    })
                    .await;
            });
        });

    if let Err(e) = spawned {
        error!("Failed to spawn Bluetooth worker: {}", e);
    }
}

impl eframe::App for RemoteApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        while let Ok(event) = self.event_rx.try_recv() {
            self.remote.apply(event);
        }

        // Worker events arrive without input, keep polling
        ctx.request_repaint_after(Duration::from_millis(100));

        if self.selected_tab == Tab::Remote {
            self.handle_keys(ctx);
        }

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.selectable_value(&mut self.selected_tab, Tab::Remote, "Remote");
                ui.selectable_value(&mut self.selected_tab, Tab::Settings, "Settings");

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let switch_icon = if self.is_dark_mode {
                        "☀ Light"
                    } else {
                        "🌙 Dark"
                    };
                    if ui.button(switch_icon).clicked() {
                        self.is_dark_mode = !self.is_dark_mode;
                        crate::presentation::theme::configure_neubrutalism(ctx, self.is_dark_mode);
                        match self.settings.lock() {
                            Ok(mut settings) => {
                                settings.get_mut().dark_mode = self.is_dark_mode;
                                if let Err(e) = settings.save() {
                                    warn!("Failed to save theme preference: {}", e);
                                }
                            }
                            Err(_) => warn!("Settings lock poisoned"),
                        }
                    }
                });
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.set_max_width(600.0);
                    ui.add_space(20.0);

                    use crate::presentation::tabs;
                    match self.selected_tab {
                        Tab::Remote => tabs::remote::render(self, ui),
                        Tab::Settings => tabs::settings::render(self, ui),
                    }

                    ui.add_space(50.0);
                });
            });
        });

        self.show_chooser(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::ScannedDevice;
    use crate::presentation::tabs;
    use eframe::egui::Key;

    fn test_app(remote: RemoteState) -> (RemoteApp, mpsc::UnboundedReceiver<BluetoothCommand>) {
        let (bluetooth_tx, bluetooth_rx) = mpsc::unbounded_channel();
        let (_event_tx, event_rx) = mpsc::unbounded_channel();
        let settings =
            SettingsService::with_path(std::env::temp_dir().join("ble_remote_ui_test.json"));
        let mut app =
            RemoteApp::from_parts(Arc::new(Mutex::new(settings)), bluetooth_tx, event_rx, false, None);
        app.remote = remote;
        (app, bluetooth_rx)
    }

    fn connected() -> RemoteState {
        let mut remote = RemoteState::new();
        remote.apply(AppEvent::Availability(true));
        remote.begin_connect();
        remote.apply(AppEvent::Connected {
            name: "RX1".into(),
        });
        remote
    }

    /// One frame of the Remote tab, in the same order `update` runs it
    fn frame(ctx: &egui::Context, app: &mut RemoteApp, pressed: &[Key]) {
        let events = pressed
            .iter()
            .map(|&key| egui::Event::Key {
                key,
                physical_key: None,
                pressed: true,
                repeat: false,
                modifiers: egui::Modifiers::NONE,
            })
            .collect();
        let input = egui::RawInput {
            screen_rect: Some(egui::Rect::from_min_size(
                egui::Pos2::ZERO,
                egui::vec2(520.0, 820.0),
            )),
            events,
            ..Default::default()
        };
        let _ = ctx.run(input, |ctx| {
            app.handle_keys(ctx);
            egui::CentralPanel::default().show(ctx, |ui| tabs::remote::render(app, ui));
        });
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<BluetoothCommand>) -> Vec<BluetoothCommand> {
        let mut commands = Vec::new();
        while let Ok(command) = rx.try_recv() {
            commands.push(command);
        }
        commands
    }

    #[test]
    fn test_enter_on_focused_connect_button_only_sends_ok() {
        let ctx = egui::Context::default();
        let (mut app, mut rx) = test_app(connected());

        frame(&ctx, &mut app, &[]);
        frame(&ctx, &mut app, &[Key::Tab]);
        frame(&ctx, &mut app, &[Key::Enter]);

        assert_eq!(drain(&mut rx), vec![BluetoothCommand::Send(RemoteCommand::Ok)]);
    }

    #[test]
    fn test_arrows_and_enter_send_one_token_each() {
        let ctx = egui::Context::default();
        let (mut app, mut rx) = test_app(connected());

        frame(&ctx, &mut app, &[]);
        frame(&ctx, &mut app, &[Key::Tab]);
        frame(&ctx, &mut app, &[Key::ArrowDown]);
        frame(&ctx, &mut app, &[Key::ArrowDown]);
        frame(&ctx, &mut app, &[Key::Enter]);

        assert_eq!(
            drain(&mut rx),
            vec![
                BluetoothCommand::Send(RemoteCommand::Down),
                BluetoothCommand::Send(RemoteCommand::Down),
                BluetoothCommand::Send(RemoteCommand::Ok),
            ]
        );
    }

    #[test]
    fn test_keyboard_click_on_remote_key_sends_once() {
        let ctx = egui::Context::default();
        let (mut app, mut rx) = test_app(connected());

        // Connect Bluetooth, then the power key
        frame(&ctx, &mut app, &[]);
        frame(&ctx, &mut app, &[Key::Tab]);
        frame(&ctx, &mut app, &[Key::Tab]);
        frame(&ctx, &mut app, &[Key::Space]);

        assert_eq!(
            drain(&mut rx),
            vec![BluetoothCommand::Send(RemoteCommand::PowerOff)]
        );
    }

    #[test]
    fn test_keys_send_nothing_while_panel_hidden() {
        let ctx = egui::Context::default();
        let mut remote = RemoteState::new();
        remote.apply(AppEvent::Availability(true));
        let (mut app, mut rx) = test_app(remote);

        frame(&ctx, &mut app, &[]);
        frame(&ctx, &mut app, &[Key::ArrowUp, Key::M, Key::V, Key::Escape]);

        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn test_control_press_sends_one_command() {
        let (mut app, mut rx) = test_app(RemoteState::new());

        app.press_control("volup");
        app.press_control("not-a-control");

        assert_eq!(
            drain(&mut rx),
            vec![BluetoothCommand::Send(RemoteCommand::VolumeUp)]
        );
    }

    #[test]
    fn test_connect_and_chooser_commands() {
        let (mut app, mut rx) = test_app(connected());

        app.connect();
        app.connect();
        assert_eq!(drain(&mut rx), vec![BluetoothCommand::RequestDevice]);

        app.remote.apply(AppEvent::DevicesFound(vec![ScannedDevice {
            id: "AA:00".into(),
            name: "RX1".into(),
            signal_strength: None,
        }]));
        assert!(app.remote.chooser_open());

        app.choose_device("AA:00".into());
        assert!(!app.remote.chooser_open());
        assert_eq!(drain(&mut rx), vec![BluetoothCommand::Connect("AA:00".into())]);
    }

    #[test]
    fn test_cancel_chooser_notifies_worker() {
        let (mut app, mut rx) = test_app(RemoteState::new());
        app.connect();
        drain(&mut rx);

        app.cancel_chooser();
        assert_eq!(drain(&mut rx), vec![BluetoothCommand::CancelChooser]);
    }
}
