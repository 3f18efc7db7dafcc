//! Bluetooth Service Module
//!
//! Owns the single remote session and turns [`BluetoothCommand`]s from the UI
//! into transport calls, reporting every outcome back as an [`AppEvent`].

use crate::domain::commands::RemoteCommand;
use crate::domain::errors::{RemoteError, TransportError};
use crate::domain::models::{AppEvent, BluetoothCommand, MessageSeverity, StatusMessage};
use crate::domain::settings::Settings;
use crate::infrastructure::bluetooth::{BleTransport, CommandCharacteristic, RemoteDevice};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Identifiers and scan window used for one connection attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub service_uuid: Uuid,
    pub characteristic_uuid: Uuid,
    pub scan_timeout: Duration,
}

impl ConnectionConfig {
    pub fn from_settings(settings: &Settings) -> Result<Self, TransportError> {
        Ok(Self {
            service_uuid: parse_uuid(&settings.service_uuid)?,
            characteristic_uuid: parse_uuid(&settings.characteristic_uuid)?,
            scan_timeout: Duration::from_millis(settings.scan_timeout_ms),
        })
    }
}

fn parse_uuid(value: &str) -> Result<Uuid, TransportError> {
    Uuid::parse_str(value.trim()).map_err(|_| TransportError::InvalidUuid(value.to_string()))
}

/// An open link to one peer
pub struct Session<C> {
    pub peer_name: String,
    characteristic: C,
}

/// Coordinates availability, session establishment and command dispatch
pub struct BluetoothService<T: BleTransport> {
    transport: T,
    event_sender: mpsc::UnboundedSender<AppEvent>,
    candidates: Vec<T::Device>,
    session: Option<Session<<T::Device as RemoteDevice>::Characteristic>>,
}

impl<T: BleTransport> BluetoothService<T> {
    pub fn new(transport: T, event_sender: mpsc::UnboundedSender<AppEvent>) -> Self {
        Self {
            transport,
            event_sender,
            candidates: Vec::new(),
            session: None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    /// Subscribe to radio state changes. Skipped when the host has no BLE stack.
    pub fn watch_availability(&self) {
        if !self.transport.is_supported() {
            return;
        }
        if let Err(e) = self.transport.watch_availability(self.event_sender.clone()) {
            warn!("Could not watch Bluetooth availability: {}", e);
        }
    }

    /// Query whether Bluetooth can be used right now and report it to the UI
    pub async fn check_availability(&self) -> bool {
        let available = if !self.transport.is_supported() {
            info!("No Bluetooth LE support on this host");
            false
        } else {
            match self.transport.availability().await {
                Ok(available) => available,
                Err(e) => {
                    warn!("Availability query failed: {}", e);
                    false
                }
            }
        };

        debug!("Bluetooth available: {}", available);
        self.emit(AppEvent::Availability(available));
        available
    }

    /// Scan for peers advertising the configured service and hand them to the chooser
    pub async fn request_device(&mut self, config: Result<ConnectionConfig, TransportError>) {
        self.candidates.clear();

        if !self.check_availability().await {
            return;
        }

        let config = match config {
            Ok(config) => config,
            Err(e) => return self.fail_connection(e),
        };

        info!(
            "Scanning for devices with service {} ({:?})",
            config.service_uuid, config.scan_timeout
        );
        let devices = match self
            .transport
            .scan(config.service_uuid, config.scan_timeout)
            .await
        {
            Ok(devices) => devices,
            Err(e) => return self.fail_connection(e),
        };

        if devices.is_empty() {
            return self.fail_connection(TransportError::NoDeviceFound(config.service_uuid));
        }

        info!("Found {} candidate device(s)", devices.len());
        let found = devices.iter().map(|d| d.describe()).collect();
        self.candidates = devices;
        self.emit(AppEvent::DevicesFound(found));
    }

    /// Open a session to the chooser candidate `id`
    pub async fn connect(&mut self, id: &str, config: Result<ConnectionConfig, TransportError>) {
        let candidates = std::mem::take(&mut self.candidates);
        let Some(device) = candidates.into_iter().find(|d| d.id() == id) else {
            return self.fail_connection(TransportError::DeviceNotFound(id.to_string()));
        };

        let config = match config {
            Ok(config) => config,
            Err(e) => return self.fail_connection(e),
        };

        let name = device.name();
        info!("Connecting to {} ({})", name, id);
        self.emit(AppEvent::LogMessage(StatusMessage::new(
            format!("Connecting to {}...", name),
            MessageSeverity::Info,
        )));

        match device
            .open(config.service_uuid, config.characteristic_uuid)
            .await
        {
            Ok(characteristic) => {
                info!("Session established with {}", name);
                self.session = Some(Session {
                    peer_name: name.clone(),
                    characteristic,
                });
                self.emit(AppEvent::Connected { name });
            }
            Err(e) => self.fail_connection(e),
        }
    }

    /// The user dismissed the chooser
    pub fn cancel_chooser(&mut self) {
        self.candidates.clear();
        self.fail_connection(TransportError::ChooserCancelled);
    }

    /// Write one command token. Silently does nothing without a session.
    pub async fn send(&self, command: RemoteCommand) {
        let Some(session) = &self.session else {
            debug!("No session, dropping {}", command);
            return;
        };

        match session.characteristic.write(command.as_bytes()).await {
            Ok(()) => debug!("Sent {} to {}", command, session.peer_name),
            Err(e) => {
                error!("Failed to send {}: {}", command, e);
                self.emit(AppEvent::Error(RemoteError::SendFailed(e)));
            }
        }
    }

    /// Worker loop. `config` is read at each connection step so settings edits
    /// take effect on the next attempt.
    pub async fn run<F>(mut self, mut commands: mpsc::UnboundedReceiver<BluetoothCommand>, config: F)
    where
        F: Fn() -> Result<ConnectionConfig, TransportError>,
    {
        self.watch_availability();
        self.check_availability().await;

        while let Some(cmd) = commands.recv().await {
            match cmd {
                BluetoothCommand::CheckAvailability => {
                    self.check_availability().await;
                }
                BluetoothCommand::RequestDevice => self.request_device(config()).await,
                BluetoothCommand::Connect(id) => self.connect(&id, config()).await,
                BluetoothCommand::CancelChooser => self.cancel_chooser(),
                BluetoothCommand::Send(command) => self.send(command).await,
            }
        }

        info!(
            "Bluetooth command channel closed, worker exiting (connected: {})",
            self.is_connected()
        );
    }

    fn fail_connection(&mut self, cause: TransportError) {
        error!("Connection failed: {}", cause);
        self.session = None;
        self.emit(AppEvent::Error(RemoteError::ConnectionFailed(cause)));
    }

    fn emit(&self, event: AppEvent) {
        let _ = self.event_sender.send(event);
    }
}
