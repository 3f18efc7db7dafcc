use crate::domain::commands::RemoteCommand;
use crate::domain::errors::RemoteError;

/// Events flowing from the Bluetooth worker to the UI
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// Result of an explicit availability query
    Availability(bool),
    /// Platform notification that the radio was switched on or off
    AvailabilityChanged(bool),
    /// Chooser candidates matching the service filter
    DevicesFound(Vec<ScannedDevice>),
    Connected { name: String },
    Error(RemoteError),
    LogMessage(StatusMessage),
}

/// Requests flowing from the UI to the Bluetooth worker
#[derive(Debug, Clone, PartialEq)]
pub enum BluetoothCommand {
    CheckAvailability,
    RequestDevice,
    Connect(String),
    CancelChooser,
    Send(RemoteCommand),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScannedDevice {
    pub id: String,
    pub name: String,
    pub signal_strength: Option<i16>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Disconnected,
    Connecting,
    Connected,
    /// The radio is off or missing. Any open link is unusable until the
    /// user connects again.
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub message: String,
    pub severity: MessageSeverity,
}

impl StatusMessage {
    pub fn new(message: impl Into<String>, severity: MessageSeverity) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageSeverity {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Remote,
    Settings,
}
