//! Remote Panel State
//!
//! UI-side view of the remote: the status line, whether the control panel is
//! shown, and the chooser candidates. Driven entirely by [`AppEvent`]s from
//! the Bluetooth worker.

use crate::domain::commands::{self, RemoteCommand};
use crate::domain::errors::RemoteError;
use crate::domain::models::{
    AppEvent, ConnectionStatus, MessageSeverity, ScannedDevice, StatusMessage,
};

pub const READY_MESSAGE: &str = "Bluetooth available. Click \"Connect Bluetooth\" to begin.";

#[derive(Debug, Clone)]
pub struct RemoteState {
    pub status: StatusMessage,
    pub connection_status: ConnectionStatus,
    pub available: bool,
    pub candidates: Vec<ScannedDevice>,
    panel_visible: bool,
}

impl Default for RemoteState {
    fn default() -> Self {
        Self {
            status: StatusMessage::new("Checking Bluetooth...", MessageSeverity::Info),
            connection_status: ConnectionStatus::Disconnected,
            available: false,
            candidates: Vec::new(),
            panel_visible: false,
        }
    }
}

impl RemoteState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn panel_visible(&self) -> bool {
        self.panel_visible
    }

    /// Whether the device chooser should be on screen
    pub fn chooser_open(&self) -> bool {
        self.connection_status == ConnectionStatus::Connecting && !self.candidates.is_empty()
    }

    /// Start a connection attempt.
    ///
    /// Returns `false` when an attempt is already in flight, in which case the
    /// caller must not issue another request.
    pub fn begin_connect(&mut self) -> bool {
        if self.connection_status == ConnectionStatus::Connecting {
            return false;
        }
        self.connection_status = ConnectionStatus::Connecting;
        self.candidates.clear();
        self.status = StatusMessage::new("Scanning for devices...", MessageSeverity::Info);
        true
    }

    /// Drop the chooser candidates once the user picked or dismissed one
    pub fn close_chooser(&mut self) {
        self.candidates.clear();
    }

    /// Command for an on-screen control. Not gated on panel visibility.
    pub fn control_command(&self, control: &str) -> Option<RemoteCommand> {
        commands::command_for_control(control)
    }

    /// Command for a key press; inert while the panel is hidden
    pub fn key_command(&self, key: &str) -> Option<RemoteCommand> {
        if !self.panel_visible {
            return None;
        }
        commands::command_for_key(key)
    }

    pub fn apply(&mut self, event: AppEvent) {
        match event {
            AppEvent::Availability(true) | AppEvent::AvailabilityChanged(true) => {
                self.available = true;
                match self.connection_status {
                    // An attempt or a session owns the status line
                    ConnectionStatus::Connecting | ConnectionStatus::Connected => {}
                    ConnectionStatus::Disconnected | ConnectionStatus::Unavailable => {
                        self.connection_status = ConnectionStatus::Disconnected;
                        self.status = StatusMessage::new(READY_MESSAGE, MessageSeverity::Info);
                    }
                }
            }
            AppEvent::Availability(false) | AppEvent::AvailabilityChanged(false) => {
                self.available = false;
                self.show_capability_needed();
            }
            AppEvent::DevicesFound(devices) => {
                self.status = StatusMessage::new(
                    format!("Found {} device(s). Pick one to connect.", devices.len()),
                    MessageSeverity::Info,
                );
                self.candidates = devices;
            }
            AppEvent::Connected { name } => {
                self.connection_status = ConnectionStatus::Connected;
                self.candidates.clear();
                self.panel_visible = true;
                self.status =
                    StatusMessage::new(format!("Connected to {}", name), MessageSeverity::Success);
            }
            AppEvent::Error(err @ RemoteError::ConnectionFailed(_)) => {
                self.connection_status = ConnectionStatus::Disconnected;
                self.candidates.clear();
                self.panel_visible = false;
                self.status = StatusMessage::new(err.to_string(), MessageSeverity::Error);
            }
            AppEvent::Error(RemoteError::CapabilityUnavailable) => {
                self.show_capability_needed();
            }
            AppEvent::Error(err @ RemoteError::SendFailed(_)) => {
                self.status = StatusMessage::new(err.to_string(), MessageSeverity::Error);
            }
            AppEvent::LogMessage(msg) => {
                self.status = msg;
            }
        }
    }

    fn show_capability_needed(&mut self) {
        self.panel_visible = false;
        self.candidates.clear();
        self.connection_status = ConnectionStatus::Unavailable;
        self.status = StatusMessage::new(
            RemoteError::CapabilityUnavailable.to_string(),
            MessageSeverity::Warning,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::TransportError;

    fn connected(name: &str) -> RemoteState {
        let mut state = RemoteState::new();
        state.apply(AppEvent::Availability(true));
        assert!(state.begin_connect());
        state.apply(AppEvent::Connected {
            name: name.to_string(),
        });
        state
    }

    #[test]
    fn test_connected_shows_panel() {
        let state = connected("RX1");
        assert_eq!(state.status.message, "Connected to RX1");
        assert!(state.panel_visible());
        assert_eq!(state.connection_status, ConnectionStatus::Connected);
    }

    #[test]
    fn test_keys_inert_while_panel_hidden() {
        let state = RemoteState::new();
        assert_eq!(state.key_command("ArrowUp"), None);
        // Clicks are not gated
        assert_eq!(state.control_command("up"), Some(RemoteCommand::Up));

        let state = connected("RX1");
        assert_eq!(state.key_command("ArrowUp"), Some(RemoteCommand::Up));
        assert_eq!(state.key_command("m"), Some(RemoteCommand::Menu));
        assert_eq!(state.key_command("Tab"), None);
    }

    #[test]
    fn test_unavailable_on_load() {
        let mut state = RemoteState::new();
        state.apply(AppEvent::Availability(false));
        assert!(!state.panel_visible());
        assert!(!state.available);
        assert_eq!(state.status.message, "To use this, bluetooth is needed");
    }

    #[test]
    fn test_radio_off_hides_panel_when_connected() {
        let mut state = connected("RX1");
        state.apply(AppEvent::AvailabilityChanged(false));
        assert!(!state.panel_visible());
        assert_eq!(state.connection_status, ConnectionStatus::Unavailable);
        assert_eq!(state.status.message, "To use this, bluetooth is needed");
        assert_eq!(state.key_command("ArrowUp"), None);

        state.apply(AppEvent::AvailabilityChanged(true));
        assert_eq!(state.status.message, READY_MESSAGE);
        assert_eq!(state.connection_status, ConnectionStatus::Disconnected);
        assert!(!state.panel_visible());
    }

    #[test]
    fn test_reentrant_connect_ignored() {
        let mut state = RemoteState::new();
        assert!(state.begin_connect());
        assert!(!state.begin_connect());

        state.apply(AppEvent::Error(RemoteError::ConnectionFailed(
            TransportError::ChooserCancelled,
        )));
        assert_eq!(state.connection_status, ConnectionStatus::Disconnected);
        assert!(state.begin_connect());
    }

    #[test]
    fn test_connection_failure_hides_panel() {
        let mut state = connected("RX1");
        assert!(state.begin_connect());
        state.apply(AppEvent::Error(RemoteError::ConnectionFailed(
            TransportError::ServiceNotFound(uuid::Uuid::nil()),
        )));
        assert!(!state.panel_visible());
        assert!(state.status.message.starts_with("Connection failed: "));
        assert_eq!(state.status.severity, MessageSeverity::Error);
    }

    #[test]
    fn test_send_failure_keeps_panel() {
        let mut state = connected("RX1");
        state.apply(AppEvent::Error(RemoteError::SendFailed(
            TransportError::WriteFailed("GATT operation failed".into()),
        )));
        assert!(state.panel_visible());
        assert_eq!(state.connection_status, ConnectionStatus::Connected);
        assert_eq!(
            state.status.message,
            "Send failed: Write failed: GATT operation failed"
        );
    }

    #[test]
    fn test_chooser_lifecycle() {
        let mut state = RemoteState::new();
        state.begin_connect();
        assert!(!state.chooser_open());

        state.apply(AppEvent::DevicesFound(vec![ScannedDevice {
            id: "AA:BB".into(),
            name: "RX1".into(),
            signal_strength: Some(-60),
        }]));
        assert!(state.chooser_open());

        state.close_chooser();
        assert!(!state.chooser_open());
        assert_eq!(state.connection_status, ConnectionStatus::Connecting);
    }

    #[test]
    fn test_availability_lost_aborts_attempt() {
        let mut state = RemoteState::new();
        state.begin_connect();
        state.apply(AppEvent::Availability(false));
        assert_eq!(state.connection_status, ConnectionStatus::Unavailable);
        assert!(state.begin_connect());
    }

    #[test]
    fn test_positive_check_replaces_checking_message() {
        let mut state = RemoteState::new();
        state.apply(AppEvent::Availability(true));
        assert_eq!(state.status.message, READY_MESSAGE);
        assert_eq!(state.connection_status, ConnectionStatus::Disconnected);

        // A check made on behalf of a connect attempt keeps the attempt's text
        assert!(state.begin_connect());
        state.apply(AppEvent::Availability(true));
        assert_eq!(state.status.message, "Scanning for devices...");

        let mut state = connected("RX1");
        state.apply(AppEvent::Availability(true));
        assert_eq!(state.status.message, "Connected to RX1");
    }

    #[test]
    fn test_check_again_recovers_from_unavailable() {
        let mut state = RemoteState::new();
        state.apply(AppEvent::Availability(false));
        assert_eq!(state.connection_status, ConnectionStatus::Unavailable);

        state.apply(AppEvent::Availability(true));
        assert!(state.available);
        assert_eq!(state.connection_status, ConnectionStatus::Disconnected);
        assert_eq!(state.status.message, READY_MESSAGE);
    }
}
