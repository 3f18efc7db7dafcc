use uuid::Uuid;

/// Failures raised by a Bluetooth transport implementation.
///
/// Platform errors are flattened to their message so events stay `Clone`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("Bluetooth is not supported on this system")]
    Unsupported,

    #[error("No device advertising service {0} was found")]
    NoDeviceFound(Uuid),

    #[error("User cancelled the requested device chooser.")]
    ChooserCancelled,

    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Service {0} not found on device")]
    ServiceNotFound(Uuid),

    #[error("Characteristic {0} not found in service")]
    CharacteristicNotFound(Uuid),

    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Invalid UUID '{0}'")]
    InvalidUuid(String),

    #[error("Platform error: {0}")]
    Platform(String),
}

/// The user-facing error kinds. `Display` is the status line text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    #[error("To use this, bluetooth is needed")]
    CapabilityUnavailable,

    #[error("Connection failed: {0}")]
    ConnectionFailed(#[source] TransportError),

    #[error("Send failed: {0}")]
    SendFailed(#[source] TransportError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_text() {
        let err = RemoteError::ConnectionFailed(TransportError::ChooserCancelled);
        assert_eq!(
            err.to_string(),
            "Connection failed: User cancelled the requested device chooser."
        );

        let err = RemoteError::SendFailed(TransportError::WriteFailed("unreachable".into()));
        assert_eq!(err.to_string(), "Send failed: Write failed: unreachable");
    }
}
