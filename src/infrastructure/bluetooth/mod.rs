//! Bluetooth Module
//!
//! Provides the BLE link to the remote's receiver.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                    BluetoothService                      │
//! │  (owns the single Session, runs the worker command loop) │
//! └─────────────────────┬───────────────────────────────────┘
//!                       │ BleTransport
//!         ┌─────────────┼─────────────┐
//!         │             │             │
//!         ▼             ▼             ▼
//! ┌───────────┐  ┌────────────┐  ┌──────────┐
//! │  WinRT    │  │  btleplug  │  │   Mock   │
//! │ (Windows) │  │  (others)  │  │ (tests)  │
//! └───────────┘  └────────────┘  └──────────┘
//! ```
//!
//! ## Modules
//!
//! - [`service`] - Availability, session establishment and command dispatch
//! - `winrt` - Windows Runtime transport
//! - `btle` - btleplug transport for Linux and macOS

#![allow(async_fn_in_trait)]

#[cfg(not(windows))]
pub mod btle;
#[cfg(test)]
pub mod mock;
pub mod service;
#[cfg(windows)]
pub mod winrt;

use crate::domain::errors::TransportError;
use crate::domain::models::{AppEvent, ScannedDevice};
use std::time::Duration;
use tokio::sync::mpsc;
use uuid::Uuid;

pub use service::{BluetoothService, ConnectionConfig};

#[cfg(not(windows))]
pub use btle::BtleTransport as PlatformTransport;
#[cfg(windows)]
pub use winrt::WinRtTransport as PlatformTransport;

/// The host's Bluetooth LE capability
pub trait BleTransport {
    type Device: RemoteDevice;

    /// Whether the host exposes a BLE stack at all
    fn is_supported(&self) -> bool;

    /// Whether the radio is currently powered on
    async fn availability(&self) -> Result<bool, TransportError>;

    /// Register for radio on/off notifications, delivered as
    /// [`AppEvent::AvailabilityChanged`]
    fn watch_availability(
        &self,
        events: mpsc::UnboundedSender<AppEvent>,
    ) -> Result<(), TransportError>;

    /// Listen for advertisements carrying `service` for `timeout`
    async fn scan(
        &self,
        service: Uuid,
        timeout: Duration,
    ) -> Result<Vec<Self::Device>, TransportError>;
}

/// A peer found by [`BleTransport::scan`]
pub trait RemoteDevice {
    type Characteristic: CommandCharacteristic;

    fn id(&self) -> String;

    fn name(&self) -> String;

    fn signal_strength(&self) -> Option<i16>;

    /// Connect, then resolve `characteristic` inside the primary `service`
    async fn open(
        &self,
        service: Uuid,
        characteristic: Uuid,
    ) -> Result<Self::Characteristic, TransportError>;

    fn describe(&self) -> ScannedDevice {
        ScannedDevice {
            id: self.id(),
            name: self.name(),
            signal_strength: self.signal_strength(),
        }
    }
}

/// The writable endpoint commands are sent to
pub trait CommandCharacteristic {
    async fn write(&self, payload: &[u8]) -> Result<(), TransportError>;
}
