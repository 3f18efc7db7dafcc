//! btleplug Transport
//!
//! Bluetooth LE through btleplug (BlueZ on Linux, CoreBluetooth on macOS).

use crate::domain::errors::TransportError;
use crate::domain::models::AppEvent;
use crate::infrastructure::bluetooth::{BleTransport, CommandCharacteristic, RemoteDevice};
use btleplug::api::{
    Central, CentralEvent, CentralState, CharPropFlags, Characteristic, Manager as _,
    Peripheral as _, ScanFilter, WriteType,
};
use btleplug::platform::{Adapter, Manager, Peripheral};
use futures::StreamExt;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

impl From<btleplug::Error> for TransportError {
    fn from(e: btleplug::Error) -> Self {
        match e {
            btleplug::Error::NotConnected => TransportError::ConnectionFailed(e.to_string()),
            btleplug::Error::DeviceNotFound => TransportError::DeviceNotFound(e.to_string()),
            _ => TransportError::Platform(e.to_string()),
        }
    }
}

pub struct BtleTransport {
    adapter: Option<Adapter>,
}

impl BtleTransport {
    /// Bind to the first adapter. A host without one yields an unsupported transport.
    pub async fn new() -> Self {
        let adapter = match Self::first_adapter().await {
            Ok(adapter) => adapter,
            Err(e) => {
                warn!("Bluetooth manager unavailable: {}", e);
                None
            }
        };

        if adapter.is_none() {
            info!("No Bluetooth adapter found");
        }
        Self { adapter }
    }

    async fn first_adapter() -> Result<Option<Adapter>, btleplug::Error> {
        let manager = Manager::new().await?;
        Ok(manager.adapters().await?.into_iter().next())
    }

    fn adapter(&self) -> Result<&Adapter, TransportError> {
        self.adapter.as_ref().ok_or(TransportError::Unsupported)
    }
}

impl BleTransport for BtleTransport {
    type Device = BtleDevice;

    fn is_supported(&self) -> bool {
        self.adapter.is_some()
    }

    async fn availability(&self) -> Result<bool, TransportError> {
        let state = self.adapter()?.adapter_state().await?;
        Ok(state == CentralState::PoweredOn)
    }

    fn watch_availability(
        &self,
        events: mpsc::UnboundedSender<AppEvent>,
    ) -> Result<(), TransportError> {
        let adapter = self.adapter()?.clone();

        tokio::spawn(async move {
            let mut stream = match adapter.events().await {
                Ok(stream) => stream,
                Err(e) => {
                    warn!("Could not subscribe to adapter events: {}", e);
                    return;
                }
            };

            while let Some(event) = stream.next().await {
                if let CentralEvent::StateUpdate(state) = event {
                    let powered = state == CentralState::PoweredOn;
                    info!("Adapter state changed: {:?}", state);
                    if events.send(AppEvent::AvailabilityChanged(powered)).is_err() {
                        break;
                    }
                }
            }
        });

        Ok(())
    }

    async fn scan(&self, service: Uuid, timeout: Duration) -> Result<Vec<BtleDevice>, TransportError> {
        let adapter = self.adapter()?;

        adapter
            .start_scan(ScanFilter {
                services: vec![service],
            })
            .await?;
        tokio::time::sleep(timeout).await;
        if let Err(e) = adapter.stop_scan().await {
            warn!("Failed to stop scan: {}", e);
        }

        let mut devices = Vec::new();
        for peripheral in adapter.peripherals().await? {
            let Some(props) = peripheral.properties().await? else {
                continue;
            };

            // Some backends ignore the scan filter
            if !props.services.contains(&service) {
                continue;
            }

            let name = props
                .local_name
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| "Unknown".to_string());
            debug!("Found {} ({:?} dBm)", name, props.rssi);

            devices.push(BtleDevice {
                id: format!("{:?}", peripheral.id()),
                name,
                rssi: props.rssi,
                peripheral,
            });
        }

        Ok(devices)
    }
}

pub struct BtleDevice {
    id: String,
    name: String,
    rssi: Option<i16>,
    peripheral: Peripheral,
}

impl RemoteDevice for BtleDevice {
    type Characteristic = BtleCharacteristic;

    fn id(&self) -> String {
        self.id.clone()
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    fn signal_strength(&self) -> Option<i16> {
        self.rssi
    }

    async fn open(
        &self,
        service: Uuid,
        characteristic: Uuid,
    ) -> Result<BtleCharacteristic, TransportError> {
        if !self.peripheral.is_connected().await.unwrap_or(false) {
            self.peripheral
                .connect()
                .await
                .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;
        }
        self.peripheral.discover_services().await?;

        let gatt_service = self
            .peripheral
            .services()
            .into_iter()
            .find(|s| s.uuid == service)
            .ok_or(TransportError::ServiceNotFound(service))?;

        let characteristic = gatt_service
            .characteristics
            .into_iter()
            .find(|c| c.uuid == characteristic)
            .ok_or(TransportError::CharacteristicNotFound(characteristic))?;

        let write_type = if characteristic.properties.contains(CharPropFlags::WRITE) {
            WriteType::WithResponse
        } else {
            WriteType::WithoutResponse
        };

        Ok(BtleCharacteristic {
            peripheral: self.peripheral.clone(),
            characteristic,
            write_type,
        })
    }
}

pub struct BtleCharacteristic {
    peripheral: Peripheral,
    characteristic: Characteristic,
    write_type: WriteType,
}

impl CommandCharacteristic for BtleCharacteristic {
    async fn write(&self, payload: &[u8]) -> Result<(), TransportError> {
        self.peripheral
            .write(&self.characteristic, payload, self.write_type)
            .await
            .map_err(|e| TransportError::WriteFailed(e.to_string()))
    }
}
