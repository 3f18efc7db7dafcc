//! Windows Runtime Transport
//!
//! Radio state, advertisement scanning and GATT writes through WinRT.

use crate::domain::errors::TransportError;
use crate::domain::models::AppEvent;
use crate::infrastructure::bluetooth::{BleTransport, CommandCharacteristic, RemoteDevice};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;
use windows::core::{IInspectable, GUID};
use windows::Devices::Bluetooth::Advertisement::{
    BluetoothLEAdvertisementReceivedEventArgs, BluetoothLEAdvertisementWatcher,
    BluetoothLEScanningMode,
};
use windows::Devices::Bluetooth::GenericAttributeProfile::{
    GattCharacteristic, GattCharacteristicProperties, GattCommunicationStatus, GattSession,
    GattWriteOption,
};
use windows::Devices::Bluetooth::{BluetoothAdapter, BluetoothLEDevice};
use windows::Devices::Radios::{Radio, RadioState};
use windows::Foundation::TypedEventHandler;
use windows::Storage::Streams::DataWriter;

impl From<windows::core::Error> for TransportError {
    fn from(e: windows::core::Error) -> Self {
        TransportError::Platform(e.to_string())
    }
}

fn guid(uuid: Uuid) -> GUID {
    GUID::from_u128(uuid.as_u128())
}

pub struct WinRtTransport {
    radio: Option<Radio>,
}

impl WinRtTransport {
    /// Bind to the default adapter's radio. No LE-capable adapter means unsupported.
    pub async fn new() -> Self {
        let radio = match Self::default_radio().await {
            Ok(radio) => radio,
            Err(e) => {
                warn!("No usable Bluetooth adapter: {}", e);
                None
            }
        };
        Self { radio }
    }

    async fn default_radio() -> windows::core::Result<Option<Radio>> {
        let adapter = BluetoothAdapter::GetDefaultAsync()?.await?;
        if !adapter.IsLowEnergySupported()? {
            info!("Default Bluetooth adapter has no LE support");
            return Ok(None);
        }
        let radio = adapter.GetRadioAsync()?.await?;
        Ok(Some(radio))
    }

    fn radio(&self) -> Result<&Radio, TransportError> {
        self.radio.as_ref().ok_or(TransportError::Unsupported)
    }
}

impl BleTransport for WinRtTransport {
    type Device = WinRtDevice;

    fn is_supported(&self) -> bool {
        self.radio.is_some()
    }

    async fn availability(&self) -> Result<bool, TransportError> {
        Ok(self.radio()?.State()? == RadioState::On)
    }

    fn watch_availability(
        &self,
        events: mpsc::UnboundedSender<AppEvent>,
    ) -> Result<(), TransportError> {
        let handler = TypedEventHandler::new(
            move |radio: windows::core::Ref<Radio>, _: windows::core::Ref<IInspectable>| {
                if let Some(radio) = radio.as_ref() {
                    let state = radio.State()?;
                    info!("Bluetooth radio state changed: {:?}", state);
                    let _ = events.send(AppEvent::AvailabilityChanged(state == RadioState::On));
                }
                Ok(())
            },
        );
        self.radio()?.StateChanged(&handler)?;
        Ok(())
    }

    async fn scan(&self, service: Uuid, timeout: Duration) -> Result<Vec<WinRtDevice>, TransportError> {
        let target = guid(service);
        let found: Arc<Mutex<HashMap<u64, WinRtDevice>>> = Arc::default();

        let watcher = BluetoothLEAdvertisementWatcher::new()?;
        watcher.SetScanningMode(BluetoothLEScanningMode::Active)?;

        let sink = found.clone();
        let handler = TypedEventHandler::new(
            move |_: windows::core::Ref<BluetoothLEAdvertisementWatcher>,
                  args: windows::core::Ref<BluetoothLEAdvertisementReceivedEventArgs>| {
                if let Some(args) = args.as_ref() {
                    let adv = args.Advertisement()?;
                    let address = args.BluetoothAddress()?;
                    let rssi = args.RawSignalStrengthInDBm()?;
                    let name = adv.LocalName()?.to_string();

                    let Ok(mut found) = sink.lock() else {
                        return Ok(());
                    };

                    // Names often arrive in the scan response, after the service list
                    if let Some(existing) = found.get_mut(&address) {
                        existing.rssi = rssi;
                        if !name.is_empty() {
                            existing.name = name;
                        }
                        return Ok(());
                    }

                    let service_uuids = adv.ServiceUuids()?;
                    let mut advertises = false;
                    for i in 0..service_uuids.Size()? {
                        if service_uuids.GetAt(i)? == target {
                            advertises = true;
                            break;
                        }
                    }

                    if advertises {
                        debug!("Found {:#X} ({} dBm)", address, rssi);
                        found.insert(
                            address,
                            WinRtDevice {
                                address,
                                name: if name.is_empty() {
                                    "Unknown".to_string()
                                } else {
                                    name
                                },
                                rssi,
                            },
                        );
                    }
                }
                Ok(())
            },
        );

        watcher.Received(&handler)?;
        watcher.Start()?;
        tokio::time::sleep(timeout).await;
        watcher.Stop()?;

        let devices = match found.lock() {
            Ok(mut found) => found.drain().map(|(_, d)| d).collect(),
            Err(_) => Vec::new(),
        };
        Ok(devices)
    }
}

pub struct WinRtDevice {
    address: u64,
    name: String,
    rssi: i16,
}

impl WinRtDevice {
    /// Keep the link up between writes
    async fn maintain_connection(device: &BluetoothLEDevice) -> windows::core::Result<GattSession> {
        let device_id = device.BluetoothDeviceId()?;
        let session = GattSession::FromDeviceIdAsync(&device_id)?.await?;
        session.SetMaintainConnection(true)?;
        Ok(session)
    }
}

impl RemoteDevice for WinRtDevice {
    type Characteristic = WinRtCharacteristic;

    fn id(&self) -> String {
        format!("{:012X}", self.address)
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    fn signal_strength(&self) -> Option<i16> {
        Some(self.rssi)
    }

    async fn open(
        &self,
        service: Uuid,
        characteristic: Uuid,
    ) -> Result<WinRtCharacteristic, TransportError> {
        let device = BluetoothLEDevice::FromBluetoothAddressAsync(self.address)?
            .await
            .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;

        let gatt_session = match Self::maintain_connection(&device).await {
            Ok(session) => Some(session),
            Err(e) => {
                warn!("Failed to create GattSession, continuing anyway: {}", e);
                None
            }
        };

        let services_result = device.GetGattServicesForUuidAsync(guid(service))?.await?;
        let status = services_result.Status()?;
        if status != GattCommunicationStatus::Success {
            return Err(TransportError::ConnectionFailed(format!(
                "GATT service query returned {:?}",
                status
            )));
        }
        let services = services_result.Services()?;
        if services.Size()? == 0 {
            return Err(TransportError::ServiceNotFound(service));
        }
        let gatt_service = services.GetAt(0)?;

        let chars_result = gatt_service
            .GetCharacteristicsForUuidAsync(guid(characteristic))?
            .await?;
        let status = chars_result.Status()?;
        if status != GattCommunicationStatus::Success {
            return Err(TransportError::ConnectionFailed(format!(
                "GATT characteristic query returned {:?}",
                status
            )));
        }
        let characteristics = chars_result.Characteristics()?;
        if characteristics.Size()? == 0 {
            return Err(TransportError::CharacteristicNotFound(characteristic));
        }
        let gatt_char = characteristics.GetAt(0)?;

        let properties = gatt_char.CharacteristicProperties()?;
        let write_option = if properties.0 & GattCharacteristicProperties::Write.0 != 0 {
            GattWriteOption::WriteWithResponse
        } else {
            GattWriteOption::WriteWithoutResponse
        };

        Ok(WinRtCharacteristic {
            _device: device,
            _session: gatt_session,
            characteristic: gatt_char,
            write_option,
        })
    }
}

pub struct WinRtCharacteristic {
    // Dropping these lets Windows tear the link down
    _device: BluetoothLEDevice,
    _session: Option<GattSession>,
    characteristic: GattCharacteristic,
    write_option: GattWriteOption,
}

impl CommandCharacteristic for WinRtCharacteristic {
    async fn write(&self, payload: &[u8]) -> Result<(), TransportError> {
        let writer = DataWriter::new()?;
        writer.WriteBytes(payload)?;
        let buffer = writer.DetachBuffer()?;

        let status = self
            .characteristic
            .WriteValueWithOptionAsync(&buffer, self.write_option)?
            .await
            .map_err(|e| TransportError::WriteFailed(e.to_string()))?;

        if status != GattCommunicationStatus::Success {
            return Err(TransportError::WriteFailed(format!("{:?}", status)));
        }
        Ok(())
    }
}
