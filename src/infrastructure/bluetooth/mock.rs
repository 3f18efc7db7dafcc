//! In-memory transport used by the service tests.

use crate::domain::errors::TransportError;
use crate::domain::models::AppEvent;
use crate::infrastructure::bluetooth::{BleTransport, CommandCharacteristic, RemoteDevice};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use uuid::Uuid;

type Shared<T> = Arc<Mutex<T>>;

/// Radio switch shared between a test and its transport
#[derive(Clone)]
pub struct MockRadio {
    available: Shared<bool>,
    watcher: Shared<Option<mpsc::UnboundedSender<AppEvent>>>,
}

impl MockRadio {
    /// Flip the radio and notify the subscriber, if any, as the platform would
    pub fn set(&self, available: bool) {
        *self.available.lock().unwrap() = available;
        if let Some(events) = self.watcher.lock().unwrap().as_ref() {
            let _ = events.send(AppEvent::AvailabilityChanged(available));
        }
    }

    pub fn is_watched(&self) -> bool {
        self.watcher.lock().unwrap().is_some()
    }
}

pub struct MockTransport {
    supported: bool,
    radio: MockRadio,
    devices: Vec<MockDevice>,
    writes: Shared<Vec<Vec<u8>>>,
    write_failure: Shared<Option<TransportError>>,
    scans: Shared<usize>,
}

impl MockTransport {
    pub fn with_devices(devices: Vec<MockDevice>) -> Self {
        Self {
            supported: true,
            radio: MockRadio {
                available: Arc::new(Mutex::new(true)),
                watcher: Arc::default(),
            },
            devices,
            writes: Arc::default(),
            write_failure: Arc::default(),
            scans: Arc::default(),
        }
    }

    pub fn unsupported() -> Self {
        Self {
            supported: false,
            ..Self::with_devices(Vec::new())
        }
    }

    pub fn radio(&self) -> MockRadio {
        self.radio.clone()
    }

    /// Payloads of every successful write, across all sessions
    pub fn writes(&self) -> Shared<Vec<Vec<u8>>> {
        self.writes.clone()
    }

    /// When set, writes fail with this error
    pub fn write_failure(&self) -> Shared<Option<TransportError>> {
        self.write_failure.clone()
    }

    pub fn scan_count(&self) -> Shared<usize> {
        self.scans.clone()
    }
}

impl BleTransport for MockTransport {
    type Device = MockDevice;

    fn is_supported(&self) -> bool {
        self.supported
    }

    async fn availability(&self) -> Result<bool, TransportError> {
        Ok(*self.radio.available.lock().unwrap())
    }

    fn watch_availability(
        &self,
        events: mpsc::UnboundedSender<AppEvent>,
    ) -> Result<(), TransportError> {
        *self.radio.watcher.lock().unwrap() = Some(events);
        Ok(())
    }

    async fn scan(
        &self,
        _service: Uuid,
        _timeout: Duration,
    ) -> Result<Vec<MockDevice>, TransportError> {
        *self.scans.lock().unwrap() += 1;
        Ok(self
            .devices
            .iter()
            .map(|d| MockDevice {
                writes: self.writes.clone(),
                write_failure: self.write_failure.clone(),
                ..d.clone()
            })
            .collect())
    }
}

#[derive(Clone)]
pub struct MockDevice {
    id: String,
    name: String,
    open_error: Option<TransportError>,
    writes: Shared<Vec<Vec<u8>>>,
    write_failure: Shared<Option<TransportError>>,
}

impl MockDevice {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            open_error: None,
            writes: Arc::default(),
            write_failure: Arc::default(),
        }
    }

    pub fn failing_open(mut self, error: TransportError) -> Self {
        self.open_error = Some(error);
        self
    }
}

impl RemoteDevice for MockDevice {
    type Characteristic = MockCharacteristic;

    fn id(&self) -> String {
        self.id.clone()
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    fn signal_strength(&self) -> Option<i16> {
        Some(-50)
    }

    async fn open(
        &self,
        _service: Uuid,
        _characteristic: Uuid,
    ) -> Result<MockCharacteristic, TransportError> {
        if let Some(e) = &self.open_error {
            return Err(e.clone());
        }
        Ok(MockCharacteristic {
            writes: self.writes.clone(),
            write_failure: self.write_failure.clone(),
        })
    }
}

pub struct MockCharacteristic {
    writes: Shared<Vec<Vec<u8>>>,
    write_failure: Shared<Option<TransportError>>,
}

impl CommandCharacteristic for MockCharacteristic {
    async fn write(&self, payload: &[u8]) -> Result<(), TransportError> {
        if let Some(e) = self.write_failure.lock().unwrap().clone() {
            return Err(e);
        }
        self.writes.lock().unwrap().push(payload.to_vec());
        Ok(())
    }
}
