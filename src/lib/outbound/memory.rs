use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, RwLock};

use anyhow::{Context, anyhow};

use crate::domain::device::models::device::{Device, DeviceKey, DeviceStatus, StoreError};
use crate::domain::device::ports::BlockingDeviceRepository;
use crate::outbound::record::DeviceRecord;

/// Process-local device store. Calls complete on the calling thread.
#[derive(Debug, Clone, Default)]
pub struct InMemory {
    devices: Arc<RwLock<HashMap<DeviceKey, Device>>>,
}

impl InMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<DeviceRecord>) -> Result<Self, StoreError> {
        let store = Self::new();
        for record in records {
            store.insert(record.into_device()?)?;
        }

        Ok(store)
    }

    /// Loads a JSON array of device records.
    pub fn from_seed_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read seed file {}", path.display()))?;
        let records: Vec<DeviceRecord> = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse seed file {}", path.display()))?;

        Self::from_records(records).context("seed file contains an invalid device record")
    }

    pub fn insert(&self, device: Device) -> Result<(), StoreError> {
        let mut devices = self
            .devices
            .write()
            .map_err(|_| anyhow!("device map lock poisoned"))?;
        devices.insert(device.key().clone(), device);

        Ok(())
    }
}

impl BlockingDeviceRepository for InMemory {
    fn fetch_device(&self, key: &DeviceKey) -> Result<Option<Device>, StoreError> {
        let devices = self
            .devices
            .read()
            .map_err(|_| anyhow!("device map lock poisoned"))?;

        Ok(devices.get(key).cloned())
    }

    fn update_device_status(
        &self,
        key: &DeviceKey,
        status: DeviceStatus,
    ) -> Result<(), StoreError> {
        let mut devices = self
            .devices
            .write()
            .map_err(|_| anyhow!("device map lock poisoned"))?;

        match devices.remove(key) {
            Some(device) => {
                devices.insert(key.clone(), device.with_status(status));
                Ok(())
            }
            None => Err(StoreError::Conflict { key: key.clone() }),
        }
    }
}
