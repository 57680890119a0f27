use serde::{Deserialize, Serialize};

use crate::domain::device::models::device::{
    CityId, CityStatus, Device, DeviceId, DeviceKey, DeviceStatus, StoreError,
};

/// A device record in the store's native shape: every attribute is a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DeviceRecord {
    pub id: String,
    pub city_id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: String,
    pub city_status: String,
}

impl DeviceRecord {
    /// A record that does not parse is inconsistent data, reported as a store failure.
    pub fn into_device(self) -> Result<Device, StoreError> {
        let malformed = |reason: String| StoreError::MalformedRecord {
            key: format!("{}@{}", self.id, self.city_id),
            reason,
        };

        let device_id = DeviceId::new(&self.id).map_err(|e| malformed(e.to_string()))?;
        let city_id = CityId::new(&self.city_id).map_err(|e| malformed(e.to_string()))?;
        let status = self
            .status
            .parse::<DeviceStatus>()
            .map_err(|e| malformed(e.to_string()))?;
        let city_status = self
            .city_status
            .parse::<CityStatus>()
            .map_err(|e| malformed(e.to_string()))?;

        Ok(Device::new(
            DeviceKey::new(device_id, city_id),
            self.name,
            self.description,
            status,
            city_status,
        ))
    }
}

impl From<&Device> for DeviceRecord {
    fn from(device: &Device) -> Self {
        Self {
            id: device.id().to_string(),
            city_id: device.city_id().to_string(),
            name: device.name().map(str::to_string),
            description: device.description().map(str::to_string),
            status: device.status().to_string(),
            city_status: device.city_status().to_string(),
        }
    }
}
