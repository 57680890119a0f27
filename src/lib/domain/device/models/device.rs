use std::str::FromStr;

use derive_more::Display;
use thiserror::Error;
use uuid::Uuid;

/// Represents always valid device identifier.
#[derive(Display, Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceId(Uuid);

/// Represents always valid city identifier.
#[derive(Display, Debug, Clone, PartialEq, Eq, Hash)]
pub struct CityId(Uuid);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0} is not a valid UUID")]
pub struct IdentifierError(String);

/// Accepts only the canonical form: lower-case, hyphenated, 36 characters.
fn parse_canonical_uuid(raw: &str) -> Result<Uuid, IdentifierError> {
    match Uuid::try_parse(raw) {
        Ok(uuid) if uuid.hyphenated().to_string() == raw => Ok(uuid),
        _ => Err(IdentifierError(raw.to_string())),
    }
}

impl DeviceId {
    pub fn new(raw_id: &str) -> Result<Self, IdentifierError> {
        parse_canonical_uuid(raw_id).map(DeviceId)
    }
}

impl CityId {
    pub fn new(raw_id: &str) -> Result<Self, IdentifierError> {
        parse_canonical_uuid(raw_id).map(CityId)
    }
}

/// Composite key of a device record. A device is never addressed by only one half of it.
#[derive(Display, Debug, Clone, PartialEq, Eq, Hash)]
#[display("{device_id}@{city_id}")]
pub struct DeviceKey {
    device_id: DeviceId,
    city_id: CityId,
}

impl DeviceKey {
    pub fn new(device_id: DeviceId, city_id: CityId) -> Self {
        Self { device_id, city_id }
    }

    pub fn device_id(&self) -> &DeviceId {
        &self.device_id
    }

    pub fn city_id(&self) -> &CityId {
        &self.city_id
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind} value {value:?}")]
pub struct UnknownVariantError {
    kind: &'static str,
    value: String,
}

/// Operational state of a device.
#[derive(Display, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceStatus {
    #[display("ON")]
    On,
    #[display("OFF")]
    Off,
}

impl FromStr for DeviceStatus {
    type Err = UnknownVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ON" => Ok(Self::On),
            "OFF" => Ok(Self::Off),
            other => Err(UnknownVariantError {
                kind: "device status",
                value: other.to_string(),
            }),
        }
    }
}

/// Enablement flag of the city owning a device, stored alongside the device.
#[derive(Display, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CityStatus {
    #[display("ENABLED")]
    Enabled,
    #[display("DISABLED")]
    Disabled,
}

impl FromStr for CityStatus {
    type Err = UnknownVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ENABLED" => Ok(Self::Enabled),
            "DISABLED" => Ok(Self::Disabled),
            other => Err(UnknownVariantError {
                kind: "city status",
                value: other.to_string(),
            }),
        }
    }
}

/// Outcome of checking whether an operation may touch a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Allowed,
    Blocked(BlockReason),
}

#[derive(Display, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockReason {
    #[display("city disabled")]
    CityDisabled,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Device {
    key: DeviceKey,
    name: Option<String>,
    description: Option<String>,
    status: DeviceStatus,
    city_status: CityStatus,
}

impl Device {
    pub fn new(
        key: DeviceKey,
        name: Option<String>,
        description: Option<String>,
        status: DeviceStatus,
        city_status: CityStatus,
    ) -> Self {
        Self {
            key,
            name,
            description,
            status,
            city_status,
        }
    }

    pub fn key(&self) -> &DeviceKey {
        &self.key
    }

    pub fn id(&self) -> &DeviceId {
        self.key.device_id()
    }

    pub fn city_id(&self) -> &CityId {
        self.key.city_id()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn status(&self) -> DeviceStatus {
        self.status
    }

    pub fn city_status(&self) -> CityStatus {
        self.city_status
    }

    pub fn with_status(self, status: DeviceStatus) -> Self {
        Self { status, ..self }
    }

    /// Blocked iff the owning city is disabled.
    pub fn gate(&self) -> Gate {
        match self.city_status {
            CityStatus::Disabled => Gate::Blocked(BlockReason::CityDisabled),
            CityStatus::Enabled => Gate::Allowed,
        }
    }
}

/// Failure originating below the store boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("stored record {key} is malformed: {reason}")]
    MalformedRecord { key: String, reason: String },
    #[error("device {key} changed while it was being updated")]
    Conflict { key: DeviceKey },
    #[error(transparent)]
    Unknown(#[from] anyhow::Error),
}
