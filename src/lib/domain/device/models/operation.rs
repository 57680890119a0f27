use std::str::FromStr;

use derive_more::Display;
use thiserror::Error;

use crate::domain::device::models::device::{Device, DeviceKey, DeviceStatus, StoreError};
use crate::domain::device::validation::ValidationError;

const OK: u16 = 200;
const NO_CONTENT: u16 = 204;
const BAD_REQUEST: u16 = 400;
const NOT_FOUND: u16 = 404;
const NOT_ACCEPTABLE: u16 = 406;
const INTERNAL_SERVER_ERROR: u16 = 500;

/// A requested transition of a device's status.
#[derive(Display, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceOperation {
    #[display("ACTIVATE")]
    Activate,
    #[display("DEACTIVATE")]
    Deactivate,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0:?} is not a device operation")]
pub struct UnknownOperationError(String);

impl FromStr for DeviceOperation {
    type Err = UnknownOperationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVATE" => Ok(Self::Activate),
            "DEACTIVATE" => Ok(Self::Deactivate),
            other => Err(UnknownOperationError(other.to_string())),
        }
    }
}

impl DeviceOperation {
    /// The status persisted for this operation.
    pub fn target_status(self) -> DeviceStatus {
        match self {
            Self::Activate => DeviceStatus::On,
            Self::Deactivate => DeviceStatus::Off,
        }
    }
}

/// How a successful write is acknowledged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteAck {
    #[default]
    Ok,
    NoContent,
}

impl WriteAck {
    pub fn status_code(self) -> u16 {
        match self {
            Self::Ok => OK,
            Self::NoContent => NO_CONTENT,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0} is not a supported write acknowledgement status")]
pub struct WriteAckError(u16);

impl TryFrom<u16> for WriteAck {
    type Error = WriteAckError;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        match code {
            OK => Ok(Self::Ok),
            NO_CONTENT => Ok(Self::NoContent),
            other => Err(WriteAckError(other)),
        }
    }
}

/// Selects which pipeline a deployment runs.
#[derive(Display, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineMode {
    #[display("read")]
    Read,
    #[display("update")]
    Update(WriteAck),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0:?} is not a pipeline mode, expected \"read\" or \"update\"")]
pub struct PipelineModeError(String);

impl FromStr for PipelineMode {
    type Err = PipelineModeError;

    /// Parses the mode name; an update pipeline starts with the default acknowledgement.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "read" => Ok(Self::Read),
            "update" => Ok(Self::Update(WriteAck::default())),
            _ => Err(PipelineModeError(s.to_string())),
        }
    }
}

impl PipelineMode {
    pub fn is_write(self) -> bool {
        matches!(self, Self::Update(_))
    }
}

/// One inbound invocation's payload, as received and before any check.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OperationRequest {
    device_id: Option<String>,
    city_id: Option<String>,
    operation: Option<String>,
}

impl OperationRequest {
    pub fn new(
        device_id: Option<String>,
        city_id: Option<String>,
        operation: Option<String>,
    ) -> Self {
        Self {
            device_id,
            city_id,
            operation,
        }
    }

    pub fn read(device_id: &str, city_id: &str) -> Self {
        Self::new(Some(device_id.to_string()), Some(city_id.to_string()), None)
    }

    pub fn update(device_id: &str, city_id: &str, operation: &str) -> Self {
        Self::new(
            Some(device_id.to_string()),
            Some(city_id.to_string()),
            Some(operation.to_string()),
        )
    }

    pub fn device_id(&self) -> Option<&str> {
        self.device_id.as_deref()
    }

    pub fn city_id(&self) -> Option<&str> {
        self.city_id.as_deref()
    }

    pub fn operation(&self) -> Option<&str> {
        self.operation.as_deref()
    }
}

/// A request that passed validation. The operation is present iff the pipeline writes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedRequest {
    key: DeviceKey,
    operation: Option<DeviceOperation>,
}

impl ValidatedRequest {
    pub fn new(key: DeviceKey, operation: Option<DeviceOperation>) -> Self {
        Self { key, operation }
    }

    pub fn key(&self) -> &DeviceKey {
        &self.key
    }

    pub fn operation(&self) -> Option<DeviceOperation> {
        self.operation
    }
}

/// Successful end of a pipeline run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Read(Device),
    Written(WriteAck),
}

#[derive(Debug, Error)]
pub enum OperationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Device not found.")]
    NotFound { key: DeviceKey },
    #[error("City is disabled.")]
    DisabledCity { key: DeviceKey },
    #[error("Internal server error.")]
    Internal(#[from] StoreError),
}

impl OperationError {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => BAD_REQUEST,
            Self::NotFound { .. } => NOT_FOUND,
            Self::DisabledCity { .. } => NOT_ACCEPTABLE,
            Self::Internal(_) => INTERNAL_SERVER_ERROR,
        }
    }
}

/// The outbound result. Success and failure shapes never mix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OperationResponse {
    Device(Device),
    Accepted(WriteAck),
    Failed { status_code: u16, message: String },
}

impl OperationResponse {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Device(_) => OK,
            Self::Accepted(ack) => ack.status_code(),
            Self::Failed { status_code, .. } => *status_code,
        }
    }

    pub fn device(&self) -> Option<&Device> {
        match self {
            Self::Device(device) => Some(device),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }
}

impl From<Result<Outcome, OperationError>> for OperationResponse {
    fn from(result: Result<Outcome, OperationError>) -> Self {
        match result {
            Ok(Outcome::Read(device)) => Self::Device(device),
            Ok(Outcome::Written(ack)) => Self::Accepted(ack),
            Err(e) => Self::Failed {
                status_code: e.status_code(),
                message: e.to_string(),
            },
        }
    }
}


#[cfg(test)]
mod response_tests {
    use super::*;
    use crate::domain::device::models::device::{CityId, DeviceId};

    fn key() -> DeviceKey {
        DeviceKey::new(
            DeviceId::new("37f44ed4-1a2b-4c3d-8e9f-0a1b2c3d4e31").unwrap(),
            CityId::new("a0ecb466-7ef5-47bf-9a1b-2c3d4e5f6a28").unwrap(),
        )
    }

    #[test]
    fn test_error_kinds_map_to_fixed_codes() {
        let cases = [
            (OperationError::Validation(ValidationError::blank("cityId")), 400),
            (OperationError::NotFound { key: key() }, 404),
            (OperationError::DisabledCity { key: key() }, 406),
            (
                OperationError::Internal(StoreError::Conflict { key: key() }),
                500,
            ),
        ];

        for (error, code) in cases {
            let response = OperationResponse::from(Err(error));
            assert_eq!(response.status_code(), code);
            assert!(response.device().is_none());
            assert!(!response.error_message().unwrap().is_empty());
        }
    }

    #[test]
    fn test_failure_messages() {
        let not_found = OperationResponse::from(Err(OperationError::NotFound { key: key() }));
        let disabled = OperationResponse::from(Err(OperationError::DisabledCity { key: key() }));
        let internal = OperationResponse::from(Err(OperationError::Internal(
            StoreError::Unknown(anyhow::anyhow!("connection reset")),
        )));

        assert_eq!(not_found.error_message(), Some("Device not found."));
        assert_eq!(disabled.error_message(), Some("City is disabled."));
        assert_eq!(internal.error_message(), Some("Internal server error."));
    }

    #[test]
    fn test_write_success_has_no_payload() {
        let response = OperationResponse::from(Ok(Outcome::Written(WriteAck::NoContent)));

        assert_eq!(response.status_code(), 204);
        assert!(response.device().is_none());
        assert!(response.error_message().is_none());
    }
}
