//! Structural checks on inbound requests.
//!
//! Checks run by category: required fields first, identifier format second, operation
//! value last. The first violation found is reported and the rest are not looked at.
//! Within a category fields are visited as `deviceId`, `cityId`, `deviceOperation`;
//! callers should not rely on which violation wins when several fields are invalid.

use std::sync::LazyLock;

use thiserror::Error;

use crate::domain::device::models::device::{CityId, DeviceId, DeviceKey};
use crate::domain::device::models::operation::{
    DeviceOperation, OperationRequest, PipelineMode, ValidatedRequest,
};

const DEVICE_ID_FIELD: &str = "deviceId";
const CITY_ID_FIELD: &str = "cityId";
pub const OPERATION_FIELD: &str = "deviceOperation";

static READ_VALIDATOR: LazyLock<RequestValidator> =
    LazyLock::new(|| RequestValidator::new(false));
static UPDATE_VALIDATOR: LazyLock<RequestValidator> =
    LazyLock::new(|| RequestValidator::new(true));

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} must not be blank")]
    Blank { field: &'static str },
    #[error("{field} must not be null")]
    Missing { field: &'static str },
    #[error("{field} must be a valid UUID")]
    MalformedId { field: &'static str },
    #[error("{field} must be one of {choices}")]
    UnknownOperation {
        field: &'static str,
        choices: String,
    },
    #[error("{0}")]
    Payload(String),
}

impl ValidationError {
    pub fn blank(field: &'static str) -> Self {
        Self::Blank { field }
    }

    pub fn payload(message: &str) -> Self {
        Self::Payload(message.to_string())
    }
}

#[derive(Debug)]
pub struct RequestValidator {
    require_operation: bool,
    operation_choices: String,
}

impl RequestValidator {
    fn new(require_operation: bool) -> Self {
        let operation_choices = [DeviceOperation::Activate, DeviceOperation::Deactivate]
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");

        Self {
            require_operation,
            operation_choices,
        }
    }

    /// Process-wide validator for the given pipeline mode, built on first use.
    pub fn shared(mode: PipelineMode) -> &'static RequestValidator {
        if mode.is_write() {
            &*UPDATE_VALIDATOR
        } else {
            &*READ_VALIDATOR
        }
    }

    pub fn validate(&self, req: &OperationRequest) -> Result<ValidatedRequest, ValidationError> {
        let raw_device_id = required(DEVICE_ID_FIELD, req.device_id())?;
        let raw_city_id = required(CITY_ID_FIELD, req.city_id())?;
        let raw_operation = if self.require_operation {
            match req.operation() {
                Some(op) if !op.trim().is_empty() => Some(op),
                _ => {
                    return Err(ValidationError::Missing {
                        field: OPERATION_FIELD,
                    });
                }
            }
        } else {
            None
        };

        let device_id = DeviceId::new(raw_device_id).map_err(|_| ValidationError::MalformedId {
            field: DEVICE_ID_FIELD,
        })?;
        let city_id = CityId::new(raw_city_id).map_err(|_| ValidationError::MalformedId {
            field: CITY_ID_FIELD,
        })?;

        let operation = raw_operation
            .map(|op| {
                op.parse::<DeviceOperation>()
                    .map_err(|_| ValidationError::UnknownOperation {
                        field: OPERATION_FIELD,
                        choices: self.operation_choices.clone(),
                    })
            })
            .transpose()?;

        Ok(ValidatedRequest::new(
            DeviceKey::new(device_id, city_id),
            operation,
        ))
    }
}

fn required<'a>(field: &'static str, value: Option<&'a str>) -> Result<&'a str, ValidationError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ValidationError::blank(field)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::device::models::operation::WriteAck;

    const DEVICE_ID: &str = "37f44ed4-1a2b-4c3d-8e9f-0a1b2c3d4e31";
    const CITY_ID: &str = "a0ecb466-7ef5-47bf-9a1b-2c3d4e5f6a28";

    fn read_validator() -> &'static RequestValidator {
        RequestValidator::shared(PipelineMode::Read)
    }

    fn update_validator() -> &'static RequestValidator {
        RequestValidator::shared(PipelineMode::Update(WriteAck::Ok))
    }

    #[test]
    fn test_valid_read_request() {
        let result = read_validator().validate(&OperationRequest::read(DEVICE_ID, CITY_ID));

        let validated = result.unwrap();
        assert_eq!(validated.key().device_id().to_string(), DEVICE_ID);
        assert_eq!(validated.key().city_id().to_string(), CITY_ID);
        assert_eq!(validated.operation(), None);
    }

    #[test]
    fn test_read_ignores_operation_field() {
        let req = OperationRequest::update(DEVICE_ID, CITY_ID, "TOGGLE");

        assert!(read_validator().validate(&req).is_ok());
    }

    #[test]
    fn test_valid_update_request() {
        let req = OperationRequest::update(DEVICE_ID, CITY_ID, "DEACTIVATE");
        let validated = update_validator().validate(&req).unwrap();

        assert_eq!(validated.operation(), Some(DeviceOperation::Deactivate));
    }

    #[test]
    fn test_blank_city_id() {
        let result = read_validator().validate(&OperationRequest::read(DEVICE_ID, "  "));

        assert_eq!(result, Err(ValidationError::blank(CITY_ID_FIELD)));
        assert_eq!(result.unwrap_err().to_string(), "cityId must not be blank");
    }

    #[test]
    fn test_missing_device_id() {
        let req = OperationRequest::new(None, Some(CITY_ID.to_string()), None);

        assert_eq!(
            read_validator().validate(&req),
            Err(ValidationError::blank(DEVICE_ID_FIELD))
        );
    }

    #[test]
    fn test_malformed_device_id() {
        let req = OperationRequest::read("a0ecb466-7ef5-47bf", CITY_ID);

        assert_eq!(
            read_validator().validate(&req),
            Err(ValidationError::MalformedId {
                field: DEVICE_ID_FIELD
            })
        );
    }

    #[test]
    fn test_missing_operation_on_update() {
        let req = OperationRequest::read(DEVICE_ID, CITY_ID);

        assert_eq!(
            update_validator().validate(&req),
            Err(ValidationError::Missing {
                field: OPERATION_FIELD
            })
        );
    }

    #[test]
    fn test_unknown_operation_on_update() {
        let req = OperationRequest::update(DEVICE_ID, CITY_ID, "TOGGLE");
        let err = update_validator().validate(&req).unwrap_err();

        assert_eq!(
            err.to_string(),
            "deviceOperation must be one of ACTIVATE, DEACTIVATE"
        );
    }

    #[test]
    fn test_required_fields_are_checked_before_format() {
        // deviceId is malformed, cityId is blank: the blank field wins.
        let req = OperationRequest::read("not-a-uuid", "");

        assert_eq!(
            read_validator().validate(&req),
            Err(ValidationError::blank(CITY_ID_FIELD))
        );
    }

    #[test]
    fn test_format_is_checked_before_operation_value() {
        let req = OperationRequest::update(DEVICE_ID, "not-a-uuid", "TOGGLE");

        assert_eq!(
            update_validator().validate(&req),
            Err(ValidationError::MalformedId {
                field: CITY_ID_FIELD
            })
        );
    }

    #[test]
    fn test_shared_validator_is_reused() {
        let first = read_validator() as *const RequestValidator;
        let second = read_validator() as *const RequestValidator;

        assert_eq!(first, second);
    }
}
