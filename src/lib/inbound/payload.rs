//! Wire shapes of function payloads and responses.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::device::models::operation::{
    OperationRequest, OperationResponse, PipelineMode,
};
use crate::domain::device::validation::ValidationError;

const UNREADABLE_PAYLOAD: &str = "Couldn't deserialize request message.";
const MISSING_DETAIL: &str = "Event detail cannot be null.";

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevicePayload {
    device_id: Option<String>,
    city_id: Option<String>,
    device_operation: Option<String>,
}

impl From<DevicePayload> for OperationRequest {
    fn from(payload: DevicePayload) -> Self {
        OperationRequest::new(
            payload.device_id,
            payload.city_id,
            payload.device_operation,
        )
    }
}

/// Event envelope delivered by the event bus to update functions. Envelope attributes not
/// listed here (account, region, time, resources) are accepted and ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EventBridgeEvent {
    id: Option<String>,
    source: Option<String>,
    #[serde(rename = "detail-type")]
    detail_type: Option<String>,
    detail: Option<DevicePayload>,
}

/// Diagnostic context carried by an event envelope.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EventContext {
    pub id: Option<String>,
    pub source: Option<String>,
    pub detail_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub request: OperationRequest,
    pub event: Option<EventContext>,
}

/// Decodes a raw payload for the given pipeline.
///
/// Read pipelines take a bare `{deviceId, cityId}` object. Update pipelines take either a
/// bare object with `deviceOperation` or an event envelope whose `detail` holds one.
pub fn decode(mode: PipelineMode, payload: &[u8]) -> Result<Invocation, ValidationError> {
    let value: Value =
        serde_json::from_slice(payload).map_err(|_| ValidationError::payload(UNREADABLE_PAYLOAD))?;

    if mode.is_write() && is_envelope(&value) {
        let event: EventBridgeEvent = serde_json::from_value(value)
            .map_err(|_| ValidationError::payload(UNREADABLE_PAYLOAD))?;
        let context = EventContext {
            id: event.id,
            source: event.source,
            detail_type: event.detail_type,
        };
        let detail = event
            .detail
            .ok_or_else(|| ValidationError::payload(MISSING_DETAIL))?;

        return Ok(Invocation {
            request: detail.into(),
            event: Some(context),
        });
    }

    let payload: DevicePayload = serde_json::from_value(value)
        .map_err(|_| ValidationError::payload(UNREADABLE_PAYLOAD))?;

    Ok(Invocation {
        request: payload.into(),
        event: None,
    })
}

fn is_envelope(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|object| object.contains_key("detail") || object.contains_key("detail-type"))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    city_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<String>,
    status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_message: Option<String>,
}

impl ResponseBody {
    pub fn status_code(&self) -> u16 {
        self.status_code
    }
}

impl From<&OperationResponse> for ResponseBody {
    fn from(response: &OperationResponse) -> Self {
        let device = response.device();

        Self {
            id: device.map(|d| d.id().to_string()),
            name: device.and_then(|d| d.name()).map(str::to_string),
            city_id: device.map(|d| d.city_id().to_string()),
            status: device.map(|d| d.status().to_string()),
            status_code: response.status_code(),
            error_message: response.error_message().map(str::to_string),
        }
    }
}

#[cfg(test)]
mod decode_tests {
    use super::*;
    use crate::domain::device::models::operation::WriteAck;

    const UPDATE: PipelineMode = PipelineMode::Update(WriteAck::Ok);

    #[test]
    fn test_decode_read_payload() {
        let payload = br#"{"deviceId": "d", "cityId": "c"}"#;

        let invocation = decode(PipelineMode::Read, payload).unwrap();

        assert_eq!(
            invocation.request,
            OperationRequest::new(Some("d".into()), Some("c".into()), None)
        );
        assert_eq!(invocation.event, None);
    }

    #[test]
    fn test_decode_event_envelope() {
        let payload = br#"{
            "id": "event-1",
            "version": "0",
            "source": "hiperium.city.tasks.api",
            "detail-type": "ExecutedTaskEvent",
            "account": "123456789012",
            "time": "2024-01-01T00:00:00Z",
            "region": "us-east-1",
            "resources": [],
            "detail": {"deviceId": "d", "cityId": "c", "deviceOperation": "ACTIVATE"}
        }"#;

        let invocation = decode(UPDATE, payload).unwrap();

        assert_eq!(
            invocation.request,
            OperationRequest::update("d", "c", "ACTIVATE")
        );
        let event = invocation.event.unwrap();
        assert_eq!(event.id.as_deref(), Some("event-1"));
        assert_eq!(event.source.as_deref(), Some("hiperium.city.tasks.api"));
    }

    #[test]
    fn test_decode_bare_update_payload() {
        let payload = br#"{"deviceId": "d", "cityId": "c", "deviceOperation": "DEACTIVATE"}"#;

        let invocation = decode(UPDATE, payload).unwrap();

        assert_eq!(
            invocation.request,
            OperationRequest::update("d", "c", "DEACTIVATE")
        );
        assert_eq!(invocation.event, None);
    }

    #[test]
    fn test_decode_envelope_without_detail() {
        let payload = br#"{"id": "event-1", "detail-type": "ExecutedTaskEvent", "detail": null}"#;

        let result = decode(UPDATE, payload);

        assert_eq!(result, Err(ValidationError::payload(MISSING_DETAIL)));
    }

    #[test]
    fn test_decode_garbage() {
        let result = decode(PipelineMode::Read, b"not json");

        assert_eq!(result, Err(ValidationError::payload(UNREADABLE_PAYLOAD)));
    }

    #[test]
    fn test_decode_wrong_field_type() {
        let result = decode(PipelineMode::Read, br#"{"deviceId": 42}"#);

        assert_eq!(result, Err(ValidationError::payload(UNREADABLE_PAYLOAD)));
    }
}
