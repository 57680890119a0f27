use axum::body::Bytes;
use axum::extract::State;

use crate::domain::device::ports::DeviceService;
use crate::inbound::http::AppState;
use crate::inbound::http::responses::ApiResponse;
use crate::inbound::invoke::invoke;

/// Runs the deployed pipeline on the raw request body.
pub async fn invoke_function<DS: DeviceService>(
    State(state): State<AppState<DS>>,
    body: Bytes,
) -> ApiResponse {
    let response = invoke(state.device_service.as_ref(), &body).await;

    ApiResponse::from(&response)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use serde_json::json;

    use super::*;
    use crate::domain::device::models::device::{
        CityId, CityStatus, Device, DeviceId, DeviceKey, DeviceStatus,
    };
    use crate::domain::device::models::operation::{PipelineMode, WriteAck};
    use crate::domain::device::service::Service;
    use crate::outbound::blocking::Blocking;
    use crate::outbound::memory::InMemory;

    const DEVICE_ID: &str = "37f44ed4-1a2b-4c3d-8e9f-0a1b2c3d4e31";
    const CITY_ID: &str = "a0ecb466-7ef5-47bf-9a1b-2c3d4e5f6a28";
    const DISABLED_DEVICE_ID: &str = "37f44ed4-1a2b-4c3d-8e9f-0a1b2c3d4e32";
    const DISABLED_CITY_ID: &str = "a0ecb466-7ef5-47bf-9a1b-2c3d4e5f6a29";

    fn state(mode: PipelineMode) -> AppState<Service<Blocking<InMemory>>> {
        let store = InMemory::new();
        for (device_id, city_id, city_status) in [
            (DEVICE_ID, CITY_ID, CityStatus::Enabled),
            (DISABLED_DEVICE_ID, DISABLED_CITY_ID, CityStatus::Disabled),
        ] {
            let key = DeviceKey::new(
                DeviceId::new(device_id).unwrap(),
                CityId::new(city_id).unwrap(),
            );
            store
                .insert(Device::new(
                    key,
                    Some("Street lamp".to_string()),
                    None,
                    DeviceStatus::On,
                    city_status,
                ))
                .unwrap();
        }

        AppState {
            device_service: Arc::new(Service::new(Blocking::new(store), mode)),
        }
    }

    fn body(value: serde_json::Value) -> Bytes {
        Bytes::from(value.to_string())
    }

    #[tokio::test]
    async fn test_invoke_read_success() {
        let response = invoke_function(
            State(state(PipelineMode::Read)),
            body(json!({"deviceId": DEVICE_ID, "cityId": CITY_ID})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            serde_json::to_value(response.body()).unwrap(),
            json!({
                "id": DEVICE_ID,
                "name": "Street lamp",
                "cityId": CITY_ID,
                "status": "ON",
                "statusCode": 200
            })
        );
    }

    #[tokio::test]
    async fn test_invoke_read_disabled_city() {
        let response = invoke_function(
            State(state(PipelineMode::Read)),
            body(json!({"deviceId": DISABLED_DEVICE_ID, "cityId": DISABLED_CITY_ID})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_ACCEPTABLE);
        assert_eq!(
            serde_json::to_value(response.body()).unwrap(),
            json!({"statusCode": 406, "errorMessage": "City is disabled."})
        );
    }

    #[tokio::test]
    async fn test_invoke_update_no_content() {
        let response = invoke_function(
            State(state(PipelineMode::Update(WriteAck::NoContent))),
            body(json!({
                "id": "e-1",
                "source": "tasks",
                "detail-type": "ExecutedTaskEvent",
                "detail": {"deviceId": DEVICE_ID, "cityId": CITY_ID, "deviceOperation": "DEACTIVATE"}
            })),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_invoke_malformed_id() {
        let response = invoke_function(
            State(state(PipelineMode::Read)),
            body(json!({"deviceId": "a0ecb466-7ef5-47bf", "cityId": CITY_ID})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.body().status_code(), 400);
    }
}
