use axum::Json;
use axum::http::StatusCode;

use crate::inbound::http::responses::HealthResponseData;

pub async fn health() -> (StatusCode, Json<HealthResponseData>) {
    (StatusCode::OK, Json(HealthResponseData { status: "ok" }))
}
