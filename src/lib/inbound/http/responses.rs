use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::domain::device::models::operation::OperationResponse;
use crate::inbound::payload::ResponseBody;

/// Function response sent over HTTP. The HTTP status mirrors the body's `statusCode`.
#[derive(Debug, Clone)]
pub struct ApiResponse(StatusCode, Json<ResponseBody>);

impl PartialEq for ApiResponse {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1.0 == other.1.0
    }
}

#[cfg(test)]
impl ApiResponse {
    pub fn status(&self) -> StatusCode {
        self.0
    }

    pub fn body(&self) -> &ResponseBody {
        &self.1.0
    }
}

impl From<&OperationResponse> for ApiResponse {
    fn from(response: &OperationResponse) -> Self {
        let body = ResponseBody::from(response);
        let status =
            StatusCode::from_u16(body.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        ApiResponse(status, Json(body))
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthResponseData {
    pub status: &'static str,
}
