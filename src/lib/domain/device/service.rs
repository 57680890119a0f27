use tracing::{debug, error, instrument, warn};

use crate::domain::device::models::device::Gate;
use crate::domain::device::models::operation::{
    OperationError, OperationRequest, OperationResponse, Outcome, PipelineMode,
};
use crate::domain::device::ports::{DeviceRepository, DeviceService};
use crate::domain::device::validation::{OPERATION_FIELD, RequestValidator, ValidationError};

/// Canonical implementation of the [DeviceService] port.
///
/// Runs validate, fetch, gate and, for update pipelines, mutate, strictly in that order.
/// Any failure ends the run; nothing is retried.
#[derive(Debug, Clone)]
pub struct Service<R: DeviceRepository> {
    repo: R,
    mode: PipelineMode,
    validator: &'static RequestValidator,
}

impl<R: DeviceRepository> Service<R> {
    pub fn new(repo: R, mode: PipelineMode) -> Self {
        Self {
            repo,
            mode,
            validator: RequestValidator::shared(mode),
        }
    }

    #[instrument(skip_all, fields(mode = %self.mode))]
    pub async fn execute(&self, req: &OperationRequest) -> Result<Outcome, OperationError> {
        let validated = self.validator.validate(req)?;
        let key = validated.key();
        debug!(%key, "request validated");

        let device = self
            .repo
            .fetch_device(key)
            .await?
            .ok_or_else(|| OperationError::NotFound { key: key.clone() })?;
        debug!(%key, status = %device.status(), "device fetched");

        if let Gate::Blocked(reason) = device.gate() {
            debug!(%key, %reason, "operation blocked");
            return Err(OperationError::DisabledCity { key: key.clone() });
        }

        match self.mode {
            PipelineMode::Read => Ok(Outcome::Read(device)),
            PipelineMode::Update(ack) => {
                let operation = validated.operation().ok_or(ValidationError::Missing {
                    field: OPERATION_FIELD,
                })?;
                let status = operation.target_status();
                self.repo.update_device_status(key, status).await?;
                debug!(%key, %operation, %status, "device status updated");

                Ok(Outcome::Written(ack))
            }
        }
    }
}

impl<R: DeviceRepository> DeviceService for Service<R> {
    fn mode(&self) -> PipelineMode {
        self.mode
    }

    async fn handle(&self, req: &OperationRequest) -> OperationResponse {
        let result = self.execute(req).await;

        match &result {
            Ok(_) => debug!(mode = %self.mode, "invocation succeeded"),
            Err(OperationError::Internal(cause)) => {
                error!(mode = %self.mode, "invocation failed: {:?}", cause)
            }
            Err(e) => warn!(mode = %self.mode, status_code = e.status_code(), "{}", e),
        }

        OperationResponse::from(result)
    }
}
