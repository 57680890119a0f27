use std::future::Future;

use crate::domain::device::models::device::{Device, DeviceKey, DeviceStatus, StoreError};
use crate::domain::device::models::operation::{
    OperationRequest, OperationResponse, PipelineMode,
};

/// `DeviceService` is the public API for the device domain: one call is one invocation.
pub trait DeviceService: Clone + Send + Sync + 'static {
    fn mode(&self) -> PipelineMode;

    /// Runs the whole pipeline. Every failure is folded into the returned response.
    fn handle(&self, req: &OperationRequest) -> impl Future<Output = OperationResponse> + Send;
}

/// `DeviceRepository` represents a store of device records whose calls may suspend.
pub trait DeviceRepository: Send + Sync + Clone + 'static {
    /// `Ok(None)` when no record exists for the key.
    fn fetch_device(
        &self,
        key: &DeviceKey,
    ) -> impl Future<Output = Result<Option<Device>, StoreError>> + Send;

    fn update_device_status(
        &self,
        key: &DeviceKey,
        status: DeviceStatus,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// `BlockingDeviceRepository` is a store of device records whose calls block the
/// calling thread until the store answers.
pub trait BlockingDeviceRepository: Send + Sync + Clone + 'static {
    fn fetch_device(&self, key: &DeviceKey) -> Result<Option<Device>, StoreError>;

    fn update_device_status(&self, key: &DeviceKey, status: DeviceStatus)
    -> Result<(), StoreError>;
}
