use anyhow::anyhow;

use crate::domain::device::models::device::{Device, DeviceKey, DeviceStatus, StoreError};
use crate::domain::device::ports::{BlockingDeviceRepository, DeviceRepository};

/// Lifts a [BlockingDeviceRepository] into the [DeviceRepository] port.
///
/// Each store call runs on tokio's blocking pool and the returned future resolves only once
/// that call has returned, so the pipeline keeps its fetch-then-mutate ordering.
#[derive(Debug, Clone)]
pub struct Blocking<R: BlockingDeviceRepository> {
    inner: R,
}

impl<R: BlockingDeviceRepository> Blocking<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

impl<R: BlockingDeviceRepository> DeviceRepository for Blocking<R> {
    async fn fetch_device(&self, key: &DeviceKey) -> Result<Option<Device>, StoreError> {
        let repo = self.inner.clone();
        let key = key.clone();

        tokio::task::spawn_blocking(move || repo.fetch_device(&key))
            .await
            .map_err(|e| anyhow!(e).context("blocking fetch task failed"))?
    }

    async fn update_device_status(
        &self,
        key: &DeviceKey,
        status: DeviceStatus,
    ) -> Result<(), StoreError> {
        let repo = self.inner.clone();
        let key = key.clone();

        tokio::task::spawn_blocking(move || repo.update_device_status(&key, status))
            .await
            .map_err(|e| anyhow!(e).context("blocking update task failed"))?
    }
}
