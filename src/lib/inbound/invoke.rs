use anyhow::Context;
use tokio::runtime::{Builder, Runtime};
use tracing::field::Empty;
use tracing::{Instrument, info_span, warn};

use crate::domain::device::models::operation::{OperationError, OperationResponse};
use crate::domain::device::ports::DeviceService;
use crate::inbound::payload;

/// Decodes one raw payload and runs it through the service. Never fails: undecodable
/// payloads come back as validation failures.
pub async fn invoke<DS: DeviceService>(service: &DS, raw_payload: &[u8]) -> OperationResponse {
    let span = info_span!(
        "invocation",
        mode = %service.mode(),
        event_id = Empty,
        event_source = Empty,
        event_detail_type = Empty
    );

    match payload::decode(service.mode(), raw_payload) {
        Ok(invocation) => {
            if let Some(event) = &invocation.event {
                if let Some(id) = &event.id {
                    span.record("event_id", id.as_str());
                }
                if let Some(source) = &event.source {
                    span.record("event_source", source.as_str());
                }
                if let Some(detail_type) = &event.detail_type {
                    span.record("event_detail_type", detail_type.as_str());
                }
            }

            service.handle(&invocation.request).instrument(span).await
        }
        Err(e) => {
            span.in_scope(|| warn!("rejected payload: {}", e));
            OperationResponse::from(Err(OperationError::from(e)))
        }
    }
}

/// Runs invocations to completion on the calling thread.
///
/// Owns a single-threaded runtime, so it must not be used from inside another tokio runtime.
pub struct BlockingInvoker<DS: DeviceService> {
    service: DS,
    runtime: Runtime,
}

impl<DS: DeviceService> BlockingInvoker<DS> {
    pub fn new(service: DS) -> anyhow::Result<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .context("failed to build invocation runtime")?;

        Ok(Self { service, runtime })
    }

    pub fn invoke(&self, raw_payload: &[u8]) -> OperationResponse {
        self.runtime.block_on(invoke(&self.service, raw_payload))
    }
}
