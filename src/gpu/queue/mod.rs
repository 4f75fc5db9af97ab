// GPU Queue Management
// Wraps the host GPUQueue for command submission
// Main responsibilities:
// - Submit finished command buffers
// - Await the host's submitted-work-done notification

use wasm_bindgen_futures::JsFuture;
use web_sys::{GpuCommandBuffer, GpuQueue};

/// Wrapper around a host `GPUQueue` handle.
#[derive(Clone)]
pub struct Queue {
    inner: GpuQueue,
}

impl Queue {
    pub fn from_raw(inner: GpuQueue) -> Self {
        Self { inner }
    }

    /// Submit command buffers in order.
    pub fn submit(&self, command_buffers: &[GpuCommandBuffer]) {
        let buffers = js_sys::Array::new();
        for command_buffer in command_buffers {
            buffers.push(command_buffer);
        }
        self.inner.submit(&buffers);
    }

    /// Wait until the host has completed all work submitted to this queue so
    /// far. Total: a rejected host notification (a lost device) completes the
    /// wait rather than surfacing a local failure.
    pub async fn on_submitted_work_done(&self) {
        let _ = JsFuture::from(self.inner.on_submitted_work_done()).await;
    }

    pub fn raw(&self) -> &GpuQueue {
        &self.inner
    }
}
