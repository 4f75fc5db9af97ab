// GPU Buffer Management
// Wraps host GPUBuffer handles and their asynchronous mapping protocol
// Main responsibilities:
// - Create buffers from size/usage/mapped-at-creation parameters
// - Map buffers asynchronously with typed failure classification
// - Expose the mapped range and pass destroy/unmap through to the host

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{GpuBuffer, GpuBufferDescriptor, gpu_map_mode};

use crate::error::BufferMapFailure;
use crate::error::classify::classify_buffer_map;
use crate::gpu::device::Device;

/// Which way a mapped buffer is visible to the CPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapMode {
    Read,
    Write,
}

impl MapMode {
    fn flags(self) -> u32 {
        match self {
            Self::Read => gpu_map_mode::READ,
            Self::Write => gpu_map_mode::WRITE,
        }
    }
}

/// Wrapper around a host `GPUBuffer` handle. Clones alias the same host
/// object; mapping state lives entirely in the host.
#[derive(Clone)]
pub struct Buffer {
    inner: GpuBuffer,
}

impl Buffer {
    /// Create a buffer on the given device. `usage` takes the
    /// `web_sys::gpu_buffer_usage` flag constants.
    pub fn new(
        device: &Device,
        size: u64,
        usage: u32,
        mapped_at_creation: bool,
    ) -> Result<Self, JsValue> {
        let descriptor = GpuBufferDescriptor::new(size as f64, usage);
        descriptor.set_mapped_at_creation(mapped_at_creation);
        let inner = device.raw().create_buffer(&descriptor)?;
        Ok(Self { inner })
    }

    pub fn from_raw(inner: GpuBuffer) -> Self {
        Self { inner }
    }

    /// Map the whole buffer. Resolves once the host has made the contents
    /// available; a buffer destroyed mid-flight reports
    /// [`BufferMapFailure::Aborted`].
    pub async fn map_async(&self, mode: MapMode) -> Result<(), BufferMapFailure> {
        let outcome = JsFuture::from(self.inner.map_async(mode.flags())).await;
        classify_buffer_map(outcome)
    }

    /// Map a sub-range of the buffer.
    pub async fn map_async_range(
        &self,
        mode: MapMode,
        offset: u64,
        size: u64,
    ) -> Result<(), BufferMapFailure> {
        let promise = self
            .inner
            .map_async_with_f64_and_f64(mode.flags(), offset as f64, size as f64);
        classify_buffer_map(JsFuture::from(promise).await)
    }

    /// The currently mapped range as a raw `ArrayBuffer`. Fails on the host
    /// side if the buffer is not mapped.
    pub fn get_mapped_range(&self) -> Result<js_sys::ArrayBuffer, JsValue> {
        self.inner.get_mapped_range()
    }

    /// Copy of the currently mapped bytes.
    pub fn mapped_bytes(&self) -> Result<Vec<u8>, JsValue> {
        let array_buffer = self.get_mapped_range()?;
        Ok(js_sys::Uint8Array::new(&array_buffer).to_vec())
    }

    pub fn unmap(&self) {
        self.inner.unmap();
    }

    pub fn destroy(&self) {
        self.inner.destroy();
    }

    pub fn raw(&self) -> &GpuBuffer {
        &self.inner
    }
}
