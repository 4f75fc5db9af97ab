// GPU Context Management
// Handles WebGPU initialization, adapter/device creation, and canvas context configuration
// Main responsibilities:
// - Detect WebGPU support and request a GPU adapter
// - Request a logical device with typed failure classification
// - Configure the canvas rendering context

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    GpuAdapter, GpuCanvasContext, GpuDevice, GpuDeviceDescriptor, HtmlCanvasElement,
    gpu_texture_usage,
};

use crate::error::classify::classify_device_request;
use crate::error::{DeviceRequestFailure, InitError};
use crate::gpu::device::Device;

/// Wrapper around a host `GPUAdapter` handle.
///
/// Requesting a device consumes the adapter on the host side; a second request
/// on the same adapter fails with an operation error.
#[derive(Clone)]
pub struct Adapter {
    inner: GpuAdapter,
}

impl Adapter {
    pub fn from_raw(inner: GpuAdapter) -> Self {
        Self { inner }
    }

    /// Request a logical device with default features and limits.
    pub async fn request_device(&self) -> Result<Device, DeviceRequestFailure> {
        let outcome = JsFuture::from(self.inner.request_device()).await;
        classify_device_request(outcome).map(Device::from_raw)
    }

    /// Request a logical device with explicit features and limits.
    pub async fn request_device_with_descriptor(
        &self,
        descriptor: &GpuDeviceDescriptor,
    ) -> Result<Device, DeviceRequestFailure> {
        let outcome = JsFuture::from(self.inner.request_device_with_descriptor(descriptor)).await;
        classify_device_request(outcome).map(Device::from_raw)
    }

    pub fn raw(&self) -> &GpuAdapter {
        &self.inner
    }
}

pub struct GpuContext {
    pub adapter: Adapter,
    pub device: Device,
    pub context: GpuCanvasContext,
}

impl GpuContext {
    pub async fn new(canvas: &HtmlCanvasElement) -> Result<Self, InitError> {
        let window = web_sys::window().ok_or(InitError::NoGlobalWindow)?;
        let gpu = window.navigator().gpu();
        if gpu.is_undefined() {
            return Err(InitError::WebGpuUnsupported);
        }

        // Request adapter; the promise resolves with null when no adapter
        // satisfies the (default) options.
        let adapter = JsFuture::from(gpu.request_adapter())
            .await
            .map_err(|_| InitError::AdapterUnavailable)?;
        if adapter.is_null() || adapter.is_undefined() {
            return Err(InitError::AdapterUnavailable);
        }
        let adapter = Adapter::from_raw(adapter.unchecked_into());

        // Request device
        let device = adapter.request_device().await?;

        // Get canvas context
        let context = canvas
            .get_context("webgpu")
            .map_err(|error| InitError::CanvasContext(format!("{error:?}")))?
            .ok_or_else(|| InitError::CanvasContext("canvas returned no context".to_string()))?;
        let context: GpuCanvasContext = context
            .dyn_into()
            .map_err(|_| InitError::CanvasContext("context is not a GPUCanvasContext".to_string()))?;

        // Configure canvas context
        configure_canvas(&context, device.raw())?;

        Ok(Self {
            adapter,
            device,
            context,
        })
    }

    pub fn get_current_texture_view(&self) -> Result<web_sys::GpuTextureView, JsValue> {
        let current_texture = self.context.get_current_texture()?;
        current_texture.create_view()
    }
}

/// Configure the canvas context for rendering. The host throws a `TypeError`
/// when the format or usage is unsupported.
fn configure_canvas(context: &GpuCanvasContext, device: &GpuDevice) -> Result<(), InitError> {
    let config =
        web_sys::GpuCanvasConfiguration::new(device, web_sys::GpuTextureFormat::Bgra8unorm);
    config.set_usage(gpu_texture_usage::RENDER_ATTACHMENT);
    context
        .configure(&config)
        .map_err(|error| InitError::CanvasContext(format!("{error:?}")))
}
