// Render and Compute Pipeline Management
// Creates and manages WebGPU pipelines
// Responsibilities:
// - Build pipeline descriptors from shader modules
// - Create pipelines synchronously, or asynchronously with typed failure
//   classification when the host rejects the creation
// - Bind pipelines to pass encoders

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    GpuComputePipeline, GpuDevice, GpuRenderPipeline, GpuRenderPipelineDescriptor,
    GpuTextureFormat,
};

use crate::error::PipelineFailure;
use crate::error::classify::classify_pipeline_creation;
use crate::gpu::device::Device;
use crate::gpu::shaders::ShaderModule;

pub struct RenderPipeline {
    pipeline: GpuRenderPipeline,
}

impl RenderPipeline {
    /// Create a render pipeline synchronously. Host-side validation failures
    /// are reported through the device's error scopes, not here.
    pub fn new(
        device: &Device,
        vertex_shader: &ShaderModule,
        fragment_shader: &ShaderModule,
        format: GpuTextureFormat,
    ) -> Result<Self, JsValue> {
        let descriptor = build_render_descriptor(device.raw(), vertex_shader, fragment_shader, format);
        let pipeline = device.raw().create_render_pipeline(&descriptor)?;
        Ok(Self { pipeline })
    }

    /// Create a render pipeline asynchronously. A rejected creation surfaces
    /// as a typed [`PipelineFailure`] instead of going through error scopes.
    pub async fn new_async(
        device: &Device,
        vertex_shader: &ShaderModule,
        fragment_shader: &ShaderModule,
        format: GpuTextureFormat,
    ) -> Result<Self, PipelineFailure> {
        let descriptor = build_render_descriptor(device.raw(), vertex_shader, fragment_shader, format);
        let promise = device.raw().create_render_pipeline_async(&descriptor);
        let outcome = JsFuture::from(promise).await;
        classify_pipeline_creation(outcome).map(|pipeline| Self { pipeline })
    }

    pub fn bind(&self, render_pass: &web_sys::GpuRenderPassEncoder) {
        render_pass.set_pipeline(&self.pipeline);
    }

    pub fn inner(&self) -> &GpuRenderPipeline {
        &self.pipeline
    }
}

pub struct ComputePipeline {
    pipeline: GpuComputePipeline,
}

impl ComputePipeline {
    /// Create a compute pipeline asynchronously with automatic layout.
    pub async fn new_async(device: &Device, module: &ShaderModule) -> Result<Self, PipelineFailure> {
        let stage = web_sys::GpuProgrammableStage::new(module.raw());
        stage.set_entry_point("main");
        let descriptor = web_sys::GpuComputePipelineDescriptor::new(
            &JsValue::from_str("auto"),
            &stage,
        );
        let promise = device.raw().create_compute_pipeline_async(&descriptor);
        let outcome = JsFuture::from(promise).await;
        classify_pipeline_creation(outcome).map(|pipeline| Self { pipeline })
    }

    pub fn inner(&self) -> &GpuComputePipeline {
        &self.pipeline
    }
}

fn build_render_descriptor(
    device: &GpuDevice,
    vertex_shader: &ShaderModule,
    fragment_shader: &ShaderModule,
    format: GpuTextureFormat,
) -> GpuRenderPipelineDescriptor {
    let pipeline_layout = device.create_pipeline_layout(
        &web_sys::GpuPipelineLayoutDescriptor::new(&js_sys::Array::new()),
    );

    // Vertex stage
    let vertex_state = web_sys::GpuVertexState::new(vertex_shader.raw());
    vertex_state.set_entry_point("main");

    let descriptor = GpuRenderPipelineDescriptor::new(&pipeline_layout, &vertex_state);

    // Fragment stage
    let targets = js_sys::Array::new();
    targets.push(&web_sys::GpuColorTargetState::new(format));
    let fragment_state = web_sys::GpuFragmentState::new(fragment_shader.raw(), &targets);
    fragment_state.set_entry_point("main");
    descriptor.set_fragment(&fragment_state);

    // Primitive state
    let primitive = web_sys::GpuPrimitiveState::new();
    primitive.set_topology(web_sys::GpuPrimitiveTopology::TriangleList);
    descriptor.set_primitive(&primitive);

    descriptor
}
