// webgpu-bridge - typed bindings over the browser WebGPU API
// Every wrapper holds an opaque JavaScript handle; every potentially-failing
// asynchronous host call is awaited and its outcome classified into a typed
// result. All validation, resource tracking and rendering happens in the
// browser's native WebGPU implementation, never here.

use wasm_bindgen::prelude::*;

pub mod error;
pub mod gpu;

pub use error::{
    BufferMapFailure, DeviceLossEvent, DeviceLossReason, DeviceRequestErrorKind,
    DeviceRequestFailure, ErrorCategory, ErrorScopeFilter, InitError, PipelineFailure,
    PipelineFailureReason,
};
pub use gpu::buffer::{Buffer, MapMode};
pub use gpu::context::{Adapter, GpuContext};
pub use gpu::device::{Device, UncapturedErrorToken};
pub use gpu::pipeline::{ComputePipeline, RenderPipeline};
pub use gpu::queue::Queue;
pub use gpu::shaders::{CompilationMessage, CompilationMessageKind, ShaderModule};

#[wasm_bindgen]
unsafe extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    pub(crate) fn log(s: &str);
}

macro_rules! console_log {
    ($($t:tt)*) => ($crate::log(&format_args!($($t)*).to_string()))
}

pub(crate) use console_log;
