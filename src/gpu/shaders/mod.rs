// Shader Management
// Handles shader module creation and compilation diagnostics
// Responsibilities:
// - Compile WGSL source into GPU shader modules
// - Retrieve and parse host compilation info into typed messages

use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{GpuShaderModule, GpuShaderModuleDescriptor};

use crate::error::classify::JsFutureResult;
use crate::gpu::device::Device;

/// Severity of a shader compilation diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompilationMessageKind {
    Error,
    Warning,
    Info,
}

/// One diagnostic from the host's shader compiler. Line numbers are
/// one-based; zero means the host attached no location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationMessage {
    pub kind: CompilationMessageKind,
    pub message: String,
    pub line_num: u64,
    pub line_pos: u64,
}

/// Wrapper around a host `GPUShaderModule` handle.
///
/// Creation never fails locally; source errors surface through
/// [`ShaderModule::compilation_info`] and the device's error scopes.
#[derive(Clone)]
pub struct ShaderModule {
    module: GpuShaderModule,
}

impl ShaderModule {
    pub fn new(device: &Device, source: &str) -> Self {
        let descriptor = GpuShaderModuleDescriptor::new(source);
        Self {
            module: device.raw().create_shader_module(&descriptor),
        }
    }

    pub fn with_label(device: &Device, source: &str, label: &str) -> Self {
        let descriptor = GpuShaderModuleDescriptor::new(source);
        descriptor.set_label(label);
        Self {
            module: device.raw().create_shader_module(&descriptor),
        }
    }

    /// Await and parse the host's compilation diagnostics for this module.
    pub async fn compilation_info(&self) -> Vec<CompilationMessage> {
        let outcome = JsFuture::from(self.module.get_compilation_info()).await;
        parse_compilation_info(outcome)
    }

    pub fn raw(&self) -> &GpuShaderModule {
        &self.module
    }
}

/// Parse a resolved `GPUCompilationInfo` value. Total: a rejected host call
/// or a malformed shape yields a single synthetic error message rather than
/// a local failure.
pub fn parse_compilation_info(outcome: JsFutureResult) -> Vec<CompilationMessage> {
    let Ok(value) = outcome else {
        return vec![CompilationMessage {
            kind: CompilationMessageKind::Error,
            message: "Getting compilation info failed".to_string(),
            line_num: 0,
            line_pos: 0,
        }];
    };
    let Ok(messages) = js_sys::Reflect::get(&value, &JsValue::from_str("messages")) else {
        return Vec::new();
    };
    let Ok(messages) = messages.dyn_into::<js_sys::Array>() else {
        return Vec::new();
    };
    messages
        .iter()
        .map(|entry| {
            let kind = match string_field(&entry, "type").as_deref() {
                Some("warning") => CompilationMessageKind::Warning,
                Some("info") => CompilationMessageKind::Info,
                _ => CompilationMessageKind::Error,
            };
            CompilationMessage {
                kind,
                message: string_field(&entry, "message").unwrap_or_default(),
                line_num: number_field(&entry, "lineNum"),
                line_pos: number_field(&entry, "linePos"),
            }
        })
        .collect()
}

fn string_field(value: &JsValue, field: &str) -> Option<String> {
    js_sys::Reflect::get(value, &JsValue::from_str(field))
        .ok()?
        .as_string()
}

fn number_field(value: &JsValue, field: &str) -> u64 {
    js_sys::Reflect::get(value, &JsValue::from_str(field))
        .ok()
        .and_then(|number| number.as_f64())
        .map(|number| number as u64)
        .unwrap_or(0)
}
