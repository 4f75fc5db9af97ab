// Host outcome classification
// Converts the raw outcome of an awaited host call (a resolved or rejected
// JsValue) into the typed results of the surrounding wrapper layer.
// Main responsibilities:
// - Read the discriminator and message of opaque host error objects
// - Map each async outcome shape onto exactly one typed result
// - Stay total: malformed host values classify to conservative defaults,
//   they never trap

use wasm_bindgen::{JsCast, JsValue};
use web_sys::GpuDevice;

use super::{
    BufferMapFailure, DeviceLossEvent, DeviceLossReason, DeviceRequestErrorKind,
    DeviceRequestFailure, ErrorCategory, PipelineFailure, PipelineFailureReason,
};

/// Outcome of awaiting a host promise through `wasm_bindgen_futures::JsFuture`.
pub type JsFutureResult = Result<JsValue, JsValue>;

const UNKNOWN_MESSAGE: &str = "Unknown error";

/// Discriminator string identifying the concrete kind of a host error.
///
/// DOMException kinds (`AbortError`, `OperationError`) carry their kind in the
/// `name` property; GPU error classes (`GPUValidationError` and friends) and
/// builtins like `TypeError` are identified by their constructor name. The
/// `name` property wins when both are present, which keeps the two cases
/// consistent: for builtins they agree anyway.
pub(crate) fn error_discriminator(value: &JsValue) -> Option<String> {
    if let Ok(name) = js_sys::Reflect::get(value, &JsValue::from_str("name")) {
        if let Some(name) = name.as_string() {
            return Some(name);
        }
    }
    let constructor = js_sys::Reflect::get(value, &JsValue::from_str("constructor")).ok()?;
    let constructor = constructor.dyn_ref::<js_sys::Function>()?;
    Some(String::from(constructor.name()))
}

/// `message` property of a host error, if it is a string.
pub(crate) fn error_message(value: &JsValue) -> Option<String> {
    js_sys::Reflect::get(value, &JsValue::from_str("message"))
        .ok()?
        .as_string()
}

fn message_or_unknown(value: &JsValue) -> String {
    error_message(value).unwrap_or_else(|| UNKNOWN_MESSAGE.to_string())
}

/// Classify the outcome of `GPUAdapter.requestDevice()`.
///
/// A `TypeError` rejection means a requested feature is unsupported; every
/// other rejection shape (unsupported limits, consumed adapter, malformed
/// error values) maps to `OperationError`.
pub fn classify_device_request(outcome: JsFutureResult) -> Result<GpuDevice, DeviceRequestFailure> {
    match outcome {
        Ok(value) => Ok(value.unchecked_into()),
        Err(error) => {
            let kind = match error_discriminator(&error).as_deref() {
                Some("TypeError") => DeviceRequestErrorKind::TypeError,
                _ => DeviceRequestErrorKind::OperationError,
            };
            Err(DeviceRequestFailure {
                kind,
                message: message_or_unknown(&error),
            })
        }
    }
}

/// Classify the outcome of `createRenderPipelineAsync` /
/// `createComputePipelineAsync`.
///
/// The rejection value is a `GPUPipelineError` carrying a `reason` field;
/// anything other than `"validation"` counts as internal. A rejection with no
/// error object at all becomes a synthetic internal failure.
pub fn classify_pipeline_creation<T: JsCast>(outcome: JsFutureResult) -> Result<T, PipelineFailure> {
    match outcome {
        Ok(value) => Ok(value.unchecked_into()),
        Err(error) if !error.is_null() && !error.is_undefined() => {
            let reason = js_sys::Reflect::get(&error, &JsValue::from_str("reason"))
                .ok()
                .and_then(|reason| reason.as_string());
            let reason = match reason.as_deref() {
                Some("validation") => PipelineFailureReason::Validation,
                _ => PipelineFailureReason::Internal,
            };
            Err(PipelineFailure {
                message: error_message(&error).unwrap_or_default(),
                reason,
            })
        }
        Err(_) => Err(PipelineFailure {
            message: UNKNOWN_MESSAGE.to_string(),
            reason: PipelineFailureReason::Internal,
        }),
    }
}

/// Classify the outcome of `GPUBuffer.mapAsync()`.
///
/// `AbortError` (buffer destroyed mid-mapping) discards any message the host
/// attached; `OperationError` is a mapping validation failure.
pub fn classify_buffer_map(outcome: JsFutureResult) -> Result<(), BufferMapFailure> {
    match outcome {
        Ok(_) => Ok(()),
        Err(error) => match error_discriminator(&error).as_deref() {
            Some("AbortError") => Err(BufferMapFailure::Aborted),
            Some("OperationError") => Err(BufferMapFailure::Validation {
                message: message_or_unknown(&error),
            }),
            _ => Err(BufferMapFailure::Unknown {
                message: message_or_unknown(&error),
            }),
        },
    }
}

/// Classify the value `GPUDevice.popErrorScope()` resolved with.
///
/// The pop promise itself always resolves; a null or undefined value means the
/// scope captured nothing. An unrecognized error object classifies as
/// `Validation`, the most conservative recoverable category.
pub fn classify_error_scope_pop(outcome: JsFutureResult) -> Option<ErrorCategory> {
    let value = outcome.ok()?;
    if value.is_null() || value.is_undefined() {
        return None;
    }
    Some(categorize_gpu_error(&value))
}

/// Classify a GPU error object by its discriminator.
pub(crate) fn categorize_gpu_error(value: &JsValue) -> ErrorCategory {
    let message = error_message(value).unwrap_or_default();
    match error_discriminator(value).as_deref() {
        Some("GPUOutOfMemoryError") => ErrorCategory::OutOfMemory { message },
        Some("GPUInternalError") => ErrorCategory::Internal { message },
        // "GPUValidationError", and the lossy default for kinds this layer
        // does not recognize.
        _ => ErrorCategory::Validation { message },
    }
}

/// Classify an `uncapturederror` event by its `error` field.
pub fn classify_uncaptured_error(event: &JsValue) -> ErrorCategory {
    match js_sys::Reflect::get(event, &JsValue::from_str("error")) {
        Ok(error) if !error.is_null() && !error.is_undefined() => categorize_gpu_error(&error),
        _ => ErrorCategory::Validation {
            message: UNKNOWN_MESSAGE.to_string(),
        },
    }
}

/// Classify the value the device-loss promise resolved with.
///
/// The loss promise never rejects; a rejected or malformed outcome still
/// yields an event, with the unknown reason and an empty message.
pub fn classify_device_loss(outcome: JsFutureResult) -> DeviceLossEvent {
    let value = outcome.unwrap_or(JsValue::UNDEFINED);
    let reason = js_sys::Reflect::get(&value, &JsValue::from_str("reason"))
        .ok()
        .and_then(|reason| reason.as_string());
    let reason = match reason.as_deref() {
        Some("destroyed") => DeviceLossReason::Destroyed,
        _ => DeviceLossReason::Unknown,
    };
    DeviceLossEvent {
        reason,
        message: error_message(&value).unwrap_or_default(),
    }
}
