// Typed GPU error taxonomy
// Every failure a host WebGPU call can report is mapped onto one of the
// types in this module at the moment the call resolves or rejects.
// Main responsibilities:
// - Classify captured/uncaptured GPU errors into a closed set of categories
// - Give device request, pipeline creation and buffer mapping their own
//   failure types, matching how the host surfaces each of them
// - Represent terminal device loss separately from recoverable errors

use std::fmt;

pub mod classify;

/// Category of an error captured by an error scope or reported through the
/// device's uncaptured-error event.
///
/// The category is fixed once, when the host error object is classified, and
/// never changes afterwards. `Validation` and `OutOfMemory` are recoverable by
/// the caller (fix the arguments, reduce resource demands); `Internal` may
/// succeed on a different device or configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErrorCategory {
    #[error("validation error: {message}")]
    Validation { message: String },
    #[error("out of memory: {message}")]
    OutOfMemory { message: String },
    #[error("internal GPU error: {message}")]
    Internal { message: String },
}

impl ErrorCategory {
    /// Human-readable message sourced from the host error object.
    pub fn message(&self) -> &str {
        match self {
            Self::Validation { message } | Self::OutOfMemory { message } | Self::Internal { message } => message,
        }
    }
}

/// Why requesting a logical device from an adapter failed.
///
/// `TypeError` means a requested feature is not supported; `OperationError`
/// covers unsupported limits and adapters that were already consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceRequestErrorKind {
    OperationError,
    TypeError,
}

/// Failure of an adapter's device request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("device request failed: {message}")]
pub struct DeviceRequestFailure {
    pub kind: DeviceRequestErrorKind,
    pub message: String,
}

/// Why an asynchronous pipeline creation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineFailureReason {
    Validation,
    Internal,
}

impl fmt::Display for PipelineFailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::Internal => write!(f, "internal"),
        }
    }
}

/// Failure of `createRenderPipelineAsync` / `createComputePipelineAsync`.
///
/// Pipeline creation failures reject the async call directly instead of going
/// through the error-scope mechanism, so this is not an [`ErrorCategory`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("pipeline creation failed ({reason}): {message}")]
pub struct PipelineFailure {
    pub message: String,
    pub reason: PipelineFailureReason,
}

/// Failure of an asynchronous buffer mapping.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BufferMapFailure {
    #[error("buffer mapping rejected: {message}")]
    Validation { message: String },
    /// The buffer was destroyed while the mapping was in flight.
    #[error("buffer mapping aborted")]
    Aborted,
    #[error("buffer mapping failed: {message}")]
    Unknown { message: String },
}

/// Error filter pushed onto the device's error scope stack.
///
/// The stack itself lives in the host; scopes nest LIFO and popping without a
/// matching push is a host-level usage error this layer does not intercept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorScopeFilter {
    Validation,
    OutOfMemory,
    Internal,
}

/// Why a device became permanently unusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceLossReason {
    Unknown,
    Destroyed,
}

/// Terminal device-loss notification. Fires at most once per device; after it
/// fires the device cannot create new resources and must be re-acquired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceLossEvent {
    pub reason: DeviceLossReason,
    pub message: String,
}

/// Failure while setting up the WebGPU context for a canvas.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InitError {
    #[error("no global window object")]
    NoGlobalWindow,
    #[error("WebGPU is not supported in this browser")]
    WebGpuUnsupported,
    #[error("no suitable GPU adapter found")]
    AdapterUnavailable,
    #[error(transparent)]
    Device(#[from] DeviceRequestFailure),
    #[error("failed to get a webgpu canvas context: {0}")]
    CanvasContext(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_failure_round_trip() {
        let failure = PipelineFailure {
            message: "m".to_string(),
            reason: PipelineFailureReason::Validation,
        };
        assert_eq!(failure.message, "m");
        assert_eq!(failure.reason, PipelineFailureReason::Validation);
        assert_eq!(failure.to_string(), "pipeline creation failed (validation): m");
    }

    #[test]
    fn error_category_message_accessor() {
        let validation = ErrorCategory::Validation { message: "bad usage".to_string() };
        let oom = ErrorCategory::OutOfMemory { message: "alloc failed".to_string() };
        let internal = ErrorCategory::Internal { message: "shader too complex".to_string() };
        assert_eq!(validation.message(), "bad usage");
        assert_eq!(oom.message(), "alloc failed");
        assert_eq!(internal.message(), "shader too complex");
    }

    #[test]
    fn device_request_failure_display() {
        let failure = DeviceRequestFailure {
            kind: DeviceRequestErrorKind::TypeError,
            message: "feature not supported".to_string(),
        };
        assert_eq!(failure.to_string(), "device request failed: feature not supported");
        assert_eq!(failure.kind, DeviceRequestErrorKind::TypeError);
    }

    #[test]
    fn buffer_map_failure_variants() {
        assert_eq!(BufferMapFailure::Aborted.to_string(), "buffer mapping aborted");
        let validation = BufferMapFailure::Validation { message: "not mappable".to_string() };
        assert_eq!(validation.to_string(), "buffer mapping rejected: not mappable");
        assert_ne!(validation, BufferMapFailure::Aborted);
    }

    #[test]
    fn device_loss_event_is_a_plain_value() {
        let event = DeviceLossEvent {
            reason: DeviceLossReason::Destroyed,
            message: "device.destroy() called".to_string(),
        };
        // Repeated reads of a loss event observe the same reason and message.
        assert_eq!(event.clone(), event);
    }

    #[test]
    fn init_error_wraps_device_request_failure() {
        let failure = DeviceRequestFailure {
            kind: DeviceRequestErrorKind::OperationError,
            message: "adapter consumed".to_string(),
        };
        let error = InitError::from(failure.clone());
        assert_eq!(error, InitError::Device(failure));
        assert_eq!(error.to_string(), "device request failed: adapter consumed");
    }
}
