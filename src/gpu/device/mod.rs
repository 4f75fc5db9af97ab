// GPU Device Management
// Wraps the host GPUDevice and its error reporting protocol
// Main responsibilities:
// - Push/pop error scopes with typed captured-error classification
// - Await terminal device loss as a single-shot, memoised event
// - Fan uncaptured-error events out to locally registered handlers
// - Hand out queue and raw-handle access for resource creation

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{GpuDevice, GpuErrorFilter, GpuUncapturedErrorEvent};

use crate::error::classify::{
    classify_device_loss, classify_error_scope_pop, classify_uncaptured_error,
};
use crate::error::{DeviceLossEvent, ErrorCategory, ErrorScopeFilter};
use crate::gpu::queue::Queue;

type ErrorHandler = Rc<dyn Fn(&ErrorCategory)>;

/// Deregistration token returned by [`Device::on_uncaptured_error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UncapturedErrorToken(u64);

struct DeviceShared {
    inner: GpuDevice,
    // Memoised loss event; the host fires device loss at most once.
    lost: RefCell<Option<DeviceLossEvent>>,
    handlers: RefCell<Vec<(u64, ErrorHandler)>>,
    next_token: Cell<u64>,
    // The single host-side onuncapturederror dispatcher, installed while at
    // least one handler is registered.
    dispatch: RefCell<Option<Closure<dyn FnMut(GpuUncapturedErrorEvent)>>>,
}

impl Drop for DeviceShared {
    fn drop(&mut self) {
        if self.dispatch.borrow().is_some() {
            self.inner.set_onuncapturederror(None);
        }
    }
}

/// Wrapper around a host `GPUDevice` handle.
///
/// Clones alias the same host object and share the loss cache and the
/// uncaptured-error handler registry. All mutation serialization is the
/// host's job; nothing is locked locally.
#[derive(Clone)]
pub struct Device {
    shared: Rc<DeviceShared>,
}

impl Device {
    pub fn from_raw(inner: GpuDevice) -> Self {
        Self {
            shared: Rc::new(DeviceShared {
                inner,
                lost: RefCell::new(None),
                handlers: RefCell::new(Vec::new()),
                next_token: Cell::new(0),
                dispatch: RefCell::new(None),
            }),
        }
    }

    pub fn raw(&self) -> &GpuDevice {
        &self.shared.inner
    }

    pub fn queue(&self) -> Queue {
        Queue::from_raw(self.shared.inner.queue())
    }

    /// Begin capturing errors of the given class on the host's scope stack.
    pub fn push_error_scope(&self, filter: ErrorScopeFilter) {
        self.shared.inner.push_error_scope(match filter {
            ErrorScopeFilter::Validation => GpuErrorFilter::Validation,
            ErrorScopeFilter::OutOfMemory => GpuErrorFilter::OutOfMemory,
            ErrorScopeFilter::Internal => GpuErrorFilter::Internal,
        });
    }

    /// Pop the innermost error scope and classify what it captured, if
    /// anything. Scopes must be popped in LIFO order relative to pushes;
    /// popping an empty stack is a host-level usage error.
    pub async fn pop_error_scope(&self) -> Option<ErrorCategory> {
        let outcome = JsFuture::from(self.shared.inner.pop_error_scope()).await;
        classify_error_scope_pop(outcome)
    }

    /// Run `operation` inside an error scope of the given class.
    ///
    /// Push, operation and pop are three independent host calls; a concurrent
    /// task's GPU work can interleave between them unless the caller
    /// serializes access to the device.
    pub async fn with_error_scope<T, F, Fut>(
        &self,
        filter: ErrorScopeFilter,
        operation: F,
    ) -> Result<T, ErrorCategory>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        self.push_error_scope(filter);
        let value = operation().await;
        match self.pop_error_scope().await {
            Some(error) => Err(error),
            None => Ok(value),
        }
    }

    /// Wait for the device to be lost.
    ///
    /// Resolves at most once per device on the host side; after the first
    /// resolution every call returns the same event without another host
    /// call. The returned event is terminal: the device cannot create new
    /// resources and the caller must re-acquire one.
    pub async fn lost(&self) -> DeviceLossEvent {
        if let Some(event) = self.shared.lost.borrow().clone() {
            return event;
        }
        let outcome = JsFuture::from(self.shared.inner.lost()).await;
        let event = classify_device_loss(outcome);
        *self.shared.lost.borrow_mut() = Some(event.clone());
        event
    }

    /// Register a handler for uncaptured GPU errors.
    ///
    /// Handlers fire in registration order, once per event, until
    /// deregistered with [`Device::remove_uncaptured_error_handler`]. A
    /// single host-side event listener dispatches to all of them.
    pub fn on_uncaptured_error(
        &self,
        handler: impl Fn(&ErrorCategory) + 'static,
    ) -> UncapturedErrorToken {
        let token = self.shared.next_token.get();
        self.shared.next_token.set(token + 1);
        self.shared
            .handlers
            .borrow_mut()
            .push((token, Rc::new(handler)));
        if self.shared.dispatch.borrow().is_none() {
            self.install_dispatch();
        }
        UncapturedErrorToken(token)
    }

    /// Deregister a previously registered uncaptured-error handler. Removing
    /// the last handler uninstalls the host-side listener.
    pub fn remove_uncaptured_error_handler(&self, token: UncapturedErrorToken) {
        let mut handlers = self.shared.handlers.borrow_mut();
        handlers.retain(|(id, _)| *id != token.0);
        if handlers.is_empty() {
            drop(handlers);
            self.shared.inner.set_onuncapturederror(None);
            *self.shared.dispatch.borrow_mut() = None;
        }
    }

    /// Register a handler that logs uncaptured errors to the browser console.
    pub fn log_uncaptured_errors(&self) -> UncapturedErrorToken {
        self.on_uncaptured_error(|error| {
            crate::console_log!("uncaptured GPU error: {error}");
        })
    }

    /// Release the device and all resources created from it. Triggers the
    /// host's device-loss notification with the `destroyed` reason.
    pub fn destroy(&self) {
        self.shared.inner.destroy();
    }

    fn install_dispatch(&self) {
        let weak = Rc::downgrade(&self.shared);
        let dispatch = Closure::wrap(Box::new(move |event: GpuUncapturedErrorEvent| {
            let Some(shared) = weak.upgrade() else {
                return;
            };
            let error = classify_uncaptured_error(event.as_ref());
            // Snapshot the registry so handlers may register or deregister
            // from inside the callback.
            let handlers: Vec<ErrorHandler> = shared
                .handlers
                .borrow()
                .iter()
                .map(|(_, handler)| handler.clone())
                .collect();
            for handler in handlers {
                handler(&error);
            }
        }) as Box<dyn FnMut(GpuUncapturedErrorEvent)>);
        self.shared
            .inner
            .set_onuncapturederror(Some(dispatch.as_ref().unchecked_ref()));
        *self.shared.dispatch.borrow_mut() = Some(dispatch);
    }
}
