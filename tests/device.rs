// Device protocol tests over duck-typed host handles.
// web-sys bindings are structural, so plain objects carrying the right
// properties stand in for a real GPUDevice; no GPU required.

#![cfg(target_arch = "wasm32")]

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_test::*;

use webgpu_bridge::{Device, DeviceLossReason, ErrorCategory};

wasm_bindgen_test_configure!(run_in_browser);

fn fake_device(body: &str) -> web_sys::GpuDevice {
    js_sys::eval(&format!("({{ {body} }})"))
        .unwrap()
        .unchecked_into()
}

#[wasm_bindgen_test]
async fn lost_is_memoised_after_first_resolution() {
    let raw = fake_device("lost: Promise.resolve({ reason: 'destroyed', message: 'device gone' })");
    let device = Device::from_raw(raw.clone());

    let first = device.lost().await;
    assert_eq!(first.reason, DeviceLossReason::Destroyed);
    assert_eq!(first.message, "device gone");

    // Swap the host promise out from under the wrapper; the cached event
    // must win over a second host read.
    let replacement =
        js_sys::eval("Promise.resolve({ reason: 'unknown', message: 'other' })").unwrap();
    js_sys::Reflect::set(raw.as_ref(), &JsValue::from_str("lost"), &replacement).unwrap();

    let second = device.lost().await;
    assert_eq!(second, first);

    // Clones alias the same cache.
    let third = device.clone().lost().await;
    assert_eq!(third, first);
}

#[wasm_bindgen_test]
async fn lost_memoises_malformed_resolutions_too() {
    let raw = fake_device("lost: Promise.resolve(undefined)");
    let device = Device::from_raw(raw);

    let first = device.lost().await;
    assert_eq!(first.reason, DeviceLossReason::Unknown);
    assert_eq!(first.message, "");
    assert_eq!(device.lost().await, first);
}

#[wasm_bindgen_test]
fn uncaptured_error_handlers_fire_in_order_until_removed() {
    let raw = fake_device("");
    let device = Device::from_raw(raw.clone());
    let seen: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));

    let first = {
        let seen = seen.clone();
        device.on_uncaptured_error(move |error: &ErrorCategory| {
            seen.borrow_mut().push(format!("first: {}", error.message()));
        })
    };
    let _second = {
        let seen = seen.clone();
        device.on_uncaptured_error(move |error: &ErrorCategory| {
            seen.borrow_mut().push(format!("second: {}", error.message()));
        })
    };

    // Registering handlers installs a single host-side listener; fire it by
    // hand with a synthetic event.
    let listener = js_sys::Reflect::get(raw.as_ref(), &JsValue::from_str("onuncapturederror"))
        .unwrap()
        .dyn_into::<js_sys::Function>()
        .unwrap();
    let event = js_sys::eval(
        "({ error: new (class GPUValidationError { constructor() { this.message = 'boom'; } }) })",
    )
    .unwrap();
    listener.call1(&JsValue::NULL, &event).unwrap();
    assert_eq!(*seen.borrow(), vec!["first: boom", "second: boom"]);

    device.remove_uncaptured_error_handler(first);
    listener.call1(&JsValue::NULL, &event).unwrap();
    assert_eq!(seen.borrow().last().map(String::as_str), Some("second: boom"));
    assert_eq!(seen.borrow().len(), 3);
}

#[wasm_bindgen_test]
fn removing_the_last_handler_uninstalls_the_listener() {
    let raw = fake_device("");
    let device = Device::from_raw(raw.clone());

    let token = device.on_uncaptured_error(|_: &ErrorCategory| {});
    let installed =
        js_sys::Reflect::get(raw.as_ref(), &JsValue::from_str("onuncapturederror")).unwrap();
    assert!(installed.is_function());

    device.remove_uncaptured_error_handler(token);
    let cleared =
        js_sys::Reflect::get(raw.as_ref(), &JsValue::from_str("onuncapturederror")).unwrap();
    assert!(cleared.is_null() || cleared.is_undefined());
}
