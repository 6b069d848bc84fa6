//! Browser implementation of the host capabilities.

mod media_devices;
mod media_track;

use js_sys::Reflect;
use wasm_bindgen::{prelude::*, JsCast as _};

use crate::platform;

pub use self::{
    media_devices::WebMediaDevices, media_track::WebMediaStreamTrack,
};

/// Initializes the module: sets the panic hook and the logger.
#[wasm_bindgen(start)]
pub fn start() {
    set_panic_hook();
    init_logger();
}

/// When the `console_error_panic_hook` feature is enabled, we can call the
/// `set_panic_hook` function at least once during initialization, and then
/// we will get better error messages if our code ever panics.
///
/// For more details see:
/// <https://github.com/rustwasm/console_error_panic_hook#readme>
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Initializes [`wasm_logger`] as default application logger.
///
/// [`wasm_logger`]: https://docs.rs/wasm-logger
pub fn init_logger() {
    wasm_logger::init(wasm_logger::Config::default());
}

/// Returns property of JS object by name if its defined.
/// Converts the value with a given predicate.
pub(crate) fn get_property_by_name<T, F, U>(
    value: &T,
    name: &str,
    into: F,
) -> Option<U>
where
    T: AsRef<JsValue>,
    F: Fn(JsValue) -> Option<U>,
{
    Reflect::get(value.as_ref(), &JsValue::from_str(name))
        .ok()
        .and_then(into)
}

/// Returns a JS function stored in the given property of the given object.
pub(crate) fn get_function<T: AsRef<JsValue>>(
    value: &T,
    name: &str,
) -> Option<js_sys::Function> {
    get_property_by_name(value, name, |v| v.dyn_into().ok())
}

impl From<JsValue> for platform::Error {
    fn from(val: JsValue) -> Self {
        let name = get_property_by_name(&val, "name", |v| v.as_string())
            .unwrap_or_else(|| "Error".to_owned());
        let message = get_property_by_name(&val, "message", |v| v.as_string())
            .or_else(|| val.as_string())
            .unwrap_or_default();
        Self::new(name, message)
    }
}
