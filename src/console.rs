//! Browser console logging.
//!
//! Forwards to `web_sys::console` on wasm. Native builds (unit tests) drop
//! the message, since `web_sys` bindings panic outside a browser.

#[cfg(target_arch = "wasm32")]
pub fn log(msg: &str) {
    web_sys::console::log_1(&msg.into());
}

#[cfg(target_arch = "wasm32")]
pub fn warn(msg: &str) {
    web_sys::console::warn_1(&msg.into());
}

#[cfg(not(target_arch = "wasm32"))]
pub fn log(_msg: &str) {}

#[cfg(not(target_arch = "wasm32"))]
pub fn warn(_msg: &str) {}
