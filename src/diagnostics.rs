//! Console logging helpers shared by the playback stack.
//!
//! Swallowed abort-class failures and silent automatic start failures are
//! still logged here so the policy stays observable.

#[cfg(target_arch = "wasm32")]
pub fn log(scope: &str, message: &str) {
    web_sys::console::log_1(&format!("[{scope}] {message}").into());
}

#[cfg(not(target_arch = "wasm32"))]
pub fn log(scope: &str, message: &str) {
    eprintln!("[{scope}] {message}");
}

#[cfg(target_arch = "wasm32")]
pub fn warn(scope: &str, message: &str) {
    web_sys::console::warn_1(&format!("[{scope}] {message}").into());
}

#[cfg(not(target_arch = "wasm32"))]
pub fn warn(scope: &str, message: &str) {
    eprintln!("[{scope}] warn: {message}");
}
