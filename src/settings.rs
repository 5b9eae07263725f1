//! App settings persisted in LocalStorage. Playback position is
//! deliberately never stored; only the volume survives a reload.

use serde::{Deserialize, Serialize};

#[cfg(target_arch = "wasm32")]
use gloo_storage::{errors::StorageError, LocalStorage, Storage};

#[cfg(target_arch = "wasm32")]
const SETTINGS_KEY: &str = "wavetap.app_settings";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    pub volume: f64,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self { volume: 0.8 }
    }
}

#[cfg(target_arch = "wasm32")]
pub async fn save_settings(settings: AppSettings) -> Result<(), StorageError> {
    LocalStorage::set(SETTINGS_KEY, settings)
}

#[cfg(target_arch = "wasm32")]
pub async fn load_settings() -> AppSettings {
    LocalStorage::get(SETTINGS_KEY).unwrap_or_default()
}

#[cfg(not(target_arch = "wasm32"))]
pub async fn save_settings(_settings: AppSettings) -> Result<(), std::convert::Infallible> {
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
pub async fn load_settings() -> AppSettings {
    AppSettings::default()
}
