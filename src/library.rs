//! Track model and the playlist manifest source.
//!
//! The queue itself lives in app signals; this module only knows how to
//! describe a track and fetch the manifest the queue is seeded from.

use serde::{Deserialize, Serialize};

#[cfg(target_arch = "wasm32")]
use crate::diagnostics;

/// A single remotely-hosted track. Immutable; supplied by the playlist
/// manifest. `url` is opaque to the playback stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default, alias = "coverArt")]
    pub cover_art: Option<String>,
    /// Manifest-declared duration in seconds, shown until metadata loads.
    #[serde(default)]
    pub duration: u32,
    pub url: String,
}

/// Format seconds as m:ss for the transport time labels.
pub fn format_duration(seconds: u32) -> String {
    let mins = seconds / 60;
    let secs = seconds % 60;
    format!("{}:{:02}", mins, secs)
}

/// Fetch the playlist manifest. Failures degrade to an empty queue; the
/// player renders its "no track" placeholder in that case.
#[cfg(target_arch = "wasm32")]
pub async fn load_playlist(manifest_url: &str) -> Vec<Track> {
    let response = match gloo_net::http::Request::get(manifest_url).send().await {
        Ok(response) => response,
        Err(err) => {
            diagnostics::warn("library", &format!("playlist manifest fetch failed: {err}"));
            return Vec::new();
        }
    };

    match response.json::<Vec<Track>>().await {
        Ok(tracks) => tracks,
        Err(err) => {
            diagnostics::warn("library", &format!("playlist manifest parse failed: {err}"));
            Vec::new()
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub async fn load_playlist(_manifest_url: &str) -> Vec<Track> {
    Vec::new()
}
