use crate::components::{AudioController, AudioState, Player, QueuePanel, Visualizer};
use crate::library::{load_playlist, Track};
use crate::settings::{load_settings, save_settings, AppSettings};
use dioxus::prelude::*;

const PLAYLIST_MANIFEST: Asset = asset!("/assets/playlist.json");

/// Shared volume level, 0.0 to 1.0.
#[derive(Clone, Copy)]
pub struct VolumeSignal(pub Signal<f64>);

/// Bumped on every explicit track pick so re-selecting the current track
/// still forces a reload (the retry path after a source error).
#[derive(Clone, Copy)]
pub struct SelectionSignal(pub Signal<u64>);

fn normalize_volume(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.8;
    }
    value.clamp(0.0, 1.0)
}

#[component]
pub fn AppShell() -> Element {
    let mut queue = use_signal(Vec::<Track>::new);
    let mut queue_index = use_signal(|| 0usize);
    let now_playing = use_signal(|| None::<Track>);
    let mut volume = use_signal(|| 0.8f64);
    let selection = use_signal(|| 0u64);
    let audio_state = use_signal(AudioState::default);
    let mut settings_loaded = use_signal(|| false);

    // Provide state via context
    use_context_provider(|| queue);
    use_context_provider(|| queue_index);
    use_context_provider(|| now_playing);
    use_context_provider(|| VolumeSignal(volume));
    use_context_provider(|| SelectionSignal(selection));
    use_context_provider(|| audio_state);

    // Load saved settings and the playlist manifest on mount
    use_effect(move || {
        spawn(async move {
            let settings = load_settings().await;
            volume.set(normalize_volume(settings.volume));
            settings_loaded.set(true);

            let tracks = load_playlist(&PLAYLIST_MANIFEST.to_string()).await;
            if !tracks.is_empty() {
                queue.set(tracks);
                queue_index.set(0);
            }
        });
    });

    // Persist the volume when it changes
    use_effect(move || {
        let level = normalize_volume(volume());
        if !settings_loaded() {
            return;
        }
        spawn(async move {
            let _ = save_settings(AppSettings { volume: level }).await;
        });
    });

    rsx! {
        div { class: "app-container",
            header { class: "app-header",
                span { class: "app-title", "wavetap" }
                span { class: "app-subtitle", "local queue, transport, spectrum" }
            }
            main { class: "app-main",
                QueuePanel {}
            }
            div { class: "app-dock",
                Visualizer {}
                Player {}
            }
        }

        // Audio controller - manages playback separately from UI
        AudioController {}
    }
}
