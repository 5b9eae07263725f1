//! Transport bar: now-playing readout, play/pause, track stepping, the
//! scrubber, and the volume slider.

use dioxus::prelude::*;

use crate::components::{
    advance_next, advance_previous, request_toggle_play, seek_to, AudioState, Icon,
    SelectionSignal, VolumeSignal,
};
use crate::library::{format_duration, Track};

#[component]
pub fn Player() -> Element {
    let now_playing = use_context::<Signal<Option<Track>>>();
    let mut volume = use_context::<VolumeSignal>().0;
    let mut audio_state = use_context::<Signal<AudioState>>();

    let current_track = now_playing();

    // Signal fields need to be read with ()
    let current_time = (audio_state().current_time)();
    let duration = (audio_state().duration)();
    let playback_error = (audio_state().playback_error)();

    // Prefer the element-reported duration once metadata has loaded; fall
    // back to the manifest value before that.
    let total_seconds = if duration > 0.0 {
        Some(duration as u32)
    } else {
        current_track.as_ref().map(|track| track.duration)
    };
    let progress_percent = match total_seconds {
        Some(total) if total > 0 => (current_time / total as f64 * 100.0).clamp(0.0, 100.0),
        _ => 0.0,
    };

    let mut apply_seek = move |value: String| {
        let Ok(percent) = value.parse::<f64>() else {
            return;
        };
        let Some(total) = total_seconds.filter(|total| *total > 0) else {
            return;
        };
        let position = (percent.clamp(0.0, 100.0) / 100.0) * total as f64;
        // Optimistic update so the thumb does not snap back while the
        // element catches up.
        audio_state.write().current_time.set(position);
        seek_to(position);
    };

    let on_volume = move |event: Event<FormData>| {
        if let Ok(value) = event.value().parse::<f64>() {
            volume.set((value / 100.0).clamp(0.0, 1.0));
        }
    };

    rsx! {
        footer { class: "player-shell",
            if let Some(message) = playback_error.clone() {
                div { class: "player-error-banner",
                    Icon { name: "warning".to_string(), class: "icon icon-warning".to_string() }
                    span { "{message}" }
                }
            }
            div { class: "player-row",
                div { class: "player-track",
                    match &current_track {
                        Some(track) => rsx! {
                            div { class: "player-cover",
                                match &track.cover_art {
                                    Some(url) => rsx! {
                                        img { src: "{url}", alt: "{track.title}", loading: "lazy" }
                                    },
                                    None => rsx! {
                                        Icon {
                                            name: "music".to_string(),
                                            class: "icon player-cover-placeholder".to_string(),
                                        }
                                    },
                                }
                            }
                            div { class: "player-track-info",
                                p { class: "player-track-title", "{track.title}" }
                                p { class: "player-track-artist",
                                    {track.artist.clone().unwrap_or_default()}
                                }
                            }
                        },
                        None => rsx! {
                            div { class: "player-cover player-cover-empty",
                                Icon {
                                    name: "music".to_string(),
                                    class: "icon player-cover-placeholder".to_string(),
                                }
                            }
                            div { class: "player-track-info",
                                p { class: "player-track-title", "Nothing playing" }
                                p { class: "player-track-artist", "Pick a track from the queue" }
                            }
                        },
                    }
                }
                div { class: "player-controls",
                    div { class: "player-buttons",
                        PrevButton {}
                        PlayPauseButton {}
                        NextButton {}
                    }
                    div { class: "player-progress",
                        span { class: "player-time", {format_duration(current_time as u32)} }
                        input {
                            r#type: "range",
                            class: "player-scrubber",
                            min: "0",
                            max: "100",
                            step: "0.1",
                            value: "{progress_percent}",
                            disabled: current_track.is_none(),
                            oninput: move |event| apply_seek(event.value()),
                        }
                        span { class: "player-time",
                            {total_seconds.map(format_duration).unwrap_or_else(|| "--:--".to_string())}
                        }
                    }
                }
                div { class: "player-volume",
                    Icon { name: "volume".to_string(), class: "icon".to_string() }
                    input {
                        r#type: "range",
                        class: "player-volume-slider",
                        min: "0",
                        max: "100",
                        value: "{(volume() * 100.0) as u32}",
                        oninput: on_volume,
                    }
                }
            }
        }
    }
}

#[component]
fn PlayPauseButton() -> Element {
    let audio_state = use_context::<Signal<AudioState>>();
    let now_playing = use_context::<Signal<Option<Track>>>();

    let playing = (audio_state().is_playing)();
    let errored = (audio_state().playback_error)().is_some();

    rsx! {
        button {
            r#type: "button",
            class: "player-button player-button-primary",
            aria_label: if playing { "Pause" } else { "Play" },
            // An errored source cannot restart from here; picking the track
            // again in the queue reloads it.
            disabled: errored || now_playing().is_none(),
            onclick: move |_| request_toggle_play(),
            if playing {
                Icon { name: "pause".to_string(), class: "icon".to_string() }
            } else {
                Icon { name: "play".to_string(), class: "icon".to_string() }
            }
        }
    }
}

#[component]
fn PrevButton() -> Element {
    let queue_index = use_context::<Signal<usize>>();
    let mut selection = use_context::<SelectionSignal>().0;

    rsx! {
        button {
            r#type: "button",
            class: "player-button",
            aria_label: "Previous track",
            onclick: move |_| {
                advance_previous(queue_index);
                let next = *selection.peek() + 1;
                selection.set(next);
            },
            Icon { name: "prev".to_string(), class: "icon".to_string() }
        }
    }
}

#[component]
fn NextButton() -> Element {
    let queue = use_context::<Signal<Vec<Track>>>();
    let queue_index = use_context::<Signal<usize>>();
    let mut selection = use_context::<SelectionSignal>().0;

    rsx! {
        button {
            r#type: "button",
            class: "player-button",
            aria_label: "Next track",
            onclick: move |_| {
                advance_next(queue, queue_index);
                let next = *selection.peek() + 1;
                selection.set(next);
            },
            Icon { name: "next".to_string(), class: "icon".to_string() }
        }
    }
}
