//! Audio manager - owns the playback element outside the render cycle so
//! unrelated UI state changes can never restart audio.

pub mod controller;

#[cfg(target_arch = "wasm32")]
pub mod audio_graph;

use dioxus::prelude::*;

pub use controller::PlaybackState;

#[cfg(target_arch = "wasm32")]
use std::cell::RefCell;
#[cfg(target_arch = "wasm32")]
use std::rc::Rc;

#[cfg(target_arch = "wasm32")]
use dioxus::core::{Runtime, RuntimeGuard};
#[cfg(target_arch = "wasm32")]
use futures_util::FutureExt;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
#[cfg(target_arch = "wasm32")]
use wasm_bindgen_futures::JsFuture;
#[cfg(target_arch = "wasm32")]
use web_sys::{window, HtmlAudioElement};

#[cfg(target_arch = "wasm32")]
use crate::components::{advance_next, SelectionSignal, VolumeSignal};
#[cfg(target_arch = "wasm32")]
use crate::diagnostics;
#[cfg(target_arch = "wasm32")]
use crate::library::Track;

#[cfg(target_arch = "wasm32")]
use controller::{MediaElement, MediaEvent, PlayError, PlayerHandle, StartFuture};

/// Global audio state that persists across renders. Mirrors the playback
/// controller; the views only ever read these signals.
#[derive(Clone)]
pub struct AudioState {
    pub is_playing: Signal<bool>,
    pub current_time: Signal<f64>,
    pub duration: Signal<f64>,
    pub playback_error: Signal<Option<String>>,
}

impl Default for AudioState {
    fn default() -> Self {
        Self {
            is_playing: Signal::new(false),
            current_time: Signal::new(0.0),
            duration: Signal::new(0.0),
            playback_error: Signal::new(None),
        }
    }
}

/// Initialize the global audio element once.
#[cfg(target_arch = "wasm32")]
pub fn get_or_create_audio_element() -> Option<HtmlAudioElement> {
    let document = window()?.document()?;

    if let Some(existing) = document.get_element_by_id("wavetap-audio") {
        return existing.dyn_into::<HtmlAudioElement>().ok();
    }

    let audio: HtmlAudioElement = document.create_element("audio").ok()?.dyn_into().ok()?;
    audio.set_id("wavetap-audio");
    // Keep preload light so we stream instead of buffering entire files
    audio.set_attribute("preload", "metadata").ok()?;
    // The analysis graph taps the element; cross-origin sources need CORS.
    audio.set_cross_origin(Some("anonymous"));
    document.body()?.append_child(&audio).ok()?;

    Some(audio)
}

#[cfg(not(target_arch = "wasm32"))]
#[allow(dead_code)]
pub fn get_or_create_audio_element() -> Option<()> {
    None
}

#[cfg(target_arch = "wasm32")]
thread_local! {
    static PLAYER: RefCell<Option<PlayerHandle<WebMediaElement>>> = const { RefCell::new(None) };
}

#[cfg(target_arch = "wasm32")]
fn with_player<R>(f: impl FnOnce(&PlayerHandle<WebMediaElement>) -> R) -> Option<R> {
    PLAYER.with(|slot| slot.borrow().as_ref().map(f))
}

#[cfg(target_arch = "wasm32")]
fn classify_play_rejection(err: &JsValue) -> PlayError {
    let name = js_sys::Reflect::get(err, &"name".into())
        .ok()
        .and_then(|value| value.as_string())
        .unwrap_or_default();
    if name == "AbortError" {
        return PlayError::Aborted;
    }
    let message = js_sys::Reflect::get(err, &"message".into())
        .ok()
        .and_then(|value| value.as_string())
        .unwrap_or_else(|| "playback request rejected".to_string());
    PlayError::Rejected(format!("{name}: {message}"))
}

/// [`controller::MediaElement`] over the page's single hidden `<audio>`
/// element, resolved by id on every call to match its page lifetime.
#[cfg(target_arch = "wasm32")]
pub struct WebMediaElement;

#[cfg(target_arch = "wasm32")]
impl MediaElement for WebMediaElement {
    fn set_source(&self, url: &str) {
        if let Some(audio) = get_or_create_audio_element() {
            if url.is_empty() {
                let _ = audio.remove_attribute("src");
            } else {
                audio.set_src(url);
            }
        }
    }

    fn load(&self) {
        if let Some(audio) = get_or_create_audio_element() {
            audio.load();
        }
    }

    fn begin_play(&self) -> StartFuture {
        let Some(audio) = get_or_create_audio_element() else {
            return async { Err(PlayError::Rejected("audio element unavailable".to_string())) }
                .boxed_local();
        };
        match audio.play() {
            Ok(promise) => async move {
                JsFuture::from(promise)
                    .await
                    .map(|_| ())
                    .map_err(|err| classify_play_rejection(&err))
            }
            .boxed_local(),
            Err(err) => {
                let rejection = classify_play_rejection(&err);
                async move { Err(rejection) }.boxed_local()
            }
        }
    }

    fn pause(&self) {
        if let Some(audio) = get_or_create_audio_element() {
            let _ = audio.pause();
        }
    }

    fn set_position(&self, seconds: f64) {
        if let Some(audio) = get_or_create_audio_element() {
            audio.set_current_time(seconds);
        }
    }

    fn set_volume(&self, level: f64) {
        if let Some(audio) = get_or_create_audio_element() {
            audio.set_volume(level);
        }
    }

    fn has_buffered_data(&self) -> bool {
        get_or_create_audio_element()
            .map(|audio| audio.ready_state() > 0)
            .unwrap_or(false)
    }

    fn prepare_output(&self) {
        if let Some(audio) = get_or_create_audio_element() {
            let _ = audio_graph::ensure(&audio);
        }
    }

    fn bind_events(&self, track_id: &str, sink: Rc<dyn Fn(MediaEvent)>) {
        let Some(audio) = get_or_create_audio_element() else {
            return;
        };

        // Fresh handlers per load so every event carries the tag of the
        // track it was armed for; set_on* replaces the previous handler.
        let id = track_id.to_string();
        let time_sink = sink.clone();
        // Throttle updates to ~5fps to avoid excessive re-renders
        let mut last_emit = -1.0f64;
        let time_cb = Closure::wrap(Box::new(move || {
            if let Some(audio) = get_or_create_audio_element() {
                let seconds = audio.current_time();
                if (seconds - last_emit).abs() >= 0.2 {
                    last_emit = seconds;
                    time_sink(MediaEvent::TimeProgress {
                        track_id: id.clone(),
                        seconds,
                    });
                }
            }
        }) as Box<dyn FnMut()>);
        audio.set_ontimeupdate(Some(time_cb.as_ref().unchecked_ref()));
        time_cb.forget();

        let id = track_id.to_string();
        let meta_sink = sink.clone();
        let meta_cb = Closure::wrap(Box::new(move || {
            if let Some(audio) = get_or_create_audio_element() {
                let duration = audio.duration();
                if !duration.is_nan() {
                    meta_sink(MediaEvent::MetadataLoaded {
                        track_id: id.clone(),
                        duration,
                    });
                }
            }
        }) as Box<dyn FnMut()>);
        audio.set_onloadedmetadata(Some(meta_cb.as_ref().unchecked_ref()));
        meta_cb.forget();

        let id = track_id.to_string();
        let ended_sink = sink.clone();
        let ended_cb = Closure::wrap(Box::new(move || {
            ended_sink(MediaEvent::Ended {
                track_id: id.clone(),
            });
        }) as Box<dyn FnMut()>);
        audio.set_onended(Some(ended_cb.as_ref().unchecked_ref()));
        ended_cb.forget();

        let id = track_id.to_string();
        let error_sink = sink;
        let error_cb = Closure::wrap(Box::new(move || {
            if let Some(audio) = get_or_create_audio_element() {
                let code = audio.error().map(|e| e.code()).unwrap_or(0);
                diagnostics::warn("playback", &format!("element error event (code {code})"));
            }
            error_sink(MediaEvent::SourceError {
                track_id: id.clone(),
            });
        }) as Box<dyn FnMut()>);
        audio.set_onerror(Some(error_cb.as_ref().unchecked_ref()));
        error_cb.forget();
    }
}

/// User intent: flip play/pause. The controller serializes it against any
/// start operation still in flight.
#[cfg(target_arch = "wasm32")]
pub fn request_toggle_play() {
    if let Some(intent) = with_player(|player| player.toggle_play()) {
        spawn(intent);
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[allow(dead_code)]
pub fn request_toggle_play() {}

/// Seek to a specific position in the current track.
#[cfg(target_arch = "wasm32")]
pub fn seek_to(position: f64) {
    with_player(|player| player.seek(position));
}

#[cfg(not(target_arch = "wasm32"))]
#[allow(dead_code)]
pub fn seek_to(_position: f64) {}

/// Audio controller - manages playback imperatively, outside the views.
#[cfg(not(target_arch = "wasm32"))]
#[component]
pub fn AudioController() -> Element {
    rsx! {}
}

#[cfg(target_arch = "wasm32")]
#[component]
pub fn AudioController() -> Element {
    let queue = use_context::<Signal<Vec<Track>>>();
    let queue_index = use_context::<Signal<usize>>();
    let mut now_playing = use_context::<Signal<Option<Track>>>();
    let volume = use_context::<VolumeSignal>().0;
    let selection = use_context::<SelectionSignal>().0;
    let audio_state = use_context::<Signal<AudioState>>();

    // (track id, selection nonce) of the last load pushed to the controller.
    let mut last_loaded = use_signal(|| (None::<String>, 0u64));

    // One-time setup: create the element and the controller, then poll its
    // state into the UI signals.
    use_effect(move || {
        let Some(_audio) = get_or_create_audio_element() else {
            return;
        };

        let installed = PLAYER.with(|slot| slot.borrow().is_some());
        if !installed {
            let runtime = Runtime::current();
            let queue = queue.clone();
            let queue_index = queue_index.clone();
            let handle = PlayerHandle::new(WebMediaElement, move || {
                // End-of-track fires from a raw element event, outside the
                // component scope.
                let _guard = RuntimeGuard::new(runtime.clone());
                advance_next(queue.clone(), queue_index.clone());
            });
            handle.set_volume(volume.peek().clamp(0.0, 1.0));
            PLAYER.with(|slot| *slot.borrow_mut() = Some(handle));
        }

        let mut is_playing_signal = audio_state.peek().is_playing;
        let mut current_time_signal = audio_state.peek().current_time;
        let mut duration_signal = audio_state.peek().duration;
        let mut playback_error_signal = audio_state.peek().playback_error;

        spawn(async move {
            let mut last_time = -1.0f64;
            let mut last_duration = -1.0f64;
            loop {
                gloo_timers::future::TimeoutFuture::new(200).await;

                let Some(state) = with_player(|player| player.state()) else {
                    continue;
                };

                if *is_playing_signal.peek() != state.is_playing {
                    is_playing_signal.set(state.is_playing);
                }
                if (state.current_time - last_time).abs() >= 0.2 {
                    last_time = state.current_time;
                    current_time_signal.set(state.current_time);
                }
                let duration = state.duration.unwrap_or(0.0);
                if (duration - last_duration).abs() > 0.5 {
                    last_duration = duration;
                    duration_signal.set(duration);
                }
                if *playback_error_signal.peek() != state.error {
                    playback_error_signal.set(state.error);
                }
            }
        });
    });

    // Keep now_playing aligned with the queue index.
    use_effect(move || {
        let idx = queue_index();
        let list = queue();
        if let Some(track) = list.get(idx) {
            let is_same =
                now_playing.peek().as_ref().map(|t| t.id.as_str()) == Some(track.id.as_str());
            if !is_same {
                now_playing.set(Some(track.clone()));
            }
        }
    });

    // Push track changes into the controller. Re-selecting the current
    // track bumps the selection nonce, which is the reload path after an
    // error (a load clears it optimistically).
    use_effect(move || {
        let nonce = selection();
        let track = now_playing();
        let key = (track.as_ref().map(|t| t.id.clone()), nonce);
        if *last_loaded.peek() == key {
            return;
        }
        last_loaded.set(key);

        match track {
            Some(track) => {
                if let Some(start) = with_player(|player| player.load_track(track)).flatten() {
                    spawn(start);
                }
            }
            None => {
                with_player(|player| player.unload());
            }
        }
    });

    // Handle volume changes.
    use_effect(move || {
        let level = volume().clamp(0.0, 1.0);
        with_player(|player| player.set_volume(level));
    });

    // Return empty element - this component just manages state
    rsx! {}
}
