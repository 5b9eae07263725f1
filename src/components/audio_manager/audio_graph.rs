//! Lazily-built audio analysis graph: element source -> analyser ->
//! destination. Constructed at most once per page (a media element can only
//! be bound to one source node), deferred to the first playback attempt so
//! context creation happens inside a user gesture.

use std::cell::RefCell;

use wasm_bindgen_futures::JsFuture;
use web_sys::{
    AnalyserNode, AudioContext, AudioContextState, HtmlAudioElement,
    MediaElementAudioSourceNode,
};

use crate::diagnostics;

/// 128 frequency bins; smooth enough for bars without burning frames.
const FFT_SIZE: u32 = 256;
const SMOOTHING: f64 = 0.8;

struct AudioGraph {
    context: AudioContext,
    // Kept alive for the page lifetime; dropping it would not disconnect,
    // but the element can never be re-bound anyway.
    _source: MediaElementAudioSourceNode,
    analyser: AnalyserNode,
}

thread_local! {
    static GRAPH: RefCell<Option<AudioGraph>> = const { RefCell::new(None) };
}

/// Build the graph on first call, then resume the context if the browser
/// has suspended it (this recurs, so it runs on every playback attempt).
/// Returns the analyser for read-only taps; `None` when construction failed,
/// in which case visualization degrades and playback continues untouched.
pub fn ensure(audio: &HtmlAudioElement) -> Option<AnalyserNode> {
    GRAPH.with(|slot| {
        let mut slot = slot.borrow_mut();
        if slot.is_none() {
            *slot = build(audio);
        }
        let graph = slot.as_ref()?;
        resume_if_suspended(&graph.context);
        Some(graph.analyser.clone())
    })
}

/// Read-only handle to the analyser, if the graph has been built.
pub fn analyser() -> Option<AnalyserNode> {
    GRAPH.with(|slot| slot.borrow().as_ref().map(|graph| graph.analyser.clone()))
}

fn build(audio: &HtmlAudioElement) -> Option<AudioGraph> {
    let context = match AudioContext::new() {
        Ok(context) => context,
        Err(err) => {
            diagnostics::warn("audio-graph", &format!("context creation denied: {err:?}"));
            return None;
        }
    };

    let analyser = context.create_analyser().ok()?;
    analyser.set_fft_size(FFT_SIZE);
    analyser.set_smoothing_time_constant(SMOOTHING);

    let source = match context.create_media_element_source(audio) {
        Ok(source) => source,
        Err(err) => {
            diagnostics::warn("audio-graph", &format!("element source failed: {err:?}"));
            return None;
        }
    };

    // Route through the analyser so audio still reaches the speakers.
    source.connect_with_audio_node(&analyser).ok()?;
    analyser.connect_with_audio_node(&context.destination()).ok()?;

    Some(AudioGraph {
        context,
        _source: source,
        analyser,
    })
}

fn resume_if_suspended(context: &AudioContext) {
    if context.state() == AudioContextState::Suspended {
        if let Ok(promise) = context.resume() {
            wasm_bindgen_futures::spawn_local(async move {
                let _ = JsFuture::from(promise).await;
            });
        }
    }
}
