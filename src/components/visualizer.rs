//! Frequency-bar visualizer fed by the shared analyser tap.

use dioxus::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;
#[cfg(target_arch = "wasm32")]
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

const CANVAS_ID: &str = "wavetap-visualizer";

#[component]
pub fn Visualizer() -> Element {
    #[cfg(target_arch = "wasm32")]
    use_effect(move || {
        spawn(async move {
            // One byte per frequency bin at the analyser's fft size of 256.
            let mut bins = [0u8; 128];
            loop {
                gloo_timers::future::TimeoutFuture::new(50).await;
                let Some((canvas, ctx)) = canvas_context() else {
                    continue;
                };
                match crate::components::audio_manager::audio_graph::analyser() {
                    Some(analyser) => {
                        analyser.get_byte_frequency_data(&mut bins);
                        draw_bars(&canvas, &ctx, &bins);
                    }
                    // Before the first playback gesture there is no graph
                    // yet; keep drawing the idle baseline.
                    None => draw_bars(&canvas, &ctx, &[0u8; 128]),
                }
            }
        });
    });

    rsx! {
        canvas {
            id: CANVAS_ID,
            class: "visualizer-canvas",
            width: "640",
            height: "96",
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn canvas_context() -> Option<(HtmlCanvasElement, CanvasRenderingContext2d)> {
    let document = web_sys::window()?.document()?;
    let canvas: HtmlCanvasElement = document
        .get_element_by_id(CANVAS_ID)?
        .dyn_into()
        .ok()?;
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")
        .ok()
        .flatten()?
        .dyn_into()
        .ok()?;
    Some((canvas, ctx))
}

#[cfg(target_arch = "wasm32")]
fn draw_bars(canvas: &HtmlCanvasElement, ctx: &CanvasRenderingContext2d, bins: &[u8]) {
    let width = canvas.width() as f64;
    let height = canvas.height() as f64;
    ctx.clear_rect(0.0, 0.0, width, height);
    ctx.set_fill_style_str("#34d399");

    let slot = width / bins.len() as f64;
    let bar_width = (slot * 0.7).max(1.0);
    for (i, &level) in bins.iter().enumerate() {
        // 1px stubs when silent so the canvas never looks dead.
        let bar_height = ((level as f64 / 255.0) * (height - 2.0)).max(1.0);
        let x = i as f64 * slot;
        ctx.fill_rect(x, height - bar_height, bar_width, bar_height);
    }
}
