//! Track queue panel and the advance callbacks the playback stack uses.

use dioxus::prelude::*;

use crate::components::{Icon, SelectionSignal};
use crate::library::{format_duration, Track};

/// Advance to the next queued track; stops at the end of the queue.
pub fn advance_next(queue: Signal<Vec<Track>>, mut queue_index: Signal<usize>) {
    let len = queue.peek().len();
    let idx = *queue_index.peek();
    if idx + 1 < len {
        queue_index.set(idx + 1);
    }
}

/// Step back to the previous queued track; stops at the start.
pub fn advance_previous(mut queue_index: Signal<usize>) {
    let idx = *queue_index.peek();
    if idx > 0 {
        queue_index.set(idx - 1);
    }
}

#[component]
pub fn QueuePanel() -> Element {
    let queue = use_context::<Signal<Vec<Track>>>();
    let mut queue_index = use_context::<Signal<usize>>();
    let now_playing = use_context::<Signal<Option<Track>>>();
    let mut selection = use_context::<SelectionSignal>().0;

    let tracks = queue();
    let active_id = now_playing().map(|track| track.id);

    rsx! {
        section { class: "queue-panel",
            h2 { class: "queue-title", "Up next" }
            if tracks.is_empty() {
                div { class: "queue-empty",
                    Icon { name: "music".to_string(), class: "icon queue-empty-icon".to_string() }
                    p { "No tracks in the queue yet." }
                }
            }
            ul { class: "queue-list",
                for (idx, track) in tracks.iter().cloned().enumerate() {
                    li { key: "{track.id}",
                        button {
                            r#type: "button",
                            class: if active_id.as_deref() == Some(track.id.as_str()) { "queue-row queue-row-active" } else { "queue-row" },
                            // Selecting a row always reloads the source, which
                            // is also the retry path for an errored track.
                            onclick: move |_| {
                                queue_index.set(idx);
                                let next = *selection.peek() + 1;
                                selection.set(next);
                            },
                            span { class: "queue-row-title", "{track.title}" }
                            span { class: "queue-row-artist",
                                {track.artist.clone().unwrap_or_default()}
                            }
                            span { class: "queue-row-duration", {format_duration(track.duration)} }
                        }
                    }
                }
            }
        }
    }
}
