//! Playback controller - single source of truth for transport state.
//!
//! The underlying media element is asynchronous and interruptible: `play()`
//! settles later and may reject, `pause()` is synchronous, and a source swap
//! aborts whatever fetch is in flight. The controller serializes start
//! requests through one shared pending handle so no two starts ever overlap,
//! and tags every operation and inbound event with the track it was issued
//! for so a stale settlement can never clobber state for a newer track.

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use futures_util::future::{LocalBoxFuture, Shared};
use futures_util::FutureExt;

use crate::diagnostics;
use crate::library::Track;

/// Error message shown when an explicit play intent is rejected.
pub const PLAY_REJECTED_MESSAGE: &str = "Unable to play this source";
/// Error message shown when the element reports a source/decode failure.
pub const SOURCE_ERROR_MESSAGE: &str = "Failed to load audio source";

/// Outcome of an asynchronous start operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayError {
    /// Superseded by a newer load or source swap. Expected, never user-facing.
    Aborted,
    /// Genuine rejection (autoplay policy, unsupported source, ...).
    Rejected(String),
}

pub type StartFuture = LocalBoxFuture<'static, Result<(), PlayError>>;

/// Seam over the platform playback primitive. The web implementation wraps
/// the page's single `<audio>` element; tests drive a fake.
pub trait MediaElement {
    fn set_source(&self, url: &str);
    /// Discard buffered state and begin fetching the current source.
    fn load(&self);
    /// Issue an asynchronous start request. At most one may be outstanding;
    /// the controller enforces this, not the element.
    fn begin_play(&self) -> StartFuture;
    fn pause(&self);
    fn set_position(&self, seconds: f64);
    fn set_volume(&self, level: f64);
    /// Whether the element has fetched any data for the current source.
    fn has_buffered_data(&self) -> bool;
    /// Runs before every start attempt: builds the analysis graph on first
    /// use and resumes a suspended audio context.
    fn prepare_output(&self);
    /// Re-arm element event handlers so each event carries the tag of the
    /// track it was armed for.
    fn bind_events(&self, track_id: &str, sink: Rc<dyn Fn(MediaEvent)>);
}

/// Inbound element events, tagged with the track they belong to. Events
/// whose tag no longer matches the current track are dropped.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    TimeProgress { track_id: String, seconds: f64 },
    MetadataLoaded { track_id: String, duration: f64 },
    Ended { track_id: String },
    SourceError { track_id: String },
}

/// Transport state read by the player view.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlaybackState {
    pub is_playing: bool,
    pub current_time: f64,
    pub duration: Option<f64>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StartOrigin {
    /// Explicit user intent: rejections surface as a visible error.
    UserIntent,
    /// Automatic attempt after a track change: rejections stay silent so the
    /// user can retry via the button (autoplay policy is not their fault).
    TrackChange,
}

struct PendingStart {
    op_id: u64,
    track_id: String,
    settled: Shared<LocalBoxFuture<'static, ()>>,
}

struct PlayerInner<E: MediaElement> {
    element: E,
    state: PlaybackState,
    current: Option<Track>,
    pending: Option<PendingStart>,
    next_op_id: u64,
    loaded_once: bool,
}

/// Cloneable handle to the playback controller. All transport mutations go
/// through here; no other component touches the element.
pub struct PlayerHandle<E: MediaElement> {
    inner: Rc<RefCell<PlayerInner<E>>>,
    on_ended: Rc<dyn Fn()>,
}

impl<E: MediaElement> Clone for PlayerHandle<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
            on_ended: Rc::clone(&self.on_ended),
        }
    }
}

impl<E: MediaElement + 'static> PlayerHandle<E> {
    /// `on_ended` is the "advance to next track" collaborator, invoked on
    /// natural end-of-track.
    pub fn new(element: E, on_ended: impl Fn() + 'static) -> Self {
        Self {
            inner: Rc::new(RefCell::new(PlayerInner {
                element,
                state: PlaybackState::default(),
                current: None,
                pending: None,
                next_op_id: 0,
                loaded_once: false,
            })),
            on_ended: Rc::new(on_ended),
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.inner.borrow().state.clone()
    }

    pub fn current_track(&self) -> Option<Track> {
        self.inner.borrow().current.clone()
    }

    /// Point the element at a new track. Clears any previous error, rebinds
    /// event tags, and reloads the source (which aborts an in-flight start).
    ///
    /// Cold-start policy: the very first load after construction never
    /// auto-starts. Every later load returns a start attempt the caller
    /// must spawn; its failure modes are the silent `TrackChange` kind.
    #[must_use = "spawn the returned start attempt"]
    pub fn load_track(&self, track: Track) -> Option<impl Future<Output = ()> + 'static> {
        let sink: Rc<dyn Fn(MediaEvent)> = {
            let handle = self.clone();
            Rc::new(move |event| handle.dispatch(event))
        };

        let auto_start = {
            let mut inner = self.inner.borrow_mut();
            inner.state.error = None;
            inner.state.is_playing = false;
            inner.state.current_time = 0.0;
            inner.state.duration = None;
            inner.current = Some(track.clone());
            inner.element.bind_events(&track.id, sink);
            inner.element.set_source(&track.url);
            inner.element.load();
            let first = !inner.loaded_once;
            inner.loaded_once = true;
            !first
        };

        if auto_start {
            let handle = self.clone();
            Some(async move { handle.start(StartOrigin::TrackChange).await })
        } else {
            None
        }
    }

    /// Drop the current track: pause, detach the source, reset state. A
    /// still-pending start settles against a stale tag and is ignored.
    pub fn unload(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.element.pause();
        inner.element.set_source("");
        inner.current = None;
        inner.state = PlaybackState::default();
    }

    /// Flip play/pause. A start that is still pending counts as playing, so
    /// a second tap nets out to paused: it awaits the pending settlement
    /// (pausing while a start is unresolved is undefined in most elements)
    /// and only then pauses.
    pub fn toggle_play(&self) -> LocalBoxFuture<'static, ()> {
        let handle = self.clone();
        async move {
            let (errored, playing, pending) = {
                let inner = handle.inner.borrow();
                (
                    inner.state.error.is_some(),
                    inner.state.is_playing,
                    inner.pending.as_ref().map(|p| p.settled.clone()),
                )
            };
            // An errored source cannot be retried from the button; selecting
            // the track again is the reload path.
            if errored {
                return;
            }

            if playing || pending.is_some() {
                if let Some(settled) = pending {
                    settled.await;
                }
                let mut inner = handle.inner.borrow_mut();
                inner.element.pause();
                inner.state.is_playing = false;
            } else {
                handle.start(StartOrigin::UserIntent).await;
            }
        }
        .boxed_local()
    }

    /// Clamp to `[0, duration]`, set the element position, and update
    /// `current_time` optimistically without waiting for an element event.
    pub fn seek(&self, seconds: f64) {
        let mut inner = self.inner.borrow_mut();
        let upper = inner.state.duration.unwrap_or(f64::INFINITY);
        let target = seconds.clamp(0.0, upper.max(0.0));
        inner.element.set_position(target);
        inner.state.current_time = target;
    }

    /// Pure element side effect; not part of [`PlaybackState`].
    pub fn set_volume(&self, level: f64) {
        let inner = self.inner.borrow();
        inner.element.set_volume(level.clamp(0.0, 1.0));
    }

    /// Feed an element event into the state machine. Stale tags are dropped.
    pub fn dispatch(&self, event: MediaEvent) {
        let ended = {
            let mut inner = self.inner.borrow_mut();
            let current_id = inner.current.as_ref().map(|t| t.id.clone());
            let matches = |tag: &str| current_id.as_deref() == Some(tag);
            match event {
                MediaEvent::TimeProgress { track_id, seconds } => {
                    if matches(&track_id) {
                        inner.state.current_time = seconds;
                    }
                    false
                }
                MediaEvent::MetadataLoaded { track_id, duration } => {
                    if matches(&track_id) && duration.is_finite() {
                        inner.state.duration = Some(duration);
                    }
                    false
                }
                MediaEvent::Ended { track_id } => {
                    if matches(&track_id) {
                        inner.state.is_playing = false;
                        true
                    } else {
                        false
                    }
                }
                MediaEvent::SourceError { track_id } => {
                    if matches(&track_id) {
                        inner.state.error = Some(SOURCE_ERROR_MESSAGE.to_string());
                        inner.state.is_playing = false;
                    }
                    false
                }
            }
        };
        if ended {
            (self.on_ended)();
        }
    }

    fn start(&self, origin: StartOrigin) -> LocalBoxFuture<'static, ()> {
        let handle = self.clone();
        async move {
            // Never overlap starts: wait for an outstanding one to settle.
            let existing = handle
                .inner
                .borrow()
                .pending
                .as_ref()
                .map(|p| p.settled.clone());
            if let Some(settled) = existing {
                settled.await;
            }
            if handle.inner.borrow().state.is_playing {
                return;
            }
            if let Some(armed) = handle.arm_start(origin) {
                armed.await;
            }
        }
        .boxed_local()
    }

    /// Issue one start operation and record it as pending. The returned
    /// future completes only after the settlement logic has run, so anyone
    /// awaiting the pending handle observes its effects.
    fn arm_start(&self, origin: StartOrigin) -> Option<Shared<LocalBoxFuture<'static, ()>>> {
        let (play, op_id, track_id) = {
            let mut inner = self.inner.borrow_mut();
            let track = inner.current.clone()?;
            inner.element.prepare_output();
            if origin == StartOrigin::UserIntent && !inner.element.has_buffered_data() {
                inner.element.load();
            }
            let play = inner.element.begin_play();
            inner.next_op_id += 1;
            (play, inner.next_op_id, track.id)
        };

        let handle = self.clone();
        let tag = track_id.clone();
        let settled = async move {
            let result = play.await;
            handle.settle(op_id, &tag, origin, result);
        }
        .boxed_local()
        .shared();

        self.inner.borrow_mut().pending = Some(PendingStart {
            op_id,
            track_id,
            settled: settled.clone(),
        });
        Some(settled)
    }

    fn settle(&self, op_id: u64, track_id: &str, origin: StartOrigin, result: Result<(), PlayError>) {
        let mut inner = self.inner.borrow_mut();
        // Clear the pending handle unconditionally once this operation
        // settles, unless a newer one has already replaced it.
        if inner.pending.as_ref().map(|p| p.op_id) == Some(op_id) {
            inner.pending = None;
        }
        let is_current = inner.current.as_ref().map(|t| t.id.as_str()) == Some(track_id);
        match result {
            Ok(()) => {
                if is_current {
                    inner.state.is_playing = true;
                    inner.state.error = None;
                } else {
                    diagnostics::log("playback", "ignoring stale start for a superseded track");
                }
            }
            Err(PlayError::Aborted) => {
                diagnostics::log("playback", "start superseded by a newer load");
            }
            Err(PlayError::Rejected(reason)) => {
                if is_current && origin == StartOrigin::UserIntent {
                    inner.state.is_playing = false;
                    inner.state.error = Some(PLAY_REJECTED_MESSAGE.to_string());
                } else {
                    diagnostics::warn(
                        "playback",
                        &format!("automatic start attempt failed, staying paused: {reason}"),
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::pin::Pin;
    use std::task::{Context, Poll, Waker};

    fn track(id: &str) -> Track {
        Track {
            id: id.to_string(),
            title: format!("Track {id}"),
            artist: Some("Tester".to_string()),
            cover_art: None,
            duration: 180,
            url: format!("https://media.example/{id}.mp3"),
        }
    }

    #[derive(Default)]
    struct ManualPlayState {
        result: Option<Result<(), PlayError>>,
        waker: Option<Waker>,
    }

    /// A start operation the test resolves by hand.
    #[derive(Clone, Default)]
    struct ManualPlay(Rc<RefCell<ManualPlayState>>);

    impl ManualPlay {
        fn resolve(&self, result: Result<(), PlayError>) {
            let waker = {
                let mut state = self.0.borrow_mut();
                state.result = Some(result);
                state.waker.take()
            };
            if let Some(waker) = waker {
                waker.wake();
            }
        }

        fn into_future(self) -> StartFuture {
            futures_util::future::poll_fn(move |cx| {
                let mut state = self.0.borrow_mut();
                match state.result.clone() {
                    Some(result) => Poll::Ready(result),
                    None => {
                        state.waker = Some(cx.waker().clone());
                        Poll::Pending
                    }
                }
            })
            .boxed_local()
        }
    }

    #[derive(Default)]
    struct FakeShared {
        plays: Vec<ManualPlay>,
        calls: Vec<String>,
        buffered: Cell<bool>,
        prepare_count: Cell<u32>,
        position: Cell<f64>,
        volume: Cell<f64>,
    }

    #[derive(Clone, Default)]
    struct FakeElement(Rc<RefCell<FakeShared>>);

    impl FakeElement {
        fn play(&self, index: usize) -> ManualPlay {
            self.0.borrow().plays[index].clone()
        }

        fn play_count(&self) -> usize {
            self.0.borrow().plays.len()
        }

        fn calls(&self) -> Vec<String> {
            self.0.borrow().calls.clone()
        }
    }

    impl MediaElement for FakeElement {
        fn set_source(&self, url: &str) {
            let mut shared = self.0.borrow_mut();
            shared.buffered.set(false);
            shared.calls.push(format!("set_source:{url}"));
        }

        fn load(&self) {
            self.0.borrow_mut().calls.push("load".to_string());
        }

        fn begin_play(&self) -> StartFuture {
            let play = ManualPlay::default();
            let mut shared = self.0.borrow_mut();
            shared.calls.push("play".to_string());
            shared.plays.push(play.clone());
            play.into_future()
        }

        fn pause(&self) {
            self.0.borrow_mut().calls.push("pause".to_string());
        }

        fn set_position(&self, seconds: f64) {
            self.0.borrow().position.set(seconds);
        }

        fn set_volume(&self, level: f64) {
            self.0.borrow().volume.set(level);
        }

        fn has_buffered_data(&self) -> bool {
            self.0.borrow().buffered.get()
        }

        fn prepare_output(&self) {
            let shared = self.0.borrow();
            shared.prepare_count.set(shared.prepare_count.get() + 1);
        }

        fn bind_events(&self, track_id: &str, _sink: Rc<dyn Fn(MediaEvent)>) {
            self.0
                .borrow_mut()
                .calls
                .push(format!("bind_events:{track_id}"));
        }
    }

    fn poll_once<T>(fut: &mut Pin<Box<dyn Future<Output = T>>>) -> Poll<T> {
        let waker = futures_util::task::noop_waker();
        let mut cx = Context::from_waker(&waker);
        fut.as_mut().poll(&mut cx)
    }

    fn new_player(element: FakeElement) -> (PlayerHandle<FakeElement>, Rc<Cell<u32>>) {
        let ended = Rc::new(Cell::new(0u32));
        let ended_probe = Rc::clone(&ended);
        let handle = PlayerHandle::new(element, move || {
            ended_probe.set(ended_probe.get() + 1);
        });
        (handle, ended)
    }

    #[test]
    fn first_load_never_autostarts() {
        let element = FakeElement::default();
        let (player, _) = new_player(element.clone());

        assert!(player.load_track(track("a")).is_none());
        assert_eq!(element.play_count(), 0);
        let state = player.state();
        assert!(!state.is_playing);
        assert_eq!(state.current_time, 0.0);
        assert_eq!(state.error, None);
    }

    #[test]
    fn subsequent_load_autostarts_and_plays() {
        let element = FakeElement::default();
        let (player, _) = new_player(element.clone());

        assert!(player.load_track(track("a")).is_none());
        let mut auto: Pin<Box<dyn Future<Output = ()>>> =
            Box::pin(player.load_track(track("b")).expect("auto start attempt"));
        assert!(poll_once(&mut auto).is_pending());
        assert_eq!(element.play_count(), 1);

        element.play(0).resolve(Ok(()));
        assert!(poll_once(&mut auto).is_ready());
        assert!(player.state().is_playing);
        assert_eq!(player.state().error, None);
    }

    #[test]
    fn toggle_play_issues_single_start_under_repeated_calls() {
        let element = FakeElement::default();
        let (player, _) = new_player(element.clone());
        let _ = player.load_track(track("a"));

        let mut first = player.toggle_play();
        assert!(poll_once(&mut first).is_pending());
        assert_eq!(element.play_count(), 1);

        // While the first start is unresolved, further toggles are pause
        // intents: they await the settlement and never issue a second play.
        let mut second = player.toggle_play();
        assert!(poll_once(&mut second).is_pending());
        let mut third = player.toggle_play();
        assert!(poll_once(&mut third).is_pending());
        assert_eq!(element.play_count(), 1);

        element.play(0).resolve(Ok(()));
        assert!(poll_once(&mut first).is_ready());
        assert!(poll_once(&mut second).is_ready());
        assert!(poll_once(&mut third).is_ready());
        assert_eq!(element.play_count(), 1);
        assert!(!player.state().is_playing);
    }

    #[test]
    fn double_click_nets_out_to_paused() {
        let element = FakeElement::default();
        let (player, _) = new_player(element.clone());
        let _ = player.load_track(track("a"));

        let mut play_intent = player.toggle_play();
        assert!(poll_once(&mut play_intent).is_pending());
        let mut pause_intent = player.toggle_play();
        assert!(poll_once(&mut pause_intent).is_pending());

        element.play(0).resolve(Ok(()));
        assert!(poll_once(&mut play_intent).is_ready());
        assert!(poll_once(&mut pause_intent).is_ready());

        let state = player.state();
        assert!(!state.is_playing);
        assert_eq!(state.error, None);
        assert!(element.calls().contains(&"pause".to_string()));
    }

    #[test]
    fn stale_start_success_never_marks_new_track_playing() {
        let element = FakeElement::default();
        let (player, _) = new_player(element.clone());
        let _ = player.load_track(track("a"));

        let mut start_a = player.toggle_play();
        assert!(poll_once(&mut start_a).is_pending());

        // Track switch while A's start is pending. Its eventual success is
        // tagged for A and must be ignored.
        let mut auto_b: Pin<Box<dyn Future<Output = ()>>> =
            Box::pin(player.load_track(track("b")).expect("auto start attempt"));
        assert!(poll_once(&mut auto_b).is_pending());
        assert_eq!(element.play_count(), 1);

        element.play(0).resolve(Ok(()));
        assert!(poll_once(&mut start_a).is_ready());
        assert!(!player.state().is_playing);

        // B's own start may now proceed.
        assert!(poll_once(&mut auto_b).is_pending());
        assert_eq!(element.play_count(), 2);
        element.play(1).resolve(Ok(()));
        assert!(poll_once(&mut auto_b).is_ready());
        assert!(player.state().is_playing);
    }

    #[test]
    fn abort_during_automatic_attempt_stays_silent() {
        let element = FakeElement::default();
        let (player, _) = new_player(element.clone());
        let _ = player.load_track(track("a"));

        let mut auto: Pin<Box<dyn Future<Output = ()>>> =
            Box::pin(player.load_track(track("b")).expect("auto start attempt"));
        assert!(poll_once(&mut auto).is_pending());
        element.play(0).resolve(Err(PlayError::Aborted));
        assert!(poll_once(&mut auto).is_ready());

        let state = player.state();
        assert_eq!(state.error, None);
        assert!(!state.is_playing);
    }

    #[test]
    fn automatic_rejection_stays_paused_without_error() {
        let element = FakeElement::default();
        let (player, _) = new_player(element.clone());
        let _ = player.load_track(track("a"));

        let mut auto: Pin<Box<dyn Future<Output = ()>>> =
            Box::pin(player.load_track(track("b")).expect("auto start attempt"));
        assert!(poll_once(&mut auto).is_pending());
        element
            .play(0)
            .resolve(Err(PlayError::Rejected("autoplay blocked".to_string())));
        assert!(poll_once(&mut auto).is_ready());

        let state = player.state();
        assert_eq!(state.error, None);
        assert!(!state.is_playing);
    }

    #[test]
    fn explicit_rejection_surfaces_error() {
        let element = FakeElement::default();
        let (player, _) = new_player(element.clone());
        let _ = player.load_track(track("a"));

        let mut intent = player.toggle_play();
        assert!(poll_once(&mut intent).is_pending());
        element
            .play(0)
            .resolve(Err(PlayError::Rejected("blocked".to_string())));
        assert!(poll_once(&mut intent).is_ready());

        let state = player.state();
        assert_eq!(state.error.as_deref(), Some(PLAY_REJECTED_MESSAGE));
        assert!(!state.is_playing);

        // The failed source cannot be retried via the same button.
        let mut retry = player.toggle_play();
        assert!(poll_once(&mut retry).is_ready());
        assert_eq!(element.play_count(), 1);
    }

    #[test]
    fn load_clears_error_and_source_404_sets_it_again() {
        let element = FakeElement::default();
        let (player, _) = new_player(element.clone());
        let _ = player.load_track(track("a"));

        let mut intent = player.toggle_play();
        assert!(poll_once(&mut intent).is_pending());
        element.play(0).resolve(Ok(()));
        assert!(poll_once(&mut intent).is_ready());
        assert!(player.state().is_playing);

        // Switch to B: error cleared optimistically, auto attempt issued.
        let mut auto: Pin<Box<dyn Future<Output = ()>>> =
            Box::pin(player.load_track(track("b")).expect("auto start attempt"));
        assert_eq!(player.state().error, None);
        assert!(poll_once(&mut auto).is_pending());

        // B's source 404s: element error event plus an aborted start.
        player.dispatch(MediaEvent::SourceError {
            track_id: "b".to_string(),
        });
        element.play(1).resolve(Err(PlayError::Aborted));
        assert!(poll_once(&mut auto).is_ready());

        let state = player.state();
        assert_eq!(state.error.as_deref(), Some(SOURCE_ERROR_MESSAGE));
        assert!(!state.is_playing);
    }

    #[test]
    fn stale_events_from_previous_track_are_dropped() {
        let element = FakeElement::default();
        let (player, _) = new_player(element.clone());
        let _ = player.load_track(track("a"));
        player.dispatch(MediaEvent::MetadataLoaded {
            track_id: "a".to_string(),
            duration: 240.0,
        });

        player.seek(90.0);
        assert_eq!(player.state().current_time, 90.0);

        // A time event that was queued for the previous position of another
        // track must never pull the clock back below the seek target.
        player.dispatch(MediaEvent::TimeProgress {
            track_id: "zombie".to_string(),
            seconds: 3.0,
        });
        assert_eq!(player.state().current_time, 90.0);

        player.dispatch(MediaEvent::TimeProgress {
            track_id: "a".to_string(),
            seconds: 91.2,
        });
        assert_eq!(player.state().current_time, 91.2);
    }

    #[test]
    fn seek_clamps_to_duration() {
        let element = FakeElement::default();
        let (player, _) = new_player(element.clone());
        let _ = player.load_track(track("a"));
        player.dispatch(MediaEvent::MetadataLoaded {
            track_id: "a".to_string(),
            duration: 200.0,
        });

        player.seek(-4.0);
        assert_eq!(player.state().current_time, 0.0);
        player.seek(1000.0);
        assert_eq!(player.state().current_time, 200.0);
    }

    #[test]
    fn ended_event_invokes_advance_collaborator() {
        let element = FakeElement::default();
        let (player, ended) = new_player(element.clone());
        let _ = player.load_track(track("a"));

        player.dispatch(MediaEvent::Ended {
            track_id: "a".to_string(),
        });
        assert_eq!(ended.get(), 1);
        assert!(!player.state().is_playing);

        // Stale ended event for a track that is no longer current.
        let mut auto: Pin<Box<dyn Future<Output = ()>>> =
            Box::pin(player.load_track(track("b")).expect("auto start attempt"));
        assert!(poll_once(&mut auto).is_pending());
        player.dispatch(MediaEvent::Ended {
            track_id: "a".to_string(),
        });
        assert_eq!(ended.get(), 1);
        element.play(0).resolve(Ok(()));
        assert!(poll_once(&mut auto).is_ready());
    }

    #[test]
    fn user_toggle_reloads_when_nothing_buffered() {
        let element = FakeElement::default();
        let (player, _) = new_player(element.clone());
        let _ = player.load_track(track("a"));

        let calls_before = element.calls();
        let mut intent = player.toggle_play();
        assert!(poll_once(&mut intent).is_pending());
        let calls_after = element.calls();
        // prepare_output ran and a reload was forced before play.
        assert_eq!(element.0.borrow().prepare_count.get(), 1);
        assert_eq!(
            calls_after[calls_before.len()..].to_vec(),
            vec!["load".to_string(), "play".to_string()]
        );

        element.play(0).resolve(Ok(()));
        assert!(poll_once(&mut intent).is_ready());
    }
}
