use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::{Duration, Instant},
};

use parking_lot::{Condvar, Mutex};

use crate::{
    foundation::error::SkinampResult,
    playback::{
        clock::Clock,
        output::{AudioBackend, AudioOutput},
    },
};

/// Coarse player state as seen by the face.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    /// No file loaded.
    Idle,
    /// A file is loaded but not sounding: never started, stopped, or finished.
    Stopped,
    Playing,
    Paused,
}

pub(crate) struct PlayerState {
    backend: Box<dyn AudioBackend>,
    source: Option<PathBuf>,
    output: Option<Box<dyn AudioOutput>>,
    total_secs: u64,
    last_start: Option<Instant>,
    pause_time: Option<Instant>,
    held: Duration,
    pub(crate) wake: bool,
    pub(crate) ticker_running: bool,
    pub(crate) shutdown: bool,
}

impl PlayerState {
    pub(crate) fn is_playing(&self) -> bool {
        self.pause_time.is_none() && self.output.as_ref().is_some_and(|o| o.is_playing())
    }

    /// Position of the track. Only a playing output advances it; a loaded but
    /// silent output reports the held position, a finished one its full length.
    fn elapsed(&self, now: Instant) -> Duration {
        let Some(start) = self.last_start else {
            return self.held;
        };
        match self.pause_time {
            Some(paused_at) => paused_at.saturating_duration_since(start),
            None if self.is_playing() => now.saturating_duration_since(start),
            None if self.output.as_ref().is_some_and(|o| o.is_finished()) => {
                Duration::from_secs(self.total_secs)
            }
            None => self.held,
        }
    }
}

pub(crate) struct PlayerInner {
    pub(crate) state: Mutex<PlayerState>,
    pub(crate) signal: Condvar,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) tick_interval: Duration,
}

/// Play / pause / stop / seek state machine over an [`AudioBackend`].
///
/// `Player` is a cheap handle; clones share the same session. Elapsed time is
/// tracked from timestamps rather than queried from the device: `last_start`
/// marks when the current run began, shifted forward by every pause.
#[derive(Clone)]
pub struct Player {
    pub(crate) inner: Arc<PlayerInner>,
}

impl Player {
    pub fn new(
        backend: Box<dyn AudioBackend>,
        clock: Arc<dyn Clock>,
        tick_interval: Duration,
    ) -> Self {
        let state = PlayerState {
            backend,
            source: None,
            output: None,
            total_secs: 0,
            last_start: None,
            pause_time: None,
            held: Duration::ZERO,
            wake: false,
            ticker_running: false,
            shutdown: false,
        };
        Self {
            inner: Arc::new(PlayerInner {
                state: Mutex::new(state),
                signal: Condvar::new(),
                clock,
                tick_interval,
            }),
        }
    }

    pub fn tick_interval(&self) -> Duration {
        self.inner.tick_interval
    }

    fn now(&self) -> Instant {
        self.inner.clock.now()
    }

    fn signal(&self, st: &mut PlayerState) {
        st.wake = true;
        self.inner.signal.notify_all();
    }

    /// Replace the current track. The new output is left paused.
    ///
    /// Failing to close the previous output clears the source and aborts.
    #[tracing::instrument(skip(self, path), fields(path = %path.display()))]
    pub fn load_file(&self, path: &Path) -> SkinampResult<()> {
        let mut st = self.inner.state.lock();
        st.last_start = None;
        st.pause_time = None;
        st.held = Duration::ZERO;

        if let Some(mut previous) = st.output.take() {
            if let Err(err) = previous.close() {
                st.source = None;
                tracing::warn!(%err, "closing previous output failed");
                return Err(err);
            }
        }

        let loaded = match st.backend.open(path) {
            Ok(loaded) => loaded,
            Err(err) => {
                st.source = None;
                return Err(err);
            }
        };
        st.total_secs = loaded.total_secs;
        st.output = Some(loaded.output);
        st.source = Some(path.to_path_buf());
        tracing::info!(total_secs = st.total_secs, "track loaded");
        Ok(())
    }

    /// Start or resume. Reopens the current file after `stop()` or once it finished.
    pub fn play(&self) -> SkinampResult<()> {
        let mut st = self.inner.state.lock();
        let Some(path) = st.source.clone() else {
            return Ok(());
        };
        if st.pause_time.is_some() {
            self.resume(&mut st);
            return Ok(());
        }
        if st.is_playing() {
            return Ok(());
        }

        let needs_reopen = st.output.as_ref().is_none_or(|o| o.is_finished());
        if needs_reopen {
            if let Some(mut finished) = st.output.take() {
                finished.close()?;
            }
            let loaded = st.backend.open(&path)?;
            st.total_secs = loaded.total_secs;
            st.output = Some(loaded.output);
            let held = st.held;
            if let Some(output) = st.output.as_mut().filter(|_| !held.is_zero()) {
                output.seek(held)?;
            }
        }

        let now = self.now();
        if let Some(output) = st.output.as_mut() {
            output.play();
        }
        st.last_start = Some(now.checked_sub(st.held).unwrap_or(now));
        st.pause_time = None;
        st.held = Duration::ZERO;
        self.signal(&mut st);
        tracing::info!(path = %path.display(), "playback started");
        Ok(())
    }

    /// Pause a playing track or resume a paused one; otherwise do nothing.
    pub fn toggle_pause(&self) {
        let mut st = self.inner.state.lock();
        if st.source.is_none() || st.output.is_none() {
            return;
        }
        if st.pause_time.is_some() {
            self.resume(&mut st);
        } else if st.is_playing() {
            self.pause(&mut st);
        }
    }

    fn pause(&self, st: &mut PlayerState) {
        st.pause_time = Some(self.now());
        if let Some(output) = st.output.as_mut() {
            output.pause();
        }
        tracing::info!(elapsed = st.elapsed(self.now()).as_secs(), "playback paused");
    }

    fn resume(&self, st: &mut PlayerState) {
        let now = self.now();
        if let (Some(start), Some(paused_at)) = (st.last_start, st.pause_time) {
            st.last_start = Some(start + now.saturating_duration_since(paused_at));
        }
        st.pause_time = None;
        if let Some(output) = st.output.as_mut() {
            output.play();
        }
        self.signal(st);
        tracing::info!("playback resumed");
    }

    /// Pause only if currently playing. Used when a tick fails.
    pub(crate) fn pause_if_playing(&self) {
        let mut st = self.inner.state.lock();
        if st.is_playing() {
            self.pause(&mut st);
        }
    }

    /// Close the output and forget the timestamps. Safe to call repeatedly.
    pub fn stop(&self) -> SkinampResult<()> {
        let mut st = self.inner.state.lock();
        st.last_start = None;
        st.pause_time = None;
        st.held = Duration::ZERO;
        let Some(mut output) = st.output.take() else {
            return Ok(());
        };
        tracing::info!("playback stopped");
        output.close()
    }

    /// Jump to `secs` (clamped to the track length) and rebase the elapsed clock.
    ///
    /// Without a running or paused session the position is held and the next
    /// `play()` starts from it.
    pub fn seek(&self, secs: u64) -> SkinampResult<()> {
        let mut st = self.inner.state.lock();
        let total = st.total_secs;
        let Some(output) = st.output.as_mut() else {
            return Ok(());
        };
        let target = Duration::from_secs(secs.min(total));
        output.seek(target)?;

        let now = self.now();
        if st.pause_time.is_some() {
            st.last_start = Some(now.checked_sub(target).unwrap_or(now));
            st.pause_time = Some(now);
        } else if st.is_playing() {
            st.last_start = Some(now.checked_sub(target).unwrap_or(now));
        } else {
            st.last_start = None;
            st.held = target;
        }
        tracing::debug!(secs = target.as_secs(), "seeked");
        Ok(())
    }

    pub fn state(&self) -> PlaybackState {
        let st = self.inner.state.lock();
        match (&st.source, &st.output) {
            (None, _) => PlaybackState::Idle,
            (Some(_), None) => PlaybackState::Stopped,
            (Some(_), Some(_)) if st.pause_time.is_some() => PlaybackState::Paused,
            (Some(_), Some(output)) if output.is_playing() => PlaybackState::Playing,
            (Some(_), Some(_)) => PlaybackState::Stopped,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.inner.state.lock().is_playing()
    }

    /// Whole seconds played so far, excluding paused spans.
    pub fn elapsed_secs(&self) -> u64 {
        let now = self.now();
        self.inner.state.lock().elapsed(now).as_secs()
    }

    pub fn total_secs(&self) -> u64 {
        self.inner.state.lock().total_secs
    }

    pub fn current_source(&self) -> Option<PathBuf> {
        self.inner.state.lock().source.clone()
    }

    /// `(elapsed, total)` if the output is playing, read under one lock.
    pub(crate) fn tick_snapshot(&self) -> Option<(u64, u64)> {
        let now = self.now();
        let st = self.inner.state.lock();
        st.is_playing()
            .then(|| (st.elapsed(now).as_secs(), st.total_secs))
    }
}

impl std::fmt::Debug for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let st = self.inner.state.lock();
        f.debug_struct("Player")
            .field("source", &st.source)
            .field("total_secs", &st.total_secs)
            .field("paused", &st.pause_time.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/player.rs"]
mod tests;
