use std::{
    sync::Arc,
    thread::JoinHandle,
    time::{Duration, Instant},
};

use anyhow::Context;

use crate::{
    foundation::error::{SkinampError, SkinampResult},
    playback::player::{Player, PlayerInner},
};

/// Receives `(elapsed_secs, total_secs)` once per tick interval while playing.
pub type TickCallback = Box<dyn FnMut(u64, u64) -> SkinampResult<()> + Send>;

/// Owner of the background tick thread. Dropping it stops the thread.
pub struct TickerHandle {
    inner: Arc<PlayerInner>,
    thread: Option<JoinHandle<()>>,
}

impl TickerHandle {
    /// Stop the tick thread and wait for it to exit.
    pub fn shutdown(mut self) {
        self.stop_and_join();
    }

    fn stop_and_join(&mut self) {
        let Some(thread) = self.thread.take() else {
            return;
        };
        {
            let mut st = self.inner.state.lock();
            st.shutdown = true;
            self.inner.signal.notify_all();
        }
        if thread.join().is_err() {
            tracing::warn!("tick thread panicked");
        }
        let mut st = self.inner.state.lock();
        st.shutdown = false;
        st.ticker_running = false;
    }
}

impl std::fmt::Debug for TickerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TickerHandle")
            .field("running", &self.thread.is_some())
            .finish()
    }
}

impl Drop for TickerHandle {
    fn drop(&mut self) {
        self.stop_and_join();
    }
}

impl Player {
    /// Start the tick thread. At most one may run per player.
    ///
    /// The thread parks until playback starts, then calls `callback` right away
    /// and once per tick interval for as long as the output keeps playing. A
    /// failing callback pauses playback.
    pub fn spawn_ticker(&self, callback: TickCallback) -> SkinampResult<TickerHandle> {
        {
            let mut st = self.inner.state.lock();
            if st.ticker_running {
                return Err(SkinampError::validation(
                    "a tick thread is already running for this player",
                ));
            }
            st.ticker_running = true;
        }

        let player = self.clone();
        let spawned = std::thread::Builder::new()
            .name("skinamp-ticker".to_string())
            .spawn(move || tick_loop(&player, callback))
            .context("spawn tick thread");
        let thread = match spawned {
            Ok(thread) => thread,
            Err(err) => {
                self.inner.state.lock().ticker_running = false;
                return Err(err.into());
            }
        };

        Ok(TickerHandle {
            inner: Arc::clone(&self.inner),
            thread: Some(thread),
        })
    }
}

fn tick_loop(player: &Player, mut callback: TickCallback) {
    let inner = &player.inner;
    loop {
        {
            let mut st = inner.state.lock();
            while !st.wake && !st.shutdown {
                inner.signal.wait(&mut st);
            }
            if st.shutdown {
                return;
            }
            st.wake = false;
        }
        tracing::debug!("tick session started");

        while let Some((elapsed, total)) = player.tick_snapshot() {
            tracing::trace!(elapsed, total, "tick");
            if let Err(err) = callback(elapsed, total) {
                tracing::warn!(%err, "tick callback failed; pausing playback");
                player.pause_if_playing();
                break;
            }
            if sleep_interruptibly(player, inner.tick_interval) {
                return;
            }
        }
    }
}

/// Sleep one interval. Returns `true` if shutdown was requested meanwhile.
fn sleep_interruptibly(player: &Player, interval: Duration) -> bool {
    let inner = &player.inner;
    let deadline = Instant::now() + interval;
    let mut st = inner.state.lock();
    while !st.shutdown {
        if inner.signal.wait_until(&mut st, deadline).timed_out() {
            break;
        }
    }
    st.shutdown
}

#[cfg(test)]
#[path = "../../tests/unit/playback/ticker.rs"]
mod tests;
