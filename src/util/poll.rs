//! Cancellable periodic tasks.
//!
//! A [`PollTask`] pairs an abort handle with a future that runs `on_tick`
//! once per item from a tick stream. The owner spawns the future and cancels
//! the handle on cleanup; dropping the handle also cancels. Ticks come from
//! [`interval_ticks`] in the browser and from a channel in tests.

#[cfg(test)]
#[path = "poll_test.rs"]
mod poll_test;

use std::future::Future;
use std::time::Duration;

use futures::future::{AbortHandle, abortable};
use futures::stream::{LocalBoxStream, Stream, StreamExt};

/// Handle to a running poll loop.
#[derive(Debug)]
pub struct PollTask {
    handle: AbortHandle,
}

impl PollTask {
    /// Build a poll loop. Returns the handle and the future to spawn.
    pub fn new<S, F, Fut>(ticks: S, mut on_tick: F) -> (Self, impl Future<Output = ()>)
    where
        S: Stream<Item = ()> + 'static,
        F: FnMut() -> Fut + 'static,
        Fut: Future<Output = ()>,
    {
        let run = async move {
            let mut ticks = std::pin::pin!(ticks);
            while ticks.next().await.is_some() {
                on_tick().await;
            }
        };
        let (run, handle) = abortable(run);
        let run = async move {
            if run.await.is_err() {
                log::debug!("poll: task cancelled");
            }
        };
        (Self { handle }, run)
    }

    /// Stop the loop. Any in-flight tick is dropped at its next await point.
    pub fn cancel(&self) {
        self.handle.abort();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.handle.is_aborted()
    }
}

impl Drop for PollTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Tick stream firing every `period`. Never fires outside the browser.
pub fn interval_ticks(period: Duration) -> LocalBoxStream<'static, ()> {
    #[cfg(feature = "csr")]
    {
        let millis = u32::try_from(period.as_millis()).unwrap_or(u32::MAX);
        gloo_timers::future::IntervalStream::new(millis).boxed_local()
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = period;
        futures::stream::pending().boxed_local()
    }
}
