//! Cancellable repeating tick task

use std::future::Future;
use std::ops::ControlFlow;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Handle to a running tick loop. Dropping the handle cancels the loop.
#[derive(Debug)]
pub struct TickHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl TickHandle {
    /// Call `on_tick` every `period` until it breaks or the handle is
    /// cancelled. The first call happens one period after spawning.
    pub fn spawn<F, Fut>(period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ControlFlow<()>> + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let task = tokio::spawn(async move {
            let mut ticks = interval(period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
            ticks.tick().await;

            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = ticks.tick() => {
                        if on_tick().await.is_break() {
                            break;
                        }
                    }
                }
            }
        });

        Self { cancel, task }
    }

    /// Tick on behalf of `owner` without keeping it alive. The loop ends
    /// once the owner is dropped.
    pub fn spawn_for<S, F, Fut>(owner: &Arc<S>, period: Duration, on_tick: F) -> Self
    where
        S: Send + Sync + 'static,
        F: Fn(Arc<S>) -> Fut + Send + 'static,
        Fut: Future<Output = ControlFlow<()>> + Send + 'static,
    {
        let weak: Weak<S> = Arc::downgrade(owner);
        Self::spawn(period, move || {
            let pending = weak.upgrade().map(&on_tick);
            async move {
                match pending {
                    Some(tick) => tick.await,
                    None => ControlFlow::Break(()),
                }
            }
        })
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for TickHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
