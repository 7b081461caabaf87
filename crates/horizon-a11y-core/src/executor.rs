//! Single-threaded UI executor.
//!
//! The executor is the one place where work crosses from worker threads onto
//! the UI thread. Worker threads hold a cloneable [`UiSender`] and post
//! messages; the UI thread owns the [`UiExecutor`] and drains them in FIFO
//! order. No UI-owned state is ever shared: messages carry plain data (for
//! the bridge, an adapter handle) and the UI thread resolves them against
//! state only it can reach.
//!
//! Hosts with their own looper install a waker with
//! [`UiExecutor::set_waker`]; it runs on the posting thread after every
//! successful post, so the host can schedule a drain (on Android, a
//! `runOnUiThread` call).

use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender, unbounded};
use parking_lot::Mutex;

use crate::error::{CoreError, Result};
use crate::logging::targets;
use crate::thread_check::ThreadAffinity;

/// Default number of messages processed per [`UiExecutor::drain_batch`] call.
pub const DEFAULT_BATCH_SIZE: usize = 64;

type Waker = Arc<dyn Fn() + Send + Sync>;

/// Receiving end of the UI message queue. Lives on the UI thread.
pub struct UiExecutor<M> {
    sender: Sender<M>,
    receiver: Receiver<M>,
    affinity: ThreadAffinity,
    waker: Arc<Mutex<Option<Waker>>>,
    batch_size: usize,
}

/// Cloneable, thread-safe handle for posting messages to a [`UiExecutor`].
pub struct UiSender<M> {
    sender: Sender<M>,
    affinity: ThreadAffinity,
    waker: Arc<Mutex<Option<Waker>>>,
}

impl<M> Clone for UiSender<M> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            affinity: self.affinity,
            waker: self.waker.clone(),
        }
    }
}

impl<M> std::fmt::Debug for UiSender<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UiSender")
            .field("ui_thread", &self.affinity.thread_id())
            .field("queued", &self.sender.len())
            .finish()
    }
}

impl<M: Send + 'static> UiExecutor<M> {
    /// Create an executor bound to the current thread.
    pub fn new() -> Self {
        Self::with_batch_size(DEFAULT_BATCH_SIZE)
    }

    /// Create an executor with a custom batch size for [`drain_batch`](Self::drain_batch).
    pub fn with_batch_size(batch_size: usize) -> Self {
        let (sender, receiver) = unbounded();
        Self {
            sender,
            receiver,
            affinity: ThreadAffinity::current(),
            waker: Arc::new(Mutex::new(None)),
            batch_size: batch_size.max(1),
        }
    }

    /// Get a sender that can post from any thread.
    pub fn sender(&self) -> UiSender<M> {
        UiSender {
            sender: self.sender.clone(),
            affinity: self.affinity,
            waker: self.waker.clone(),
        }
    }

    /// Install the callback that asks the host to schedule a drain.
    ///
    /// Applies to senders created before and after this call.
    pub fn set_waker<F>(&self, waker: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        *self.waker.lock() = Some(Arc::new(waker));
    }

    /// Remove the waker.
    pub fn clear_waker(&self) {
        *self.waker.lock() = None;
    }

    /// The thread this executor drains on.
    pub fn affinity(&self) -> ThreadAffinity {
        self.affinity
    }

    /// Number of messages waiting to be drained.
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Check if there are any messages waiting.
    pub fn has_pending(&self) -> bool {
        !self.receiver.is_empty()
    }

    /// Process up to the configured batch size of messages.
    ///
    /// Returns the number of messages processed.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if called off the UI thread.
    pub fn drain_batch<F>(&self, handler: F) -> usize
    where
        F: FnMut(M),
    {
        self.drain_up_to(self.batch_size, handler)
    }

    /// Process every message queued at the time of the call.
    ///
    /// Messages posted by `handler` itself are left for the next drain, so a
    /// handler that re-posts cannot spin the UI thread forever.
    pub fn drain_all<F>(&self, handler: F) -> usize
    where
        F: FnMut(M),
    {
        self.drain_up_to(self.receiver.len(), handler)
    }

    fn drain_up_to<F>(&self, limit: usize, mut handler: F) -> usize
    where
        F: FnMut(M),
    {
        self.affinity.debug_assert_same_thread();

        let mut processed = 0;
        while processed < limit {
            match self.receiver.try_recv() {
                Ok(message) => {
                    handler(message);
                    processed += 1;
                }
                Err(_) => break,
            }
        }

        if processed > 0 {
            tracing::trace!(target: targets::EXECUTOR, processed, remaining = self.receiver.len(), "drained UI messages");
        }
        processed
    }
}

impl<M: Send + 'static> Default for UiExecutor<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Send + 'static> UiSender<M> {
    /// Post a message to the UI thread.
    ///
    /// Never blocks. Fails only if the executor has been dropped.
    pub fn post(&self, message: M) -> Result<()> {
        self.sender.send(message).map_err(|_| {
            tracing::debug!(target: targets::EXECUTOR, "post after executor dropped");
            CoreError::ExecutorClosed
        })?;

        let waker = self.waker.lock().clone();
        if let Some(waker) = waker {
            waker();
        }
        Ok(())
    }

    /// Check if the calling thread is the executor's UI thread.
    #[inline]
    pub fn is_ui_thread(&self) -> bool {
        self.affinity.is_same_thread()
    }

    /// The UI thread this sender posts to.
    pub fn affinity(&self) -> ThreadAffinity {
        self.affinity
    }
}

static_assertions::assert_impl_all!(UiSender<u64>: Send, Sync, Clone);

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_post_and_drain_in_order() {
        let executor = UiExecutor::<u32>::new();
        let sender = executor.sender();

        for i in 0..5 {
            sender.post(i).unwrap();
        }
        assert_eq!(executor.pending_count(), 5);

        let mut seen = Vec::new();
        assert_eq!(executor.drain_all(|m| seen.push(m)), 5);
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
        assert!(!executor.has_pending());
    }

    #[test]
    fn test_drain_batch_respects_size() {
        let executor = UiExecutor::<u32>::with_batch_size(2);
        let sender = executor.sender();
        for i in 0..5 {
            sender.post(i).unwrap();
        }

        assert_eq!(executor.drain_batch(|_| {}), 2);
        assert_eq!(executor.pending_count(), 3);
    }

    #[test]
    fn test_post_from_worker_thread() {
        let executor = UiExecutor::<&'static str>::new();
        let sender = executor.sender();

        std::thread::spawn(move || {
            assert!(!sender.is_ui_thread());
            sender.post("from worker").unwrap();
        })
        .join()
        .unwrap();

        let mut seen = Vec::new();
        executor.drain_all(|m| seen.push(m));
        assert_eq!(seen, vec!["from worker"]);
    }

    #[test]
    fn test_waker_runs_on_post() {
        let executor = UiExecutor::<()>::new();
        let sender = executor.sender();
        let wakes = Arc::new(AtomicUsize::new(0));
        let counter = wakes.clone();
        executor.set_waker(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        sender.post(()).unwrap();
        sender.post(()).unwrap();
        assert_eq!(wakes.load(Ordering::SeqCst), 2);

        executor.clear_waker();
        sender.post(()).unwrap();
        assert_eq!(wakes.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_post_after_drop_fails() {
        let executor = UiExecutor::<u8>::new();
        let sender = executor.sender();
        drop(executor);

        assert_eq!(sender.post(1), Err(CoreError::ExecutorClosed));
    }

    #[test]
    fn test_drain_all_leaves_reposted_messages() {
        let executor = UiExecutor::<u32>::new();
        let sender = executor.sender();
        sender.post(1).unwrap();

        let reposter = executor.sender();
        let processed = executor.drain_all(|m| {
            reposter.post(m + 1).unwrap();
        });

        assert_eq!(processed, 1);
        assert_eq!(executor.pending_count(), 1);
    }
}
