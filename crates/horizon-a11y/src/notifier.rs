//! Off-thread update requests.
//!
//! Application code running on a worker thread cannot touch an adapter. It
//! holds an [`UpdateNotifier`] instead, which posts an [`UpdateRequest`] to
//! the bridge's UI executor; the UI thread delivers it in
//! [`AccessibilityBridge::process_pending`](crate::AccessibilityBridge::process_pending).
//!
//! Requests coalesce per adapter. The pending flag is set when a request is
//! posted and cleared by the UI thread just before delivery, so a request
//! made while a delivery is under way schedules one more delivery. Every
//! burst yields at least one delivery and none is lost.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use horizon_a11y_core::UiSender;
use horizon_a11y_core::logging::targets;

use crate::registry::AdapterHandle;

/// A queued "this adapter's tree changed" message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateRequest {
    pub handle: AdapterHandle,
}

/// Thread-safe trigger for an adapter's update notification.
#[derive(Debug, Clone)]
pub struct UpdateNotifier {
    handle: AdapterHandle,
    sender: UiSender<UpdateRequest>,
    pending: Arc<AtomicBool>,
    coalesce: bool,
}

impl UpdateNotifier {
    pub(crate) fn new(
        handle: AdapterHandle,
        sender: UiSender<UpdateRequest>,
        pending: Arc<AtomicBool>,
        coalesce: bool,
    ) -> Self {
        Self {
            handle,
            sender,
            pending,
            coalesce,
        }
    }

    /// The adapter this notifier signals for.
    pub fn handle(&self) -> AdapterHandle {
        self.handle
    }

    /// Schedule an update notification on the UI thread.
    ///
    /// Returns immediately. `Ok(false)` means a request for this adapter was
    /// already queued and this one folded into it. Fails only when the
    /// bridge has been dropped.
    pub fn request_update(&self) -> horizon_a11y_core::Result<bool> {
        if self.coalesce && self.pending.swap(true, Ordering::AcqRel) {
            tracing::trace!(target: targets::NOTIFY, handle = ?self.handle, "update coalesced");
            return Ok(false);
        }

        if let Err(err) = self.sender.post(UpdateRequest {
            handle: self.handle,
        }) {
            self.pending.store(false, Ordering::Release);
            return Err(err);
        }
        tracing::trace!(
            target: targets::NOTIFY,
            handle = ?self.handle,
            ui_thread = self.sender.is_ui_thread(),
            "update posted"
        );
        Ok(true)
    }

    /// Check if a request is queued and not yet delivered.
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }
}

static_assertions::assert_impl_all!(UpdateNotifier: Send, Sync, Clone);

#[cfg(test)]
mod tests {
    use horizon_a11y_core::{CoreError, UiExecutor};

    use super::*;

    fn notifier(executor: &UiExecutor<UpdateRequest>, coalesce: bool) -> UpdateNotifier {
        UpdateNotifier::new(
            AdapterHandle::default(),
            executor.sender(),
            Arc::new(AtomicBool::new(false)),
            coalesce,
        )
    }

    #[test]
    fn test_coalesces_until_cleared() {
        let executor = UiExecutor::new();
        let notifier = notifier(&executor, true);

        assert!(notifier.request_update().unwrap());
        assert!(!notifier.request_update().unwrap());
        assert!(notifier.is_pending());
        assert_eq!(executor.pending_count(), 1);

        notifier.pending.store(false, Ordering::Release);
        assert!(notifier.request_update().unwrap());
        assert_eq!(executor.pending_count(), 2);
    }

    #[test]
    fn test_without_coalescing_every_request_posts() {
        let executor = UiExecutor::new();
        let notifier = notifier(&executor, false);

        for _ in 0..3 {
            assert!(notifier.request_update().unwrap());
        }
        assert_eq!(executor.pending_count(), 3);
    }

    #[test]
    fn test_closed_executor() {
        let executor = UiExecutor::new();
        let notifier = notifier(&executor, true);
        drop(executor);

        assert_eq!(notifier.request_update(), Err(CoreError::ExecutorClosed));
        assert!(!notifier.is_pending());
    }
}
