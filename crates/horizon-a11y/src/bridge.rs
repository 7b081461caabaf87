//! The per-surface lifecycle object.
//!
//! An [`AccessibilityBridge`] is created by whatever owns the UI surface
//! (on Android, the activity's view glue) and lives exactly as long as it.
//! It owns the adapter registry and the UI executor, so there is no global
//! adapter reference anywhere.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use horizon_a11y_core::logging::targets;
use horizon_a11y_core::{ThreadAffinity, UiExecutor, debug_assert_ui_thread};
use slotmap::SecondaryMap;

use crate::config::BridgeConfig;
use crate::error::Result;
use crate::host::HostSurface;
use crate::notifier::{UpdateNotifier, UpdateRequest};
use crate::registry::{AdapterHandle, AdapterRegistry};

/// Accessibility state for one UI surface.
///
/// Must be created on the UI thread; it records that thread and refuses to
/// leave it.
pub struct AccessibilityBridge {
    registry: AdapterRegistry,
    executor: UiExecutor<UpdateRequest>,
    pending: SecondaryMap<AdapterHandle, Arc<AtomicBool>>,
    config: BridgeConfig,
}

impl AccessibilityBridge {
    /// Create a bridge with the default configuration.
    pub fn new() -> Self {
        Self::with_config(BridgeConfig::default())
    }

    pub fn with_config(config: BridgeConfig) -> Self {
        let executor = UiExecutor::with_batch_size(config.drain_batch_size.max(1));
        tracing::debug!(
            target: targets::LIFECYCLE,
            max_adapters = config.max_adapters,
            coalesce = config.coalesce_updates,
            "accessibility bridge created"
        );
        Self {
            registry: AdapterRegistry::with_config(&config),
            executor,
            pending: SecondaryMap::new(),
            config,
        }
    }

    /// Parse a TOML configuration and create a bridge from it.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(Self::with_config(BridgeConfig::from_toml_str(source)?))
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// The UI thread this bridge belongs to.
    pub fn affinity(&self) -> ThreadAffinity {
        self.executor.affinity()
    }

    /// Create an adapter for the surface.
    pub fn create(&mut self) -> Result<AdapterHandle> {
        debug_assert_ui_thread!(self.executor.affinity());
        let handle = self.registry.create()?;
        self.pending.insert(handle, Arc::new(AtomicBool::new(false)));
        Ok(handle)
    }

    /// Destroy an adapter. Returns `false` if it was already gone.
    ///
    /// Update requests still queued for it are dropped on delivery.
    pub fn destroy(&mut self, handle: AdapterHandle) -> bool {
        debug_assert_ui_thread!(self.executor.affinity());
        self.pending.remove(handle);
        self.registry.destroy(handle)
    }

    pub fn registry(&self) -> &AdapterRegistry {
        &self.registry
    }

    /// The registry, for queries, actions and tree edits.
    pub fn registry_mut(&mut self) -> &mut AdapterRegistry {
        debug_assert_ui_thread!(self.executor.affinity());
        &mut self.registry
    }

    /// A thread-safe notifier for an adapter, or `None` if it is gone.
    pub fn notifier(&self, handle: AdapterHandle) -> Option<UpdateNotifier> {
        let pending = self.pending.get(handle)?;
        Some(UpdateNotifier::new(
            handle,
            self.executor.sender(),
            Arc::clone(pending),
            self.config.coalesce_updates,
        ))
    }

    /// Install a callback run after every off-thread post.
    ///
    /// Hosts use it to schedule [`process_pending`](Self::process_pending)
    /// on their UI looper. It runs on the posting thread.
    pub fn set_waker<F>(&self, waker: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.executor.set_waker(waker);
    }

    /// Notify the host now that an adapter's tree changed.
    ///
    /// The UI-thread path of the update notifier. Returns `false` for a
    /// destroyed handle.
    pub fn request_update<H: HostSurface + ?Sized>(&self, handle: AdapterHandle, host: &H) -> bool {
        debug_assert_ui_thread!(self.executor.affinity());
        self.registry.request_update(handle, host)
    }

    /// Check if off-thread update requests are waiting.
    pub fn has_pending(&self) -> bool {
        self.executor.has_pending()
    }

    /// Deliver queued update requests on the UI thread.
    ///
    /// Each request's pending flag is cleared before the host is notified.
    /// Returns the number of notifications delivered; requests for destroyed
    /// adapters are dropped and not counted.
    pub fn process_pending<H: HostSurface + ?Sized>(&mut self, host: &H) -> usize {
        debug_assert_ui_thread!(self.executor.affinity());

        let Self {
            registry,
            executor,
            pending,
            config,
        } = self;

        let mut delivered = 0;
        let deliver = |request: UpdateRequest| {
            if let Some(flag) = pending.get(request.handle) {
                flag.store(false, Ordering::Release);
            }
            if registry.request_update(request.handle, host) {
                delivered += 1;
            }
        };
        let drained = if config.drain_batch_size == 0 {
            executor.drain_all(deliver)
        } else {
            executor.drain_batch(deliver)
        };

        if drained > 0 {
            tracing::debug!(target: targets::NOTIFY, drained, delivered, "processed update requests");
        }
        delivered
    }
}

impl Default for AccessibilityBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for AccessibilityBridge {
    fn drop(&mut self) {
        self.executor.clear_waker();
        tracing::debug!(
            target: targets::LIFECYCLE,
            live_adapters = self.registry.len(),
            "accessibility bridge dropped"
        );
    }
}

impl std::fmt::Debug for AccessibilityBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessibilityBridge")
            .field("registry", &self.registry)
            .field("queued", &self.executor.pending_count())
            .field("config", &self.config)
            .finish()
    }
}

static_assertions::assert_not_impl_any!(AccessibilityBridge: Send, Sync);

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::events::PlatformEvent;

    #[derive(Default)]
    struct CountingHost {
        invalidations: Cell<usize>,
    }

    impl HostSurface for CountingHost {
        fn invalidate_accessibility(&self) {
            self.invalidations.set(self.invalidations.get() + 1);
        }

        fn send_event(&self, _event: &PlatformEvent) {}
    }

    #[test]
    fn test_notifier_on_ui_thread_is_queued() {
        let host = CountingHost::default();
        let mut bridge = AccessibilityBridge::new();
        let handle = bridge.create().unwrap();
        let notifier = bridge.notifier(handle).unwrap();

        notifier.request_update().unwrap();
        assert_eq!(host.invalidations.get(), 0);
        assert!(bridge.has_pending());

        assert_eq!(bridge.process_pending(&host), 1);
        assert_eq!(host.invalidations.get(), 1);
        assert!(!notifier.is_pending());
    }

    #[test]
    fn test_synchronous_request_update() {
        let host = CountingHost::default();
        let mut bridge = AccessibilityBridge::new();
        let handle = bridge.create().unwrap();

        assert!(bridge.request_update(handle, &host));
        assert_eq!(host.invalidations.get(), 1);

        bridge.destroy(handle);
        assert!(!bridge.request_update(handle, &host));
        assert!(bridge.notifier(handle).is_none());
    }

    #[test]
    fn test_batched_drain() {
        let host = CountingHost::default();
        let config = BridgeConfig {
            coalesce_updates: false,
            drain_batch_size: 2,
            ..BridgeConfig::default()
        };
        let mut bridge = AccessibilityBridge::with_config(config);
        let handle = bridge.create().unwrap();
        let notifier = bridge.notifier(handle).unwrap();
        for _ in 0..5 {
            notifier.request_update().unwrap();
        }

        assert_eq!(bridge.process_pending(&host), 2);
        assert_eq!(bridge.process_pending(&host), 2);
        assert_eq!(bridge.process_pending(&host), 1);
        assert_eq!(bridge.process_pending(&host), 0);
        assert_eq!(host.invalidations.get(), 5);
    }

    #[test]
    fn test_from_toml_str() {
        let bridge = AccessibilityBridge::from_toml_str("max_adapters = 2").unwrap();
        assert_eq!(bridge.config().max_adapters, 2);
        assert_eq!(bridge.registry().capacity(), 2);
    }
}
