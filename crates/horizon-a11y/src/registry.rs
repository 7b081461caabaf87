//! Adapter handles and the registry that resolves them.
//!
//! Host glue keeps an [`AdapterHandle`] (often as a raw `u64` in a native
//! field) instead of a pointer. Destroying a handle removes its adapter from
//! the registry in one step, so any later call with that handle resolves to
//! nothing: queries return `None`, actions return `false`, and a diagnostic
//! is logged. Handles are generational and never resolve to a different
//! adapter after their own is gone.

use accesskit::TreeUpdate;
use horizon_a11y_core::logging::targets;
use slotmap::{SlotMap, new_key_type};

use crate::action::{ActionHandler, PlatformAction};
use crate::adapter::{ActivationHandler, Adapter, AdapterState};
use crate::config::BridgeConfig;
use crate::error::{BridgeError, Result, TreeResult};
use crate::host::HostSurface;
use crate::info::{FocusType, PlatformNodeInfo};
use crate::node::AccessibleNode;
use crate::role::AccessibleRole;
use crate::tree::AccessibilityTree;

new_key_type! {
    /// An opaque handle to one adapter.
    ///
    /// Handles stay cheap to copy and safe to keep after destruction: a
    /// stale handle simply stops resolving.
    pub struct AdapterHandle;
}

impl AdapterHandle {
    /// Convert the handle to a raw `u64` for storage in host glue.
    #[inline]
    pub fn as_raw(self) -> u64 {
        use slotmap::Key;
        self.data().as_ffi()
    }

    /// Rebuild a handle from [`as_raw`](Self::as_raw) output.
    ///
    /// This does not check that the adapter still exists.
    #[inline]
    pub fn from_raw(raw: u64) -> Self {
        Self::from(slotmap::KeyData::from_ffi(raw))
    }
}

/// Owns every live adapter of a bridge.
pub struct AdapterRegistry {
    adapters: SlotMap<AdapterHandle, Adapter>,
    capacity: usize,
    root_name: Option<String>,
    toolkit_name: Option<String>,
    toolkit_version: Option<String>,
}

impl AdapterRegistry {
    /// Create a registry with the default configuration.
    pub fn new() -> Self {
        Self::with_config(&BridgeConfig::default())
    }

    pub fn with_config(config: &BridgeConfig) -> Self {
        Self {
            adapters: SlotMap::with_key(),
            capacity: config.max_adapters,
            root_name: config.root_name.clone(),
            toolkit_name: config.toolkit_name.clone(),
            toolkit_version: config.toolkit_version.clone(),
        }
    }

    /// Create an adapter whose tree holds only a `Window` root with id 0.
    ///
    /// Fails with [`BridgeError::RegistryFull`] when the configured number of
    /// live adapters is reached.
    pub fn create(&mut self) -> Result<AdapterHandle> {
        if self.adapters.len() >= self.capacity {
            tracing::warn!(target: targets::LIFECYCLE, capacity = self.capacity, "adapter registry full");
            return Err(BridgeError::RegistryFull {
                capacity: self.capacity,
            });
        }

        let mut root = AccessibleNode::new(AccessibleRole::Window);
        if let Some(name) = &self.root_name {
            root = root.with_name(name.clone());
        }
        let mut tree = AccessibilityTree::new(root);
        tree.set_toolkit(self.toolkit_name.clone(), self.toolkit_version.clone());

        let handle = self.adapters.insert(Adapter::with_tree(tree));
        tracing::debug!(target: targets::LIFECYCLE, ?handle, "created adapter");
        Ok(handle)
    }

    /// Destroy an adapter and everything it owns.
    ///
    /// Returns `false` if the handle was already destroyed.
    pub fn destroy(&mut self, handle: AdapterHandle) -> bool {
        match self.adapters.remove(handle) {
            Some(adapter) => {
                tracing::debug!(
                    target: targets::LIFECYCLE,
                    ?handle,
                    nodes = adapter.tree().len(),
                    "destroyed adapter"
                );
                drop(adapter);
                true
            }
            None => {
                tracing::debug!(target: targets::LIFECYCLE, ?handle, "destroy of invalid handle");
                false
            }
        }
    }

    pub fn contains(&self, handle: AdapterHandle) -> bool {
        self.adapters.contains_key(handle)
    }

    /// Number of live adapters.
    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Handles of every live adapter.
    pub fn handles(&self) -> impl Iterator<Item = AdapterHandle> + '_ {
        self.adapters.keys()
    }

    pub fn get(&self, handle: AdapterHandle) -> Option<&Adapter> {
        self.adapters.get(handle)
    }

    pub fn get_mut(&mut self, handle: AdapterHandle) -> Option<&mut Adapter> {
        self.adapters.get_mut(handle)
    }

    /// The lifecycle state, or `None` once destroyed.
    pub fn state(&self, handle: AdapterHandle) -> Option<AdapterState> {
        self.adapters.get(handle).map(Adapter::state)
    }

    /// Mutable access to an adapter's tree.
    pub fn tree_mut(&mut self, handle: AdapterHandle) -> Option<&mut AccessibilityTree> {
        self.resolve(handle, "tree_mut").map(Adapter::tree_mut)
    }

    /// Install the handler that supplies an adapter's initial tree.
    ///
    /// Returns `false` for a destroyed handle.
    pub fn set_activation_handler(
        &mut self,
        handle: AdapterHandle,
        handler: impl ActivationHandler + 'static,
    ) -> bool {
        match self.resolve(handle, "set_activation_handler") {
            Some(adapter) => {
                adapter.set_activation_handler(handler);
                true
            }
            None => false,
        }
    }

    /// Install the application's action handler on an adapter.
    pub fn set_action_handler(
        &mut self,
        handle: AdapterHandle,
        handler: impl ActionHandler + 'static,
    ) -> bool {
        match self.resolve(handle, "set_action_handler") {
            Some(adapter) => {
                adapter.set_action_handler(handler);
                true
            }
            None => false,
        }
    }

    pub fn node_info<H: HostSurface + ?Sized>(
        &mut self,
        handle: AdapterHandle,
        host: &H,
        virtual_id: i32,
    ) -> Option<PlatformNodeInfo> {
        self.resolve(handle, "node_info")?
            .node_info(host, virtual_id)
    }

    pub fn find_focus<H: HostSurface + ?Sized>(
        &mut self,
        handle: AdapterHandle,
        host: &H,
        focus_type: FocusType,
    ) -> Option<PlatformNodeInfo> {
        self.resolve(handle, "find_focus")?
            .find_focus(host, focus_type)
    }

    pub fn hit_test<H: HostSurface + ?Sized>(
        &mut self,
        handle: AdapterHandle,
        host: &H,
        x: f64,
        y: f64,
    ) -> Option<i32> {
        self.resolve(handle, "hit_test")?.hit_test(host, x, y)
    }

    pub fn perform_action<H: HostSurface + ?Sized>(
        &mut self,
        handle: AdapterHandle,
        host: &H,
        virtual_id: i32,
        action: &PlatformAction,
    ) -> bool {
        self.resolve(handle, "perform_action")
            .is_some_and(|adapter| adapter.perform_action(host, virtual_id, action))
    }

    pub fn on_hover_event<H: HostSurface + ?Sized>(
        &mut self,
        handle: AdapterHandle,
        host: &H,
        action: i32,
        x: f64,
        y: f64,
    ) -> bool {
        self.resolve(handle, "on_hover_event")
            .is_some_and(|adapter| adapter.on_hover_event(host, action, x, y))
    }

    /// Apply a tree update if the adapter is live and active.
    pub fn update_if_active<H, F>(
        &mut self,
        handle: AdapterHandle,
        host: &H,
        factory: F,
    ) -> TreeResult<bool>
    where
        H: HostSurface + ?Sized,
        F: FnOnce() -> TreeUpdate,
    {
        match self.resolve(handle, "update_if_active") {
            Some(adapter) => adapter.update_if_active(host, factory),
            None => Ok(false),
        }
    }

    /// Tell the host an adapter's tree changed.
    pub fn request_update<H: HostSurface + ?Sized>(&self, handle: AdapterHandle, host: &H) -> bool {
        match self.adapters.get(handle) {
            Some(adapter) => {
                adapter.request_update(host);
                true
            }
            None => {
                tracing::debug!(target: targets::NOTIFY, ?handle, "update for invalid handle dropped");
                false
            }
        }
    }

    fn resolve(&mut self, handle: AdapterHandle, operation: &'static str) -> Option<&mut Adapter> {
        let adapter = self.adapters.get_mut(handle);
        if adapter.is_none() {
            tracing::debug!(target: targets::QUERY, ?handle, operation, "invalid adapter handle");
        }
        adapter
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterRegistry")
            .field("live", &self.adapters.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}

static_assertions::assert_not_impl_any!(AdapterRegistry: Send, Sync);
static_assertions::assert_impl_all!(AdapterHandle: Send, Sync, Copy);
