//! Accessibility bridge adapter for Horizon A11y.
//!
//! The bridge keeps an accessibility tree in step with a host UI surface and
//! answers the host accessibility framework's on-demand queries against it:
//! node descriptions, focus lookup, hit testing and action dispatch.
//!
//! # Architecture
//!
//! - [`AccessibilityTree`] stores [`AccessibleNode`]s keyed by AccessKit
//!   [`NodeId`](accesskit::NodeId)s and owns structure and input focus.
//! - [`Adapter`] wraps one tree with the per-surface translation state
//!   (surface transform, accessibility focus, hover target).
//! - [`AdapterRegistry`] hands out generational [`AdapterHandle`]s; a
//!   destroyed handle resolves to nothing, so late host queries are harmless.
//! - [`AccessibilityBridge`] is owned by the surface's lifecycle object and
//!   carries the registry plus the UI executor that off-thread
//!   [`UpdateNotifier`]s post to.
//! - The host side is the [`HostSurface`] trait; the application side is the
//!   [`ActivationHandler`] and [`ActionHandler`] traits.
//!
//! Everything except [`UpdateNotifier`] stays on the UI thread.
//!
//! # Example
//!
//! ```
//! use std::cell::RefCell;
//!
//! use accesskit::{NodeId, Rect};
//! use horizon_a11y::{
//!     AccessibilityBridge, AccessibleNode, AccessibleRole, FocusType, HostSurface,
//!     PlatformAction, PlatformActionKind, PlatformEvent, ROOT_ID,
//! };
//!
//! #[derive(Default)]
//! struct Surface {
//!     events: RefCell<Vec<PlatformEvent>>,
//! }
//!
//! impl HostSurface for Surface {
//!     fn invalidate_accessibility(&self) {}
//!
//!     fn send_event(&self, event: &PlatformEvent) {
//!         self.events.borrow_mut().push(event.clone());
//!     }
//! }
//!
//! let surface = Surface::default();
//! let mut bridge = AccessibilityBridge::new();
//! let handle = bridge.create().unwrap();
//! let registry = bridge.registry_mut();
//!
//! registry
//!     .tree_mut(handle)
//!     .unwrap()
//!     .insert(
//!         ROOT_ID,
//!         NodeId(1),
//!         AccessibleNode::new(AccessibleRole::Button)
//!             .with_name("OK")
//!             .with_bounds(Rect::new(0.0, 0.0, 100.0, 40.0))
//!             .focusable(),
//!     )
//!     .unwrap();
//!
//! assert_eq!(registry.hit_test(handle, &surface, 50.0, 20.0), Some(1));
//!
//! let focus = PlatformAction::new(PlatformActionKind::Focus);
//! assert!(registry.perform_action(handle, &surface, 1, &focus));
//!
//! let focused = registry.find_focus(handle, &surface, FocusType::Input).unwrap();
//! assert_eq!(focused.text.as_deref(), Some("OK"));
//! ```

mod action;
mod adapter;
mod bridge;
mod config;
mod error;
mod events;
mod host;
mod info;
mod node;
mod notifier;
mod registry;
mod role;
mod tree;

pub use accesskit;

pub use action::{
    ARG_SET_TEXT, ActionArguments, ActionHandler, ArgumentValue, PlatformAction,
    PlatformActionKind,
};
pub use adapter::{ActivationHandler, Adapter, AdapterState};
pub use bridge::AccessibilityBridge;
pub use config::BridgeConfig;
pub use error::{BridgeError, Result, TreeError, TreeResult};
pub use events::{PlatformEvent, QueuedEvents, motion};
pub use host::HostSurface;
pub use info::{FocusType, HOST_VIEW_ID, NodeInfoFlags, PlatformNodeInfo};
pub use node::{AccessibleNode, NodeStates};
pub use notifier::{UpdateNotifier, UpdateRequest};
pub use registry::{AdapterHandle, AdapterRegistry};
pub use role::AccessibleRole;
pub use tree::{AccessibilityTree, MAX_NODE_ID, ROOT_ID, UpdateSummary};
