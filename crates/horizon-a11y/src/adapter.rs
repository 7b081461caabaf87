//! The per-surface adapter.
//!
//! An [`Adapter`] owns one [`AccessibilityTree`] plus the translation state
//! the host framework needs between queries: the last surface transform it
//! reported, the screen reader's accessibility focus and the node under a
//! hovering pointer. Every query takes the host surface so bounds can be
//! mapped into its coordinate space.
//!
//! An adapter starts out `Created` and becomes `Active` on the host's first
//! query. At that moment its [`ActivationHandler`], if any, is asked for the
//! initial tree, so an application can build its tree lazily.
//!
//! Lookups that miss are normal here (the host may ask about a node removed
//! since its last query), so they return `None` or `false` and log at
//! `debug` rather than failing.

use std::marker::PhantomData;

use accesskit::{ActionRequest, Affine, NodeId, Point, TreeUpdate};
use horizon_a11y_core::QuerySpan;
use horizon_a11y_core::logging::targets;

use crate::action::{
    ActionHandler, Effect, FocusState, PlatformAction, PlatformActionKind, resolve,
};
use crate::error::TreeResult;
use crate::events::{PlatformEvent, QueuedEvents, motion};
use crate::host::HostSurface;
use crate::info::{
    FocusType, InfoContext, PlatformNodeInfo, node_id_from_virtual, virtual_id_from_node,
};
use crate::node::AccessibleNode;
use crate::role::AccessibleRole;
use crate::tree::AccessibilityTree;

/// Where an adapter is in its life.
///
/// A destroyed adapter no longer exists: its handle stops resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterState {
    /// Created but never queried by the host.
    Created,
    /// The host has queried the adapter at least once.
    Active,
}

/// Supplies an adapter's initial tree when the host first queries it.
///
/// Implemented for any `FnMut() -> Option<TreeUpdate>`. Returning `None`
/// keeps whatever tree the adapter already holds.
pub trait ActivationHandler {
    fn request_initial_tree(&mut self) -> Option<TreeUpdate>;
}

impl<F> ActivationHandler for F
where
    F: FnMut() -> Option<TreeUpdate>,
{
    fn request_initial_tree(&mut self) -> Option<TreeUpdate> {
        self()
    }
}

/// Bridge state for one UI surface.
pub struct Adapter {
    tree: AccessibilityTree,
    state: AdapterState,
    activation_handler: Option<Box<dyn ActivationHandler>>,
    action_handler: Option<Box<dyn ActionHandler>>,
    accessibility_focus: Option<NodeId>,
    hovered: Option<NodeId>,
    transform: Affine,
    _not_send: PhantomData<*const ()>,
}

impl Adapter {
    /// Create an adapter whose tree holds a single `Window` root.
    pub fn new() -> Self {
        Self::with_tree(AccessibilityTree::new(AccessibleNode::new(AccessibleRole::Window)))
    }

    /// Create an adapter around an existing tree.
    pub fn with_tree(tree: AccessibilityTree) -> Self {
        Self {
            tree,
            state: AdapterState::Created,
            activation_handler: None,
            action_handler: None,
            accessibility_focus: None,
            hovered: None,
            transform: Affine::IDENTITY,
            _not_send: PhantomData,
        }
    }

    pub fn state(&self) -> AdapterState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == AdapterState::Active
    }

    pub fn tree(&self) -> &AccessibilityTree {
        &self.tree
    }

    /// Mutable access to the tree. Call
    /// [`request_update`](Self::request_update) afterwards.
    pub fn tree_mut(&mut self) -> &mut AccessibilityTree {
        &mut self.tree
    }

    /// Install the handler asked for the initial tree on activation.
    ///
    /// Has no effect once the adapter is active.
    pub fn set_activation_handler(&mut self, handler: impl ActivationHandler + 'static) {
        if self.is_active() {
            tracing::debug!(target: targets::LIFECYCLE, "adapter already active, activation handler ignored");
            return;
        }
        self.activation_handler = Some(Box::new(handler));
    }

    /// Install the handler that receives forwarded action requests.
    pub fn set_action_handler(&mut self, handler: impl ActionHandler + 'static) {
        self.action_handler = Some(Box::new(handler));
    }

    /// The node holding accessibility focus, if it is still live.
    pub fn accessibility_focus(&self) -> Option<NodeId> {
        self.accessibility_focus
            .filter(|id| self.tree.contains(*id))
    }

    /// The node under the hovering pointer, if it is still live.
    pub fn hovered(&self) -> Option<NodeId> {
        self.hovered.filter(|id| self.tree.contains(*id))
    }

    /// Describe a node to the host.
    pub fn node_info<H: HostSurface + ?Sized>(
        &mut self,
        host: &H,
        virtual_id: i32,
    ) -> Option<PlatformNodeInfo> {
        let _span = QuerySpan::for_node("node_info", virtual_id);
        self.observe(host);

        let Some(id) = node_id_from_virtual(&self.tree, virtual_id) else {
            tracing::debug!(target: targets::QUERY, virtual_id, "invalid virtual id");
            return None;
        };
        self.describe(host, id)
    }

    /// Describe the node holding the given kind of focus.
    pub fn find_focus<H: HostSurface + ?Sized>(
        &mut self,
        host: &H,
        focus_type: FocusType,
    ) -> Option<PlatformNodeInfo> {
        let _span = QuerySpan::new("find_focus");
        self.observe(host);

        let focused = match focus_type {
            FocusType::Input => self.tree.focus(),
            FocusType::Accessibility => self.accessibility_focus(),
        }?;
        self.describe(host, focused)
    }

    /// Find the virtual id of the node under a surface-space point.
    pub fn hit_test<H: HostSurface + ?Sized>(&mut self, host: &H, x: f64, y: f64) -> Option<i32> {
        let _span = QuerySpan::new("hit_test");
        self.observe(host);
        self.hit_test_node(x, y)
            .map(|id| virtual_id_from_node(&self.tree, id))
    }

    /// Perform a host-requested action on a node.
    ///
    /// Returns `true` if the action applies to the node in its current state
    /// and was carried out. Resulting platform events are raised on `host`
    /// before returning.
    pub fn perform_action<H: HostSurface + ?Sized>(
        &mut self,
        host: &H,
        virtual_id: i32,
        action: &PlatformAction,
    ) -> bool {
        let _span = QuerySpan::for_node("perform_action", virtual_id);
        self.observe(host);

        let Some(id) = node_id_from_virtual(&self.tree, virtual_id) else {
            tracing::debug!(target: targets::ACTION, virtual_id, "invalid virtual id");
            return false;
        };
        let Some(node) = self.tree.get(id) else {
            tracing::debug!(target: targets::ACTION, virtual_id, "action on missing node");
            return false;
        };

        let focus = FocusState {
            input: self.tree.focus() == Some(id),
            accessibility: self.accessibility_focus() == Some(id),
        };
        let Some(resolution) = resolve(node, action, focus) else {
            tracing::debug!(
                target: targets::ACTION,
                virtual_id,
                kind = ?action.kind,
                role = ?node.role(),
                "action not applicable"
            );
            return false;
        };

        let virtual_id = virtual_id_from_node(&self.tree, id);
        let mut events = QueuedEvents::new();
        match resolution.effect {
            Effect::None => {}
            Effect::SetInputFocus => {
                if let Ok(previous) = self.tree.set_focus(Some(id))
                    && previous != Some(id)
                {
                    events.push(PlatformEvent::ViewFocused { virtual_id });
                }
            }
            Effect::ClearInputFocus => {
                self.tree.clear_focus();
            }
            Effect::SetAccessibilityFocus => {
                if let Some(previous) = self.accessibility_focus()
                    && previous != id
                {
                    events.push(PlatformEvent::AccessibilityFocusCleared {
                        virtual_id: virtual_id_from_node(&self.tree, previous),
                    });
                }
                self.accessibility_focus = Some(id);
                events.push(PlatformEvent::AccessibilityFocused { virtual_id });
            }
            Effect::ClearAccessibilityFocus => {
                self.accessibility_focus = None;
                events.push(PlatformEvent::AccessibilityFocusCleared { virtual_id });
            }
            Effect::SetValue(text) => {
                if let Some(node) = self.tree.get_mut(id) {
                    let before = node.value().map(str::to_owned);
                    node.set_value(Some(text.clone()));
                    events.push(PlatformEvent::TextChanged {
                        virtual_id,
                        before,
                        after: Some(text),
                    });
                }
            }
        }
        if action.kind == PlatformActionKind::Click {
            events.push(PlatformEvent::ViewClicked { virtual_id });
        }

        if let Some((action, data)) = resolution.forward {
            match self.action_handler.as_mut() {
                Some(handler) => {
                    tracing::trace!(target: targets::ACTION, ?action, ?id, "forwarding action");
                    handler.do_action(ActionRequest {
                        action,
                        target: id,
                        data,
                    });
                }
                None => {
                    tracing::debug!(target: targets::ACTION, ?action, ?id, "no action handler installed");
                }
            }
        }

        events.raise(host);
        true
    }

    /// Track a hovering pointer, raising hover enter/exit events.
    ///
    /// Returns `true` if any event was raised; `false` tells the host to
    /// fall back to its default hover handling.
    pub fn on_hover_event<H: HostSurface + ?Sized>(
        &mut self,
        host: &H,
        action: i32,
        x: f64,
        y: f64,
    ) -> bool {
        let _span = QuerySpan::new("hover");
        self.observe(host);

        let mut events = QueuedEvents::new();
        match action {
            motion::ACTION_HOVER_ENTER | motion::ACTION_HOVER_MOVE => {
                let target = self.hit_test_node(x, y);
                let previous = self.hovered();
                if target != previous {
                    if let Some(previous) = previous {
                        events.push(PlatformEvent::HoverExit {
                            virtual_id: virtual_id_from_node(&self.tree, previous),
                        });
                    }
                    if let Some(target) = target {
                        events.push(PlatformEvent::HoverEnter {
                            virtual_id: virtual_id_from_node(&self.tree, target),
                        });
                    }
                }
                self.hovered = target;
            }
            motion::ACTION_HOVER_EXIT => {
                if let Some(previous) = self.hovered() {
                    events.push(PlatformEvent::HoverExit {
                        virtual_id: virtual_id_from_node(&self.tree, previous),
                    });
                }
                self.hovered = None;
            }
            _ => {
                tracing::trace!(target: targets::QUERY, action, "ignoring motion action");
                return false;
            }
        }

        if events.is_empty() {
            return false;
        }
        events.raise(host);
        true
    }

    /// Apply a tree update, but only once the host has started querying.
    ///
    /// `factory` is not called while the adapter is still `Created`. Returns
    /// whether the update was applied.
    pub fn update_if_active<H, F>(&mut self, host: &H, factory: F) -> TreeResult<bool>
    where
        H: HostSurface + ?Sized,
        F: FnOnce() -> TreeUpdate,
    {
        if !self.is_active() {
            tracing::trace!(target: targets::NOTIFY, "adapter not active, update skipped");
            return Ok(false);
        }
        let events = self.apply_update(factory())?;
        events.raise(host);
        Ok(true)
    }

    /// Tell the host the tree changed.
    pub fn request_update<H: HostSurface + ?Sized>(&self, host: &H) {
        tracing::trace!(target: targets::NOTIFY, "invalidating host accessibility");
        host.invalidate_accessibility();
    }

    fn apply_update(&mut self, update: TreeUpdate) -> TreeResult<QueuedEvents> {
        let summary = self.tree.apply_update(update)?;

        let mut events = QueuedEvents::new();
        events.push(PlatformEvent::WindowContentChanged {
            virtual_id: virtual_id_from_node(&self.tree, self.tree.root()),
        });
        if summary.focus_changed()
            && let Some(focus) = summary.new_focus
        {
            events.push(PlatformEvent::ViewFocused {
                virtual_id: virtual_id_from_node(&self.tree, focus),
            });
        }

        if self.accessibility_focus.is_some() && self.accessibility_focus().is_none() {
            self.accessibility_focus = None;
        }
        if self.hovered.is_some() && self.hovered().is_none() {
            self.hovered = None;
        }
        Ok(events)
    }

    /// Mark the adapter active and remember the host's current transform.
    fn observe<H: HostSurface + ?Sized>(&mut self, host: &H) {
        self.activate();
        self.transform = host.surface_transform();
    }

    fn activate(&mut self) {
        if self.state != AdapterState::Created {
            return;
        }
        self.state = AdapterState::Active;
        tracing::debug!(target: targets::LIFECYCLE, "adapter activated");

        let Some(mut handler) = self.activation_handler.take() else {
            return;
        };
        let Some(update) = handler.request_initial_tree() else {
            return;
        };
        // The host is mid-query and reads the tree directly; no events.
        match self.apply_update(update) {
            Ok(events) => drop(events),
            Err(error) => {
                tracing::warn!(target: targets::LIFECYCLE, %error, "initial tree rejected");
            }
        }
    }

    fn describe<H: HostSurface + ?Sized>(&self, host: &H, id: NodeId) -> Option<PlatformNodeInfo> {
        let Some(node) = self.tree.get(id) else {
            tracing::debug!(target: targets::QUERY, ?id, "node not found");
            return None;
        };
        let context = InfoContext {
            transform: self.transform,
            screen_origin: host.screen_origin(),
            accessibility_focus: self.accessibility_focus(),
        };
        Some(PlatformNodeInfo::build(&self.tree, id, node, &context))
    }

    fn hit_test_node(&self, x: f64, y: f64) -> Option<NodeId> {
        let [a, b, c, d, _, _] = self.transform.as_coeffs();
        if a * d - b * c == 0.0 {
            tracing::debug!(target: targets::QUERY, "surface transform is not invertible");
            return None;
        }
        let point = self.transform.inverse() * Point::new(x, y);
        self.tree.hit_test(point)
    }
}

impl Default for Adapter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Adapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Adapter")
            .field("state", &self.state)
            .field("nodes", &self.tree.len())
            .field("focus", &self.tree.focus())
            .field("accessibility_focus", &self.accessibility_focus)
            .field("hovered", &self.hovered)
            .finish_non_exhaustive()
    }
}

static_assertions::assert_not_impl_any!(Adapter: Send, Sync);
