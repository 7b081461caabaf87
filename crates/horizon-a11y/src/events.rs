//! Accessibility events raised on the host surface.

use crate::host::HostSurface;

/// Hover motion actions delivered by the host's pointer events.
pub mod motion {
    /// The pointer moved while hovering.
    pub const ACTION_HOVER_MOVE: i32 = 7;
    /// The pointer started hovering over the surface.
    pub const ACTION_HOVER_ENTER: i32 = 9;
    /// The pointer left the surface.
    pub const ACTION_HOVER_EXIT: i32 = 10;
}

/// An event for the host's accessibility framework.
///
/// Virtual ids follow the node-info convention: the root is
/// [`HOST_VIEW_ID`](crate::HOST_VIEW_ID).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformEvent {
    /// Content of the subtree rooted at the node changed.
    WindowContentChanged { virtual_id: i32 },
    /// The node gained input focus.
    ViewFocused { virtual_id: i32 },
    /// The node was clicked.
    ViewClicked { virtual_id: i32 },
    /// The node's text was replaced.
    TextChanged {
        virtual_id: i32,
        before: Option<String>,
        after: Option<String>,
    },
    /// The node gained accessibility focus.
    AccessibilityFocused { virtual_id: i32 },
    /// The node lost accessibility focus.
    AccessibilityFocusCleared { virtual_id: i32 },
    /// The pointer entered the node.
    HoverEnter { virtual_id: i32 },
    /// The pointer left the node.
    HoverExit { virtual_id: i32 },
}

impl PlatformEvent {
    /// The platform event type value.
    pub fn event_type(&self) -> i32 {
        match self {
            PlatformEvent::ViewClicked { .. } => 0x1,
            PlatformEvent::ViewFocused { .. } => 0x8,
            PlatformEvent::TextChanged { .. } => 0x10,
            PlatformEvent::HoverEnter { .. } => 0x80,
            PlatformEvent::HoverExit { .. } => 0x100,
            PlatformEvent::WindowContentChanged { .. } => 0x800,
            PlatformEvent::AccessibilityFocused { .. } => 0x8000,
            PlatformEvent::AccessibilityFocusCleared { .. } => 0x10000,
        }
    }

    /// The virtual id the event is about.
    pub fn virtual_id(&self) -> i32 {
        match self {
            PlatformEvent::WindowContentChanged { virtual_id }
            | PlatformEvent::ViewFocused { virtual_id }
            | PlatformEvent::ViewClicked { virtual_id }
            | PlatformEvent::TextChanged { virtual_id, .. }
            | PlatformEvent::AccessibilityFocused { virtual_id }
            | PlatformEvent::AccessibilityFocusCleared { virtual_id }
            | PlatformEvent::HoverEnter { virtual_id }
            | PlatformEvent::HoverExit { virtual_id } => *virtual_id,
        }
    }
}

/// Events collected while the tree is borrowed, raised afterwards.
///
/// Raising happens once the adapter is done with its own state, so a host
/// that re-queries from inside `send_event` sees the finished change.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[must_use = "queued events do nothing until raised"]
pub struct QueuedEvents {
    events: Vec<PlatformEvent>,
}

impl QueuedEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: PlatformEvent) {
        self.events.push(event);
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// The queued events, in the order they will be raised.
    pub fn events(&self) -> &[PlatformEvent] {
        &self.events
    }

    /// Raise every event on the host surface, in order.
    pub fn raise<H: HostSurface + ?Sized>(self, host: &H) {
        for event in &self.events {
            host.send_event(event);
        }
    }
}

impl Extend<PlatformEvent> for QueuedEvents {
    fn extend<T: IntoIterator<Item = PlatformEvent>>(&mut self, iter: T) {
        self.events.extend(iter);
    }
}

impl IntoIterator for QueuedEvents {
    type Item = PlatformEvent;
    type IntoIter = std::vec::IntoIter<PlatformEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_types() {
        assert_eq!(PlatformEvent::ViewClicked { virtual_id: 1 }.event_type(), 1);
        assert_eq!(PlatformEvent::HoverEnter { virtual_id: 1 }.event_type(), 128);
        assert_eq!(PlatformEvent::WindowContentChanged { virtual_id: -1 }.event_type(), 2048);
        assert_eq!(
            PlatformEvent::AccessibilityFocusCleared { virtual_id: 2 }.event_type(),
            65536
        );
    }

    #[test]
    fn test_queue_keeps_order() {
        let mut queue = QueuedEvents::new();
        queue.push(PlatformEvent::HoverExit { virtual_id: 1 });
        queue.extend([PlatformEvent::HoverEnter { virtual_id: 2 }]);

        assert_eq!(queue.len(), 2);
        let ids: Vec<i32> = queue.into_iter().map(|event| event.virtual_id()).collect();
        assert_eq!(ids, vec![1, 2]);
    }
}
