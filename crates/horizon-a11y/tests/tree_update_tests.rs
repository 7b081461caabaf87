//! Tests for applying AccessKit tree updates through an adapter.

mod common;

use common::{RecordingHost, init_logging};
use horizon_a11y::accesskit::{Action, Node, NodeId, Rect, Role, Tree, TreeUpdate};
use horizon_a11y::{
    AccessibilityBridge, AdapterHandle, AdapterState, FocusType, HOST_VIEW_ID, PlatformAction,
    PlatformActionKind, PlatformEvent, ROOT_ID, TreeError,
};

fn window(children: &[u64]) -> Node {
    let mut node = Node::new(Role::Window);
    node.set_children(children.iter().copied().map(NodeId).collect::<Vec<_>>());
    node
}

fn button(label: &str, bounds: Rect) -> Node {
    let mut node = Node::new(Role::Button);
    node.set_label(label);
    node.set_bounds(bounds);
    node.add_action(Action::Focus);
    node.add_action(Action::Click);
    node
}

fn active_adapter(host: &RecordingHost) -> (AccessibilityBridge, AdapterHandle) {
    init_logging();
    let mut bridge = AccessibilityBridge::new();
    let handle = bridge.create().unwrap();
    bridge.registry_mut().node_info(handle, host, HOST_VIEW_ID);
    assert_eq!(bridge.registry().state(handle), Some(AdapterState::Active));
    (bridge, handle)
}

#[test]
fn test_update_is_deferred_until_first_query() {
    let host = RecordingHost::new();
    let mut bridge = AccessibilityBridge::new();
    let handle = bridge.create().unwrap();

    let registry = bridge.registry_mut();
    let applied = registry
        .update_if_active(handle, &host, || TreeUpdate {
            nodes: vec![(ROOT_ID, window(&[]))],
            tree: None,
            focus: ROOT_ID,
        })
        .unwrap();
    assert!(!applied);
    assert_eq!(registry.state(handle), Some(AdapterState::Created));

    registry.hit_test(handle, &host, 0.0, 0.0);
    assert_eq!(registry.state(handle), Some(AdapterState::Active));
}

#[test]
fn test_update_adds_nodes_and_moves_focus() {
    let host = RecordingHost::new();
    let (mut bridge, handle) = active_adapter(&host);
    let registry = bridge.registry_mut();

    registry
        .update_if_active(handle, &host, || TreeUpdate {
            nodes: vec![
                (ROOT_ID, window(&[1, 2])),
                (NodeId(1), button("Back", Rect::new(0.0, 0.0, 50.0, 50.0))),
                (NodeId(2), button("Next", Rect::new(50.0, 0.0, 100.0, 50.0))),
            ],
            tree: Some(Tree::new(ROOT_ID)),
            focus: NodeId(2),
        })
        .unwrap();

    assert_eq!(
        host.take_events(),
        vec![
            PlatformEvent::WindowContentChanged {
                virtual_id: HOST_VIEW_ID
            },
            PlatformEvent::ViewFocused { virtual_id: 2 },
        ]
    );
    let focused = registry.find_focus(handle, &host, FocusType::Input).unwrap();
    assert_eq!(focused.text.as_deref(), Some("Next"));
    assert!(focused.flags.focusable);
    assert_eq!(registry.hit_test(handle, &host, 75.0, 25.0), Some(2));

    let click = PlatformAction::new(PlatformActionKind::Click);
    assert!(registry.perform_action(handle, &host, 1, &click));
}

#[test]
fn test_update_reparents_and_drops_removed_nodes() {
    let host = RecordingHost::new();
    let (mut bridge, handle) = active_adapter(&host);
    let registry = bridge.registry_mut();

    let mut group = Node::new(Role::Group);
    group.set_children(vec![NodeId(2)]);
    registry
        .update_if_active(handle, &host, || TreeUpdate {
            nodes: vec![
                (ROOT_ID, window(&[1, 3])),
                (NodeId(1), group),
                (NodeId(2), button("Inner", Rect::new(0.0, 0.0, 10.0, 10.0))),
                (NodeId(3), Node::new(Role::Label)),
            ],
            tree: None,
            focus: ROOT_ID,
        })
        .unwrap();
    assert_eq!(registry.node_info(handle, &host, 2).unwrap().parent_virtual_id, Some(1));

    // Node 2 moves under the root; node 1 is no longer referenced.
    registry
        .update_if_active(handle, &host, || TreeUpdate {
            nodes: vec![(ROOT_ID, window(&[3, 2]))],
            tree: None,
            focus: ROOT_ID,
        })
        .unwrap();

    assert!(registry.node_info(handle, &host, 1).is_none());
    let inner = registry.node_info(handle, &host, 2).unwrap();
    assert_eq!(inner.parent_virtual_id, Some(HOST_VIEW_ID));
    assert_eq!(inner.text.as_deref(), Some("Inner"));
    assert_eq!(registry.node_info(handle, &host, 0).unwrap().children, vec![3, 2]);
}

#[test]
fn test_update_clears_accessibility_focus_of_removed_node() {
    let host = RecordingHost::new();
    let (mut bridge, handle) = active_adapter(&host);
    let registry = bridge.registry_mut();

    registry
        .update_if_active(handle, &host, || TreeUpdate {
            nodes: vec![
                (ROOT_ID, window(&[1])),
                (NodeId(1), button("Gone soon", Rect::new(0.0, 0.0, 10.0, 10.0))),
            ],
            tree: None,
            focus: ROOT_ID,
        })
        .unwrap();
    let a11y_focus = PlatformAction::new(PlatformActionKind::AccessibilityFocus);
    assert!(registry.perform_action(handle, &host, 1, &a11y_focus));
    assert!(registry.find_focus(handle, &host, FocusType::Accessibility).is_some());

    registry
        .update_if_active(handle, &host, || TreeUpdate {
            nodes: vec![(ROOT_ID, window(&[]))],
            tree: None,
            focus: ROOT_ID,
        })
        .unwrap();
    assert!(registry.find_focus(handle, &host, FocusType::Accessibility).is_none());
}

#[test]
fn test_rejected_update_leaves_tree_intact() {
    let host = RecordingHost::new();
    let (mut bridge, handle) = active_adapter(&host);
    let registry = bridge.registry_mut();

    let result = registry.update_if_active(handle, &host, || TreeUpdate {
        nodes: vec![(ROOT_ID, window(&[7]))],
        tree: None,
        focus: ROOT_ID,
    });
    assert_eq!(result, Err(TreeError::UnknownNode(NodeId(7))));
    assert!(host.take_events().is_empty());

    let too_large = NodeId(u64::from(u32::MAX));
    let result = registry.update_if_active(handle, &host, || TreeUpdate {
        nodes: vec![(ROOT_ID, window(&[too_large.0])), (too_large, Node::new(Role::Label))],
        tree: None,
        focus: ROOT_ID,
    });
    assert_eq!(result, Err(TreeError::IdOutOfRange(too_large)));
    assert!(registry.node_info(handle, &host, 0).unwrap().children.is_empty());
}

#[test]
fn test_activation_handler_builds_tree_on_first_query() {
    init_logging();
    let host = RecordingHost::new();
    let mut bridge = AccessibilityBridge::new();
    let handle = bridge.create().unwrap();
    let registry = bridge.registry_mut();

    assert!(registry.set_activation_handler(handle, || {
        Some(TreeUpdate {
            nodes: vec![
                (ROOT_ID, window(&[1])),
                (NodeId(1), button("Start", Rect::new(0.0, 0.0, 80.0, 40.0))),
            ],
            tree: None,
            focus: NodeId(1),
        })
    }));
    assert_eq!(registry.get(handle).unwrap().tree().len(), 1);

    let focused = registry.find_focus(handle, &host, FocusType::Input).unwrap();
    assert_eq!(focused.virtual_id, 1);
    assert_eq!(focused.text.as_deref(), Some("Start"));
    assert!(host.take_events().is_empty());

    registry.destroy(handle);
    assert!(!registry.set_activation_handler(handle, || None::<TreeUpdate>));
}

#[test]
fn test_rejected_initial_tree_keeps_empty_root() {
    init_logging();
    let host = RecordingHost::new();
    let mut bridge = AccessibilityBridge::new();
    let handle = bridge.create().unwrap();
    let registry = bridge.registry_mut();
    registry.set_activation_handler(handle, || {
        Some(TreeUpdate {
            nodes: vec![(ROOT_ID, window(&[9]))],
            tree: None,
            focus: ROOT_ID,
        })
    });

    let root = registry.node_info(handle, &host, HOST_VIEW_ID).unwrap();
    assert!(root.children.is_empty());
    assert_eq!(registry.state(handle), Some(AdapterState::Active));
}
