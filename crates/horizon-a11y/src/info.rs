//! Platform node-info records.
//!
//! These are the values handed to the host's accessibility framework when it
//! asks about a node. They are built at the query boundary from the tree and
//! never stored.

use accesskit::{Affine, NodeId, Rect, Vec2};

use crate::action::PlatformActionKind;
use crate::node::AccessibleNode;
use crate::tree::AccessibilityTree;

/// Virtual view id of the host view itself, used by the host for the root.
pub const HOST_VIEW_ID: i32 = -1;

/// Which focus the host is asking about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum FocusType {
    /// Keyboard / input focus.
    Input = 1,
    /// The screen reader's cursor.
    Accessibility = 2,
}

impl FocusType {
    /// Decode a platform focus type; unknown values yield `None`.
    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            1 => Some(FocusType::Input),
            2 => Some(FocusType::Accessibility),
            _ => None,
        }
    }

    pub fn as_raw(self) -> i32 {
        self as i32
    }
}

/// Map a host virtual view id to a node id.
pub(crate) fn node_id_from_virtual(tree: &AccessibilityTree, virtual_id: i32) -> Option<NodeId> {
    if virtual_id == HOST_VIEW_ID {
        Some(tree.root())
    } else {
        u64::try_from(virtual_id).ok().map(NodeId)
    }
}

/// Map a node id to the virtual view id the host sees.
pub(crate) fn virtual_id_from_node(tree: &AccessibilityTree, id: NodeId) -> i32 {
    if id == tree.root() {
        HOST_VIEW_ID
    } else {
        // Ids are range-checked on insert.
        i32::try_from(id.0).unwrap_or(HOST_VIEW_ID)
    }
}

/// Boolean attributes of a node-info record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NodeInfoFlags {
    pub enabled: bool,
    pub visible_to_user: bool,
    pub focusable: bool,
    pub focused: bool,
    pub accessibility_focused: bool,
    pub clickable: bool,
    pub checkable: bool,
    pub checked: bool,
    pub selected: bool,
    pub editable: bool,
    pub scrollable: bool,
}

/// A node description in the host's terms.
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformNodeInfo {
    /// The node's virtual id; [`HOST_VIEW_ID`] for the root.
    pub virtual_id: i32,
    /// The parent's virtual id; `None` for the root, whose parent is the
    /// host view's own parent.
    pub parent_virtual_id: Option<i32>,
    /// Android widget class used for announcements.
    pub class_name: &'static str,
    /// Value if set, otherwise the name.
    pub text: Option<String>,
    pub content_description: Option<String>,
    /// Bounds in surface coordinates.
    pub bounds_in_surface: Option<Rect>,
    /// Bounds in screen coordinates.
    pub bounds_in_screen: Option<Rect>,
    /// Live children, in tree order.
    pub children: Vec<i32>,
    pub flags: NodeInfoFlags,
    /// Actions the host may offer for this node.
    pub actions: Vec<PlatformActionKind>,
}

/// What the node-info builder needs besides the node itself.
pub(crate) struct InfoContext {
    pub transform: Affine,
    pub screen_origin: Vec2,
    pub accessibility_focus: Option<NodeId>,
}

impl PlatformNodeInfo {
    pub(crate) fn build(
        tree: &AccessibilityTree,
        id: NodeId,
        node: &AccessibleNode,
        context: &InfoContext,
    ) -> Self {
        let states = node.states();
        let is_root = id == tree.root();

        let parent_virtual_id = if is_root {
            None
        } else {
            tree.parent(id).map(|parent| virtual_id_from_node(tree, parent))
        };

        let bounds_in_surface = node
            .bounds()
            .map(|bounds| context.transform.transform_rect_bbox(bounds));
        let bounds_in_screen = bounds_in_surface.map(|bounds| {
            let origin = context.screen_origin;
            Rect::new(
                bounds.x0 + origin.x,
                bounds.y0 + origin.y,
                bounds.x1 + origin.x,
                bounds.y1 + origin.y,
            )
        });

        let children = tree
            .live_children(id)
            .into_iter()
            .map(|child| virtual_id_from_node(tree, child))
            .collect();

        let flags = NodeInfoFlags {
            enabled: !states.disabled,
            visible_to_user: !states.hidden,
            focusable: states.focusable,
            focused: tree.focus() == Some(id),
            accessibility_focused: context.accessibility_focus == Some(id),
            clickable: node.is_clickable(),
            checkable: states.checked.is_some(),
            checked: states.checked.unwrap_or(false),
            selected: states.selected,
            editable: states.editable,
            scrollable: states.scrollable,
        };

        Self {
            virtual_id: virtual_id_from_node(tree, id),
            parent_virtual_id,
            class_name: node.role().android_class_name(),
            text: node.value().or(node.name()).map(str::to_owned),
            content_description: node.description().map(str::to_owned),
            bounds_in_surface,
            bounds_in_screen,
            children,
            actions: PlatformActionKind::available_for(node, &flags),
            flags,
        }
    }
}
