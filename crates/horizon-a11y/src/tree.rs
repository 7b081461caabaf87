//! Accessibility tree store.
//!
//! The tree is an arena of [`AccessibleNode`]s keyed by stable [`NodeId`]s.
//! Structure lives next to each node (parent back-reference, ordered child
//! list) and every mutation keeps the two sides in step:
//!
//! - exactly one root, which has no parent;
//! - every non-root node appears in its parent's child list exactly once;
//! - the graph is acyclic and every node is reachable from the root;
//! - at most one node holds input focus.
//!
//! Child lists are in paint order, back to front: a later sibling is drawn
//! on top of an earlier one, so hit testing visits siblings in reverse.

use std::collections::{HashMap, HashSet};

use accesskit::{NodeId, Point, TreeUpdate};
use horizon_a11y_core::logging::targets;

use crate::error::{TreeError, TreeResult};
use crate::node::AccessibleNode;

/// Id of the root node in a freshly created tree.
pub const ROOT_ID: NodeId = NodeId(0);

/// Largest node id that still fits a platform virtual view id.
pub const MAX_NODE_ID: u64 = i32::MAX as u64;

struct NodeEntry {
    node: AccessibleNode,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl NodeEntry {
    fn new(node: AccessibleNode, parent: Option<NodeId>) -> Self {
        Self {
            node,
            parent,
            children: Vec::new(),
        }
    }
}

/// What an applied [`TreeUpdate`] changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateSummary {
    /// Nodes whose attributes or children were replaced, in update order.
    pub updated: Vec<NodeId>,
    /// Nodes dropped because they are no longer reachable from the root.
    pub removed: Vec<NodeId>,
    /// Input focus before the update.
    pub old_focus: Option<NodeId>,
    /// Input focus after the update.
    pub new_focus: Option<NodeId>,
    /// The update installed a different root.
    pub root_changed: bool,
}

impl UpdateSummary {
    /// Check if input focus moved.
    pub fn focus_changed(&self) -> bool {
        self.old_focus != self.new_focus
    }
}

/// The accessible node graph for one UI surface.
pub struct AccessibilityTree {
    nodes: HashMap<NodeId, NodeEntry>,
    root: NodeId,
    focus: Option<NodeId>,
    toolkit_name: Option<String>,
    toolkit_version: Option<String>,
}

impl AccessibilityTree {
    /// Create a tree holding only `root`, under [`ROOT_ID`].
    pub fn new(root: AccessibleNode) -> Self {
        let mut nodes = HashMap::new();
        nodes.insert(ROOT_ID, NodeEntry::new(root, None));
        Self {
            nodes,
            root: ROOT_ID,
            focus: None,
            toolkit_name: None,
            toolkit_version: None,
        }
    }

    /// The root node id.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of live nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a tree has at least its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Check if a node is live.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn get(&self, id: NodeId) -> Option<&AccessibleNode> {
        self.nodes.get(&id).map(|entry| &entry.node)
    }

    /// Mutable access to a node's attributes.
    ///
    /// Structure and focus are not reachable from here; use the tree methods.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut AccessibleNode> {
        self.nodes.get_mut(&id).map(|entry| &mut entry.node)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(|entry| entry.parent)
    }

    /// The stored child list of a node, in paint order.
    pub fn children(&self, id: NodeId) -> Option<&[NodeId]> {
        self.nodes.get(&id).map(|entry| entry.children.as_slice())
    }

    /// Children of a node that are live right now, in paint order.
    ///
    /// The store never leaves dangling child ids behind, but the query
    /// gateway goes through this anyway so a stale id can never reach the
    /// host.
    pub fn live_children(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id)
            .map(|children| {
                children
                    .iter()
                    .copied()
                    .filter(|child| self.nodes.contains_key(child))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Append a new node as the topmost child of `parent`.
    pub fn insert(&mut self, parent: NodeId, id: NodeId, node: AccessibleNode) -> TreeResult<()> {
        let index = self.children(parent).map_or(0, <[NodeId]>::len);
        self.insert_at(parent, index, id, node)
    }

    /// Insert a new node at `index` in `parent`'s child list.
    ///
    /// The index is clamped to the list length.
    pub fn insert_at(
        &mut self,
        parent: NodeId,
        index: usize,
        id: NodeId,
        node: AccessibleNode,
    ) -> TreeResult<()> {
        check_id(id)?;
        if self.nodes.contains_key(&id) {
            return Err(TreeError::DuplicateId(id));
        }
        let parent_entry = self
            .nodes
            .get_mut(&parent)
            .ok_or(TreeError::UnknownNode(parent))?;
        let index = index.min(parent_entry.children.len());
        parent_entry.children.insert(index, id);
        self.nodes.insert(id, NodeEntry::new(node, Some(parent)));

        tracing::trace!(target: targets::TREE, ?id, ?parent, index, "inserted node");
        Ok(())
    }

    /// Remove a node and its whole subtree.
    ///
    /// Returns the removed ids, descendants before their ancestors. Focus held
    /// by a removed node is cleared.
    pub fn remove(&mut self, id: NodeId) -> TreeResult<Vec<NodeId>> {
        if id == self.root {
            return Err(TreeError::RootRemoval(id));
        }
        let parent = self
            .nodes
            .get(&id)
            .ok_or(TreeError::UnknownNode(id))?
            .parent;

        let removed = self.subtree_postorder(id);

        if let Some(parent_entry) = parent.and_then(|p| self.nodes.get_mut(&p)) {
            parent_entry.children.retain(|&child| child != id);
        }
        for node_id in &removed {
            self.nodes.remove(node_id);
        }
        if self.focus.is_some_and(|focus| !self.nodes.contains_key(&focus)) {
            self.focus = None;
        }

        tracing::trace!(target: targets::TREE, ?id, count = removed.len(), "removed subtree");
        Ok(removed)
    }

    /// Move a node (with its subtree) under a new parent.
    ///
    /// `index` of `None` makes it the topmost child.
    pub fn move_node(
        &mut self,
        id: NodeId,
        new_parent: NodeId,
        index: Option<usize>,
    ) -> TreeResult<()> {
        if !self.nodes.contains_key(&id) {
            return Err(TreeError::UnknownNode(id));
        }
        if !self.nodes.contains_key(&new_parent) {
            return Err(TreeError::UnknownNode(new_parent));
        }
        if id == self.root || self.is_ancestor_of(id, new_parent) {
            return Err(TreeError::Cycle(id));
        }

        if let Some(old_parent) = self.parent(id)
            && let Some(entry) = self.nodes.get_mut(&old_parent)
        {
            entry.children.retain(|&child| child != id);
        }
        if let Some(entry) = self.nodes.get_mut(&new_parent) {
            let index = index.map_or(entry.children.len(), |i| i.min(entry.children.len()));
            entry.children.insert(index, id);
        }
        if let Some(entry) = self.nodes.get_mut(&id) {
            entry.parent = Some(new_parent);
        }

        tracing::trace!(target: targets::TREE, ?id, ?new_parent, "moved node");
        Ok(())
    }

    /// Move a node to the top of its siblings' z-order.
    pub fn raise(&mut self, id: NodeId) -> TreeResult<()> {
        let parent = self.parent(id).ok_or(TreeError::UnknownNode(id))?;
        self.move_node(id, parent, None)
    }

    /// The node holding input focus.
    pub fn focus(&self) -> Option<NodeId> {
        self.focus
    }

    /// Move input focus, returning the previous holder.
    pub fn set_focus(&mut self, id: Option<NodeId>) -> TreeResult<Option<NodeId>> {
        if let Some(id) = id
            && !self.nodes.contains_key(&id)
        {
            return Err(TreeError::UnknownNode(id));
        }
        Ok(std::mem::replace(&mut self.focus, id))
    }

    /// Clear input focus, returning the previous holder.
    pub fn clear_focus(&mut self) -> Option<NodeId> {
        self.focus.take()
    }

    pub fn toolkit_name(&self) -> Option<&str> {
        self.toolkit_name.as_deref()
    }

    pub fn toolkit_version(&self) -> Option<&str> {
        self.toolkit_version.as_deref()
    }

    /// Set the toolkit identification reported alongside the tree.
    pub fn set_toolkit(&mut self, name: Option<String>, version: Option<String>) {
        self.toolkit_name = name;
        self.toolkit_version = version;
    }

    /// All live node ids in depth-first pre-order, siblings in paint order.
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut result = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            if let Some(entry) = self.nodes.get(&id) {
                result.push(id);
                stack.extend(entry.children.iter().rev().copied());
            }
        }
        result
    }

    /// Find the deepest visible node whose bounds contain `point`.
    ///
    /// Siblings are tested topmost first. A node with bounds clips its
    /// subtree; a node without bounds never matches itself but its children
    /// are still tested. Hidden nodes are skipped along with their subtrees.
    pub fn hit_test(&self, point: Point) -> Option<NodeId> {
        // (node, children done). A node is pushed back as done only when its
        // own bounds contain the point, so the first done node popped is the
        // deepest hit under the topmost sibling.
        let mut stack = vec![(self.root, false)];
        while let Some((id, done)) = stack.pop() {
            if done {
                return Some(id);
            }
            let Some(entry) = self.nodes.get(&id) else {
                continue;
            };
            if entry.node.states().hidden {
                continue;
            }
            match entry.node.bounds() {
                Some(bounds) if !bounds.contains(point) => continue,
                Some(_) => stack.push((id, true)),
                None => {}
            }
            stack.extend(entry.children.iter().map(|&child| (child, false)));
        }
        None
    }

    /// Apply an AccessKit tree update.
    ///
    /// Nodes in the update replace their stored attributes and child lists;
    /// nodes that end up unreachable from the root are dropped. Focus on the
    /// root means "nothing focused". The update is validated before anything
    /// is changed, so a rejected update leaves the tree untouched.
    pub fn apply_update(&mut self, update: TreeUpdate) -> TreeResult<UpdateSummary> {
        let TreeUpdate { nodes, tree, focus } = update;
        let new_root = tree.as_ref().map_or(self.root, |tree| tree.root);

        let mut incoming: HashMap<NodeId, (AccessibleNode, Vec<NodeId>)> =
            HashMap::with_capacity(nodes.len());
        let mut update_order = Vec::with_capacity(nodes.len());
        for (id, node) in &nodes {
            check_id(*id)?;
            incoming.insert(
                *id,
                (AccessibleNode::from_accesskit(node), node.children().to_vec()),
            );
            update_order.push(*id);
        }

        // Walk the prospective structure before touching anything.
        let mut reachable = HashSet::with_capacity(self.nodes.len() + incoming.len());
        let mut visit_order = Vec::with_capacity(reachable.capacity());
        let mut stack = vec![new_root];
        while let Some(id) = stack.pop() {
            let children = incoming
                .get(&id)
                .map(|(_, children)| children.as_slice())
                .or_else(|| self.children(id))
                .ok_or(TreeError::UnknownNode(id))?;
            if !reachable.insert(id) {
                return Err(TreeError::Cycle(id));
            }
            visit_order.push(id);
            stack.extend(children.iter().rev().copied());
        }

        let old_focus = self.focus;
        let removed: Vec<NodeId> = self
            .nodes
            .keys()
            .filter(|id| !reachable.contains(id))
            .copied()
            .collect();
        for id in &removed {
            self.nodes.remove(id);
        }

        let mut updated = Vec::with_capacity(update_order.len());
        for id in update_order {
            let Some((node, children)) = incoming.remove(&id) else {
                continue;
            };
            if !reachable.contains(&id) {
                tracing::debug!(target: targets::TREE, ?id, "ignoring unreachable node in update");
                continue;
            }
            let entry = self
                .nodes
                .entry(id)
                .or_insert_with(|| NodeEntry::new(AccessibleNode::default(), None));
            entry.node = node;
            entry.children = children;
            updated.push(id);
        }

        let links: Vec<(NodeId, NodeId)> = visit_order
            .iter()
            .filter_map(|&id| self.nodes.get(&id).map(|entry| (id, entry)))
            .flat_map(|(id, entry)| entry.children.iter().map(move |&child| (id, child)))
            .collect();
        for (parent, child) in links {
            if let Some(entry) = self.nodes.get_mut(&child) {
                entry.parent = Some(parent);
            }
        }
        if let Some(entry) = self.nodes.get_mut(&new_root) {
            entry.parent = None;
        }

        let root_changed = new_root != self.root;
        self.root = new_root;
        if let Some(tree) = tree {
            self.toolkit_name = tree.toolkit_name;
            self.toolkit_version = tree.toolkit_version;
        }
        self.focus = (focus != new_root && self.nodes.contains_key(&focus)).then_some(focus);

        tracing::trace!(
            target: targets::TREE,
            updated = updated.len(),
            removed = removed.len(),
            root_changed,
            "applied tree update"
        );

        Ok(UpdateSummary {
            updated,
            removed,
            old_focus,
            new_focus: self.focus,
            root_changed,
        })
    }

    fn subtree_postorder(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack = vec![(id, false)];
        while let Some((current, expanded)) = stack.pop() {
            if expanded {
                result.push(current);
                continue;
            }
            stack.push((current, true));
            if let Some(entry) = self.nodes.get(&current) {
                stack.extend(entry.children.iter().map(|&child| (child, false)));
            }
        }
        result
    }

    /// Check if `ancestor` is `id` or one of its ancestors.
    fn is_ancestor_of(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(current_id) = current {
            if current_id == ancestor {
                return true;
            }
            current = self.parent(current_id);
        }
        false
    }
}

fn check_id(id: NodeId) -> TreeResult<()> {
    if id.0 > MAX_NODE_ID {
        Err(TreeError::IdOutOfRange(id))
    } else {
        Ok(())
    }
}
