//! Accessible node attributes.
//!
//! An [`AccessibleNode`] is the plain attribute record stored in the tree.
//! Structure (parent and children) and focus are owned by the
//! [`AccessibilityTree`](crate::AccessibilityTree), which is what keeps the
//! parent/child and single-focus invariants in one place.

use accesskit::{Action, Rect, Toggled};

use crate::role::AccessibleRole;

/// Per-node state flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NodeStates {
    /// The node can take input focus.
    pub focusable: bool,
    /// The node is not exposed to assistive technology.
    pub hidden: bool,
    /// The node is present but does not accept interaction.
    pub disabled: bool,
    /// The node accepts a click even if its role does not imply one.
    pub clickable: bool,
    /// `Some` for checkable nodes, holding the checked state.
    pub checked: Option<bool>,
    /// The node is selected within its container.
    pub selected: bool,
    /// The node's value is user-editable text.
    pub editable: bool,
    /// The node scrolls its content.
    pub scrollable: bool,
}

/// Attributes of one accessibility tree node.
///
/// Built with the same chained style as AccessKit's own nodes:
///
/// ```
/// use horizon_a11y::{AccessibleNode, AccessibleRole};
/// use accesskit::Rect;
///
/// let node = AccessibleNode::new(AccessibleRole::Button)
///     .with_name("Send")
///     .with_bounds(Rect::new(0.0, 0.0, 120.0, 48.0))
///     .focusable();
///
/// assert_eq!(node.name(), Some("Send"));
/// assert!(node.is_clickable());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AccessibleNode {
    role: AccessibleRole,
    name: Option<String>,
    value: Option<String>,
    description: Option<String>,
    bounds: Option<Rect>,
    states: NodeStates,
    actions: Vec<Action>,
}

/// Actions read off an AccessKit node beyond those implied by state flags.
const ADVERTISED_ACTIONS: [Action; 5] = [
    Action::Click,
    Action::Expand,
    Action::Collapse,
    Action::Increment,
    Action::Decrement,
];

impl AccessibleNode {
    /// Create a node with the given role and no attributes.
    ///
    /// Checkable roles start unchecked and text-input roles start editable.
    pub fn new(role: AccessibleRole) -> Self {
        let states = NodeStates {
            checked: role.is_checkable().then_some(false),
            editable: role.is_text_input(),
            ..NodeStates::default()
        };
        Self {
            role,
            states,
            ..Self::default()
        }
    }

    /// Build a node from an AccessKit node, as found in a `TreeUpdate`.
    pub fn from_accesskit(node: &accesskit::Node) -> Self {
        let role = AccessibleRole::from_accesskit_role(node.role());
        let checked = node
            .toggled()
            .map(|toggled| matches!(toggled, Toggled::True | Toggled::Mixed));
        let states = NodeStates {
            focusable: node.supports_action(Action::Focus),
            hidden: node.is_hidden(),
            disabled: node.is_disabled(),
            clickable: node.supports_action(Action::Click),
            checked: checked.or_else(|| role.is_checkable().then_some(false)),
            selected: node.is_selected().unwrap_or(false),
            editable: role.is_text_input() && !node.is_read_only(),
            scrollable: node.supports_action(Action::ScrollDown)
                || node.supports_action(Action::ScrollUp),
        };

        Self {
            role,
            name: node.label().map(str::to_owned),
            value: node.value().map(str::to_owned),
            description: node.description().map(str::to_owned),
            bounds: node.bounds(),
            states,
            actions: ADVERTISED_ACTIONS
                .into_iter()
                .filter(|action| node.supports_action(*action))
                .collect(),
        }
    }

    /// Set the accessible name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the current value.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the bounding rectangle, in tree coordinates.
    pub fn with_bounds(mut self, bounds: Rect) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Advertise an additional action.
    pub fn with_action(mut self, action: Action) -> Self {
        self.add_action(action);
        self
    }

    /// Mark the node as focusable.
    pub fn focusable(mut self) -> Self {
        self.states.focusable = true;
        self
    }

    /// Mark the node as clickable.
    pub fn clickable(mut self) -> Self {
        self.states.clickable = true;
        self
    }

    /// Mark the node as scrollable.
    pub fn scrollable(mut self) -> Self {
        self.states.scrollable = true;
        self
    }

    /// Mark the node as disabled.
    pub fn disabled(mut self) -> Self {
        self.states.disabled = true;
        self
    }

    /// Mark the node as hidden.
    pub fn hidden(mut self) -> Self {
        self.states.hidden = true;
        self
    }

    /// Set the checked state (makes the node checkable).
    pub fn checked(mut self, checked: bool) -> Self {
        self.states.checked = Some(checked);
        self
    }

    pub fn role(&self) -> AccessibleRole {
        self.role
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn bounds(&self) -> Option<Rect> {
        self.bounds
    }

    pub fn states(&self) -> &NodeStates {
        &self.states
    }

    /// Mutable access to the state flags.
    pub fn states_mut(&mut self) -> &mut NodeStates {
        &mut self.states
    }

    /// Actions advertised beyond the state flags.
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    pub fn set_value(&mut self, value: Option<String>) {
        self.value = value;
    }

    pub fn set_bounds(&mut self, bounds: Option<Rect>) {
        self.bounds = bounds;
    }

    pub fn add_action(&mut self, action: Action) {
        if !self.actions.contains(&action) {
            self.actions.push(action);
        }
    }

    /// Check if the node advertises an action.
    pub fn supports_action(&self, action: Action) -> bool {
        self.actions.contains(&action)
    }

    /// The node is exposed and accepts interaction.
    pub fn is_interactive(&self) -> bool {
        !self.states.hidden && !self.states.disabled
    }

    /// The node accepts a click, by flag, advertised action or role.
    pub fn is_clickable(&self) -> bool {
        self.states.clickable
            || self.supports_action(Action::Click)
            || self.role.is_clickable_by_default()
    }

    /// The node can take input focus.
    pub fn is_focusable(&self) -> bool {
        self.states.focusable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_applies_role_defaults() {
        let checkbox = AccessibleNode::new(AccessibleRole::CheckBox);
        assert_eq!(checkbox.states().checked, Some(false));

        let input = AccessibleNode::new(AccessibleRole::TextInput);
        assert!(input.states().editable);

        let label = AccessibleNode::new(AccessibleRole::Label);
        assert_eq!(label.states().checked, None);
        assert!(!label.is_clickable());
    }

    #[test]
    fn test_builder_chain() {
        let node = AccessibleNode::new(AccessibleRole::Slider)
            .with_name("Volume")
            .with_value("40")
            .with_action(Action::Increment)
            .with_action(Action::Increment)
            .focusable()
            .disabled();

        assert_eq!(node.name(), Some("Volume"));
        assert_eq!(node.value(), Some("40"));
        assert_eq!(node.actions(), &[Action::Increment]);
        assert!(node.is_focusable());
        assert!(!node.is_interactive());
    }

    #[test]
    fn test_from_accesskit_node() {
        let mut raw = accesskit::Node::new(accesskit::Role::CheckBox);
        raw.set_label("Accept terms");
        raw.set_toggled(Toggled::True);
        raw.add_action(Action::Focus);
        raw.add_action(Action::Click);
        raw.set_bounds(Rect::new(10.0, 20.0, 110.0, 50.0));

        let node = AccessibleNode::from_accesskit(&raw);
        assert_eq!(node.role(), AccessibleRole::CheckBox);
        assert_eq!(node.name(), Some("Accept terms"));
        assert_eq!(node.states().checked, Some(true));
        assert!(node.is_focusable());
        assert!(node.states().clickable);
        assert_eq!(node.bounds(), Some(Rect::new(10.0, 20.0, 110.0, 50.0)));
    }

    #[test]
    fn test_from_accesskit_keeps_only_routable_actions() {
        let mut raw = accesskit::Node::new(accesskit::Role::Group);
        raw.add_action(Action::Expand);
        raw.add_action(Action::ScrollIntoView);

        let node = AccessibleNode::from_accesskit(&raw);
        assert!(node.supports_action(Action::Expand));
        assert!(!node.supports_action(Action::ScrollIntoView));
    }

    #[test]
    fn test_from_accesskit_read_only_text() {
        let mut raw = accesskit::Node::new(accesskit::Role::TextInput);
        raw.set_value("locked");
        raw.set_read_only();

        let node = AccessibleNode::from_accesskit(&raw);
        assert!(!node.states().editable);
        assert_eq!(node.value(), Some("locked"));
    }
}
