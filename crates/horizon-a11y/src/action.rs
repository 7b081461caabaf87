//! Platform actions and their routing.
//!
//! The host framework asks for actions by integer kind plus an argument
//! bundle. [`resolve`] decides, from a node's role and state alone, whether
//! such a request applies and what it turns into: a change the bridge makes
//! itself (focus, accessibility focus, text) and/or an [`ActionRequest`]
//! forwarded to the application's [`ActionHandler`].

use std::collections::HashMap;

use accesskit::{Action, ActionData, ActionRequest};

use crate::info::NodeInfoFlags;
use crate::node::AccessibleNode;

/// Argument key carrying the replacement text of a set-text action.
pub const ARG_SET_TEXT: &str = "ACTION_ARGUMENT_SET_TEXT_CHARSEQUENCE";

/// Action kinds understood by the bridge, with their platform values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum PlatformActionKind {
    Focus = 0x1,
    ClearFocus = 0x2,
    Click = 0x10,
    AccessibilityFocus = 0x40,
    ClearAccessibilityFocus = 0x80,
    ScrollForward = 0x1000,
    ScrollBackward = 0x2000,
    Expand = 0x40000,
    Collapse = 0x80000,
    SetText = 0x200000,
}

impl PlatformActionKind {
    /// Decode a platform action value; unsupported values yield `None`.
    pub fn from_raw(raw: i32) -> Option<Self> {
        let kind = match raw {
            0x1 => Self::Focus,
            0x2 => Self::ClearFocus,
            0x10 => Self::Click,
            0x40 => Self::AccessibilityFocus,
            0x80 => Self::ClearAccessibilityFocus,
            0x1000 => Self::ScrollForward,
            0x2000 => Self::ScrollBackward,
            0x40000 => Self::Expand,
            0x80000 => Self::Collapse,
            0x200000 => Self::SetText,
            _ => return None,
        };
        Some(kind)
    }

    pub fn as_raw(self) -> i32 {
        self as i32
    }

    /// The actions the host may offer for a node in its current state.
    pub(crate) fn available_for(node: &AccessibleNode, flags: &NodeInfoFlags) -> Vec<Self> {
        let mut actions = Vec::new();
        let usable = flags.enabled && flags.visible_to_user;

        if flags.focused {
            actions.push(Self::ClearFocus);
        } else if flags.focusable && usable {
            actions.push(Self::Focus);
        }
        if flags.clickable && flags.enabled {
            actions.push(Self::Click);
        }
        if flags.accessibility_focused {
            actions.push(Self::ClearAccessibilityFocus);
        } else if flags.visible_to_user {
            actions.push(Self::AccessibilityFocus);
        }
        if flags.scrollable || node.supports_action(Action::Increment) {
            actions.push(Self::ScrollForward);
        }
        if flags.scrollable || node.supports_action(Action::Decrement) {
            actions.push(Self::ScrollBackward);
        }
        if node.supports_action(Action::Expand) {
            actions.push(Self::Expand);
        }
        if node.supports_action(Action::Collapse) {
            actions.push(Self::Collapse);
        }
        if flags.editable && flags.enabled {
            actions.push(Self::SetText);
        }
        actions
    }
}

/// One value in an action's argument bundle.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgumentValue {
    Text(String),
    Int(i32),
    Bool(bool),
}

/// The argument bundle of an action request.
pub type ActionArguments = HashMap<String, ArgumentValue>;

/// An action requested by the host framework.
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformAction {
    pub kind: PlatformActionKind,
    pub arguments: ActionArguments,
}

impl PlatformAction {
    /// An action without arguments.
    pub fn new(kind: PlatformActionKind) -> Self {
        Self {
            kind,
            arguments: ActionArguments::new(),
        }
    }

    /// Add an argument.
    pub fn with_argument(mut self, key: impl Into<String>, value: ArgumentValue) -> Self {
        self.arguments.insert(key.into(), value);
        self
    }

    /// A set-text action carrying `text`.
    pub fn set_text(text: impl Into<String>) -> Self {
        Self::new(PlatformActionKind::SetText)
            .with_argument(ARG_SET_TEXT, ArgumentValue::Text(text.into()))
    }

    /// Decode a raw platform action; unsupported kinds yield `None`.
    pub fn from_raw(raw: i32, arguments: ActionArguments) -> Option<Self> {
        PlatformActionKind::from_raw(raw).map(|kind| Self { kind, arguments })
    }

    /// A text argument, if present with that type.
    pub fn text_argument(&self, key: &str) -> Option<&str> {
        match self.arguments.get(key) {
            Some(ArgumentValue::Text(text)) => Some(text),
            _ => None,
        }
    }
}

/// Receives action requests forwarded to the application.
///
/// Implemented for any `FnMut(ActionRequest)`, so a closure works:
///
/// ```
/// use horizon_a11y::ActionHandler;
/// use accesskit::ActionRequest;
///
/// let mut seen = Vec::new();
/// let mut handler = |request: ActionRequest| seen.push(request.action);
/// # let _ = &mut handler as &mut dyn ActionHandler;
/// ```
pub trait ActionHandler {
    fn do_action(&mut self, request: ActionRequest);
}

impl<F> ActionHandler for F
where
    F: FnMut(ActionRequest),
{
    fn do_action(&mut self, request: ActionRequest) {
        self(request)
    }
}

/// A change the bridge applies itself when an action is accepted.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Effect {
    None,
    SetInputFocus,
    ClearInputFocus,
    SetAccessibilityFocus,
    ClearAccessibilityFocus,
    SetValue(String),
}

/// The outcome of routing an accepted action.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Resolution {
    pub effect: Effect,
    pub forward: Option<(Action, Option<ActionData>)>,
}

impl Resolution {
    fn forward(action: Action) -> Self {
        Self {
            effect: Effect::None,
            forward: Some((action, None)),
        }
    }
}

/// Where a node currently stands with respect to both focus kinds.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct FocusState {
    pub input: bool,
    pub accessibility: bool,
}

/// Decide whether `action` applies to `node`; `None` means rejected.
pub(crate) fn resolve(
    node: &AccessibleNode,
    action: &PlatformAction,
    focus: FocusState,
) -> Option<Resolution> {
    let states = node.states();
    let enabled = !states.disabled;
    let visible = !states.hidden;

    let resolution = match action.kind {
        PlatformActionKind::Focus => {
            if !(states.focusable && enabled && visible) {
                return None;
            }
            Resolution {
                effect: Effect::SetInputFocus,
                forward: Some((Action::Focus, None)),
            }
        }
        PlatformActionKind::ClearFocus => {
            if !focus.input {
                return None;
            }
            Resolution {
                effect: Effect::ClearInputFocus,
                forward: Some((Action::Blur, None)),
            }
        }
        PlatformActionKind::Click => {
            if !(node.is_clickable() && enabled) {
                return None;
            }
            Resolution::forward(Action::Click)
        }
        PlatformActionKind::AccessibilityFocus => {
            if !visible {
                return None;
            }
            Resolution {
                effect: Effect::SetAccessibilityFocus,
                forward: None,
            }
        }
        PlatformActionKind::ClearAccessibilityFocus => {
            if !focus.accessibility {
                return None;
            }
            Resolution {
                effect: Effect::ClearAccessibilityFocus,
                forward: None,
            }
        }
        PlatformActionKind::ScrollForward => {
            if states.scrollable {
                Resolution::forward(Action::ScrollDown)
            } else if node.supports_action(Action::Increment) {
                Resolution::forward(Action::Increment)
            } else {
                return None;
            }
        }
        PlatformActionKind::ScrollBackward => {
            if states.scrollable {
                Resolution::forward(Action::ScrollUp)
            } else if node.supports_action(Action::Decrement) {
                Resolution::forward(Action::Decrement)
            } else {
                return None;
            }
        }
        PlatformActionKind::Expand => {
            if !node.supports_action(Action::Expand) {
                return None;
            }
            Resolution::forward(Action::Expand)
        }
        PlatformActionKind::Collapse => {
            if !node.supports_action(Action::Collapse) {
                return None;
            }
            Resolution::forward(Action::Collapse)
        }
        PlatformActionKind::SetText => {
            if !(states.editable && enabled) {
                return None;
            }
            let text = action.text_argument(ARG_SET_TEXT)?;
            Resolution {
                effect: Effect::SetValue(text.to_owned()),
                forward: Some((Action::SetValue, Some(ActionData::Value(text.into())))),
            }
        }
    };
    Some(resolution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::role::AccessibleRole;

    #[test]
    fn test_raw_values() {
        assert_eq!(PlatformActionKind::from_raw(16), Some(PlatformActionKind::Click));
        assert_eq!(PlatformActionKind::from_raw(0x200000), Some(PlatformActionKind::SetText));
        assert_eq!(PlatformActionKind::from_raw(0x4000), None);
        assert_eq!(PlatformActionKind::AccessibilityFocus.as_raw(), 64);
        assert!(PlatformAction::from_raw(12345, ActionArguments::new()).is_none());
    }

    #[test]
    fn test_click_requires_clickable_and_enabled() {
        let action = PlatformAction::new(PlatformActionKind::Click);
        let button = AccessibleNode::new(AccessibleRole::Button);
        let resolution = resolve(&button, &action, FocusState::default()).unwrap();
        assert_eq!(resolution.forward, Some((Action::Click, None)));

        let label = AccessibleNode::new(AccessibleRole::Label);
        assert!(resolve(&label, &action, FocusState::default()).is_none());

        let disabled = AccessibleNode::new(AccessibleRole::Button).disabled();
        assert!(resolve(&disabled, &action, FocusState::default()).is_none());
    }

    #[test]
    fn test_focus_routing() {
        let focus = PlatformAction::new(PlatformActionKind::Focus);
        let clear = PlatformAction::new(PlatformActionKind::ClearFocus);
        let node = AccessibleNode::new(AccessibleRole::TextInput).focusable();

        let resolution = resolve(&node, &focus, FocusState::default()).unwrap();
        assert_eq!(resolution.effect, Effect::SetInputFocus);

        assert!(resolve(&node, &clear, FocusState::default()).is_none());
        let focused = FocusState {
            input: true,
            accessibility: false,
        };
        let resolution = resolve(&node, &clear, focused).unwrap();
        assert_eq!(resolution.forward, Some((Action::Blur, None)));

        let hidden = AccessibleNode::new(AccessibleRole::Button).focusable().hidden();
        assert!(resolve(&hidden, &focus, FocusState::default()).is_none());
    }

    #[test]
    fn test_scroll_maps_to_scroll_or_step() {
        let forward = PlatformAction::new(PlatformActionKind::ScrollForward);
        let backward = PlatformAction::new(PlatformActionKind::ScrollBackward);

        let list = AccessibleNode::new(AccessibleRole::List).scrollable();
        assert_eq!(
            resolve(&list, &forward, FocusState::default()).unwrap().forward,
            Some((Action::ScrollDown, None))
        );

        let slider = AccessibleNode::new(AccessibleRole::Slider).with_action(Action::Decrement);
        assert_eq!(
            resolve(&slider, &backward, FocusState::default()).unwrap().forward,
            Some((Action::Decrement, None))
        );
        assert!(resolve(&slider, &forward, FocusState::default()).is_none());
    }

    #[test]
    fn test_set_text_needs_argument() {
        let input = AccessibleNode::new(AccessibleRole::TextInput);
        let bare = PlatformAction::new(PlatformActionKind::SetText);
        assert!(resolve(&input, &bare, FocusState::default()).is_none());

        let resolution = resolve(&input, &PlatformAction::set_text("hello"), FocusState::default())
            .unwrap();
        assert_eq!(resolution.effect, Effect::SetValue("hello".into()));
        assert_eq!(
            resolution.forward,
            Some((Action::SetValue, Some(ActionData::Value("hello".into()))))
        );

        let label = AccessibleNode::new(AccessibleRole::Label);
        assert!(resolve(&label, &PlatformAction::set_text("x"), FocusState::default()).is_none());
    }

    #[test]
    fn test_closure_is_action_handler() {
        let mut seen = Vec::new();
        {
            let mut handler = |request: ActionRequest| seen.push(request.action);
            handler.do_action(ActionRequest {
                action: Action::Click,
                target: accesskit::NodeId(3),
                data: None,
            });
        }
        assert_eq!(seen, vec![Action::Click]);
    }
}
