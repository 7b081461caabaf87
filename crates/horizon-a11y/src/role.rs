//! Accessibility roles for tree nodes.

use accesskit::Role;

/// The accessibility role of a node.
///
/// A simplified set of roles covering what UI surfaces typically expose. It
/// maps to the more comprehensive AccessKit [`Role`] in both directions and
/// to the Android widget class name reported to the host framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum AccessibleRole {
    /// A generic node with no specific role.
    #[default]
    Unknown,

    /// A window or top-level surface.
    Window,

    /// A dialog box.
    Dialog,

    /// A push button.
    Button,

    /// A checkbox that can be checked or unchecked.
    CheckBox,

    /// An on/off switch.
    Switch,

    /// A radio button (mutually exclusive selection).
    RadioButton,

    /// A single-line text input field.
    TextInput,

    /// A multi-line text editing area.
    TextArea,

    /// A static text label.
    Label,

    /// A hyperlink.
    Link,

    /// An image.
    Image,

    /// A progress indicator.
    ProgressBar,

    /// A slider for selecting a value from a range.
    Slider,

    /// A spin box for numeric input.
    SpinBox,

    /// A combo box / dropdown.
    ComboBox,

    /// A list of items.
    List,

    /// An item within a list.
    ListItem,

    /// A scrollable area.
    ScrollArea,

    /// A tab list container.
    TabList,

    /// A single tab.
    Tab,

    /// A menu (popup or submenu).
    Menu,

    /// A menu item.
    MenuItem,

    /// A group box or frame.
    Group,

    /// An alert/message box.
    Alert,

    /// A generic container (like a panel or frame).
    Container,
}

impl AccessibleRole {
    /// Convert to AccessKit's Role enum.
    pub fn to_accesskit_role(self) -> Role {
        match self {
            AccessibleRole::Unknown => Role::Unknown,
            AccessibleRole::Window => Role::Window,
            AccessibleRole::Dialog => Role::Dialog,
            AccessibleRole::Button => Role::Button,
            AccessibleRole::CheckBox => Role::CheckBox,
            AccessibleRole::Switch => Role::Switch,
            AccessibleRole::RadioButton => Role::RadioButton,
            AccessibleRole::TextInput => Role::TextInput,
            AccessibleRole::TextArea => Role::MultilineTextInput,
            AccessibleRole::Label => Role::Label,
            AccessibleRole::Link => Role::Link,
            AccessibleRole::Image => Role::Image,
            AccessibleRole::ProgressBar => Role::ProgressIndicator,
            AccessibleRole::Slider => Role::Slider,
            AccessibleRole::SpinBox => Role::SpinButton,
            AccessibleRole::ComboBox => Role::ComboBox,
            AccessibleRole::List => Role::List,
            AccessibleRole::ListItem => Role::ListItem,
            AccessibleRole::ScrollArea => Role::ScrollView,
            AccessibleRole::TabList => Role::TabList,
            AccessibleRole::Tab => Role::Tab,
            AccessibleRole::Menu => Role::Menu,
            AccessibleRole::MenuItem => Role::MenuItem,
            AccessibleRole::Group => Role::Group,
            AccessibleRole::Alert => Role::Alert,
            AccessibleRole::Container => Role::GenericContainer,
        }
    }

    /// Convert from AccessKit's Role enum.
    ///
    /// Roles without a counterpart map to [`AccessibleRole::Unknown`].
    pub fn from_accesskit_role(role: Role) -> Self {
        match role {
            Role::Window => AccessibleRole::Window,
            Role::Dialog => AccessibleRole::Dialog,
            Role::Button => AccessibleRole::Button,
            Role::CheckBox => AccessibleRole::CheckBox,
            Role::Switch => AccessibleRole::Switch,
            Role::RadioButton => AccessibleRole::RadioButton,
            Role::TextInput => AccessibleRole::TextInput,
            Role::MultilineTextInput => AccessibleRole::TextArea,
            Role::Label => AccessibleRole::Label,
            Role::Link => AccessibleRole::Link,
            Role::Image => AccessibleRole::Image,
            Role::ProgressIndicator => AccessibleRole::ProgressBar,
            Role::Slider => AccessibleRole::Slider,
            Role::SpinButton => AccessibleRole::SpinBox,
            Role::ComboBox => AccessibleRole::ComboBox,
            Role::List => AccessibleRole::List,
            Role::ListItem => AccessibleRole::ListItem,
            Role::ScrollView => AccessibleRole::ScrollArea,
            Role::TabList => AccessibleRole::TabList,
            Role::Tab => AccessibleRole::Tab,
            Role::Menu => AccessibleRole::Menu,
            Role::MenuItem => AccessibleRole::MenuItem,
            Role::Group => AccessibleRole::Group,
            Role::Alert => AccessibleRole::Alert,
            Role::GenericContainer => AccessibleRole::Container,
            _ => AccessibleRole::Unknown,
        }
    }

    /// The Android widget class reported in the platform node-info record.
    ///
    /// TalkBack picks its announcement ("button", "checkbox", ...) from this.
    pub fn android_class_name(self) -> &'static str {
        match self {
            AccessibleRole::Button => "android.widget.Button",
            AccessibleRole::CheckBox => "android.widget.CheckBox",
            AccessibleRole::Switch => "android.widget.Switch",
            AccessibleRole::RadioButton => "android.widget.RadioButton",
            AccessibleRole::TextInput | AccessibleRole::TextArea => "android.widget.EditText",
            AccessibleRole::Label | AccessibleRole::Link => "android.widget.TextView",
            AccessibleRole::Image => "android.widget.ImageView",
            AccessibleRole::ProgressBar => "android.widget.ProgressBar",
            AccessibleRole::Slider => "android.widget.SeekBar",
            AccessibleRole::SpinBox => "android.widget.NumberPicker",
            AccessibleRole::ComboBox => "android.widget.Spinner",
            AccessibleRole::List => "android.widget.ListView",
            AccessibleRole::ScrollArea => "android.widget.ScrollView",
            AccessibleRole::TabList => "android.widget.TabWidget",
            AccessibleRole::Dialog | AccessibleRole::Alert => "android.app.Dialog",
            _ => "android.view.View",
        }
    }

    /// Whether nodes with this role accept a click without advertising one.
    pub fn is_clickable_by_default(self) -> bool {
        matches!(
            self,
            AccessibleRole::Button
                | AccessibleRole::CheckBox
                | AccessibleRole::Switch
                | AccessibleRole::RadioButton
                | AccessibleRole::Link
                | AccessibleRole::ComboBox
                | AccessibleRole::Tab
                | AccessibleRole::MenuItem
        )
    }

    /// Whether nodes with this role carry a checked state.
    pub fn is_checkable(self) -> bool {
        matches!(
            self,
            AccessibleRole::CheckBox | AccessibleRole::Switch | AccessibleRole::RadioButton
        )
    }

    /// Whether nodes with this role hold editable text.
    pub fn is_text_input(self) -> bool {
        matches!(self, AccessibleRole::TextInput | AccessibleRole::TextArea)
    }
}

impl From<AccessibleRole> for Role {
    fn from(role: AccessibleRole) -> Self {
        role.to_accesskit_role()
    }
}

impl From<Role> for AccessibleRole {
    fn from(role: Role) -> Self {
        AccessibleRole::from_accesskit_role(role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accesskit_round_trip_for_common_roles() {
        for role in [
            AccessibleRole::Window,
            AccessibleRole::Button,
            AccessibleRole::CheckBox,
            AccessibleRole::TextArea,
            AccessibleRole::ScrollArea,
            AccessibleRole::Container,
        ] {
            assert_eq!(AccessibleRole::from(role.to_accesskit_role()), role);
        }
    }

    #[test]
    fn test_unmapped_role_is_unknown() {
        assert_eq!(AccessibleRole::from(Role::Canvas), AccessibleRole::Unknown);
    }

    #[test]
    fn test_android_class_names() {
        assert_eq!(AccessibleRole::Button.android_class_name(), "android.widget.Button");
        assert_eq!(AccessibleRole::TextArea.android_class_name(), "android.widget.EditText");
        assert_eq!(AccessibleRole::Container.android_class_name(), "android.view.View");
    }

    #[test]
    fn test_role_capabilities() {
        assert!(AccessibleRole::Button.is_clickable_by_default());
        assert!(!AccessibleRole::Label.is_clickable_by_default());
        assert!(AccessibleRole::Switch.is_checkable());
        assert!(AccessibleRole::TextInput.is_text_input());
        assert!(!AccessibleRole::Slider.is_text_input());
    }
}
