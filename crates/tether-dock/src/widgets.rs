//! Minimal widget types hosted by the [`WidgetTree`](crate::tree::WidgetTree).
//!
//! Drawing and layout belong to the embedding toolkit. The protocol only needs
//! a label and a background color to express per-state styling and the
//! placeholder box.

use std::any::Any;

use tether_core::color::Color;

/// Base trait for all widgets in the tree.
pub trait Widget: Any {
    /// Get widget type as Any for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Get mutable widget type as Any for downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Short name used in logs.
    fn type_name(&self) -> &'static str;

    fn label(&self) -> &str {
        ""
    }

    fn set_label(&mut self, _label: &str) {}

    fn background(&self) -> Color {
        Color::TRANSPARENT
    }

    fn set_background(&mut self, _color: Color) {}
}

/// Generic rectangle widget: containers, drag handles and dockable bodies.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub label: String,
    pub background: Color,
}

impl Panel {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            background: Color::from_hex(0x2B2D31),
        }
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }
}

impl Default for Panel {
    fn default() -> Self {
        Self::new("")
    }
}

impl Widget for Panel {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn type_name(&self) -> &'static str {
        "Panel"
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn set_label(&mut self, label: &str) {
        label.clone_into(&mut self.label);
    }

    fn background(&self) -> Color {
        self.background
    }

    fn set_background(&mut self, color: Color) {
        self.background = color;
    }
}

/// Default text shown inside a [`DockingTargetBox`].
pub const DEFAULT_TARGET_BOX_LABEL: &str = "Dock here";

/// Default placeholder color (muted blue, semi-transparent).
pub fn default_target_box_color() -> Color {
    Color::from_rgba_u8(100, 150, 255, 80)
}

/// Ready-made docking target: a labeled rectangle occupying a vacated slot.
///
/// The default remove hook creates one where a dockable used to sit and the
/// default insert hook destroys it again once something is docked into it.
#[derive(Debug, Clone, PartialEq)]
pub struct DockingTargetBox {
    pub label: String,
    pub background: Color,
}

impl DockingTargetBox {
    pub fn new() -> Self {
        Self {
            label: DEFAULT_TARGET_BOX_LABEL.to_string(),
            background: default_target_box_color(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

impl Default for DockingTargetBox {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for DockingTargetBox {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn type_name(&self) -> &'static str {
        "DockingTargetBox"
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn set_label(&mut self, label: &str) {
        label.clone_into(&mut self.label);
    }

    fn background(&self) -> Color {
        self.background
    }

    fn set_background(&mut self, color: Color) {
        self.background = color;
    }
}
