//! The draggable payload and its state.

use std::fmt;

use tether_core::color::Color;
use tether_core::math::Vec2;

use crate::driver::{DockDriver, DriverKind, PressTracker};
use crate::host::HostWindowId;
use crate::tree::{LayoutRect, NodeId, WidgetTree};

/// Where a dockable is in its life cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DockState {
    /// Free: unparented, possibly alone in its own top-level window.
    Undocked,
    /// Being dragged, not over an accepting target.
    Dragging,
    /// Being dragged over an accepting target.
    Dock,
    /// Parented inside a target-supplied container.
    Docked,
}

impl DockState {
    /// Whether the dockable is the coordinator's referent in this state.
    pub fn is_in_flight(self) -> bool {
        matches!(self, DockState::Dragging | DockState::Dock)
    }
}

impl fmt::Display for DockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DockState::Undocked => write!(f, "undocked"),
            DockState::Dragging => write!(f, "dragging"),
            DockState::Dock => write!(f, "over a target"),
            DockState::Docked => write!(f, "docked"),
        }
    }
}

/// Visual identity of one state. `label: None` keeps the widget's label.
#[derive(Debug, Clone, PartialEq)]
pub struct StateStyle {
    pub label: Option<String>,
    pub color: Color,
}

impl StateStyle {
    pub fn new(color: Color) -> Self {
        Self { label: None, color }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// One style per visible state. The over-a-target state shares the
/// dragging style.
#[derive(Debug, Clone, PartialEq)]
pub struct StateStyles {
    pub undocked: StateStyle,
    pub dragging: StateStyle,
    pub docked: StateStyle,
}

impl Default for StateStyles {
    fn default() -> Self {
        Self {
            undocked: StateStyle::new(Color::from_hex(0x3A3D44)),
            dragging: StateStyle::new(Color::from_hex(0x4A6FA5)),
            docked: StateStyle::new(Color::from_hex(0x2B2D31)),
        }
    }
}

impl StateStyles {
    pub fn for_state(&self, state: DockState) -> &StateStyle {
        match state {
            DockState::Undocked => &self.undocked,
            DockState::Dragging | DockState::Dock => &self.dragging,
            DockState::Docked => &self.docked,
        }
    }
}

/// A registered dockable.
///
/// Owned by the [`DockingContext`](crate::DockingContext) registry; the
/// widgets themselves live in the [`WidgetTree`].
pub struct Dockable {
    pub(crate) node: NodeId,
    pub(crate) handle: Option<NodeId>,
    pub(crate) state: DockState,
    pub(crate) styles: StateStyles,
    pub(crate) active_target: Option<NodeId>,
    pub(crate) origin_target: Option<NodeId>,
    pub(crate) press: Option<PressTracker>,
    pub(crate) driver: Box<dyn DockDriver>,
}

impl fmt::Debug for Dockable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dockable")
            .field("node", &self.node)
            .field("handle", &self.handle)
            .field("state", &self.state)
            .field("active_target", &self.active_target)
            .field("origin_target", &self.origin_target)
            .field("driver", &self.driver.kind())
            .finish()
    }
}

impl Dockable {
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Drag-handle child, if one was built.
    pub fn handle(&self) -> Option<NodeId> {
        self.handle
    }

    pub fn state(&self) -> DockState {
        self.state
    }

    pub fn styles(&self) -> &StateStyles {
        &self.styles
    }

    /// Target currently under the pointer and accepting this dockable.
    pub fn active_target(&self) -> Option<NodeId> {
        self.active_target
    }

    /// Container this dockable was last torn out of, for the current drag.
    pub fn origin_target(&self) -> Option<NodeId> {
        self.origin_target
    }

    pub fn driver_kind(&self) -> DriverKind {
        self.driver.kind()
    }

    /// Top-level window owned through the driver.
    pub fn window(&self) -> Option<HostWindowId> {
        self.driver.window()
    }

    /// Cumulative pointer travel of the current press.
    pub fn press_travel(&self) -> Option<f32> {
        self.press.map(|p| p.travelled())
    }

    pub(crate) fn set_state(&mut self, state: DockState, tree: &mut WidgetTree) {
        if self.state != state {
            tracing::debug!("{:?}: {} -> {}", self.node, self.state, state);
        }
        if state == DockState::Undocked {
            self.press = None;
        }
        self.state = state;
        self.apply_style(tree);
    }

    /// Paint the current state's style onto the handle (or the body).
    pub(crate) fn apply_style(&self, tree: &mut WidgetTree) {
        let style = self.styles.for_state(self.state);
        let target = self.handle.unwrap_or(self.node);
        if let Some(widget) = tree.widget_mut(target) {
            widget.set_background(style.color);
            if let Some(label) = &style.label {
                widget.set_label(label);
            }
        }
    }
}

/// Describes a dockable for [`DockingContext::create_dockable`](crate::DockingContext::create_dockable).
#[derive(Debug, Clone)]
pub struct DockableBuilder {
    pub(crate) label: String,
    pub(crate) layout: LayoutRect,
    pub(crate) handle_height: Option<f32>,
    pub(crate) styles: StateStyles,
    pub(crate) container: Option<(NodeId, usize)>,
}

impl DockableBuilder {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            layout: LayoutRect::new(0.0, 0.0, 240.0, 160.0),
            handle_height: None,
            styles: StateStyles::default(),
            container: None,
        }
    }

    /// Initial rectangle. For free dockables the position is where their
    /// window opens, in root coordinates.
    pub fn layout(mut self, layout: LayoutRect) -> Self {
        self.layout = layout;
        self
    }

    pub fn size(mut self, size: Vec2) -> Self {
        self.layout = LayoutRect::at(self.layout.position(), size);
        self
    }

    /// Build a drag-handle strip of this height along the top edge.
    pub fn handle(mut self, height: f32) -> Self {
        self.handle_height = Some(height.max(0.0));
        self
    }

    pub fn styles(mut self, styles: StateStyles) -> Self {
        self.styles = styles;
        self
    }

    pub fn style(mut self, state: DockState, style: StateStyle) -> Self {
        match state {
            DockState::Undocked => self.styles.undocked = style,
            DockState::Dragging | DockState::Dock => self.styles.dragging = style,
            DockState::Docked => self.styles.docked = style,
        }
        self
    }

    /// Start docked inside `container`, appended after its children.
    pub fn docked_in(mut self, container: NodeId) -> Self {
        self.container = Some((container, usize::MAX));
        self
    }

    /// Start docked inside `container` at `index`.
    pub fn docked_at(mut self, container: NodeId, index: usize) -> Self {
        self.container = Some((container, index));
        self
    }
}
