//! Event vocabulary shared by dockables and docking targets.
//!
//! Native input, compositor drag-and-drop notifications and the synthetic
//! docking notifications all travel through the same entry points, so they
//! live in one closed enum.

use tether_core::math::Vec2;

use crate::host::HostWindowId;
use crate::tree::NodeId;

/// Pointer button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// Events understood by the docking protocol. All positions are in root
/// (screen) coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Pointer button pressed.
    PointerDown { button: PointerButton, root: Vec2 },
    /// Pointer moved, with or without buttons held.
    PointerMove { root: Vec2 },
    /// Pointer button released.
    PointerUp { button: PointerButton, root: Vec2 },
    /// `window` lost keyboard/pointer focus.
    FocusLost { window: HostWindowId },
    /// The pointer grab was taken away by the windowing system.
    GrabLost,
    /// The user asked to close a top-level window.
    CloseRequested { window: HostWindowId },

    /// A system drag entered one of our windows.
    DndEnter { root: Vec2, mime_types: Vec<String> },
    /// A system drag moved over one of our windows.
    DndMotion { root: Vec2 },
    /// A system drag left one of our windows.
    DndLeave,
    /// A system drag was dropped on one of our windows.
    DndDrop { root: Vec2 },
    /// Sent to the drag source when a system drag session ends.
    DndFinished { accepted: bool },

    /// The dragged dockable entered a target's region.
    DockEnter { root: Vec2 },
    /// The dragged dockable moved within (or towards) a target's region.
    DockDrag { root: Vec2 },
    /// The dragged dockable left a target's region.
    DockLeave,
    /// The dragged dockable was dropped on a target.
    DockRelease { root: Vec2 },
    /// Sent to a container right after a dockable was torn out of it.
    Undock { dockable: NodeId },
}

impl Event {
    /// Whether this is one of the protocol's own notifications.
    pub fn is_synthetic(&self) -> bool {
        matches!(
            self,
            Event::DockEnter { .. }
                | Event::DockDrag { .. }
                | Event::DockLeave
                | Event::DockRelease { .. }
                | Event::Undock { .. }
        )
    }

    /// Whether this is a compositor drag-and-drop notification.
    pub fn is_system_drag(&self) -> bool {
        matches!(
            self,
            Event::DndEnter { .. }
                | Event::DndMotion { .. }
                | Event::DndLeave
                | Event::DndDrop { .. }
                | Event::DndFinished { .. }
        )
    }

    /// Root position carried by the event, if any.
    pub fn root(&self) -> Option<Vec2> {
        match self {
            Event::PointerDown { root, .. }
            | Event::PointerMove { root }
            | Event::PointerUp { root, .. }
            | Event::DndEnter { root, .. }
            | Event::DndMotion { root }
            | Event::DndDrop { root }
            | Event::DockEnter { root }
            | Event::DockDrag { root }
            | Event::DockRelease { root } => Some(*root),
            _ => None,
        }
    }
}

bitflags::bitflags! {
    /// Outcome of feeding an event to a protocol entry point.
    ///
    /// `UNDERSTOOD` says the protocol recognised the event as its business;
    /// `HANDLED` says nothing else should act on it. An understood but
    /// unhandled event falls through to the widget's own handling.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DockStatus: u8 {
        const UNDERSTOOD = 0b00000001;
        const HANDLED = 0b00000010;
    }
}

impl DockStatus {
    pub const fn is_understood(&self) -> bool {
        self.contains(Self::UNDERSTOOD)
    }

    pub const fn is_handled(&self) -> bool {
        self.contains(Self::HANDLED)
    }

    pub const fn handled() -> Self {
        Self::from_bits_truncate(Self::UNDERSTOOD.bits() | Self::HANDLED.bits())
    }

    pub const fn understood() -> Self {
        Self::UNDERSTOOD
    }

    pub const fn ignored() -> Self {
        Self::empty()
    }
}
