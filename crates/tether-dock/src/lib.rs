//! Tether Dock - tear-out and re-dock protocol for movable panels
//!
//! A *dockable* panel can be dragged out of its container into a floating
//! top-level window and dropped back into any *docking target*:
//! - One state machine (`Undocked`, `Dragging`, `Dock`, `Docked`) per dockable
//! - Per-platform drivers chosen once from host capabilities
//! - Targets opt in through five optional hooks instead of a shared base type
//! - A single explicit coordinator serializing drags
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tether_dock::{DockableBuilder, DockingContext, TargetHooks, WidgetTree};
//!
//! let mut tree = WidgetTree::new();
//! let mut docking = DockingContext::new();
//! let panel = docking.create_dockable(&mut tree, &mut host, DockableBuilder::new("Inspector"))?;
//!
//! // In the event loop, for events hitting the panel:
//! let status = docking.handle_dockable_event(&mut tree, &mut host, panel, &event);
//!
//! // ...and in every target's own event handling:
//! let mut hooks = TargetHooks::with_defaults();
//! docking.handle_target_event(&mut tree, &mut host, target, &event, &mut hooks);
//!
//! // Deliver synthetic notifications through the same entry points:
//! for note in docking.take_notifications() { /* route note.event to note.target */ }
//! ```

pub mod config;
pub mod context;
pub mod dockable;
pub mod driver;
pub mod error;
pub mod event;
pub mod host;
pub mod snapshot;
pub mod target;
pub mod tree;
pub mod widgets;

pub use config::DockConfig;
pub use context::{DockingContext, Notification};
pub use dockable::{DockState, Dockable, DockableBuilder, StateStyle, StateStyles};
pub use driver::{DockDriver, DriverKind};
pub use error::{DockError, DockResult};
pub use event::{DockStatus, Event, PointerButton};
pub use host::{
    CursorImage, DragPayload, HostCapabilities, HostError, HostResult, HostWindowId, Modifiers,
    PointerButtons, PointerState, ResizeEdge, WindowDescriptor, WindowHost,
};
pub use target::{TargetHooks, hooks};
pub use tree::{LayoutRect, NodeId, WidgetTree};
pub use widgets::{DockingTargetBox, Panel, Widget};
