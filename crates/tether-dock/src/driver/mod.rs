//! Platform strategies ("drivers") behind the docking state machine.
//!
//! The state machine only ever talks to [`DockDriver`]. Each dockable gets
//! exactly one driver, chosen once at construction by [`probe`]:
//!
//! - [`GenericDriver`]: the application may move top-level windows, so the
//!   torn-out window simply follows the pointer.
//! - [`CompositorDriver`]: the compositor refuses client-side window moves;
//!   the drag is negotiated as a system drag-and-drop session carrying a
//!   private marker that other windows recognise.
//! - [`ImageCursorDriver`]: neither is available; a snapshot of the dockable
//!   becomes the cursor and the window is only created on drop.

mod compositor;
mod cursor;
mod generic;

pub use compositor::CompositorDriver;
pub use cursor::ImageCursorDriver;
pub use generic::GenericDriver;

use std::fmt;

use tether_core::math::Vec2;

use crate::config::DockConfig;
use crate::event::Event;
use crate::host::{
    HostCapabilities, HostError, HostResult, HostWindowId, ResizeEdge, WindowDescriptor,
    WindowHost,
};
use crate::tree::{LayoutRect, NodeId, WidgetTree};

/// Which strategy a dockable uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DriverKind {
    /// Direct window repositioning.
    Generic,
    /// Compositor-negotiated drag-and-drop.
    Compositor,
    /// Snapshot image as the drag cursor.
    ImageCursor,
}

impl fmt::Display for DriverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverKind::Generic => write!(f, "generic"),
            DriverKind::Compositor => write!(f, "compositor"),
            DriverKind::ImageCursor => write!(f, "image-cursor"),
        }
    }
}

/// Pick a driver from host capabilities, honouring a forced choice.
pub fn probe(capabilities: HostCapabilities, config: &DockConfig) -> DriverKind {
    if let Some(kind) = config.driver {
        return kind;
    }
    if capabilities.contains(HostCapabilities::REPOSITION) {
        DriverKind::Generic
    } else if capabilities.contains(HostCapabilities::SYSTEM_DRAG) {
        DriverKind::Compositor
    } else {
        DriverKind::ImageCursor
    }
}

/// Instantiate the driver for `kind`.
pub fn new_driver(kind: DriverKind) -> Box<dyn DockDriver> {
    match kind {
        DriverKind::Generic => Box::new(GenericDriver::new()),
        DriverKind::Compositor => Box::new(CompositorDriver::new()),
        DriverKind::ImageCursor => Box::new(ImageCursorDriver::new()),
    }
}

/// Everything a driver may touch while acting for one dockable.
pub struct DriverCtx<'a> {
    pub host: &'a mut dyn WindowHost,
    pub tree: &'a mut WidgetTree,
    pub config: &'a DockConfig,
    /// The dockable's root node.
    pub node: NodeId,
}

/// Pointer bookkeeping between a press and its release.
///
/// Travel is the cumulative path length, so small back-and-forth jitter
/// still adds up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PressTracker {
    start: Vec2,
    last: Vec2,
    travelled: f32,
}

impl PressTracker {
    pub fn new(root: Vec2) -> Self {
        Self {
            start: root,
            last: root,
            travelled: 0.0,
        }
    }

    /// Record a new pointer position and return the total travel so far.
    pub fn update(&mut self, root: Vec2) -> f32 {
        self.travelled += (root - self.last).length();
        self.last = root;
        self.travelled
    }

    pub fn start(&self) -> Vec2 {
        self.start
    }

    pub fn last(&self) -> Vec2 {
        self.last
    }

    pub fn travelled(&self) -> f32 {
        self.travelled
    }

    /// Whether travel is strictly past `threshold`.
    pub fn exceeds(&self, threshold: f32) -> bool {
        self.travelled > threshold
    }
}

/// What a pointer event means for the dockable's drag gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragSignal {
    /// Not part of a drag gesture.
    Ignored,
    /// Primary button went down; a press is now being tracked.
    Pressed { root: Vec2 },
    /// Pointer moved while pressed, or while the dockable is in flight.
    Motion { root: Vec2 },
    /// Primary button released.
    Released { root: Vec2 },
}

/// Platform strategy contract.
///
/// Implementations translate the abstract actions of the state machine into
/// windowing calls. None of them change the dockable's state themselves.
pub trait DockDriver {
    fn kind(&self) -> DriverKind;

    /// Temporary (or standalone) top-level window currently owned.
    fn window(&self) -> Option<HostWindowId>;

    /// Take the already-detached dockable into flight.
    ///
    /// `grab_offset` is the pointer position relative to the dockable's
    /// top-left corner at the moment of tear-out.
    fn undock(&mut self, ctx: &mut DriverCtx<'_>, grab: Vec2, grab_offset: Vec2)
    -> HostResult<()>;

    /// Feed a pointer event. Drives press/threshold bookkeeping and, while
    /// `in_flight`, any cursor-following the platform needs.
    fn handle_drag_widget(
        &mut self,
        ctx: &mut DriverCtx<'_>,
        press: &mut Option<PressTracker>,
        in_flight: bool,
        event: &Event,
    ) -> DragSignal;

    /// Release temporary window resources right before reattachment.
    fn before_dock(&mut self, ctx: &mut DriverCtx<'_>);

    /// Post-drag cleanup, after docking or after the terminal fallback.
    fn after_release(&mut self, ctx: &mut DriverCtx<'_>);

    /// Make sure the dockable owns a top-level window after a release over
    /// empty space.
    fn settle(&mut self, ctx: &mut DriverCtx<'_>, root: Vec2) -> HostResult<()>;

    /// Hand live resizing of the owned window to the window manager.
    fn start_interactive_resize(
        &mut self,
        ctx: &mut DriverCtx<'_>,
        edge: ResizeEdge,
    ) -> HostResult<()>;

    /// Translate native notifications into docking protocol events.
    fn remap_native(&self, _event: &Event, _config: &DockConfig) -> Option<Event> {
        None
    }

    /// Free everything this driver holds; the dockable is going away.
    fn release(&mut self, ctx: &mut DriverCtx<'_>);
}

/// Press/threshold bookkeeping shared by every driver.
pub(crate) fn track_pointer(
    press: &mut Option<PressTracker>,
    in_flight: bool,
    event: &Event,
) -> DragSignal {
    match event {
        Event::PointerDown {
            button: crate::event::PointerButton::Primary,
            root,
        } => {
            *press = Some(PressTracker::new(*root));
            DragSignal::Pressed { root: *root }
        }
        Event::PointerMove { root } => match press {
            Some(tracker) => {
                tracker.update(*root);
                DragSignal::Motion { root: *root }
            }
            None if in_flight => DragSignal::Motion { root: *root },
            None => DragSignal::Ignored,
        },
        Event::PointerUp {
            button: crate::event::PointerButton::Primary,
            root,
        } => {
            let was_pressed = press.take().is_some();
            if was_pressed || in_flight {
                DragSignal::Released { root: *root }
            } else {
                DragSignal::Ignored
            }
        }
        _ => DragSignal::Ignored,
    }
}

/// Create a borderless window sized to the dockable and reparent it there.
pub(crate) fn open_window(
    ctx: &mut DriverCtx<'_>,
    position: Option<Vec2>,
) -> HostResult<HostWindowId> {
    let layout = ctx.tree.layout(ctx.node).unwrap_or_default();
    let descriptor = WindowDescriptor::borderless(
        ctx.config.window_title.clone(),
        position,
        layout.size().into(),
    );
    let window = ctx.host.create_window(&descriptor)?;

    if ctx.tree.detach(ctx.node).is_some() {
        tracing::warn!("{:?} was still parented when its window opened", ctx.node);
    }
    ctx.tree
        .place(ctx.node, LayoutRect::at(Vec2::ZERO, layout.size()));
    ctx.tree.attach_window(ctx.node, window);
    tracing::debug!("{:?} reparented into {}", ctx.node, window);

    Ok(window)
}

/// Unhook the dockable from `window` and destroy the window.
pub(crate) fn close_window(ctx: &mut DriverCtx<'_>, window: HostWindowId) {
    if ctx.tree.window(ctx.node) == Some(window) {
        ctx.tree.detach_window(ctx.node);
    }
    ctx.host.destroy_window(window);
    tracing::debug!("{} closed for {:?}", window, ctx.node);
}

/// Shared interactive-resize delegation.
pub(crate) fn delegate_resize(
    ctx: &mut DriverCtx<'_>,
    window: Option<HostWindowId>,
    edge: ResizeEdge,
) -> HostResult<()> {
    if !ctx
        .host
        .capabilities()
        .contains(HostCapabilities::INTERACTIVE_RESIZE)
    {
        return Err(HostError::Unsupported("interactive resize"));
    }
    let window = window.ok_or(HostError::Unsupported("interactive resize without a window"))?;
    ctx.host.start_interactive_resize(window, edge)
}
