//! Windowing collaborator contract.
//!
//! The docking protocol never talks to a windowing system directly. Everything
//! it needs from one (top-level windows, global pointer state, system drag and
//! drop, drag cursors, interactive resize, a blocking yes/no prompt) goes
//! through [`WindowHost`]. `tether-winit` implements it over winit and
//! `tether-test-utils` provides an in-memory mock.

use std::fmt;

use tether_core::geometry::Size;
use tether_core::math::Vec2;

/// Identifier of a top-level window owned by a [`WindowHost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HostWindowId(pub u64);

impl fmt::Display for HostWindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "window#{}", self.0)
    }
}

bitflags::bitflags! {
    /// What a windowing system lets an application do.
    ///
    /// Probed once per dockable to pick its driver.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct HostCapabilities: u8 {
        /// Top-level windows can be moved by the application.
        const REPOSITION = 0b0000_0001;
        /// The compositor can run a drag-and-drop session on our behalf.
        const SYSTEM_DRAG = 0b0000_0010;
        /// The pointer cursor can be replaced by an arbitrary image.
        const CURSOR_IMAGE = 0b0000_0100;
        /// Live resizing can be handed to the window manager.
        const INTERACTIVE_RESIZE = 0b0000_1000;
    }
}

bitflags::bitflags! {
    /// Pointer buttons currently held down.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PointerButtons: u8 {
        const PRIMARY = 0b001;
        const SECONDARY = 0b010;
        const MIDDLE = 0b100;
    }
}

bitflags::bitflags! {
    /// Keyboard modifiers held during a pointer event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const CONTROL = 0b0010;
        const ALT = 0b0100;
        const SUPER = 0b1000;
    }
}

/// Global pointer state in root (screen) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerState {
    pub root: Vec2,
    pub buttons: PointerButtons,
    pub modifiers: Modifiers,
}

/// Window edge or corner handed to the window manager for live resizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeEdge {
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Parameters for a new top-level window.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowDescriptor {
    pub title: String,
    /// Root position of the window's top-left corner. `None` lets the
    /// windowing system choose.
    pub position: Option<Vec2>,
    pub size: Size<f32>,
    pub decorated: bool,
    pub resizable: bool,
}

impl Default for WindowDescriptor {
    fn default() -> Self {
        Self {
            title: "Tether Window".to_string(),
            position: None,
            size: Size::new(320.0, 240.0),
            decorated: true,
            resizable: true,
        }
    }
}

impl WindowDescriptor {
    /// Borderless window used to carry a dockable while it is torn out.
    pub fn borderless(title: impl Into<String>, position: Option<Vec2>, size: Size<f32>) -> Self {
        Self {
            title: title.into(),
            position,
            size,
            decorated: false,
            resizable: true,
        }
    }
}

/// RGBA image used as a drag cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorImage {
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGBA8 rows, `width * height * 4` bytes.
    pub rgba: Vec<u8>,
    pub hotspot: (u32, u32),
}

/// Data offered by a system drag-and-drop session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragPayload {
    pub mime_type: String,
    pub data: Vec<u8>,
}

/// Error types for windowing operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// The windowing system does not offer this operation.
    Unsupported(&'static str),
    /// The window was already destroyed or never existed.
    WindowNotFound(HostWindowId),
    /// The windowing system reported a failure.
    Os(String),
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostError::Unsupported(what) => write!(f, "{} is not supported by this host", what),
            HostError::WindowNotFound(id) => write!(f, "{} not found", id),
            HostError::Os(message) => write!(f, "windowing system error: {}", message),
        }
    }
}

impl std::error::Error for HostError {}

/// Result type for windowing operations.
pub type HostResult<T> = Result<T, HostError>;

/// The windowing system as seen by the docking protocol.
///
/// All calls happen on the UI thread. [`WindowHost::confirm`] may run a
/// nested, re-entrant modal loop and is the only blocking call.
pub trait WindowHost {
    /// Capabilities used to pick a driver for new dockables.
    fn capabilities(&self) -> HostCapabilities;

    /// Create and show a top-level window.
    fn create_window(&mut self, descriptor: &WindowDescriptor) -> HostResult<HostWindowId>;

    /// Destroy a window. Destroying an unknown window is a no-op.
    fn destroy_window(&mut self, window: HostWindowId);

    /// Root position of a window, if the windowing system reports it.
    fn window_position(&self, window: HostWindowId) -> Option<Vec2>;

    /// Move a window so its top-left corner sits at `position` (root coordinates).
    fn set_window_position(&mut self, window: HostWindowId, position: Vec2) -> HostResult<()>;

    /// Inner size of a window.
    fn window_size(&self, window: HostWindowId) -> Option<Size<f32>>;

    /// Current global pointer state.
    fn pointer(&self) -> PointerState;

    /// Start a compositor-managed drag-and-drop session from `window`.
    fn start_system_drag(&mut self, window: HostWindowId, payload: DragPayload) -> HostResult<()>;

    /// Replace the pointer cursor with an image for the duration of a drag.
    fn set_drag_cursor(&mut self, image: &CursorImage) -> HostResult<()>;

    /// Restore the default pointer cursor.
    fn clear_drag_cursor(&mut self);

    /// Hand live resizing of `window` from `edge` to the window manager.
    fn start_interactive_resize(&mut self, window: HostWindowId, edge: ResizeEdge)
    -> HostResult<()>;

    /// Ask the user a blocking yes/no question. Returns `true` for yes.
    fn confirm(&mut self, title: &str, message: &str) -> bool;
}
