//! Mock implementation of WindowHost for testing.
//!
//! This module provides an in-memory windowing system that records every
//! call without opening real windows.

use parking_lot::Mutex;
use tether_core::alloc::HashMap;
use tether_core::geometry::Size;
use tether_core::math::Vec2;
use tether_dock::host::*;

/// Records a windowing call for verification in tests.
#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    CreateWindow {
        window: HostWindowId,
        descriptor: WindowDescriptor,
    },
    DestroyWindow {
        window: HostWindowId,
    },
    MoveWindow {
        window: HostWindowId,
        position: Vec2,
    },
    StartSystemDrag {
        window: HostWindowId,
        payload: DragPayload,
    },
    SetDragCursor {
        width: u32,
        height: u32,
        hotspot: (u32, u32),
    },
    ClearDragCursor,
    StartInteractiveResize {
        window: HostWindowId,
        edge: ResizeEdge,
    },
    Confirm {
        title: String,
        message: String,
    },
}

/// Mock windows stored in the host.
#[derive(Debug, Clone)]
struct MockWindow {
    position: Option<Vec2>,
    size: Size<f32>,
}

/// Mock implementation of WindowHost for testing.
///
/// Capability checks behave like a real host: asking for something the
/// configured [`HostCapabilities`] do not include fails with
/// [`HostError::Unsupported`].
///
/// # Example
///
/// ```rust
/// use tether_dock::host::{HostCapabilities, WindowDescriptor, WindowHost};
/// use tether_test_utils::MockHost;
///
/// let mut host = MockHost::with_capabilities(HostCapabilities::REPOSITION);
/// let window = host.create_window(&WindowDescriptor::default()).unwrap();
///
/// assert!(host.has_window(window));
/// assert_eq!(host.count_window_creates(), 1);
/// ```
pub struct MockHost {
    capabilities: HostCapabilities,
    /// Recorded calls for verification
    calls: Mutex<Vec<HostCall>>,
    windows: HashMap<HostWindowId, MockWindow>,
    next_window_id: u64,
    pointer: PointerState,
    confirm_answer: bool,
    cursor: Option<CursorImage>,
}

impl Default for MockHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MockHost {
    /// Host offering every capability.
    pub fn new() -> Self {
        Self::with_capabilities(HostCapabilities::all())
    }

    pub fn with_capabilities(capabilities: HostCapabilities) -> Self {
        Self {
            capabilities,
            calls: Mutex::new(Vec::new()),
            windows: HashMap::default(),
            next_window_id: 1,
            pointer: PointerState::default(),
            confirm_answer: true,
            cursor: None,
        }
    }

    /// Host where top-level windows can be moved directly.
    pub fn generic() -> Self {
        Self::with_capabilities(
            HostCapabilities::REPOSITION
                | HostCapabilities::CURSOR_IMAGE
                | HostCapabilities::INTERACTIVE_RESIZE,
        )
    }

    /// Host whose compositor refuses moves but runs drag-and-drop sessions.
    pub fn compositor() -> Self {
        Self::with_capabilities(
            HostCapabilities::SYSTEM_DRAG
                | HostCapabilities::CURSOR_IMAGE
                | HostCapabilities::INTERACTIVE_RESIZE,
        )
    }

    /// Host that can only swap the cursor image.
    pub fn image_cursor() -> Self {
        Self::with_capabilities(HostCapabilities::CURSOR_IMAGE)
    }

    /// Move the global pointer.
    pub fn set_pointer(&mut self, root: Vec2) {
        self.pointer.root = root;
    }

    pub fn set_pointer_state(&mut self, state: PointerState) {
        self.pointer = state;
    }

    /// Answer given to every subsequent confirmation prompt.
    pub fn set_confirm_answer(&mut self, keep: bool) {
        self.confirm_answer = keep;
    }

    /// Register a window that exists outside the docking protocol, such as
    /// the application's main window.
    pub fn add_window(&mut self, position: Vec2, size: Size<f32>) -> HostWindowId {
        let id = self.allocate_id();
        self.windows.insert(
            id,
            MockWindow {
                position: Some(position),
                size,
            },
        );
        id
    }

    /// Get a copy of all recorded calls (for test assertions).
    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().clone()
    }

    /// Clear recorded calls.
    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    pub fn has_window(&self, window: HostWindowId) -> bool {
        self.windows.contains_key(&window)
    }

    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    /// Drag cursor currently shown, if any.
    pub fn cursor(&self) -> Option<&CursorImage> {
        self.cursor.as_ref()
    }

    pub fn count_window_creates(&self) -> usize {
        self.count(|c| matches!(c, HostCall::CreateWindow { .. }))
    }

    pub fn count_window_destroys(&self) -> usize {
        self.count(|c| matches!(c, HostCall::DestroyWindow { .. }))
    }

    pub fn count_moves(&self) -> usize {
        self.count(|c| matches!(c, HostCall::MoveWindow { .. }))
    }

    pub fn count_confirms(&self) -> usize {
        self.count(|c| matches!(c, HostCall::Confirm { .. }))
    }

    /// Last position a window was moved to.
    pub fn last_move(&self) -> Option<(HostWindowId, Vec2)> {
        self.calls.lock().iter().rev().find_map(|c| match c {
            HostCall::MoveWindow { window, position } => Some((*window, *position)),
            _ => None,
        })
    }

    fn count(&self, pred: impl Fn(&HostCall) -> bool) -> usize {
        self.calls.lock().iter().filter(|c| pred(c)).count()
    }

    fn record(&self, call: HostCall) {
        self.calls.lock().push(call);
    }

    fn allocate_id(&mut self) -> HostWindowId {
        let id = HostWindowId(self.next_window_id);
        self.next_window_id += 1;
        id
    }

    fn require(&self, capability: HostCapabilities, what: &'static str) -> HostResult<()> {
        if self.capabilities.contains(capability) {
            Ok(())
        } else {
            Err(HostError::Unsupported(what))
        }
    }

    fn require_window(&self, window: HostWindowId) -> HostResult<()> {
        if self.windows.contains_key(&window) {
            Ok(())
        } else {
            Err(HostError::WindowNotFound(window))
        }
    }
}

impl WindowHost for MockHost {
    fn capabilities(&self) -> HostCapabilities {
        self.capabilities
    }

    fn create_window(&mut self, descriptor: &WindowDescriptor) -> HostResult<HostWindowId> {
        let id = self.allocate_id();
        self.windows.insert(
            id,
            MockWindow {
                position: descriptor.position,
                size: descriptor.size,
            },
        );
        self.record(HostCall::CreateWindow {
            window: id,
            descriptor: descriptor.clone(),
        });
        Ok(id)
    }

    fn destroy_window(&mut self, window: HostWindowId) {
        if self.windows.remove(&window).is_some() {
            self.record(HostCall::DestroyWindow { window });
        }
    }

    fn window_position(&self, window: HostWindowId) -> Option<Vec2> {
        self.windows.get(&window).and_then(|w| w.position)
    }

    fn set_window_position(&mut self, window: HostWindowId, position: Vec2) -> HostResult<()> {
        self.require(HostCapabilities::REPOSITION, "window repositioning")?;
        let entry = self
            .windows
            .get_mut(&window)
            .ok_or(HostError::WindowNotFound(window))?;
        entry.position = Some(position);
        self.record(HostCall::MoveWindow { window, position });
        Ok(())
    }

    fn window_size(&self, window: HostWindowId) -> Option<Size<f32>> {
        self.windows.get(&window).map(|w| w.size)
    }

    fn pointer(&self) -> PointerState {
        self.pointer
    }

    fn start_system_drag(&mut self, window: HostWindowId, payload: DragPayload) -> HostResult<()> {
        self.require(HostCapabilities::SYSTEM_DRAG, "system drag-and-drop")?;
        self.require_window(window)?;
        self.record(HostCall::StartSystemDrag { window, payload });
        Ok(())
    }

    fn set_drag_cursor(&mut self, image: &CursorImage) -> HostResult<()> {
        self.require(HostCapabilities::CURSOR_IMAGE, "image cursors")?;
        self.record(HostCall::SetDragCursor {
            width: image.width,
            height: image.height,
            hotspot: image.hotspot,
        });
        self.cursor = Some(image.clone());
        Ok(())
    }

    fn clear_drag_cursor(&mut self) {
        self.cursor = None;
        self.record(HostCall::ClearDragCursor);
    }

    fn start_interactive_resize(
        &mut self,
        window: HostWindowId,
        edge: ResizeEdge,
    ) -> HostResult<()> {
        self.require(HostCapabilities::INTERACTIVE_RESIZE, "interactive resize")?;
        self.require_window(window)?;
        self.record(HostCall::StartInteractiveResize { window, edge });
        Ok(())
    }

    fn confirm(&mut self, title: &str, message: &str) -> bool {
        self.record(HostCall::Confirm {
            title: title.to_string(),
            message: message.to_string(),
        });
        self.confirm_answer
    }
}
