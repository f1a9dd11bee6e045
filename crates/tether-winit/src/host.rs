use std::sync::Arc;

use rfd::{MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};
use tether_core::alloc::HashMap;
use tether_core::geometry::Size;
use tether_core::math::Vec2;
use tether_dock::host::{
    CursorImage, DragPayload, HostCapabilities, HostError, HostResult, HostWindowId,
    PointerState, ResizeEdge, WindowDescriptor, WindowHost,
};
use winit::dpi::{LogicalPosition, LogicalSize};
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::window::{CursorIcon, CustomCursor, ResizeDirection, Window, WindowId};

use crate::event::EventTranslator;

/// Window registry and pointer state that outlive a single event loop
/// callback.
///
/// Windows are created through [`ActiveHost`], which borrows the running
/// event loop. Register the application's main window with
/// [`WinitHost::register_window`] before creating dockables: repositioning
/// support is probed from the first window that reports a position.
pub struct WinitHost {
    windows: HashMap<HostWindowId, Arc<Window>>,
    ids: HashMap<WindowId, HostWindowId>,
    next_id: u64,
    capabilities: HostCapabilities,
    translator: EventTranslator,
    drag_cursor: Option<CustomCursor>,
}

impl Default for WinitHost {
    fn default() -> Self {
        Self::new()
    }
}

impl WinitHost {
    pub fn new() -> Self {
        Self {
            windows: HashMap::default(),
            ids: HashMap::default(),
            next_id: 1,
            capabilities: HostCapabilities::CURSOR_IMAGE | HostCapabilities::INTERACTIVE_RESIZE,
            translator: EventTranslator::new(),
            drag_cursor: None,
        }
    }

    /// Bind the host to the running event loop.
    pub fn bind<'a>(&'a mut self, event_loop: &'a ActiveEventLoop) -> ActiveHost<'a> {
        ActiveHost {
            host: self,
            event_loop,
        }
    }

    /// Adopt a window created outside the docking protocol.
    pub fn register_window(&mut self, window: Arc<Window>) -> HostWindowId {
        let id = HostWindowId(self.next_id);
        self.next_id += 1;

        if window.outer_position().is_ok()
            && !self.capabilities.contains(HostCapabilities::REPOSITION)
        {
            self.capabilities.insert(HostCapabilities::REPOSITION);
            tracing::info!("windowing system reports window positions, enabling repositioning");
        }

        self.ids.insert(window.id(), id);
        self.windows.insert(id, window);
        id
    }

    pub fn window(&self, id: HostWindowId) -> Option<&Arc<Window>> {
        self.windows.get(&id)
    }

    pub fn host_id(&self, window: WindowId) -> Option<HostWindowId> {
        self.ids.get(&window).copied()
    }

    pub fn window_ids(&self) -> impl Iterator<Item = HostWindowId> + '_ {
        self.windows.keys().copied()
    }

    /// Translate a winit event for one of our windows.
    ///
    /// Returns the window's id together with the docking event, or `None`
    /// for unknown windows and events the protocol does not consume.
    pub fn translate(
        &mut self,
        window: WindowId,
        event: &WindowEvent,
    ) -> Option<(HostWindowId, tether_dock::Event)> {
        let id = self.host_id(window)?;
        let handle = self.windows.get(&id)?;
        let scale = handle.scale_factor();
        let origin = handle
            .inner_position()
            .map(|p| {
                let p: LogicalPosition<f32> = p.to_logical(scale);
                Vec2::new(p.x, p.y)
            })
            .unwrap_or(Vec2::ZERO);

        let event = self.translator.translate(id, origin, scale, event)?;
        Some((id, event))
    }

    fn get(&self, window: HostWindowId) -> HostResult<&Arc<Window>> {
        self.windows
            .get(&window)
            .ok_or(HostError::WindowNotFound(window))
    }

    fn require(&self, capability: HostCapabilities, what: &'static str) -> HostResult<()> {
        if self.capabilities.contains(capability) {
            Ok(())
        } else {
            Err(HostError::Unsupported(what))
        }
    }
}

/// [`WinitHost`] bound to the running event loop.
pub struct ActiveHost<'a> {
    host: &'a mut WinitHost,
    event_loop: &'a ActiveEventLoop,
}

impl ActiveHost<'_> {
    pub fn host(&mut self) -> &mut WinitHost {
        self.host
    }

    pub fn exit(&self) {
        self.event_loop.exit();
    }
}

fn resize_direction(edge: ResizeEdge) -> ResizeDirection {
    match edge {
        ResizeEdge::Top => ResizeDirection::North,
        ResizeEdge::Bottom => ResizeDirection::South,
        ResizeEdge::Left => ResizeDirection::West,
        ResizeEdge::Right => ResizeDirection::East,
        ResizeEdge::TopLeft => ResizeDirection::NorthWest,
        ResizeEdge::TopRight => ResizeDirection::NorthEast,
        ResizeEdge::BottomLeft => ResizeDirection::SouthWest,
        ResizeEdge::BottomRight => ResizeDirection::SouthEast,
    }
}

fn os_error(err: impl std::fmt::Display) -> HostError {
    HostError::Os(err.to_string())
}

impl WindowHost for ActiveHost<'_> {
    fn capabilities(&self) -> HostCapabilities {
        self.host.capabilities
    }

    fn create_window(&mut self, descriptor: &WindowDescriptor) -> HostResult<HostWindowId> {
        let mut attributes = Window::default_attributes()
            .with_title(descriptor.title.clone())
            .with_decorations(descriptor.decorated)
            .with_resizable(descriptor.resizable)
            .with_inner_size(LogicalSize::new(
                descriptor.size.width as f64,
                descriptor.size.height as f64,
            ));

        if let Some(position) = descriptor.position {
            attributes =
                attributes.with_position(LogicalPosition::new(position.x as f64, position.y as f64));
        }

        let window = Arc::new(self.event_loop.create_window(attributes).map_err(os_error)?);
        if let Some(cursor) = &self.host.drag_cursor {
            window.set_cursor(cursor.clone());
        }

        let id = self.host.register_window(window);
        tracing::debug!("created {} ({:?})", id, descriptor.title);
        Ok(id)
    }

    fn destroy_window(&mut self, window: HostWindowId) {
        if let Some(handle) = self.host.windows.remove(&window) {
            self.host.ids.remove(&handle.id());
            tracing::debug!("destroyed {}", window);
        }
    }

    fn window_position(&self, window: HostWindowId) -> Option<Vec2> {
        let handle = self.host.windows.get(&window)?;
        let position: LogicalPosition<f32> =
            handle.outer_position().ok()?.to_logical(handle.scale_factor());
        Some(Vec2::new(position.x, position.y))
    }

    fn set_window_position(&mut self, window: HostWindowId, position: Vec2) -> HostResult<()> {
        self.host
            .require(HostCapabilities::REPOSITION, "window repositioning")?;
        let handle = self.host.get(window)?;
        handle.set_outer_position(LogicalPosition::new(position.x as f64, position.y as f64));
        Ok(())
    }

    fn window_size(&self, window: HostWindowId) -> Option<Size<f32>> {
        let handle = self.host.windows.get(&window)?;
        let size: LogicalSize<f32> = handle.inner_size().to_logical(handle.scale_factor());
        Some(Size::new(size.width, size.height))
    }

    fn pointer(&self) -> PointerState {
        self.host.translator.pointer()
    }

    fn start_system_drag(&mut self, _window: HostWindowId, _payload: DragPayload) -> HostResult<()> {
        Err(HostError::Unsupported("system drag-and-drop"))
    }

    fn set_drag_cursor(&mut self, image: &CursorImage) -> HostResult<()> {
        self.host
            .require(HostCapabilities::CURSOR_IMAGE, "image cursors")?;

        let dimension = |v: u32| u16::try_from(v).map_err(os_error);
        let source = CustomCursor::from_rgba(
            image.rgba.clone(),
            dimension(image.width)?,
            dimension(image.height)?,
            dimension(image.hotspot.0)?,
            dimension(image.hotspot.1)?,
        )
        .map_err(os_error)?;
        let cursor = self.event_loop.create_custom_cursor(source);

        for window in self.host.windows.values() {
            window.set_cursor(cursor.clone());
        }
        self.host.drag_cursor = Some(cursor);
        Ok(())
    }

    fn clear_drag_cursor(&mut self) {
        if self.host.drag_cursor.take().is_some() {
            for window in self.host.windows.values() {
                window.set_cursor(CursorIcon::Default);
            }
        }
    }

    fn start_interactive_resize(
        &mut self,
        window: HostWindowId,
        edge: ResizeEdge,
    ) -> HostResult<()> {
        self.host
            .require(HostCapabilities::INTERACTIVE_RESIZE, "interactive resize")?;
        self.host
            .get(window)?
            .drag_resize_window(resize_direction(edge))
            .map_err(os_error)
    }

    fn confirm(&mut self, title: &str, message: &str) -> bool {
        let answer = MessageDialog::new()
            .set_level(MessageLevel::Info)
            .set_title(title)
            .set_description(message)
            .set_buttons(MessageButtons::YesNo)
            .show();
        matches!(answer, MessageDialogResult::Yes)
    }
}
