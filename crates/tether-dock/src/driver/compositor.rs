use tether_core::math::Vec2;

use super::{
    DockDriver, DragSignal, DriverCtx, DriverKind, PressTracker, close_window, delegate_resize,
    open_window, track_pointer,
};
use crate::config::DockConfig;
use crate::event::Event;
use crate::host::{DragPayload, HostResult, HostWindowId, ResizeEdge};

/// Negotiates the drag with the compositor as a drag-and-drop session.
///
/// The application never positions the window itself. Windows that see the
/// session recognise it by the marker MIME type and receive the usual
/// docking notifications through [`DockDriver::remap_native`].
#[derive(Debug, Default)]
pub struct CompositorDriver {
    window: Option<HostWindowId>,
    session_active: bool,
}

impl CompositorDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a compositor drag session is in progress.
    pub fn session_active(&self) -> bool {
        self.session_active
    }
}

impl DockDriver for CompositorDriver {
    fn kind(&self) -> DriverKind {
        DriverKind::Compositor
    }

    fn window(&self) -> Option<HostWindowId> {
        self.window
    }

    fn undock(
        &mut self,
        ctx: &mut DriverCtx<'_>,
        _grab: Vec2,
        _grab_offset: Vec2,
    ) -> HostResult<()> {
        if let Some(previous) = self.window.take() {
            close_window(ctx, previous);
        }
        let window = open_window(ctx, None)?;
        self.window = Some(window);

        let payload = DragPayload {
            mime_type: ctx.config.marker_mime.clone(),
            data: (ctx.node.0 as u64).to_le_bytes().to_vec(),
        };
        ctx.host.start_system_drag(window, payload)?;
        self.session_active = true;
        tracing::debug!("{:?} handed to the compositor from {}", ctx.node, window);
        Ok(())
    }

    fn handle_drag_widget(
        &mut self,
        _ctx: &mut DriverCtx<'_>,
        press: &mut Option<PressTracker>,
        in_flight: bool,
        event: &Event,
    ) -> DragSignal {
        track_pointer(press, in_flight, event)
    }

    fn before_dock(&mut self, ctx: &mut DriverCtx<'_>) {
        if let Some(window) = self.window.take() {
            close_window(ctx, window);
        }
    }

    fn after_release(&mut self, _ctx: &mut DriverCtx<'_>) {
        self.session_active = false;
    }

    fn settle(&mut self, ctx: &mut DriverCtx<'_>, _root: Vec2) -> HostResult<()> {
        if self.window.is_none() || self.window != ctx.tree.window(ctx.node) {
            self.window = Some(open_window(ctx, None)?);
        }
        Ok(())
    }

    fn start_interactive_resize(
        &mut self,
        ctx: &mut DriverCtx<'_>,
        edge: ResizeEdge,
    ) -> HostResult<()> {
        delegate_resize(ctx, self.window, edge)
    }

    fn remap_native(&self, event: &Event, config: &DockConfig) -> Option<Event> {
        if !self.session_active {
            return None;
        }
        match event {
            Event::DndEnter { root, mime_types } => mime_types
                .iter()
                .any(|m| *m == config.marker_mime)
                .then_some(Event::DockEnter { root: *root }),
            Event::DndMotion { root } => Some(Event::DockDrag { root: *root }),
            Event::DndLeave => Some(Event::DockLeave),
            Event::DndDrop { root } => Some(Event::DockRelease { root: *root }),
            _ => None,
        }
    }

    fn release(&mut self, ctx: &mut DriverCtx<'_>) {
        self.session_active = false;
        if let Some(window) = self.window.take() {
            close_window(ctx, window);
        }
    }
}
