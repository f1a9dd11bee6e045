use tether_core::math::Vec2;

use super::{
    DockDriver, DragSignal, DriverCtx, DriverKind, PressTracker, close_window, delegate_resize,
    open_window, track_pointer,
};
use crate::event::Event;
use crate::host::{HostResult, HostWindowId, ResizeEdge};
use crate::snapshot;

/// Last-resort driver: no window during the drag, only a cursor image.
///
/// The dockable stays windowless while in flight and only gets its own
/// top-level window when released over empty space.
#[derive(Debug, Default)]
pub struct ImageCursorDriver {
    window: Option<HostWindowId>,
    grab_offset: Vec2,
    cursor_set: bool,
}

impl ImageCursorDriver {
    pub fn new() -> Self {
        Self::default()
    }

    fn clear_cursor(&mut self, ctx: &mut DriverCtx<'_>) {
        if std::mem::take(&mut self.cursor_set) {
            ctx.host.clear_drag_cursor();
        }
    }
}

impl DockDriver for ImageCursorDriver {
    fn kind(&self) -> DriverKind {
        DriverKind::ImageCursor
    }

    fn window(&self) -> Option<HostWindowId> {
        self.window
    }

    fn undock(
        &mut self,
        ctx: &mut DriverCtx<'_>,
        _grab: Vec2,
        grab_offset: Vec2,
    ) -> HostResult<()> {
        self.grab_offset = grab_offset;
        if let Some(window) = self.window.take() {
            close_window(ctx, window);
        }

        match snapshot::render(ctx.tree, ctx.node, ctx.config.snapshot_max_size, grab_offset) {
            Some(image) => match ctx.host.set_drag_cursor(&image) {
                Ok(()) => self.cursor_set = true,
                Err(err) => tracing::warn!("drag cursor unavailable: {}", err),
            },
            None => tracing::debug!("{:?} has nothing to snapshot", ctx.node),
        }
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
        self.clear_cursor(ctx);
        if let Some(window) = self.window.take() {
            close_window(ctx, window);
        }
    }

    fn after_release(&mut self, ctx: &mut DriverCtx<'_>) {
        self.clear_cursor(ctx);
        self.grab_offset = Vec2::ZERO;
    }

    fn settle(&mut self, ctx: &mut DriverCtx<'_>, root: Vec2) -> HostResult<()> {
        if self.window.is_none() || self.window != ctx.tree.window(ctx.node) {
            self.window = Some(open_window(ctx, Some(root - self.grab_offset))?);
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

    fn release(&mut self, ctx: &mut DriverCtx<'_>) {
        self.clear_cursor(ctx);
        if let Some(window) = self.window.take() {
            close_window(ctx, window);
        }
    }
}
