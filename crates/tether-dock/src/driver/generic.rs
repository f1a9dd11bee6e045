use tether_core::math::Vec2;

use super::{
    DockDriver, DragSignal, DriverCtx, DriverKind, PressTracker, close_window, delegate_resize,
    open_window, track_pointer,
};
use crate::event::Event;
use crate::host::{HostResult, HostWindowId, ResizeEdge};

/// Moves a borderless top-level window along with the pointer.
#[derive(Debug, Default)]
pub struct GenericDriver {
    window: Option<HostWindowId>,
    grab_offset: Vec2,
}

impl GenericDriver {
    pub fn new() -> Self {
        Self::default()
    }

    fn owns_window(&self, ctx: &DriverCtx<'_>) -> bool {
        self.window.is_some() && self.window == ctx.tree.window(ctx.node)
    }
}

impl DockDriver for GenericDriver {
    fn kind(&self) -> DriverKind {
        DriverKind::Generic
    }

    fn window(&self) -> Option<HostWindowId> {
        self.window
    }

    fn undock(
        &mut self,
        ctx: &mut DriverCtx<'_>,
        grab: Vec2,
        grab_offset: Vec2,
    ) -> HostResult<()> {
        self.grab_offset = grab_offset;
        if let Some(previous) = self.window.take() {
            close_window(ctx, previous);
        }
        self.window = Some(open_window(ctx, Some(grab - grab_offset))?);
        Ok(())
    }

    fn handle_drag_widget(
        &mut self,
        ctx: &mut DriverCtx<'_>,
        press: &mut Option<PressTracker>,
        in_flight: bool,
        event: &Event,
    ) -> DragSignal {
        let signal = track_pointer(press, in_flight, event);
        if in_flight
            && let DragSignal::Motion { root } = signal
            && let Some(window) = self.window
            && let Err(err) = ctx.host.set_window_position(window, root - self.grab_offset)
        {
            tracing::warn!("failed to move {}: {}", window, err);
        }
        signal
    }

    fn before_dock(&mut self, ctx: &mut DriverCtx<'_>) {
        if let Some(window) = self.window.take() {
            close_window(ctx, window);
        }
    }

    fn after_release(&mut self, _ctx: &mut DriverCtx<'_>) {
        self.grab_offset = Vec2::ZERO;
    }

    fn settle(&mut self, ctx: &mut DriverCtx<'_>, root: Vec2) -> HostResult<()> {
        if !self.owns_window(ctx) {
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
        if let Some(window) = self.window.take() {
            close_window(ctx, window);
        }
    }
}
