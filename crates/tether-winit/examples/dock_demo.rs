//! Two dockable panels and one dock area on real windows.
//!
//! "Console" starts docked on the right half of the main window and
//! "Inspector" starts in a window of its own. Grab either by its 24px
//! handle strip and drag: the panel follows the pointer, and releasing it
//! over the dock area docks it again. Windows are not painted; follow the
//! transitions in the log.
//!
//! Run with: cargo run -p tether-winit --example dock_demo
//! Set TETHER_PROFILE=1 to serve puffin data on port 8585.

use tether_core::geometry::Size;
use tether_core::logging;
use tether_core::math::Vec2;
use tether_core::profiling::{ProfilingBackend, init_profiling};
use tether_dock::{
    DockConfig, DockStatus, DockableBuilder, DockingContext, Event, HostWindowId, LayoutRect,
    NodeId, Panel, TargetHooks, Widget, WidgetTree, WindowDescriptor,
};
use tether_winit::app::{App, AppCtx, run_app};
use tether_winit::host::ActiveHost;

const HANDLE_HEIGHT: f32 = 24.0;

struct DockDemo {
    tree: WidgetTree,
    docking: DockingContext,
    main_window: HostWindowId,
    dock_area: NodeId,
}

impl DockDemo {
    fn new(ctx: &mut AppCtx) -> Self {
        let main_window = ctx
            .create_window(&WindowDescriptor {
                title: "Tether dock demo".to_string(),
                position: Some(Vec2::new(100.0, 100.0)),
                size: Size::new(960.0, 640.0),
                ..Default::default()
            })
            .expect("main window");

        let mut tree = WidgetTree::new();
        let root = tree.add_widget(Panel::new("main"), LayoutRect::new(0.0, 0.0, 960.0, 640.0));
        tree.attach_window(root, main_window);
        let dock_area = tree.add_widget(
            Panel::new("dock area"),
            LayoutRect::new(480.0, 0.0, 480.0, 640.0),
        );
        tree.add_child(root, dock_area);

        let mut docking = DockingContext::with_config(DockConfig::new().confirm_on_release(true));
        let host = ctx.host();
        docking
            .create_dockable(
                &mut tree,
                host,
                DockableBuilder::new("Console")
                    .docked_in(dock_area)
                    .handle(HANDLE_HEIGHT),
            )
            .expect("docked panel");
        docking
            .create_dockable(
                &mut tree,
                host,
                DockableBuilder::new("Inspector")
                    .layout(LayoutRect::new(1100.0, 120.0, 320.0, 240.0))
                    .handle(HANDLE_HEIGHT),
            )
            .expect("floating panel");

        Self {
            tree,
            docking,
            main_window,
            dock_area,
        }
    }

    /// The dockable an event belongs to, if any.
    fn receiver(&self, host: &ActiveHost, window: HostWindowId, event: &Event) -> Option<NodeId> {
        if let Some(dragged) = self.docking.dragging() {
            return Some(dragged);
        }
        if let Some(node) = self.docking.dockable_for_window(window) {
            return Some(node);
        }
        let root = event.root()?;
        self.docking
            .dockables()
            .map(|d| d.node())
            .find(|&node| {
                self.tree.window_of(node) == Some(window)
                    && self
                        .tree
                        .screen_rect(node, host)
                        .is_some_and(|rect| rect.contains(root))
            })
    }

    fn deliver_notifications(&mut self, host: &mut ActiveHost) {
        let mut hooks = TargetHooks::with_defaults();
        loop {
            let pending = self.docking.take_notifications();
            if pending.is_empty() {
                return;
            }
            for note in pending {
                self.docking
                    .handle_target_event(&mut self.tree, host, note.target, &note.event, &mut hooks);
            }
        }
    }
}

impl App for DockDemo {
    fn on_event(&mut self, ctx: &mut AppCtx, window: HostWindowId, event: &Event) -> DockStatus {
        let host = ctx.host();

        let mut status = DockStatus::ignored();
        if let Some(node) = self.receiver(host, window, event) {
            status = self
                .docking
                .handle_dockable_event(&mut self.tree, host, node, event);
        }

        if !status.is_handled() && self.tree.node_exists(self.dock_area) {
            let mut hooks = TargetHooks::with_defaults();
            status |= self.docking.handle_target_event(
                &mut self.tree,
                host,
                self.dock_area,
                event,
                &mut hooks,
            );
        }

        self.deliver_notifications(host);

        if let Event::CloseRequested { window: closed } = event
            && *closed == self.main_window
        {
            return DockStatus::ignored();
        }
        status
    }

    fn end_frame(&mut self, ctx: &mut AppCtx) {
        self.docking.sync_destroyed(&mut self.tree, ctx.host());
    }

    fn on_exit(&mut self, _ctx: &mut AppCtx) {
        for dockable in self.docking.dockables() {
            let label = self
                .tree
                .widget(dockable.node())
                .map_or("?", |w| w.label());
            tracing::info!("{} left {:?}", label, dockable.state());
        }
    }
}

fn main() {
    logging::init();
    if std::env::var_os("TETHER_PROFILE").is_some() {
        init_profiling(ProfilingBackend::PuffinHttp);
    }

    run_app(create_app).expect("event loop");
}

fn create_app(ctx: &mut AppCtx) -> Box<dyn App> {
    Box::new(DockDemo::new(ctx))
}
