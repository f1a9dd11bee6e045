use tether_core::alloc::HashMap;
use tether_core::profiling::{self, profile_scope};
use tether_dock::host::{HostResult, HostWindowId, WindowDescriptor, WindowHost};
use tether_dock::{DockStatus, Event};
pub use winit::error::EventLoopError;
use winit::event_loop::ActiveEventLoop;

use crate::event::EventQueue;
use crate::host::{ActiveHost, WinitHost};

pub struct AppCtx<'a> {
    host: ActiveHost<'a>,
}

impl<'a> AppCtx<'a> {
    /// The windowing host, ready to hand to the docking context.
    pub fn host(&mut self) -> &mut ActiveHost<'a> {
        &mut self.host
    }

    /// Create an application window outside the docking protocol.
    pub fn create_window(&mut self, descriptor: &WindowDescriptor) -> HostResult<HostWindowId> {
        self.host.create_window(descriptor)
    }

    pub fn exit(&self) {
        self.host.exit();
    }
}

pub trait App {
    /// Called once when the event loop is running, before any event.
    ///
    /// Create the main window here so the host can probe what the windowing
    /// system supports before dockables pick their drivers.
    #[allow(unused_variables)]
    fn on_start(&mut self, ctx: &mut AppCtx) {}

    /// Called before a batch of queued events is delivered.
    #[allow(unused_variables)]
    fn begin_frame(&mut self, ctx: &mut AppCtx) {}

    /// Called for every translated event, in delivery order per window.
    ///
    /// An unhandled close request exits the application.
    fn on_event(&mut self, ctx: &mut AppCtx, window: HostWindowId, event: &Event) -> DockStatus;

    /// Called after the batch has been delivered.
    #[allow(unused_variables)]
    fn end_frame(&mut self, ctx: &mut AppCtx) {}

    /// Called when the app is about to exit.
    #[allow(unused_variables)]
    fn on_exit(&mut self, ctx: &mut AppCtx) {}
}

pub type AppFactory = fn(ctx: &mut AppCtx) -> Box<dyn App>;

struct AppProxy {
    factory: AppFactory,
    app: Option<Box<dyn App>>,
    host: WinitHost,
    queues: HashMap<HostWindowId, EventQueue>,
}

impl AppProxy {
    fn take_batches(&mut self) -> Vec<(HostWindowId, Vec<Event>)> {
        let mut batches: Vec<_> = self
            .queues
            .iter_mut()
            .filter(|(_, queue)| !queue.is_empty())
            .map(|(window, queue)| (*window, queue.drain()))
            .collect();
        batches.sort_by_key(|(window, _)| *window);
        batches
    }
}

impl winit::application::ApplicationHandler for AppProxy {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.app.is_none() {
            let mut ctx = AppCtx {
                host: self.host.bind(event_loop),
            };
            let mut app = (self.factory)(&mut ctx);
            app.on_start(&mut ctx);
            self.app = Some(app);
        }
    }

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        window_id: winit::window::WindowId,
        event: winit::event::WindowEvent,
    ) {
        if let Some((window, event)) = self.host.translate(window_id, &event) {
            self.queues.entry(window).or_default().push(event);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.app.is_none() {
            return;
        }
        let batches = self.take_batches();
        if batches.is_empty() {
            return;
        }

        profiling::new_frame();
        profile_scope!("dispatch_events");

        let Some(app) = self.app.as_mut() else {
            return;
        };
        let mut ctx = AppCtx {
            host: self.host.bind(event_loop),
        };

        app.begin_frame(&mut ctx);
        for (window, events) in batches {
            for event in events {
                let status = app.on_event(&mut ctx, window, &event);
                if let Event::CloseRequested { .. } = event
                    && !status.is_handled()
                {
                    tracing::info!("Close requested for {}", window);
                    app.on_exit(&mut ctx);
                    ctx.exit();
                }
            }
        }
        app.end_frame(&mut ctx);

        let host = ctx.host.host();
        self.queues.retain(|window, _| host.window(*window).is_some());
    }
}

/// Run the application with the given factory function.
pub fn run_app(factory: AppFactory) -> Result<(), EventLoopError> {
    use winit::event_loop::{ControlFlow, EventLoop};

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);
    let mut app_proxy = AppProxy {
        factory,
        app: None,
        host: WinitHost::new(),
        queues: HashMap::default(),
    };
    event_loop.run_app(&mut app_proxy)
}
