//! winit backend for the Tether docking protocol.
//!
//! [`WinitHost`] keeps the window registry and pointer state between event
//! loop callbacks; [`ActiveHost`] binds it to the running event loop and
//! implements [`tether_dock::WindowHost`]. [`app::run_app`] drives an
//! [`app::App`] with translated, coalesced [`tether_dock::Event`]s.
//!
//! winit cannot start a compositor drag-and-drop session, so this host never
//! offers `SYSTEM_DRAG`. Repositioning is offered only when the windowing
//! system reports window positions (it does not under Wayland), in which case
//! dockables fall back to the image-cursor driver.

pub mod app;
pub mod event;
pub mod host;

pub use app::{App, AppCtx, AppFactory, run_app};
pub use event::{EventQueue, EventTranslator};
pub use host::{ActiveHost, WinitHost};

// Re-export WindowId for convenience
pub use winit::window::WindowId;
