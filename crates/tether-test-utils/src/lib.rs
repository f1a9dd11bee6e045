//! Test utilities for Tether.
//!
//! This crate provides testing infrastructure for the docking protocol,
//! most importantly [`MockHost`]: an in-memory [`WindowHost`] that records
//! every windowing call and lets tests pick which capabilities the
//! "platform" offers.
//!
//! # Example
//!
//! ```rust
//! use tether_dock::{DockableBuilder, DockingContext, DriverKind, WidgetTree};
//! use tether_test_utils::MockHost;
//!
//! let mut host = MockHost::generic();
//! let mut tree = WidgetTree::new();
//! let mut docking = DockingContext::new();
//!
//! let panel = docking
//!     .create_dockable(&mut tree, &mut host, DockableBuilder::new("Inspector"))
//!     .unwrap();
//!
//! assert_eq!(docking.dockable(panel).unwrap().driver_kind(), DriverKind::Generic);
//! assert_eq!(host.count_window_creates(), 1);
//! ```
//!
//! [`WindowHost`]: tether_dock::host::WindowHost

pub mod mock_host;

pub use mock_host::{HostCall, MockHost};
