//! Tether Core
//!
//! Shared utilities for the Tether docking toolkit: fast collections, colors,
//! small geometry types, math re-exports, logging and profiling setup.

pub mod alloc;
pub mod color;
pub mod geometry;
pub mod logging;
pub mod math;
pub mod profiling;
