//! Math types used across Tether.
//!
//! Re-exports the SIMD-accelerated [`glam`] types. Pointer positions, window
//! origins and grab offsets are all [`Vec2`] in logical pixels.
//!
//! ```
//! use tether_core::math::Vec2;
//!
//! let pointer = Vec2::new(120.0, 40.0);
//! let grab_offset = Vec2::new(20.0, 10.0);
//! assert_eq!(pointer - grab_offset, Vec2::new(100.0, 30.0));
//! ```
//!
//! [`glam`]: https://docs.rs/glam

pub use glam::*;

