//! Optimized collection types for Tether.
//!
//! Re-exports hash collections backed by AHash. Every registry in the
//! workspace (dockables, host windows, widget lookups) is keyed through these.

pub use ahash::{AHashMap as HashMap, AHashSet as HashSet, RandomState};
