//! Tunables for the docking protocol.

use crate::driver::DriverKind;

/// Pointer travel (pixels) before a pressed, undocked dockable tears out.
pub const DRAG_THRESHOLD: f32 = 3.0;

/// Pointer travel (pixels) before a docked dockable tears out of its container.
pub const TEAR_OUT_THRESHOLD: f32 = 12.0;

/// Private marker offered by compositor drags carrying a dockable.
pub const DOCKABLE_MIME: &str = "application/x-tether-dockable";

/// Longest edge (pixels) of the image used as a drag cursor.
pub const SNAPSHOT_MAX_SIZE: u32 = 128;

/// Centralized configuration for a [`DockingContext`](crate::DockingContext).
#[derive(Debug, Clone, PartialEq)]
pub struct DockConfig {
    /// Cumulative pointer travel needed to start dragging an undocked dockable.
    pub drag_threshold: f32,
    /// Cumulative pointer travel needed to tear a docked dockable out.
    pub tear_out_threshold: f32,
    /// Ask whether to keep a dockable released over empty space.
    pub confirm_on_release: bool,
    pub confirm_title: String,
    pub confirm_message: String,
    /// Title of the temporary top-level windows.
    pub window_title: String,
    /// MIME type identifying an in-flight dockable during compositor drags.
    pub marker_mime: String,
    /// Force a driver instead of probing host capabilities.
    pub driver: Option<DriverKind>,
    /// Longest edge of drag cursor snapshots.
    pub snapshot_max_size: u32,
}

impl Default for DockConfig {
    fn default() -> Self {
        Self {
            drag_threshold: DRAG_THRESHOLD,
            tear_out_threshold: TEAR_OUT_THRESHOLD,
            confirm_on_release: false,
            confirm_title: "Undocked panel".to_string(),
            confirm_message: "Keep this panel in its own window?".to_string(),
            window_title: "Tether Panel".to_string(),
            marker_mime: DOCKABLE_MIME.to_string(),
            driver: None,
            snapshot_max_size: SNAPSHOT_MAX_SIZE,
        }
    }
}

impl DockConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the undocked drag threshold (negative values are clamped to zero).
    pub fn drag_threshold(mut self, pixels: f32) -> Self {
        self.drag_threshold = pixels.max(0.0);
        self
    }

    /// Set the docked tear-out threshold (negative values are clamped to zero).
    pub fn tear_out_threshold(mut self, pixels: f32) -> Self {
        self.tear_out_threshold = pixels.max(0.0);
        self
    }

    /// Ask before keeping a dockable released over empty space.
    pub fn confirm_on_release(mut self, confirm: bool) -> Self {
        self.confirm_on_release = confirm;
        self
    }

    /// Set the confirmation prompt.
    pub fn confirm_text(mut self, title: impl Into<String>, message: impl Into<String>) -> Self {
        self.confirm_title = title.into();
        self.confirm_message = message.into();
        self
    }

    /// Set the temporary window title.
    pub fn window_title(mut self, title: impl Into<String>) -> Self {
        self.window_title = title.into();
        self
    }

    /// Set the in-flight marker MIME type.
    pub fn marker_mime(mut self, mime: impl Into<String>) -> Self {
        self.marker_mime = mime.into();
        self
    }

    /// Force a driver for every dockable created afterwards.
    pub fn driver(mut self, kind: DriverKind) -> Self {
        self.driver = Some(kind);
        self
    }

    /// Set the longest edge of drag cursor snapshots (at least 1).
    pub fn snapshot_max_size(mut self, pixels: u32) -> Self {
        self.snapshot_max_size = pixels.max(1);
        self
    }
}
