use std::collections::VecDeque;

use tether_core::math::Vec2;
use tether_dock::host::{HostWindowId, Modifiers, PointerButtons, PointerState};
use tether_dock::{Event, PointerButton};
pub use winit::event::{ElementState, MouseButton, WindowEvent as WinitEvent};
use winit::keyboard::ModifiersState;

/// Turns per-window winit events into docking events in root coordinates.
///
/// winit reports the cursor relative to each window, so the translator adds
/// the window's inner origin and keeps the last known global pointer state
/// for [`tether_dock::WindowHost::pointer`].
#[derive(Debug, Default)]
pub struct EventTranslator {
    pointer: PointerState,
}

impl EventTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last known pointer state.
    pub fn pointer(&self) -> PointerState {
        self.pointer
    }

    /// Translate one winit event delivered to `window`.
    ///
    /// `origin` is the logical root position of the window's client area;
    /// hosts that cannot report window positions pass zero.
    pub fn translate(
        &mut self,
        window: HostWindowId,
        origin: Vec2,
        scale_factor: f64,
        event: &WinitEvent,
    ) -> Option<Event> {
        match event {
            WinitEvent::CursorMoved { position, .. } => {
                let local = Vec2::new(
                    (position.x / scale_factor) as f32,
                    (position.y / scale_factor) as f32,
                );
                Some(self.cursor_moved(origin + local))
            }
            WinitEvent::MouseInput { state, button, .. } => {
                self.button(*state == ElementState::Pressed, *button)
            }
            WinitEvent::ModifiersChanged(modifiers) => {
                self.modifiers_changed(modifiers.state());
                None
            }
            WinitEvent::Focused(false) => Some(Event::FocusLost { window }),
            WinitEvent::CloseRequested => Some(Event::CloseRequested { window }),
            WinitEvent::Focused(true)
            | WinitEvent::CursorEntered { .. }
            | WinitEvent::CursorLeft { .. }
            | WinitEvent::RedrawRequested
            | WinitEvent::Moved(_)
            | WinitEvent::Resized(_)
            | WinitEvent::ScaleFactorChanged { .. }
            | WinitEvent::TouchpadPressure { .. } => None,
            other => {
                tracing::trace!("ignored window event: {:?}", other);
                None
            }
        }
    }

    pub(crate) fn cursor_moved(&mut self, root: Vec2) -> Event {
        self.pointer.root = root;
        Event::PointerMove { root }
    }

    pub(crate) fn button(&mut self, pressed: bool, button: MouseButton) -> Option<Event> {
        let (button, flag) = match button {
            MouseButton::Left => (PointerButton::Primary, PointerButtons::PRIMARY),
            MouseButton::Right => (PointerButton::Secondary, PointerButtons::SECONDARY),
            MouseButton::Middle => (PointerButton::Middle, PointerButtons::MIDDLE),
            _ => return None,
        };
        self.pointer.buttons.set(flag, pressed);

        let root = self.pointer.root;
        Some(if pressed {
            Event::PointerDown { button, root }
        } else {
            Event::PointerUp { button, root }
        })
    }

    pub(crate) fn modifiers_changed(&mut self, state: ModifiersState) {
        let mut modifiers = Modifiers::empty();
        modifiers.set(Modifiers::SHIFT, state.shift_key());
        modifiers.set(Modifiers::CONTROL, state.control_key());
        modifiers.set(Modifiers::ALT, state.alt_key());
        modifiers.set(Modifiers::SUPER, state.super_key());
        self.pointer.modifiers = modifiers;
    }
}

/// Per-window event queue with motion coalescing.
///
/// Consecutive pointer moves collapse into the latest one; button events
/// keep their position relative to motion so presses and releases are
/// never reordered.
pub struct EventQueue {
    /// Pending events for this frame
    pending: VecDeque<Event>,

    /// Window-level events (processed first)
    priority: VecDeque<Event>,

    /// Statistics
    stats: EventStats,
}

impl EventQueue {
    pub fn new() -> Self {
        Self {
            pending: VecDeque::with_capacity(64),
            priority: VecDeque::with_capacity(4),
            stats: EventStats::default(),
        }
    }

    pub fn push(&mut self, event: Event) {
        self.stats.events_received += 1;

        match event {
            Event::CloseRequested { .. } | Event::FocusLost { .. } | Event::GrabLost => {
                self.priority.push_back(event);
            }
            Event::PointerMove { .. } => {
                if matches!(self.pending.back(), Some(Event::PointerMove { .. })) {
                    self.pending.pop_back();
                    self.stats.events_coalesced += 1;
                }
                self.pending.push_back(event);
            }
            _ => self.pending.push_back(event),
        }
    }

    /// Take every queued event, window-level events first.
    pub fn drain(&mut self) -> Vec<Event> {
        let mut events = Vec::with_capacity(self.priority.len() + self.pending.len());
        events.extend(self.priority.drain(..));
        events.extend(self.pending.drain(..));

        self.stats.events_processed += events.len();
        events
    }

    pub fn is_empty(&self) -> bool {
        self.priority.is_empty() && self.pending.is_empty()
    }

    pub fn stats(&self) -> &EventStats {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = EventStats::default();
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Default, Debug, Clone)]
pub struct EventStats {
    pub events_received: usize,
    pub events_processed: usize,
    pub events_coalesced: usize,
}
