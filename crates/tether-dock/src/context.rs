//! Coordinator and registry for dockables.
//!
//! `DockingContext` is owned by the application next to its [`WidgetTree`].
//! It answers "is this node a dockable", holds the single in-flight
//! dockable, and runs the state machine for both sides of the protocol:
//! [`DockingContext::handle_dockable_event`] for the payload and
//! [`DockingContext::handle_target_event`] for every docking target.
//!
//! Some transitions need to notify a widget other than the one whose event
//! is being handled. Those are queued as [`Notification`]s; the application
//! drains them with [`DockingContext::take_notifications`] and delivers
//! them through the same entry points as native input.

use std::borrow::Cow;

use indexmap::IndexMap;
use tether_core::math::Vec2;
use tether_core::profiling::profile_function;

use crate::config::DockConfig;
use crate::dockable::{DockState, Dockable, DockableBuilder};
use crate::driver::{DragSignal, DriverCtx, new_driver, probe};
use crate::error::{DockError, DockResult};
use crate::event::{DockStatus, Event, PointerButton};
use crate::host::{HostWindowId, ResizeEdge, WindowHost};
use crate::target::TargetHooks;
use crate::tree::{LayoutRect, NodeId, WidgetTree};
use crate::widgets::{DockingTargetBox, Panel};

/// A synthetic event waiting to be delivered to `target`.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub target: NodeId,
    pub event: Event,
}

/// Explicit coordinator + registry.
#[derive(Debug, Default)]
pub struct DockingContext {
    config: DockConfig,
    /// Live dockables keyed by their root node, in creation order.
    registry: IndexMap<NodeId, Dockable>,
    /// The one dockable currently in flight.
    coordinator: Option<NodeId>,
    outbox: Vec<Notification>,
}

impl DockingContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DockConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &DockConfig {
        &self.config
    }

    /// Whether `node` is a registered dockable.
    pub fn is_dockable(&self, node: NodeId) -> bool {
        self.registry.contains_key(&node)
    }

    pub fn dockable(&self, node: NodeId) -> Option<&Dockable> {
        self.registry.get(&node)
    }

    pub fn dockables(&self) -> impl Iterator<Item = &Dockable> {
        self.registry.values()
    }

    /// The dockable currently being dragged.
    pub fn dragging(&self) -> Option<NodeId> {
        self.coordinator
    }

    /// Dockable whose driver owns `window`.
    pub fn dockable_for_window(&self, window: HostWindowId) -> Option<NodeId> {
        self.registry
            .values()
            .find(|d| d.window() == Some(window))
            .map(|d| d.node)
    }

    /// Drain queued synthetic notifications.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.outbox)
    }

    fn notify(&mut self, target: NodeId, event: Event) {
        tracing::trace!("queued {:?} for {:?}", event, target);
        self.outbox.push(Notification { target, event });
    }

    /// Run `f` with the dockable and a driver context borrowing the tree,
    /// the host and the config.
    fn with_driver<R>(
        &mut self,
        tree: &mut WidgetTree,
        host: &mut dyn WindowHost,
        node: NodeId,
        f: impl FnOnce(&mut Dockable, &mut DriverCtx<'_>) -> R,
    ) -> Option<R> {
        let dockable = self.registry.get_mut(&node)?;
        let mut ctx = DriverCtx {
            host,
            tree,
            config: &self.config,
            node,
        };
        Some(f(dockable, &mut ctx))
    }

    fn set_state(&mut self, tree: &mut WidgetTree, node: NodeId, state: DockState) {
        if let Some(dockable) = self.registry.get_mut(&node) {
            dockable.set_state(state, tree);
        }
    }

    /// Build a dockable (and its drag handle) and register it.
    ///
    /// With a container the dockable starts docked there; otherwise it
    /// starts undocked in its own top-level window at the builder's
    /// position.
    pub fn create_dockable(
        &mut self,
        tree: &mut WidgetTree,
        host: &mut dyn WindowHost,
        builder: DockableBuilder,
    ) -> DockResult<NodeId> {
        if let Some((container, _)) = builder.container
            && !tree.node_exists(container)
        {
            return Err(DockError::NodeNotFound(container));
        }

        let node = tree.add_widget(Panel::new(builder.label.clone()), builder.layout);
        let handle = builder.handle_height.map(|height| {
            let rect = LayoutRect::new(
                builder.layout.x,
                builder.layout.y,
                builder.layout.width,
                height.min(builder.layout.height),
            );
            let handle = tree.add_widget(Panel::new(builder.label.clone()), rect);
            tree.add_child(node, handle);
            handle
        });

        let kind = probe(host.capabilities(), &self.config);
        let state = if builder.container.is_some() {
            DockState::Docked
        } else {
            DockState::Undocked
        };
        tracing::debug!("dockable {:?} '{}' uses the {} driver", node, builder.label, kind);

        self.registry.insert(
            node,
            Dockable {
                node,
                handle,
                state,
                styles: builder.styles,
                active_target: None,
                origin_target: None,
                press: None,
                driver: new_driver(kind),
            },
        );

        match builder.container {
            Some((container, index)) => tree.insert_child(container, index, node),
            None => {
                let position = builder.layout.position();
                let settled = self
                    .with_driver(tree, host, node, |d, ctx| d.driver.settle(ctx, position))
                    .transpose();
                if let Err(err) = settled {
                    tracing::warn!("{:?} starts without a window: {}", node, err);
                }
            }
        }

        if let Some(dockable) = self.registry.get(&node) {
            dockable.apply_style(tree);
        }
        Ok(node)
    }

    /// Destroy a dockable, its widgets and its window.
    pub fn destroy_dockable(
        &mut self,
        tree: &mut WidgetTree,
        host: &mut dyn WindowHost,
        node: NodeId,
    ) -> DockResult<()> {
        if !self.is_dockable(node) {
            return Err(DockError::NotADockable(node));
        }
        self.destroy_widget(tree, host, node);
        Ok(())
    }

    /// Destroy any widget subtree and clear every reference to it.
    pub fn destroy_widget(&mut self, tree: &mut WidgetTree, host: &mut dyn WindowHost, node: NodeId) {
        tree.destroy(node);
        self.sync_destroyed(tree, host);
    }

    /// Process the tree's destruction log.
    ///
    /// Destroyed dockables leave the registry (releasing their driver and
    /// window, and the coordinator if they held it). Destroyed targets are
    /// cleared from every dockable's active and origin references.
    pub fn sync_destroyed(&mut self, tree: &mut WidgetTree, host: &mut dyn WindowHost) {
        let destroyed = tree.take_destroyed();
        if destroyed.is_empty() {
            return;
        }

        for &id in &destroyed {
            let Some(mut dockable) = self.registry.shift_remove(&id) else {
                continue;
            };
            let mut ctx = DriverCtx {
                host: &mut *host,
                tree: &mut *tree,
                config: &self.config,
                node: id,
            };
            dockable.driver.release(&mut ctx);

            if self.coordinator == Some(id) {
                self.coordinator = None;
                if let Some(target) = dockable.active_target
                    && !destroyed.contains(&target)
                {
                    self.notify(target, Event::DockLeave);
                }
            }
            tracing::debug!("dockable {:?} destroyed", id);
        }

        for dockable in self.registry.values_mut() {
            if let Some(origin) = dockable.origin_target
                && destroyed.contains(&origin)
            {
                dockable.origin_target = None;
            }
            if let Some(active) = dockable.active_target
                && destroyed.contains(&active)
            {
                dockable.active_target = None;
                if dockable.state == DockState::Dock {
                    dockable.set_state(DockState::Dragging, tree);
                }
            }
        }
    }

    /// Tear a dockable out into flight at pointer position `root`.
    ///
    /// A no-op while it is already in flight. From the docked state the
    /// vacated container becomes the origin target; no placeholder is left.
    pub fn tear_out(
        &mut self,
        tree: &mut WidgetTree,
        host: &mut dyn WindowHost,
        node: NodeId,
        root: Vec2,
    ) -> DockResult<()> {
        let dockable = self.registry.get(&node).ok_or(DockError::NotADockable(node))?;
        if dockable.state.is_in_flight() {
            return Ok(());
        }
        let origin = match dockable.state {
            DockState::Docked => tree.parent(node),
            _ => None,
        };
        let rect = tree
            .screen_rect(node, host)
            .ok_or(DockError::NodeNotFound(node))?;
        self.begin_drag(tree, host, node, root, root - rect.position(), origin, None)
    }

    /// Detach `node` and hand it to its driver.
    ///
    /// If the driver fails, the dockable goes back to its former slot (or
    /// `restore` when it was already detached), else into a window of its own.
    #[allow(clippy::too_many_arguments)]
    fn begin_drag(
        &mut self,
        tree: &mut WidgetTree,
        host: &mut dyn WindowHost,
        node: NodeId,
        root: Vec2,
        grab_offset: Vec2,
        origin: Option<NodeId>,
        restore: Option<(NodeId, usize)>,
    ) -> DockResult<()> {
        if let Some(other) = self.coordinator
            && other != node
        {
            return Err(DockError::DragInProgress(other));
        }

        let layout = tree.layout(node).ok_or(DockError::NodeNotFound(node))?;
        let former = tree.detach(node).or(restore);

        let undocked = self
            .with_driver(tree, host, node, |d, ctx| {
                d.driver.undock(ctx, root, grab_offset)
            })
            .ok_or(DockError::NotADockable(node))?;

        if let Err(err) = undocked {
            tracing::warn!("tear-out of {:?} failed: {}", node, err);
            self.with_driver(tree, host, node, |d, ctx| d.driver.before_dock(ctx));
            match former {
                Some((parent, index)) => {
                    tree.insert_child(parent, index, node);
                    tree.place(node, layout);
                }
                None => {
                    let settled = self.with_driver(tree, host, node, |d, ctx| {
                        let settled = d.driver.settle(ctx, root);
                        d.driver.after_release(ctx);
                        d.set_state(DockState::Undocked, ctx.tree);
                        settled
                    });
                    if let Some(Err(settle_err)) = settled {
                        tracing::error!("{:?} is left without a window: {}", node, settle_err);
                    }
                }
            }
            return Err(err.into());
        }

        if let Some(dockable) = self.registry.get_mut(&node) {
            dockable.active_target = None;
            dockable.origin_target = origin;
            dockable.set_state(DockState::Dragging, tree);
        }
        self.coordinator = Some(node);
        tracing::debug!("{:?} torn out at {:?} (origin {:?})", node, root, origin);
        Ok(())
    }

    /// Unconditionally end the current drag of `node`, leaving it undocked.
    ///
    /// Used for pointer grab loss. No confirmation is asked.
    pub fn force_undocked(
        &mut self,
        tree: &mut WidgetTree,
        host: &mut dyn WindowHost,
        node: NodeId,
    ) -> DockResult<()> {
        let dockable = self.registry.get(&node).ok_or(DockError::NotADockable(node))?;
        match dockable.state {
            DockState::Undocked => Ok(()),
            DockState::Docked => Err(DockError::InvalidState {
                node,
                state: DockState::Docked,
            }),
            DockState::Dragging | DockState::Dock => {
                tracing::debug!("{:?} lost its grab", node);
                let root = host.pointer().root;
                self.settle_undocked(tree, host, node, root);
                Ok(())
            }
        }
    }

    /// Terminal fallback: keep the dockable in its own window.
    fn settle_undocked(
        &mut self,
        tree: &mut WidgetTree,
        host: &mut dyn WindowHost,
        node: NodeId,
        root: Vec2,
    ) {
        if let Some(target) = self.registry.get_mut(&node).and_then(|d| d.active_target.take()) {
            self.notify(target, Event::DockLeave);
        }

        self.with_driver(tree, host, node, |d, ctx| {
            if let Err(err) = d.driver.settle(ctx, root) {
                tracing::warn!("{:?} could not get a window: {}", ctx.node, err);
            }
            d.driver.after_release(ctx);
            d.origin_target = None;
            d.set_state(DockState::Undocked, ctx.tree);
        });

        if self.coordinator == Some(node) {
            self.coordinator = None;
        }
    }

    /// Release over empty space: settle, then optionally ask to keep it.
    fn release_undocked(
        &mut self,
        tree: &mut WidgetTree,
        host: &mut dyn WindowHost,
        node: NodeId,
        root: Vec2,
    ) {
        self.settle_undocked(tree, host, node, root);

        if self.config.confirm_on_release {
            let keep = host.confirm(&self.config.confirm_title, &self.config.confirm_message);
            if !keep {
                tracing::debug!("{:?} discarded after release", node);
                self.destroy_widget(tree, host, node);
            }
        }
    }

    /// Hand live resizing of the dockable's window to the window manager.
    pub fn start_interactive_resize(
        &mut self,
        tree: &mut WidgetTree,
        host: &mut dyn WindowHost,
        node: NodeId,
        edge: ResizeEdge,
    ) -> DockResult<()> {
        let dockable = self.registry.get(&node).ok_or(DockError::NotADockable(node))?;
        if dockable.window().is_none() {
            return Err(DockError::NoWindow(node));
        }
        self.with_driver(tree, host, node, |d, ctx| d.driver.start_interactive_resize(ctx, edge))
            .ok_or(DockError::NotADockable(node))?
            .map_err(DockError::from)
    }

    /// Feed an event that hit the dockable or its drag handle.
    ///
    /// Understood-but-unhandled results (a docked dockable's pointer
    /// events) should continue to the containing target.
    pub fn handle_dockable_event(
        &mut self,
        tree: &mut WidgetTree,
        host: &mut dyn WindowHost,
        node: NodeId,
        event: &Event,
    ) -> DockStatus {
        profile_function!();

        let Some(dockable) = self.registry.get(&node) else {
            return DockStatus::ignored();
        };
        let state = dockable.state;
        let window = dockable.window();
        let handle = dockable.handle;
        let pointer = host.pointer().root;

        match event {
            Event::GrabLost if state.is_in_flight() => {
                self.settle_undocked(tree, host, node, pointer);
                return DockStatus::handled();
            }
            // Only the window carrying the drag counts; other windows lose
            // focus to it when it opens.
            Event::FocusLost { window: lost } if state.is_in_flight() && Some(*lost) == window => {
                self.settle_undocked(tree, host, node, pointer);
                return DockStatus::handled();
            }
            Event::PointerDown {
                button: PointerButton::Primary,
                root,
            } if handle.is_some_and(|h| {
                !tree
                    .screen_rect(h, &*host)
                    .is_some_and(|rect| rect.contains(*root))
            }) =>
            {
                if let Some(dockable) = self.registry.get_mut(&node) {
                    dockable.press = None;
                }
                return match state {
                    DockState::Docked => DockStatus::understood(),
                    _ => DockStatus::ignored(),
                };
            }
            Event::CloseRequested { window: closed } if Some(*closed) == window => {
                if state.is_in_flight() {
                    self.settle_undocked(tree, host, node, pointer);
                } else if state == DockState::Undocked {
                    self.destroy_widget(tree, host, node);
                }
                return DockStatus::handled();
            }
            Event::DndFinished { accepted } if state.is_in_flight() => {
                tracing::debug!("system drag of {:?} finished (accepted: {})", node, accepted);
                self.release_undocked(tree, host, node, pointer);
                return DockStatus::handled();
            }
            _ => {}
        }

        let signal = self
            .with_driver(tree, host, node, |d, ctx| {
                d.driver
                    .handle_drag_widget(ctx, &mut d.press, d.state.is_in_flight(), event)
            })
            .unwrap_or(DragSignal::Ignored);

        match (state, signal) {
            (_, DragSignal::Ignored) => DockStatus::ignored(),
            (DockState::Docked, _) => DockStatus::understood(),
            (DockState::Undocked, DragSignal::Motion { root }) => {
                let past_threshold = self
                    .registry
                    .get(&node)
                    .and_then(|d| d.press)
                    .is_some_and(|p| p.exceeds(self.config.drag_threshold));
                if past_threshold && let Err(err) = self.tear_out(tree, host, node, root) {
                    tracing::debug!("{:?} stays undocked: {}", node, err);
                }
                DockStatus::handled()
            }
            (DockState::Dragging, DragSignal::Released { root }) => {
                self.release_undocked(tree, host, node, root);
                DockStatus::handled()
            }
            (DockState::Dock, DragSignal::Released { root }) => {
                match self.registry.get(&node).and_then(|d| d.active_target) {
                    Some(target) => self.notify(target, Event::DockRelease { root }),
                    None => self.release_undocked(tree, host, node, root),
                }
                DockStatus::handled()
            }
            _ => DockStatus::handled(),
        }
    }

    /// Map compositor notifications through the in-flight driver.
    fn remap<'e>(&self, event: &'e Event) -> Cow<'e, Event> {
        if !event.is_system_drag() {
            return Cow::Borrowed(event);
        }
        self.coordinator
            .and_then(|id| self.registry.get(&id))
            .and_then(|d| d.driver.remap_native(event, &self.config))
            .map_or(Cow::Borrowed(event), Cow::Owned)
    }

    /// Feed an event that hit a docking target.
    ///
    /// Call from the target's own event handling with its hooks; fall
    /// through to the target's default handling unless the result is
    /// handled.
    pub fn handle_target_event(
        &mut self,
        tree: &mut WidgetTree,
        host: &mut dyn WindowHost,
        target: NodeId,
        event: &Event,
        hooks: &mut TargetHooks<'_>,
    ) -> DockStatus {
        profile_function!();

        let event = self.remap(event);
        match event.as_ref() {
            Event::Undock { .. } => return DockStatus::understood(),
            Event::DockLeave => {
                self.target_leave(tree, target, hooks);
                return DockStatus::handled();
            }
            _ => {}
        }

        let Some(dragged) = self.coordinator else {
            return match event.as_ref() {
                Event::PointerMove { root } => self.tear_out_child(tree, host, target, *root, hooks),
                _ => DockStatus::ignored(),
            };
        };

        match event.as_ref() {
            Event::PointerMove { root } | Event::DockEnter { root } | Event::DockDrag { root } => {
                self.target_motion(tree, host, target, dragged, *root, hooks)
            }
            Event::PointerUp {
                button: PointerButton::Primary,
                root,
            }
            | Event::DockRelease { root } => {
                let active = self.registry.get(&dragged).and_then(|d| d.active_target);
                if active == Some(target) {
                    self.dock(tree, host, target, dragged, *root, hooks)
                } else {
                    DockStatus::ignored()
                }
            }
            _ => DockStatus::ignored(),
        }
    }

    /// Whether `target` may ever take `dragged`: never itself, its own
    /// descendants, or the container it was just torn from.
    fn self_dock(&self, tree: &WidgetTree, target: NodeId, dragged: NodeId) -> bool {
        target == dragged
            || tree.is_ancestor(dragged, target)
            || self
                .registry
                .get(&dragged)
                .is_some_and(|d| d.origin_target == Some(target))
    }

    fn target_motion(
        &mut self,
        tree: &mut WidgetTree,
        host: &mut dyn WindowHost,
        target: NodeId,
        dragged: NodeId,
        root: Vec2,
        hooks: &mut TargetHooks<'_>,
    ) -> DockStatus {
        let inside = !self.self_dock(tree, target, dragged)
            && hooks.run_accept(tree, target, dragged)
            && hooks.run_hit_test(tree, &*host, target, root);

        let Some(active) = self.registry.get(&dragged).map(|d| d.active_target) else {
            return DockStatus::ignored();
        };

        if !inside {
            if active == Some(target) {
                hooks.run_feedback(tree, target, false);
                if let Some(dockable) = self.registry.get_mut(&dragged) {
                    dockable.active_target = None;
                    dockable.set_state(DockState::Dragging, tree);
                }
            }
            return DockStatus::understood();
        }

        match active {
            Some(current) if current == target => {}
            Some(current) if tree.is_ancestor(target, current) => {
                // The nested target under the pointer keeps priority.
                return DockStatus::understood();
            }
            previous => {
                if let Some(previous) = previous {
                    self.notify(previous, Event::DockLeave);
                }
                if let Some(dockable) = self.registry.get_mut(&dragged) {
                    dockable.active_target = Some(target);
                    dockable.set_state(DockState::Dock, tree);
                }
                hooks.run_feedback(tree, target, true);
                tracing::debug!("{:?} over target {:?}", dragged, target);
            }
        }
        DockStatus::handled()
    }

    fn target_leave(&mut self, tree: &mut WidgetTree, target: NodeId, hooks: &mut TargetHooks<'_>) {
        hooks.run_feedback(tree, target, false);
        let Some(dragged) = self.coordinator else {
            return;
        };
        if let Some(dockable) = self.registry.get_mut(&dragged)
            && dockable.active_target == Some(target)
        {
            dockable.active_target = None;
            dockable.set_state(DockState::Dragging, tree);
        }
    }

    fn dock(
        &mut self,
        tree: &mut WidgetTree,
        host: &mut dyn WindowHost,
        target: NodeId,
        dragged: NodeId,
        root: Vec2,
        hooks: &mut TargetHooks<'_>,
    ) -> DockStatus {
        if !hooks.run_accept(tree, target, dragged) {
            hooks.run_feedback(tree, target, false);
            if let Some(dockable) = self.registry.get_mut(&dragged) {
                dockable.active_target = None;
            }
            self.release_undocked(tree, host, dragged, root);
            return DockStatus::handled();
        }

        self.with_driver(tree, host, dragged, |d, ctx| d.driver.before_dock(ctx));
        hooks.run_insert(tree, target, dragged);

        if tree.parent(dragged).is_none() {
            tracing::error!("insert hook of {:?} left {:?} unparented", target, dragged);
            hooks.run_feedback(tree, target, false);
            if let Some(dockable) = self.registry.get_mut(&dragged) {
                dockable.active_target = None;
            }
            self.release_undocked(tree, host, dragged, root);
            return DockStatus::handled();
        }

        hooks.run_feedback(tree, target, false);
        self.with_driver(tree, host, dragged, |d, ctx| {
            d.driver.after_release(ctx);
            d.active_target = None;
            d.origin_target = None;
            d.press = None;
            d.set_state(DockState::Docked, ctx.tree);
        });
        self.coordinator = None;
        tracing::debug!("{:?} docked via {:?}", dragged, target);

        self.sync_destroyed(tree, host);
        DockStatus::handled()
    }

    /// Strong drag on a docked child of `target`: remove it and take it
    /// into flight.
    fn tear_out_child(
        &mut self,
        tree: &mut WidgetTree,
        host: &mut dyn WindowHost,
        target: NodeId,
        root: Vec2,
        hooks: &mut TargetHooks<'_>,
    ) -> DockStatus {
        let threshold = self.config.tear_out_threshold;
        let Some(node) = self
            .registry
            .values()
            .find(|d| {
                d.state == DockState::Docked
                    && tree.parent(d.node) == Some(target)
                    && d.press.is_some_and(|p| p.exceeds(threshold))
            })
            .map(|d| d.node)
        else {
            return DockStatus::ignored();
        };

        let Some(rect) = tree.screen_rect(node, host) else {
            return DockStatus::ignored();
        };
        let grab_offset = root - rect.position();
        let slot = tree.parent(node).zip(tree.index_of(node));

        hooks.run_remove(tree, target, node);
        if tree.parent(node).is_some() {
            tracing::error!("remove hook of {:?} left {:?} parented", target, node);
            tree.detach(node);
        }

        match self.begin_drag(tree, host, node, root, grab_offset, Some(target), slot) {
            Ok(()) => {
                self.notify(target, Event::Undock { dockable: node });
                DockStatus::handled()
            }
            Err(err) => {
                tracing::warn!("{:?} could not leave {:?}: {}", node, target, err);
                if let Some(dockable) = self.registry.get_mut(&node) {
                    dockable.press = None;
                }
                // Back in its slot; drop the placeholder the remove hook left.
                if let Some((parent, index)) = slot
                    && let Some(&placeholder) = tree.children(parent).get(index + 1)
                    && tree.is_widget::<DockingTargetBox>(placeholder)
                    && tree.layout(placeholder) == tree.layout(node)
                {
                    self.destroy_widget(tree, host, placeholder);
                }
                DockStatus::understood()
            }
        }
    }
}
