//! Docking target hooks.
//!
//! Any widget becomes a docking destination by calling
//! [`DockingContext::handle_target_event`](crate::DockingContext::handle_target_event)
//! from its own event handling with a [`TargetHooks`] set. Hooks are supplied
//! per call, so targets share nothing but this struct.
//!
//! Hook implementers own geometry consistency: whatever `insert` or `remove`
//! leave behind is taken as is.

use tether_core::math::Vec2;

use crate::host::WindowHost;
use crate::tree::{NodeId, WidgetTree};

/// Does the pointer (root coordinates) fall inside the target's region?
pub type HitTestFn<'a> = dyn FnMut(&WidgetTree, &dyn WindowHost, NodeId, Vec2) -> bool + 'a;
/// May `dockable` dock into `target`? Consulted before hit-testing.
pub type AcceptFn<'a> = dyn FnMut(&WidgetTree, NodeId, NodeId) -> bool + 'a;
/// Highlight (`true`) or un-highlight (`false`) the target.
pub type FeedbackFn<'a> = dyn FnMut(&mut WidgetTree, NodeId, bool) + 'a;
/// Parent `dockable` under `target` (or its parent).
pub type InsertFn<'a> = dyn FnMut(&mut WidgetTree, NodeId, NodeId) + 'a;
/// Detach `dockable` from `target`, optionally leaving a placeholder.
pub type RemoveFn<'a> = dyn FnMut(&mut WidgetTree, NodeId, NodeId) + 'a;

/// The five optional target hooks.
#[derive(Default)]
pub struct TargetHooks<'a> {
    pub hit_test: Option<Box<HitTestFn<'a>>>,
    pub accept: Option<Box<AcceptFn<'a>>>,
    pub feedback: Option<Box<FeedbackFn<'a>>>,
    pub insert: Option<Box<InsertFn<'a>>>,
    pub remove: Option<Box<RemoveFn<'a>>>,
}

impl<'a> TargetHooks<'a> {
    /// No hooks at all.
    pub fn new() -> Self {
        Self::default()
    }

    /// The ready-made hit-test, insert and remove hooks.
    pub fn with_defaults() -> Self {
        Self::new()
            .hit_test(hooks::hit_test_screen_rect)
            .insert(hooks::insert_at_target_rect)
            .remove(hooks::remove_with_placeholder)
    }

    pub fn hit_test(
        mut self,
        f: impl FnMut(&WidgetTree, &dyn WindowHost, NodeId, Vec2) -> bool + 'a,
    ) -> Self {
        self.hit_test = Some(Box::new(f));
        self
    }

    pub fn accept(mut self, f: impl FnMut(&WidgetTree, NodeId, NodeId) -> bool + 'a) -> Self {
        self.accept = Some(Box::new(f));
        self
    }

    pub fn feedback(mut self, f: impl FnMut(&mut WidgetTree, NodeId, bool) + 'a) -> Self {
        self.feedback = Some(Box::new(f));
        self
    }

    pub fn insert(mut self, f: impl FnMut(&mut WidgetTree, NodeId, NodeId) + 'a) -> Self {
        self.insert = Some(Box::new(f));
        self
    }

    pub fn remove(mut self, f: impl FnMut(&mut WidgetTree, NodeId, NodeId) + 'a) -> Self {
        self.remove = Some(Box::new(f));
        self
    }

    pub(crate) fn run_accept(&mut self, tree: &WidgetTree, target: NodeId, dockable: NodeId) -> bool {
        self.accept.as_mut().is_none_or(|f| f(tree, target, dockable))
    }

    pub(crate) fn run_hit_test(
        &mut self,
        tree: &WidgetTree,
        host: &dyn WindowHost,
        target: NodeId,
        root: Vec2,
    ) -> bool {
        match self.hit_test.as_mut() {
            Some(f) => f(tree, host, target, root),
            None => hooks::hit_test_screen_rect(tree, host, target, root),
        }
    }

    pub(crate) fn run_feedback(&mut self, tree: &mut WidgetTree, target: NodeId, active: bool) {
        if let Some(f) = self.feedback.as_mut()
            && tree.node_exists(target)
        {
            f(tree, target, active);
        }
    }

    pub(crate) fn run_insert(&mut self, tree: &mut WidgetTree, target: NodeId, dockable: NodeId) {
        match self.insert.as_mut() {
            Some(f) => f(tree, target, dockable),
            None => {
                tracing::error!(
                    "target {:?} has no insert hook; docking {:?} with the default",
                    target,
                    dockable
                );
                hooks::insert_at_target_rect(tree, target, dockable);
            }
        }
    }

    pub(crate) fn run_remove(&mut self, tree: &mut WidgetTree, target: NodeId, dockable: NodeId) {
        match self.remove.as_mut() {
            Some(f) => f(tree, target, dockable),
            None => {
                tree.detach(dockable);
            }
        }
    }
}

/// Ready-made hooks.
pub mod hooks {
    use super::*;
    use crate::widgets::DockingTargetBox;

    /// Pointer inside the target's screen rectangle.
    pub fn hit_test_screen_rect(
        tree: &WidgetTree,
        host: &dyn WindowHost,
        target: NodeId,
        root: Vec2,
    ) -> bool {
        tree.screen_rect(target, host)
            .is_some_and(|rect| rect.contains(root))
    }

    /// Dock at the target's rectangle.
    ///
    /// A [`DockingTargetBox`] placeholder is replaced: the dockable takes its
    /// slot in the placeholder's parent and the placeholder is destroyed.
    /// Any other target receives the dockable as its last child, filling it.
    pub fn insert_at_target_rect(tree: &mut WidgetTree, target: NodeId, dockable: NodeId) {
        let Some(rect) = tree.layout(target) else {
            return;
        };

        if tree.is_widget::<DockingTargetBox>(target)
            && let Some(parent) = tree.parent(target)
            && let Some(index) = tree.index_of(target)
        {
            tree.insert_child(parent, index, dockable);
            tree.place(dockable, rect);
            tree.destroy(target);
        } else {
            tree.add_child(target, dockable);
            tree.place(dockable, rect);
        }
    }

    /// Detach the dockable and leave a [`DockingTargetBox`] at its rectangle
    /// and index.
    pub fn remove_with_placeholder(tree: &mut WidgetTree, target: NodeId, dockable: NodeId) {
        let rect = tree.layout(dockable).unwrap_or_default();
        let Some((parent, index)) = tree.detach(dockable) else {
            return;
        };
        if parent != target {
            tracing::debug!("{:?} was parented under {:?}, not {:?}", dockable, parent, target);
        }

        let placeholder = tree.add_widget(DockingTargetBox::new(), rect);
        tree.insert_child(parent, index, placeholder);
    }
}
