//! State machine and target protocol behaviour, driven through `MockHost`.

use std::cell::{Cell, RefCell};

use tether_core::geometry::Size;
use tether_core::math::Vec2;
use tether_dock::{
    DockConfig, DockError, DockState, DockStatus, DockableBuilder, DockingContext,
    DockingTargetBox, Event, HostWindowId, LayoutRect, NodeId, Panel, PointerButton, TargetHooks,
    WidgetTree, WindowHost, hooks,
};
use tether_test_utils::MockHost;

#[derive(Debug, Clone, Copy, PartialEq)]
enum HookCall {
    HitTest(NodeId),
    Feedback(NodeId, bool),
    Insert(NodeId, NodeId),
    Remove(NodeId, NodeId),
}

#[derive(Default)]
struct Recorder {
    calls: RefCell<Vec<HookCall>>,
}

impl Recorder {
    fn hooks(&self) -> TargetHooks<'_> {
        TargetHooks::new()
            .hit_test(move |tree, host, target, root| {
                self.calls.borrow_mut().push(HookCall::HitTest(target));
                hooks::hit_test_screen_rect(tree, host, target, root)
            })
            .feedback(move |_, target, on| {
                self.calls.borrow_mut().push(HookCall::Feedback(target, on));
            })
            .insert(move |tree, target, dockable| {
                self.calls.borrow_mut().push(HookCall::Insert(target, dockable));
                hooks::insert_at_target_rect(tree, target, dockable);
            })
            .remove(move |tree, target, dockable| {
                self.calls.borrow_mut().push(HookCall::Remove(target, dockable));
                hooks::remove_with_placeholder(tree, target, dockable);
            })
    }

    fn clear(&self) {
        self.calls.borrow_mut().clear();
    }

    fn inserts(&self) -> usize {
        self.count(|c| matches!(c, HookCall::Insert(..)))
    }

    fn removes(&self) -> usize {
        self.count(|c| matches!(c, HookCall::Remove(..)))
    }

    fn hit_tests(&self) -> usize {
        self.count(|c| matches!(c, HookCall::HitTest(..)))
    }

    fn feedback(&self) -> Vec<(NodeId, bool)> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                HookCall::Feedback(target, on) => Some((*target, *on)),
                _ => None,
            })
            .collect()
    }

    fn count(&self, pred: impl Fn(&HookCall) -> bool) -> usize {
        self.calls.borrow().iter().filter(|c| pred(c)).count()
    }
}

/// Main window at (100, 100) with a dock area on its right half.
struct Harness {
    host: MockHost,
    tree: WidgetTree,
    docking: DockingContext,
    main_root: NodeId,
    target: NodeId,
}

impl Harness {
    fn new() -> Self {
        Self::with_config(DockConfig::default())
    }

    fn with_config(config: DockConfig) -> Self {
        let mut host = MockHost::generic();
        let mut tree = WidgetTree::new();

        let main = host.add_window(Vec2::new(100.0, 100.0), Size::new(800.0, 600.0));
        let main_root = tree.add_widget(Panel::new("main"), LayoutRect::new(0.0, 0.0, 800.0, 600.0));
        tree.attach_window(main_root, main);

        let target = tree.add_widget(
            Panel::new("dock area"),
            LayoutRect::new(400.0, 0.0, 400.0, 600.0),
        );
        tree.add_child(main_root, target);

        Self {
            host,
            tree,
            docking: DockingContext::with_config(config),
            main_root,
            target,
        }
    }

    /// Free dockable whose window opens at (50, 50), 200x100, 20px handle.
    fn free_dockable(&mut self, label: &str) -> NodeId {
        self.docking
            .create_dockable(
                &mut self.tree,
                &mut self.host,
                DockableBuilder::new(label)
                    .layout(LayoutRect::new(50.0, 50.0, 200.0, 100.0))
                    .handle(20.0),
            )
            .unwrap()
    }

    fn state(&self, dockable: NodeId) -> DockState {
        self.docking.dockable(dockable).unwrap().state()
    }

    fn window(&self, dockable: NodeId) -> Option<HostWindowId> {
        self.docking.dockable(dockable).unwrap().window()
    }

    fn dockable_event(&mut self, dockable: NodeId, event: Event) -> DockStatus {
        if let Some(root) = event.root() {
            self.host.set_pointer(root);
        }
        self.docking
            .handle_dockable_event(&mut self.tree, &mut self.host, dockable, &event)
    }

    fn target_event(&mut self, target: NodeId, event: Event, hooks: &mut TargetHooks<'_>) -> DockStatus {
        self.docking
            .handle_target_event(&mut self.tree, &mut self.host, target, &event, hooks)
    }

    /// Deliver queued notifications; returns what was delivered.
    fn deliver(&mut self, hooks: &mut TargetHooks<'_>) -> Vec<(NodeId, Event)> {
        let mut delivered = Vec::new();
        loop {
            let pending = self.docking.take_notifications();
            if pending.is_empty() {
                return delivered;
            }
            for note in pending {
                self.target_event(note.target, note.event.clone(), hooks);
                delivered.push((note.target, note.event));
            }
        }
    }

    fn press(&mut self, dockable: NodeId, root: Vec2) -> DockStatus {
        self.dockable_event(
            dockable,
            Event::PointerDown {
                button: PointerButton::Primary,
                root,
            },
        )
    }

    /// Pointer motion: first the dockable, then every target in order.
    fn move_to(
        &mut self,
        dockable: NodeId,
        root: Vec2,
        targets: &[NodeId],
        hooks: &mut TargetHooks<'_>,
    ) -> Vec<DockStatus> {
        self.dockable_event(dockable, Event::PointerMove { root });
        let mut statuses = Vec::with_capacity(targets.len());
        for &target in targets {
            statuses.push(self.target_event(target, Event::PointerMove { root }, hooks));
        }
        self.deliver(hooks);
        statuses
    }

    fn release(&mut self, dockable: NodeId, root: Vec2, hooks: &mut TargetHooks<'_>) {
        self.dockable_event(
            dockable,
            Event::PointerUp {
                button: PointerButton::Primary,
                root,
            },
        );
        self.deliver(hooks);
    }

    fn in_flight_count(&self) -> usize {
        self.docking
            .dockables()
            .filter(|d| d.state().is_in_flight())
            .count()
    }
}

const OVER_TARGET: Vec2 = Vec2::new(600.0, 300.0);
const EMPTY_SPACE: Vec2 = Vec2::new(300.0, 300.0);

/// Press on the handle of a fresh free dockable and drag past the threshold.
fn start_drag(h: &mut Harness, dockable: NodeId, hooks: &mut TargetHooks<'_>) {
    let target = h.target;
    h.press(dockable, Vec2::new(60.0, 60.0));
    h.move_to(dockable, Vec2::new(67.0, 60.0), &[target], hooks);
    assert_eq!(h.state(dockable), DockState::Dragging);
}

/// Drag `dockable` from undocked into the dock area and drop it there.
fn dock_into_target(h: &mut Harness, dockable: NodeId, hooks: &mut TargetHooks<'_>) {
    let target = h.target;
    start_drag(h, dockable, hooks);
    h.move_to(dockable, OVER_TARGET, &[target], hooks);
    h.release(dockable, OVER_TARGET, hooks);
    assert_eq!(h.state(dockable), DockState::Docked);
}

#[test]
fn test_free_dockable_owns_window() {
    let mut h = Harness::new();
    let d = h.free_dockable("Inspector");

    let window = h.window(d).unwrap();
    assert_eq!(h.state(d), DockState::Undocked);
    assert_eq!(h.tree.window(d), Some(window));
    assert_eq!(h.host.window_position(window), Some(Vec2::new(50.0, 50.0)));
    assert_eq!(h.tree.layout(d), Some(LayoutRect::new(0.0, 0.0, 200.0, 100.0)));

    let handle = h.docking.dockable(d).unwrap().handle().unwrap();
    assert_eq!(h.tree.parent(handle), Some(d));
    assert_eq!(h.tree.layout(handle), Some(LayoutRect::new(0.0, 0.0, 200.0, 20.0)));
}

#[test]
fn test_threshold_then_tear_out_into_fresh_window() {
    let mut h = Harness::new();
    let recorder = Recorder::default();
    let mut hooks = recorder.hooks();
    let d = h.free_dockable("Inspector");
    let target = h.target;
    let original = h.window(d).unwrap();

    h.press(d, Vec2::new(60.0, 60.0));
    h.move_to(d, Vec2::new(62.0, 60.0), &[target], &mut hooks);
    assert_eq!(h.state(d), DockState::Undocked);
    assert_eq!(h.docking.dragging(), None);

    h.move_to(d, Vec2::new(67.0, 60.0), &[target], &mut hooks);
    assert_eq!(h.state(d), DockState::Dragging);
    assert_eq!(h.docking.dragging(), Some(d));

    let fresh = h.window(d).unwrap();
    assert_ne!(fresh, original);
    assert!(!h.host.has_window(original));
    assert_eq!(h.tree.window(d), Some(fresh));
    // Grabbed 17x10 into the dockable; the window opens right under the pointer.
    assert_eq!(h.host.window_position(fresh), Some(Vec2::new(50.0, 50.0)));
}

#[test]
fn test_window_follows_pointer() {
    let mut h = Harness::new();
    let recorder = Recorder::default();
    let mut hooks = recorder.hooks();
    let d = h.free_dockable("Inspector");
    start_drag(&mut h, d, &mut hooks);
    let window = h.window(d).unwrap();

    h.move_to(d, Vec2::new(80.0, 70.0), &[], &mut hooks);
    assert_eq!(h.host.last_move(), Some((window, Vec2::new(63.0, 60.0))));

    h.move_to(d, Vec2::new(120.0, 90.0), &[], &mut hooks);
    assert_eq!(h.host.window_position(window), Some(Vec2::new(103.0, 80.0)));
}

#[test]
fn test_entering_target_gives_feedback() {
    let mut h = Harness::new();
    let recorder = Recorder::default();
    let mut hooks = recorder.hooks();
    let d = h.free_dockable("Inspector");
    let target = h.target;
    start_drag(&mut h, d, &mut hooks);

    let statuses = h.move_to(d, OVER_TARGET, &[target], &mut hooks);

    assert!(statuses[0].is_handled());
    assert_eq!(h.state(d), DockState::Dock);
    assert_eq!(h.docking.dockable(d).unwrap().active_target(), Some(target));
    assert_eq!(recorder.feedback(), vec![(target, true)]);
}

#[test]
fn test_leaving_target_drops_feedback() {
    let mut h = Harness::new();
    let recorder = Recorder::default();
    let mut hooks = recorder.hooks();
    let d = h.free_dockable("Inspector");
    let target = h.target;
    start_drag(&mut h, d, &mut hooks);
    h.move_to(d, OVER_TARGET, &[target], &mut hooks);

    let statuses = h.move_to(d, EMPTY_SPACE, &[target], &mut hooks);

    assert!(!statuses[0].is_handled());
    assert_eq!(h.state(d), DockState::Dragging);
    assert_eq!(h.docking.dockable(d).unwrap().active_target(), None);
    assert_eq!(recorder.feedback(), vec![(target, true), (target, false)]);
}

#[test]
fn test_release_over_target_docks() {
    let mut h = Harness::new();
    let recorder = Recorder::default();
    let mut hooks = recorder.hooks();
    let d = h.free_dockable("Inspector");
    let target = h.target;
    start_drag(&mut h, d, &mut hooks);
    h.move_to(d, OVER_TARGET, &[target], &mut hooks);
    let temp = h.window(d).unwrap();

    h.release(d, OVER_TARGET, &mut hooks);

    assert_eq!(recorder.inserts(), 1);
    assert_eq!(h.state(d), DockState::Docked);
    assert_eq!(h.tree.parent(d), Some(target));
    assert_eq!(h.tree.layout(d), h.tree.layout(target));
    assert!(!h.host.has_window(temp));
    assert_eq!(h.window(d), None);
    assert_eq!(h.docking.dragging(), None);
    assert_eq!(recorder.feedback().last(), Some(&(target, false)));
}

#[test]
fn test_strong_drag_tears_out_of_docked() {
    let mut h = Harness::new();
    let recorder = Recorder::default();
    let mut hooks = recorder.hooks();
    let d = h.free_dockable("Inspector");
    let target = h.target;
    dock_into_target(&mut h, d, &mut hooks);

    // Docked at (400, 0) in the main window, i.e. (500, 100) on screen.
    let status = h.press(d, Vec2::new(600.0, 110.0));
    assert!(status.is_understood());
    assert!(!status.is_handled());

    h.move_to(d, Vec2::new(605.0, 110.0), &[target], &mut hooks);
    assert_eq!(h.state(d), DockState::Docked);
    assert_eq!(recorder.removes(), 0);

    h.dockable_event(d, Event::PointerMove { root: Vec2::new(620.0, 110.0) });
    let status = h.target_event(target, Event::PointerMove { root: Vec2::new(620.0, 110.0) }, &mut hooks);
    assert!(status.is_handled());

    assert_eq!(recorder.removes(), 1);
    assert_eq!(h.state(d), DockState::Dragging);
    assert_eq!(h.docking.dockable(d).unwrap().origin_target(), Some(target));
    assert_eq!(h.tree.parent(d), None);

    let placeholder = h.tree.children(target)[0];
    assert!(h.tree.is_widget::<DockingTargetBox>(placeholder));
    assert_eq!(h.tree.layout(placeholder), Some(LayoutRect::new(400.0, 0.0, 400.0, 600.0)));

    let notes = h.docking.take_notifications();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].target, target);
    assert_eq!(notes[0].event, Event::Undock { dockable: d });

    let window = h.window(d).unwrap();
    assert_eq!(h.host.window_position(window), Some(Vec2::new(500.0, 100.0)));
}

#[test]
fn test_release_over_empty_space_stays_undocked() {
    let mut h = Harness::new();
    let recorder = Recorder::default();
    let mut hooks = recorder.hooks();
    let d = h.free_dockable("Inspector");
    let target = h.target;
    start_drag(&mut h, d, &mut hooks);
    h.move_to(d, EMPTY_SPACE, &[target], &mut hooks);
    let window = h.window(d).unwrap();

    h.release(d, EMPTY_SPACE, &mut hooks);

    assert_eq!(h.state(d), DockState::Undocked);
    assert_eq!(h.docking.dragging(), None);
    assert_eq!(h.tree.window(d), Some(window));
    assert!(h.host.has_window(window));
    assert_eq!(recorder.inserts(), 0);
    assert_eq!(recorder.removes(), 0);
    assert!(recorder.feedback().is_empty());
    assert_eq!(h.host.count_confirms(), 0);
}

#[test]
fn test_tear_out_is_idempotent() {
    let mut h = Harness::new();
    let d = h.free_dockable("Inspector");

    h.docking
        .tear_out(&mut h.tree, &mut h.host, d, Vec2::new(60.0, 60.0))
        .unwrap();
    let window = h.window(d);
    let calls = h.host.calls().len();

    h.docking
        .tear_out(&mut h.tree, &mut h.host, d, Vec2::new(90.0, 90.0))
        .unwrap();

    assert_eq!(h.state(d), DockState::Dragging);
    assert_eq!(h.window(d), window);
    assert_eq!(h.host.calls().len(), calls);
}

#[test]
fn test_redock_round_trip_geometry() {
    let mut h = Harness::new();
    let recorder = Recorder::default();
    let mut hooks = recorder.hooks();
    let d = h.free_dockable("Inspector");
    let target = h.target;
    dock_into_target(&mut h, d, &mut hooks);
    let docked_layout = h.tree.layout(d);
    let docked_index = h.tree.index_of(d);

    h.press(d, Vec2::new(600.0, 110.0));
    h.move_to(d, Vec2::new(620.0, 110.0), &[target], &mut hooks);
    assert_eq!(h.state(d), DockState::Dragging);
    let placeholder = h.tree.children(target)[0];

    // The vacated container refuses; its placeholder takes the dockable.
    h.move_to(d, OVER_TARGET, &[target, placeholder], &mut hooks);
    assert_eq!(h.docking.dockable(d).unwrap().active_target(), Some(placeholder));
    h.release(d, OVER_TARGET, &mut hooks);

    assert_eq!(h.state(d), DockState::Docked);
    assert_eq!(h.tree.parent(d), Some(target));
    assert_eq!(h.tree.layout(d), docked_layout);
    assert_eq!(h.tree.index_of(d), docked_index);
    assert!(!h.tree.node_exists(placeholder));
    assert_eq!(h.docking.dockable(d).unwrap().origin_target(), None);
}

#[test]
fn test_vacated_container_rejects_redock() {
    let mut h = Harness::new();
    let recorder = Recorder::default();
    let mut hooks = recorder.hooks();
    let d = h.free_dockable("Inspector");
    let target = h.target;
    dock_into_target(&mut h, d, &mut hooks);

    h.press(d, Vec2::new(600.0, 110.0));
    h.move_to(d, Vec2::new(620.0, 110.0), &[target], &mut hooks);
    let feedback_before = recorder.feedback().len();

    let statuses = h.move_to(d, OVER_TARGET, &[target], &mut hooks);

    assert!(!statuses[0].is_handled());
    assert_eq!(h.state(d), DockState::Dragging);
    assert_eq!(recorder.feedback().len(), feedback_before);
}

#[test]
fn test_own_descendant_never_accepts() {
    let mut h = Harness::new();
    let recorder = Recorder::default();
    let mut hooks = recorder.hooks();
    let d = h.free_dockable("Inspector");
    let inner = h
        .tree
        .add_widget(Panel::new("inner"), LayoutRect::new(0.0, 20.0, 200.0, 80.0));
    h.tree.add_child(d, inner);
    start_drag(&mut h, d, &mut hooks);
    recorder.clear();

    // The pointer is over the dockable's own child.
    let statuses = h.move_to(d, Vec2::new(60.0, 80.0), &[inner], &mut hooks);

    assert!(!statuses[0].is_handled());
    assert_eq!(h.state(d), DockState::Dragging);
    assert!(recorder.feedback().is_empty());
    assert_eq!(recorder.hit_tests(), 0);
}

#[test]
fn test_accept_filter_vetoes_before_hit_test() {
    let mut h = Harness::new();
    let recorder = Recorder::default();
    let mut hooks = recorder.hooks().accept(|_, _, _| false);
    let d = h.free_dockable("Inspector");
    let target = h.target;
    start_drag(&mut h, d, &mut hooks);

    let statuses = h.move_to(d, OVER_TARGET, &[target], &mut hooks);

    assert!(!statuses[0].is_handled());
    assert_eq!(h.state(d), DockState::Dragging);
    assert_eq!(recorder.hit_tests(), 0);
    assert!(recorder.feedback().is_empty());
}

#[test]
fn test_accept_filter_by_size() {
    let mut h = Harness::new();
    let recorder = Recorder::default();
    let mut hooks = recorder.hooks().accept(|tree, target, dockable| {
        let (Some(t), Some(d)) = (tree.layout(target), tree.layout(dockable)) else {
            return false;
        };
        d.width <= t.width && d.height <= t.height
    });
    let d = h.free_dockable("Inspector");
    let target = h.target;
    start_drag(&mut h, d, &mut hooks);

    h.move_to(d, OVER_TARGET, &[target], &mut hooks);

    assert_eq!(h.state(d), DockState::Dock);
}

#[test]
fn test_single_coordinator() {
    let mut h = Harness::new();
    let recorder = Recorder::default();
    let mut hooks = recorder.hooks();
    let a = h.free_dockable("A");
    let b = h.free_dockable("B");

    h.docking
        .tear_out(&mut h.tree, &mut h.host, a, Vec2::new(60.0, 60.0))
        .unwrap();
    let err = h
        .docking
        .tear_out(&mut h.tree, &mut h.host, b, Vec2::new(60.0, 60.0))
        .unwrap_err();
    assert_eq!(err, DockError::DragInProgress(a));

    h.press(b, Vec2::new(60.0, 60.0));
    h.move_to(b, Vec2::new(90.0, 60.0), &[], &mut hooks);

    assert_eq!(h.state(b), DockState::Undocked);
    assert_eq!(h.docking.dragging(), Some(a));
    assert_eq!(h.in_flight_count(), 1);
}

#[test]
fn test_grab_loss_forces_undocked() {
    let mut h = Harness::new();
    let recorder = Recorder::default();
    let mut hooks = recorder.hooks();
    let d = h.free_dockable("Inspector");
    let target = h.target;
    start_drag(&mut h, d, &mut hooks);
    h.move_to(d, OVER_TARGET, &[target], &mut hooks);
    assert_eq!(h.state(d), DockState::Dock);

    let status = h.dockable_event(d, Event::GrabLost);
    let delivered = h.deliver(&mut hooks);

    assert!(status.is_handled());
    assert_eq!(h.state(d), DockState::Undocked);
    assert_eq!(h.docking.dragging(), None);
    assert!(h.window(d).is_some());
    assert_eq!(delivered, vec![(target, Event::DockLeave)]);
    assert_eq!(recorder.feedback().last(), Some(&(target, false)));
    assert_eq!(recorder.inserts(), 0);
}

#[test]
fn test_closing_drag_window_is_grab_loss() {
    let mut h = Harness::new();
    let recorder = Recorder::default();
    let mut hooks = recorder.hooks();
    let d = h.free_dockable("Inspector");
    start_drag(&mut h, d, &mut hooks);
    let window = h.window(d).unwrap();

    h.dockable_event(d, Event::CloseRequested { window });
    assert_eq!(h.state(d), DockState::Undocked);
    assert!(h.docking.is_dockable(d));

    h.dockable_event(d, Event::CloseRequested { window });
    assert!(!h.docking.is_dockable(d));
    assert!(!h.tree.node_exists(d));
    assert!(!h.host.has_window(window));
}

#[test]
fn test_force_undocked_rejects_docked() {
    let mut h = Harness::new();
    let recorder = Recorder::default();
    let mut hooks = recorder.hooks();
    let d = h.free_dockable("Inspector");
    dock_into_target(&mut h, d, &mut hooks);

    let err = h
        .docking
        .force_undocked(&mut h.tree, &mut h.host, d)
        .unwrap_err();

    assert_eq!(
        err,
        DockError::InvalidState {
            node: d,
            state: DockState::Docked
        }
    );
}

#[test]
fn test_confirm_discard_destroys_dockable() {
    let mut h = Harness::with_config(DockConfig::new().confirm_on_release(true));
    h.host.set_confirm_answer(false);
    let recorder = Recorder::default();
    let mut hooks = recorder.hooks();
    let d = h.free_dockable("Inspector");
    start_drag(&mut h, d, &mut hooks);
    let window = h.window(d).unwrap();

    h.release(d, EMPTY_SPACE, &mut hooks);

    assert_eq!(h.host.count_confirms(), 1);
    assert!(!h.docking.is_dockable(d));
    assert!(!h.tree.node_exists(d));
    assert!(!h.host.has_window(window));
    assert_eq!(h.docking.dragging(), None);
}

#[test]
fn test_confirm_keep_leaves_window() {
    let mut h = Harness::with_config(DockConfig::new().confirm_on_release(true));
    let recorder = Recorder::default();
    let mut hooks = recorder.hooks();
    let d = h.free_dockable("Inspector");
    start_drag(&mut h, d, &mut hooks);

    h.release(d, EMPTY_SPACE, &mut hooks);

    assert_eq!(h.host.count_confirms(), 1);
    assert_eq!(h.state(d), DockState::Undocked);
    assert!(h.window(d).is_some());
}

#[test]
fn test_destroying_targets_clears_references() {
    let mut h = Harness::new();
    let recorder = Recorder::default();
    let mut hooks = recorder.hooks();
    let d = h.free_dockable("Inspector");
    let target = h.target;
    dock_into_target(&mut h, d, &mut hooks);
    h.press(d, Vec2::new(600.0, 110.0));
    h.move_to(d, Vec2::new(620.0, 110.0), &[target], &mut hooks);
    let placeholder = h.tree.children(target)[0];
    h.move_to(d, OVER_TARGET, &[placeholder], &mut hooks);
    assert_eq!(h.state(d), DockState::Dock);

    h.docking.destroy_widget(&mut h.tree, &mut h.host, target);

    let dockable = h.docking.dockable(d).unwrap();
    assert_eq!(dockable.origin_target(), None);
    assert_eq!(dockable.active_target(), None);
    assert_eq!(dockable.state(), DockState::Dragging);
    assert_eq!(h.docking.dragging(), Some(d));
}

#[test]
fn test_destroying_dragged_dockable_resets_coordinator() {
    let mut h = Harness::new();
    let recorder = Recorder::default();
    let mut hooks = recorder.hooks();
    let d = h.free_dockable("Inspector");
    let target = h.target;
    start_drag(&mut h, d, &mut hooks);
    h.move_to(d, OVER_TARGET, &[target], &mut hooks);
    let window = h.window(d).unwrap();

    h.docking
        .destroy_dockable(&mut h.tree, &mut h.host, d)
        .unwrap();

    assert_eq!(h.docking.dragging(), None);
    assert!(!h.host.has_window(window));
    let notes = h.docking.take_notifications();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].event, Event::DockLeave);
    assert_eq!(
        h.docking.destroy_dockable(&mut h.tree, &mut h.host, d),
        Err(DockError::NotADockable(d))
    );
}

#[test]
fn test_new_target_takes_over_and_old_one_is_told() {
    let mut h = Harness::new();
    let recorder = Recorder::default();
    let mut hooks = recorder.hooks();
    let d = h.free_dockable("Inspector");
    let target = h.target;
    let left = h
        .tree
        .add_widget(Panel::new("left"), LayoutRect::new(0.0, 0.0, 400.0, 600.0));
    h.tree.add_child(h.main_root, left);
    start_drag(&mut h, d, &mut hooks);
    h.move_to(d, OVER_TARGET, &[left, target], &mut hooks);
    assert_eq!(h.docking.dockable(d).unwrap().active_target(), Some(target));

    // Left processes the motion first and claims the dockable.
    h.move_to(d, Vec2::new(300.0, 300.0), &[left, target], &mut hooks);

    assert_eq!(h.docking.dockable(d).unwrap().active_target(), Some(left));
    assert_eq!(h.state(d), DockState::Dock);
    let feedback = recorder.feedback();
    assert!(feedback.contains(&(target, false)));
    assert_eq!(feedback.last(), Some(&(target, false)));
    assert!(feedback.contains(&(left, true)));
}

#[test]
fn test_nested_target_keeps_priority() {
    let mut h = Harness::new();
    let recorder = Recorder::default();
    let mut hooks = recorder.hooks();
    let d = h.free_dockable("Inspector");
    let target = h.target;
    let nested = h
        .tree
        .add_widget(Panel::new("nested"), LayoutRect::new(450.0, 50.0, 200.0, 200.0));
    h.tree.add_child(target, nested);
    start_drag(&mut h, d, &mut hooks);

    let statuses = h.move_to(d, Vec2::new(600.0, 200.0), &[nested, target], &mut hooks);

    assert!(statuses[0].is_handled());
    assert!(!statuses[1].is_handled());
    assert_eq!(h.docking.dockable(d).unwrap().active_target(), Some(nested));
}

#[test]
fn test_missing_insert_hook_falls_back_to_default() {
    let mut h = Harness::new();
    let mut hooks = TargetHooks::new();
    let d = h.free_dockable("Inspector");
    let target = h.target;
    start_drag(&mut h, d, &mut hooks);
    h.move_to(d, OVER_TARGET, &[target], &mut hooks);

    h.release(d, OVER_TARGET, &mut hooks);

    assert_eq!(h.state(d), DockState::Docked);
    assert_eq!(h.tree.parent(d), Some(target));
}

#[test]
fn test_insert_hook_that_does_nothing_ends_undocked() {
    let mut h = Harness::new();
    let mut hooks = TargetHooks::new().insert(|_, _, _| {});
    let d = h.free_dockable("Inspector");
    let target = h.target;
    start_drag(&mut h, d, &mut hooks);
    h.move_to(d, OVER_TARGET, &[target], &mut hooks);

    h.release(d, OVER_TARGET, &mut hooks);

    assert_eq!(h.state(d), DockState::Undocked);
    assert!(h.window(d).is_some());
    assert_eq!(h.docking.dragging(), None);
}

#[test]
fn test_undock_notification_is_understood_only() {
    let mut h = Harness::new();
    let mut hooks = TargetHooks::with_defaults();
    let target = h.target;

    let status = h.target_event(target, Event::Undock { dockable: NodeId(42) }, &mut hooks);

    assert!(status.is_understood());
    assert!(!status.is_handled());
}

#[test]
fn test_state_styles_follow_transitions() {
    let mut h = Harness::new();
    let recorder = Recorder::default();
    let mut hooks = recorder.hooks();
    let d = h.free_dockable("Inspector");
    let handle = h.docking.dockable(d).unwrap().handle().unwrap();
    let styles = h.docking.dockable(d).unwrap().styles().clone();
    let target = h.target;

    assert_eq!(h.tree.widget(handle).unwrap().background(), styles.undocked.color);
    start_drag(&mut h, d, &mut hooks);
    assert_eq!(h.tree.widget(handle).unwrap().background(), styles.dragging.color);
    h.move_to(d, OVER_TARGET, &[target], &mut hooks);
    h.release(d, OVER_TARGET, &mut hooks);
    assert_eq!(h.tree.widget(handle).unwrap().background(), styles.docked.color);
}

#[test]
fn test_create_docked_dockable() {
    let mut h = Harness::new();
    let target = h.target;
    let d = h
        .docking
        .create_dockable(
            &mut h.tree,
            &mut h.host,
            DockableBuilder::new("Console").docked_in(target),
        )
        .unwrap();

    assert_eq!(h.state(d), DockState::Docked);
    assert_eq!(h.tree.parent(d), Some(target));
    assert_eq!(h.window(d), None);
    assert_eq!(h.host.count_window_creates(), 0);

    let err = h
        .docking
        .create_dockable(
            &mut h.tree,
            &mut h.host,
            DockableBuilder::new("Lost").docked_in(NodeId(999)),
        )
        .unwrap_err();
    assert_eq!(err, DockError::NodeNotFound(NodeId(999)));
}

#[test]
fn test_press_outside_handle_never_drags() {
    let mut h = Harness::new();
    let recorder = Recorder::default();
    let mut hooks = recorder.hooks();
    let d = h.free_dockable("Inspector");
    let target = h.target;
    let window = h.window(d);

    // Inside the dockable's body, below its 20px handle.
    let status = h.press(d, Vec2::new(60.0, 140.0));
    assert!(!status.is_understood());
    h.move_to(d, Vec2::new(75.0, 140.0), &[target], &mut hooks);
    h.move_to(d, OVER_TARGET, &[target], &mut hooks);

    assert_eq!(h.state(d), DockState::Undocked);
    assert_eq!(h.docking.dragging(), None);
    assert_eq!(h.window(d), window);
    assert_eq!(h.host.count_window_creates(), 1);
}

#[test]
fn test_docked_body_press_never_tears_out() {
    let mut h = Harness::new();
    let recorder = Recorder::default();
    let mut hooks = recorder.hooks();
    let d = h.free_dockable("Inspector");
    let target = h.target;
    dock_into_target(&mut h, d, &mut hooks);
    recorder.clear();

    let status = h.press(d, Vec2::new(600.0, 300.0));
    assert!(status.is_understood());
    assert!(!status.is_handled());
    h.move_to(d, Vec2::new(640.0, 300.0), &[target], &mut hooks);

    assert_eq!(h.state(d), DockState::Docked);
    assert_eq!(h.tree.parent(d), Some(target));
    assert_eq!(recorder.removes(), 0);
    assert!(h.docking.take_notifications().is_empty());
}

#[test]
fn test_focus_lost_by_drag_window_cancels() {
    let mut h = Harness::new();
    let recorder = Recorder::default();
    let mut hooks = recorder.hooks();
    let d = h.free_dockable("Inspector");
    let target = h.target;
    start_drag(&mut h, d, &mut hooks);
    h.move_to(d, OVER_TARGET, &[target], &mut hooks);
    let temp = h.window(d).unwrap();

    let status = h.dockable_event(d, Event::FocusLost { window: temp });
    let delivered = h.deliver(&mut hooks);

    assert!(status.is_handled());
    assert_eq!(h.state(d), DockState::Undocked);
    assert_eq!(h.docking.dragging(), None);
    assert_eq!(h.tree.window(d), Some(temp));
    assert_eq!(delivered, vec![(target, Event::DockLeave)]);
    assert_eq!(recorder.inserts(), 0);
}

#[test]
fn test_focus_moving_to_drag_window_keeps_drag() {
    let mut h = Harness::new();
    let recorder = Recorder::default();
    let mut hooks = recorder.hooks();
    let d = h.free_dockable("Inspector");
    let main = h.tree.window(h.main_root).unwrap();
    start_drag(&mut h, d, &mut hooks);

    // The borderless window opened by the tear-out takes focus.
    let status = h.dockable_event(d, Event::FocusLost { window: main });

    assert!(!status.is_handled());
    assert_eq!(h.state(d), DockState::Dragging);
    assert_eq!(h.docking.dragging(), Some(d));
}

#[test]
fn test_force_undocked_leaves_active_target() {
    let mut h = Harness::new();
    let recorder = Recorder::default();
    let mut hooks = recorder.hooks();
    let d = h.free_dockable("Inspector");
    let target = h.target;
    start_drag(&mut h, d, &mut hooks);
    h.move_to(d, OVER_TARGET, &[target], &mut hooks);
    assert_eq!(h.state(d), DockState::Dock);

    h.docking
        .force_undocked(&mut h.tree, &mut h.host, d)
        .unwrap();

    assert_eq!(h.state(d), DockState::Undocked);
    assert_eq!(h.docking.dragging(), None);
    assert_eq!(h.docking.dockable(d).unwrap().active_target(), None);
    let notes = h.docking.take_notifications();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].target, target);
    assert_eq!(notes[0].event, Event::DockLeave);
}

#[test]
fn test_accept_filter_turning_down_leaves_dock() {
    let mut h = Harness::new();
    let recorder = Recorder::default();
    let allow = Cell::new(true);
    let mut hooks = recorder.hooks().accept(|_, _, _| allow.get());
    let d = h.free_dockable("Inspector");
    let target = h.target;
    start_drag(&mut h, d, &mut hooks);
    h.move_to(d, OVER_TARGET, &[target], &mut hooks);
    assert_eq!(h.state(d), DockState::Dock);

    allow.set(false);
    let statuses = h.move_to(d, Vec2::new(610.0, 310.0), &[target], &mut hooks);

    assert!(!statuses[0].is_handled());
    assert_eq!(h.state(d), DockState::Dragging);
    assert_eq!(h.docking.dockable(d).unwrap().active_target(), None);
    assert_eq!(recorder.feedback().last(), Some(&(target, false)));
    assert_eq!(h.docking.dragging(), Some(d));
}
