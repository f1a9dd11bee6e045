//! Widget tree: the geometry and parent/child collaborator of the protocol.
//!
//! Layouts are absolute within the top-level window that hosts a node's root,
//! so moving a node to a new rectangle translates its whole subtree. Screen
//! rectangles add the hosting window's root position on top.

use indexmap::IndexMap;
use tether_core::math::Vec2;

use crate::host::{HostWindowId, WindowHost};
use crate::widgets::Widget;

/// Node identifier in the widget tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Rectangle in window-relative coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl LayoutRect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle with the given top-left corner and size.
    pub fn at(position: Vec2, size: Vec2) -> Self {
        Self::new(position.x, position.y, size.x, size.y)
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn translate(&self, delta: Vec2) -> Self {
        Self::new(self.x + delta.x, self.y + delta.y, self.width, self.height)
    }
}

/// A node in the widget tree.
pub struct WidgetNode {
    pub widget: Box<dyn Widget>,
    pub layout: LayoutRect,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Top-level window hosting this node, only ever set on roots.
    pub window: Option<HostWindowId>,
}

/// Arena of widgets with parent/child grouping.
#[derive(Default)]
pub struct WidgetTree {
    nodes: IndexMap<NodeId, WidgetNode>,
    next_id: usize,
    /// Nodes destroyed since the last [`WidgetTree::take_destroyed`].
    destroyed: Vec<NodeId>,
}

impl WidgetTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a widget to the tree as an unparented root and return its NodeId.
    pub fn add_widget<W: Widget>(&mut self, widget: W, layout: LayoutRect) -> NodeId {
        let node_id = NodeId(self.next_id);
        self.next_id += 1;

        self.nodes.insert(
            node_id,
            WidgetNode {
                widget: Box::new(widget),
                layout,
                parent: None,
                children: Vec::new(),
                window: None,
            },
        );

        node_id
    }

    /// Append `child` to `parent`, detaching it from any previous parent.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        let index = self.nodes.get(&parent).map_or(0, |n| n.children.len());
        self.insert_child(parent, index, child);
    }

    /// Insert `child` into `parent` at `index` (clamped to the child count).
    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) {
        if parent == child
            || !self.nodes.contains_key(&parent)
            || !self.nodes.contains_key(&child)
            || self.is_ancestor(child, parent)
        {
            tracing::warn!("refusing to insert {:?} into {:?}", child, parent);
            return;
        }

        self.detach(child);

        if let Some(child_node) = self.nodes.get_mut(&child) {
            child_node.parent = Some(parent);
            if let Some(window) = child_node.window.take() {
                tracing::warn!("{:?} still carried {} when parented", child, window);
            }
        }
        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            let index = index.min(parent_node.children.len());
            parent_node.children.insert(index, child);
        }
    }

    /// Remove `child` from `parent`, returning the index it occupied.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Option<usize> {
        let parent_node = self.nodes.get_mut(&parent)?;
        let index = parent_node.children.iter().position(|&c| c == child)?;
        parent_node.children.remove(index);

        if let Some(child_node) = self.nodes.get_mut(&child) {
            child_node.parent = None;
        }

        Some(index)
    }

    /// Detach a node from its parent, returning the former parent and index.
    pub fn detach(&mut self, node: NodeId) -> Option<(NodeId, usize)> {
        let parent = self.parent(node)?;
        let index = self.remove_child(parent, node)?;
        Some((parent, index))
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(&node).and_then(|n| n.parent)
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes.get(&node).map_or(&[], |n| n.children.as_slice())
    }

    /// Position of a node among its parent's children.
    pub fn index_of(&self, node: NodeId) -> Option<usize> {
        let parent = self.parent(node)?;
        self.children(parent).iter().position(|&c| c == node)
    }

    pub fn node_exists(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn widget(&self, node: NodeId) -> Option<&dyn Widget> {
        self.nodes.get(&node).map(|n| &*n.widget)
    }

    pub fn widget_mut(&mut self, node: NodeId) -> Option<&mut dyn Widget> {
        self.nodes.get_mut(&node).map(|n| &mut *n.widget)
    }

    /// Downcast a node's widget to a concrete type.
    pub fn widget_as<T: Widget>(&self, node: NodeId) -> Option<&T> {
        self.widget(node)?.as_any().downcast_ref::<T>()
    }

    pub fn is_widget<T: Widget>(&self, node: NodeId) -> bool {
        self.widget_as::<T>(node).is_some()
    }

    /// All nodes holding a widget of type `T`, in insertion order.
    pub fn find_widgets<T: Widget>(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|(_, n)| n.widget.as_any().is::<T>())
            .map(|(&id, _)| id)
            .collect()
    }

    pub fn layout(&self, node: NodeId) -> Option<LayoutRect> {
        self.nodes.get(&node).map(|n| n.layout)
    }

    /// Move a node to `rect`, translating its descendants along with it.
    ///
    /// Descendants keep their sizes; only the node itself is resized.
    pub fn place(&mut self, node: NodeId, rect: LayoutRect) {
        let Some(old) = self.layout(node) else {
            return;
        };
        let delta = rect.position() - old.position();

        if let Some(n) = self.nodes.get_mut(&node) {
            n.layout = rect;
        }
        if delta == Vec2::ZERO {
            return;
        }
        for descendant in self.descendants(node) {
            if let Some(n) = self.nodes.get_mut(&descendant) {
                n.layout = n.layout.translate(delta);
            }
        }
    }

    /// All nodes below `node`, depth first.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }

    /// Make `node` (which must be a root) the content of a top-level window.
    pub fn attach_window(&mut self, node: NodeId, window: HostWindowId) {
        if self.parent(node).is_some() {
            tracing::warn!("{:?} has a parent and cannot own {}", node, window);
            return;
        }
        if let Some(n) = self.nodes.get_mut(&node) {
            n.window = Some(window);
        }
    }

    /// Release the window owned by `node`, if any.
    pub fn detach_window(&mut self, node: NodeId) -> Option<HostWindowId> {
        self.nodes.get_mut(&node).and_then(|n| n.window.take())
    }

    /// Window owned directly by `node`.
    pub fn window(&self, node: NodeId) -> Option<HostWindowId> {
        self.nodes.get(&node).and_then(|n| n.window)
    }

    pub fn root_of(&self, node: NodeId) -> NodeId {
        let mut current = node;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current
    }

    /// Window hosting the root of `node`'s tree.
    pub fn window_of(&self, node: NodeId) -> Option<HostWindowId> {
        self.window(self.root_of(node))
    }

    /// Whether `ancestor` is a strict ancestor of `node`.
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.parent(node);
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.parent(parent);
        }
        false
    }

    /// Rectangle of `node` in root (screen) coordinates.
    ///
    /// Roots without a window, or windows whose position the host cannot
    /// report, are treated as sitting at the root origin.
    pub fn screen_rect(&self, node: NodeId, host: &dyn WindowHost) -> Option<LayoutRect> {
        let layout = self.layout(node)?;
        let origin = self
            .window_of(node)
            .and_then(|w| host.window_position(w))
            .unwrap_or(Vec2::ZERO);
        Some(layout.translate(origin))
    }

    /// Remove `node` and its whole subtree.
    ///
    /// Returns every destroyed id; they are also queued for
    /// [`WidgetTree::take_destroyed`] so observers holding weak references
    /// can clear them.
    pub fn destroy(&mut self, node: NodeId) -> Vec<NodeId> {
        if !self.node_exists(node) {
            return Vec::new();
        }
        self.detach(node);

        let mut removed = vec![node];
        removed.extend(self.descendants(node));
        for id in &removed {
            if let Some(n) = self.nodes.shift_remove(id)
                && let Some(window) = n.window
            {
                tracing::debug!("{:?} destroyed while owning {}", id, window);
            }
        }

        self.destroyed.extend_from_slice(&removed);
        removed
    }

    /// Drain the destruction log.
    pub fn take_destroyed(&mut self) -> Vec<NodeId> {
        std::mem::take(&mut self.destroyed)
    }
}
