//! Software snapshot of a dockable, used as a drag cursor image.
//!
//! There is no renderer at this layer, so the snapshot is a flat picture of
//! the subtree: every node's background painted over its rectangle, back to
//! front, with a darkened one-pixel border around the whole thing.

use tether_core::color::Color;
use tether_core::math::Vec2;

use crate::host::CursorImage;
use crate::tree::{NodeId, WidgetTree};

const BORDER_DARKEN: f32 = 0.35;

/// Render `node` scaled so its longest edge fits `max_edge` pixels.
///
/// `grab_offset` (pointer position relative to the node's top-left corner)
/// becomes the cursor hotspot. Returns `None` for unknown or empty nodes.
pub fn render(
    tree: &WidgetTree,
    node: NodeId,
    max_edge: u32,
    grab_offset: Vec2,
) -> Option<CursorImage> {
    tether_core::profiling::profile_function!();

    let layout = tree.layout(node)?;
    let longest = layout.width.max(layout.height);
    if longest <= 0.0 {
        return None;
    }

    let max_edge = max_edge.max(1);
    let scale = (max_edge as f32 / longest).min(1.0);
    let width = ((layout.width * scale).ceil() as u32).clamp(1, max_edge);
    let height = ((layout.height * scale).ceil() as u32).clamp(1, max_edge);
    let mut canvas = Canvas::new(width, height);

    let origin = layout.position();
    let mut painted = vec![node];
    painted.extend(tree.descendants(node));
    for id in painted {
        let (Some(widget), Some(rect)) = (tree.widget(id), tree.layout(id)) else {
            continue;
        };
        let local = (rect.position() - origin) * scale;
        canvas.fill(local, rect.size() * scale, widget.background());
    }

    let base = tree
        .widget(node)
        .map_or(Color::BLACK, |w| w.background());
    canvas.border(base.darken(BORDER_DARKEN));

    let hotspot = (grab_offset * scale).max(Vec2::ZERO);
    Some(CursorImage {
        width,
        height,
        rgba: canvas.pixels,
        hotspot: (
            (hotspot.x as u32).min(width - 1),
            (hotspot.y as u32).min(height - 1),
        ),
    })
}

struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Canvas {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
        }
    }

    fn put(&mut self, x: u32, y: u32, color: [u8; 4]) {
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        self.pixels[offset..offset + 4].copy_from_slice(&color);
    }

    fn fill(&mut self, position: Vec2, size: Vec2, color: Color) {
        if color.a <= 0.0 {
            return;
        }
        let rgba = color.to_rgba_u8();
        let x0 = position.x.max(0.0).floor() as u32;
        let y0 = position.y.max(0.0).floor() as u32;
        let x1 = ((position.x + size.x).ceil().max(0.0) as u32).min(self.width);
        let y1 = ((position.y + size.y).ceil().max(0.0) as u32).min(self.height);
        for y in y0..y1 {
            for x in x0..x1 {
                self.put(x, y, rgba);
            }
        }
    }

    fn border(&mut self, color: Color) {
        let rgba = color.to_rgba_u8();
        for x in 0..self.width {
            self.put(x, 0, rgba);
            self.put(x, self.height - 1, rgba);
        }
        for y in 0..self.height {
            self.put(0, y, rgba);
            self.put(self.width - 1, y, rgba);
        }
    }
}
