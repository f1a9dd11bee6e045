use crate::math::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size<T> {
    pub width: T,
    pub height: T,
}

impl<T> Size<T> {
    pub fn new(width: T, height: T) -> Self {
        Size { width, height }
    }
}

impl Size<f32> {
    /// The size as a `(width, height)` vector.
    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Largest edge length.
    pub fn max_edge(self) -> f32 {
        self.width.max(self.height)
    }
}

impl From<Vec2> for Size<f32> {
    fn from(v: Vec2) -> Self {
        Size::new(v.x, v.y)
    }
}
