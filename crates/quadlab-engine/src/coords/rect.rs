use super::Vec2;

/// Axis-aligned rectangle in pixels (top-left origin).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn max(self) -> Vec2 {
        self.origin + self.size
    }

    #[inline]
    pub fn center(self) -> Vec2 {
        self.origin + self.size / 2.0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.origin.is_finite() && self.size.is_finite()
    }

    /// Width / height. Zero for empty rectangles.
    #[inline]
    pub fn aspect(self) -> f32 {
        if self.is_empty() { 0.0 } else { self.size.x / self.size.y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(x: f32, y: f32, w: f32, h: f32) -> Rect { Rect::new(x, y, w, h) }

    #[test]
    fn max_and_center() {
        let rect = r(10.0, 20.0, 100.0, 50.0);
        assert_eq!(rect.max(), Vec2::new(110.0, 70.0));
        assert_eq!(rect.center(), Vec2::new(60.0, 45.0));
    }

    #[test]
    fn aspect_of_empty_is_zero() {
        assert_eq!(r(0.0, 0.0, 0.0, 10.0).aspect(), 0.0);
        assert_eq!(r(0.0, 0.0, 320.0, 200.0).aspect(), 1.6);
    }
}
