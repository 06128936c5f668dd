use super::{Rect, Vec2, Viewport};

/// Placement of fixed-size content inside a window surface.
///
/// The content rectangle (`viewport`) is expressed in surface pixels. All
/// mappings between surface pixels and content pixels are affine with a
/// uniform scale when the placement was produced by [`Letterbox::fit`], and
/// with per-axis scales for [`Letterbox::stretch`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Letterbox {
    content: Viewport,
    surface: Viewport,
    viewport: Rect,
}

impl Letterbox {
    /// Largest centered rectangle with the content's aspect ratio that fits in
    /// `surface`.
    ///
    /// A surface wider than the content gets equal left/right margins
    /// (pillarbox); a taller one gets equal top/bottom margins (letterbox).
    pub fn fit(content: Viewport, surface: Viewport) -> Self {
        if !content.is_valid() || !surface.is_valid() {
            return Self::stretch(content, surface);
        }

        let scale = (surface.width / content.width).min(surface.height / content.height);
        let w = content.width * scale;
        let h = content.height * scale;

        // Snap the margins so both sides are identical in whole pixels.
        let x = ((surface.width - w) / 2.0).floor();
        let y = ((surface.height - h) / 2.0).floor();
        let w = surface.width - 2.0 * x;
        let h = surface.height - 2.0 * y;

        Self {
            content,
            surface,
            viewport: Rect::new(x, y, w, h),
        }
    }

    /// Content fills the whole surface; aspect ratio is not preserved.
    pub fn stretch(content: Viewport, surface: Viewport) -> Self {
        Self {
            content,
            surface,
            viewport: Rect::new(0.0, 0.0, surface.width, surface.height),
        }
    }

    /// Content rectangle in surface pixels.
    #[inline]
    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    #[inline]
    pub fn content(&self) -> Viewport {
        self.content
    }

    #[inline]
    pub fn surface(&self) -> Viewport {
        self.surface
    }

    /// Left/right and top/bottom margins in surface pixels.
    #[inline]
    pub fn margins(&self) -> (f32, f32) {
        (self.viewport.origin.x, self.viewport.origin.y)
    }

    fn scale(&self) -> Vec2 {
        if !self.content.is_valid() || self.viewport.is_empty() {
            return Vec2::new(1.0, 1.0);
        }
        Vec2::new(
            self.viewport.size.x / self.content.width,
            self.viewport.size.y / self.content.height,
        )
    }

    /// Maps a surface pixel position into content pixels.
    ///
    /// Positions in the margins map outside `[0, content)`; callers decide
    /// whether to clamp.
    pub fn window_to_content(&self, p: Vec2) -> Vec2 {
        let s = self.scale();
        let local = p - self.viewport.origin;
        Vec2::new(local.x / s.x, local.y / s.y)
    }

    /// Inverse of [`window_to_content`](Self::window_to_content).
    pub fn content_to_window(&self, p: Vec2) -> Vec2 {
        let s = self.scale();
        Vec2::new(p.x * s.x, p.y * s.y) + self.viewport.origin
    }

    /// Maps a surface pixel position to NDC of the whole surface, +Y up.
    pub fn window_to_ndc(&self, p: Vec2) -> Vec2 {
        to_ndc(p, self.surface.width, self.surface.height)
    }

    /// Maps a content pixel position to NDC of the content rectangle, +Y up.
    pub fn content_to_ndc(&self, p: Vec2) -> Vec2 {
        to_ndc(p, self.content.width, self.content.height)
    }

    /// Content-space region covered by the whole surface.
    ///
    /// Returns the rectangle, in content pixels, that an orthographic
    /// projection would need so the content keeps its aspect ratio while the
    /// margins stay visible: origin is negative by the margin size.
    pub fn visible_content(&self) -> Rect {
        let min = self.window_to_content(Vec2::zero());
        let max = self.window_to_content(Vec2::new(self.surface.width, self.surface.height));
        Rect::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }
}

fn to_ndc(p: Vec2, w: f32, h: f32) -> Vec2 {
    if w <= 0.0 || h <= 0.0 {
        return Vec2::zero();
    }
    Vec2::new(p.x / w * 2.0 - 1.0, -(p.y / h * 2.0 - 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-3;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS
    }

    fn buf() -> Viewport {
        Viewport::new(320.0, 200.0)
    }

    // ── fit ───────────────────────────────────────────────────────────────

    #[test]
    fn wide_surface_is_pillarboxed() {
        let lb = Letterbox::fit(buf(), Viewport::new(800.0, 480.0));
        let vp = lb.viewport();
        assert_eq!(vp, Rect::new(16.0, 0.0, 768.0, 480.0));
        let (mx, my) = lb.margins();
        assert!(mx > 0.0);
        assert_eq!(my, 0.0);
        assert!(vp.size.x < 800.0);
    }

    #[test]
    fn tall_surface_is_letterboxed() {
        let lb = Letterbox::fit(buf(), Viewport::new(640.0, 480.0));
        let vp = lb.viewport();
        assert_eq!(vp.origin.x, 0.0);
        assert_eq!(vp.size.x, 640.0);
        assert_eq!(vp.size.y, 400.0);
        assert_eq!(vp.origin.y, 40.0);
    }

    #[test]
    fn matching_aspect_has_no_margins() {
        let lb = Letterbox::fit(buf(), Viewport::new(1280.0, 800.0));
        assert_eq!(lb.viewport(), Rect::new(0.0, 0.0, 1280.0, 800.0));
    }

    #[test]
    fn fit_preserves_aspect_and_centers() {
        let sizes = [
            (1000.0, 500.0),
            (500.0, 1000.0),
            (1920.0, 1080.0),
            (1024.0, 768.0),
            (333.0, 777.0),
            (1.0, 1.0),
        ];
        for (w, h) in sizes {
            let surface = Viewport::new(w, h);
            let lb = Letterbox::fit(buf(), surface);
            let vp = lb.viewport();

            // Within one pixel of the exact ratio on the shorter axis.
            let tolerance = 2.0 / vp.size.x.min(vp.size.y) * buf().aspect();
            assert!(
                (vp.aspect() - buf().aspect()).abs() <= tolerance,
                "{w}x{h}: aspect {} vs {}",
                vp.aspect(),
                buf().aspect()
            );

            let right = w - vp.max().x;
            let bottom = h - vp.max().y;
            assert!((vp.origin.x - right).abs() < EPS, "{w}x{h}: horizontal margins differ");
            assert!((vp.origin.y - bottom).abs() < EPS, "{w}x{h}: vertical margins differ");
            assert!(vp.origin.x == 0.0 || vp.origin.y == 0.0);
        }
    }

    #[test]
    fn invalid_sizes_fall_back_to_stretch() {
        let lb = Letterbox::fit(Viewport::new(0.0, 0.0), Viewport::new(640.0, 480.0));
        assert_eq!(lb.viewport(), Rect::new(0.0, 0.0, 640.0, 480.0));
    }

    // ── cursor mapping ────────────────────────────────────────────────────

    #[test]
    fn viewport_corners_map_to_content_corners() {
        let lb = Letterbox::fit(buf(), Viewport::new(800.0, 480.0));
        let vp = lb.viewport();
        assert!(close(lb.window_to_content(vp.origin), Vec2::zero()));
        assert!(close(lb.window_to_content(vp.max()), Vec2::new(320.0, 200.0)));
        assert!(close(
            lb.window_to_content(Vec2::new(vp.max().x, vp.origin.y)),
            Vec2::new(320.0, 0.0)
        ));
        assert!(close(
            lb.window_to_content(Vec2::new(vp.origin.x, vp.max().y)),
            Vec2::new(0.0, 200.0)
        ));
    }

    #[test]
    fn mapping_is_invertible() {
        for lb in [
            Letterbox::fit(buf(), Viewport::new(800.0, 480.0)),
            Letterbox::fit(buf(), Viewport::new(640.0, 480.0)),
            Letterbox::stretch(buf(), Viewport::new(1000.0, 500.0)),
        ] {
            for p in [
                Vec2::new(0.0, 0.0),
                Vec2::new(123.5, 77.25),
                Vec2::new(799.0, 479.0),
                Vec2::new(400.0, 240.0),
            ] {
                let back = lb.content_to_window(lb.window_to_content(p));
                assert!(close(back, p), "{p:?} -> {back:?}");
            }
        }
    }

    #[test]
    fn mapping_is_linear() {
        let lb = Letterbox::fit(buf(), Viewport::new(800.0, 480.0));
        let a = Vec2::new(100.0, 50.0);
        let b = Vec2::new(300.0, 250.0);
        let mid = lb.window_to_content((a + b) / 2.0);
        let expected = (lb.window_to_content(a) + lb.window_to_content(b)) / 2.0;
        assert!(close(mid, expected));
    }

    #[test]
    fn margins_map_outside_content() {
        let lb = Letterbox::fit(buf(), Viewport::new(800.0, 480.0));
        assert!(lb.window_to_content(Vec2::new(0.0, 100.0)).x < 0.0);
        assert!(lb.window_to_content(Vec2::new(799.0, 100.0)).x > 320.0);
    }

    #[test]
    fn window_ndc_corners() {
        let lb = Letterbox::stretch(buf(), Viewport::new(1000.0, 500.0));
        assert!(close(lb.window_to_ndc(Vec2::new(0.0, 0.0)), Vec2::new(-1.0, 1.0)));
        assert!(close(lb.window_to_ndc(Vec2::new(1000.0, 500.0)), Vec2::new(1.0, -1.0)));
        assert!(close(lb.window_to_ndc(Vec2::new(500.0, 250.0)), Vec2::zero()));
    }

    #[test]
    fn content_ndc_center_is_origin() {
        let lb = Letterbox::fit(buf(), Viewport::new(800.0, 480.0));
        assert!(close(lb.content_to_ndc(Vec2::new(160.0, 100.0)), Vec2::zero()));
    }

    // ── projection extents ────────────────────────────────────────────────

    #[test]
    fn visible_content_includes_margins() {
        let lb = Letterbox::fit(buf(), Viewport::new(800.0, 480.0));
        let visible = lb.visible_content();
        // 16 px margin at scale 2.4 is 6.666.. content px.
        assert!((visible.origin.x + 16.0 / 2.4).abs() < EPS);
        assert_eq!(visible.origin.y, 0.0);
        assert!((visible.size.x - 800.0 / 2.4).abs() < EPS);
        assert!((visible.size.y - 200.0).abs() < EPS);
    }
}
