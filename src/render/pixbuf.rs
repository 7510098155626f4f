//! RGB pixel buffer and the primitive shapes the scene is drawn from

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Linear mix towards `other`, `t` in 0..=1.
    pub fn mix(self, other: Rgb, t: f32) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let ch = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Rgb(ch(self.0, other.0), ch(self.1, other.1), ch(self.2, other.2))
    }
}

pub struct PixelBuf {
    w: usize,
    h: usize,
    px: Vec<Rgb>,
}

impl PixelBuf {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            px: vec![Rgb(0, 0, 0); w * h],
        }
    }

    pub fn resize(&mut self, w: usize, h: usize) {
        self.w = w;
        self.h = h;
        self.px.clear();
        self.px.resize(w * h, Rgb(0, 0, 0));
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    pub fn set(&mut self, x: i32, y: i32, c: Rgb) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            self.px[y as usize * self.w + x as usize] = c;
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.px[y * self.w + x]
    }

    /// Composite `c` over the existing pixel with opacity `alpha`.
    pub fn blend(&mut self, x: i32, y: i32, c: Rgb, alpha: f32) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            let i = y as usize * self.w + x as usize;
            self.px[i] = self.px[i].mix(c, alpha);
        }
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, c: Rgb) {
        for py in y.max(0)..(y + h).min(self.h as i32) {
            for px in x.max(0)..(x + w).min(self.w as i32) {
                self.set(px, py, c);
            }
        }
    }

    pub fn blend_rect(&mut self, x: i32, y: i32, w: i32, h: i32, c: Rgb, alpha: f32) {
        for py in y.max(0)..(y + h).min(self.h as i32) {
            for px in x.max(0)..(x + w).min(self.w as i32) {
                self.blend(px, py, c, alpha);
            }
        }
    }

    /// Fill an axis-aligned ellipse, colouring each pixel by its normalized
    /// offset from the centre (`u`, `v` in -1..=1).
    pub fn fill_ellipse_with(
        &mut self,
        cx: f32,
        cy: f32,
        rx: f32,
        ry: f32,
        mut shade: impl FnMut(f32, f32) -> Rgb,
    ) {
        let rx = rx.max(0.5);
        let ry = ry.max(0.5);
        let (x0, x1) = ((cx - rx).floor() as i32, (cx + rx).ceil() as i32);
        let (y0, y1) = ((cy - ry).floor() as i32, (cy + ry).ceil() as i32);
        for y in y0..=y1 {
            for x in x0..=x1 {
                let u = (x as f32 + 0.5 - cx) / rx;
                let v = (y as f32 + 0.5 - cy) / ry;
                if u * u + v * v <= 1.0 {
                    self.set(x, y, shade(u, v));
                }
            }
        }
    }

    pub fn fill_ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32, c: Rgb) {
        self.fill_ellipse_with(cx, cy, rx, ry, |_, _| c);
    }

    pub fn blend_ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32, c: Rgb, alpha: f32) {
        let rx = rx.max(0.5);
        let ry = ry.max(0.5);
        for y in (cy - ry).floor() as i32..=(cy + ry).ceil() as i32 {
            for x in (cx - rx).floor() as i32..=(cx + rx).ceil() as i32 {
                let u = (x as f32 + 0.5 - cx) / rx;
                let v = (y as f32 + 0.5 - cy) / ry;
                if u * u + v * v <= 1.0 {
                    self.blend(x, y, c, alpha);
                }
            }
        }
    }

    pub fn fill_circle(&mut self, cx: f32, cy: f32, r: f32, c: Rgb) {
        self.fill_ellipse(cx, cy, r, r, c);
    }

    /// Even-odd scanline fill sampled at pixel centres.
    pub fn fill_polygon(&mut self, points: &[(f32, f32)], c: Rgb) {
        if points.len() < 3 {
            return;
        }
        let min_y = points.iter().map(|p| p.1).fold(f32::INFINITY, f32::min);
        let max_y = points.iter().map(|p| p.1).fold(f32::NEG_INFINITY, f32::max);
        let mut crossings = Vec::with_capacity(points.len());
        for y in min_y.floor() as i32..=max_y.ceil() as i32 {
            let sy = y as f32 + 0.5;
            crossings.clear();
            for (i, &(ax, ay)) in points.iter().enumerate() {
                let (bx, by) = points[(i + 1) % points.len()];
                if (ay <= sy) != (by <= sy) {
                    crossings.push(ax + (sy - ay) / (by - ay) * (bx - ax));
                }
            }
            crossings.sort_by(f32::total_cmp);
            for span in crossings.chunks_exact(2) {
                let start = (span[0] - 0.5).ceil() as i32;
                let end = (span[1] - 0.5).floor() as i32;
                for x in start..=end {
                    self.set(x, y, c);
                }
            }
        }
        // thin shapes can fall between pixel centres; keep a visible dot
        if let Some(&(x, y)) = points.first() {
            self.set(x as i32, y as i32, c);
        }
    }
}
