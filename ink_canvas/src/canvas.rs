//! The persistent ink layer.
//!
//! A [`Canvas`] is an ARGB pixel buffer sized to the video frame.  Zero
//! means "no ink here"; anything drawn carries an opaque alpha byte, so the
//! compositor can distinguish ink from empty space.  The canvas survives
//! across frames until an explicit clear.

use crate::landmark::Point;

// ════════════════════════════════════════════════════════════════════════════
// Palette
// ════════════════════════════════════════════════════════════════════════════

/// Named ink colors (packed 0xAARRGGBB).
pub mod palette {
    pub const GREEN:  u32 = 0xFF00FF00;
    pub const BLUE:   u32 = 0xFF0000FF;
    pub const RED:    u32 = 0xFFFF0000;
    pub const YELLOW: u32 = 0xFFFFFF00;
    pub const PURPLE: u32 = 0xFFFF00FF;
    pub const CYAN:   u32 = 0xFF00FFFF;
    pub const WHITE:  u32 = 0xFFFFFFFF;
    pub const BLACK:  u32 = 0xFF000000;

    pub const ALL: [(&str, u32); 8] = [
        ("green",  GREEN),
        ("blue",   BLUE),
        ("red",    RED),
        ("yellow", YELLOW),
        ("purple", PURPLE),
        ("cyan",   CYAN),
        ("white",  WHITE),
        ("black",  BLACK),
    ];
}

/// Alpha-blend two ARGB colors. `t` = 0.0 → all `a`, `t` = 1.0 → all `b`.
pub fn blend(a: u32, b: u32, t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |ca: u32, cb: u32| (ca as f32 * (1.0 - t) + cb as f32 * t) as u32;
    let ar = (a >> 16) & 0xFF; let br = (b >> 16) & 0xFF;
    let ag = (a >>  8) & 0xFF; let bg = (b >>  8) & 0xFF;
    let ab =  a        & 0xFF; let bb =  b        & 0xFF;
    0xFF000000 | (lerp(ar, br) << 16) | (lerp(ag, bg) << 8) | lerp(ab, bb)
}

// ════════════════════════════════════════════════════════════════════════════
// Canvas
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
pub struct Canvas {
    buf:    Vec<u32>,
    width:  u32,
    height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Canvas {
            buf: vec![0; (width * height) as usize],
            width,
            height,
        }
    }

    pub fn width(&self)  -> u32 { self.width }
    pub fn height(&self) -> u32 { self.height }

    pub fn pixel(&self, x: i32, y: i32) -> u32 {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return 0;
        }
        self.buf[(y as u32 * self.width + x as u32) as usize]
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        self.buf[(y as u32 * self.width + x as u32) as usize] = color;
    }

    /// Wipe all ink.
    pub fn clear(&mut self) {
        self.buf.fill(0);
    }

    pub fn is_blank(&self) -> bool {
        self.buf.iter().all(|p| *p == 0)
    }

    /// Number of inked pixels; handy for tests and stats.
    pub fn ink_count(&self) -> usize {
        self.buf.iter().filter(|p| **p != 0).count()
    }

    /// Stamp a filled disc.  `color` 0 erases.
    pub fn stamp_disc(&mut self, center: Point, radius: i32, color: u32) {
        let r = radius.max(0);
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= r * r {
                    self.set_pixel(center.0 + dx, center.1 + dy, color);
                }
            }
        }
    }

    /// Draw a thick line segment by stamping discs along it.
    pub fn draw_segment(&mut self, from: Point, to: Point, color: u32, thickness: u32) {
        let radius = (thickness as i32 / 2).max(1);
        let dx = to.0 - from.0;
        let dy = to.1 - from.1;
        let steps = dx.abs().max(dy.abs()).max(1);
        for i in 0..=steps {
            let x = from.0 + dx * i / steps;
            let y = from.1 + dy * i / steps;
            self.stamp_disc((x, y), radius, color);
        }
    }

    /// Composite the ink layer onto a video frame of the same dimensions.
    ///
    /// Where ink exists the video pixel is blended toward the ink color by
    /// `alpha`; `alpha` = 1.0 replaces the pixel outright.  Empty canvas
    /// pixels leave the video untouched.
    pub fn composite_onto(&self, video: &mut [u32], alpha: f32) {
        debug_assert_eq!(video.len(), self.buf.len());
        for (v, ink) in video.iter_mut().zip(self.buf.iter()) {
            if *ink != 0 {
                *v = blend(*v, *ink, alpha);
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
