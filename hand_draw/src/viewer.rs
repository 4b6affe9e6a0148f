//! Window, keyboard, and on-screen UI.
//!
//! The viewer owns the `minifb` window.  Each frame it polls input
//! (one-shot commands plus the held pose key for simulation mode) and
//! renders the composited video+ink buffer with a toggleable HUD: palette
//! swatches, mode and brush readouts, the text-log tail, and a key legend.

use anyhow::{anyhow, Result};
use minifb::{Key, KeyRepeat, MouseMode, Window, WindowOptions};

use ink_canvas::{palette, DrawingSession, Mode, Point};

use crate::detector::SimPose;

// ════════════════════════════════════════════════════════════════════════════
// Input
// ════════════════════════════════════════════════════════════════════════════

/// Everything the window reports for one frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct WindowInput {
    pub quit:      bool,
    pub save:      bool,
    pub toggle_ui: bool,
    /// Pose key currently held (simulation mode drives the detector with
    /// this); `None` = no hand.
    pub pose:      Option<SimPose>,
    /// Mouse position normalized to [0,1] — the simulated fingertip.
    pub cursor:    (f32, f32),
}

// ════════════════════════════════════════════════════════════════════════════
// Viewer
// ════════════════════════════════════════════════════════════════════════════

pub struct Viewer {
    window:  Window,
    buf:     Vec<u32>,
    width:   usize,
    height:  usize,
    show_ui: bool,
}

impl Viewer {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let mut window = Window::new(
            "Hand Draw — gesture ink on live video",
            width as usize,
            height as usize,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )
        .map_err(|e| anyhow!("opening window: {}", e))?;

        window.limit_update_rate(Some(std::time::Duration::from_millis(16))); // ~60fps

        Ok(Viewer {
            window,
            buf: vec![0; (width * height) as usize],
            width: width as usize,
            height: height as usize,
            show_ui: true,
        })
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    pub fn toggle_ui(&mut self) {
        self.show_ui = !self.show_ui;
    }

    /// Poll one frame of keyboard and mouse state.
    pub fn poll(&mut self) -> WindowInput {
        let mut input = WindowInput::default();

        if !self.window.is_open() {
            input.quit = true;
            return input;
        }

        let one_shot = |w: &Window, k: Key| w.is_key_pressed(k, KeyRepeat::No);

        if one_shot(&self.window, Key::Q) || one_shot(&self.window, Key::Escape) {
            input.quit = true;
        }
        if one_shot(&self.window, Key::S) {
            input.save = true;
        }
        if one_shot(&self.window, Key::U) {
            input.toggle_ui = true;
        }

        // Held pose keys, simulation mode.  First match wins.
        let poses = [
            (Key::D, SimPose::Draw),
            (Key::G, SimPose::Pinch),
            (Key::V, SimPose::Stop),
            (Key::E, SimPose::Erase),
            (Key::C, SimPose::ColorChange),
            (Key::X, SimPose::Clear),
            (Key::F, SimPose::Fist),
            (Key::O, SimPose::Open),
            (Key::T, SimPose::ThumbOnly),
            (Key::P, SimPose::PinkyOnly),
        ];
        for (key, pose) in poses {
            if self.window.is_key_down(key) {
                input.pose = Some(pose);
                break;
            }
        }

        if let Some((mx, my)) = self.window.get_mouse_pos(MouseMode::Clamp) {
            input.cursor = (
                (mx / self.width as f32).clamp(0.0, 1.0),
                (my / self.height as f32).clamp(0.0, 1.0),
            );
        }

        input
    }

    // ── rendering ─────────────────────────────────────────────────────────

    /// Present one composited frame.  `tip` is the active (smoothed)
    /// fingertip, highlighted while drawing or erasing.
    pub fn render(
        &mut self,
        composite: &[u32],
        session:   &DrawingSession,
        tip:       Option<Point>,
    ) {
        let n = self.buf.len().min(composite.len());
        self.buf[..n].copy_from_slice(&composite[..n]);

        if let (Some(p), true) = (tip, session.mode() != Mode::Idle) {
            let color = if session.mode() == Mode::Erasing {
                0xFFFFFFFF
            } else {
                session.color()
            };
            self.draw_ring(p, 10, color);
            self.draw_ring(p, 12, 0xFFFFFFFF);
        }

        if self.show_ui {
            self.draw_hud(session);
        }

        self.window
            .update_with_buffer(&self.buf, self.width, self.height)
            .ok();
    }

    fn draw_hud(&mut self, session: &DrawingSession) {
        // ── palette swatches ──────────────────────────────────────────────
        for (i, (_, color)) in palette::ALL.iter().enumerate() {
            let x = 12 + i * 34;
            self.fill_rect(x, 12, 28, 18, *color);
            if *color == session.color() {
                self.draw_border(x - 2, 10, 32, 22, 0xFFFFFFFF);
            }
        }

        // ── mode + brush ──────────────────────────────────────────────────
        let mode_text = match session.mode() {
            Mode::Idle    => "IDLE",
            Mode::Drawing => "DRAW",
            Mode::Erasing => "ERASE",
        };
        self.draw_label(mode_text, 12, self.height.saturating_sub(40), 0xFFFFFFFF);
        let brush = format!("TH: {}", session.thickness());
        self.draw_label(&brush, 60, self.height.saturating_sub(40), 0xFFAADDFF);

        // ── stats ─────────────────────────────────────────────────────────
        let stats = session.stats();
        let line = format!(
            "STROKES: {}  CHARS: {}",
            stats.strokes_drawn, stats.characters_written
        );
        self.draw_label(&line, self.width.saturating_sub(180), 12, 0xFFEEEEEE);

        // ── text-log tail ─────────────────────────────────────────────────
        let tail: String = session
            .text()
            .chars()
            .rev()
            .take(48)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .map(|c| if c == '\n' { '/' } else { c })
            .collect();
        let txt = format!("TXT: {}", tail);
        self.draw_label(&txt, 12, self.height.saturating_sub(28), 0xFFFFD700);

        // ── key legend ────────────────────────────────────────────────────
        self.draw_label(
            "D=DRAW G=PINCH V=STOP E=ERASE C=COLOR X=CLEAR F=FIST O=SPACE T=LINE P=BKSP  S=SAVE U=UI Q=QUIT",
            12,
            self.height.saturating_sub(14),
            0xFF888888,
        );
    }

    // ── primitive drawing helpers ─────────────────────────────────────────

    fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < self.width && y < self.height {
            self.buf[y * self.width + x] = color;
        }
    }

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y + h).min(self.height) {
            for col in x..(x + w).min(self.width) {
                self.buf[row * self.width + col] = color;
            }
        }
    }

    fn draw_border(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for col in x..(x + w).min(self.width) {
            self.set_pixel(col, y, color);
            self.set_pixel(col, y + h - 1, color);
        }
        for row in y..(y + h).min(self.height) {
            self.set_pixel(x, row, color);
            self.set_pixel(x + w - 1, row, color);
        }
    }

    fn draw_ring(&mut self, center: Point, radius: i32, color: u32) {
        let (cx, cy) = center;
        let r2_outer = radius * radius;
        let r2_inner = (radius - 2) * (radius - 2);
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                let d2 = dx * dx + dy * dy;
                if d2 <= r2_outer && d2 >= r2_inner {
                    let x = cx + dx;
                    let y = cy + dy;
                    if x >= 0 && y >= 0 {
                        self.set_pixel(x as usize, y as usize, color);
                    }
                }
            }
        }
    }

    /// Minimal bitmap font — 3×5 characters for HUD text.
    fn draw_label(&mut self, text: &str, x: usize, y: usize, color: u32) {
        let mut cx = x;
        for ch in text.chars() {
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) != 0 {
                        self.set_pixel(cx + col, y + row, color);
                    }
                }
            }
            cx += 4; // 3 wide + 1 gap
            if cx + 4 > self.width {
                break;
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' | 'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' | 'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' | 'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' | 'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' | 'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' | 'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' | 'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' | 'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' | 'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' | 'J' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' | 'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' | 'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' | 'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' | 'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' | 'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' | 'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' | 'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'r' | 'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' | 'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' | 'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' | 'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' | 'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'w' | 'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'x' | 'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' | 'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'z' | 'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '*' => [0b101, 0b010, 0b111, 0b010, 0b101],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000], // fallback dot
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legend_characters_all_have_glyphs() {
        let legend =
            "D=DRAW G=PINCH V=STOP E=ERASE C=COLOR X=CLEAR F=FIST O=SPACE T=LINE P=BKSP  S=SAVE U=UI Q=QUIT";
        let fallback = char_glyph('\u{1}');
        for ch in legend.chars().chain("0123456789 TXT:*/".chars()) {
            assert_ne!(char_glyph(ch), fallback, "missing glyph for {:?}", ch);
        }
    }

    #[test]
    fn glyphs_fit_three_columns() {
        for ch in "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789".chars() {
            for row in char_glyph(ch) {
                assert!(row <= 0b111);
            }
        }
    }
}
