//! The drawing state machine.
//!
//! [`DrawingSession`] owns the canvas, the stroke history, the text log,
//! and the session stats, and is the only code that mutates them.  It
//! consumes one stabilized gesture per frame (or `None` when no hand was
//! detected) and performs the corresponding canvas mutation.
//!
//! Canvas, text log, and stats form one consistency group: a clear resets
//! all of them in a single call, so no frame ever observes a mix of reset
//! and non-reset state.

use std::time::Instant;

use crate::canvas::{palette, Canvas};
use crate::config::DrawConfig;
use crate::gesture::GestureLabel;
use crate::landmark::{distance, Point};
use crate::stabilize::{CommandClass, CooldownGate};

// ════════════════════════════════════════════════════════════════════════════
// Mode / Stroke / Stats
// ════════════════════════════════════════════════════════════════════════════

/// What the session is doing right now.  Erasing is the variant of drawing
/// that removes ink instead of adding it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Idle,
    Drawing,
    Erasing,
}

/// One continuous ink path, closed when drawing ends.
#[derive(Clone, Debug)]
pub struct Stroke {
    pub points: Vec<Point>,
    pub color:  u32,
}

/// Passive counters, mutated only by the state machine.
#[derive(Clone, Copy, Debug)]
pub struct SessionStats {
    pub strokes_drawn:      u32,
    pub characters_written: u32,
    pub session_start:      Instant,
}

impl SessionStats {
    pub fn new(now: Instant) -> Self {
        SessionStats {
            strokes_drawn:      0,
            characters_written: 0,
            session_start:      now,
        }
    }
}

/// Per-frame input to the state machine: the debounced label, the raw
/// sample's confidence, the smoothed drawing point, and the hand-size
/// proxy for brush auto-sizing.
#[derive(Clone, Copy, Debug)]
pub struct GestureInput {
    pub label:      GestureLabel,
    pub confidence: f32,
    pub point:      Point,
    pub hand_span:  f32,
}

// ════════════════════════════════════════════════════════════════════════════
// DrawingSession
// ════════════════════════════════════════════════════════════════════════════

pub struct DrawingSession {
    canvas:    Canvas,
    strokes:   Vec<Stroke>,
    current:   Vec<Point>,
    prev:      Option<Point>,
    mode:      Mode,
    color:     u32,
    thickness: u32,
    text:      String,
    stats:     SessionStats,
    cooldown:  CooldownGate,
    cfg:       DrawConfig,
}

impl DrawingSession {
    pub fn new(width: u32, height: u32, cfg: DrawConfig, now: Instant) -> Self {
        DrawingSession {
            canvas:    Canvas::new(width, height),
            strokes:   Vec::new(),
            current:   Vec::new(),
            prev:      None,
            mode:      Mode::Idle,
            color:     palette::GREEN,
            thickness: 5,
            text:      String::new(),
            stats:     SessionStats::new(now),
            cooldown:  CooldownGate::from_config(&cfg),
            cfg,
        }
    }

    // ── per-frame entry point ─────────────────────────────────────────────

    /// Consume one frame's stabilized gesture.  `None` means no hand was
    /// detected: the current stroke (if it qualifies) is closed and prior-
    /// point tracking is cleared, so re-acquiring the hand later never
    /// draws a connecting segment.
    pub fn apply(&mut self, input: Option<GestureInput>, now: Instant) {
        let Some(input) = input else {
            self.close_stroke();
            self.mode = Mode::Idle;
            return;
        };

        self.adjust_thickness(input.hand_span);

        // Low-confidence samples must not mutate the canvas.
        let label = if input.confidence < self.cfg.confidence_floor {
            GestureLabel::Unknown
        } else {
            input.label
        };

        match label {
            GestureLabel::Draw | GestureLabel::PinchDraw => self.ink(input.point),
            GestureLabel::Erase                          => self.erase(input.point),

            GestureLabel::Fist | GestureLabel::Stop | GestureLabel::Unknown => {
                self.close_stroke();
                self.mode = Mode::Idle;
            }

            GestureLabel::ColorChange => {
                if self.cooldown.try_fire(CommandClass::Color, now) {
                    self.color = color_for_x(input.point.0, self.canvas.width());
                    log::debug!("color changed at x = {}", input.point.0);
                }
                self.close_stroke();
                self.mode = Mode::Idle;
            }

            GestureLabel::ClearCanvas => {
                if self.cooldown.try_fire(CommandClass::Clear, now) {
                    self.clear_all(now);
                    log::info!("canvas cleared");
                }
                self.mode = Mode::Idle;
            }

            GestureLabel::Open      => self.text_edit(TextEdit::Space, now),
            GestureLabel::ThumbOnly => self.text_edit(TextEdit::Newline, now),
            GestureLabel::PinkyOnly => self.text_edit(TextEdit::Backspace, now),
        }
    }

    // ── drawing ───────────────────────────────────────────────────────────

    fn ink(&mut self, point: Point) {
        if self.mode != Mode::Drawing {
            // Entering a draw: the point seeds a fresh stroke.
            self.close_stroke();
            self.mode = Mode::Drawing;
            self.current.push(point);
            self.prev = Some(point);
            return;
        }

        let prev = match self.prev {
            Some(p) => p,
            None => {
                self.current.push(point);
                self.prev = Some(point);
                return;
            }
        };

        // Micro-jitter below the movement threshold produces no ink.
        if distance(point, prev) < self.cfg.min_movement_px {
            return;
        }

        self.current.push(point);
        self.canvas.draw_segment(prev, point, self.color, self.thickness);
        self.prev = Some(point);
    }

    fn erase(&mut self, point: Point) {
        // An open stroke does not span an erase pass.
        self.close_stroke();
        self.mode = Mode::Erasing;
        let radius = (self.thickness * 2) as i32;
        self.canvas.stamp_disc(point, radius, 0);
        self.prev = Some(point);
    }

    /// Close the in-progress stroke.  Strokes of more than two points are
    /// kept and counted; degenerate taps are discarded.
    fn close_stroke(&mut self) {
        if self.current.len() > 2 {
            let points = std::mem::take(&mut self.current);
            self.strokes.push(Stroke { points, color: self.color });
            self.stats.strokes_drawn += 1;
            self.stats.characters_written += 1;
            self.text.push('*');
        } else {
            self.current.clear();
        }
        self.prev = None;
    }

    // ── commands ──────────────────────────────────────────────────────────

    fn text_edit(&mut self, edit: TextEdit, now: Instant) {
        if self.cooldown.try_fire(CommandClass::TextEdit, now) {
            match edit {
                TextEdit::Space     => self.text.push(' '),
                TextEdit::Newline   => self.text.push('\n'),
                TextEdit::Backspace => {
                    self.text.pop();
                }
            }
        }
        self.close_stroke();
        self.mode = Mode::Idle;
    }

    /// Reset canvas, stroke history, text log, and stats together.
    fn clear_all(&mut self, now: Instant) {
        self.canvas.clear();
        self.strokes.clear();
        self.current.clear();
        self.prev = None;
        self.text.clear();
        self.stats = SessionStats::new(now);
    }

    fn adjust_thickness(&mut self, hand_span: f32) {
        if hand_span <= 0.0 {
            return;
        }
        let t = (hand_span / 10.0) as u32;
        self.thickness = t.clamp(self.cfg.thickness_min, self.cfg.thickness_max);
    }

    // ── accessors for the render loop ─────────────────────────────────────

    pub fn canvas(&self)    -> &Canvas       { &self.canvas }
    pub fn mode(&self)      -> Mode          { self.mode }
    pub fn color(&self)     -> u32           { self.color }
    pub fn thickness(&self) -> u32           { self.thickness }
    pub fn text(&self)      -> &str          { &self.text }
    pub fn stats(&self)     -> &SessionStats { &self.stats }
    pub fn strokes(&self)   -> &[Stroke]     { &self.strokes }
}

#[derive(Clone, Copy, Debug)]
enum TextEdit {
    Space,
    Newline,
    Backspace,
}

/// Map a horizontal screen position to a palette color: the frame is split
/// into four vertical bands, left to right red / green / blue / yellow.
fn color_for_x(x: i32, width: u32) -> u32 {
    let q = (width / 4) as i32;
    if x < q {
        palette::RED
    } else if x < 2 * q {
        palette::GREEN
    } else if x < 3 * q {
        palette::BLUE
    } else {
        palette::YELLOW
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const W: u32 = 640;
    const H: u32 = 480;

    fn session() -> DrawingSession {
        DrawingSession::new(W, H, DrawConfig::default(), Instant::now())
    }

    fn input(label: GestureLabel, point: Point) -> Option<GestureInput> {
        Some(GestureInput {
            label,
            confidence: 0.9,
            point,
            hand_span: 0.0,
        })
    }

    // ── stroke lifecycle ──────────────────────────────────────────────────

    #[test]
    fn draw_sequence_inks_canvas_and_records_stroke() {
        let mut s = session();
        let t = Instant::now();
        for p in [(0, 0), (50, 0), (100, 0)] {
            s.apply(input(GestureLabel::Draw, p), t);
        }
        assert_eq!(s.mode(), Mode::Drawing);
        assert!(s.canvas().ink_count() > 0);
        assert_eq!(s.canvas().pixel(50, 0), palette::GREEN);

        s.apply(input(GestureLabel::Fist, (100, 0)), t);
        assert_eq!(s.mode(), Mode::Idle);
        assert_eq!(s.strokes().len(), 1);
        assert_eq!(s.strokes()[0].points.len(), 3);
        assert_eq!(s.stats().strokes_drawn, 1);
        assert_eq!(s.stats().characters_written, 1);
        assert_eq!(s.text(), "*");
    }

    #[test]
    fn two_point_stroke_is_discarded() {
        let mut s = session();
        let t = Instant::now();
        s.apply(input(GestureLabel::Draw, (0, 0)), t);
        s.apply(input(GestureLabel::Draw, (50, 0)), t);
        s.apply(input(GestureLabel::Fist, (50, 0)), t);
        assert!(s.strokes().is_empty());
        assert_eq!(s.stats().strokes_drawn, 0);
        assert_eq!(s.text(), "");
    }

    #[test]
    fn micro_jitter_adds_no_points() {
        let mut s = session();
        let t = Instant::now();
        s.apply(input(GestureLabel::Draw, (100, 100)), t);
        for _ in 0..10 {
            s.apply(input(GestureLabel::Draw, (102, 101)), t);
        }
        s.apply(input(GestureLabel::Draw, (102, 101)), t);
        // Only the seed point: every movement was under the threshold.
        s.apply(input(GestureLabel::Stop, (102, 101)), t);
        assert!(s.strokes().is_empty());
    }

    #[test]
    fn pinch_draw_behaves_like_draw() {
        let mut s = session();
        let t = Instant::now();
        for p in [(0, 0), (20, 0), (40, 0), (60, 0)] {
            s.apply(input(GestureLabel::PinchDraw, p), t);
        }
        s.apply(input(GestureLabel::Stop, (60, 0)), t);
        assert_eq!(s.strokes().len(), 1);
    }

    #[test]
    fn hand_loss_closes_stroke_and_prevents_connecting_line() {
        let mut s = session();
        let t = Instant::now();
        for p in [(0, 10), (50, 10), (100, 10)] {
            s.apply(input(GestureLabel::Draw, p), t);
        }
        s.apply(None, t);
        assert_eq!(s.mode(), Mode::Idle);
        assert_eq!(s.strokes().len(), 1);

        let before = s.canvas().ink_count();
        // Re-acquire far away: seeding a new stroke must not draw a segment.
        s.apply(input(GestureLabel::Draw, (600, 400)), t);
        assert_eq!(s.canvas().ink_count(), before);
    }

    // ── erase ─────────────────────────────────────────────────────────────

    #[test]
    fn erase_removes_ink_without_stroke() {
        let mut s = session();
        let t = Instant::now();
        for p in [(0, 50), (50, 50), (100, 50)] {
            s.apply(input(GestureLabel::Draw, p), t);
        }
        assert_ne!(s.canvas().pixel(50, 50), 0);

        s.apply(input(GestureLabel::Erase, (50, 50)), t);
        assert_eq!(s.mode(), Mode::Erasing);
        assert_eq!(s.canvas().pixel(50, 50), 0);
        // The draw stroke was closed when erasing began; erasing added none.
        assert_eq!(s.strokes().len(), 1);
    }

    // ── color change ──────────────────────────────────────────────────────

    #[test]
    fn color_change_maps_screen_quarters() {
        let t0 = Instant::now();
        let mut s = session();
        s.apply(input(GestureLabel::ColorChange, (10, 0)), t0);
        assert_eq!(s.color(), palette::RED);
        // Second change inside the 1 s cooldown is dropped
        s.apply(
            input(GestureLabel::ColorChange, (W as i32 - 10, 0)),
            t0 + Duration::from_millis(200),
        );
        assert_eq!(s.color(), palette::RED);
        // After the cooldown it lands
        s.apply(
            input(GestureLabel::ColorChange, (W as i32 - 10, 0)),
            t0 + Duration::from_millis(1200),
        );
        assert_eq!(s.color(), palette::YELLOW);
    }

    #[test]
    fn color_bands() {
        assert_eq!(color_for_x(0, 400), palette::RED);
        assert_eq!(color_for_x(150, 400), palette::GREEN);
        assert_eq!(color_for_x(250, 400), palette::BLUE);
        assert_eq!(color_for_x(399, 400), palette::YELLOW);
    }

    // ── clear ─────────────────────────────────────────────────────────────

    #[test]
    fn clear_resets_consistency_group_atomically() {
        let t0 = Instant::now();
        let mut s = session();
        for p in [(0, 0), (50, 0), (100, 0)] {
            s.apply(input(GestureLabel::Draw, p), t0);
        }
        s.apply(input(GestureLabel::Fist, (100, 0)), t0);
        s.apply(input(GestureLabel::Open, (0, 0)), t0);
        assert!(!s.canvas().is_blank());
        assert!(!s.text().is_empty());

        s.apply(input(GestureLabel::ClearCanvas, (0, 0)), t0 + Duration::from_secs(3));
        assert!(s.canvas().is_blank());
        assert!(s.strokes().is_empty());
        assert!(s.text().is_empty());
        assert_eq!(s.stats().strokes_drawn, 0);
        assert_eq!(s.stats().characters_written, 0);
    }

    #[test]
    fn held_clear_fires_exactly_once() {
        let t0 = Instant::now();
        // Construct with a distinct start instant so resets are observable.
        let mut s = DrawingSession::new(
            W, H,
            DrawConfig::default(),
            t0 - Duration::from_secs(10),
        );
        s.apply(input(GestureLabel::Draw, (0, 0)), t0);
        s.apply(input(GestureLabel::Draw, (50, 0)), t0);
        s.apply(input(GestureLabel::Draw, (100, 0)), t0);
        s.apply(input(GestureLabel::Fist, (100, 0)), t0);
        let start_before = s.stats().session_start;

        // Clear pose held for two seconds of frames (30 fps)
        let mut resets = 0;
        let mut last_start = start_before;
        for i in 0..60 {
            let t = t0 + Duration::from_millis(33 * i);
            s.apply(input(GestureLabel::ClearCanvas, (0, 0)), t);
            if s.stats().session_start != last_start {
                resets += 1;
                last_start = s.stats().session_start;
            }
        }
        assert_eq!(resets, 1);
        assert!(s.canvas().is_blank());
    }

    // ── text log ──────────────────────────────────────────────────────────

    #[test]
    fn text_edits_respect_cooldown() {
        let t0 = Instant::now();
        let mut s = session();
        s.apply(input(GestureLabel::Open, (0, 0)), t0);
        assert_eq!(s.text(), " ");
        // Within the 0.8 s text cooldown — dropped silently
        s.apply(input(GestureLabel::ThumbOnly, (0, 0)), t0 + Duration::from_millis(100));
        assert_eq!(s.text(), " ");
        // Past it — honored
        s.apply(input(GestureLabel::ThumbOnly, (0, 0)), t0 + Duration::from_millis(900));
        assert_eq!(s.text(), " \n");
        s.apply(input(GestureLabel::PinkyOnly, (0, 0)), t0 + Duration::from_millis(1800));
        assert_eq!(s.text(), " ");
    }

    #[test]
    fn backspace_on_empty_log_is_harmless() {
        let mut s = session();
        s.apply(input(GestureLabel::PinkyOnly, (0, 0)), Instant::now());
        assert_eq!(s.text(), "");
    }

    // ── confidence gate ───────────────────────────────────────────────────

    #[test]
    fn low_confidence_never_mutates_canvas() {
        let mut s = session();
        let t = Instant::now();
        for p in [(0, 0), (50, 0), (100, 0)] {
            s.apply(
                Some(GestureInput {
                    label:      GestureLabel::Draw,
                    confidence: 0.4,
                    point:      p,
                    hand_span:  0.0,
                }),
                t,
            );
        }
        assert!(s.canvas().is_blank());
        assert_eq!(s.mode(), Mode::Idle);
    }

    // ── thickness ─────────────────────────────────────────────────────────

    #[test]
    fn thickness_tracks_hand_span_within_bounds() {
        let mut s = session();
        let t = Instant::now();
        let mut inp = input(GestureLabel::Stop, (0, 0)).unwrap();
        inp.hand_span = 80.0;
        s.apply(Some(inp), t);
        assert_eq!(s.thickness(), 8);
        inp.hand_span = 1000.0;
        s.apply(Some(inp), t);
        assert_eq!(s.thickness(), DrawConfig::default().thickness_max);
        inp.hand_span = 5.0;
        s.apply(Some(inp), t);
        assert_eq!(s.thickness(), DrawConfig::default().thickness_min);
    }
}
