//! Temporal stabilization — turning noisy per-frame signals into a usable
//! control stream.
//!
//! Three independent concerns live here:
//!
//! * [`PointSmoother`] — weighted moving average over recent fingertip
//!   positions, so ink follows the hand instead of the detector jitter.
//! * [`GestureVote`] — majority vote over recent labels, so one misread
//!   frame can't flip the drawing mode.
//! * [`CooldownGate`] — minimum interval between honored one-shot commands,
//!   so holding a clear pose for a second doesn't wipe the canvas sixty
//!   times.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::config::DrawConfig;
use crate::gesture::GestureLabel;
use crate::landmark::Point;

// ════════════════════════════════════════════════════════════════════════════
// PointSmoother
// ════════════════════════════════════════════════════════════════════════════

/// Bounded FIFO of raw tip positions with a linearly-weighted average.
///
/// With fewer than three samples the raw point passes through unchanged;
/// after that the newest sample carries the most weight (weights ramp
/// 0.1 → 1.0 and are normalized to sum 1).
#[derive(Debug)]
pub struct PointSmoother {
    history: VecDeque<Point>,
    cap:     usize,
}

impl PointSmoother {
    pub fn new(cap: usize) -> Self {
        PointSmoother {
            history: VecDeque::with_capacity(cap),
            cap:     cap.max(1),
        }
    }

    /// Record a raw point and return the smoothed one.
    pub fn push(&mut self, raw: Point) -> Point {
        if self.history.len() == self.cap {
            self.history.pop_front();
        }
        self.history.push_back(raw);

        let n = self.history.len();
        if n < 3 {
            return raw;
        }

        let mut wsum = 0.0f32;
        let mut x = 0.0f32;
        let mut y = 0.0f32;
        for (i, p) in self.history.iter().enumerate() {
            // n >= 3 here, so the ramp denominator is never zero.
            let w = 0.1 + 0.9 * i as f32 / (n - 1) as f32;
            wsum += w;
            x += p.0 as f32 * w;
            y += p.1 as f32 * w;
        }
        ((x / wsum) as i32, (y / wsum) as i32)
    }

    /// Drop all history, e.g. after losing hand detection.
    pub fn reset(&mut self) {
        self.history.clear();
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// GestureVote
// ════════════════════════════════════════════════════════════════════════════

/// Bounded FIFO of raw labels with majority-vote debouncing.
///
/// Below `minimum` samples the instantaneous label passes through.  Ties
/// are broken by the most recent occurrence in the window, which keeps the
/// output from flickering between equally-frequent labels.
#[derive(Debug)]
pub struct GestureVote {
    window:  VecDeque<GestureLabel>,
    cap:     usize,
    minimum: usize,
}

impl GestureVote {
    pub fn new(cap: usize, minimum: usize) -> Self {
        GestureVote {
            window:  VecDeque::with_capacity(cap),
            cap:     cap.max(1),
            minimum: minimum.max(1),
        }
    }

    /// Record a raw label and return the debounced one.
    pub fn push(&mut self, label: GestureLabel) -> GestureLabel {
        if self.window.len() == self.cap {
            self.window.pop_front();
        }
        self.window.push_back(label);

        if self.window.len() < self.minimum {
            return label;
        }

        // (count, last occurrence index) — max by count, most recent wins ties.
        let mut best = label;
        let mut best_key = (0usize, 0usize);
        let mut seen: Vec<GestureLabel> = Vec::with_capacity(self.window.len());
        for candidate in self.window.iter() {
            if seen.contains(candidate) {
                continue;
            }
            seen.push(*candidate);
            let count = self.window.iter().filter(|l| *l == candidate).count();
            let last = self
                .window
                .iter()
                .rposition(|l| l == candidate)
                .unwrap_or(0);
            if (count, last) > best_key {
                best_key = (count, last);
                best = *candidate;
            }
        }
        best
    }

    pub fn reset(&mut self) {
        self.window.clear();
    }

    pub fn len(&self) -> usize {
        self.window.len()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// CooldownGate
// ════════════════════════════════════════════════════════════════════════════

/// Classes of one-shot commands with independent cooldown policies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandClass {
    /// Canvas wipe — longest cooldown, it destroys the most.
    Clear,
    /// Color selection.
    Color,
    /// Text-log edits: space, newline, backspace.
    TextEdit,
}

/// Tracks when each command class last fired and silently drops repeats
/// arriving within the class cooldown.
#[derive(Debug)]
pub struct CooldownGate {
    cooldowns: [Duration; 3],
    last:      [Option<Instant>; 3],
}

impl CooldownGate {
    pub fn from_config(cfg: &DrawConfig) -> Self {
        CooldownGate {
            cooldowns: [
                Duration::from_millis(cfg.clear_cooldown_ms),
                Duration::from_millis(cfg.color_cooldown_ms),
                Duration::from_millis(cfg.text_cooldown_ms),
            ],
            last: [None; 3],
        }
    }

    /// Returns true (and arms the cooldown) if the command is honored.
    /// `now` is a parameter so callers and tests control time.
    pub fn try_fire(&mut self, class: CommandClass, now: Instant) -> bool {
        let i = class as usize;
        let ok = match self.last[i] {
            None       => true,
            Some(prev) => now.duration_since(prev) >= self.cooldowns[i],
        };
        if ok {
            self.last[i] = Some(now);
        }
        ok
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
