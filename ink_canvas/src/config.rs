//! Tunable thresholds for the whole pipeline.
//!
//! Everything that was a magic number in early prototypes lives here, so a
//! single [`DrawConfig`] parameterizes the classifier, the stabilizer, and
//! the drawing state machine.  The struct deserializes from JSON with every
//! field optional, falling back to the defaults below.

use serde::{Deserialize, Serialize};

/// Configuration for the gesture/drawing pipeline.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawConfig {
    /// Maximum number of hands consumed per frame (≥ 1).
    pub max_hands:            usize,
    /// Detector-side confidence floor; hands below it are discarded.
    pub detection_confidence: f32,
    /// Detector-side tracking confidence floor.
    pub tracking_confidence:  f32,
    /// Gesture samples below this confidence dispatch as `Unknown`.
    pub confidence_floor:     f32,

    /// Thumb-tip to index-tip distance (px) under which index+thumb
    /// classifies as a pinch rather than a stop.
    pub pinch_distance_px:    f32,
    /// Minimum movement (px) between consecutive stroke points; smaller
    /// movements are ignored to suppress micro-jitter ink.
    pub min_movement_px:      f32,

    /// Position-smoothing history length (samples).
    pub smoothing_window:     usize,
    /// Gesture-vote history length (samples).
    pub vote_window:          usize,
    /// Samples required before the vote overrides the raw label.
    pub vote_minimum:         usize,

    /// Cooldown between honored canvas clears (ms).
    pub clear_cooldown_ms:    u64,
    /// Cooldown between honored color changes (ms).
    pub color_cooldown_ms:    u64,
    /// Cooldown between honored text edits (space/newline/backspace, ms).
    pub text_cooldown_ms:     u64,

    /// Brush thickness bounds (px); auto-adjusted within this range from
    /// the measured hand size.
    pub thickness_min:        u32,
    pub thickness_max:        u32,

    /// Canvas weight when compositing ink over live video (0.0–1.0;
    /// 1.0 means ink fully replaces the video pixel).
    pub canvas_alpha:         f32,
    /// Mirror frames horizontally so on-screen left/right matches the user.
    pub mirror:               bool,
}

impl Default for DrawConfig {
    fn default() -> Self {
        DrawConfig {
            max_hands:            1,
            detection_confidence: 0.7,
            tracking_confidence:  0.7,
            confidence_floor:     0.6,
            pinch_distance_px:    40.0,
            min_movement_px:      5.0,
            smoothing_window:     5,
            vote_window:          8,
            vote_minimum:         5,
            clear_cooldown_ms:    2000,
            color_cooldown_ms:    1000,
            text_cooldown_ms:     800,
            thickness_min:        2,
            thickness_max:        20,
            canvas_alpha:         0.3,
            mirror:               true,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
