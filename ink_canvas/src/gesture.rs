//! Gesture classification from finger geometry.
//!
//! [`classify`] is a pure function: one [`HandFrame`] in, one
//! [`GestureSample`] out.  Classification is an ordered rule set — exact
//! extension-vector matches first, count-based fallbacks after, first match
//! wins — so every possible 5-bit extension vector combined with any pinch
//! distance maps to exactly one label.

use crate::config::DrawConfig;
use crate::landmark::{distance, Finger, HandFrame};

// ════════════════════════════════════════════════════════════════════════════
// GestureLabel
// ════════════════════════════════════════════════════════════════════════════

/// The closed set of poses the classifier can produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GestureLabel {
    /// Index finger alone — draw ink at the fingertip.
    Draw,
    /// Index + thumb close together — precision draw.
    PinchDraw,
    /// Index + middle (the V sign) — erase.
    Erase,
    /// Index + middle + ring — pick a color by screen region.
    ColorChange,
    /// All five fingers — wipe the canvas (cooldown-gated).
    ClearCanvas,
    /// No fingers — stop drawing.
    Fist,
    /// Four-or-more fallback — append a space to the text log.
    Open,
    /// Thumb alone — newline.
    ThumbOnly,
    /// Pinky alone — backspace.
    PinkyOnly,
    /// Index + thumb apart — stop drawing.
    Stop,
    /// Anything else.
    Unknown,
}

impl GestureLabel {
    pub fn name(self) -> &'static str {
        match self {
            GestureLabel::Draw        => "draw",
            GestureLabel::PinchDraw   => "pinch draw",
            GestureLabel::Erase       => "erase",
            GestureLabel::ColorChange => "color change",
            GestureLabel::ClearCanvas => "clear canvas",
            GestureLabel::Fist        => "fist",
            GestureLabel::Open        => "open",
            GestureLabel::ThumbOnly   => "thumb",
            GestureLabel::PinkyOnly   => "pinky",
            GestureLabel::Stop        => "stop",
            GestureLabel::Unknown     => "unknown",
        }
    }
}

/// One classified pose with its confidence, ephemeral per hand per frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureSample {
    pub label:      GestureLabel,
    pub confidence: f32,
}

impl GestureSample {
    fn new(label: GestureLabel, confidence: f32) -> Self {
        GestureSample { label, confidence }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// classify
// ════════════════════════════════════════════════════════════════════════════

/// Classify one hand pose.  Pure and deterministic; no shared state.
pub fn classify(hand: &HandFrame, cfg: &DrawConfig) -> GestureSample {
    use GestureLabel::*;

    let ext = hand.extended();
    let count = ext.iter().filter(|e| **e).count();

    // [thumb, index, middle, ring, pinky]
    match ext {
        [false, true, false, false, false] => GestureSample::new(Draw, 0.9),

        [true, true, false, false, false] => {
            let thumb_tip = hand.finger(Finger::Thumb).tip;
            let index_tip = hand.finger(Finger::Index).tip;
            if distance(thumb_tip, index_tip) < cfg.pinch_distance_px {
                GestureSample::new(PinchDraw, 0.85)
            } else {
                GestureSample::new(Stop, 0.8)
            }
        }

        [false, true, true, false, false] => GestureSample::new(Erase, 0.85),
        [false, true, true, true, false]  => GestureSample::new(ColorChange, 0.8),
        [true, true, true, true, true]    => GestureSample::new(ClearCanvas, 0.9),
        [false, false, false, false, false] => GestureSample::new(Fist, 0.9),
        [true, false, false, false, false]  => GestureSample::new(ThumbOnly, 0.8),
        [false, false, false, false, true]  => GestureSample::new(PinkyOnly, 0.7),

        _ if count >= 4 => GestureSample::new(Open, 0.7),
        _               => GestureSample::new(Unknown, 0.3),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmark::{Landmark, LANDMARK_COUNT};

    /// Build a hand with the given extension vector.  Extended fingers get
    /// their tip 0.2 above the base (0.06 right of it for the thumb);
    /// curled fingers the opposite.  Tips are spread horizontally so pinch
    /// distance is large unless `pinch` pulls thumb and index together.
    fn hand_with(ext: [bool; 5], pinch: bool) -> HandFrame {
        let mut lm = vec![Landmark { x: 0.5, y: 0.8, z: 0.0 }; LANDMARK_COUNT];
        for (i, f) in Finger::ALL.iter().enumerate() {
            let bx = 0.2 + i as f32 * 0.15;
            let by = 0.5;
            lm[f.base_index()] = Landmark { x: bx, y: by, z: 0.0 };
            lm[f.tip_index()] = if *f == Finger::Thumb {
                let dx = if ext[i] { 0.06 } else { -0.03 };
                Landmark { x: bx + dx, y: by, z: 0.0 }
            } else {
                let dy = if ext[i] { -0.2 } else { 0.05 };
                Landmark { x: bx, y: by + dy, z: 0.0 }
            };
        }
        if pinch {
            // Thumb tip right next to the index tip, still right of its base.
            let it = lm[Finger::Index.tip_index()];
            lm[Finger::Thumb.base_index()] = Landmark { x: it.x - 0.2, y: it.y, z: 0.0 };
            lm[Finger::Thumb.tip_index()]  = Landmark { x: it.x - 0.01, y: it.y, z: 0.0 };
        }
        HandFrame::from_landmarks(&lm, 640, 480).unwrap()
    }

    fn label_of(ext: [bool; 5], pinch: bool) -> GestureLabel {
        classify(&hand_with(ext, pinch), &DrawConfig::default()).label
    }

    #[test]
    fn index_alone_is_draw() {
        assert_eq!(label_of([false, true, false, false, false], false), GestureLabel::Draw);
    }

    #[test]
    fn index_thumb_close_is_pinch() {
        assert_eq!(label_of([true, true, false, false, false], true), GestureLabel::PinchDraw);
    }

    #[test]
    fn index_thumb_apart_is_stop() {
        assert_eq!(label_of([true, true, false, false, false], false), GestureLabel::Stop);
    }

    #[test]
    fn v_sign_is_erase() {
        assert_eq!(label_of([false, true, true, false, false], false), GestureLabel::Erase);
    }

    #[test]
    fn three_fingers_is_color_change() {
        assert_eq!(label_of([false, true, true, true, false], false), GestureLabel::ColorChange);
    }

    #[test]
    fn five_fingers_is_clear() {
        assert_eq!(label_of([true, true, true, true, true], false), GestureLabel::ClearCanvas);
    }

    #[test]
    fn no_fingers_is_fist() {
        assert_eq!(label_of([false; 5], false), GestureLabel::Fist);
    }

    #[test]
    fn four_fingers_falls_back_to_open() {
        assert_eq!(label_of([false, true, true, true, true], false), GestureLabel::Open);
        assert_eq!(label_of([true, true, true, true, false], false), GestureLabel::Open);
    }

    #[test]
    fn single_thumb_and_pinky() {
        assert_eq!(label_of([true, false, false, false, false], false), GestureLabel::ThumbOnly);
        assert_eq!(label_of([false, false, false, false, true], false), GestureLabel::PinkyOnly);
    }

    #[test]
    fn odd_combos_are_unknown() {
        assert_eq!(label_of([false, false, true, false, false], false), GestureLabel::Unknown);
        assert_eq!(label_of([true, false, true, false, true], false), GestureLabel::Unknown);
    }

    #[test]
    fn every_vector_maps_to_exactly_one_label() {
        let cfg = DrawConfig::default();
        for bits in 0u8..32 {
            let ext = [
                bits & 1 != 0,
                bits & 2 != 0,
                bits & 4 != 0,
                bits & 8 != 0,
                bits & 16 != 0,
            ];
            for pinch in [false, true] {
                let a = classify(&hand_with(ext, pinch), &cfg);
                let b = classify(&hand_with(ext, pinch), &cfg);
                // Total and deterministic
                assert_eq!(a, b);
                assert!(a.confidence > 0.0 && a.confidence <= 1.0);
            }
        }
    }

    #[test]
    fn pinch_threshold_is_configurable() {
        let mut cfg = DrawConfig::default();
        cfg.pinch_distance_px = 0.5;
        // Even the close pose is now beyond the pinch radius
        let hand = hand_with([true, true, false, false, false], true);
        assert_eq!(classify(&hand, &cfg).label, GestureLabel::Stop);
    }
}
