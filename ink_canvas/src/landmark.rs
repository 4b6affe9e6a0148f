//! Landmark adapter — raw detector keypoints → named pixel positions.
//!
//! The external detector hands us 21 normalized 2-D keypoints per hand in
//! the MediaPipe ordering.  This module converts them to pixel coordinates
//! for a given frame size and computes the per-finger extension flags that
//! the classifier works from.

use std::fmt;

/// Number of keypoints the detector emits per hand.
pub const LANDMARK_COUNT: usize = 21;

/// A pixel coordinate on the video frame.
pub type Point = (i32, i32);

/// One raw keypoint in normalized [0,1] coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    /// Depth relative to the wrist; carried through but unused by the
    /// 2-D geometry here.
    pub z: f32,
}

// ════════════════════════════════════════════════════════════════════════════
// Finger — the fixed enumerated set
// ════════════════════════════════════════════════════════════════════════════

/// The five fingers, in the classifier's vector order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 5] = [
        Finger::Thumb,
        Finger::Index,
        Finger::Middle,
        Finger::Ring,
        Finger::Pinky,
    ];

    /// MediaPipe index of this finger's tip keypoint.
    pub fn tip_index(self) -> usize {
        match self {
            Finger::Thumb  => 4,
            Finger::Index  => 8,
            Finger::Middle => 12,
            Finger::Ring   => 16,
            Finger::Pinky  => 20,
        }
    }

    /// MediaPipe index of the joint the tip is compared against.
    pub fn base_index(self) -> usize {
        match self {
            Finger::Thumb  => 3,
            Finger::Index  => 6,
            Finger::Middle => 10,
            Finger::Ring   => 14,
            Finger::Pinky  => 18,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LandmarkError
// ════════════════════════════════════════════════════════════════════════════

/// The detector produced a keypoint set of the wrong shape.  The offending
/// hand is skipped for the frame; the run loop carries on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LandmarkError {
    pub got: usize,
}

impl fmt::Display for LandmarkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected {} landmarks, got {}", LANDMARK_COUNT, self.got)
    }
}

impl std::error::Error for LandmarkError {}

// ════════════════════════════════════════════════════════════════════════════
// HandFrame — named pixel positions for one hand in one frame
// ════════════════════════════════════════════════════════════════════════════

/// Tip/base pixel positions and the extension flag for one finger.
#[derive(Clone, Copy, Debug)]
pub struct FingerPose {
    pub tip:      Point,
    pub base:     Point,
    pub extended: bool,
}

/// All named positions for one detected hand, produced fresh each frame.
#[derive(Clone, Debug)]
pub struct HandFrame {
    pub wrist: Point,
    fingers:   [FingerPose; 5],
}

impl HandFrame {
    /// Convert one hand's raw keypoints to pixel space.
    ///
    /// Extension tests: the four fingers are extended when the tip sits
    /// above the base in image space (y grows downward); the thumb when the
    /// tip sits to the right of its base.  The horizontal thumb test
    /// assumes a mirrored camera feed with the palm facing it — a known
    /// limitation inherited from the geometry, not something this layer
    /// tries to correct.
    pub fn from_landmarks(
        landmarks: &[Landmark],
        width:     u32,
        height:    u32,
    ) -> Result<Self, LandmarkError> {
        if landmarks.len() != LANDMARK_COUNT {
            return Err(LandmarkError { got: landmarks.len() });
        }

        let to_px = |lm: &Landmark| -> Point {
            (
                (lm.x * width as f32).round() as i32,
                (lm.y * height as f32).round() as i32,
            )
        };

        let fingers = Finger::ALL.map(|f| {
            let tip  = to_px(&landmarks[f.tip_index()]);
            let base = to_px(&landmarks[f.base_index()]);
            let extended = match f {
                Finger::Thumb => tip.0 > base.0,
                _             => tip.1 < base.1,
            };
            FingerPose { tip, base, extended }
        });

        Ok(HandFrame {
            wrist: to_px(&landmarks[0]),
            fingers,
        })
    }

    pub fn finger(&self, f: Finger) -> &FingerPose {
        &self.fingers[f as usize]
    }

    /// Extension flags in `[thumb, index, middle, ring, pinky]` order.
    pub fn extended(&self) -> [bool; 5] {
        Finger::ALL.map(|f| self.finger(f).extended)
    }

    pub fn extended_count(&self) -> usize {
        self.extended().iter().filter(|e| **e).count()
    }

    /// The index fingertip — the drawing point.
    pub fn index_tip(&self) -> Point {
        self.finger(Finger::Index).tip
    }

    /// Wrist to middle-tip distance (px) — the hand-size proxy used for
    /// brush-thickness auto-adjustment.
    pub fn hand_span(&self) -> f32 {
        distance(self.wrist, self.finger(Finger::Middle).tip)
    }
}

/// Euclidean distance between two pixel points.
pub fn distance(a: Point, b: Point) -> f32 {
    let dx = (a.0 - b.0) as f32;
    let dy = (a.1 - b.1) as f32;
    (dx * dx + dy * dy).sqrt()
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
