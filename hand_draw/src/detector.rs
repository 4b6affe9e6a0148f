//! Hand landmark detection boundary.
//!
//! The pipeline only ever sees [`RawHand`] values: 21 normalized keypoints
//! plus a score.  Where they come from is a backend concern:
//!
//! * [`PoseSynth`] (default build) — synthesizes a hand from the window's
//!   mouse position and a held pose key, so the real adapter and
//!   classifier run end-to-end with no camera or model installed.
//! * `MediapipeDetector` (feature = `camera`) — drives the MediaPipe hand
//!   landmarker through a Python subprocess: raw frames go down stdin,
//!   JSON lines come back.  The helper script ships with this crate as
//!   `mediapipe_hands.py`.

use anyhow::Result;
use serde::Deserialize;

use ink_canvas::landmark::{Finger, Landmark, LANDMARK_COUNT};

use crate::capture::Frame;

// ════════════════════════════════════════════════════════════════════════════
// RawHand
// ════════════════════════════════════════════════════════════════════════════

/// One detected hand, straight off the detector.
#[derive(Clone, Debug)]
pub struct RawHand {
    pub landmarks:  [Landmark; LANDMARK_COUNT],
    pub score:      f32,
    pub handedness: String,
}

// ════════════════════════════════════════════════════════════════════════════
// HandDetector trait
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can turn a frame into zero or more hands.  One call per
/// frame; an empty vec is the explicit "no hand" signal.
pub trait HandDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<RawHand>>;

    /// Simulation backends take the window's pose key and cursor from
    /// here; hardware backends ignore it.
    fn set_sim_input(&mut self, _pose: Option<SimPose>, _cursor: (f32, f32)) {}
}

// ════════════════════════════════════════════════════════════════════════════
// Wire format (shared with the Python side)
// ════════════════════════════════════════════════════════════════════════════

#[derive(Deserialize, Debug)]
struct LandmarkJson {
    x: f32,
    y: f32,
    #[serde(default)]
    z: f32,
}

#[derive(Deserialize, Debug)]
struct HandJson {
    handedness: String,
    score:      f32,
    landmarks:  Vec<LandmarkJson>,
}

#[derive(Deserialize, Debug)]
struct DetectionJson {
    #[serde(default)]
    hands: Vec<HandJson>,
    #[serde(default)]
    error: Option<String>,
}

/// Convert one decoded detection line into hands, skipping malformed
/// entries (wrong landmark count) and hands under the confidence floor.
fn hands_from_json(msg: DetectionJson, min_score: f32) -> Vec<RawHand> {
    if let Some(err) = msg.error {
        log::warn!("detector reported: {}", err);
        return Vec::new();
    }
    let mut out = Vec::new();
    for hand in msg.hands {
        if hand.score < min_score {
            continue;
        }
        if hand.landmarks.len() != LANDMARK_COUNT {
            log::warn!(
                "skipping malformed hand: expected {} landmarks, got {}",
                LANDMARK_COUNT,
                hand.landmarks.len()
            );
            continue;
        }
        let mut landmarks = [Landmark::default(); LANDMARK_COUNT];
        for (slot, lm) in landmarks.iter_mut().zip(hand.landmarks.iter()) {
            *slot = Landmark { x: lm.x, y: lm.y, z: lm.z };
        }
        out.push(RawHand {
            landmarks,
            score: hand.score,
            handedness: hand.handedness,
        });
    }
    out
}

// ════════════════════════════════════════════════════════════════════════════
// MediapipeDetector — real model via Python subprocess (feature = "camera")
// ════════════════════════════════════════════════════════════════════════════

#[cfg(feature = "camera")]
pub use real::MediapipeDetector;

#[cfg(feature = "camera")]
mod real {
    use super::*;
    use anyhow::Context;
    use ink_canvas::DrawConfig;
    use std::io::{BufRead, BufReader, Write};
    use std::path::Path;
    use std::process::{Child, Command, Stdio};

    /// MediaPipe hand landmarker behind a line-oriented subprocess
    /// protocol: per frame we send a little-endian `(width, height,
    /// channels)` header followed by raw BGR bytes, and read back one JSON
    /// line of hands.  `mediapipe_hands.py` is the matching peer.
    pub struct MediapipeDetector {
        process:   Child,
        stdout:    BufReader<std::process::ChildStdout>,
        min_score: f32,
    }

    impl MediapipeDetector {
        pub fn spawn(script: &Path, python: &Path, cfg: &DrawConfig) -> Result<Self> {
            let mut process = Command::new(python)
                .arg(script)
                .arg("--max-hands")
                .arg(cfg.max_hands.to_string())
                .arg("--min-detection-confidence")
                .arg(cfg.detection_confidence.to_string())
                .arg("--min-tracking-confidence")
                .arg(cfg.tracking_confidence.to_string())
                .stdin(Stdio::piped())
                .stdout(Stdio::piped())
                .stderr(Stdio::inherit())
                .spawn()
                .context("starting detector subprocess")?;

            let stdout = process
                .stdout
                .take()
                .context("taking detector stdout")?;
            let mut stdout = BufReader::new(stdout);

            // Handshake: the script prints READY once the model is loaded.
            let mut line = String::new();
            stdout.read_line(&mut line)?;
            if line.trim() != "READY" {
                anyhow::bail!("detector did not signal ready, got: {}", line.trim());
            }
            log::info!("hand detector ready");

            Ok(MediapipeDetector {
                process,
                stdout,
                min_score: cfg.detection_confidence,
            })
        }
    }

    impl HandDetector for MediapipeDetector {
        fn detect(&mut self, frame: &Frame) -> Result<Vec<RawHand>> {
            // Repack ARGB → BGR for the model side.
            let mut bgr = Vec::with_capacity(frame.data.len() * 3);
            for px in &frame.data {
                bgr.push((px & 0xFF) as u8);
                bgr.push(((px >> 8) & 0xFF) as u8);
                bgr.push(((px >> 16) & 0xFF) as u8);
            }

            let stdin = self
                .process
                .stdin
                .as_mut()
                .context("taking detector stdin")?;
            stdin.write_all(&frame.width.to_le_bytes())?;
            stdin.write_all(&frame.height.to_le_bytes())?;
            stdin.write_all(&3u32.to_le_bytes())?;
            stdin.write_all(&bgr)?;
            stdin.flush()?;

            let mut line = String::new();
            self.stdout.read_line(&mut line)?;
            let msg: DetectionJson = serde_json::from_str(&line)
                .with_context(|| format!("parsing detector line: {}", line.trim()))?;
            Ok(hands_from_json(msg, self.min_score))
        }
    }

    impl Drop for MediapipeDetector {
        fn drop(&mut self) {
            let _ = self.process.kill();
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// PoseSynth — simulated hand (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Poses the keyboard can hold in simulation mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimPose {
    Draw,
    Pinch,
    Stop,
    Erase,
    ColorChange,
    Clear,
    Fist,
    Open,
    ThumbOnly,
    PinkyOnly,
}

/// Builds a plausible 21-landmark hand around the mouse cursor for the
/// held pose.  Only the keypoints the adapter reads (wrist, tips, bases)
/// are positioned carefully; the rest sit at the wrist.
pub struct PoseSynth {
    pose:   Option<SimPose>,
    cursor: (f32, f32),
}

impl PoseSynth {
    pub fn new() -> Self {
        PoseSynth { pose: None, cursor: (0.5, 0.5) }
    }
}

impl Default for PoseSynth {
    fn default() -> Self {
        Self::new()
    }
}

impl HandDetector for PoseSynth {
    fn detect(&mut self, _frame: &Frame) -> Result<Vec<RawHand>> {
        Ok(match self.pose {
            Some(pose) => vec![synth_hand(pose, self.cursor.0, self.cursor.1)],
            // No pose key held = no hand in frame.
            None => Vec::new(),
        })
    }

    fn set_sim_input(&mut self, pose: Option<SimPose>, cursor: (f32, f32)) {
        self.pose = pose;
        self.cursor = cursor;
    }
}

/// Extension vector for each simulated pose, `[thumb, index, middle,
/// ring, pinky]`.
fn pose_vector(pose: SimPose) -> [bool; 5] {
    match pose {
        SimPose::Draw        => [false, true, false, false, false],
        SimPose::Pinch       => [true, true, false, false, false],
        SimPose::Stop        => [true, true, false, false, false],
        SimPose::Erase       => [false, true, true, false, false],
        SimPose::ColorChange => [false, true, true, true, false],
        SimPose::Clear       => [true, true, true, true, true],
        SimPose::Fist        => [false, false, false, false, false],
        SimPose::Open        => [false, true, true, true, true],
        SimPose::ThumbOnly   => [true, false, false, false, false],
        SimPose::PinkyOnly   => [false, false, false, false, true],
    }
}

/// Place the index tip at the cursor and the remaining fingers around it
/// so the geometric classifier reproduces the requested pose.
fn synth_hand(pose: SimPose, cx: f32, cy: f32) -> RawHand {
    let ext = pose_vector(pose);
    let wrist = Landmark { x: cx, y: cy + 0.25, z: 0.0 };
    let mut landmarks = [wrist; LANDMARK_COUNT];

    for (i, f) in Finger::ALL.iter().enumerate() {
        // Fingers fan out left-to-right: thumb, index, middle, ring, pinky.
        let bx = cx + (i as f32 - 1.0) * 0.05;
        let by = cy + 0.12;
        landmarks[f.base_index()] = Landmark { x: bx, y: by, z: 0.0 };
        landmarks[f.tip_index()] = if *f == Finger::Thumb {
            let dx = if ext[i] { 0.06 } else { -0.03 };
            Landmark { x: bx + dx, y: by, z: 0.0 }
        } else {
            let dy = if ext[i] { -0.12 } else { 0.04 };
            Landmark { x: bx, y: by + dy, z: 0.0 }
        };
    }

    // Index tip rides exactly on the cursor.
    landmarks[Finger::Index.tip_index()] = Landmark {
        x: cx,
        y: if ext[1] { cy } else { cy + 0.16 },
        z: 0.0,
    };

    // Pinch pulls the thumb tip next to the index tip; stop leaves it at
    // the fan-out position, well past the pinch radius.
    if pose == SimPose::Pinch {
        let base = landmarks[Finger::Thumb.base_index()];
        landmarks[Finger::Thumb.tip_index()] = Landmark {
            x: (cx - 0.012).max(base.x + 0.001),
            y: cy + 0.006,
            z: 0.0,
        };
    }

    RawHand {
        landmarks,
        score:      0.95,
        handedness: "Right".to_string(),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use ink_canvas::{classify, DrawConfig, GestureLabel, HandFrame};

    const W: u32 = 1280;
    const H: u32 = 720;

    fn classify_pose(pose: SimPose) -> GestureLabel {
        let hand = synth_hand(pose, 0.5, 0.4);
        let frame = HandFrame::from_landmarks(&hand.landmarks, W, H).unwrap();
        classify(&frame, &DrawConfig::default()).label
    }

    #[test]
    fn synthetic_poses_round_trip_through_the_classifier() {
        assert_eq!(classify_pose(SimPose::Draw), GestureLabel::Draw);
        assert_eq!(classify_pose(SimPose::Pinch), GestureLabel::PinchDraw);
        assert_eq!(classify_pose(SimPose::Stop), GestureLabel::Stop);
        assert_eq!(classify_pose(SimPose::Erase), GestureLabel::Erase);
        assert_eq!(classify_pose(SimPose::ColorChange), GestureLabel::ColorChange);
        assert_eq!(classify_pose(SimPose::Clear), GestureLabel::ClearCanvas);
        assert_eq!(classify_pose(SimPose::Fist), GestureLabel::Fist);
        assert_eq!(classify_pose(SimPose::Open), GestureLabel::Open);
        assert_eq!(classify_pose(SimPose::ThumbOnly), GestureLabel::ThumbOnly);
        assert_eq!(classify_pose(SimPose::PinkyOnly), GestureLabel::PinkyOnly);
    }

    #[test]
    fn synthetic_index_tip_tracks_the_cursor() {
        let hand = synth_hand(SimPose::Draw, 0.25, 0.75);
        let frame = HandFrame::from_landmarks(&hand.landmarks, 1000, 1000).unwrap();
        assert_eq!(frame.index_tip(), (250, 750));
    }

    #[test]
    fn no_pose_means_no_hand() {
        let mut synth = PoseSynth::new();
        let frame = Frame { data: vec![0; 4], width: 2, height: 2 };
        assert!(synth.detect(&frame).unwrap().is_empty());
        synth.set_sim_input(Some(SimPose::Draw), (0.5, 0.5));
        assert_eq!(synth.detect(&frame).unwrap().len(), 1);
    }

    #[test]
    fn json_line_parses_into_hands() {
        let lm: Vec<String> = (0..21)
            .map(|i| format!(r#"{{"x": 0.{:02}, "y": 0.5, "z": 0.0}}"#, i))
            .collect();
        let line = format!(
            r#"{{"hands": [{{"handedness": "Left", "score": 0.9, "landmarks": [{}]}}]}}"#,
            lm.join(",")
        );
        let msg: DetectionJson = serde_json::from_str(&line).unwrap();
        let hands = hands_from_json(msg, 0.7);
        assert_eq!(hands.len(), 1);
        assert_eq!(hands[0].handedness, "Left");
    }

    #[test]
    fn malformed_or_weak_hands_are_skipped() {
        let line = r#"{"hands": [
            {"handedness": "Left", "score": 0.9, "landmarks": [{"x": 0.1, "y": 0.1}]},
            {"handedness": "Right", "score": 0.2, "landmarks": []}
        ]}"#;
        let msg: DetectionJson = serde_json::from_str(line).unwrap();
        assert!(hands_from_json(msg, 0.7).is_empty());
    }

    #[test]
    fn helper_script_ships_and_speaks_the_protocol() {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("mediapipe_hands.py");
        let script = std::fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("missing {}: {}", path.display(), e));
        // The handshake and header the Rust side relies on.
        assert!(script.contains("READY"));
        assert!(script.contains("struct.unpack(\"<III\""));
        // The JSON fields hands_from_json deserializes.
        for field in ["\"hands\"", "\"error\"", "handedness", "score", "landmarks"] {
            assert!(script.contains(field), "script lost field {}", field);
        }
        // The CLI flags spawn() passes.
        for flag in ["--max-hands", "--min-detection-confidence", "--min-tracking-confidence"] {
            assert!(script.contains(flag), "script lost flag {}", flag);
        }
    }

    #[test]
    fn detector_error_line_yields_no_hands() {
        let msg: DetectionJson =
            serde_json::from_str(r#"{"error": "model not loaded"}"#).unwrap();
        assert!(hands_from_json(msg, 0.7).is_empty());
    }
}
