//! # ink_canvas
//!
//! Core of a webcam-driven, gesture-controlled drawing surface: a live
//! video stream carries a persistent ink layer that the user paints,
//! erases, and clears with hand poses classified frame-by-frame.
//!
//! Hand-landmark detection itself is an external collaborator — an opaque
//! service that returns 21 named 2-D keypoints per hand.  This crate owns
//! everything after that:
//!
//! * [`landmark`] — raw keypoints → named pixel positions + finger
//!   extension flags.
//! * [`gesture`] — named positions → a discrete pose label + confidence.
//! * [`stabilize`] — position smoothing, gesture-vote debouncing, and
//!   per-command cooldown gating.
//! * [`session`] — the state machine that turns stabilized gestures into
//!   canvas mutations, stroke history, a text log, and session stats.
//! * [`canvas`] — the persistent ARGB ink buffer and the video compositor.
//! * [`config`] — every tunable threshold in one serializable struct.
//!
//! ## Pose → Action mapping
//!
//! | Pose | Action |
//! |---|---|
//! | Index finger alone | Draw ink at the fingertip |
//! | Index + thumb, tips < 40 px apart | Pinch draw (precision) |
//! | Index + thumb apart | Stop drawing |
//! | Index + middle (V sign) | Erase under the fingertip |
//! | Index + middle + ring | Pick color by screen quarter (1 s cooldown) |
//! | All five fingers | Clear canvas, strokes, text, stats (2 s cooldown) |
//! | Fist | Stop drawing, close the stroke |
//! | Four fingers (open hand) | Append space to the text log |
//! | Thumb alone | Append newline |
//! | Pinky alone | Backspace |
//!
//! The pipeline is single-threaded and frame-lock-step: one frame is fully
//! processed before the next is read, so none of the state here needs
//! locking.  Hosts embedding it in a threaded context must treat the
//! session as one critical section per frame.

pub mod canvas;
pub mod config;
pub mod gesture;
pub mod landmark;
pub mod session;
pub mod stabilize;

pub use canvas::{palette, Canvas};
pub use config::DrawConfig;
pub use gesture::{classify, GestureLabel, GestureSample};
pub use landmark::{distance, Finger, HandFrame, Landmark, LandmarkError, Point, LANDMARK_COUNT};
pub use session::{DrawingSession, GestureInput, Mode, SessionStats, Stroke};
pub use stabilize::{CommandClass, CooldownGate, GestureVote, PointSmoother};
