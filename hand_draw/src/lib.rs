//! # hand_draw
//!
//! Webcam finger-drawing application: a persistent ink layer composited
//! over live video, painted and edited with hand gestures classified from
//! MediaPipe-style 21-point hand landmarks.  The gesture/drawing core
//! lives in the `ink_canvas` crate; this crate adds capture, detection,
//! windowing, and persistence around it.
//!
//! ## Gesture → Action mapping
//!
//! | Pose | Action |
//! |---|---|
//! | Index finger only | Draw at the fingertip |
//! | Index + thumb, tips close | Pinch draw (precision) |
//! | Index + thumb apart | Stop drawing |
//! | Index + middle (V) | Erase under the fingertip |
//! | Index + middle + ring | Change color by screen quarter |
//! | All five fingers | Clear everything (cooldown-gated) |
//! | Fist | Stop drawing |
//! | Open hand (four fingers) | Space in the text log |
//! | Thumb only | Newline |
//! | Pinky only | Backspace |
//!
//! ## Feature flags
//!
//! * (default) — **Simulation mode**: the mouse is the fingertip and held
//!   keys are poses, so the full pipeline runs with no camera, no OpenCV,
//!   and no Python.
//! * `camera` — **Hardware mode**: OpenCV webcam capture plus a MediaPipe
//!   hand-landmark detector running as a Python subprocess.
//!
//! ### Simulation keys
//!
//! | Key | Pose |
//! |---|---|
//! | `D` / hold | Index only (draw) |
//! | `G` / hold | Pinch (precision draw) |
//! | `V` / hold | Index + thumb apart (stop) |
//! | `E` / hold | V sign (erase) |
//! | `C` / hold | Three fingers (color change) |
//! | `X` / hold | Five fingers (clear) |
//! | `F` / hold | Fist |
//! | `O` / hold | Open hand (space) |
//! | `T` / hold | Thumb only (newline) |
//! | `P` / hold | Pinky only (backspace) |
//! | `S` | Save PNG + text log |
//! | `U` | Toggle the HUD |
//! | `Q` / `Esc` | Quit (saving on the way out) |

pub mod app;
pub mod capture;
pub mod detector;
pub mod persist;
pub mod viewer;
