//! Application wiring and the frame-lock-step run loop.
//!
//! One iteration = one frame, processed completely before the next is
//! read: poll the window, grab a frame, detect hands, classify, stabilize,
//! apply to the session, composite, present.  Nothing here needs locking
//! because nothing here is concurrent.

use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Deserialize;

use ink_canvas::{
    classify, DrawConfig, DrawingSession, GestureInput, GestureVote, HandFrame, PointSmoother,
};

use crate::capture::FrameSource;
use crate::detector::HandDetector;
use crate::persist;
use crate::viewer::Viewer;

// ════════════════════════════════════════════════════════════════════════════
// Configuration
// ════════════════════════════════════════════════════════════════════════════

/// Top-level app settings.  Deserializes from an optional JSON file with
/// every field defaulted, same scheme as [`DrawConfig`] itself.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub width:           u32,
    pub height:          u32,
    /// Camera device index (feature `camera` only).
    pub camera_device:   i32,
    /// Path of the landmark-detector helper script (feature `camera`
    /// only).  The script ships with the crate; the default path assumes
    /// the binary runs from the workspace root.
    pub detector_script: String,
    /// Python interpreter used to run it.
    pub python:          String,
    pub draw:            DrawConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            width:           1280,
            height:          720,
            camera_device:   0,
            detector_script: "hand_draw/mediapipe_hands.py".into(),
            python:          "python3".into(),
            draw:            DrawConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load from a JSON file, or defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            None => Ok(AppConfig::default()),
            Some(p) => {
                let body = fs::read_to_string(p)
                    .with_context(|| format!("reading config {}", p.display()))?;
                serde_json::from_str(&body)
                    .with_context(|| format!("parsing config {}", p.display()))
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Backend selection
// ════════════════════════════════════════════════════════════════════════════

#[cfg(feature = "camera")]
fn backend(cfg: &AppConfig) -> Result<(Box<dyn FrameSource>, Box<dyn HandDetector>)> {
    use crate::capture::CameraCapture;
    use crate::detector::MediapipeDetector;

    let source = CameraCapture::open(cfg.camera_device, cfg.width, cfg.height)?;
    let detector = MediapipeDetector::spawn(
        Path::new(&cfg.detector_script),
        Path::new(&cfg.python),
        &cfg.draw,
    )?;
    Ok((Box::new(source), Box::new(detector)))
}

#[cfg(not(feature = "camera"))]
fn backend(cfg: &AppConfig) -> Result<(Box<dyn FrameSource>, Box<dyn HandDetector>)> {
    use crate::capture::SyntheticCapture;
    use crate::detector::PoseSynth;

    let source = SyntheticCapture::new(cfg.width, cfg.height);
    Ok((Box::new(source), Box::new(PoseSynth::new())))
}

// ════════════════════════════════════════════════════════════════════════════
// Run loop
// ════════════════════════════════════════════════════════════════════════════

pub fn run(cfg: AppConfig) -> Result<()> {
    let (mut source, mut detector) = backend(&cfg)?;
    let (width, height) = source.size();

    let mut viewer   = Viewer::new(width, height)?;
    let mut session  = DrawingSession::new(width, height, cfg.draw.clone(), Instant::now());
    let mut smoother = PointSmoother::new(cfg.draw.smoothing_window);
    let mut vote     = GestureVote::new(cfg.draw.vote_window, cfg.draw.vote_minimum);

    log::info!("session started at {}x{}", width, height);

    while viewer.is_open() {
        let input = viewer.poll();
        if input.quit {
            break;
        }
        if input.toggle_ui {
            viewer.toggle_ui();
        }

        let Some(mut frame) = source.next_frame()? else {
            log::info!("frame source ended");
            break;
        };
        if cfg.draw.mirror {
            frame.mirror();
        }

        detector.set_sim_input(input.pose, input.cursor);
        let hands = match detector.detect(&frame) {
            Ok(hands) => hands,
            Err(e) => {
                // A bad detector frame costs one frame of input, not the run.
                log::warn!("detector error: {:#}", e);
                Vec::new()
            }
        };

        let mut tip = None;
        for raw in hands.into_iter().take(cfg.draw.max_hands) {
            let hand = match HandFrame::from_landmarks(&raw.landmarks, width, height) {
                Ok(hand) => hand,
                Err(e) => {
                    log::warn!("dropping hand: {}", e);
                    continue;
                }
            };
            let sample = classify(&hand, &cfg.draw);
            let label  = vote.push(sample.label);
            let point  = smoother.push(hand.index_tip());
            // The voted label pairs with the current frame's confidence:
            // a single low-confidence frame still suspends drawing even
            // while the vote holds the label steady.
            session.apply(
                Some(GestureInput {
                    label,
                    confidence: sample.confidence,
                    point,
                    hand_span: hand.hand_span(),
                }),
                Instant::now(),
            );
            tip = Some(point);
            // Only the first valid hand drives the session; extra hands
            // would need their own smoother/vote state.
            break;
        }
        if tip.is_none() {
            session.apply(None, Instant::now());
            smoother.reset();
            vote.reset();
        }

        if input.save {
            if let Err(e) = save_all(&session) {
                log::error!("save failed: {:#}", e);
            }
        }

        let mut composite = frame.data;
        session.canvas().composite_onto(&mut composite, cfg.draw.canvas_alpha);
        viewer.render(&composite, &session, tip);
    }

    // Parting snapshot so closing the window never loses work.
    save_all(&session)?;
    let stats = session.stats();
    log::info!(
        "session over: {} strokes, {} characters, {:.0}s",
        stats.strokes_drawn,
        stats.characters_written,
        stats.session_start.elapsed().as_secs_f32()
    );
    Ok(())
}

fn save_all(session: &DrawingSession) -> Result<()> {
    if !session.canvas().is_blank() {
        persist::save_drawing(session.canvas())?;
    }
    persist::save_text(session.text(), session.stats())?;
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
