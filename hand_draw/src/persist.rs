//! Saving session output to disk.
//!
//! `S` in the viewer (or quitting) writes two artifacts next to the
//! binary: `drawing_<ts>.png`, the ink layer with transparency where no
//! ink was laid, and `text_<ts>.txt`, the gesture-typed text log.  Both
//! carry the same Unix-seconds timestamp so a pair is easy to match up.

use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use image::RgbaImage;

use ink_canvas::{Canvas, SessionStats};

fn unix_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Export the ink layer as an RGBA PNG.  Unpainted pixels come out fully
/// transparent so the drawing can be layered onto anything later.
pub fn save_drawing(canvas: &Canvas) -> Result<PathBuf> {
    let path = PathBuf::from(format!("drawing_{}.png", unix_seconds()));
    let mut img = RgbaImage::new(canvas.width(), canvas.height());

    for y in 0..canvas.height() {
        for x in 0..canvas.width() {
            let px = canvas.pixel(x as i32, y as i32);
            let rgba = if px == 0 {
                [0, 0, 0, 0]
            } else {
                [(px >> 16) as u8, (px >> 8) as u8, px as u8, 0xFF]
            };
            img.put_pixel(x, y, image::Rgba(rgba));
        }
    }

    img.save(&path)
        .with_context(|| format!("writing {}", path.display()))?;
    log::info!("saved drawing to {}", path.display());
    Ok(path)
}

/// Write the text log, if there is one.  Returns `None` when the log is
/// empty — no point littering the directory with blank files.
pub fn save_text(text: &str, stats: &SessionStats) -> Result<Option<PathBuf>> {
    if text.is_empty() {
        return Ok(None);
    }
    let path = PathBuf::from(format!("text_{}.txt", unix_seconds()));
    let body = format!(
        "{}\n\n# strokes: {}  characters: {}\n",
        text, stats.strokes_drawn, stats.characters_written
    );
    fs::write(&path, body).with_context(|| format!("writing {}", path.display()))?;
    log::info!("saved text log to {}", path.display());
    Ok(Some(path))
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
