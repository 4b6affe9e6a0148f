//! Video frame acquisition.
//!
//! A [`FrameSource`] yields one frame at a time; `Ok(None)` means the
//! stream has ended and the run loop shuts down in order.  The default
//! build ships [`SyntheticCapture`], a generated backdrop that stands in
//! for the webcam so the whole pipeline runs anywhere; the `camera`
//! feature adds an OpenCV-backed [`CameraCapture`].

use anyhow::Result;

// ════════════════════════════════════════════════════════════════════════════
// Frame
// ════════════════════════════════════════════════════════════════════════════

/// One video frame as a packed ARGB buffer (minifb's pixel format).
#[derive(Clone, Debug)]
pub struct Frame {
    pub data:   Vec<u32>,
    pub width:  u32,
    pub height: u32,
}

impl Frame {
    /// Flip horizontally so on-screen left/right matches the user's
    /// physical left/right.
    pub fn mirror(&mut self) {
        let w = self.width as usize;
        for row in self.data.chunks_mut(w) {
            row.reverse();
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// FrameSource trait
// ════════════════════════════════════════════════════════════════════════════

/// A sequential source of video frames.
pub trait FrameSource {
    /// Read the next frame.  `Ok(None)` ends the run (the one fatal
    /// condition in the pipeline); errors while opening count as the same.
    fn next_frame(&mut self) -> Result<Option<Frame>>;

    fn size(&self) -> (u32, u32);
}

// ════════════════════════════════════════════════════════════════════════════
// SyntheticCapture — default build, no hardware
// ════════════════════════════════════════════════════════════════════════════

/// Generates a fixed dark backdrop with a soft vertical gradient.  Stands
/// in for the camera feed in simulation mode.
pub struct SyntheticCapture {
    width:    u32,
    height:   u32,
    backdrop: Vec<u32>,
}

impl SyntheticCapture {
    pub fn new(width: u32, height: u32) -> Self {
        let mut backdrop = vec![0u32; (width * height) as usize];
        for y in 0..height {
            let shade = 24 + (y * 28 / height.max(1)) as u32;
            let px = 0xFF000000 | (shade << 16) | (shade << 8) | (shade + 8);
            let row = (y * width) as usize;
            backdrop[row..row + width as usize].fill(px);
        }
        SyntheticCapture { width, height, backdrop }
    }
}

impl FrameSource for SyntheticCapture {
    fn next_frame(&mut self) -> Result<Option<Frame>> {
        Ok(Some(Frame {
            data:   self.backdrop.clone(),
            width:  self.width,
            height: self.height,
        }))
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Repack tightly-packed BGR bytes into an ARGB frame of the given
/// dimensions.
pub fn frame_from_bgr(bgr: &[u8], width: u32, height: u32) -> Frame {
    let mut data = Vec::with_capacity((width * height) as usize);
    for px in bgr.chunks_exact(3) {
        let (b, g, r) = (px[0] as u32, px[1] as u32, px[2] as u32);
        data.push(0xFF000000 | (r << 16) | (g << 8) | b);
    }
    Frame { data, width, height }
}

// ════════════════════════════════════════════════════════════════════════════
// CameraCapture — real webcam (feature = "camera")
// ════════════════════════════════════════════════════════════════════════════

#[cfg(feature = "camera")]
pub use real::CameraCapture;

#[cfg(feature = "camera")]
mod real {
    use super::{Frame, FrameSource};
    use anyhow::{Context, Result};
    use opencv::prelude::*;
    use opencv::videoio::{self, VideoCapture};

    /// OpenCV webcam source delivering ARGB frames.
    ///
    /// Drivers clamp the requested capture size to a supported mode, so
    /// the reported size comes from the first delivered frame, never from
    /// the request.  The session canvas and the window are sized from it.
    pub struct CameraCapture {
        cap:     VideoCapture,
        width:   u32,
        height:  u32,
        pending: Option<Frame>,
    }

    impl CameraCapture {
        pub fn open(device: i32, width: u32, height: u32) -> Result<Self> {
            let mut cap = VideoCapture::new(device, videoio::CAP_ANY)
                .context("creating OpenCV capture")?;
            cap.set(videoio::CAP_PROP_FRAME_WIDTH, width as f64)?;
            cap.set(videoio::CAP_PROP_FRAME_HEIGHT, height as f64)?;
            if !cap.is_opened()? {
                anyhow::bail!("camera device {} could not be opened", device);
            }

            // Prime one frame to learn the geometry actually in effect.
            let first = read_frame(&mut cap)?
                .ok_or_else(|| anyhow::anyhow!("camera device {} delivered no frames", device))?;
            let (w, h) = (first.width, first.height);
            if (w, h) != (width, height) {
                log::warn!("camera clamped {}x{} to {}x{}", width, height, w, h);
            }
            log::info!("camera {} open at {}x{}", device, w, h);

            Ok(CameraCapture { cap, width: w, height: h, pending: Some(first) })
        }
    }

    fn read_frame(cap: &mut VideoCapture) -> Result<Option<Frame>> {
        let mut mat = Mat::default();
        if !cap.read(&mut mat).context("reading camera frame")? || mat.empty() {
            return Ok(None);
        }
        let w = mat.cols() as u32;
        let h = mat.rows() as u32;
        let bgr = mat.data_bytes().context("accessing frame bytes")?;
        Ok(Some(super::frame_from_bgr(bgr, w, h)))
    }

    impl FrameSource for CameraCapture {
        fn next_frame(&mut self) -> Result<Option<Frame>> {
            if let Some(first) = self.pending.take() {
                return Ok(Some(first));
            }
            let frame = match read_frame(&mut self.cap)? {
                Some(f) => f,
                // End of stream / camera unreadable — orderly shutdown.
                None => return Ok(None),
            };
            if (frame.width, frame.height) != (self.width, self.height) {
                // Canvas and window are already sized; a mid-stream mode
                // switch cannot be reconciled per frame.
                anyhow::bail!(
                    "camera changed geometry mid-stream: {}x{} -> {}x{}",
                    self.width,
                    self.height,
                    frame.width,
                    frame.height
                );
            }
            Ok(Some(frame))
        }

        fn size(&self) -> (u32, u32) {
            (self.width, self.height)
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthetic_frames_match_requested_size() {
        let mut src = SyntheticCapture::new(320, 240);
        let frame = src.next_frame().unwrap().unwrap();
        assert_eq!(frame.width, 320);
        assert_eq!(frame.height, 240);
        assert_eq!(frame.data.len(), 320 * 240);
    }

    #[test]
    fn synthetic_never_ends() {
        let mut src = SyntheticCapture::new(64, 64);
        for _ in 0..5 {
            assert!(src.next_frame().unwrap().is_some());
        }
    }

    #[test]
    fn bgr_repack_swaps_channels_and_keeps_dimensions() {
        // One blue pixel, one red pixel, delivered at 2x1.
        let bgr = [0xFF, 0x00, 0x00, 0x00, 0x00, 0xFF];
        let frame = frame_from_bgr(&bgr, 2, 1);
        assert_eq!((frame.width, frame.height), (2, 1));
        assert_eq!(frame.data, vec![0xFF0000FF, 0xFFFF0000]);
    }

    #[test]
    fn frame_dimensions_follow_the_delivered_buffer() {
        // The source reports what it actually built, not what was asked for.
        let bgr = vec![0u8; 4 * 3 * 3];
        let frame = frame_from_bgr(&bgr, 4, 3);
        assert_eq!(frame.data.len(), 12);
        assert_eq!((frame.width, frame.height), (4, 3));
    }

    #[test]
    fn mirror_reverses_rows() {
        let mut frame = Frame {
            data:   vec![1, 2, 3, 4, 5, 6],
            width:  3,
            height: 2,
        };
        frame.mirror();
        assert_eq!(frame.data, vec![3, 2, 1, 6, 5, 4]);
    }

    #[test]
    fn mirror_twice_is_identity() {
        let original: Vec<u32> = (0..12).collect();
        let mut frame = Frame { data: original.clone(), width: 4, height: 3 };
        frame.mirror();
        frame.mirror();
        assert_eq!(frame.data, original);
    }
}
