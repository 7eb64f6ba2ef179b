//! The capture session: a sequential state machine that walks the ordered
//! placeholder list, one photo per placeholder. Owns all in-progress state;
//! abandoning the session discards every photo taken so far — recomposition
//! is all-or-nothing and never sees a partial set.

use std::io::Cursor;

use crate::error::Error;
use crate::geometry;
use crate::model::{CaptureFrame, CapturedPhoto, PlaceholderSpec};

/// One full-resolution frame from the camera (or whatever stands in for it).
pub struct RawFrame {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Collaborator seam for the camera. Each trigger yields one frame; errors
/// are per-attempt and the session lets the user re-trigger.
pub trait FrameSource {
    fn next_frame(&mut self) -> Result<RawFrame, String>;
}

#[derive(Clone, Debug, PartialEq)]
pub enum SessionState {
    Idle,
    AwaitingCapture(usize),
    Processing(usize),
    Completed,
    Aborted(String),
}

pub struct CaptureSession {
    specs: Vec<PlaceholderSpec>,
    viewport_w: f64,
    viewport_h: f64,
    photos: Vec<CapturedPhoto>,
    state: SessionState,
}

impl CaptureSession {
    /// `N` (the placeholder count) is fixed here and never changes mid-run.
    pub fn new(specs: Vec<PlaceholderSpec>, viewport_w: f64, viewport_h: f64) -> Self {
        CaptureSession {
            specs,
            viewport_w,
            viewport_h,
            photos: Vec::new(),
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn specs(&self) -> &[PlaceholderSpec] {
        &self.specs
    }

    /// Begin the run. A template with zero placeholders completes
    /// immediately — that is an informational state, not a failure.
    pub fn start(&mut self) {
        self.state = if self.specs.is_empty() {
            SessionState::Completed
        } else {
            SessionState::AwaitingCapture(0)
        };
    }

    /// The placeholder currently awaiting its photo.
    pub fn current_spec(&self) -> Option<&PlaceholderSpec> {
        match self.state {
            SessionState::AwaitingCapture(i) | SessionState::Processing(i) => self.specs.get(i),
            _ => None,
        }
    }

    /// Capture geometry for the current placeholder against the given sensor.
    ///
    /// `None` when the placeholder's physical size is unknown: then there is
    /// no aspect ratio to guide by, no overlay is shown, and the full frame
    /// is kept uncropped.
    pub fn current_frame(&self, sensor_w: u32, sensor_h: u32) -> Option<CaptureFrame> {
        let aspect = self.current_spec()?.aspect_ratio()?;
        Some(geometry::capture_frame(
            aspect,
            self.viewport_w,
            self.viewport_h,
            sensor_w,
            sensor_h,
        ))
    }

    /// One capture trigger: pull a frame, crop it to the current
    /// placeholder's geometry, append the photo, and advance.
    ///
    /// On failure the session transitions back to `AwaitingCapture` on the
    /// same placeholder and surfaces the error; retrying is the caller's
    /// (i.e. the user's) decision, never automatic.
    pub fn capture(&mut self, source: &mut dyn FrameSource) -> Result<&SessionState, Error> {
        let SessionState::AwaitingCapture(index) = self.state else {
            return Err(Error::Capture {
                index: self.photos.len(),
                token: String::new(),
                reason: format!("no capture pending in state {:?}", self.state),
            });
        };
        let token = self.specs[index].token.clone();
        self.state = SessionState::Processing(index);

        match self.process_one(index, source) {
            Ok(photo) => {
                self.photos.push(photo);
                self.state = if index + 1 < self.specs.len() {
                    SessionState::AwaitingCapture(index + 1)
                } else {
                    SessionState::Completed
                };
                log::info!(
                    "captured {}/{} ({token})",
                    index + 1,
                    self.specs.len()
                );
                Ok(&self.state)
            }
            Err(reason) => {
                self.state = SessionState::AwaitingCapture(index);
                Err(Error::Capture {
                    index,
                    token,
                    reason,
                })
            }
        }
    }

    fn process_one(
        &self,
        index: usize,
        source: &mut dyn FrameSource,
    ) -> Result<CapturedPhoto, String> {
        let frame = source.next_frame()?;
        let img = image::load_from_memory(&frame.bytes)
            .map_err(|e| format!("cannot decode frame: {e}"))?;

        let cropped = match self.current_frame(frame.width, frame.height) {
            Some(cf) => {
                let r = cf.crop_rect;
                let x = r.x.round() as u32;
                let y = r.y.round() as u32;
                let w = (r.w.round() as u32).min(img.width().saturating_sub(x));
                let h = (r.h.round() as u32).min(img.height().saturating_sub(y));
                if w == 0 || h == 0 {
                    return Err(format!("empty crop rectangle {r:?}"));
                }
                img.crop_imm(x, y, w, h)
            }
            None => img,
        };

        let mut png = Cursor::new(Vec::new());
        cropped
            .write_to(&mut png, image::ImageFormat::Png)
            .map_err(|e| format!("cannot encode crop: {e}"))?;

        Ok(CapturedPhoto {
            placeholder_index: index,
            image_bytes: png.into_inner(),
        })
    }

    /// Abandon the run. Every photo taken so far is discarded.
    pub fn abort(&mut self, reason: impl Into<String>) {
        self.photos.clear();
        self.state = SessionState::Aborted(reason.into());
    }

    /// Hand the completed, ordered photo set to recomposition. Only valid in
    /// `Completed`; anywhere else there is no consistent set to hand over.
    pub fn into_photos(self) -> Result<Vec<CapturedPhoto>, Error> {
        match self.state {
            SessionState::Completed => Ok(self.photos),
            state => Err(Error::Capture {
                index: self.photos.len(),
                token: String::new(),
                reason: format!("session not complete (state {state:?})"),
            }),
        }
    }
}
