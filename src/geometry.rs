//! Capture geometry: from a placeholder's physical aspect ratio to (a) the
//! guide frame the user aims with, in display space, and (b) the crop
//! rectangle applied to the full-resolution frame, in sensor space.
//!
//! The two spaces are the whole point. The preview the user sees is the
//! viewport; the frame the camera delivers is larger. The guide rect is
//! computed against the viewport and then scaled into sensor coordinates by
//! independent per-axis factors, so guide overlay and actual crop always
//! agree.

use crate::model::{CaptureFrame, Rect};

/// Share of the viewport width the guide frame may occupy.
const WIDTH_CAP: f64 = 0.9;
/// Share of the viewport height the guide frame may occupy.
const HEIGHT_CAP: f64 = 0.7;

/// Fit a rectangle of the given aspect ratio (width / height) into the
/// viewport and center it.
///
/// Landscape-or-square cells start from the width cap and fall back to the
/// height cap if the derived height overflows; portrait cells do the
/// symmetric thing. The clamp order must not change: it is what keeps the
/// overlay consistent with the crop for every aspect ratio.
pub fn guide_frame(aspect_ratio: f64, viewport_w: f64, viewport_h: f64) -> Rect {
    let max_w = viewport_w * WIDTH_CAP;
    let max_h = viewport_h * HEIGHT_CAP;

    let (w, h) = if aspect_ratio >= 1.0 {
        let w = max_w;
        let h = w / aspect_ratio;
        if h > max_h {
            (max_h * aspect_ratio, max_h)
        } else {
            (w, h)
        }
    } else {
        let h = max_h;
        let w = h * aspect_ratio;
        if w > max_w {
            (max_w, max_w / aspect_ratio)
        } else {
            (w, h)
        }
    };

    Rect {
        x: (viewport_w - w) / 2.0,
        y: (viewport_h - h) / 2.0,
        w,
        h,
    }
}

/// Map a display-space rectangle into sensor-space pixels, clamped to the
/// sensor bounds.
pub fn crop_rect(guide: Rect, viewport_w: f64, viewport_h: f64, sensor_w: u32, sensor_h: u32) -> Rect {
    let sx = sensor_w as f64 / viewport_w;
    let sy = sensor_h as f64 / viewport_h;
    let x = (guide.x * sx).max(0.0);
    let y = (guide.y * sy).max(0.0);
    Rect {
        x,
        y,
        w: (guide.w * sx).min(sensor_w as f64 - x),
        h: (guide.h * sy).min(sensor_h as f64 - y),
    }
}

/// Full capture geometry for one placeholder: guide frame plus the matching
/// crop rectangle against a sensor of the given pixel size.
pub fn capture_frame(
    aspect_ratio: f64,
    viewport_w: f64,
    viewport_h: f64,
    sensor_w: u32,
    sensor_h: u32,
) -> CaptureFrame {
    let guide = guide_frame(aspect_ratio, viewport_w, viewport_h);
    CaptureFrame {
        guide_rect: guide,
        crop_rect: crop_rect(guide, viewport_w, viewport_h, sensor_w, sensor_h),
    }
}
