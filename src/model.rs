//! Value types shared across the pipeline. Everything here is built once by a
//! stage and handed to the next by value; nothing is mutated after creation.

/// One table cell from the main document part.
///
/// `text` is the concatenation of every run inside every paragraph of the
/// cell, in document order, with no separators. Run boundaries are discarded
/// so a placeholder token split across runs is still detectable.
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    /// Cell width in twentieths of a point. `None` when the document carries
    /// no resolvable width — never 0, a zero-width cell is physically invalid.
    pub width_dxa: Option<u32>,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Row {
    /// Row height in twentieths of a point, from w:trHeight. `None` if absent.
    pub height_dxa: Option<u32>,
    pub cells: Vec<Cell>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Table {
    pub rows: Vec<Row>,
}

/// The normalized grid model of `word/document.xml`: tables → rows → cells in
/// document order. Order is significant — it defines the indices used by the
/// placeholder list and, through it, capture and recomposition order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TableGrid {
    pub tables: Vec<Table>,
}

/// A placeholder cell found in the template, with its physical size.
///
/// The extractor emits these strictly in document order and later stages rely
/// on that: capture order = placeholder order = substitution order.
#[derive(Clone, Debug, PartialEq)]
pub struct PlaceholderSpec {
    /// The matched token, digits preserved: `"PHOTO"`, `"PHOTO3"`, …
    pub token: String,
    pub table_index: usize,
    pub row_index: usize,
    pub col_index: usize,
    /// Cell width in millimeters, rounded to 2 decimal places.
    pub width_mm: Option<f64>,
    /// Row height in millimeters, rounded to 2 decimal places.
    pub height_mm: Option<f64>,
}

impl PlaceholderSpec {
    /// Physical aspect ratio (width / height), if both dimensions are known.
    pub fn aspect_ratio(&self) -> Option<f64> {
        match (self.width_mm, self.height_mm) {
            (Some(w), Some(h)) if h > 0.0 => Some(w / h),
            _ => None,
        }
    }
}

/// An axis-aligned rectangle. Units depend on context: logical display points
/// for guide frames, source-image pixels for crop rectangles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

/// Capture geometry for one placeholder against one viewport + sensor.
///
/// `guide_rect` lives in display space (what the user aims with); `crop_rect`
/// lives in sensor space (what is actually cut out of the full-resolution
/// frame). Derived, never persisted — recomputed whenever the viewport or the
/// current placeholder changes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CaptureFrame {
    pub guide_rect: Rect,
    pub crop_rect: Rect,
}

/// One cropped photo, PNG-encoded, bound to its placeholder by index.
#[derive(Clone, Debug)]
pub struct CapturedPhoto {
    pub placeholder_index: usize,
    pub image_bytes: Vec<u8>,
}
