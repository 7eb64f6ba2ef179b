mod archive;
mod docx;
mod error;
mod geometry;
mod model;
mod placeholder;
mod recompose;
mod session;
mod units;

pub use error::Error;
pub use geometry::{capture_frame, crop_rect, guide_frame};
pub use model::{CaptureFrame, CapturedPhoto, Cell, PlaceholderSpec, Rect, Row, Table, TableGrid};
pub use recompose::DOCUMENT_PART;
pub use session::{CaptureSession, FrameSource, RawFrame, SessionState};
pub use units::{dxa_to_mm, mm_to_emu};

use std::path::Path;
use std::time::Instant;

/// Parse a template package and list its placeholders, in document order.
pub fn inspect_template_bytes(package: &[u8]) -> Result<Vec<PlaceholderSpec>, Error> {
    let document = archive::extract_entry(package, recompose::DOCUMENT_PART)?;
    let grid = docx::parse(&document)?;
    Ok(placeholder::extract(&grid))
}

pub fn inspect_template(path: &Path) -> Result<Vec<PlaceholderSpec>, Error> {
    let package = std::fs::read(path).map_err(Error::Io)?;
    inspect_template_bytes(&package)
}

/// Build the finished package from a template, its placeholder list, and the
/// completed photo set. Pure byte-level: callers own all I/O.
pub fn compose_document_bytes(
    package: &[u8],
    specs: &[PlaceholderSpec],
    photos: &[CapturedPhoto],
) -> Result<Vec<u8>, Error> {
    recompose::compose(package, specs, photos)
}

/// File-path convenience over [`compose_document_bytes`], with a timing
/// summary at info level.
pub fn compose_document(
    template: &Path,
    specs: &[PlaceholderSpec],
    photos: &[CapturedPhoto],
    output: &Path,
) -> Result<(), Error> {
    let t0 = Instant::now();

    let package = std::fs::read(template).map_err(Error::Io)?;
    let t_read = t0.elapsed();

    let bytes = recompose::compose(&package, specs, photos)?;
    let t_compose = t0.elapsed();

    std::fs::write(output, &bytes).map_err(Error::Io)?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: read={:.1}ms, compose={:.1}ms, write={:.1}ms, total={:.1}ms (output {} bytes)",
        t_read.as_secs_f64() * 1000.0,
        (t_compose - t_read).as_secs_f64() * 1000.0,
        (t_total - t_compose).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        bytes.len(),
    );

    Ok(())
}
