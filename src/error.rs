use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid XML in {part}: {source}")]
    Xml {
        part: &'static str,
        source: roxmltree::Error,
    },

    /// Package cannot be opened, rewritten, or is missing a required entry.
    #[error("archive error: {0}")]
    Archive(String),

    /// The main document part is unusable (no w:body, not UTF-8). Nothing
    /// downstream can run.
    #[error("malformed document: {0}")]
    MalformedDocument(&'static str),

    /// A single capture/crop attempt failed. Recoverable: the session stays on
    /// the same placeholder and the user re-triggers.
    #[error("capture failed for placeholder {index} ({token}): {reason}")]
    Capture {
        index: usize,
        token: String,
        reason: String,
    },

    /// A placeholder about to be embedded has no resolvable physical size.
    #[error(
        "cannot resolve physical size for placeholder {token} \
         (table {table}, row {row}, col {col}): {missing} is unknown"
    )]
    SizeResolution {
        token: String,
        table: usize,
        row: usize,
        col: usize,
        missing: &'static str,
    },

    /// Placeholder list and photo list went out of step.
    #[error("no captured photo for placeholder {token} (index {index})")]
    MissingImage { token: String, index: usize },

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}
