//! Error types for file import and export.
//!
//! Everything here is recoverable: a failed import or export degrades to a
//! no-op plus a user-visible notice, never a crash.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("file is too large ({0} bytes, limit {limit})", limit = crate::io::MAX_FILE_SIZE)]
    FileTooLarge(u64),

    #[error("could not decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("could not read file: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("could not encode PNG: {0}")]
    Encode(#[source] image::ImageError),

    #[error("could not write file: {0}")]
    Io(#[from] std::io::Error),
}
