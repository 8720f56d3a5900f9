use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors produced while loading or saving an [`Image`][crate::Image].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("codec error: {0}")]
    Image(#[from] image::ImageError),

    /// The file extension does not map to a format the codec can write.
    #[error("unsupported image format for '{}'", .0.display())]
    UnsupportedFormat(PathBuf),

    /// A pixel buffer did not have the `width * height * 4` bytes its size requires.
    #[error("incorrect buffer size {actual} for {width}x{height} image (expected {expected} bytes)")]
    BufferSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("cannot save an empty image")]
    EmptyImage,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
