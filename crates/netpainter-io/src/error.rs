use std::io;
use thiserror::Error;

/// Failures while rasterizing a diagram or writing it out.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("PNG encoding failed: {0}")]
    Encoding(#[from] png::EncodingError),

    #[error("Cannot allocate a {width}x{height} canvas")]
    InvalidCanvas { width: u32, height: u32 },

    #[error(transparent)]
    Model(#[from] netpainter_core::Error),
}
