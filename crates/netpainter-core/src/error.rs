use thiserror::Error;

/// Result type alias for model operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Configuration errors raised while building or styling a model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A name matched neither a built-in kind nor a registered custom kind.
    #[error("Unknown layer kind '{0}'")]
    UnknownLayerKind(String),

    /// Kernel dimensions must both be positive.
    #[error("Invalid kernel size {x}x{y}: dimensions must be positive")]
    InvalidKernel { x: i64, y: i64 },
}
