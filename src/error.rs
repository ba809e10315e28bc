use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CarouselError {
    #[error("advance interval must be greater than zero")]
    ZeroInterval,

    #[error("virtual space multiplier must be greater than zero")]
    ZeroMultiplier,

    /// `len × multiplier` does not fit in a `usize`.
    #[error("virtual space of {len} items x {multiplier} does not fit in usize")]
    SpaceOverflow { len: usize, multiplier: usize },

    #[error("invalid value {value:?} for {var}")]
    InvalidEnv { var: &'static str, value: String },

    #[error("unsupported image source: {0}")]
    UnsupportedSource(String),

    #[error("failed to decode image {path:?}: {message}")]
    Decode { path: PathBuf, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CarouselError>;
