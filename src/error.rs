use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OverlayError {
    #[error("template fragment `{0}` not found")]
    MissingFragment(&'static str),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("terminal i/o error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T, E = OverlayError> = std::result::Result<T, E>;
