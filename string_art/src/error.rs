use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid image {path}: {reason}")]
    InvalidImage { path: PathBuf, reason: String },
    #[error(transparent)]
    InvalidConfiguration(#[from] ConfigError),
    #[error("Every chord starting at nail {nail} is degenerate")]
    NoViableChord { nail: usize },
    #[error("The generation was cancelled")]
    Cancelled,
    #[error("Failed saving the result: {0}")]
    Save(#[from] image::ImageError),
    #[error("The {0} thread panicked")]
    WorkerPanicked(&'static str),
}

impl Error {
    pub(crate) fn invalid_image(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::InvalidImage {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
