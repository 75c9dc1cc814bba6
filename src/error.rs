//! Error types for llm-council

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CouncilError {
    #[error("No API key configured: set {0}")]
    MissingApiKey(String),

    #[error("Environment file error in {}: {}", .path.display(), .source)]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CouncilError>;
