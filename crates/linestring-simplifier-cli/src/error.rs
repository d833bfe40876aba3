use linestring_simplifier_lib::SimplifyError;
use std::path::PathBuf;

/// Errors surfaced by the command line front-end
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse GPX: {0}")]
    Gpx(#[from] gpx::errors::GpxError),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported input: {0}")]
    UnsupportedInput(String),

    #[error(transparent)]
    Simplify(#[from] SimplifyError),
}
