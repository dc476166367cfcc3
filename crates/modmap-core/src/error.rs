use std::path::PathBuf;
use thiserror::Error;

/// Core error type for modmap operations.
///
/// Resolution and registry lookups never fail; only loading configuration
/// from disk does.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read config at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
