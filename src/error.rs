use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToastError {
    #[error("No tokio runtime available to schedule toast clears")]
    NoRuntime,

    #[error("Failed to read config {path:?}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    ConfigParse(#[from] toml::de::Error),
}
