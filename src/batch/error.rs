use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::verifier::VerifyError;

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("column '{column}' not found (available: {})", available.join(", "))]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("cannot write output: {0}")]
    Output(#[from] std::io::Error),
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("input directory {path} does not exist")]
    MissingInputDir { path: PathBuf },
    #[error(transparent)]
    Verifier(#[from] VerifyError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl BatchError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
