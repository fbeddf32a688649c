use thiserror::Error;

use crate::dns::DnsError;

use super::Mode;

/// Raised when a mode string is not one of [`Mode::ACCEPTED`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown verification mode '{input}' (expected one of: {})", Mode::ACCEPTED.join(", "))]
pub struct ModeParseError {
    input: String,
}

impl ModeParseError {
    pub(crate) fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }
}

/// Setup errors. Individual checks never produce one of these.
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error(transparent)]
    Dns(#[from] DnsError),
}
