use thiserror::Error;

#[derive(Debug, Error)]
pub enum SmtpError {
    #[error("cannot resolve {host}: {source}")]
    Resolve {
        host: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{host} has no usable address")]
    NoAddress { host: String },
    #[error("connection to {host} failed: {source}")]
    Connect {
        host: String,
        #[source]
        source: std::io::Error,
    },
    #[error("I/O error: {source}")]
    Io {
        #[source]
        source: std::io::Error,
    },
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl SmtpError {
    pub(crate) fn io(source: std::io::Error) -> Self {
        Self::Io { source }
    }

    /// `true` when the host answered the TCP handshake with a refusal,
    /// i.e. nothing listens on the SMTP port.
    pub fn is_refused(&self) -> bool {
        matches!(
            self,
            Self::Connect { source, .. } if source.kind() == std::io::ErrorKind::ConnectionRefused
        )
    }
}
